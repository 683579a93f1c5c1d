//! Static demo data for every catalog tool.

use super::{Segment, ToolKind, ToolQuery};
use crate::tools::{DataSource, ToolError};
use serde_json::{Value, json};

/// Offline data source backed by fixed payloads.
///
/// Segment filters narrow the `data` rows of tables that carry a `segment`
/// column; every other argument only affects the entity binding done by the
/// executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSource;

impl FixtureSource {
    pub fn new() -> Self {
        Self
    }

    /// The payload for `query`.
    pub fn payload(&self, query: &ToolQuery) -> Value {
        let mut payload = fixture(query.kind());
        if let Some(segment) = segment_filter(query) {
            retain_segment(&mut payload, segment);
        }
        payload
    }
}

impl DataSource for FixtureSource {
    async fn fetch(&self, query: &ToolQuery) -> Result<Value, ToolError> {
        Ok(self.payload(query))
    }
}

fn segment_filter(query: &ToolQuery) -> Option<Segment> {
    match query {
        ToolQuery::MarketingSummary(args) => args.segment,
        ToolQuery::LeadMetrics(args) => args.segment,
        ToolQuery::IntentSignals(args) => args.segment,
        ToolQuery::PipelineMetrics(args) | ToolQuery::ContentEngagement(args) => args.segment,
        _ => None,
    }
}

fn retain_segment(payload: &mut Value, segment: Segment) {
    let Some(rows) = payload.get_mut("data").and_then(Value::as_array_mut) else {
        return;
    };
    let has_column = rows.iter().any(|row| row.get("segment").is_some());
    if has_column {
        rows.retain(|row| row["segment"] == segment.as_str());
    }
}

fn fixture(kind: ToolKind) -> Value {
    match kind {
        ToolKind::MarketingSummary => json!({
            "data": [
                { "metric": "Total Leads", "value": 1245, "change": 12.5, "trend": "up" },
                { "metric": "MQLs", "value": 425, "change": 8.3, "trend": "up" },
                { "metric": "SQLs", "value": 156, "change": 15.2, "trend": "up" },
                { "metric": "Pipeline", "value": 18_500_000, "change": 18.5, "trend": "up" },
                { "metric": "Win Rate", "value": 31.5, "change": -2.1, "trend": "down" }
            ],
            "trend_data": [
                { "month": "Jul", "leads": 180, "mqls": 58 },
                { "month": "Aug", "leads": 195, "mqls": 65 },
                { "month": "Sep", "leads": 210, "mqls": 72 },
                { "month": "Oct", "leads": 245, "mqls": 85 },
                { "month": "Nov", "leads": 268, "mqls": 92 },
                { "month": "Dec", "leads": 147, "mqls": 53 }
            ],
            "channel_breakdown": [
                { "channel": "Email", "leads": 312, "pct": 25 },
                { "channel": "Organic", "leads": 289, "pct": 23 },
                { "channel": "Paid Search", "leads": 234, "pct": 19 },
                { "channel": "Social", "leads": 178, "pct": 14 },
                { "channel": "Webinar", "leads": 145, "pct": 12 },
                { "channel": "Referral", "leads": 87, "pct": 7 }
            ],
            "segment_breakdown": [
                { "segment": "DCIO", "leads": 399, "mqls": 167, "rate": 41.9 },
                { "segment": "Enterprise", "leads": 501, "mqls": 139, "rate": 27.7 },
                { "segment": "Mid-Market", "leads": 345, "mqls": 119, "rate": 34.5 }
            ]
        }),
        ToolKind::LeadMetrics => json!({
            "data": [
                { "segment": "DCIO", "source": "Website", "leads": 245, "mqls": 89, "rate": 36.3, "avg_score": 72.5 },
                { "segment": "DCIO", "source": "Webinar", "leads": 156, "mqls": 78, "rate": 50.0, "avg_score": 78.2 },
                { "segment": "Enterprise", "source": "Content", "leads": 312, "mqls": 94, "rate": 30.1, "avg_score": 65.8 },
                { "segment": "Enterprise", "source": "Paid Media", "leads": 189, "mqls": 45, "rate": 23.8, "avg_score": 58.3 },
                { "segment": "Mid-Market", "source": "Website", "leads": 203, "mqls": 58, "rate": 28.6, "avg_score": 61.3 }
            ],
            "quality_dist": [
                { "label": "Hot", "count": 89, "pct": 7 },
                { "label": "Warm", "count": 312, "pct": 25 },
                { "label": "Nurture", "count": 456, "pct": 37 },
                { "label": "Cold", "count": 278, "pct": 22 },
                { "label": "Unqualified", "count": 110, "pct": 9 }
            ],
            "weekly": [
                { "week": "W1", "leads": 285, "mqls": 98 },
                { "week": "W2", "leads": 312, "mqls": 105 },
                { "week": "W3", "leads": 298, "mqls": 102 },
                { "week": "W4", "leads": 350, "mqls": 120 }
            ]
        }),
        ToolKind::ConversionFunnel => json!({
            "data": [
                { "stage": "Leads", "count": 1245, "rate": 100.0 },
                { "stage": "MQLs", "count": 425, "rate": 34.1 },
                { "stage": "SQLs", "count": 156, "rate": 12.5 },
                { "stage": "Opportunities", "count": 89, "rate": 7.1 },
                { "stage": "Closed Won", "count": 28, "rate": 2.2 }
            ],
            "segment_funnels": [
                { "segment": "DCIO", "stage": "Leads", "count": 399 },
                { "segment": "DCIO", "stage": "MQLs", "count": 167 },
                { "segment": "DCIO", "stage": "Won", "count": 18 },
                { "segment": "Enterprise", "stage": "Leads", "count": 501 },
                { "segment": "Enterprise", "stage": "MQLs", "count": 139 },
                { "segment": "Enterprise", "stage": "Won", "count": 8 }
            ],
            "velocity": [
                { "stage": "Lead to MQL", "avg_days": 14 },
                { "stage": "MQL to SQL", "avg_days": 21 },
                { "stage": "SQL to Opp", "avg_days": 18 },
                { "stage": "Opp to Close", "avg_days": 45 }
            ]
        }),
        ToolKind::CampaignPerformance => json!({
            "data": [
                { "campaign": "Q4 DCIO Nurture", "channel": "Email", "sent": 12500, "opens": 4050, "clicks": 1062, "mqls": 58, "cost": 6200 },
                { "campaign": "Stable Value Webinar", "channel": "Content", "sent": 3400, "opens": 1580, "clicks": 642, "mqls": 71, "cost": 9800 },
                { "campaign": "LinkedIn DCIO", "channel": "Paid Social", "sent": 0, "opens": 0, "clicks": 9580, "mqls": 42, "cost": 48500 },
                { "campaign": "Google Search Brand", "channel": "Paid Search", "sent": 0, "opens": 0, "clicks": 52800, "mqls": 96, "cost": 38200 },
                { "campaign": "Top 50 Accounts ABM", "channel": "ABM", "sent": 850, "opens": 512, "clicks": 188, "mqls": 33, "cost": 15000 }
            ],
            "monthly_mqls": [
                { "month": "Oct", "Email": 18, "Content": 22, "Paid Social": 12, "Paid Search": 31, "ABM": 9 },
                { "month": "Nov", "Email": 21, "Content": 25, "Paid Social": 14, "Paid Search": 34, "ABM": 11 },
                { "month": "Dec", "Email": 19, "Content": 24, "Paid Social": 16, "Paid Search": 31, "ABM": 13 }
            ]
        }),
        ToolKind::PaidMediaPerformance => json!({
            "data": [
                { "campaign": "LinkedIn DCIO", "platform": "LinkedIn", "spend": 48500, "impressions": 856_000, "clicks": 9580, "conversions": 425, "ctr": 1.12, "roas": 2.8, "cpa": 114 },
                { "campaign": "Google Search", "platform": "Google", "spend": 38200, "impressions": 1_650_000, "clicks": 52800, "conversions": 1890, "ctr": 3.20, "roas": 4.5, "cpa": 20 },
                { "campaign": "LinkedIn Retarget", "platform": "LinkedIn", "spend": 22500, "impressions": 425_000, "clicks": 5100, "conversions": 312, "ctr": 1.20, "roas": 3.2, "cpa": 72 }
            ],
            "platform_comp": [
                { "platform": "LinkedIn", "spend": 71000, "conversions": 737, "roas": 2.95 },
                { "platform": "Google", "spend": 54000, "conversions": 2135, "roas": 3.85 }
            ],
            "daily": [
                { "date": "Dec 1", "spend": 4200, "conversions": 145 },
                { "date": "Dec 2", "spend": 4500, "conversions": 162 },
                { "date": "Dec 3", "spend": 3800, "conversions": 128 },
                { "date": "Dec 4", "spend": 4100, "conversions": 152 }
            ]
        }),
        ToolKind::EmailEngagement => json!({
            "data": [
                { "campaign": "Q4 DCIO Nurture", "sent": 12500, "open_rate": 32.4, "click_rate": 8.5, "unsubscribe_rate": 0.3 },
                { "campaign": "Enterprise Newsletter", "sent": 18200, "open_rate": 24.1, "click_rate": 4.2, "unsubscribe_rate": 0.5 },
                { "campaign": "Webinar Invite", "sent": 6400, "open_rate": 38.7, "click_rate": 11.3, "unsubscribe_rate": 0.2 },
                { "campaign": "Product Update", "sent": 21000, "open_rate": 19.8, "click_rate": 2.9, "unsubscribe_rate": 0.7 }
            ],
            "engagement_by_hour": [
                { "day": "Mon", "9am": 31.2, "12pm": 24.5, "3pm": 21.8, "6pm": 12.4 },
                { "day": "Tue", "9am": 34.8, "12pm": 27.1, "3pm": 23.0, "6pm": 13.9 },
                { "day": "Wed", "9am": 33.5, "12pm": 26.4, "3pm": 22.6, "6pm": 14.2 },
                { "day": "Thu", "9am": 30.9, "12pm": 25.7, "3pm": 20.4, "6pm": 11.8 },
                { "day": "Fri", "9am": 26.3, "12pm": 21.0, "3pm": 16.5, "6pm": 9.7 }
            ]
        }),
        ToolKind::IntentSignals => json!({
            "data": [
                { "company": "Goldman Sachs", "segment": "DCIO", "intent": 92, "stage": "Decision", "signals": 12 },
                { "company": "JPMorgan Chase", "segment": "DCIO", "intent": 88, "stage": "Decision", "signals": 9 },
                { "company": "Vanguard", "segment": "DCIO", "intent": 85, "stage": "Consideration", "signals": 8 },
                { "company": "BlackRock", "segment": "DCIO", "intent": 82, "stage": "Consideration", "signals": 7 },
                { "company": "Fidelity", "segment": "DCIO", "intent": 79, "stage": "Consideration", "signals": 6 }
            ],
            "stage_dist": [
                { "stage": "Decision", "count": 12, "pct": 15 },
                { "stage": "Consideration", "count": 35, "pct": 44 },
                { "stage": "Awareness", "count": 33, "pct": 41 }
            ],
            "topics": [
                { "topic": "retirement plans", "count": 45 },
                { "topic": "stable value", "count": 38 },
                { "topic": "401k providers", "count": 32 },
                { "topic": "target date", "count": 28 }
            ]
        }),
        ToolKind::Account360View => json!({
            "data": [{
                "account_name": "Goldman Sachs",
                "segment": "DCIO",
                "intent_score": 92,
                "engagement_score": 88,
                "buying_stage": "Decision",
                "lead_count": 8,
                "mql_count": 5,
                "web_sessions": 156,
                "content_downloads": 12,
                "pipeline_value": 2_500_000
            }],
            "timeline": [
                { "date": "Nov 1", "type": "Web Visit", "detail": "Viewed Stable Value page" },
                { "date": "Nov 5", "type": "Content", "detail": "Downloaded DCIO Guide" },
                { "date": "Nov 12", "type": "Webinar", "detail": "Attended Q4 Outlook" },
                { "date": "Dec 2", "type": "Demo", "detail": "Requested product demo" }
            ],
            "comparison": [
                { "company": "Goldman Sachs", "intent": 92, "engagement": 88, "pipeline": 2_500_000 },
                { "company": "JPMorgan", "intent": 88, "engagement": 82, "pipeline": 1_800_000 },
                { "company": "Vanguard", "intent": 85, "engagement": 78, "pipeline": 1_500_000 }
            ],
            "journey": [
                { "path": "Website → Known → Engaged", "accounts": 300 },
                { "path": "Paid → Known → MQL", "accounts": 200 },
                { "path": "Email → Engaged → MQL → SQL → Won", "accounts": 28 }
            ]
        }),
        ToolKind::AccountsToReachOut => json!({
            "data": [
                { "company": "Vanguard", "segment": "DCIO", "intent": 85, "engagement": 78, "priority": "High", "action": "SDR Outreach", "days_silent": 14, "pipeline_potential": 1_500_000 },
                { "company": "Fidelity", "segment": "DCIO", "intent": 82, "engagement": 72, "priority": "High", "action": "Executive Email", "days_silent": 21, "pipeline_potential": 1_200_000 },
                { "company": "State Street", "segment": "DCIO", "intent": 78, "engagement": 66, "priority": "Medium", "action": "Nurture", "days_silent": 35, "pipeline_potential": 900_000 }
            ],
            "priority_breakdown": [
                { "priority": "High", "count": 8, "potential": 12_500_000 },
                { "priority": "Medium", "count": 15, "potential": 8_200_000 },
                { "priority": "Low", "count": 22, "potential": 4_800_000 }
            ]
        }),
        ToolKind::PipelineMetrics => json!({
            "data": [
                { "segment": "DCIO", "open_pipeline": 8_200_000, "opportunities": 34, "win_rate": 35.2, "avg_deal_size": 241_000 },
                { "segment": "Enterprise", "open_pipeline": 6_900_000, "opportunities": 31, "win_rate": 28.4, "avg_deal_size": 222_000 },
                { "segment": "Mid-Market", "open_pipeline": 3_400_000, "opportunities": 24, "win_rate": 30.1, "avg_deal_size": 142_000 }
            ],
            "movement": [
                { "step": "Starting Pipeline", "amount": 15_000_000 },
                { "step": "New Opportunities", "amount": 6_200_000 },
                { "step": "Expansions", "amount": 1_100_000 },
                { "step": "Closed Won", "amount": -2_400_000 },
                { "step": "Closed Lost", "amount": -1_400_000 }
            ],
            "health": {
                "coverage_ratio": 3.2,
                "win_rate": 31.5,
                "avg_cycle_days": 98
            }
        }),
        ToolKind::ChannelAttribution => json!({
            "data": [
                { "channel": "Email", "first_touch": 156, "last_touch": 189, "linear": 172, "revenue": 4_500_000, "pct": 32 },
                { "channel": "Organic", "first_touch": 189, "last_touch": 142, "linear": 165, "revenue": 3_800_000, "pct": 27 },
                { "channel": "Paid Search", "first_touch": 98, "last_touch": 112, "linear": 105, "revenue": 2_800_000, "pct": 20 },
                { "channel": "Social", "first_touch": 78, "last_touch": 65, "linear": 71, "revenue": 1_800_000, "pct": 13 }
            ],
            "paths": [
                { "path": "Organic → Email → Direct", "conversions": 45, "revenue": 1_250_000 },
                { "path": "Paid → Email → Direct", "conversions": 38, "revenue": 980_000 },
                { "path": "Email → Webinar → Direct", "conversions": 32, "revenue": 850_000 }
            ]
        }),
        ToolKind::HighBouncePages => json!({
            "data": [
                { "page": "/landing/ppc-q4", "type": "Landing", "sessions": 245, "bounce": 72.5, "avg_time": 18 },
                { "page": "/landing/email-nov", "type": "Landing", "sessions": 189, "bounce": 68.2, "avg_time": 22 },
                { "page": "/resources/old-guide", "type": "Resource", "sessions": 56, "bounce": 65.4, "avg_time": 35 }
            ],
            "by_device": [
                { "device": "Mobile", "bounce": 68.5, "sessions": 1250 },
                { "device": "Desktop", "bounce": 45.2, "sessions": 2800 },
                { "device": "Tablet", "bounce": 52.3, "sessions": 450 }
            ]
        }),
        ToolKind::PagesToSunset => json!({
            "data": [
                { "page": "/resources/archived/old-guide-2019", "views": 12, "bounce": 78.5, "reason": "Legacy content", "priority": "High" },
                { "page": "/products/discontinued/old-fund", "views": 23, "bounce": 71.2, "reason": "Product discontinued", "priority": "High" },
                { "page": "/solutions/legacy/outdated", "views": 15, "bounce": 68.9, "reason": "Outdated info", "priority": "Medium" }
            ]
        }),
        ToolKind::ContentEngagement => json!({
            "data": [
                { "company": "Goldman Sachs", "segment": "DCIO", "asset": "Stable Value Guide", "type": "Whitepaper", "time_spent": 485, "completion": 92 },
                { "company": "JPMorgan", "segment": "DCIO", "asset": "DCIO Comparison", "type": "eBook", "time_spent": 320, "completion": 78 },
                { "company": "Vanguard", "segment": "DCIO", "asset": "Best Practices", "type": "Whitepaper", "time_spent": 245, "completion": 65 }
            ],
            "by_type": [
                { "type": "Whitepaper", "avg_time": 340, "completion": 72 },
                { "type": "eBook", "avg_time": 280, "completion": 65 },
                { "type": "Video", "avg_time": 180, "completion": 58 }
            ]
        }),
        ToolKind::MarketingAnomalies => json!({
            "data": [
                { "type": "Drop", "area": "Email CTR", "current": 5.2, "baseline": 8.5, "change": -38.8, "severity": "High", "action": "Review email content" },
                { "type": "Spike", "area": "Vanguard Intent", "current": 89, "baseline": 62, "change": 43.5, "severity": "Opportunity", "action": "Prioritize SDR outreach" },
                { "type": "Spike", "area": "BlackRock Intent", "current": 85, "baseline": 58, "change": 46.6, "severity": "Opportunity", "action": "Add to ABM" },
                { "type": "Gap", "area": "Fidelity", "current": 72, "baseline": 14, "change": 414, "severity": "Medium", "action": "Sales outreach" }
            ],
            "summary": { "total": 6, "high": 2, "opportunities": 2, "medium": 2 }
        }),
        ToolKind::CampaignBrief => json!({
            "data": [{
                "campaign_name": "DCIO Q1 2025",
                "target_segment": "DCIO",
                "budget": 25000,
                "duration": "6 weeks"
            }],
            "target_accounts": [
                { "company": "Vanguard", "intent": 85, "fit": "A" },
                { "company": "Fidelity", "intent": 82, "fit": "A" },
                { "company": "State Street", "intent": 78, "fit": "B" }
            ],
            "channel_mix": [
                { "channel": "LinkedIn Ads", "budget": 10000, "expected_leads": 45 },
                { "channel": "Email Nurture", "budget": 5000, "expected_leads": 25 },
                { "channel": "Content Syndication", "budget": 6000, "expected_leads": 30 }
            ],
            "expected_results": { "leads": 120, "mqls": 45, "pipeline": 2_500_000, "cpl": 208 }
        }),
    }
}
