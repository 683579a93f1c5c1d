//! Marketing analytics tool catalog.
//!
//! [`ToolKind`] is the closed set of tools the agent knows about. The
//! registry handed to the model, the typed argument decoding in [`ToolQuery`]
//! and the projection policy table are all keyed by it, so adding a tool
//! means adding a variant and filling in each table.

mod args;
mod fixtures;

pub use args::{
    AccountArgs, AnomalyArgs, AttributionArgs, AttributionModel, BounceArgs, BriefArgs,
    BuyingStage, CampaignArgs, CampaignType, Channel, EmailArgs, IntentArgs, LeadArgs, NoArgs,
    OutreachArgs, PaidMediaArgs, Platform, Priority, Segment, SegmentFilter, SeverityFilter,
    SummaryArgs, ToolQuery,
};
pub use fixtures::FixtureSource;

use crate::tools::{Param, ToolRegistry, ToolSpec};
use std::fmt;

/// Identity of a catalog tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolKind {
    MarketingSummary,
    LeadMetrics,
    ConversionFunnel,
    CampaignPerformance,
    PaidMediaPerformance,
    EmailEngagement,
    IntentSignals,
    Account360View,
    AccountsToReachOut,
    PipelineMetrics,
    ChannelAttribution,
    HighBouncePages,
    PagesToSunset,
    ContentEngagement,
    MarketingAnomalies,
    CampaignBrief,
}

impl ToolKind {
    pub const ALL: [ToolKind; 16] = [
        Self::MarketingSummary,
        Self::LeadMetrics,
        Self::ConversionFunnel,
        Self::CampaignPerformance,
        Self::PaidMediaPerformance,
        Self::EmailEngagement,
        Self::IntentSignals,
        Self::Account360View,
        Self::AccountsToReachOut,
        Self::PipelineMetrics,
        Self::ChannelAttribution,
        Self::HighBouncePages,
        Self::PagesToSunset,
        Self::ContentEngagement,
        Self::MarketingAnomalies,
        Self::CampaignBrief,
    ];

    /// Wire name used by the model.
    pub fn name(self) -> &'static str {
        match self {
            Self::MarketingSummary => "get_b2b_marketing_summary",
            Self::LeadMetrics => "get_lead_metrics",
            Self::ConversionFunnel => "get_conversion_funnel",
            Self::CampaignPerformance => "get_campaign_performance",
            Self::PaidMediaPerformance => "get_paid_media_performance",
            Self::EmailEngagement => "get_email_engagement",
            Self::IntentSignals => "get_intent_signals",
            Self::Account360View => "get_account_360_view",
            Self::AccountsToReachOut => "get_accounts_to_reach_out",
            Self::PipelineMetrics => "get_pipeline_metrics",
            Self::ChannelAttribution => "get_channel_attribution",
            Self::HighBouncePages => "get_high_bounce_pages",
            Self::PagesToSunset => "get_pages_to_sunset",
            Self::ContentEngagement => "get_content_engagement",
            Self::MarketingAnomalies => "detect_marketing_anomalies",
            Self::CampaignBrief => "generate_campaign_brief",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    fn description(self) -> &'static str {
        match self {
            Self::MarketingSummary => {
                "Get a B2B marketing summary: headline KPIs, monthly trend, channel and segment breakdowns."
            }
            Self::LeadMetrics => {
                "Get lead counts, MQL counts and lead scores by segment and lead source (Marketo)."
            }
            Self::ConversionFunnel => {
                "Get the funnel from leads to closed-won with stage counts, rates and stage velocity."
            }
            Self::CampaignPerformance => "Get campaign-level performance metrics by channel.",
            Self::PaidMediaPerformance => {
                "Get paid media campaign metrics, comparing LinkedIn and Google."
            }
            Self::EmailEngagement => "Get email campaign engagement: open, click and unsubscribe rates.",
            Self::IntentSignals => {
                "Get 6sense intent data showing which accounts are researching relevant topics."
            }
            Self::Account360View => {
                "Get a complete 360-degree view of one account: scores, pipeline, engagement timeline and peer comparison."
            }
            Self::AccountsToReachOut => {
                "Get high-intent accounts that have gone quiet and should be contacted, with a suggested action."
            }
            Self::PipelineMetrics => "Get Salesforce pipeline movement and pipeline health KPIs.",
            Self::ChannelAttribution => {
                "Get multi-touch attribution showing channel influence on revenue and common conversion paths."
            }
            Self::HighBouncePages => "Get web pages with a bounce rate above a threshold (Adobe Analytics).",
            Self::PagesToSunset => "Get low-traffic, outdated pages that are candidates for retirement.",
            Self::ContentEngagement => "Get PathFactory content engagement by account and asset type.",
            Self::MarketingAnomalies => {
                "Detect marketing anomalies including performance drops, intent spikes and engagement gaps."
            }
            Self::CampaignBrief => {
                "Generate a campaign brief with target accounts, channel mix and expected results."
            }
        }
    }

    /// The tool definition exposed to the model.
    pub fn spec(self) -> ToolSpec {
        let spec = ToolSpec::new(self.name(), self.description());
        let segment = || Param::string("segment").choices(Segment::NAMES);
        match self {
            Self::MarketingSummary => spec
                .param(
                    Param::string("time_period")
                        .default_value(args::DEFAULT_TIME_PERIOD)
                        .describe("Reporting window, e.g. last_30_days"),
                )
                .param(segment()),
            Self::LeadMetrics => spec
                .param(segment())
                .param(Param::string("lead_source").describe("Filter by lead source"))
                .param(
                    Param::integer("date_range_days")
                        .default_value(args::DEFAULT_LEAD_RANGE_DAYS)
                        .minimum(1.0),
                ),
            Self::ConversionFunnel | Self::PipelineMetrics | Self::ContentEngagement => {
                spec.param(segment())
            }
            Self::CampaignPerformance => {
                spec.param(Param::string("channel").choices(Channel::NAMES))
            }
            Self::PaidMediaPerformance => {
                spec.param(Param::string("platform").choices(Platform::NAMES))
            }
            Self::EmailEngagement => spec.param(
                Param::integer("date_range_days")
                    .default_value(args::DEFAULT_EMAIL_RANGE_DAYS)
                    .minimum(1.0),
            ),
            Self::IntentSignals => spec
                .param(segment())
                .param(Param::string("buying_stage").choices(BuyingStage::NAMES)),
            Self::Account360View => spec.param(
                Param::string("account_name")
                    .describe("Company name of the account")
                    .required(),
            ),
            Self::AccountsToReachOut => {
                spec.param(Param::string("priority").choices(Priority::NAMES))
            }
            Self::ChannelAttribution => spec.param(
                Param::string("attribution_model")
                    .choices(AttributionModel::NAMES)
                    .default_value(AttributionModel::Linear.as_str()),
            ),
            Self::HighBouncePages => spec.param(
                Param::number("min_bounce_rate")
                    .default_value(args::DEFAULT_MIN_BOUNCE_RATE)
                    .minimum(0.0)
                    .maximum(100.0)
                    .describe("Bounce rate threshold in percent"),
            ),
            Self::PagesToSunset => spec,
            Self::MarketingAnomalies => spec
                .param(
                    Param::integer("lookback_days")
                        .default_value(args::DEFAULT_LOOKBACK_DAYS)
                        .minimum(1.0),
                )
                .param(
                    Param::string("severity_filter")
                        .choices(SeverityFilter::NAMES)
                        .default_value(SeverityFilter::All.as_str()),
                ),
            Self::CampaignBrief => spec
                .param(
                    Param::string("campaign_type")
                        .choices(CampaignType::NAMES)
                        .required(),
                )
                .param(
                    Param::string("target_segment")
                        .choices(Segment::NAMES)
                        .required(),
                )
                .param(
                    Param::string("campaign_objective")
                        .describe("What the campaign should achieve, e.g. generate MQLs")
                        .required(),
                ),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registry of every catalog tool, in declaration order.
pub fn registry() -> ToolRegistry {
    // Names come from a closed enum, so `new` cannot see a duplicate.
    ToolRegistry::new(ToolKind::ALL.map(ToolKind::spec)).unwrap_or_default()
}
