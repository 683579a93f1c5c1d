//! Mapping tool payloads to chart descriptors and a table.
//!
//! Each catalog tool has a fixed list of chart rules (see `policy`). A rule
//! reads one block of the payload and is skipped when that block is missing
//! or shaped differently, so a partial payload still yields the charts it
//! can support.

mod chart;
mod policy;
mod table;

pub use chart::{BarLayout, Chart, ChartDescriptor, Datum, Gauge, Link, Point, Series, TreeNode};
pub use table::{Table, cell_text};

use crate::catalog::ToolKind;
use serde_json::Value;

/// Everything a UI needs to show one tool result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    /// `(tab label, chart)` in policy order.
    pub charts: Vec<(String, ChartDescriptor)>,
    pub table: Option<Table>,
    /// Set when there is nothing to show.
    pub notice: Option<String>,
}

impl Projection {
    fn empty(tool_name: &str) -> Self {
        Self {
            notice: Some(format!("No data available for {tool_name}.")),
            ..Self::default()
        }
    }
}

/// Project a tool payload into charts and a table.
pub fn project(tool_name: &str, payload: &Value) -> Projection {
    let data = match payload.get("data") {
        Some(Value::Array(rows)) if !rows.is_empty() => &payload["data"],
        Some(Value::Object(_)) => &payload["data"],
        _ => return Projection::empty(tool_name),
    };

    let mut charts: Vec<(String, ChartDescriptor)> = ToolKind::from_name(tool_name)
        .map(policy::rules)
        .unwrap_or_default()
        .iter()
        .filter_map(|rule| {
            let chart = rule.builder.build(payload.get(rule.source)?)?;
            Some((
                rule.label.to_string(),
                ChartDescriptor {
                    title: rule.title.to_string(),
                    chart,
                },
            ))
        })
        .collect();

    if charts.is_empty() {
        charts.extend(fallback(tool_name, data));
    }
    let table = Table::from_rows(data);
    if charts.is_empty() && table.is_none() {
        return Projection::empty(tool_name);
    }

    Projection {
        charts,
        table,
        notice: None,
    }
}

/// Bar chart of the first text column against the first numeric column.
fn fallback(tool_name: &str, data: &Value) -> Option<(String, ChartDescriptor)> {
    let rows = policy::rows(data)?;
    let first = rows.first()?;
    let category = first.iter().find(|(_, v)| v.is_string())?.0;
    let value = first.iter().find(|(_, v)| v.is_number())?.0;

    let mut categories = Vec::with_capacity(rows.len());
    let mut values = Vec::with_capacity(rows.len());
    for row in &rows {
        categories.push(row.get(category).map(cell_text)?);
        values.push(row.get(value)?.as_f64()?);
    }

    Some((
        "Overview".to_string(),
        ChartDescriptor {
            title: title_case(tool_name),
            chart: Chart::Bar {
                categories,
                series: vec![Series {
                    name: value.clone(),
                    values,
                }],
                layout: BarLayout::Grouped,
            },
        },
    ))
}

fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

const DEFAULT_FOLLOW_UPS: &[&str] = &[
    "B2B summary",
    "Detect anomalies",
    "Accounts to reach out",
    "Campaign brief",
];

/// Suggested next questions after a result from `tool_name`.
pub fn follow_ups(tool_name: &str) -> &'static [&'static str] {
    let Some(kind) = ToolKind::from_name(tool_name) else {
        return DEFAULT_FOLLOW_UPS;
    };
    match kind {
        ToolKind::MarketingSummary => &[
            "Lead metrics by segment",
            "Top intent accounts",
            "Detect anomalies",
            "Conversion funnel",
        ],
        ToolKind::LeadMetrics => &[
            "Conversion funnel",
            "Accounts to reach out",
            "Campaign brief",
            "Quality distribution",
        ],
        ToolKind::ConversionFunnel => &[
            "Drop-off analysis",
            "Lead metrics",
            "Accounts needing nurture",
            "Velocity metrics",
        ],
        ToolKind::CampaignPerformance => &[
            "Email engagement",
            "Paid media performance",
            "Channel attribution",
            "Campaign brief",
        ],
        ToolKind::PaidMediaPerformance => &[
            "Channel attribution",
            "LinkedIn vs Google",
            "Daily trend",
            "Optimization brief",
        ],
        ToolKind::EmailEngagement => &[
            "Best send times",
            "Campaign performance",
            "Detect anomalies",
            "Nurture campaign brief",
        ],
        ToolKind::IntentSignals => &[
            "360 view top account",
            "Accounts to reach out",
            "Campaign brief",
            "Buying stages",
        ],
        ToolKind::Account360View => &[
            "Content engagement",
            "Similar accounts",
            "Funnel analysis",
            "PathFactory data",
        ],
        ToolKind::AccountsToReachOut => &[
            "360 view top account",
            "Generate campaign",
            "Intent signals",
            "Content engagement",
        ],
        ToolKind::PipelineMetrics => &[
            "Pipeline by segment",
            "Conversion funnel",
            "Accounts to reach out",
            "Channel attribution",
        ],
        ToolKind::ChannelAttribution => &[
            "Paid media details",
            "Journey paths",
            "Lead sources",
            "Funnel by channel",
        ],
        ToolKind::HighBouncePages => &[
            "Pages to sunset",
            "SEO comparison",
            "Device breakdown",
            "Weekly trend",
        ],
        ToolKind::PagesToSunset => &[
            "High bounce pages",
            "Page performance",
            "Impact analysis",
            "SEO performance",
        ],
        ToolKind::ContentEngagement => &[
            "Top assets by segment",
            "Accounts to reach out",
            "Intent signals",
            "Campaign brief",
        ],
        ToolKind::MarketingAnomalies => &[
            "Intent spike details",
            "Account 360",
            "Recovery campaign",
            "Performance drops",
        ],
        ToolKind::CampaignBrief => &[
            "Target accounts",
            "Historical performance",
            "Content assets",
            "Benchmarks",
        ],
    }
}
