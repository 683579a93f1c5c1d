//! Which charts each catalog tool gets, and how they are built.

use super::chart::{BarLayout, Chart, Datum, Gauge, Link, Point, Series, TreeNode};
use crate::catalog::ToolKind;
use serde_json::{Map, Value};
use std::collections::HashMap;

type Row = Map<String, Value>;

/// How to turn a block of rows (or one object) into a chart.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Builder {
    Funnel {
        stage: &'static str,
        value: &'static str,
    },
    /// With `group`, rows are pivoted: one series per distinct group value,
    /// using the first of `values`.
    Bar {
        category: &'static str,
        values: &'static [&'static str],
        group: Option<&'static str>,
        layout: BarLayout,
    },
    /// Without `value`, slices count rows per label.
    Pie {
        label: &'static str,
        value: Option<&'static str>,
    },
    Line {
        x: &'static str,
        values: &'static [&'static str],
    },
    Scatter {
        label: &'static str,
        x: &'static str,
        y: &'static str,
        size: Option<&'static str>,
        group: Option<&'static str>,
    },
    /// One series per row, first `limit` rows.
    Radar {
        label: &'static str,
        fields: &'static [&'static str],
        limit: usize,
    },
    HeatmapColumns {
        row: &'static str,
        columns: &'static [&'static str],
    },
    HeatmapPivot {
        row: &'static str,
        column: &'static str,
        value: &'static str,
    },
    /// Links from `"A → B → C"` path strings.
    Sankey {
        path: &'static str,
        value: &'static str,
    },
    Treemap {
        parent: Option<&'static str>,
        label: &'static str,
        value: &'static str,
    },
    /// Fixed fields of one object (or the first row), as `(label, field, max)`.
    GaugeFields(&'static [(&'static str, &'static str, f64)]),
    /// One gauge per row; the scale is half again the value.
    GaugeRows {
        label: &'static str,
        value: &'static str,
    },
    Waterfall {
        label: &'static str,
        value: &'static str,
    },
}

/// One chart in a tool's policy.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rule {
    pub label: &'static str,
    pub title: &'static str,
    /// Payload key holding the rows.
    pub source: &'static str,
    pub builder: Builder,
}

const fn rule(
    label: &'static str,
    title: &'static str,
    source: &'static str,
    builder: Builder,
) -> Rule {
    Rule {
        label,
        title,
        source,
        builder,
    }
}

const fn bar(category: &'static str, values: &'static [&'static str]) -> Builder {
    Builder::Bar {
        category,
        values,
        group: None,
        layout: BarLayout::Grouped,
    }
}

const fn hbar(category: &'static str, value: &'static [&'static str]) -> Builder {
    Builder::Bar {
        category,
        values: value,
        group: None,
        layout: BarLayout::Horizontal,
    }
}

const fn pie(label: &'static str, value: &'static str) -> Builder {
    Builder::Pie {
        label,
        value: Some(value),
    }
}

const SUMMARY: &[Rule] = &[
    rule("KPIs", "Key Metrics", "data", Builder::GaugeRows { label: "metric", value: "value" }),
    rule(
        "Trend",
        "Monthly Trend",
        "trend_data",
        Builder::Line {
            x: "month",
            values: &["leads", "mqls"],
        },
    ),
    rule("Channels", "Leads by Channel", "channel_breakdown", pie("channel", "leads")),
    rule("Segments", "By Segment", "segment_breakdown", bar("segment", &["leads", "mqls"])),
];

const LEADS: &[Rule] = &[
    rule(
        "Volume",
        "Leads by Segment & Source",
        "data",
        Builder::Bar {
            category: "segment",
            values: &["leads"],
            group: Some("source"),
            layout: BarLayout::Stacked,
        },
    ),
    rule(
        "MQL Rate",
        "MQL Rate by Source",
        "data",
        Builder::Bar {
            category: "source",
            values: &["rate"],
            group: Some("segment"),
            layout: BarLayout::Grouped,
        },
    ),
    rule(
        "Heatmap",
        "Lead Score by Segment and Source",
        "data",
        Builder::HeatmapPivot { row: "segment", column: "source", value: "avg_score" },
    ),
    rule("Quality", "Lead Quality", "quality_dist", pie("label", "count")),
    rule(
        "Weekly",
        "Weekly Trend",
        "weekly",
        Builder::Line {
            x: "week",
            values: &["leads", "mqls"],
        },
    ),
];

const FUNNEL: &[Rule] = &[
    rule("Funnel", "Conversion Funnel", "data", Builder::Funnel { stage: "stage", value: "count" }),
    rule(
        "Segments",
        "Funnel by Segment",
        "segment_funnels",
        Builder::Bar {
            category: "stage",
            values: &["count"],
            group: Some("segment"),
            layout: BarLayout::Grouped,
        },
    ),
    rule("Velocity", "Stage Velocity (Days)", "velocity", bar("stage", &["avg_days"])),
];

const CAMPAIGNS: &[Rule] = &[
    rule("MQLs", "MQLs by Campaign", "data", hbar("campaign", &["mqls"])),
    rule(
        "Efficiency",
        "Cost vs MQLs",
        "data",
        Builder::Scatter {
            label: "campaign",
            x: "cost",
            y: "mqls",
            size: Some("clicks"),
            group: Some("channel"),
        },
    ),
    rule(
        "Monthly",
        "Monthly MQLs by Channel",
        "monthly_mqls",
        Builder::HeatmapColumns {
            row: "month",
            columns: &["Email", "Content", "Paid Social", "Paid Search", "ABM"],
        },
    ),
];

const PAID_MEDIA: &[Rule] = &[
    rule(
        "ROAS",
        "ROAS by Campaign",
        "data",
        Builder::Bar {
            category: "campaign",
            values: &["roas"],
            group: Some("platform"),
            layout: BarLayout::Grouped,
        },
    ),
    rule(
        "Efficiency",
        "Spend vs Conversions",
        "data",
        Builder::Scatter {
            label: "campaign",
            x: "spend",
            y: "conversions",
            size: Some("roas"),
            group: Some("platform"),
        },
    ),
    rule("CTR", "CTR Comparison", "data", bar("campaign", &["ctr"])),
    rule("Budget", "Budget Split", "platform_comp", pie("platform", "spend")),
    rule(
        "Allocation",
        "Spend by Platform and Campaign",
        "data",
        Builder::Treemap { parent: Some("platform"), label: "campaign", value: "spend" },
    ),
    rule(
        "Daily",
        "Daily Trend",
        "daily",
        Builder::Line {
            x: "date",
            values: &["spend", "conversions"],
        },
    ),
];

const EMAIL: &[Rule] = &[
    rule("Rates", "Engagement by Campaign", "data", bar("campaign", &["open_rate", "click_rate"])),
    rule(
        "Send Times",
        "Open Rate by Send Time",
        "engagement_by_hour",
        Builder::HeatmapColumns { row: "day", columns: &["9am", "12pm", "3pm", "6pm"] },
    ),
];

const INTENT: &[Rule] = &[
    rule(
        "Intent",
        "Intent Scores",
        "data",
        Builder::Bar {
            category: "company",
            values: &["intent"],
            group: Some("stage"),
            layout: BarLayout::Horizontal,
        },
    ),
    rule(
        "Radar",
        "Account Comparison",
        "data",
        Builder::Radar { label: "company", fields: &["intent", "signals"], limit: 3 },
    ),
    rule("Stages", "Buying Stage", "stage_dist", pie("stage", "count")),
    rule("Topics", "Research Topics", "topics", hbar("topic", &["count"])),
];

const ACCOUNT: &[Rule] = &[
    rule(
        "Scorecard",
        "Account Scorecard",
        "data",
        Builder::GaugeFields(&[
            ("Intent", "intent_score", 100.0),
            ("Engagement", "engagement_score", 100.0),
            ("Pipeline ($)", "pipeline_value", 5_000_000.0),
        ]),
    ),
    rule(
        "Comparison",
        "Peer Comparison",
        "comparison",
        Builder::Scatter {
            label: "company",
            x: "intent",
            y: "engagement",
            size: Some("pipeline"),
            group: None,
        },
    ),
    rule(
        "Peers",
        "Account vs Peers",
        "comparison",
        Builder::Radar { label: "company", fields: &["intent", "engagement"], limit: 3 },
    ),
    rule("Journey", "Journey Flow", "journey", Builder::Sankey { path: "path", value: "accounts" }),
];

const OUTREACH: &[Rule] = &[
    rule(
        "Matrix",
        "Priority Matrix",
        "data",
        Builder::Scatter {
            label: "company",
            x: "intent",
            y: "engagement",
            size: Some("pipeline_potential"),
            group: Some("priority"),
        },
    ),
    rule("Potential", "Pipeline Potential", "data", hbar("company", &["pipeline_potential"])),
    rule("Priority", "Priority Mix", "priority_breakdown", pie("priority", "count")),
];

const PIPELINE: &[Rule] = &[
    rule(
        "Movement",
        "Pipeline Changes",
        "movement",
        Builder::Waterfall {
            label: "step",
            value: "amount",
        },
    ),
    rule(
        "Health",
        "Pipeline Health",
        "health",
        Builder::GaugeFields(&[
            ("Coverage", "coverage_ratio", 5.0),
            ("Win Rate %", "win_rate", 100.0),
            ("Cycle (days)", "avg_cycle_days", 180.0),
        ]),
    ),
    rule("Segments", "Open Pipeline by Segment", "data", bar("segment", &["open_pipeline"])),
];

const ATTRIBUTION: &[Rule] = &[
    rule("Revenue", "Revenue Attribution", "data", pie("channel", "revenue")),
    rule(
        "Models",
        "Attribution Models",
        "data",
        bar("channel", &["first_touch", "last_touch", "linear"]),
    ),
    rule(
        "Journeys",
        "Conversion Paths",
        "paths",
        Builder::Sankey {
            path: "path",
            value: "conversions",
        },
    ),
    rule("Paths", "Top Paths", "paths", hbar("path", &["revenue"])),
];

const BOUNCE: &[Rule] = &[
    rule("Overview", "Pages by Bounce", "data", hbar("page", &["bounce"])),
    rule("Devices", "By Device", "by_device", pie("device", "sessions")),
];

const SUNSET: &[Rule] = &[
    rule("Overview", "Pages by Views", "data", hbar("page", &["views"])),
    rule("Reasons", "Retirement Reasons", "data", Builder::Pie { label: "reason", value: None }),
];

const CONTENT: &[Rule] = &[
    rule(
        "Engagement",
        "Content Engagement",
        "data",
        Builder::Bar {
            category: "company",
            values: &["time_spent"],
            group: Some("type"),
            layout: BarLayout::Grouped,
        },
    ),
    rule("By Type", "By Content Type", "by_type", bar("type", &["avg_time", "completion"])),
    rule(
        "Assets",
        "Time Spent by Asset",
        "data",
        Builder::Treemap { parent: Some("type"), label: "asset", value: "time_spent" },
    ),
];

const ANOMALIES: &[Rule] = &[
    rule("Summary", "Anomalies by Type", "data", Builder::Pie { label: "type", value: None }),
    rule(
        "Impact",
        "Change Magnitude",
        "data",
        Builder::Bar {
            category: "area",
            values: &["change"],
            group: Some("severity"),
            layout: BarLayout::Grouped,
        },
    ),
    rule(
        "Priority",
        "Anomaly Priority",
        "summary",
        Builder::GaugeFields(&[
            ("High Priority", "high", 10.0),
            ("Opportunities", "opportunities", 10.0),
            ("Medium", "medium", 10.0),
        ]),
    ),
];

const BRIEF: &[Rule] = &[
    rule("Budget", "Budget Allocation", "channel_mix", pie("channel", "budget")),
    rule(
        "Allocation",
        "Budget Treemap",
        "channel_mix",
        Builder::Treemap { parent: None, label: "channel", value: "budget" },
    ),
    rule("Leads", "Expected Leads", "channel_mix", bar("channel", &["expected_leads"])),
    rule(
        "Targets",
        "Target Accounts",
        "target_accounts",
        Builder::Bar {
            category: "company",
            values: &["intent"],
            group: Some("fit"),
            layout: BarLayout::Horizontal,
        },
    ),
    rule(
        "Results",
        "Projections",
        "expected_results",
        Builder::GaugeFields(&[
            ("Leads", "leads", 200.0),
            ("MQLs", "mqls", 100.0),
            ("Pipeline ($)", "pipeline", 5_000_000.0),
        ]),
    ),
];

/// The chart policy for `kind`.
pub(crate) fn rules(kind: ToolKind) -> &'static [Rule] {
    match kind {
        ToolKind::MarketingSummary => SUMMARY,
        ToolKind::LeadMetrics => LEADS,
        ToolKind::ConversionFunnel => FUNNEL,
        ToolKind::CampaignPerformance => CAMPAIGNS,
        ToolKind::PaidMediaPerformance => PAID_MEDIA,
        ToolKind::EmailEngagement => EMAIL,
        ToolKind::IntentSignals => INTENT,
        ToolKind::Account360View => ACCOUNT,
        ToolKind::AccountsToReachOut => OUTREACH,
        ToolKind::PipelineMetrics => PIPELINE,
        ToolKind::ChannelAttribution => ATTRIBUTION,
        ToolKind::HighBouncePages => BOUNCE,
        ToolKind::PagesToSunset => SUNSET,
        ToolKind::ContentEngagement => CONTENT,
        ToolKind::MarketingAnomalies => ANOMALIES,
        ToolKind::CampaignBrief => BRIEF,
    }
}

/// Object rows of `value`; a lone object counts as one row.
pub(crate) fn rows(value: &Value) -> Option<Vec<&Row>> {
    match value {
        Value::Array(items) if !items.is_empty() => {
            items.iter().map(Value::as_object).collect()
        }
        Value::Object(row) => Some(vec![row]),
        _ => None,
    }
}

fn number(row: &Row, field: &str) -> Option<f64> {
    row.get(field)?.as_f64()
}

fn text(row: &Row, field: &str) -> Option<String> {
    match row.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Labels and values from every row, or `None` if any row lacks either.
fn pairs(rows: &[&Row], label: &str, value: &str) -> Option<Vec<Datum>> {
    rows.iter()
        .map(|row| {
            Some(Datum {
                label: text(row, label)?,
                value: number(row, value)?,
            })
        })
        .collect()
}

fn column(rows: &[&Row], field: &str) -> Option<Vec<f64>> {
    rows.iter().map(|row| number(row, field)).collect()
}

fn labels(rows: &[&Row], field: &str) -> Option<Vec<String>> {
    rows.iter().map(|row| text(row, field)).collect()
}

/// Distinct values in first-seen order.
fn distinct(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Position of each value in `items`.
fn positions(items: &[String]) -> HashMap<&str, usize> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.as_str(), i))
        .collect()
}

impl Builder {
    /// Build the chart, or `None` when the data does not have the
    /// expected shape.
    pub(crate) fn build(&self, source: &Value) -> Option<Chart> {
        let rows = rows(source)?;
        match *self {
            Self::Funnel { stage, value } => Some(Chart::Funnel {
                stages: pairs(&rows, stage, value)?,
            }),
            Self::Bar {
                category,
                values,
                group: None,
                layout,
            } => Some(Chart::Bar {
                categories: labels(&rows, category)?,
                series: values
                    .iter()
                    .map(|field| {
                        Some(Series {
                            name: field.to_string(),
                            values: column(&rows, field)?,
                        })
                    })
                    .collect::<Option<_>>()?,
                layout,
            }),
            Self::Bar {
                category,
                values,
                group: Some(group),
                layout,
            } => {
                let value = values.first()?;
                let keyed: Vec<(String, String, f64)> = rows
                    .iter()
                    .map(|row| Some((text(row, category)?, text(row, group)?, number(row, value)?)))
                    .collect::<Option<_>>()?;
                let categories = distinct(keyed.iter().map(|(c, _, _)| c.clone()));
                let groups = distinct(keyed.iter().map(|(_, g, _)| g.clone()));
                let mut matrix = vec![vec![0.0; categories.len()]; groups.len()];
                let (group_at, category_at) = (positions(&groups), positions(&categories));
                for (cat, grp, v) in &keyed {
                    matrix[*group_at.get(grp.as_str())?][*category_at.get(cat.as_str())?] += v;
                }
                Some(Chart::Bar {
                    categories,
                    series: groups
                        .into_iter()
                        .zip(matrix)
                        .map(|(name, values)| Series { name, values })
                        .collect(),
                    layout,
                })
            }
            Self::Pie { label, value } => {
                let slices = match value {
                    Some(value) => pairs(&rows, label, value)?,
                    None => {
                        let names = labels(&rows, label)?;
                        distinct(names.iter().cloned())
                            .into_iter()
                            .map(|name| Datum {
                                value: names.iter().filter(|n| **n == name).count() as f64,
                                label: name,
                            })
                            .collect()
                    }
                };
                Some(Chart::Pie { slices, hole: 0.4 })
            }
            Self::Line { x, values } => Some(Chart::Line {
                x: labels(&rows, x)?,
                series: values
                    .iter()
                    .map(|field| {
                        Some(Series {
                            name: field.to_string(),
                            values: column(&rows, field)?,
                        })
                    })
                    .collect::<Option<_>>()?,
            }),
            Self::Scatter {
                label,
                x,
                y,
                size,
                group,
            } => Some(Chart::Scatter {
                points: rows
                    .iter()
                    .map(|row| {
                        Some(Point {
                            label: text(row, label)?,
                            x: number(row, x)?,
                            y: number(row, y)?,
                            size: size.and_then(|f| number(row, f)),
                            group: group.and_then(|f| text(row, f)),
                        })
                    })
                    .collect::<Option<_>>()?,
            }),
            Self::Radar {
                label,
                fields,
                limit,
            } => Some(Chart::Radar {
                axes: fields.iter().map(|f| f.to_string()).collect(),
                series: rows
                    .iter()
                    .take(limit)
                    .map(|row| {
                        Some(Series {
                            name: text(row, label)?,
                            values: fields
                                .iter()
                                .map(|f| number(row, f))
                                .collect::<Option<_>>()?,
                        })
                    })
                    .collect::<Option<_>>()?,
            }),
            Self::HeatmapColumns { row, columns } => Some(Chart::Heatmap {
                x: columns.iter().map(|c| c.to_string()).collect(),
                y: labels(&rows, row)?,
                z: rows
                    .iter()
                    .map(|r| columns.iter().map(|c| number(r, c)).collect())
                    .collect(),
            }),
            Self::HeatmapPivot { row, column, value } => {
                let keyed: Vec<(String, String, f64)> = rows
                    .iter()
                    .map(|r| Some((text(r, row)?, text(r, column)?, number(r, value)?)))
                    .collect::<Option<_>>()?;
                let y = distinct(keyed.iter().map(|(r, _, _)| r.clone()));
                let x = distinct(keyed.iter().map(|(_, c, _)| c.clone()));
                let mut z = vec![vec![None; x.len()]; y.len()];
                let (row_at, column_at) = (positions(&y), positions(&x));
                for (r, c, v) in &keyed {
                    z[*row_at.get(r.as_str())?][*column_at.get(c.as_str())?] = Some(*v);
                }
                Some(Chart::Heatmap { x, y, z })
            }
            Self::Sankey { path, value } => {
                let mut links: Vec<Link> = Vec::new();
                for row in &rows {
                    let steps = text(row, path)?;
                    let amount = number(row, value)?;
                    let nodes: Vec<&str> = steps.split('→').map(str::trim).collect();
                    for pair in nodes.windows(2) {
                        match links
                            .iter_mut()
                            .find(|l| l.source == pair[0] && l.target == pair[1])
                        {
                            Some(link) => link.value += amount,
                            None => links.push(Link {
                                source: pair[0].to_string(),
                                target: pair[1].to_string(),
                                value: amount,
                            }),
                        }
                    }
                }
                (!links.is_empty()).then_some(Chart::Sankey { links })
            }
            Self::Treemap {
                parent,
                label,
                value,
            } => Some(Chart::Treemap {
                nodes: rows
                    .iter()
                    .map(|row| {
                        Some(TreeNode {
                            parent: match parent {
                                Some(field) => Some(text(row, field)?),
                                None => None,
                            },
                            label: text(row, label)?,
                            value: number(row, value)?,
                        })
                    })
                    .collect::<Option<_>>()?,
            }),
            Self::GaugeFields(fields) => {
                let row = rows.first()?;
                let gauges: Vec<Gauge> = fields
                    .iter()
                    .filter_map(|&(label, field, max)| {
                        Some(Gauge {
                            label: label.to_string(),
                            value: number(row, field)?,
                            max,
                        })
                    })
                    .collect();
                (!gauges.is_empty()).then_some(Chart::Gauges { gauges })
            }
            Self::GaugeRows { label, value } => Some(Chart::Gauges {
                gauges: pairs(&rows, label, value)?
                    .into_iter()
                    .map(|d| Gauge {
                        max: if d.value > 0.0 { d.value * 1.5 } else { 100.0 },
                        label: d.label,
                        value: d.value,
                    })
                    .collect(),
            }),
            Self::Waterfall { label, value } => Some(Chart::Waterfall {
                steps: pairs(&rows, label, value)?,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_tool_has_rules() {
        for kind in ToolKind::ALL {
            assert!(!rules(kind).is_empty(), "{kind} has no chart rules");
        }
    }

    #[test]
    fn grouped_bar_pivots_rows() {
        let data = json!([
            { "segment": "DCIO", "source": "Website", "leads": 245 },
            { "segment": "DCIO", "source": "Webinar", "leads": 156 },
            { "segment": "Enterprise", "source": "Website", "leads": 312 }
        ]);
        let builder = Builder::Bar {
            category: "segment",
            values: &["leads"],
            group: Some("source"),
            layout: BarLayout::Stacked,
        };
        let Some(Chart::Bar {
            categories, series, ..
        }) = builder.build(&data)
        else {
            panic!("expected a bar chart");
        };
        assert_eq!(categories, ["DCIO", "Enterprise"]);
        assert_eq!(series[0].name, "Website");
        assert_eq!(series[0].values, [245.0, 312.0]);
        assert_eq!(series[1].values, [156.0, 0.0]);
    }

    #[test]
    fn heatmap_pivot_places_each_cell() {
        let data = json!([
            { "day": "Tue", "hour": "10", "opens": 4 },
            { "day": "Mon", "hour": "09", "opens": 7 },
            { "day": "Mon", "hour": "10", "opens": 2 }
        ]);
        let builder = Builder::HeatmapPivot {
            row: "day",
            column: "hour",
            value: "opens",
        };
        let Some(Chart::Heatmap { x, y, z }) = builder.build(&data) else {
            panic!("expected a heatmap");
        };
        assert_eq!(y, ["Tue", "Mon"]);
        assert_eq!(x, ["10", "09"]);
        assert_eq!(z, [[Some(4.0), None], [Some(2.0), Some(7.0)]]);
    }

    #[test]
    fn positions_follow_order() {
        let items = ["b".to_string(), "a".to_string()];
        let at = positions(&items);
        assert_eq!(at.get("a"), Some(&1));
        assert_eq!(at.get("c"), None);
    }

    #[test]
    fn missing_field_skips_chart() {
        let data = json!([{ "stage": "Leads" }]);
        let builder = Builder::Funnel {
            stage: "stage",
            value: "count",
        };
        assert_eq!(builder.build(&data), None);
        assert_eq!(builder.build(&json!([])), None);
        assert_eq!(builder.build(&json!("rows")), None);
    }

    #[test]
    fn pie_without_value_counts_rows() {
        let data = json!([{ "type": "Spike" }, { "type": "Drop" }, { "type": "Spike" }]);
        let chart = Builder::Pie {
            label: "type",
            value: None,
        }
        .build(&data);
        let Some(Chart::Pie { slices, .. }) = chart else {
            panic!("expected a pie");
        };
        assert_eq!(slices[0], Datum { label: "Spike".into(), value: 2.0 });
        assert_eq!(slices[1], Datum { label: "Drop".into(), value: 1.0 });
    }

    #[test]
    fn sankey_merges_shared_links() {
        let data = json!([
            { "path": "Organic → Email → Direct", "n": 45 },
            { "path": "Paid → Email → Direct", "n": 38 }
        ]);
        let Some(Chart::Sankey { links }) = Builder::Sankey {
            path: "path",
            value: "n",
        }
        .build(&data) else {
            panic!("expected a sankey");
        };
        assert_eq!(links.len(), 3);
        let shared = links.iter().find(|l| l.source == "Email").unwrap();
        assert_eq!(shared.target, "Direct");
        assert_eq!(shared.value, 83.0);
    }

    #[test]
    fn gauge_rows_scale_from_value() {
        let data = json!([{ "metric": "MQLs", "value": 400 }, { "metric": "Churn", "value": 0 }]);
        let Some(Chart::Gauges { gauges }) = Builder::GaugeRows {
            label: "metric",
            value: "value",
        }
        .build(&data) else {
            panic!("expected gauges");
        };
        assert_eq!(gauges[0].max, 600.0);
        assert_eq!(gauges[1].max, 100.0);
    }

    #[test]
    fn gauge_fields_read_single_object() {
        let data = json!({ "coverage_ratio": 3.2, "win_rate": 31.5 });
        let Some(Chart::Gauges { gauges }) =
            Builder::GaugeFields(&[
                ("Coverage", "coverage_ratio", 5.0),
                ("Cycle", "avg_cycle_days", 180.0),
            ])
            .build(&data)
        else {
            panic!("expected gauges");
        };
        assert_eq!(gauges.len(), 1);
        assert_eq!(gauges[0].value, 3.2);
    }

    #[test]
    fn heatmap_pivot_leaves_gaps() {
        let data = json!([
            { "segment": "DCIO", "source": "Website", "score": 72.5 },
            { "segment": "Enterprise", "source": "Content", "score": 65.8 }
        ]);
        let Some(Chart::Heatmap { x, y, z }) = Builder::HeatmapPivot {
            row: "segment",
            column: "source",
            value: "score",
        }
        .build(&data) else {
            panic!("expected a heatmap");
        };
        assert_eq!(x, ["Website", "Content"]);
        assert_eq!(y, ["DCIO", "Enterprise"]);
        assert_eq!(z, [[Some(72.5), None], [None, Some(65.8)]]);
    }
}
