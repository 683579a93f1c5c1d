//! Renderer-agnostic chart descriptors.

use serde::Serialize;

/// A chart ready to hand to any renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub title: String,
    #[serde(flatten)]
    pub chart: Chart,
}

/// Chart archetypes with their data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Chart {
    /// Ordered stages, widest first.
    Funnel { stages: Vec<Datum> },
    Bar {
        categories: Vec<String>,
        series: Vec<Series>,
        layout: BarLayout,
    },
    /// `hole` is the inner radius ratio; non-zero means a donut.
    Pie { slices: Vec<Datum>, hole: f64 },
    Line { x: Vec<String>, series: Vec<Series> },
    /// Scatter, or bubble when points carry a size.
    Scatter { points: Vec<Point> },
    Radar { axes: Vec<String>, series: Vec<Series> },
    /// `z[row][col]`; `None` where the source had no value.
    Heatmap {
        x: Vec<String>,
        y: Vec<String>,
        z: Vec<Vec<Option<f64>>>,
    },
    Sankey { links: Vec<Link> },
    Treemap { nodes: Vec<TreeNode> },
    Gauges { gauges: Vec<Gauge> },
    /// Signed deltas applied in order.
    Waterfall { steps: Vec<Datum> },
}

impl Chart {
    /// Archetype name, as serialized.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Funnel { .. } => "funnel",
            Self::Bar { .. } => "bar",
            Self::Pie { .. } => "pie",
            Self::Line { .. } => "line",
            Self::Scatter { .. } => "scatter",
            Self::Radar { .. } => "radar",
            Self::Heatmap { .. } => "heatmap",
            Self::Sankey { .. } => "sankey",
            Self::Treemap { .. } => "treemap",
            Self::Gauges { .. } => "gauges",
            Self::Waterfall { .. } => "waterfall",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarLayout {
    Grouped,
    Stacked,
    Horizontal,
}

/// A labelled value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Datum {
    pub label: String,
    pub value: f64,
}

/// A named sequence of values aligned with the chart's categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub label: String,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    /// `None` for top-level nodes.
    pub parent: Option<String>,
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub label: String,
    pub value: f64,
    pub max: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn descriptor_serializes_flat() {
        let descriptor = ChartDescriptor {
            title: "Budget".into(),
            chart: Chart::Pie {
                slices: vec![Datum {
                    label: "LinkedIn".into(),
                    value: 10.0,
                }],
                hole: 0.4,
            },
        };
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            json!({
                "title": "Budget",
                "type": "pie",
                "slices": [{ "label": "LinkedIn", "value": 10.0 }],
                "hole": 0.4
            })
        );
        assert_eq!(descriptor.chart.kind(), "pie");
    }
}
