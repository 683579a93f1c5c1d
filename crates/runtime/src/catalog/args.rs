//! Typed tool arguments.
//!
//! The model's arguments only loosely follow the declared schema, so every
//! call goes through [`ToolQuery::decode`]: missing optional fields take
//! their documented default, and anything else that does not fit becomes a
//! [`ToolError::InvalidInput`].

use super::ToolKind;
use crate::tools::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

pub(crate) const DEFAULT_TIME_PERIOD: &str = "last_90_days";
pub(crate) const DEFAULT_LEAD_RANGE_DAYS: u32 = 90;
pub(crate) const DEFAULT_EMAIL_RANGE_DAYS: u32 = 30;
pub(crate) const DEFAULT_LOOKBACK_DAYS: u32 = 30;
pub(crate) const DEFAULT_MIN_BOUNCE_RATE: f64 = 60.0;

/// String-valued enumeration with fixed wire names.
macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const NAMES: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum!(
    /// Customer segment.
    Segment {
        Dcio => "DCIO",
        Enterprise => "Enterprise",
        MidMarket => "Mid-Market",
        SmallBusiness => "Small Business",
    }
);

choice_enum!(
    /// Campaign channel.
    Channel {
        Email => "Email",
        Content => "Content",
        PaidSocial => "Paid Social",
        PaidSearch => "Paid Search",
        Abm => "ABM",
    }
);

choice_enum!(
    /// Paid media platform.
    Platform {
        LinkedIn => "LinkedIn",
        Google => "Google",
    }
);

choice_enum!(
    /// 6sense buying stage.
    BuyingStage {
        Awareness => "Awareness",
        Consideration => "Consideration",
        Decision => "Decision",
    }
);

choice_enum!(
    /// Outreach priority.
    Priority {
        High => "High",
        Medium => "Medium",
        Low => "Low",
    }
);

choice_enum!(
    /// Multi-touch attribution model.
    AttributionModel {
        FirstTouch => "first_touch",
        LastTouch => "last_touch",
        Linear => "linear",
    }
);

choice_enum!(
    /// Which anomalies to report.
    SeverityFilter {
        All => "all",
        High => "high",
        Medium => "medium",
    }
);

choice_enum!(
    /// Kind of campaign to brief.
    CampaignType {
        Email => "email",
        Nurture => "nurture",
        Webinar => "webinar",
        ContentSyndication => "content_syndication",
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryArgs {
    pub time_period: String,
    pub segment: Option<Segment>,
}

impl Default for SummaryArgs {
    fn default() -> Self {
        Self {
            time_period: DEFAULT_TIME_PERIOD.to_string(),
            segment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadArgs {
    pub segment: Option<Segment>,
    pub lead_source: Option<String>,
    pub date_range_days: u32,
}

impl Default for LeadArgs {
    fn default() -> Self {
        Self {
            segment: None,
            lead_source: None,
            date_range_days: DEFAULT_LEAD_RANGE_DAYS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentFilter {
    pub segment: Option<Segment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignArgs {
    pub channel: Option<Channel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaidMediaArgs {
    pub platform: Option<Platform>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailArgs {
    pub date_range_days: u32,
}

impl Default for EmailArgs {
    fn default() -> Self {
        Self {
            date_range_days: DEFAULT_EMAIL_RANGE_DAYS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentArgs {
    pub segment: Option<Segment>,
    pub buying_stage: Option<BuyingStage>,
}

/// Arguments naming one account. `account_name` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountArgs {
    #[serde(alias = "company_name")]
    pub account_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutreachArgs {
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributionArgs {
    pub attribution_model: AttributionModel,
}

impl Default for AttributionArgs {
    fn default() -> Self {
        Self {
            attribution_model: AttributionModel::Linear,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceArgs {
    pub min_bounce_rate: f64,
}

impl Default for BounceArgs {
    fn default() -> Self {
        Self {
            min_bounce_rate: DEFAULT_MIN_BOUNCE_RATE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoArgs {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyArgs {
    pub lookback_days: u32,
    pub severity_filter: SeverityFilter,
}

impl Default for AnomalyArgs {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            severity_filter: SeverityFilter::All,
        }
    }
}

/// Campaign brief request. Every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefArgs {
    pub campaign_type: CampaignType,
    pub target_segment: Segment,
    pub campaign_objective: String,
}

/// A validated tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", content = "arguments", rename_all = "snake_case")]
pub enum ToolQuery {
    #[serde(rename = "get_b2b_marketing_summary")]
    MarketingSummary(SummaryArgs),
    #[serde(rename = "get_lead_metrics")]
    LeadMetrics(LeadArgs),
    #[serde(rename = "get_conversion_funnel")]
    ConversionFunnel(SegmentFilter),
    #[serde(rename = "get_campaign_performance")]
    CampaignPerformance(CampaignArgs),
    #[serde(rename = "get_paid_media_performance")]
    PaidMediaPerformance(PaidMediaArgs),
    #[serde(rename = "get_email_engagement")]
    EmailEngagement(EmailArgs),
    #[serde(rename = "get_intent_signals")]
    IntentSignals(IntentArgs),
    #[serde(rename = "get_account_360_view")]
    Account360View(AccountArgs),
    #[serde(rename = "get_accounts_to_reach_out")]
    AccountsToReachOut(OutreachArgs),
    #[serde(rename = "get_pipeline_metrics")]
    PipelineMetrics(SegmentFilter),
    #[serde(rename = "get_channel_attribution")]
    ChannelAttribution(AttributionArgs),
    #[serde(rename = "get_high_bounce_pages")]
    HighBouncePages(BounceArgs),
    #[serde(rename = "get_pages_to_sunset")]
    PagesToSunset(NoArgs),
    #[serde(rename = "get_content_engagement")]
    ContentEngagement(SegmentFilter),
    #[serde(rename = "detect_marketing_anomalies")]
    MarketingAnomalies(AnomalyArgs),
    #[serde(rename = "generate_campaign_brief")]
    CampaignBrief(BriefArgs),
}

impl ToolQuery {
    /// Decode and validate the model's arguments for `tool_name`.
    pub fn decode(tool_name: &str, input: &Value) -> Result<Self, ToolError> {
        if ToolKind::from_name(tool_name).is_none() {
            return Err(ToolError::NotFound(tool_name.to_string()));
        }
        // An explicit null means the same as an absent key.
        let arguments = match input {
            Value::Null => json!({}),
            Value::Object(fields) => Value::Object(
                fields
                    .iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
            other => {
                return Err(ToolError::InvalidInput(format!(
                    "arguments must be an object, got {other}"
                )));
            }
        };
        let query: Self =
            serde_json::from_value(json!({ "tool": tool_name, "arguments": arguments }))
                .map_err(|e| ToolError::InvalidInput(e.to_string()))?;
        query.validate()?;
        Ok(query)
    }

    fn validate(&self) -> Result<(), ToolError> {
        let invalid = |msg: &str| Err(ToolError::InvalidInput(msg.to_string()));
        match self {
            Self::Account360View(args) if args.account_name.trim().is_empty() => {
                invalid("account_name must not be empty")
            }
            Self::CampaignBrief(args) if args.campaign_objective.trim().is_empty() => {
                invalid("campaign_objective must not be empty")
            }
            Self::LeadMetrics(LeadArgs {
                date_range_days: 0, ..
            })
            | Self::EmailEngagement(EmailArgs { date_range_days: 0 }) => {
                invalid("date_range_days must be at least 1")
            }
            Self::MarketingAnomalies(AnomalyArgs {
                lookback_days: 0, ..
            }) => invalid("lookback_days must be at least 1"),
            Self::HighBouncePages(args) if !(0.0..=100.0).contains(&args.min_bounce_rate) => {
                invalid("min_bounce_rate must be between 0 and 100")
            }
            _ => Ok(()),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::MarketingSummary(_) => ToolKind::MarketingSummary,
            Self::LeadMetrics(_) => ToolKind::LeadMetrics,
            Self::ConversionFunnel(_) => ToolKind::ConversionFunnel,
            Self::CampaignPerformance(_) => ToolKind::CampaignPerformance,
            Self::PaidMediaPerformance(_) => ToolKind::PaidMediaPerformance,
            Self::EmailEngagement(_) => ToolKind::EmailEngagement,
            Self::IntentSignals(_) => ToolKind::IntentSignals,
            Self::Account360View(_) => ToolKind::Account360View,
            Self::AccountsToReachOut(_) => ToolKind::AccountsToReachOut,
            Self::PipelineMetrics(_) => ToolKind::PipelineMetrics,
            Self::ChannelAttribution(_) => ToolKind::ChannelAttribution,
            Self::HighBouncePages(_) => ToolKind::HighBouncePages,
            Self::PagesToSunset(_) => ToolKind::PagesToSunset,
            Self::ContentEngagement(_) => ToolKind::ContentEngagement,
            Self::MarketingAnomalies(_) => ToolKind::MarketingAnomalies,
            Self::CampaignBrief(_) => ToolKind::CampaignBrief,
        }
    }

    /// The entity this query is about, as `(field, value)`.
    ///
    /// Results for such queries must name the requested entity in every
    /// `data` row, whatever template backs the rest of the payload.
    pub fn entity(&self) -> Option<(&'static str, &str)> {
        match self {
            Self::Account360View(args) => Some(("account_name", args.account_name.trim())),
            Self::CampaignBrief(args) => Some(("target_segment", args.target_segment.as_str())),
            _ => None,
        }
    }

    /// Normalised arguments with defaults filled in.
    pub fn arguments(&self) -> Value {
        serde_json::to_value(self)
            .ok()
            .and_then(|mut v| v.get_mut("arguments").map(Value::take))
            .unwrap_or_else(|| json!({}))
    }
}
