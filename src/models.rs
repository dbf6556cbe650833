use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::trend::{self, Trend};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    #[serde(rename = "VENTE")]
    Sale,
    #[serde(rename = "CONVERSION")]
    Conversion,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    #[serde(rename = "type")]
    kind: ActionKind,
    detail: String,
}

impl Action {
    pub fn sale(detail: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Sale,
            detail: detail.into(),
        }
    }

    pub fn conversion(detail: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Conversion,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Format {
    #[serde(rename = "250g")]
    G250,
    #[serde(rename = "1kg")]
    Kg1,
    #[serde(rename = "2kg")]
    Kg2,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::G250, Format::Kg1, Format::Kg2];

    pub fn key(self) -> &'static str {
        match self {
            Format::G250 => "250g",
            Format::Kg1 => "1kg",
            Format::Kg2 => "2kg",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Format::G250 => "250g",
            Format::Kg1 => "1 kg",
            Format::Kg2 => "2 kg",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.key() == value.trim())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatCounts {
    #[serde(rename = "250g", default, deserialize_with = "lenient_count")]
    pub g250: u64,
    #[serde(rename = "1kg", default, deserialize_with = "lenient_count")]
    pub kg1: u64,
    #[serde(rename = "2kg", default, deserialize_with = "lenient_count")]
    pub kg2: u64,
}

impl FormatCounts {
    pub fn get(&self, format: Format) -> u64 {
        match format {
            Format::G250 => self.g250,
            Format::Kg1 => self.kg1,
            Format::Kg2 => self.kg2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "type", default)]
    pub kind: ActionKind,
    #[serde(default, deserialize_with = "lenient_text")]
    pub detail: String,
    #[serde(rename = "heure", default, deserialize_with = "lenient_text")]
    pub time: String,
}

#[derive(Debug, Default, Deserialize)]
struct StatsPayload {
    #[serde(default, deserialize_with = "lenient_count")]
    c250: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    c1kg: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    c2kg: u64,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    peak_hour: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    top_format: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    total_mass: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    total_conv: Option<String>,
}

/// Today's counters and analysis figures as last reported by `/api/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StatsPayload")]
pub struct StatsSnapshot {
    pub counts: FormatCounts,
    pub peak_hour: Option<String>,
    pub top_format: Option<String>,
    pub total_mass: Option<String>,
    pub total_conversions: Option<String>,
}

impl From<StatsPayload> for StatsSnapshot {
    fn from(payload: StatsPayload) -> Self {
        Self {
            counts: FormatCounts {
                g250: payload.c250,
                kg1: payload.c1kg,
                kg2: payload.c2kg,
            },
            peak_hour: payload.peak_hour,
            top_format: payload.top_format,
            total_mass: payload.total_mass,
            total_conversions: payload.total_conv,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PredictionPayload {
    #[serde(default, deserialize_with = "lenient_number")]
    heures_restantes: Option<f64>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    meteo: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    evenement: Option<String>,
    #[serde(default, deserialize_with = "lenient_counts")]
    previsions: FormatCounts,
    #[serde(default, deserialize_with = "lenient_text")]
    debug_info: String,
    #[serde(default, deserialize_with = "lenient_percent")]
    trend_percent: Option<u64>,
}

/// Remaining-demand forecast for the current day, from `/api/prediction`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PredictionPayload")]
pub struct PredictionSnapshot {
    pub hours_remaining: Option<f64>,
    pub weather_label: Option<String>,
    pub event_name: Option<String>,
    pub forecast: FormatCounts,
    pub debug_info: String,
    pub trend_percent: Option<u64>,
}

impl PredictionSnapshot {
    /// The structured percentage wins over whatever `debug_info` mentions.
    pub fn trend(&self) -> Option<Trend> {
        match self.trend_percent {
            Some(percent) => Some(Trend::from_percent(percent)),
            None => trend::classify(&self.debug_info),
        }
    }
}

impl From<PredictionPayload> for PredictionSnapshot {
    fn from(payload: PredictionPayload) -> Self {
        Self {
            hours_remaining: payload.heures_restantes,
            weather_label: payload.meteo,
            event_name: payload.evenement,
            forecast: payload.previsions,
            debug_info: payload.debug_info,
            trend_percent: payload.trend_percent,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct WeeklyForecastDayPayload {
    #[serde(default, deserialize_with = "lenient_text")]
    date: String,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    date_affichee: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    meteo: String,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    event: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    ferme: bool,
    #[serde(default, deserialize_with = "lenient_counts")]
    totals: FormatCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WeeklyForecastDayPayload")]
pub struct WeeklyForecastDay {
    pub date_key: String,
    pub date_display: String,
    pub weather: String,
    pub event_name: Option<String>,
    pub closed: bool,
    pub totals: FormatCounts,
}

impl From<WeeklyForecastDayPayload> for WeeklyForecastDay {
    fn from(payload: WeeklyForecastDayPayload) -> Self {
        let date_display = payload
            .date_affichee
            .filter(|display| !display.is_empty())
            .unwrap_or_else(|| payload.date.clone());
        Self {
            date_key: payload.date,
            date_display,
            weather: payload.meteo,
            event_name: payload.event.filter(|name| !name.is_empty()),
            closed: payload.ferme,
            totals: payload.totals,
        }
    }
}

/// `/api/forecast_week` answers either with the days or with an error object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WeekPayload {
    Days(Vec<WeeklyForecastDay>),
    Failure { error: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusReply {
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub message: Option<String>,
}

impl StatusReply {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenStatus {
    #[serde(rename = "ouvert", default, deserialize_with = "lenient_flag")]
    pub open: bool,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub detail: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsView {
    pub count_250g: String,
    pub count_1kg: String,
    pub count_2kg: String,
    pub peak_hour: String,
    pub top_format: String,
    pub total_mass: String,
    pub total_conversions: String,
}

#[derive(Debug, Serialize)]
pub struct TrendBadge {
    pub class: &'static str,
    pub label: String,
    pub percent: u64,
}

#[derive(Debug, Serialize)]
pub struct PredictionView {
    pub hours_remaining: String,
    pub weather: String,
    pub event_name: Option<String>,
    pub forecast_250g: String,
    pub forecast_1kg: String,
    pub forecast_2kg: String,
    pub debug_info: String,
    pub trend: Option<TrendBadge>,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub open: bool,
    pub last_synced: String,
    pub stats: StatsView,
    pub prediction: PredictionView,
    pub history: Vec<HistoryEntry>,
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| *n > 0.0).map(|n| n as u64))
            .unwrap_or(0),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn lenient_counts<'de, D>(deserializer: D) -> Result<FormatCounts, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_percent<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?
        .filter(|percent| percent.is_finite() && *percent >= 0.0)
        .map(|percent| percent.round() as u64))
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_text(deserializer)?.unwrap_or_default())
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(Value::Bool(true))))
}
