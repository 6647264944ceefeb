//! Wire DTOs mirroring the ReefWatch backend schemas.
//!
//! DESIGN
//! ======
//! Field names follow the backend JSON exactly. Timestamps stay opaque
//! strings: the backend emits both naive and offset ISO-8601 forms and the
//! client only ever displays them (see `util::format`).
//!
//! Bleaching risk is the one type normalized on ingest. The numeric score is
//! canonical and the level/color are re-derived from it, so a decoded
//! [`BleachingRisk`] can never carry a level that disagrees with its score.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// RISK
// =============================================================================

/// Coral bleaching risk level, derived from [`BleachingRisk::score`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Severe,
    #[default]
    Unknown,
}

impl RiskLevel {
    /// Map a score to its level. Anything outside `0..=3` is `Unknown`.
    #[must_use]
    pub fn from_score(score: i8) -> Self {
        match score {
            0 => Self::Low,
            1 => Self::Moderate,
            2 => Self::High,
            3 => Self::Severe,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn score(self) -> i8 {
        match self {
            Self::Low => 0,
            Self::Moderate => 1,
            Self::High => 2,
            Self::Severe => 3,
            Self::Unknown => -1,
        }
    }

    /// Display name as the backend spells it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Severe => "Severe",
            Self::Unknown => "Unknown",
        }
    }

    #[must_use]
    pub fn color(self) -> RiskColor {
        match self {
            Self::Low => RiskColor::Green,
            Self::Moderate => RiskColor::Yellow,
            Self::High => RiskColor::Orange,
            Self::Severe => RiskColor::Red,
            Self::Unknown => RiskColor::Gray,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Visualization color code paired with each risk level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskColor {
    Green,
    Yellow,
    Orange,
    Red,
    Gray,
}

/// Bleaching risk assessment for one site.
///
/// Only the score and description are stored; level and color are computed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BleachingRiskWire", into = "BleachingRiskWire")]
pub struct BleachingRisk {
    score: i8,
    description: String,
}

impl BleachingRisk {
    /// Build a risk from its score. Out-of-range scores collapse to `-1`.
    #[must_use]
    pub fn new(score: i8, description: impl Into<String>) -> Self {
        let level = RiskLevel::from_score(score);
        Self { score: level.score(), description: description.into() }
    }

    /// Canonical ordering key: `-1` unknown, `0` low through `3` severe.
    #[must_use]
    pub fn score(&self) -> i8 {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(self.score)
    }

    #[must_use]
    pub fn color(&self) -> RiskColor {
        self.level().color()
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// High or severe.
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        self.score >= 2
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct BleachingRiskWire {
    #[serde(default)]
    level: RiskLevel,
    #[serde(default = "wire_unknown_color")]
    color: RiskColor,
    score: i8,
    #[serde(default)]
    description: String,
}

fn wire_unknown_color() -> RiskColor {
    RiskColor::Gray
}

impl From<BleachingRiskWire> for BleachingRisk {
    fn from(wire: BleachingRiskWire) -> Self {
        Self::new(wire.score, wire.description)
    }
}

impl From<BleachingRisk> for BleachingRiskWire {
    fn from(risk: BleachingRisk) -> Self {
        Self { level: risk.level(), color: risk.color(), score: risk.score, description: risk.description }
    }
}

// =============================================================================
// SITES & CONDITIONS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteType {
    Bay,
    Beach,
    Cove,
    Reef,
    Lagoon,
    Harbor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteDifficulty {
    Beginner,
    Intermediate,
    Advanced,
    AllLevels,
}

/// Dive/snorkel site reference data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
    #[serde(rename = "type")]
    pub site_type: SiteType,
    pub description: String,
    #[serde(default)]
    pub facilities: Vec<String>,
    pub best_conditions: String,
    pub difficulty: SiteDifficulty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureTrend {
    Rising,
    Falling,
    Stable,
    #[serde(other)]
    Unknown,
}

/// Current ocean readings. Every field is `None` when unmeasured.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OceanConditions {
    #[serde(default)]
    pub sst: Option<f64>,
    #[serde(default)]
    pub sst_anomaly: Option<f64>,
    #[serde(default)]
    pub hotspot: Option<f64>,
    #[serde(default)]
    pub dhw: Option<f64>,
    #[serde(default)]
    pub temperature_trend: Option<TemperatureTrend>,
}

impl OceanConditions {
    #[must_use]
    pub fn trend(&self) -> TemperatureTrend {
        self.temperature_trend.unwrap_or(TemperatureTrend::Unknown)
    }
}

/// A site plus its current conditions and risk. The unit held in the site list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteWithConditions {
    #[serde(flatten)]
    pub site: Site,
    #[serde(default)]
    pub conditions: Option<OceanConditions>,
    pub risk: BleachingRisk,
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl SiteWithConditions {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.site.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteListResponse {
    pub sites: Vec<Site>,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditionsResponse {
    pub sites: Vec<SiteWithConditions>,
    pub data_date: String,
    pub updated_at: String,
}

// =============================================================================
// HISTORY & FORECAST
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDataPoint {
    pub date: String,
    #[serde(default)]
    pub sst: Option<f64>,
    #[serde(default)]
    pub sst_anomaly: Option<f64>,
    #[serde(default)]
    pub dhw: Option<f64>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
}

/// Summary statistics attached to a history window. The backend omits keys
/// it could not compute.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStatistics {
    #[serde(default)]
    pub avg_sst: Option<f64>,
    #[serde(default)]
    pub max_sst: Option<f64>,
    #[serde(default)]
    pub min_sst: Option<f64>,
    #[serde(default)]
    pub avg_dhw: Option<f64>,
    #[serde(default)]
    pub max_dhw: Option<f64>,
    #[serde(default)]
    pub days_at_risk: Option<u32>,
    #[serde(default)]
    pub data_coverage: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteHistoryResponse {
    pub site_id: String,
    pub site_name: String,
    pub data: Vec<HistoricalDataPoint>,
    pub period_start: String,
    pub period_end: String,
    #[serde(default)]
    pub statistics: HistoryStatistics,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastDataPoint {
    pub date: String,
    pub predicted_sst: f64,
    pub predicted_dhw: f64,
    pub predicted_risk: RiskLevel,
    /// Model confidence in `[0, 1]`.
    pub confidence: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteForecastResponse {
    pub site_id: String,
    pub site_name: String,
    pub forecast: Vec<ForecastDataPoint>,
    pub generated_at: String,
    #[serde(default = "default_model_version")]
    pub model_version: String,
}

fn default_model_version() -> String {
    "v1.0".to_owned()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub forecasts: Vec<SiteForecastResponse>,
    pub generated_at: String,
}

// =============================================================================
// ALERTS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Bleaching,
    Weather,
    WaterQuality,
}

/// Alert severity, ordered by ascending risk: `Watch < Warning < Alert`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Watch,
    Warning,
    Alert,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub affected_sites: Vec<String>,
    pub created_at: String,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlertsResponse {
    pub alerts: Vec<Alert>,
    pub count: usize,
}

// =============================================================================
// CHAT
// =============================================================================

/// Body for `POST /chat` and `POST /chat/stream`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub include_context: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
    pub context_used: bool,
    pub model: String,
}

// =============================================================================
// HEALTH & ADMIN
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: String,
    #[serde(default)]
    pub checks: HashMap<String, serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub records_updated: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}
