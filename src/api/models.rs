use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A historical football match as returned by `GET /matches`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: i64,
    /// ISO-8601 timestamp, with or without offset ("2024-01-05T19:00:00")
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub league: Option<String>,
    /// Half-time ("ilk yarı") score
    #[serde(default)]
    pub score_home_iy: Option<i32>,
    #[serde(default)]
    pub score_away_iy: Option<i32>,
    /// Full-time score
    #[serde(default)]
    pub score_home: Option<i32>,
    #[serde(default)]
    pub score_away: Option<i32>,
    #[serde(default)]
    pub odds: Vec<Odd>,
}

/// A single bookmaker odd attached to a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Odd {
    pub id: i64,
    /// e.g. "MS", "KG", "AÜ 2.5"
    pub bet_type: String,
    /// e.g. "1", "X", "Var", "Üst"
    pub option: String,
    pub odd_value: f64,
    #[serde(default)]
    pub is_winning: bool,
}

impl Odd {
    /// Label used as the key in the correlations mapping.
    pub fn market_label(&self) -> String {
        format!("{} - {}", self.bet_type, self.option)
    }
}

/// Aggregate win statistics for one market outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub count: u32,
    pub avg_winning_odd: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Market label → statistics, in the order the backend emitted them.
pub type Correlations = IndexMap<String, CorrelationEntry>;
