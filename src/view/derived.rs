//! Presentation structures computed from a [`ViewState`] snapshot.
//!
//! Nothing here is stored: every page render derives cards, chart series and
//! history rows afresh from whatever the last fetch left in the state.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt::{self, Write};

use super::{Tab, ViewState};
use crate::api::{CorrelationEntry, Correlations, Match};

/// A market outcome that gets its own card on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightedMarket {
    /// Key in the correlations mapping, e.g. "MS - 1"
    pub key: String,
    pub title: String,
}

impl HighlightedMarket {
    pub fn new(key: &str, title: &str) -> Self {
        HighlightedMarket {
            key: key.to_string(),
            title: title.to_string(),
        }
    }
}

/// Home win, draw, both teams score, over 2.5 goals.
pub fn default_highlights() -> Vec<HighlightedMarket> {
    vec![
        HighlightedMarket::new("MS - 1", "MS - 1 (Home Win)"),
        HighlightedMarket::new("MS - X", "MS - X (Draw)"),
        HighlightedMarket::new("KG - Var", "KG - Var (Both Score)"),
        HighlightedMarket::new("AÜ 2.5 - Üst", "AÜ 2.5 - Üst (Over)"),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationCard {
    pub key: String,
    pub title: String,
    pub count: u32,
    pub avg_winning_odd: f64,
    /// `avg_winning_odd` rounded to two decimals
    pub avg_odd_display: String,
    /// Capped linear scale, 0–100
    pub progress_pct: f64,
    pub min_odd: Option<f64>,
    pub max_odd: Option<f64>,
    /// The backend sent no entry for this key; a zero entry was substituted.
    pub missing: bool,
}

impl CorrelationCard {
    fn build(market: &HighlightedMarket, correlations: &Correlations) -> Self {
        let (entry, missing) = match correlations.get(&market.key) {
            Some(e) => (e.clone(), false),
            None => (CorrelationEntry::default(), true),
        };
        CorrelationCard {
            key: market.key.clone(),
            title: market.title.clone(),
            count: entry.count,
            avg_winning_odd: entry.avg_winning_odd,
            avg_odd_display: format!("{:.2}", entry.avg_winning_odd),
            progress_pct: progress_pct(entry.count),
            min_odd: entry.min,
            max_odd: entry.max,
            missing,
        }
    }
}

pub fn progress_pct(count: u32) -> f64 {
    (count as f64 / 100.0 * 100.0).min(100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountPoint {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddPoint {
    pub name: String,
    pub odd: f64,
}

/// Everything the dashboard tab shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub cards: Vec<CorrelationCard>,
    pub count_series: Vec<CountPoint>,
    pub odd_series: Vec<OddPoint>,
}

impl DashboardView {
    /// `None` when correlations were never fetched.
    pub fn build(
        correlations: Option<&Correlations>,
        highlights: &[HighlightedMarket],
    ) -> Option<Self> {
        let correlations = correlations?;
        Some(DashboardView {
            cards: highlights
                .iter()
                .map(|m| CorrelationCard::build(m, correlations))
                .collect(),
            count_series: count_series(correlations),
            odd_series: odd_series(correlations),
        })
    }
}

pub fn count_series(correlations: &Correlations) -> Vec<CountPoint> {
    correlations
        .iter()
        .map(|(name, e)| CountPoint {
            name: name.clone(),
            count: e.count,
        })
        .collect()
}

pub fn odd_series(correlations: &Correlations) -> Vec<OddPoint> {
    correlations
        .iter()
        .map(|(name, e)| OddPoint {
            name: name.clone(),
            odd: e.avg_winning_odd,
        })
        .collect()
}

/// One line of the match history table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub id: i64,
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    pub half_time: String,
    pub full_time: String,
}

impl HistoryRow {
    pub fn build(m: &Match, date_format: &str) -> Self {
        HistoryRow {
            id: m.id,
            date: format_match_date(&m.date, date_format),
            home_team: m.home_team.clone(),
            away_team: m.away_team.clone(),
            league: m.league.clone().unwrap_or_default(),
            half_time: score_line(m.score_home_iy, m.score_away_iy),
            full_time: score_line(m.score_home, m.score_away),
        }
    }
}

pub fn history_rows(matches: &[Match], date_format: &str) -> Vec<HistoryRow> {
    matches
        .iter()
        .map(|m| HistoryRow::build(m, date_format))
        .collect()
}

/// "2-1"; an unknown side renders as "?".
pub fn score_line(home: Option<i32>, away: Option<i32>) -> String {
    let side = |s: Option<i32>| s.map(|v| v.to_string()).unwrap_or_else(|| "?".into());
    format!("{}-{}", side(home), side(away))
}

/// Format a backend timestamp for display. Input that cannot be parsed or
/// rendered with `date_format` is shown as-is.
pub fn format_match_date(raw: &str, date_format: &str) -> String {
    let formatted = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        try_format(dt.format(date_format))
    } else if let Some(dt) = parse_naive(raw) {
        try_format(dt.format(date_format))
    } else {
        None
    };
    formatted.unwrap_or_else(|| raw.to_string())
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// chrono reports specifiers the value cannot satisfy (e.g. `%z` on a naive
/// timestamp) as `fmt::Error`.
fn try_format(value: impl fmt::Display) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", value).ok()?;
    Some(out)
}

/// Reject strftime strings chrono cannot parse, such as `%Q`.
pub fn validate_date_format(date_format: &str) -> Result<(), String> {
    if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
        return Err(format!("invalid date format '{}'", date_format));
    }
    Ok(())
}

/// Full presentation of one state snapshot, as served by `/api/view`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub active_tab: Tab,
    pub loading: bool,
    pub dashboard: Option<DashboardView>,
    pub history: Vec<HistoryRow>,
}

impl ViewModel {
    pub fn build(state: &ViewState, highlights: &[HighlightedMarket], date_format: &str) -> Self {
        ViewModel {
            active_tab: state.active_tab,
            loading: state.loading,
            dashboard: DashboardView::build(state.correlations.as_ref(), highlights),
            history: history_rows(&state.matches, date_format),
        }
    }
}
