pub mod derived;

pub use derived::{default_highlights, HighlightedMarket, ViewModel};

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::api::{Correlations, FetchError, Match, StatsSource};

/// Which display mode is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Dashboard,
    History,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Dashboard => write!(f, "dashboard"),
            Tab::History => write!(f, "history"),
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashboard" => Ok(Tab::Dashboard),
            "history" => Ok(Tab::History),
            other => Err(format!("unknown tab '{}'", other)),
        }
    }
}

/// UI state owned by the [`ViewController`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub active_tab: Tab,
    pub matches: Vec<Match>,
    /// `None` until the first successful fetch
    pub correlations: Option<Correlations>,
    pub loading: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            active_tab: Tab::Dashboard,
            matches: Vec::new(),
            correlations: None,
            loading: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Matches,
    Correlations,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Matches => write!(f, "matches"),
            Resource::Correlations => write!(f, "correlations"),
        }
    }
}

/// Outcome of one [`ViewController::load_data`] cycle.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub failures: Vec<(Resource, FetchError)>,
}

impl LoadReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Presentation settings applied when deriving views.
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub match_limit: u32,
    pub date_format: String,
    pub highlights: Vec<HighlightedMarket>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        ViewSettings {
            match_limit: 50,
            date_format: "%d.%m.%Y".to_string(),
            highlights: default_highlights(),
        }
    }
}

/// Owns the UI state and keeps it in sync with the stats backend.
///
/// Overlapping [`load_data`](Self::load_data) calls are neither deduplicated
/// nor cancelled: whichever settles last wins the state write.
pub struct ViewController {
    source: Arc<dyn StatsSource>,
    settings: ViewSettings,
    state: RwLock<ViewState>,
}

impl ViewController {
    pub fn new(source: Arc<dyn StatsSource>, settings: ViewSettings) -> Self {
        ViewController {
            source,
            settings,
            state: RwLock::new(ViewState::default()),
        }
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn source(&self) -> &Arc<dyn StatsSource> {
        &self.source
    }

    /// Fetch matches and correlations concurrently and apply both results
    /// in a single state write once both have settled.
    ///
    /// A failed request is logged and leaves its slot at the previous value.
    pub async fn load_data(&self) -> LoadReport {
        self.state.write().await.loading = true;

        let (matches, correlations) = tokio::join!(
            self.source.list_matches(self.settings.match_limit),
            self.source.correlations(),
        );

        let mut report = LoadReport::default();
        let mut state = self.state.write().await;

        match matches {
            Ok(m) => {
                info!("Loaded {} matches from {}", m.len(), self.source.name());
                state.matches = m;
            }
            Err(e) => {
                error!("Error fetching {} from {}: {}", Resource::Matches, self.source.name(), e);
                report.failures.push((Resource::Matches, e));
            }
        }

        match correlations {
            Ok(c) => {
                info!("Loaded {} correlation entries from {}", c.len(), self.source.name());
                for market in &self.settings.highlights {
                    if !c.contains_key(&market.key) {
                        warn!("No correlation entry for '{}', showing zero values", market.key);
                    }
                }
                state.correlations = Some(c);
            }
            Err(e) => {
                error!(
                    "Error fetching {} from {}: {}",
                    Resource::Correlations,
                    self.source.name(),
                    e
                );
                report.failures.push((Resource::Correlations, e));
            }
        }

        state.loading = false;
        report
    }

    pub async fn select_tab(&self, tab: Tab) {
        self.state.write().await.active_tab = tab;
    }

    pub async fn snapshot(&self) -> ViewState {
        self.state.read().await.clone()
    }

    pub async fn view_model(&self) -> ViewModel {
        let state = self.state.read().await;
        ViewModel::build(&state, &self.settings.highlights, &self.settings.date_format)
    }
}
