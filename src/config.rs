use clap::Parser;
use std::time::Duration;

use crate::view::derived::validate_date_format;
use crate::view::{default_highlights, HighlightedMarket, ViewSettings};

/// Birbucuk betting statistics dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "birbucuk-dashboard", version, about)]
pub struct Config {
    /// Base URL of the Birbucuk statistics API
    #[arg(long, env = "BIRBUCUK_API_URL", default_value = "http://localhost:8000/api")]
    pub api_base_url: String,

    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:3000")]
    pub dashboard_addr: String,

    /// Number of most recent matches shown in the history table
    #[arg(long, env = "MATCH_LIMIT", default_value = "50")]
    pub match_limit: u32,

    /// chrono format string used for match dates
    #[arg(long, env = "DATE_FORMAT", default_value = "%d.%m.%Y")]
    pub date_format: String,

    /// Timeout for each backend request in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,

    /// Market given its own dashboard card, as KEY=TITLE (repeatable).
    /// Defaults to home win, draw, both teams score and over 2.5.
    #[arg(long = "highlight", env = "HIGHLIGHTS", value_delimiter = ',', value_parser = parse_highlight)]
    pub highlights: Vec<HighlightedMarket>,
}

/// "MS - 2=Away Win" → key "MS - 2", title "Away Win". A bare key is its own title.
fn parse_highlight(s: &str) -> Result<HighlightedMarket, String> {
    let (key, title) = match s.split_once('=') {
        Some((key, title)) => (key.trim(), title.trim()),
        None => (s.trim(), s.trim()),
    };
    if key.is_empty() {
        return Err(format!("highlight '{}' has an empty market key", s));
    }
    let title = if title.is_empty() { key } else { title };
    Ok(HighlightedMarket::new(key, title))
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = url::Url::parse(&self.api_base_url)
            .map_err(|e| anyhow::anyhow!("api_base_url '{}' is invalid: {}", self.api_base_url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("api_base_url must use http or https, got '{}'", url.scheme());
        }
        if self.match_limit == 0 {
            anyhow::bail!("match_limit must be positive");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be positive");
        }
        validate_date_format(&self.date_format).map_err(anyhow::Error::msg)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            match_limit: self.match_limit,
            date_format: self.date_format.clone(),
            highlights: if self.highlights.is_empty() {
                default_highlights()
            } else {
                self.highlights.clone()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["birbucuk-dashboard"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = parse(&["--api-base-url", "http://localhost:8000/api"]);
        assert!(config.validate().is_ok());
        assert_eq!(config.view_settings().match_limit, config.match_limit);
        assert_eq!(config.view_settings().highlights.len(), 4);
    }

    #[test]
    fn test_rejects_non_http_base() {
        let config = parse(&["--api-base-url", "ftp://example.com/api"]);
        assert!(config.validate().is_err());
        let config = parse(&["--api-base-url", "not a url"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_limit_and_timeout() {
        let config = parse(&["--api-base-url", "http://localhost:8000/api", "--match-limit", "0"]);
        assert!(config.validate().is_err());
        let config = parse(&[
            "--api-base-url",
            "http://localhost:8000/api",
            "--request-timeout-secs",
            "0",
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_invalid_date_format() {
        let config = parse(&["--api-base-url", "http://localhost:8000/api", "--date-format", "%Q"]);
        assert!(config.validate().is_err());
        let config = parse(&["--api-base-url", "http://localhost:8000/api", "--date-format", "%Y-%m-%d %H:%M"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_highlights_replace_defaults() {
        let config = parse(&[
            "--api-base-url",
            "http://localhost:8000/api",
            "--highlight",
            "MS - 2=Away Win",
            "--highlight",
            "KG - Yok",
        ]);
        let highlights = config.view_settings().highlights;
        assert_eq!(
            highlights,
            vec![
                HighlightedMarket::new("MS - 2", "Away Win"),
                HighlightedMarket::new("KG - Yok", "KG - Yok"),
            ]
        );
    }

    #[test]
    fn test_rejects_empty_highlight_key() {
        let argv = ["birbucuk-dashboard", "--highlight", "=Nothing"];
        assert!(Config::try_parse_from(argv).is_err());
    }
}
