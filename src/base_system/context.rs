//! Global configuration (`Config`) with defaults and the metadata used to
//! generate a commented `config.yml`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::config::{ConfigSpec, FieldMeta};
use crate::openlibrary::model::CoverSize;
use crate::openlibrary::request::SearchField;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // UI
    #[serde(default = "default_false")]
    pub old_cli: bool,
    #[serde(default = "default_search_field")]
    pub default_search_field: String,
    #[serde(default = "default_true")]
    pub show_covers: bool,
    #[serde(default = "default_cover_size")]
    pub cover_size: String,

    // Network
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            old_cli: default_false(),
            default_search_field: default_search_field(),
            show_covers: default_true(),
            cover_size: default_cover_size(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl ConfigSpec for Config {
    const FILE_NAME: &'static str = "config.yml";

    fn fields() -> &'static [FieldMeta] {
        static FIELDS: [FieldMeta; 5] = [
            FieldMeta {
                name: "old_cli",
                description: "Use the plain line-based CLI instead of the TUI (screen-reader friendly)",
            },
            FieldMeta {
                name: "default_search_field",
                description: "Field searched by default, one of: [title, author]",
            },
            FieldMeta {
                name: "show_covers",
                description: "Fetch cover images for the TUI cover preview",
            },
            FieldMeta {
                name: "cover_size",
                description: "Cover size requested from the covers CDN, one of: [S, M, L]",
            },
            FieldMeta {
                name: "request_timeout",
                description: "HTTP request timeout in seconds",
            },
        ];
        &FIELDS
    }
}

impl Config {
    /// Parsed view of `default_search_field`; unknown values fall back to title.
    pub fn default_field(&self) -> SearchField {
        SearchField::parse(&self.default_search_field).unwrap_or_default()
    }

    /// Parsed view of `cover_size`; unknown values fall back to medium.
    pub fn cover_size(&self) -> CoverSize {
        CoverSize::parse(&self.cover_size).unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout.max(1))
    }
}

fn default_false() -> bool {
    false
}

fn default_true() -> bool {
    true
}

fn default_search_field() -> String {
    "title".to_string()
}

fn default_cover_size() -> String {
    "M".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_field_selector_falls_back_to_title() {
        let mut config = Config::default();
        config.default_search_field = "isbn".to_string();
        assert_eq!(config.default_field(), SearchField::Title);

        config.default_search_field = "author".to_string();
        assert_eq!(config.default_field(), SearchField::Author);
    }

    #[test]
    fn timeout_is_never_zero() {
        let mut config = Config::default();
        config.request_timeout = 0;
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }
}
