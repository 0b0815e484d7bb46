//! Search request construction.

use reqwest::Url;
use thiserror::Error;

pub const SEARCH_ENDPOINT: &str = "https://openlibrary.org/search.json";

/// Fixed page size; the API is asked for at most this many docs per search.
pub const RESULT_LIMIT: u32 = 24;

/// Dimension searched: book title or author name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    Title,
    Author,
}

impl SearchField {
    /// Query parameter name on the search endpoint.
    pub fn param_name(self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SearchField::Title => "Title",
            SearchField::Author => "Author",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "title" => Some(SearchField::Title),
            "author" => Some(SearchField::Author),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SearchField::Title => SearchField::Author,
            SearchField::Author => SearchField::Title,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("search term is empty")]
pub struct EmptyTerm;

/// One validated search: a trimmed, non-empty term plus the field it is
/// matched against. Building the URL never issues more than one request's
/// worth of work; pagination and retries live nowhere in this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    term: String,
    field: SearchField,
}

impl SearchRequest {
    /// Rejects empty or whitespace-only terms; callers are expected to have
    /// checked already, this is the backstop.
    pub fn new(term: &str, field: SearchField) -> Result<Self, EmptyTerm> {
        let term = term.trim();
        if term.is_empty() {
            return Err(EmptyTerm);
        }
        Ok(Self {
            term: term.to_string(),
            field,
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn field(&self) -> SearchField {
        self.field
    }

    /// Full search URL with the field-named query parameter URL-encoded.
    pub fn url(&self) -> Url {
        let mut url = Url::parse(SEARCH_ENDPOINT).expect("static endpoint is a valid URL");
        url.query_pairs_mut()
            .append_pair(self.field.param_name(), &self.term)
            .append_pair("limit", &RESULT_LIMIT.to_string());
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_value(url: &Url, name: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn builds_url_with_field_named_parameter() {
        let request = SearchRequest::new("Dune", SearchField::Title).unwrap();
        let url = request.url();
        assert_eq!(url.as_str().split('?').next().unwrap(), SEARCH_ENDPOINT);
        assert_eq!(query_value(&url, "title").as_deref(), Some("Dune"));
        assert_eq!(query_value(&url, "limit").as_deref(), Some("24"));
        assert_eq!(query_value(&url, "author"), None);

        let request = SearchRequest::new("Frank Herbert", SearchField::Author).unwrap();
        let url = request.url();
        assert_eq!(
            query_value(&url, "author").as_deref(),
            Some("Frank Herbert")
        );
    }

    #[test]
    fn term_round_trips_through_url_encoding() {
        let term = "Brave New World & 100% \"quoted\" / 战争与和平";
        let request = SearchRequest::new(term, SearchField::Title).unwrap();
        assert_eq!(query_value(&request.url(), "title").as_deref(), Some(term));
    }

    #[test]
    fn rejects_empty_and_whitespace_terms() {
        assert_eq!(SearchRequest::new("", SearchField::Title), Err(EmptyTerm));
        assert_eq!(
            SearchRequest::new("   \t\n", SearchField::Author),
            Err(EmptyTerm)
        );
    }

    #[test]
    fn trims_the_term() {
        let request = SearchRequest::new("  Dune  ", SearchField::Title).unwrap();
        assert_eq!(request.term(), "Dune");
    }
}
