//! Response payload types and the mapping into our book records.

use serde::{Deserialize, Serialize};

pub const COVERS_ENDPOINT: &str = "https://covers.openlibrary.org/b/id";

/// How many authors / subject tags a result card shows.
pub const CARD_AUTHOR_LIMIT: usize = 3;
pub const CARD_SUBJECT_LIMIT: usize = 3;

/// Cover image size on the covers CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl CoverSize {
    pub fn suffix(self) -> char {
        match self {
            CoverSize::Small => 'S',
            CoverSize::Medium => 'M',
            CoverSize::Large => 'L',
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "S" => Some(CoverSize::Small),
            "M" => Some(CoverSize::Medium),
            "L" => Some(CoverSize::Large),
            _ => None,
        }
    }
}

pub fn cover_url(cover_id: u64, size: CoverSize) -> String {
    format!("{COVERS_ENDPOINT}/{cover_id}-{}.jpg", size.suffix())
}

/// One catalog entry as returned by the search endpoint. Taken verbatim,
/// nothing validated; `key` is the only field used as list identity and a
/// record is never mutated after deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_i: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Vec<String>>,
}

impl Book {
    /// Cover URL on the CDN, `None` when the record carries no cover id.
    pub fn cover_url(&self, size: CoverSize) -> Option<String> {
        self.cover_i.map(|id| cover_url(id, size))
    }

    /// Up to three authors joined for a card line.
    pub fn authors_display(&self) -> String {
        match self.author_name.as_deref() {
            Some(names) if !names.is_empty() => {
                names[..names.len().min(CARD_AUTHOR_LIMIT)].join(", ")
            }
            _ => "Unknown Author".to_string(),
        }
    }

    /// Up to three subject tags for the card badges.
    pub fn subjects_display(&self) -> &[String] {
        match self.subject.as_deref() {
            Some(subjects) => &subjects[..subjects.len().min(CARD_SUBJECT_LIMIT)],
            None => &[],
        }
    }
}

/// Raw response shape of the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub docs: Vec<Book>,
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
}

/// Mapped search outcome: the docs in API order plus the API's total hit
/// count (which can exceed the page of docs actually returned).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub books: Vec<Book>,
    pub total: u64,
}

/// No dedup, no sorting, no defaulting beyond `Book`'s own optionality.
pub fn map_response(response: SearchResponse) -> SearchResults {
    SearchResults {
        books: response.docs,
        total: response.num_found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map_value(value: serde_json::Value) -> SearchResults {
        map_response(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn maps_docs_and_total_verbatim() {
        let payload = json!({
            "numFound": 312,
            "docs": [
                {"key": "/works/OL1W", "title": "Dune", "author_name": ["Frank Herbert"],
                 "first_publish_year": 1965, "cover_i": 11481354,
                 "subject": ["Science fiction", "Dune (Imaginary place)"]},
                {"key": "/works/OL2W", "title": "Dune Messiah"},
            ],
        });

        let results = map_value(payload.clone());
        assert_eq!(results.total, 312);
        assert_eq!(results.books.len(), 2);
        assert_eq!(results.books[0].key, "/works/OL1W");
        assert_eq!(results.books[1].author_name, None);
        // order is whatever the API returned
        assert_eq!(results.books[1].title, "Dune Messiah");

        // idempotent: same payload, same mapping
        assert_eq!(map_value(payload.clone()), map_value(payload));
    }

    #[test]
    fn missing_docs_maps_to_empty_list() {
        let results = map_value(json!({"numFound": 0}));
        assert!(results.books.is_empty());
        assert_eq!(results.total, 0);
    }

    #[test]
    fn cover_url_resolution() {
        let book: Book =
            serde_json::from_value(json!({"key": "/works/OL1W", "title": "Dune", "cover_i": 42}))
                .unwrap();
        assert_eq!(
            book.cover_url(CoverSize::Medium).as_deref(),
            Some("https://covers.openlibrary.org/b/id/42-M.jpg")
        );

        let bare: Book =
            serde_json::from_value(json!({"key": "/works/OL2W", "title": "Dune Messiah"}))
                .unwrap();
        assert_eq!(bare.cover_url(CoverSize::Medium), None);
        assert_eq!(bare.first_publish_year, None);
    }

    #[test]
    fn card_truncation_limits() {
        let book: Book = serde_json::from_value(json!({
            "key": "/works/OL1W",
            "title": "Dune",
            "author_name": ["A", "B", "C", "D"],
            "subject": ["s1", "s2", "s3", "s4", "s5"],
        }))
        .unwrap();
        assert_eq!(book.authors_display(), "A, B, C");
        assert_eq!(book.subjects_display().len(), 3);

        let bare: Book =
            serde_json::from_value(json!({"key": "/works/OL2W", "title": "x"})).unwrap();
        assert_eq!(bare.authors_display(), "Unknown Author");
        assert!(bare.subjects_display().is_empty());
    }
}
