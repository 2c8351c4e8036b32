//! ISBN lookup by title via pluggable resolvers (Google Books by default).

pub mod google_books;

use crate::error::LookupError;

/// A search for a book whose package document carries a title but no ISBN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleQuery {
    pub title: String,
    pub author: Option<String>,
    pub year: Option<String>,
}

/// One step of the title → ISBN fallback chain.
pub trait IsbnResolver: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` means the resolver answered but found nothing.
    fn attempt(&self, query: &TitleQuery) -> Result<Option<String>, LookupError>;
}

/// Search terms: the title, then the author, then the year in parentheses.
/// Escaping is left to the HTTP layer.
pub fn build_search_terms(query: &TitleQuery) -> String {
    let mut terms = query.title.clone();
    if let Some(author) = &query.author {
        terms.push(' ');
        terms.push_str(author);
    }
    if let Some(year) = &query.year {
        terms.push_str(&format!(" ({year})"));
    }
    terms
}
