use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::{Book, SourceId};

/// Position of a result in the session's list, 1-based as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResultId(pub usize);

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Plain data handed to the card template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookCard {
    pub id: ResultId,
    pub title: String,
    pub authors: String,
    pub publisher: String,
    pub published_date: String,
    pub rating: f64,
    pub series: Option<String>,
    pub tags: Vec<String>,
    pub cover: String,
    pub url: String,
    pub description: String,
    pub source_id: &'static str,
    pub source_name: &'static str,
    pub source_url: &'static str,
}

impl BookCard {
    pub fn from_book(id: ResultId, book: &Book) -> Self {
        let source = book.source_descriptor();
        Self {
            id,
            title: book.title.clone(),
            authors: book.authors.join(", "),
            publisher: book.publisher.clone(),
            published_date: book.published_date.clone(),
            rating: book.rating,
            series: book.series.clone(),
            tags: book.tags.clone(),
            cover: book.cover.clone(),
            url: book.url.clone(),
            description: book.description.clone(),
            source_id: source.id,
            source_name: source.description,
            source_url: source.url,
        }
    }
}

/// One rendered list entry. The book is a frozen snapshot: selecting the
/// entry later reproduces exactly what was rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultItem {
    pub id: ResultId,
    pub card: BookCard,
    book: Arc<Book>,
}

impl ResultItem {
    pub fn source(&self) -> SourceId {
        self.book.source
    }

    pub fn book(&self) -> Arc<Book> {
        Arc::clone(&self.book)
    }
}

/// The append-only results container of one search session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultList {
    items: Vec<ResultItem>,
}

impl ResultList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends books in the given order and returns how many were added.
    pub fn append(&mut self, books: impl IntoIterator<Item = Book>) -> usize {
        let before = self.items.len();
        for book in books {
            let id = ResultId(self.items.len() + 1);
            let card = BookCard::from_book(id, &book);
            self.items.push(ResultItem {
                id,
                card,
                book: Arc::new(book),
            });
        }
        self.items.len() - before
    }

    pub fn get(&self, id: ResultId) -> Option<&ResultItem> {
        id.0.checked_sub(1).and_then(|index| self.items.get(index))
    }

    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
