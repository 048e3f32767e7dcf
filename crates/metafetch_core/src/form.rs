use crate::Book;

/// Values of the metadata edit form that a selected result is copied into.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditForm {
    pub title: String,
    pub authors: String,
    pub tags: String,
    /// Whole stars, 0..=5, as the rating widget expects.
    pub rating: u8,
    pub cover_url: String,
    pub pubdate: String,
    pub publisher: String,
    pub series: String,
    pub description: String,
}

impl EditForm {
    /// Overwrites the form with `book`. `series` is only touched when the
    /// book reports one.
    pub fn populate_from(&mut self, book: &Book) {
        self.title = book.title.clone();
        self.authors = book.authors.join(",");
        self.tags = dedupe_tags(&book.tags).join(",");
        self.rating = round_rating(book.rating);
        self.cover_url = book.cover.clone();
        self.pubdate = book.published_date.clone();
        self.publisher = book.publisher.clone();
        if let Some(series) = &book.series {
            self.series = series.clone();
        }
        self.description = book.description.clone();
    }
}

/// Removes repeated tags, keeping the first occurrence of each.
pub fn dedupe_tags(tags: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(tag) {
            unique.push(tag.clone());
        }
    }
    unique
}

/// Rounds half up onto whole stars.
pub fn round_rating(rating: f64) -> u8 {
    rating.clamp(0.0, 5.0).round() as u8
}
