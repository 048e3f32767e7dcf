//! Pure mapping from each catalog's native record to the canonical [`Book`].
//!
//! Every function here is total: missing fields fall back to empty values,
//! a zero rating or the generic cover.

use chrono::NaiveDate;

use crate::raw::{DoubanBook, GoogleVolume, Loose, RawRecord};
use crate::{Book, SourceId, GENERIC_COVER};

pub fn normalize(record: &RawRecord) -> Book {
    match record {
        RawRecord::Google(volume) => normalize_google(volume),
        RawRecord::Douban(book) => normalize_douban(book),
    }
}

pub fn normalize_google(volume: &GoogleVolume) -> Book {
    let id = volume.id.as_ref().map(Loose::to_text).unwrap_or_default();
    let info = volume.volume_info.clone().unwrap_or_default();
    let cover = info
        .image_links
        .and_then(|links| links.thumbnail)
        .filter(|thumb| !thumb.trim().is_empty())
        .unwrap_or_else(|| GENERIC_COVER.to_string());

    Book {
        url: SourceId::Google.detail_url(&id),
        id,
        title: info.title.unwrap_or_default(),
        authors: info.authors.unwrap_or_default(),
        description: info.description.unwrap_or_default(),
        publisher: info.publisher.unwrap_or_default(),
        published_date: info
            .published_date
            .as_deref()
            .map(google_published_date)
            .unwrap_or_default(),
        tags: info.categories.unwrap_or_default(),
        rating: info.average_rating.unwrap_or(0.0).clamp(0.0, 5.0),
        series: None,
        cover,
        source: SourceId::Google,
    }
}

pub fn normalize_douban(book: &DoubanBook) -> Book {
    let id = book.id.as_ref().map(Loose::to_text).unwrap_or_default();
    let average = book
        .rating
        .as_ref()
        .and_then(|rating| rating.average.as_ref())
        .and_then(Loose::as_f64);
    let tags = book
        .tags
        .iter()
        .flatten()
        .filter_map(|tag| tag.title.as_deref())
        .map(sanitize_douban_tag)
        .collect();
    let cover = book
        .image
        .clone()
        .filter(|image| !image.trim().is_empty())
        .unwrap_or_else(|| GENERIC_COVER.to_string());

    Book {
        url: SourceId::Douban.detail_url(&id),
        id,
        title: book.title.clone().unwrap_or_default(),
        authors: book.author.clone().unwrap_or_default(),
        description: book.summary.clone().unwrap_or_default(),
        publisher: book.publisher.clone().unwrap_or_default(),
        published_date: book
            .pubdate
            .as_deref()
            .map(douban_pubdate)
            .unwrap_or_default(),
        tags,
        rating: douban_rating(average),
        series: book
            .series
            .as_ref()
            .and_then(|series| series.title.clone())
            .filter(|title| !title.trim().is_empty()),
        cover,
        source: SourceId::Douban,
    }
}

/// Lower-cases a Douban tag and replaces commas, which the edit form uses as
/// its tag separator.
pub fn sanitize_douban_tag(raw: &str) -> String {
    raw.to_lowercase().replace(',', "_")
}

/// Douban rates on 0..=10; anything not positive means "unrated".
pub fn douban_rating(average: Option<f64>) -> f64 {
    match average {
        Some(value) if value > 0.0 => (value / 2.0).min(5.0),
        _ => 0.0,
    }
}

/// Douban publish dates come as `YYYY-M`, `YYYY-MM-DD`, `YYYY年M月` and
/// similar. Only year and month are kept; the day is always the 1st. A month
/// outside 1..=12 rolls over into the neighbouring year, so `1965-13` is
/// January 1966 and `1965-0` is December 1964.
pub fn douban_pubdate(raw: &str) -> String {
    match date_parts(raw) {
        Some((year, month, _)) => {
            let months = i64::from(year) * 12 + i64::from(month.unwrap_or(1)) - 1;
            match i32::try_from(months.div_euclid(12)) {
                Ok(year) => format_date(year, months.rem_euclid(12) as u32 + 1, 1),
                Err(_) => String::new(),
            }
        }
        None => String::new(),
    }
}

/// Google dates are `YYYY`, `YYYY-MM` or `YYYY-MM-DD`; missing parts default to 1.
pub fn google_published_date(raw: &str) -> String {
    match date_parts(raw) {
        Some((year, month, day)) => format_date(year, month.unwrap_or(1), day.unwrap_or(1)),
        None => String::new(),
    }
}

fn date_parts(raw: &str) -> Option<(i32, Option<u32>, Option<u32>)> {
    let mut parts = raw
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty());
    let year_part = parts.next()?;
    if year_part.len() != 4 {
        return None;
    }
    let year = year_part.parse().ok()?;
    let month = parts.next().and_then(|m| m.parse().ok());
    let day = parts.next().and_then(|d| d.parse().ok());
    Some((year, month, day))
}

fn format_date(year: i32, month: u32, day: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
