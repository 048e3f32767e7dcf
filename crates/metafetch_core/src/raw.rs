//! Native result shapes of the two catalogs.
//!
//! Every field is optional so a record with missing or `null` fields still
//! deserializes; defaults are applied later by the normalizer.

use engine_logging::engine_warn;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::SourceId;

/// A JSON scalar that some APIs send as a number and others as a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Loose {
    Number(serde_json::Number),
    Text(String),
}

impl Loose {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Loose::Number(n) => n.as_f64(),
            Loose::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Loose::Number(n) => n.to_string(),
            Loose::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GoogleVolume {
    pub id: Option<Loose>,
    #[serde(rename = "volumeInfo")]
    pub volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub categories: Option<Vec<String>>,
    pub average_rating: Option<f64>,
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DoubanBook {
    pub id: Option<Loose>,
    pub title: Option<String>,
    pub author: Option<Vec<String>>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub pubdate: Option<String>,
    pub tags: Option<Vec<DoubanTag>>,
    pub rating: Option<DoubanRating>,
    pub image: Option<String>,
    pub series: Option<DoubanSeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DoubanTag {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DoubanRating {
    pub average: Option<Loose>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DoubanSeries {
    pub title: Option<String>,
}

/// One not-yet-normalized search hit, tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    Google(GoogleVolume),
    Douban(DoubanBook),
}

impl RawRecord {
    pub fn source(&self) -> SourceId {
        match self {
            RawRecord::Google(_) => SourceId::Google,
            RawRecord::Douban(_) => SourceId::Douban,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GoogleEnvelope {
    items: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DoubanEnvelope {
    books: Option<Vec<Value>>,
}

/// Parses a Google Books volumes response. A missing `items` key is zero results.
pub fn parse_google_response(json: &str) -> Result<Vec<RawRecord>, serde_json::Error> {
    let envelope: GoogleEnvelope = serde_json::from_str(json)?;
    Ok(records_from(SourceId::Google, envelope.items, RawRecord::Google))
}

/// Parses a Douban book search response. A missing `books` key is zero results.
pub fn parse_douban_response(json: &str) -> Result<Vec<RawRecord>, serde_json::Error> {
    let envelope: DoubanEnvelope = serde_json::from_str(json)?;
    Ok(records_from(SourceId::Douban, envelope.books, RawRecord::Douban))
}

pub fn parse_response(source: SourceId, json: &str) -> Result<Vec<RawRecord>, serde_json::Error> {
    match source {
        SourceId::Google => parse_google_response(json),
        SourceId::Douban => parse_douban_response(json),
    }
}

// Records that cannot be read at all are skipped so one bad hit does not
// cost the whole result list.
fn records_from<T: DeserializeOwned>(
    source: SourceId,
    values: Option<Vec<Value>>,
    wrap: fn(T) -> RawRecord,
) -> Vec<RawRecord> {
    values
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<T>(value) {
            Ok(record) => Some(wrap(record)),
            Err(err) => {
                engine_warn!("Skipping unreadable {} record #{}: {}", source, index, err);
                None
            }
        })
        .collect()
}
