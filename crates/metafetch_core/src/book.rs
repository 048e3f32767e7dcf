use std::fmt;

use serde::Serialize;

/// Cover shown when a source supplies no image.
pub const GENERIC_COVER: &str = "/static/generic_cover.jpg";

/// The two external catalogs a search fans out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Google,
    Douban,
}

impl SourceId {
    pub const ALL: [SourceId; 2] = [SourceId::Google, SourceId::Douban];

    pub fn descriptor(self) -> &'static SourceDescriptor {
        match self {
            SourceId::Google => &GOOGLE,
            SourceId::Douban => &DOUBAN,
        }
    }

    /// Deep link to the source's page for one record.
    pub fn detail_url(self, native_id: &str) -> String {
        match self {
            SourceId::Google => format!("https://books.google.com/books?id={native_id}"),
            SourceId::Douban => format!("https://book.douban.com/subject/{native_id}"),
        }
    }

    /// Whether a transport failure is shown to the user. Google failures
    /// degrade silently to zero results.
    pub fn reports_transport_errors(self) -> bool {
        matches!(self, SourceId::Douban)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "google" | "g" => Some(SourceId::Google),
            "douban" | "d" => Some(SourceId::Douban),
            _ => None,
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceDescriptor {
    pub id: &'static str,
    pub description: &'static str,
    pub url: &'static str,
}

static GOOGLE: SourceDescriptor = SourceDescriptor {
    id: "google",
    description: "Google Books",
    url: "https://books.google.com/",
};

static DOUBAN: SourceDescriptor = SourceDescriptor {
    id: "douban",
    description: "Douban Books",
    url: "https://book.douban.com/",
};

/// Canonical, source-agnostic book record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    /// Raw description; may contain markup.
    pub description: String,
    pub publisher: String,
    /// `YYYY-MM-DD`, or empty when unknown.
    pub published_date: String,
    pub tags: Vec<String>,
    /// Always on the 0..=5 scale.
    pub rating: f64,
    pub series: Option<String>,
    pub cover: String,
    pub url: String,
    pub source: SourceId,
}

impl Book {
    pub fn source_descriptor(&self) -> &'static SourceDescriptor {
        self.source.descriptor()
    }
}
