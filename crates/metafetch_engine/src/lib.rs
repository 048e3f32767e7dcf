//! Metafetch engine: HTTP fetching, body decoding and the catalog search clients.
mod decode;
mod engine;
mod fetch;
mod sources;
mod types;

pub use decode::{decode_body, strip_jsonp, DecodeError, DecodedBody};
pub use engine::{EngineConfig, EngineHandle};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use sources::{
    search, DoubanClient, GoogleBooksClient, SourceClient, DOUBAN_BASE_URL,
    DOUBAN_DEFAULT_COUNT, GOOGLE_BASE_URL,
};
pub use types::{EngineEvent, FailureKind, FetchError, FetchOutput};
