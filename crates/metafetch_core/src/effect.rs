use crate::{SessionId, SourceId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run one source client for `keyword`; its completion must come back
    /// tagged with `session`.
    QuerySource {
        session: SessionId,
        source: SourceId,
        keyword: String,
    },
    /// Replace the rich-text description editor's content.
    ReplaceDescription { html: String },
}
