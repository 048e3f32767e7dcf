use crate::{ResultId, SessionId, SourceId, SourceOutcome};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the keyword box.
    KeywordChanged(String),
    /// User submitted the current keyword.
    KeywordSubmitted,
    /// The edit form's title field changed.
    FormTitleChanged(String),
    /// User asked to search with the edit form's current title.
    SearchByFormTitle,
    /// A source client finished, successfully or not.
    SourceCompleted {
        session: SessionId,
        source: SourceId,
        outcome: SourceOutcome,
    },
    /// User picked a rendered result.
    ResultSelected(ResultId),
    /// User flipped a source's visibility checkbox.
    SourceVisibilityToggled(SourceId),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
