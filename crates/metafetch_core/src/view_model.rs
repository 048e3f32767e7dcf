use crate::{BookCard, EditForm, RenderPhase, ResultId, SessionId, SourceId};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub keyword: String,
    pub session: Option<SessionId>,
    pub phase: Option<RenderPhase>,
    pub status: ResultsStatus,
    /// Error messages shown above the list, newest first.
    pub notices: Vec<String>,
    pub results: Vec<ResultRowView>,
    pub sources: Vec<SourceIndicatorView>,
    pub selected: Option<ResultId>,
    pub form: EditForm,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsStatus {
    #[default]
    Idle,
    Loading {
        message: String,
    },
    Listing,
    NoResults {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRowView {
    pub id: ResultId,
    pub source: SourceId,
    pub card: BookCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceIndicator {
    Idle,
    Searching,
    Available { count: usize },
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceIndicatorView {
    pub source: SourceId,
    pub label: &'static str,
    pub indicator: SourceIndicator,
    pub visible: bool,
}
