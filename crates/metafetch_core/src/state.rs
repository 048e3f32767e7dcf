use std::sync::Arc;

use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::view_model::{
    AppViewModel, ResultRowView, ResultsStatus, SourceIndicator, SourceIndicatorView,
};
use crate::{
    Book, ContainerState, EditForm, GateEvent, MessageBundle, RenderPhase, ResultId,
    SearchSession, SessionId, SlotStatus, SourceId, SourceOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceVisibility {
    google: bool,
    douban: bool,
}

impl Default for SourceVisibility {
    fn default() -> Self {
        Self {
            google: true,
            douban: true,
        }
    }
}

impl SourceVisibility {
    fn is_visible(self, source: SourceId) -> bool {
        match source {
            SourceId::Google => self.google,
            SourceId::Douban => self.douban,
        }
    }

    fn toggle(&mut self, source: SourceId) -> bool {
        let flag = match source {
            SourceId::Google => &mut self.google,
            SourceId::Douban => &mut self.douban,
        };
        *flag = !*flag;
        *flag
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    keyword: String,
    messages: MessageBundle,
    last_session: SessionId,
    session: Option<SearchSession>,
    form: EditForm,
    visibility: SourceVisibility,
    selected: Option<ResultId>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: MessageBundle) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn form(&self) -> &EditForm {
        &self.form
    }

    pub fn session(&self) -> Option<&SearchSession> {
        self.session.as_ref()
    }

    pub fn view(&self) -> AppViewModel {
        let session = self.session.as_ref();
        let status = match session {
            None => ResultsStatus::Idle,
            Some(s) if s.phase() == RenderPhase::NoResults => ResultsStatus::NoResults {
                message: self.messages.no_result.clone(),
            },
            Some(s) if s.container() == ContainerState::Empty => ResultsStatus::Loading {
                message: self.messages.loading.clone(),
            },
            Some(_) => ResultsStatus::Listing,
        };

        let results = session
            .map(|s| {
                s.results()
                    .items()
                    .iter()
                    .filter(|item| self.visibility.is_visible(item.source()))
                    .map(|item| ResultRowView {
                        id: item.id,
                        source: item.source(),
                        card: item.card.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let sources = SourceId::ALL
            .iter()
            .map(|&source| SourceIndicatorView {
                source,
                label: source.descriptor().description,
                indicator: match session.map(|s| s.slot_status(source)) {
                    None => SourceIndicator::Idle,
                    Some(SlotStatus::Pending) => SourceIndicator::Searching,
                    Some(SlotStatus::Failed) => SourceIndicator::Failed,
                    Some(SlotStatus::Completed { produced }) => {
                        SourceIndicator::Available { count: produced }
                    }
                },
                visible: self.visibility.is_visible(source),
            })
            .collect();

        AppViewModel {
            keyword: self.keyword.clone(),
            session: session.map(SearchSession::id),
            phase: session.map(SearchSession::phase),
            status,
            notices: session.map(|s| s.notices().to_vec()).unwrap_or_default(),
            results,
            sources,
            selected: self.selected,
            form: self.form.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_keyword(&mut self, keyword: String) {
        if self.keyword != keyword {
            self.keyword = keyword;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_form_title(&mut self, title: String) {
        if self.form.title != title {
            self.form.title = title;
            self.mark_dirty();
        }
    }

    /// Drops the previous session entirely and starts a fresh one.
    pub(crate) fn begin_search(&mut self, keyword: &str) -> SessionId {
        let id = self.last_session.next();
        self.last_session = id;
        self.session = Some(SearchSession::new(id, keyword));
        self.selected = None;
        self.mark_dirty();
        engine_info!("Starting search {} for '{}'", id, keyword);
        id
    }

    pub(crate) fn apply_completion(
        &mut self,
        session: SessionId,
        source: SourceId,
        outcome: SourceOutcome,
    ) {
        let search_error = self.messages.search_error.clone();
        let Some(current) = self.session.as_mut().filter(|s| s.id() == session) else {
            engine_debug!("Discarding {} completion from stale search {}", source, session);
            return;
        };

        let event = match outcome {
            SourceOutcome::Found(records) => {
                engine_info!("{} returned {} record(s) for {}", source, records.len(), session);
                current.record_completion(source, records)
            }
            SourceOutcome::Failed { reason } => {
                engine_warn!("{} search failed for {}: {}", source, session, reason);
                if source.reports_transport_errors() && !current.slot_status(source).is_done() {
                    current.prepend_notice(search_error);
                }
                current.record_failure(source)
            }
        };

        if event != GateEvent::Duplicate {
            self.mark_dirty();
        }
    }

    pub(crate) fn result_snapshot(&self, id: ResultId) -> Option<Arc<Book>> {
        self.session
            .as_ref()
            .and_then(|s| s.results().get(id))
            .map(|item| item.book())
    }

    pub(crate) fn select(&mut self, id: ResultId, book: &Book) {
        self.form.populate_from(book);
        self.selected = Some(id);
        self.mark_dirty();
    }

    pub(crate) fn toggle_visibility(&mut self, source: SourceId) -> bool {
        let visible = self.visibility.toggle(source);
        self.mark_dirty();
        visible
    }
}
