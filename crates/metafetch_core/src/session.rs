//! Per-search aggregation of the two catalog completions.
//!
//! A [`SearchSession`] is created for every search and owns the completion
//! slot of each source, the results container and the render phase. It is
//! the only place that decides when something becomes visible.

use std::fmt;

use engine_logging::{engine_debug, engine_info};

use crate::normalize::normalize;
use crate::raw::RawRecord;
use crate::render::ResultList;
use crate::SourceId;

/// Token identifying one search. Completions carrying another token are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1).max(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a source client reported when it finished.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    Found(Vec<RawRecord>),
    Failed { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    AwaitingBoth,
    PartiallyRendered,
    FullyRendered,
    NoResults,
}

/// Lifecycle of the results container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    /// Nothing rendered yet; the loading message is showing.
    Empty,
    /// Created by the first render; later renders append.
    Rendering,
    /// Both sources have completed.
    Done,
}

/// Result of feeding one completion into the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent {
    /// The source had already completed in this session.
    Duplicate,
    /// Recorded, but nothing new became visible.
    NothingNew,
    Rendered {
        count: usize,
        created_container: bool,
    },
    NoResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Pending,
    Completed { produced: usize },
    Failed,
}

impl SlotStatus {
    pub fn is_done(self) -> bool {
        !matches!(self, SlotStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct SourceSlot {
    completed: bool,
    failed: bool,
    buffer: Vec<RawRecord>,
    produced: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSession {
    id: SessionId,
    keyword: String,
    google: SourceSlot,
    douban: SourceSlot,
    arrivals: Vec<SourceId>,
    container: ContainerState,
    phase: RenderPhase,
    results: ResultList,
    notices: Vec<String>,
}

impl SearchSession {
    pub fn new(id: SessionId, keyword: impl Into<String>) -> Self {
        Self {
            id,
            keyword: keyword.into(),
            google: SourceSlot::default(),
            douban: SourceSlot::default(),
            arrivals: Vec::with_capacity(SourceId::ALL.len()),
            container: ContainerState::Empty,
            phase: RenderPhase::AwaitingBoth,
            results: ResultList::new(),
            notices: Vec::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    pub fn container(&self) -> ContainerState {
        self.container
    }

    pub fn results(&self) -> &ResultList {
        &self.results
    }

    /// User-visible messages shown above the list, newest first.
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn slot_status(&self, source: SourceId) -> SlotStatus {
        let slot = self.slot(source);
        match (slot.completed, slot.failed) {
            (false, _) => SlotStatus::Pending,
            (true, true) => SlotStatus::Failed,
            (true, false) => SlotStatus::Completed {
                produced: slot.produced,
            },
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self.phase,
            RenderPhase::FullyRendered | RenderPhase::NoResults
        )
    }

    pub fn prepend_notice(&mut self, message: impl Into<String>) {
        self.notices.insert(0, message.into());
    }

    /// Records a successful completion and renders whatever became ready.
    pub fn record_completion(&mut self, source: SourceId, records: Vec<RawRecord>) -> GateEvent {
        if self.slot(source).completed {
            engine_debug!("Ignoring repeated completion of {} in {}", source, self.id);
            return GateEvent::Duplicate;
        }
        let slot = self.slot_mut(source);
        slot.completed = true;
        slot.produced += records.len();
        slot.buffer = records;
        self.arrivals.push(source);
        self.evaluate()
    }

    /// Records a transport failure; the source counts as completed with no results.
    pub fn record_failure(&mut self, source: SourceId) -> GateEvent {
        if self.slot(source).completed {
            engine_debug!("Ignoring repeated failure of {} in {}", source, self.id);
            return GateEvent::Duplicate;
        }
        let slot = self.slot_mut(source);
        slot.completed = true;
        slot.failed = true;
        self.arrivals.push(source);
        self.evaluate()
    }

    fn evaluate(&mut self) -> GateEvent {
        let both_done = self.google.completed && self.douban.completed;
        if both_done && self.google.produced + self.douban.produced == 0 {
            engine_info!("No results for '{}' in {}", self.keyword, self.id);
            self.phase = RenderPhase::NoResults;
            self.notices.clear();
            return GateEvent::NoResults;
        }

        let mut count = 0;
        let mut created_container = false;
        for source in self.arrivals.clone() {
            let pending = std::mem::take(&mut self.slot_mut(source).buffer);
            if pending.is_empty() {
                continue;
            }
            if self.container == ContainerState::Empty {
                self.container = ContainerState::Rendering;
                created_container = true;
            }
            let rendered = self.results.append(pending.iter().map(normalize));
            engine_debug!("Rendered {} {} result(s) in {}", rendered, source, self.id);
            count += rendered;
        }

        if both_done {
            self.phase = RenderPhase::FullyRendered;
            if self.container == ContainerState::Rendering {
                self.container = ContainerState::Done;
            }
        } else if !self.results.is_empty() {
            self.phase = RenderPhase::PartiallyRendered;
        }

        if count > 0 {
            GateEvent::Rendered {
                count,
                created_container,
            }
        } else {
            GateEvent::NothingNew
        }
    }

    fn slot(&self, source: SourceId) -> &SourceSlot {
        match source {
            SourceId::Google => &self.google,
            SourceId::Douban => &self.douban,
        }
    }

    fn slot_mut(&mut self, source: SourceId) -> &mut SourceSlot {
        match source {
            SourceId::Google => &mut self.google,
            SourceId::Douban => &mut self.douban,
        }
    }
}
