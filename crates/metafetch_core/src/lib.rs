//! Metafetch core: book normalization, the dual-source render gate and the
//! pure state machine driving the search UI.
mod book;
mod effect;
mod form;
mod messages;
mod msg;
pub mod normalize;
pub mod raw;
mod render;
mod session;
mod state;
mod update;
mod view_model;

pub use book::{Book, SourceDescriptor, SourceId, GENERIC_COVER};
pub use effect::Effect;
pub use form::{dedupe_tags, round_rating, EditForm};
pub use messages::MessageBundle;
pub use msg::Msg;
pub use render::{BookCard, ResultId, ResultItem, ResultList};
pub use session::{
    ContainerState, GateEvent, RenderPhase, SearchSession, SessionId, SlotStatus, SourceOutcome,
};
pub use state::AppState;
pub use update::update;
pub use view_model::{
    AppViewModel, ResultRowView, ResultsStatus, SourceIndicator, SourceIndicatorView,
};
