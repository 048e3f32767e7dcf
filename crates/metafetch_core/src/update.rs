use engine_logging::{engine_debug, engine_info};

use crate::{AppState, Effect, Msg, SourceId};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::KeywordChanged(keyword) => {
            state.set_keyword(keyword);
            Vec::new()
        }
        Msg::KeywordSubmitted => {
            let keyword = state.keyword().to_string();
            do_search(&mut state, &keyword)
        }
        Msg::FormTitleChanged(title) => {
            state.set_form_title(title);
            Vec::new()
        }
        Msg::SearchByFormTitle => {
            let title = state.form().title.clone();
            if title.trim().is_empty() {
                return (state, Vec::new());
            }
            state.set_keyword(title.clone());
            do_search(&mut state, &title)
        }
        Msg::SourceCompleted {
            session,
            source,
            outcome,
        } => {
            state.apply_completion(session, source, outcome);
            Vec::new()
        }
        Msg::ResultSelected(id) => match state.result_snapshot(id) {
            Some(book) => {
                engine_info!("Selected result {} ({} '{}')", id, book.source, book.title);
                state.select(id, &book);
                vec![Effect::ReplaceDescription {
                    html: book.description.clone(),
                }]
            }
            None => {
                engine_debug!("Ignoring selection of unknown result {}", id);
                Vec::new()
            }
        },
        Msg::SourceVisibilityToggled(source) => {
            let visible = state.toggle_visibility(source);
            engine_debug!("{} results now {}", source, if visible { "shown" } else { "hidden" });
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Starts a new search for `keyword` unless it is blank. Both sources are
/// queried at once; their completions arrive later as `Msg::SourceCompleted`.
fn do_search(state: &mut AppState, keyword: &str) -> Vec<Effect> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Vec::new();
    }
    let session = state.begin_search(keyword);
    SourceId::ALL
        .iter()
        .map(|&source| Effect::QuerySource {
            session,
            source,
            keyword: keyword.to_string(),
        })
        .collect()
}
