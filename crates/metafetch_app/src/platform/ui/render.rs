use std::fmt::Write;

use engine_logging::engine_warn;
use metafetch_core::{AppViewModel, EditForm, ResultsStatus, SourceIndicator, SourceIndicatorView};

use super::template::CardTemplate;

/// Text of the results area: source indicators, notices, then the list.
pub fn render_results(view: &AppViewModel, cards: &CardTemplate) -> String {
    let mut out = String::new();

    let sources: Vec<String> = view.sources.iter().map(indicator_label).collect();
    let keyword = if view.keyword.is_empty() {
        String::new()
    } else {
        format!("\"{}\"  ", view.keyword)
    };
    let _ = writeln!(out, "{keyword}{}", sources.join("  "));

    for notice in &view.notices {
        let _ = writeln!(out, "! {notice}");
    }

    match &view.status {
        ResultsStatus::Idle => {}
        ResultsStatus::Loading { message } | ResultsStatus::NoResults { message } => {
            let _ = writeln!(out, "{message}");
        }
        ResultsStatus::Listing => {
            for row in &view.results {
                let text = cards.render(&row.card).unwrap_or_else(|err| {
                    engine_warn!("card template failed for result {}: {}", row.id, err);
                    format!("[{}] {}", row.id, row.card.title)
                });
                let _ = writeln!(out, "{text}");
            }
        }
    }
    out
}

pub fn render_form(form: &EditForm, description: &str) -> String {
    let stars = format!(
        "{}{}",
        "*".repeat(usize::from(form.rating)),
        ".".repeat(usize::from(5u8.saturating_sub(form.rating)))
    );
    let mut out = String::new();
    let fields = [
        ("title", form.title.as_str()),
        ("authors", form.authors.as_str()),
        ("tags", form.tags.as_str()),
        ("rating", stars.as_str()),
        ("cover", form.cover_url.as_str()),
        ("pubdate", form.pubdate.as_str()),
        ("publisher", form.publisher.as_str()),
        ("series", form.series.as_str()),
    ];
    for (label, value) in fields {
        let _ = writeln!(out, "{label:>9}: {value}");
    }
    let _ = writeln!(out, "description:");
    for line in description.lines() {
        let _ = writeln!(out, "    {line}");
    }
    out
}

fn indicator_label(view: &SourceIndicatorView) -> String {
    let state = match view.indicator {
        SourceIndicator::Idle => "-".to_string(),
        SourceIndicator::Searching => "searching".to_string(),
        SourceIndicator::Available { count } => count.to_string(),
        SourceIndicator::Failed => "failed".to_string(),
    };
    let hidden = if view.visible { "" } else { " hidden" };
    format!("[{}: {}{}]", view.label, state, hidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use metafetch_core::raw::parse_google_response;
    use metafetch_core::{update, AppState, Effect, Msg, SourceId, SourceOutcome};
    use pretty_assertions::assert_eq;

    fn listed_state() -> AppState {
        let (state, _) = update(AppState::new(), Msg::KeywordChanged("dune".into()));
        let (state, effects) = update(state, Msg::KeywordSubmitted);
        let Some(Effect::QuerySource { session, .. }) = effects.first().cloned() else {
            panic!("expected query effect");
        };
        let records =
            parse_google_response(r#"{"items":[{"id":"a","volumeInfo":{"title":"Dune"}}]}"#)
                .unwrap();
        let (state, _) = update(
            state,
            Msg::SourceCompleted {
                session,
                source: SourceId::Google,
                outcome: SourceOutcome::Found(records),
            },
        );
        state
    }

    #[test]
    fn idle_view_shows_only_indicators() {
        let text = render_results(&AppState::new().view(), &CardTemplate::default());
        assert_eq!(text, "[Google Books: -]  [Douban Books: -]\n");
    }

    #[test]
    fn listing_uses_card_template() {
        let cards = CardTemplate::new(Some("#{{ id }} {{ title }}".into())).unwrap();
        let text = render_results(&listed_state().view(), &cards);
        assert_eq!(
            text,
            "\"dune\"  [Google Books: 1]  [Douban Books: searching]\n#1 Dune\n"
        );
    }

    #[test]
    fn form_shows_stars_and_description() {
        let form = EditForm {
            title: "Dune".into(),
            rating: 4,
            ..EditForm::default()
        };
        let text = render_form(&form, "Desert **planet**");
        assert!(text.contains("    title: Dune\n"));
        assert!(text.contains("   rating: ****.\n"));
        assert!(text.ends_with("description:\n    Desert **planet**\n"));
    }
}
