use std::sync::Once;

use metafetch_core::raw::{parse_douban_response, parse_google_response, RawRecord};
use metafetch_core::{
    ContainerState, GateEvent, RenderPhase, SearchSession, SessionId, SlotStatus, SourceId,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn google_hits(ids: &[&str]) -> Vec<RawRecord> {
    let items: Vec<String> = ids
        .iter()
        .map(|id| format!(r#"{{"id":"{id}","volumeInfo":{{"title":"G {id}"}}}}"#))
        .collect();
    parse_google_response(&format!(r#"{{"items":[{}]}}"#, items.join(","))).unwrap()
}

fn douban_hits(ids: &[&str]) -> Vec<RawRecord> {
    let books: Vec<String> = ids
        .iter()
        .map(|id| format!(r#"{{"id":"{id}","title":"D {id}"}}"#))
        .collect();
    parse_douban_response(&format!(r#"{{"books":[{}]}}"#, books.join(","))).unwrap()
}

fn titles(session: &SearchSession) -> Vec<String> {
    session
        .results()
        .items()
        .iter()
        .map(|item| item.card.title.clone())
        .collect()
}

#[test]
fn first_arrival_renders_first_then_second_appends() {
    init_logging();
    let mut session = SearchSession::new(SessionId::new(1), "dune");
    assert_eq!(session.phase(), RenderPhase::AwaitingBoth);
    assert_eq!(session.container(), ContainerState::Empty);

    let event = session.record_completion(SourceId::Douban, douban_hits(&["1", "2"]));
    assert_eq!(
        event,
        GateEvent::Rendered {
            count: 2,
            created_container: true
        }
    );
    assert_eq!(session.phase(), RenderPhase::PartiallyRendered);
    assert_eq!(session.container(), ContainerState::Rendering);

    let event = session.record_completion(SourceId::Google, google_hits(&["a", "b", "c"]));
    assert_eq!(
        event,
        GateEvent::Rendered {
            count: 3,
            created_container: false
        }
    );
    assert_eq!(session.phase(), RenderPhase::FullyRendered);
    assert_eq!(session.container(), ContainerState::Done);
    assert_eq!(titles(&session), vec!["D 1", "D 2", "G a", "G b", "G c"]);
}

#[test]
fn order_follows_completion_not_source_priority() {
    init_logging();
    let mut session = SearchSession::new(SessionId::new(1), "dune");
    session.record_completion(SourceId::Google, google_hits(&["a", "b", "c"]));
    session.record_completion(SourceId::Douban, douban_hits(&["1", "2"]));

    assert_eq!(session.results().len(), 5);
    assert_eq!(titles(&session), vec!["G a", "G b", "G c", "D 1", "D 2"]);
    let ids: Vec<usize> = session.results().items().iter().map(|i| i.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn both_empty_is_no_results_without_container() {
    init_logging();
    let mut session = SearchSession::new(SessionId::new(1), "zzz");

    assert_eq!(
        session.record_completion(SourceId::Google, Vec::new()),
        GateEvent::NothingNew
    );
    assert_eq!(session.phase(), RenderPhase::AwaitingBoth);

    assert_eq!(
        session.record_completion(SourceId::Douban, Vec::new()),
        GateEvent::NoResults
    );
    assert_eq!(session.phase(), RenderPhase::NoResults);
    assert_eq!(session.container(), ContainerState::Empty);
    assert!(session.results().is_empty());

    // A repeated signal must not show the message again.
    assert_eq!(
        session.record_completion(SourceId::Douban, Vec::new()),
        GateEvent::Duplicate
    );
}

#[test]
fn repeated_completion_never_renders_twice() {
    init_logging();
    let mut session = SearchSession::new(SessionId::new(1), "dune");
    session.record_completion(SourceId::Google, google_hits(&["a"]));

    let event = session.record_completion(SourceId::Google, google_hits(&["a", "b"]));
    assert_eq!(event, GateEvent::Duplicate);
    assert_eq!(session.results().len(), 1);
    assert_eq!(session.slot_status(SourceId::Google), SlotStatus::Completed { produced: 1 });
}

#[test]
fn empty_source_after_rendered_one_settles_the_list() {
    init_logging();
    let mut session = SearchSession::new(SessionId::new(1), "dune");
    session.record_completion(SourceId::Google, google_hits(&["a"]));

    assert_eq!(
        session.record_completion(SourceId::Douban, Vec::new()),
        GateEvent::NothingNew
    );
    assert_eq!(session.phase(), RenderPhase::FullyRendered);
    assert_eq!(session.container(), ContainerState::Done);
    assert!(session.is_settled());
}

#[test]
fn failure_counts_as_completion() {
    init_logging();
    let mut session = SearchSession::new(SessionId::new(1), "dune");
    session.prepend_notice("Search error!");
    assert_eq!(session.record_failure(SourceId::Douban), GateEvent::NothingNew);
    assert_eq!(session.slot_status(SourceId::Douban), SlotStatus::Failed);
    assert_eq!(session.notices(), ["Search error!".to_string()]);

    session.record_completion(SourceId::Google, google_hits(&["a"]));
    assert_eq!(session.phase(), RenderPhase::FullyRendered);
    assert_eq!(session.notices().len(), 1);
}

#[test]
fn no_results_replaces_error_notice() {
    init_logging();
    let mut session = SearchSession::new(SessionId::new(1), "dune");
    session.prepend_notice("Search error!");
    session.record_failure(SourceId::Douban);
    assert_eq!(session.record_failure(SourceId::Google), GateEvent::NoResults);
    assert!(session.notices().is_empty());
}

#[test]
fn rendered_snapshot_is_independent_of_session() {
    init_logging();
    let mut session = SearchSession::new(SessionId::new(1), "dune");
    session.record_completion(SourceId::Google, google_hits(&["a"]));
    let snapshot = session.results().items()[0].book();

    let later = SearchSession::new(SessionId::new(2), "other");
    drop(session);
    assert_eq!(snapshot.id, "a");
    assert!(later.results().is_empty());
}
