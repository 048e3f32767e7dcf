use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn, session_tag};
use metafetch_core::{Effect, Msg, SourceOutcome};
use metafetch_engine::{EngineConfig, EngineEvent, EngineHandle};

/// Rich-text description field of the edit form, kept as Markdown.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DescriptionEditor {
    markdown: String,
}

impl DescriptionEditor {
    /// Replaces the whole content with `html`, converted to Markdown.
    pub fn replace_html(&mut self, html: &str) {
        self.markdown = if html.trim().is_empty() {
            String::new()
        } else {
            html2md::parse_html(html).trim().to_string()
        };
    }

    pub fn text(&self) -> &str {
        &self.markdown
    }
}

pub struct EffectRunner {
    engine: EngineHandle,
    editor: DescriptionEditor,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, msg_tx: mpsc::Sender<Msg>) -> Self {
        let engine = EngineHandle::new(config);
        let runner = Self {
            engine,
            editor: DescriptionEditor::default(),
        };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::QuerySource {
                    session,
                    source,
                    keyword,
                } => {
                    engine_info!("{} QuerySource {} keyword={:?}", session_tag(), source, keyword);
                    self.engine.query(session, source, keyword);
                }
                Effect::ReplaceDescription { html } => {
                    self.editor.replace_html(&html);
                }
            }
        }
    }

    pub fn description(&self) -> &str {
        self.editor.text()
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.recv_timeout(Duration::from_millis(50)) {
                if msg_tx.send(map_event(event)).is_err() {
                    break;
                }
            }
        });
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SourceFinished {
            session,
            source,
            result,
        } => {
            let outcome = match result {
                Ok(records) => SourceOutcome::Found(records),
                Err(err) => {
                    engine_warn!("search{} {} failed: {}", session, source, err);
                    SourceOutcome::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            Msg::SourceCompleted {
                session,
                source,
                outcome,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metafetch_core::{SessionId, SourceId};
    use metafetch_engine::{FailureKind, FetchError};

    #[test]
    fn description_is_converted_to_markdown() {
        let mut editor = DescriptionEditor::default();
        editor.replace_html("<p>Desert <b>planet</b></p>");
        assert_eq!(editor.text(), "Desert **planet**");

        editor.replace_html("   ");
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn plain_text_passes_through() {
        let mut editor = DescriptionEditor::default();
        editor.replace_html("沙漠星球");
        assert_eq!(editor.text(), "沙漠星球");
    }

    #[test]
    fn failed_fetch_becomes_failed_outcome() {
        let msg = map_event(EngineEvent::SourceFinished {
            session: SessionId::new(2),
            source: SourceId::Douban,
            result: Err(FetchError {
                kind: FailureKind::Timeout,
                message: String::new(),
            }),
        });
        assert_eq!(
            msg,
            Msg::SourceCompleted {
                session: SessionId::new(2),
                source: SourceId::Douban,
                outcome: SourceOutcome::Failed {
                    reason: "timeout".to_string()
                },
            }
        );
    }
}
