use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_error, engine_info, engine_warn};
use metafetch_core::raw::RawRecord;
use metafetch_core::{SessionId, SourceId};

use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::sources::{search, DoubanClient, GoogleBooksClient, SourceClient};
use crate::{EngineEvent, FailureKind, FetchError};

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub google: GoogleBooksClient,
    pub douban: DoubanClient,
}

enum EngineCommand {
    Query {
        session: SessionId,
        source: SourceId,
        keyword: String,
    },
}

struct Clients {
    google: GoogleBooksClient,
    douban: DoubanClient,
}

impl Clients {
    fn get(&self, source: SourceId) -> &dyn SourceClient {
        match source {
            SourceId::Google => &self.google,
            SourceId::Douban => &self.douban,
        }
    }
}

/// Handle to the background IO thread. Cloning shares both channels.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let fetcher = Arc::new(ReqwestFetcher::new(config.fetch.clone()));
        Self::with_fetcher(config, fetcher)
    }

    pub fn with_fetcher(config: EngineConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let clients = Arc::new(Clients {
            google: config.google,
            douban: config.douban,
        });

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("failed to start engine runtime: {err}");
                    fail_all(cmd_rx, event_tx, &err.to_string());
                    return;
                }
            };
            while let Ok(EngineCommand::Query {
                session,
                source,
                keyword,
            }) = cmd_rx.recv()
            {
                let fetcher = fetcher.clone();
                let clients = clients.clone();
                let event_tx = event_tx.clone();
                let task = runtime.spawn(async move {
                    search(clients.get(source), fetcher.as_ref(), &keyword).await
                });
                runtime.spawn(async move {
                    let result = task.await.unwrap_or_else(|err| {
                        engine_error!("search{session} {source}: task failed: {err}");
                        Err(FetchError::new(
                            FailureKind::Network,
                            format!("search task failed: {err}"),
                        ))
                    });
                    finish(&event_tx, session, source, result);
                });
            }
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    pub fn query(&self, session: SessionId, source: SourceId, keyword: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Query {
            session,
            source,
            keyword: keyword.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

fn finish(
    event_tx: &mpsc::Sender<EngineEvent>,
    session: SessionId,
    source: SourceId,
    result: Result<Vec<RawRecord>, FetchError>,
) {
    match &result {
        Ok(records) => engine_info!("search{session} {source}: {} records", records.len()),
        Err(err) => engine_warn!("search{session} {source}: {err}"),
    }
    let _ = event_tx.send(EngineEvent::SourceFinished {
        session,
        source,
        result,
    });
}

/// Without a runtime every query still finishes, as a failure.
fn fail_all(
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    reason: &str,
) {
    while let Ok(EngineCommand::Query {
        session, source, ..
    }) = cmd_rx.recv()
    {
        let _ = event_tx.send(EngineEvent::SourceFinished {
            session,
            source,
            result: Err(FetchError::new(FailureKind::Network, reason)),
        });
    }
}
