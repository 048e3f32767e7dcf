use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use engine_logging::{engine_info, set_search_session};
use log::LevelFilter;
use metafetch_core::{update, AppState, Msg, ResultId};

use super::config::{AppConfig, API_KEY_ENV};
use super::effects::EffectRunner;
use super::logging;
use super::ui::input::{self, InputCommand, HELP};
use super::ui::render::{render_form, render_results};
use super::ui::template::CardTemplate;

const TICK: Duration = Duration::from_millis(75);

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub keyword: Option<String>,
    pub select: Option<usize>,
    pub log_level: Option<LevelFilter>,
}

pub fn run_app(options: RunOptions) -> anyhow::Result<()> {
    let mut config = AppConfig::load(options.config.as_deref())?;
    config.apply_env_api_key(std::env::var(API_KEY_ENV).ok());
    let level = match options.log_level {
        Some(level) => level,
        None => config.log_level()?,
    };
    logging::initialize(config.log.destination, level, &config.log.file);

    let cards = CardTemplate::new(config.card_template.clone())
        .context("card_template in config is not a valid template")?;
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(config.engine_config(), msg_tx.clone());
    let mut app = App {
        state: AppState::with_messages(config.messages.clone()),
        runner,
        cards,
        echo: options.keyword.is_none(),
    };

    // Background tick so queued input is handled even when no engine events arrive.
    thread::spawn(move || {
        while msg_tx.send(Msg::Tick).is_ok() {
            thread::sleep(TICK);
        }
    });

    match options.keyword {
        Some(keyword) => {
            let timeout = config.fetch.request_timeout_secs * 2 + 5;
            app.run_once(&msg_rx, keyword, options.select, Duration::from_secs(timeout))
        }
        None => {
            app.run_interactive(&msg_rx);
            Ok(())
        }
    }
}

struct App {
    state: AppState,
    runner: EffectRunner,
    cards: CardTemplate,
    echo: bool,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if let Some(session) = state.session() {
            set_search_session(session.id().get());
        }
        self.runner.run(effects);
        if state.consume_dirty() && self.echo {
            print!("{}", render_results(&state.view(), &self.cards));
        }
        self.state = state;
    }

    fn print_form(&self) {
        print!("{}", render_form(self.state.form(), self.runner.description()));
    }

    fn run_interactive(&mut self, msg_rx: &mpsc::Receiver<Msg>) {
        let input_rx = spawn_input_reader();
        println!("{HELP}");

        while let Ok(msg) = msg_rx.recv() {
            self.dispatch(msg);
            while let Ok(command) = input_rx.try_recv() {
                match command {
                    InputCommand::Quit => {
                        engine_info!("quit requested");
                        return;
                    }
                    InputCommand::Help => println!("{HELP}"),
                    InputCommand::ShowForm => self.print_form(),
                    InputCommand::Invalid(reason) => println!("{reason}"),
                    InputCommand::Empty => {}
                    InputCommand::Select(id) => {
                        self.dispatch(Msg::ResultSelected(id));
                        if self.state.view().selected == Some(id) {
                            self.print_form();
                        } else {
                            println!("no result {id}");
                        }
                    }
                    other => {
                        for msg in other.into_msgs() {
                            self.dispatch(msg);
                        }
                    }
                }
            }
        }
    }

    /// Searches once, waits for both sources, prints the list and optionally
    /// the form for one selected result.
    fn run_once(
        &mut self,
        msg_rx: &mpsc::Receiver<Msg>,
        keyword: String,
        select: Option<usize>,
        timeout: Duration,
    ) -> anyhow::Result<()> {
        self.dispatch(Msg::KeywordChanged(keyword));
        self.dispatch(Msg::KeywordSubmitted);

        let started = Instant::now();
        while !self.is_settled() {
            if started.elapsed() > timeout {
                bail!("search did not finish within {:?}", timeout);
            }
            let msg = msg_rx.recv_timeout(TICK).unwrap_or(Msg::Tick);
            self.dispatch(msg);
        }
        print!("{}", render_results(&self.state.view(), &self.cards));

        if let Some(n) = select {
            let id = ResultId(n);
            self.dispatch(Msg::ResultSelected(id));
            if self.state.view().selected != Some(id) {
                bail!("no result {id}");
            }
            println!();
            self.print_form();
        }
        Ok(())
    }

    fn is_settled(&self) -> bool {
        self.state.session().is_none_or(|session| session.is_settled())
    }
}

fn spawn_input_reader() -> mpsc::Receiver<InputCommand> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(input::parse(&line)).is_err() {
                return;
            }
        }
        let _ = tx.send(InputCommand::Quit);
    });
    rx
}
