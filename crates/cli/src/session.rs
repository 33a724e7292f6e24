//! Async host for one game: drives the clock, schedules the computer's
//! replies and executes typed commands.
//!
//! The [`Game`] lives behind a shared lock. A ticker task charges the
//! running clock every `tick_interval_ms`; computer replies run on their own
//! task after `engine_delay_ms` and carry the game's reply token, so a
//! restart turns any reply still in flight into a no-op.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chess_core::{
    CancelToken, ClockUpdate, Color, Game, GameError, GameStatus, MoveOutcome, ReplyMode,
    TimeControl,
};
use thiserror::Error;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::{AppConfig, ConfigError};
use crate::input::{help_text, UserCommand};
use crate::render;

pub type SharedGame = Arc<Mutex<Game>>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("could not write {}: {source}", path.display())]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not encode game: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Things that happen without the user typing anything.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ComputerMoved(MoveOutcome),
    GameOver {
        status: GameStatus,
        winner: Option<Color>,
    },
    LowTime(Color),
    ComputerFailed(String),
}

/// What an executed command produced, for the front end to print.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Moved(MoveOutcome),
    PauseToggled(bool),
    TimeControlChanged(TimeControl),
    Restarted,
    Text(String),
    Saved(PathBuf),
    Quit,
}

pub struct Session {
    game: SharedGame,
    config: AppConfig,
    events: mpsc::UnboundedSender<SessionEvent>,
    clock_rx: watch::Receiver<ClockUpdate>,
    pending_reply: Option<JoinHandle<()>>,
    ticker: Option<JoinHandle<()>>,
}

impl Session {
    /// Build the game described by `config`. Events are delivered on the
    /// returned receiver once [`Session::start`] has been called.
    pub fn new(
        config: AppConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SessionEvent>), ConfigError> {
        config.validate()?;
        let engine = config.create_engine()?;
        let game = match &config.fen {
            Some(fen) => Game::from_fen(fen, config.time_control())
                .map_err(|e| ConfigError::Invalid(e.to_string()))?,
            None => Game::with_time_control(config.time_control()),
        };
        let mut game = game.with_opponent(
            config.engine_color(),
            engine,
            ReplyMode::Deferred,
        );

        let (clock_tx, clock_rx) = watch::channel(game.clock().snapshot(game.side_to_move()));
        game.subscribe_clock(move |update| {
            clock_tx.send_replace(update);
        });

        let (events, events_rx) = mpsc::unbounded_channel();
        let session = Self {
            game: Arc::new(Mutex::new(game)),
            config,
            events,
            clock_rx,
            pending_reply: None,
            ticker: None,
        };
        Ok((session, events_rx))
    }

    pub fn game(&self) -> SharedGame {
        self.game.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Latest clock snapshot published by the game.
    pub fn clock(&self) -> ClockUpdate {
        *self.clock_rx.borrow()
    }

    pub fn subscribe_clock(&self) -> watch::Receiver<ClockUpdate> {
        self.clock_rx.clone()
    }

    /// Start the clock ticker, and the computer's first move if it has White.
    pub async fn start(&mut self) {
        if self.ticker.is_none() {
            self.ticker = Some(self.spawn_ticker());
        }
        let game = self.game.lock().await;
        if game.engine_to_move() {
            let token = game.reply_token();
            drop(game);
            self.schedule_reply(token);
        }
    }

    pub async fn execute(&mut self, cmd: UserCommand) -> Result<Response, SessionError> {
        match cmd {
            UserCommand::Move(req) => {
                let mut game = self.game.lock().await;
                let outcome = game.execute_move(req.from, req.to)?;
                if game.engine_to_move() {
                    let token = game.reply_token();
                    drop(game);
                    self.schedule_reply(token);
                }
                Ok(Response::Moved(outcome))
            }
            UserCommand::Pause => {
                let paused = self.game.lock().await.toggle_pause();
                Ok(Response::PauseToggled(paused))
            }
            UserCommand::TimeControl { minutes, increment } => {
                let mut game = self.game.lock().await;
                game.change_time_control(minutes, increment);
                Ok(Response::TimeControlChanged(game.time_control()))
            }
            UserCommand::Restart => {
                if let Some(handle) = self.pending_reply.take() {
                    handle.abort();
                }
                let mut game = self.game.lock().await;
                game.restart();
                if game.engine_to_move() {
                    let token = game.reply_token();
                    drop(game);
                    self.schedule_reply(token);
                }
                Ok(Response::Restarted)
            }
            UserCommand::Board => Ok(Response::Text(render::board_view(
                &*self.game.lock().await,
            ))),
            UserCommand::History => Ok(Response::Text(render::history_table(
                self.game.lock().await.history(),
            ))),
            UserCommand::Clock => Ok(Response::Text(render::clock_line(
                &self.clock(),
                self.config.low_time_seconds,
            ))),
            UserCommand::Save(path) => {
                self.save(&path).await?;
                Ok(Response::Saved(path))
            }
            UserCommand::Help => Ok(Response::Text(help_text().to_string())),
            UserCommand::Quit => Ok(Response::Quit),
        }
    }

    /// Write the current game as JSON.
    pub async fn save(&self, path: &Path) -> Result<(), SessionError> {
        let record = self.game.lock().await.record();
        let json = serde_json::to_string_pretty(&record)?;
        tokio::fs::write(path, json)
            .await
            .map_err(|source| SessionError::Save {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), "game saved");
        Ok(())
    }

    /// Stop background tasks.
    pub async fn shutdown(&mut self) {
        if let Some(handle) = self.pending_reply.take() {
            handle.abort();
        }
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
        self.game.lock().await.reply_token().cancel();
    }

    fn schedule_reply(&mut self, token: CancelToken) {
        if let Some(handle) = self.pending_reply.take() {
            handle.abort();
        }
        let game = self.game.clone();
        let events = self.events.clone();
        let delay = Duration::from_millis(self.config.engine_delay_ms);

        self.pending_reply = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            if token.is_cancelled() {
                debug!("computer reply dropped after restart");
                return;
            }
            let mut game = game.lock().await;
            if token.is_cancelled() {
                return;
            }
            match game.play_engine_move() {
                Ok(Some(outcome)) => {
                    let over = outcome.status.is_terminal().then_some((outcome.status, outcome.winner));
                    let _ = events.send(SessionEvent::ComputerMoved(outcome));
                    if let Some((status, winner)) = over {
                        let _ = events.send(SessionEvent::GameOver { status, winner });
                    }
                }
                Ok(None) => {
                    if game.status().is_terminal() {
                        let _ = events.send(SessionEvent::GameOver {
                            status: game.status(),
                            winner: game.winner(),
                        });
                    }
                }
                Err(e) => {
                    warn!(error = %e, "computer reply failed");
                    let _ = events.send(SessionEvent::ComputerFailed(e.to_string()));
                }
            }
        }));
    }

    fn spawn_ticker(&self) -> JoinHandle<()> {
        let game = self.game.clone();
        let events = self.events.clone();
        let period = Duration::from_millis(self.config.tick_interval_ms);
        let low_time = self.config.low_time_seconds;

        tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut low = [false; 2];

            loop {
                interval.tick().await;
                if events.is_closed() {
                    break;
                }
                let mut game = game.lock().await;
                let was_active = game.status() == GameStatus::Active;
                let status = game.tick_now();

                for color in [Color::White, Color::Black] {
                    let is_low = game.clock().is_low_time(color, low_time);
                    if is_low && !low[color.idx()] && status == GameStatus::Active {
                        let _ = events.send(SessionEvent::LowTime(color));
                    }
                    low[color.idx()] = is_low;
                }

                if was_active && status.is_terminal() {
                    let _ = events.send(SessionEvent::GameOver {
                        status,
                        winner: game.winner(),
                    });
                }
            }
            debug!("clock ticker stopped");
        })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(handle) = self.pending_reply.take() {
            handle.abort();
        }
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
