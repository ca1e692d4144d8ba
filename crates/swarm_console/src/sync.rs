//! Poll loop and command plumbing around the state cache.
//!
//! `LiveSync` is the only writer of its [`StateCache`]. Network calls run on
//! short-lived worker threads and report back over a channel that the owner
//! drains once per frame; results are applied in arrival order, so a slow tick
//! that lands late simply overwrites a newer one.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::client::{transport_from_config, ConsoleTransport, TransportError};
use crate::config::ConsoleConfig;
use crate::dispatcher::{CommandDispatcher, CommandError, HaltOutcome, MissionAck, MissionDraft};
use crate::fetcher::{FetchResult, Polled, ResourceKey, StateCache, StateFetcher};
use crate::model::{GraphData, SystemState};

pub const NOTICE_TTL: Duration = Duration::from_secs(6);
const MAX_NOTICES: usize = 8;

#[derive(Debug)]
pub enum SyncMessage {
    Fetched(FetchResult),
    Halt(HaltOutcome),
    Mission(Result<MissionAck, CommandError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Sent,
    /// Dropped locally because the system is halted.
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub raised_at: Instant,
}

pub struct LiveSync {
    cache: StateCache,
    fetcher: StateFetcher,
    dispatcher: CommandDispatcher,
    poll_interval: Duration,
    next_tick: Option<Instant>,
    tx: Sender<SyncMessage>,
    rx: Receiver<SyncMessage>,
    in_flight: usize,
    notices: VecDeque<Notice>,
    state_revision: u64,
    graph_revision: u64,
}

impl LiveSync {
    pub fn new(transport: Arc<dyn ConsoleTransport>, poll_interval: Duration) -> Self {
        Self::with_cache(transport, poll_interval, StateCache::default())
    }

    pub fn with_cache(
        transport: Arc<dyn ConsoleTransport>,
        poll_interval: Duration,
        cache: StateCache,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            cache,
            fetcher: StateFetcher::new(transport.clone()),
            dispatcher: CommandDispatcher::new(transport),
            poll_interval,
            next_tick: None,
            tx,
            rx,
            in_flight: 0,
            notices: VecDeque::new(),
            state_revision: 0,
            graph_revision: 0,
        }
    }

    pub fn from_config(config: &ConsoleConfig) -> Result<Self, TransportError> {
        let transport = transport_from_config(config)?;
        Ok(Self::new(transport, config.poll_interval()))
    }

    /// Starts a poll of both resources when the interval has elapsed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.next_tick.is_some_and(|due| now < due) {
            return false;
        }
        self.next_tick = Some(now + self.poll_interval);
        for key in ResourceKey::ALL {
            self.spawn_fetch(key);
        }
        true
    }

    pub fn time_until_tick(&self, now: Instant) -> Duration {
        self.next_tick
            .map(|due| due.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    pub fn refresh(&mut self, key: ResourceKey) {
        self.spawn_fetch(key);
    }

    fn spawn_fetch(&mut self, key: ResourceKey) {
        let fetcher = self.fetcher.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let _ = tx.send(SyncMessage::Fetched(fetcher.fetch(key)));
        });
    }

    /// Applies every finished background job; returns how many were applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.apply(message);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, message: SyncMessage) {
        match message {
            SyncMessage::Fetched(result) => {
                let key = result.key;
                self.cache.apply(result);
                match key {
                    ResourceKey::GameState => self.state_revision += 1,
                    ResourceKey::GraphNodes => self.graph_revision += 1,
                }
            }
            SyncMessage::Halt(outcome) => {
                self.cache.set_status(outcome.status());
                self.state_revision += 1;
                if let HaltOutcome::Unconfirmed(err) = &outcome {
                    self.notify(
                        NoticeLevel::Warning,
                        format!("Halt not confirmed ({err}); holding HALTED"),
                    );
                }
            }
            SyncMessage::Mission(Ok(_)) => {
                self.notify(NoticeLevel::Info, "Mission assigned".to_string());
                self.spawn_fetch(ResourceKey::GameState);
            }
            SyncMessage::Mission(Err(err)) => {
                warn!("mission assignment failed: {err}");
                self.notify(NoticeLevel::Error, format!("Mission failed: {err}"));
            }
        }
    }

    /// Marks the cache halted immediately, then confirms in the background.
    pub fn request_halt(&mut self) -> Dispatch {
        if self.cache.is_halted() {
            return Dispatch::Suppressed;
        }
        self.cache.mark_halted();
        self.state_revision += 1;

        let dispatcher = self.dispatcher.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let _ = tx.send(SyncMessage::Halt(dispatcher.halt()));
        });
        Dispatch::Sent
    }

    /// Validation runs on the caller's thread so no request leaves with missing fields.
    pub fn request_mission(&mut self, draft: MissionDraft) -> Result<Dispatch, CommandError> {
        if let Err(err) = draft.validate() {
            self.notify(NoticeLevel::Warning, err.to_string());
            return Err(err);
        }
        if self.cache.is_halted() {
            return Ok(Dispatch::Suppressed);
        }

        let dispatcher = self.dispatcher.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let _ = tx.send(SyncMessage::Mission(dispatcher.assign_mission(&draft)));
        });
        Ok(Dispatch::Sent)
    }

    pub fn poll(&self, key: ResourceKey) -> Option<Polled<'_>> {
        self.cache.poll(key)
    }

    pub fn cache(&self) -> &StateCache {
        &self.cache
    }

    pub fn system_state(&self) -> Option<&SystemState> {
        self.cache.system_state()
    }

    pub fn graph(&self) -> Option<&GraphData> {
        self.cache.graph()
    }

    pub fn is_live(&self) -> bool {
        self.cache.is_live()
    }

    pub fn is_halted(&self) -> bool {
        self.cache.is_halted()
    }

    /// Bumped whenever the cached system state is replaced or overridden.
    pub fn state_revision(&self) -> u64 {
        self.state_revision
    }

    pub fn graph_revision(&self) -> u64 {
        self.graph_revision
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn notify(&mut self, level: NoticeLevel, message: String) {
        self.notices.push_back(Notice {
            level,
            message,
            raised_at: Instant::now(),
        });
        while self.notices.len() > MAX_NOTICES {
            self.notices.pop_front();
        }
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn expire_notices(&mut self, now: Instant) {
        self.notices
            .retain(|notice| now.saturating_duration_since(notice.raised_at) < NOTICE_TTL);
    }

    /// Blocks until every background job has reported or `timeout` passes.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.drain();
            if self.in_flight == 0 {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            match self.rx.recv_timeout(deadline - now) {
                Ok(message) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    self.apply(message);
                }
                Err(_) => return self.in_flight == 0,
            }
        }
    }
}

#[cfg(test)]
mod tests;
