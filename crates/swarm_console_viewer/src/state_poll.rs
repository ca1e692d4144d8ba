use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use bevy::prelude::*;
use swarm_console::view::Connectivity;
use swarm_console::{
    transport_from_config, ConsoleConfig, ConsoleTransport, FetchResult, ResourceKey, StateCache,
    StateFetcher, SystemState, TransportError,
};

/// Game-state polling owned by the viewer, independent of the dashboard.
/// A fetch starts every interval whether or not the previous one returned;
/// results apply in arrival order.
#[derive(Resource)]
pub(super) struct StatePoller {
    fetcher: StateFetcher,
    interval: Duration,
    next_tick: Option<Instant>,
    tx: Sender<FetchResult>,
    rx: Mutex<Receiver<FetchResult>>,
}

impl StatePoller {
    pub(super) fn new(transport: Arc<dyn ConsoleTransport>, interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            fetcher: StateFetcher::new(transport),
            interval,
            next_tick: None,
            tx,
            rx: Mutex::new(rx),
        }
    }

    pub(super) fn from_config(config: &ConsoleConfig) -> Result<Self, TransportError> {
        Ok(Self::new(
            transport_from_config(config)?,
            config.poll_interval(),
        ))
    }

    fn start_if_due(&mut self, now: Instant) {
        if self.next_tick.is_some_and(|due| now < due) {
            return;
        }
        self.next_tick = Some(now + self.interval);

        let fetcher = self.fetcher.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let _ = tx.send(fetcher.fetch(ResourceKey::GameState));
        });
    }
}

#[derive(Resource, Default)]
pub(super) struct ViewerState {
    pub cache: StateCache,
    /// Bumped on every applied poll result; the projection pass keys off it.
    pub revision: u64,
}

impl ViewerState {
    pub(super) fn system_state(&self) -> Option<&SystemState> {
        self.cache.system_state()
    }

    pub(super) fn connectivity(&self) -> Connectivity {
        if self.cache.system_state().is_none() {
            Connectivity::Connecting
        } else if self.cache.is_resource_live(ResourceKey::GameState) {
            Connectivity::Live
        } else {
            Connectivity::Fallback
        }
    }
}

pub(super) fn poll_game_state(mut poller: ResMut<StatePoller>, mut state: ResMut<ViewerState>) {
    poller.start_if_due(Instant::now());

    let mut received = Vec::new();
    match poller.rx.lock() {
        Ok(receiver) => loop {
            match receiver.try_recv() {
                Ok(result) => received.push(result),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    warn!("viewer poll channel disconnected");
                    break;
                }
            }
        },
        Err(_) => {
            warn!("viewer poll receiver poisoned");
            return;
        }
    }

    for result in received {
        state.cache.apply(result);
        state.revision += 1;
    }
}
