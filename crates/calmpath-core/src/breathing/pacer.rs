//! Recurring tick driver for a [`BreathingSession`].
//!
//! Only one worker ticks a session at a time. `start()` cancels the previous
//! worker before installing a new one, `stop()` cancels it, and dropping the
//! pacer cancels it as well.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::session::{BreathingSession, BreathingSnapshot};
use crate::events::Event;

/// Default driver period: one displayed second per tick.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

struct Worker {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

pub struct Pacer {
    session: Arc<Mutex<BreathingSession>>,
    period: Duration,
    worker: Option<Worker>,
    snapshot_tx: watch::Sender<BreathingSnapshot>,
    /// Set once a caller takes the event stream. Until then events are dropped.
    event_tx: Option<mpsc::UnboundedSender<Event>>,
    events_taken: bool,
}

impl Pacer {
    pub fn new(period: Duration) -> Self {
        let session = BreathingSession::new();
        let (snapshot_tx, _) = watch::channel(session.snapshot());
        Self {
            session: Arc::new(Mutex::new(session)),
            period,
            worker: None,
            snapshot_tx,
            event_tx: None,
            events_taken: false,
        }
    }

    /// Receiver of the latest snapshot, updated after every tick.
    pub fn subscribe(&self) -> watch::Receiver<BreathingSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Take the event stream. Only the first caller gets it.
    ///
    /// Nothing is queued before this call. A worker that is already running
    /// does not pick up the new sender; take the stream before `start()`.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<Event>> {
        if self.events_taken {
            return None;
        }
        self.events_taken = true;
        let (tx, rx) = mpsc::unbounded_channel();
        self.event_tx = Some(tx);
        Some(rx)
    }

    pub fn snapshot(&self) -> BreathingSnapshot {
        lock(&self.session).snapshot()
    }

    pub fn is_running(&self) -> bool {
        lock(&self.session).is_running()
    }

    /// Reset the session and start ticking. Must be called inside a tokio
    /// runtime.
    pub fn start(&mut self) {
        self.cancel_worker();

        let (event, snapshot) = {
            let mut session = lock(&self.session);
            let event = session.start();
            (event, session.snapshot())
        };
        self.emit(event);
        self.snapshot_tx.send_replace(snapshot);

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(tick_loop(
            Arc::clone(&self.session),
            self.period,
            cancel.clone(),
            self.snapshot_tx.clone(),
            self.event_tx.clone(),
        ));
        self.worker = Some(Worker { handle, cancel });
    }

    /// Cancel the worker and abort the session.
    pub fn stop(&mut self) {
        self.cancel_worker();
        let (event, snapshot) = {
            let mut session = lock(&self.session);
            (session.stop(), session.snapshot())
        };
        if let Some(event) = event {
            self.emit(event);
        }
        self.snapshot_tx.send_replace(snapshot);
    }

    /// Wait until the current worker exits, either because the session
    /// finished or because it was cancelled.
    pub async fn wait(&mut self) {
        if let Some(worker) = self.worker.as_mut() {
            if let Err(e) = (&mut worker.handle).await {
                if !e.is_cancelled() {
                    tracing::error!("breathing tick worker failed: {e}");
                }
            }
            self.worker = None;
        }
    }

    fn emit(&mut self, event: Event) {
        let Some(tx) = &self.event_tx else {
            return;
        };
        if tx.send(event).is_err() {
            tracing::debug!("breathing event receiver dropped");
            self.event_tx = None;
        }
    }

    fn cancel_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.cancel.cancel();
            worker.handle.abort();
            tracing::debug!("breathing tick worker cancelled");
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

impl Drop for Pacer {
    fn drop(&mut self) {
        self.cancel_worker();
    }
}

async fn tick_loop(
    session: Arc<Mutex<BreathingSession>>,
    period: Duration,
    cancel: CancellationToken,
    snapshot_tx: watch::Sender<BreathingSnapshot>,
    event_tx: Option<mpsc::UnboundedSender<Event>>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let (events, snapshot, running) = {
                    let mut guard = lock(&session);
                    // A restart may have replaced this worker while it waited.
                    if cancel.is_cancelled() {
                        break;
                    }
                    let events = guard.tick();
                    (events, guard.snapshot(), guard.is_running())
                };
                if let Some(tx) = &event_tx {
                    for event in events {
                        let _ = tx.send(event);
                    }
                }
                snapshot_tx.send_replace(snapshot);
                if !running {
                    tracing::debug!("breathing tick worker exiting, session over");
                    break;
                }
            }
        }
    }
}

fn lock(session: &Mutex<BreathingSession>) -> MutexGuard<'_, BreathingSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
