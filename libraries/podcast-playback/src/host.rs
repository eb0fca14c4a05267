//! Session host
//!
//! Holds the one `PlaybackSession` for the lifetime of the application and
//! hands out cheap `SessionHandle`s to whichever view needs one. State is
//! broadcast: every handle sees every change, whoever issued the command.

use crate::{
    events::{SessionEvent, SessionSnapshot},
    resource::{MediaBackend, MediaEvent, MediaNotification},
    session::PlaybackSession,
    types::{LoadId, SessionCommand, SessionConfig},
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, watch};
use tracing::debug;

/// Capacity of the event broadcast; slow subscribers lose the oldest events
const EVENT_CHANNEL_CAPACITY: usize = 256;

struct Shared {
    session: Mutex<PlaybackSession>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PlaybackSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Broadcast whatever the session queued since the last publish
    fn publish(&self, session: &mut PlaybackSession) {
        for event in session.drain_events() {
            // No subscribers is fine
            let _ = self.event_tx.send(event);
        }

        let snapshot = session.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

/// Owner of the application's single playback session
///
/// Create exactly one per application window. Dropping the host unloads the
/// session and releases its resource; outstanding handles then observe `Idle`.
pub struct SessionHost {
    shared: Arc<Shared>,
}

impl SessionHost {
    /// Create the host and its session
    pub fn new(backend: Box<dyn MediaBackend>, config: SessionConfig) -> Self {
        let session = PlaybackSession::new(backend, config);
        let (snapshot_tx, _) = watch::channel(session.snapshot());
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            shared: Arc::new(Shared {
                session: Mutex::new(session),
                snapshot_tx,
                event_tx,
            }),
        }
    }

    /// Handle for a view
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Unload and release the session resource
    pub fn shutdown(self) {
        // Drop does the work
    }
}

impl Drop for SessionHost {
    fn drop(&mut self) {
        debug!("Session host shutting down");
        let mut session = self.shared.lock();
        session.unload();
        self.shared.publish(&mut session);
    }
}

/// A view's reference to the shared session
///
/// Cloning is cheap; every clone talks to the same session.
#[derive(Clone)]
pub struct SessionHandle {
    shared: Arc<Shared>,
}

impl SessionHandle {
    /// Send a command to the session
    pub fn dispatch(&self, command: SessionCommand) {
        let mut session = self.shared.lock();
        session.apply(command);
        self.shared.publish(&mut session);
    }

    /// Deliver a media event from the backend
    pub fn deliver(&self, load: LoadId, event: MediaEvent) {
        let mut session = self.shared.lock();
        session.handle_media_event(load, event);
        self.shared.publish(&mut session);
    }

    /// Deliver a batch of backend notifications in order
    ///
    /// Returns the number delivered.
    pub fn deliver_all(&self, notifications: impl IntoIterator<Item = MediaNotification>) -> usize {
        let mut session = self.shared.lock();
        let mut delivered = 0;
        for notification in notifications {
            session.handle_media_event(notification.load, notification.event);
            delivered += 1;
        }
        self.shared.publish(&mut session);
        delivered
    }

    /// Current state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.snapshot_tx.borrow().clone()
    }

    /// Subscribe to state; the receiver always holds the latest snapshot
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    /// Subscribe to the event stream from now on
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.event_tx.subscribe()
    }

    /// Whether two handles refer to the same session
    pub fn same_session(&self, other: &SessionHandle) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}
