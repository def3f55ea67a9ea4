//! Online/offline status tracking for the offline banner.
//!
//! # Responsibility
//! - Mirror the platform's connectivity signal into a two-state value.
//! - Decide whether the offline banner is shown.
//!
//! # Invariants
//! - A mounted monitor holds exactly one platform listener.
//! - Teardown removes that listener; an unmounted monitor holds none.
//! - The monitor never blocks or alters todo/auth operations.

use log::{debug, info};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Banner shown while offline.
pub const OFFLINE_BANNER: &str =
    "You are currently offline. The app will continue to work, but changes won't be synced.";

/// Fallback page shown when a document cannot be served offline.
pub const OFFLINE_PAGE_TITLE: &str = "You're Offline";
pub const OFFLINE_PAGE_MESSAGE: &str = "It looks like you've lost your internet connection. Please check your network settings and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn from_online(online: bool) -> Self {
        if online {
            Self::Online
        } else {
            Self::Offline
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

pub type ListenerId = u64;
pub type ConnectivityListener = Box<dyn FnMut(Connectivity)>;

/// Platform source of connectivity signals.
pub trait ConnectivityPlatform {
    /// Current status as reported right now.
    fn is_online(&self) -> bool;
    fn add_listener(&mut self, listener: ConnectivityListener) -> ListenerId;
    /// Returns whether `id` was registered.
    fn remove_listener(&mut self, id: ListenerId) -> bool;
}

/// Platform driven by explicit `set_online` calls.
///
/// Used by the shell (initial value from config, `online`/`offline`
/// commands) and by tests.
pub struct ManualConnectivity {
    online: bool,
    next_id: ListenerId,
    listeners: BTreeMap<ListenerId, ConnectivityListener>,
}

impl ManualConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online,
            next_id: 1,
            listeners: BTreeMap::new(),
        }
    }

    /// Updates the status and fires one event to every listener.
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
        let event = Connectivity::from_online(online);
        for listener in self.listeners.values_mut() {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl ConnectivityPlatform for ManualConnectivity {
    fn is_online(&self) -> bool {
        self.online
    }

    fn add_listener(&mut self, listener: ConnectivityListener) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.insert(id, listener);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }
}

/// Observes connectivity between mount and teardown.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    status: Rc<Cell<Connectivity>>,
    subscription: Option<ListenerId>,
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectivityMonitor {
    /// Unmounted monitor assuming online until mounted.
    pub fn new() -> Self {
        Self {
            status: Rc::new(Cell::new(Connectivity::Online)),
            subscription: None,
        }
    }

    /// Reads the current status and subscribes to platform events.
    ///
    /// Returns `false` without registering again when already mounted.
    pub fn mount<P: ConnectivityPlatform>(&mut self, platform: &mut P) -> bool {
        if self.subscription.is_some() {
            debug!("event=connectivity_mount module=connectivity status=skipped reason=already_mounted");
            return false;
        }

        self.status
            .set(Connectivity::from_online(platform.is_online()));
        let status = Rc::clone(&self.status);
        let id = platform.add_listener(Box::new(move |event| {
            status.set(event);
            info!(
                "event=connectivity_change module=connectivity status=ok connectivity={}",
                event.as_str()
            );
        }));
        self.subscription = Some(id);
        info!(
            "event=connectivity_mount module=connectivity status=ok connectivity={}",
            self.status.get().as_str()
        );
        true
    }

    /// Unsubscribes from platform events.
    ///
    /// Returns `false` when the monitor was not mounted.
    pub fn teardown<P: ConnectivityPlatform>(&mut self, platform: &mut P) -> bool {
        match self.subscription.take() {
            Some(id) => {
                platform.remove_listener(id);
                info!("event=connectivity_teardown module=connectivity status=ok");
                true
            }
            None => false,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn status(&self) -> Connectivity {
        self.status.get()
    }

    pub fn is_online(&self) -> bool {
        self.status() == Connectivity::Online
    }

    /// Banner text while offline, `None` while online.
    pub fn banner(&self) -> Option<&'static str> {
        match self.status() {
            Connectivity::Online => None,
            Connectivity::Offline => Some(OFFLINE_BANNER),
        }
    }
}
