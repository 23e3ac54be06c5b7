//! Application state for the web layer.

use std::sync::Arc;

use crate::chat::{ChatGate, ChatRooms};
use crate::config::CoreConfig;
use crate::discovery::DiscoveryEngine;
use crate::lifecycle::LifecycleManager;
use crate::store::{ConnectionStore, MessageStore, TripStore, UserStore};
use crate::sweep::Sweeper;

/// Shared application state.
///
/// Holds the stores and configuration; the per-concern services are cheap
/// handle bundles, built on demand per request.
#[derive(Clone)]
pub struct AppState {
    pub trips: TripStore,
    pub connections: ConnectionStore,
    pub users: UserStore,
    pub messages: MessageStore,
    pub rooms: ChatRooms,
    pub config: Arc<CoreConfig>,
}

impl AppState {
    /// Create a fresh state with empty stores.
    pub fn new(config: CoreConfig) -> Self {
        Self {
            trips: TripStore::new(),
            connections: ConnectionStore::new(),
            users: UserStore::new(),
            messages: MessageStore::new(),
            rooms: ChatRooms::new(),
            config: Arc::new(config),
        }
    }

    /// Discovery engine over the current stores.
    pub fn discovery(&self) -> DiscoveryEngine {
        DiscoveryEngine::new(self.trips.clone(), self.users.clone(), &self.config)
    }

    /// Connection lifecycle manager over the current stores.
    pub fn lifecycle(&self) -> LifecycleManager {
        LifecycleManager::new(self.trips.clone(), self.connections.clone(), self.users.clone())
    }

    /// Chat admission gate over the current stores.
    pub fn chat_gate(&self) -> ChatGate {
        ChatGate::new(
            self.connections.clone(),
            self.trips.clone(),
            self.messages.clone(),
            &self.config,
        )
    }

    /// Auto-completion sweeper over the current stores.
    pub fn sweeper(&self) -> Sweeper {
        Sweeper::new(self.trips.clone(), self.connections.clone(), &self.config)
    }
}
