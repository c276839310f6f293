use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::forms::auth::AuthMode;
use crate::services::MarketplaceApi;
use crate::session::SessionCodec;

pub type FlowId = String;

/// Upper bound on live flows; the least recently touched one is evicted.
pub const MAX_FLOWS: usize = 10_000;

struct FlowEntry {
    mode: AuthMode,
    touched: DateTime<Utc>,
}

/// Sign-in/sign-up progress per browser, keyed by the flow cookie.
#[derive(Clone)]
pub struct FlowStore {
    flows: Arc<Mutex<HashMap<FlowId, FlowEntry>>>,
    idle: Duration,
    capacity: usize,
}

impl FlowStore {
    pub fn new(idle: Duration) -> Self {
        Self::with_capacity(idle, MAX_FLOWS)
    }

    pub fn with_capacity(idle: Duration, capacity: usize) -> Self {
        Self {
            flows: Arc::new(Mutex::new(HashMap::new())),
            idle,
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, id: &str) -> AuthMode {
        let flows = self.flows.lock().unwrap_or_else(PoisonError::into_inner);
        flows
            .get(id)
            .filter(|entry| Utc::now() - entry.touched <= self.idle)
            .map(|entry| entry.mode.clone())
            .unwrap_or_default()
    }

    pub fn put(&self, id: &str, mode: AuthMode) {
        let now = Utc::now();
        let mut flows = self.flows.lock().unwrap_or_else(PoisonError::into_inner);
        flows.retain(|_, entry| now - entry.touched <= self.idle);
        if !flows.contains_key(id) && flows.len() >= self.capacity {
            let oldest = flows
                .iter()
                .min_by_key(|(_, entry)| entry.touched)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                flows.remove(&oldest);
            }
        }
        flows.insert(id.to_string(), FlowEntry { mode, touched: now });
    }

    pub fn remove(&self, id: &str) {
        let mut flows = self.flows.lock().unwrap_or_else(PoisonError::into_inner);
        flows.remove(id);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.flows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn MarketplaceApi>,
    pub sessions: SessionCodec,
    pub flows: FlowStore,
}

impl AppState {
    pub fn new(api: Arc<dyn MarketplaceApi>, sessions: SessionCodec, flows: FlowStore) -> Self {
        Self { api, sessions, flows }
    }
}
