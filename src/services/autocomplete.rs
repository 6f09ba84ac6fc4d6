//! Debounced address suggestions.
//!
//! Every keystroke bumps a generation counter and schedules a lookup after the
//! debounce delay. A lookup whose generation is no longer current when the
//! delay expires, or when its response arrives, is dropped, so only the last
//! keystroke of a burst reaches the geocoding service and stale responses
//! never overwrite newer ones.

use crate::geocoding::{AddressSuggestion, GeocodingClient};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Text must be longer than this before a lookup is scheduled.
pub const MIN_QUERY_CHARS: usize = 3;

type Batch = (u64, Vec<AddressSuggestion>);

pub struct AddressAutocomplete {
    client: GeocodingClient,
    runtime: Handle,
    debounce: Duration,
    generation: Arc<AtomicU64>,
    sender: mpsc::UnboundedSender<Batch>,
    receiver: mpsc::UnboundedReceiver<Batch>,
    suggestions: Vec<AddressSuggestion>,
}

impl AddressAutocomplete {
    pub fn new(client: GeocodingClient, runtime: Handle, debounce: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            client,
            runtime,
            debounce,
            generation: Arc::new(AtomicU64::new(0)),
            sender,
            receiver,
            suggestions: Vec::new(),
        }
    }

    pub fn suggestions(&self) -> &[AddressSuggestion] {
        &self.suggestions
    }

    /// Schedule a lookup for the typed text. Short text clears the suggestions instead.
    pub fn on_input(&mut self, text: &str, commune: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if text.trim().chars().count() <= MIN_QUERY_CHARS {
            self.suggestions.clear();
            return;
        }

        let client = self.client.clone();
        let current = Arc::clone(&self.generation);
        let sender = self.sender.clone();
        let debounce = self.debounce;
        let text = text.to_string();
        let commune = commune.to_string();

        self.runtime.spawn(async move {
            tokio::time::sleep(debounce).await;
            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            match client.search(&text, &commune).await {
                Ok(found) => {
                    if current.load(Ordering::SeqCst) == generation {
                        let _ = sender.send((generation, found));
                    } else {
                        debug!("Dropping stale suggestions for {:?}", text);
                    }
                }
                Err(e) => warn!("Address lookup failed: {:#}", e),
            }
        });
    }

    /// Apply arrived results. Returns true if the suggestions changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok((generation, found)) = self.receiver.try_recv() {
            if generation == self.generation.load(Ordering::SeqCst) {
                self.suggestions = found;
                changed = true;
            }
        }
        changed
    }

    /// Drop pending lookups and clear the list.
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.suggestions.clear();
    }

    /// Take a suggestion by index, closing the list.
    pub fn choose(&mut self, index: usize) -> Option<AddressSuggestion> {
        let chosen = self.suggestions.get(index).cloned();
        if chosen.is_some() {
            self.cancel();
        }
        chosen
    }
}
