//! Debounced search box
//!
//! Keystrokes update the query immediately and restart a debounce timer.
//! When the timer fires the query is sent to the [`PlaceSearch`] service,
//! tagged with a sequence number. Only the response to the latest issued
//! request may change the results, so a slow early response can never
//! overwrite a newer one.

use super::{PlaceQuery, SearchResult, SearchState};
use crate::{
    animation::transitions::TransitionId,
    core::{config::SearchConfig, store::MapStore},
    runtime::{async_delay, spawn, AsyncHandle},
    traits::PlaceSearch,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct SearchInner {
    state: SearchState,
    /// Debounce timer that has not fired yet
    pending: Option<Box<dyn AsyncHandle>>,
    timer_generation: u64,
    /// Sequence number of the most recently issued request
    issued: u64,
}

impl SearchInner {
    fn cancel_timer(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }
}

#[derive(Clone)]
pub struct SearchBox {
    inner: Arc<Mutex<SearchInner>>,
    service: Arc<dyn PlaceSearch>,
    store: MapStore,
    config: SearchConfig,
}

impl std::fmt::Debug for SearchBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchBox")
            .field("state", &self.lock().state)
            .field("config", &self.config)
            .finish()
    }
}

impl SearchBox {
    pub fn new(service: Arc<dyn PlaceSearch>, store: MapStore, config: SearchConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SearchInner {
                state: SearchState::default(),
                pending: None,
                timer_generation: 0,
                issued: 0,
            })),
            service,
            store,
            config,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SearchInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SearchState {
        self.lock().state.clone()
    }

    /// Records a keystroke and (re)starts the debounce timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn input(&self, text: &str) {
        let mut inner = self.lock();
        inner.state.query = text.to_string();
        inner.cancel_timer();
        inner.timer_generation += 1;

        let generation = inner.timer_generation;
        let debounce = self.config.debounce();
        let this = self.clone();
        let query = text.to_string();

        inner.pending = Some(spawn(async move {
            async_delay(debounce).await;
            {
                let mut inner = this.lock();
                if inner.timer_generation != generation {
                    return;
                }
                // Past this point a new keystroke must not abort the request
                inner.pending = None;
            }
            this.fire(&query).await;
        }));
    }

    /// Runs one search immediately, bypassing the debounce timer.
    ///
    /// An empty query clears the results without a network call and
    /// invalidates any request still in flight.
    pub async fn fire(&self, text: &str) {
        let text = text.trim();
        let seq = {
            let mut inner = self.lock();
            inner.issued += 1;
            if text.is_empty() {
                inner.state.results.clear();
                inner.state.is_loading = false;
                return;
            }
            inner.state.is_loading = true;
            inner.issued
        };

        let query = PlaceQuery::from_config(text, &self.config);
        let outcome = self.service.search(&query).await;

        let mut inner = self.lock();
        if inner.issued != seq {
            log::debug!(
                "discarding stale results for {:?} (request {}, latest {})",
                text,
                seq,
                inner.issued
            );
            return;
        }

        match outcome {
            Ok(results) => {
                inner.state.results = results;
                inner.state.is_open = true;
            }
            Err(e) => {
                log::error!("place search for {:?} failed: {}", text, e);
                inner.state.results.clear();
            }
        }
        inner.state.is_loading = false;
    }

    /// Picks a result: the query shows its name, the dropdown closes and
    /// the map flies there. Returns the chosen result and the flight id.
    pub fn select(&self, index: usize) -> Option<(SearchResult, Option<TransitionId>)> {
        let chosen = {
            let mut inner = self.lock();
            let chosen = inner.state.results.get(index).cloned()?;
            inner.cancel_timer();
            inner.issued += 1;
            inner.state.query = chosen.display_name.clone();
            inner.state.is_open = false;
            inner.state.is_loading = false;
            inner.state.results.clear();
            chosen
        };

        let flight = self
            .store
            .fly_to(chosen.coordinates, Some(self.config.select_zoom));
        log::info!("selected {} at {}", chosen.display_name, chosen.coordinates);
        Some((chosen, flight))
    }

    /// Closes the dropdown, keeping the query and results
    pub fn dismiss(&self) {
        self.lock().state.is_open = false;
    }

    /// Reopens the dropdown when there is something to show
    pub fn focus(&self) {
        let mut inner = self.lock();
        if !inner.state.results.is_empty() {
            inner.state.is_open = true;
        }
    }
}
