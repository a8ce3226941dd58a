//! Coalescing of concurrent work per key.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

/// At most one in-flight computation per key.
///
/// Callers that arrive while a computation for the same key is running wait
/// for it and receive a clone of its result instead of starting their own.
/// Once finished the flight is forgotten, so the next call starts fresh.
/// If the running caller is cancelled, one of the waiters takes over.
#[derive(Debug)]
pub struct SingleFlight<K, V> {
    flights: Mutex<HashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> Default for SingleFlight<K, V> {
    fn default() -> Self {
        Self {
            flights: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn run<F, Fut>(&self, key: K, work: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let cell = {
            let mut flights = self.flights.lock().await;
            flights
                .entry(key.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        let value = cell.get_or_init(work).await.clone();

        let mut flights = self.flights.lock().await;
        if flights
            .get(&key)
            .is_some_and(|current| Arc::ptr_eq(current, &cell))
        {
            flights.remove(&key);
        }

        value
    }

    /// Number of keys with a computation currently running.
    #[cfg(test)]
    async fn in_flight(&self) -> usize {
        self.flights.lock().await.len()
    }
}
