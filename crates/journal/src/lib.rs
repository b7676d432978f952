#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Bounded, newest-first event journal with durable mirroring
//!
//! A [`Journal`] keeps an in-memory sequence of [`EventRecord`]s, newest at
//! index 0, capped at a fixed capacity with oldest-eviction. Every mutation
//! rewrites the full sequence to one [`KvStore`] key before returning, and
//! hydration happens exactly once when the journal is opened.
//!
//! The journal treats its durable slot as a best-effort cache: a missing or
//! malformed stored value hydrates to an empty journal (logged, never
//! surfaced), while write failures during mutation do propagate so callers
//! know the mirror is stale.

use chrono::{DateTime, Utc};
use sentinel_errors::{Error, JournalError};
use sentinel_store::KvStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Default number of records retained, matching the dashboard history cap
pub const DEFAULT_CAPACITY: usize = 50;

/// One journaled occurrence with an opaque payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord<T> {
    /// Opaque unique identifier
    pub id: String,
    /// Time the event was recorded, ISO-8601 on the wire
    pub timestamp: DateTime<Utc>,
    /// Payload the journal orders and bounds but never inspects
    pub payload: T,
}

impl<T> EventRecord<T> {
    /// Create a record timestamped now
    #[must_use]
    pub fn new(id: impl Into<String>, payload: T) -> Self {
        Self::at(id, Utc::now(), payload)
    }

    /// Create a record with an explicit timestamp
    #[must_use]
    pub fn at(id: impl Into<String>, timestamp: DateTime<Utc>, payload: T) -> Self {
        Self {
            id: id.into(),
            timestamp,
            payload,
        }
    }
}

/// Capped, newest-first event log mirrored to one durable storage key
#[derive(Debug)]
pub struct Journal<T> {
    store: KvStore,
    key: String,
    capacity: usize,
    entries: Vec<EventRecord<T>>,
}

impl<T> Journal<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Open a journal over `key`, hydrating from the store
    ///
    /// This is the single load attempt for the journal's lifetime: a missing
    /// key yields an empty journal, and a value that fails to deserialize is
    /// discarded with a warning rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::InvalidCapacity` for a zero capacity, or a
    /// storage error if the slot exists but cannot be read.
    pub async fn open(store: KvStore, key: impl Into<String>, capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(JournalError::InvalidCapacity { value: capacity }.into());
        }
        let key = key.into();

        let entries = match store.read(&key).await? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<EventRecord<T>>>(&raw) {
                Ok(mut entries) => {
                    // A cap lowered between runs applies on hydration too.
                    entries.truncate(capacity);
                    entries
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "discarding corrupt journal slot");
                    Vec::new()
                }
            },
        };

        Ok(Self {
            store,
            key,
            capacity,
            entries,
        })
    }

    /// Read-only snapshot of the entries, newest first
    #[must_use]
    pub fn entries(&self) -> &[EventRecord<T>] {
        &self.entries
    }

    /// Number of records currently retained
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of records retained
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Storage key this journal owns
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Prepend a record, evicting beyond capacity, and mirror the result
    ///
    /// After a successful append the newest entry is `record` and the length
    /// never exceeds the capacity. The durable write completes before this
    /// returns.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails; the
    /// in-memory sequence is already updated in that case.
    pub async fn append(&mut self, record: EventRecord<T>) -> Result<(), Error> {
        prepend_bounded(&mut self.entries, record, self.capacity);
        self.mirror().await
    }

    /// Discard all entries and remove the storage key entirely
    ///
    /// A later `open` over the same key sees "no prior state", not an empty
    /// but present sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if removing the key fails.
    pub async fn clear(&mut self) -> Result<(), Error> {
        self.entries.clear();
        self.store.remove(&self.key).await
    }

    /// Keep only records matching the predicate, mirroring the result
    ///
    /// Unlike [`clear`](Self::clear) the storage key stays present. Returns
    /// the number of records dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn retain<F>(&mut self, mut predicate: F) -> Result<usize, Error>
    where
        F: FnMut(&EventRecord<T>) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|record| predicate(record));
        let dropped = before - self.entries.len();
        if dropped > 0 {
            self.mirror().await?;
        }
        Ok(dropped)
    }

    /// Apply `f` to the payload of the record with the given id
    ///
    /// Returns `false` when no record matches; the mirror is only rewritten
    /// when a record was touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn update<F>(&mut self, id: &str, f: F) -> Result<bool, Error>
    where
        F: FnOnce(&mut T),
    {
        let Some(record) = self.entries.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        f(&mut record.payload);
        self.mirror().await?;
        Ok(true)
    }

    /// Rewrite the durable slot with the full current sequence.
    async fn mirror(&self) -> Result<(), Error> {
        let raw = serde_json::to_string(&self.entries).map_err(|e| {
            Error::from(JournalError::SerializeFailed {
                message: e.to_string(),
            })
        })?;
        self.store.write(&self.key, &raw).await
    }
}

/// Prepend `record` and truncate to `capacity`, dropping the oldest entries.
fn prepend_bounded<T>(entries: &mut Vec<EventRecord<T>>, record: EventRecord<T>, capacity: usize) {
    entries.insert(0, record);
    entries.truncate(capacity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(seq: usize) -> EventRecord<usize> {
        EventRecord::new(format!("R{seq}"), seq)
    }

    #[test]
    fn prepend_puts_newest_first() {
        let mut entries = Vec::new();
        prepend_bounded(&mut entries, record(1), 3);
        prepend_bounded(&mut entries, record(2), 3);
        assert_eq!(entries[0].payload, 2);
        assert_eq!(entries[1].payload, 1);
    }

    #[test]
    fn eviction_drops_exactly_the_oldest() {
        let mut entries = Vec::new();
        for seq in 0..3 {
            prepend_bounded(&mut entries, record(seq), 3);
        }
        prepend_bounded(&mut entries, record(3), 3);
        let payloads: Vec<_> = entries.iter().map(|r| r.payload).collect();
        assert_eq!(payloads, vec![3, 2, 1]);
    }

    proptest! {
        #[test]
        fn capacity_invariant_holds_for_any_append_sequence(
            capacity in 1usize..20,
            appends in 0usize..60,
        ) {
            let mut entries = Vec::new();
            for seq in 0..appends {
                prepend_bounded(&mut entries, record(seq), capacity);
                prop_assert!(entries.len() <= capacity);
                prop_assert_eq!(entries[0].payload, seq);
            }
            // Survivors are the most recent appends, in reverse order.
            let expected: Vec<_> = (0..appends).rev().take(capacity).collect();
            let actual: Vec<_> = entries.iter().map(|r| r.payload).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
