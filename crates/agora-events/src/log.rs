//! The per-society event log.
//!
//! An [`EventLog`] is an append-only ring buffer: appends beyond capacity
//! evict from the oldest end, never from the middle. Append is the single
//! point of truth for ordering. Each event receives the next sequence
//! number and a timestamp strictly greater than its predecessor's, even if
//! the wall clock stalls or steps backwards.
//!
//! The log itself is not synchronized; its owner serializes appends (one
//! logical timeline per society).

use std::collections::VecDeque;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use agora_types::{Event, EventId, EventPayload, SocietyId};

use crate::query::EventQuery;

/// Default number of retained events per society.
pub const DEFAULT_CAPACITY: usize = 500;

/// Errors raised when rebuilding a log from persisted state.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EventLogError {
    /// A persisted event belongs to a different society.
    #[error("event {event} belongs to society `{found}`, expected `{expected}`")]
    ForeignEvent {
        /// The offending event.
        event: EventId,
        /// Society of the log being restored.
        expected: SocietyId,
        /// Society recorded on the event.
        found: SocietyId,
    },

    /// Persisted events are not in strictly increasing order.
    #[error("event {event} at seq {seq} is out of order")]
    OutOfOrder {
        /// The offending event.
        event: EventId,
        /// Its sequence number.
        seq: u64,
    },
}

/// Serialized form of a log: the retained events plus the lifetime count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSnapshot {
    /// Owning society.
    pub society: SocietyId,
    /// Events ever appended, including evicted ones.
    pub total_appended: u64,
    /// Retained events, oldest first.
    pub events: Vec<Event>,
}

/// Append-only, capped, ordered event sequence for one society.
#[derive(Debug, Clone)]
pub struct EventLog {
    society: SocietyId,
    capacity: usize,
    events: VecDeque<Event>,
    next_seq: u64,
    last_timestamp: Option<DateTime<Utc>>,
}

impl EventLog {
    /// Create an empty log with [`DEFAULT_CAPACITY`].
    pub fn new(society: SocietyId) -> Self {
        Self::with_capacity(society, DEFAULT_CAPACITY)
    }

    /// Create an empty log retaining at most `capacity` events (minimum 1).
    pub fn with_capacity(society: SocietyId, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            society,
            capacity,
            events: VecDeque::with_capacity(capacity),
            next_seq: 0,
            last_timestamp: None,
        }
    }

    /// Append an event observed at `now` and return a copy of it.
    ///
    /// The stored timestamp is `now`, bumped by one microsecond past the
    /// previous event if the clock did not advance.
    pub fn append(&mut self, payload: EventPayload, now: DateTime<Utc>) -> Event {
        let timestamp = match self.last_timestamp {
            Some(last) if now <= last => last
                .checked_add_signed(TimeDelta::microseconds(1))
                .unwrap_or(last),
            _ => now,
        };

        if self.events.len() >= self.capacity {
            if let Some(evicted) = self.events.pop_front() {
                tracing::trace!(society = %self.society, seq = evicted.seq, "event evicted");
            }
        }

        let event = Event {
            id: EventId::new(),
            society: self.society.clone(),
            seq: self.next_seq,
            timestamp,
            payload,
        };
        self.next_seq = self.next_seq.saturating_add(1);
        self.last_timestamp = Some(timestamp);
        self.events.push_back(event.clone());
        event
    }

    /// The most recent events matching `query`, oldest first.
    pub fn recent(&self, query: &EventQuery) -> Vec<Event> {
        let mut matched: Vec<Event> = self
            .events
            .iter()
            .rev()
            .filter(|e| query.matches(e))
            .take(query.effective_limit())
            .cloned()
            .collect();
        matched.reverse();
        matched
    }

    /// The last `count` events, unfiltered, oldest first.
    pub fn tail(&self, count: usize) -> Vec<Event> {
        let skip = self.events.len().saturating_sub(count);
        self.events.iter().skip(skip).cloned().collect()
    }

    /// Retained events, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Event> {
        self.events.iter()
    }

    /// Owning society.
    pub const fn society(&self) -> &SocietyId {
        &self.society
    }

    /// Maximum number of retained events.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are retained.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events ever appended, including evicted ones.
    pub const fn total_appended(&self) -> u64 {
        self.next_seq
    }

    /// Capture the log for persistence.
    pub fn snapshot(&self) -> LogSnapshot {
        LogSnapshot {
            society: self.society.clone(),
            total_appended: self.next_seq,
            events: self.events.iter().cloned().collect(),
        }
    }

    /// Rebuild a log from a snapshot.
    ///
    /// Only the newest `capacity` events are kept. The lifetime counter
    /// never goes below one past the last retained sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`EventLogError`] if an event belongs to another society or
    /// the events are not strictly increasing in both sequence and time.
    pub fn restore(snapshot: LogSnapshot, capacity: usize) -> Result<Self, EventLogError> {
        let mut log = Self::with_capacity(snapshot.society, capacity);

        let mut previous: Option<(u64, DateTime<Utc>)> = None;
        for event in &snapshot.events {
            if event.society != log.society {
                return Err(EventLogError::ForeignEvent {
                    event: event.id,
                    expected: log.society.clone(),
                    found: event.society.clone(),
                });
            }
            if let Some((seq, ts)) = previous {
                if event.seq <= seq || event.timestamp <= ts {
                    return Err(EventLogError::OutOfOrder {
                        event: event.id,
                        seq: event.seq,
                    });
                }
            }
            previous = Some((event.seq, event.timestamp));
        }

        let skip = snapshot.events.len().saturating_sub(log.capacity);
        log.events = snapshot.events.into_iter().skip(skip).collect();
        let floor = previous.map_or(0, |(seq, _)| seq.saturating_add(1));
        log.next_seq = snapshot.total_appended.max(floor);
        log.last_timestamp = previous.map(|(_, ts)| ts);
        Ok(log)
    }
}
