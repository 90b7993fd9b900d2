//! Response latency between a message and its reply.

use std::fmt;

use chrono::TimeDelta;

use super::Timestamp;

/// Text shown when a latency cannot be computed.
pub const NOT_AVAILABLE: &str = "not available";

/// Time elapsed between a message being sent and its reply.
///
/// Only computed when both timestamps are present. A missing timestamp
/// yields [`ResponseLatency::NotAvailable`]; no arithmetic is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseLatency {
    /// `reply - send`. Negative when the reply predates the send.
    Available(TimeDelta),
    /// One or both timestamps are missing.
    NotAvailable,
}

impl ResponseLatency {
    /// Computes the latency from optional send/reply timestamps.
    pub fn between(send: Option<Timestamp>, reply: Option<Timestamp>) -> Self {
        match (send, reply) {
            (Some(send), Some(reply)) => Self::Available(reply.since(send)),
            _ => Self::NotAvailable,
        }
    }

    /// Returns `true` if a duration is available.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Returns the duration, if available.
    pub fn duration(&self) -> Option<TimeDelta> {
        match self {
            Self::Available(d) => Some(*d),
            Self::NotAvailable => None,
        }
    }

    /// Returns the whole seconds, if available.
    pub fn seconds(&self) -> Option<i64> {
        self.duration().map(|d| d.num_seconds())
    }
}

impl fmt::Display for ResponseLatency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delta = match self {
            Self::Available(d) => *d,
            Self::NotAvailable => return f.write_str(NOT_AVAILABLE),
        };

        let total = delta.num_seconds();
        let sign = if total < 0 { "-" } else { "" };
        let total = total.unsigned_abs();
        let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

        if hours > 0 {
            write!(f, "{}{}h {}m {}s", sign, hours, minutes, seconds)
        } else if minutes > 0 {
            write!(f, "{}{}m {}s", sign, minutes, seconds)
        } else {
            write!(f, "{}{}s", sign, seconds)
        }
    }
}
