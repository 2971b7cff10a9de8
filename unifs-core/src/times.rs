//! Timestamp handling
//!
//! Drivers store every timestamp in UTC. Local-time accessors on the contract
//! are pure conversions at the call boundary; the stored value never changes
//! representation, so converting to local time and back reproduces the
//! original instant exactly.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Convert a canonical UTC timestamp for a local-time accessor
pub fn to_local(utc: DateTime<Utc>) -> DateTime<Local> {
    utc.with_timezone(&Local)
}

/// Convert a caller-supplied local timestamp back to canonical UTC
pub fn to_utc(local: DateTime<Local>) -> DateTime<Utc> {
    local.with_timezone(&Utc)
}

/// The timestamp triple carried by every entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTimes {
    pub creation: DateTime<Utc>,
    pub last_access: DateTime<Utc>,
    pub last_write: DateTime<Utc>,
}

impl FileTimes {
    /// All three stamps set to the same instant, as for a freshly created entry
    pub fn all_at(instant: DateTime<Utc>) -> Self {
        Self {
            creation: instant,
            last_access: instant,
            last_write: instant,
        }
    }
}
