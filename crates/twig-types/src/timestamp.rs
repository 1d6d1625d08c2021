use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Seal time of a commit.
///
/// Combines a wall-clock component with a logical counter. Two commits sealed
/// within the same millisecond still get distinct, ordered timestamps when the
/// repository bumps the counter.
///
/// Ordering: `physical_ms` → `logical` (total order).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Wall-clock milliseconds since UNIX epoch.
    pub physical_ms: u64,
    /// Logical counter for commits at the same physical time.
    pub logical: u32,
}

impl Timestamp {
    /// Create a timestamp with explicit values.
    pub const fn new(physical_ms: u64, logical: u32) -> Self {
        Self {
            physical_ms,
            logical,
        }
    }

    /// A timestamp at the given millisecond with a zero counter.
    pub const fn from_millis(physical_ms: u64) -> Self {
        Self::new(physical_ms, 0)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        let physical_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self::from_millis(physical_ms)
    }

    /// The zero timestamp (UNIX epoch).
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// The next timestamp within the same millisecond.
    pub fn successor(&self) -> Self {
        match self.logical.checked_add(1) {
            Some(logical) => Self::new(self.physical_ms, logical),
            None => Self::from_millis(self.physical_ms.saturating_add(1)),
        }
    }

    /// Returns `true` if this timestamp sorts strictly after `other`.
    pub fn is_after(&self, other: &Self) -> bool {
        self > other
    }

    /// Returns `true` if this timestamp sorts strictly before `other`.
    pub fn is_before(&self, other: &Self) -> bool {
        self < other
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.physical_ms
            .cmp(&other.physical_ms)
            .then(self.logical.cmp(&other.logical))
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ms.{})", self.physical_ms, self.logical)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.physical_ms, self.logical)
    }
}
