//! Client geolocation-acquisition boundary.
//!
//! Acquiring the device position is a platform capability implemented by
//! the UI shell; this module pins down the contract the notification
//! subsystem assumes: a 10 second timeout, tolerance for a cached position
//! up to 5 minutes old, and the user-deniable failure modes.

use std::time::Duration;

use crate::types::{Coord, Timestamp};

/// How long a position request may run before it fails with
/// [`LocateError::Timeout`].
pub const ACQUISITION_TIMEOUT: Duration = Duration::from_secs(10);

/// Oldest cached position the subsystem accepts in lieu of a fresh fix.
pub const MAX_CACHED_POSITION_AGE: Duration = Duration::from_secs(300);

/// A position fix as captured by the platform locator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub coord: Coord,
    pub captured_at: Timestamp,
    pub accuracy_m: Option<f64>,
}

/// Failure modes of position acquisition. All of these are expected
/// branches in the profile flow, not crashes.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    #[error("Location access denied by user")]
    PermissionDenied,

    #[error("Location information is unavailable")]
    Unavailable,

    #[error("Location request timed out")]
    Timeout,
}
