//! OS status codes.

use std::fmt;

/// A status code returned by, or reported to, the Apple Event Manager.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OsStatus(pub i32);

impl OsStatus {
    /// `noErr`.
    pub const NO_ERR: Self = Self(0);
    /// `errAEDescNotFound`.
    pub const DESC_NOT_FOUND: Self = Self(-1701);
    /// `errAEEventNotHandled`.
    pub const EVENT_NOT_HANDLED: Self = Self(-1708);
    /// `errAEEventFailed`, the generic failure reported for handler errors.
    pub const EVENT_FAILED: Self = Self(-10000);

    /// Whether this is `noErr`.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }

    /// Convert a raw status into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the status itself when it is not `noErr`.
    pub const fn check(self) -> Result<(), Self> {
        if self.is_ok() { Ok(()) } else { Err(self) }
    }

    fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("noErr"),
            -1701 => Some("errAEDescNotFound"),
            -1708 => Some("errAEEventNotHandled"),
            -10000 => Some("errAEEventFailed"),
            _ => None,
        }
    }
}

impl fmt::Display for OsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({})", self.0),
            None => write!(f, "OSStatus {}", self.0),
        }
    }
}

impl fmt::Debug for OsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<i16> for OsStatus {
    fn from(err: i16) -> Self {
        Self(i32::from(err))
    }
}
