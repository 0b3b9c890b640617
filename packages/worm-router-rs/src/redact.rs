//! Redaction of wallet secrets in logs and serialized output.
//!
//! Private keys are read from the environment and carried through config
//! structs that get logged with `{:?}`. Wrap them in [`Redacted`] so they
//! print as `"<redacted>"`.

use std::fmt::{self, Debug, Display};

/// Wrapper that hides its inner value from `Debug`, `Display` and `Serialize`.
///
/// ```ignore
/// use worm_router_rs::redact::Redacted;
///
/// let key = Redacted("0xac09...".to_string());
/// tracing::info!(key = %key, "Loaded wallet");
/// // Logs: key = <redacted>
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Redacted<T>(pub T);

impl<T> Redacted<T> {
    /// Access the secret. Never pass the result to a formatter.
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl<T> Debug for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl<T> Display for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl<T> serde::Serialize for Redacted<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        "<redacted>".serialize(serializer)
    }
}
