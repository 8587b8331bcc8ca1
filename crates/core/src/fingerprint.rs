//! Canonical identity keys for game states.
//!
//! A fingerprint is the complete binary encoding of a state, so two states
//! share a fingerprint exactly when they serialize identically. No symmetry
//! folding is done: mirrored positions are distinct keys.

use crate::Result;
use serde::Serialize;
use std::fmt;

/// Exact identity key for a game state.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(Box<[u8]>);

impl Fingerprint {
    /// Wrap an already canonical byte encoding.
    pub fn from_bytes(bytes: impl Into<Box<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// The raw encoding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the encoding in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the encoding of a zero-sized state.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self)
    }
}

/// Compute the fingerprint of a state.
///
/// Uses the full bincode encoding of the state. The encoding is deterministic
/// for a given type, so structurally equal states always produce equal keys.
///
/// # Errors
/// Returns `CoreError::Fingerprint` if the state cannot be serialized
/// (for example a custom `Serialize` impl that reports an error).
pub fn fingerprint<S: Serialize + ?Sized>(state: &S) -> Result<Fingerprint> {
    let bytes = bincode::serialize(state)?;
    Ok(Fingerprint(bytes.into_boxed_slice()))
}
