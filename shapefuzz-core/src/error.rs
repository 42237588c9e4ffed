//! Error types for Shapefuzz operations

use std::error::Error as StdError;

/// Boxed error returned by caller-supplied overrides
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors that can occur while drawing primitives or generating values
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remaining byte budget cannot satisfy the request
    ///
    /// Harnesses conventionally treat this as "reject the input", not as a bug.
    #[error("Insufficient bytes: requested {requested}, available {available}")]
    InsufficientBytes {
        /// The number of bytes the read needed.
        requested: usize,
        /// The number of bytes the cursor could still hand out.
        available: usize,
    },

    /// Length or position arithmetic would wrap
    #[error("Length arithmetic overflow")]
    Overflow,

    /// A private field was reached under the `Fail` field strategy
    #[error("Private field {aggregate}.{field} cannot be populated")]
    PrivateField {
        /// The type owning the field.
        aggregate: &'static str,
        /// The field name.
        field: &'static str,
    },

    /// A shape with no structural generation was reached under the `Fail` strategy
    #[error("Unknown shape: {0}")]
    UnknownShape(&'static str),

    /// A caller-supplied override returned an error
    #[error("Override for {type_name} failed: {source}")]
    Override {
        /// The type the override was registered for.
        type_name: &'static str,
        /// The override's own error.
        #[source]
        source: BoxError,
    },

    /// Generator configuration is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The input cannot be split into the requested number of calls
    #[error("Invalid call split: {0}")]
    InvalidSplit(String),
}

impl Error {
    /// Returns true if this error means the input ran out of bytes
    ///
    /// Looks through override wrapping, so an override that propagated a
    /// cursor draw failure still reads as budget exhaustion.
    pub fn is_insufficient_bytes(&self) -> bool {
        match self {
            Error::InsufficientBytes { .. } => true,
            Error::Override { source, .. } => source
                .downcast_ref::<Error>()
                .is_some_and(Error::is_insufficient_bytes),
            _ => false,
        }
    }

    pub(crate) fn insufficient(requested: usize, available: usize) -> Self {
        Error::InsufficientBytes {
            requested,
            available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_bytes_is_distinguishable() {
        assert!(Error::insufficient(4, 1).is_insufficient_bytes());
        assert!(!Error::Overflow.is_insufficient_bytes());
        assert!(!Error::UnknownShape("()").is_insufficient_bytes());
    }

    #[test]
    fn test_override_wrapping_preserves_exhaustion() {
        let wrapped = Error::Override {
            type_name: "u8",
            source: Box::new(Error::insufficient(1, 0)),
        };
        assert!(wrapped.is_insufficient_bytes());

        let other = Error::Override {
            type_name: "u8",
            source: "bad value".into(),
        };
        assert!(!other.is_insufficient_bytes());
        assert_eq!(other.to_string(), "Override for u8 failed: bad value");
    }
}
