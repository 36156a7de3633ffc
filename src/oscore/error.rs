use core::{fmt, mem};
#[cfg(feature = "std")]
use std::error;

use crate::cbor;

/// The error type for context derivation and message protection.
// TODO: Derive PartialEq as soon as serde_cbor does for its error type
#[derive(Debug)]
pub enum Error {
    /// Derivation inputs are malformed or missing.
    InvalidParameters,
    /// The sender sequence number space is used up and the context must be
    /// rotated.
    SequenceExhausted,
    /// The authentication tag doesn't verify.
    AuthenticationFailed,
    /// This sequence number has been received already.
    Replayed,
    /// The sequence number is below the replay window.
    TooOld,
    /// The message bytes can't be parsed.
    MalformedMessage,
    /// Wraps errors from the `cbor` module.
    Cbor(cbor::CborError),
    /// Wraps errors from `hkdf`.
    Hkdf(hkdf::InvalidLength),
}

// Compares by variant, since the wrapped library errors don't implement
// PartialEq themselves.
impl PartialEq for Error {
    fn eq(&self, other: &Error) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

impl From<cbor::CborError> for Error {
    fn from(e: cbor::CborError) -> Error {
        Error::Cbor(e)
    }
}

impl From<hkdf::InvalidLength> for Error {
    fn from(e: hkdf::InvalidLength) -> Error {
        Error::Hkdf(e)
    }
}

impl From<ccm::aead::Error> for Error {
    fn from(_: ccm::aead::Error) -> Error {
        Error::AuthenticationFailed
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidParameters => {
                write!(f, "Derivation inputs are malformed or missing")
            }
            Error::SequenceExhausted => {
                write!(f, "Sender sequence numbers are used up")
            }
            Error::AuthenticationFailed => {
                write!(f, "The authentication tag doesn't verify")
            }
            Error::Replayed => {
                write!(f, "This sequence number has been received already")
            }
            Error::TooOld => {
                write!(f, "The sequence number is below the replay window")
            }
            Error::MalformedMessage => {
                write!(f, "The message bytes can't be parsed")
            }
            Error::Cbor(e) => e.fmt(f),
            Error::Hkdf(e) => e.fmt(f),
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Cbor(e) => Some(e),
            Error::Hkdf(e) => Some(e),
            // Other errors that don't wrap anything
            _ => None,
        }
    }
}
