use core::{fmt, mem};
#[cfg(feature = "std")]
use std::error;

use crate::{cbor, oscore};

/// The error type for group message protection.
#[derive(Debug)]
pub enum Error {
    /// The message's sender is not in the member map.
    UnknownSender,
    /// The countersignature is missing or doesn't verify against the
    /// member's public key.
    SignatureInvalid,
    /// Wraps errors from the underlying security context.
    Context(oscore::Error),
}

impl PartialEq for Error {
    fn eq(&self, other: &Error) -> bool {
        match (self, other) {
            (Error::Context(a), Error::Context(b)) => a == b,
            _ => mem::discriminant(self) == mem::discriminant(other),
        }
    }
}

impl From<oscore::Error> for Error {
    fn from(e: oscore::Error) -> Error {
        Error::Context(e)
    }
}

impl From<cbor::CborError> for Error {
    fn from(e: cbor::CborError) -> Error {
        Error::Context(oscore::Error::Cbor(e))
    }
}

impl From<ed25519_dalek::SignatureError> for Error {
    fn from(_: ed25519_dalek::SignatureError) -> Error {
        Error::SignatureInvalid
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnknownSender => {
                write!(f, "The sender is not a group member")
            }
            Error::SignatureInvalid => {
                write!(f, "The countersignature doesn't verify")
            }
            Error::Context(e) => e.fmt(f),
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Context(e) => Some(e),
            _ => None,
        }
    }
}
