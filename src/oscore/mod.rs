//! OSCORE security contexts: derivation, message protection and replay
//! bookkeeping.

mod context;
mod error;
mod message;
mod replay;
#[cfg(test)]
mod test_vectors;
pub(crate) mod util;

pub use context::{Algorithm, SecurityContext};
pub use error::Error;
pub use message::ProtectedMessage;
pub use replay::{ReplayWindow, DEFAULT_WINDOW_SIZE, MAX_SEQUENCE_NUMBER};

/// The result type for the `oscore` module.
pub type Result<T> = core::result::Result<T, Error>;
