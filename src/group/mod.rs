//! Group OSCORE: one shared group context fanning out protection across
//! per-member security contexts, with countersignatures identifying the
//! sender.

mod context;
mod error;
mod sig;
#[cfg(test)]
mod test_keys;

pub use context::{GroupContext, Mode};
pub use error::Error;

/// The result type for the `group` module.
pub type Result<T> = core::result::Result<T, Error>;
