//! Helpful functionality around the `serde_cbor` crate.

use alloc::vec::Vec;
use core::{cmp, result};
use serde::Serialize;
use serde_cbor::{ser::Write, Serializer};

mod error;
pub use error::CborError;

/// The result type for the `cbor` module.
pub type Result<T> = core::result::Result<T, CborError>;

/// Implements the `Write` trait from `serde_cbor` using a `Vec<u8>`.
///
/// It allocates when necessary, so can be used for indefinite-length data,
/// unlike `SliceWrite`.
struct VecWrite {
    vec: Vec<u8>,
}

impl VecWrite {
    /// Constructs a new `VecWrite` based on a 128 byte `Vec<u8>`.
    pub fn new() -> VecWrite {
        VecWrite::with_capacity(128)
    }

    /// Constructs a new `VecWrite` based on a `Vec<u8>` of specified capacity.
    pub fn with_capacity(capacity: usize) -> VecWrite {
        VecWrite {
            vec: Vec::with_capacity(capacity),
        }
    }

    /// Extracts a slice containing the entire vector.
    pub fn as_slice(&self) -> &[u8] {
        &self.vec
    }
}

impl Write for VecWrite {
    type Error = serde_cbor::Error;

    fn write_all(&mut self, buf: &[u8]) -> result::Result<(), Self::Error> {
        if self.vec.capacity() - self.vec.len() < buf.len() {
            // Allocate to make sure we have either at least 128 bytes free
            // space, or if what we're trying to insert is larger than that,
            // make room for it and 8 additional bytes (for later inserts).
            self.vec.reserve(cmp::max(128, buf.len() + 8));
        }
        // Copy buffer elements into our vector
        self.vec.extend_from_slice(buf);

        Ok(())
    }
}

/// Serializes an object into CBOR.
pub fn encode(object: impl Serialize) -> Result<Vec<u8>> {
    // Initialize a writer and serializer relying on it
    let writer = VecWrite::new();
    let mut serializer = Serializer::new(writer);
    // Attempt serialization
    object.serialize(&mut serializer)?;
    let writer = serializer.into_inner();

    Ok(writer.as_slice().to_vec())
}

#[cfg(test)]
mod tests {
    use serde_bytes::Bytes;

    use super::*;

    const OUTPUT_MIXED: [u8; 24] = [
        0x84, 0x18, 0x2A, 0x6D, 0x48, 0x65, 0x6C, 0x6C, 0x6F, 0x2C, 0x20,
        0x77, 0x6F, 0x72, 0x6C, 0x64, 0x21, 0x83, 0x01, 0x02, 0x03, 0x42,
        0x04, 0x05,
    ];

    #[test]
    fn mixed() {
        let input_mixed =
            (42, "Hello, world!", (1, 2, 3), Bytes::new(&[0x04, 0x05]));
        let bytes = encode(input_mixed).unwrap();
        assert_eq!(&OUTPUT_MIXED, &bytes[..]);
    }

    #[test]
    fn vec_write() {
        let input_mixed =
            (42, "Hello, world!", (1, 2, 3), Bytes::new(&[0x04, 0x05]));

        // Initialize the writer with one byte less than necessary, so there's
        // one reallocation
        let writer = VecWrite::with_capacity(23);
        let mut serializer = Serializer::new(writer);
        input_mixed.serialize(&mut serializer).unwrap();
        let writer = serializer.into_inner();
        assert_eq!(&OUTPUT_MIXED, writer.as_slice());
    }
}
