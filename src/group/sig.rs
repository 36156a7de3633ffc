//! Countersignatures over protected messages.

use alloc::vec::Vec;
use ed25519_dalek::{Keypair, PublicKey, Signature};
use serde_bytes::Bytes;
use sha2::Sha512;

use crate::cbor;

use super::Result;

/// Returns the signature over the `Sig_structure` binding a message's AAD
/// and ciphertext.
///
/// # Arguments
/// * `aad` - The AAD the message was protected with, which binds the
///   sender ID and sequence number.
/// * `ciphertext` - The message's ciphertext including the tag.
/// * `keypair_bytes` - The ed25519 signing key pair. First 32 bytes are the
///   secret key, the other 32 bytes the public key.
pub(crate) fn sign(
    aad: &[u8],
    ciphertext: &[u8],
    keypair_bytes: &[u8],
) -> Result<[u8; 64]> {
    let to_be_signed = build_to_be_signed(aad, ciphertext)?;
    let keypair = Keypair::from_bytes(keypair_bytes)?;
    let signature = keypair.sign::<Sha512>(&to_be_signed);

    Ok(signature.to_bytes())
}

/// Checks if the signature was made on the `Sig_structure` of the given
/// data, with the given key.
pub(crate) fn verify(
    aad: &[u8],
    ciphertext: &[u8],
    public_key: &[u8],
    signature: &[u8],
) -> Result<()> {
    let to_be_signed = build_to_be_signed(aad, ciphertext)?;
    let public_key = PublicKey::from_bytes(public_key)?;
    let signature = Signature::from_bytes(signature)?;

    Ok(public_key.verify::<Sha512>(&to_be_signed, &signature)?)
}

/// Returns the COSE `Sig_structure` used as input to the signature
/// algorithm.
fn build_to_be_signed(aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    // (context, external_aad, payload)
    let sig_struct =
        ("CounterSignature0", Bytes::new(aad), Bytes::new(ciphertext));
    // Return the CBOR encoded version of that
    Ok(cbor::encode(sig_struct)?)
}
