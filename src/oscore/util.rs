use alloc::vec::Vec;
use hkdf::Hkdf;
use serde_bytes::Bytes;
use sha2::Sha256;

use crate::cbor;

use super::Result;

pub const KEY_LEN: usize = 16;
pub const NONCE_LEN: usize = 13;
/// The maximum identifier length that still packs into the nonce reversibly.
pub const MAX_ID_LEN: usize = NONCE_LEN - 6;

/// Returns the CBOR encoded `info` structure.
///
/// # Arguments
/// * `id` - The sender ID or recipient ID (or empty for IV).
/// * `id_context` - The ID context distinguishing this security context,
///   e.g. a group ID, if there is one.
/// * `alg` - The COSE identifier of the AEAD algorithm.
/// * `type` - The type of keying material, e.g. "Key" or "IV".
/// * `l` - The size of the key/nonce for the AEAD, in bytes.
pub fn build_info(
    id: &[u8],
    id_context: Option<&[u8]>,
    alg: isize,
    r#type: &str,
    l: usize,
) -> Result<Vec<u8>> {
    // (id, id_context, alg_aead, type, L)
    let info = (
        Bytes::new(id),
        id_context.map(Bytes::new),
        alg,
        r#type,
        l,
    );
    // Return the CBOR encoded version of that
    Ok(cbor::encode(info)?)
}

/// Returns the derived key/IV for this `info` structure.
///
/// # Arguments
/// * `master_secret` - The master secret.
/// * `master_salt` - The master salt.
/// * `info` - The `info` structure, different for key and IV derivation.
/// * `l` - The size of the key/nonce for the AEAD used, in bytes.
pub fn hkdf(
    master_secret: &[u8],
    master_salt: &[u8],
    info: &[u8],
    l: usize,
) -> Result<Vec<u8>> {
    // This is the extract step, resulting in the pseudorandom key (PRK)
    let h = Hkdf::<Sha256>::new(Some(master_salt), master_secret);
    // Expand the PRK to the desired length output keying material (OKM)
    let mut okm = vec![0; l];
    h.expand(info, &mut okm)?;

    Ok(okm)
}

/// Returns the CBOR encoded AAD array.
///
/// There's no argument for class I options, because the standard doesn't
/// define any at this point; the caller's protocol metadata goes into
/// `external_aad` instead.
pub fn build_aad_array(
    alg: isize,
    request_kid: &[u8],
    request_piv: &[u8],
    external_aad: &[u8],
) -> Result<Vec<u8>> {
    // (oscore_version, algorithms, request_kid, request_piv, options)
    let arr = (
        1,
        [alg],
        Bytes::new(request_kid),
        Bytes::new(request_piv),
        Bytes::new(external_aad),
    );
    // Return the CBOR encoded version of that
    Ok(cbor::encode(arr)?)
}

/// Returns the AAD.
pub fn build_aad(
    alg: isize,
    request_kid: &[u8],
    request_piv: &[u8],
    external_aad: &[u8],
) -> Result<Vec<u8>> {
    // First we need to construct the AAD array containing our parameters
    let aad_arr = build_aad_array(alg, request_kid, request_piv, external_aad)?;
    // Then we pack it into an Encrypt0 structure
    let aad = ("Encrypt0", Bytes::new(&[]), Bytes::new(&aad_arr));
    // And return the encoding of that
    Ok(cbor::encode(aad)?)
}

/// Returns the nonce for the AEAD.
pub fn compute_nonce(
    mut piv: &[u8],
    mut id_piv: &[u8],
    common_iv: &[u8; NONCE_LEN],
) -> [u8; NONCE_LEN] {
    // Since id_piv could be longer than it should, trim it if necessary
    if id_piv.len() > MAX_ID_LEN {
        id_piv = &id_piv[id_piv.len() - MAX_ID_LEN..]
    }
    // Same for the piv itself
    if piv.len() > 5 {
        piv = &piv[piv.len() - 5..];
    }

    let mut nonce = [0; NONCE_LEN];
    // Left-pad the Partial IV (PIV) with zeros to exactly 5 bytes
    nonce[NONCE_LEN - piv.len()..].copy_from_slice(piv);
    // Left-pad ID_PIV with zeros to exactly nonce length minus 6 bytes
    nonce[1 + NONCE_LEN - 6 - id_piv.len()..NONCE_LEN - 5]
        .copy_from_slice(id_piv);
    // Add the size of the ID_PIV (a single byte S)
    nonce[0] = id_piv.len() as u8;
    // XOR with common IV
    for (b1, b2) in nonce.iter_mut().zip(common_iv.iter()) {
        *b1 ^= b2;
    }

    nonce
}

/// Returns the `piv` as a u64.
pub fn piv_to_u64(mut piv: &[u8]) -> u64 {
    // Trim piv if it's too long
    if piv.len() > 8 {
        piv = &piv[piv.len() - 8..];
    }
    // Copy piv into an appropriately sized array
    let mut piv_arr = [0; 8];
    piv_arr[8 - piv.len()..].copy_from_slice(piv);

    u64::from_be_bytes(piv_arr)
}

/// Returns the `piv` in its correct format (no leading zero bytes).
pub fn format_piv(piv: u64) -> Vec<u8> {
    // Convert the sender sequence number to its byte representation
    let bytes = piv.to_be_bytes();
    // Find the index of the first byte that is not zero
    let first_nonzero = bytes.iter().position(|&x| x != 0);
    match first_nonzero {
        // If there is one, skip leading zero bytes and return the others
        Some(n) => bytes[n..].to_vec(),
        // If there isn't, we simply return 0
        None => vec![0x00],
    }
}
