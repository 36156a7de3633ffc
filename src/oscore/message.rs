//! The protected message envelope exchanged with the transport layer.

use alloc::vec::Vec;

use super::{error::Error, util, Result};

/// Number of bits of the flag byte holding the partial IV length.
const PIV_LEN_MASK: u8 = 0b0000_0111;
/// Flag bit indicating the sender ID (kid) is present.
const FLAG_KID: u8 = 0b0000_1000;
/// Flag bit indicating a countersignature is present.
const FLAG_SIGNATURE: u8 = 0b0010_0000;

/// The length of an attached countersignature.
pub(crate) const SIGNATURE_LEN: usize = 64;

/// A protected message: the sender ID, the sequence number as partial IV,
/// the ciphertext with its trailing authentication tag, and in group mode a
/// countersignature.
///
/// Immutable once produced. The replay window on the receiving side makes
/// sure it's accepted at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtectedMessage {
    kid: Vec<u8>,
    partial_iv: Vec<u8>,
    ciphertext: Vec<u8>,
    signature: Option<Vec<u8>>,
}

impl ProtectedMessage {
    pub(crate) fn new(
        kid: Vec<u8>,
        partial_iv: Vec<u8>,
        ciphertext: Vec<u8>,
    ) -> ProtectedMessage {
        ProtectedMessage {
            kid,
            partial_iv,
            ciphertext,
            signature: None,
        }
    }

    /// The ID of the member or endpoint that produced this message.
    pub fn sender_id(&self) -> &[u8] {
        &self.kid
    }

    /// The sequence number the sender used for this message.
    pub fn sequence_number(&self) -> u64 {
        util::piv_to_u64(&self.partial_iv)
    }

    /// The sequence number in its partial IV byte representation.
    pub fn partial_iv(&self) -> &[u8] {
        &self.partial_iv
    }

    /// The encrypted payload including the authentication tag.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// The countersignature, present only on group-wide messages.
    pub fn signature(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }

    pub(crate) fn attach_signature(&mut self, signature: Vec<u8>) {
        self.signature = Some(signature);
    }

    /// Returns the bytes ready to be placed in the transport envelope.
    ///
    /// The layout is the OSCORE option encoding: a flag byte carrying the
    /// partial IV length and the kid/signature presence bits, followed by
    /// the partial IV, the length-prefixed kid, the signature if there is
    /// one and finally the ciphertext.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(
            2 + self.partial_iv.len()
                + self.kid.len()
                + self.signature.as_ref().map_or(0, |s| s.len())
                + self.ciphertext.len(),
        );
        let mut flags = (self.partial_iv.len() as u8 & PIV_LEN_MASK)
            | FLAG_KID;
        if self.signature.is_some() {
            flags |= FLAG_SIGNATURE;
        }
        bytes.push(flags);
        bytes.extend_from_slice(&self.partial_iv);
        bytes.push(self.kid.len() as u8);
        bytes.extend_from_slice(&self.kid);
        if let Some(signature) = &self.signature {
            bytes.extend_from_slice(signature);
        }
        bytes.extend_from_slice(&self.ciphertext);

        bytes
    }

    /// Parses a message received from the transport layer.
    pub fn from_bytes(bytes: &[u8]) -> Result<ProtectedMessage> {
        let (&flags, mut rest) =
            bytes.split_first().ok_or(Error::MalformedMessage)?;

        // The partial IV is a sequence number, so at most 5 bytes
        let piv_len = (flags & PIV_LEN_MASK) as usize;
        if piv_len == 0 || piv_len > 5 || flags & FLAG_KID == 0 {
            return Err(Error::MalformedMessage);
        }
        if rest.len() < piv_len {
            return Err(Error::MalformedMessage);
        }
        let partial_iv = rest[..piv_len].to_vec();
        rest = &rest[piv_len..];

        let (&kid_len, mut rest) =
            rest.split_first().ok_or(Error::MalformedMessage)?;
        if rest.len() < kid_len as usize {
            return Err(Error::MalformedMessage);
        }
        let kid = rest[..kid_len as usize].to_vec();
        rest = &rest[kid_len as usize..];

        let signature = if flags & FLAG_SIGNATURE != 0 {
            if rest.len() < SIGNATURE_LEN {
                return Err(Error::MalformedMessage);
            }
            let signature = rest[..SIGNATURE_LEN].to_vec();
            rest = &rest[SIGNATURE_LEN..];
            Some(signature)
        } else {
            None
        };

        Ok(ProtectedMessage {
            kid,
            partial_iv,
            ciphertext: rest.to_vec(),
            signature,
        })
    }
}
