use aes::Aes128;
use alloc::{sync::Arc, vec::Vec};
use ccm::{
    aead::{generic_array::GenericArray, Aead, NewAead, Payload},
    consts::{U13, U8},
    Ccm,
};

use super::{
    error::Error,
    message::ProtectedMessage,
    replay::{ReplayWindow, SenderSequence},
    util, Result,
};

/// The AEAD algorithms usable for message protection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// AES-CCM with a 16-byte key, 8-byte tag and 13-byte nonce.
    AesCcm16_64_128,
}

impl Algorithm {
    /// Looks up an algorithm by its COSE identifier.
    pub fn from_cose(id: isize) -> Result<Algorithm> {
        match id {
            10 => Ok(Algorithm::AesCcm16_64_128),
            _ => Err(Error::InvalidParameters),
        }
    }

    /// The COSE identifier of this algorithm.
    pub fn cose_id(self) -> isize {
        match self {
            Algorithm::AesCcm16_64_128 => 10,
        }
    }
}

/// The immutable part of a security context: identifiers and derived key
/// material.
///
/// Never mutated after derivation, so it can be shared across contexts and
/// threads behind an `Arc` without locking. The mutable counters live in
/// `SecurityContext` itself.
#[derive(Debug)]
pub(crate) struct ContextKeys {
    pub algorithm: Algorithm,
    pub sender_id: Vec<u8>,
    pub recipient_id: Vec<u8>,
    pub id_context: Option<Vec<u8>>,
    pub sender_key: [u8; util::KEY_LEN],
    pub recipient_key: [u8; util::KEY_LEN],
    pub common_iv: [u8; util::NONCE_LEN],
}

/// The security context for one ordered pair of endpoints.
///
/// Holds shared immutable key material plus the exclusively-owned mutable
/// state: the sender sequence number and the recipient replay window. All
/// mutating operations take `&mut self`, so at most one protect or
/// unprotect can be in flight per context; callers sharing a context across
/// threads serialize access themselves. Rotation on sequence exhaustion is
/// a whole-object replacement via a fresh `derive`.
#[derive(Debug)]
pub struct SecurityContext {
    keys: Arc<ContextKeys>,
    sequence: SenderSequence,
    replay: ReplayWindow,
}

impl SecurityContext {
    /// Derives a new `SecurityContext` from shared secrets.
    ///
    /// Derivation is deterministic: identical inputs yield identical key
    /// material on both endpoints. Fails with `InvalidParameters` if the
    /// master secret is empty, the algorithm is unrecognized or an
    /// identifier is too long to pack into the nonce.
    ///
    /// # Arguments
    /// * `master_secret` - The shared master secret.
    /// * `master_salt` - The shared master salt.
    /// * `sender_id` - Our ID for this context.
    /// * `recipient_id` - The peer's ID for this context.
    /// * `id_context` - The ID context distinguishing this security
    ///   context, e.g. a group ID, if there is one.
    /// * `algorithm` - The COSE identifier of the AEAD to use.
    pub fn derive(
        master_secret: &[u8],
        master_salt: &[u8],
        sender_id: Vec<u8>,
        recipient_id: Vec<u8>,
        id_context: Option<Vec<u8>>,
        algorithm: isize,
    ) -> Result<SecurityContext> {
        let algorithm = Algorithm::from_cose(algorithm)?;
        let sender_info = sender_id.clone();
        let recipient_info = recipient_id.clone();
        SecurityContext::derive_parts(
            master_secret,
            master_salt,
            algorithm,
            sender_id,
            recipient_id,
            id_context,
            &sender_info,
            &recipient_info,
            "Key",
        )
    }

    /// Derives a one-to-one context whose keys bind both endpoint
    /// identifiers, so they are distinct per ordered pair and from any
    /// group-mode key.
    pub(crate) fn derive_pairwise(
        master_secret: &[u8],
        master_salt: &[u8],
        sender_id: Vec<u8>,
        recipient_id: Vec<u8>,
        id_context: Option<Vec<u8>>,
        algorithm: Algorithm,
    ) -> Result<SecurityContext> {
        let sender_info = pair_info_id(&sender_id, &recipient_id);
        let recipient_info = pair_info_id(&recipient_id, &sender_id);
        SecurityContext::derive_parts(
            master_secret,
            master_salt,
            algorithm,
            sender_id,
            recipient_id,
            id_context,
            &sender_info,
            &recipient_info,
            "Pairwise Key",
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn derive_parts(
        master_secret: &[u8],
        master_salt: &[u8],
        algorithm: Algorithm,
        sender_id: Vec<u8>,
        recipient_id: Vec<u8>,
        id_context: Option<Vec<u8>>,
        sender_info_id: &[u8],
        recipient_info_id: &[u8],
        key_type: &str,
    ) -> Result<SecurityContext> {
        if master_secret.is_empty()
            || sender_id.len() > util::MAX_ID_LEN
            || recipient_id.len() > util::MAX_ID_LEN
        {
            return Err(Error::InvalidParameters);
        }

        let id_context_ref = id_context.as_deref();
        // Derive the keys and IV
        let sender_key_vec = util::hkdf(
            master_secret,
            master_salt,
            &util::build_info(
                sender_info_id,
                id_context_ref,
                algorithm.cose_id(),
                key_type,
                util::KEY_LEN,
            )?,
            util::KEY_LEN,
        )?;
        let recipient_key_vec = util::hkdf(
            master_secret,
            master_salt,
            &util::build_info(
                recipient_info_id,
                id_context_ref,
                algorithm.cose_id(),
                key_type,
                util::KEY_LEN,
            )?,
            util::KEY_LEN,
        )?;
        let common_iv_vec = util::hkdf(
            master_secret,
            master_salt,
            &util::build_info(
                &[],
                id_context_ref,
                algorithm.cose_id(),
                "IV",
                util::NONCE_LEN,
            )?,
            util::NONCE_LEN,
        )?;
        let mut sender_key = [0; util::KEY_LEN];
        sender_key.copy_from_slice(&sender_key_vec);
        let mut recipient_key = [0; util::KEY_LEN];
        recipient_key.copy_from_slice(&recipient_key_vec);
        let mut common_iv = [0; util::NONCE_LEN];
        common_iv.copy_from_slice(&common_iv_vec);

        Ok(SecurityContext {
            keys: Arc::new(ContextKeys {
                algorithm,
                sender_id,
                recipient_id,
                id_context,
                sender_key,
                recipient_key,
                common_iv,
            }),
            sequence: SenderSequence::new(),
            replay: ReplayWindow::default(),
        })
    }

    /// Replaces the replay window with one of the given width.
    pub fn with_replay_window(mut self, width: usize) -> SecurityContext {
        self.replay = ReplayWindow::new(width);
        self
    }

    /// Our ID for this context.
    pub fn sender_id(&self) -> &[u8] {
        &self.keys.sender_id
    }

    /// The peer's ID for this context.
    pub fn recipient_id(&self) -> &[u8] {
        &self.keys.recipient_id
    }

    /// The AEAD algorithm of this context.
    pub fn algorithm(&self) -> Algorithm {
        self.keys.algorithm
    }

    /// Returns the next sender sequence number, incrementing the counter.
    ///
    /// Taking `&mut self` means at most one caller can obtain a number at a
    /// time; two in-flight calls on one context would risk nonce reuse.
    pub fn next_sender_sequence_number(&mut self) -> Result<u64> {
        self.sequence.issue()
    }

    /// Checks a received sequence number against the replay window and
    /// records it as seen.
    ///
    /// `unprotect` calls this after successful decryption; it's public so
    /// the transport layer can also drop known duplicates before handing
    /// a message over.
    pub fn check_and_record_received(
        &mut self,
        sequence_number: u64,
    ) -> Result<()> {
        self.replay.check_and_record(sequence_number)
    }

    /// Returns the protected message for the given plaintext.
    ///
    /// The associated data is bound into the authentication tag, so
    /// tampering with protocol metadata invalidates the message. Every
    /// call consumes a fresh sequence number, including retransmissions of
    /// identical plaintext.
    pub fn protect(
        &mut self,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<ProtectedMessage> {
        // Store piv for this execution
        let sequence_number = self.next_sender_sequence_number()?;
        let piv = util::format_piv(sequence_number);

        // Compute the AAD
        let aad = util::build_aad(
            self.keys.algorithm.cose_id(),
            &self.keys.sender_id,
            &piv,
            associated_data,
        )?;

        // Build nonce from own sender context
        let nonce = util::compute_nonce(
            &piv,
            &self.keys.sender_id,
            &self.keys.common_iv,
        );

        // Encrypt the payload
        let ccm: Ccm<Aes128, U8, U13> =
            Ccm::new(GenericArray::from_slice(&self.keys.sender_key));
        let ciphertext = ccm.encrypt(
            &nonce.into(),
            Payload {
                aad: &aad,
                msg: plaintext,
            },
        )?;

        Ok(ProtectedMessage::new(
            self.keys.sender_id.clone(),
            piv,
            ciphertext,
        ))
    }

    /// Returns the plaintext protected in the given message.
    ///
    /// The nonce is rebuilt from the message's own sender ID and sequence
    /// number, so it is bit-exact with the one the sender used. A tag
    /// mismatch fails with `AuthenticationFailed` without revealing
    /// anything; a verified but repeated or stale sequence number discards
    /// the plaintext and fails with `Replayed`/`TooOld`.
    pub fn unprotect(
        &mut self,
        message: &ProtectedMessage,
        associated_data: &[u8],
    ) -> Result<Vec<u8>> {
        // Compute the AAD
        let aad = util::build_aad(
            self.keys.algorithm.cose_id(),
            message.sender_id(),
            message.partial_iv(),
            associated_data,
        )?;

        // Compute the nonce
        let nonce = util::compute_nonce(
            message.partial_iv(),
            message.sender_id(),
            &self.keys.common_iv,
        );

        // Decrypt the payload
        let ccm: Ccm<Aes128, U8, U13> =
            Ccm::new(GenericArray::from_slice(&self.keys.recipient_key));
        let plaintext = ccm.decrypt(
            &nonce.into(),
            Payload {
                aad: &aad,
                msg: message.ciphertext(),
            },
        )?;

        // Replay rejection is a separate gate after authenticity: the tag
        // verified, but a repeated or stale sequence number still discards
        // the plaintext
        self.check_and_record_received(message.sequence_number())?;

        Ok(plaintext)
    }

    #[cfg(test)]
    pub fn set_sender_sequence_number(&mut self, n: u64) {
        self.sequence.set(n);
    }

    #[cfg(test)]
    pub(crate) fn keys(&self) -> &ContextKeys {
        &self.keys
    }
}

/// The info ID binding both endpoints of a pairwise context, sender first.
fn pair_info_id(first: &[u8], second: &[u8]) -> Vec<u8> {
    let mut id = Vec::with_capacity(1 + first.len() + second.len());
    id.push(first.len() as u8);
    id.extend_from_slice(first);
    id.extend_from_slice(second);
    id
}
