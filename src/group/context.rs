use alloc::{
    collections::{btree_map::Entry, BTreeMap},
    sync::Arc,
    vec::Vec,
};

use super::{error::Error, sig, Result};
use crate::oscore::{
    self, util, Algorithm, ProtectedMessage, SecurityContext,
};

/// How a protected message is addressed.
///
/// The mode is always an explicit parameter, never inferred from the
/// message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode<'a> {
    /// Addressed to the whole group. The message carries a countersignature
    /// from the sender, since the encryption key is shared by all members.
    Group,
    /// Addressed to a single member through a one-to-one derived context.
    /// No countersignature.
    Pairwise {
        /// The member the message is addressed to.
        recipient: &'a [u8],
    },
}

/// A member's public key material.
#[derive(Debug, Clone, PartialEq)]
struct Member {
    verify_key: [u8; 32],
}

/// The security context shared by the members of one multicast group.
///
/// Holds the group encryption key every member derives identically, the
/// membership map from member ID to that member's signature verification
/// key, and one security context per member for the sequence and replay
/// bookkeeping of that member's traffic. Pairwise contexts are derived on
/// first use per (sender, recipient) pair.
///
/// The membership map is an immutable snapshot behind an `Arc`, replaced
/// wholesale on every change, so a verification holding the previous
/// snapshot never observes a half-updated member set. Each member present
/// in the map has a security context; both are maintained together by
/// `add_member` and `remove_member`.
#[derive(Debug)]
pub struct GroupContext {
    group_id: Vec<u8>,
    algorithm: Algorithm,
    master_salt: Vec<u8>,
    group_encryption_key: Vec<u8>,
    members: Arc<BTreeMap<Vec<u8>, Member>>,
    contexts: BTreeMap<Vec<u8>, SecurityContext>,
    pairwise: BTreeMap<(Vec<u8>, Vec<u8>), SecurityContext>,
}

impl GroupContext {
    /// Creates a new `GroupContext` without members.
    ///
    /// Expands the group encryption key from the master secret, keyed by
    /// the group ID. Derivation is deterministic, so every member reaches
    /// the same key material from the same out-of-band configuration.
    ///
    /// # Arguments
    /// * `group_id` - The ID of the group, used as ID context in all
    ///   derivations.
    /// * `master_secret` - The shared master secret.
    /// * `master_salt` - The shared master salt.
    /// * `algorithm` - The COSE identifier of the AEAD to use.
    pub fn new(
        group_id: Vec<u8>,
        master_secret: &[u8],
        master_salt: &[u8],
        algorithm: isize,
    ) -> Result<GroupContext> {
        let algorithm = Algorithm::from_cose(algorithm)?;
        if master_secret.is_empty() {
            return Err(Error::Context(oscore::Error::InvalidParameters));
        }

        let group_encryption_key = util::hkdf(
            master_secret,
            master_salt,
            &util::build_info(
                &[],
                Some(&group_id),
                algorithm.cose_id(),
                "Group Encryption Key",
                util::KEY_LEN,
            )?,
            util::KEY_LEN,
        )?;

        Ok(GroupContext {
            group_id,
            algorithm,
            master_salt: master_salt.to_vec(),
            group_encryption_key,
            members: Arc::new(BTreeMap::new()),
            contexts: BTreeMap::new(),
            pairwise: BTreeMap::new(),
        })
    }

    /// Adds a member with its signature verification key, deriving its
    /// security context.
    pub fn add_member(
        &mut self,
        member_id: Vec<u8>,
        verify_key: [u8; 32],
    ) -> Result<()> {
        let context = SecurityContext::derive(
            &self.group_encryption_key,
            &self.master_salt,
            member_id.clone(),
            member_id.clone(),
            Some(self.group_id.clone()),
            self.algorithm.cose_id(),
        )?;

        // Replace the snapshot wholesale instead of mutating it in place
        let mut members = BTreeMap::clone(&self.members);
        members.insert(member_id.clone(), Member { verify_key });
        self.members = Arc::new(members);
        self.contexts.insert(member_id, context);

        Ok(())
    }

    /// Removes a member, dropping its verification key and contexts.
    ///
    /// Returns whether the member was present. No rekeying happens; a
    /// deployment that needs to lock a departed member out of future
    /// traffic rotates the whole group context by re-derivation.
    pub fn remove_member(&mut self, member_id: &[u8]) -> bool {
        if !self.members.contains_key(member_id) {
            return false;
        }

        let mut members = BTreeMap::clone(&self.members);
        members.remove(member_id);
        self.members = Arc::new(members);
        self.contexts.remove(member_id);
        self.pairwise.retain(|(sender, recipient), _| {
            sender.as_slice() != member_id
                && recipient.as_slice() != member_id
        });

        true
    }

    /// Whether the given ID is in the current membership snapshot.
    pub fn is_member(&self, member_id: &[u8]) -> bool {
        self.members.contains_key(member_id)
    }

    /// The ID of the group.
    pub fn group_id(&self) -> &[u8] {
        &self.group_id
    }

    /// Returns a protected message from the given member.
    ///
    /// In group mode the member's own context protects the payload and a
    /// countersignature with the caller's signing key is attached; the
    /// signing key is never stored here. In pairwise mode the one-to-one
    /// context towards the recipient protects the payload and the signing
    /// key goes unused.
    ///
    /// # Arguments
    /// * `sender_id` - The member producing the message.
    /// * `signing_key` - The member's ed25519 key pair bytes.
    /// * `plaintext` - The payload to protect.
    /// * `associated_data` - Protocol metadata to bind into the tag.
    /// * `mode` - Group-wide or pairwise delivery.
    pub fn protect(
        &mut self,
        sender_id: &[u8],
        signing_key: &[u8],
        plaintext: &[u8],
        associated_data: &[u8],
        mode: Mode,
    ) -> Result<ProtectedMessage> {
        if !self.members.contains_key(sender_id) {
            return Err(Error::UnknownSender);
        }

        match mode {
            Mode::Group => {
                let context = self
                    .contexts
                    .get_mut(sender_id)
                    .ok_or(Error::UnknownSender)?;
                let mut message =
                    context.protect(plaintext, associated_data)?;

                // The signature binds the same AAD as the AEAD, so the
                // sender ID and sequence number are covered too
                let aad = util::build_aad(
                    self.algorithm.cose_id(),
                    message.sender_id(),
                    message.partial_iv(),
                    associated_data,
                )?;
                let signature =
                    sig::sign(&aad, message.ciphertext(), signing_key)?;
                message.attach_signature(signature.to_vec());

                Ok(message)
            }
            Mode::Pairwise { recipient } => {
                if !self.members.contains_key(recipient) {
                    return Err(Error::UnknownSender);
                }
                let context = self.pairwise_context(sender_id, recipient)?;
                Ok(context.protect(plaintext, associated_data)?)
            }
        }
    }

    /// Returns the plaintext protected in a message from a group member.
    ///
    /// The sender is looked up in the membership snapshot. In group mode
    /// the countersignature is verified against the member's public key
    /// before any AEAD work, rejecting forged senders early; pairwise mode
    /// uses the one-to-one context of the addressed recipient.
    pub fn unprotect(
        &mut self,
        message: &ProtectedMessage,
        associated_data: &[u8],
        mode: Mode,
    ) -> Result<Vec<u8>> {
        let sender_id = message.sender_id();
        let verify_key = self
            .members
            .get(sender_id)
            .ok_or(Error::UnknownSender)?
            .verify_key;

        match mode {
            Mode::Group => {
                let signature =
                    message.signature().ok_or(Error::SignatureInvalid)?;
                let aad = util::build_aad(
                    self.algorithm.cose_id(),
                    sender_id,
                    message.partial_iv(),
                    associated_data,
                )?;
                sig::verify(
                    &aad,
                    message.ciphertext(),
                    &verify_key,
                    signature,
                )?;

                let context = self
                    .contexts
                    .get_mut(sender_id)
                    .ok_or(Error::UnknownSender)?;
                Ok(context.unprotect(message, associated_data)?)
            }
            Mode::Pairwise { recipient } => {
                if !self.members.contains_key(recipient) {
                    return Err(Error::UnknownSender);
                }
                let context = self.pairwise_context(recipient, sender_id)?;
                Ok(context.unprotect(message, associated_data)?)
            }
        }
    }

    /// The context for one ordered (owner, peer) pair, derived on first
    /// use.
    fn pairwise_context(
        &mut self,
        owner: &[u8],
        peer: &[u8],
    ) -> Result<&mut SecurityContext> {
        match self.pairwise.entry((owner.to_vec(), peer.to_vec())) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let context = SecurityContext::derive_pairwise(
                    &self.group_encryption_key,
                    &self.master_salt,
                    owner.to_vec(),
                    peer.to_vec(),
                    Some(self.group_id.clone()),
                    self.algorithm,
                )?;
                Ok(entry.insert(context))
            }
        }
    }
}
