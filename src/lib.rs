//! An [OSCORE](https://tools.ietf.org/html/rfc8613) security-context engine
//! with a group extension, intended for embedded devices.
//!
//! The crate covers the security envelope only: deriving symmetric security
//! contexts from a shared master secret, protecting and unprotecting
//! individual messages with AEAD and replay protection, and fanning out
//! protect/unprotect calls across the per-sender contexts of a multicast
//! group with Ed25519 countersignatures. Message framing, retransmission and
//! credential storage belong to the transport and configuration layers,
//! which hand this crate raw message bytes and out-of-band key material.
//!
//! ## Security
//! This should **not currently be used in production code**, use at your own
//! risk.

#![no_std]
#[macro_use]
extern crate alloc;

mod cbor;

pub mod group;
pub mod oscore;
