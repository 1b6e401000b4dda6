//! Script chunks, inscription envelopes, and partitioning of envelopes across
//! chained transactions.
//!
//! Everything in this crate is pure: envelopes are built once from an
//! [`Inscription`] and partition boundaries are computed over an immutable
//! chunk sequence, so dry runs and real builds always agree.

use {
  bitcoin::{
    ScriptBuf, XOnlyPublicKey,
    constants::MAX_SCRIPT_ELEMENT_SIZE,
    opcodes::{
      self, Opcode,
      all::{
        OP_CHECKSIG, OP_ENDIF, OP_IF, OP_PUSHBYTES_0, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4,
        OP_PUSHNUM_1, OP_PUSHNUM_16,
      },
    },
  },
  std::ops::Range,
  thiserror::Error,
};

pub use {
  chunk::{Chunk, ChunkError},
  inscription::{DecodeError, Inscription},
  partition::{Plan, count_transactions, partition},
};

/// Protocol marker that opens every envelope.
pub const PROTOCOL_ID: [u8; 3] = *b"ord";

/// Tag preceding the content type in a taproot envelope.
pub const CONTENT_TYPE_TAG: [u8; 1] = [1];

/// Largest content part pushed by a legacy envelope.
pub const MAX_CHUNK_LEN: usize = 240;

/// Largest serialized partition placed in a single chained transaction.
pub const MAX_PAYLOAD_LEN: usize = 1500;

mod chunk;
mod inscription;
mod partition;
