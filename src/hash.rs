// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Block-level access to the SHA-1 compression primitive.
//!
//! The random oracle and the PRNG cannot go through a generic digest API:
//! they need to drive the compression function one 64-byte block at a time
//! (the oracle rewrites part of the first block per derived stream). This
//! module wraps `sha1::compress` together with a small streamer that
//! buffers partial blocks and applies the standard Merkle-Damgård length
//! finalization.

use sha1::digest::core_api::Block;
use sha1::Sha1Core;
use zeroize::Zeroize;

pub(crate) const BLOCK_LEN: usize = 64;
pub(crate) const DIGEST_LEN: usize = 20;

/// Standard SHA-1 initial state.
pub(crate) const INITIAL_STATE: [u32; 5] =
    [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476, 0xc3d2_e1f0];

/// Run the compression function over one block.
pub(crate) fn compress_block(state: &mut [u32; 5], block: &[u8; BLOCK_LEN]) {
    let block = Block::<Sha1Core>::clone_from_slice(block);
    sha1::compress(state, core::slice::from_ref(&block));
}

/// Serialize a 5-word state as the standard big-endian 20-byte digest.
pub(crate) fn state_to_bytes(state: &[u32; 5]) -> [u8; DIGEST_LEN] {
    let mut out = [0u8; DIGEST_LEN];
    for (chunk, word) in out.chunks_exact_mut(4).zip(state) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    out
}

/// Buffers input into 64-byte blocks and hands each complete block to a
/// consumer. `finish` appends the `0x80` padding byte and the 64-bit bit
/// count (big- or little-endian) exactly like the underlying hash would.
pub(crate) struct BlockStream {
    count: u64,
    buf: [u8; BLOCK_LEN],
}

impl BlockStream {
    pub(crate) fn new() -> Self {
        Self {
            count: 0,
            buf: [0u8; BLOCK_LEN],
        }
    }

    pub(crate) fn update(&mut self, data: &[u8], mut consume: impl FnMut(&[u8; BLOCK_LEN])) {
        let mut fill = (self.count % BLOCK_LEN as u64) as usize;
        self.count += data.len() as u64;

        let mut rest = data;
        if fill != 0 {
            let take = rest.len().min(BLOCK_LEN - fill);
            self.buf[fill..fill + take].copy_from_slice(&rest[..take]);
            fill += take;
            rest = &rest[take..];
            if fill < BLOCK_LEN {
                return;
            }
            consume(&self.buf);
        }

        let mut chunks = rest.chunks_exact(BLOCK_LEN);
        for chunk in &mut chunks {
            let mut block = [0u8; BLOCK_LEN];
            block.copy_from_slice(chunk);
            consume(&block);
            block.zeroize();
        }
        let tail = chunks.remainder();
        self.buf[..tail.len()].copy_from_slice(tail);
    }

    pub(crate) fn finish(mut self, big_endian: bool, mut consume: impl FnMut(&[u8; BLOCK_LEN])) {
        let bits = self.count << 3;
        let fill = (self.count % BLOCK_LEN as u64) as usize;

        self.buf[fill] = 0x80;
        if fill + 1 > BLOCK_LEN - 8 {
            // padding bit and length do not fit in the same block
            for b in &mut self.buf[fill + 1..] {
                *b = 0;
            }
            consume(&self.buf);
            self.buf = [0u8; BLOCK_LEN];
        } else {
            for b in &mut self.buf[fill + 1..BLOCK_LEN - 8] {
                *b = 0;
            }
        }

        let len_bytes = if big_endian {
            bits.to_be_bytes()
        } else {
            bits.to_le_bytes()
        };
        self.buf[BLOCK_LEN - 8..].copy_from_slice(&len_bytes);
        consume(&self.buf);
        self.buf.zeroize();
    }
}
