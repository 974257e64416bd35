// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain-separated random oracle.
//!
//! [`Oracle`] is an extendable-output one-way function family indexed by a
//! 64-bit domain index. Fed a message `M`, `Oracle::new(len, idx)` emits
//! the first `len` bytes of the infinite sequence
//!
//! ```text
//! SHA1(<0> || <idx> || M) || SHA1(<1> || <idx> || M) || SHA1(<2> || <idx> || M) ...
//! ```
//!
//! where `<n>` is the big-endian 64-bit encoding of `n`. All derived
//! streams are computed in one pass: the message is fed block-by-block to
//! `ceil(len / 20)` independent compression states, and only the first
//! block differs per state (its leading 8 bytes carry the state index).
//!
//! Distinct domain indices give computationally independent functions;
//! growing `len` for a fixed `(idx, M)` extends the output without
//! changing the bytes already emitted.

use zeroize::{Zeroize, Zeroizing};

use crate::hash::{
    compress_block, state_to_bytes, BlockStream, BLOCK_LEN, DIGEST_LEN, INITIAL_STATE,
};

pub struct Oracle {
    stream: BlockStream,
    states: Vec<[u32; 5]>,
    nbytes: usize,
    first_block: bool,
}

impl Oracle {
    /// Create an oracle producing `nbytes` of output under domain `index`.
    pub fn new(nbytes: usize, index: u64) -> Self {
        let nstates = nbytes.div_ceil(DIGEST_LEN);
        let mut stream = BlockStream::new();

        // The first 16 bytes of every stream are synthetic: a placeholder
        // for the per-state index, then the domain index. They can never
        // complete a block on their own.
        let mut prefix = [0u8; 16];
        prefix[8..].copy_from_slice(&index.to_be_bytes());
        stream.update(&prefix, |_| unreachable!("prefix is shorter than one block"));

        Self {
            stream,
            states: vec![INITIAL_STATE; nstates],
            nbytes,
            first_block: true,
        }
    }

    fn consume(states: &mut [[u32; 5]], first_block: &mut bool, block: &[u8; BLOCK_LEN]) {
        if *first_block {
            let mut wblock = *block;
            for (i, state) in states.iter_mut().enumerate() {
                wblock[..8].copy_from_slice(&(i as u64).to_be_bytes());
                compress_block(state, &wblock);
            }
            wblock.zeroize();
            *first_block = false;
        } else {
            for state in states.iter_mut() {
                compress_block(state, block);
            }
        }
    }

    /// Feed message bytes to every derived stream.
    pub fn update(&mut self, data: &[u8]) {
        let Self {
            stream,
            states,
            first_block,
            ..
        } = self;
        stream.update(data, |block| Self::consume(states, first_block, block));
    }

    /// Finalize all streams and concatenate their digests, truncated to
    /// the requested output length.
    pub fn finish(self) -> Zeroizing<Vec<u8>> {
        let Self {
            stream,
            mut states,
            nbytes,
            mut first_block,
        } = self;
        stream.finish(true, |block| {
            Self::consume(&mut states, &mut first_block, block)
        });

        let mut out = Zeroizing::new(vec![0u8; nbytes]);
        for (chunk, state) in out.chunks_mut(DIGEST_LEN).zip(&states) {
            let mut digest = state_to_bytes(state);
            chunk.copy_from_slice(&digest[..chunk.len()]);
            digest.zeroize();
        }
        for state in &mut states {
            state.zeroize();
        }
        out
    }

    /// One-shot evaluation over a single input slice.
    pub fn lookup(index: u64, nbytes: usize, data: &[u8]) -> Zeroizing<Vec<u8>> {
        let mut oracle = Self::new(nbytes, index);
        oracle.update(data);
        oracle.finish()
    }
}
