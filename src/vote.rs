// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Plurality voting across repeated tile reads.
//!
//! Every payload bit is written once per tile, so extraction sees one
//! vote per tile for each bit position. The majority wins; an exact tie
//! falls back to the first tile's vote, which keeps single-tile images
//! working unchanged and makes the outcome independent of iteration
//! order.

/// Resolve one bit position from the votes of all tiles.
///
/// # Panics
/// Panics when `votes` is empty.
pub fn resolve_position(votes: &[u8]) -> u8 {
    assert!(!votes.is_empty(), "need at least one vote");
    let ones = votes.iter().filter(|&&v| v != 0).count();
    let zeros = votes.len() - ones;
    if ones > zeros {
        1
    } else if zeros > ones {
        0
    } else {
        votes[0]
    }
}
