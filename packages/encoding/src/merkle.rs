use std::sync::OnceLock;

use sha2::{Digest, Sha256};

use crate::{Error, Result, Root, constants::BYTES_PER_CHUNK};

const MAX_DEPTH: usize = 64;

pub fn hash_pair(left: &Root, right: &Root) -> Root {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Root of a complete tree of `depth` levels whose leaves are all zero chunks.
pub fn zero_hash(depth: usize) -> Root {
    static ZERO_HASHES: OnceLock<Vec<Root>> = OnceLock::new();

    let hashes = ZERO_HASHES.get_or_init(|| {
        let mut hashes = Vec::with_capacity(MAX_DEPTH + 1);
        hashes.push([0; 32]);
        for depth in 0..MAX_DEPTH {
            let below = hashes[depth];
            hashes.push(hash_pair(&below, &below));
        }
        hashes
    });

    hashes[depth]
}

/// Splits `bytes` into chunks, zero padding the last one.
pub fn pack(bytes: &[u8]) -> Vec<Root> {
    bytes
        .chunks(BYTES_PER_CHUNK)
        .map(|chunk| {
            let mut root = [0; 32];
            root[..chunk.len()].copy_from_slice(chunk);
            root
        })
        .collect()
}

/// Number of chunks needed to hold `len` items of `item_size` bytes each.
pub const fn chunk_count(len: usize, item_size: usize) -> usize {
    (len * item_size).div_ceil(BYTES_PER_CHUNK)
}

/// Merkleizes `chunks` into a tree sized for `limit` chunks, padding with zero subtrees.
pub fn merkleize(chunks: &[Root], limit: usize) -> Result<Root> {
    if chunks.len() > limit {
        return Err(Error::LimitExceeded {
            limit,
            got: chunks.len(),
        });
    }

    let depth = depth_for(limit);
    if chunks.is_empty() {
        return Ok(zero_hash(depth));
    }

    let mut layer = chunks.to_vec();
    let mut len = layer.len();
    for level in 0..depth {
        if len % 2 == 1 {
            layer.truncate(len);
            layer.push(zero_hash(level));
            len += 1;
        }

        for i in 0..len / 2 {
            let parent = hash_pair(&layer[2 * i], &layer[2 * i + 1]);
            layer[i] = parent;
        }
        len /= 2;
    }

    Ok(layer[0])
}

pub fn mix_in_length(root: &Root, len: usize) -> Root {
    let mut length = [0; 32];
    length[..8].copy_from_slice(&(len as u64).to_le_bytes());
    hash_pair(root, &length)
}

fn depth_for(limit: usize) -> usize {
    limit.max(1).next_power_of_two().trailing_zeros() as usize
}
