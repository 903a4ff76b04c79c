//! Binary keccak Merkle roots shared by the state, receipt and transaction
//! commitments.

use ethers::types::H256;
use ethers::utils::keccak256;

fn hash_concat(left: &H256, right: &H256) -> H256 {
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(left.as_bytes());
    data[32..].copy_from_slice(right.as_bytes());
    H256::from(keccak256(data))
}

/// Root of a binary Merkle tree; an odd node is paired with itself
pub fn merkle_root(leaves: &[H256]) -> H256 {
    if leaves.is_empty() {
        return H256::zero();
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| hash_concat(&pair[0], pair.get(1).unwrap_or(&pair[0])))
            .collect();
    }

    level[0]
}

/// Merkle root bound to the number of leaves
///
/// `[a, b, c]` and `[a, b, c, c]` share a plain Merkle root; the length
/// prefix keeps them apart.
pub fn committed_root(leaves: &[H256]) -> H256 {
    let mut data = Vec::with_capacity(40);
    data.extend_from_slice(&(leaves.len() as u64).to_be_bytes());
    data.extend_from_slice(merkle_root(leaves).as_bytes());
    H256::from(keccak256(data))
}
