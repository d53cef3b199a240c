//! Reward commitments.
//!
//! leaf = sha256(user || amount_le || epoch_index_le)
//! node = sha256(min(a, b) || max(a, b))
//!
//! Pairs are sorted before hashing, so a proof is just the list of sibling
//! hashes from leaf to root with no left/right flags.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hashv;

pub type Hash32 = [u8; 32];

pub fn leaf_hash(user: &Pubkey, amount: u64, epoch_index: u64) -> Hash32 {
    hashv(&[
        user.as_ref(),
        &amount.to_le_bytes(),
        &epoch_index.to_le_bytes(),
    ])
    .to_bytes()
}

pub fn hash_sorted_pair(a: &Hash32, b: &Hash32) -> Hash32 {
    if a <= b {
        hashv(&[a, b]).to_bytes()
    } else {
        hashv(&[b, a]).to_bytes()
    }
}

/// Folds `proof` up from `leaf`, logging every step.
pub fn compute_root(leaf: Hash32, proof: &[Hash32]) -> Hash32 {
    msg!("User leaf node: {}", hex::encode(leaf));
    proof.iter().enumerate().fold(leaf, |node, (i, sibling)| {
        let parent = hash_sorted_pair(&node, sibling);
        msg!("[{}] hash(sorted(node, sib)) = {}", i, hex::encode(parent));
        parent
    })
}

pub fn verify_proof(root: &Hash32, leaf: Hash32, proof: &[Hash32]) -> bool {
    let computed = compute_root(leaf, proof);
    msg!("Computed root: {}", hex::encode(computed));
    msg!("Expected root: {}", hex::encode(root));
    computed == *root
}
