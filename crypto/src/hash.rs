//! Blake2b-256, the only hash used for derivation and address checksums.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Hash a single byte string.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Hash the concatenation of `parts` without building it.
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    parts
        .iter()
        .fold(Blake2b256::new(), |hasher, part| hasher.chain_update(*part))
        .finalize()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_matches_reference_digest() {
        // BLAKE2b-256("") = 0e5751c0...
        assert_eq!(blake2b_256(b"")[..4], [0x0e, 0x57, 0x51, 0xc0]);
    }

    #[test]
    fn parts_hash_as_their_concatenation() {
        let id = 7u64.to_le_bytes();
        let joined: Vec<u8> = [&b"vault"[..], &id[..]].concat();
        assert_eq!(blake2b_256_multi(&[b"vault", &id]), blake2b_256(&joined));
        assert_eq!(blake2b_256_multi(&[]), blake2b_256(b""));
    }

    #[test]
    fn raw_parts_do_not_separate_seeds() {
        // the reason derivation length-prefixes every seed
        assert_eq!(
            blake2b_256_multi(&[b"vote_token", b"_mint"]),
            blake2b_256_multi(&[b"vote", b"_token_mint"])
        );
        assert_ne!(
            crate::derive_address(&[b"vote_token", b"_mint"]),
            crate::derive_address(&[b"vote", b"_token_mint"])
        );
    }

    #[test]
    fn distinct_asset_seeds_hash_apart() {
        assert_ne!(
            blake2b_256(b"governance_token_mint"),
            blake2b_256(b"st_governance_token_mint")
        );
    }
}
