use jenkins_hash::{hash_bytes, hash_bytes_bytewise};
use proptest::prelude::*;

#[repr(align(4))]
struct Aligned([u8; 256]);

/// Copies `data` into a fresh buffer starting `offset` bytes past a 4-byte
/// boundary and hashes it there.
fn hash_at_offset(data: &[u8], offset: usize) -> u32 {
    let mut buf = Aligned([0xa5; 256]);
    buf.0[offset..offset + data.len()].copy_from_slice(data);
    let slice = &buf.0[offset..offset + data.len()];
    assert_eq!(slice.as_ptr() as usize % 4, offset % 4);
    hash_bytes(slice)
}

proptest! {
    #[test]
    fn deterministic(data in prop::collection::vec(any::<u8>(), 0..200)) {
        prop_assert_eq!(hash_bytes(&data), hash_bytes(&data.clone()));
    }

    #[test]
    fn alignment_independent(
        data in prop::collection::vec(any::<u8>(), 0..200),
        offset in 0usize..8,
    ) {
        let expected = hash_bytes_bytewise(&data);
        prop_assert_eq!(hash_at_offset(&data, offset), expected);
        prop_assert_eq!(hash_bytes(&data), expected);
    }

    #[test]
    fn single_bit_changes_digest(
        data in prop::collection::vec(any::<u8>(), 1..64),
        bit in any::<prop::sample::Index>(),
    ) {
        let mut flipped = data.clone();
        let bit = bit.index(data.len() * 8);
        flipped[bit / 8] ^= 1 << (bit % 8);
        prop_assert_ne!(hash_bytes(&data), hash_bytes(&flipped));
    }
}

#[test]
fn every_offset_and_length() {
    let data: Vec<u8> = (0..=255u8).rev().collect();
    for len in 0..=64 {
        let expected = hash_bytes_bytewise(&data[..len]);
        for offset in 0..4 {
            assert_eq!(
                hash_at_offset(&data[..len], offset),
                expected,
                "len {len} offset {offset}"
            );
        }
    }
}

#[test]
fn length_changes_digest() {
    let data = [0x42u8; 48];
    let digests: Vec<u32> = (0..=48).map(|len| hash_bytes(&data[..len])).collect();
    for (i, a) in digests.iter().enumerate() {
        for b in &digests[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
