//! The 32-bit `hash_bytes` function.
//!
//! This is Bob Jenkins' lookup3 mixer with the length folded into a fixed
//! seed, the same digest space used by PostgreSQL's hash indexes:
//! <http://burtleburtle.net/bob/c/lookup3.c>
//!
//! The digest depends only on the byte values in sequence.  Buffers that start
//! on a 4-byte boundary are read a word at a time, everything else is composed
//! byte by byte, and the two paths always agree.

use crate::error::HashError;

/// Golden-ratio seed plus a fixed offset.  The input length is added to it
/// before it is copied into all three registers.
pub const SEED: u32 = 0x9e3779b9u32.wrapping_add(3923095);

/// Bytes consumed per bulk mixing round.
pub const BLOCK_SIZE_BYTES: usize = 12;

/// Register and left shift receiving byte `i` of a partial block.
///
/// Bit 0..8 of `c` is never written here: the length already went into it
/// through the seed.
const TAIL_LANES: [(usize, u32); BLOCK_SIZE_BYTES - 1] = [
    (0, 0),
    (0, 8),
    (0, 16),
    (0, 24),
    (1, 0),
    (1, 8),
    (1, 16),
    (1, 24),
    (2, 8),
    (2, 16),
    (2, 24),
];

/// The per-block mixing round.
#[inline(always)]
#[rustfmt::skip]
pub fn mix(state: &mut [u32; 3]) {
    let [mut a, mut b, mut c] = *state;

    a = a.wrapping_sub(c); a ^= c.rotate_left(4);  c = c.wrapping_add(b);
    b = b.wrapping_sub(a); b ^= a.rotate_left(6);  a = a.wrapping_add(c);
    c = c.wrapping_sub(b); c ^= b.rotate_left(8);  b = b.wrapping_add(a);
    a = a.wrapping_sub(c); a ^= c.rotate_left(16); c = c.wrapping_add(b);
    b = b.wrapping_sub(a); b ^= a.rotate_left(19); a = a.wrapping_add(c);
    c = c.wrapping_sub(b); c ^= b.rotate_left(4);  b = b.wrapping_add(a);

    *state = [a, b, c];
}

/// The finalization round, applied once after the whole input is absorbed.
/// `state[2]` is the digest afterwards.
#[inline(always)]
#[rustfmt::skip]
pub fn final_mix(state: &mut [u32; 3]) {
    let [mut a, mut b, mut c] = *state;

    c ^= b; c = c.wrapping_sub(b.rotate_left(14));
    a ^= c; a = a.wrapping_sub(c.rotate_left(11));
    b ^= a; b = b.wrapping_sub(a.rotate_left(25));
    c ^= b; c = c.wrapping_sub(b.rotate_left(16));
    a ^= c; a = a.wrapping_sub(c.rotate_left(4));
    b ^= a; b = b.wrapping_sub(a.rotate_left(14));
    c ^= b; c = c.wrapping_sub(b.rotate_left(24));

    *state = [a, b, c];
}

#[inline(always)]
fn initial_state(len: usize) -> [u32; 3] {
    // Lengths past 4 GiB wrap, as the register width dictates.
    let h = SEED.wrapping_add(len as u32);
    [h, h, h]
}

#[inline(always)]
fn fetch32(bytes: &[u8], i: usize) -> u32 {
    u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]])
}

/// Adds tail bytes `from..` into the registers per [`TAIL_LANES`].
#[inline(always)]
fn absorb_tail_bytes(state: &mut [u32; 3], tail: &[u8], from: usize) {
    for (&byte, &(reg, shift)) in tail.iter().zip(TAIL_LANES.iter()).skip(from) {
        state[reg] = state[reg].wrapping_add((byte as u32) << shift);
    }
}

/// Hashes `data` to a 32-bit digest.
///
/// The length is taken from the slice itself, so there is no way to read
/// past the end of the input.  Empty input is valid.
///
/// This is not a cryptographic hash and offers no collision resistance
/// against adversarial keys.
///
/// # Examples
///
/// ```
/// use jenkins_hash::hash_bytes;
///
/// assert_eq!(hash_bytes(b""), 2817148525);
/// assert_eq!(hash_bytes(b"abc"), 3509578647);
/// ```
#[must_use]
pub fn hash_bytes(data: &[u8]) -> u32 {
    match aligned_words(data) {
        Some(words) => hash_aligned(words, data),
        None => hash_bytes_bytewise(data),
    }
}

/// Hashes `data` composing every word from individual bytes.
///
/// This is the path [`hash_bytes`] takes for buffers that don't start on a
/// 4-byte boundary.  It returns exactly the same digest as [`hash_bytes`] for
/// every input.
#[must_use]
pub fn hash_bytes_bytewise(data: &[u8]) -> u32 {
    let mut state = initial_state(data.len());

    let mut blocks = data.chunks_exact(BLOCK_SIZE_BYTES);
    for block in &mut blocks {
        state[0] = state[0].wrapping_add(fetch32(block, 0));
        state[1] = state[1].wrapping_add(fetch32(block, 4));
        state[2] = state[2].wrapping_add(fetch32(block, 8));
        mix(&mut state);
    }

    absorb_tail_bytes(&mut state, blocks.remainder(), 0);

    final_mix(&mut state);
    state[2]
}

/// Views `data` as native `u32` words, if it starts on a 4-byte boundary.
///
/// The returned slice covers the `data.len() / 4` leading words.
fn aligned_words(data: &[u8]) -> Option<&[u32]> {
    // SAFETY: every bit pattern is a valid `u32`.
    let (prefix, words, _) = unsafe { data.align_to::<u32>() };
    (prefix.is_empty() && words.len() == data.len() / 4).then_some(words)
}

/// Word-load path.  `words` must be the aligned word view of `data`.
fn hash_aligned(words: &[u32], data: &[u8]) -> u32 {
    debug_assert_eq!(words.len(), data.len() / 4);

    let mut state = initial_state(data.len());

    let mut blocks = words.chunks_exact(3);
    for block in &mut blocks {
        state[0] = state[0].wrapping_add(u32::from_le(block[0]));
        state[1] = state[1].wrapping_add(u32::from_le(block[1]));
        state[2] = state[2].wrapping_add(u32::from_le(block[2]));
        mix(&mut state);
    }

    // Whole words of the tail go straight into `a` then `b`, and only the
    // leftover bytes go through the cascade.
    let tail_words = blocks.remainder();
    for (reg, &word) in tail_words.iter().enumerate() {
        state[reg] = state[reg].wrapping_add(u32::from_le(word));
    }
    let tail = &data[data.len() - data.len() % BLOCK_SIZE_BYTES..];
    absorb_tail_bytes(&mut state, tail, tail_words.len() * 4);

    final_mix(&mut state);
    state[2]
}

/// Hashes an integer encoded as `width` little-endian bytes.
///
/// Widths larger than eight bytes are zero-padded.  Fails if `value` needs
/// more than `width` bytes.
///
/// ```
/// use jenkins_hash::{hash_bytes, hash_int};
///
/// assert_eq!(hash_int(92, 4).unwrap(), hash_bytes(&[92, 0, 0, 0]));
/// assert!(hash_int(0x1_0000_0000, 4).is_err());
/// ```
pub fn hash_int(value: u64, width: usize) -> Result<u32, HashError> {
    let needed = (u64::BITS - value.leading_zeros()).div_ceil(8) as usize;
    if needed > width {
        return Err(HashError::IntegerOverflow {
            value,
            width,
            needed,
        });
    }

    let bytes = value.to_le_bytes();
    if width <= bytes.len() {
        Ok(hash_bytes(&bytes[..width]))
    } else {
        let mut key = vec![0u8; width];
        key[..bytes.len()].copy_from_slice(&bytes);
        Ok(hash_bytes(&key))
    }
}

/// Hashes a `u32` as its four little-endian bytes.  Same digest as
/// `hash_bytes(&k.to_le_bytes())`.
#[inline]
#[must_use]
pub fn hash_uint32(k: u32) -> u32 {
    let mut state = initial_state(4);
    state[0] = state[0].wrapping_add(k);
    final_mix(&mut state);
    state[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(align(4))]
    struct Aligned([u8; 64]);

    fn pattern() -> Aligned {
        let mut buf = Aligned([0; 64]);
        for (i, byte) in buf.0.iter_mut().enumerate() {
            *byte = (i as u8).wrapping_mul(37).wrapping_add(11);
        }
        buf
    }

    #[test]
    fn seed_value() {
        assert_eq!(SEED, 0x9e3779b9u32.wrapping_add(3923095));
        assert_eq!(SEED, 0x9e735650);
    }

    #[test]
    fn empty_is_finalized_seed() {
        let mut state = [SEED; 3];
        final_mix(&mut state);
        assert_eq!(hash_bytes(&[]), state[2]);
        assert_eq!(hash_bytes(&[]), 2817148525);
    }

    #[test]
    fn mix_is_not_identity() {
        let mut state = [1, 2, 3];
        mix(&mut state);
        assert_ne!(state, [1, 2, 3]);

        let mut zero = [0; 3];
        mix(&mut zero);
        assert_eq!(zero, [0; 3]);
    }

    #[test]
    fn word_view_only_when_aligned() {
        let buf = pattern();
        assert!(aligned_words(&buf.0[0..20]).is_some());
        assert!(aligned_words(&buf.0[4..20]).is_some());
        for offset in 1..4 {
            assert!(aligned_words(&buf.0[offset..20]).is_none());
        }
        assert_eq!(aligned_words(&buf.0[0..23]).map(<[u32]>::len), Some(5));
    }

    #[test]
    fn aligned_path_matches_bytewise() {
        let buf = pattern();
        for len in 0..=48 {
            let data = &buf.0[..len];
            let words = aligned_words(data).unwrap();
            assert_eq!(
                hash_aligned(words, data),
                hash_bytes_bytewise(data),
                "len {len}"
            );
        }
    }

    #[test]
    fn offsets_agree() {
        let buf = pattern();
        let mut shifted = Aligned([0; 64]);
        for offset in 1..4 {
            for len in 0..=40 {
                shifted.0[offset..offset + len].copy_from_slice(&buf.0[..len]);
                assert_eq!(
                    hash_bytes(&shifted.0[offset..offset + len]),
                    hash_bytes(&buf.0[..len]),
                    "offset {offset} len {len}"
                );
            }
        }
    }

    #[test]
    fn tail_cascade_positions() {
        // A single 0x01 at tail position `i` adds exactly `1 << shift` to one
        // register, which must match a word-composed block with that bit.
        for (i, &(reg, shift)) in TAIL_LANES.iter().enumerate() {
            let mut tail = [0u8; 11];
            tail[i] = 1;

            let mut expected = initial_state(11);
            expected[reg] = expected[reg].wrapping_add(1 << shift);
            final_mix(&mut expected);

            assert_eq!(hash_bytes_bytewise(&tail), expected[2], "byte {i}");
        }
    }

    #[test]
    fn length_is_folded_in() {
        assert_ne!(hash_bytes(&[0; 3]), hash_bytes(&[0; 4]));
        assert_ne!(hash_bytes(&[0; 12]), hash_bytes(&[0; 24]));
    }

    #[test]
    fn uint32_matches_bytes() {
        for k in [0, 1, 92, 0xdead_beef, u32::MAX] {
            assert_eq!(hash_uint32(k), hash_bytes(&k.to_le_bytes()));
        }
        assert_eq!(hash_uint32(1), 2389907270);
    }

    #[test]
    fn int_width_checks() {
        assert_eq!(hash_int(0, 0).unwrap(), hash_bytes(&[]));
        assert_eq!(hash_int(0xffff_ffff, 4).unwrap(), 385747274);
        assert_eq!(hash_int(0xffff_ffff, 8).unwrap(), 1696456253);
        assert_eq!(
            hash_int(1, 12).unwrap(),
            hash_bytes(&[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0])
        );
        assert!(matches!(
            hash_int(0xff_ffff_ffff, 4),
            Err(HashError::IntegerOverflow { needed: 5, .. })
        ));
        assert!(hash_int(1, 0).is_err());
    }
}
