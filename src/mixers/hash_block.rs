use crate::hash::hash_bytes;

pub const IN_SIZE_BYTES: usize = 96 / 8;
pub const OUT_SIZE_BYTES: usize = 32 / 8;
pub const DIGEST_SIZE_BYTES: usize = 32 / 8;

/// A single full block, through the bulk loop and finalization.
pub fn mix_input(in_bytes: &[u8], out_bytes: &mut [u8]) {
    assert!(in_bytes.len() == IN_SIZE_BYTES);
    assert!(out_bytes.len() == OUT_SIZE_BYTES);

    out_bytes.copy_from_slice(&hash_bytes(in_bytes).to_le_bytes());
}
