use crate::hash::hash_bytes;

pub const IN_SIZE_BYTES: usize = 192 / 8;
pub const OUT_SIZE_BYTES: usize = 32 / 8;
pub const DIGEST_SIZE_BYTES: usize = 32 / 8;

/// Two full blocks, so the first one passes through two mixing rounds.
pub fn mix_input(in_bytes: &[u8], out_bytes: &mut [u8]) {
    assert!(in_bytes.len() == IN_SIZE_BYTES);
    assert!(out_bytes.len() == OUT_SIZE_BYTES);

    out_bytes.copy_from_slice(&hash_bytes(in_bytes).to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_little_endian() {
        let input = [7u8; IN_SIZE_BYTES];
        let mut out = [0u8; OUT_SIZE_BYTES];
        mix_input(&input, &mut out);
        assert_eq!(u32::from_le_bytes(out), hash_bytes(&input));
    }
}
