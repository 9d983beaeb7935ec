use crate::hash::{mix, SEED};

pub const IN_SIZE_BYTES: usize = 96 / 8;
pub const OUT_SIZE_BYTES: usize = 96 / 8;
pub const DIGEST_SIZE_BYTES: usize = 32 / 8;

// Set higher to see how diffusion grows with more blocks.
const ROUNDS: usize = 1;

/// One 12-byte block absorbed into a freshly seeded state and mixed, as the
/// bulk loop does for the first block of a 12-byte key.
pub fn mix_input(in_bytes: &[u8], out_bytes: &mut [u8]) {
    assert!(in_bytes.len() == IN_SIZE_BYTES);
    assert!(out_bytes.len() == OUT_SIZE_BYTES);

    let block = super::read_state(in_bytes);
    let h = SEED.wrapping_add(IN_SIZE_BYTES as u32);
    let mut state = [h, h, h];

    for i in 0..ROUNDS {
        // Blocks after the first are zero, so only the first block's
        // diffusion is tracked.
        if i == 0 {
            state[0] = state[0].wrapping_add(block[0]);
            state[1] = state[1].wrapping_add(block[1]);
            state[2] = state[2].wrapping_add(block[2]);
        }
        mix(&mut state);
    }

    super::write_state(&state, out_bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{final_mix, hash_bytes};

    #[test]
    fn finalized_block_is_the_digest() {
        let input: Vec<u8> = (0..IN_SIZE_BYTES as u8).map(|i| i ^ 0x5a).collect();
        let mut out = [0u8; OUT_SIZE_BYTES];
        mix_input(&input, &mut out);

        let mut state = super::super::read_state(&out);
        final_mix(&mut state);
        assert_eq!(state[2], hash_bytes(&input));
    }
}
