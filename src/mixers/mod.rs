//! Fixed-size views of the hash's components, for diffusion analysis.
//!
//! Every submodule exposes the same shape: `IN_SIZE_BYTES`,
//! `OUT_SIZE_BYTES`, `DIGEST_SIZE_BYTES` and a `mix_input` function that
//! overwrites `out_bytes` from `in_bytes`.

pub mod hash_block;
pub mod hash_tail;
pub mod hash_two_blocks;
pub mod lookup3_final;
pub mod lookup3_mix;

/// Loads three little-endian `u32` registers.
pub(crate) fn read_state(in_bytes: &[u8]) -> [u32; 3] {
    let mut state = [0u32; 3];
    for (reg, chunk) in state.iter_mut().zip(in_bytes.chunks_exact(4)) {
        *reg = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    state
}

/// Stores three registers as little-endian bytes.
pub(crate) fn write_state(state: &[u32; 3], out_bytes: &mut [u8]) {
    for (reg, chunk) in state.iter().zip(out_bytes.chunks_exact_mut(4)) {
        chunk.copy_from_slice(&reg.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_layout() {
        let bytes: Vec<u8> = (1..=12).collect();
        let state = read_state(&bytes);
        assert_eq!(state, [0x04030201, 0x08070605, 0x0c0b0a09]);

        let mut out = [0u8; 12];
        write_state(&state, &mut out);
        assert_eq!(&out[..], &bytes[..]);
    }
}
