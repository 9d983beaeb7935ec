//! The finalization round on its own, fed the raw register values.

use crate::hash::final_mix;

pub const IN_SIZE_BYTES: usize = 96 / 8;
pub const OUT_SIZE_BYTES: usize = 96 / 8;
pub const DIGEST_SIZE_BYTES: usize = 32 / 8;

pub fn mix_input(in_bytes: &[u8], out_bytes: &mut [u8]) {
    assert!(in_bytes.len() == IN_SIZE_BYTES);
    assert!(out_bytes.len() == OUT_SIZE_BYTES);

    let mut state = super::read_state(in_bytes);
    final_mix(&mut state);
    super::write_state(&state, out_bytes);
}
