//! A fast, deterministic 32-bit hash of byte strings, plus the tooling used to
//! measure how well its mixing rounds diffuse input bits.
//!
//! The digest is a pure function of the input bytes: it does not depend on
//! buffer alignment or host byte order.  It is meant for hash tables, hash
//! indexes and partitioning, never for integrity or authentication.

pub mod error;
pub mod hash;
pub mod mixers;
pub mod stats;

pub use error::HashError;
pub use hash::{final_mix, hash_bytes, hash_bytes_bytewise, hash_int, hash_uint32, mix};

/// Sets up `env_logger` for the binaries, defaulting to the `info` level.
/// `RUST_LOG` overrides the default as usual.
pub fn init_env_logger() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init()?;
    Ok(())
}
