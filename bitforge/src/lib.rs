#![deny(missing_docs)]

//! Bitforge - Bitcoin script and public key codecs.
//!
//! Re-exports all bitforge components for convenient single-crate usage.

pub use bitforge_primitives as primitives;
pub use bitforge_script as script;
