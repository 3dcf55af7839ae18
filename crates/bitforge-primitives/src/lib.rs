/// Bitforge primitives - networks, hashing, keys and addresses.
///
/// This crate provides the key-side building blocks:
/// - Network parameters and the registry that resolves them
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Base58Check encoding/decoding
/// - secp256k1 private keys (WIF) and public keys (SEC)
/// - P2PKH address derivation

pub mod address;
pub mod base58;
pub mod ec;
pub mod hash;
pub mod network;

pub use address::{Address, AddressError};
pub use ec::{KeyError, Point, PrivateKey, PublicKey};
pub use network::{NetworkError, NetworkParams, NetworkRegistry, Networks};
