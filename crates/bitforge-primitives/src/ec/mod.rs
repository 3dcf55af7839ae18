/// Elliptic curve keys on secp256k1.
///
/// Provides the curve adapter, private keys with WIF encoding, and public
/// keys with SEC encoding.

pub mod curve;
pub mod error;
pub mod private_key;
pub mod public_key;

pub use curve::Point;
pub use error::KeyError;
pub use private_key::PrivateKey;
pub use public_key::PublicKey;
