//! secp256k1 public key with SEC serialization.
//!
//! Every constructor ends in `from_pair_in`, which resolves the network and
//! checks curve membership. A `PublicKey` that exists is always valid.

use std::fmt;

use num_bigint::BigUint;

use crate::address::Address;
use crate::ec::curve::{self, coordinate_bytes, Point, COORDINATE_LEN};
use crate::ec::error::KeyError;
use crate::ec::private_key::PrivateKey;
use crate::network::{NetworkParams, NetworkRegistry, Networks};

/// Length of a compressed public key in bytes (prefix + 32 byte x-coordinate).
pub const COMPRESSED_LEN: usize = 1 + COORDINATE_LEN;

/// Length of an uncompressed public key in bytes (prefix + 32 byte x + 32 byte y).
pub const UNCOMPRESSED_LEN: usize = 1 + 2 * COORDINATE_LEN;

const PREFIX_EVEN: u8 = 0x02;
const PREFIX_ODD: u8 = 0x03;
const PREFIX_UNCOMPRESSED: u8 = 0x04;

/// A validated secp256k1 public key.
///
/// Holds the curve point, the network it belongs to, and whether it
/// serializes in the 33-byte compressed form.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    pair: Point,
    network: NetworkParams,
    compressed: bool,
}

impl PublicKey {
    /// Create a public key from a coordinate pair, resolving `network` in
    /// the builtin registry.
    pub fn from_pair(pair: Point, network: &str, compressed: bool) -> Result<Self, KeyError> {
        Self::from_pair_in(Networks::builtin(), pair, network, compressed)
    }

    /// Create a public key from a coordinate pair.
    ///
    /// # Arguments
    /// * `registry` - Registry used to resolve `network`.
    /// * `pair` - The affine point.
    /// * `network` - Network name or alias.
    /// * `compressed` - Whether the key serializes compressed.
    ///
    /// # Returns
    /// The key, `UnknownNetwork` if `network` does not resolve, or
    /// `InvalidPair` if `pair` is not on the curve.
    pub fn from_pair_in<R>(
        registry: &R,
        pair: Point,
        network: &str,
        compressed: bool,
    ) -> Result<Self, KeyError>
    where
        R: NetworkRegistry + ?Sized,
    {
        let network = registry.resolve(network)?;
        if !curve::is_valid_point(&pair) {
            return Err(KeyError::InvalidPair { pair });
        }
        Ok(PublicKey {
            pair,
            network,
            compressed,
        })
    }

    /// Derive the public key of `key`, inheriting its network and compression.
    pub fn from_private_key(key: &PrivateKey) -> Result<Self, KeyError> {
        let pair = curve::multiply_generator(key.scalar());
        let network = key.network();
        Self::from_pair_in(network, pair, &network.name, key.is_compressed())
    }

    /// Decode SEC bytes, resolving `network` in the builtin registry.
    pub fn from_bytes(bytes: &[u8], network: &str) -> Result<Self, KeyError> {
        Self::from_bytes_in(Networks::builtin(), bytes, network)
    }

    /// Decode a SEC-encoded public key.
    ///
    /// The prefix byte selects the form: 0x02/0x03 need 33 bytes, 0x04
    /// needs 65. Anything else, or a compressed x with no curve point, is
    /// `InvalidBinary`.
    pub fn from_bytes_in<R>(registry: &R, bytes: &[u8], network: &str) -> Result<Self, KeyError>
    where
        R: NetworkRegistry + ?Sized,
    {
        let (pair, compressed) = decode_sec(bytes)?;
        Self::from_pair_in(registry, pair, network, compressed)
    }

    /// Decode a hex SEC string, resolving `network` in the builtin registry.
    pub fn from_hex(text: &str, network: &str) -> Result<Self, KeyError> {
        Self::from_hex_in(Networks::builtin(), text, network)
    }

    /// Decode a hex SEC string.
    pub fn from_hex_in<R>(registry: &R, text: &str, network: &str) -> Result<Self, KeyError>
    where
        R: NetworkRegistry + ?Sized,
    {
        let bytes = hex::decode(text).map_err(|_| KeyError::InvalidHex {
            text: text.to_string(),
        })?;
        Self::from_bytes_in(registry, &bytes, network)
    }

    /// Serialize in SEC format.
    ///
    /// # Returns
    /// 33 bytes (0x02/0x03 by y parity, then x) when compressed, otherwise
    /// 65 bytes (0x04, x, y).
    pub fn to_bytes(&self) -> Vec<u8> {
        // Coordinates of a validated point always fit the field width.
        let x = coordinate_bytes(&self.pair.x).unwrap_or_default();
        if self.compressed {
            let mut out = Vec::with_capacity(COMPRESSED_LEN);
            out.push(if self.pair.is_y_odd() { PREFIX_ODD } else { PREFIX_EVEN });
            out.extend_from_slice(&x);
            out
        } else {
            let y = coordinate_bytes(&self.pair.y).unwrap_or_default();
            let mut out = Vec::with_capacity(UNCOMPRESSED_LEN);
            out.push(PREFIX_UNCOMPRESSED);
            out.extend_from_slice(&x);
            out.extend_from_slice(&y);
            out
        }
    }

    /// Serialize in SEC format as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The P2PKH address of this key on its network.
    pub fn to_address(&self) -> Address {
        Address::from_public_key(self)
    }

    /// The curve point.
    pub fn pair(&self) -> &Point {
        &self.pair
    }

    /// The network this key belongs to.
    pub fn network(&self) -> &NetworkParams {
        &self.network
    }

    /// Whether the key serializes compressed.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }
}

fn decode_sec(bytes: &[u8]) -> Result<(Point, bool), KeyError> {
    let invalid = || KeyError::InvalidBinary {
        bytes: bytes.to_vec(),
    };
    match (bytes.first().copied(), bytes.len()) {
        (Some(prefix @ (PREFIX_EVEN | PREFIX_ODD)), COMPRESSED_LEN) => {
            let x = BigUint::from_bytes_be(&bytes[1..]);
            let pair = curve::decompress(&x, prefix == PREFIX_ODD).ok_or_else(invalid)?;
            Ok((pair, true))
        }
        (Some(PREFIX_UNCOMPRESSED), UNCOMPRESSED_LEN) => {
            let x = BigUint::from_bytes_be(&bytes[1..1 + COORDINATE_LEN]);
            let y = BigUint::from_bytes_be(&bytes[1 + COORDINATE_LEN..]);
            Ok((Point::new(x, y), false))
        }
        _ => Err(invalid()),
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<PublicKey: {}, network: {}>", self.to_hex(), self.network.name)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
