use crate::base58::Base58Error;
use crate::ec::curve::Point;
use crate::network::NetworkError;

/// Errors raised while constructing or decoding keys.
///
/// Shared by `PublicKey` and `PrivateKey`. Each variant carries the value
/// that was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// The coordinates do not describe a point on secp256k1.
    #[error("the public key pair {pair} is invalid (not a point of the curve)")]
    InvalidPair {
        /// The rejected pair.
        pair: Point,
    },

    /// The bytes are not a SEC-encoded public key.
    #[error("the buffer {} is not in any recognized format", hex::encode(.bytes))]
    InvalidBinary {
        /// The rejected buffer.
        bytes: Vec<u8>,
    },

    /// The text is not valid hex.
    #[error("invalid hex: {text}")]
    InvalidHex {
        /// The rejected text.
        text: String,
    },

    /// No network matches the requested attribute.
    #[error("no network for key with an attribute '{key}' of value {value}")]
    UnknownNetwork {
        /// Attribute that was searched.
        key: &'static str,
        /// The value that matched nothing.
        value: String,
    },

    /// The network registry itself is unusable.
    #[error("invalid network configuration: {0}")]
    InvalidNetworkConfig(String),

    /// A decoded WIF payload has the wrong length.
    #[error("the WIF {string} should be 33 (uncompressed) or 34 (compressed) bytes long, not {length}")]
    InvalidWifLength {
        /// The WIF string.
        string: String,
        /// Length of its decoded payload.
        length: usize,
    },

    /// A raw secret is not 32 bytes long.
    #[error("the secret {string} should be 32 bytes long, not {length}")]
    InvalidSecretLength {
        /// The secret, hex encoded.
        string: String,
        /// Its length in bytes.
        length: usize,
    },

    /// A 34-byte WIF payload does not end in the compression marker.
    #[error("the length of the WIF {string} suggests it's compressed, but it doesn't end in 0x01")]
    InvalidCompressionByte {
        /// The WIF string.
        string: String,
    },

    /// The secret is zero or not below the curve order.
    #[error("the secret {string} is not a valid secp256k1 scalar")]
    InvalidSecret {
        /// The secret, hex encoded.
        string: String,
    },

    /// The string is not valid Base58.
    #[error("invalid base58 string '{string}'")]
    InvalidBase58 {
        /// The rejected string.
        string: String,
    },

    /// The Base58Check checksum does not match.
    #[error("checksum mismatch in '{string}'")]
    ChecksumMismatch {
        /// The rejected string.
        string: String,
    },
}

impl From<NetworkError> for KeyError {
    fn from(e: NetworkError) -> Self {
        match e {
            NetworkError::UnknownNetwork { key, value } => KeyError::UnknownNetwork { key, value },
            NetworkError::InvalidConfig(msg) => KeyError::InvalidNetworkConfig(msg),
        }
    }
}

impl From<Base58Error> for KeyError {
    fn from(e: Base58Error) -> Self {
        match e {
            Base58Error::InvalidCharacter(string) | Base58Error::TooShort(string) => {
                KeyError::InvalidBase58 { string }
            }
            Base58Error::ChecksumMismatch(string) => KeyError::ChecksumMismatch { string },
        }
    }
}
