//! Base58Check encoding.
//!
//! Payloads are suffixed with the first four bytes of their double SHA-256
//! before Base58 encoding. Used by WIF private keys and addresses.

use crate::hash::sha256d;

/// Length of the Base58Check checksum suffix.
const CHECKSUM_LEN: usize = 4;

/// Failure to decode a Base58Check string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Base58Error {
    /// The string contains characters outside the Bitcoin alphabet.
    #[error("invalid base58 string '{0}'")]
    InvalidCharacter(String),

    /// The decoded data is too short to hold a checksum.
    #[error("base58 string '{0}' is too short for a checksum")]
    TooShort(String),

    /// The trailing checksum does not match the payload.
    #[error("checksum mismatch in '{0}'")]
    ChecksumMismatch(String),
}

/// Encode `payload` with a trailing 4-byte double-SHA-256 checksum.
pub fn check_encode(payload: &[u8]) -> String {
    let checksum = sha256d(payload);
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    bs58::encode(data).into_string()
}

/// Decode a Base58Check string and verify its checksum.
///
/// # Arguments
/// * `s` - The Base58Check string.
///
/// # Returns
/// The payload without its checksum, or a `Base58Error`.
pub fn check_decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    let mut data = bs58::decode(s)
        .into_vec()
        .map_err(|_| Base58Error::InvalidCharacter(s.to_string()))?;
    if data.len() < CHECKSUM_LEN {
        return Err(Base58Error::TooShort(s.to_string()));
    }
    let split = data.len() - CHECKSUM_LEN;
    let expected = sha256d(&data[..split]);
    if data[split..] != expected[..CHECKSUM_LEN] {
        return Err(Base58Error::ChecksumMismatch(s.to_string()));
    }
    data.truncate(split);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A version-0 zero hash encodes to the well-known burn address.
    #[test]
    fn test_check_encode_known() {
        let payload = [0u8; 21];
        assert_eq!(check_encode(&payload), "1111111111111111111114oLvT2");
    }

    /// Encoding then decoding returns the payload.
    #[test]
    fn test_check_roundtrip() {
        let payload = b"\x80bitforge payload";
        let encoded = check_encode(payload);
        assert_eq!(check_decode(&encoded).unwrap(), payload.to_vec());
    }

    /// A flipped character breaks the checksum.
    #[test]
    fn test_check_decode_bad_checksum() {
        let mut encoded = check_encode(&[0u8; 21]).into_bytes();
        let last = encoded.len() - 1;
        encoded[last] = if encoded[last] == b'2' { b'3' } else { b'2' };
        let tampered = String::from_utf8(encoded).unwrap();
        assert!(matches!(
            check_decode(&tampered),
            Err(Base58Error::ChecksumMismatch(_))
        ));
    }

    /// Characters outside the alphabet and short inputs are rejected.
    #[test]
    fn test_check_decode_invalid() {
        assert!(matches!(check_decode("0OIl"), Err(Base58Error::InvalidCharacter(_))));
        assert!(matches!(check_decode("11"), Err(Base58Error::TooShort(_))));
    }
}
