//! Script instructions.
//!
//! An instruction is an opcode plus, for push opcodes, the data it pushes.
//! This module handles validated construction, decoding one instruction
//! from a byte cursor or from text tokens, and encoding back to both forms.

use std::fmt;

use crate::opcodes::{Opcode, PushKind, MAX_DIRECT_PUSH, OP_PUSHDATA4};
use crate::reader::ScriptReader;
use crate::ScriptError;

/// Prefix marking a hex data literal in the textual format.
const HEX_PREFIX: &str = "0x";

/// A single opcode with its optional push data.
///
/// Data is present exactly when the opcode is a push opcode, and its length
/// always fits the opcode's push kind. Both are checked on construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    opcode: Opcode,
    data: Option<Vec<u8>>,
}

impl Instruction {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Build an instruction, checking data against the opcode's push kind.
    ///
    /// # Arguments
    /// * `opcode` - The instruction's opcode.
    /// * `data` - Push data; must be `Some` for push opcodes and `None` otherwise.
    ///
    /// # Returns
    /// The instruction, or an error describing the mismatch.
    pub fn new(opcode: Opcode, data: Option<Vec<u8>>) -> Result<Self, ScriptError> {
        let kind = opcode.push_kind();
        match (kind, &data) {
            (PushKind::None, None) => {}
            (PushKind::None, Some(_)) => {
                return Err(ScriptError::UnexpectedPushData {
                    opcode: opcode.name().to_string(),
                });
            }
            (_, None) => {
                return Err(ScriptError::MissingPushData {
                    opcode: opcode.name().to_string(),
                });
            }
            (PushKind::Fixed(n), Some(bytes)) => {
                check_push_len(n as usize, bytes)?;
            }
            (_, Some(bytes)) => {
                if bytes.len() > kind.max_data_len() {
                    return Err(ScriptError::PushDataTooLarge {
                        opcode: opcode.name().to_string(),
                        length: bytes.len(),
                    });
                }
            }
        }
        Ok(Instruction { opcode, data })
    }

    /// Build a non-push instruction.
    pub fn op(opcode: Opcode) -> Result<Self, ScriptError> {
        Self::new(opcode, None)
    }

    /// Build a push of `data` using the smallest suitable push opcode.
    pub fn push(data: Vec<u8>) -> Result<Self, ScriptError> {
        let opcode =
            Opcode::for_push_len(data.len()).ok_or_else(|| ScriptError::PushDataTooLarge {
                opcode: OP_PUSHDATA4.name().to_string(),
                length: data.len(),
            })?;
        Ok(Instruction {
            opcode,
            data: Some(data),
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The instruction's opcode.
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// The pushed data, if this is a push instruction.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Whether this instruction pushes data.
    pub fn is_push(&self) -> bool {
        self.data.is_some()
    }

    /// Number of bytes this instruction occupies in binary form.
    pub fn encoded_len(&self) -> usize {
        let data_len = self.data.as_ref().map_or(0, Vec::len);
        1 + self.opcode.push_kind().length_field_size() + data_len
    }

    // -----------------------------------------------------------------------
    // Binary form
    // -----------------------------------------------------------------------

    /// Decode one instruction from the reader.
    ///
    /// Reads the opcode byte, then the length field and data the opcode's
    /// push kind calls for. Any underflow fails with `InsufficientData`.
    pub fn read(reader: &mut ScriptReader<'_>) -> Result<Self, ScriptError> {
        let opcode = Opcode::from_u8(reader.read_u8()?);
        let len = match opcode.push_kind() {
            PushKind::None => return Ok(Instruction { opcode, data: None }),
            PushKind::Fixed(n) => n as usize,
            PushKind::Len1 => reader.read_u8()? as usize,
            PushKind::Len2Le => reader.read_u16_le()? as usize,
            PushKind::Len4Le => reader.read_u32_le()? as usize,
        };
        let data = reader.read_bytes(len)?.to_vec();
        Ok(Instruction {
            opcode,
            data: Some(data),
        })
    }

    /// Append the binary encoding of this instruction to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(self.opcode.value());
        if let Some(ref data) = self.data {
            // Lengths were bounded by the push kind on construction.
            match self.opcode.push_kind() {
                PushKind::Len1 => out.push(data.len() as u8),
                PushKind::Len2Le => out.extend_from_slice(&(data.len() as u16).to_le_bytes()),
                PushKind::Len4Le => out.extend_from_slice(&(data.len() as u32).to_le_bytes()),
                PushKind::None | PushKind::Fixed(_) => {}
            }
            out.extend_from_slice(data);
        }
    }

    /// Encode this instruction as bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out);
        out
    }

    // -----------------------------------------------------------------------
    // Textual form
    // -----------------------------------------------------------------------

    /// Decode one instruction starting at `token`, pulling any push
    /// arguments from `rest`.
    ///
    /// Accepted shapes:
    /// * `OP_NAME` for non-push opcodes
    /// * `OP_PUSHDATAn <len> 0x<hex>` for variable-length pushes
    /// * `<len> 0x<hex>` or `OP_DATA_<len> 0x<hex>` for direct pushes (1..=75)
    pub(crate) fn from_tokens<'a, I>(token: &'a str, rest: &mut I) -> Result<Self, ScriptError>
    where
        I: Iterator<Item = &'a str>,
    {
        if token.starts_with("OP_") {
            let opcode = Opcode::from_name(token)?;
            let declared = match opcode.push_kind() {
                PushKind::None => return Ok(Instruction { opcode, data: None }),
                PushKind::Fixed(n) => n as usize,
                PushKind::Len1 | PushKind::Len2Le | PushKind::Len4Le => {
                    let len_token = next_argument(token, rest)?;
                    // Both arguments must be present before either is judged.
                    let data_token = next_argument(token, rest)?;
                    let declared = parse_length(len_token)?;
                    let data = parse_hex_literal(data_token)?;
                    check_push_len(declared, &data)?;
                    return Self::new(opcode, Some(data));
                }
            };
            let data = parse_hex_literal(next_argument(token, rest)?)?;
            check_push_len(declared, &data)?;
            return Self::new(opcode, Some(data));
        }

        let declared = parse_length(token)?;
        if declared == 0 || declared > MAX_DIRECT_PUSH as usize {
            return Err(ScriptError::InvalidPushData {
                token: token.to_string(),
            });
        }
        let data = parse_hex_literal(next_argument(token, rest)?)?;
        check_push_len(declared, &data)?;
        Self::new(Opcode::from_u8(declared as u8), Some(data))
    }
}

impl fmt::Display for Instruction {
    /// Render as text: `OP_NAME`, `<len> 0x<hex>`, or `OP_NAME <len> 0x<hex>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.opcode.push_kind(), &self.data) {
            (PushKind::Fixed(_), Some(data)) => {
                write!(f, "{} {}{}", data.len(), HEX_PREFIX, hex::encode(data))
            }
            (PushKind::Len1 | PushKind::Len2Le | PushKind::Len4Le, Some(data)) => write!(
                f,
                "{} {} {}{}",
                self.opcode.name(),
                data.len(),
                HEX_PREFIX,
                hex::encode(data)
            ),
            _ => f.write_str(self.opcode.name()),
        }
    }
}

fn next_argument<'a, I>(owner: &str, rest: &mut I) -> Result<&'a str, ScriptError>
where
    I: Iterator<Item = &'a str>,
{
    rest.next().ok_or_else(|| ScriptError::MissingPushArguments {
        token: owner.to_string(),
    })
}

/// Parse a plain decimal length token.
fn parse_length(token: &str) -> Result<usize, ScriptError> {
    let invalid = || ScriptError::InvalidPushData {
        token: token.to_string(),
    };
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    token.parse::<usize>().map_err(|_| invalid())
}

/// Parse a `0x`-prefixed hex literal.
fn parse_hex_literal(token: &str) -> Result<Vec<u8>, ScriptError> {
    token
        .strip_prefix(HEX_PREFIX)
        .and_then(|digits| hex::decode(digits).ok())
        .ok_or_else(|| ScriptError::InvalidPushData {
            token: token.to_string(),
        })
}

fn check_push_len(declared: usize, data: &[u8]) -> Result<(), ScriptError> {
    if declared != data.len() {
        return Err(ScriptError::InvalidPushDataLength {
            declared,
            actual: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Tests for instruction construction, single-instruction decoding in
    //! both forms, and encoding.

    use super::*;
    use crate::opcodes::*;

    fn parse_one(text: &str) -> Result<Instruction, ScriptError> {
        let mut tokens = text.split_whitespace();
        let first = tokens.next().expect("at least one token");
        Instruction::from_tokens(first, &mut tokens)
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Non-push opcodes reject data; push opcodes require it.
    #[test]
    fn test_new_checks_data_presence() {
        assert!(Instruction::new(OP_DUP, None).is_ok());
        assert_eq!(
            Instruction::new(OP_DUP, Some(vec![1])).unwrap_err(),
            ScriptError::UnexpectedPushData { opcode: "OP_DUP".to_string() }
        );
        assert_eq!(
            Instruction::new(OP_PUSHDATA1, None).unwrap_err(),
            ScriptError::MissingPushData { opcode: "OP_PUSHDATA1".to_string() }
        );
    }

    /// Direct pushes require exactly as many bytes as the opcode value.
    #[test]
    fn test_new_checks_fixed_length() {
        let op = Opcode::from_u8(3);
        assert!(Instruction::new(op, Some(vec![1, 2, 3])).is_ok());
        assert_eq!(
            Instruction::new(op, Some(vec![1, 2])).unwrap_err(),
            ScriptError::InvalidPushDataLength { declared: 3, actual: 2 }
        );
    }

    /// Variable pushes are bounded by their length field.
    #[test]
    fn test_new_checks_variable_capacity() {
        assert!(Instruction::new(OP_PUSHDATA1, Some(vec![0; 255])).is_ok());
        assert_eq!(
            Instruction::new(OP_PUSHDATA1, Some(vec![0; 256])).unwrap_err(),
            ScriptError::PushDataTooLarge { opcode: "OP_PUSHDATA1".to_string(), length: 256 }
        );
        assert!(Instruction::new(OP_PUSHDATA2, Some(vec![0; 256])).is_ok());
        assert!(Instruction::new(OP_PUSHDATA4, Some(Vec::new())).is_ok());
    }

    /// push() chooses the minimal opcode for the payload.
    #[test]
    fn test_push_minimal() {
        assert_eq!(Instruction::push(vec![7; 20]).unwrap().opcode().value(), 20);
        assert_eq!(Instruction::push(vec![7; 80]).unwrap().opcode(), OP_PUSHDATA1);
        assert_eq!(Instruction::push(vec![7; 300]).unwrap().opcode(), OP_PUSHDATA2);
        assert_eq!(Instruction::push(Vec::new()).unwrap().opcode(), OP_PUSHDATA1);
    }

    // -----------------------------------------------------------------------
    // Binary form
    // -----------------------------------------------------------------------

    /// Each push kind writes its length field before the data.
    #[test]
    fn test_to_bytes() {
        let direct = Instruction::new(Opcode::from_u8(2), Some(vec![0xab, 0xcd])).unwrap();
        assert_eq!(direct.to_bytes(), vec![0x02, 0xab, 0xcd]);

        let p1 = Instruction::new(OP_PUSHDATA1, Some(b"abc".to_vec())).unwrap();
        assert_eq!(p1.to_bytes(), vec![0x4c, 3, b'a', b'b', b'c']);

        let p2 = Instruction::new(OP_PUSHDATA2, Some(b"abc".to_vec())).unwrap();
        assert_eq!(p2.to_bytes(), vec![0x4d, 3, 0, b'a', b'b', b'c']);

        let p4 = Instruction::new(OP_PUSHDATA4, Some(b"abc".to_vec())).unwrap();
        assert_eq!(p4.to_bytes(), vec![0x4e, 3, 0, 0, 0, b'a', b'b', b'c']);
        assert_eq!(p4.encoded_len(), 8);

        assert_eq!(Instruction::op(OP_CHECKSIG).unwrap().to_bytes(), vec![0xac]);
    }

    /// Reading stops exactly at the end of one instruction.
    #[test]
    fn test_read_single() {
        let bytes = [0x4d, 0x02, 0x00, 0x11, 0x22, 0x76];
        let mut reader = ScriptReader::new(&bytes);
        let ins = Instruction::read(&mut reader).unwrap();
        assert_eq!(ins.opcode(), OP_PUSHDATA2);
        assert_eq!(ins.data(), Some(&[0x11, 0x22][..]));
        assert_eq!(reader.remaining(), 1);
    }

    /// A missing length field is reported as insufficient data.
    #[test]
    fn test_read_truncated_length_field() {
        let bytes = [0x4e, 0x03, 0x00];
        let mut reader = ScriptReader::new(&bytes);
        assert_eq!(
            Instruction::read(&mut reader).unwrap_err(),
            ScriptError::InsufficientData { requested: 4, available: 2 }
        );
    }

    // -----------------------------------------------------------------------
    // Textual form
    // -----------------------------------------------------------------------

    /// Each instruction shape renders to its textual form.
    #[test]
    fn test_display() {
        let direct = Instruction::new(Opcode::from_u8(3), Some(vec![1, 2, 3])).unwrap();
        assert_eq!(direct.to_string(), "3 0x010203");

        let p2 = Instruction::new(OP_PUSHDATA2, Some(vec![1, 2, 3])).unwrap();
        assert_eq!(p2.to_string(), "OP_PUSHDATA2 3 0x010203");

        let empty = Instruction::new(OP_PUSHDATA1, Some(Vec::new())).unwrap();
        assert_eq!(empty.to_string(), "OP_PUSHDATA1 0 0x");

        assert_eq!(Instruction::op(OP_0).unwrap().to_string(), "OP_0");
    }

    /// Named and bare direct pushes parse to the same instruction.
    #[test]
    fn test_from_tokens_direct_push() {
        let bare = parse_one("2 0xabcd").unwrap();
        let named = parse_one("OP_DATA_2 0xabcd").unwrap();
        assert_eq!(bare, named);
        assert_eq!(bare.opcode().value(), 2);
    }

    /// Direct push lengths outside 1..=75 are not a valid token shape.
    #[test]
    fn test_from_tokens_direct_push_out_of_range() {
        assert_eq!(
            parse_one("0 0x").unwrap_err(),
            ScriptError::InvalidPushData { token: "0".to_string() }
        );
        assert!(matches!(
            parse_one("76 0x00").unwrap_err(),
            ScriptError::InvalidPushData { .. }
        ));
    }

    /// A bare length with no data token is missing its argument.
    #[test]
    fn test_from_tokens_dangling_length() {
        assert_eq!(
            parse_one("3").unwrap_err(),
            ScriptError::MissingPushArguments { token: "3".to_string() }
        );
    }

    /// A declared length larger than the opcode allows is rejected.
    #[test]
    fn test_from_tokens_overflowing_pushdata1() {
        let text = format!("OP_PUSHDATA1 256 0x{}", "00".repeat(256));
        assert!(matches!(
            parse_one(&text).unwrap_err(),
            ScriptError::PushDataTooLarge { .. }
        ));
    }

    /// Non-decimal lengths and malformed hex are invalid push data.
    #[test]
    fn test_from_tokens_bad_arguments() {
        assert_eq!(
            parse_one("OP_PUSHDATA1 x3 0x010203").unwrap_err(),
            ScriptError::InvalidPushData { token: "x3".to_string() }
        );
        assert_eq!(
            parse_one("OP_PUSHDATA1 3 0x0102zz").unwrap_err(),
            ScriptError::InvalidPushData { token: "0x0102zz".to_string() }
        );
        assert_eq!(
            parse_one("0x010203").unwrap_err(),
            ScriptError::InvalidPushData { token: "0x010203".to_string() }
        );
    }
}
