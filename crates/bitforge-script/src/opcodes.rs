//! Bitcoin script opcode table.
//!
//! Every byte value 0..=255 is an opcode. Assigned opcodes carry their
//! canonical `OP_xxx` name, direct pushes (1..=75) are named `OP_DATA_<n>`,
//! and the remaining bytes get a synthesized `OP_UNKNOWN_<n>` name so that
//! names and byte values stay a bijection over the whole table.
//!
//! The table is built once on first use and never mutated afterwards.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

use crate::ScriptError;

/// Largest direct-push length; byte values 1..=75 push that many bytes.
pub const MAX_DIRECT_PUSH: u8 = 0x4b;

/// How a push opcode encodes the length of its data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PushKind {
    /// Not a push opcode.
    None,
    /// Direct push: the opcode value itself is the data length.
    Fixed(u8),
    /// Length follows the opcode as a single byte.
    Len1,
    /// Length follows the opcode as a little-endian u16.
    Len2Le,
    /// Length follows the opcode as a little-endian u32.
    Len4Le,
}

impl PushKind {
    /// Width in bytes of the explicit length field, zero when there is none.
    pub fn length_field_size(self) -> usize {
        match self {
            PushKind::Len1 => 1,
            PushKind::Len2Le => 2,
            PushKind::Len4Le => 4,
            PushKind::None | PushKind::Fixed(_) => 0,
        }
    }

    /// Largest payload an instruction of this kind can carry.
    pub fn max_data_len(self) -> usize {
        match self {
            PushKind::None => 0,
            PushKind::Fixed(n) => n as usize,
            PushKind::Len1 => u8::MAX as usize,
            PushKind::Len2Le => u16::MAX as usize,
            PushKind::Len4Le => u32::MAX as usize,
        }
    }
}

/// A single script opcode, identified by its byte value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Opcode(u8);

macro_rules! opcodes {
    ($($name:ident = $value:expr),* $(,)?) => {
        $(
            #[allow(missing_docs)]
            pub const $name: Opcode = Opcode($value);
        )*

        const ASSIGNED: &[(&str, u8)] = &[$((stringify!($name), $value)),*];
    };
}

opcodes! {
    // push value
    OP_0 = 0x00,
    OP_PUSHDATA1 = 0x4c,
    OP_PUSHDATA2 = 0x4d,
    OP_PUSHDATA4 = 0x4e,
    OP_1NEGATE = 0x4f,
    OP_RESERVED = 0x50,
    OP_1 = 0x51,
    OP_2 = 0x52,
    OP_3 = 0x53,
    OP_4 = 0x54,
    OP_5 = 0x55,
    OP_6 = 0x56,
    OP_7 = 0x57,
    OP_8 = 0x58,
    OP_9 = 0x59,
    OP_10 = 0x5a,
    OP_11 = 0x5b,
    OP_12 = 0x5c,
    OP_13 = 0x5d,
    OP_14 = 0x5e,
    OP_15 = 0x5f,
    OP_16 = 0x60,

    // control
    OP_NOP = 0x61,
    OP_VER = 0x62,
    OP_IF = 0x63,
    OP_NOTIF = 0x64,
    OP_VERIF = 0x65,
    OP_VERNOTIF = 0x66,
    OP_ELSE = 0x67,
    OP_ENDIF = 0x68,
    OP_VERIFY = 0x69,
    OP_RETURN = 0x6a,

    // stack ops
    OP_TOALTSTACK = 0x6b,
    OP_FROMALTSTACK = 0x6c,
    OP_2DROP = 0x6d,
    OP_2DUP = 0x6e,
    OP_3DUP = 0x6f,
    OP_2OVER = 0x70,
    OP_2ROT = 0x71,
    OP_2SWAP = 0x72,
    OP_IFDUP = 0x73,
    OP_DEPTH = 0x74,
    OP_DROP = 0x75,
    OP_DUP = 0x76,
    OP_NIP = 0x77,
    OP_OVER = 0x78,
    OP_PICK = 0x79,
    OP_ROLL = 0x7a,
    OP_ROT = 0x7b,
    OP_SWAP = 0x7c,
    OP_TUCK = 0x7d,

    // splice ops
    OP_CAT = 0x7e,
    OP_SUBSTR = 0x7f,
    OP_LEFT = 0x80,
    OP_RIGHT = 0x81,
    OP_SIZE = 0x82,

    // bit logic
    OP_INVERT = 0x83,
    OP_AND = 0x84,
    OP_OR = 0x85,
    OP_XOR = 0x86,
    OP_EQUAL = 0x87,
    OP_EQUALVERIFY = 0x88,
    OP_RESERVED1 = 0x89,
    OP_RESERVED2 = 0x8a,

    // numeric
    OP_1ADD = 0x8b,
    OP_1SUB = 0x8c,
    OP_2MUL = 0x8d,
    OP_2DIV = 0x8e,
    OP_NEGATE = 0x8f,
    OP_ABS = 0x90,
    OP_NOT = 0x91,
    OP_0NOTEQUAL = 0x92,
    OP_ADD = 0x93,
    OP_SUB = 0x94,
    OP_MUL = 0x95,
    OP_DIV = 0x96,
    OP_MOD = 0x97,
    OP_LSHIFT = 0x98,
    OP_RSHIFT = 0x99,
    OP_BOOLAND = 0x9a,
    OP_BOOLOR = 0x9b,
    OP_NUMEQUAL = 0x9c,
    OP_NUMEQUALVERIFY = 0x9d,
    OP_NUMNOTEQUAL = 0x9e,
    OP_LESSTHAN = 0x9f,
    OP_GREATERTHAN = 0xa0,
    OP_LESSTHANOREQUAL = 0xa1,
    OP_GREATERTHANOREQUAL = 0xa2,
    OP_MIN = 0xa3,
    OP_MAX = 0xa4,
    OP_WITHIN = 0xa5,

    // crypto
    OP_RIPEMD160 = 0xa6,
    OP_SHA1 = 0xa7,
    OP_SHA256 = 0xa8,
    OP_HASH160 = 0xa9,
    OP_HASH256 = 0xaa,
    OP_CODESEPARATOR = 0xab,
    OP_CHECKSIG = 0xac,
    OP_CHECKSIGVERIFY = 0xad,
    OP_CHECKMULTISIG = 0xae,
    OP_CHECKMULTISIGVERIFY = 0xaf,

    // expansion
    OP_NOP1 = 0xb0,
    OP_CHECKLOCKTIMEVERIFY = 0xb1,
    OP_CHECKSEQUENCEVERIFY = 0xb2,
    OP_NOP4 = 0xb3,
    OP_NOP5 = 0xb4,
    OP_NOP6 = 0xb5,
    OP_NOP7 = 0xb6,
    OP_NOP8 = 0xb7,
    OP_NOP9 = 0xb8,
    OP_NOP10 = 0xb9,

    // template matching params
    OP_SMALLINTEGER = 0xfa,
    OP_PUBKEYS = 0xfb,
    OP_PUBKEYHASH = 0xfd,
    OP_PUBKEY = 0xfe,
    OP_INVALIDOPCODE = 0xff,
}

struct OpcodeTable {
    names: Vec<String>,
    assigned: [bool; 256],
    by_name: HashMap<String, Opcode>,
}

impl OpcodeTable {
    fn build() -> Self {
        let mut named: Vec<Option<String>> = vec![None; 256];
        for &(name, value) in ASSIGNED {
            named[value as usize] = Some(name.to_string());
        }
        for len in 1..=MAX_DIRECT_PUSH {
            named[len as usize] = Some(format!("OP_DATA_{}", len));
        }

        let mut assigned = [false; 256];
        for (value, name) in named.iter().enumerate() {
            assigned[value] = name.is_some();
        }

        let names: Vec<String> = named
            .into_iter()
            .enumerate()
            .map(|(value, name)| name.unwrap_or_else(|| format!("OP_UNKNOWN_{}", value)))
            .collect();

        let by_name = names
            .iter()
            .enumerate()
            .map(|(value, name)| (name.clone(), Opcode(value as u8)))
            .collect();

        OpcodeTable { names, assigned, by_name }
    }
}

lazy_static! {
    static ref TABLE: OpcodeTable = OpcodeTable::build();
}

impl Opcode {
    /// Look up the opcode for a byte value. Total over 0..=255.
    pub const fn from_u8(value: u8) -> Self {
        Opcode(value)
    }

    /// Look up an opcode by its symbolic name.
    ///
    /// # Arguments
    /// * `name` - An `OP_xxx` name, e.g. "OP_DUP" or "OP_PUSHDATA2".
    ///
    /// # Returns
    /// The opcode, or `UnknownOpcodeName` if no opcode has that name.
    pub fn from_name(name: &str) -> Result<Self, ScriptError> {
        TABLE
            .by_name
            .get(name)
            .copied()
            .ok_or_else(|| ScriptError::UnknownOpcodeName {
                name: name.to_string(),
            })
    }

    /// Select the smallest push opcode able to carry `len` bytes.
    ///
    /// Empty payloads use `OP_PUSHDATA1`, since `OP_0` carries no data.
    /// Returns `None` when the payload exceeds the 4-byte length field.
    pub fn for_push_len(len: usize) -> Option<Self> {
        if len >= 1 && len <= MAX_DIRECT_PUSH as usize {
            Some(Opcode(len as u8))
        } else if len <= u8::MAX as usize {
            Some(OP_PUSHDATA1)
        } else if len <= u16::MAX as usize {
            Some(OP_PUSHDATA2)
        } else if len <= u32::MAX as usize {
            Some(OP_PUSHDATA4)
        } else {
            None
        }
    }

    /// Iterate over all 256 opcodes in byte order.
    pub fn all() -> impl Iterator<Item = Opcode> {
        (0..=u8::MAX).map(Opcode)
    }

    /// The opcode's byte value.
    pub const fn value(self) -> u8 {
        self.0
    }

    /// The opcode's canonical name.
    pub fn name(self) -> &'static str {
        let table: &'static OpcodeTable = &TABLE;
        table.names[self.0 as usize].as_str()
    }

    /// How this opcode encodes the length of its push data.
    pub const fn push_kind(self) -> PushKind {
        match self.0 {
            0x01..=MAX_DIRECT_PUSH => PushKind::Fixed(self.0),
            0x4c => PushKind::Len1,
            0x4d => PushKind::Len2Le,
            0x4e => PushKind::Len4Le,
            _ => PushKind::None,
        }
    }

    /// Whether this opcode carries push data.
    pub const fn is_push(self) -> bool {
        !matches!(self.push_kind(), PushKind::None)
    }

    /// Whether this byte value has a defined meaning.
    ///
    /// Unassigned bytes still decode and encode by raw value; this lets
    /// stricter callers reject them.
    pub fn is_assigned(self) -> bool {
        TABLE.assigned[self.0 as usize]
    }
}

impl From<u8> for Opcode {
    fn from(value: u8) -> Self {
        Opcode(value)
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> Self {
        op.0
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02x})", self.name(), self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Every byte value maps to a name that maps back to the same byte.
    #[test]
    fn test_name_value_bijection() {
        for op in Opcode::all() {
            let back = Opcode::from_name(op.name()).expect("name should resolve");
            assert_eq!(back, op, "round trip failed for {}", op.name());
        }
    }

    /// Well-known names resolve to their standard byte values.
    #[test]
    fn test_from_name_known() {
        assert_eq!(Opcode::from_name("OP_0").unwrap().value(), 0x00);
        assert_eq!(Opcode::from_name("OP_DUP").unwrap(), OP_DUP);
        assert_eq!(Opcode::from_name("OP_PUSHDATA4").unwrap().value(), 0x4e);
        assert_eq!(Opcode::from_name("OP_CHECKSIG").unwrap().value(), 0xac);
        assert_eq!(Opcode::from_name("OP_DATA_20").unwrap().value(), 20);
    }

    /// Names outside the table fail with UnknownOpcodeName.
    #[test]
    fn test_from_name_unknown() {
        let err = Opcode::from_name("OP_99").unwrap_err();
        assert_eq!(
            err,
            ScriptError::UnknownOpcodeName { name: "OP_99".to_string() }
        );
        assert!(Opcode::from_name("op_dup").is_err());
        assert!(Opcode::from_name("").is_err());
    }

    /// Unassigned bytes get a synthesized name and report as unassigned.
    #[test]
    fn test_unassigned_bytes() {
        let op = Opcode::from_u8(0xba);
        assert_eq!(op.name(), "OP_UNKNOWN_186");
        assert!(!op.is_assigned());
        assert!(!op.is_push());
        assert_eq!(Opcode::from_name("OP_UNKNOWN_186").unwrap(), op);
        assert!(OP_CHECKSIG.is_assigned());
        assert!(Opcode::from_u8(5).is_assigned());
    }

    // -----------------------------------------------------------------------
    // Push classification
    // -----------------------------------------------------------------------

    /// Byte values 1..=75 are fixed pushes of their own length.
    #[test]
    fn test_push_kind_fixed() {
        for n in 1..=75u8 {
            assert_eq!(Opcode::from_u8(n).push_kind(), PushKind::Fixed(n));
        }
    }

    /// The three PUSHDATA opcodes use 1, 2 and 4 byte length fields.
    #[test]
    fn test_push_kind_variable() {
        assert_eq!(OP_PUSHDATA1.push_kind(), PushKind::Len1);
        assert_eq!(OP_PUSHDATA2.push_kind(), PushKind::Len2Le);
        assert_eq!(OP_PUSHDATA4.push_kind(), PushKind::Len4Le);
        assert_eq!(PushKind::Len1.length_field_size(), 1);
        assert_eq!(PushKind::Len2Le.length_field_size(), 2);
        assert_eq!(PushKind::Len4Le.length_field_size(), 4);
    }

    /// Everything else, OP_0 included, is a non-push opcode.
    #[test]
    fn test_push_kind_none() {
        let pushes = Opcode::all().filter(|op| op.is_push()).count();
        assert_eq!(pushes, 78);
        assert!(!OP_0.is_push());
        assert!(!OP_1NEGATE.is_push());
        assert!(!OP_16.is_push());
        assert!(!OP_INVALIDOPCODE.is_push());
    }

    /// for_push_len picks the minimal encoding at each boundary.
    #[test]
    fn test_for_push_len() {
        assert_eq!(Opcode::for_push_len(0), Some(OP_PUSHDATA1));
        assert_eq!(Opcode::for_push_len(1), Some(Opcode::from_u8(1)));
        assert_eq!(Opcode::for_push_len(75), Some(Opcode::from_u8(75)));
        assert_eq!(Opcode::for_push_len(76), Some(OP_PUSHDATA1));
        assert_eq!(Opcode::for_push_len(255), Some(OP_PUSHDATA1));
        assert_eq!(Opcode::for_push_len(256), Some(OP_PUSHDATA2));
        assert_eq!(Opcode::for_push_len(65535), Some(OP_PUSHDATA2));
        assert_eq!(Opcode::for_push_len(65536), Some(OP_PUSHDATA4));
    }

    /// Display shows the bare name; Debug adds the byte value.
    #[test]
    fn test_formatting() {
        assert_eq!(OP_EQUALVERIFY.to_string(), "OP_EQUALVERIFY");
        assert_eq!(format!("{:?}", OP_EQUALVERIFY), "OP_EQUALVERIFY(0x88)");
    }
}
