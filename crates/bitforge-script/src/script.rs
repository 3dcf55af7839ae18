//! Bitcoin Script type - an ordered sequence of instructions.
//!
//! A `Script` is parsed from raw bytes, hex, or the whitespace-separated
//! textual form, or built from explicit instructions. It is never mutated in
//! place; every decode either yields a complete script or fails.

use std::fmt;
use std::str::FromStr;

use crate::instruction::Instruction;
use crate::reader::ScriptReader;
use crate::ScriptError;

/// A Bitcoin script, represented as its decoded instructions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Script {
    instructions: Vec<Instruction>,
}

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    pub fn new() -> Self {
        Script::default()
    }

    /// Create a script from already validated instructions.
    pub fn from_instructions(instructions: Vec<Instruction>) -> Self {
        Script { instructions }
    }

    /// Decode a script from its binary form.
    ///
    /// Consumes the buffer exactly to its end, one instruction at a time.
    /// An empty buffer gives an empty script.
    ///
    /// # Arguments
    /// * `bytes` - Raw script bytes.
    ///
    /// # Returns
    /// The decoded `Script`, or `InsufficientData` if any instruction is
    /// truncated.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScriptError> {
        let mut reader = ScriptReader::new(bytes);
        let mut instructions = Vec::new();
        while !reader.is_empty() {
            let offset = reader.position();
            let instruction = Instruction::read(&mut reader).map_err(|e| {
                tracing::trace!(offset, error = %e, "script decode failed");
                e
            })?;
            instructions.push(instruction);
        }
        tracing::trace!(
            bytes = bytes.len(),
            instructions = instructions.len(),
            "decoded binary script"
        );
        Ok(Script { instructions })
    }

    /// Decode a script from a hex-encoded binary form.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string (e.g. "76a914...88ac").
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str).map_err(|_| ScriptError::InvalidHex {
            text: hex_str.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }

    /// Decode a script from its textual form.
    ///
    /// Tokens are separated by whitespace. Non-push opcodes appear by name,
    /// direct pushes as `<len> 0x<hex>`, and PUSHDATA pushes as
    /// `OP_PUSHDATAn <len> 0x<hex>`.
    ///
    /// # Arguments
    /// * `text` - The textual script.
    ///
    /// # Returns
    /// The decoded `Script`, or the first token-level error encountered.
    pub fn from_string(text: &str) -> Result<Self, ScriptError> {
        let mut tokens = text.split_whitespace();
        let mut instructions = Vec::new();
        while let Some(token) = tokens.next() {
            instructions.push(Instruction::from_tokens(token, &mut tokens)?);
        }
        tracing::trace!(instructions = instructions.len(), "decoded textual script");
        Ok(Script { instructions })
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Encode the script in binary form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = self.instructions.iter().map(Instruction::encoded_len).sum();
        let mut out = Vec::with_capacity(len);
        for instruction in &self.instructions {
            instruction.write_to(&mut out);
        }
        out
    }

    /// Encode the script's binary form as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The script's instructions in execution order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterate over the instructions.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the script has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Whether every instruction is a data push.
    pub fn is_push_only(&self) -> bool {
        self.instructions.iter().all(Instruction::is_push)
    }

    /// Consume the script and return its instructions.
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, instruction) in self.instructions.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", instruction)?;
        }
        Ok(())
    }
}

impl FromStr for Script {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Script::from_string(s)
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Vec<Instruction>> for Script {
    fn from(instructions: Vec<Instruction>) -> Self {
        Script::from_instructions(instructions)
    }
}

impl<'a> IntoIterator for &'a Script {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
