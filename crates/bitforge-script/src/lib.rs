/// Bitcoin script codec.
///
/// Provides the opcode table, the instruction type, and the `Script` type
/// with lossless conversion between binary, hex and textual forms.

pub mod opcodes;
pub mod instruction;
pub mod reader;
pub mod script;

mod error;
pub use error::ScriptError;
pub use instruction::Instruction;
pub use opcodes::{Opcode, PushKind};
pub use reader::ScriptReader;
pub use script::Script;
