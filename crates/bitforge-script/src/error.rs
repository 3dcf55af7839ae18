/// Error types for script operations.
///
/// Covers binary underflow, textual parse failures, and invalid explicit
/// construction of instructions. Every variant carries the offending value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    /// The buffer ended before a complete field could be read.
    #[error("insufficient data: requested {requested} bytes, {available} available")]
    InsufficientData {
        /// Number of bytes the decoder asked for.
        requested: usize,
        /// Number of bytes left in the buffer.
        available: usize,
    },

    /// A token looked like an opcode name but is not in the opcode table.
    #[error("unknown opcode name '{name}'")]
    UnknownOpcodeName {
        /// The unrecognized name.
        name: String,
    },

    /// A push opcode or length token was not followed by its arguments.
    #[error("missing push arguments after '{token}'")]
    MissingPushArguments {
        /// The opcode name or length token left dangling.
        token: String,
    },

    /// The declared push length does not match the data that follows it.
    #[error("push data length mismatch: declared {declared}, got {actual}")]
    InvalidPushDataLength {
        /// The length stated by the opcode or length token.
        declared: usize,
        /// The length of the data actually supplied.
        actual: usize,
    },

    /// A token could not be read as push data or a push length.
    #[error("invalid push data '{token}'")]
    InvalidPushData {
        /// The malformed token.
        token: String,
    },

    /// Data was attached to an opcode that does not push.
    #[error("opcode {opcode} does not take push data")]
    UnexpectedPushData {
        /// Name of the non-push opcode.
        opcode: String,
    },

    /// A push opcode was built without any data.
    #[error("opcode {opcode} requires push data")]
    MissingPushData {
        /// Name of the push opcode.
        opcode: String,
    },

    /// The payload does not fit in the opcode's length field.
    #[error("{length} bytes do not fit in a {opcode} push")]
    PushDataTooLarge {
        /// Name of the push opcode.
        opcode: String,
        /// Length of the rejected payload.
        length: usize,
    },

    /// Invalid hex string.
    #[error("invalid hex: {text}")]
    InvalidHex {
        /// The text that failed to decode.
        text: String,
    },
}
