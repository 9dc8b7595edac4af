use thiserror::Error;

/// The error type of all operations of this crate.
///
/// All of these are terminal for the operation that raised them: decoding of a method body stops at the first
/// malformed instruction, compiling a pattern stops at the first unknown name.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
	#[error("unexpected end of stream at offset {offset}: needed {needed} byte(s), but only {remaining} remain")]
	UnexpectedEndOfStream {
		offset: usize,
		needed: usize,
		remaining: usize,
	},
	#[error("unknown opcode {opcode:#04x} at bytecode offset {offset}")]
	UnknownOpcode {
		opcode: u8,
		offset: u32,
	},
	#[error("unknown instruction name: {0:?}")]
	UnknownInstructionName(String),
	#[error("no instruction at position {0}")]
	PositionNotFound(usize),
	#[error("branch at bytecode offset {offset} with relative offset {relative} points outside of the code")]
	InvalidBranchTarget {
		offset: u32,
		relative: i32,
	},
	#[error("opcode {opcode:#04x} at bytecode offset {offset} can't be modified by a wide prefix")]
	IllegalWideTarget {
		opcode: u8,
		offset: u32,
	},
	#[error("malformed switch at bytecode offset {offset}: {reason}")]
	MalformedSwitch {
		offset: u32,
		reason: String,
	},
	#[error("code of length {0} doesn't fit into 32 bit offsets")]
	CodeTooLarge(usize),
	#[error("bytecode offset {offset} out of bounds for code length {code_length}")]
	OffsetOutOfBounds {
		/// Wider than an offset, as the end of a local variable range may overflow 32 bits.
		offset: u64,
		code_length: u32,
	},
	#[error("invalid pattern: {0}")]
	InvalidPattern(String),
}

impl From<regex::Error> for Error {
	fn from(value: regex::Error) -> Self {
		Error::InvalidPattern(value.to_string())
	}
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
