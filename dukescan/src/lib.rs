//! A crate for decoding the [code](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-6.html) of Java methods
//! and for finding sequences of instructions in it.
//!
//! Decoding turns the raw bytes of a method body into [`Instruction`]s with absolute offsets and jump targets.
//! Searching works by giving every opcode a token, and running a regular expression built from instruction names
//! (like `"BranchInstruction NOP ISTORE"`) over the tokens of the instructions:
//! ```
//! use dukescan::{decode, PatternCompiler, SequenceMatcher};
//!
//! # fn main() -> dukescan::Result<()> {
//! let instructions = decode(&[0x03, 0x3c, 0xa7, 0x00, 0x03, 0x00, 0x3c, 0xb1])?;
//! let matcher = SequenceMatcher::new(instructions)?;
//! let pattern = PatternCompiler::new().compile("goto nop istore")?;
//!
//! let windows: Vec<_> = matcher.search(&pattern).collect();
//! assert_eq!(windows.len(), 1);
//! assert_eq!(windows[0].range, 2..5);
//! # Ok(())
//! # }
//! ```

pub mod class_constants;
pub mod cursor;
pub mod instruction;
pub mod decoder;
pub mod targets;
pub mod alphabet;
pub mod pattern;
pub mod matcher;
mod error;

pub use error::{Error, Result};
pub use instruction::{Instruction, Operands};
pub use decoder::InstructionDecoder;
pub use targets::{ExceptionHandler, LocalVariableRange, TargetResolver};
pub use alphabet::TokenAlphabet;
pub use pattern::{CompiledPattern, PatternCompiler};
pub use matcher::{MatchFilter, MatchWindow, Matches, SequenceMatcher};

/// Decodes a whole method body.
///
/// See [`InstructionDecoder::decode_all`].
pub fn decode(code: &[u8]) -> Result<Vec<Instruction>> {
	InstructionDecoder::decode_all(code)
}
