use std::collections::BTreeSet;
use crate::error::{Error, Result};
use crate::instruction::Instruction;

/// An entry of the exception table of a method body.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ExceptionHandler {
	pub start: u32,
	/// Exclusive.
	pub end: u32,
	pub handler: u32,
	/// The constant pool index of the caught class, or `0` for catching everything.
	pub catch_type: u16,
}

/// The range a local variable is live in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LocalVariableRange {
	pub start: u32,
	pub length: u32,
}

impl LocalVariableRange {
	/// The offset right after the range, or `None` if that doesn't fit into 32 bits.
	pub fn end(&self) -> Option<u32> {
		self.start.checked_add(self.length)
	}
}

/// Collects the bytecode offsets that are referenced by something, and therefore need a stable label when the
/// instructions are displayed, patched or relocated.
///
/// These are all the branch and switch targets of the instructions, the offsets given by the exception table, and
/// the start and end of the local variable ranges.
#[derive(Debug, Default, Clone)]
pub struct TargetResolver<'a> {
	exception_table: &'a [ExceptionHandler],
	local_variables: &'a [LocalVariableRange],
}

impl<'a> TargetResolver<'a> {
	pub fn new() -> TargetResolver<'a> {
		TargetResolver::default()
	}

	pub fn exception_table(mut self, exception_table: &'a [ExceptionHandler]) -> TargetResolver<'a> {
		self.exception_table = exception_table;
		self
	}

	pub fn local_variables(mut self, local_variables: &'a [LocalVariableRange]) -> TargetResolver<'a> {
		self.local_variables = local_variables;
		self
	}

	/// Returns all referenced offsets, in ascending order.
	///
	/// The end of a local variable range overflowing 32 bits isn't a bytecode offset, and is left out. Use
	/// [`TargetResolver::resolve_within`] to have it reported.
	pub fn resolve(&self, instructions: &[Instruction]) -> BTreeSet<u32> {
		self.references(instructions)
			.filter_map(|(offset, _)| u32::try_from(offset).ok())
			.collect()
	}

	/// Like [`TargetResolver::resolve`], but also checks that each offset lies within code of the given length.
	///
	/// Branch targets and the start of ranges must be lower than the code length, the (exclusive) end of a range may
	/// also be equal to it.
	pub fn resolve_within(&self, instructions: &[Instruction], code_length: u32) -> Result<BTreeSet<u32>> {
		self.references(instructions)
			.map(|(offset, exclusive)| {
				let in_bounds = offset < u64::from(code_length) || (exclusive && offset == u64::from(code_length));
				match u32::try_from(offset) {
					Ok(offset) if in_bounds => Ok(offset),
					_ => Err(Error::OffsetOutOfBounds { offset, code_length }),
				}
			})
			.collect()
	}

	/// Iterates over all referenced offsets together with a flag telling if the offset is the exclusive end of a range.
	///
	/// Offsets are widened to 64 bits, so that the end of a local variable range can't overflow.
	fn references<'s>(&'s self, instructions: &'s [Instruction]) -> impl Iterator<Item = (u64, bool)> + 's {
		let branches = instructions.iter()
			.flat_map(|instruction| instruction.branch_targets())
			.map(|target| (u64::from(target), false));

		let exceptions = self.exception_table.iter()
			.flat_map(|e| [(e.start, false), (e.end, true), (e.handler, false)])
			.map(|(offset, exclusive)| (u64::from(offset), exclusive));

		let local_variables = self.local_variables.iter()
			.flat_map(|lv| [
				(u64::from(lv.start), false),
				(u64::from(lv.start) + u64::from(lv.length), true),
			]);

		branches.chain(exceptions).chain(local_variables)
	}
}
