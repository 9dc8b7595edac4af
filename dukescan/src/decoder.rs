use log::{debug, trace};
use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::instruction::{shape, Instruction, LvIndex, Operand, OperandType, Operands, Shape};

/// Decodes the instructions of a single method body.
///
/// A decoder is one decode session: it carries the state of a `wide` prefix from one instruction to the next. Use a
/// new decoder for each method body.
#[derive(Debug, Clone)]
pub struct InstructionDecoder<'a> {
	cursor: ByteCursor<'a>,
	wide: bool,
}

impl<'a> InstructionDecoder<'a> {
	pub fn new(code: &'a [u8]) -> Result<InstructionDecoder<'a>> {
		// Offsets are stored as `u32`, and so is the offset after the last instruction.
		if u32::try_from(code.len()).is_err() {
			return Err(Error::CodeTooLarge(code.len()));
		}

		Ok(InstructionDecoder {
			cursor: ByteCursor::new(code),
			wide: false,
		})
	}

	/// Decodes all instructions of the given method body.
	///
	/// This fails on the first malformed instruction; no partial result is returned.
	pub fn decode_all(code: &[u8]) -> Result<Vec<Instruction>> {
		let mut decoder = InstructionDecoder::new(code)?;

		let mut instructions = Vec::with_capacity(code.len() / 2);
		while let Some(instruction) = decoder.next_instruction()? {
			instructions.push(instruction);
		}

		debug!("decoded {} instructions from {} bytes of code", instructions.len(), code.len());

		Ok(instructions)
	}

	/// The offset of the next instruction to be decoded.
	pub fn offset(&self) -> u32 {
		// can't fail, the length was checked in `new`
		self.cursor.offset() as u32
	}

	/// Returns `true` if the last decoded instruction was a `wide` prefix.
	pub fn is_wide(&self) -> bool {
		self.wide
	}

	/// Returns the opcode of the next instruction without decoding it.
	pub fn peek_opcode(&mut self) -> Result<u8> {
		self.cursor.peek_u8()
	}

	/// Decodes the next instruction, or returns `None` if the end of the code was reached.
	pub fn next_instruction(&mut self) -> Result<Option<Instruction>> {
		if self.cursor.is_empty() {
			return Ok(None);
		}
		self.decode().map(Some)
	}

	/// Decodes exactly one instruction.
	pub fn decode(&mut self) -> Result<Instruction> {
		let start = self.offset();
		let opcode = self.cursor.read_u8()?;

		let shape = shape(opcode).ok_or(Error::UnknownOpcode { opcode, offset: start })?;

		// The flag only ever applies to the instruction right after the prefix.
		let wide = std::mem::take(&mut self.wide);
		if wide && !matches!(shape, Shape::LocalVariable | Shape::IInc) {
			return Err(Error::IllegalWideTarget { opcode, offset: start });
		}

		let operands = match shape {
			Shape::TableSwitch => {
				let padding = self.align_to_4_byte_boundary()?;

				let default = self.read_i32_as_branch_target(start)?;
				let low = self.cursor.read_i32()?;
				let high = self.cursor.read_i32()?;

				if low > high {
					return Err(Error::MalformedSwitch {
						offset: start,
						reason: format!("`low` must be lower or equal to `high`, it's low={low:?} and high={high:?}"),
					});
				}

				let n = (high as i64 - low as i64 + 1) as usize; // always >= 1

				let mut table = Vec::with_capacity(n.min(self.cursor.remaining() / 4));
				for _ in 0..n {
					table.push(self.read_i32_as_branch_target(start)?);
				}

				Operands::TableSwitch { padding, default, low, high, table }
			},
			Shape::LookupSwitch => {
				let padding = self.align_to_4_byte_boundary()?;

				let default = self.read_i32_as_branch_target(start)?;
				let n = self.cursor.read_u32()? as usize;

				let mut pairs = Vec::with_capacity(n.min(self.cursor.remaining() / 8));
				for _ in 0..n {
					let key = self.cursor.read_i32()?;
					let target = self.read_i32_as_branch_target(start)?;
					pairs.push((key, target));
				}

				Operands::LookupSwitch { padding, default, pairs }
			},
			Shape::Branch16 => Operands::Branch(self.read_i16_as_branch_target(start)?),
			Shape::Branch32 => Operands::Branch(self.read_i32_as_branch_target(start)?),
			Shape::LocalVariable => Operands::LocalVariable(self.read_local_variable(wide)?),
			Shape::IInc => {
				let index = self.read_local_variable(wide)?;
				let value = if wide {
					self.cursor.read_i16()?
				} else {
					self.cursor.read_i8()? as i16
				};
				Operands::IInc { index, value }
			},
			Shape::Wide => {
				trace!("wide prefix at bytecode offset {start}");
				self.wide = true;
				Operands::Wide
			},
			Shape::Fixed([]) => Operands::None,
			Shape::Fixed(types) => {
				let mut operands = Vec::with_capacity(types.len());
				for operand_type in types {
					operands.push(match operand_type {
						OperandType::Byte => Operand::Byte(self.cursor.read_u8()?),
						OperandType::Short => Operand::Short(self.cursor.read_u16()?),
						OperandType::Int => Operand::Int(self.cursor.read_i32()?),
					});
				}
				Operands::Fixed(operands)
			},
		};

		let length = self.offset() - start;

		let instruction = Instruction { offset: start, opcode, operands, length };
		trace!("{start:>5}: {} {:?}", instruction.name(), instruction.operands);
		Ok(instruction)
	}

	/// Skips the padding before the table of a `tableswitch` or `lookupswitch`, returning the number of bytes skipped.
	///
	/// Must be called right after reading the opcode.
	fn align_to_4_byte_boundary(&mut self) -> Result<u8> {
		// The offset here is the one of the opcode plus one.
		let padding = (4 - (self.cursor.offset() % 4)) % 4;
		self.cursor.skip(padding)?;
		Ok(padding as u8)
	}

	fn read_local_variable(&mut self, wide: bool) -> Result<LvIndex> {
		let index = if wide {
			self.cursor.read_u16()?
		} else {
			self.cursor.read_u8()? as u16
		};
		Ok(LvIndex { index })
	}

	fn read_i16_as_branch_target(&mut self, opcode_pos: u32) -> Result<u32> {
		let branch = self.cursor.read_i16()?;
		opcode_pos.checked_add_signed(branch as i32)
			.ok_or(Error::InvalidBranchTarget { offset: opcode_pos, relative: branch as i32 })
	}

	fn read_i32_as_branch_target(&mut self, opcode_pos: u32) -> Result<u32> {
		let branch = self.cursor.read_i32()?;
		opcode_pos.checked_add_signed(branch)
			.ok_or(Error::InvalidBranchTarget { offset: opcode_pos, relative: branch })
	}
}

impl Iterator for InstructionDecoder<'_> {
	type Item = Result<Instruction>;

	fn next(&mut self) -> Option<Self::Item> {
		self.next_instruction().transpose()
	}
}
