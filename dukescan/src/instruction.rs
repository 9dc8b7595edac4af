use crate::class_constants::{opcode, opcode_name};

/// The type of a fixed-width operand.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OperandType {
	/// One byte.
	Byte,
	/// Two bytes.
	Short,
	/// Four bytes.
	Int,
}

impl OperandType {
	pub fn width(self) -> u32 {
		match self {
			OperandType::Byte => 1,
			OperandType::Short => 2,
			OperandType::Int => 4,
		}
	}
}

/// A fixed-width operand as it was read. Use [`Operand::signed`] or [`Operand::unsigned`] depending on what the
/// instruction means by it (`bipush` pushes a signed byte, `ldc` takes an unsigned index).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operand {
	Byte(u8),
	Short(u16),
	Int(i32),
}

impl Operand {
	pub fn signed(self) -> i32 {
		match self {
			Operand::Byte(x) => x as i8 as i32,
			Operand::Short(x) => x as i16 as i32,
			Operand::Int(x) => x,
		}
	}

	pub fn unsigned(self) -> u32 {
		match self {
			Operand::Byte(x) => x as u32,
			Operand::Short(x) => x as u32,
			Operand::Int(x) => x as u32,
		}
	}
}

/// Represents an index of a local variable.
///
/// If the local variable is of type `double` or `long`, it also occupies
/// the [`LvIndex`] with `index = index + 1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LvIndex {
	pub index: u16,
}

/// The operands of a decoded instruction.
///
/// All jump targets are absolute bytecode offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operands {
	/// The instruction has no operands.
	None,
	/// Operands read according to the operand types of the opcode, see [`operand_types`].
	Fixed(Vec<Operand>),
	/// A load, store or `ret`; the index is 16 bit wide if a `wide` prefix came before.
	LocalVariable(LvIndex),
	/// The operands of `iinc`. Both are 16 bit wide if a `wide` prefix came before, 8 bit otherwise.
	IInc {
		index: LvIndex,
		value: i16,
	},
	/// A 16 or 32 bit branch.
	Branch(u32),
	TableSwitch {
		/// The number of bytes skipped to align the table.
		padding: u8,
		default: u32,
		low: i32,
		high: i32,
		table: Vec<u32>,
	},
	LookupSwitch {
		/// The number of bytes skipped to align the table.
		padding: u8,
		default: u32,
		pairs: Vec<(i32, u32)>,
	},
	/// The `wide` prefix itself. It widens the operands of the following instruction.
	Wide,
}

/// A single decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
	/// The bytecode offset of the opcode.
	pub offset: u32,
	pub opcode: u8,
	pub operands: Operands,
	/// The number of bytes this instruction occupies, including padding.
	pub length: u32,
}

impl Instruction {
	/// The canonical name of the opcode.
	pub fn name(&self) -> &'static str {
		opcode_name(self.opcode).unwrap_or("<illegal opcode>")
	}

	/// The offset right after this instruction.
	pub fn end_offset(&self) -> u32 {
		self.offset + self.length
	}

	/// Iterates over all the offsets this instruction may jump to.
	///
	/// For switches the default target is returned first, followed by the table entries in order.
	pub fn branch_targets(&self) -> impl Iterator<Item = u32> + '_ {
		const NO_TABLE: &[u32] = &[];
		const NO_PAIRS: &[(i32, u32)] = &[];

		let (single, table, pairs) = match &self.operands {
			Operands::Branch(target) => (Some(*target), NO_TABLE, NO_PAIRS),
			Operands::TableSwitch { default, table, .. } => (Some(*default), table.as_slice(), NO_PAIRS),
			Operands::LookupSwitch { default, pairs, .. } => (Some(*default), NO_TABLE, pairs.as_slice()),
			_ => (None, NO_TABLE, NO_PAIRS),
		};

		single.into_iter()
			.chain(table.iter().copied())
			.chain(pairs.iter().map(|&(_, target)| target))
	}

	/// Returns the local variable this instruction accesses, if any.
	///
	/// This also works for the forms with the index in the opcode, like `iload_2` or `astore_0`.
	pub fn local_variable(&self) -> Option<LvIndex> {
		match (&self.operands, self.opcode) {
			(Operands::LocalVariable(index), _) => Some(*index),
			(Operands::IInc { index, .. }, _) => Some(*index),
			(_, opcode @ (opcode::ILOAD_0..=opcode::ALOAD_3)) => {
				let shifted = opcode - opcode::ILOAD_0; // 0..=19
				Some(LvIndex { index: (shifted & 0b11) as u16 })
			},
			(_, opcode @ (opcode::ISTORE_0..=opcode::ASTORE_3)) => {
				let shifted = opcode - opcode::ISTORE_0; // 0..=19
				Some(LvIndex { index: (shifted & 0b11) as u16 })
			},
			_ => None,
		}
	}
}

/// How the operands of an opcode are encoded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Shape {
	/// A fixed sequence of operands; possibly empty.
	Fixed(&'static [OperandType]),
	/// An unsigned local variable index, 8 bit, or 16 bit after `wide`.
	LocalVariable,
	/// Local variable index and signed increment, 8 bit each, or 16 bit each after `wide`.
	IInc,
	/// A signed 16 bit branch offset.
	Branch16,
	/// A signed 32 bit branch offset.
	Branch32,
	TableSwitch,
	LookupSwitch,
	Wide,
}

/// Returns how the operands of an opcode are encoded, or `None` if the opcode isn't valid.
pub(crate) fn shape(opcode: u8) -> Option<Shape> {
	use OperandType::*;

	Some(match opcode {
		opcode::ILOAD..=opcode::ALOAD |
		opcode::ISTORE..=opcode::ASTORE |
		opcode::RET => Shape::LocalVariable,
		opcode::IINC => Shape::IInc,
		opcode::IFEQ..=opcode::JSR |
		opcode::IFNULL |
		opcode::IFNONNULL => Shape::Branch16,
		opcode::GOTO_W |
		opcode::JSR_W => Shape::Branch32,
		opcode::TABLESWITCH => Shape::TableSwitch,
		opcode::LOOKUPSWITCH => Shape::LookupSwitch,
		opcode::WIDE => Shape::Wide,

		opcode::BIPUSH |
		opcode::LDC |
		opcode::NEWARRAY => Shape::Fixed(&[Byte]),
		opcode::SIPUSH |
		opcode::LDC_W |
		opcode::LDC2_W |
		opcode::GETSTATIC..=opcode::INVOKESTATIC |
		opcode::NEW |
		opcode::ANEWARRAY |
		opcode::CHECKCAST |
		opcode::INSTANCEOF => Shape::Fixed(&[Short]),
		opcode::INVOKEINTERFACE |
		opcode::INVOKEDYNAMIC => Shape::Fixed(&[Short, Byte, Byte]),
		opcode::MULTIANEWARRAY => Shape::Fixed(&[Short, Byte]),

		opcode::NOP..=opcode::DCONST_1 |
		opcode::ILOAD_0..=opcode::SALOAD |
		opcode::ISTORE_0..=opcode::LXOR |
		opcode::I2L..=opcode::DCMPG |
		opcode::IRETURN..=opcode::RETURN |
		opcode::ARRAYLENGTH |
		opcode::ATHROW |
		opcode::MONITORENTER |
		opcode::MONITOREXIT |
		opcode::BREAKPOINT |
		opcode::IMPDEP1 |
		opcode::IMPDEP2 => Shape::Fixed(&[]),

		_ => return None,
	})
}

/// Returns the types of the fixed operands of an opcode.
///
/// This is empty for opcodes without operands and for opcodes whose operands aren't a fixed sequence (branches,
/// switches, local variable instructions, `wide`). Returns `None` for invalid opcodes.
pub fn operand_types(opcode: u8) -> Option<&'static [OperandType]> {
	shape(opcode).map(|shape| match shape {
		Shape::Fixed(types) => types,
		_ => &[],
	})
}
