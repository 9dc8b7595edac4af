//! The mapping of opcodes to tokens, and the named groups of opcodes usable in patterns.

use std::collections::BTreeSet;
use indexmap::IndexMap;
use log::debug;
use once_cell::sync::Lazy;
use crate::class_constants::{opcode, opcode_name, valid_opcodes};
use crate::error::{Error, Result};
use crate::instruction::Instruction;

/// The token of opcode `n` is the character `TOKEN_BASE + n`.
///
/// This is the start of the private use area, so no token is ever a regex metacharacter.
pub const TOKEN_BASE: u32 = 0xe000;

/// The length of every token encoded as UTF-8.
pub(crate) const TOKEN_WIDTH: usize = 3;

static ALPHABET: Lazy<TokenAlphabet> = Lazy::new(TokenAlphabet::build);

/// A named set of opcodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasGroup {
	opcodes: Vec<u8>,
	expression: String,
}

impl AliasGroup {
	/// The opcodes of this group, in ascending order. Never empty.
	pub fn opcodes(&self) -> &[u8] {
		&self.opcodes
	}

	/// The alternation of the tokens of all opcodes, as a non-capturing group.
	pub fn expression(&self) -> &str {
		&self.expression
	}
}

/// Maps each valid opcode to a token, and names to groups of opcodes.
///
/// There's only one of these per process, see [`TokenAlphabet::get`].
#[derive(Debug)]
pub struct TokenAlphabet {
	tokens: [Option<char>; 256],
	groups: IndexMap<&'static str, AliasGroup>,
}

impl TokenAlphabet {
	/// Returns the alphabet, building it on first use.
	pub fn get() -> &'static TokenAlphabet {
		&ALPHABET
	}

	/// Returns the token of an opcode, or `None` if the opcode is invalid.
	pub fn token(&self, opcode: u8) -> Option<char> {
		self.tokens[opcode as usize]
	}

	/// Returns the opcode a token stands for.
	pub fn opcode_of(&self, token: char) -> Option<u8> {
		let opcode = u8::try_from((token as u32).checked_sub(TOKEN_BASE)?).ok()?;
		self.token(opcode).map(|_| opcode)
	}

	/// Looks up an instruction name or alias, ignoring case.
	pub fn lookup(&self, name: &str) -> Result<&AliasGroup> {
		self.groups.get(name.to_ascii_lowercase().as_str())
			.ok_or_else(|| Error::UnknownInstructionName(name.to_owned()))
	}

	/// Iterates over all names that can be looked up, in the order they were defined.
	pub fn group_names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.groups.keys().copied()
	}

	/// Encodes instructions as a string of one token per instruction.
	pub fn encode(&self, instructions: &[Instruction]) -> Result<String> {
		let mut string = String::with_capacity(instructions.len() * TOKEN_WIDTH);
		for instruction in instructions {
			let token = self.token(instruction.opcode)
				.ok_or(Error::UnknownOpcode { opcode: instruction.opcode, offset: instruction.offset })?;
			string.push(token);
		}
		Ok(string)
	}

	fn build() -> TokenAlphabet {
		let mut tokens = [None; 256];
		for opcode in valid_opcodes() {
			tokens[opcode as usize] = char::from_u32(TOKEN_BASE + opcode as u32);
		}

		let mut groups = Groups::default();

		for opcode in valid_opcodes() {
			if let Some(name) = opcode_name(opcode) {
				groups.set(name, [opcode]);
			}
		}

		// The loads and stores with the index in the opcode come in blocks of four, in the order i, l, f, d, a.
		// A group named after the generic form replaces the single opcode of that name.
		for (i, base) in (opcode::ILOAD..=opcode::ALOAD).enumerate() {
			let first = opcode::ILOAD_0 + 4 * i as u8;
			if let Some(name) = opcode_name(base) {
				groups.set(name, std::iter::once(base).chain(first..=first + 3));
			}
		}
		for (i, base) in (opcode::ISTORE..=opcode::ASTORE).enumerate() {
			let first = opcode::ISTORE_0 + 4 * i as u8;
			if let Some(name) = opcode_name(base) {
				groups.set(name, std::iter::once(base).chain(first..=first + 3));
			}
		}
		groups.set("iconst", opcode::ICONST_M1..=opcode::ICONST_5);
		groups.set("lconst", opcode::LCONST_0..=opcode::LCONST_1);
		groups.set("fconst", opcode::FCONST_0..=opcode::FCONST_2);
		groups.set("dconst", opcode::DCONST_0..=opcode::DCONST_1);

		groups.set("arithmeticinstruction", opcode::IADD..=opcode::LXOR);
		groups.set("invokeinstruction", opcode::INVOKEVIRTUAL..=opcode::INVOKEDYNAMIC);
		groups.set("arrayinstruction", (opcode::IALOAD..=opcode::SALOAD).chain(opcode::IASTORE..=opcode::SASTORE));
		groups.set("gotoinstruction", [opcode::GOTO, opcode::GOTO_W]);
		groups.set("conversioninstruction", opcode::I2L..=opcode::I2S);
		groups.set("loadinstruction", groups.union(&["iload", "lload", "fload", "dload", "aload"]));
		groups.set("storeinstruction", groups.union(&["istore", "lstore", "fstore", "dstore", "astore"]));
		groups.set("localvariableinstruction", groups.union(&["loadinstruction", "storeinstruction", "iinc"]));
		groups.set("fieldinstruction", opcode::GETSTATIC..=opcode::PUTFIELD);
		groups.set("cpinstruction", (opcode::LDC..=opcode::LDC2_W)
			.chain(opcode::GETSTATIC..=opcode::INVOKEDYNAMIC)
			.chain([opcode::NEW, opcode::ANEWARRAY, opcode::CHECKCAST, opcode::INSTANCEOF, opcode::MULTIANEWARRAY]));
		groups.set("stackinstruction", opcode::POP..=opcode::SWAP);
		groups.set("branchinstruction", (opcode::IFEQ..=opcode::JSR)
			.chain([opcode::TABLESWITCH, opcode::LOOKUPSWITCH, opcode::IFNULL, opcode::IFNONNULL, opcode::GOTO_W, opcode::JSR_W]));
		groups.set("returninstruction", opcode::IRETURN..=opcode::RETURN);
		groups.set("select", [opcode::TABLESWITCH, opcode::LOOKUPSWITCH]);
		groups.set("ifinstruction", (opcode::IFEQ..=opcode::IF_ACMPNE).chain([opcode::IFNULL, opcode::IFNONNULL]));
		groups.set("jsrinstruction", [opcode::JSR, opcode::JSR_W]);
		// the instructions that a code generator may have to encode in a different length
		groups.set("variablelengthinstruction", [opcode::GOTO, opcode::JSR, opcode::TABLESWITCH, opcode::LOOKUPSWITCH]);
		groups.set("unconditionalbranch", [opcode::GOTO, opcode::JSR, opcode::ATHROW, opcode::GOTO_W, opcode::JSR_W]);
		groups.set("constantpushinstruction", groups.union(&["iconst", "lconst", "fconst", "dconst", "bipush", "sipush"]));
		groups.set("allocationinstruction", [opcode::NEW, opcode::NEWARRAY, opcode::ANEWARRAY, opcode::MULTIANEWARRAY]);
		groups.set("pushinstruction", groups.union(&[
			"aconst_null", "iconst", "lconst", "fconst", "dconst", "bipush", "sipush", "ldc", "ldc_w", "ldc2_w",
			"loadinstruction", "dup", "dup2", "getstatic",
		]));
		groups.set("popinstruction", groups.union(&["storeinstruction", "pop", "pop2", "putstatic"]));
		groups.set("indexedinstruction", groups.union(&["cpinstruction", "localvariableinstruction", "ret"]));
		groups.set("exceptionthrower", [opcode::IDIV, opcode::LDIV, opcode::IREM, opcode::LREM, opcode::LDC, opcode::LDC_W, opcode::MULTIANEWARRAY]
			.into_iter()
			.chain(opcode::IALOAD..=opcode::SALOAD)
			.chain(opcode::IASTORE..=opcode::SASTORE)
			.chain(opcode::IRETURN..=opcode::RETURN)
			.chain(opcode::GETSTATIC..=opcode::INVOKEDYNAMIC)
			.chain(opcode::NEW..=opcode::MONITOREXIT));
		groups.set("loadclass", (opcode::GETSTATIC..=opcode::INVOKEDYNAMIC)
			.chain([opcode::NEW, opcode::ANEWARRAY, opcode::CHECKCAST, opcode::INSTANCEOF, opcode::MULTIANEWARRAY]));

		groups.set("if_icmp", opcode::IF_ICMPEQ..=opcode::IF_ICMPLE);
		groups.set("if_acmp", [opcode::IF_ACMPEQ, opcode::IF_ACMPNE]);
		groups.set("if", opcode::IFEQ..=opcode::IFLE);

		groups.set("instruction", valid_opcodes());

		let groups: IndexMap<_, _> = groups.0.into_iter()
			.map(|(name, opcodes)| {
				let expression = Self::alternation(&tokens, &opcodes);
				(name, AliasGroup { opcodes: opcodes.into_iter().collect(), expression })
			})
			.collect();

		debug!("built token alphabet with {} names", groups.len());

		TokenAlphabet { tokens, groups }
	}

	fn alternation(tokens: &[Option<char>; 256], opcodes: &BTreeSet<u8>) -> String {
		let mut expression = String::with_capacity(4 + opcodes.len() * (TOKEN_WIDTH + 1));
		expression.push_str("(?:");
		for (i, token) in opcodes.iter().filter_map(|&opcode| tokens[opcode as usize]).enumerate() {
			if i != 0 {
				expression.push('|');
			}
			expression.push(token);
		}
		expression.push(')');
		expression
	}
}

#[derive(Default)]
struct Groups(IndexMap<&'static str, BTreeSet<u8>>);

impl Groups {
	fn set(&mut self, name: &'static str, opcodes: impl IntoIterator<Item = u8>) {
		self.0.insert(name, opcodes.into_iter().collect());
	}

	/// The union of already defined groups.
	fn union(&self, names: &[&str]) -> BTreeSet<u8> {
		names.iter()
			.filter_map(|&name| self.0.get(name))
			.flatten()
			.copied()
			.collect()
	}
}

#[cfg(test)]
mod testing {
	use std::collections::BTreeSet;
	use pretty_assertions::assert_eq;
	use anyhow::Result;
	use crate::alphabet::{TokenAlphabet, TOKEN_BASE, TOKEN_WIDTH};
	use crate::class_constants::{opcode, opcode_name, valid_opcodes};
	use crate::error::Error;
	use crate::instruction::{Instruction, Operands};

	fn opcodes(alphabet: &TokenAlphabet, name: &str) -> Result<Vec<u8>> {
		Ok(alphabet.lookup(name)?.opcodes().to_vec())
	}

	fn named(names: &[&str]) -> Vec<u8> {
		let set: BTreeSet<u8> = valid_opcodes()
			.filter(|&opcode| opcode_name(opcode).is_some_and(|name| names.contains(&name)))
			.collect();
		assert_eq!(set.len(), names.len(), "some names of {names:?} are not opcode names");
		set.into_iter().collect()
	}

	#[test]
	fn bijection() {
		let alphabet = TokenAlphabet::get();

		let mut seen = BTreeSet::new();
		for opcode in 0..=u8::MAX {
			match alphabet.token(opcode) {
				Some(token) => {
					assert!(seen.insert(token), "token of {opcode:#04x} not unique");
					assert_eq!(token.len_utf8(), TOKEN_WIDTH);
					assert!(!token.is_ascii());
					assert_eq!(alphabet.opcode_of(token), Some(opcode));
				},
				None => assert_eq!(opcode_name(opcode), None),
			}
		}
		assert_eq!(seen.len(), valid_opcodes().count());

		assert_eq!(alphabet.opcode_of('a'), None);
		assert_eq!(alphabet.opcode_of(char::from_u32(TOKEN_BASE + 0xcb).unwrap_or('a')), None);
		assert_eq!(alphabet.opcode_of(char::from_u32(TOKEN_BASE + 0x100).unwrap_or('a')), None);
	}

	#[test]
	fn every_group_is_non_empty() -> Result<()> {
		let alphabet = TokenAlphabet::get();
		for name in alphabet.group_names() {
			let group = alphabet.lookup(name)?;
			assert!(!group.opcodes().is_empty(), "group {name:?} is empty");
			assert!(group.opcodes().windows(2).all(|w| w[0] < w[1]), "group {name:?} isn't sorted");
			assert!(group.expression().starts_with("(?:"));
		}
		Ok(())
	}

	#[test]
	fn exact_names() -> Result<()> {
		let alphabet = TokenAlphabet::get();
		assert_eq!(opcodes(alphabet, "nop")?, vec![opcode::NOP]);
		assert_eq!(opcodes(alphabet, "iload_1")?, vec![opcode::ILOAD_1]);
		assert_eq!(opcodes(alphabet, "goto")?, vec![opcode::GOTO]);
		assert_eq!(opcodes(alphabet, "impdep1")?, vec![opcode::IMPDEP1]);
		Ok(())
	}

	#[test]
	fn lookup_ignores_case() -> Result<()> {
		let alphabet = TokenAlphabet::get();
		assert_eq!(opcodes(alphabet, "NOP")?, vec![opcode::NOP]);
		assert_eq!(opcodes(alphabet, "BranchInstruction")?, opcodes(alphabet, "branchinstruction")?);
		Ok(())
	}

	#[test]
	fn unknown_name() {
		let alphabet = TokenAlphabet::get();
		assert_eq!(alphabet.lookup("FooBar"), Err(Error::UnknownInstructionName("FooBar".to_owned())));
		assert_eq!(alphabet.lookup("iload_4"), Err(Error::UnknownInstructionName("iload_4".to_owned())));
	}

	#[test]
	fn range_groups() -> Result<()> {
		let alphabet = TokenAlphabet::get();
		assert_eq!(opcodes(alphabet, "iload")?, named(&["iload", "iload_0", "iload_1", "iload_2", "iload_3"]));
		assert_eq!(opcodes(alphabet, "lload")?, named(&["lload", "lload_0", "lload_1", "lload_2", "lload_3"]));
		assert_eq!(opcodes(alphabet, "fload")?, named(&["fload", "fload_0", "fload_1", "fload_2", "fload_3"]));
		assert_eq!(opcodes(alphabet, "dload")?, named(&["dload", "dload_0", "dload_1", "dload_2", "dload_3"]));
		assert_eq!(opcodes(alphabet, "aload")?, named(&["aload", "aload_0", "aload_1", "aload_2", "aload_3"]));
		assert_eq!(opcodes(alphabet, "istore")?, named(&["istore", "istore_0", "istore_1", "istore_2", "istore_3"]));
		assert_eq!(opcodes(alphabet, "lstore")?, named(&["lstore", "lstore_0", "lstore_1", "lstore_2", "lstore_3"]));
		assert_eq!(opcodes(alphabet, "fstore")?, named(&["fstore", "fstore_0", "fstore_1", "fstore_2", "fstore_3"]));
		assert_eq!(opcodes(alphabet, "dstore")?, named(&["dstore", "dstore_0", "dstore_1", "dstore_2", "dstore_3"]));
		assert_eq!(opcodes(alphabet, "astore")?, named(&["astore", "astore_0", "astore_1", "astore_2", "astore_3"]));
		assert_eq!(opcodes(alphabet, "iconst")?, named(&["iconst_m1", "iconst_0", "iconst_1", "iconst_2", "iconst_3", "iconst_4", "iconst_5"]));
		assert_eq!(opcodes(alphabet, "lconst")?, named(&["lconst_0", "lconst_1"]));
		assert_eq!(opcodes(alphabet, "fconst")?, named(&["fconst_0", "fconst_1", "fconst_2"]));
		assert_eq!(opcodes(alphabet, "dconst")?, named(&["dconst_0", "dconst_1"]));
		Ok(())
	}

	#[test]
	fn family_groups() -> Result<()> {
		let alphabet = TokenAlphabet::get();

		assert_eq!(opcodes(alphabet, "arithmeticinstruction")?, named(&[
			"iadd", "ladd", "fadd", "dadd", "isub", "lsub", "fsub", "dsub", "imul", "lmul", "fmul", "dmul",
			"idiv", "ldiv", "fdiv", "ddiv", "irem", "lrem", "frem", "drem", "ineg", "lneg", "fneg", "dneg",
			"ishl", "lshl", "ishr", "lshr", "iushr", "lushr", "iand", "land", "ior", "lor", "ixor", "lxor",
		]));
		assert_eq!(opcodes(alphabet, "invokeinstruction")?, named(&[
			"invokevirtual", "invokespecial", "invokestatic", "invokeinterface", "invokedynamic",
		]));
		assert_eq!(opcodes(alphabet, "arrayinstruction")?, named(&[
			"iaload", "laload", "faload", "daload", "aaload", "baload", "caload", "saload",
			"iastore", "lastore", "fastore", "dastore", "aastore", "bastore", "castore", "sastore",
		]));
		assert_eq!(opcodes(alphabet, "gotoinstruction")?, named(&["goto", "goto_w"]));
		assert_eq!(opcodes(alphabet, "conversioninstruction")?, named(&[
			"i2l", "i2f", "i2d", "l2i", "l2f", "l2d", "f2i", "f2l", "f2d", "d2i", "d2l", "d2f", "i2b", "i2c", "i2s",
		]));
		assert_eq!(opcodes(alphabet, "loadinstruction")?, named(&[
			"iload", "lload", "fload", "dload", "aload",
			"iload_0", "iload_1", "iload_2", "iload_3", "lload_0", "lload_1", "lload_2", "lload_3",
			"fload_0", "fload_1", "fload_2", "fload_3", "dload_0", "dload_1", "dload_2", "dload_3",
			"aload_0", "aload_1", "aload_2", "aload_3",
		]));
		assert_eq!(opcodes(alphabet, "storeinstruction")?, named(&[
			"istore", "lstore", "fstore", "dstore", "astore",
			"istore_0", "istore_1", "istore_2", "istore_3", "lstore_0", "lstore_1", "lstore_2", "lstore_3",
			"fstore_0", "fstore_1", "fstore_2", "fstore_3", "dstore_0", "dstore_1", "dstore_2", "dstore_3",
			"astore_0", "astore_1", "astore_2", "astore_3",
		]));
		assert_eq!(opcodes(alphabet, "fieldinstruction")?, named(&["getstatic", "putstatic", "getfield", "putfield"]));
		assert_eq!(opcodes(alphabet, "cpinstruction")?, named(&[
			"ldc", "ldc_w", "ldc2_w", "getstatic", "putstatic", "getfield", "putfield",
			"invokevirtual", "invokespecial", "invokestatic", "invokeinterface", "invokedynamic",
			"new", "anewarray", "checkcast", "instanceof", "multianewarray",
		]));
		assert_eq!(opcodes(alphabet, "stackinstruction")?, named(&[
			"pop", "pop2", "dup", "dup_x1", "dup_x2", "dup2", "dup2_x1", "dup2_x2", "swap",
		]));
		assert_eq!(opcodes(alphabet, "branchinstruction")?, named(&[
			"ifeq", "ifne", "iflt", "ifge", "ifgt", "ifle",
			"if_icmpeq", "if_icmpne", "if_icmplt", "if_icmpge", "if_icmpgt", "if_icmple", "if_acmpeq", "if_acmpne",
			"goto", "jsr", "tableswitch", "lookupswitch", "ifnull", "ifnonnull", "goto_w", "jsr_w",
		]));
		assert_eq!(opcodes(alphabet, "returninstruction")?, named(&[
			"ireturn", "lreturn", "freturn", "dreturn", "areturn", "return",
		]));
		assert_eq!(opcodes(alphabet, "select")?, named(&["tableswitch", "lookupswitch"]));
		assert_eq!(opcodes(alphabet, "ifinstruction")?, named(&[
			"ifeq", "ifne", "iflt", "ifge", "ifgt", "ifle",
			"if_icmpeq", "if_icmpne", "if_icmplt", "if_icmpge", "if_icmpgt", "if_icmple", "if_acmpeq", "if_acmpne",
			"ifnull", "ifnonnull",
		]));
		assert_eq!(opcodes(alphabet, "jsrinstruction")?, named(&["jsr", "jsr_w"]));
		assert_eq!(opcodes(alphabet, "variablelengthinstruction")?, named(&["goto", "jsr", "tableswitch", "lookupswitch"]));
		assert_eq!(opcodes(alphabet, "unconditionalbranch")?, named(&["goto", "jsr", "athrow", "goto_w", "jsr_w"]));
		assert_eq!(opcodes(alphabet, "constantpushinstruction")?, named(&[
			"iconst_m1", "iconst_0", "iconst_1", "iconst_2", "iconst_3", "iconst_4", "iconst_5",
			"lconst_0", "lconst_1", "fconst_0", "fconst_1", "fconst_2", "dconst_0", "dconst_1",
			"bipush", "sipush",
		]));
		assert_eq!(opcodes(alphabet, "allocationinstruction")?, named(&["new", "newarray", "anewarray", "multianewarray"]));
		assert_eq!(opcodes(alphabet, "loadclass")?, named(&[
			"getstatic", "putstatic", "getfield", "putfield",
			"invokevirtual", "invokespecial", "invokestatic", "invokeinterface", "invokedynamic",
			"new", "anewarray", "checkcast", "instanceof", "multianewarray",
		]));
		assert_eq!(opcodes(alphabet, "exceptionthrower")?, named(&[
			"ldc", "ldc_w",
			"iaload", "laload", "faload", "daload", "aaload", "baload", "caload", "saload",
			"iastore", "lastore", "fastore", "dastore", "aastore", "bastore", "castore", "sastore",
			"idiv", "ldiv", "irem", "lrem",
			"ireturn", "lreturn", "freturn", "dreturn", "areturn", "return",
			"getstatic", "putstatic", "getfield", "putfield",
			"invokevirtual", "invokespecial", "invokestatic", "invokeinterface", "invokedynamic",
			"new", "newarray", "anewarray", "arraylength", "athrow", "checkcast", "instanceof",
			"monitorenter", "monitorexit", "multianewarray",
		]));

		Ok(())
	}

	#[test]
	fn composed_groups() -> Result<()> {
		let alphabet = TokenAlphabet::get();

		let mut local_variable = opcodes(alphabet, "loadinstruction")?;
		local_variable.extend(opcodes(alphabet, "storeinstruction")?);
		local_variable.push(opcode::IINC);
		local_variable.sort();
		assert_eq!(opcodes(alphabet, "localvariableinstruction")?, local_variable);

		let mut indexed = opcodes(alphabet, "cpinstruction")?;
		indexed.extend(local_variable);
		indexed.push(opcode::RET);
		indexed.sort();
		indexed.dedup();
		assert_eq!(opcodes(alphabet, "indexedinstruction")?, indexed);

		let mut push = opcodes(alphabet, "constantpushinstruction")?;
		push.extend(opcodes(alphabet, "loadinstruction")?);
		push.extend([opcode::ACONST_NULL, opcode::LDC, opcode::LDC_W, opcode::LDC2_W, opcode::DUP, opcode::DUP2, opcode::GETSTATIC]);
		push.sort();
		assert_eq!(opcodes(alphabet, "pushinstruction")?, push);

		let mut pop = opcodes(alphabet, "storeinstruction")?;
		pop.extend([opcode::POP, opcode::POP2, opcode::PUTSTATIC]);
		pop.sort();
		assert_eq!(opcodes(alphabet, "popinstruction")?, pop);

		Ok(())
	}

	#[test]
	fn conveniences() -> Result<()> {
		let alphabet = TokenAlphabet::get();
		assert_eq!(opcodes(alphabet, "if_icmp")?, named(&["if_icmpeq", "if_icmpne", "if_icmplt", "if_icmpge", "if_icmpgt", "if_icmple"]));
		assert_eq!(opcodes(alphabet, "if_acmp")?, named(&["if_acmpeq", "if_acmpne"]));
		assert_eq!(opcodes(alphabet, "if")?, named(&["ifeq", "ifne", "iflt", "ifge", "ifgt", "ifle"]));
		assert_eq!(opcodes(alphabet, "instruction")?, valid_opcodes().collect::<Vec<_>>());
		Ok(())
	}

	#[test]
	fn expression() -> Result<()> {
		let alphabet = TokenAlphabet::get();
		let group = alphabet.lookup("select")?;

		let mut expected = String::from("(?:");
		expected.push(char::from_u32(TOKEN_BASE + opcode::TABLESWITCH as u32).unwrap_or('a'));
		expected.push('|');
		expected.push(char::from_u32(TOKEN_BASE + opcode::LOOKUPSWITCH as u32).unwrap_or('a'));
		expected.push(')');

		assert_eq!(group.expression(), expected);
		Ok(())
	}

	#[test]
	fn encode() -> Result<()> {
		let alphabet = TokenAlphabet::get();
		let instructions = [
			Instruction { offset: 0, opcode: opcode::ALOAD_0, operands: Operands::None, length: 1 },
			Instruction { offset: 1, opcode: opcode::ARETURN, operands: Operands::None, length: 1 },
		];

		let encoded = alphabet.encode(&instructions)?;
		assert_eq!(encoded.chars().count(), 2);
		assert_eq!(encoded.len(), 2 * TOKEN_WIDTH);
		assert_eq!(
			encoded.chars().map(|token| alphabet.opcode_of(token)).collect::<Vec<_>>(),
			vec![Some(opcode::ALOAD_0), Some(opcode::ARETURN)],
		);

		let invalid = [Instruction { offset: 7, opcode: 0xee, operands: Operands::None, length: 1 }];
		assert_eq!(alphabet.encode(&invalid), Err(Error::UnknownOpcode { opcode: 0xee, offset: 7 }));

		Ok(())
	}
}
