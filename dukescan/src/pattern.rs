use log::debug;
use regex::Regex;
use crate::alphabet::TokenAlphabet;
use crate::error::Result;

/// A pattern over instruction names, compiled into a regular expression over tokens.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
	source: String,
	expression: String,
	regex: Regex,
}

impl CompiledPattern {
	/// The pattern as it was written.
	pub fn source(&self) -> &str {
		&self.source
	}

	/// The regular expression the names were expanded to.
	pub fn expression(&self) -> &str {
		&self.expression
	}

	pub fn regex(&self) -> &Regex {
		&self.regex
	}
}

/// Compiles instruction patterns like `"BranchInstruction NOP (iload|istore)+"`.
///
/// Every name (a run of letters, digits and underscores, starting with a letter or an underscore) is replaced by the
/// alternation of the tokens of the opcodes it stands for, and whitespace is dropped. Anything else is regex syntax
/// and is kept as is, so `nop{2,3}` matches two or three `nop`s.
///
/// Names are looked up ignoring case.
#[derive(Debug, Clone, Copy)]
pub struct PatternCompiler<'a> {
	alphabet: &'a TokenAlphabet,
}

impl Default for PatternCompiler<'static> {
	fn default() -> Self {
		PatternCompiler::new()
	}
}

impl PatternCompiler<'static> {
	pub fn new() -> PatternCompiler<'static> {
		PatternCompiler::with_alphabet(TokenAlphabet::get())
	}
}

impl<'a> PatternCompiler<'a> {
	pub fn with_alphabet(alphabet: &'a TokenAlphabet) -> PatternCompiler<'a> {
		PatternCompiler { alphabet }
	}

	pub fn compile(&self, source: &str) -> Result<CompiledPattern> {
		let expression = self.expand(source)?;
		let regex = Regex::new(&expression)?;

		debug!("compiled pattern {source:?} into an expression of {} bytes", expression.len());

		Ok(CompiledPattern {
			source: source.to_owned(),
			expression,
			regex,
		})
	}

	fn expand(&self, source: &str) -> Result<String> {
		fn is_name_start(c: char) -> bool {
			c.is_ascii_alphabetic() || c == '_'
		}
		fn is_name_part(c: char) -> bool {
			c.is_ascii_alphanumeric() || c == '_'
		}

		let mut expression = String::with_capacity(source.len() * 4);

		let mut chars = source.char_indices().peekable();
		while let Some((start, c)) = chars.next() {
			if is_name_start(c) {
				let mut end = start + c.len_utf8();
				while let Some(&(i, c)) = chars.peek() {
					if !is_name_part(c) {
						break;
					}
					end = i + c.len_utf8();
					chars.next();
				}

				let group = self.alphabet.lookup(&source[start..end])?;
				expression.push_str(group.expression());
			} else if !c.is_whitespace() {
				expression.push(c);
			}
		}

		Ok(expression)
	}
}
