//! Searching decoded instructions for patterns.
//!
//! A [`SequenceMatcher`] keeps the instructions together with their encoding as tokens. Compiled patterns run over
//! the tokens, and the matches are mapped back onto windows of instructions.

use std::iter::FusedIterator;
use std::ops::Range;
use log::{debug, warn};
use regex::Regex;
use crate::alphabet::{TokenAlphabet, TOKEN_WIDTH};
use crate::error::{Error, Result};
use crate::instruction::Instruction;
use crate::pattern::CompiledPattern;

/// Decides if a matched window of instructions is reported.
pub trait MatchFilter {
	fn accept(&self, window: &[Instruction]) -> bool;
}

impl<F> MatchFilter for F
where
	F: Fn(&[Instruction]) -> bool,
{
	fn accept(&self, window: &[Instruction]) -> bool {
		self(window)
	}
}

/// The filter that accepts every window.
#[derive(Debug, Copy, Clone, Default)]
pub struct AcceptAll;

impl MatchFilter for AcceptAll {
	fn accept(&self, _: &[Instruction]) -> bool {
		true
	}
}

/// A non-empty run of instructions matched by a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchWindow<'m> {
	/// The indices of the instructions in the list searched.
	pub range: Range<usize>,
	pub instructions: &'m [Instruction],
}

impl MatchWindow<'_> {
	/// The bytecode offset of the first instruction.
	pub fn start_offset(&self) -> u32 {
		self.instructions.first().map_or(0, |instruction| instruction.offset)
	}

	/// The bytecode offset right after the last instruction.
	pub fn end_offset(&self) -> u32 {
		self.instructions.last().map_or(0, Instruction::end_offset)
	}
}

/// Owns a list of instructions and searches it for patterns.
///
/// The instructions are encoded once, when the matcher is created. Changing them through
/// [`SequenceMatcher::instructions_mut`] requires a call to [`SequenceMatcher::reread`] before searching again.
#[derive(Debug, Clone)]
pub struct SequenceMatcher<'a> {
	alphabet: &'a TokenAlphabet,
	instructions: Vec<Instruction>,
	tokens: String,
}

impl SequenceMatcher<'static> {
	pub fn new(instructions: Vec<Instruction>) -> Result<SequenceMatcher<'static>> {
		SequenceMatcher::with_alphabet(TokenAlphabet::get(), instructions)
	}
}

impl<'a> SequenceMatcher<'a> {
	pub fn with_alphabet(alphabet: &'a TokenAlphabet, instructions: Vec<Instruction>) -> Result<SequenceMatcher<'a>> {
		let tokens = alphabet.encode(&instructions)?;
		Ok(SequenceMatcher { alphabet, instructions, tokens })
	}

	pub fn instructions(&self) -> &[Instruction] {
		&self.instructions
	}

	/// Gives mutable access to the instructions. Call [`SequenceMatcher::reread`] after changing them.
	pub fn instructions_mut(&mut self) -> &mut Vec<Instruction> {
		&mut self.instructions
	}

	pub fn into_instructions(self) -> Vec<Instruction> {
		self.instructions
	}

	pub fn len(&self) -> usize {
		self.instructions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.instructions.is_empty()
	}

	/// Encodes the instructions again.
	pub fn reread(&mut self) -> Result<()> {
		self.tokens = self.alphabet.encode(&self.instructions)?;
		debug!("re-encoded {} instructions", self.instructions.len());
		Ok(())
	}

	/// Returns the index of the instruction at the given bytecode offset.
	pub fn position_of(&self, offset: u32) -> Result<usize> {
		self.instructions.binary_search_by_key(&offset, |instruction| instruction.offset)
			.map_err(|_| Error::PositionNotFound(offset as usize))
	}

	/// Searches the whole list. An empty list has no matches.
	pub fn search<'m>(&'m self, pattern: &'m CompiledPattern) -> Matches<'m> {
		self.matches(pattern, 0, AcceptAll)
	}

	/// Searches starting at the instruction with the given index.
	pub fn search_from<'m>(&'m self, pattern: &'m CompiledPattern, index: usize) -> Result<Matches<'m>> {
		self.search_with(pattern, index, AcceptAll)
	}

	/// Searches starting at the instruction with the given index, only reporting windows the filter accepts.
	///
	/// A rejected window is skipped as a whole, the search continues after its end.
	pub fn search_with<'m, F: MatchFilter>(&'m self, pattern: &'m CompiledPattern, index: usize, filter: F) -> Result<Matches<'m, F>> {
		if index >= self.instructions.len() {
			return Err(Error::PositionNotFound(index));
		}
		Ok(self.matches(pattern, index, filter))
	}

	fn matches<'m, F: MatchFilter>(&'m self, pattern: &'m CompiledPattern, position: usize, filter: F) -> Matches<'m, F> {
		debug!("searching {} instructions for {:?} from {position}", self.instructions.len(), pattern.source());
		Matches {
			instructions: &self.instructions,
			tokens: &self.tokens,
			regex: pattern.regex(),
			position,
			filter,
		}
	}
}

/// An iterator over the windows matched by a pattern, in increasing order and not overlapping.
///
/// Created by the search methods of [`SequenceMatcher`].
#[derive(Debug)]
pub struct Matches<'m, F = AcceptAll> {
	instructions: &'m [Instruction],
	tokens: &'m str,
	regex: &'m Regex,
	/// The index of the instruction the next search starts at.
	position: usize,
	filter: F,
}

impl<'m, F: MatchFilter> Iterator for Matches<'m, F> {
	type Item = MatchWindow<'m>;

	fn next(&mut self) -> Option<Self::Item> {
		while self.position < self.instructions.len() {
			let Some(found) = self.regex.find_at(self.tokens, self.position * TOKEN_WIDTH) else {
				self.position = self.instructions.len();
				return None;
			};

			let start = found.start() / TOKEN_WIDTH;
			let end = found.end().div_ceil(TOKEN_WIDTH);

			if start == end {
				self.position = start + 1;
				continue;
			}
			self.position = end;

			let Some(instructions) = self.instructions.get(start..end) else {
				warn!("match {start}..{end} lies outside of the {} instructions, were they changed without rereading?", self.instructions.len());
				self.position = self.instructions.len();
				return None;
			};

			if self.filter.accept(instructions) {
				return Some(MatchWindow { range: start..end, instructions });
			}
		}
		None
	}
}

impl<F: MatchFilter> FusedIterator for Matches<'_, F> {}
