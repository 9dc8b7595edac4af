use std::path::{Path, PathBuf};
use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::{info, LevelFilter};
use dukescan::class_constants::opcode;
use dukescan::{ExceptionHandler, Instruction, LocalVariableRange, Operands, PatternCompiler, SequenceMatcher, TargetResolver};

#[derive(Debug, Parser)]
#[command(version, about = "Decodes the code of a Java method and searches it for instruction patterns.")]
struct Cli {
	/// Be verbose. Given twice logs the compiled patterns, given three times every decoded instruction.
	#[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
	verbose: u8,

	/// The file contains the code as hexadecimal text (whitespace is ignored) instead of raw bytes.
	#[arg(long = "hex")]
	hex: bool,

	/// The file with the code of a single method.
	file: PathBuf,

	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Lists the decoded instructions
	Decode,
	/// Prints the offsets referenced by branches, exception handlers and local variables
	Targets {
		/// An exception table entry: start, end (exclusive), handler and optionally the catch type index.
		#[arg(long = "exception", value_name = "S,E,H[,T]", value_parser = parse_exception_handler)]
		exception_table: Vec<ExceptionHandler>,
		/// A local variable range: start and length.
		#[arg(long = "local", value_name = "S,L", value_parser = parse_local_variable)]
		local_variables: Vec<LocalVariableRange>,
	},
	/// Prints the windows of instructions matching a pattern, like `"BranchInstruction NOP ISTORE"`
	Search {
		pattern: String,
		/// The index of the instruction to start searching at.
		#[arg(long = "from", value_name = "INDEX", default_value_t = 0)]
		from: usize,
	},
}

fn main() -> Result<()> {
	let Cli { verbose, hex, file, command } = Cli::parse();

	setup_logger(verbose)?;

	let code = read_code(&file, hex)?;
	let instructions = dukescan::decode(&code)
		.with_context(|| anyhow!("failed to decode the code in {file:?}"))?;
	info!("{file:?}: {} instructions in {} bytes", instructions.len(), code.len());

	match command {
		Command::Decode => {
			for instruction in &instructions {
				println!("{}", format_instruction(instruction));
			}
		},
		Command::Targets { exception_table, local_variables } => {
			let code_length = u32::try_from(code.len())
				.with_context(|| anyhow!("code length {} doesn't fit into 32 bits", code.len()))?;

			let targets = TargetResolver::new()
				.exception_table(&exception_table)
				.local_variables(&local_variables)
				.resolve_within(&instructions, code_length)?;

			for target in targets {
				println!("{target}");
			}
		},
		Command::Search { pattern, from } => {
			let pattern = PatternCompiler::new().compile(&pattern)
				.with_context(|| anyhow!("failed to compile pattern {pattern:?}"))?;
			let matcher = SequenceMatcher::new(instructions)?;

			let matches = if from == 0 {
				matcher.search(&pattern)
			} else {
				matcher.search_from(&pattern, from)
					.with_context(|| anyhow!("can't start searching at instruction {from}, there are only {}", matcher.len()))?
			};

			let mut count = 0;
			for window in matches {
				let names: Vec<_> = window.instructions.iter().map(Instruction::name).collect();
				println!("{}..{} (offsets {}..{}): {}",
					window.range.start, window.range.end, window.start_offset(), window.end_offset(), names.join(" "));
				count += 1;
			}
			info!("found {count} matches of {:?}", pattern.source());
		},
	}

	Ok(())
}

fn setup_logger(verbose: u8) -> Result<()> {
	let level = match verbose {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		2 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	};

	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
		})
		.level(level)
		.chain(std::io::stderr())
		.apply()
		.context("failed to set up logging")
}

fn read_code(path: &Path, hex: bool) -> Result<Vec<u8>> {
	if hex {
		let text = std::fs::read_to_string(path)
			.with_context(|| anyhow!("failed to read {path:?}"))?;
		parse_hex(&text)
			.with_context(|| anyhow!("{path:?} doesn't contain valid hexadecimal text"))
	} else {
		std::fs::read(path)
			.with_context(|| anyhow!("failed to read {path:?}"))
	}
}

fn parse_hex(text: &str) -> Result<Vec<u8>> {
	let digits: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
	if digits.len() % 2 != 0 {
		bail!("odd number of hexadecimal digits: {}", digits.len());
	}

	digits.chunks(2)
		.map(|pair| -> Result<u8> {
			let high = pair[0].to_digit(16).with_context(|| anyhow!("not a hexadecimal digit: {:?}", pair[0]))?;
			let low = pair[1].to_digit(16).with_context(|| anyhow!("not a hexadecimal digit: {:?}", pair[1]))?;
			Ok((high << 4 | low) as u8)
		})
		.collect()
}

fn parse_numbers(s: &str) -> Result<Vec<u32>> {
	s.split(',')
		.map(|number| number.trim().parse::<u32>()
			.with_context(|| anyhow!("not a bytecode offset: {number:?}")))
		.collect()
}

fn parse_exception_handler(s: &str) -> Result<ExceptionHandler> {
	match *parse_numbers(s)?.as_slice() {
		[start, end, handler] => Ok(ExceptionHandler { start, end, handler, catch_type: 0 }),
		[start, end, handler, catch_type] => {
			let catch_type = u16::try_from(catch_type)
				.with_context(|| anyhow!("catch type {catch_type} isn't a constant pool index"))?;
			Ok(ExceptionHandler { start, end, handler, catch_type })
		},
		_ => bail!("expected `start,end,handler[,catch_type]`, got {s:?}"),
	}
}

fn parse_local_variable(s: &str) -> Result<LocalVariableRange> {
	match *parse_numbers(s)?.as_slice() {
		[start, length] => Ok(LocalVariableRange { start, length }),
		_ => bail!("expected `start,length`, got {s:?}"),
	}
}

fn format_instruction(instruction: &Instruction) -> String {
	let operands: Vec<String> = match &instruction.operands {
		Operands::None | Operands::Wide => Vec::new(),
		Operands::Fixed(operands) => {
			let signed = matches!(instruction.opcode, opcode::BIPUSH | opcode::SIPUSH);
			operands.iter()
				.map(|operand| if signed { operand.signed().to_string() } else { operand.unsigned().to_string() })
				.collect()
		},
		Operands::LocalVariable(lv) => vec![lv.index.to_string()],
		Operands::IInc { index, value } => vec![index.index.to_string(), value.to_string()],
		Operands::Branch(target) => vec![format!("-> {target}")],
		Operands::TableSwitch { low, high, table, default, .. } => {
			// an inclusive range, `high` may be `i32::MAX`
			(*low..=*high).zip(table)
				.map(|(key, target)| format!("{key}: {target}"))
				.chain([format!("default: {default}")])
				.collect()
		},
		Operands::LookupSwitch { pairs, default, .. } => {
			pairs.iter()
				.map(|(key, target)| format!("{key}: {target}"))
				.chain([format!("default: {default}")])
				.collect()
		},
	};

	let mut s = format!("{:>5}: {}", instruction.offset, instruction.name());
	for operand in operands {
		s.push(' ');
		s.push_str(&operand);
	}
	s
}
