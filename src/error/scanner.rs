/// A character sequence that isn't a token, and where it starts.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("line {line}, column {column}: {type}")]
pub struct ScanError {
	/// 1-based.
	pub line:   usize,
	/// 1-based, in characters.
	pub column: usize,
	pub r#type: ScanErrorType,
}

impl ScanError {
	pub fn new(line: usize, column: usize, r#type: ScanErrorType) -> Self { Self { line, column, r#type } }
}

/// What went wrong while scanning.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanErrorType {
	/// `/*` without a matching `*/`.
	UnterminatedBlockComment,
	/// A character no token starts with.
	UnexpectedCharacter(char),
	/// Integer literal that does not fit the `int` type.
	NumberOutOfRange(String),
}

impl std::fmt::Display for ScanErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ScanErrorType::*;
		match self {
			UnterminatedBlockComment => {
				write!(f, "Unterminated block comment")
			}
			UnexpectedCharacter(c) => {
				write!(f, "Unexpected character '{c}'")
			}
			NumberOutOfRange(literal) => {
				write!(f, "Number literal {literal} is out of range")
			}
		}
	}
}
