use std::fmt::Display;

/// A token produced by the scanner
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
	pub kind:   TokenKind<'a>,
	pub line:   usize,
	pub column: usize,
}

impl<'a> Token<'a> {
	pub fn new(kind: TokenKind<'a>, line: usize, column: usize) -> Self { Self { kind, line, column } }

	pub fn is_eof(&self) -> bool { matches!(self.kind, TokenKind::Eof) }

	pub fn is_symbol(&self, symbol: Symbol) -> bool { self.kind == TokenKind::Symbol(symbol) }
}

/// The kinds of tokens the parser matches against. Copying is lightweight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind<'a> {
	/// Identifier, e.g. variable or method name.
	Identifier(&'a str),
	/// Reserved word.
	Keyword(Keyword),
	/// Punctuation or operator.
	Symbol(Symbol),
	/// Decimal integer literal, e.g. `123`.
	NumberLiteral(i32),
	/// `true` or `false`.
	BooleanLiteral(bool),
	/// End of input. Repeats forever once reached.
	Eof,
}

impl Display for TokenKind<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TokenKind::Identifier(name) => write!(f, "identifier '{name}'"),
			TokenKind::Keyword(keyword) => write!(f, "keyword '{keyword}'"),
			TokenKind::Symbol(symbol) => write!(f, "'{symbol}'"),
			TokenKind::NumberLiteral(n) => write!(f, "number {n}"),
			TokenKind::BooleanLiteral(b) => write!(f, "boolean {b}"),
			TokenKind::Eof => write!(f, "end of input"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
	If,
	Else,
	While,
	Return,
	Break,
	Continue,
	/// Marks the following statement as possibly buggy.
	Bug,
	/// Built-in print command.
	Printf,
	Int,
	Bool,
	Char,
	String,
	/// Alias spelling of `string`.
	Pchar,
	/// Opaque reference type.
	Ref,
	Void,
}

impl Keyword {
	pub fn from_word(word: &str) -> Option<Self> {
		use Keyword::*;
		Some(match word {
			"if" => If,
			"else" => Else,
			"while" => While,
			"return" => Return,
			"break" => Break,
			"continue" => Continue,
			"bug" => Bug,
			"printf" => Printf,
			"int" => Int,
			"bool" => Bool,
			"char" => Char,
			"string" => String,
			"pchar" => Pchar,
			"ref" => Ref,
			"void" => Void,
			_ => return None,
		})
	}

	pub fn as_str(self) -> &'static str {
		use Keyword::*;
		match self {
			If => "if",
			Else => "else",
			While => "while",
			Return => "return",
			Break => "break",
			Continue => "continue",
			Bug => "bug",
			Printf => "printf",
			Int => "int",
			Bool => "bool",
			Char => "char",
			String => "string",
			Pchar => "pchar",
			Ref => "ref",
			Void => "void",
		}
	}
}

impl Display for Keyword {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Special symbols: punctuation and operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
	/// Left brace `{`.
	LeftBrace,
	/// Right brace `}`.
	RightBrace,
	/// Left parenthesis `(`.
	LeftParen,
	/// Right parenthesis `)`.
	RightParen,
	/// Comma `,`.
	Comma,
	/// Semicolon `;`.
	Semicolon,
	/// Assignment `=`.
	Equal,
	Plus,
	Minus,
	Star,
	Slash,
	Percent,
	/// Bitwise and `&`.
	Ampersand,
	/// Logical and `&&`.
	AmpersandAmpersand,
	/// Bitwise or `|`.
	Pipe,
	/// Logical or `||`.
	PipePipe,
	/// Exclusive or `^`.
	Caret,
	Less,
	LessEqual,
	EqualEqual,
	BangEqual,
	GreaterEqual,
	Greater,
}

impl Symbol {
	pub fn as_str(self) -> &'static str {
		use Symbol::*;
		match self {
			LeftBrace => "{",
			RightBrace => "}",
			LeftParen => "(",
			RightParen => ")",
			Comma => ",",
			Semicolon => ";",
			Equal => "=",
			Plus => "+",
			Minus => "-",
			Star => "*",
			Slash => "/",
			Percent => "%",
			Ampersand => "&",
			AmpersandAmpersand => "&&",
			Pipe => "|",
			PipePipe => "||",
			Caret => "^",
			Less => "<",
			LessEqual => "<=",
			EqualEqual => "==",
			BangEqual => "!=",
			GreaterEqual => ">=",
			Greater => ">",
		}
	}
}

impl Display for Symbol {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}
