//! Turns source text into tokens, one at a time.
//!
//! The parser pulls tokens on demand through [`Scanner::next_token`] and never
//! holds more than one of them, so the scanner doesn't build a token vector.
//! Once the end of input is reached every further call keeps yielding
//! [`TokenKind::Eof`].
//!
//! We can’t easily detect a reserved word until we’ve reached the end of what
//! might instead be an identifier, this is `maximal munch`.
mod token;

use std::{iter::Peekable, str::CharIndices};

pub use token::*;

use crate::{ScanError, ScanErrorType};

/// A scanner for source code
pub struct Scanner<'a> {
	/// Text being scanned.
	source:      &'a str,
	/// Characters not consumed yet, with their byte offsets.
	source_iter: Peekable<CharIndices<'a>>,
	/// Byte offset of the lexeme being scanned.
	start:       usize,
	/// Points just past the character currently being considered
	cursor:      usize,
	/// Line of the character at `cursor`.
	line:        usize,
	/// Column of the character at `cursor`, counted in characters.
	column:      usize,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str) -> Self {
		let source_iter = source.char_indices().peekable();

		Self { source, source_iter, start: 0, cursor: 0, line: 1, column: 1 }
	}

	/// Scan the next token from the source code.
	///
	/// On error the offending characters are already consumed, so calling
	/// again continues with the following lexeme.
	pub fn next_token(&mut self) -> Result<Token<'a>, ScanError> {
		self.skip_trivia()?;

		let (line, column) = (self.line, self.column);
		let Some(&(index, _)) = self.source_iter.peek() else {
			return Ok(Token::new(TokenKind::Eof, line, column));
		};
		self.start = index;
		self.cursor = index;

		let Some(next_char) = self.advance() else {
			return Ok(Token::new(TokenKind::Eof, line, column));
		};

		use Symbol::*;
		#[rustfmt::skip]
		let kind = match next_char {
			'{' => TokenKind::Symbol(LeftBrace),
			'}' => TokenKind::Symbol(RightBrace),
			'(' => TokenKind::Symbol(LeftParen),
			')' => TokenKind::Symbol(RightParen),
			',' => TokenKind::Symbol(Comma),
			';' => TokenKind::Symbol(Semicolon),
			'+' => TokenKind::Symbol(Plus),
			'-' => TokenKind::Symbol(Minus),
			'*' => TokenKind::Symbol(Star),
			'/' => TokenKind::Symbol(Slash),
			'%' => TokenKind::Symbol(Percent),
			'^' => TokenKind::Symbol(Caret),
			'&' => TokenKind::Symbol(if self.match_next('&') { AmpersandAmpersand } else { Ampersand }),
			'|' => TokenKind::Symbol(if self.match_next('|') { PipePipe } else { Pipe }),
			'=' => TokenKind::Symbol(if self.match_next('=') { EqualEqual } else { Equal }),
			'<' => TokenKind::Symbol(if self.match_next('=') { LessEqual } else { Less }),
			'>' => TokenKind::Symbol(if self.match_next('=') { GreaterEqual } else { Greater }),
			'!' if self.match_next('=') => TokenKind::Symbol(BangEqual),
			c if c.is_ascii_digit() => self.number(line, column)?,
			c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
			_ => return Err(ScanError::new(line, column, ScanErrorType::UnexpectedCharacter(next_char))),
		};

		Ok(Token::new(kind, line, column))
	}

	/// Skip whitespace and comments.
	fn skip_trivia(&mut self) -> Result<(), ScanError> {
		while let Some(c) = self.peek() {
			match c {
				' ' | '\r' | '\t' | '\n' => {
					self.advance();
				}
				'/' if self.peek_second() == Some('/') => {
					while self.peek().is_some_and(|c| c != '\n') {
						self.advance();
					}
				}
				'/' if self.peek_second() == Some('*') => {
					let (line, column) = (self.line, self.column);
					self.advance(); // consume '/'
					self.advance(); // consume '*'
					let mut closed = false;
					while let Some(c) = self.advance() {
						if c == '*' && self.match_next('/') {
							closed = true;
							break;
						}
					}
					if !closed {
						return Err(ScanError::new(line, column, ScanErrorType::UnterminatedBlockComment));
					}
				}
				_ => break,
			}
		}
		Ok(())
	}

	/// Consume the next character if it is `expected`.
	fn match_next(&mut self, expected: char) -> bool {
		matches!(self.peek(), Some(c) if c == expected && { self.advance(); true })
	}

	/// Advance to the next character, keeping line and column in step.
	fn advance(&mut self) -> Option<char> {
		let (i, c) = self.source_iter.next()?;
		self.cursor = i + c.len_utf8();
		if c == '\n' {
			self.line += 1;
			self.column = 1;
		} else {
			self.column += 1;
		}
		Some(c)
	}

	fn peek(&mut self) -> Option<char> { self.source_iter.peek().map(|&(_, c)| c) }

	/// One character past [`Self::peek`].
	fn peek_second(&mut self) -> Option<char> {
		let mut it = self.source_iter.clone();
		it.next()?;
		it.peek().map(|&(_, c)| c)
	}

	/// Scan an integer literal
	fn number(&mut self, line: usize, column: usize) -> Result<TokenKind<'a>, ScanError> {
		while self.peek().is_some_and(|c| c.is_ascii_digit()) {
			self.advance();
		}

		let literal = &self.source[self.start..self.cursor];
		literal
			.parse()
			.map(TokenKind::NumberLiteral)
			.map_err(|_| ScanError::new(line, column, ScanErrorType::NumberOutOfRange(literal.to_string())))
	}

	/// Scan an identifier, keyword or boolean literal
	fn identifier(&mut self) -> TokenKind<'a> {
		while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
			self.advance();
		}
		let text = &self.source[self.start..self.cursor];
		match text {
			"true" => TokenKind::BooleanLiteral(true),
			"false" => TokenKind::BooleanLiteral(false),
			_ => Keyword::from_word(text).map_or(TokenKind::Identifier(text), TokenKind::Keyword),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scan(input: &str) -> Result<Vec<TokenKind<'_>>, ScanError> {
		let mut scanner = Scanner::new(input);
		let mut kinds = Vec::new();
		loop {
			let token = scanner.next_token()?;
			if token.is_eof() {
				return Ok(kinds);
			}
			kinds.push(token.kind);
		}
	}

	fn scan_ok(input: &str, ok: bool) { assert_eq!(scan(input).is_ok(), ok, "{input}"); }

	#[test]
	fn scan_tokens() {
		scan_ok("", true);
		scan_ok("(", true);
		scan_ok("(){}", true);
		scan_ok(" ( ) ", true);
		scan_ok("@", false);
		scan_ok("你好", false);
		scan_ok("12345", true);
		scan_ok("99999999999", false);
		scan_ok("user", true);
		scan_ok("return", true);
		scan_ok("!", false);
	}

	#[test]
	fn scan_operators() {
		use Symbol::*;
		let kinds = scan("= == != < <= > >= + - * / % & && | || ^ , ;").unwrap();
		let expected = [
			Equal,
			EqualEqual,
			BangEqual,
			Less,
			LessEqual,
			Greater,
			GreaterEqual,
			Plus,
			Minus,
			Star,
			Slash,
			Percent,
			Ampersand,
			AmpersandAmpersand,
			Pipe,
			PipePipe,
			Caret,
			Comma,
			Semicolon,
		];
		assert_eq!(kinds, expected.map(TokenKind::Symbol));
	}

	#[test]
	fn scan_keywords_and_literals() {
		let kinds = scan("while printf pchar ref void true false whilex 42").unwrap();
		assert_eq!(kinds, vec![
			TokenKind::Keyword(Keyword::While),
			TokenKind::Keyword(Keyword::Printf),
			TokenKind::Keyword(Keyword::Pchar),
			TokenKind::Keyword(Keyword::Ref),
			TokenKind::Keyword(Keyword::Void),
			TokenKind::BooleanLiteral(true),
			TokenKind::BooleanLiteral(false),
			TokenKind::Identifier("whilex"),
			TokenKind::NumberLiteral(42),
		]);
	}

	#[test]
	fn scan_comments() {
		scan_ok("// single line comment", true);
		scan_ok("/* block comment */", true);
		scan_ok("/* multi\nline\ncomment */", true);
		scan_ok("/** nested ** comment **/", true);
		scan_ok("/* unterminated", false);
		assert_eq!(scan("1 // 2\n3").unwrap(), vec![TokenKind::NumberLiteral(1), TokenKind::NumberLiteral(3)]);
	}

	#[test]
	fn scan_positions() {
		let mut scanner = Scanner::new("int x;\n  x = 1;");
		let positions: Vec<_> = std::iter::from_fn(|| {
			let token = scanner.next_token().unwrap();
			(!token.is_eof()).then_some((token.line, token.column))
		})
		.collect();
		assert_eq!(positions, vec![(1, 1), (1, 5), (1, 6), (2, 3), (2, 5), (2, 7), (2, 8)]);
	}

	#[test]
	fn eof_repeats() {
		let mut scanner = Scanner::new("x");
		assert!(!scanner.next_token().unwrap().is_eof());
		for _ in 0..3 {
			assert!(scanner.next_token().unwrap().is_eof());
		}
	}

	#[test]
	fn scanning_continues_after_error() {
		let mut scanner = Scanner::new("a @ b");
		assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Identifier("a"));
		let error = scanner.next_token().unwrap_err();
		assert_eq!((error.line, error.column), (1, 3));
		assert_eq!(error.r#type, ScanErrorType::UnexpectedCharacter('@'));
		assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Identifier("b"));
	}
}
