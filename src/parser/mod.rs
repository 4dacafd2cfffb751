//! Single-pass parser, checker and code generator.
//!
//! There is no syntax tree. Each production recognizes its tokens, checks and
//! infers types, and drives the [`Emitter`] as a side effect, so code comes
//! out in source order. Productions return whether they matched, expression
//! productions the inferred [`Type`] as well. One token of lookahead is
//! enough: every token is consumed through a match-and-advance check.
//!
//! |Level|Operators|Associates
//! --|--|--
//! Relational|< <= == != >= >|None, at most one
//! Additive|+ - \| \|\| ^|Left
//! Multiplicative|* / % & &&|Left
//!
//! Grammar:
//!
//! ``` BNF
//! program        → ( declaration | statement )* EOF ;
//! statement      → compound | if | while | expression | ";" | printf | bug | stop ;
//! compound       → "{" ( declaration | statement )* "}" ;
//! if             → "if" "(" expression ")" statement ( "else" statement )? ;
//! while          → "while" "(" expression ")" statement ;
//! printf         → "printf" "(" IDENTIFIER? ")" ";" ;
//! bug            → "bug" statement ";" ;
//! stop           → "return" expression? ";" | "break" ";" | "continue" ";" ;
//! declaration    → type IDENTIFIER ( "(" parameters? ")" compound | ";" ) ;
//! parameters     → type IDENTIFIER ( "," type IDENTIFIER )* ;
//! type           → "int" | "bool" | "char" | "string" | "pchar" | "ref" | "void" ;
//! expression     → additive ( ( "<" | "<=" | "==" | "!=" | ">=" | ">" ) additive )? ;
//! additive       → ( "+" | "-" )? multiplicative ( ( "+" | "-" | "|" | "||" | "^" ) multiplicative )* ;
//! multiplicative → primary ( ( "*" | "/" | "%" | "&" | "&&" ) primary )* ;
//! primary        → NUMBER | BOOLEAN | IDENTIFIER ( "=" expression ";" )? ;
//! ```
//!
//! Errors are reported to [`Diagnostics`] and parsing goes on. Every error
//! skips tokens through the next `;`. The productions that were running then
//! finish without matching anything, so their follow-on errors are
//! suppressed, and the enclosing statement list picks up at the next item.
//! Only `break` and `continue` outside a loop end the parse.

mod declaration;
mod expression;
mod statement;

use crate::{Diagnostics, CompilerOptions, emitter::{Emitter, Label, MethodHandle}, error::parser::{ParseErrorType, ParserError, WarningType}, scanner::{Keyword, Scanner, Symbol, Token, TokenKind}, symbols::SymbolTable};

/// Branch targets of one enclosing loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LoopLabels {
	pub break_label:    Label,
	pub continue_label: Label,
}

pub struct Parser<'src, 'ctx, E: Emitter> {
	scanner:     Scanner<'src>,
	/// The single lookahead token.
	token:       Token<'src>,
	symbols:     &'ctx mut SymbolTable,
	emitter:     &'ctx mut E,
	diagnostics: &'ctx mut Diagnostics,
	options:     &'ctx CompilerOptions,
	/// Enclosing loops of the current method, innermost last.
	loops:       Vec<LoopLabels>,
	/// Methods being emitted, innermost last. The first is the entry method.
	methods:     Vec<MethodHandle>,
	/// Set by recovery, cleared when a statement list starts its next item.
	recovering:  bool,
}

impl<'src, 'ctx, E: Emitter> Parser<'src, 'ctx, E> {
	pub fn new(
		source: &'src str,
		symbols: &'ctx mut SymbolTable,
		emitter: &'ctx mut E,
		diagnostics: &'ctx mut Diagnostics,
		options: &'ctx CompilerOptions,
	) -> Self {
		Self {
			scanner: Scanner::new(source),
			token: Token::new(TokenKind::Eof, 0, 0),
			symbols,
			emitter,
			diagnostics,
			options,
			loops: Vec::new(),
			methods: Vec::new(),
			recovering: false,
		}
	}

	/// Parse the whole input. `Ok(true)` only if the input was consumed to
	/// the end without a single error.
	pub fn parse(&mut self) -> Result<bool, ParserError> {
		self.advance();
		let succeeded = self.program()?;
		Ok(succeeded && self.token.is_eof())
	}

	fn program(&mut self) -> Result<bool, ParserError> {
		let entry = self.emitter.begin_program(&self.options.program_name);
		self.methods.push(entry);
		while !self.token.is_eof() {
			if !self.declaration_or_statement()? {
				self.skip_unexpected();
			}
		}
		Ok(self.diagnostics.error_count() == 0)
	}

	/// One item of a statement list. The tokens are in sync again here, so
	/// recovery is over.
	fn declaration_or_statement(&mut self) -> Result<bool, ParserError> {
		self.recovering = false;
		Ok(self.declaration()? || self.statement()?)
	}

	/// Read the next token, reporting any scan errors on the way.
	fn advance(&mut self) {
		self.token = loop {
			match self.scanner.next_token() {
				Ok(token) => break token,
				Err(error) => self.diagnostics.scan_error(error),
			}
		};
		tracing::trace!(token = %self.token.kind, line = self.token.line, "advance");
	}

	fn position(&self) -> (usize, usize) { (self.token.line, self.token.column) }

	/// The lookahead, or `None` while recovering: what is left of a statement
	/// that went wrong matches nothing.
	fn peek(&self) -> Option<TokenKind<'src>> { (!self.recovering).then_some(self.token.kind) }

	fn check_keyword(&mut self, keyword: Keyword) -> bool {
		let matched = self.peek() == Some(TokenKind::Keyword(keyword));
		if matched {
			self.advance();
		}
		matched
	}

	fn check_symbol(&mut self, symbol: Symbol) -> bool {
		let matched = self.peek() == Some(TokenKind::Symbol(symbol));
		if matched {
			self.advance();
		}
		matched
	}

	fn check_identifier(&mut self) -> Option<&'src str> {
		let Some(TokenKind::Identifier(name)) = self.peek() else {
			return None;
		};
		self.advance();
		Some(name)
	}

	/// Match any symbol `select` maps to an operator.
	fn check_operator<T>(&mut self, select: impl Fn(Symbol) -> Option<T>) -> Option<T> {
		let Some(TokenKind::Symbol(symbol)) = self.peek() else {
			return None;
		};
		let operator = select(symbol)?;
		self.advance();
		Some(operator)
	}

	/// Consume `symbol` or report it missing.
	fn expect_symbol(&mut self, symbol: Symbol) -> bool {
		let matched = self.check_symbol(symbol);
		if !matched {
			self.error(ParseErrorType::ExpectedSymbol(symbol));
		}
		matched
	}

	fn error(&mut self, kind: ParseErrorType) {
		let (line, column) = self.position();
		self.error_at(line, column, kind);
	}

	/// Report an error and recover, unless it follows one already reported
	/// for the same statement.
	fn error_at(&mut self, line: usize, column: usize, kind: ParseErrorType) {
		if self.recovering {
			tracing::debug!(%kind, line, column, "suppressed follow-on error");
			return;
		}
		self.diagnostics.error(line, column, kind);
		self.recover();
	}

	fn warning_at(&mut self, line: usize, column: usize, kind: WarningType) {
		self.diagnostics.warning(line, column, kind);
	}

	/// Panic mode: discard tokens through the next `;` or up to the end of
	/// input. Consumes at least one token unless already at the end.
	fn recover(&mut self) {
		while !self.token.is_eof() {
			let terminator = self.token.is_symbol(Symbol::Semicolon);
			self.advance();
			if terminator {
				break;
			}
		}
		self.recovering = true;
	}

	/// The current token can't start a declaration or a statement.
	fn skip_unexpected(&mut self) {
		if !self.recovering {
			let (line, column) = self.position();
			self.diagnostics.error(line, column, ParseErrorType::UnexpectedToken(self.token.kind.to_string()));
		}
		self.recover();
	}

	/// Run a loop body with its labels on the loop stack. The labels are
	/// popped on every exit path.
	fn with_loop<T>(
		&mut self,
		labels: LoopLabels,
		body: impl FnOnce(&mut Self) -> Result<T, ParserError>,
	) -> Result<T, ParserError> {
		self.loops.push(labels);
		let result = body(self);
		self.loops.pop();
		result
	}

	fn current_method(&self) -> Option<MethodHandle> { self.methods.last().copied() }

	fn entry_method(&self) -> Option<MethodHandle> { self.methods.first().copied() }
}

#[cfg(test)]
mod tests;
