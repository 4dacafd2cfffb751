//! Statements never appear where an expression is expected. The condition of
//! an `if` is always an expression, its branches are always statements.
//! Every statement production reports whether its leading token matched.

use super::{LoopLabels, Parser};
use crate::{emitter::Emitter, error::parser::{FatalError, FatalErrorType, ParseErrorType, ParserError, WarningType}, options::StopStatements, scanner::{Keyword, Symbol}, types::Type};

impl<E: Emitter> Parser<'_, '_, E> {
	/// Ordered choice: the first alternative whose leading token matches
	/// wins.
	pub(super) fn statement(&mut self) -> Result<bool, ParserError> {
		Ok(self.compound_statement()?
			|| self.if_statement()?
			|| self.while_statement()?
			|| self.expression_statement()?
			|| self.check_symbol(Symbol::Semicolon)
			|| self.predefined_command()?
			|| self.bug_statement()?
			|| (self.options.stop_statements == StopStatements::Enabled && self.stop_statement()?))
	}

	/// A block. It doesn't open a scope, methods do.
	pub(super) fn compound_statement(&mut self) -> Result<bool, ParserError> {
		if !self.check_symbol(Symbol::LeftBrace) {
			return Ok(false);
		}
		while self.declaration_or_statement()? {}
		self.expect_symbol(Symbol::RightBrace);
		Ok(true)
	}

	fn expression_statement(&mut self) -> Result<bool, ParserError> {
		let Some(ty) = self.expression()? else {
			return Ok(false);
		};
		// Assignments leave nothing behind.
		if ty != Type::Void {
			self.emitter.emit_pop()?;
		}
		Ok(true)
	}

	fn if_statement(&mut self) -> Result<bool, ParserError> {
		if !self.check_keyword(Keyword::If) {
			return Ok(false);
		}
		self.condition()?;

		let else_label = self.emitter.new_label()?;
		self.emitter.emit_branch_if_false(else_label)?;
		self.required_statement()?;

		if self.check_keyword(Keyword::Else) {
			let end_label = self.emitter.new_label()?;
			self.emitter.emit_branch(end_label)?;
			self.emitter.bind_label(else_label)?;
			self.required_statement()?;
			self.emitter.bind_label(end_label)?;
		} else {
			self.emitter.bind_label(else_label)?;
		}
		Ok(true)
	}

	/// Pre-test loop: the condition is evaluated before every iteration.
	fn while_statement(&mut self) -> Result<bool, ParserError> {
		if !self.check_keyword(Keyword::While) {
			return Ok(false);
		}
		let continue_label = self.emitter.new_label()?;
		let break_label = self.emitter.new_label()?;

		self.with_loop(LoopLabels { break_label, continue_label }, |parser| {
			parser.emitter.bind_label(continue_label)?;
			parser.condition()?;
			parser.emitter.emit_branch_if_false(break_label)?;
			parser.required_statement()?;
			parser.emitter.emit_branch(continue_label)?;
			parser.emitter.bind_label(break_label)?;
			Ok(())
		})?;
		Ok(true)
	}

	/// `( expression )` that must be a `bool`.
	fn condition(&mut self) -> Result<(), ParserError> {
		self.expect_symbol(Symbol::LeftParen);
		let (line, column) = self.position();
		match self.expression()? {
			None => self.error(ParseErrorType::ExpectedExpression),
			Some(ty) if !Type::Boolean.accepts(ty) => self.error_at(line, column, ParseErrorType::ConditionNotBoolean(ty)),
			Some(_) => {}
		}
		self.expect_symbol(Symbol::RightParen);
		Ok(())
	}

	fn required_statement(&mut self) -> Result<(), ParserError> {
		if !self.statement()? {
			self.error(ParseErrorType::ExpectedStatement);
		}
		Ok(())
	}

	/// `printf ( name? ) ;` prints a variable and logs the symbol it names.
	fn predefined_command(&mut self) -> Result<bool, ParserError> {
		if !self.check_keyword(Keyword::Printf) {
			return Ok(false);
		}
		self.expect_symbol(Symbol::LeftParen);
		let (line, column) = self.position();
		if let Some(name) = self.check_identifier() {
			match self.symbols.resolve(name) {
				None => self.error_at(line, column, ParseErrorType::Undeclared(name.to_string())),
				Some(id) => {
					let symbol = self.symbols.get(id);
					tracing::info!(
						%symbol,
						ty = %symbol.ty(),
						current_scope = self.symbols.exists_in_current_scope(name),
						"printf"
					);
					if self.load_variable(id, name, line, column)?.is_some() {
						self.emitter.emit_print()?;
					}
				}
			}
		}
		self.expect_symbol(Symbol::RightParen);
		self.expect_symbol(Symbol::Semicolon);
		Ok(true)
	}

	/// `bug statement ;` marks a statement as suspicious.
	fn bug_statement(&mut self) -> Result<bool, ParserError> {
		let (line, column) = self.position();
		if !self.check_keyword(Keyword::Bug) {
			return Ok(false);
		}
		self.required_statement()?;
		self.expect_symbol(Symbol::Semicolon);
		self.warning_at(line, column, WarningType::PossibleBug);
		Ok(true)
	}

	/// `return`, `break` and `continue`.
	fn stop_statement(&mut self) -> Result<bool, ParserError> {
		let (line, column) = self.position();
		if self.check_keyword(Keyword::Return) {
			let expected = self.emitter.current_method_return_type()?;
			if expected != Type::Void {
				let (line, column) = self.position();
				match self.expression()? {
					None => self.error(ParseErrorType::ExpectedExpression),
					Some(found) if !expected.accepts(found) => {
						self.error_at(line, column, ParseErrorType::IncompatibleReturn { expected, found })
					}
					Some(_) => {}
				}
			}
			self.expect_symbol(Symbol::Semicolon);
			self.emitter.emit_return()?;
			return Ok(true);
		}

		if self.check_keyword(Keyword::Break) {
			let labels = self.loops.last().ok_or(FatalError::new(line, column, FatalErrorType::BreakOutsideLoop))?;
			let target = labels.break_label;
			self.expect_symbol(Symbol::Semicolon);
			self.emitter.emit_branch(target)?;
			return Ok(true);
		}

		if self.check_keyword(Keyword::Continue) {
			let labels = self.loops.last().ok_or(FatalError::new(line, column, FatalErrorType::ContinueOutsideLoop))?;
			let target = labels.continue_label;
			self.expect_symbol(Symbol::Semicolon);
			self.emitter.emit_branch(target)?;
			return Ok(true);
		}

		Ok(false)
	}
}
