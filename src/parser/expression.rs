//! The precedence ladder, lowest level first. Left recursion is replaced by
//! iteration, so binary operators associate to the left.
//!
//! Every level returns `None` when its first token can't start an operand and
//! `Some(type)` otherwise. A failed operand yields [`Type::Unknown`], which
//! passes every later check so one mistake is reported once.
//!
//! An assignment consumes its own `;` and has type [`Type::Void`]. Its
//! statement is over, so every level hands it straight up without looking
//! for an operator.

use super::Parser;
use crate::{emitter::{AdditiveOp, ComparisonOp, Emitter, MultiplicativeOp, UnaryOp}, error::parser::{ParseErrorType, ParserError}, options::IdentifierTyping, scanner::{Symbol, TokenKind}, symbols::{Symbol as Entity, SymbolId}, types::Type};

impl<E: Emitter> Parser<'_, '_, E> {
	/// additive ( relational additive )?
	pub(super) fn expression(&mut self) -> Result<Option<Type>, ParserError> {
		let Some(left) = self.additive()? else {
			return Ok(None);
		};
		if left == Type::Void {
			return Ok(Some(left));
		}
		let (line, column) = self.position();
		let Some(operator) = self.check_operator(ComparisonOp::from_symbol) else {
			return Ok(Some(left));
		};
		let right = self.operand(Self::additive)?;
		if !left.comparable(right) {
			self.error_at(line, column, ParseErrorType::IncompatibleComparison { left, right });
		}
		self.emitter.emit_comparison_op(operator)?;
		Ok(Some(Type::Boolean))
	}

	/// sign? multiplicative ( additive-operator multiplicative )*
	fn additive(&mut self) -> Result<Option<Type>, ParserError> {
		let (line, column) = self.position();
		let sign = self.check_operator(|symbol| matches!(symbol, Symbol::Plus | Symbol::Minus).then_some(symbol));

		let mut left = match (self.multiplicative()?, sign) {
			(Some(ty), _) => ty,
			(None, None) => return Ok(None),
			(None, Some(_)) => {
				self.error(ParseErrorType::ExpectedExpression);
				Type::Unknown
			}
		};

		if let Some(sign) = sign {
			left = Type::unary_result(left).unwrap_or_else(|| {
				self.error_at(line, column, ParseErrorType::IncompatibleUnary { operator: sign, operand: left });
				Type::Unknown
			});
			if let Some(op) = UnaryOp::from_symbol(sign) {
				self.emitter.emit_unary_op(op)?;
			}
		}
		if left == Type::Void {
			return Ok(Some(left));
		}

		loop {
			let (line, column) = self.position();
			let Some(op) = self.check_operator(AdditiveOp::from_symbol) else {
				break;
			};
			let right = self.operand(Self::multiplicative)?;
			let result = self.binary_result(op.symbol(), left, right, line, column);
			if op == AdditiveOp::Add && left == Type::String {
				self.emitter.emit_string_concat()?;
			} else {
				self.emitter.emit_additive_op(op)?;
			}
			left = result;
		}
		Ok(Some(left))
	}

	/// primary ( multiplicative-operator primary )*
	fn multiplicative(&mut self) -> Result<Option<Type>, ParserError> {
		let Some(mut left) = self.primary()? else {
			return Ok(None);
		};
		if left == Type::Void {
			return Ok(Some(left));
		}
		loop {
			let (line, column) = self.position();
			let Some(op) = self.check_operator(MultiplicativeOp::from_symbol) else {
				break;
			};
			let right = self.operand(Self::primary)?;
			left = self.binary_result(op.symbol(), left, right, line, column);
			self.emitter.emit_multiplicative_op(op)?;
		}
		Ok(Some(left))
	}

	/// A literal or a name, where a local variable name may be followed by an
	/// assignment.
	fn primary(&mut self) -> Result<Option<Type>, ParserError> {
		match self.peek() {
			Some(TokenKind::NumberLiteral(value)) => {
				self.advance();
				self.emitter.emit_load_int(value)?;
				Ok(Some(Type::Integer))
			}
			Some(TokenKind::BooleanLiteral(value)) => {
				self.advance();
				self.emitter.emit_load_bool(value)?;
				Ok(Some(Type::Boolean))
			}
			Some(TokenKind::Identifier(name)) => {
				let (line, column) = self.position();
				self.advance();
				let symbol = self.symbols.resolve(name);
				if symbol.is_none() {
					self.error_at(line, column, ParseErrorType::Undeclared(name.to_string()));
				}
				if self.check_symbol(Symbol::Equal) {
					return self.assignment(symbol, name, line, column);
				}
				match symbol {
					Some(id) => Ok(Some(self.load_variable(id, name, line, column)?.unwrap_or(Type::Unknown))),
					None => Ok(Some(Type::Unknown)),
				}
			}
			_ => Ok(None),
		}
	}

	/// `= expression ;` after a name. Leaves nothing on the stack.
	fn assignment(&mut self, target: Option<SymbolId>, name: &str, line: usize, column: usize) -> Result<Option<Type>, ParserError> {
		let (value_line, value_column) = self.position();
		let value = self.operand(Self::expression)?;

		if let Some(id) = target {
			match self.symbols.get(id).clone() {
				Entity::Local { ty, handle, .. } if self.reachable(handle.method) => {
					if !ty.accepts(value) {
						self.error_at(value_line, value_column, ParseErrorType::IncompatibleAssignment { target: ty, value });
					}
					self.emitter.emit_assign_cast(ty, value)?;
					self.emitter.emit_store_local(handle)?;
				}
				Entity::Local { .. } => {
					self.error_at(line, column, ParseErrorType::CapturedVariable(name.to_string()));
				}
				_ => self.error_at(line, column, ParseErrorType::NotAssignable(name.to_string())),
			}
		}

		self.expect_symbol(Symbol::Semicolon);
		Ok(Some(Type::Void))
	}

	/// Push a variable or parameter and return its type. Anything else is
	/// reported and yields `None`.
	pub(super) fn load_variable(&mut self, id: SymbolId, name: &str, line: usize, column: usize) -> Result<Option<Type>, ParserError> {
		match self.symbols.get(id).clone() {
			Entity::Local { ty, handle, .. } if self.reachable(handle.method) => {
				self.emitter.emit_load_local(handle)?;
				Ok(Some(match self.options.identifier_typing {
					IdentifierTyping::Declared => ty,
					IdentifierTyping::Legacy if self.symbols.exists_in_current_scope(name) => Type::Boolean,
					IdentifierTyping::Legacy => Type::Unknown,
				}))
			}
			Entity::Parameter { ty, handle: Some(handle), .. } if Some(handle.method) == self.current_method() => {
				self.emitter.emit_load_parameter(handle)?;
				Ok(Some(ty))
			}
			Entity::Local { .. } | Entity::Parameter { .. } => {
				self.error_at(line, column, ParseErrorType::CapturedVariable(name.to_string()));
				Ok(None)
			}
			Entity::Method { .. } | Entity::PrimitiveType { .. } => {
				self.error_at(line, column, ParseErrorType::NotAValue(name.to_string()));
				Ok(None)
			}
		}
	}

	/// Locals of the current method and of the entry method, which act as
	/// program fields, are in reach.
	fn reachable(&self, owner: crate::emitter::MethodHandle) -> bool {
		Some(owner) == self.current_method() || Some(owner) == self.entry_method()
	}

	/// Parse a required operand with `level`, reporting its absence.
	fn operand(&mut self, level: fn(&mut Self) -> Result<Option<Type>, ParserError>) -> Result<Type, ParserError> {
		match level(self)? {
			Some(ty) => Ok(ty),
			None => {
				self.error(ParseErrorType::ExpectedExpression);
				Ok(Type::Unknown)
			}
		}
	}

	fn binary_result(&mut self, operator: Symbol, left: Type, right: Type, line: usize, column: usize) -> Type {
		Type::binary_result(operator, left, right).unwrap_or_else(|| {
			self.error_at(line, column, ParseErrorType::IncompatibleOperands { operator, left, right });
			Type::Unknown
		})
	}
}
