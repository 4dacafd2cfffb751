use anyhow::Context;

use super::Parser;
use crate::{emitter::Emitter, error::parser::{DeclarationKind, ParseErrorType, ParserError}, scanner::{Symbol, TokenKind}, symbols::SymbolId, types::Type};

/// A formal parameter as parsed, before the method exists in the backend.
struct FormalParameter<'src> {
	id:      SymbolId,
	name:    &'src str,
	ty:      Type,
	ordinal: u16,
}

impl<'src, E: Emitter> Parser<'src, '_, E> {
	/// `type name` followed by a method header and body, or by `;`.
	pub(super) fn declaration(&mut self) -> Result<bool, ParserError> {
		let Some(ty) = self.type_keyword() else {
			return Ok(false);
		};
		let (line, column) = self.position();
		let Some(name) = self.check_identifier() else {
			self.error(ParseErrorType::ExpectedIdentifier);
			return Ok(true);
		};

		if self.check_symbol(Symbol::LeftParen) {
			self.method_declaration(ty, name, line, column)?;
		} else {
			self.field_declaration(ty, name, line, column)?;
		}
		Ok(true)
	}

	/// A type keyword, if the current token is one. Absence is not an error.
	pub(super) fn type_keyword(&mut self) -> Option<Type> {
		let Some(TokenKind::Keyword(keyword)) = self.peek() else {
			return None;
		};
		let ty = Type::from_keyword(keyword)?;
		self.advance();
		Some(ty)
	}

	/// The name is checked before its `;` is read, so recovery from a bad
	/// field ends at that `;`.
	fn field_declaration(&mut self, ty: Type, name: &'src str, line: usize, column: usize) -> Result<(), ParserError> {
		if self.symbols.exists_in_current_scope(name) {
			self.error_at(line, column, ParseErrorType::Redeclared { kind: DeclarationKind::Field, name: name.to_string() });
		}
		if ty == Type::Void {
			self.error_at(line, column, ParseErrorType::VoidField(name.to_string()));
			return Ok(());
		}

		let handle = self.emitter.declare_local(name, ty)?;
		self.symbols.declare_local(name, ty, handle);
		self.expect_symbol(Symbol::Semicolon);
		Ok(())
	}

	fn method_declaration(
		&mut self,
		return_type: Type,
		name: &'src str,
		line: usize,
		column: usize,
	) -> Result<(), ParserError> {
		if self.symbols.exists_in_current_scope(name) {
			self.error_at(line, column, ParseErrorType::Redeclared { kind: DeclarationKind::Method, name: name.to_string() });
		}
		let method = self.symbols.declare_method(name, return_type);

		self.symbols.enter_scope();
		// Loops of the enclosing method are out of reach inside this one.
		let outer_loops = std::mem::take(&mut self.loops);
		let result = self.method_rest(method, name, return_type);
		self.loops = outer_loops;
		let exited = self.symbols.exit_scope();
		result?;
		exited?;
		Ok(())
	}

	/// Parameters, backend method and body.
	fn method_rest(&mut self, method: SymbolId, name: &str, return_type: Type) -> Result<(), ParserError> {
		let mut parameters = Vec::new();
		while let Some(ty) = self.type_keyword() {
			let (line, column) = self.position();
			let Some(parameter) = self.check_identifier() else {
				self.error(ParseErrorType::ExpectedIdentifier);
				break;
			};
			if ty == Type::Void {
				self.error_at(line, column, ParseErrorType::VoidParameter(parameter.to_string()));
				break;
			}
			if self.symbols.exists_in_current_scope(parameter) {
				self.error_at(line, column, ParseErrorType::Redeclared {
					kind: DeclarationKind::Parameter,
					name: parameter.to_string(),
				});
			}
			let ordinal = u16::try_from(parameters.len() + 1).context("Too many parameters")?;
			let id = self.symbols.declare_parameter(parameter, ty, ordinal);
			parameters.push(FormalParameter { id, name: parameter, ty, ordinal });
			if !self.check_symbol(Symbol::Comma) {
				break;
			}
		}
		self.expect_symbol(Symbol::RightParen);

		let types = parameters.iter().map(|parameter| parameter.ty).collect::<Vec<_>>();
		let handle = self.emitter.declare_method(name, return_type, &types);
		for parameter in &parameters {
			let parameter_handle =
				self.emitter.declare_parameter(handle, parameter.name, parameter.ordinal, parameter.ty)?;
			self.symbols.attach_parameter(parameter.id, parameter_handle)?;
		}
		self.symbols.attach_method(method, handle, parameters.iter().map(|parameter| parameter.id).collect())?;

		self.methods.push(handle);
		let body = self.method_body();
		self.methods.pop();
		body?;
		self.emitter.end_method()?;
		Ok(())
	}

	fn method_body(&mut self) -> Result<(), ParserError> {
		if !self.compound_statement()? {
			self.error(ParseErrorType::ExpectedBlock);
		}
		Ok(())
	}
}
