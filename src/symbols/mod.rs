//! Names and the scopes they live in.
//!
//! Symbols are stored in an arena and addressed by [`SymbolId`]; a scope maps
//! names to ids. Resolution walks the scope chain from the innermost scope out
//! to the universe scope holding the predefined types. Redeclaration checks
//! only look at the innermost scope, so shadowing an outer name is fine.

use std::fmt::Display;

use anyhow::bail;
use indexmap::IndexMap;

use crate::{emitter::{LocalHandle, MethodHandle, ParamHandle}, types::Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
	PrimitiveType { name: String, ty: Type },
	Local { name: String, ty: Type, handle: LocalHandle },
	Parameter { name: String, ty: Type, ordinal: u16, handle: Option<ParamHandle> },
	Method { name: String, return_type: Type, parameters: Vec<SymbolId>, handle: Option<MethodHandle> },
}

impl Symbol {
	pub fn name(&self) -> &str {
		match self {
			Symbol::PrimitiveType { name, .. }
			| Symbol::Local { name, .. }
			| Symbol::Parameter { name, .. }
			| Symbol::Method { name, .. } => name,
		}
	}

	/// The type a reference to this symbol produces.
	pub fn ty(&self) -> Type {
		match self {
			Symbol::PrimitiveType { ty, .. } | Symbol::Local { ty, .. } | Symbol::Parameter { ty, .. } => *ty,
			Symbol::Method { return_type, .. } => *return_type,
		}
	}
}

impl Display for Symbol {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Symbol::PrimitiveType { name, ty } => write!(f, "type {name} = {ty}"),
			Symbol::Local { name, ty, handle } => write!(f, "local {ty} {name} (slot {})", handle.index),
			Symbol::Parameter { name, ty, ordinal, .. } => write!(f, "parameter {ty} {name} (#{ordinal})"),
			Symbol::Method { name, return_type, parameters, .. } => {
				write!(f, "method {return_type} {name}/{}", parameters.len())
			}
		}
	}
}

type Scope = IndexMap<String, SymbolId>;

/// Scope chain plus the symbol arena.
#[derive(Debug)]
pub struct SymbolTable {
	symbols: Vec<Symbol>,
	/// Innermost last. Index 0 is the universe, index 1 the program scope.
	scopes:  Vec<Scope>,
}

impl Default for SymbolTable {
	fn default() -> Self { Self::new() }
}

impl SymbolTable {
	/// A table holding the universe scope with the predefined types and an
	/// empty program scope on top of it.
	pub fn new() -> Self {
		let mut table = Self { symbols: Vec::new(), scopes: vec![Scope::new()] };
		for (name, ty) in Type::PREDEFINED {
			table.register_global(Symbol::PrimitiveType { name: name.to_string(), ty });
		}
		table.scopes.push(Scope::new());
		table
	}

	/// Add a symbol to the universe scope.
	pub fn register_global(&mut self, symbol: Symbol) -> SymbolId {
		let id = self.alloc(symbol);
		let name = self.symbols[id.0].name().to_string();
		self.scopes[0].insert(name, id);
		id
	}

	pub fn enter_scope(&mut self) {
		self.scopes.push(Scope::new());
		tracing::debug!(depth = self.depth(), "entered scope");
	}

	/// Drop the innermost scope. The program and universe scopes stay.
	pub fn exit_scope(&mut self) -> anyhow::Result<()> {
		if self.scopes.len() <= 2 {
			bail!("Attempted to exit the program scope");
		}
		self.scopes.pop();
		tracing::debug!(depth = self.depth(), "exited scope");
		Ok(())
	}

	/// Number of scopes above the universe.
	pub fn depth(&self) -> usize { self.scopes.len() - 1 }

	pub fn exists_in_current_scope(&self, name: &str) -> bool {
		self.scopes.last().is_some_and(|scope| scope.contains_key(name))
	}

	pub fn resolve(&self, name: &str) -> Option<SymbolId> {
		self.scopes.iter().rev().find_map(|scope| scope.get(name).copied())
	}

	pub fn get(&self, id: SymbolId) -> &Symbol { &self.symbols[id.0] }

	pub fn declare_method(&mut self, name: &str, return_type: Type) -> SymbolId {
		self.declare(Symbol::Method { name: name.to_string(), return_type, parameters: Vec::new(), handle: None })
	}

	/// Attach the backend handle and parameter list once the method header is
	/// complete.
	pub fn attach_method(&mut self, method: SymbolId, handle: MethodHandle, parameters: Vec<SymbolId>) -> anyhow::Result<()> {
		match &mut self.symbols[method.0] {
			Symbol::Method { handle: slot, parameters: params, .. } => {
				*slot = Some(handle);
				*params = parameters;
				Ok(())
			}
			other => bail!("Symbol {other:?} is not a method"),
		}
	}

	pub fn declare_parameter(&mut self, name: &str, ty: Type, ordinal: u16) -> SymbolId {
		self.declare(Symbol::Parameter { name: name.to_string(), ty, ordinal, handle: None })
	}

	pub fn attach_parameter(&mut self, parameter: SymbolId, handle: ParamHandle) -> anyhow::Result<()> {
		match &mut self.symbols[parameter.0] {
			Symbol::Parameter { handle: slot, .. } => {
				*slot = Some(handle);
				Ok(())
			}
			other => bail!("Symbol {other:?} is not a parameter"),
		}
	}

	pub fn declare_local(&mut self, name: &str, ty: Type, handle: LocalHandle) -> SymbolId {
		self.declare(Symbol::Local { name: name.to_string(), ty, handle })
	}

	/// Insert into the innermost scope. A redeclaration replaces the earlier
	/// binding; the caller reports it.
	fn declare(&mut self, symbol: Symbol) -> SymbolId {
		let id = self.alloc(symbol);
		let name = self.symbols[id.0].name().to_string();
		if let Some(scope) = self.scopes.last_mut() {
			scope.insert(name, id);
		}
		id
	}

	fn alloc(&mut self, symbol: Symbol) -> SymbolId {
		self.symbols.push(symbol);
		SymbolId(self.symbols.len() - 1)
	}
}
