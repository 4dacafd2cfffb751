use crate::{scanner::Symbol, types::Type};

#[derive(thiserror::Error, Debug)]
pub enum ParserError {
	/// Broken invariant in the emitter or symbol table, should never happen
	#[error("{0}")]
	InternalError(#[from] anyhow::Error),
	/// Error the parser can't recover from
	#[error(transparent)]
	FatalError(#[from] FatalError),
}

/// A structural error that ends the parse.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("line {line}, column {column}: {type}")]
pub struct FatalError {
	pub line:   usize,
	pub column: usize,
	pub r#type: FatalErrorType,
}

impl FatalError {
	pub fn new(line: usize, column: usize, r#type: FatalErrorType) -> Self { Self { line, column, r#type } }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FatalErrorType {
	BreakOutsideLoop,
	ContinueOutsideLoop,
}

impl std::fmt::Display for FatalErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			FatalErrorType::BreakOutsideLoop => write!(f, "'break' outside of a loop"),
			FatalErrorType::ContinueOutsideLoop => write!(f, "'continue' outside of a loop"),
		}
	}
}

/// Which kind of name a redeclaration error is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
	Method,
	Parameter,
	Field,
}

impl std::fmt::Display for DeclarationKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			DeclarationKind::Method => "Method",
			DeclarationKind::Parameter => "Parameter",
			DeclarationKind::Field => "Field",
		})
	}
}

/// Recoverable syntax and semantic errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
	ExpectedSymbol(Symbol),
	ExpectedIdentifier,
	ExpectedExpression,
	ExpectedStatement,
	ExpectedBlock,
	/// A token that can't start a statement.
	UnexpectedToken(String),
	Redeclared { kind: DeclarationKind, name: String },
	Undeclared(String),
	NotAssignable(String),
	/// A method or type name used where a value is needed.
	NotAValue(String),
	/// A variable owned by another method.
	CapturedVariable(String),
	VoidField(String),
	VoidParameter(String),
	ConditionNotBoolean(Type),
	IncompatibleComparison { left: Type, right: Type },
	IncompatibleOperands { operator: Symbol, left: Type, right: Type },
	IncompatibleUnary { operator: Symbol, operand: Type },
	IncompatibleAssignment { target: Type, value: Type },
	IncompatibleReturn { expected: Type, found: Type },
}

impl std::fmt::Display for ParseErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ParseErrorType::*;
		match self {
			ExpectedSymbol(symbol) => write!(f, "Expected '{symbol}'"),
			ExpectedIdentifier => write!(f, "Expected identifier"),
			ExpectedExpression => write!(f, "Expected expression"),
			ExpectedStatement => write!(f, "Expected statement"),
			ExpectedBlock => write!(f, "Expected block"),
			UnexpectedToken(token) => write!(f, "Unexpected {token}"),
			Redeclared { kind, name } => write!(f, "{kind} '{name}' is redeclared"),
			Undeclared(name) => write!(f, "Undeclared identifier '{name}'"),
			NotAssignable(name) => write!(f, "'{name}' is not an assignable variable"),
			NotAValue(name) => write!(f, "'{name}' is not a value"),
			CapturedVariable(name) => write!(f, "'{name}' belongs to an enclosing method and can't be used here"),
			VoidField(name) => write!(f, "Field '{name}' can't be of type void"),
			VoidParameter(name) => write!(f, "Parameter '{name}' can't be of type void"),
			ConditionNotBoolean(found) => write!(f, "Condition must be bool, found {found}"),
			IncompatibleComparison { left, right } => write!(f, "Can't compare {left} with {right}"),
			IncompatibleOperands { operator, left, right } => {
				write!(f, "Incompatible operand types {left} {operator} {right}")
			}
			IncompatibleUnary { operator, operand } => write!(f, "Incompatible operand type {operator}{operand}"),
			IncompatibleAssignment { target, value } => write!(f, "Can't assign {value} to {target}"),
			IncompatibleReturn { expected, found } => {
				write!(f, "Returned {found} isn't compatible with method type {expected}")
			}
		}
	}
}

/// Non-fatal diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum WarningType {
	PossibleBug,
}

impl std::fmt::Display for WarningType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			WarningType::PossibleBug => write!(f, "The statement may contain a bug"),
		}
	}
}
