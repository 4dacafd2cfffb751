//! The closed set of types and the rules relating them.
//!
//! There are no user-defined types, so assignability and operator typing are
//! small explicit tables rather than anything structural.

use std::fmt::Display;

use crate::scanner::{Keyword, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
	Integer,
	Boolean,
	Character,
	String,
	/// Wildcard reference, accepts any value type.
	OpaqueReference,
	/// Only valid as a method return type.
	Void,
	/// Result of a failed subexpression. Compatible with everything so one
	/// error doesn't cascade into many.
	Unknown,
}

impl Type {
	/// Every type with a source spelling, paired with that spelling.
	pub const PREDEFINED: [(&'static str, Type); 7] = [
		("int", Type::Integer),
		("bool", Type::Boolean),
		("char", Type::Character),
		("string", Type::String),
		("pchar", Type::String),
		("ref", Type::OpaqueReference),
		("void", Type::Void),
	];

	pub fn from_keyword(keyword: Keyword) -> Option<Self> {
		Some(match keyword {
			Keyword::Int => Type::Integer,
			Keyword::Bool => Type::Boolean,
			Keyword::Char => Type::Character,
			Keyword::String | Keyword::Pchar => Type::String,
			Keyword::Ref => Type::OpaqueReference,
			Keyword::Void => Type::Void,
			_ => return None,
		})
	}

	pub fn is_unknown(self) -> bool { self == Type::Unknown }

	/// Whether a value of type `source` may be used where `self` is expected.
	pub fn accepts(self, source: Type) -> bool {
		use Type::*;
		match (self, source) {
			(Unknown, _) | (_, Unknown) => true,
			(Void, _) | (_, Void) => false,
			(OpaqueReference, _) => true,
			(target, source) => target == source,
		}
	}

	/// Whether two operands may be compared with a relational operator.
	pub fn comparable(self, other: Type) -> bool {
		if self.is_unknown() || other.is_unknown() {
			return true;
		}
		self != Type::Void && self == other
	}

	/// Result type of a binary operator, or `None` if the operands don't fit.
	pub fn binary_result(operator: Symbol, left: Type, right: Type) -> Option<Type> {
		use Type::*;
		if left.is_unknown() || right.is_unknown() {
			return Some(Unknown);
		}
		match (operator, left, right) {
			(Symbol::Plus, Integer, Integer) => Some(Integer),
			(Symbol::Plus, String, String) => Some(String),
			(Symbol::Minus | Symbol::Star | Symbol::Slash | Symbol::Percent, Integer, Integer) => Some(Integer),
			(Symbol::Pipe | Symbol::Caret | Symbol::Ampersand, Integer, Integer) => Some(Integer),
			(Symbol::Pipe | Symbol::Caret | Symbol::Ampersand, Boolean, Boolean) => Some(Boolean),
			(Symbol::PipePipe | Symbol::AmpersandAmpersand, Boolean, Boolean) => Some(Boolean),
			_ => None,
		}
	}

	/// Result type of a unary `+` or `-`.
	pub fn unary_result(operand: Type) -> Option<Type> {
		match operand {
			Type::Integer | Type::Unknown => Some(operand),
			_ => None,
		}
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			Type::Integer => "int",
			Type::Boolean => "bool",
			Type::Character => "char",
			Type::String => "string",
			Type::OpaqueReference => "ref",
			Type::Void => "void",
			Type::Unknown => "<unknown>",
		})
	}
}

#[cfg(test)]
mod tests {
	use super::{Type::*, *};

	const ALL: [Type; 7] = [Integer, Boolean, Character, String, OpaqueReference, Void, Unknown];

	#[test]
	fn assignability_table() {
		for target in ALL {
			for source in ALL {
				let expected = match (target, source) {
					(Unknown, _) | (_, Unknown) => true,
					(Void, _) | (_, Void) => false,
					(OpaqueReference, _) => true,
					_ => target == source,
				};
				assert_eq!(target.accepts(source), expected, "{target} <- {source}");
			}
		}
		assert!(Integer.accepts(Integer));
		assert!(!Integer.accepts(Boolean));
		assert!(!String.accepts(Character));
		assert!(OpaqueReference.accepts(String));
		assert!(!String.accepts(OpaqueReference));
		assert!(!Void.accepts(Void));
	}

	#[test]
	fn arithmetic_operators() {
		for op in [Symbol::Plus, Symbol::Minus, Symbol::Star, Symbol::Slash, Symbol::Percent] {
			assert_eq!(Type::binary_result(op, Integer, Integer), Some(Integer));
			assert_eq!(Type::binary_result(op, Boolean, Boolean), None);
			assert_eq!(Type::binary_result(op, Integer, Boolean), None);
		}
		assert_eq!(Type::binary_result(Symbol::Plus, String, String), Some(String));
		assert_eq!(Type::binary_result(Symbol::Minus, String, String), None);
	}

	#[test]
	fn logical_and_bitwise_operators() {
		for op in [Symbol::PipePipe, Symbol::AmpersandAmpersand] {
			assert_eq!(Type::binary_result(op, Boolean, Boolean), Some(Boolean));
			assert_eq!(Type::binary_result(op, Integer, Integer), None);
		}
		for op in [Symbol::Pipe, Symbol::Caret, Symbol::Ampersand] {
			assert_eq!(Type::binary_result(op, Integer, Integer), Some(Integer));
			assert_eq!(Type::binary_result(op, Boolean, Boolean), Some(Boolean));
			assert_eq!(Type::binary_result(op, Boolean, Integer), None);
		}
	}

	#[test]
	fn unknown_suppresses_errors() {
		assert_eq!(Type::binary_result(Symbol::Star, Unknown, Boolean), Some(Unknown));
		assert!(Unknown.comparable(Integer));
		assert!(Boolean.comparable(Boolean));
		assert!(!Void.comparable(Void));
		assert!(!Integer.comparable(Character));
		assert_eq!(Type::unary_result(Unknown), Some(Unknown));
		assert_eq!(Type::unary_result(Boolean), None);
	}

	#[test]
	fn keyword_spellings_match_predefined_names() {
		for (name, ty) in Type::PREDEFINED {
			let keyword = Keyword::from_word(name).unwrap();
			assert_eq!(Type::from_keyword(keyword), Some(ty));
		}
	}
}
