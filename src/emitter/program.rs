//! The in-memory target program and its textual listing.

use std::fmt::{self, Display};

use super::{LocalHandle, MethodHandle};
use crate::{scanner::Symbol, types::Type};

/// Generates `from_symbol` and `mnemonic` for an operator family.
macro_rules! operator_family {
	($(#[$meta:meta])* $name:ident { $($variant:ident => $symbol:ident, $mnemonic:literal;)* }) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq)]
		pub enum $name {
			$($variant,)*
		}

		impl $name {
			pub fn from_symbol(symbol: Symbol) -> Option<Self> {
				match symbol {
					$(Symbol::$symbol => Some($name::$variant),)*
					_ => None,
				}
			}

			pub fn symbol(self) -> Symbol {
				match self {
					$($name::$variant => Symbol::$symbol,)*
				}
			}

			pub fn mnemonic(self) -> &'static str {
				match self {
					$($name::$variant => $mnemonic,)*
				}
			}
		}
	};
}

operator_family! {
	/// Prefix operators that produce code. A unary `+` emits nothing.
	UnaryOp {
		Negate => Minus, "neg";
	}
}

operator_family! {
	/// Operators on the additive precedence level.
	AdditiveOp {
		Add => Plus, "add";
		Subtract => Minus, "sub";
		BitOr => Pipe, "or";
		LogicalOr => PipePipe, "or.l";
		Xor => Caret, "xor";
	}
}

operator_family! {
	/// Operators on the multiplicative precedence level.
	MultiplicativeOp {
		Multiply => Star, "mul";
		Divide => Slash, "div";
		Remainder => Percent, "rem";
		BitAnd => Ampersand, "and";
		LogicalAnd => AmpersandAmpersand, "and.l";
	}
}

operator_family! {
	/// Relational operators. At most one per expression.
	ComparisonOp {
		Less => Less, "clt";
		LessEqual => LessEqual, "cle";
		Equal => EqualEqual, "ceq";
		NotEqual => BangEqual, "cne";
		GreaterEqual => GreaterEqual, "cge";
		Greater => Greater, "cgt";
	}
}

/// Where a branch goes. Branches to a label that isn't bound yet stay
/// `Pending` until the label is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
	Pending(usize),
	Offset(usize),
}

impl Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Target::Pending(label) => write!(f, "L{label}"),
			Target::Offset(offset) => write!(f, "{offset:04}"),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
	LoadInt(i32),
	LoadBool(bool),
	LoadLocal(LocalHandle),
	LoadArg(u16),
	StoreLocal(LocalHandle),
	Unary(UnaryOp),
	Additive(AdditiveOp),
	Multiplicative(MultiplicativeOp),
	Compare(ComparisonOp),
	Concat,
	AssignCast { target: Type, source: Type },
	Branch(Target),
	BranchIfFalse(Target),
	Return,
	Pop,
	Print,
}

impl Instruction {
	pub fn target_mut(&mut self) -> Option<&mut Target> {
		match self {
			Instruction::Branch(target) | Instruction::BranchIfFalse(target) => Some(target),
			_ => None,
		}
	}
}

impl Display for Instruction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		use Instruction::*;
		match self {
			LoadInt(n) => write!(f, "ldc.i4 {n}"),
			LoadBool(b) => write!(f, "ldc.i4 {}", u8::from(*b)),
			LoadLocal(handle) => write!(f, "ldloc {handle}"),
			LoadArg(ordinal) => write!(f, "ldarg {ordinal}"),
			StoreLocal(handle) => write!(f, "stloc {handle}"),
			Unary(op) => f.write_str(op.mnemonic()),
			Additive(op) => f.write_str(op.mnemonic()),
			Multiplicative(op) => f.write_str(op.mnemonic()),
			Compare(op) => f.write_str(op.mnemonic()),
			Concat => write!(f, "call string::concat"),
			AssignCast { target, source } => write!(f, "conv {source} -> {target}"),
			Branch(target) => write!(f, "br {target}"),
			BranchIfFalse(target) => write!(f, "brfalse {target}"),
			Return => write!(f, "ret"),
			Pop => write!(f, "pop"),
			Print => write!(f, "call print"),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
	pub name: String,
	pub ty:   Type,
}

/// Bookkeeping for one label: where it was bound and which branches still
/// wait for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct LabelState {
	pub bound:  Option<usize>,
	pub fixups: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
	pub name:             String,
	pub return_type:      Type,
	/// Indexed by ordinal - 1; ordinal 0 is the implicit context slot.
	pub parameters:       Vec<Option<Variable>>,
	pub parameter_types:  Vec<Type>,
	pub locals:           Vec<Variable>,
	pub code:             Vec<Instruction>,
	pub(crate) labels:    Vec<LabelState>,
}

impl Method {
	pub(crate) fn new(name: &str, return_type: Type, parameter_types: &[Type]) -> Self {
		Self {
			name: name.to_string(),
			return_type,
			parameters: vec![None; parameter_types.len()],
			parameter_types: parameter_types.to_vec(),
			locals: Vec::new(),
			code: Vec::new(),
			labels: Vec::new(),
		}
	}

	/// Number of labels allocated in this method.
	pub fn label_count(&self) -> usize { self.labels.len() }

	/// Code offsets labels were bound to, in allocation order.
	pub fn label_offsets(&self) -> impl Iterator<Item = Option<usize>> + '_ {
		self.labels.iter().map(|label| label.bound)
	}

	/// Count instructions matching a predicate.
	pub fn count(&self, predicate: impl Fn(&Instruction) -> bool) -> usize {
		self.code.iter().filter(|instruction| predicate(instruction)).count()
	}
}

impl Display for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let parameters = self
			.parameter_types
			.iter()
			.zip(&self.parameters)
			.map(|(ty, parameter)| match parameter {
				Some(parameter) => format!("{ty} {}", parameter.name),
				None => ty.to_string(),
			})
			.collect::<Vec<_>>()
			.join(", ");
		writeln!(f, ".method {} {}({parameters})", self.return_type, self.name)?;
		writeln!(f, "{{")?;
		if !self.locals.is_empty() {
			let locals =
				self.locals.iter().map(|local| format!("{} {}", local.ty, local.name)).collect::<Vec<_>>().join(", ");
			writeln!(f, "  .locals ({locals})")?;
		}
		for (offset, instruction) in self.code.iter().enumerate() {
			writeln!(f, "  {offset:04}: {instruction}")?;
		}
		writeln!(f, "}}")
	}
}

/// Output of a compilation: the program container and its methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
	pub name:    String,
	pub methods: Vec<Method>,
}

impl Program {
	/// The implicit method holding top-level statements.
	pub fn entry(&self) -> Option<&Method> { self.methods.first() }

	pub fn method(&self, name: &str) -> Option<&Method> { self.methods.iter().find(|method| method.name == name) }

	pub fn get(&self, handle: MethodHandle) -> Option<&Method> { self.methods.get(handle.0) }
}

impl Display for Program {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, ".program {}", self.name)?;
		for method in &self.methods {
			writeln!(f)?;
			write!(f, "{method}")?;
		}
		Ok(())
	}
}
