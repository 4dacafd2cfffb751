//! Code emission backend.
//!
//! The parser drives an [`Emitter`] as it recognizes each production, so code
//! comes out in the same order as the source. Branch targets are forward
//! references: a [`Label`] is allocated before any branch uses it and bound to
//! an offset later. Branches emitted before the bind are recorded as fixups
//! and patched the moment the label is bound.

mod program;

use std::fmt::Display;

use anyhow::{Context, bail, ensure};
pub use program::*;

use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodHandle(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamHandle {
	pub method:  MethodHandle,
	pub ordinal: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalHandle {
	pub method: MethodHandle,
	pub index:  usize,
}

impl Display for LocalHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}:{}", self.method.0, self.index) }
}

/// A branch target inside one method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label {
	pub method: MethodHandle,
	pub index:  usize,
}

/// A method-oriented virtual target.
pub trait Emitter {
	/// Create the program container and open its implicit entry method.
	fn begin_program(&mut self, name: &str) -> MethodHandle;

	/// Define a method and make it the current one until [`Emitter::end_method`].
	fn declare_method(&mut self, name: &str, return_type: Type, parameter_types: &[Type]) -> MethodHandle;

	/// Name a parameter. Ordinals start at 1.
	fn declare_parameter(&mut self, method: MethodHandle, name: &str, ordinal: u16, ty: Type)
	-> anyhow::Result<ParamHandle>;

	/// Close the current method and return to the enclosing one.
	fn end_method(&mut self) -> anyhow::Result<()>;

	fn declare_local(&mut self, name: &str, ty: Type) -> anyhow::Result<LocalHandle>;

	fn current_method_return_type(&self) -> anyhow::Result<Type>;

	fn new_label(&mut self) -> anyhow::Result<Label>;

	/// Mark the next instruction as the label's target. Exactly once per label.
	fn bind_label(&mut self, label: Label) -> anyhow::Result<()>;

	fn emit_branch(&mut self, label: Label) -> anyhow::Result<()>;

	/// Pops the condition and branches when it is false.
	fn emit_branch_if_false(&mut self, label: Label) -> anyhow::Result<()>;

	fn emit_return(&mut self) -> anyhow::Result<()>;

	fn emit_unary_op(&mut self, op: UnaryOp) -> anyhow::Result<()>;

	fn emit_additive_op(&mut self, op: AdditiveOp) -> anyhow::Result<()>;

	fn emit_multiplicative_op(&mut self, op: MultiplicativeOp) -> anyhow::Result<()>;

	fn emit_comparison_op(&mut self, op: ComparisonOp) -> anyhow::Result<()>;

	fn emit_string_concat(&mut self) -> anyhow::Result<()>;

	fn emit_assign_cast(&mut self, target: Type, source: Type) -> anyhow::Result<()>;

	fn emit_store_local(&mut self, local: LocalHandle) -> anyhow::Result<()>;

	fn emit_load_int(&mut self, value: i32) -> anyhow::Result<()>;

	fn emit_load_bool(&mut self, value: bool) -> anyhow::Result<()>;

	fn emit_load_local(&mut self, local: LocalHandle) -> anyhow::Result<()>;

	fn emit_load_parameter(&mut self, parameter: ParamHandle) -> anyhow::Result<()>;

	/// Discard the value on top of the stack.
	fn emit_pop(&mut self) -> anyhow::Result<()>;

	/// Print the value on top of the stack.
	fn emit_print(&mut self) -> anyhow::Result<()>;
}

/// Builds a [`Program`] in memory.
#[derive(Debug, Default)]
pub struct Assembler {
	program: Option<Program>,
	/// Methods being emitted, innermost last.
	open:    Vec<MethodHandle>,
}

impl Assembler {
	pub fn new() -> Self { Self::default() }

	/// Close the entry method and hand out the program.
	pub fn finish(mut self) -> anyhow::Result<Program> {
		while !self.open.is_empty() {
			self.end_method()?;
		}
		self.program.context("No program was started")
	}

	fn program_mut(&mut self) -> anyhow::Result<&mut Program> { self.program.as_mut().context("No program was started") }

	fn current(&self) -> anyhow::Result<MethodHandle> { self.open.last().copied().context("No method is open") }

	fn current_method(&mut self) -> anyhow::Result<&mut Method> {
		let handle = self.current()?;
		self.program_mut()?.methods.get_mut(handle.0).context("Unknown method handle")
	}

	fn emit(&mut self, instruction: Instruction) -> anyhow::Result<()> {
		tracing::trace!(%instruction, "emit");
		self.current_method()?.code.push(instruction);
		Ok(())
	}

	fn emit_jump(&mut self, label: Label, jump: fn(Target) -> Instruction) -> anyhow::Result<()> {
		ensure!(label.method == self.current()?, "Label {label:?} belongs to another method");
		let method = self.current_method()?;
		let state = method.labels.get_mut(label.index).context("Unknown label")?;
		let target = match state.bound {
			Some(offset) => Target::Offset(offset),
			None => {
				state.fixups.push(method.code.len());
				Target::Pending(label.index)
			}
		};
		method.code.push(jump(target));
		Ok(())
	}
}

impl Emitter for Assembler {
	fn begin_program(&mut self, name: &str) -> MethodHandle {
		tracing::debug!(name, "begin program");
		self.program = Some(Program { name: name.to_string(), methods: Vec::new() });
		self.open.clear();
		self.declare_method("main", Type::Void, &[])
	}

	fn declare_method(&mut self, name: &str, return_type: Type, parameter_types: &[Type]) -> MethodHandle {
		let program = self.program.get_or_insert_with(|| Program { name: String::new(), methods: Vec::new() });
		program.methods.push(Method::new(name, return_type, parameter_types));
		let handle = MethodHandle(program.methods.len() - 1);
		self.open.push(handle);
		tracing::debug!(name, %return_type, parameters = parameter_types.len(), "declared method");
		handle
	}

	fn declare_parameter(
		&mut self,
		method: MethodHandle,
		name: &str,
		ordinal: u16,
		ty: Type,
	) -> anyhow::Result<ParamHandle> {
		let target = self.program_mut()?.methods.get_mut(method.0).context("Unknown method handle")?;
		ensure!(ordinal >= 1, "Parameter ordinal 0 is reserved");
		let index = usize::from(ordinal) - 1;
		let declared = target.parameter_types.get(index).copied();
		ensure!(declared == Some(ty), "Parameter {name} #{ordinal} doesn't match method {}", target.name);
		target.parameters[index] = Some(Variable { name: name.to_string(), ty });
		Ok(ParamHandle { method, ordinal })
	}

	fn end_method(&mut self) -> anyhow::Result<()> {
		let method = self.current_method()?;
		if let Some(label) = method.labels.iter().position(|label| label.bound.is_none()) {
			bail!("Label L{label} in method {} was never bound", method.name);
		}
		if method.code.last() != Some(&Instruction::Return) {
			method.code.push(Instruction::Return);
		}
		tracing::debug!(name = %method.name, instructions = method.code.len(), "finished method");
		self.open.pop();
		Ok(())
	}

	fn declare_local(&mut self, name: &str, ty: Type) -> anyhow::Result<LocalHandle> {
		let handle = self.current()?;
		let method = self.current_method()?;
		method.locals.push(Variable { name: name.to_string(), ty });
		Ok(LocalHandle { method: handle, index: method.locals.len() - 1 })
	}

	fn current_method_return_type(&self) -> anyhow::Result<Type> {
		let handle = self.current()?;
		let program = self.program.as_ref().context("No program was started")?;
		program.get(handle).map(|method| method.return_type).context("Unknown method handle")
	}

	fn new_label(&mut self) -> anyhow::Result<Label> {
		let handle = self.current()?;
		let method = self.current_method()?;
		method.labels.push(LabelState::default());
		Ok(Label { method: handle, index: method.labels.len() - 1 })
	}

	fn bind_label(&mut self, label: Label) -> anyhow::Result<()> {
		ensure!(label.method == self.current()?, "Label {label:?} belongs to another method");
		let method = self.current_method()?;
		let offset = method.code.len();
		let state = method.labels.get_mut(label.index).context("Unknown label")?;
		if let Some(previous) = state.bound {
			bail!("Label L{} already bound at {previous:04}", label.index);
		}
		state.bound = Some(offset);
		for fixup in std::mem::take(&mut state.fixups) {
			let target = method.code.get_mut(fixup).and_then(Instruction::target_mut).context("Fixup is not a branch")?;
			*target = Target::Offset(offset);
		}
		tracing::debug!(label = label.index, offset, "bound label");
		Ok(())
	}

	fn emit_branch(&mut self, label: Label) -> anyhow::Result<()> { self.emit_jump(label, Instruction::Branch) }

	fn emit_branch_if_false(&mut self, label: Label) -> anyhow::Result<()> {
		self.emit_jump(label, Instruction::BranchIfFalse)
	}

	fn emit_return(&mut self) -> anyhow::Result<()> { self.emit(Instruction::Return) }

	fn emit_unary_op(&mut self, op: UnaryOp) -> anyhow::Result<()> { self.emit(Instruction::Unary(op)) }

	fn emit_additive_op(&mut self, op: AdditiveOp) -> anyhow::Result<()> { self.emit(Instruction::Additive(op)) }

	fn emit_multiplicative_op(&mut self, op: MultiplicativeOp) -> anyhow::Result<()> {
		self.emit(Instruction::Multiplicative(op))
	}

	fn emit_comparison_op(&mut self, op: ComparisonOp) -> anyhow::Result<()> { self.emit(Instruction::Compare(op)) }

	fn emit_string_concat(&mut self) -> anyhow::Result<()> { self.emit(Instruction::Concat) }

	fn emit_assign_cast(&mut self, target: Type, source: Type) -> anyhow::Result<()> {
		self.emit(Instruction::AssignCast { target, source })
	}

	fn emit_store_local(&mut self, local: LocalHandle) -> anyhow::Result<()> { self.emit(Instruction::StoreLocal(local)) }

	fn emit_load_int(&mut self, value: i32) -> anyhow::Result<()> { self.emit(Instruction::LoadInt(value)) }

	fn emit_load_bool(&mut self, value: bool) -> anyhow::Result<()> { self.emit(Instruction::LoadBool(value)) }

	fn emit_load_local(&mut self, local: LocalHandle) -> anyhow::Result<()> { self.emit(Instruction::LoadLocal(local)) }

	fn emit_load_parameter(&mut self, parameter: ParamHandle) -> anyhow::Result<()> {
		ensure!(parameter.method == self.current()?, "Parameter {parameter:?} belongs to another method");
		self.emit(Instruction::LoadArg(parameter.ordinal))
	}

	fn emit_pop(&mut self) -> anyhow::Result<()> { self.emit(Instruction::Pop) }

	fn emit_print(&mut self) -> anyhow::Result<()> { self.emit(Instruction::Print) }
}
