/// Settings for one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
	/// Name of the generated program container.
	pub program_name:      String,
	pub stop_statements:   StopStatements,
	pub identifier_typing: IdentifierTyping,
}

impl Default for CompilerOptions {
	fn default() -> Self {
		Self {
			program_name:      "MyProgram".to_string(),
			stop_statements:   StopStatements::Enabled,
			identifier_typing: IdentifierTyping::Declared,
		}
	}
}

/// Whether `return`, `break` and `continue` can start a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopStatements {
	#[default]
	Enabled,
	/// The keywords are not statements and are reported as unexpected.
	Disabled,
}

/// Type given to a bare variable reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierTyping {
	/// The variable's declared type.
	#[default]
	Declared,
	/// `bool` when the name is declared in the current scope, no type
	/// otherwise. Parameters keep their declared type.
	Legacy,
}
