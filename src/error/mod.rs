pub mod parser;
pub mod scanner;

use parser::FatalError;

use crate::Diagnostics;

/// CompileError is the top-level error type for the compiler.
#[derive(thiserror::Error, Debug)]
pub enum CompileError {
	/// Internal compiler error or failed I/O
	#[error("CompilerInternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// Parsing stopped at an unrecoverable error
	#[error("Compilation aborted at {error}")]
	Aborted { error: FatalError, diagnostics: Diagnostics },
	/// Parsing finished but reported errors
	#[error(
		"Compilation failed with {} errors and {} warnings",
		.diagnostics.error_count(),
		.diagnostics.warning_count()
	)]
	CompilationFailed { diagnostics: Diagnostics },
}

impl CompileError {
	/// Diagnostics collected before the compilation gave up.
	pub fn diagnostics(&self) -> Option<&Diagnostics> {
		match self {
			CompileError::InternalError(_) => None,
			CompileError::Aborted { diagnostics, .. } | CompileError::CompilationFailed { diagnostics } => Some(diagnostics),
		}
	}
}
