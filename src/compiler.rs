use std::{fs::read_to_string, path::Path};

use anyhow::Context;

use crate::{CompileError, CompilerOptions, Diagnostics, emitter::{Assembler, Program}, error::parser::ParserError, parser::Parser, symbols::SymbolTable};

/// A successful compilation. Warnings may still have been reported.
#[derive(Debug)]
pub struct Compilation {
	pub program:     Program,
	pub diagnostics: Diagnostics,
}

/// Compiler drives one parse over a source text with fresh state each time.
#[derive(Debug, Default)]
pub struct Compiler {
	options: CompilerOptions,
}

impl Compiler {
	pub fn new(options: CompilerOptions) -> Self { Self { options } }

	/// Read and compile the file at `path`.
	pub fn compile_file<P: AsRef<Path>>(&self, path: P) -> Result<Compilation, CompileError> {
		let path = path.as_ref();
		let source = read_to_string(path).with_context(|| format!("Failed open source file {}", path.display()))?;
		self.compile(&source)
	}

	/// Compile `source` into a program. Any reported error fails the
	/// compilation; the diagnostics travel with the error.
	pub fn compile(&self, source: &str) -> Result<Compilation, CompileError> {
		let mut symbols = SymbolTable::new();
		let mut assembler = Assembler::new();
		let mut diagnostics = Diagnostics::new();

		let outcome = Parser::new(source, &mut symbols, &mut assembler, &mut diagnostics, &self.options).parse();
		let succeeded = match outcome {
			Ok(succeeded) => succeeded,
			Err(ParserError::InternalError(error)) => return Err(CompileError::InternalError(error)),
			Err(ParserError::FatalError(error)) => {
				tracing::warn!(%error, "compilation aborted");
				return Err(CompileError::Aborted { error, diagnostics });
			}
		};

		tracing::info!(
			program = %self.options.program_name,
			errors = diagnostics.error_count(),
			warnings = diagnostics.warning_count(),
			"parsed"
		);
		if !succeeded || diagnostics.error_count() > 0 {
			return Err(CompileError::CompilationFailed { diagnostics });
		}

		let program = assembler.finish()?;
		Ok(Compilation { program, diagnostics })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{FatalErrorType, StopStatements};

	#[test]
	fn compiles_to_a_program() {
		let compilation = Compiler::default().compile("int x; x = 3;").unwrap();
		assert_eq!(compilation.program.name, "MyProgram");
		assert_eq!(compilation.program.methods.len(), 1);
		assert_eq!(compilation.diagnostics.error_count(), 0);
	}

	#[test]
	fn program_name_comes_from_options() {
		let compiler = Compiler::new(CompilerOptions { program_name: "Demo".to_string(), ..Default::default() });
		assert_eq!(compiler.compile("").unwrap().program.name, "Demo");
	}

	#[test]
	fn errors_fail_the_compilation() {
		let error = Compiler::default().compile("int x; x = true;").unwrap_err();
		assert!(matches!(error, CompileError::CompilationFailed { .. }));
		assert_eq!(error.diagnostics().unwrap().error_count(), 1);
		assert_eq!(error.to_string(), "Compilation failed with 1 errors and 0 warnings");
	}

	#[test]
	fn fatal_errors_abort() {
		let error = Compiler::default().compile("bool b; b = 1 < 2; break;").unwrap_err();
		let CompileError::Aborted { error, .. } = error else {
			panic!("expected an abort, got {error:?}");
		};
		assert_eq!(error.r#type, FatalErrorType::BreakOutsideLoop);
		assert_eq!((error.line, error.column), (1, 20));
	}

	#[test]
	fn stop_statements_can_be_disabled() {
		let compiler =
			Compiler::new(CompilerOptions { stop_statements: StopStatements::Disabled, ..Default::default() });
		let error = compiler.compile("while (true) { break; }").unwrap_err();
		assert!(error.diagnostics().unwrap().error_count() >= 1);
	}

	#[test]
	fn missing_file_is_an_internal_error() {
		let error = Compiler::default().compile_file("does/not/exist.bug").unwrap_err();
		assert!(matches!(error, CompileError::InternalError(_)));
	}
}
