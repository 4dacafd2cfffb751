use std::process::ExitCode;

use bugc::{Compiler, Diagnostics, cli::*};
use palc::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();

	let cli = Cli::parse();
	let compiler = Compiler::new(cli.mode.options());
	let path = cli.mode.path();

	let compilation = match compiler.compile_file(path) {
		Ok(compilation) => compilation,
		Err(e) => {
			if let Some(diagnostics) = e.diagnostics() {
				report(diagnostics);
			}
			eprintln!("Failed compile {}: {e}", path.display());
			return ExitCode::FAILURE;
		}
	};
	report(&compilation.diagnostics);

	match cli.mode {
		Mode::Build { output: Some(output), .. } => {
			if let Err(e) = std::fs::write(&output, compilation.program.to_string()) {
				eprintln!("Failed write {}: {e}", output.display());
				return ExitCode::FAILURE;
			}
		}
		Mode::Build { output: None, .. } => print!("{}", compilation.program),
		Mode::Check { .. } => {}
	}
	ExitCode::SUCCESS
}

fn report(diagnostics: &Diagnostics) {
	for diagnostic in diagnostics.iter() {
		eprintln!("{diagnostic}");
	}
}
