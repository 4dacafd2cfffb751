use std::path::{Path, PathBuf};

use palc::{Parser, Subcommand};

use crate::{CompilerOptions, IdentifierTyping, StopStatements};

#[derive(Parser)]
#[command(name = "bugc", after_long_help = "Single-pass compiler for the bug language.")]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Compile a file and print or write the listing
	Build {
		path:               PathBuf,
		/// Write the listing here instead of stdout
		#[arg(long, short)]
		output:             Option<PathBuf>,
		/// Name of the generated program
		#[arg(long)]
		name:               Option<String>,
		/// Don't accept return, break and continue as statements
		#[arg(long)]
		no_stop_statements: bool,
		/// Type bare variable references the legacy way
		#[arg(long)]
		legacy_identifiers: bool,
	},
	/// Only report diagnostics
	Check {
		path:               PathBuf,
		/// Don't accept return, break and continue as statements
		#[arg(long)]
		no_stop_statements: bool,
		/// Type bare variable references the legacy way
		#[arg(long)]
		legacy_identifiers: bool,
	},
}

impl Mode {
	pub fn path(&self) -> &Path {
		match self {
			Mode::Build { path, .. } | Mode::Check { path, .. } => path,
		}
	}

	pub fn options(&self) -> CompilerOptions {
		let (name, no_stop_statements, legacy_identifiers) = match self {
			Mode::Build { name, no_stop_statements, legacy_identifiers, .. } => {
				(name.as_deref(), *no_stop_statements, *legacy_identifiers)
			}
			Mode::Check { no_stop_statements, legacy_identifiers, .. } => (None, *no_stop_statements, *legacy_identifiers),
		};

		let mut options = CompilerOptions::default();
		if let Some(name) = name {
			options.program_name = name.to_string();
		}
		if no_stop_statements {
			options.stop_statements = StopStatements::Disabled;
		}
		if legacy_identifiers {
			options.identifier_typing = IdentifierTyping::Legacy;
		}
		options
	}
}
