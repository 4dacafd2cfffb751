//! Collects errors and warnings with their source position.

use std::fmt::Display;

use crate::{ScanError, ScanErrorType, error::parser::{ParseErrorType, WarningType}};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
	Error,
	Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
	Scan(ScanErrorType),
	Parse(ParseErrorType),
	Warning(WarningType),
}

impl Display for DiagnosticKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			DiagnosticKind::Scan(kind) => write!(f, "{kind}"),
			DiagnosticKind::Parse(kind) => write!(f, "{kind}"),
			DiagnosticKind::Warning(kind) => write!(f, "{kind}"),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
	pub severity: Severity,
	pub line:     usize,
	pub column:   usize,
	pub kind:     DiagnosticKind,
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let severity = match self.severity {
			Severity::Error => "error",
			Severity::Warning => "warning",
		};
		write!(f, "{severity} at line {}, column {}: {}", self.line, self.column, self.kind)
	}
}

#[derive(Debug, Default)]
pub struct Diagnostics {
	entries:     Vec<Diagnostic>,
	error_count: usize,
}

impl Diagnostics {
	pub fn new() -> Self { Self::default() }

	pub fn error(&mut self, line: usize, column: usize, kind: ParseErrorType) {
		self.push(Severity::Error, line, column, DiagnosticKind::Parse(kind));
	}

	pub fn scan_error(&mut self, error: ScanError) {
		self.push(Severity::Error, error.line, error.column, DiagnosticKind::Scan(error.r#type));
	}

	pub fn warning(&mut self, line: usize, column: usize, kind: WarningType) {
		self.push(Severity::Warning, line, column, DiagnosticKind::Warning(kind));
	}

	pub fn error_count(&self) -> usize { self.error_count }

	pub fn warning_count(&self) -> usize { self.entries.len() - self.error_count }

	pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> { self.entries.iter() }

	pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
		self.entries.iter().filter(|diagnostic| diagnostic.severity == Severity::Error)
	}

	fn push(&mut self, severity: Severity, line: usize, column: usize, kind: DiagnosticKind) {
		let diagnostic = Diagnostic { severity, line, column, kind };
		tracing::debug!(%diagnostic, "reported");
		if severity == Severity::Error {
			self.error_count += 1;
		}
		self.entries.push(diagnostic);
	}
}
