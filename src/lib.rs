//! # Single-pass compiler
//!
//! Parsing, analysis and code generation are interleaved without ever
//! allocating a syntax tree or an IR. There is no intermediate data structure
//! holding global information about the program, and no previously parsed
//! part of the code is revisited.
//!
//! User's source code: `int x; x = 1 + 2;`

//! ## Scanning
//!
//! The [`scanner`] turns characters into tokens on demand. Whitespace and
//! comments are ignored, so the tokens are
//! `["int", "x", ";", "x", "=", "1", "+", "2", ";"]`.

//! ## Parsing, checking and emitting
//!
//! The parser recognizes one production at a time with a single token of
//! lookahead. While it does so it resolves names through a scoped symbol
//! table, checks and infers [`types`], and drives the [`emitter`]. For the
//! source above that gives
//!
//! ``` text
//! .method void main()
//! {
//!   .locals (int x)
//!   0000: ldc.i4 1
//!   0001: ldc.i4 2
//!   0002: add
//!   0003: conv int -> int
//!   0004: stloc 0:0
//!   0005: ret
//! }
//! ```
//!
//! Control flow uses labels: forward branches are emitted against a label
//! that is bound to an offset later, when the target is reached.

//! ## Errors
//!
//! Errors are collected in [`Diagnostics`] and parsing carries on after
//! skipping to the next `;`. A compilation with any error yields no program.

pub mod cli;
mod compiler;
mod diagnostics;
pub mod emitter;
mod error;
mod options;
mod parser;
pub mod scanner;
mod symbols;
pub mod types;

pub use compiler::{Compilation, Compiler};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::{CompileError, parser::{DeclarationKind, FatalError, FatalErrorType, ParseErrorType, WarningType}, scanner::{ScanError, ScanErrorType}};
pub use options::{CompilerOptions, IdentifierTyping, StopStatements};
