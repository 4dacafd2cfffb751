use super::*;
use crate::{DiagnosticKind, IdentifierTyping, StopStatements, emitter::{AdditiveOp, Assembler, Instruction, Program, Target, UnaryOp}, error::parser::{DeclarationKind, FatalError, FatalErrorType}, types::Type};

struct Outcome {
	result:      Result<bool, ParserError>,
	diagnostics: Diagnostics,
	program:     Option<Program>,
}

impl Outcome {
	fn errors(&self) -> Vec<ParseErrorType> {
		self.diagnostics
			.iter()
			.filter_map(|diagnostic| match &diagnostic.kind {
				DiagnosticKind::Parse(kind) => Some(kind.clone()),
				_ => None,
			})
			.collect()
	}

	fn program(&self) -> &Program { self.program.as_ref().unwrap() }

	fn main(&self) -> &crate::emitter::Method { self.program().entry().unwrap() }
}

fn run_with(source: &str, options: CompilerOptions) -> Outcome {
	let mut symbols = SymbolTable::new();
	let mut assembler = Assembler::new();
	let mut diagnostics = Diagnostics::new();
	let result = Parser::new(source, &mut symbols, &mut assembler, &mut diagnostics, &options).parse();
	let program = if result.is_ok() { assembler.finish().ok() } else { None };
	Outcome { result, diagnostics, program }
}

fn run(source: &str) -> Outcome { run_with(source, CompilerOptions::default()) }

fn assert_clean(outcome: &Outcome) {
	let errors = outcome.errors();
	assert!(errors.is_empty(), "unexpected errors: {errors:?}");
	assert!(matches!(outcome.result, Ok(true)));
}

#[test]
fn block_with_declaration_and_assignment() {
	let outcome = run("{ int x; x = 1 + 2 ; }");
	assert_clean(&outcome);
	let main = outcome.main();
	assert_eq!(main.locals.len(), 1);
	assert_eq!(main.count(|i| *i == Instruction::Additive(AdditiveOp::Add)), 1);
	assert_eq!(main.count(|i| matches!(i, Instruction::StoreLocal(_))), 1);
	assert_eq!(main.count(|i| matches!(i, Instruction::AssignCast { .. })), 1);
	assert_eq!(main.count(|i| *i == Instruction::Pop), 0);
}

#[test]
fn if_else_binds_every_label() {
	let outcome = run("if (true) { } else { }");
	assert_clean(&outcome);
	let main = outcome.main();
	assert_eq!(main.label_count(), 2);
	assert!(main.label_offsets().all(|offset| offset.is_some()));
	assert_eq!(main.code, vec![
		Instruction::LoadBool(true),
		Instruction::BranchIfFalse(Target::Offset(3)),
		Instruction::Branch(Target::Offset(3)),
		Instruction::Return,
	]);
}

#[test]
fn method_parameters_get_ordinals_from_one() {
	let outcome = run("int f ( int a , bool b ) { return a ; }");
	assert_clean(&outcome);
	let f = outcome.program().method("f").unwrap();
	assert_eq!(f.return_type, Type::Integer);
	assert_eq!(f.parameter_types, vec![Type::Integer, Type::Boolean]);
	let names = f.parameters.iter().map(|p| p.as_ref().map(|p| p.name.as_str())).collect::<Vec<_>>();
	assert_eq!(names, vec![Some("a"), Some("b")]);
	assert_eq!(f.code, vec![Instruction::LoadArg(1), Instruction::Return]);
}

#[test]
fn void_field_is_reported_and_parsing_goes_on() {
	let outcome = run("void v; int x;");
	assert_eq!(outcome.errors(), vec![ParseErrorType::VoidField("v".to_string())]);
	assert!(matches!(outcome.result, Ok(false)));
	let main = outcome.main();
	assert_eq!(main.locals.len(), 1);
	assert_eq!(main.locals[0].name, "x");
}

#[test]
fn break_and_continue_target_the_innermost_loop() {
	let outcome = run("while (true) { while (false) { break; } continue; }");
	assert_clean(&outcome);
	let code = &outcome.main().code;
	assert_eq!(code[1], Instruction::BranchIfFalse(Target::Offset(8)));
	assert_eq!(code[3], Instruction::BranchIfFalse(Target::Offset(6)));
	// break of the inner loop
	assert_eq!(code[4], Instruction::Branch(Target::Offset(6)));
	// back edge of the inner loop
	assert_eq!(code[5], Instruction::Branch(Target::Offset(2)));
	// continue of the outer loop
	assert_eq!(code[6], Instruction::Branch(Target::Offset(0)));
	assert_eq!(code[7], Instruction::Branch(Target::Offset(0)));
	assert_eq!(code[8], Instruction::Return);
}

#[test]
fn break_outside_a_loop_is_fatal() {
	let outcome = run("int x; break;");
	assert!(matches!(
		outcome.result,
		Err(ParserError::FatalError(FatalError { r#type: FatalErrorType::BreakOutsideLoop, line: 1, column: 8 }))
	));

	let outcome = run("continue;");
	assert!(matches!(
		outcome.result,
		Err(ParserError::FatalError(FatalError { r#type: FatalErrorType::ContinueOutsideLoop, .. }))
	));
}

#[test]
fn loops_do_not_reach_into_nested_methods() {
	let outcome = run("while (true) { void g() { break; } }");
	assert!(matches!(
		outcome.result,
		Err(ParserError::FatalError(FatalError { r#type: FatalErrorType::BreakOutsideLoop, .. }))
	));
}

#[test]
fn shadowing_is_fine_but_redeclaration_is_not() {
	assert_clean(&run("int x; void f() { bool x; x = true; }"));

	let outcome = run("int x; bool x;");
	assert_eq!(outcome.errors(), vec![ParseErrorType::Redeclared {
		kind: DeclarationKind::Field,
		name: "x".to_string()
	}]);

	let outcome = run("void f(int a, int a) { }");
	assert_eq!(outcome.errors(), vec![ParseErrorType::Redeclared {
		kind: DeclarationKind::Parameter,
		name: "a".to_string()
	}]);

	let outcome = run("int x; void x() { }");
	assert_eq!(outcome.errors(), vec![ParseErrorType::Redeclared {
		kind: DeclarationKind::Method,
		name: "x".to_string()
	}]);
}

#[test]
fn condition_must_be_bool() {
	let outcome = run("if (1) ; while (2) ;");
	assert_eq!(outcome.errors(), vec![
		ParseErrorType::ConditionNotBoolean(Type::Integer),
		ParseErrorType::ConditionNotBoolean(Type::Integer),
	]);
	assert!(outcome.main().label_offsets().all(|offset| offset.is_some()));
}

#[test]
fn a_bad_condition_skips_the_rest_of_its_statement() {
	let outcome = run("int x; if (1) x = true; int y;");
	assert_eq!(outcome.errors(), vec![ParseErrorType::ConditionNotBoolean(Type::Integer)]);
	let main = outcome.main();
	let names = main.locals.iter().map(|local| local.name.as_str()).collect::<Vec<_>>();
	assert_eq!(names, vec!["x", "y"]);
	// `x = true;` was discarded, not checked or emitted.
	assert_eq!(main.count(|i| matches!(i, Instruction::StoreLocal(_))), 0);
	assert!(main.label_offsets().all(|offset| offset.is_some()));
}

#[test]
fn assignment_is_type_checked() {
	let outcome = run("int x; x = true;");
	assert_eq!(outcome.errors(), vec![ParseErrorType::IncompatibleAssignment {
		target: Type::Integer,
		value:  Type::Boolean,
	}]);

	assert_clean(&run("ref r; r = 3; r = false;"));
}

#[test]
fn undeclared_names_are_reported_once() {
	let outcome = run("int x; y = 1 + y; x = z;");
	assert_eq!(outcome.errors(), vec![
		ParseErrorType::Undeclared("y".to_string()),
		ParseErrorType::Undeclared("z".to_string()),
	]);
}

#[test]
fn methods_are_not_values() {
	let outcome = run("void f() { } int x; x = f;");
	assert_eq!(outcome.errors(), vec![ParseErrorType::NotAValue("f".to_string())]);

	let outcome = run("void f() { } f = 1;");
	assert_eq!(outcome.errors(), vec![ParseErrorType::NotAssignable("f".to_string())]);
}

#[test]
fn program_locals_are_visible_in_methods_but_method_locals_are_not() {
	assert_clean(&run("int x; void f() { x = 1; }"));

	let outcome = run("void f() { int y; void g() { y = 1; } }");
	assert_eq!(outcome.errors(), vec![ParseErrorType::CapturedVariable("y".to_string())]);

	let outcome = run("void f(int a) { void g() { printf(a); } }");
	assert_eq!(outcome.errors(), vec![ParseErrorType::CapturedVariable("a".to_string())]);
}

#[test]
fn operators_follow_their_type_rules() {
	let outcome = run("int x; x = -1 * 2 + 3 % 2 - 4 / 2;");
	assert_clean(&outcome);
	assert_eq!(outcome.main().count(|i| *i == Instruction::Unary(UnaryOp::Negate)), 1);

	let outcome = run("bool b; b = true + 1;");
	assert_eq!(outcome.errors(), vec![ParseErrorType::IncompatibleOperands {
		operator: crate::scanner::Symbol::Plus,
		left:     Type::Boolean,
		right:    Type::Integer,
	}]);

	let outcome = run("bool b; b = 1 == true;");
	assert_eq!(outcome.errors(), vec![ParseErrorType::IncompatibleComparison {
		left:  Type::Integer,
		right: Type::Boolean,
	}]);

	assert_clean(&run("bool b; b = true && false || true == false;"));
}

#[test]
fn an_assignment_ends_its_expression() {
	let outcome = run("int x; x = 1; -x;");
	assert_clean(&outcome);
	let main = outcome.main();
	assert_eq!(main.count(|i| *i == Instruction::Unary(UnaryOp::Negate)), 1);
	assert_eq!(main.count(|i| *i == Instruction::Additive(AdditiveOp::Subtract)), 0);

	assert_clean(&run("int x; bool b; if (b) x = 1; -x;"));
	assert_clean(&run("int x; x = 2; +x * 3;"));
}

#[test]
fn void_parameters_are_rejected() {
	let outcome = run("void f(void a) { }");
	assert_eq!(outcome.errors(), vec![ParseErrorType::VoidParameter("a".to_string())]);
}

#[test]
fn strings_concatenate() {
	let outcome = run("string f(string a, string b) { return a + b; }");
	assert_clean(&outcome);
	assert_eq!(outcome.program().method("f").unwrap().count(|i| *i == Instruction::Concat), 1);
}

#[test]
fn expression_statements_discard_their_value() {
	let outcome = run("int x; x + 1;");
	assert_clean(&outcome);
	assert_eq!(outcome.main().code[3], Instruction::Pop);
}

#[test]
fn return_value_must_fit_the_method() {
	let outcome = run("int f() { return true; }");
	assert_eq!(outcome.errors(), vec![ParseErrorType::IncompatibleReturn {
		expected: Type::Integer,
		found:    Type::Boolean,
	}]);

	assert_clean(&run("void g() { return; }"));
}

#[test]
fn syntax_errors_skip_to_the_next_semicolon() {
	let outcome = run("int x = 5; int y;");
	assert_eq!(outcome.errors(), vec![ParseErrorType::ExpectedSymbol(crate::scanner::Symbol::Semicolon)]);
	assert_eq!(outcome.main().locals.len(), 2);

	// The missing `;` at the end is a follow-on error.
	let outcome = run("int x; x = ) )");
	assert_eq!(outcome.errors(), vec![ParseErrorType::ExpectedExpression]);
}

#[test]
fn errors_after_a_recovered_statement_are_reported() {
	let outcome = run("int a = 1; int b = 2; int c;");
	assert_eq!(outcome.errors(), vec![
		ParseErrorType::ExpectedSymbol(crate::scanner::Symbol::Semicolon),
		ParseErrorType::ExpectedSymbol(crate::scanner::Symbol::Semicolon),
	]);
	assert_eq!(outcome.main().locals.len(), 3);

	let outcome = run("int a = 1; ) int b;");
	assert!(matches!(outcome.errors().as_slice(), [
		ParseErrorType::ExpectedSymbol(crate::scanner::Symbol::Semicolon),
		ParseErrorType::UnexpectedToken(_)
	]));

	let outcome = run("{ int a = 1; a = true; }");
	assert_eq!(outcome.errors(), vec![
		ParseErrorType::ExpectedSymbol(crate::scanner::Symbol::Semicolon),
		ParseErrorType::IncompatibleAssignment { target: Type::Integer, value: Type::Boolean },
	]);
}

#[test]
fn stop_statements_can_be_disabled() {
	let options = CompilerOptions { stop_statements: StopStatements::Disabled, ..Default::default() };
	let outcome = run_with("return;", options);
	assert!(matches!(outcome.errors().as_slice(), [ParseErrorType::UnexpectedToken(_)]));
}

#[test]
fn legacy_identifier_typing() {
	let legacy = || CompilerOptions { identifier_typing: IdentifierTyping::Legacy, ..Default::default() };

	assert_clean(&run_with("int x; bool b; b = x;", legacy()));
	assert_eq!(run("int x; bool b; b = x;").errors().len(), 1);

	// Outside the declaring scope the reference has no type at all.
	assert_clean(&run_with("int x; void f() { int y; y = x; }", legacy()));
}

#[test]
fn bug_statement_warns() {
	let outcome = run("int x;\n  bug x = 1; ;");
	assert_clean(&outcome);
	assert_eq!(outcome.diagnostics.warning_count(), 1);
	let warning = outcome.diagnostics.iter().next().unwrap();
	assert_eq!((warning.line, warning.column), (2, 3));
}

#[test]
fn printf_prints_variables() {
	let outcome = run("int x; printf(x); printf();");
	assert_clean(&outcome);
	assert_eq!(outcome.main().count(|i| matches!(i, Instruction::LoadLocal(_))), 1);
	assert_eq!(outcome.main().count(|i| *i == Instruction::Print), 1);

	let outcome = run("printf(y);");
	assert_eq!(outcome.errors(), vec![ParseErrorType::Undeclared("y".to_string())]);
}

#[test]
fn unexpected_tokens_are_reported() {
	let outcome = run("} int x;");
	assert!(matches!(outcome.errors().as_slice(), [ParseErrorType::UnexpectedToken(_)]));
	assert_eq!(outcome.main().locals.len(), 0);
}
