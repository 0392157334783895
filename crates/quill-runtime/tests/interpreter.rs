//! Interpreter integration tests
//!
//! End-to-end runs over whole programs: declarations, arithmetic, arrays,
//! control flow, methods, and error propagation.

mod common;

use common::{assert_error_code, run, run_log, run_with_canvas};
use quill_runtime::{AliasTable, Error, Quill, RecordingCanvas, RuntimeError};
use rstest::rstest;

// ============================================================================
// Expressions and write
// ============================================================================

#[rstest]
#[case("write 7 / 2", "3")]
#[case("write 7.0 / 2", "3.5")]
#[case("write 2 * 3.0", "6")]
#[case("write 10 - 4 - 3", "3")]
#[case("write (1 + 2) * 3", "9")]
#[case("write -5 + 2", "-3")]
#[case("write 2.0 == 2", "True")]
#[case("write 2 < 2.5", "True")]
#[case("write true && false", "False")]
#[case("write !false", "True")]
#[case(r#"write "total: " + 42"#, "total: 42")]
fn test_write_expression(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(run_log(source), vec![expected.to_string()]);
}

#[test]
fn test_write_goes_to_canvas_too() {
    let (result, canvas) = run_with_canvas("write 2 + 3");
    assert!(result.is_ok());
    assert_eq!(
        canvas.ops(),
        &[quill_runtime::CanvasOp::Text("5".to_string())]
    );
}

#[test]
fn test_unicode_dashes_are_minus_signs() {
    // U+2212 minus and U+2013 en dash both normalize to '-'
    assert_eq!(run_log("write 5 \u{2212} 2"), vec!["3".to_string()]);
    assert_eq!(run_log("write 5 \u{2013} 2"), vec!["3".to_string()]);
}

#[test]
fn test_bare_equals_in_condition_is_equality() {
    let log = run_log("int x = 3\nif x = 3\nwrite 1\nend if");
    assert_eq!(log, vec!["1".to_string()]);
}

// ============================================================================
// Variables
// ============================================================================

#[test]
fn test_declaration_starts_at_zero_value() {
    assert_eq!(run_log("int x\nwrite x"), vec!["0".to_string()]);
    assert_eq!(run_log("real r\nwrite r"), vec!["0".to_string()]);
    assert_eq!(run_log("boolean b\nwrite b"), vec!["False".to_string()]);
}

#[test]
fn test_assignment_stores_the_value_unchanged() {
    // The declared kind does not coerce assigned values; the slot simply
    // holds whatever the right-hand side evaluated to
    assert_eq!(run_log("int x\nx = 2.5\nwrite x"), vec!["2.5".to_string()]);
    assert_eq!(run_log("real r\nr = 7\nwrite r"), vec!["7".to_string()]);
}

#[test]
fn test_names_are_case_insensitive() {
    let log = run_log("int Count = 5\nCOUNT = count + 1\nwrite CoUnT");
    assert_eq!(log, vec!["6".to_string()]);
}

#[test]
fn test_assignment_creates_undeclared_variable() {
    assert_eq!(run_log("x = 1\nwrite x"), vec!["1".to_string()]);
}

#[test]
fn test_runtime_error_reports_line() {
    let err = run("int x = 1\nint y = 2\nwrite x / 0").unwrap_err();
    assert_eq!(err.line(), 3);
    assert!(matches!(
        err,
        Error::Runtime {
            source: RuntimeError::DivideByZero,
            ..
        }
    ));
}

// ============================================================================
// Arrays
// ============================================================================

#[test]
fn test_poke_then_peek() {
    let log = run_log("array int nums 10\npoke nums 5 = 99\nint x\npeek x = nums 5\nwrite x");
    assert_eq!(log, vec!["99".to_string()]);
}

#[test]
fn test_unpoked_slots_hold_zero() {
    let log = run_log("array real prices 3\nreal p\npeek p = prices 2\nwrite p");
    assert_eq!(log, vec!["0".to_string()]);
}

#[rstest]
#[case("array int nums 3\npoke nums 5 = 1")]
#[case("array int nums 3\npoke nums -1 = 1")]
#[case("array int nums 3\nint x\npeek x = nums 3")]
fn test_out_of_bounds_is_fatal(#[case] source: &str) {
    assert_error_code(source, "QL0004");
}

#[test]
fn test_array_index_may_be_expression() {
    let log = run_log("array int nums 10\nint i = 4\npoke nums i + 1 = 7\nint x\npeek x = nums 5\nwrite x");
    assert_eq!(log, vec!["7".to_string()]);
}

#[test]
fn test_negative_array_length_is_fatal() {
    assert_error_code("array int nums 0 - 2", "QL0009");
}

#[test]
fn test_poke_non_array_fails() {
    assert_error_code("int x = 1\npoke x 0 = 5", "QL0006");
}

// ============================================================================
// Control flow
// ============================================================================

#[test]
fn test_if_else_takes_one_branch() {
    let source = "int x = 1\nif x > 5\nwrite \"big\"\nelse\nwrite \"small\"\nend if";
    assert_eq!(run_log(source), vec!["small".to_string()]);
}

#[test]
fn test_if_without_else_skips_block() {
    let log = run_log("if false\nwrite 1\nend if\nwrite 2");
    assert_eq!(log, vec!["2".to_string()]);
}

#[test]
fn test_while_loop_counts() {
    let source = "int n = 0\nwhile n < 3\nn = n + 1\nwrite n\nend while";
    assert_eq!(run_log(source), vec!["1", "2", "3"]);
}

#[test]
fn test_for_loop_sums_with_step() {
    let source = "int sum = 0\nfor i = 10 to 30 step 10\nsum = sum + i\nend for\nwrite sum";
    assert_eq!(run_log(source), vec!["60".to_string()]);
}

#[test]
fn test_for_loop_sums_array_values() {
    let source = "\
array int nums 3
poke nums 0 = 10
poke nums 1 = 20
poke nums 2 = 30
int sum = 0
int v
for i = 0 to 2 step 1
peek v = nums i
sum = sum + v
end for
write sum";
    assert_eq!(run_log(source), vec!["60".to_string()]);
}

#[test]
fn test_for_loop_counts_down() {
    let source = "for i = 3 to 1 step -1\nwrite i\nend for";
    assert_eq!(run_log(source), vec!["3", "2", "1"]);
}

#[test]
fn test_for_bounds_evaluate_once() {
    // Mutating the variable behind the end bound does not extend the loop
    let source = "int stop = 3\nint hits = 0\nfor i = 1 to stop step 1\nstop = 100\nhits = hits + 1\nend for\nwrite hits";
    assert_eq!(run_log(source), vec!["3".to_string()]);
}

#[test]
fn test_for_counter_survives_the_loop() {
    // The variable keeps the last in-range value, not the overshoot
    let source = "for i = 1 to 3 step 1\nend for\nwrite i";
    assert_eq!(run_log(source), vec!["3".to_string()]);
}

#[test]
fn test_for_trip_count_ignores_counter_mutation() {
    // A hidden counter drives the loop, so writing to the loop variable
    // inside the body does not change how many times it runs
    let source = "int hits = 0\nfor i = 1 to 3 step 1\ni = 100\nhits = hits + 1\nend for\nwrite hits";
    assert_eq!(run_log(source), vec!["3".to_string()]);
}

#[test]
fn test_for_zero_step_is_fatal() {
    assert_error_code("for i = 1 to 10 step 0\nend for", "QL0008");
}

#[test]
fn test_compact_terminators_accepted() {
    let source = "int n = 0\nwhile n < 2\nn = n + 1\nendwhile\nif true\nwrite n\nendif";
    assert_eq!(run_log(source), vec!["2".to_string()]);
}

#[test]
fn test_nested_blocks() {
    let source = "int total = 0\nfor i = 1 to 3 step 1\nif i != 2\ntotal = total + i\nend if\nend for\nwrite total";
    assert_eq!(run_log(source), vec!["4".to_string()]);
}

// ============================================================================
// Methods
// ============================================================================

#[test]
fn test_method_result_lands_under_its_name() {
    let source = "\
method int add int one, int two
add = one + two
end method
call add 3 4
write add
call add 40 2
write add";
    assert_eq!(run_log(source), vec!["7", "42"]);
}

#[test]
fn test_method_result_defaults_to_zero_value() {
    let source = "method int nothing\nend method\ncall nothing\nwrite nothing";
    assert_eq!(run_log(source), vec!["0".to_string()]);
}

#[test]
fn test_method_arguments_coerce_to_parameter_kinds() {
    let source = "\
method int half int n
half = n / 2
end method
call half 7.9
write half";
    // 7.9 rounds to 8 on the way into the int parameter
    assert_eq!(run_log(source), vec!["4".to_string()]);
}

#[test]
fn test_method_locals_do_not_leak() {
    let source = "\
method int vault
int secret = 9
vault = 1
end method
call vault
write secret";
    assert_error_code(source, "QL0001");
}

#[test]
fn test_method_reads_caller_globals() {
    let source = "\
int base = 10
method int bump
bump = base + 1
end method
call bump
write bump";
    assert_eq!(run_log(source), vec!["11".to_string()]);
}

#[test]
fn test_recursive_method() {
    let source = "\
method int fact int n
if n <= 1
fact = 1
else
call fact n-1
fact = n * fact
end if
end method
call fact 5
write fact";
    assert_eq!(run_log(source), vec!["120".to_string()]);
}

#[test]
fn test_call_args_split_on_comma_when_present() {
    let source = "\
method int add int one, int two
add = one + two
end method
call add 10, 2 + 3
write add";
    assert_eq!(run_log(source), vec!["15".to_string()]);
}

#[test]
fn test_wrong_arity_is_fatal() {
    let source = "method int add int one, int two\nadd = one + two\nend method\ncall add 1";
    assert_error_code(source, "QL0003");
}

#[test]
fn test_unknown_method_is_fatal() {
    assert_error_code("call missing 1 2", "QL0002");
}

#[test]
fn test_method_alias_resolves_call() {
    let mut aliases = AliasTable::new();
    aliases.add_method_alias("mullMethod", "mulMethod");
    let mut quill = Quill::with_aliases(RecordingCanvas::new(), aliases);
    let source = "\
method int mulMethod int a, int b
mulMethod = a * b
end method
call mullMethod 6, 7
write mulMethod";
    let outcome = quill.execute(source).unwrap();
    assert_eq!(outcome.log, vec!["42".to_string()]);
}

// ============================================================================
// Failure semantics
// ============================================================================

#[test]
fn test_parse_error_executes_nothing() {
    let (result, canvas) = run_with_canvas("write 1\nwhile true\nwrite 2");
    let err = result.unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert_eq!(err.to_diagnostic().code, "QL1011");
    // The parse failed, so not even the first line ran
    assert!(canvas.ops().is_empty());
}

#[test]
fn test_runtime_error_keeps_prior_effects() {
    let (result, canvas) = run_with_canvas("moveto 1 2\nwrite 1 / 0");
    assert!(result.is_err());
    assert_eq!(
        canvas.ops(),
        &[quill_runtime::CanvasOp::MoveTo { x: 1, y: 2 }]
    );
}

#[test]
fn test_statements_executed_counts_top_level() {
    let outcome = run("int x = 1\nfor i = 1 to 3 step 1\nx = x + 1\nend for\nwrite x").unwrap();
    // declaration, loop, write: the loop body does not add to the count
    assert_eq!(outcome.statements_executed, 3);
}
