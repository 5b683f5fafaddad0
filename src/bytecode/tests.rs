//! End-to-end tests: source text through compiler, codec and machine.

use pretty_assertions::assert_eq;

use crate::bytecode::word::{Word, MAX_WORD, MIN_WORD};
use crate::bytecode::{Machine, MAIN_STACK_SIZE};
use crate::error::{CompileError, RuntimeError, StackVmError};
use crate::{compile, deserialize, run, run_source, serialize};

fn eval(source: &str) -> Word {
    run_source(source).unwrap()
}

#[test]
fn test_literals_evaluate_to_themselves() {
    for n in [0i64, 1, 7, 255, 1000, 0x7000, MAX_WORD as i64] {
        assert_eq!(eval(&format!("{} HALT", n)) as i64, n);
    }
}

#[test]
fn test_hex_literal() {
    assert_eq!(eval("0x2A"), 42);
}

#[test]
fn test_addition() {
    assert_eq!(eval("2 3 +"), 5);
}

#[test]
fn test_subtraction_is_first_minus_second() {
    assert_eq!(eval("5 2 -"), 3);
    assert_eq!(eval("2 5 -"), -3);
}

#[test]
fn test_equality_is_zero_difference() {
    assert_eq!(eval("7 7 ="), 0);
    assert_ne!(eval("7 8 ="), 0);
}

#[test]
fn test_mnemonics_ignore_case() {
    assert_eq!(eval("1 2 + halt"), 3);
}

#[test]
fn test_wraparound_through_source() {
    assert_eq!(eval(&format!("{} 1 +", MAX_WORD)), MIN_WORD);
    assert_eq!(eval(&format!("{} 1 + 1 -", MAX_WORD)), MAX_WORD);
}

#[test]
fn test_string_pops_in_order() {
    let code = compile("\"hi\"").unwrap();
    let machine = Machine::new(code).run().unwrap();
    let (first, machine) = machine.pop().unwrap();
    let (second, _) = machine.pop().unwrap();
    assert_eq!((first, second), ('h' as Word, 'i' as Word));
}

#[test]
fn test_label_round_trip() {
    let code = compile(":start 0 @start JZ HALT").unwrap();
    assert_eq!(code[3], 0);

    // A zero test value jumps back to :start forever; step a few laps.
    let mut machine = Machine::new(code);
    for _ in 0..30 {
        machine = machine.step().unwrap();
    }
    assert_eq!(machine.ip(), 0);
    assert!(machine.stack().is_empty());
}

#[test]
fn test_conditional_branch_taken() {
    // 3 - 3 == 0, so jump over the 100.
    assert_eq!(eval("3 3 = @skip JZ 100 HALT :skip 200"), 200);
}

#[test]
fn test_conditional_branch_not_taken() {
    assert_eq!(eval("3 4 = @skip JZ 100 HALT :skip 200"), 100);
}

#[test]
fn test_missing_label_is_compile_error() {
    match compile("@missing HALT") {
        Err(CompileError::UnresolvedLabel { name, .. }) => assert_eq!(name, "missing"),
        other => panic!("Expected unresolved label, got {:?}", other),
    }
}

#[test]
fn test_label_beyond_word_range_is_compile_error() {
    let source = format!("0 @end JZ {}:end 9", "1 ".repeat(16000));
    match compile(&source) {
        Err(CompileError::LabelOutOfRange { name, position, .. }) => {
            assert_eq!(name, "end");
            assert!(position > MAX_WORD as usize);
        }
        other => panic!("Expected label out of range, got {:?}", other),
    }
}

#[test]
fn test_bare_add_underflows() {
    let err = run_source("+").unwrap_err();
    assert!(matches!(
        err,
        StackVmError::Runtime(RuntimeError::StackUnderflow { .. })
    ));
}

#[test]
fn test_empty_program_has_no_result() {
    let err = run(&compile("").unwrap()).unwrap_err();
    assert!(matches!(err, RuntimeError::StackUnderflow { .. }));
}

#[test]
fn test_overflow_on_exactly_one_past_capacity() {
    let fits = "1 ".repeat(MAIN_STACK_SIZE);
    assert_eq!(eval(&fits), 1);

    let too_many = "1 ".repeat(MAIN_STACK_SIZE + 1);
    let err = run_source(&too_many).unwrap_err();
    match err {
        StackVmError::Runtime(RuntimeError::StackOverflow { snapshot }) => {
            assert_eq!(snapshot.main_stack.len(), MAIN_STACK_SIZE);
            // Failed while executing the last PUSH.
            assert_eq!(snapshot.ip as usize, MAIN_STACK_SIZE * 2 + 2);
        }
        other => panic!("Expected overflow, got {:?}", other),
    }
}

#[test]
fn test_serialize_round_trip_runs_identically() {
    for source in [
        "2 3 +",
        "5 2 -",
        "\"abc\"",
        "3 3 = @skip JZ 100 HALT :skip 200",
        "0x799F 1 +",
    ] {
        let code = compile(source).unwrap();
        let restored = deserialize(&serialize(&code)).unwrap();
        assert_eq!(restored, code);
        assert_eq!(run(&restored), run(&code));
    }
}

#[test]
fn test_serialized_size_is_two_bytes_per_word() {
    let code = compile("1 2 +").unwrap();
    assert_eq!(serialize(&code).len(), code.len() * 2);
}
