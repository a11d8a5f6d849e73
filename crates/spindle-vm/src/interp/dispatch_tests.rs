//! End-to-end tests for the dispatcher: scripts in, stack and output out.

use spindle_bytecode::{Cell, Opcode};

use crate::engine::{Mode, RuntimeError, Vm};
use crate::test_util::SharedBuf;

use super::dispatch::Interpreter;
use super::source::ScriptSource;

fn interpreter(text: &str) -> (Interpreter<ScriptSource>, SharedBuf) {
    let buf = SharedBuf::default();
    let vm = Vm::with_output(Box::new(buf.clone()));
    (
        Interpreter::with_vm(vm, ScriptSource::from_text(text)),
        buf,
    )
}

fn run_script(text: &str) -> (Interpreter<ScriptSource>, SharedBuf) {
    let (mut interp, buf) = interpreter(text);
    interp.run().expect("script runs to completion");
    (interp, buf)
}

fn stack(interp: &Interpreter<ScriptSource>) -> &[Cell] {
    interp.vm().stack().as_slice()
}

#[test]
fn literals_push_in_order() {
    let (interp, _) = run_script("1 2 3");
    assert_eq!(stack(&interp), [1, 2, 3]);
}

#[test]
fn negative_literals_parse() {
    let (interp, _) = run_script("-4 7");
    assert_eq!(stack(&interp), [-4, 7]);
}

#[test]
fn subtraction_is_order_sensitive() {
    let (interp, _) = run_script("5 2 -");
    assert_eq!(stack(&interp), [3]);
}

#[test]
fn addition() {
    let (interp, _) = run_script("1 2 +");
    assert_eq!(stack(&interp), [3]);
}

#[test]
fn division_truncates() {
    let (interp, _) = run_script("7 2 /");
    assert_eq!(stack(&interp), [3]);
}

#[test]
fn stack_words() {
    let (interp, _) = run_script("1 2 swp dup pop");
    assert_eq!(stack(&interp), [2, 1]);

    let (interp, _) = run_script("1 2 3 clr");
    assert!(stack(&interp).is_empty());
}

#[test]
fn print_top_does_not_pop() {
    let (interp, buf) = run_script("42 .");
    assert_eq!(buf.contents(), "42\n");
    assert_eq!(stack(&interp), [42]);
}

#[test]
fn print_top_on_empty_stack() {
    let (_, buf) = run_script(".");
    assert_eq!(buf.contents(), "<empty>\n");
}

#[test]
fn print_whole_stack() {
    let (_, buf) = run_script("1 2 3 ..");
    assert_eq!(buf.contents(), "[ 1 2 3 ]\n");
}

#[test]
fn underflow_is_reported_and_execution_continues() {
    let (interp, buf) = run_script("dup\n5");
    assert!(buf.contents().contains("stack underflow in `dup`"));
    assert_eq!(stack(&interp), [5]);
}

#[test]
fn underflow_discards_the_rest_of_the_line() {
    let (interp, buf) = run_script("1 + 2\n8");
    assert!(buf.contents().contains("stack underflow in `+`"));
    assert_eq!(stack(&interp), [1, 8]);
}

#[test]
fn swap_on_a_singleton_underflows_without_corruption() {
    let (interp, buf) = run_script("0 swp");
    assert!(buf.contents().contains("stack underflow in `swp`"));
    assert_eq!(stack(&interp), [0]);
}

#[test]
fn division_by_zero_keeps_operands() {
    let (interp, buf) = run_script("5 0 /");
    assert!(buf.contents().contains("division by zero"));
    assert_eq!(stack(&interp), [5, 0]);
}

#[test]
fn unknown_word_reports_and_discards_line() {
    let (interp, buf) = run_script("1 bogus 2\n5");
    assert!(buf.contents().contains("`bogus` is not a word or a number"));
    assert_eq!(stack(&interp), [1, 5]);
}

#[test]
fn define_and_call() {
    let (interp, _) = run_script(": sq dup * ;\n4 sq");
    assert_eq!(stack(&interp), [16]);
}

#[test]
fn define_spanning_lines() {
    let (interp, _) = run_script(": sq\ndup *\n;\n3 sq");
    assert_eq!(stack(&interp), [9]);
}

#[test]
fn definition_name_may_arrive_on_a_later_line() {
    let (interp, _) = run_script(":\nsq dup * ;\n4 sq");
    assert_eq!(stack(&interp), [16]);
}

#[test]
fn compiled_literals_keep_full_cell_width() {
    let (interp, _) = run_script(": big 1000000 ;\nbig");
    assert_eq!(stack(&interp), [1_000_000]);
}

#[test]
fn redefinition_is_rejected_and_first_stays_callable() {
    let (interp, buf) = run_script(": sq dup * ;\n: sq dup dup * * ;\n3 sq");
    assert!(buf.contents().contains("word `sq` is already defined"));
    assert_eq!(stack(&interp), [9]);
    assert_eq!(interp.vm().mode(), Mode::Execute);
}

#[test]
fn compiled_word_behaves_like_its_body_inline() {
    let (compiled, _) = run_script(": f 1 2 + dup * ;\nf");
    let (inline, _) = run_script("1 2 + dup *");
    assert_eq!(stack(&compiled), stack(&inline));
}

#[test]
fn defined_words_can_call_defined_words() {
    let (interp, _) = run_script(": sq dup * ;\n: quad sq sq ;\n2 quad");
    assert_eq!(stack(&interp), [16]);
}

#[test]
fn empty_definition_is_callable() {
    let (interp, _) = run_script(": nop ;\n1 nop 2");
    assert_eq!(stack(&interp), [1, 2]);
}

#[test]
fn exit_stops_the_loop_at_the_next_fetch_boundary() {
    // The rest of the line is still dispatched; the next line is not.
    let (interp, _) = run_script("1 exit 2\n3");
    assert_eq!(stack(&interp), [1, 2]);
    assert!(!interp.vm().running());
}

#[test]
fn exit_from_a_nested_call_stops_the_top_loop() {
    let (interp, _) = run_script(": inner exit ;\n: outer inner 9 ;\nouter\n5");
    assert!(!interp.vm().running());
    assert!(stack(&interp).is_empty());
    // Nothing is unwound: both frames are still on the return stack.
    assert_eq!(interp.vm().call_depth(), 2);
}

#[test]
fn run_stops_when_the_script_dries_up() {
    let (interp, _) = run_script("1 2");
    assert!(!interp.vm().running());
    assert_eq!(stack(&interp), [1, 2]);
}

#[test]
fn read_opcode_consumes_exactly_one_word() {
    let (mut interp, _) = interpreter("readone 6 7");
    let id = interp.vm_mut().table_mut().register("readone");
    let body = interp.vm_mut().table_mut().get_mut(id);
    body.emit(Opcode::Read);
    body.emit(Opcode::Return);

    interp.run().unwrap();
    assert_eq!(stack(&interp), [6, 7]);
}

#[test]
fn invalid_opcode_aborts_the_frame_and_reports() {
    let (mut interp, buf) = interpreter("bad 5");
    let id = interp.vm_mut().table_mut().register("bad");
    interp.vm_mut().table_mut().get_mut(id).push_cell(99);

    interp.run().unwrap();
    assert!(buf.contents().contains("invalid opcode 99 in `bad` at 0"));
    assert_eq!(stack(&interp), [5]);
}

#[test]
fn stray_return_is_fatal() {
    let (mut interp, _) = interpreter("");
    let id = interp.vm_mut().table_mut().register("haywire");
    interp.vm_mut().table_mut().get_mut(id).emit(Opcode::Return);
    interp.vm_mut().start_at(id);

    let err = interp.run().unwrap_err();
    assert!(matches!(err, RuntimeError::ReturnStackUnderflow));
}

#[test]
fn define_at_end_of_input_is_abandoned() {
    let (mut interp, _) = interpreter(":");
    interp.run().unwrap();
    assert_eq!(interp.vm().mode(), Mode::Execute);
}
