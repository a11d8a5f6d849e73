//! Builtin words and the top-level driver.

use spindle_bytecode::{ArithOp, Builtin, FuncId, FunctionTable, Opcode, StackOp};

/// Name of the top-level driver. A space never survives tokenization, so
/// the driver is unreachable by name.
const DRIVER_NAME: &str = " ";

/// Register the builtin words and the driver; returns the driver's id.
///
/// The driver body is an infinite prompt loop: `Jump(-2)` is relative to
/// the Jump opcode's own index, so it lands back on the `Prompt` once the
/// fetch advance is accounted for.
pub fn install(table: &mut FunctionTable) -> FuncId {
    table.register_native(".", Builtin::PrintTop);
    table.register_native("..", Builtin::PrintStack);
    for op in ArithOp::ALL {
        table.register_native(op.symbol(), Builtin::Arith(op));
    }
    for op in StackOp::ALL {
        table.register_native(op.symbol(), Builtin::Stack(op));
    }
    table.register_native("exit", Builtin::Exit);

    let driver = table.register(DRIVER_NAME);
    let body = table.get_mut(driver);
    body.emit(Opcode::Prompt);
    body.emit_with(Opcode::Jump, -2);

    table.register_native(":", Builtin::DefineBegin);
    let end = table.register(";");
    table.bind_native(end, Builtin::DefineEnd, true);

    driver
}
