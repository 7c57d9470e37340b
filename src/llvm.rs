//! In-process object emission through LLVM using Inkwell.

use std::{collections::HashMap, path::Path};

use inkwell::{
    context::Context as LlvmContext,
    targets::{
        CodeModel, FileType, InitializationConfig, RelocMode, Target, TargetMachine, TargetTriple,
    },
    types::IntType,
    values::{IntValue, PointerValue},
    AddressSpace, OptimizationLevel,
};

use crate::{
    error::ToolchainError,
    ir::{ArithOp, Instruction, Module, Terminator, Value},
};

fn llvm_err(e: impl ToString) -> ToolchainError {
    ToolchainError::Llvm(e.to_string())
}

/// Re-materialise `ir` as an LLVM module, verify it, and write an object file
/// for the host target.
pub fn write_object(ir: &Module, out_obj: &Path) -> Result<(), ToolchainError> {
    let ctx = LlvmContext::create();
    let triple = host_triple();
    let module = ctx.create_module(&ir.name);
    module.set_triple(&triple);
    let builder = ctx.create_builder();
    let i32_t = ctx.i32_type();

    let mut globals: HashMap<&str, PointerValue> = HashMap::new();
    for g in &ir.globals {
        let gv = module.add_global(i32_t, Some(AddressSpace::default()), &g.name);
        gv.set_initializer(&i32_t.const_int(g.init as i64 as u64, true));
        globals.insert(g.name.as_str(), gv.as_pointer_value());
    }

    let main_fn = module.add_function(&ir.entry.name, ctx.void_type().fn_type(&[], false), None);
    let entry = ctx.append_basic_block(main_fn, &ir.entry.block.label);
    builder.position_at_end(entry);

    let mut temps: HashMap<u32, IntValue> = HashMap::new();
    let global = |name: &str| {
        globals
            .get(name)
            .copied()
            .ok_or_else(|| llvm_err(format!("undeclared global `{name}`")))
    };
    for inst in ir.instructions() {
        match inst {
            Instruction::Load { dest, global: name } => {
                let v = builder
                    .build_load(i32_t, global(name)?, "load")
                    .map_err(llvm_err)?
                    .into_int_value();
                temps.insert(*dest, v);
            }
            Instruction::Binary { dest, op, lhs, rhs } => {
                let l = operand(i32_t, &temps, *lhs)?;
                let r = operand(i32_t, &temps, *rhs)?;
                let v = match op {
                    ArithOp::Add => builder.build_int_add(l, r, "add"),
                    ArithOp::Sub => builder.build_int_sub(l, r, "sub"),
                    ArithOp::Mul => builder.build_int_mul(l, r, "mul"),
                    ArithOp::SDiv => builder.build_int_signed_div(l, r, "div"),
                }
                .map_err(llvm_err)?;
                temps.insert(*dest, v);
            }
            Instruction::Store { value, global: name } => {
                let v = operand(i32_t, &temps, *value)?;
                builder.build_store(global(name)?, v).map_err(llvm_err)?;
            }
        }
    }
    match ir.entry.block.terminator {
        Terminator::RetVoid => builder.build_return(None).map_err(llvm_err)?,
    };

    module.verify().map_err(llvm_err)?;
    Target::initialize_all(&InitializationConfig::default());
    let target = Target::from_triple(&triple).map_err(llvm_err)?;
    let tm = target
        .create_target_machine(
            &triple,
            "generic",
            "",
            OptimizationLevel::None,
            RelocMode::Default,
            CodeModel::Default,
        )
        .ok_or_else(|| llvm_err("create target machine failed"))?;
    tm.write_to_file(&module, FileType::Object, out_obj)
        .map_err(llvm_err)
}

fn operand<'ctx>(
    i32_t: IntType<'ctx>,
    temps: &HashMap<u32, IntValue<'ctx>>,
    v: Value,
) -> Result<IntValue<'ctx>, ToolchainError> {
    match v {
        Value::Const(c) => Ok(i32_t.const_int(c as i64 as u64, true)),
        Value::Temp(n) => temps
            .get(&n)
            .copied()
            .ok_or_else(|| llvm_err(format!("undefined temporary %{n}"))),
    }
}

/// Grab the default target triple for the build machine.
pub fn host_triple() -> TargetTriple {
    TargetMachine::get_default_triple()
}
