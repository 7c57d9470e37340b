//! In-process execution of an IR module's entry procedure.
//!
//! Arithmetic follows LLVM semantics for `i32` without `nsw`: `add`, `sub` and
//! `mul` wrap, `sdiv` truncates toward zero. Cases LLVM leaves undefined
//! (division by zero, `i32::MIN / -1`) surface as a [`RuntimeFault`].

use std::collections::HashMap;

use crate::{
    error::RuntimeFault,
    ir::{ArithOp, Instruction, Module, Terminator, Value},
};

/// Final values of the module's globals, in declaration order.
pub type Globals = Vec<(String, i32)>;

pub fn run(module: &Module) -> Result<Globals, RuntimeFault> {
    let mut memory: HashMap<&str, i32> = module
        .globals
        .iter()
        .map(|g| (g.name.as_str(), g.init))
        .collect();
    let mut temps: HashMap<u32, i32> = HashMap::new();

    let operand = |temps: &HashMap<u32, i32>, v: Value| match v {
        Value::Const(c) => Ok(c),
        Value::Temp(n) => temps.get(&n).copied().ok_or(RuntimeFault::UnknownTemp(n)),
    };

    for inst in module.instructions() {
        match inst {
            Instruction::Load { dest, global } => {
                let v = *memory
                    .get(global.as_str())
                    .ok_or(RuntimeFault::UnknownGlobal)?;
                temps.insert(*dest, v);
            }
            Instruction::Binary { dest, op, lhs, rhs } => {
                let l = operand(&temps, *lhs)?;
                let r = operand(&temps, *rhs)?;
                temps.insert(*dest, apply(*op, l, r)?);
            }
            Instruction::Store { value, global } => {
                let v = operand(&temps, *value)?;
                let slot = memory
                    .get_mut(global.as_str())
                    .ok_or(RuntimeFault::UnknownGlobal)?;
                *slot = v;
            }
        }
    }

    match module.entry.block.terminator {
        Terminator::RetVoid => {}
    }

    Ok(module
        .globals
        .iter()
        .map(|g| (g.name.clone(), memory[g.name.as_str()]))
        .collect())
}

pub fn apply(op: ArithOp, l: i32, r: i32) -> Result<i32, RuntimeFault> {
    Ok(match op {
        ArithOp::Add => l.wrapping_add(r),
        ArithOp::Sub => l.wrapping_sub(r),
        ArithOp::Mul => l.wrapping_mul(r),
        ArithOp::SDiv => {
            if r == 0 {
                return Err(RuntimeFault::DivisionByZero);
            }
            l.checked_div(r).ok_or(RuntimeFault::DivisionOverflow)?
        }
    })
}
