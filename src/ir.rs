//! Low-level IR produced by lowering: integer globals plus one entry procedure.
//!
//! The [`Display`](fmt::Display) impl prints the module as LLVM textual IR,
//! ready for `llc`.

use std::fmt;

use crate::error::CodegenError;

pub const MODULE_NAME: &str = "goose";
pub const ENTRY_NAME: &str = "main";
pub const ENTRY_BLOCK: &str = "entry";

/// An operand: a compile-time constant or the result of an earlier instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Const(i32),
    Temp(u32),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Const(v) => write!(f, "{v}"),
            Value::Temp(n) => write!(f, "%{n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    /// Signed division, truncating toward zero.
    SDiv,
}

impl ArithOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Mul => "mul",
            ArithOp::SDiv => "sdiv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Load { dest: u32, global: String },
    Binary { dest: u32, op: ArithOp, lhs: Value, rhs: Value },
    Store { value: Value, global: String },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Load { dest, global } => write!(f, "%{dest} = load i32, ptr @{global}"),
            Instruction::Binary { dest, op, lhs, rhs } => {
                write!(f, "%{dest} = {} i32 {lhs}, {rhs}", op.mnemonic())
            }
            Instruction::Store { value, global } => write!(f, "store i32 {value}, ptr @{global}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    RetVoid,
}

/// A global `i32` variable. The initializer is always a constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Global {
    pub name: String,
    pub init: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBlock {
    pub label: String,
    pub instructions: Vec<Instruction>,
    pub terminator: Terminator,
}

/// The entry procedure: `void main()` with a single basic block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub block: BasicBlock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    /// Declaration order is preserved.
    pub globals: Vec<Global>,
    pub entry: Function,
}

impl Module {
    pub fn global(&self, name: &str) -> Option<&Global> {
        self.globals.iter().find(|g| g.name == name)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.entry.block.instructions
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name)?;
        writeln!(f, "source_filename = \"{}\"", self.name)?;
        if !self.globals.is_empty() {
            writeln!(f)?;
        }
        for global in &self.globals {
            writeln!(f, "@{} = global i32 {}", global.name, global.init)?;
        }
        writeln!(f)?;
        writeln!(f, "define void @{}() {{", self.entry.name)?;
        let block = &self.entry.block;
        writeln!(f, "{}:", block.label)?;
        for inst in &block.instructions {
            writeln!(f, "  {inst}")?;
        }
        match block.terminator {
            Terminator::RetVoid => writeln!(f, "  ret void")?,
        }
        writeln!(f, "}}")
    }
}

/// Lowering context: owns the module under construction and the insertion
/// point at the end of the entry block.
#[derive(Debug)]
pub struct IrBuilder {
    globals: Vec<Global>,
    instructions: Vec<Instruction>,
    terminator: Option<Terminator>,
    next_temp: u32,
}

impl IrBuilder {
    pub fn new() -> Self {
        Self {
            globals: Vec::new(),
            instructions: Vec::new(),
            terminator: None,
            next_temp: 0,
        }
    }

    pub fn has_global(&self, name: &str) -> bool {
        self.globals.iter().any(|g| g.name == name)
    }

    /// Declare `name` with a constant initializer. Returns `false` when the
    /// global already exists, leaving it untouched.
    ///
    /// Globals share the symbol namespace with the entry procedure, so its
    /// name is refused.
    pub fn declare_global(&mut self, name: &str, init: i32) -> Result<bool, CodegenError> {
        if name == ENTRY_NAME {
            return Err(CodegenError::ReservedName(name.to_string()));
        }
        if self.has_global(name) {
            return Ok(false);
        }
        self.globals.push(Global {
            name: name.to_string(),
            init,
        });
        Ok(true)
    }

    pub fn load(&mut self, global: &str) -> Value {
        let dest = self.fresh_temp();
        self.instructions.push(Instruction::Load {
            dest,
            global: global.to_string(),
        });
        Value::Temp(dest)
    }

    pub fn binary(&mut self, op: ArithOp, lhs: Value, rhs: Value) -> Value {
        let dest = self.fresh_temp();
        self.instructions.push(Instruction::Binary { dest, op, lhs, rhs });
        Value::Temp(dest)
    }

    pub fn store(&mut self, value: Value, global: &str) {
        self.instructions.push(Instruction::Store {
            value,
            global: global.to_string(),
        });
    }

    pub fn terminate(&mut self, terminator: Terminator) {
        self.terminator = Some(terminator);
    }

    /// Close the builder into a module; the entry block must be terminated.
    pub fn finish(self) -> Result<Module, CodegenError> {
        let terminator = self
            .terminator
            .ok_or_else(|| CodegenError::Unterminated(ENTRY_NAME.to_string()))?;
        Ok(Module {
            name: MODULE_NAME.to_string(),
            globals: self.globals,
            entry: Function {
                name: ENTRY_NAME.to_string(),
                block: BasicBlock {
                    label: ENTRY_BLOCK.to_string(),
                    instructions: self.instructions,
                    terminator,
                },
            },
        })
    }

    fn fresh_temp(&mut self) -> u32 {
        let n = self.next_temp;
        self.next_temp += 1;
        n
    }
}

impl Default for IrBuilder {
    fn default() -> Self {
        Self::new()
    }
}
