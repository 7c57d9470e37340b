//! Lowering of a Goose AST into an IR [`Module`].

use tracing::debug;

use crate::{
    ast::{BinOp, Expr, Stmt},
    error::CodegenError,
    ir::{ArithOp, IrBuilder, Module, Terminator, Value},
};

/// Walks the AST and drives an [`IrBuilder`] positioned in the entry block.
pub struct CodeGenerator {
    builder: IrBuilder,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            builder: IrBuilder::new(),
        }
    }

    /// Lower the program's single statement and close the entry procedure.
    pub fn lower(mut self, stmt: &Stmt) -> Result<Module, CodegenError> {
        self.gen_stmt(stmt)?;
        self.builder.terminate(Terminator::RetVoid);
        let module = self.builder.finish()?;
        debug!(
            globals = module.globals.len(),
            instructions = module.instructions().len(),
            "lowered module"
        );
        Ok(module)
    }

    fn gen_stmt(&mut self, stmt: &Stmt) -> Result<(), CodegenError> {
        match stmt {
            Stmt::Assign { name, value } => {
                // globals start at zero; the real value is stored at runtime
                self.builder.declare_global(name, 0)?;
                let v = self.gen_expr(value)?;
                self.builder.store(v, name);
            }
            Stmt::Expr(expr) => {
                self.gen_expr(expr)?;
            }
        }
        Ok(())
    }

    /// Produce an `i32` value for the expression. Every variant either yields a
    /// value or fails; strings are never valid here.
    fn gen_expr(&mut self, expr: &Expr) -> Result<Value, CodegenError> {
        Ok(match expr {
            Expr::Number(v) => Value::Const(*v),
            Expr::Var(name) => {
                if !self.builder.has_global(name) {
                    return Err(CodegenError::UndefinedVariable(name.clone()));
                }
                self.builder.load(name)
            }
            Expr::Binary { left, op, right } => {
                // operands are evaluated left-to-right
                let l = self.gen_expr(left)?;
                let r = self.gen_expr(right)?;
                self.builder.binary(arith_op(*op), l, r)
            }
            Expr::Str(s) => return Err(CodegenError::StringInNumericContext(s.clone())),
        })
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn arith_op(op: BinOp) -> ArithOp {
    match op {
        BinOp::Add => ArithOp::Add,
        BinOp::Sub => ArithOp::Sub,
        BinOp::Mul => ArithOp::Mul,
        BinOp::Div => ArithOp::SDiv,
    }
}

/// Lower a parsed statement into a fresh module.
pub fn lower(stmt: &Stmt) -> Result<Module, CodegenError> {
    CodeGenerator::new().lower(stmt)
}
