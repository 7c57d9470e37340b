//! Goose: a tiny ahead-of-time compiler for single-statement integer programs.
//!
//! [`compile`] runs the core pipeline (lexer, parser, lowering) and returns
//! an IR module; [`toolchain`] turns that module into native artifacts.

pub mod ast;
pub mod codegen;
pub mod config;
pub mod error;
pub mod eval;
pub mod ir;
pub mod lexer;
#[cfg(feature = "llvm")]
pub mod llvm;
pub mod parser;
pub mod source;
pub mod toolchain;

use tracing::debug;

pub use error::{CodegenError, CompileError, CompileResult, LexError, SyntaxError};

/// Compile Goose source text into an IR module, failing on the first error.
pub fn compile(src: &str) -> CompileResult<ir::Module> {
    let tokens = lexer::tokenize(src)?;
    debug!(count = tokens.len(), "tokenized");
    let stmt = parser::parse(tokens)?;
    let module = codegen::lower(&stmt)?;
    Ok(module)
}
