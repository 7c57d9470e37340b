//! Error types for every stage of the Goose pipeline.
//!
//! The compiler core (lexer, parser, lowering) fails fast: the first error
//! aborts the compilation and no partial IR module is produced.

use std::{io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

use crate::lexer::TokenKind;

/// Convenience alias used by the compiler core.
pub type CompileResult<T> = Result<T, CompileError>;

/// Failure while turning source text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("integer literal `{text}` at offset {pos} does not fit in i32")]
    NumberOutOfRange { text: String, pos: usize },
}

/// Failure while parsing the token stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("unexpected {} ({}) at offset {pos}, expected {expected}", .found, .found.name())]
    Unexpected {
        found: TokenKind,
        expected: &'static str,
        pos: usize,
    },
}

impl SyntaxError {
    pub fn found(&self) -> &TokenKind {
        match self {
            SyntaxError::Unexpected { found, .. } => found,
        }
    }
}

/// Failure while lowering the AST into IR.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),
    #[error("string literal \"{0}\" used where an integer is required")]
    StringInNumericContext(String),
    #[error("`{0}` is reserved for the entry procedure and cannot name a variable")]
    ReservedName(String),
    #[error("procedure `{0}` has no terminator")]
    Unterminated(String),
}

/// Any error raised by the compiler core, tagged with the failing stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("lex error: {0}")]
    Lex(LexError),
    #[error("syntax error: {0}")]
    Syntax(SyntaxError),
    #[error("codegen error: {0}")]
    Codegen(CodegenError),
}

// Not `#[from]`: the stage error is already part of the message, so it is
// not reported again as a source.
impl From<LexError> for CompileError {
    fn from(e: LexError) -> Self {
        CompileError::Lex(e)
    }
}

impl From<SyntaxError> for CompileError {
    fn from(e: SyntaxError) -> Self {
        CompileError::Syntax(e)
    }
}

impl From<CodegenError> for CompileError {
    fn from(e: CodegenError) -> Self {
        CompileError::Codegen(e)
    }
}

impl CompileError {
    /// Short stage name used for logging.
    pub fn stage(&self) -> &'static str {
        match self {
            CompileError::Lex(_) => "lex",
            CompileError::Syntax(_) => "parse",
            CompileError::Codegen(_) => "codegen",
        }
    }
}

/// Failure while fetching the source file.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("`{}` is not a .gs file", .0.display())]
    BadExtension(PathBuf),
    #[error("cannot read `{}`: {error}", .path.display())]
    Io { path: PathBuf, error: io::Error },
}

/// Failure while producing native artifacts from an IR module.
#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("cannot write `{}`: {error}", .path.display())]
    Write { path: PathBuf, error: io::Error },
    #[error("no `{0}` found on PATH")]
    ToolNotFound(String),
    #[error("failed to launch `{tool}`: {error}")]
    Spawn { tool: String, error: io::Error },
    #[error("`{tool}` exited with {status}")]
    ToolFailed { tool: String, status: ExitStatus },
    #[error("llvm: {0}")]
    Llvm(String),
}

/// Fault raised by the executed program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeFault {
    #[error("division by zero")]
    DivisionByZero,
    #[error("division overflow (i32::MIN / -1)")]
    DivisionOverflow,
    #[error("load of undeclared global")]
    UnknownGlobal,
    #[error("use of undefined temporary %{0}")]
    UnknownTemp(u32),
}
