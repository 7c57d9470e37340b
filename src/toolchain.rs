//! Turns an IR module into files on disk: `.ll` text, an object, an executable.

use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
    process::Command,
};

use tracing::{debug, info};

use crate::{
    config::{BuildConfig, Emit, Tool},
    error::ToolchainError,
    ir::Module,
};

/// Paths of everything written by [`build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub ll: PathBuf,
    pub obj: Option<PathBuf>,
    pub exe: Option<PathBuf>,
}

pub fn build(module: &Module, config: &BuildConfig) -> Result<Artifacts, ToolchainError> {
    let ll = config.ll_path();
    write_ll(module, &ll)?;
    let mut artifacts = Artifacts {
        ll,
        obj: None,
        exe: None,
    };
    if config.emit == Emit::Ll {
        return Ok(artifacts);
    }

    let obj = config.obj_path();
    emit_object(module, &artifacts.ll, &obj, config)?;
    info!(path = %obj.display(), "wrote object file");
    if config.emit == Emit::Obj {
        artifacts.obj = Some(obj);
        return Ok(artifacts);
    }

    let exe = config.exe_path();
    link_exe(&config.cc, &obj, &exe)?;
    info!(path = %exe.display(), "wrote executable");
    artifacts.obj = Some(obj);
    artifacts.exe = Some(exe);
    Ok(artifacts)
}

/// Save the module's LLVM text form.
pub fn write_ll(module: &Module, path: &Path) -> Result<(), ToolchainError> {
    fs::write(path, module.to_string()).map_err(|error| ToolchainError::Write {
        path: path.to_path_buf(),
        error,
    })?;
    info!(path = %path.display(), "wrote LLVM IR");
    Ok(())
}

#[cfg(feature = "llvm")]
fn emit_object(
    module: &Module,
    _ll: &Path,
    obj: &Path,
    _config: &BuildConfig,
) -> Result<(), ToolchainError> {
    crate::llvm::write_object(module, obj)
}

#[cfg(not(feature = "llvm"))]
fn emit_object(
    _module: &Module,
    ll: &Path,
    obj: &Path,
    config: &BuildConfig,
) -> Result<(), ToolchainError> {
    run_tool(
        &config.llc,
        [
            OsStr::new("-filetype=obj"),
            ll.as_os_str(),
            OsStr::new("-o"),
            obj.as_os_str(),
        ],
    )
}

/// Link a single object into an executable with the C compiler driver, which
/// supplies the C runtime that calls `main`.
pub fn link_exe(cc: &Tool, obj: &Path, out_exe: &Path) -> Result<(), ToolchainError> {
    run_tool(cc, [obj.as_os_str(), OsStr::new("-o"), out_exe.as_os_str()])
}

fn run_tool<'a>(
    tool: &Tool,
    args: impl IntoIterator<Item = &'a OsStr>,
) -> Result<(), ToolchainError> {
    let mut cmd = Command::new(tool.program());
    cmd.args(args);
    debug!(command = ?cmd, resolution = %tool.source(), "running tool");
    let status = cmd.status().map_err(|error| match error.kind() {
        io::ErrorKind::NotFound => ToolchainError::ToolNotFound(tool.program().to_string()),
        _ => ToolchainError::Spawn {
            tool: tool.program().to_string(),
            error,
        },
    })?;
    if !status.success() {
        return Err(ToolchainError::ToolFailed {
            tool: tool.program().to_string(),
            status,
        });
    }
    Ok(())
}
