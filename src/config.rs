use std::{
    env,
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
};

use clap::ValueEnum;

const LLC_ENV: &str = "GOOSE_LLC";
const CC_ENV: &str = "GOOSE_CC";
const LLC_CANDIDATES: &[&str] = &["llc"];
const CC_CANDIDATES: &[&str] = &["cc", "clang", "gcc"];

/// How far the toolchain should take the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// LLVM textual IR only.
    Ll,
    /// Object file.
    Obj,
    /// Linked executable.
    Exe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    ExplicitVar,
    PathLookup,
    Default,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionSource::ExplicitVar => write!(f, "environment override"),
            ResolutionSource::PathLookup => write!(f, "found on PATH"),
            ResolutionSource::Default => write!(f, "default"),
        }
    }
}

/// An external program and where its name came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    program: String,
    source: ResolutionSource,
}

impl Tool {
    /// Resolve a tool. The order is:
    ///  1. a non-empty `env_var`
    ///  2. the first candidate found on `PATH`
    ///  3. the first candidate, unresolved
    pub fn resolve(env_var: &str, candidates: &[&str]) -> Self {
        if let Some(explicit) = Self::explicit_override(env_var) {
            return explicit;
        }
        if let Some(found) = candidates.iter().find(|c| which::which(c).is_ok()) {
            return Self {
                program: (*found).to_string(),
                source: ResolutionSource::PathLookup,
            };
        }
        Self {
            program: candidates.first().copied().unwrap_or_default().to_string(),
            source: ResolutionSource::Default,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn source(&self) -> ResolutionSource {
        self.source
    }

    fn explicit_override(env_var: &str) -> Option<Self> {
        env::var(env_var).ok().and_then(|raw| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(Self {
                    program: trimmed.to_owned(),
                    source: ResolutionSource::ExplicitVar,
                })
            }
        })
    }
}

/// Where artifacts go and which tools produce them.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Output path without extension.
    pub stem: PathBuf,
    pub emit: Emit,
    pub llc: Tool,
    pub cc: Tool,
}

impl BuildConfig {
    pub fn new(stem: impl Into<PathBuf>, emit: Emit) -> Self {
        Self {
            stem: stem.into(),
            emit,
            llc: Tool::resolve(LLC_ENV, LLC_CANDIDATES),
            cc: Tool::resolve(CC_ENV, CC_CANDIDATES),
        }
    }

    /// Default stem for an input: its file stem, in the current directory.
    pub fn default_stem(input: &Path) -> PathBuf {
        input
            .file_stem()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("out"))
    }

    pub fn ll_path(&self) -> PathBuf {
        self.with_suffix(".ll")
    }

    pub fn obj_path(&self) -> PathBuf {
        self.with_suffix(".o")
    }

    pub fn exe_path(&self) -> PathBuf {
        if cfg!(target_os = "windows") {
            self.with_suffix(".exe")
        } else {
            self.stem.clone()
        }
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut s: OsString = self.stem.as_os_str().to_owned();
        s.push(suffix);
        PathBuf::from(s)
    }
}
