//! External message-resource dumper.
//!
//! The dumper is a black box: given a resource file path it prints the
//! exported message text to stdout. It is modeled as a trait so the parser
//! can be fed synthetic line sequences in tests without invoking anything.

use std::path::PathBuf;
use std::process::Command;

use crate::err::{Error, Result};

pub trait ResourceDumper {
    /// Dump the message resources of the file at `path` as ordered text lines.
    fn dump(&self, path: &str) -> Result<Vec<String>>;
}

/// Dumper backed by an external executable invoked as `<exe> <path>`.
#[derive(Debug, Clone)]
pub struct ExternalDumper {
    exe: PathBuf,
}

impl ExternalDumper {
    /// Fail-fast precondition check: the executable must exist before any
    /// scanning begins. A missing binary aborts the whole run.
    pub fn locate(exe: impl Into<PathBuf>) -> Result<Self> {
        let exe = exe.into();
        if !exe.is_file() {
            return Err(Error::DumperNotFound { path: exe });
        }
        Ok(ExternalDumper { exe })
    }
}

impl ResourceDumper for ExternalDumper {
    fn dump(&self, path: &str) -> Result<Vec<String>> {
        let output = Command::new(&self.exe)
            .arg(path)
            .output()
            .map_err(|source| Error::DumperInvocation {
                path: path.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::DumperFailed {
                path: path.to_string(),
                status: output.status.code().unwrap_or(-1),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text.lines().map(str::to_string).collect())
    }
}
