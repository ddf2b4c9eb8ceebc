//! Subprocess path resolution
//!
//! Asks an external utility whether a path resolves. Used for remote shares,
//! where a plain stat can answer from a stale cache after the connection or
//! its credentials are gone. The candidate path travels only through an
//! environment variable of the child process; it is never spliced into the
//! program arguments.

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::config::ResolverConfig;
use crate::error::ValidationError;
use crate::validation::resolver::{PathResolver, PathStatus};

#[derive(Debug, Clone)]
pub struct SubprocessResolver {
    program: String,
    args: Vec<String>,
    env_var: String,
}

impl SubprocessResolver {
    pub fn new(program: impl Into<String>, args: Vec<String>, env_var: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args,
            env_var: env_var.into(),
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(&config.program, config.args.clone(), &config.env_var)
    }
}

impl PathResolver for SubprocessResolver {
    fn resolve(&self, path: &Path) -> Result<PathStatus, ValidationError> {
        let result = Command::new(&self.program)
            .args(&self.args)
            .env(&self.env_var, path.as_os_str())
            .output()
            .map_err(|source| ValidationError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut output = String::from_utf8_lossy(&result.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&result.stderr));
        debug!("{} answered {:?} for {}", self.program, output.trim(), path.display());

        if !result.status.success() {
            return Err(ValidationError::Failed {
                status: result.status,
                output,
            });
        }

        parse_output(output)
    }
}

/// Interprets the utility's answer, ignoring case and surrounding whitespace.
pub fn parse_output(output: String) -> Result<PathStatus, ValidationError> {
    let answer = output.trim_start().to_ascii_lowercase();
    if answer.starts_with("true") {
        Ok(PathStatus::Valid)
    } else if answer.starts_with("false") {
        Ok(PathStatus::Missing)
    } else {
        Err(ValidationError::Unparseable { output })
    }
}
