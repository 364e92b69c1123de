//! Error taxonomy.
//!
//! Each component returns one of the narrow errors below; [`MacshiftError`] groups
//! them into the five failure classes the CLI distinguishes (discovery, validation,
//! execution, persistence, generation).

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A native command could not be run or reported failure.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` exited with {}: {stderr}", display_code(.code))]
    ExitStatus {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => String::from("a signal"),
    }
}

/// One step of the down / set-address / up sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStep {
    Down,
    SetAddress,
    Up,
}

impl fmt::Display for MutationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MutationStep::Down => "bring interface down",
            MutationStep::SetAddress => "set hardware address",
            MutationStep::Up => "bring interface up",
        })
    }
}

/// A mutation step failed. Steps that already ran are not rolled back.
#[derive(Debug, Error)]
#[error("could not {step}: {source}")]
pub struct MutationError {
    pub step: MutationStep,
    #[source]
    pub source: ExecError,
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("could not read backup file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not write backup file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("backup file {} is malformed: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
    #[error("could not serialize backup data: {0}")]
    Serialize(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("no address different from the current one after {attempts} attempts")]
    RetriesExhausted { attempts: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("invalid MAC format `{0}`, expected 00:11:22:33:44:55")]
    InvalidFormat(String),
}

#[derive(Debug, Error)]
pub enum MacshiftError {
    #[error("no interfaces found")]
    NoInterfaces,
    #[error("could not fetch MAC for {interface}")]
    AddressUnavailable { interface: String },
    #[error(transparent)]
    InvalidAddress(#[from] AddressParseError),
    #[error("MAC change failed: {0}")]
    Mutation(#[from] MutationError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
