//! Execution of the external tools the recipe drives.

use std::{
    io,
    process::{Command, ExitStatus},
};

/// An error indicating failure while running an external tool.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ToolError {
    /// The tool could not be spawned at all.
    #[error("failed to spawn `{command:?}`: {source}")]
    Spawn {
        /// The command which was run.
        command: Box<Command>,
        /// Source of the error.
        source: io::Error,
    },
    /// The tool ran but exited unsuccessfully.
    #[error("`{command:?}` exited with {status}")]
    Unsuccessful {
        /// The command which was run.
        command: Box<Command>,
        /// Exit status of the tool.
        status: ExitStatus,
    },
}

impl ToolError {
    /// Creates a [`Spawn`](ToolError::Spawn) variant from given arguments.
    fn spawn(command: Command, source: io::Error) -> Self {
        Self::Spawn {
            command: Box::new(command),
            source,
        }
    }

    /// Creates an [`Unsuccessful`](ToolError::Unsuccessful) variant from
    /// given arguments.
    fn unsuccessful(command: Command, status: ExitStatus) -> Self {
        Self::Unsuccessful {
            command: Box::new(command),
            status,
        }
    }

    /// Returns the command which was run.
    #[inline]
    #[expect(clippy::must_use_candidate, reason = "returns a reference")]
    pub fn command(&self) -> &Command {
        match self {
            Self::Spawn { command, .. } | Self::Unsuccessful { command, .. } => command.as_ref(),
        }
    }
}

/// Runs the tool to completion, streaming its output to the user.
///
/// stdio is inherited so compiler and clone progress stay visible; the
/// recipe never parses tool output.
#[expect(clippy::shadow_reuse, reason = "this is intended")]
pub(crate) fn run_tool(command: impl Into<Command>) -> Result<(), ToolError> {
    let mut command = command.into();
    log::debug!("running `{command:?}`");
    let status = match command.status() {
        Ok(status) => status,
        Err(source) => return Err(ToolError::spawn(command, source)),
    };
    if !status.success() {
        return Err(ToolError::unsuccessful(command, status));
    }
    Ok(())
}
