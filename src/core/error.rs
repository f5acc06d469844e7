//! Error types for the terminal engine.

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TermError {
    #[error("Failed to write to terminal: {0}")]
    Write(#[source] io::Error),

    #[error("Failed to read terminal input: {0}")]
    Read(#[source] io::Error),

    #[error("Failed to switch terminal mode: {0}")]
    RawMode(#[source] io::Error),

    #[error("A terminal session is already active in this process")]
    SessionActive,

    #[error("Select menu needs at least one option")]
    EmptyMenu,

    #[error("Input stream closed")]
    InputClosed,

    #[error("Failed to run editor {command:?}: {source}")]
    Editor {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Editor {command:?} exited with {status}")]
    EditorExit { command: String, status: ExitStatus },
}

pub type Result<T> = std::result::Result<T, TermError>;
