use std::{fmt, io};

use super::WriterState;

/// An error that can occur while writing a response.
#[derive(Debug)]
pub enum WriteError {
    /// Operation called out of order, nothing was written.
    State {
        op: &'static str,
        state: WriterState,
    },
    /// Body operation does not match the framing chosen by an earlier body write, e.g: a chunk
    /// after a plain body. Nothing was written.
    Framing { op: &'static str },
    /// Write fault.
    Io(io::Error),
}

impl WriteError {
    /// Returns `true` if the error is a misuse of the writer rather than a transport fault.
    pub fn is_state_violation(&self) -> bool {
        matches!(self, Self::State { .. } | Self::Framing { .. })
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State { op, state } => {
                write!(f, "trying to write {op} when writer state is: {state:?}")
            }
            Self::Framing { op } => write!(f, "cannot write {op} with the current body framing"),
            Self::Io(err) => write!(f, "error when writing: {err}"),
        }
    }
}

impl From<io::Error> for WriteError {
    fn from(v: io::Error) -> Self {
        Self::Io(v)
    }
}
