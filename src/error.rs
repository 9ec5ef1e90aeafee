use std::error::Error;
use std::fmt;

use miette::{miette, Report, Severity};

/// The emulator module could not be produced or initialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    EmptyImage,
    Io { path: String, reason: String },
    /// Reported by the module's own initialization entry point.
    Module { reason: String },
}

/// An instruction could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The module reported an operand width other than 0, 1, or 2, so the next instruction
    /// address is unknown.
    InvalidOperandSize { address: u16, opcode: u8, size: u8 },
}

/// A session operation failed. None of these are retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// Persistent: every later `initialize` returns the same error.
    Load(LoadError),
    /// An operation which needs a loaded module was called before `initialize`.
    Uninitialized,
    Decode(DecodeError),
}

impl Error for LoadError {}
impl Error for DecodeError {}
impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(error) => Some(error),
            Self::Decode(error) => Some(error),
            Self::Uninitialized => None,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyImage => write!(f, "ROM image is empty"),
            Self::Io { path, reason } => write!(f, "Cannot read `{}`: {}", path, reason),
            Self::Module { reason } => write!(f, "Module failed to initialize: {}", reason),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOperandSize {
                address,
                opcode,
                size,
            } => write!(
                f,
                "Opcode 0x{:02x} at 0x{:04x} has operand size {}, expected 0, 1, or 2",
                opcode, address, size
            ),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(error) => write!(f, "Failed to load emulator: {}", error),
            Self::Uninitialized => write!(f, "Emulator is not initialized"),
            Self::Decode(error) => write!(f, "Failed to decode instruction: {}", error),
        }
    }
}

impl From<LoadError> for SessionError {
    fn from(error: LoadError) -> Self {
        Self::Load(error)
    }
}

impl From<DecodeError> for SessionError {
    fn from(error: DecodeError) -> Self {
        Self::Decode(error)
    }
}

// Reports for the command line

pub fn session_failed(error: &SessionError) -> Report {
    let (code, help) = match error {
        SessionError::Load(LoadError::Io { .. }) => (
            "rom::read",
            "check the path points to a Game Boy ROM image (.gb or .gbc)",
        ),
        SessionError::Load(_) => (
            "session::load",
            "the emulator module could not start; the session cannot continue",
        ),
        SessionError::Decode(_) => (
            "session::decode",
            "the module reported an operand size which cannot be decoded",
        ),
        SessionError::Uninitialized => (
            "session::uninitialized",
            "this is a bug: the session was used before it was initialized",
        ),
    };
    miette!(
        severity = Severity::Error,
        code = code,
        help = help,
        "{error}",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let error = SessionError::from(DecodeError::InvalidOperandSize {
            address: 0x0150,
            opcode: 0xd3,
            size: 3,
        });
        assert_eq!(
            error.to_string(),
            "Failed to decode instruction: Opcode 0xd3 at 0x0150 has operand size 3, \
             expected 0, 1, or 2"
        );
        assert_eq!(
            SessionError::from(LoadError::EmptyImage).to_string(),
            "Failed to load emulator: ROM image is empty"
        );
        assert!(error.source().is_some());
        assert!(SessionError::Uninitialized.source().is_none());
    }
}
