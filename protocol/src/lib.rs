//! Text line protocol shared by the sketch server and its clients.
//!
//! Every mutation of a sketch travels as one newline-terminated line of
//! whitespace-separated fields:
//!
//! ```text
//! draw <shape-serialization...>
//! move <id> <dx> <dy>
//! recolor <id> <color-int>
//! delete <id>
//! ```
//!
//! There is no snapshot message: a newly connected client is seeded with one
//! `draw` line per existing shape. [`Command`] is the typed form of a line;
//! [`LineCodec`] frames lines on a byte stream.

pub mod codec;

use std::fmt;
use std::str::FromStr;

use canvas::{Color, ParseError, Shape, ShapeId, Sketch};

pub use codec::{Inbound, LineCodec};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Well-known TCP port the server listens on.
pub const DEFAULT_PORT: u16 = 4242;

/// Longest accepted line in bytes, excluding the newline.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

// =============================================================================
// ERRORS
// =============================================================================

/// Grepable error code for structured log fields.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

/// A line that does not decode into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("empty line")]
    Empty,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("{command} expects {expected} arguments, found {found}")]
    WrongArity { command: &'static str, expected: usize, found: usize },
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),
    #[error("invalid shape: {0}")]
    Shape(#[from] ParseError),
    #[error("line exceeds {} bytes", MAX_LINE_BYTES)]
    TooLong,
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

impl ErrorCode for ProtocolError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "E_EMPTY_LINE",
            Self::UnknownCommand(_) => "E_UNKNOWN_COMMAND",
            Self::WrongArity { .. } => "E_WRONG_ARITY",
            Self::InvalidNumber(_) => "E_INVALID_NUMBER",
            Self::Shape(_) => "E_INVALID_SHAPE",
            Self::TooLong => "E_LINE_TOO_LONG",
            Self::InvalidUtf8 => "E_INVALID_UTF8",
        }
    }
}

// =============================================================================
// COMMAND
// =============================================================================

/// One sketch mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append a shape; the receiver assigns the next id.
    Draw(Shape),
    /// Translate a shape by `(dx, dy)`.
    Move { id: ShapeId, dx: i32, dy: i32 },
    /// Replace a shape's color.
    Recolor { id: ShapeId, color: Color },
    /// Remove a shape.
    Delete { id: ShapeId },
}

/// What applying a [`Command`] did to a sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// A `draw` inserted a shape under this id.
    Added(ShapeId),
    /// An existing shape was moved, recolored, or deleted.
    Changed,
    /// The target id was absent; nothing changed.
    Stale,
    /// A `draw` was refused because the sketch has used every id.
    Exhausted,
}

impl Command {
    /// Decode one line (without its newline).
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] for an empty line, unknown verb, wrong
    /// argument count, non-numeric argument, or malformed shape.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let tokens: Vec<&str> = line.split_ascii_whitespace().collect();
        let Some((verb, args)) = tokens.split_first() else {
            return Err(ProtocolError::Empty);
        };

        match *verb {
            "draw" => Ok(Self::Draw(Shape::parse(args)?)),
            "move" => {
                let [id, dx, dy] = arity::<3>("move", args)?;
                Ok(Self::Move { id: int(id)?, dx: int(dx)?, dy: int(dy)? })
            }
            "recolor" => {
                let [id, color] = arity::<2>("recolor", args)?;
                Ok(Self::Recolor { id: int(id)?, color: Color::from_argb(int(color)?) })
            }
            "delete" => {
                let [id] = arity::<1>("delete", args)?;
                Ok(Self::Delete { id: int(id)? })
            }
            other => Err(ProtocolError::UnknownCommand(other.to_owned())),
        }
    }

    /// The leading keyword of this command's line.
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Draw(_) => "draw",
            Self::Move { .. } => "move",
            Self::Recolor { .. } => "recolor",
            Self::Delete { .. } => "delete",
        }
    }

    /// The shape this command addresses, if it addresses an existing one.
    #[must_use]
    pub fn target(&self) -> Option<ShapeId> {
        match self {
            Self::Draw(_) => None,
            Self::Move { id, .. } | Self::Recolor { id, .. } | Self::Delete { id } => Some(*id),
        }
    }

    /// Apply this command to a sketch.
    pub fn apply(&self, sketch: &mut Sketch) -> Applied {
        let changed = match self {
            Self::Draw(shape) => {
                return sketch.add_shape(shape.clone()).map_or(Applied::Exhausted, Applied::Added);
            }
            Self::Move { id, dx, dy } => sketch.move_shape(*id, *dx, *dy),
            Self::Recolor { id, color } => sketch.recolor_shape(*id, *color),
            Self::Delete { id } => sketch.delete_shape(*id),
        };
        if changed { Applied::Changed } else { Applied::Stale }
    }

    /// The line plus its terminating newline.
    #[must_use]
    pub fn encode(&self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draw(shape) => write!(f, "draw {shape}"),
            Self::Move { id, dx, dy } => write!(f, "move {id} {dx} {dy}"),
            Self::Recolor { id, color } => write!(f, "recolor {id} {color}"),
            Self::Delete { id } => write!(f, "delete {id}"),
        }
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn arity<'a, const N: usize>(command: &'static str, args: &[&'a str]) -> Result<[&'a str; N], ProtocolError> {
    <[&'a str; N]>::try_from(args).map_err(|_| ProtocolError::WrongArity { command, expected: N, found: args.len() })
}

fn int(token: &str) -> Result<i32, ProtocolError> {
    token
        .parse()
        .map_err(|_| ProtocolError::InvalidNumber(token.to_owned()))
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
