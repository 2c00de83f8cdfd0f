//! Line-oriented stand-in for a drawing surface.
//!
//! Each stdin line is one UI event: a toolbar change (`mode`, `shape`,
//! `color`), a pointer gesture (`press`, `drag`, `release`), or an
//! inspection command.

#[cfg(test)]
#[path = "repl_test.rs"]
mod repl_test;

use canvas::{Color, Point};
use client::{ClientError, Mode, ShapeKind};

pub const HELP: &str = "\
commands:
  mode <draw|move|recolor|delete>
  shape <ellipse|rectangle|freehand|segment>
  color <black|white|red|green|blue> | color <r> <g> <b>
  press <x> <y>     drag <x> <y>     release
  raw <protocol line>
  list | help | quit";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReplError {
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("not a number: {0:?}")]
    InvalidNumber(String),
    #[error("{0}")]
    Option(String),
}

impl From<ClientError> for ReplError {
    fn from(e: ClientError) -> Self {
        Self::Option(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Mode(Mode),
    Shape(ShapeKind),
    Color(Color),
    Press(Point),
    Drag(Point),
    Release,
    Raw(String),
    List,
    Help,
    Quit,
}

impl ReplCommand {
    /// Parse one input line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ReplError`] for unknown commands or bad arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, ReplError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let args: Vec<&str> = rest.split_ascii_whitespace().collect();

        let command = match (word, args.as_slice()) {
            ("mode", [mode]) => Self::Mode(mode.parse()?),
            ("mode", _) => return Err(ReplError::Usage("mode <draw|move|recolor|delete>")),
            ("shape", [kind]) => Self::Shape(kind.parse()?),
            ("shape", _) => return Err(ReplError::Usage("shape <ellipse|rectangle|freehand|segment>")),
            ("color", [name]) => Self::Color(named_color(name)?),
            ("color", [r, g, b]) => Self::Color(Color::from_rgb(channel(r)?, channel(g)?, channel(b)?)),
            ("color", _) => return Err(ReplError::Usage("color <name> | color <r> <g> <b>")),
            ("press", [x, y]) => Self::Press(point(x, y)?),
            ("press", _) => return Err(ReplError::Usage("press <x> <y>")),
            ("drag", [x, y]) => Self::Drag(point(x, y)?),
            ("drag", _) => return Err(ReplError::Usage("drag <x> <y>")),
            ("release", []) => Self::Release,
            ("raw", [_, ..]) => Self::Raw(rest.trim().to_owned()),
            ("raw", []) => return Err(ReplError::Usage("raw <protocol line>")),
            ("list", []) => Self::List,
            ("help", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            (other, _) => return Err(ReplError::Unknown(other.to_owned())),
        };
        Ok(Some(command))
    }
}

fn named_color(name: &str) -> Result<Color, ReplError> {
    match name {
        "black" => Ok(Color::BLACK),
        "white" => Ok(Color::WHITE),
        "red" => Ok(Color::RED),
        "green" => Ok(Color::GREEN),
        "blue" => Ok(Color::BLUE),
        other => Err(ReplError::Option(format!("unknown color: {other:?}"))),
    }
}

fn channel(token: &str) -> Result<u8, ReplError> {
    token
        .parse()
        .map_err(|_| ReplError::InvalidNumber(token.to_owned()))
}

fn point(x: &str, y: &str) -> Result<Point, ReplError> {
    let parse = |t: &str| t.parse::<i32>().map_err(|_| ReplError::InvalidNumber(t.to_owned()));
    Ok(Point::new(parse(x)?, parse(y)?))
}
