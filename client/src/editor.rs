//! Pointer gestures turned into sketch commands.
//!
//! The editor is the press / drag / release state machine behind a drawing
//! surface, with no UI of its own. It mutates the local sketch as the user
//! works and returns the command the caller should send to the server.
//! Every returned command has already been applied locally exactly once;
//! the server never echoes a line back to its sender, so the originator
//! never applies it twice.
//!
//! | Mode | press | drag | release |
//! |------|-------|------|---------|
//! | Draw | start a pending shape at the point | reshape the pending shape | add it, emit `draw` |
//! | Move | grab the topmost shape under the point | translate it, emit `move` | let go |
//! | Recolor | recolor the topmost hit, emit `recolor` | | |
//! | Delete | delete the topmost hit, emit `delete` | | |

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use std::fmt;
use std::str::FromStr;

use canvas::{Color, Point, Shape, ShapeId, SharedSketch};
use protocol::Command;

use crate::error::ClientError;

// =============================================================================
// MODE / SHAPE KIND
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Draw,
    Move,
    Recolor,
    Delete,
}

impl FromStr for Mode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draw" => Ok(Self::Draw),
            "move" => Ok(Self::Move),
            "recolor" => Ok(Self::Recolor),
            "delete" => Ok(Self::Delete),
            other => Err(ClientError::UnknownOption { what: "mode", value: other.to_owned() }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Draw => "draw",
            Self::Move => "move",
            Self::Recolor => "recolor",
            Self::Delete => "delete",
        })
    }
}

/// What a drawing gesture produces. `Freehand` draws a polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeKind {
    #[default]
    Ellipse,
    Rectangle,
    Freehand,
    Segment,
}

impl ShapeKind {
    fn shape_kind(self) -> canvas::ShapeKind {
        match self {
            Self::Ellipse => canvas::ShapeKind::Ellipse,
            Self::Rectangle => canvas::ShapeKind::Rectangle,
            Self::Freehand => canvas::ShapeKind::Polyline,
            Self::Segment => canvas::ShapeKind::Segment,
        }
    }
}

impl FromStr for ShapeKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ellipse" => Ok(Self::Ellipse),
            "rectangle" => Ok(Self::Rectangle),
            "freehand" => Ok(Self::Freehand),
            "segment" => Ok(Self::Segment),
            other => Err(ClientError::UnknownOption { what: "shape", value: other.to_owned() }),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ellipse => "ellipse",
            Self::Rectangle => "rectangle",
            Self::Freehand => "freehand",
            Self::Segment => "segment",
        })
    }
}

// =============================================================================
// EDITOR
// =============================================================================

#[derive(Debug)]
enum Gesture {
    Idle,
    Drawing { anchor: Point, shape: Shape },
    Moving { id: ShapeId, last: Point },
}

pub struct Editor {
    sketch: SharedSketch,
    mode: Mode,
    kind: ShapeKind,
    color: Color,
    gesture: Gesture,
}

impl Editor {
    /// Draw mode, ellipses, black.
    #[must_use]
    pub fn new(sketch: SharedSketch) -> Self {
        Self { sketch, mode: Mode::Draw, kind: ShapeKind::Ellipse, color: Color::BLACK, gesture: Gesture::Idle }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switching mode abandons any gesture in progress.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.gesture = Gesture::Idle;
    }

    #[must_use]
    pub fn shape_kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn set_shape_kind(&mut self, kind: ShapeKind) {
        self.kind = kind;
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// The shape being drawn, not yet part of the sketch.
    #[must_use]
    pub fn pending(&self) -> Option<&Shape> {
        match &self.gesture {
            Gesture::Drawing { shape, .. } => Some(shape),
            _ => None,
        }
    }

    pub fn press(&mut self, p: Point) -> Option<Command> {
        match self.mode {
            Mode::Draw => {
                let shape = Shape::anchored(self.kind.shape_kind(), p, self.color);
                self.gesture = Gesture::Drawing { anchor: p, shape };
                None
            }
            Mode::Move => {
                self.gesture = match self.sketch.topmost_hit_at(p.x, p.y) {
                    Some(id) => Gesture::Moving { id, last: p },
                    None => Gesture::Idle,
                };
                None
            }
            Mode::Recolor => {
                let id = self.sketch.topmost_hit_at(p.x, p.y)?;
                self.sketch.recolor_shape(id, self.color);
                Some(Command::Recolor { id, color: self.color })
            }
            Mode::Delete => {
                let id = self.sketch.topmost_hit_at(p.x, p.y)?;
                self.sketch.delete_shape(id);
                Some(Command::Delete { id })
            }
        }
    }

    pub fn drag(&mut self, p: Point) -> Option<Command> {
        match &mut self.gesture {
            Gesture::Idle => None,
            Gesture::Drawing { anchor, shape } => {
                match shape.kind() {
                    canvas::ShapeKind::Ellipse | canvas::ShapeKind::Rectangle => shape.set_corners(*anchor, p),
                    canvas::ShapeKind::Polyline => shape.push_point(p),
                    canvas::ShapeKind::Segment => shape.set_end(p),
                };
                None
            }
            Gesture::Moving { id, last } => {
                let (dx, dy) = (p.x.saturating_sub(last.x), p.y.saturating_sub(last.y));
                if dx == 0 && dy == 0 {
                    return None;
                }
                *last = p;
                let id = *id;
                if !self.sketch.move_shape(id, dx, dy) {
                    // Deleted by someone else mid-drag.
                    self.gesture = Gesture::Idle;
                    return None;
                }
                Some(Command::Move { id, dx, dy })
            }
        }
    }

    pub fn release(&mut self) -> Option<Command> {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Drawing { shape, .. } => {
                // An exhausted sketch refuses the shape; nothing to send.
                self.sketch.add_shape(shape.clone())?;
                Some(Command::Draw(shape))
            }
            Gesture::Idle | Gesture::Moving { .. } => None,
        }
    }
}
