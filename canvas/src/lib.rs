//! Shape model and shared sketch state for the collaborative sketch board.
//!
//! Every process in the system (the broadcast server and each connected
//! client) owns one [`SharedSketch`]. The server's copy is canonical; each
//! client's copy converges to it by applying the same ordered stream of
//! mutations. Rendering and pointer capture live outside this crate and only
//! consume [`Sketch::snapshot`] and [`Sketch::topmost_hit_at`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`shape`] | Shape variants, colors, and their one-line text form |
//! | [`sketch`] | Ordered id → shape store with per-instance id counter |
//! | [`shared`] | Lock-guarded, cloneable handle to a sketch |
//! | [`hit`] | Geometric hit-testing primitives |
//! | [`consts`] | Shared numeric constants (hit tolerance, color masks) |

pub mod consts;
pub mod hit;
pub mod shape;
pub mod shared;
pub mod sketch;

pub use shape::{Color, Corners, ParseError, Point, Shape, ShapeKind};
pub use shared::SharedSketch;
pub use sketch::{ShapeId, Sketch};
