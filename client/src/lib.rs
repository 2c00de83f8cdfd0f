//! Client side of the shared sketch.
//!
//! | Module | Role |
//! |--------|------|
//! | [`agent`] | Server connection: mirrors remote lines into a local sketch, queues outbound lines |
//! | [`editor`] | Press / drag / release gestures mapped to local changes plus the command to send |
//! | [`error`] | Client error type |
//!
//! A front end owns one [`SharedSketch`](canvas::SharedSketch), hands a clone
//! to both the agent and the editor, renders from
//! [`snapshot`](canvas::SharedSketch::snapshot) and forwards whatever
//! command the editor returns through [`ClientAgent::send`].

pub mod agent;
pub mod editor;
pub mod error;

pub use agent::{ClientAgent, ConnectionStatus, Redraw};
pub use editor::{Editor, Mode, ShapeKind};
pub use error::ClientError;
