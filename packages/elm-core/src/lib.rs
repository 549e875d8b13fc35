//! Renderer-agnostic half of an Elm-architecture UI framework: the
//! authored node model (C1), the renderer that flattens it into a tree that
//! mirrors the live DOM (C2), and the differ that turns two such trees into
//! a minimal edit script (C3). Nothing in this crate touches a DOM; see
//! `elm-dom-web` for the patcher (C4) and event bridge (C5) that actually
//! apply the edits this crate produces.

pub mod differ;
pub mod edit;
pub mod error;
pub mod event;
pub mod ids;
pub mod node;
pub mod realized;
pub mod render;

#[cfg(feature = "serialize")]
pub mod wire;

pub use differ::{diff_siblings, DiffOutput};
pub use edit::{AttrDelta, Edit, EditBatch, EventDelta};
pub use error::RenderError;
pub use event::EventArg;
pub use ids::{HandlerId, IdGen};
pub use node::{concat, el, empty, keyed, text, ElementBuilder, ElementNode, EventHandler, Key, Node};
pub use realized::{HandlerRef, RealizedElement, RealizedNode};
pub use render::to_realized;
