//! The DOM-facing half of an Elm-architecture UI framework: the patcher
//! (C4) that replays an `elm-dom-core` edit script against a live DOM, the
//! event bridge (C5) that turns a fired DOM event into a dispatched `Msg`,
//! and the `mount`/`App` entry points that tie both to an `Init`/`Update`/
//! `View` loop. See `elm-dom-core` for the renderer-agnostic node model,
//! renderer, and differ this crate patches against.

pub mod bridge;
pub mod dom;
pub mod error;
pub mod mount;
pub mod patch;
pub mod webdom;

#[cfg(any(test, feature = "test-util"))]
pub mod mockdom;

pub use bridge::HandlerRegistry;
pub use dom::DomDocument;
pub use error::PatchError;
pub use mount::{mount, App, MountConfig};
pub use patch::Patcher;
pub use webdom::WebSysDocument;
