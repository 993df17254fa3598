//! Trellis: a retained-mode control tree.
//!
//! Trellis keeps a tree of rectangular controls in an arena, lays them out
//! with per-edge anchors and autosizing, routes pointer and keyboard input
//! through hit testing and a focus chain, and paints the tree back to front
//! through a clipped drawing backend supplied by the host.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Gui`] - The root controller translating host events and frames
//! - [`Core`] - The node arena and layout engine
//! - [`Widget`] - The trait implemented by all widgets
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives (Rect, Point, Size, Insets, Anchor)
//! - [`widgets`] - Built-in containers: flow, group, split, scroll, form
//!   and context menu

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

// Public modules
pub mod widget;
pub mod widgets;

pub use trellis_geom as geom;

#[cfg(any(test, feature = "testing"))]
pub use core::testing;
// Re-export core types
pub use core::{
    Context, Core, Disposer, FrameStats, GpuResource, Gui, HostEvent, LayoutCtx, LayoutState, Node,
    NodeBuilder, NodeId, Options, TypedId, ViewContext,
};
pub use core::{dispose, error, event, layout, options, render, text};
// Re-export widget trait and event outcome
pub use widget::{EventOutcome, Widget};
