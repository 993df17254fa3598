//! Core types for the trellis control tree.

// Core modules - public
/// Fluent node construction.
pub mod builder;
/// Context traits handed to widgets.
pub mod context;
/// Deferred resource release.
pub mod dispose;
/// Core error types.
pub mod error;
/// Input event types.
pub mod event;
/// The root controller.
pub mod gui;
/// Node ids.
pub mod id;
/// Invalidation, the anchor cascade and the layout context.
pub mod layout;
/// Node data.
pub mod node;
/// Settings and skins.
pub mod options;
/// Paint traversal and the draw backend.
pub mod render;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// Text measurement.
pub mod text;
/// The node arena.
pub mod world;

// Core modules - internal
/// Input routing.
mod dispatch;

// Public exports from internal modules
pub use builder::NodeBuilder;
pub use context::{Context, ViewContext};
pub use dispose::{Disposer, GpuResource};
pub use gui::{FrameStats, Gui, HostEvent};
pub use id::{NodeId, TypedId};
pub use layout::LayoutCtx;
pub use node::{LayoutState, Node};
pub use options::Options;
pub use world::Core;
