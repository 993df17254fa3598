//! Built-in container widgets.

/// Flow layout.
pub mod flow;
/// Floating window.
pub mod form;
/// Bordered group panel.
pub mod group;
/// Context menu and its entries.
pub mod menu;
/// Root widget.
pub(crate) mod root;
/// Scroll view.
pub mod scroll;
/// Two-slot split layout.
pub mod split;

pub use flow::{Flow, FlowDirection};
pub use form::Form;
pub use group::Group;
pub use menu::{ContextMenu, MenuItem};
pub use root::Root;
pub use scroll::{ScrollContent, ScrollView};
pub use split::Split;
