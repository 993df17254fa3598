use trellis_geom::{Anchor, Point, Rect, Size, SubPixel};

use super::id::NodeId;
use crate::widget::Widget;

/// Layout state of a node.
///
/// A node is `Computing` for the whole of its layout pass, including the
/// anchor cascade into its children. Invalidation requests that arrive
/// while a node is computing are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutState {
    /// No layout pass is running.
    #[default]
    Idle,
    /// A layout pass is running.
    Computing,
}

/// Per-node data stored in the Core arena.
pub struct Node {
    /// Widget implementation. `None` while the widget is checked out.
    pub(crate) widget: Option<Box<dyn Widget>>,
    /// Node name, used in logs and error messages.
    pub(crate) name: String,
    /// Parent node, if attached.
    pub(crate) parent: Option<NodeId>,
    /// Ordered children. Index 0 is the front: hit-tested first, painted last.
    pub(crate) children: Vec<NodeId>,
    /// Rectangle in the parent's content space.
    pub(crate) outer: Rect,
    /// Content rectangle, relative to `outer`.
    pub(crate) inner: Rect,
    /// Minimum outer size.
    pub(crate) size_min: Size,
    /// Maximum outer size.
    pub(crate) size_max: Size,
    /// Edges tracked on parent resize.
    pub(crate) anchor: Anchor,
    /// Derive outer size from children.
    pub(crate) auto_size: bool,
    /// Layout state machine.
    pub(crate) state: LayoutState,
    /// An invalidation arrived while layout was suspended.
    pub(crate) dirty: bool,
    /// An invalidation arrived while the widget was checked out.
    pub(crate) layout_pending: bool,
    /// Centered-anchor remainder.
    pub(crate) subpixel: SubPixel,
    /// Node is on the focus chain.
    pub(crate) has_focus: bool,
    /// Node holds the mouse capture.
    pub(crate) dragged: bool,
    /// Child currently under the pointer.
    pub(crate) hover_child: Option<NodeId>,
    /// Child that last received a click.
    pub(crate) focused_child: Option<NodeId>,
    /// Popup opened on right click.
    pub(crate) context_menu: Option<NodeId>,
    /// Node that receives children added to this one.
    pub(crate) content_target: Option<NodeId>,
    /// Completed layout passes.
    pub(crate) layout_passes: u64,
    /// Cached from the widget: overlay kind.
    pub(crate) overlay: bool,
    /// Cached from the widget: child limit.
    pub(crate) max_children: Option<usize>,
    /// Cached from the widget: re-layout when a child's layout changes.
    pub(crate) reflow: bool,
}

impl Node {
    /// Construct a detached node around a widget.
    pub(crate) fn new(widget: Box<dyn Widget>, name: String) -> Self {
        let overlay = widget.overlay();
        let max_children = widget.max_children();
        let reflow = widget.reflow_on_child_change();
        let size = widget.initial_size();
        let auto_size = widget.initial_auto_size();
        Self {
            widget: Some(widget),
            name,
            parent: None,
            children: Vec::new(),
            outer: Rect::from_parts(Point::zero(), size),
            inner: Rect::zero(),
            size_min: Size::zero(),
            size_max: Size::MAX,
            anchor: Anchor::default(),
            auto_size,
            state: LayoutState::Idle,
            dirty: false,
            layout_pending: false,
            subpixel: SubPixel::default(),
            has_focus: false,
            dragged: false,
            hover_child: None,
            focused_child: None,
            context_menu: None,
            content_target: None,
            layout_passes: 0,
            overlay,
            max_children,
            reflow,
        }
    }

    /// Node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent node id.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in front-to-back order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Outer rectangle in the parent's content space.
    pub fn outer(&self) -> Rect {
        self.outer
    }

    /// Content rectangle relative to the outer origin.
    pub fn inner(&self) -> Rect {
        self.inner
    }

    /// Anchor flags.
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Is the outer size derived from children?
    pub fn auto_size(&self) -> bool {
        self.auto_size
    }

    /// Minimum outer size.
    pub fn size_min(&self) -> Size {
        self.size_min
    }

    /// Maximum outer size.
    pub fn size_max(&self) -> Size {
        self.size_max
    }

    /// Current layout state.
    pub fn layout_state(&self) -> LayoutState {
        self.state
    }

    /// Is this node on the focus chain?
    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Does this node itself hold the mouse capture?
    pub fn dragged(&self) -> bool {
        self.dragged
    }

    /// Child currently under the pointer.
    pub fn hover_child(&self) -> Option<NodeId> {
        self.hover_child
    }

    /// Child that last received a click.
    pub fn focused_child(&self) -> Option<NodeId> {
        self.focused_child
    }

    /// Attached popup.
    pub fn context_menu(&self) -> Option<NodeId> {
        self.context_menu
    }

    /// Is this an overlay-kind node?
    pub fn overlay(&self) -> bool {
        self.overlay
    }

    /// Number of completed layout passes.
    pub fn layout_passes(&self) -> u64 {
        self.layout_passes
    }
}
