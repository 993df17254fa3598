use std::marker::PhantomData;

use slotmap::new_key_type;

new_key_type! {
    /// Key of a node in the tree arena. Keys carry a version, so a key to a
    /// destroyed node fails lookups rather than reaching a newer node.
    pub struct NodeId;
}

/// A node key that remembers the widget type it was created with.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TypedId<T> {
    /// Node key.
    id: NodeId,
    /// Marker for the widget type.
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedId<T> {
    /// Tag a node key with a widget type.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// The node key.
    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedId<T> {}

impl<T> From<TypedId<T>> for NodeId {
    fn from(value: TypedId<T>) -> Self {
        value.id
    }
}
