/// A draw backend that records calls.
pub mod backend;
/// An instrumented leaf widget.
pub mod probe;
