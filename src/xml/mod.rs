//! Minimal mutable XML element tree.
//!
//! yWriter project files are patched in place, so the codec needs a tree that
//! keeps unknown elements and attributes, can be edited child by child, and
//! serializes deterministically. The tokenizing is done by `quick-xml`; this
//! module owns the tree shape and the small editing vocabulary built on it.

pub mod patch;
pub mod tree;

pub use patch::{ChildEdit, Cursor, InsertAt};
pub use tree::Element;
