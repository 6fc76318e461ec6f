//! Patch-or-create editing of child elements.
//!
//! Writing a project back means setting the text of a named child: when the
//! child exists only its text changes, so its position and any attributes or
//! children the model does not know about survive; when it is missing it is
//! inserted. [`ChildEdit`] names the two outcomes, [`set_child_text`] is the
//! single primitive every writer step goes through.

use super::Element;

/// Where a missing child gets inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
    /// Before the child currently at this index (appends when out of range)
    Index(usize),
    /// After the last child
    End,
}

impl InsertAt {
    fn resolve(self, parent: &Element) -> usize {
        match self {
            Self::Index(index) => index.min(parent.children.len()),
            Self::End => parent.children.len(),
        }
    }
}

/// The edit that gives a parent a child with the wanted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildEdit {
    /// The child exists at this index; only its text is replaced.
    Patch(usize),
    /// The child is missing and goes in at this index.
    Insert(usize),
}

impl ChildEdit {
    /// Decides how `tag` would be written into `parent`.
    pub fn plan(parent: &Element, tag: &str, at: InsertAt) -> Self {
        match parent.position(tag) {
            Some(index) => Self::Patch(index),
            None => Self::Insert(at.resolve(parent)),
        }
    }

    /// Index of the child once the edit is applied.
    pub const fn index(self) -> usize {
        match self {
            Self::Patch(index) | Self::Insert(index) => index,
        }
    }

    /// Applies the edit.
    pub fn apply(self, parent: &mut Element, tag: &str, text: &str) {
        match self {
            Self::Patch(index) => parent.children[index].set_text(text),
            Self::Insert(index) => {
                parent.insert(index, Element::with_text(tag, text));
            }
        }
    }
}

/// Sets the text of the first child named `tag`, creating it at `at` if missing.
pub fn set_child_text(parent: &mut Element, tag: &str, text: &str, at: InsertAt) -> ChildEdit {
    let edit = ChildEdit::plan(parent, tag, at);
    edit.apply(parent, tag, text);
    edit
}

/// Like [`set_child_text`], but `None` leaves the parent untouched.
pub fn set_optional_child_text(
    parent: &mut Element,
    tag: &str,
    text: Option<&str>,
    at: InsertAt,
) -> Option<ChildEdit> {
    text.map(|text| set_child_text(parent, tag, text, at))
}

/// Writes a presence flag: `true` sets the child to yWriter's `-1`,
/// creating it if missing; `false` removes it.
pub fn set_flag(parent: &mut Element, tag: &str, on: bool, at: InsertAt) {
    if on {
        set_child_text(parent, tag, "-1", at);
    } else {
        parent.remove(tag);
    }
}

/// Returns the child named `tag`, inserting an empty one at `at` if missing.
pub fn child_or_insert<'a>(parent: &'a mut Element, tag: &str, at: InsertAt) -> &'a mut Element {
    match parent.position(tag) {
        Some(index) => &mut parent.children[index],
        None => {
            let index = at.resolve(parent);
            parent.insert(index, Element::new(tag))
        }
    }
}

/// Running insertion point for writing an ordered run of leading children.
///
/// Every written child advances the cursor by one, so children created for a
/// fresh element come out in writing order right behind its `ID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor(usize);

impl Cursor {
    /// Starts the cursor at `index`.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Current insertion index.
    pub const fn index(self) -> usize {
        self.0
    }

    /// Current position as an insertion target.
    pub const fn at(self) -> InsertAt {
        InsertAt::Index(self.0)
    }

    /// Moves past one child.
    pub fn advance(&mut self) {
        self.0 += 1;
    }

    /// Writes `text` into `tag` at the cursor; `None` leaves both untouched.
    pub fn set(&mut self, parent: &mut Element, tag: &str, text: Option<&str>) {
        if set_optional_child_text(parent, tag, text, self.at()).is_some() {
            self.advance();
        }
    }

    /// Advances past `tag` if the parent has it.
    pub fn skip_if_present(&mut self, parent: &Element, tag: &str) {
        if parent.contains(tag) {
            self.advance();
        }
    }
}
