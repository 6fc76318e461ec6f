//! Free-form notes attached to the project.

use crate::models::{KeywordVars, ProjectNoteField};

/// A project note.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectNote {
    /// Title
    pub title: Option<String>,
    /// Note text
    pub desc: Option<String>,
    /// Custom fields
    pub kw_vars: KeywordVars<ProjectNoteField>,
}
