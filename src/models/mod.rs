//! Document model of a yWriter 7 project.
//!
//! Plain data: the reader fills a [`Novel`] in one pass, callers change
//! fields, the writer consumes it. The only behavior here keeps derived
//! values (word counts, scene types, languages, locale) consistent.

pub mod chapter;
pub mod content_type;
pub mod ids;
pub mod keyword_vars;
pub mod locale;
pub mod novel;
pub mod project_note;
pub mod scene;
pub mod world_element;

// Re-export all model types
pub use chapter::{Chapter, ChapterLevel};
pub use content_type::ContentType;
pub use keyword_vars::{
    ChapterField, CharacterField, CustomField, KeywordVars, NoField, ProjectField,
    ProjectNoteField, SceneField, WorldElementField,
};
pub use novel::Novel;
pub use project_note::ProjectNote;
pub use scene::Scene;
pub use world_element::{Character, WorldElement};
