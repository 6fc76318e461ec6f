//! Chapters and section headings.

use crate::models::{ChapterField, ContentType, KeywordVars};

/// Structural level of a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChapterLevel {
    /// Ordinary chapter
    #[default]
    Chapter = 0,
    /// Starts a new part or section (`<SectionStart>`)
    Section = 1,
}

/// A chapter: an ordered group of scenes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chapter {
    /// Chapter title
    pub title: Option<String>,
    /// Chapter summary
    pub desc: Option<String>,
    /// Chapter or section start
    pub level: ChapterLevel,
    /// Manuscript membership, inherited by the chapter's scenes
    pub chapter_type: ContentType,
    /// Hide the title in exports; forced on by a title starting with `@`
    pub suppress_title: bool,
    /// Run on from the previous chapter without a page break
    pub suppress_break: bool,
    /// Holds deleted scenes
    pub is_trash: bool,
    /// IDs of the chapter's scenes, in reading order
    pub scenes: Vec<String>,
    /// Custom fields
    pub kw_vars: KeywordVars<ChapterField>,
}

impl Chapter {
    /// Creates an empty chapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether the chapter lists the scene.
    pub fn contains_scene(&self, scene_id: &str) -> bool {
        self.scenes.iter().any(|id| id == scene_id)
    }
}
