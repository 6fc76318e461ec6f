//! Scenes and their derived text statistics.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::ids::{join_list, split_list};
use crate::models::{ContentType, KeywordVars, SceneField};

static WORD_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("--|—|–").expect("word separator pattern is valid"));

static NON_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)\[.+?\]|/\*.+?\*/|-|^>").expect("non-word pattern is valid")
});

static NON_LETTERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[.+?\]|/\*.+?\*/|\n|\r").expect("non-letter pattern is valid")
});

/// Counts the words of yWriter scene text.
///
/// Dashes (`--`, em dash, en dash) separate words. Markup in brackets,
/// `/* comments */`, hyphens and quote markers at line start are not counted.
pub fn count_words(text: &str) -> usize {
    let text = WORD_SEPARATORS.replace_all(text, " ");
    let text = NON_WORDS.replace_all(&text, "");
    text.split_whitespace().count()
}

/// Counts the characters of yWriter scene text, ignoring markup, comments and
/// line breaks.
pub fn count_letters(text: &str) -> usize {
    NON_LETTERS.replace_all(text, "").chars().count()
}

/// A scene: the unit of text in a yWriter project.
///
/// Optional fields follow one rule: `None` means "leave the file as it is",
/// any value (including an empty string) is written. Relationship lists
/// additionally distinguish `None` ("not evaluated") from an empty list
/// ("evaluated, nothing selected").
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scene {
    /// Scene title
    pub title: Option<String>,
    /// Scene summary
    pub desc: Option<String>,
    content: Option<String>,
    word_count: usize,
    letter_count: usize,
    /// Manuscript membership
    pub scene_type: ContentType,
    /// Excluded from RTF export
    pub do_not_export: bool,
    /// Completion status (1 = outline ... 5 = done)
    pub status: Option<u32>,
    /// Author's notes
    pub notes: Option<String>,
    /// Tags
    pub tags: Option<Vec<String>>,
    /// Rating field 1
    pub field1: Option<String>,
    /// Rating field 2
    pub field2: Option<String>,
    /// Rating field 3
    pub field3: Option<String>,
    /// Rating field 4
    pub field4: Option<String>,
    /// Appended to the previous scene without a separator
    pub append_to_prev: bool,
    /// Absolute date, `YYYY-MM-DD`
    pub date: Option<String>,
    /// Absolute time, `hh:mm:ss`
    pub time: Option<String>,
    /// Relative day
    pub day: Option<String>,
    /// Relative hour
    pub hour: Option<String>,
    /// Relative minute
    pub minute: Option<String>,
    /// Duration in days
    pub lasts_days: Option<String>,
    /// Duration in hours
    pub lasts_hours: Option<String>,
    /// Duration in minutes
    pub lasts_minutes: Option<String>,
    /// Reaction scene (sequel) rather than action scene
    pub is_reaction_scene: bool,
    /// Belongs to a subplot
    pub is_subplot: bool,
    /// Goal (action) or reaction
    pub goal: Option<String>,
    /// Conflict (action) or dilemma
    pub conflict: Option<String>,
    /// Outcome (action) or choice
    pub outcome: Option<String>,
    /// Path of the scene image
    pub image: Option<String>,
    /// IDs of the characters in the scene
    pub characters: Option<Vec<String>>,
    /// IDs of the locations of the scene
    pub locations: Option<Vec<String>>,
    /// IDs of the items in the scene
    pub items: Option<Vec<String>>,
    /// Custom fields
    pub kw_vars: KeywordVars<SceneField>,
    /// `;`-separated arc tags, mirrored into `Field_SceneArcs` on write
    pub scn_arcs: Option<String>,
    /// Scene style, mirrored into `Field_SceneStyle` on write
    pub scn_style: Option<String>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// The scene text.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Replaces the scene text and recomputes the word and letter counts.
    pub fn set_content(&mut self, content: Option<String>) {
        let text = content.as_deref().unwrap_or_default();
        self.word_count = count_words(text);
        self.letter_count = count_letters(text);
        self.content = content;
    }

    /// Number of words in the scene text.
    pub const fn word_count(&self) -> usize {
        self.word_count
    }

    /// Number of letters in the scene text.
    pub const fn letter_count(&self) -> usize {
        self.letter_count
    }

    /// Arc tags as a list.
    pub fn arcs(&self) -> Vec<String> {
        self.scn_arcs.as_deref().map(split_list).unwrap_or_default()
    }

    /// Replaces the arc tags. An empty list stores an empty string, so the
    /// custom field is removed on the next write.
    pub fn set_arcs<S: AsRef<str>>(&mut self, arcs: &[S]) {
        self.scn_arcs = Some(join_list(arcs));
    }
}
