//! Locations, items and characters.

use crate::models::{CharacterField, KeywordVars, WorldElementField};

/// A location or an item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorldElement {
    /// Name
    pub title: Option<String>,
    /// Path of the picture
    pub image: Option<String>,
    /// Description
    pub desc: Option<String>,
    /// Alternate name
    pub aka: Option<String>,
    /// Tags
    pub tags: Option<Vec<String>>,
    /// Custom fields
    pub kw_vars: KeywordVars<WorldElementField>,
}

/// A character.
///
/// Carries the same fields as a [`WorldElement`] plus the character sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Character {
    /// Short name
    pub title: Option<String>,
    /// Path of the portrait
    pub image: Option<String>,
    /// Description
    pub desc: Option<String>,
    /// Alternate name
    pub aka: Option<String>,
    /// Tags
    pub tags: Option<Vec<String>>,
    /// Notes
    pub notes: Option<String>,
    /// Biography
    pub bio: Option<String>,
    /// Goals
    pub goals: Option<String>,
    /// Full name
    pub full_name: Option<String>,
    /// Major (rather than minor) character
    pub is_major: bool,
    /// Custom fields
    pub kw_vars: KeywordVars<CharacterField>,
}
