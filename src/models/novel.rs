//! The project as a whole.

use std::collections::BTreeMap;

use crate::constants::{NO_COUNTRY_CODE, NO_LANGUAGE_CODE};
use crate::models::locale::{scan_languages, system_locale};
use crate::models::{
    Chapter, Character, ContentType, KeywordVars, ProjectField, ProjectNote, Scene, WorldElement,
};

/// A yWriter project.
///
/// Each entity kind is held twice: a map from ID to content, and (except
/// for scenes) a vector giving the display order. Every ID in an order
/// vector must have an entry in its map. Scene order comes from the
/// chapters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Novel {
    /// Book title
    pub title: Option<String>,
    /// Book summary
    pub desc: Option<String>,
    /// Author name
    pub author_name: Option<String>,
    /// Author biography
    pub author_bio: Option<String>,
    /// Titles of the four scene rating fields
    pub field_titles: [Option<String>; 4],
    /// Word count when the word target was set
    pub word_count_start: Option<u32>,
    /// Word target
    pub word_target: Option<u32>,
    /// Document language, ISO 639-1
    pub language_code: Option<String>,
    /// Document country, ISO 3166
    pub country_code: Option<String>,
    /// Languages marked up inline in scene text; `None` until determined
    pub languages: Option<Vec<String>>,
    /// Custom fields
    pub kw_vars: KeywordVars<ProjectField>,

    /// Chapters by ID
    pub chapters: BTreeMap<String, Chapter>,
    /// Chapter IDs in book order
    pub chapter_order: Vec<String>,
    /// Scenes by ID
    pub scenes: BTreeMap<String, Scene>,
    /// Locations by ID
    pub locations: BTreeMap<String, WorldElement>,
    /// Location IDs in display order
    pub location_order: Vec<String>,
    /// Items by ID
    pub items: BTreeMap<String, WorldElement>,
    /// Item IDs in display order
    pub item_order: Vec<String>,
    /// Characters by ID
    pub characters: BTreeMap<String, Character>,
    /// Character IDs in display order
    pub character_order: Vec<String>,
    /// Project notes by ID
    pub project_notes: BTreeMap<String, ProjectNote>,
    /// Project note IDs in display order
    pub project_note_order: Vec<String>,
}

impl Novel {
    /// Creates an empty project.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ID of the first chapter, in book order, that lists the scene.
    pub fn chapter_of(&self, scene_id: &str) -> Option<&str> {
        self.chapter_order
            .iter()
            .find(|id| {
                self.chapters
                    .get(id.as_str())
                    .is_some_and(|chapter| chapter.contains_scene(scene_id))
            })
            .map(String::as_str)
    }

    /// Returns scene IDs in reading order: chapter by chapter, skipping IDs
    /// without a scene entry.
    pub fn scenes_in_order(&self) -> Vec<&str> {
        self.chapter_order
            .iter()
            .filter_map(|id| self.chapters.get(id))
            .flat_map(|chapter| chapter.scenes.iter())
            .map(String::as_str)
            .filter(|id| self.scenes.contains_key(*id))
            .collect()
    }

    /// Makes the scenes of every non-normal chapter take the chapter's type.
    pub fn adjust_scene_types(&mut self) {
        for chapter_id in &self.chapter_order {
            let Some(chapter) = self.chapters.get(chapter_id) else {
                continue;
            };
            if chapter.chapter_type == ContentType::Normal {
                continue;
            }
            for scene_id in &chapter.scenes {
                if let Some(scene) = self.scenes.get_mut(scene_id) {
                    scene.scene_type = chapter.chapter_type;
                }
            }
        }
    }

    /// Determines the languages marked up in scene text.
    ///
    /// Scenes are scanned in reading order, then any scenes no chapter
    /// lists. The result replaces [`Novel::languages`].
    pub fn get_languages(&mut self) {
        let mut languages: Vec<String> = Vec::new();
        let ordered = self.scenes_in_order();
        let unlisted = self
            .scenes
            .keys()
            .map(String::as_str)
            .filter(|id| !ordered.contains(id));
        for scene_id in ordered.iter().copied().chain(unlisted) {
            let Some(text) = self.scenes.get(scene_id).and_then(Scene::content) else {
                continue;
            };
            for language in scan_languages(text) {
                if !languages.contains(&language) {
                    languages.push(language);
                }
            }
        }
        self.languages = Some(languages);
    }

    /// Checks the document locale against the system locale.
    ///
    /// See [`Novel::check_locale_with`].
    pub fn check_locale(&mut self) {
        self.check_locale_with(system_locale());
    }

    /// Checks the document locale.
    ///
    /// A missing language or country code is replaced by `fallback`, or by
    /// "no language" (`zxx`/`none`) without one. A code pair where either
    /// part is not two characters long is implausible and also becomes
    /// "no language".
    pub fn check_locale_with(&mut self, fallback: Option<(String, String)>) {
        let language = self.language_code.as_deref().unwrap_or_default();
        let country = self.country_code.as_deref().unwrap_or_default();

        if language.is_empty() || country.is_empty() {
            let (language, country) = fallback.unwrap_or_else(no_language);
            self.language_code = Some(language);
            self.country_code = Some(country);
            return;
        }

        if language.chars().count() != 2 || country.chars().count() != 2 {
            let (language, country) = no_language();
            self.language_code = Some(language);
            self.country_code = Some(country);
        }
    }
}

fn no_language() -> (String, String) {
    (NO_LANGUAGE_CODE.to_string(), NO_COUNTRY_CODE.to_string())
}
