//! Scene and chapter type encodings.
//!
//! yWriter stores the logical type of scenes and chapters across several
//! elements whose meaning changed between releases. These functions map
//! between those elements and [`ContentType`] without touching any tree.
//!
//! Scene type as written by yWriter 7.1.3.0:
//!
//! | Type   | `<Unused>` | `Field_SceneType` |
//! |--------|------------|-------------------|
//! | Normal | absent     | absent            |
//! | Notes  | `-1`       | `1`               |
//! | Todo   | `-1`       | `2`               |
//! | Unused | `-1`       | `0`               |
//!
//! Chapter type as written by yWriter 7.1.3.0 (`<Type>` is the encoding
//! used before 7.0.7.2):
//!
//! | Type   | `<Unused>` | `<Type>` | `<ChapterType>` |
//! |--------|------------|----------|-----------------|
//! | Normal | absent     | `0`      | `0`             |
//! | Notes  | `-1`       | `1`      | `1`             |
//! | Todo   | `-1`       | `1`      | `2`             |
//! | Unused | `-1`       | `1`      | `0`             |

use crate::models::ContentType;

/// How a scene type is spelled in a `<SCENE>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneTypeCode {
    /// `<Unused>` marker present
    pub unused: bool,
    /// `<Fields><Field_SceneType>` value, `None` to remove the field
    pub scene_type: Option<&'static str>,
}

/// How a chapter type is spelled in a `<CHAPTER>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterTypeCode {
    /// `<Unused>` marker present
    pub unused: bool,
    /// Legacy `<Type>` value
    pub legacy_type: &'static str,
    /// `<ChapterType>` value
    pub chapter_type: &'static str,
}

/// Encodes a scene type.
pub const fn encode_scene_type(kind: ContentType) -> SceneTypeCode {
    let (unused, scene_type) = match kind {
        ContentType::Normal => (false, None),
        ContentType::Notes => (true, Some("1")),
        ContentType::Todo => (true, Some("2")),
        ContentType::Unused => (true, Some("0")),
    };
    SceneTypeCode { unused, scene_type }
}

/// Decodes a scene type.
///
/// An explicit `Field_SceneType` of `1` or `2` wins; otherwise the
/// `<Unused>` marker makes the scene unused.
pub fn decode_scene_type(scene_type: Option<&str>, unused: bool) -> ContentType {
    match scene_type {
        Some("1") => ContentType::Notes,
        Some("2") => ContentType::Todo,
        _ if unused => ContentType::Unused,
        _ => ContentType::Normal,
    }
}

/// Encodes a chapter type.
pub const fn encode_chapter_type(kind: ContentType) -> ChapterTypeCode {
    let (unused, legacy_type, chapter_type) = match kind {
        ContentType::Normal => (false, "0", "0"),
        ContentType::Notes => (true, "1", "1"),
        ContentType::Todo => (true, "1", "2"),
        ContentType::Unused => (true, "1", "0"),
    };
    ChapterTypeCode {
        unused,
        legacy_type,
        chapter_type,
    }
}

/// Decodes a chapter type.
///
/// Arguments are the texts of `<ChapterType>` and `<Type>` (`None` when the
/// element is missing, `Some("")` when it is empty) and whether `<Unused>`
/// is present. `<ChapterType>` takes precedence; a file with neither
/// element is normal regardless of `<Unused>`.
pub fn decode_chapter_type(
    chapter_type: Option<&str>,
    legacy_type: Option<&str>,
    unused: bool,
) -> ContentType {
    match (chapter_type, legacy_type) {
        (Some("2"), _) => ContentType::Todo,
        (Some("1"), _) => ContentType::Notes,
        (Some(_), _) if unused => ContentType::Unused,
        (Some(_), _) => ContentType::Normal,
        (None, Some("1")) => ContentType::Notes,
        (None, Some(_)) if unused => ContentType::Unused,
        (None, _) => ContentType::Normal,
    }
}
