//! Format-wide constants.
//!
//! This module defines the file naming conventions of yWriter 7 projects and
//! the fixed pieces of the XML dialect that the codec writes back.

/// The name of the library (used for the configuration directory).
pub const APP_NAME: &str = "ywcodec";

/// File extension of yWriter 7 project files, including the leading dot.
pub const YW7_EXTENSION: &str = ".yw7";

/// Suffix of the sentinel file yWriter places next to an open project.
pub const LOCK_SUFFIX: &str = ".lock";

/// Suffix of the backup copy created before a project file is overwritten.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Root element of a freshly built project tree.
pub const ROOT_TAG: &str = "YWRITER7";

/// Value written to `<PROJECT><Ver>`.
pub const FORMAT_VERSION: &str = "7";

/// XML declaration prepended by the postprocessor.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Names of the elements whose text yWriter stores as CDATA.
///
/// The tree serializer never emits CDATA, so the postprocessor wraps the
/// text of every element listed here, at any nesting depth.
pub const CDATA_TAGS: &[&str] = &[
    "Title",
    "AuthorName",
    "Bio",
    "Desc",
    "FieldTitle1",
    "FieldTitle2",
    "FieldTitle3",
    "FieldTitle4",
    "LaTeXHeaderFile",
    "Tags",
    "AKA",
    "ImageFile",
    "FullName",
    "Goals",
    "Notes",
    "RTFFile",
    "SceneContent",
    "Outcome",
    "Goal",
    "Conflict",
];

/// Language code meaning "no linguistic content" (ISO 639-2).
pub const NO_LANGUAGE_CODE: &str = "zxx";

/// Country code paired with [`NO_LANGUAGE_CODE`].
pub const NO_COUNTRY_CODE: &str = "none";

/// Separator of list-valued text fields such as tags and scene arcs.
pub const LIST_SEPARATOR: char = ';';
