//! Custom fields ("keyword variables") stored under an entity's `<Fields>`.
//!
//! Every entity kind recognizes a closed set of field names. The sets are
//! versioned with the file format: kinds that define no custom fields in
//! this revision use the uninhabited [`NoField`].

use std::collections::BTreeMap;
use std::fmt;

/// A recognized custom field name.
pub trait CustomField: Copy + Ord + fmt::Debug + 'static {
    /// Every recognized field, in writing order.
    const ALL: &'static [Self];

    /// The XML tag inside `<Fields>`.
    fn tag(self) -> &'static str;
}

/// Project-level custom fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProjectField {
    /// Document language, written by yWriter 7.6 to 7.10
    LanguageCode,
    /// Document country, written by yWriter 7.6 to 7.10
    CountryCode,
}

impl CustomField for ProjectField {
    const ALL: &'static [Self] = &[Self::LanguageCode, Self::CountryCode];

    fn tag(self) -> &'static str {
        match self {
            Self::LanguageCode => "Field_LanguageCode",
            Self::CountryCode => "Field_CountryCode",
        }
    }
}

/// Scene-level custom fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SceneField {
    /// `;`-separated arc tags
    SceneArcs,
    /// Free-form scene style
    SceneStyle,
}

impl CustomField for SceneField {
    const ALL: &'static [Self] = &[Self::SceneArcs, Self::SceneStyle];

    fn tag(self) -> &'static str {
        match self {
            Self::SceneArcs => "Field_SceneArcs",
            Self::SceneStyle => "Field_SceneStyle",
        }
    }
}

/// Field set of entity kinds without custom fields in this format revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NoField {}

impl CustomField for NoField {
    const ALL: &'static [Self] = &[];

    fn tag(self) -> &'static str {
        match self {}
    }
}

/// Chapter custom fields.
pub type ChapterField = NoField;
/// Character custom fields.
pub type CharacterField = NoField;
/// Location and item custom fields.
pub type WorldElementField = NoField;
/// Project note custom fields.
pub type ProjectNoteField = NoField;

/// Values of one entity's recognized custom fields.
///
/// `None` and the empty string both mean "not present in the file"; the
/// writer removes such fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordVars<F: CustomField> {
    values: BTreeMap<F, Option<String>>,
}

impl<F: CustomField> Default for KeywordVars<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: CustomField> KeywordVars<F> {
    /// Creates a map with every field absent.
    pub fn new() -> Self {
        Self {
            values: F::ALL.iter().map(|&field| (field, None)).collect(),
        }
    }

    /// Marks every recognized field as absent.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Returns the raw value, which may be empty.
    pub fn get(&self, field: F) -> Option<&str> {
        self.values.get(&field).and_then(Option::as_deref)
    }

    /// Returns the value if it is non-empty.
    pub fn value(&self, field: F) -> Option<&str> {
        self.get(field).filter(|value| !value.is_empty())
    }

    /// Checks whether the field would be written.
    pub fn is_set(&self, field: F) -> bool {
        self.value(field).is_some()
    }

    /// Sets or clears a field.
    pub fn set(&mut self, field: F, value: Option<String>) {
        self.values.insert(field, value);
    }

    /// Replaces every non-empty value with an empty string, so the next
    /// write removes the field from the file.
    ///
    /// Returns `true` if any value was discarded.
    pub fn blank_all(&mut self) -> bool {
        let mut changed = false;
        for value in self.values.values_mut() {
            if value.as_deref().is_some_and(|v| !v.is_empty()) {
                *value = Some(String::new());
                changed = true;
            }
        }
        changed
    }

    /// Iterates over all recognized fields with their raw values.
    pub fn iter(&self) -> impl Iterator<Item = (F, Option<&str>)> + '_ {
        F::ALL.iter().map(move |&field| (field, self.get(field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_has_every_field_absent() {
        let vars = KeywordVars::<SceneField>::new();
        let all: Vec<_> = vars.iter().collect();
        assert_eq!(all, vec![(SceneField::SceneArcs, None), (SceneField::SceneStyle, None)]);
    }

    #[test]
    fn test_empty_value_is_not_set() {
        let mut vars = KeywordVars::<ProjectField>::new();
        vars.set(ProjectField::LanguageCode, Some(String::new()));
        assert_eq!(vars.get(ProjectField::LanguageCode), Some(""));
        assert!(!vars.is_set(ProjectField::LanguageCode));

        vars.set(ProjectField::LanguageCode, Some("de".to_string()));
        assert_eq!(vars.value(ProjectField::LanguageCode), Some("de"));
    }

    #[test]
    fn test_blank_all_reports_changes() {
        let mut vars = KeywordVars::<SceneField>::new();
        assert!(!vars.blank_all());

        vars.set(SceneField::SceneStyle, Some("noir".to_string()));
        assert!(vars.blank_all());
        assert_eq!(vars.get(SceneField::SceneStyle), Some(""));
        assert!(!vars.blank_all());
    }

    #[test]
    fn test_tags() {
        assert_eq!(SceneField::SceneArcs.tag(), "Field_SceneArcs");
        assert_eq!(ProjectField::CountryCode.tag(), "Field_CountryCode");
        assert!(NoField::ALL.is_empty());
    }
}
