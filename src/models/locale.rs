//! Inline language markup and the document locale.
//!
//! Scene text marks foreign-language passages as
//! `[lang=en-AU]Australian text[/lang=en-AU]`. The codes found this way are
//! stored as project variables so yWriter can render them.

use std::env;
use std::sync::LazyLock;

use regex::Regex;

static LANGUAGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[lang=(.*?)\]").expect("language tag pattern is valid"));

/// Returns the language codes of all `[lang=..]` tags in `text`, in order of
/// appearance, without duplicates.
pub fn scan_languages(text: &str) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for capture in LANGUAGE_TAG.captures_iter(text) {
        let code = &capture[1];
        if !languages.iter().any(|known| known == code) {
            languages.push(code.to_string());
        }
    }
    languages
}

/// Parses a POSIX locale name such as `de_DE.UTF-8` into `("de", "DE")`.
///
/// Returns `None` for `C`, `POSIX` and names without a country part.
pub fn parse_locale_name(name: &str) -> Option<(String, String)> {
    let name = name.split(['.', '@']).next().unwrap_or_default();
    if name.is_empty() || name == "C" || name == "POSIX" {
        return None;
    }
    let (language, country) = name.split_once(['_', '-'])?;
    if language.is_empty() || country.is_empty() {
        return None;
    }
    Some((language.to_string(), country.to_string()))
}

/// The process locale as `(language, country)`.
///
/// Consults `LC_ALL`, `LC_CTYPE` and `LANG` in that order; the first one
/// that is set and non-empty decides.
pub fn system_locale() -> Option<(String, String)> {
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.is_empty())
        .and_then(|value| parse_locale_name(&value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_languages_in_order_without_duplicates() {
        let text = "Hi [lang=fr]salut[/lang=fr], [lang=en-AU]g'day[/lang=en-AU] [lang=fr]encore[/lang=fr]";
        assert_eq!(scan_languages(text), vec!["fr", "en-AU"]);
    }

    #[test]
    fn test_scan_languages_ignores_closing_tags() {
        assert!(scan_languages("plain [/lang=fr] text").is_empty());
    }

    #[test]
    fn test_parse_locale_name() {
        assert_eq!(
            parse_locale_name("de_DE.UTF-8"),
            Some(("de".to_string(), "DE".to_string()))
        );
        assert_eq!(
            parse_locale_name("sr_RS@latin"),
            Some(("sr".to_string(), "RS".to_string()))
        );
        assert_eq!(parse_locale_name("C.UTF-8"), None);
        assert_eq!(parse_locale_name("POSIX"), None);
        assert_eq!(parse_locale_name("en"), None);
    }
}
