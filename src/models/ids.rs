//! ID minting and list-valued text fields.

use crate::constants::LIST_SEPARATOR;

/// Returns the smallest positive integer, as a decimal string, that is not in `used`.
///
/// IDs in yWriter files are opaque strings; non-numeric entries in `used`
/// simply never collide with a minted ID.
pub fn create_id<S: AsRef<str>>(used: &[S]) -> String {
    let mut candidate: u64 = 1;
    while used.iter().any(|id| id.as_ref() == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

/// Splits a `;`-separated field into trimmed, de-duplicated entries.
///
/// Empty entries are dropped; the first occurrence of a duplicate wins.
pub fn split_list(text: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for item in text.split(LIST_SEPARATOR).map(str::trim) {
        if !item.is_empty() && !items.iter().any(|existing| existing == item) {
            items.push(item.to_string());
        }
    }
    items
}

/// Joins list entries with `;`.
pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    let mut text = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            text.push(LIST_SEPARATOR);
        }
        text.push_str(item.as_ref());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_id_fills_first_gap() {
        let empty: [&str; 0] = [];
        assert_eq!(create_id(&empty), "1");
        assert_eq!(create_id(&["1", "2", "4"]), "3");
        assert_eq!(create_id(&["2", "x"]), "1");
        assert_eq!(create_id(&["1", "2", "3"]), "4");
    }

    #[test]
    fn test_split_list_trims_and_dedups() {
        assert_eq!(split_list(" red; blue ;red;;green "), vec!["red", "blue", "green"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_join_list() {
        assert_eq!(join_list(&["a", "b c"]), "a;b c");
        assert_eq!(join_list::<&str>(&[]), "");
    }
}
