//! Text pass that turns serialized XML into yWriter's dialect.
//!
//! The tree serializer escapes markup characters and never emits CDATA.
//! yWriter expects a declaration line, free-form text wrapped in CDATA
//! sections, and that text unescaped. The element names are listed in
//! [`CDATA_TAGS`].

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::constants::{CDATA_TAGS, XML_DECLARATION};

/// Applies the yWriter serialization conventions to XML text.
///
/// 1. Prepends the XML declaration on its own line.
/// 2. Wraps the text of every element in [`CDATA_TAGS`] in CDATA, at any
///    nesting depth. A line break right after the opening or before the
///    closing marker is dropped.
/// 3. Unescapes XML entities.
///
/// Empty elements (`<Desc />`) are left alone.
///
/// # Errors
///
/// Returns an error if the text contains an unknown or malformed entity
/// reference.
pub fn postprocess_xml(xml: &str) -> Result<String> {
    let mut lines = vec![XML_DECLARATION.to_string()];
    for line in xml.split('\n') {
        let mut line = line.to_string();
        for tag in CDATA_TAGS {
            line = line
                .replace(&format!("<{tag}>"), &format!("<{tag}><![CDATA["))
                .replace(&format!("</{tag}>"), &format!("]]></{tag}>"));
        }
        lines.push(line);
    }

    let text = lines
        .join("\n")
        .replace("[CDATA[ \n", "[CDATA[")
        .replace("\n]]", "]]");

    let text = quick_xml::escape::unescape(&text)
        .context("Serialized XML contains an invalid entity reference")?;
    Ok(text.into_owned())
}

/// Postprocesses an XML file in place.
///
/// Works for any yWriter-generated XML file, not only `.yw7` projects.
///
/// # Errors
///
/// Returns an error if the file cannot be read, transformed or written.
pub fn postprocess_xml_file(path: &Path) -> Result<()> {
    let xml = fs::read_to_string(path)
        .with_context(|| format!("Can not process file: {}", path.display()))?;
    let text = postprocess_xml(&xml)?;
    fs::write(path, text).with_context(|| format!("Cannot write file: {}", path.display()))
}
