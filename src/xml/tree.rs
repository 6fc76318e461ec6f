//! Element tree parsing and serialization.

use std::borrow::Cow;

use anyhow::{bail, Context, Result};
use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// An XML element with its attributes, text and child elements.
///
/// Text and children are kept apart the way yWriter uses them: leaf elements
/// carry text, container elements carry children. Whitespace between the
/// children of a container is layout only; it is dropped on parse and
/// regenerated by [`Element::to_indented_xml`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Tag name
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Character data with entity references resolved and CDATA merged in
    pub text: Option<String>,
    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a leaf element holding `text`.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Returns the element's text, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Replaces the element's text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Returns the first direct child named `tag`.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == tag)
    }

    /// Returns the first direct child named `tag`, mutably.
    pub fn find_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|child| child.name == tag)
    }

    /// Returns the text of the first direct child named `tag`.
    ///
    /// `None` covers both a missing child and a child without text.
    pub fn find_text(&self, tag: &str) -> Option<&str> {
        self.find(tag).and_then(Element::text)
    }

    /// Checks whether a direct child named `tag` exists.
    pub fn contains(&self, tag: &str) -> bool {
        self.position(tag).is_some()
    }

    /// Returns the index of the first direct child named `tag`.
    pub fn position(&self, tag: &str) -> Option<usize> {
        self.children.iter().position(|child| child.name == tag)
    }

    /// Iterates over all direct children named `tag`.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == tag)
    }

    /// Iterates mutably over all direct children named `tag`.
    pub fn find_all_mut<'a>(&'a mut self, tag: &'a str) -> impl Iterator<Item = &'a mut Element> + 'a {
        self.children.iter_mut().filter(move |child| child.name == tag)
    }

    /// Collects every element named `tag` in this subtree, depth first,
    /// including the element itself.
    pub fn descendants<'a>(&'a self, tag: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_descendants(tag, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, tag: &str, found: &mut Vec<&'a Element>) {
        if self.name == tag {
            found.push(self);
        }
        for child in &self.children {
            child.collect_descendants(tag, found);
        }
    }

    /// Appends a child and returns it.
    pub fn push(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let index = self.children.len() - 1;
        &mut self.children[index]
    }

    /// Appends a leaf child holding `text` and returns it.
    pub fn push_text(&mut self, tag: &str, text: impl Into<String>) -> &mut Element {
        self.push(Element::with_text(tag, text))
    }

    /// Inserts a child at `index` and returns it.
    ///
    /// An index past the end appends.
    pub fn insert(&mut self, index: usize, child: Element) -> &mut Element {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
        &mut self.children[index]
    }

    /// Removes and returns the first direct child named `tag`.
    pub fn remove(&mut self, tag: &str) -> Option<Element> {
        let index = self.position(tag)?;
        Some(self.children.remove(index))
    }

    /// Removes all direct children named `tag`, returning them in order.
    pub fn remove_all(&mut self, tag: &str) -> Vec<Element> {
        let (removed, kept): (Vec<Element>, Vec<Element>) = std::mem::take(&mut self.children)
            .into_iter()
            .partition(|child| child.name == tag);
        self.children = kept;
        removed
    }

    /// Returns the first direct child named `tag`, appending an empty one if
    /// there is none.
    pub fn find_or_push(&mut self, tag: &str) -> &mut Element {
        match self.position(tag) {
            Some(index) => &mut self.children[index],
            None => self.push(Element::new(tag)),
        }
    }

    /// Parses an XML document into its root element.
    ///
    /// Line ends are normalized to `\n` first, as XML processors do.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed markup, unknown entity references,
    /// a missing root element, or more than one root element.
    pub fn parse(xml: &str) -> Result<Self> {
        let xml = normalize_line_ends(xml);
        let mut reader = Reader::from_str(&xml);
        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let position = reader.buffer_position();
            let event = reader
                .read_event()
                .with_context(|| format!("Malformed XML near byte {position}"))?;

            match event {
                Event::Start(start) => open.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    Self::attach(&mut open, &mut root, element)?;
                }
                Event::End(_) => {
                    let mut element = open.pop().context("Unexpected closing tag")?;
                    element.drop_layout_whitespace();
                    Self::attach(&mut open, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = open.last_mut() {
                        let text = text
                            .unescape()
                            .with_context(|| format!("Invalid character data near byte {position}"))?;
                        current.append_text(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = open.last_mut() {
                        let text = String::from_utf8(data.into_inner().into_owned())
                            .context("CDATA section is not valid UTF-8")?;
                        current.append_text(&text);
                    }
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions and
                // doctypes carry no project data.
                _ => {}
            }
        }

        if let Some(unclosed) = open.last() {
            bail!("Unclosed element <{}>", unclosed.name);
        }

        root.context("Document has no root element")
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8(start.name().as_ref().to_vec())
            .context("Tag name is not valid UTF-8")?;
        let mut element = Self::new(name);

        for attribute in start.attributes() {
            let attribute = attribute
                .with_context(|| format!("Malformed attribute in <{}>", element.name))?;
            let key = String::from_utf8(attribute.key.as_ref().to_vec())
                .context("Attribute name is not valid UTF-8")?;
            let value = attribute
                .unescape_value()
                .with_context(|| format!("Invalid value of attribute {key}"))?
                .into_owned();
            element.attributes.push((key, value));
        }

        Ok(element)
    }

    fn attach(open: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
        if let Some(parent) = open.last_mut() {
            parent.children.push(element);
        } else if root.is_none() {
            *root = Some(element);
        } else {
            bail!("Document has more than one root element");
        }
        Ok(())
    }

    fn append_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.text.get_or_insert_with(String::new).push_str(text);
    }

    fn drop_layout_whitespace(&mut self) {
        if !self.children.is_empty()
            && self.text.as_deref().is_some_and(|text| text.trim().is_empty())
        {
            self.text = None;
        }
    }

    /// Serializes the subtree on a single line.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out, None, 0);
        out
    }

    /// Serializes the subtree with one `indent` per nesting level and a
    /// trailing newline.
    pub fn to_indented_xml(&self, indent: &str) -> String {
        let mut out = String::new();
        self.write_to(&mut out, Some(indent), 0);
        out.push('\n');
        out
    }

    fn write_to(&self, out: &mut String, indent: Option<&str>, level: usize) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }

        let text = self.text.as_deref().filter(|text| !text.is_empty());
        if text.is_none() && self.children.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');

        if let Some(text) = text {
            if self.children.is_empty() || !text.trim().is_empty() {
                out.push_str(&partial_escape(text));
            }
        }

        if !self.children.is_empty() {
            for child in &self.children {
                if let Some(unit) = indent {
                    push_line_break(out, unit, level + 1);
                }
                child.write_to(out, indent, level + 1);
            }
            if let Some(unit) = indent {
                push_line_break(out, unit, level);
            }
        }

        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

fn push_line_break(out: &mut String, unit: &str, level: usize) {
    out.push('\n');
    for _ in 0..level {
        out.push_str(unit);
    }
}

/// Turns `\r\n` and lone `\r` into `\n`.
fn normalize_line_ends(xml: &str) -> Cow<'_, str> {
    if xml.contains('\r') {
        Cow::Owned(xml.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_elements() {
        let root = Element::parse(
            "<?xml version=\"1.0\"?>\n<ROOT>\n  <A x=\"1\">one</A>\n  <B>\n    <C>two</C>\n  </B>\n</ROOT>",
        )
        .unwrap();

        assert_eq!(root.name, "ROOT");
        assert_eq!(root.text, None);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.find_text("A"), Some("one"));
        assert_eq!(root.find("A").unwrap().attributes, vec![("x".to_string(), "1".to_string())]);
        assert_eq!(root.find("B").unwrap().find_text("C"), Some("two"));
    }

    #[test]
    fn test_parse_cdata_and_entities() {
        let root =
            Element::parse("<R><T><![CDATA[a < b & c]]></T><U>x &amp; y</U><E/></R>").unwrap();

        assert_eq!(root.find_text("T"), Some("a < b & c"));
        assert_eq!(root.find_text("U"), Some("x & y"));
        assert!(root.contains("E"));
        assert_eq!(root.find_text("E"), None);
    }

    #[test]
    fn test_parse_normalizes_line_ends() {
        let root = Element::parse(
            "<R>\r\n  <T><![CDATA[a\r\nb\rc]]></T>\r\n  <U>x\r\ny</U>\r\n</R>\r\n",
        )
        .unwrap();

        assert_eq!(root.find_text("T"), Some("a\nb\nc"));
        assert_eq!(root.find_text("U"), Some("x\ny"));
        assert_eq!(root.text, None);
    }

    #[test]
    fn test_parse_keeps_leaf_whitespace() {
        let root = Element::parse("<R><T>  padded </T></R>").unwrap();
        assert_eq!(root.find_text("T"), Some("  padded "));
    }

    #[test]
    fn test_parse_rejects_malformed_documents() {
        assert!(Element::parse("<R><A></R>").is_err());
        assert!(Element::parse("<R>").is_err());
        assert!(Element::parse("").is_err());
        assert!(Element::parse("<A/><B/>").is_err());
    }

    #[test]
    fn test_descendants_finds_nested_matches() {
        let root = Element::parse("<R><S><X>1</X></S><X>2</X></R>").unwrap();
        let texts: Vec<_> = root.descendants("X").iter().filter_map(|e| e.text()).collect();
        assert_eq!(texts, vec!["1", "2"]);
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut root = Element::new("R");
        root.push_text("A", "a");
        root.insert(10, Element::with_text("B", "b"));
        root.insert(0, Element::with_text("C", "c"));

        let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_remove_all_keeps_other_children_in_order() {
        let mut root = Element::parse("<R><A>1</A><B/><A>2</A><C/></R>").unwrap();
        let removed = root.remove_all("A");

        assert_eq!(removed.len(), 2);
        assert_eq!(removed[1].text(), Some("2"));
        let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn test_serialization_escapes_text() {
        let mut root = Element::new("R");
        root.push_text("T", "a < b & c");
        root.push(Element::new("E"));

        assert_eq!(root.to_xml(), "<R><T>a &lt; b &amp; c</T><E /></R>");
    }

    #[test]
    fn test_indented_serialization() {
        let root = Element::parse("<R><A>1</A><B><C>2</C></B></R>").unwrap();

        assert_eq!(
            root.to_indented_xml("  "),
            "<R>\n  <A>1</A>\n  <B>\n    <C>2</C>\n  </B>\n</R>\n"
        );
    }

    #[test]
    fn test_parse_serialize_parse_is_stable() {
        let source = "<R a=\"q&quot;\"><T>x</T><L><I>1</I><I>2</I></L></R>";
        let first = Element::parse(source).unwrap();
        let second = Element::parse(&first.to_indented_xml("\t")).unwrap();
        assert_eq!(first, second);
    }
}
