//! Minimal read-only XML element tree.
//!
//! Built from quick-xml events and queried with ElementTree-style path
//! expressions (`./storeItems/storeItem`, `title/en`, `*/en`).

use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::encoding::read_manifest_text;
use super::ManifestError;

/// A parsed XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    tag: String,
    attributes: Vec<(String, String)>,
    /// Character data preceding the first child element.
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value by exact name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Leading text of the element. Empty text counts as absent.
    pub fn text(&self) -> Option<&str> {
        if self.text.is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// First element matching `path`, in document order.
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        self.find_all(path).into_iter().next()
    }

    /// Every element matching `path`, in document order.
    ///
    /// An empty path or `.` matches this element. Paths with empty segments
    /// (leading `/`, `//`, trailing `/`) match nothing.
    pub fn find_all(&self, path: &str) -> Vec<&XmlElement> {
        let Some(segments) = path_segments(path) else {
            return Vec::new();
        };

        let mut matches = vec![self];
        for segment in segments {
            matches = matches
                .into_iter()
                .flat_map(|element| element.children.iter())
                .filter(|child| segment == "*" || child.tag == segment)
                .collect();
            if matches.is_empty() {
                break;
            }
        }
        matches
    }
}

/// Split a path expression into tag segments, dropping `.` steps.
fn path_segments(path: &str) -> Option<Vec<&str>> {
    if path.is_empty() {
        return Some(Vec::new());
    }

    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "." => {}
            "" => return None,
            tag => segments.push(tag),
        }
    }
    Some(segments)
}

/// A parsed XML file together with the absolute path it was read from.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    path: PathBuf,
    root: XmlElement,
}

impl XmlDocument {
    /// Read and parse the XML file at `path`.
    ///
    /// Relative paths are anchored to the current directory at open time so
    /// that later lookups relative to the document never depend on it again.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let path = std::path::absolute(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let xml = read_manifest_text(&path)?;
        Self::parse_str(&xml, path)
    }

    /// Parse XML text, recording `path` as its origin.
    pub fn parse_str(xml: &str, path: PathBuf) -> Result<Self, ManifestError> {
        match build_tree(xml) {
            Ok(Some(root)) => Ok(Self { path, root }),
            Ok(None) => Err(ManifestError::NoRoot { path }),
            Err(message) => Err(ManifestError::Parse { path, message }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the document.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("/"))
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    pub fn element_at(&self, path: &str) -> Option<&XmlElement> {
        self.root.find(path)
    }

    pub fn elements_at(&self, path: &str) -> Vec<&XmlElement> {
        self.root.find_all(path)
    }

    pub fn text_at(&self, path: &str) -> Option<&str> {
        self.element_at(path).and_then(XmlElement::text)
    }

    pub fn attribute_at(&self, path: &str, name: &str) -> Option<&str> {
        self.element_at(path).and_then(|element| element.attribute(name))
    }
}

/// Resolve entity and character references, keeping the raw text if they are malformed.
fn unescape_lossy(raw: &str) -> String {
    quick_xml::escape::unescape(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Helper to get unescaped attribute value (decodes &quot; &amp; etc.)
fn unescape_attr(attr: &quick_xml::events::attributes::Attribute) -> String {
    attr.unescape_value()
        .map(|s| s.to_string())
        .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned())
}

fn open_element(start: &BytesStart) -> XmlElement {
    let attributes = start
        .attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            (key, unescape_attr(&attr))
        })
        .collect();

    XmlElement {
        tag: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        attributes,
        ..Default::default()
    }
}

/// Attach a finished element to its parent, or make it the root.
fn close_element(
    element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => {
            return Err(format!("second root element <{}>", element.tag));
        }
        None => *root = Some(element),
    }
    Ok(())
}

fn push_text(stack: &mut [XmlElement], text: &str) -> Result<(), String> {
    match stack.last_mut() {
        // Text after a child element is that child's tail; it is not kept.
        Some(current) if current.children.is_empty() => current.text.push_str(text),
        Some(_) => {}
        None if text.trim().is_empty() => {}
        None => return Err("text outside the root element".to_string()),
    }
    Ok(())
}

/// Build the element tree. `Ok(None)` means the input has no root element.
fn build_tree(xml: &str) -> Result<Option<XmlElement>, String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) => {
                if stack.is_empty() && root.is_some() {
                    return Err("content after the root element".to_string());
                }
                stack.push(open_element(e));
            }
            Ok(Event::Empty(ref e)) => {
                close_element(open_element(e), &mut stack, &mut root)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| "closing tag without an open element".to_string())?;
                close_element(element, &mut stack, &mut root)?;
            }
            Ok(Event::Text(ref t)) => {
                push_text(&mut stack, &unescape_lossy(&String::from_utf8_lossy(t)))?;
            }
            Ok(Event::CData(ref c)) => {
                push_text(&mut stack, &String::from_utf8_lossy(c))?;
            }
            Ok(Event::GeneralRef(ref r)) => {
                let reference = format!("&{};", String::from_utf8_lossy(r));
                push_text(&mut stack, &unescape_lossy(&reference))?;
            }
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "XML parse error at position {}: {}",
                    reader.buffer_position(),
                    e
                ));
            }
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed element <{}>", open.tag));
    }

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(xml: &str) -> XmlDocument {
        XmlDocument::parse_str(xml, PathBuf::from("/mods/test/modDesc.xml")).unwrap()
    }

    #[test]
    fn test_lookup_text_and_attributes() {
        let doc = parse(
            r#"<modDesc descVersion="92">
    <author>Cram42</author>
    <title><en>Big Tractor</en><de>Großer Traktor</de></title>
</modDesc>"#,
        );

        assert_eq!(doc.root().tag(), "modDesc");
        assert_eq!(doc.attribute_at(".", "descVersion"), Some("92"));
        assert_eq!(doc.text_at("./author"), Some("Cram42"));
        assert_eq!(doc.text_at("title/en"), Some("Big Tractor"));
        assert_eq!(doc.text_at("title/de"), Some("Großer Traktor"));
        assert_eq!(doc.text_at("title/fr"), None);
        assert_eq!(doc.attribute_at("author", "lang"), None);
        assert!(doc.element_at("title").is_some());
        assert!(doc.element_at("missing").is_none());
    }

    #[test]
    fn test_wildcard_and_find_all_keep_document_order() {
        let doc = parse(
            r#"<modDesc><storeItems>
    <storeItem xmlFilename="a.xml"/>
    <storeItem xmlFilename="b.xml"/>
    <other/>
</storeItems></modDesc>"#,
        );

        let items = doc.elements_at("storeItems/storeItem");
        let files: Vec<_> = items.iter().filter_map(|e| e.attribute("xmlFilename")).collect();
        assert_eq!(files, vec!["a.xml", "b.xml"]);
        assert_eq!(doc.elements_at("storeItems/*").len(), 3);
    }

    #[test]
    fn test_malformed_paths_match_nothing() {
        let doc = parse("<modDesc><author>x</author></modDesc>");
        assert!(doc.element_at("/author").is_none());
        assert!(doc.element_at("author/").is_none());
        assert!(doc.element_at(".//author").is_none());
        assert_eq!(doc.element_at("").map(XmlElement::tag), Some("modDesc"));
        assert_eq!(doc.element_at(".").map(XmlElement::tag), Some("modDesc"));
    }

    #[test]
    fn test_text_resolves_entities_and_cdata() {
        let doc = parse(
            "<modDesc><a>Fish &amp; Chips &#65;</a><b><![CDATA[<b>bold</b>]]></b><c></c></modDesc>",
        );
        assert_eq!(doc.text_at("a"), Some("Fish & Chips A"));
        assert_eq!(doc.text_at("b"), Some("<b>bold</b>"));
        assert_eq!(doc.text_at("c"), None);
    }

    #[test]
    fn test_text_stops_at_first_child() {
        let doc = parse("<modDesc><desc>lead<en>inner</en>tail</desc></modDesc>");
        assert_eq!(doc.text_at("desc"), Some("lead"));
        assert_eq!(doc.text_at("desc/en"), Some("inner"));
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let doc = parse(r#"<modDesc><item name="A &amp; B"/></modDesc>"#);
        assert_eq!(doc.attribute_at("item", "name"), Some("A & B"));
    }

    #[test]
    fn test_no_root_is_an_error() {
        let err = XmlDocument::parse_str("<?xml version=\"1.0\"?>\n", PathBuf::from("x.xml"))
            .unwrap_err();
        assert!(matches!(err, ManifestError::NoRoot { .. }));
    }

    #[test]
    fn test_malformed_documents_are_parse_errors() {
        for xml in [
            "<modDesc><author></modDesc>",
            "<modDesc>",
            "<a/><b/>",
            "<a/>junk",
        ] {
            let err = XmlDocument::parse_str(xml, PathBuf::from("x.xml")).unwrap_err();
            assert!(matches!(err, ManifestError::Parse { .. }), "{xml}: {err:?}");
        }
    }

    #[test]
    fn test_open_records_absolute_path() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("modDesc.xml");
        fs::write(&path, "<modDesc/>").unwrap();

        let doc = XmlDocument::open(&path).unwrap();
        assert!(doc.path().is_absolute());
        assert_eq!(doc.directory(), temp.path());
    }
}
