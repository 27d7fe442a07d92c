//! Minimal element tree built from quick-xml events.
//!
//! Tag and attribute names are kept exactly as written, prefix included.
//! Prefixes are never resolved, so an undeclared `itunes:` is just part of
//! the name.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::FeedError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Qualified name as written (`itunes:duration`).
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Element(Node),
    /// Unescaped character data or CDATA contents.
    Text(String),
}

impl Node {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(|child| match child {
            Child::Element(node) => Some(node),
            Child::Text(_) => None,
        })
    }

    /// Concatenated text of every descendant, so inline markup does not truncate a value.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Element(node) => node.collect_text(out),
            }
        }
    }
}

/// Parse a whole document and return its root element.
pub fn parse_document(bytes: &[u8]) -> Result<Node, FeedError> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| FeedError::Malformed(err.to_string()))?;
        match event {
            Event::Start(ref e) => stack.push(open_node(e)),
            Event::Empty(ref e) => close_node(open_node(e), &mut stack, &mut root),
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| FeedError::Malformed("unmatched end tag".to_string()))?;
                close_node(node, &mut stack, &mut root);
            }
            Event::Text(ref e) => {
                let text = e
                    .unescape()
                    .unwrap_or_else(|_| String::from_utf8_lossy(e));
                push_text(&mut stack, text);
            }
            Event::CData(ref e) => push_text(&mut stack, String::from_utf8_lossy(e)),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(FeedError::Malformed(format!(
            "element <{}> is never closed",
            open.name
        )));
    }
    root.ok_or_else(|| FeedError::Malformed("no root element".to_string()))
}

fn open_node(start: &BytesStart<'_>) -> Node {
    let attributes = start
        .attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map(Cow::into_owned)
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            (key, value)
        })
        .collect();
    Node {
        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        attributes,
        children: Vec::new(),
    }
}

fn close_node(node: Node, stack: &mut [Node], root: &mut Option<Node>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Child::Element(node)),
        // Only the first top-level element counts.
        None if root.is_none() => *root = Some(node),
        None => {}
    }
}

fn push_text(stack: &mut [Node], text: Cow<'_, str>) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Child::Text(text.into_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::parse_document;
    use crate::FeedError;

    #[test]
    fn prefixed_names_need_no_declaration() {
        let root = parse_document(
            br#"<rss><itunes:duration>10:00</itunes:duration><enclosure url="a&amp;b"/></rss>"#,
        )
        .unwrap();
        let children: Vec<_> = root.elements().collect();
        assert_eq!(root.name, "rss");
        assert_eq!(children[0].name, "itunes:duration");
        assert_eq!(children[0].text_content(), "10:00");
        assert_eq!(children[1].attribute("url"), Some("a&b"));
        assert_eq!(children[1].attribute("type"), None);
    }

    #[test]
    fn text_content_includes_nested_markup_and_cdata() {
        let root = parse_document(b"<title>A<b>B</b><![CDATA[C&D]]></title>").unwrap();
        assert_eq!(root.text_content(), "ABC&D");
    }

    #[test]
    fn unknown_entities_keep_their_raw_text() {
        let root = parse_document(b"<title>Tom&nbsp;Jones</title>").unwrap();
        assert_eq!(root.text_content(), "Tom&nbsp;Jones");
    }

    #[test]
    fn unclosed_and_mismatched_documents_are_malformed() {
        assert!(matches!(
            parse_document(b"<rss><channel>"),
            Err(FeedError::Malformed(_))
        ));
        assert!(matches!(
            parse_document(b"<rss><channel></rss>"),
            Err(FeedError::Malformed(_))
        ));
        assert!(matches!(
            parse_document(b"just text"),
            Err(FeedError::Malformed(_))
        ));
    }
}
