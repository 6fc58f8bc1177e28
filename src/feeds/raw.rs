//! Loosely-typed feed entries as they come out of the XML tree.
//!
//! This is the only place that knows feeds come in two dialects and that a
//! field may be bare text or an element with attributes. Everything past
//! [`extract_items`] works with a flat `Vec<RawFeedItem>`, possibly empty.

use super::xml::XmlNode;

/// One field of a raw entry.
///
/// `Text` is an element with only character data. `Node` is an element with
/// attributes or child elements, such as `<title type="html">` or Atom's
/// `<link href="..."/>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawField {
    Text(String),
    Node(XmlNode),
}

impl RawField {
    fn from_node(node: &XmlNode) -> Self {
        if node.is_leaf() {
            RawField::Text(node.text().to_string())
        } else {
            RawField::Node(node.clone())
        }
    }

    /// The field's character data, whichever shape it has.
    pub fn inner_text(&self) -> &str {
        match self {
            RawField::Text(s) => s.as_str(),
            RawField::Node(n) => n.text(),
        }
    }

    /// The `href` attribute of a structured field.
    pub fn href(&self) -> Option<&str> {
        match self {
            RawField::Text(_) => None,
            RawField::Node(n) => n.attr("href"),
        }
    }
}

/// An RSS `<item>` or Atom `<entry>` before normalization.
///
/// Every field is optional; absence is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeedItem {
    pub title: Option<RawField>,
    pub link: Option<RawField>,
    /// Atom `<id>` or RSS `<guid>`.
    pub id: Option<RawField>,
    pub description: Option<RawField>,
    pub summary: Option<RawField>,
    /// Atom `<content>` or RSS `<content:encoded>`.
    pub content: Option<RawField>,
    pub pub_date: Option<RawField>,
    pub published: Option<RawField>,
    pub updated: Option<RawField>,
}

impl RawFeedItem {
    /// Read the fields of one item/entry element.
    pub fn from_node(node: &XmlNode) -> Self {
        let field = |name: &str| node.child(name).map(RawField::from_node);
        let first_of = |names: &[&str]| names.iter().find_map(|name| field(*name));

        Self {
            title: field("title"),
            link: preferred_link(node).map(RawField::from_node),
            id: first_of(&["id", "guid"]),
            description: field("description"),
            summary: field("summary"),
            content: first_of(&["content", "content:encoded"]),
            pub_date: field("pubDate"),
            published: first_of(&["published", "dc:date"]),
            updated: field("updated"),
        }
    }
}

/// Atom entries may carry several `<link>`s; prefer the alternate one.
fn preferred_link(node: &XmlNode) -> Option<&XmlNode> {
    node.children_named("link")
        .find(|l| matches!(l.attr("rel"), None | Some("alternate")))
        .or_else(|| node.child("link"))
}

/// Pull the entries out of a parsed RSS 2.0, RSS 1.0 (RDF) or Atom document.
///
/// Unknown document shapes and completely empty elements yield nothing; the
/// result is always a flat, ordered sequence.
pub fn extract_items(root: &XmlNode) -> Vec<RawFeedItem> {
    let entries: Vec<&XmlNode> = match root.name.as_str() {
        "rss" => root
            .children_named("channel")
            .flat_map(|channel| channel.children_named("item"))
            .collect(),
        "rdf:RDF" | "RDF" => root.children_named("item").collect(),
        "feed" => root.children_named("entry").collect(),
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter(|n| !n.is_empty())
        .map(RawFeedItem::from_node)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::xml::parse_document;

    #[test]
    fn test_single_rss_item_becomes_one_element_vec() {
        let root = parse_document(
            "<rss><channel><title>c</title><item><title>Only</title></item></channel></rss>",
        )
        .unwrap();
        let items = extract_items(&root);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, Some(RawField::Text("Only".to_string())));
    }

    #[test]
    fn test_many_atom_entries_keep_order() {
        let root = parse_document(
            "<feed><entry><title>A</title></entry><entry><title>B</title></entry></feed>",
        )
        .unwrap();
        let titles: Vec<String> = extract_items(&root)
            .iter()
            .map(|i| i.title.as_ref().unwrap().inner_text().to_string())
            .collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_empty_entries_are_dropped() {
        let root = parse_document("<rss><channel><item/><item></item><item><title>x</title></item></channel></rss>")
            .unwrap();
        assert_eq!(extract_items(&root).len(), 1);
    }

    #[test]
    fn test_unknown_document_yields_nothing() {
        let root = parse_document("<html><body>not a feed</body></html>").unwrap();
        assert!(extract_items(&root).is_empty());
    }

    #[test]
    fn test_rdf_items_are_siblings_of_channel() {
        let root = parse_document(
            "<rdf:RDF><channel><title>c</title></channel><item><title>r</title></item></rdf:RDF>",
        )
        .unwrap();
        assert_eq!(extract_items(&root).len(), 1);
    }

    #[test]
    fn test_structured_fields_keep_attributes() {
        let root = parse_document(
            r#"<feed><entry>
                <link rel="self" href="https://example.com/self"/>
                <link rel="alternate" href="https://example.com/post"/>
                <title type="html">T</title>
                <content:encoded>body</content:encoded>
            </entry></feed>"#,
        )
        .unwrap();
        let item = &extract_items(&root)[0];
        assert_eq!(
            item.link.as_ref().and_then(RawField::href),
            Some("https://example.com/post")
        );
        assert!(matches!(item.title, Some(RawField::Node(_))));
        assert_eq!(item.title.as_ref().unwrap().inner_text(), "T");
        assert_eq!(item.content.as_ref().unwrap().inner_text(), "body");
    }

    #[test]
    fn test_first_link_used_when_none_is_alternate() {
        let root = parse_document(
            r#"<feed><entry><link rel="enclosure" href="https://example.com/a.mp3"/></entry></feed>"#,
        )
        .unwrap();
        let item = &extract_items(&root)[0];
        assert_eq!(
            item.link.as_ref().and_then(RawField::href),
            Some("https://example.com/a.mp3")
        );
    }
}
