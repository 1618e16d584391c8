//! Small helpers on top of the XML reader.

use roxmltree::{Document, Node, ParsingOptions};

/// Parses an XML document, accepting a DOCTYPE declaration (novx and
/// nvcx files reference external DTDs in their prolog).
pub fn parse_document(text: &str) -> Result<Document<'_>, roxmltree::Error> {
    Document::parse_with_options(
        text,
        ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        },
    )
}

/// First child element with the given tag name.
pub fn child<'a, 'i>(node: Node<'a, 'i>, tag: &str) -> Option<Node<'a, 'i>> {
    node.children().find(|c| c.has_tag_name(tag))
}

/// Text of the first child element with the given tag name, if any.
pub fn child_text(node: Node, tag: &str) -> Option<String> {
    child(node, tag)
        .and_then(|c| c.text())
        .map(|t| t.to_string())
}

/// All text in the subtree of `node`, concatenated.
pub fn all_text(node: Node) -> String {
    node.descendants()
        .filter(|d| d.is_text())
        .filter_map(|d| d.text())
        .collect()
}

/// Joins a novx multi-line text element (`<p>` children) with newlines.
/// Returns `None` for a missing element or one without paragraphs.
pub fn paragraphs_to_text(node: Option<Node>) -> Option<String> {
    let node = node?;
    let lines: Vec<String> = node
        .children()
        .filter(|c| c.has_tag_name("p"))
        .map(all_text)
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Serializes the children of `node` back to an XML fragment.
///
/// Used for section `<Content>` elements, whose inline markup is kept
/// verbatim in the model. Empty elements are expanded (`<p></p>`).
pub fn inner_xml(node: Node) -> String {
    let mut out = String::new();
    for c in node.children() {
        serialize(c, &mut out);
    }
    out
}

fn serialize(node: Node, out: &mut String) {
    if node.is_text() {
        if let Some(text) = node.text() {
            out.push_str(&escape_text(text));
        }
        return;
    }
    if !node.is_element() {
        return;
    }
    out.push('<');
    out.push_str(node.tag_name().name());
    for attr in node.attributes() {
        out.push(' ');
        // Serialized attribute names keep their prefix (xml:lang).
        if let Some(ns) = attr.namespace() {
            if ns == "http://www.w3.org/XML/1998/namespace" {
                out.push_str("xml:");
            }
        }
        out.push_str(attr.name());
        out.push_str("=\"");
        out.push_str(&escape_attr(attr.value()));
        out.push('"');
    }
    out.push('>');
    for c in node.children() {
        serialize(c, out);
    }
    out.push_str("</");
    out.push_str(node.tag_name().name());
    out.push('>');
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_text() {
        let doc = roxmltree::Document::parse("<a><Title>T</Title><Empty/></a>").unwrap();
        let root = doc.root_element();
        assert_eq!(child_text(root, "Title").as_deref(), Some("T"));
        assert_eq!(child_text(root, "Empty"), None);
        assert_eq!(child_text(root, "Missing"), None);
    }

    #[test]
    fn test_paragraphs_to_text() {
        let doc =
            roxmltree::Document::parse("<Desc><p>one</p><p>two <em>em</em></p></Desc>").unwrap();
        let text = paragraphs_to_text(Some(doc.root_element())).unwrap();
        assert_eq!(text, "one\ntwo em");
    }

    #[test]
    fn test_inner_xml_keeps_markup() {
        let doc = roxmltree::Document::parse(
            r#"<Content><p>a &amp; b</p><p><span xml:lang="fr">oui</span></p></Content>"#,
        )
        .unwrap();
        let fragment = inner_xml(doc.root_element());
        assert_eq!(
            fragment,
            r#"<p>a &amp; b</p><p><span xml:lang="fr">oui</span></p>"#
        );
    }

    #[test]
    fn test_inner_xml_expands_empty() {
        let doc = roxmltree::Document::parse("<Content><p/></Content>").unwrap();
        assert_eq!(inner_xml(doc.root_element()), "<p></p>");
    }
}
