use std::borrow::Cow;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::Regex;
use scraper::Html;

/// Tags whose whole subtree never counts as visible content.
const REMOVE_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg"];

/// Structural containers dropped when `exclude_structural` is set.
const STRUCTURAL_TAGS: &[&str] = &["nav", "header", "footer", "aside"];

/// `<meta charset=...>` or `content="...; charset=..."`.
#[allow(clippy::expect_used)]
static CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s/>;]+)"#).expect("valid regex")
});

/// Decode raw bytes into a string.
///
/// A byte-order mark wins; valid UTF-8 is used as-is. Otherwise the charset
/// declared in the first 1024 bytes is honoured, falling back to windows-1252
/// (the web's "latin-1"). Never fails: every byte sequence maps to some text.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        let (decoded, _, _) = encoding.decode(bytes);
        return decoded;
    }
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(s);
    }
    let encoding = declared_encoding(bytes)
        .filter(|e| *e != UTF_8)
        .unwrap_or(WINDOWS_1252);
    let (decoded, _, _) = encoding.decode(bytes);
    Cow::Owned(decoded.into_owned())
}

fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]);
    let label = CHARSET_RE.captures(&head)?.get(1)?.as_str().to_string();
    Encoding::for_label(label.as_bytes())
}

/// Parse HTML and return a working copy with non-content subtrees removed.
///
/// Scraper's arena can't drop subtrees in place, so the document is
/// re-serialized without the unwanted nodes and parsed again.
pub fn clean(html: &str, exclude_structural: bool) -> Html {
    let doc = Html::parse_document(html);
    let mut out = String::with_capacity(html.len());
    serialize_node(&doc.tree.root(), exclude_structural, &mut out);
    Html::parse_document(&out)
}

fn is_removed(tag: &str, exclude_structural: bool) -> bool {
    REMOVE_TAGS.contains(&tag) || (exclude_structural && STRUCTURAL_TAGS.contains(&tag))
}

/// Recursively serialize the node tree, skipping removed tags and comments.
fn serialize_node(
    node: &ego_tree::NodeRef<scraper::node::Node>,
    exclude_structural: bool,
    out: &mut String,
) {
    use scraper::node::Node;

    match node.value() {
        Node::Document | Node::Fragment => {
            for child in node.children() {
                serialize_node(&child, exclude_structural, out);
            }
        }
        Node::Element(el) => {
            let tag = el.name();
            if is_removed(tag, exclude_structural) {
                return;
            }

            out.push('<');
            out.push_str(tag);
            for (attr, val) in el.attrs() {
                out.push(' ');
                out.push_str(attr);
                out.push_str("=\"");
                escape(val, true, out);
                out.push('"');
            }
            if is_void_element(tag) {
                out.push_str(" />");
            } else {
                out.push('>');
                for child in node.children() {
                    serialize_node(&child, exclude_structural, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
        // Decoded entities (&lt;b&gt;) must stay text in the second parse.
        Node::Text(text) => escape(&text.text, false, out),
        Node::Comment(_) | Node::ProcessingInstruction(_) | Node::Doctype(_) => {}
    }
}

fn escape(val: &str, attr: bool, out: &mut String) {
    for ch in val.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
