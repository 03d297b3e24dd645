use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html};

use crate::block::{TagCategory, TextBlock};

/// Text blocks and word count of one cleaned document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Tracked elements in document order.
    pub blocks: Vec<TextBlock>,
    /// Whitespace tokens across all visible text.
    pub word_count: usize,
}

impl Extraction {
    /// Blocks belonging to one category, in document order.
    pub fn blocks_in(&self, category: TagCategory) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().filter(move |b| b.category == category)
    }
}

/// Collapse every whitespace run to a single space and trim the ends.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Concatenated descendant text of one element, space-joined per text node.
fn element_text(el: ElementRef<'_>) -> String {
    let joined = el
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    normalize_whitespace(&joined)
}

/// Count whitespace tokens in every text node under `node`.
fn count_words(node: NodeRef<'_, Node>) -> usize {
    node.descendants()
        .filter_map(|n| match n.value() {
            Node::Text(t) => Some(t.text.split_whitespace().count()),
            _ => None,
        })
        .sum()
}

/// Collect tracked text blocks and the word count from a cleaned document.
///
/// Nested tracked elements (a `<p>` inside an `<li>`) each yield their own
/// block. Elements without visible text yield nothing.
pub fn extract(doc: &Html) -> Extraction {
    let root = doc.tree.root();
    let blocks = root
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter_map(|el| {
            let category = TagCategory::from_tag(el.value().name())?;
            let text = element_text(el);
            (!text.is_empty()).then(|| TextBlock::new(category, text))
        })
        .collect();

    Extraction {
        blocks,
        word_count: count_words(root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::clean;

    fn parse(html: &str) -> Extraction {
        extract(&clean(html, false))
    }

    fn texts(ex: &Extraction, category: TagCategory) -> Vec<&str> {
        ex.blocks_in(category).map(|b| b.text.as_str()).collect()
    }

    #[test]
    fn test_no_blocks() {
        let ex = parse("<html><body></body></html>");
        assert!(ex.blocks.is_empty());
        assert_eq!(ex.word_count, 0);
    }

    #[test]
    fn test_empty_input() {
        let ex = parse("");
        assert!(ex.blocks.is_empty());
        assert_eq!(ex.word_count, 0);
    }

    #[test]
    fn test_basic() {
        let html = concat!(
            "<html><body>",
            "<h1>Title</h1>",
            "<h2>Fleece <em>jackets</em></h2>",
            "<p>text and some <span>other</span> words</p>",
            "<h3>Sizes</h3>",
            "<h4>Care</h4>",
            "</body></html>"
        );
        let ex = parse(html);
        assert_eq!(texts(&ex, TagCategory::H2), vec!["Fleece jackets"]);
        assert_eq!(texts(&ex, TagCategory::H3), vec!["Sizes"]);
        assert_eq!(texts(&ex, TagCategory::H4), vec!["Care"]);
        assert_eq!(
            texts(&ex, TagCategory::BodyText),
            vec!["text and some other words"]
        );
        assert_eq!(ex.word_count, 10);
    }

    #[test]
    fn test_body_text_interleaves_p_and_li_in_document_order() {
        let html = concat!(
            "<html><body>",
            "<p>first</p>",
            "<ul><li>second</li><li>third</li></ul>",
            "<p>fourth</p>",
            "</body></html>"
        );
        let ex = parse(html);
        assert_eq!(
            texts(&ex, TagCategory::BodyText),
            vec!["first", "second", "third", "fourth"]
        );
    }

    #[test]
    fn test_nested_elements_each_yield_a_block() {
        let html = "<html><body><ul><li>item <p>inner</p></li></ul></body></html>";
        let ex = parse(html);
        assert_eq!(texts(&ex, TagCategory::BodyText), vec!["item inner", "inner"]);
    }

    #[test]
    fn test_text_nodes_are_space_joined_and_collapsed() {
        let html = "<html><body><p>fleece<b>jacka</b>\n\n   herr \t dam</p></body></html>";
        let ex = parse(html);
        assert_eq!(texts(&ex, TagCategory::BodyText), vec!["fleece jacka herr dam"]);
    }

    #[test]
    fn test_removed_subtrees_do_not_count() {
        let html = concat!(
            "<html><head><script>var words = 'one two three';</script></head><body>",
            "<p>visible text<script>hidden words</script></p>",
            "<svg><text>chart</text></svg>",
            "</body></html>"
        );
        let ex = parse(html);
        assert_eq!(ex.word_count, 2);
        assert_eq!(texts(&ex, TagCategory::BodyText), vec!["visible text"]);
    }

    #[test]
    fn test_word_count_includes_untracked_elements() {
        let html = concat!(
            "<html><head><title>Page title</title></head><body>",
            "<div>loose words here</div><h1>big</h1><p>two words</p>",
            "</body></html>"
        );
        let ex = parse(html);
        assert_eq!(ex.word_count, 8);
        assert_eq!(ex.blocks.len(), 1);
    }

    #[test]
    fn test_empty_elements_are_skipped() {
        let ex = parse("<html><body><p>   </p><h2></h2><li>x</li></body></html>");
        assert_eq!(ex.blocks.len(), 1);
        assert_eq!(ex.blocks[0].category, TagCategory::BodyText);
    }
}
