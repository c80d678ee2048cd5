use ego_tree::NodeRef;
use scraper::{ElementRef, Node};

/// First element after `node` in document order that satisfies `pred`.
///
/// The node's own subtree is skipped. Each later sibling is searched
/// depth-first (itself, then its descendants) before moving on; when a level
/// runs out of siblings the search climbs to the parent's next sibling.
pub fn first_following<'a, P>(node: NodeRef<'a, Node>, mut pred: P) -> Option<ElementRef<'a>>
where
    P: FnMut(&ElementRef<'a>) -> bool,
{
    let mut cursor = node;
    loop {
        let next = loop {
            if let Some(sib) = cursor.next_sibling() {
                break sib;
            }
            cursor = cursor.parent()?;
        };
        for candidate in next.descendants() {
            if let Some(el) = ElementRef::wrap(candidate) {
                if pred(&el) {
                    return Some(el);
                }
            }
        }
        cursor = next;
    }
}

/// First element after `node`'s start tag in document order: its own
/// descendants first, then everything `first_following` would visit.
///
/// An unclosed `<a>` ends up wrapping the markup after it, so anchors need this.
pub fn first_after_open<'a, P>(node: NodeRef<'a, Node>, mut pred: P) -> Option<ElementRef<'a>>
where
    P: FnMut(&ElementRef<'a>) -> bool,
{
    for candidate in node.descendants().skip(1) {
        if let Some(el) = ElementRef::wrap(candidate) {
            if pred(&el) {
                return Some(el);
            }
        }
    }
    first_following(node, pred)
}

pub fn is_tag(el: &ElementRef<'_>, name: &str) -> bool {
    el.value().name().eq_ignore_ascii_case(name)
}

pub fn flat_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>()
}
