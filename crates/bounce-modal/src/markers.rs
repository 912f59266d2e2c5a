//! Declarative markers
//!
//! The marker attributes the component reads from the document, scanned
//! once at construction into typed role sets.

use bounce_dom::{Document, NodeId};

/// Element is part of the target set to reveal/hide
pub const TARGET_ATTR: &str = "data-bounce";
/// Element, when clicked once, hides the modal
pub const CLOSE_ATTR: &str = "data-bounce-close";
/// Element, when clicked, forces a reveal regardless of dismissal
pub const OPEN_ATTR: &str = "data-bounce-open";
/// Target element additionally watches the URL fragment
pub const HASH_ATTR: &str = "data-bounce-enable-hash";

/// Typed role sets scanned from the marker attributes
#[derive(Debug, Default)]
pub struct ElementRoles {
    /// Elements shown/hidden as the modal body
    pub targets: Vec<NodeId>,
    /// Elements that force a reveal on click
    pub openers: Vec<NodeId>,
    /// Elements that hide the modal on their first click
    pub closers: Vec<NodeId>,
    /// Hash-enabled targets paired with their `id` attribute
    pub hash_targets: Vec<(NodeId, String)>,
}

impl ElementRoles {
    /// Scan the document for marker-tagged elements.
    ///
    /// Hash-enabled targets without an `id` cannot match a fragment and
    /// are dropped here.
    pub fn scan(document: &Document) -> Self {
        let targets = document.query_attribute(TARGET_ATTR);
        let hash_targets = targets
            .iter()
            .filter(|&&node| document.has_attribute(node, HASH_ATTR))
            .filter_map(|&node| document.attribute(node, "id").map(|id| (node, id)))
            .collect();

        Self {
            targets,
            openers: document.query_attribute(OPEN_ATTR),
            closers: document.query_attribute(CLOSE_ATTR),
            hash_targets,
        }
    }

    /// True when nothing is marked at all
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.openers.is_empty() && self.closers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_collects_roles() {
        let doc = Document::new("https://example.test/");
        let body = doc.body();

        let modal = doc.create_element("div");
        doc.set_attribute(modal, TARGET_ATTR, "");
        doc.set_attribute(modal, HASH_ATTR, "");
        doc.set_attribute(modal, "id", "offer");
        doc.append_child(body, modal);

        let opener = doc.create_element("button");
        doc.set_attribute(opener, OPEN_ATTR, "");
        doc.append_child(body, opener);

        let closer = doc.create_element("button");
        doc.set_attribute(closer, CLOSE_ATTR, "");
        doc.append_child(modal, closer);

        let roles = ElementRoles::scan(&doc);
        assert_eq!(roles.targets, vec![modal]);
        assert_eq!(roles.openers, vec![opener]);
        assert_eq!(roles.closers, vec![closer]);
        assert_eq!(roles.hash_targets, vec![(modal, "offer".to_string())]);
        assert!(!roles.is_empty());
    }

    #[test]
    fn hash_target_without_id_is_dropped() {
        let doc = Document::new("https://example.test/");
        let modal = doc.create_element("div");
        doc.set_attribute(modal, TARGET_ATTR, "");
        doc.set_attribute(modal, HASH_ATTR, "");
        doc.append_child(doc.body(), modal);

        let roles = ElementRoles::scan(&doc);
        assert_eq!(roles.targets, vec![modal]);
        assert!(roles.hash_targets.is_empty());
    }

    #[test]
    fn empty_document_scans_empty() {
        let doc = Document::new("https://example.test/");
        assert!(ElementRoles::scan(&doc).is_empty());
    }
}
