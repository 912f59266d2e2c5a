//! DOM Node
//!
//! Arena node: parent/children indices plus node-specific data.

use std::collections::HashMap;

use crate::NodeId;

/// Element display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    None,
}

/// DOM node
#[derive(Debug)]
pub struct Node {
    /// Parent node (None for the document node)
    pub parent: Option<NodeId>,
    /// Children in document order
    pub children: Vec<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
}

/// Element payload: tag name, attributes, class list, display state
#[derive(Debug)]
pub struct ElementData {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub classes: Vec<String>,
    pub display: Display,
}

impl Node {
    /// Create the document node
    pub fn document() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Document,
        }
    }

    /// Create an element node
    pub fn element(tag: &str) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element(ElementData::new(tag)),
        }
    }

    /// Create a text node
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Text(content.into()),
        }
    }

    /// Element data, if this node is an element
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(elem) => Some(elem),
            _ => None,
        }
    }

    /// Mutable element data, if this node is an element
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(elem) => Some(elem),
            _ => None,
        }
    }
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: HashMap::new(),
            classes: Vec::new(),
            display: Display::Block,
        }
    }

    /// Check class list membership
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class (no duplicates)
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Remove a class
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_starts_visible() {
        let node = Node::element("div");
        let elem = node.as_element().unwrap();
        assert_eq!(elem.display, Display::Block);
        assert!(elem.attributes.is_empty());
    }

    #[test]
    fn class_list_dedupes() {
        let mut elem = ElementData::new("div");
        elem.add_class("open");
        elem.add_class("open");
        assert_eq!(elem.classes.len(), 1);
        elem.remove_class("open");
        assert!(!elem.has_class("open"));
    }

    #[test]
    fn text_node_has_no_element_data() {
        let node = Node::text("hello");
        assert!(node.as_element().is_none());
    }
}
