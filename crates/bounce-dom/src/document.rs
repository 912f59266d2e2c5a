//! Document - High-level document API
//!
//! Arena tree behind interior mutability plus the listener registry, so
//! event callbacks receive `&Document` and may mutate the page they were
//! dispatched from.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{Display, Event, Node, NodeId};

/// Listener registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn Fn(&Document, &Event)>;

struct ListenerEntry {
    id: ListenerId,
    target: NodeId,
    name: String,
    callback: Callback,
    once: bool,
    removed: Cell<bool>,
}

/// Headless HTML document
pub struct Document {
    nodes: RefCell<Vec<Node>>,
    listeners: RefCell<Vec<Rc<ListenerEntry>>>,
    next_listener: Cell<u64>,
    url: RefCell<String>,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
}

impl Document {
    /// Create a document with the basic `html > head + body` structure
    pub fn new(url: &str) -> Self {
        let mut nodes = vec![Node::document()];

        let html = NodeId(1);
        let head = NodeId(2);
        let body = NodeId(3);
        nodes.push(Node::element("html"));
        nodes.push(Node::element("head"));
        nodes.push(Node::element("body"));

        nodes[NodeId::DOCUMENT.index()].children.push(html);
        nodes[html.index()].parent = Some(NodeId::DOCUMENT);
        nodes[html.index()].children.push(head);
        nodes[html.index()].children.push(body);
        nodes[head.index()].parent = Some(html);
        nodes[body.index()].parent = Some(html);

        Self {
            nodes: RefCell::new(nodes),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
            url: RefCell::new(url.to_string()),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Get the `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get the `<head>` element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get the `<body>` element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    // ------------------------------------------------------------------
    // Tree
    // ------------------------------------------------------------------

    /// Create a detached element
    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len() as u32);
        nodes.push(Node::element(tag));
        id
    }

    /// Create a detached text node
    pub fn create_text(&self, content: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len() as u32);
        nodes.push(Node::text(content));
        id
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.index()].parent = Some(parent);
        nodes[parent.index()].children.push(child);
    }

    /// Children of a node, in document order
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.index()].children.clone()
    }

    /// Tag name, if the node is an element
    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.nodes.borrow()[node.index()]
            .as_element()
            .map(|e| e.tag.clone())
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Set an attribute
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(elem) = self.nodes.borrow_mut()[node.index()].as_element_mut() {
            elem.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Get an attribute value
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.index()]
            .as_element()
            .and_then(|e| e.attributes.get(name).cloned())
    }

    /// Check attribute presence
    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.nodes.borrow()[node.index()]
            .as_element()
            .is_some_and(|e| e.attributes.contains_key(name))
    }

    /// Remove an attribute
    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        if let Some(elem) = self.nodes.borrow_mut()[node.index()].as_element_mut() {
            elem.attributes.remove(name);
        }
    }

    /// All elements carrying an attribute, in document order
    pub fn query_attribute(&self, name: &str) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut found = Vec::new();
        let mut stack = vec![NodeId::DOCUMENT];
        while let Some(id) = stack.pop() {
            let node = &nodes[id.index()];
            if let Some(elem) = node.as_element() {
                if elem.attributes.contains_key(name) {
                    found.push(id);
                }
            }
            // Reverse so the leftmost child is visited first
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        found
    }

    /// First element with a matching `id` attribute
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        let mut stack = vec![NodeId::DOCUMENT];
        while let Some(node_id) = stack.pop() {
            let node = &nodes[node_id.index()];
            if let Some(elem) = node.as_element() {
                if elem.attributes.get("id").is_some_and(|v| v == id) {
                    return Some(node_id);
                }
            }
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Classes and visibility
    // ------------------------------------------------------------------

    /// Add a class to an element
    pub fn add_class(&self, node: NodeId, class: &str) {
        if let Some(elem) = self.nodes.borrow_mut()[node.index()].as_element_mut() {
            elem.add_class(class);
        }
    }

    /// Remove a class from an element
    pub fn remove_class(&self, node: NodeId, class: &str) {
        if let Some(elem) = self.nodes.borrow_mut()[node.index()].as_element_mut() {
            elem.remove_class(class);
        }
    }

    /// Check class membership
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes.borrow()[node.index()]
            .as_element()
            .is_some_and(|e| e.has_class(class))
    }

    /// Make an element visible
    pub fn show(&self, node: NodeId) {
        if let Some(elem) = self.nodes.borrow_mut()[node.index()].as_element_mut() {
            elem.display = Display::Block;
        }
    }

    /// Hide an element
    pub fn hide(&self, node: NodeId) {
        if let Some(elem) = self.nodes.borrow_mut()[node.index()].as_element_mut() {
            elem.display = Display::None;
        }
    }

    /// Check element visibility
    pub fn is_visible(&self, node: NodeId) -> bool {
        self.nodes.borrow()[node.index()]
            .as_element()
            .is_some_and(|e| e.display != Display::None)
    }

    // ------------------------------------------------------------------
    // Location
    // ------------------------------------------------------------------

    /// Document URL
    pub fn url(&self) -> String {
        self.url.borrow().clone()
    }

    /// URL fragment without the leading `#`, if present and non-empty
    pub fn fragment(&self) -> Option<String> {
        let url = self.url.borrow();
        match url.split_once('#') {
            Some((_, frag)) if !frag.is_empty() => Some(frag.to_string()),
            _ => None,
        }
    }

    /// Update the fragment and dispatch `hashchange` on the document
    /// element. An empty fragment clears it.
    pub fn navigate_fragment(&self, fragment: &str) {
        {
            let mut url = self.url.borrow_mut();
            let base = url.split_once('#').map(|(b, _)| b.to_string()).unwrap_or_else(|| url.clone());
            *url = if fragment.is_empty() {
                base
            } else {
                format!("{base}#{fragment}")
            };
        }
        self.dispatch_custom(self.html_element, crate::event_names::HASH_CHANGE);
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Listen for a named event on a node
    pub fn add_listener(
        &self,
        target: NodeId,
        name: &str,
        callback: impl Fn(&Document, &Event) + 'static,
    ) -> ListenerId {
        self.register(target, name, Box::new(callback), false)
    }

    /// Listen for a named event on a node; the listener retires itself
    /// before its first invocation
    pub fn add_listener_once(
        &self,
        target: NodeId,
        name: &str,
        callback: impl Fn(&Document, &Event) + 'static,
    ) -> ListenerId {
        self.register(target, name, Box::new(callback), true)
    }

    fn register(&self, target: NodeId, name: &str, callback: Callback, once: bool) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(self.next_listener.get() + 1);
        self.listeners.borrow_mut().push(Rc::new(ListenerEntry {
            id,
            target,
            name: name.to_string(),
            callback,
            once,
            removed: Cell::new(false),
        }));
        id
    }

    /// Unlisten. Returns false if the registration was already gone.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let mut found = false;
        listeners.retain(|entry| {
            if entry.id == id {
                entry.removed.set(true);
                found = true;
                false
            } else {
                true
            }
        });
        found
    }

    /// Live listener registrations for `(node, name)`
    pub fn listener_count(&self, target: NodeId, name: &str) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|e| e.target == target && e.name == name && !e.removed.get())
            .count()
    }

    /// Live listener registrations over the whole document
    pub fn total_listeners(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|e| !e.removed.get())
            .count()
    }

    /// Dispatch an event to a node, synchronously and in registration
    /// order.
    ///
    /// The listener list is snapshotted before the first callback runs:
    /// listeners removed mid-dispatch are skipped, once-listeners retire
    /// before their callback, and listeners added mid-dispatch do not see
    /// the current event.
    pub fn dispatch(&self, target: NodeId, event: &Event) {
        tracing::trace!(name = %event.name, ?target, "dispatch");
        let snapshot: Vec<Rc<ListenerEntry>> = self
            .listeners
            .borrow()
            .iter()
            .filter(|e| e.target == target && e.name == event.name && !e.removed.get())
            .cloned()
            .collect();

        for entry in snapshot {
            if entry.removed.get() {
                continue;
            }
            if entry.once {
                entry.removed.set(true);
            }
            (entry.callback)(self, event);
        }

        self.listeners.borrow_mut().retain(|e| !e.removed.get());
    }

    /// Dispatch a payload-less named event
    pub fn dispatch_custom(&self, target: NodeId, name: &str) {
        self.dispatch(target, &Event::custom(name));
    }

    /// Simulate a user click on an element
    pub fn click(&self, target: NodeId) {
        self.dispatch(target, &Event::custom(crate::event_names::CLICK));
    }
}
