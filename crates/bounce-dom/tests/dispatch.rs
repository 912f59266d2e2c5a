//! Dispatch semantics
//!
//! Listener snapshotting, once-listeners, mid-dispatch mutation and
//! re-entrancy.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bounce_dom::{Document, Event};

// ============================================================================
// ORDERING & TARGETING
// ============================================================================

#[test]
fn test_listeners_run_in_registration_order() {
    let doc = Document::new("https://example.test/");
    let root = doc.document_element();
    let order = Rc::new(RefCell::new(Vec::new()));
    for n in 0..3 {
        let o = order.clone();
        doc.add_listener(root, "ping", move |_, _| o.borrow_mut().push(n));
    }

    doc.dispatch_custom(root, "ping");
    assert_eq!(*order.borrow(), vec![0, 1, 2]);
}

#[test]
fn test_dispatch_addresses_node_and_name() {
    let doc = Document::new("https://example.test/");
    let button = doc.create_element("button");
    doc.append_child(doc.body(), button);

    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    doc.add_listener(button, "click", move |_, _| h.set(h.get() + 1));

    doc.dispatch_custom(doc.body(), "click");
    doc.dispatch_custom(button, "other");
    assert_eq!(hits.get(), 0);

    doc.click(button);
    assert_eq!(hits.get(), 1);
}

// ============================================================================
// ONCE & REMOVAL
// ============================================================================

#[test]
fn test_once_listener_retires_before_running() {
    let doc = Document::new("https://example.test/");
    let root = doc.document_element();
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    doc.add_listener_once(root, "ping", move |d, _| {
        h.set(h.get() + 1);
        // Already retired from the listener's own point of view.
        assert_eq!(d.listener_count(d.document_element(), "ping"), 0);
    });

    assert_eq!(doc.listener_count(root, "ping"), 1);
    doc.dispatch_custom(root, "ping");
    doc.dispatch_custom(root, "ping");
    assert_eq!(hits.get(), 1);
    assert_eq!(doc.total_listeners(), 0);
}

#[test]
fn test_removal_mid_dispatch_is_honored() {
    let doc = Document::new("https://example.test/");
    let root = doc.document_element();
    let second_ran = Rc::new(Cell::new(false));

    let slot: Rc<Cell<Option<bounce_dom::ListenerId>>> = Rc::new(Cell::new(None));
    let s = slot.clone();
    doc.add_listener(root, "ping", move |d, _| {
        if let Some(id) = s.take() {
            d.remove_listener(id);
        }
    });
    let r = second_ran.clone();
    let id = doc.add_listener(root, "ping", move |_, _| r.set(true));
    slot.set(Some(id));

    doc.dispatch_custom(root, "ping");
    assert!(!second_ran.get());
    assert_eq!(doc.listener_count(root, "ping"), 1);
}

#[test]
fn test_listener_added_mid_dispatch_misses_current_event() {
    let doc = Document::new("https://example.test/");
    let root = doc.document_element();
    let late_hits = Rc::new(Cell::new(0));

    let l = late_hits.clone();
    doc.add_listener(root, "ping", move |d, _| {
        let l2 = l.clone();
        d.add_listener(d.document_element(), "ping", move |_, _| l2.set(l2.get() + 1));
    });

    doc.dispatch_custom(root, "ping");
    assert_eq!(late_hits.get(), 0);

    doc.dispatch_custom(root, "ping");
    assert_eq!(late_hits.get(), 1);
}

// ============================================================================
// RE-ENTRANCY
// ============================================================================

#[test]
fn test_reentrant_dispatch() {
    let doc = Document::new("https://example.test/");
    let root = doc.document_element();
    let log = Rc::new(RefCell::new(Vec::new()));

    let l = log.clone();
    doc.add_listener(root, "outer", move |d, _| {
        l.borrow_mut().push("outer");
        d.dispatch(d.document_element(), &Event::custom("inner"));
        l.borrow_mut().push("outer-done");
    });
    let l = log.clone();
    doc.add_listener(root, "inner", move |_, _| l.borrow_mut().push("inner"));

    doc.dispatch_custom(root, "outer");
    assert_eq!(*log.borrow(), vec!["outer", "inner", "outer-done"]);
}

#[test]
fn test_callbacks_may_mutate_the_tree() {
    let doc = Document::new("https://example.test/");
    let root = doc.document_element();
    doc.add_listener(root, "open", move |d, _| {
        d.add_class(d.document_element(), "is-open");
        let el = d.create_element("div");
        d.append_child(d.body(), el);
    });

    doc.dispatch_custom(root, "open");
    assert!(doc.has_class(root, "is-open"));
    assert_eq!(doc.children(doc.body()).len(), 1);
}
