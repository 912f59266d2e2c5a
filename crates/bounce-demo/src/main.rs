//! Bounce Demo - Main Entry Point
//!
//! Runs a scripted page session end to end: auto-run installation, a
//! simulated near-top pointer exit, the debounced reveal, a closer click
//! and the persisted dismissal.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use bounce_cookie::CookieJar;
use bounce_dom::{event_names, Document, Event, MouseEvent, NodeId, Scheduler};
use bounce_modal::{autorun, signals, ModalOverrides};

fn build_page(document: &Document) -> (NodeId, NodeId, NodeId) {
    let body = document.body();

    let opener = document.create_element("button");
    document.set_attribute(opener, "data-bounce-open", "");
    document.append_child(body, opener);

    let modal = document.create_element("div");
    document.set_attribute(modal, "data-bounce", "");
    document.set_attribute(modal, "id", "offer");
    document.hide(modal);
    document.append_child(body, modal);

    let closer = document.create_element("button");
    document.set_attribute(closer, "data-bounce-close", "");
    document.append_child(modal, closer);

    (modal, opener, closer)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let document = Rc::new(Document::new("https://example.test/landing"));
    let scheduler = Rc::new(Scheduler::new());
    let cookies = Rc::new(RefCell::new(CookieJar::new()));
    let (modal, _opener, closer) = build_page(&document);

    let root = document.document_element();
    document.add_listener(root, signals::SHOW, |_, _| {
        tracing::info!("host observed bounce:show");
    });
    document.add_listener(root, signals::HIDE, |_, _| {
        tracing::info!("host observed bounce:hide");
    });

    let slot = autorun::install(
        &document,
        &scheduler,
        &cookies,
        ModalOverrides {
            delay_ms: Some(250),
            ..Default::default()
        },
    );
    document.dispatch_custom(root, event_names::CONTENT_LOADED);
    anyhow::ensure!(slot.borrow().is_some(), "auto-run did not construct");

    tracing::info!("pointer leaves the viewport near the top edge");
    document.dispatch(
        root,
        &Event::mouse(event_names::MOUSE_LEAVE, MouseEvent::at(512.0, 8.0)),
    );
    scheduler.run_until_idle();
    anyhow::ensure!(document.is_visible(modal), "modal should be revealed");
    println!("modal revealed, document.cookie: {}", cookies.borrow().serialize());

    document.click(closer);
    anyhow::ensure!(!document.is_visible(modal), "modal should be hidden");
    println!("modal dismissed, dismissal persists: {}", cookies.borrow().serialize());

    Ok(())
}
