//! Auto-run
//!
//! Drop-in activation: constructs a modal once the document signals
//! `DOMContentLoaded`, without the host writing any wiring code.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use bounce_cookie::CookieJar;
use bounce_dom::{event_names, Document, Scheduler};

use crate::modal::ExitIntentModal;
use crate::options::ModalOverrides;

/// Process-level switch checked when `DOMContentLoaded` arrives. Hosts
/// that construct their own instance clear it before load.
pub static AUTO_RUN: AtomicBool = AtomicBool::new(true);

/// Shared slot holding the auto-constructed instance
pub type ModalSlot = Rc<RefCell<Option<ExitIntentModal>>>;

/// Bind a `DOMContentLoaded` once-listener that constructs the component
/// while [`AUTO_RUN`] is still set.
///
/// A construction failure degrades to a warning; nothing unwinds into the
/// host. The instance stays alive through its own listener registrations,
/// so the returned slot may be dropped.
pub fn install(
    document: &Rc<Document>,
    scheduler: &Rc<Scheduler>,
    cookies: &Rc<RefCell<CookieJar>>,
    overrides: ModalOverrides,
) -> ModalSlot {
    let slot: ModalSlot = Rc::new(RefCell::new(None));

    let weak_document = Rc::downgrade(document);
    let scheduler = Rc::clone(scheduler);
    let cookies = Rc::clone(cookies);
    let filled = Rc::clone(&slot);
    document.add_listener_once(
        document.document_element(),
        event_names::CONTENT_LOADED,
        move |_, _| {
            if !AUTO_RUN.load(Ordering::SeqCst) {
                return;
            }
            let Some(document) = weak_document.upgrade() else {
                return;
            };
            match ExitIntentModal::attach(&document, &scheduler, &cookies, overrides.clone()) {
                Ok(modal) => {
                    *filled.borrow_mut() = Some(modal);
                }
                Err(err) => tracing::warn!(%err, "exit-intent modal not installed"),
            }
        },
    );

    slot
}
