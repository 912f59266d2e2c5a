//! Exit-intent modal
//!
//! Trigger evaluation, the debounce timer and the reveal/hide actions.
//! Listener closures hold the component state strongly, so an auto-run
//! instance stays alive through its registrations; the document itself is
//! held weakly because the host page owns it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use bounce_cookie::CookieJar;
use bounce_dom::{
    event_names, Document, Key, KeyboardEvent, ListenerId, MouseEvent, Scheduler, TimerId,
};

use crate::markers::ElementRoles;
use crate::options::{ConfigError, ModalOptions, ModalOverrides};
use crate::signals;

/// Listener registrations owned by the component
#[derive(Debug, Default)]
struct Bindings {
    mouse_leave: Option<ListenerId>,
    mouse_enter: Option<ListenerId>,
    key_down: Option<ListenerId>,
    hash_change: Option<ListenerId>,
    pause: Option<ListenerId>,
    resume: Option<ListenerId>,
    open: Option<ListenerId>,
    opener_clicks: Vec<ListenerId>,
    closer_clicks: Vec<ListenerId>,
}

impl Bindings {
    fn drain(&mut self) -> Vec<ListenerId> {
        let mut ids = Vec::new();
        ids.extend(self.mouse_leave.take());
        ids.extend(self.mouse_enter.take());
        ids.extend(self.key_down.take());
        ids.extend(self.hash_change.take());
        ids.extend(self.pause.take());
        ids.extend(self.resume.take());
        ids.extend(self.open.take());
        ids.append(&mut self.opener_clicks);
        ids.append(&mut self.closer_clicks);
        ids
    }
}

#[derive(Debug, Default)]
struct ModalState {
    paused: bool,
    delay_timer: Option<TimerId>,
    bindings: Bindings,
}

struct ModalShared {
    options: ModalOptions,
    document: Weak<Document>,
    scheduler: Rc<Scheduler>,
    cookies: Rc<RefCell<CookieJar>>,
    roles: ElementRoles,
    /// False when construction short-circuited: no listeners, no timers,
    /// every operation a no-op
    armed: bool,
    state: RefCell<ModalState>,
}

/// Exit-intent modal trigger
pub struct ExitIntentModal {
    shared: Rc<ModalShared>,
}

impl ExitIntentModal {
    /// Wire the component to a document.
    ///
    /// Construction is all-or-nothing: the instance comes back either
    /// fully wired or permanently inert (no marker elements, or dismissal
    /// already recorded with nothing able to force a reveal). The only
    /// construction error is a malformed option value.
    pub fn attach(
        document: &Rc<Document>,
        scheduler: &Rc<Scheduler>,
        cookies: &Rc<RefCell<CookieJar>>,
        overrides: ModalOverrides,
    ) -> Result<Self, ConfigError> {
        let options = ModalOptions::merged(overrides);
        options.validate()?;

        let roles = ElementRoles::scan(document);
        let dismissed = cookies.borrow_mut().get(&options.cookie_name).is_some();
        let inert = (roles.targets.is_empty() && roles.openers.is_empty())
            || (dismissed && roles.openers.is_empty());

        let shared = Rc::new(ModalShared {
            options,
            document: Rc::downgrade(document),
            scheduler: Rc::clone(scheduler),
            cookies: Rc::clone(cookies),
            roles,
            armed: !inert,
            state: RefCell::new(ModalState::default()),
        });

        if inert {
            tracing::debug!(dismissed, "exit-intent modal inert");
            return Ok(Self { shared });
        }

        ModalShared::bind(&shared, document);
        shared.check_fragment();
        tracing::debug!(
            targets = shared.roles.targets.len(),
            openers = shared.roles.openers.len(),
            closers = shared.roles.closers.len(),
            "exit-intent modal wired"
        );
        Ok(Self { shared })
    }

    /// Reveal the target set (no-op while paused)
    pub fn fire(&self) {
        self.shared.fire();
    }

    /// Hide the target set
    pub fn hide(&self) {
        self.shared.hide();
    }

    /// Teardown: remove every listener this instance added and cancel any
    /// pending reveal. Idempotent.
    pub fn unbind_events(&self) {
        self.shared.unbind_events();
    }

    /// Evaluate a pointer-left-the-window signal
    pub fn mouse_leave(&self, event: &MouseEvent) {
        ModalShared::mouse_leave(&self.shared, event);
    }

    /// Pointer re-entered: cancel a pending reveal
    pub fn mouse_enter(&self) {
        self.shared.mouse_enter();
    }

    /// Evaluate a key-down signal
    pub fn key_down(&self, event: &KeyboardEvent) {
        ModalShared::key_down(&self.shared, event);
    }

    /// Effective configuration
    pub fn options(&self) -> &ModalOptions {
        &self.shared.options
    }

    /// True when construction short-circuited
    pub fn is_inert(&self) -> bool {
        !self.shared.armed
    }

    /// True while reveals are suppressed
    pub fn is_paused(&self) -> bool {
        self.shared.state.borrow().paused
    }

    /// True while a debounced reveal is pending
    pub fn pending_reveal(&self) -> bool {
        self.shared.state.borrow().delay_timer.is_some()
    }
}

impl ModalShared {
    fn bind(this: &Rc<Self>, document: &Document) {
        let root = document.document_element();
        let mut bindings = Bindings::default();

        let s = Rc::clone(this);
        bindings.mouse_leave = Some(document.add_listener(
            root,
            event_names::MOUSE_LEAVE,
            move |_, event| {
                if let Some(mouse) = event.mouse_payload() {
                    ModalShared::mouse_leave(&s, mouse);
                }
            },
        ));

        let s = Rc::clone(this);
        bindings.mouse_enter = Some(document.add_listener(
            root,
            event_names::MOUSE_ENTER,
            move |_, _| s.mouse_enter(),
        ));

        let s = Rc::clone(this);
        bindings.key_down = Some(document.add_listener(
            root,
            event_names::KEY_DOWN,
            move |_, event| {
                if let Some(key) = event.keyboard_payload() {
                    ModalShared::key_down(&s, key);
                }
            },
        ));

        let s = Rc::clone(this);
        bindings.hash_change = Some(document.add_listener(
            root,
            event_names::HASH_CHANGE,
            move |_, _| s.check_fragment(),
        ));

        let s = Rc::clone(this);
        bindings.pause = Some(document.add_listener(root, signals::PAUSE, move |_, _| {
            s.set_paused(true);
        }));

        let s = Rc::clone(this);
        bindings.resume = Some(document.add_listener(root, signals::RESUME, move |_, _| {
            s.set_paused(false);
        }));

        let s = Rc::clone(this);
        bindings.open = Some(document.add_listener(root, signals::OPEN, move |_, _| {
            ModalShared::open(&s);
        }));

        for &opener in &this.roles.openers {
            let s = Rc::clone(this);
            bindings.opener_clicks.push(document.add_listener(
                opener,
                event_names::CLICK,
                move |_, _| ModalShared::open(&s),
            ));
        }

        for &closer in &this.roles.closers {
            let s = Rc::clone(this);
            bindings.closer_clicks.push(document.add_listener_once(
                closer,
                event_names::CLICK,
                move |_, _| s.hide(),
            ));
        }

        this.state.borrow_mut().bindings = bindings;
    }

    fn document(&self) -> Option<Rc<Document>> {
        self.document.upgrade()
    }

    /// Dismissal is checked live so a dismissed-but-wired instance
    /// (openers present) never auto-reveals
    fn dismissed(&self) -> bool {
        self.cookies
            .borrow_mut()
            .get(&self.options.cookie_name)
            .is_some()
    }

    /// Cancel-and-reschedule: at most one pending reveal timer exists
    fn schedule_reveal(this: &Rc<Self>) {
        let mut state = this.state.borrow_mut();
        if let Some(id) = state.delay_timer.take() {
            this.scheduler.clear(id);
        }
        let s = Rc::clone(this);
        let id = this.scheduler.set_timeout(this.options.delay(), move || {
            s.state.borrow_mut().delay_timer = None;
            s.fire();
        });
        state.delay_timer = Some(id);
    }

    fn mouse_leave(this: &Rc<Self>, event: &MouseEvent) {
        if !this.armed {
            return;
        }
        if event.client_y > this.options.min_offset {
            return;
        }
        if this.dismissed() {
            return;
        }
        tracing::trace!(client_y = event.client_y, "exit intent detected");
        ModalShared::schedule_reveal(this);
    }

    fn mouse_enter(&self) {
        let timer = self.state.borrow_mut().delay_timer.take();
        if let Some(id) = timer {
            self.scheduler.clear(id);
        }
    }

    fn key_down(this: &Rc<Self>, event: &KeyboardEvent) {
        if event.key == Key::Escape {
            this.hide();
            return;
        }
        if !this.armed {
            return;
        }
        let is_shortcut = matches!(
            &event.key,
            Key::Character(c) if c.eq_ignore_ascii_case(&'l')
        ) && event.modifiers.meta;
        if !is_shortcut {
            return;
        }
        if this.dismissed() {
            return;
        }
        ModalShared::schedule_reveal(this);
    }

    /// Opener path: debounced like the mouse path, but bypasses the
    /// dismissal gate
    fn open(this: &Rc<Self>) {
        if !this.armed {
            return;
        }
        ModalShared::schedule_reveal(this);
    }

    /// Reveal synchronously when the fragment names a hash-enabled target
    fn check_fragment(&self) {
        if !self.armed || self.state.borrow().paused {
            return;
        }
        let Some(document) = self.document() else {
            return;
        };
        let Some(fragment) = document.fragment() else {
            return;
        };
        if self.roles.hash_targets.iter().any(|(_, id)| *id == fragment) {
            self.fire();
        }
    }

    fn set_paused(&self, paused: bool) {
        self.state.borrow_mut().paused = paused;
    }

    fn fire(&self) {
        if !self.armed {
            return;
        }
        if self.state.borrow().paused {
            tracing::debug!("reveal suppressed while paused");
            return;
        }
        let Some(document) = self.document() else {
            return;
        };

        // A reveal is also the dismissal: the mouse listeners are retired
        // and the cookie is written on every successful fire.
        self.unbind_mouse(&document);
        self.persist_dismissal();

        let root = document.document_element();
        document.dispatch_custom(root, signals::SHOW);
        document.add_class(root, &self.options.open_class);
        for &target in &self.roles.targets {
            document.show(target);
        }
        tracing::debug!("exit-intent modal revealed");
    }

    fn hide(&self) {
        if !self.armed {
            return;
        }
        let Some(document) = self.document() else {
            return;
        };

        // Without an opener there is no way left to re-trigger, so the
        // keyboard shortcut is retired too.
        if self.roles.openers.is_empty() {
            let key_down = self.state.borrow_mut().bindings.key_down.take();
            if let Some(id) = key_down {
                document.remove_listener(id);
            }
        }

        let root = document.document_element();
        document.dispatch_custom(root, signals::HIDE);
        document.remove_class(root, &self.options.open_class);
        for &target in &self.roles.targets {
            document.hide(target);
        }
        tracing::debug!("exit-intent modal hidden");
    }

    fn unbind_mouse(&self, document: &Document) {
        let mut state = self.state.borrow_mut();
        let ids = [
            state.bindings.mouse_leave.take(),
            state.bindings.mouse_enter.take(),
        ];
        drop(state);
        for id in ids.into_iter().flatten() {
            document.remove_listener(id);
        }
    }

    fn persist_dismissal(&self) {
        let result = self.cookies.borrow_mut().set(
            &self.options.cookie_name,
            &self.options.cookie_value,
            Some(self.options.cookie_expiry_days),
        );
        if let Err(err) = result {
            tracing::warn!(%err, "failed to persist dismissal cookie");
        }
    }

    fn unbind_events(&self) {
        let (ids, timer) = {
            let mut state = self.state.borrow_mut();
            (state.bindings.drain(), state.delay_timer.take())
        };
        if let Some(id) = timer {
            self.scheduler.clear(id);
        }
        if let Some(document) = self.document() {
            for id in ids {
                document.remove_listener(id);
            }
        }
    }
}
