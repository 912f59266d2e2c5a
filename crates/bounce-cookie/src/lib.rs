//! Bounce Cookie - Browsing-context cookie jar
//!
//! Name/value store with expiry in days: the durable dismissal state
//! behind the exit-intent modal.

mod jar;

pub use jar::{Cookie, CookieError, CookieJar};
