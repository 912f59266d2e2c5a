//! Cookie jar
//!
//! Insertion-ordered name/value store with unix-seconds expiry and the
//! `;`-separated pair syntax of `document.cookie`.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const SECONDS_PER_DAY: u64 = 86_400;

/// A cookie
#[derive(Debug, Clone)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Expiry time as unix seconds (None = session cookie)
    pub expires: Option<u64>,
}

/// Cookie jar error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CookieError {
    #[error("invalid cookie name {0:?}: empty or contains `;`, `=` or whitespace")]
    InvalidName(String),
}

impl Cookie {
    /// Create a session cookie
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            expires: None,
        }
    }

    /// Create a cookie expiring `days` from now
    pub fn expiring_in_days(name: &str, value: &str, days: u32) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            expires: Some(now_unix() + u64::from(days) * SECONDS_PER_DAY),
        }
    }

    /// Check if the cookie has expired
    pub fn is_expired(&self) -> bool {
        match self.expires {
            Some(expires) => expires < now_unix(),
            None => false, // Session cookies don't expire
        }
    }

    /// Serialize as `name=value`
    pub fn serialize(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

fn valid_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c == ';' || c == '=' || c.is_whitespace())
}

/// Browsing-context-scoped cookie store
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
    by_name: HashMap<String, usize>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a live cookie. Expired entries are evicted on read.
    pub fn get(&mut self, name: &str) -> Option<String> {
        let index = *self.by_name.get(name)?;
        if self.cookies[index].is_expired() {
            tracing::trace!(name, "evicting expired cookie");
            self.remove(name);
            return None;
        }
        Some(self.cookies[index].value.clone())
    }

    /// Upsert a cookie, expiring `expiry_days` from now (None = session)
    pub fn set(
        &mut self,
        name: &str,
        value: &str,
        expiry_days: Option<u32>,
    ) -> Result<(), CookieError> {
        if !valid_name(name) {
            return Err(CookieError::InvalidName(name.to_string()));
        }
        let cookie = match expiry_days {
            Some(days) => Cookie::expiring_in_days(name, value, days),
            None => Cookie::new(name, value),
        };
        self.insert(cookie);
        Ok(())
    }

    /// Upsert a pre-built cookie, keeping insertion order on replace
    pub fn insert(&mut self, cookie: Cookie) {
        match self.by_name.get(&cookie.name) {
            Some(&index) => self.cookies[index] = cookie,
            None => {
                self.by_name.insert(cookie.name.clone(), self.cookies.len());
                self.cookies.push(cookie);
            }
        }
    }

    /// Remove a cookie. Returns false if it was not present.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(index) = self.by_name.remove(name) else {
            return false;
        };
        self.cookies.remove(index);
        for slot in self.by_name.values_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }
        true
    }

    /// Drop every expired cookie, returning how many were evicted
    pub fn purge_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .cookies
            .iter()
            .filter(|c| c.is_expired())
            .map(|c| c.name.clone())
            .collect();
        for name in &expired {
            self.remove(name);
        }
        expired.len()
    }

    /// Number of stored cookies (including not-yet-evicted expired ones)
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Serialize live cookies as `name=value; name2=value2`
    pub fn serialize(&self) -> String {
        self.cookies
            .iter()
            .filter(|c| !c.is_expired())
            .map(Cookie::serialize)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Parse a `;`-separated pair string into a jar of session cookies,
    /// skipping malformed fragments
    pub fn parse(header: &str) -> Self {
        let mut jar = Self::new();
        for part in header.split(';') {
            let Some((name, value)) = part.trim().split_once('=') else {
                continue;
            };
            let name = name.trim();
            if !valid_name(name) {
                continue;
            }
            jar.insert(Cookie::new(name, value.trim()));
        }
        jar
    }
}
