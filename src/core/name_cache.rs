// src/core/name_cache.rs

use crate::{constants::NEGATION_PREFIX, models::Formatter};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::{cell::RefCell, collections::HashMap, rc::Rc};

lazy_static! {
    static ref LEADING_SEPARATORS_RE: Regex = Regex::new(r"^[_.\- ]+").unwrap();
    static ref SEPARATOR_WORD_RE: Regex = Regex::new(r"[_.\- ]+(\w|$)").unwrap();
    static ref DIGIT_WORD_RE: Regex = Regex::new(r"\d+(\w|$)").unwrap();
}

/// Converts an argument key into a camelCase property name.
///
/// - Leading and trailing separators (`_`, `.`, `-`, space) are dropped, so
///   `--dry-run` becomes `dryRun` and `-o` becomes `o`.
/// - Existing humps survive (`fooBar` stays `fooBar`, `XMLHttp` becomes `xmlHttp`).
/// - A letter that follows a run of digits is upper-cased (`foo2bar` -> `foo2Bar`).
pub fn camel_case(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let prepared = if trimmed != trimmed.to_lowercase() {
        preserve_humps(trimmed)
    } else {
        trimmed.to_string()
    };

    let lowered = LEADING_SEPARATORS_RE
        .replace(&prepared, "")
        .to_lowercase();

    let humped = SEPARATOR_WORD_RE.replace_all(&lowered, |caps: &Captures<'_>| {
        caps.get(1)
            .map_or_else(String::new, |m| m.as_str().to_uppercase())
    });

    DIGIT_WORD_RE
        .replace_all(&humped, |caps: &Captures<'_>| {
            caps.get(0)
                .map_or_else(String::new, |m| m.as_str().to_uppercase())
        })
        .into_owned()
}

/// Inserts a `-` at every lower->upper boundary and before the last capital
/// of an upper-case run that is followed by a lower-case letter, so the
/// later lower-casing pass does not flatten the humps.
fn preserve_humps(input: &str) -> String {
    let mut out: Vec<char> = Vec::with_capacity(input.len() + 4);
    let mut last_lower = false;
    let mut last_upper = false;
    let mut last_last_upper = false;

    for ch in input.chars() {
        if last_lower && ch.is_uppercase() {
            out.push('-');
            out.push(ch);
            last_lower = false;
            last_last_upper = last_upper;
            last_upper = true;
        } else if last_upper && last_last_upper && ch.is_lowercase() {
            let previous = out.pop();
            out.push('-');
            out.extend(previous);
            out.push(ch);
            last_last_upper = last_upper;
            last_upper = false;
            last_lower = true;
        } else {
            out.push(ch);
            last_lower = ch.is_lowercase();
            last_last_upper = last_upper;
            last_upper = ch.is_uppercase();
        }
    }

    out.into_iter().collect()
}

/// A memo of argument key -> property name conversions.
///
/// The cache is owned by whoever builds it (usually once per application) and
/// has no eviction; call [`NameCache::clear`] when the argument vocabulary
/// changes between walks.
#[derive(Debug, Default)]
pub struct NameCache {
    names: RefCell<HashMap<String, String>>,
}

impl NameCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the property name for `key`, computing and storing it on a miss.
    ///
    /// A leading `--no-` is stripped before conversion, so `--no-color` and
    /// `--color` both map to `color`.
    pub fn format(&self, key: &str) -> String {
        if let Some(name) = self.names.borrow().get(key) {
            return name.clone();
        }

        let stripped = key.strip_prefix(NEGATION_PREFIX).unwrap_or(key);
        let name = camel_case(stripped);
        log::trace!("Caching name '{}' for key '{}'", name, key);
        self.names
            .borrow_mut()
            .insert(key.to_string(), name.clone());
        name
    }

    /// Drops the entry for `key`, or every entry when `key` is `None`.
    pub fn clear(&self, key: Option<&str>) {
        match key {
            Some(key) => {
                self.names.borrow_mut().remove(key);
            }
            None => self.names.borrow_mut().clear(),
        }
    }

    /// Number of cached names.
    pub fn len(&self) -> usize {
        self.names.borrow().len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.names.borrow().is_empty()
    }

    /// Wraps a shared cache into a [`Formatter`] usable by `Config` and `Proxy`.
    pub fn formatter(self: &Rc<Self>) -> Formatter {
        let cache = Rc::clone(self);
        Rc::new(move |key: &str| cache.format(key))
    }
}
