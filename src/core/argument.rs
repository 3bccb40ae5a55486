// src/core/argument.rs

use crate::{
    core::cursor::Cursor,
    models::{Breaker, Formatter, Signal},
};
use std::fmt;

/// The view a visitor gets of the argument being dispatched.
///
/// It borrows the walk's [`Cursor`], so anything that moves the cursor here
/// (`value()` taking the next token, `next_arg().consume()`) is seen by the
/// dispatch loop when it moves on.
pub struct Argument<'a> {
    cursor: &'a mut Cursor,
    format: &'a Formatter,
    breaker: &'a Breaker,
}

impl<'a> Argument<'a> {
    /// Builds the view for the argument the cursor has just entered.
    pub fn new(cursor: &'a mut Cursor, format: &'a Formatter, breaker: &'a Breaker) -> Self {
        Self {
            cursor,
            format,
            breaker,
        }
    }

    /// Every token of the walk.
    pub fn argv(&self) -> &[String] {
        self.cursor.tokens()
    }

    /// The full token, e.g. `--use-strict=0`.
    pub fn raw(&self) -> &str {
        self.cursor.raw()
    }

    /// Index of this argument in [`Argument::argv`].
    pub fn index(&self) -> usize {
        self.cursor.arg_index()
    }

    /// The key after alias resolution, e.g. `--use-strict`.
    pub fn key(&self) -> &str {
        self.cursor.key()
    }

    /// The key as typed, when it reached [`Argument::key`] through an alias.
    pub fn alias(&self) -> Option<&str> {
        let written = self.cursor.written();
        (written != self.cursor.key()).then_some(written)
    }

    /// The key as typed, alias or not.
    pub fn written(&self) -> &str {
        self.cursor.written()
    }

    /// The formatted key (`useStrict` for `--use-strict` by default).
    pub fn name(&self) -> String {
        (self.format)(self.key())
    }

    /// `-x`, but not `--x`.
    pub fn is_short_flag(&self) -> bool {
        let mut chars = self.key().chars();
        chars.next() == Some('-') && chars.next() != Some('-')
    }

    /// `--x`, but not `---x`.
    pub fn is_long_flag(&self) -> bool {
        self.key().starts_with("--") && self.key().chars().nth(2) != Some('-')
    }

    /// Whether the key starts with `pattern`.
    pub fn starts_with(&self, pattern: &str) -> bool {
        self.key().starts_with(pattern)
    }

    /// Whether the key ends with `pattern`.
    pub fn ends_with(&self, pattern: &str) -> bool {
        self.key().ends_with(pattern)
    }

    /// Whether the key contains `pattern`.
    pub fn contains(&self, pattern: &str) -> bool {
        self.key().contains(pattern)
    }

    /// The argument's value, inline or taken from the next token.
    ///
    /// See [`Cursor::value`] for the exact rules.
    pub fn value(&mut self) -> Option<String> {
        self.cursor.value()
    }

    /// Access to the tokens following this argument.
    pub fn next_arg(&mut self) -> NextArg<'_> {
        NextArg {
            cursor: &mut *self.cursor,
        }
    }

    /// The sentinel that stops this walk.
    pub fn breaker(&self) -> &Breaker {
        self.breaker
    }

    /// The signal that stops this walk.
    pub fn stop(&self) -> Signal {
        Signal::Break(self.breaker.clone())
    }
}

impl fmt::Debug for Argument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argument")
            .field("raw", &self.raw())
            .field("index", &self.index())
            .field("key", &self.key())
            .field("alias", &self.alias())
            .finish()
    }
}

/// Look-ahead helpers over the tokens after the current position.
#[derive(Debug)]
pub struct NextArg<'b> {
    cursor: &'b mut Cursor,
}

impl NextArg<'_> {
    /// The next token, without moving.
    pub fn peek(&self) -> Option<String> {
        self.cursor.peek().map(str::to_string)
    }

    /// Whether there is a next token.
    pub fn exists(&self) -> bool {
        self.cursor.has_next()
    }

    /// Moves onto the next token and returns it, so the loop will not dispatch it.
    pub fn consume(&mut self) -> Option<String> {
        self.cursor.consume().map(str::to_string)
    }

    /// A copy of every token after the current position.
    pub fn rest(&self) -> Vec<String> {
        self.cursor.rest().to_vec()
    }

    /// Undoes every `consume()` made for the current argument.
    pub fn reset(&mut self) {
        self.cursor.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::name_cache::NameCache;
    use std::rc::Rc;

    fn with_argument<R>(tokens: &[&str], key: &str, f: impl FnOnce(&mut Argument<'_>) -> R) -> R {
        let mut cursor = Cursor::new(tokens.iter().map(|s| s.to_string()).collect(), "=");
        cursor.enter();
        cursor.resolve_to(key);
        let format = Rc::new(NameCache::new()).formatter();
        let breaker = Breaker::default();
        let mut argument = Argument::new(&mut cursor, &format, &breaker);
        f(&mut argument)
    }

    #[test]
    fn test_view_accessors() {
        with_argument(&["-o=dist", "x"], "--out-dir", |arg| {
            assert_eq!(arg.raw(), "-o=dist");
            assert_eq!(arg.index(), 0);
            assert_eq!(arg.key(), "--out-dir");
            assert_eq!(arg.alias(), Some("-o"));
            assert_eq!(arg.written(), "-o");
            assert_eq!(arg.name(), "outDir");
            assert_eq!(arg.argv().len(), 2);
        });
    }

    #[test]
    fn test_alias_absent_without_resolution() {
        with_argument(&["--name"], "--name", |arg| {
            assert_eq!(arg.alias(), None);
        });
    }

    #[test]
    fn test_flag_shapes() {
        with_argument(&["-v"], "-v", |arg| {
            assert!(arg.is_short_flag());
            assert!(!arg.is_long_flag());
        });
        with_argument(&["--verbose"], "--verbose", |arg| {
            assert!(!arg.is_short_flag());
            assert!(arg.is_long_flag());
            assert!(arg.starts_with("--verb"));
            assert!(arg.ends_with("ose"));
            assert!(arg.contains("erbo"));
        });
        with_argument(&["---"], "---", |arg| {
            assert!(!arg.is_short_flag());
            assert!(!arg.is_long_flag());
        });
        with_argument(&["build"], "build", |arg| {
            assert!(!arg.is_short_flag());
            assert!(!arg.is_long_flag());
        });
    }

    #[test]
    fn test_next_arg_helpers() {
        with_argument(&["--pair", "a", "b"], "--pair", |arg| {
            assert!(arg.next_arg().exists());
            assert_eq!(arg.next_arg().peek().as_deref(), Some("a"));
            assert_eq!(arg.next_arg().consume().as_deref(), Some("a"));
            assert_eq!(arg.next_arg().rest(), vec!["b".to_string()]);

            arg.next_arg().reset();
            assert_eq!(arg.next_arg().rest(), vec!["a".to_string(), "b".to_string()]);
        });
    }

    #[test]
    fn test_stop_carries_the_active_breaker() {
        with_argument(&["--"], "--", |arg| {
            assert!(arg.stop().stops(arg.breaker()));
        });
    }
}
