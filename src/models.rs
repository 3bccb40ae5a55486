// src/models.rs

use crate::{
    constants::{DEFAULT_BREAK_LABEL, DEFAULT_SEPARATOR},
    core::{
        argument::Argument, error::ArgError, name_cache::NameCache,
        preprocess::preprocess_arguments_map,
    },
};
use serde_json::Value;
use std::{collections::HashMap, fmt, rc::Rc};

// --- CALLBACK TYPES ---

/// A handler invoked for one argument. It reads the [`Argument`] view and
/// tells the dispatch loop whether to keep going.
pub type Visitor = Box<dyn FnMut(&mut Argument<'_>) -> Result<Signal, ArgError>>;

/// A value producer used by the composition builders: it receives the current
/// argument and the value already stored on the target (if any).
pub type Transformer = Rc<dyn Fn(&mut Argument<'_>, Option<&Value>) -> Result<Value, ArgError>>;

/// Maps a raw argument key to a property name.
pub type Formatter = Rc<dyn Fn(&str) -> String>;

/// Rewrites an arguments map once, before the walk starts.
pub type Preprocessor = Box<dyn Fn(ArgumentsMap) -> ArgumentsMap>;

/// Boxes a closure as a [`Visitor`], pinning down its higher-ranked signature.
pub fn visitor<F>(f: F) -> Visitor
where
    F: FnMut(&mut Argument<'_>) -> Result<Signal, ArgError> + 'static,
{
    Box::new(f)
}

/// Wraps a closure as a [`Transformer`].
pub fn transformer<F>(f: F) -> Transformer
where
    F: Fn(&mut Argument<'_>, Option<&Value>) -> Result<Value, ArgError> + 'static,
{
    Rc::new(f)
}

// --- BREAK SENTINEL ---

/// The value a visitor hands back to stop the walk.
///
/// Equality is identity: two breakers are equal only if one is a clone of the
/// other, so a visitor must return the breaker it was given (see
/// [`Argument::stop`]).
#[derive(Clone)]
pub struct Breaker(Rc<str>);

impl Breaker {
    /// Creates a fresh, unique sentinel. The label only shows up in `Debug`.
    pub fn new(label: &str) -> Self {
        Self(Rc::from(label))
    }

    /// The label given at creation.
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl Default for Breaker {
    fn default() -> Self {
        Self::new(DEFAULT_BREAK_LABEL)
    }
}

impl PartialEq for Breaker {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Breaker {}

impl fmt::Debug for Breaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Breaker({})", self.0)
    }
}

/// What a visitor returns to the dispatch loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Signal {
    /// Move on to the next token.
    #[default]
    Continue,
    /// Stop, if the breaker is the one active for this walk.
    Break(Breaker),
}

impl Signal {
    /// Whether this signal ends a walk whose active sentinel is `active`.
    pub fn stops(&self, active: &Breaker) -> bool {
        matches!(self, Self::Break(breaker) if breaker == active)
    }
}

// --- ARGUMENTS MAP ---

/// One entry of an [`ArgumentsMap`].
pub enum Entry {
    /// Points at another key; followed until a handler (or nothing) is found.
    Alias(String),
    /// The handler for this key.
    Handler(Visitor),
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alias(target) => f.debug_tuple("Alias").field(target).finish(),
            Self::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

/// The known arguments of a walk, keyed by the argument as typed (`--name`,
/// `-n`, or a grouped key like `"-n, --name"` before preprocessing).
///
/// Keys keep their first insertion order; inserting an existing key replaces
/// its entry in place.
#[derive(Debug, Default)]
pub struct ArgumentsMap {
    order: Vec<String>,
    entries: HashMap<String, Entry>,
}

impl ArgumentsMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler closure for `key`.
    pub fn handler<F>(self, key: impl Into<String>, f: F) -> Self
    where
        F: FnMut(&mut Argument<'_>) -> Result<Signal, ArgError> + 'static,
    {
        self.visitor(key, visitor(f))
    }

    /// Registers an already boxed [`Visitor`] (e.g. one built by a `Proxy`).
    pub fn visitor(mut self, key: impl Into<String>, visit: Visitor) -> Self {
        self.insert(key, Entry::Handler(visit));
        self
    }

    /// Makes `from` an alias of `to`.
    pub fn alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.insert(from, Entry::Alias(to.into()));
        self
    }

    /// Inserts or replaces an entry.
    pub fn insert(&mut self, key: impl Into<String>, entry: Entry) {
        let key = key.into();
        if !self.entries.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.entries.insert(key, entry);
    }

    /// Looks up an entry.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// The handler registered directly under `key`, if the entry is one.
    pub fn visitor_mut(&mut self, key: &str) -> Option<&mut Visitor> {
        match self.entries.get_mut(key) {
            Some(Entry::Handler(visit)) => Some(visit),
            _ => None,
        }
    }

    /// Whether `key` has an entry.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Consumes the map, yielding entries in insertion order.
    pub fn into_entries(mut self) -> impl Iterator<Item = (String, Entry)> {
        let entries: Vec<(String, Entry)> = self
            .order
            .into_iter()
            .filter_map(|key| self.entries.remove(&key).map(|entry| (key, entry)))
            .collect();
        entries.into_iter()
    }
}

// --- WALK CONFIGURATION ---

/// Out-of-band settings of one walk, kept apart from the arguments map so no
/// setting can collide with a real argument key.
pub struct Config {
    pub(crate) tokens: Option<Vec<String>>,
    pub(crate) separator: String,
    pub(crate) breaker: Breaker,
    pub(crate) formatter: Formatter,
    pub(crate) preprocessor: Preprocessor,
    pub(crate) unknown: Option<Visitor>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tokens: None,
            separator: DEFAULT_SEPARATOR.to_string(),
            breaker: Breaker::default(),
            formatter: Rc::new(NameCache::new()).formatter(),
            preprocessor: Box::new(preprocess_arguments_map),
            unknown: None,
        }
    }
}

impl Config {
    /// Default settings: process arguments, `=` separator, a fresh breaker,
    /// camelCase names and grouped-alias preprocessing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks these tokens instead of the process arguments.
    pub fn tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Splits a command line the way a POSIX shell would and walks the result.
    ///
    /// # Errors
    /// Returns [`ArgError::CommandLine`] when quotes are unbalanced.
    pub fn command_line(self, line: &str) -> Result<Self, ArgError> {
        let tokens = shlex::split(line).ok_or_else(|| ArgError::CommandLine(line.to_string()))?;
        Ok(self.tokens(tokens))
    }

    /// Changes the inline key/value splitter. An empty separator disables inline values.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Uses `breaker` as the sentinel that stops the walk.
    pub fn breaker(mut self, breaker: Breaker) -> Self {
        self.breaker = breaker;
        self
    }

    /// Formats `Argument::name` with a custom function.
    pub fn formatter<F>(mut self, format: F) -> Self
    where
        F: Fn(&str) -> String + 'static,
    {
        self.formatter = Rc::new(format);
        self
    }

    /// Formats `Argument::name` through a shared [`NameCache`].
    pub fn name_cache(mut self, cache: &Rc<NameCache>) -> Self {
        self.formatter = cache.formatter();
        self
    }

    /// Replaces the arguments map preprocessor.
    pub fn preprocessor<F>(mut self, preprocess: F) -> Self
    where
        F: Fn(ArgumentsMap) -> ArgumentsMap + 'static,
    {
        self.preprocessor = Box::new(preprocess);
        self
    }

    /// Called for every token whose key has no handler.
    pub fn on_unknown<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Argument<'_>) -> Result<Signal, ArgError> + 'static,
    {
        self.unknown = Some(visitor(f));
        self
    }

    /// The sentinel this walk will stop on.
    pub fn active_breaker(&self) -> &Breaker {
        &self.breaker
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("tokens", &self.tokens)
            .field("separator", &self.separator)
            .field("breaker", &self.breaker)
            .field("unknown", &self.unknown.is_some())
            .finish_non_exhaustive()
    }
}
