// src/core/proxy.rs

use crate::{
    constants::DEFAULT_COLLECT_SEPARATOR,
    core::{
        error::ArgError,
        name_cache::NameCache,
        transform::{self, Defaults, Getters},
    },
    models::{Formatter, Signal, Transformer, Visitor, transformer, visitor},
};
use regex::Regex;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::{cell::RefCell, fmt, rc::Rc};

/// The object a [`Proxy`] populates, shared by every visitor it builds.
pub type Target = Rc<RefCell<Map<String, Value>>>;

/// How `collect` turns one argument into items.
enum Collector {
    Literal(String),
    Pattern(Regex),
    Transform(Transformer),
}

impl Collector {
    fn split(value: Option<String>, split: impl Fn(&str) -> Vec<String>) -> Vec<Value> {
        match value {
            Some(value) if !value.is_empty() => split(&value)
                .into_iter()
                .map(|item| Value::String(item.trim().to_string()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Reads the stored value of `option`, treating `null` as unset.
fn stored(target: &Target, option: &str) -> Option<Value> {
    target
        .borrow()
        .get(option)
        .filter(|value| !value.is_null())
        .cloned()
}

/// Builds visitors that write into a shared target object.
///
/// Every visitor stores its result under the formatted key of the argument
/// (`--out-dir` -> `outDir` by default), so a whole command line can be turned
/// into a config object and then deserialized:
///
/// ```
/// use argvisit::{ArgumentsMap, Config, Proxy, visit_argv};
///
/// let proxy = Proxy::default();
/// let known = ArgumentsMap::new()
///     .visitor("-o, --out-dir", proxy.value())
///     .visitor("--require", proxy.collect());
///
/// visit_argv(known, Config::new().tokens(["-o", "dist", "--require=a,b"])).unwrap();
///
/// assert_eq!(proxy.lookup("--out-dir"), Some("dist".into()));
/// ```
#[derive(Clone)]
pub struct Proxy {
    target: Target,
    format: Formatter,
}

impl Default for Proxy {
    fn default() -> Self {
        Self::new(Map::new())
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("target", &self.target.borrow())
            .finish_non_exhaustive()
    }
}

impl Proxy {
    /// Wraps `target`, naming properties through a fresh [`NameCache`].
    pub fn new(target: Map<String, Value>) -> Self {
        Self::with_formatter(target, Rc::new(NameCache::new()).formatter())
    }

    /// Wraps `target`, naming properties with `format`.
    pub fn with_formatter(target: Map<String, Value>, format: Formatter) -> Self {
        Self {
            target: Rc::new(RefCell::new(target)),
            format,
        }
    }

    /// Wraps `target`, naming properties through a shared cache.
    pub fn with_cache(target: Map<String, Value>, cache: &Rc<NameCache>) -> Self {
        Self::with_formatter(target, cache.formatter())
    }

    /// Starts from any serializable value (usually a struct of defaults).
    ///
    /// # Errors
    /// Fails if `defaults` does not serialize to a JSON object.
    pub fn from_serialize<T: Serialize>(defaults: &T) -> Result<Self, ArgError> {
        match serde_json::to_value(defaults)? {
            Value::Object(map) => Ok(Self::new(map)),
            other => Err(ArgError::Target(<serde_json::Error as serde::ser::Error>::custom(
                format!("expected an object, found {other}"),
            ))),
        }
    }

    /// A snapshot of the target.
    pub fn config(&self) -> Map<String, Value> {
        self.target.borrow().clone()
    }

    /// The shared target itself.
    pub fn target(&self) -> Target {
        Rc::clone(&self.target)
    }

    /// Converts the current target into `T`.
    ///
    /// # Errors
    /// Fails when the target does not match the shape of `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ArgError> {
        Ok(serde_json::from_value(Value::Object(self.config()))?)
    }

    /// The stored value for an argument key (`--name` reads `name`).
    pub fn lookup(&self, key: &str) -> Option<Value> {
        stored(&self.target, &(self.format)(key))
    }

    /// Stores a value for an argument key.
    pub fn assign(&self, key: &str, value: impl Into<Value>) {
        let option = (self.format)(key);
        self.target.borrow_mut().insert(option, value.into());
    }

    // --- VISITOR BUILDERS ---

    /// Stores the argument's value (`null` when it has none).
    pub fn value(&self) -> Visitor {
        self.assigner(None)
    }

    /// Stores whatever `transform` returns; it receives the previous value.
    pub fn value_with(&self, transform: Transformer) -> Visitor {
        self.assigner(Some(transform))
    }

    fn assigner(&self, transform: Option<Transformer>) -> Visitor {
        let target = Rc::clone(&self.target);
        let format = Rc::clone(&self.format);

        visitor(move |arg| {
            let option = format(arg.key());
            let value = match &transform {
                Some(transform) => {
                    let previous = stored(&target, &option);
                    transform(arg, previous.as_ref())?
                }
                None => arg.value().map_or(Value::Null, Value::String),
            };
            target.borrow_mut().insert(option, value);
            Ok(Signal::Continue)
        })
    }

    /// Appends the comma-separated parts of the value to a list, skipping
    /// items already present. A non-list previous value becomes the first item.
    pub fn collect(&self) -> Visitor {
        self.collect_split(DEFAULT_COLLECT_SEPARATOR)
    }

    /// Like [`Proxy::collect`], splitting on `separator`.
    pub fn collect_split(&self, separator: &str) -> Visitor {
        self.collector(Collector::Literal(separator.to_string()))
    }

    /// Like [`Proxy::collect`], splitting on a regex.
    pub fn collect_pattern(&self, pattern: Regex) -> Visitor {
        self.collector(Collector::Pattern(pattern))
    }

    /// Appends what `transform` returns (a list is appended item by item).
    /// The transform receives the current list as its previous value.
    pub fn collect_with(&self, transform: Transformer) -> Visitor {
        self.collector(Collector::Transform(transform))
    }

    fn collector(&self, how: Collector) -> Visitor {
        let target = Rc::clone(&self.target);
        let format = Rc::clone(&self.format);

        visitor(move |arg| {
            let option = format(arg.key());
            let mut collection = match stored(&target, &option) {
                Some(Value::Array(items)) => items,
                Some(other) => vec![other],
                None => Vec::new(),
            };

            let incoming = match &how {
                Collector::Literal(separator) => Collector::split(arg.value(), |value| {
                    value.split(separator.as_str()).map(str::to_string).collect()
                }),
                Collector::Pattern(pattern) => Collector::split(arg.value(), |value| {
                    pattern.split(value).map(str::to_string).collect()
                }),
                Collector::Transform(transform) => {
                    let previous = Value::Array(collection.clone());
                    match transform(arg, Some(&previous))? {
                        Value::Array(items) => items,
                        Value::Null => Vec::new(),
                        item => vec![item],
                    }
                }
            };

            for item in incoming {
                if !collection.contains(&item) {
                    collection.push(item);
                }
            }
            target
                .borrow_mut()
                .insert(option, Value::Array(collection));
            Ok(Signal::Continue)
        })
    }

    /// Stores the first occurrence only. Later occurrences read nothing, so a
    /// value token after them is dispatched on its own.
    pub fn once(&self) -> Visitor {
        self.first_wins(None)
    }

    /// Stores `cb(arg, None)` on the first occurrence. On later occurrences
    /// `cb(arg, Some(previous))` is called and its result dropped, so it can
    /// report a duplicate by returning an error.
    pub fn once_with(&self, cb: Transformer) -> Visitor {
        self.first_wins(Some(cb))
    }

    /// Stores the value on the first occurrence and fails with
    /// [`ArgError::Duplicate`] on any later one.
    pub fn unique(&self) -> Visitor {
        self.once_with(transformer(|arg, previous| {
            if previous.is_some() {
                return Err(ArgError::Duplicate {
                    key: arg.key().to_string(),
                });
            }
            Ok(arg.value().map_or(Value::Null, Value::String))
        }))
    }

    fn first_wins(&self, cb: Option<Transformer>) -> Visitor {
        let target = Rc::clone(&self.target);
        let format = Rc::clone(&self.format);

        visitor(move |arg| {
            let option = format(arg.key());

            if let Some(previous) = stored(&target, &option) {
                if let Some(cb) = &cb {
                    cb(arg, Some(&previous))?;
                }
                return Ok(Signal::Continue);
            }

            let value = match &cb {
                Some(cb) => cb(arg, None)?,
                None => arg.value().map_or(Value::Null, Value::String),
            };
            target.borrow_mut().insert(option, value);
            Ok(Signal::Continue)
        })
    }

    /// Stores every token after this one and stops the walk.
    pub fn last(&self) -> Visitor {
        self.terminator(None)
    }

    /// Stores `cb(arg, previous)` and stops the walk.
    pub fn last_with(&self, cb: Transformer) -> Visitor {
        self.terminator(Some(cb))
    }

    fn terminator(&self, cb: Option<Transformer>) -> Visitor {
        let target = Rc::clone(&self.target);
        let format = Rc::clone(&self.format);

        visitor(move |arg| {
            let option = format(arg.key());
            let value = match &cb {
                Some(cb) => {
                    let previous = stored(&target, &option);
                    cb(arg, previous.as_ref())?
                }
                None => Value::from(arg.next_arg().rest()),
            };
            target.borrow_mut().insert(option, value);
            Ok(arg.stop())
        })
    }

    // --- TRANSFORMER BUILDERS ---

    /// See [`transform::flag`].
    pub fn flag(&self) -> Transformer {
        transform::flag()
    }

    /// See [`transform::flag_with`].
    pub fn flag_with(&self, transform: Transformer) -> Transformer {
        transform::flag_with(transform)
    }

    /// See [`transform::option`].
    pub fn option<F>(&self, transform: F) -> Transformer
    where
        F: Fn(&str, Option<&Value>) -> Result<Value, ArgError> + 'static,
    {
        transform::option(transform)
    }

    /// See [`transform::option_or`].
    pub fn option_or<F>(&self, transform: F, defaults: Defaults) -> Transformer
    where
        F: Fn(&str, Option<&Value>) -> Result<Value, ArgError> + 'static,
    {
        transform::option_or(transform, defaults)
    }

    /// See [`transform::optional`].
    pub fn optional<F>(&self, transform: F) -> Transformer
    where
        F: Fn(Option<&str>, Option<&Value>) -> Result<Value, ArgError> + 'static,
    {
        transform::optional(transform)
    }

    /// The ready-made transformers.
    pub fn get(&self) -> Getters {
        Getters
    }
}
