// src/core/transform.rs

use crate::{
    constants::NEGATION_PREFIX,
    core::{argument::Argument, error::ArgError},
    models::{Transformer, transformer},
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Number, Value};
use std::collections::HashMap;

lazy_static! {
    static ref ISO_DATE_RE: Regex = Regex::new(
        r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])([T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?)?$"
    )
    .unwrap();
}

/// Fallback values for `option_or`, keyed by the argument as typed or by its
/// resolved key (the typed form is tried first).
pub type Defaults = HashMap<String, String>;

/// The value of `arg`, or its default, or a [`ArgError::MissingValue`].
fn require(arg: &mut Argument<'_>, defaults: Option<&Defaults>) -> Result<String, ArgError> {
    if let Some(value) = arg.value() {
        return Ok(value);
    }

    defaults
        .and_then(|defaults| {
            [arg.written(), arg.key()]
                .into_iter()
                .filter_map(|key| defaults.get(key))
                .find(|value| !value.is_empty())
                .cloned()
        })
        .ok_or_else(|| ArgError::MissingValue {
            key: arg.key().to_string(),
        })
}

fn string_or_null(value: Option<String>) -> Value {
    value.map_or(Value::Null, Value::String)
}

/// Fails with [`ArgError::UnexpectedValue`] when the argument carries a value,
/// otherwise yields `true`.
pub fn flag() -> Transformer {
    flag_with(transformer(|_, _| Ok(Value::Bool(true))))
}

/// Like [`flag`], but yields whatever `transform` returns.
pub fn flag_with(transform: Transformer) -> Transformer {
    transformer(move |arg, previous| {
        if arg.value().is_some() {
            return Err(ArgError::UnexpectedValue {
                key: arg.key().to_string(),
            });
        }
        transform(arg, previous)
    })
}

/// Requires a value and passes it through `transform`.
pub fn option<F>(transform: F) -> Transformer
where
    F: Fn(&str, Option<&Value>) -> Result<Value, ArgError> + 'static,
{
    transformer(move |arg, previous| {
        let value = require(arg, None)?;
        transform(&value, previous)
    })
}

/// Like [`option`], but consults `defaults` before failing.
pub fn option_or<F>(transform: F, defaults: Defaults) -> Transformer
where
    F: Fn(&str, Option<&Value>) -> Result<Value, ArgError> + 'static,
{
    transformer(move |arg, previous| {
        let value = require(arg, Some(&defaults))?;
        transform(&value, previous)
    })
}

/// Never fails on a missing value; `transform` sees `None` instead.
pub fn optional<F>(transform: F) -> Transformer
where
    F: Fn(Option<&str>, Option<&Value>) -> Result<Value, ArgError> + 'static,
{
    transformer(move |arg, previous| {
        let value = arg.value();
        transform(value.as_deref(), previous)
    })
}

fn parse_number(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Number::from(int));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|float| float.is_finite())
        .and_then(Number::from_f64)
}

/// Ready-made transformers for the usual value shapes.
///
/// Each getter returns a fresh [`Transformer`], so they can be handed straight
/// to `Proxy::value_with`, `Proxy::once_with` and friends.
#[derive(Debug, Clone, Copy, Default)]
pub struct Getters;

impl Getters {
    /// The value as a string, or `null`.
    pub fn optional(&self) -> Transformer {
        optional(|value, _| Ok(string_or_null(value.map(str::to_string))))
    }

    /// The value as a string; errors when missing.
    pub fn required(&self) -> Transformer {
        option(|value, _| Ok(Value::String(value.to_string())))
    }

    /// Same as [`Getters::required`].
    pub fn string(&self) -> Transformer {
        self.required()
    }

    /// The value parsed as a number (integer when possible).
    pub fn number(&self) -> Transformer {
        transformer(|arg, _| {
            let value = require(arg, None)?;
            parse_number(&value)
                .map(Value::Number)
                .ok_or_else(|| ArgError::invalid(arg.key(), &value, "expected a number"))
        })
    }

    /// `true/1/yes/on` or `false/0/no/off`; anything else is an error.
    pub fn boolean(&self) -> Transformer {
        transformer(|arg, _| {
            let value = require(arg, None)?;
            match value.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
                "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
                _ => Err(ArgError::invalid(arg.key(), &value, "expected a boolean")),
            }
        })
    }

    /// An ISO-8601 date (`2024-05-01`, optionally with a time), kept as a string.
    pub fn date(&self) -> Transformer {
        transformer(|arg, _| {
            let value = require(arg, None)?;
            if ISO_DATE_RE.is_match(value.trim()) {
                Ok(Value::String(value.trim().to_string()))
            } else {
                Err(ArgError::invalid(arg.key(), &value, "expected an ISO-8601 date"))
            }
        })
    }

    /// `false` when typed as `--no-...`, `true` otherwise. Rejects values.
    ///
    /// The prefix is checked on the key as typed, not on the key it resolves
    /// to, so an alias `--no-color -> --color` yields `false`.
    pub fn flag(&self) -> Transformer {
        flag_with(transformer(|arg, _| {
            Ok(Value::Bool(!arg.written().starts_with(NEGATION_PREFIX)))
        }))
    }

    /// Always `true`. Rejects values.
    pub fn truthy(&self) -> Transformer {
        flag()
    }

    /// Always `false`. Rejects values.
    pub fn falsy(&self) -> Transformer {
        flag_with(transformer(|_, _| Ok(Value::Bool(false))))
    }

    /// Whether the value is `true`, `1` or `yes`.
    pub fn yes(&self) -> Transformer {
        option(|value, _| Ok(Value::Bool(matches!(value, "true" | "1" | "yes"))))
    }

    /// Whether the value is `false`, `0` or `no`.
    pub fn no(&self) -> Transformer {
        option(|value, _| Ok(Value::Bool(matches!(value, "false" | "0" | "no"))))
    }

    /// Every token after the current position.
    pub fn rest(&self) -> Transformer {
        transformer(|arg, _| Ok(Value::from(arg.next_arg().rest())))
    }
}
