// src/lib.rs

//! A visitor-style command-line walker.
//!
//! [`visit_argv`] walks the argument list once and hands every token to the
//! handler registered for its key in an [`ArgumentsMap`]. Handlers may read a
//! value, consume following tokens or stop the walk. [`Proxy`] builds handlers
//! that write into a JSON object which can then be deserialized into a typed
//! config.

pub mod constants;
pub mod core;
pub mod models;

pub use crate::core::{
    argument::{Argument, NextArg},
    error::ArgError,
    name_cache::{NameCache, camel_case},
    preprocess::preprocess_arguments_map,
    proxy::{Proxy, Target},
    resolver::find_visitor,
    transform::{Defaults, Getters},
    visitor::visit_argv,
};
pub use crate::models::{
    ArgumentsMap, Breaker, Config, Entry, Formatter, Preprocessor, Signal, Transformer, Visitor,
    transformer, visitor,
};
