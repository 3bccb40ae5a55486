// src/core/mod.rs

pub mod argument;
pub mod cursor;
pub mod error;
pub mod name_cache;
pub mod preprocess;
pub mod proxy;
pub mod resolver;
pub mod transform;
pub mod visitor;
