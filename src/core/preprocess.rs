// src/core/preprocess.rs

use crate::{
    constants::GROUP_SEPARATOR,
    models::{ArgumentsMap, Entry},
};

/// Expands grouped keys into aliases of their last name.
///
/// ```text
/// "-o, --out-dir" => handler
/// ```
/// becomes
/// ```text
/// "-o"        => alias of "--out-dir"
/// "--out-dir" => handler
/// ```
///
/// Entries are processed in insertion order; a later entry for the same key
/// replaces an earlier one.
pub fn preprocess_arguments_map(map: ArgumentsMap) -> ArgumentsMap {
    let mut visitors = ArgumentsMap::new();

    for (key, entry) in map.into_entries() {
        if !key.contains(GROUP_SEPARATOR) {
            visitors.insert(key, entry);
            continue;
        }

        let mut names: Vec<&str> = key.split(GROUP_SEPARATOR).map(str::trim).collect();
        let canonical = names.pop().unwrap_or_default().to_string();

        for alias in names {
            log::trace!("Expanding alias '{}' -> '{}'", alias, canonical);
            visitors.insert(alias, Entry::Alias(canonical.clone()));
        }
        visitors.insert(canonical, entry);
    }

    visitors
}
