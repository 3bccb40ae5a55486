// src/constants.rs

/// The default key/value splitter used for inline values (`--name=value`).
pub const DEFAULT_SEPARATOR: &str = "=";

/// Prefix stripped by the default name formatter (`--no-color` -> `color`).
pub const NEGATION_PREFIX: &str = "--no-";

/// Separates the names of a grouped-alias key (`"-o, --out-dir"`).
pub const GROUP_SEPARATOR: char = ',';

/// The default separator used by `collect()` to split a single value into many.
pub const DEFAULT_COLLECT_SEPARATOR: &str = ",";

/// Label of the break sentinel created when none is configured.
pub const DEFAULT_BREAK_LABEL: &str = "visit_argv break";
