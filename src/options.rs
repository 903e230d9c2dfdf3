//! Call-scoped deparse settings.

use serde::Deserialize;

/// Nesting depth accepted by the serializer unless configured otherwise.
///
/// Statement structure, not user data, drives the nesting, so real trees stay
/// well below this.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Settings threaded through one deparse call.
///
/// Can be embedded in a host's own configuration file; missing keys fall back
/// to [`DeparseOptions::default`].
///
/// # Example
///
/// ```rust
/// let opts: pg_ddl_deparse::DeparseOptions = serde_json::from_str(r#"{"verbose": false}"#).unwrap();
/// assert!(!opts.verbose);
/// assert_eq!(opts.max_depth, pg_ddl_deparse::DEFAULT_MAX_DEPTH);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeparseOptions {
    /// Emit default and absent clauses explicitly, marking absent sub-clauses
    /// with `present: false`. When off, those clauses are dropped from the
    /// output entirely.
    pub verbose: bool,
    /// Maximum object/array nesting accepted when serializing.
    pub max_depth: usize,
}

impl Default for DeparseOptions {
    fn default() -> Self {
        DeparseOptions { verbose: true, max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl DeparseOptions {
    /// Options for the terse rendering that omits default clauses.
    pub fn compact() -> Self {
        DeparseOptions { verbose: false, ..Default::default() }
    }
}
