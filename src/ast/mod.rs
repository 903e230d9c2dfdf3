//! Native Rust types for the parse nodes of collected DDL commands.
//!
//! These are the parse trees the statement-execution pipeline hands over
//! alongside each executed command. The deparser only trusts them for what
//! the catalogs cannot tell (e.g. `IF NOT EXISTS`, explicitly written `NOT NULL`
//! constraints); everything else is read back from the catalogs.
//!
//! # Example
//!
//! ```rust
//! use pg_ddl_deparse::ast::{AlterTableCmd, DropBehavior};
//!
//! let cmd = AlterTableCmd::DropColumn { column: "b".into(), if_exists: true, behavior: DropBehavior::Cascade };
//! assert_eq!(cmd.subtype(), "DropColumn");
//! ```

mod nodes;

pub use nodes::*;
