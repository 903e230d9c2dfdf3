//! Rust library that turns executed PostgreSQL DDL commands into a
//! machine-editable object tree, and serializes that tree into a
//! self-describing JSON document.
//!
//! Each tree node carries a format template such as
//! `CREATE %{persistence}s TABLE %{identity}D` together with named parameters
//! that fill its placeholders. A downstream consumer can edit the parameters
//! (rename a schema, drop a clause) and expand the template back into SQL.
//!
//! Object names and types are read back from a [`Catalog`] rather than taken
//! from the statement text, so the output is fully schema-qualified and
//! independent of the `search_path` in effect when the command ran.
//!
//! ## Example: deparsing a DROP
//!
//! ```rust
//! let json = pg_ddl_deparse::deparse_drop_ddl("public.foo", "toast table").unwrap().unwrap();
//! assert!(json.starts_with(r#"{"fmt":"DROP %{objtype}s IF EXISTS %{objidentity}s %{cascade}s","objtype":"table""#));
//!
//! // columns go away with their table
//! assert!(pg_ddl_deparse::deparse_drop_ddl("public.foo.a", "table column").unwrap().is_none());
//! ```
//!
//! ## Example: building a tree by hand
//!
//! ```rust
//! use pg_ddl_deparse::ObjTree;
//!
//! let mut tree = ObjTree::new("ALTER TABLE %{identity}s").param("identity", "public.t");
//! tree.append_string("OWNER TO %{owner}I", "alice").unwrap();
//! assert_eq!(
//!     tree.to_json(pg_ddl_deparse::DEFAULT_MAX_DEPTH).unwrap(),
//!     r#"{"fmt":"ALTER TABLE %{identity}s OWNER TO %{owner}I","identity":"public.t","owner":"alice"}"#
//! );
//! ```

pub mod ast;
pub mod catalog;
pub mod command;
mod deparse;
mod error;
pub mod objtree;
mod options;
mod reconstruct;
mod serialize;

pub use catalog::{Catalog, Oid};
pub use command::{Collected, CollectedAtSubcmd, CollectedCommand, ObjectAddress};
pub use deparse::*;
pub use error::*;
pub use objtree::{ObjElem, ObjTree, ObjType, ObjValue};
pub use options::*;
pub use reconstruct::{keyword_kind, quote_identifier, quote_qualified_identifier, KeywordKind};
