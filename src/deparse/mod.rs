//! Statement deparsing: from a collected command to its object tree and JSON
//! document.
//!
//! A [`Deparser`] lives for one call. It holds the catalog to read back from
//! and the [`DeparseOptions`] every tree built during the call is stamped with,
//! so concurrent calls never share state.

mod alter_table;
mod column;
mod create_index;
mod create_sequence;
mod create_table;

use crate::ast::{DropBehavior, Node};
use crate::catalog::{persistence, Catalog, Oid};
use crate::command::{Collected, CollectedCommand};
use crate::objtree::ObjTree;
use crate::options::DeparseOptions;
use crate::Result;

/// Object type labels whose DROP records are not replayed on their own.
const SKIPPED_DROP_TYPES: &[&str] = &["table constraint", "default value", "operator of access method", "function of access method", "table column"];

/// Deparse state for a single call.
pub struct Deparser<'a> {
    catalog: &'a dyn Catalog,
    options: DeparseOptions,
}

impl<'a> Deparser<'a> {
    pub fn new(catalog: &'a dyn Catalog, options: DeparseOptions) -> Self {
        Deparser { catalog, options }
    }

    pub fn options(&self) -> DeparseOptions {
        self.options
    }

    pub(crate) fn catalog(&self) -> &'a dyn Catalog {
        self.catalog
    }

    /// A new tree tracking a template, under this call's verbosity.
    pub(crate) fn tree(&self, fmt: &str) -> ObjTree {
        ObjTree::new(fmt).with_verbose(self.options.verbose)
    }

    /// A new tree without a template, under this call's verbosity.
    pub(crate) fn bare(&self) -> ObjTree {
        ObjTree::bare().with_verbose(self.options.verbose)
    }

    /// Builds the object tree of a collected command.
    ///
    /// Returns `None` for commands that are intentionally not represented,
    /// such as the CREATE SEQUENCE behind an identity column.
    pub fn deparse(&self, cmd: &CollectedCommand) -> Result<Option<ObjTree>> {
        match &cmd.command {
            Collected::Simple { address, parsetree } => self.deparse_simple_command(cmd.in_extension, address.object_id, parsetree),
            Collected::AlterTable { object_id, parsetree, subcmds } => self.deparse_alter_relation(*object_id, parsetree, subcmds),
            Collected::CreateTableAs { address, real_create } => self.deparse_create_stmt(address.object_id, real_create).map(Some),
        }
    }

    /// Like [`Deparser::deparse`], serialized to JSON text.
    pub fn deparse_to_json(&self, cmd: &CollectedCommand) -> Result<Option<String>> {
        self.deparse(cmd)?.map(|tree| tree.to_json(self.options.max_depth)).transpose()
    }

    fn deparse_simple_command(&self, in_extension: bool, object_id: Oid, parsetree: &Node) -> Result<Option<ObjTree>> {
        if in_extension && !matches!(parsetree, Node::CreateExtensionStmt(_)) {
            return Ok(None);
        }

        match parsetree {
            Node::CreateSeqStmt(stmt) => self.deparse_create_seq_stmt(object_id, stmt),
            Node::CreateStmt(stmt) => self.deparse_create_stmt(object_id, stmt).map(Some),
            Node::IndexStmt(stmt) => self.deparse_index_stmt(object_id, stmt),
            other => {
                tracing::debug!(target: "pg_ddl_deparse::deparse", "unrecognized node type in deparse command: {}", other.tag());
                Ok(None)
            }
        }
    }
}

/// Deparses a collected command into its JSON document.
///
/// Returns `Ok(None)` when the command has nothing to emit.
pub fn deparse_utility_command(cmd: &CollectedCommand, catalog: &dyn Catalog, options: DeparseOptions) -> Result<Option<String>> {
    Deparser::new(catalog, options).deparse_to_json(cmd)
}

/// Deparses a collected command, growing the stack if needed.
///
/// # Arguments
///
/// * `stack_size` - The stack size in bytes to ensure is available for deparsing
pub fn deparse_utility_command_with_stack(
    cmd: &CollectedCommand,
    catalog: &dyn Catalog,
    options: DeparseOptions,
    stack_size: usize,
) -> Result<Option<String>> {
    stacker::maybe_grow(32 * 1024, stack_size, || deparse_utility_command(cmd, catalog, options))
}

/// Renders a DROP of an object that may no longer exist in the catalogs.
///
/// # Example
///
/// ```rust
/// use pg_ddl_deparse::ast::DropBehavior;
///
/// let json = pg_ddl_deparse::deparse_drop_command("public.foo", "table", DropBehavior::Cascade).unwrap();
/// assert_eq!(
///     json,
///     r#"{"fmt":"DROP %{objtype}s IF EXISTS %{objidentity}s %{cascade}s","objtype":"table","objidentity":"public.foo","cascade":{"fmt":"CASCADE","present":true}}"#
/// );
/// ```
pub fn deparse_drop_command(objidentity: &str, objtype: &str, behavior: DropBehavior) -> Result<String> {
    deparse_drop_command_with_options(objidentity, objtype, behavior, DeparseOptions::default())
}

pub fn deparse_drop_command_with_options(objidentity: &str, objtype: &str, behavior: DropBehavior, options: DeparseOptions) -> Result<String> {
    deparse_drop_tree(objidentity, objtype, behavior, options)?.to_json(options.max_depth)
}

/// `DROP %{objtype}s IF EXISTS %{objidentity}s %{cascade}s`
pub fn deparse_drop_tree(objidentity: &str, objtype: &str, behavior: DropBehavior, options: DeparseOptions) -> Result<ObjTree> {
    let mut stmt = ObjTree::new("DROP %{objtype}s IF EXISTS %{objidentity}s")
        .with_verbose(options.verbose)
        .param("objtype", objtype)
        .param("objidentity", objidentity);
    let cascade = ObjTree::new("CASCADE").with_verbose(options.verbose).param("present", behavior == DropBehavior::Cascade);
    stmt.append_object("%{cascade}s", cascade)?;
    Ok(stmt)
}

/// Renders the DROP of a dropped object for replay, always with CASCADE.
///
/// Objects that go away together with their owner (columns, defaults,
/// table constraints, operator class members) yield `None`; a toast table
/// is dropped as a plain table.
pub fn deparse_drop_ddl(objidentity: &str, objtype: &str) -> Result<Option<String>> {
    if SKIPPED_DROP_TYPES.contains(&objtype) {
        return Ok(None);
    }
    let objtype = if objtype == "toast table" { "table" } else { objtype };
    deparse_drop_command(objidentity, objtype, DropBehavior::Cascade).map(Some)
}

/// Deparses a command for write-ahead logging: temporary relations are
/// skipped and the output is compact.
pub fn deparse_table_init_write(cmd: &CollectedCommand, catalog: &dyn Catalog) -> Result<Option<String>> {
    if catalog.relation(cmd.object_id())?.persistence == persistence::TEMP {
        return Ok(None);
    }
    deparse_utility_command(cmd, catalog, DeparseOptions::compact())
}
