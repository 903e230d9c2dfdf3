//! Collected commands: what the statement-execution pipeline records about
//! each executed DDL command for later deparsing.

use crate::ast::{AlterTableCmd, AlterTableStmt, CreateStmt, Node};
use crate::catalog::{CatalogClass, Oid};

/// Identifies a catalog object, optionally a sub-object such as a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectAddress {
    pub class: CatalogClass,
    pub object_id: Oid,
    pub object_sub_id: i32,
}

impl ObjectAddress {
    pub fn new(class: CatalogClass, object_id: Oid) -> Self {
        ObjectAddress { class, object_id, object_sub_id: 0 }
    }

    pub fn relation(object_id: Oid) -> Self {
        ObjectAddress::new(CatalogClass::Relation, object_id)
    }

    pub fn constraint(object_id: Oid) -> Self {
        ObjectAddress::new(CatalogClass::Constraint, object_id)
    }

    /// The address of column `attnum` of relation `relid`.
    pub fn column(relid: Oid, attnum: i16) -> Self {
        ObjectAddress { class: CatalogClass::Relation, object_id: relid, object_sub_id: attnum.into() }
    }
}

/// One executed ALTER TABLE subcommand.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedAtSubcmd {
    /// The object the subcommand affected (a column, constraint, index,
    /// parent or partition), which is not necessarily the altered relation
    pub address: ObjectAddress,
    pub parsetree: AlterTableCmd,
    /// Rendered `USING` expression of `ALTER COLUMN ... TYPE`
    pub using_expr: Option<String>,
}

impl CollectedAtSubcmd {
    pub fn new(address: ObjectAddress, parsetree: AlterTableCmd) -> Self {
        CollectedAtSubcmd { address, parsetree, using_expr: None }
    }
}

#[derive(Debug, Clone)]
pub enum Collected {
    /// A command that creates or modifies a single object
    Simple { address: ObjectAddress, parsetree: Node },
    AlterTable { object_id: Oid, parsetree: AlterTableStmt, subcmds: Vec<CollectedAtSubcmd> },
    /// CREATE TABLE AS, carrying the CREATE TABLE it was rewritten into
    CreateTableAs { address: ObjectAddress, real_create: CreateStmt },
}

/// A collected command.
#[derive(Debug, Clone)]
pub struct CollectedCommand {
    /// Executed while installing an extension
    pub in_extension: bool,
    pub command: Collected,
}

impl CollectedCommand {
    pub fn simple(object_id: Oid, parsetree: Node) -> Self {
        CollectedCommand { in_extension: false, command: Collected::Simple { address: ObjectAddress::relation(object_id), parsetree } }
    }

    pub fn alter_table(object_id: Oid, parsetree: AlterTableStmt, subcmds: Vec<CollectedAtSubcmd>) -> Self {
        CollectedCommand { in_extension: false, command: Collected::AlterTable { object_id, parsetree, subcmds } }
    }

    pub fn create_table_as(object_id: Oid, real_create: CreateStmt) -> Self {
        CollectedCommand { in_extension: false, command: Collected::CreateTableAs { address: ObjectAddress::relation(object_id), real_create } }
    }

    /// The OID of the object the command targets.
    pub fn object_id(&self) -> Oid {
        match &self.command {
            Collected::Simple { address, .. } | Collected::CreateTableAs { address, .. } => address.object_id,
            Collected::AlterTable { object_id, .. } => *object_id,
        }
    }
}
