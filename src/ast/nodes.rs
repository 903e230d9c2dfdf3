//! Native Rust types for the DDL parse nodes a collected command carries.
//!
//! These mirror the PostgreSQL parse tree structure for the statements this
//! crate deparses, using idiomatic Rust types instead of untyped node lists.

use crate::catalog::Oid;

/// The parse tree of a simple (non-ALTER TABLE) collected command.
#[derive(Debug, Clone)]
pub enum Node {
    CreateStmt(Box<CreateStmt>),
    CreateSeqStmt(Box<CreateSeqStmt>),
    IndexStmt(Box<IndexStmt>),
    CreateExtensionStmt(Box<CreateExtensionStmt>),

    // Any statement kind without a deparse routine; carries its node tag name
    Other(String),
}

impl Node {
    /// The parse node tag name, e.g. `"CreateStmt"`.
    pub fn tag(&self) -> &str {
        match self {
            Node::CreateStmt(_) => "CreateStmt",
            Node::CreateSeqStmt(_) => "CreateSeqStmt",
            Node::IndexStmt(_) => "IndexStmt",
            Node::CreateExtensionStmt(_) => "CreateExtensionStmt",
            Node::Other(tag) => tag,
        }
    }
}

// ============================================================================
// Shared building blocks
// ============================================================================

/// Table/relation reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeVar {
    pub schemaname: Option<String>,
    pub relname: String,
    /// Whether descendant tables are included (i.e. no `ONLY`)
    pub inh: bool,
}

impl RangeVar {
    pub fn new(relname: &str) -> Self {
        RangeVar { schemaname: None, relname: relname.to_string(), inh: true }
    }
}

/// Type name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeName {
    pub names: Vec<String>,
}

/// Role specification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSpec {
    pub roletype: RoleSpecType,
    pub rolename: String,
}

/// Argument of a definition element
#[derive(Debug, Clone, PartialEq)]
pub enum DefArg {
    Integer(i64),
    /// Numeric literal, kept as written
    Float(String),
    Boolean(bool),
    String(String),
    TypeName(TypeName),
}

/// Definition element (generic `name = value` option)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefElem {
    pub defnamespace: Option<String>,
    pub defname: String,
    pub arg: Option<DefArg>,
}

impl DefElem {
    pub fn new(defname: &str, arg: Option<DefArg>) -> Self {
        DefElem { defnamespace: None, defname: defname.to_string(), arg }
    }

    /// The argument rendered as option text; a bare option means `TRUE`.
    pub fn value_string(&self) -> String {
        match &self.arg {
            None => "TRUE".to_string(),
            Some(DefArg::Integer(i)) => i.to_string(),
            Some(DefArg::Float(f)) => f.clone(),
            Some(DefArg::Boolean(b)) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Some(DefArg::String(s)) => s.clone(),
            Some(DefArg::TypeName(t)) => t.names.join("."),
        }
    }
}

/// Column definition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnDef {
    pub colname: String,
    pub compression: Option<String>,
    pub is_local: bool,
    pub is_not_null: bool,
    pub identity: Option<ColumnIdentity>,
    pub identity_sequence: Option<RangeVar>,
    pub generated: Option<ColumnGenerated>,
    pub constraints: Vec<Constraint>,
}

impl ColumnDef {
    pub fn new(colname: &str) -> Self {
        ColumnDef { colname: colname.to_string(), is_local: true, ..Default::default() }
    }

    /// Whether the column carries an explicit `NOT NULL` constraint.
    pub fn has_not_null_constraint(&self) -> bool {
        self.constraints.iter().any(|c| c.contype == ConstrType::NotNull)
    }
}

/// Constraint definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraint {
    pub contype: ConstrType,
    pub deferrable: bool,
    pub initdeferred: bool,
    pub skip_validation: bool,
}

impl Constraint {
    pub fn new(contype: ConstrType) -> Self {
        Constraint { contype, ..Default::default() }
    }
}

/// An element of a CREATE TABLE body
#[derive(Debug, Clone, PartialEq)]
pub enum TableElement {
    Column(ColumnDef),
    Constraint(Constraint),
}

// ============================================================================
// DDL statement types
// ============================================================================

/// CREATE TABLE statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateStmt {
    pub relation: RangeVar,
    pub table_elts: Vec<TableElement>,
    pub inh_relations: Vec<RangeVar>,
    /// Present for `PARTITION OF` tables
    pub partbound: Option<PartitionBoundSpec>,
    pub of_typename: Option<TypeName>,
    pub options: Vec<DefElem>,
    pub oncommit: OnCommitAction,
    pub tablespacename: Option<String>,
    pub access_method: Option<String>,
    pub if_not_exists: bool,
}

/// Raw partition bound of a `PARTITION OF` table. Only its presence matters
/// here; the canonical bound text is read back from the catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionBoundSpec;

/// CREATE SEQUENCE statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateSeqStmt {
    pub sequence: RangeVar,
    pub for_identity: bool,
    pub if_not_exists: bool,
}

/// CREATE INDEX statement (also the definition behind index-backed constraints)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStmt {
    pub idxname: Option<String>,
    pub relation: RangeVar,
    pub index_oid: Oid,
    pub unique: bool,
    pub nulls_not_distinct: bool,
    pub primary: bool,
    pub is_constraint: bool,
    pub deferrable: bool,
    pub initdeferred: bool,
    pub concurrent: bool,
    pub if_not_exists: bool,
}

/// CREATE EXTENSION statement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateExtensionStmt {
    pub extname: String,
    pub if_not_exists: bool,
}

/// ALTER TABLE (or ALTER INDEX/VIEW/TYPE/...) statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterTableStmt {
    pub relation: RangeVar,
    /// Generated while expanding `LIKE` in a CREATE TABLE
    pub table_like: bool,
}

/// Column addressed by `ALTER COLUMN ... SET STATISTICS`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnTarget {
    Name(String),
    Number(i16),
}

/// REPLICA IDENTITY setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicaIdentity {
    Default,
    Full,
    Nothing,
    Index(String),
}

/// One ALTER TABLE subcommand.
///
/// Every variant carries exactly what its deparse routine needs.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterTableCmd {
    AddColumn { def: ColumnDef, if_not_exists: bool },
    AddColumnToView { def: ColumnDef },
    /// `SET DEFAULT` when `drop` is false, `DROP DEFAULT` otherwise
    ColumnDefault { column: String, drop: bool },
    CookedColumnDefault { attnum: i16 },
    DropNotNull { column: String },
    SetNotNull { column: String },
    DropExpression { column: String, if_exists: bool },
    CheckNotNull { column: String },
    SetStatistics { column: ColumnTarget, statistics: i32 },
    SetOptions { column: String, options: Vec<DefElem> },
    ResetOptions { column: String, options: Vec<DefElem> },
    SetStorage { column: String, storage: String },
    SetCompression { column: String, method: String },
    DropColumn { column: String, if_exists: bool, behavior: DropBehavior },
    AddIndex { index: IndexStmt },
    ReAddIndex { index: IndexStmt },
    AddConstraint { constraint: Constraint },
    ReAddConstraint { constraint: Constraint },
    ReAddDomainConstraint { constraint: Constraint },
    AddIndexConstraint { index: IndexStmt },
    AlterConstraint { constraint: Constraint },
    ValidateConstraint { name: String },
    DropConstraint { name: String, if_exists: bool, behavior: DropBehavior },
    ReAddComment,
    /// `USING` is set when the subcommand had a USING expression
    AlterColumnType { column: String, using: bool, behavior: DropBehavior },
    AlterColumnGenericOptions { column: String, options: Vec<DefElem> },
    ChangeOwner { newowner: RoleSpec },
    ClusterOn { index: String },
    DropCluster,
    SetLogged,
    SetUnLogged,
    SetAccessMethod { name: String },
    DropOids,
    SetTableSpace { name: String },
    SetRelOptions { options: Vec<DefElem> },
    ResetRelOptions { options: Vec<DefElem> },
    ReplaceRelOptions { options: Vec<DefElem> },
    EnableTrig { name: String },
    EnableAlwaysTrig { name: String },
    EnableReplicaTrig { name: String },
    DisableTrig { name: String },
    EnableTrigAll,
    DisableTrigAll,
    EnableTrigUser,
    DisableTrigUser,
    EnableRule { name: String },
    EnableAlwaysRule { name: String },
    EnableReplicaRule { name: String },
    DisableRule { name: String },
    AddInherit { parent: RangeVar },
    DropInherit { parent: RangeVar },
    /// The type is the subcommand's address
    AddOf,
    DropOf,
    ReplicaIdentity { identity: ReplicaIdentity },
    EnableRowSecurity,
    DisableRowSecurity,
    ForceRowSecurity,
    NoForceRowSecurity,
    GenericOptions { options: Vec<DefElem> },
    AttachPartition { name: RangeVar },
    DetachPartition { name: RangeVar, concurrent: bool },
    DetachPartitionFinalize { name: RangeVar },
    AddIdentity { column: String, def: ColumnDef },
    /// `generated` is set when `SET GENERATED ...` was given
    SetIdentity { column: String, generated: Option<ColumnIdentity> },
    DropIdentity { column: String, if_exists: bool },
    ReAddStatistics,
}

impl AlterTableCmd {
    /// The subcommand kind, as used in diagnostics.
    pub fn subtype(&self) -> &'static str {
        match self {
            AlterTableCmd::AddColumn { .. } => "AddColumn",
            AlterTableCmd::AddColumnToView { .. } => "AddColumnToView",
            AlterTableCmd::ColumnDefault { .. } => "ColumnDefault",
            AlterTableCmd::CookedColumnDefault { .. } => "CookedColumnDefault",
            AlterTableCmd::DropNotNull { .. } => "DropNotNull",
            AlterTableCmd::SetNotNull { .. } => "SetNotNull",
            AlterTableCmd::DropExpression { .. } => "DropExpression",
            AlterTableCmd::CheckNotNull { .. } => "CheckNotNull",
            AlterTableCmd::SetStatistics { .. } => "SetStatistics",
            AlterTableCmd::SetOptions { .. } => "SetOptions",
            AlterTableCmd::ResetOptions { .. } => "ResetOptions",
            AlterTableCmd::SetStorage { .. } => "SetStorage",
            AlterTableCmd::SetCompression { .. } => "SetCompression",
            AlterTableCmd::DropColumn { .. } => "DropColumn",
            AlterTableCmd::AddIndex { .. } => "AddIndex",
            AlterTableCmd::ReAddIndex { .. } => "ReAddIndex",
            AlterTableCmd::AddConstraint { .. } => "AddConstraint",
            AlterTableCmd::ReAddConstraint { .. } => "ReAddConstraint",
            AlterTableCmd::ReAddDomainConstraint { .. } => "ReAddDomainConstraint",
            AlterTableCmd::AddIndexConstraint { .. } => "AddIndexConstraint",
            AlterTableCmd::AlterConstraint { .. } => "AlterConstraint",
            AlterTableCmd::ValidateConstraint { .. } => "ValidateConstraint",
            AlterTableCmd::DropConstraint { .. } => "DropConstraint",
            AlterTableCmd::ReAddComment => "ReAddComment",
            AlterTableCmd::AlterColumnType { .. } => "AlterColumnType",
            AlterTableCmd::AlterColumnGenericOptions { .. } => "AlterColumnGenericOptions",
            AlterTableCmd::ChangeOwner { .. } => "ChangeOwner",
            AlterTableCmd::ClusterOn { .. } => "ClusterOn",
            AlterTableCmd::DropCluster => "DropCluster",
            AlterTableCmd::SetLogged => "SetLogged",
            AlterTableCmd::SetUnLogged => "SetUnLogged",
            AlterTableCmd::SetAccessMethod { .. } => "SetAccessMethod",
            AlterTableCmd::DropOids => "DropOids",
            AlterTableCmd::SetTableSpace { .. } => "SetTableSpace",
            AlterTableCmd::SetRelOptions { .. } => "SetRelOptions",
            AlterTableCmd::ResetRelOptions { .. } => "ResetRelOptions",
            AlterTableCmd::ReplaceRelOptions { .. } => "ReplaceRelOptions",
            AlterTableCmd::EnableTrig { .. } => "EnableTrig",
            AlterTableCmd::EnableAlwaysTrig { .. } => "EnableAlwaysTrig",
            AlterTableCmd::EnableReplicaTrig { .. } => "EnableReplicaTrig",
            AlterTableCmd::DisableTrig { .. } => "DisableTrig",
            AlterTableCmd::EnableTrigAll => "EnableTrigAll",
            AlterTableCmd::DisableTrigAll => "DisableTrigAll",
            AlterTableCmd::EnableTrigUser => "EnableTrigUser",
            AlterTableCmd::DisableTrigUser => "DisableTrigUser",
            AlterTableCmd::EnableRule { .. } => "EnableRule",
            AlterTableCmd::EnableAlwaysRule { .. } => "EnableAlwaysRule",
            AlterTableCmd::EnableReplicaRule { .. } => "EnableReplicaRule",
            AlterTableCmd::DisableRule { .. } => "DisableRule",
            AlterTableCmd::AddInherit { .. } => "AddInherit",
            AlterTableCmd::DropInherit { .. } => "DropInherit",
            AlterTableCmd::AddOf => "AddOf",
            AlterTableCmd::DropOf => "DropOf",
            AlterTableCmd::ReplicaIdentity { .. } => "ReplicaIdentity",
            AlterTableCmd::EnableRowSecurity => "EnableRowSecurity",
            AlterTableCmd::DisableRowSecurity => "DisableRowSecurity",
            AlterTableCmd::ForceRowSecurity => "ForceRowSecurity",
            AlterTableCmd::NoForceRowSecurity => "NoForceRowSecurity",
            AlterTableCmd::GenericOptions { .. } => "GenericOptions",
            AlterTableCmd::AttachPartition { .. } => "AttachPartition",
            AlterTableCmd::DetachPartition { .. } => "DetachPartition",
            AlterTableCmd::DetachPartitionFinalize { .. } => "DetachPartitionFinalize",
            AlterTableCmd::AddIdentity { .. } => "AddIdentity",
            AlterTableCmd::SetIdentity { .. } => "SetIdentity",
            AlterTableCmd::DropIdentity { .. } => "DropIdentity",
            AlterTableCmd::ReAddStatistics => "ReAddStatistics",
        }
    }
}

// ============================================================================
// Enums
// ============================================================================

/// ON COMMIT action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnCommitAction {
    #[default]
    Noop,
    PreserveRows,
    DeleteRows,
    Drop,
}

/// DROP behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropBehavior {
    #[default]
    Restrict,
    Cascade,
}

/// Constraint type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstrType {
    #[default]
    Null,
    NotNull,
    Default,
    Identity,
    Generated,
    Check,
    Primary,
    Unique,
    Exclusion,
    Foreign,
    AttrDeferrable,
    AttrNotDeferrable,
    AttrDeferred,
    AttrImmediate,
}

/// Role spec type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleSpecType {
    #[default]
    CString,
    CurrentRole,
    CurrentUser,
    SessionUser,
    Public,
}

/// `GENERATED { ALWAYS | BY DEFAULT } AS IDENTITY`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnIdentity {
    Always,
    ByDefault,
}

/// `GENERATED ALWAYS AS (...) STORED`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnGenerated {
    Stored,
}
