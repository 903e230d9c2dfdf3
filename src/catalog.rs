//! The system-catalog collaborator.
//!
//! Everything the deparser knows about an object it reads back through the
//! [`Catalog`] trait rather than from the parse tree, since the parse tree may
//! be incomplete or depend on the session's search path. Rows come back as
//! plain structs mirroring the catalog columns the deparser looks at; single
//! character markings (`relkind`, `relpersistence`, `attstorage`, `contype`)
//! are kept as they are stored.

use crate::ast::RangeVar;
use crate::{Error, Result};

/// Object identifier.
pub type Oid = u32;

pub const INVALID_OID: Oid = 0;

/// Well-known type OIDs with irregular typmod syntax.
pub const TIME_OID: Oid = 1083;
pub const TIMESTAMP_OID: Oid = 1114;
pub const TIMESTAMPTZ_OID: Oid = 1184;
pub const INTERVAL_OID: Oid = 1186;
pub const TIMETZ_OID: Oid = 1266;

/// `pg_class.relkind` values.
pub mod relkind {
    pub const RELATION: char = 'r';
    pub const INDEX: char = 'i';
    pub const SEQUENCE: char = 'S';
    pub const TOAST: char = 't';
    pub const VIEW: char = 'v';
    pub const MATVIEW: char = 'm';
    pub const COMPOSITE_TYPE: char = 'c';
    pub const FOREIGN_TABLE: char = 'f';
    pub const PARTITIONED_TABLE: char = 'p';
    pub const PARTITIONED_INDEX: char = 'I';
}

/// `pg_class.relpersistence` values.
pub mod persistence {
    pub const PERMANENT: char = 'p';
    pub const UNLOGGED: char = 'u';
    pub const TEMP: char = 't';
}

/// `pg_constraint.contype` values.
pub mod contype {
    pub const CHECK: char = 'c';
    pub const FOREIGN: char = 'f';
    pub const NOT_NULL: char = 'n';
    pub const PRIMARY: char = 'p';
    pub const UNIQUE: char = 'u';
    pub const TRIGGER: char = 't';
    pub const EXCLUSION: char = 'x';
}

/// `pg_index.indoption` bits.
pub const INDOPTION_DESC: i16 = 0x0001;
pub const INDOPTION_NULLS_FIRST: i16 = 0x0002;

/// The catalog an object lives in, for name lookups by OID and for the
/// addresses of collected commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogClass {
    Relation,
    Type,
    Collation,
    OperatorClass,
    Procedure,
    Constraint,
}

/// A `pg_type` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeForm {
    pub oid: Oid,
    pub name: String,
    pub namespace: Oid,
    /// Element type of an array type, [`INVALID_OID`] otherwise
    pub elem: Oid,
    /// Whether this is a true variable-length array (not e.g. `name`)
    pub is_array: bool,
    pub storage: char,
}

/// A `pg_class` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationForm {
    pub oid: Oid,
    pub name: String,
    pub namespace: Oid,
    pub relkind: char,
    pub persistence: char,
    /// Composite type of a typed table
    pub of_type: Oid,
    pub tablespace: Oid,
    pub access_method: Oid,
}

/// A `pg_attribute` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeForm {
    pub attnum: i16,
    pub name: String,
    pub type_oid: Oid,
    pub typmod: i32,
    pub collation: Oid,
    pub storage: char,
    pub has_default: bool,
    pub generated: bool,
}

/// A `pg_constraint` row.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintForm {
    pub oid: Oid,
    pub name: String,
    pub contype: char,
    /// The constraint expression, for CHECK constraints
    pub expr: Option<Expr>,
}

/// Snapshot of a sequence's parameters and state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceData {
    pub type_oid: Oid,
    pub start: i64,
    pub increment: i64,
    pub max: i64,
    pub min: i64,
    pub cache: i64,
    pub cycle: bool,
    pub last_value: i64,
}

/// One column of an index.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexColumn {
    Attribute(i16),
    Expression(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexKey {
    pub column: IndexColumn,
    pub collation: Oid,
    pub opclass: Oid,
    /// `INDOPTION_*` bits
    pub options: i16,
}

/// A `pg_index` row.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexForm {
    pub index_oid: Oid,
    pub relid: Oid,
    /// Key columns come first; the rest are INCLUDE columns
    pub nkeyatts: usize,
    pub keys: Vec<IndexKey>,
    pub predicate: Option<Expr>,
}

/// A `pg_am` row together with the capabilities the deparser cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessMethodForm {
    pub name: String,
    pub can_order: bool,
}

/// `pg_proc.provolatile`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Volatility {
    Immutable,
    Stable,
    Volatile,
}

/// An analyzed expression, as stored in the catalogs.
///
/// Only the structure the deparser inspects is modelled; rendering it as SQL
/// text is left to [`Catalog::deparse_expression`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal constant, already rendered
    Const(String),
    Column(String),
    FuncCall {
        func: Oid,
        name: String,
        args: Vec<Expr>,
        /// Written as `f(x)` rather than as a cast or special syntax
        explicit_call: bool,
    },
    OpExpr {
        /// Function implementing the operator
        func: Oid,
        op: String,
        args: Vec<Expr>,
    },
    /// `nextval()` of an identity or serial sequence
    NextValue(Oid),
    /// Any other node; only its children matter
    Other(Vec<Expr>),
}

impl Expr {
    pub fn is_explicit_call(&self) -> bool {
        matches!(self, Expr::FuncCall { explicit_call: true, .. })
    }
}

/// Reports whether any function called in `exprs` is volatile.
///
/// Nested expressions are walked on a stack that grows on demand.
pub fn contain_volatile_functions(catalog: &dyn Catalog, exprs: &[Expr]) -> Result<bool> {
    stacker::maybe_grow(32 * 1024, 1024 * 1024, || {
        for expr in exprs {
            let volatile = match expr {
                Expr::Const(_) | Expr::Column(_) => false,
                Expr::NextValue(_) => true,
                Expr::FuncCall { func, args, .. } | Expr::OpExpr { func, args, .. } => {
                    catalog.function_volatility(*func)? == Volatility::Volatile || contain_volatile_functions(catalog, args)?
                }
                Expr::Other(args) => contain_volatile_functions(catalog, args)?,
            };
            if volatile {
                return Ok(true);
            }
        }
        Ok(false)
    })
}

/// Read access to the system catalogs.
///
/// Lookups of objects the caller asserted exist fail with
/// [`Error::CatalogLookup`].
pub trait Catalog {
    fn namespace_name(&self, nspid: Oid) -> Result<String>;

    /// Whether `nspid` is some backend's temporary schema (or its toast schema).
    fn is_temp_namespace(&self, nspid: Oid) -> bool;

    /// Namespace and name of an object in a catalog with a name column.
    fn object_name(&self, class: CatalogClass, oid: Oid) -> Result<(Oid, String)>;

    fn type_form(&self, type_oid: Oid) -> Result<TypeForm>;

    /// Renders a type modifier, e.g. `(10)` or `(6) with time zone`.
    fn print_typmod(&self, _type_oid: Oid, typmod: i32) -> Result<String> {
        Ok(format!("({})", typmod))
    }

    fn relation(&self, relid: Oid) -> Result<RelationForm>;

    fn attribute(&self, relid: Oid, name: &str) -> Result<AttributeForm>;

    fn attribute_by_num(&self, relid: Oid, attnum: i16) -> Result<AttributeForm>;

    /// Constraints of a relation in catalog scan order.
    fn constraints(&self, relid: Oid) -> Result<Vec<ConstraintForm>>;

    fn constraint(&self, oid: Oid) -> Result<ConstraintForm>;

    fn constraint_oid_by_name(&self, relid: Oid, name: &str) -> Result<Oid>;

    /// The constraint's definition as `pg_get_constraintdef` renders it.
    fn constraint_definition(&self, oid: Oid) -> Result<String>;

    /// Direct parents of a relation, in inheritance sequence order.
    fn inherits(&self, relid: Oid) -> Result<Vec<Oid>>;

    fn has_superclass(&self, relid: Oid) -> Result<bool>;

    fn sequence(&self, seqid: Oid) -> Result<SequenceData>;

    /// The sequence backing an identity column, if any.
    fn identity_sequence(&self, relid: Oid, attnum: i16) -> Result<Option<Oid>>;

    fn resolve_relation(&self, rv: &RangeVar) -> Result<Oid>;

    fn index(&self, index_oid: Oid) -> Result<IndexForm>;

    fn access_method(&self, am_oid: Oid) -> Result<AccessMethodForm>;

    fn tablespace_name(&self, spcid: Oid) -> Result<String>;

    /// Storage options flattened into `name=value, ...` text.
    fn reloptions(&self, relid: Oid) -> Result<Option<String>>;

    /// The `FOR VALUES ...` text of a partition.
    fn partition_bound(&self, relid: Oid) -> Result<String>;

    /// The `PARTITION BY` key definition of a partitioned table.
    fn partition_key_definition(&self, relid: Oid) -> Result<String>;

    /// The default (or generation) expression of a column.
    fn column_default(&self, relid: Oid, attnum: i16) -> Result<Option<Expr>>;

    /// Renders an expression in the context of relation `relid`, with every
    /// object name schema-qualified.
    fn deparse_expression(&self, expr: &Expr, relid: Oid) -> Result<String>;

    fn function_volatility(&self, func: Oid) -> Result<Volatility>;

    fn current_user(&self) -> Result<String>;

    fn session_user(&self) -> Result<String>;
}

/// The error for a catalog row that should exist but does not.
pub fn lookup_failed(what: &str, oid: Oid) -> Error {
    Error::CatalogLookup(format!("{} with OID {}", what, oid))
}
