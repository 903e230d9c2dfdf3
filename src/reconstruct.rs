//! Catalog-reconstruction helpers.
//!
//! These re-derive canonical names, types, index definitions, defaults and
//! constraints straight from the catalogs, never from parse-tree text, and
//! hand back plain values or small object-tree fragments for the statement
//! builders to assemble.

use itertools::Itertools;

use crate::ast::{DefElem, RoleSpec, RoleSpecType};
use crate::catalog::{contype, persistence, CatalogClass, Expr, IndexColumn, Oid, INVALID_OID};
use crate::catalog::{INDOPTION_DESC, INDOPTION_NULLS_FIRST};
use crate::catalog::{INTERVAL_OID, TIMESTAMPTZ_OID, TIMESTAMP_OID, TIMETZ_OID, TIME_OID};
use crate::deparse::Deparser;
use crate::objtree::{ObjTree, ObjValue};
use crate::{Error, Result};

/// Schema name standing in for any session's temporary schema.
pub const TEMP_SCHEMA: &str = "pg_temp";

/// Keyword category, as the SQL grammar classifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordKind {
    NoKeyword,
    UnreservedKeyword,
    ColNameKeyword,
    TypeFuncNameKeyword,
    ReservedKeyword,
}

// Sorted; only categories that force quoting are listed.
const COL_NAME_KEYWORDS: &[&str] = &[
    "between", "bigint", "bit", "boolean", "char", "character", "coalesce", "dec", "decimal", "exists", "extract", "float", "greatest",
    "grouping", "inout", "int", "integer", "interval", "json", "json_array", "json_arrayagg", "json_exists", "json_object",
    "json_objectagg", "json_query", "json_scalar", "json_serialize", "json_table", "json_value", "least", "merge_action", "national",
    "nchar", "none", "normalize", "nullif", "numeric", "out", "overlay", "position", "precision", "real", "row", "setof", "smallint",
    "substring", "time", "timestamp", "treat", "trim", "values", "varchar", "xmlattributes", "xmlconcat", "xmlelement", "xmlexists",
    "xmlforest", "xmlnamespaces", "xmlparse", "xmlpi", "xmlroot", "xmlserialize", "xmltable",
];

const TYPE_FUNC_NAME_KEYWORDS: &[&str] = &[
    "authorization", "binary", "collation", "concurrently", "cross", "current_schema", "freeze", "full", "ilike", "inner", "is", "isnull",
    "join", "left", "like", "natural", "notnull", "outer", "overlaps", "right", "similar", "tablesample", "verbose",
];

const RESERVED_KEYWORDS: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric", "both", "case", "cast", "check", "collate", "column",
    "constraint", "create", "current_catalog", "current_date", "current_role", "current_time", "current_timestamp", "current_user",
    "default", "deferrable", "desc", "distinct", "do", "else", "end", "except", "false", "fetch", "for", "foreign", "from", "grant",
    "group", "having", "in", "initially", "intersect", "into", "lateral", "leading", "limit", "localtime", "localtimestamp", "not",
    "null", "offset", "on", "only", "or", "order", "placing", "primary", "references", "returning", "select", "session_user", "some",
    "symmetric", "system_user", "table", "then", "to", "trailing", "true", "union", "unique", "user", "using", "variadic", "when",
    "where", "window", "with",
];

/// Classifies a lower-case word. Unreserved keywords never need quoting and
/// are reported as [`KeywordKind::NoKeyword`].
pub fn keyword_kind(word: &str) -> KeywordKind {
    if RESERVED_KEYWORDS.binary_search(&word).is_ok() {
        KeywordKind::ReservedKeyword
    } else if TYPE_FUNC_NAME_KEYWORDS.binary_search(&word).is_ok() {
        KeywordKind::TypeFuncNameKeyword
    } else if COL_NAME_KEYWORDS.binary_search(&word).is_ok() {
        KeywordKind::ColNameKeyword
    } else {
        KeywordKind::NoKeyword
    }
}

/// Quotes an identifier if the SQL grammar would not read it back verbatim.
///
/// # Example
///
/// ```rust
/// use pg_ddl_deparse::quote_identifier;
///
/// assert_eq!(quote_identifier("foo_1"), "foo_1");
/// assert_eq!(quote_identifier("Foo"), "\"Foo\"");
/// assert_eq!(quote_identifier("user"), "\"user\"");
/// assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
/// ```
pub fn quote_identifier(ident: &str) -> String {
    let mut chars = ident.chars();
    let safe = match chars.next() {
        Some(first) => {
            (first.is_ascii_lowercase() || first == '_') && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }
        None => false,
    };

    if safe && keyword_kind(ident) == KeywordKind::NoKeyword {
        return ident.to_string();
    }
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quotes a schema-qualified name.
pub fn quote_qualified_identifier(schema: Option<&str>, name: &str) -> String {
    match schema {
        Some(schema) => format!("{}.{}", quote_identifier(schema), quote_identifier(name)),
        None => quote_identifier(name),
    }
}

/// The SQL keyword for a `relpersistence` marking.
pub fn persistence_str(marking: char) -> Result<&'static str> {
    match marking {
        persistence::TEMP => Ok("TEMPORARY"),
        persistence::UNLOGGED => Ok("UNLOGGED"),
        persistence::PERMANENT => Ok(""),
        other => Err(Error::Unexpected(format!("persistence marking {:?}", other))),
    }
}

/// The STORAGE keyword for an `attstorage`/`typstorage` marking.
pub fn storage_str(marking: char) -> Result<&'static str> {
    match marking {
        'p' => Ok("plain"),
        'e' => Ok("external"),
        'x' => Ok("extended"),
        'm' => Ok("main"),
        other => Err(Error::Unexpected(format!("storage specifier {:?}", other))),
    }
}

/// The label reported for a `contype` marking in table element lists.
/// Foreign keys are not reported as table elements.
fn constraint_label(marking: char) -> Result<Option<&'static str>> {
    match marking {
        contype::CHECK => Ok(Some("check")),
        contype::FOREIGN => Ok(None),
        contype::PRIMARY => Ok(Some("primary key")),
        contype::UNIQUE => Ok(Some("unique")),
        contype::TRIGGER => Ok(Some("trigger")),
        contype::EXCLUSION => Ok(Some("exclusion")),
        other => Err(Error::Unexpected(format!("constraint type {:?}", other))),
    }
}

/// A type split into the parts a renderer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDetail {
    /// `None` for SQL-standard names that must not be qualified or quoted
    pub namespace: Option<Oid>,
    pub name: String,
    /// Parenthesized modifier, or empty
    pub typmod: String,
    pub is_array: bool,
}

/// An index definition split into its clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    pub access_method: String,
    /// Parenthesized key list, including any INCLUDE list
    pub definition: String,
    pub reloptions: Option<String>,
    pub tablespace: Option<String>,
    pub where_clause: Option<String>,
}

impl Deparser<'_> {
    fn schema_name(&self, nspid: Oid) -> Result<String> {
        if self.catalog().is_temp_namespace(nspid) {
            Ok(TEMP_SCHEMA.to_string())
        } else {
            self.catalog().namespace_name(nspid)
        }
    }

    /// `{schemaname, objname}` for `%{}D` placeholders.
    pub(crate) fn qualname(&self, nspid: Oid, name: &str) -> Result<ObjTree> {
        Ok(self.bare().param("schemaname", self.schema_name(nspid)?).param("objname", name))
    }

    pub(crate) fn qualname_id(&self, class: CatalogClass, oid: Oid) -> Result<ObjTree> {
        let (nspid, name) = self.catalog().object_name(class, oid)?;
        self.qualname(nspid, &name)
    }

    fn qualified_name_string(&self, class: CatalogClass, oid: Oid) -> Result<String> {
        let (nspid, name) = self.catalog().object_name(class, oid)?;
        Ok(quote_qualified_identifier(Some(&self.schema_name(nspid)?), &name))
    }

    pub(crate) fn format_type_detailed(&self, type_oid: Oid, typmod: i32) -> Result<TypeDetail> {
        let mut form = self.catalog().type_form(type_oid)?;

        let is_array = form.is_array && form.storage != 'p';
        if is_array {
            form = self.catalog().type_form(form.elem)?;
        }

        let (namespace, name) = match form.oid {
            INTERVAL_OID => (None, "INTERVAL"),
            TIMESTAMPTZ_OID if typmod < 0 => (None, "TIMESTAMP WITH TIME ZONE"),
            // the modifier carries WITH TIME ZONE
            TIMESTAMPTZ_OID | TIMESTAMP_OID => (None, "TIMESTAMP"),
            TIMETZ_OID if typmod < 0 => (None, "TIME WITH TIME ZONE"),
            TIMETZ_OID | TIME_OID => (None, "TIME"),
            _ => (Some(form.namespace), form.name.as_str()),
        };

        let typmod = if typmod >= 0 { self.catalog().print_typmod(form.oid, typmod)? } else { String::new() };
        Ok(TypeDetail { namespace, name: name.to_string(), typmod, is_array })
    }

    /// `{schemaname, typename, typmod, typarray}` for `%{}T` placeholders.
    pub(crate) fn type_tree(&self, type_oid: Oid, typmod: i32) -> Result<ObjTree> {
        let detail = self.format_type_detailed(type_oid, typmod)?;
        let schema = match detail.namespace {
            Some(nspid) => self.schema_name(nspid)?,
            None => String::new(),
        };
        Ok(self
            .bare()
            .param("schemaname", schema)
            .param("typename", detail.name)
            .param("typmod", detail.typmod)
            .param("typarray", detail.is_array))
    }

    pub(crate) fn index_definition(&self, index_oid: Oid) -> Result<IndexDefinition> {
        let index = self.catalog().index(index_oid)?;
        let index_rel = self.catalog().relation(index_oid)?;
        let am = self.catalog().access_method(index_rel.access_method)?;

        let mut columns = Vec::with_capacity(index.keys.len());
        for (keyno, key) in index.keys.iter().enumerate() {
            let mut column = match &key.column {
                IndexColumn::Attribute(attnum) => quote_identifier(&self.catalog().attribute_by_num(index.relid, *attnum)?.name),
                IndexColumn::Expression(expr) => {
                    let text = self.catalog().deparse_expression(expr, index.relid)?;
                    // a bare function call needs no parentheses
                    if expr.is_explicit_call() {
                        text
                    } else {
                        format!("({})", text)
                    }
                }
            };

            if keyno < index.nkeyatts {
                if key.collation != INVALID_OID {
                    column.push_str(" COLLATE ");
                    column.push_str(&self.qualified_name_string(CatalogClass::Collation, key.collation)?);
                }

                column.push(' ');
                column.push_str(&self.qualified_name_string(CatalogClass::OperatorClass, key.opclass)?);

                if am.can_order {
                    if key.options & INDOPTION_DESC != 0 {
                        column.push_str(" DESC");
                        if key.options & INDOPTION_NULLS_FIRST == 0 {
                            column.push_str(" NULLS LAST");
                        }
                    } else if key.options & INDOPTION_NULLS_FIRST != 0 {
                        column.push_str(" NULLS FIRST");
                    }
                }
            }
            columns.push(column);
        }

        let (key_columns, include_columns) = columns.split_at(index.nkeyatts.min(columns.len()));
        let definition = if include_columns.is_empty() {
            format!("({})", key_columns.iter().join(", "))
        } else {
            format!("({}) INCLUDE ({})", key_columns.iter().join(", "), include_columns.iter().join(", "))
        };

        let tablespace = match index_rel.tablespace {
            INVALID_OID => None,
            spcid => Some(quote_identifier(&self.catalog().tablespace_name(spcid)?)),
        };
        let where_clause = match &index.predicate {
            Some(pred) => Some(self.catalog().deparse_expression(pred, index.relid)?),
            None => None,
        };

        Ok(IndexDefinition {
            access_method: quote_identifier(&am.name),
            definition,
            reloptions: self.catalog().reloptions(index_oid)?,
            tablespace,
            where_clause,
        })
    }

    /// Renders a column's default or generation expression, collecting the
    /// expression into `exprs` when given.
    pub(crate) fn column_default(&self, relid: Oid, attnum: i16, exprs: Option<&mut Vec<Expr>>) -> Result<String> {
        let Some(expr) = self.catalog().column_default(relid, attnum)? else {
            return Ok(String::new());
        };
        let text = self.catalog().deparse_expression(&expr, relid)?;
        if let Some(exprs) = exprs {
            exprs.push(expr);
        }
        Ok(text)
    }

    /// Qualified names of the relation's direct parents.
    pub(crate) fn inh_relations(&self, relid: Oid) -> Result<Vec<ObjTree>> {
        self.catalog().inherits(relid)?.into_iter().map(|parent| self.qualname_id(CatalogClass::Relation, parent)).collect()
    }

    /// Appends the relation's constraints, except foreign keys, to a table
    /// element list.
    pub(crate) fn obtain_constraints(&self, elements: &mut Vec<ObjValue>, relid: Oid) -> Result<()> {
        for constr in self.catalog().constraints(relid)? {
            let Some(label) = constraint_label(constr.contype)? else {
                continue;
            };
            let tree = self
                .tree("CONSTRAINT %{name}I %{definition}s")
                .param("type", "constraint")
                .param("contype", label)
                .param("name", constr.name.as_str())
                .param("definition", self.catalog().constraint_definition(constr.oid)?);
            elements.push(tree.into());
        }
        Ok(())
    }

    /// `%{label}s = %{value}L` for one storage option.
    pub(crate) fn def_elem(&self, elem: &DefElem, is_reset: bool) -> Result<ObjTree> {
        let mut optname = self.tree("");
        if let Some(namespace) = &elem.defnamespace {
            optname.append_string("%{schema}I.", namespace.as_str())?;
        }
        optname.append_string("%{label}I", elem.defname.as_str())?;

        let mut tree = self.tree("%{label}s").param("label", optname);
        if !is_reset {
            tree.append_string("= %{value}L", elem.value_string())?;
        }
        Ok(tree)
    }

    pub(crate) fn rolespec_name(&self, role: &RoleSpec) -> Result<String> {
        match role.roletype {
            RoleSpecType::CString => Ok(role.rolename.clone()),
            RoleSpecType::CurrentRole | RoleSpecType::CurrentUser => self.catalog().current_user(),
            RoleSpecType::SessionUser => self.catalog().session_user(),
            RoleSpecType::Public => Err(Error::CatalogLookup("role \"public\"".to_string())),
        }
    }
}
