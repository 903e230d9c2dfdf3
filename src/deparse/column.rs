use crate::ast::{ColumnDef, ColumnGenerated, ColumnIdentity};
use crate::catalog::{CatalogClass, Expr, Oid, INVALID_OID};
use crate::deparse::Deparser;
use crate::objtree::ObjTree;
use crate::reconstruct::storage_str;
use crate::Result;

impl Deparser<'_> {
    /// A column definition within a regular table, or an added column.
    ///
    /// `%{name}I %{coltype}T %{colstorage}s %{compression}s %{collation}s
    /// %{not_null}s %{default}s %{identity_column}s %{generated_column}s`
    ///
    /// Only NOT NULL is taken from the column's constraints; other column
    /// constraints are reported as table constraints. Inherited columns
    /// without a local definition yield `None`.
    pub(super) fn deparse_column_def(
        &self,
        relid: Oid,
        composite: bool,
        coldef: &ColumnDef,
        is_alter: bool,
        mut exprs: Option<&mut Vec<Expr>>,
    ) -> Result<Option<ObjTree>> {
        if !coldef.is_local {
            return Ok(None);
        }

        let attr = self.catalog().attribute(relid, &coldef.colname)?;

        let mut column = self
            .tree("%{name}I %{coltype}T")
            .param("type", "column")
            .param("name", coldef.colname.as_str())
            .param("coltype", self.type_tree(attr.type_oid, attr.typmod)?);

        if !composite {
            column.append_string("STORAGE %{colstorage}s", storage_str(attr.storage)?)?;
        }

        let mut compression = self.tree("COMPRESSION");
        match &coldef.compression {
            Some(method) => compression.append_string("%{compression_method}I", method.as_str())?,
            None => {
                compression.append_null("%{compression_method}I")?;
                compression.append_not_present();
            }
        }
        column.append_object("%{compression}s", compression)?;

        let mut collation = self.tree("COLLATE");
        if attr.collation != INVALID_OID {
            collation.append_object("%{name}D", self.qualname_id(CatalogClass::Collation, attr.collation)?)?;
        } else {
            collation.append_not_present();
        }
        column.append_object("%{collation}s", collation)?;

        if composite {
            return Ok(Some(column));
        }

        // attnotnull is also set by a primary key, so only trust what was
        // written on the column
        let not_null = coldef.has_not_null_constraint() || (is_alter && coldef.is_not_null);
        column.append_string("%{not_null}s", if not_null { "NOT NULL" } else { "" })?;

        let stored = coldef.generated == Some(ColumnGenerated::Stored);

        let mut default = self.tree("DEFAULT");
        if attr.has_default && !stored {
            default.append_string("%{default}s", self.column_default(relid, attr.attnum, exprs.as_deref_mut())?)?;
        } else {
            default.append_not_present();
        }
        column.append_object("%{default}s", default)?;

        if coldef.identity.is_some() {
            let mut seqrelid = self.catalog().identity_sequence(relid, attr.attnum)?;
            if let (Some(_), Some(rv)) = (seqrelid, &coldef.identity_sequence) {
                seqrelid = Some(self.catalog().resolve_relation(rv)?);
            }
            if let Some(seqrelid) = seqrelid {
                column.append_object("%{identity_column}s", self.deparse_column_identity(seqrelid, coldef.identity, is_alter)?)?;
            }
        }

        let mut generated = self.tree("GENERATED ALWAYS AS");
        if stored {
            generated.append_string("(%{generation_expr}s) STORED", self.column_default(relid, attr.attnum, exprs.as_deref_mut())?)?;
        } else {
            generated.append_not_present();
        }
        column.append_object("%{generated_column}s", generated)?;

        Ok(Some(column))
    }

    /// A column definition within a typed table.
    ///
    /// `%{name}I WITH OPTIONS %{not_null}s %{default}s`
    ///
    /// The type comes from the table's type, so there is only something to say
    /// when the column is declared NOT NULL or has a default.
    pub(super) fn deparse_column_def_typed(&self, relid: Oid, coldef: &ColumnDef) -> Result<Option<ObjTree>> {
        let attr = self.catalog().attribute(relid, &coldef.colname)?;

        let not_null = coldef.has_not_null_constraint();
        if !not_null && !attr.has_default {
            return Ok(None);
        }

        let mut default = self.tree("DEFAULT");
        if attr.has_default {
            default.append_string("%{default}s", self.column_default(relid, attr.attnum, None)?)?;
        } else {
            default.append_not_present();
        }

        Ok(Some(
            self.tree("%{name}I WITH OPTIONS %{not_null}s %{default}s")
                .param("type", "column")
                .param("name", coldef.colname.as_str())
                .param("not_null", if not_null { "NOT NULL" } else { "" })
                .param("default", default),
        ))
    }

    /// The identity clause of a column, with its sequence's options.
    ///
    /// `GENERATED %{option}s AS IDENTITY ( %{seq_definition: }s )`, or in ALTER
    /// context `SET GENERATED %{option}s %{seq_definition: }s`.
    pub(super) fn deparse_column_identity(&self, seqrelid: Oid, identity: Option<ColumnIdentity>, alter_table: bool) -> Result<ObjTree> {
        let (identfmt, objfmt) = if alter_table { ("SET GENERATED ", "%{option}s") } else { ("GENERATED ", "%{option}s AS IDENTITY") };

        let mut identity_type = self.tree(identfmt);
        match identity {
            Some(ColumnIdentity::Always) => identity_type.append_string(objfmt, "ALWAYS")?,
            Some(ColumnIdentity::ByDefault) => identity_type.append_string(objfmt, "BY DEFAULT")?,
            None => identity_type.append_not_present(),
        }

        let mut tree = self.tree("%{identity_type}s").param("identity_type", identity_type);

        let seq = self.catalog().sequence(seqrelid)?;
        // OWNED BY is never emitted
        let elems = vec![
            self.seq_cache(&seq, alter_table),
            self.seq_cycle(&seq, alter_table),
            self.seq_increment_by(&seq, alter_table),
            self.seq_minvalue(&seq, alter_table),
            self.seq_maxvalue(&seq, alter_table),
            self.seq_start_with(&seq, alter_table),
            self.seq_restart(seq.last_value),
        ];

        if alter_table {
            tree.append_array("%{seq_definition: }s", elems)?;
        } else {
            tree.append_array("( %{seq_definition: }s )", elems)?;
        }
        Ok(tree)
    }
}
