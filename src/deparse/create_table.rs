use crate::ast::{CreateStmt, OnCommitAction, TableElement};
use crate::catalog::{relkind, Oid};
use crate::deparse::Deparser;
use crate::objtree::{ObjTree, ObjValue};
use crate::reconstruct::persistence_str;
use crate::{Error, Result};

impl Deparser<'_> {
    /// CREATE TABLE, also used for CREATE TABLE AS.
    ///
    /// `CREATE %{persistence}s TABLE %{if_not_exists}s %{identity}D [OF
    /// %{of_type}T | PARTITION OF %{parent_identity}D] %{table_elements}s
    /// %{inherits}s %{partition_bound}s %{partition_by}s %{access_method}s
    /// %{with_clause}s %{on_commit}s %{tablespace}s`
    pub(super) fn deparse_create_stmt(&self, object_id: Oid, stmt: &CreateStmt) -> Result<ObjTree> {
        let rel = self.catalog().relation(object_id)?;

        let mut tree = self
            .tree("CREATE %{persistence}s TABLE %{if_not_exists}s %{identity}D")
            .param("persistence", persistence_str(rel.persistence)?)
            .param("if_not_exists", if stmt.if_not_exists { "IF NOT EXISTS" } else { "" })
            .param("identity", self.qualname(rel.namespace, &rel.name)?);

        if stmt.of_typename.is_some() || stmt.partbound.is_some() {
            // no elements means no parentheses either
            if stmt.of_typename.is_some() {
                tree.append_object("OF %{of_type}T", self.type_tree(rel.of_type, -1)?)?;
            } else {
                let parent = self
                    .inh_relations(object_id)?
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::CatalogLookup(format!("parent of partition with OID {}", object_id)))?;
                tree.append_format_string("PARTITION OF");
                tree.append_object("%{parent_identity}D", parent)?;
            }

            let elements = self.deparse_table_elements(object_id, &stmt.table_elts, true)?;
            let mut table_elements = self.tree("");
            if elements.is_empty() {
                table_elements.append_not_present();
            } else {
                table_elements.append_array("(%{elements:, }s)", elements)?;
            }
            tree.append_object("%{table_elements}s", table_elements)?;
        } else {
            // LIKE clauses were already expanded into columns and constraints
            let elements = self.deparse_table_elements(object_id, &stmt.table_elts, false)?;
            if elements.is_empty() {
                tree.append_format_string("()");
            } else {
                tree.append_array("(%{table_elements:, }s)", elements)?;
            }

            // parents come from the catalogs, the parse tree may not qualify them
            let mut inherits = self.tree("INHERITS");
            if stmt.inh_relations.is_empty() {
                inherits.append_null("(%{parents:, }D)")?;
                inherits.append_not_present();
            } else {
                let parents = self.inh_relations(object_id)?.into_iter().map(ObjValue::from).collect();
                inherits.append_array("(%{parents:, }D)", parents)?;
            }
            tree.append_object("%{inherits}s", inherits)?;
        }

        if stmt.partbound.is_some() {
            tree.append_string("%{partition_bound}s", self.catalog().partition_bound(object_id)?)?;
        }

        let mut partition_by = self.tree("PARTITION BY");
        if rel.relkind == relkind::PARTITIONED_TABLE {
            partition_by.append_string("%{definition}s", self.catalog().partition_key_definition(object_id)?)?;
        } else {
            partition_by.append_null("%{definition}s")?;
            partition_by.append_not_present();
        }
        tree.append_object("%{partition_by}s", partition_by)?;

        let mut access_method = self.tree("USING");
        match &stmt.access_method {
            Some(am) => access_method.append_string("%{access_method}I", am.as_str())?,
            None => {
                access_method.append_null("%{access_method}I")?;
                access_method.append_not_present();
            }
        }
        tree.append_object("%{access_method}s", access_method)?;

        let options = stmt.options.iter().map(|opt| self.def_elem(opt, false).map(ObjValue::from)).collect::<Result<Vec<_>>>()?;
        let mut with = self.tree("WITH");
        if options.is_empty() {
            with.append_not_present();
        } else {
            with.append_array("(%{with:, }s)", options)?;
        }
        tree.append_object("%{with_clause}s", with)?;

        tree.append_object("%{on_commit}s", self.deparse_on_commit_clause(stmt.oncommit)?)?;

        let mut tablespace = self.tree("TABLESPACE");
        match &stmt.tablespacename {
            Some(name) => tablespace.append_string("%{tablespace}I", name.as_str())?,
            None => {
                tablespace.append_null("%{tablespace}I")?;
                tablespace.append_not_present();
            }
        }
        tree.append_object("%{tablespace}s", tablespace)?;

        Ok(tree)
    }

    /// Column definitions from the parse tree followed by the constraints
    /// from the catalogs; constraints in the parse tree may lack their names.
    fn deparse_table_elements(&self, relid: Oid, table_elts: &[TableElement], typed: bool) -> Result<Vec<ObjValue>> {
        let mut elements = Vec::new();
        for elt in table_elts {
            let TableElement::Column(coldef) = elt else {
                continue;
            };
            let column = if typed { self.deparse_column_def_typed(relid, coldef)? } else { self.deparse_column_def(relid, false, coldef, false, None)? };
            if let Some(column) = column {
                elements.push(column.into());
            }
        }
        self.obtain_constraints(&mut elements, relid)?;
        Ok(elements)
    }

    /// `ON COMMIT %{on_commit_value}s`
    fn deparse_on_commit_clause(&self, action: OnCommitAction) -> Result<ObjTree> {
        let mut tree = self.tree("ON COMMIT");
        match action {
            OnCommitAction::Drop => tree.append_string("%{on_commit_value}s", "DROP")?,
            OnCommitAction::DeleteRows => tree.append_string("%{on_commit_value}s", "DELETE ROWS")?,
            OnCommitAction::PreserveRows => tree.append_string("%{on_commit_value}s", "PRESERVE ROWS")?,
            OnCommitAction::Noop => {
                tree.append_null("%{on_commit_value}s")?;
                tree.append_not_present();
            }
        }
        Ok(tree)
    }
}
