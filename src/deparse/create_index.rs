use crate::ast::IndexStmt;
use crate::catalog::Oid;
use crate::deparse::Deparser;
use crate::objtree::ObjTree;
use crate::Result;

impl Deparser<'_> {
    /// `CREATE %{unique}s INDEX %{concurrently}s %{if_not_exists}s %{name}I ON
    /// %{only}s %{table}D USING %{index_am}s %{definition}s %{with}s
    /// %{tablespace}s %{where_clause}s NULLS [NOT] DISTINCT`
    ///
    /// Indexes backing a primary key or other constraint are reported with the
    /// constraint and yield `None`.
    pub(super) fn deparse_index_stmt(&self, object_id: Oid, stmt: &IndexStmt) -> Result<Option<ObjTree>> {
        if stmt.primary || stmt.is_constraint {
            return Ok(None);
        }

        let index_rel = self.catalog().relation(object_id)?;
        let def = self.index_definition(object_id)?;
        let heap_rel = self.catalog().relation(self.catalog().index(object_id)?.relid)?;

        let mut tree = self
            .tree("CREATE %{unique}s INDEX %{concurrently}s %{if_not_exists}s %{name}I ON %{only}s %{table}D USING %{index_am}s %{definition}s")
            .param("unique", if stmt.unique { "UNIQUE" } else { "" })
            .param("concurrently", if stmt.concurrent { "CONCURRENTLY" } else { "" })
            .param("if_not_exists", if stmt.if_not_exists { "IF NOT EXISTS" } else { "" })
            .param("only", if stmt.relation.inh { "" } else { "ONLY" })
            .param("name", index_rel.name.as_str())
            .param("table", self.qualname(heap_rel.namespace, &heap_rel.name)?)
            .param("index_am", def.access_method)
            .param("definition", def.definition);

        let mut with = self.tree("WITH");
        match def.reloptions {
            Some(opts) => with.append_string("(%{opts}s)", opts)?,
            None => with.append_not_present(),
        }
        tree.append_object("%{with}s", with)?;

        let mut tablespace = self.tree("TABLESPACE");
        match def.tablespace {
            Some(name) => tablespace.append_string("%{tablespace}s", name)?,
            None => tablespace.append_not_present(),
        }
        tree.append_object("%{tablespace}s", tablespace)?;

        let mut where_clause = self.tree("WHERE");
        match def.where_clause {
            Some(pred) => where_clause.append_string("%{where}s", pred)?,
            None => where_clause.append_not_present(),
        }
        tree.append_object("%{where_clause}s", where_clause)?;

        tree.append_format_string(if stmt.nulls_not_distinct { "NULLS NOT DISTINCT" } else { "NULLS DISTINCT" });

        Ok(Some(tree))
    }
}
