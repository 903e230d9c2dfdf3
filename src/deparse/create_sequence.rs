use crate::ast::CreateSeqStmt;
use crate::catalog::{Oid, SequenceData, INVALID_OID};
use crate::deparse::Deparser;
use crate::objtree::{ObjTree, ObjValue};
use crate::reconstruct::persistence_str;
use crate::Result;

impl Deparser<'_> {
    /// `CREATE %{persistence}s SEQUENCE %{if_not_exists}s %{identity}D %{definition: }s`
    ///
    /// Identity sequences are reported with their column and yield `None`.
    pub(super) fn deparse_create_seq_stmt(&self, object_id: Oid, stmt: &CreateSeqStmt) -> Result<Option<ObjTree>> {
        if stmt.for_identity {
            return Ok(None);
        }

        let seq = self.catalog().sequence(object_id)?;
        let definition = vec![
            self.seq_cache(&seq, false),
            self.seq_cycle(&seq, false),
            self.seq_increment_by(&seq, false),
            self.seq_minvalue(&seq, false),
            self.seq_maxvalue(&seq, false),
            self.seq_start_with(&seq, false),
            self.seq_restart(seq.last_value),
            self.seq_as(&seq)?,
        ];

        let rel = self.catalog().relation(object_id)?;
        let mut tree = self
            .tree("CREATE %{persistence}s SEQUENCE %{if_not_exists}s %{identity}D")
            .param("persistence", persistence_str(rel.persistence)?)
            .param("if_not_exists", if stmt.if_not_exists { "IF NOT EXISTS" } else { "" })
            .param("identity", self.qualname(rel.namespace, &rel.name)?);
        tree.append_array("%{definition: }s", definition)?;
        Ok(Some(tree))
    }

    fn seq_clause(&self, fmt: &str, clause: &str, value: i64) -> ObjValue {
        self.tree(fmt).param("clause", clause).param("value", value.to_string()).into()
    }

    pub(super) fn seq_cache(&self, seq: &SequenceData, alter_table: bool) -> ObjValue {
        let fmt = if alter_table { "SET CACHE %{value}s" } else { "CACHE %{value}s" };
        self.seq_clause(fmt, "cache", seq.cache)
    }

    pub(super) fn seq_cycle(&self, seq: &SequenceData, alter_table: bool) -> ObjValue {
        let fmt = if alter_table { "SET %{no}s CYCLE" } else { "%{no}s CYCLE" };
        self.tree(fmt).param("clause", "cycle").param("no", if seq.cycle { "" } else { "NO" }).into()
    }

    pub(super) fn seq_increment_by(&self, seq: &SequenceData, alter_table: bool) -> ObjValue {
        let fmt = if alter_table { "SET INCREMENT BY %{value}s" } else { "INCREMENT BY %{value}s" };
        self.seq_clause(fmt, "seqincrement", seq.increment)
    }

    pub(super) fn seq_minvalue(&self, seq: &SequenceData, alter_table: bool) -> ObjValue {
        let fmt = if alter_table { "SET MINVALUE %{value}s" } else { "MINVALUE %{value}s" };
        self.seq_clause(fmt, "minvalue", seq.min)
    }

    pub(super) fn seq_maxvalue(&self, seq: &SequenceData, alter_table: bool) -> ObjValue {
        let fmt = if alter_table { "SET MAXVALUE %{value}s" } else { "MAXVALUE %{value}s" };
        self.seq_clause(fmt, "maxvalue", seq.max)
    }

    pub(super) fn seq_start_with(&self, seq: &SequenceData, alter_table: bool) -> ObjValue {
        let fmt = if alter_table { "SET START WITH %{value}s" } else { "START WITH %{value}s" };
        self.seq_clause(fmt, "start", seq.start)
    }

    pub(super) fn seq_restart(&self, last_value: i64) -> ObjValue {
        self.seq_clause("RESTART %{value}s", "restart", last_value)
    }

    fn seq_as(&self, seq: &SequenceData) -> Result<ObjValue> {
        let mut tree = self.tree("AS");
        if seq.type_oid != INVALID_OID {
            tree.append_object("%{seqtype}T", self.type_tree(seq.type_oid, -1)?)?;
        } else {
            tree.append_not_present();
        }
        Ok(tree.into())
    }
}
