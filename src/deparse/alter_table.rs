use crate::ast::{AlterTableCmd, AlterTableStmt, ColumnTarget, DefElem, DropBehavior, ReplicaIdentity};
use crate::catalog::{contain_volatile_functions, relkind, CatalogClass, Expr, Oid, RelationForm, INVALID_OID};
use crate::command::CollectedAtSubcmd;
use crate::deparse::Deparser;
use crate::objtree::{ObjTree, ObjValue};
use crate::{Error, Result};

/// The relation an ALTER statement works on.
struct AlterTarget<'r> {
    rel: &'r RelationForm,
    /// Composite type, whose columns are called attributes
    istype: bool,
}

impl AlterTarget<'_> {
    fn column_word(&self) -> &'static str {
        if self.istype {
            "ATTRIBUTE"
        } else {
            "COLUMN"
        }
    }
}

fn relkind_objtype(marking: char) -> Result<&'static str> {
    match marking {
        relkind::RELATION | relkind::PARTITIONED_TABLE => Ok("TABLE"),
        relkind::INDEX | relkind::PARTITIONED_INDEX => Ok("INDEX"),
        relkind::VIEW => Ok("VIEW"),
        relkind::COMPOSITE_TYPE => Ok("TYPE"),
        relkind::FOREIGN_TABLE => Ok("FOREIGN TABLE"),
        relkind::MATVIEW => Ok("MATERIALIZED VIEW"),
        other => Err(Error::Unexpected(format!("relkind {:?}", other))),
    }
}

fn if_exists(missing_ok: bool) -> &'static str {
    if missing_ok {
        "IF EXISTS"
    } else {
        ""
    }
}

fn deferrable(deferrable: bool) -> &'static str {
    if deferrable {
        "DEFERRABLE"
    } else {
        "NOT DEFERRABLE"
    }
}

fn init_deferred(initdeferred: bool) -> &'static str {
    if initdeferred {
        "INITIALLY DEFERRED"
    } else {
        "INITIALLY IMMEDIATE"
    }
}

impl Deparser<'_> {
    /// `ALTER %{objtype}s %{identity}D %{subcmds:, }s`
    ///
    /// Subcommands that were propagated to inheritance children are reported
    /// once, at the parent. Yields `None` when no subcommand is left to
    /// report, or for the ALTERs that expand a CREATE TABLE's LIKE clauses.
    pub(super) fn deparse_alter_relation(&self, relid: Oid, stmt: &AlterTableStmt, subcmds: &[CollectedAtSubcmd]) -> Result<Option<ObjTree>> {
        if stmt.table_like {
            return Ok(None);
        }

        let rel = self.catalog().relation(relid)?;
        let objtype = relkind_objtype(rel.relkind)?;
        let target = AlterTarget { rel: &rel, istype: rel.relkind == relkind::COMPOSITE_TYPE };

        let mut tree = self.tree("ALTER %{objtype}s %{identity}D").param("objtype", objtype).param("identity", self.qualname(rel.namespace, &rel.name)?);

        let mut list = Vec::with_capacity(subcmds.len());
        for sub in subcmds {
            if sub.address.object_id != relid && self.catalog().has_superclass(sub.address.object_id)? {
                tracing::trace!(
                    target: "pg_ddl_deparse::alter",
                    "skipping {} on inheritance child {}",
                    sub.parsetree.subtype(),
                    sub.address.object_id
                );
                continue;
            }

            let mut exprs = Vec::new();
            if let Some(subcmd) = self.deparse_alter_table_cmd(&target, sub, &mut exprs)? {
                list.push(ObjValue::from(subcmd));
            }

            if contain_volatile_functions(self.catalog(), &exprs)? {
                return Err(Error::VolatileFunction);
            }
        }

        if list.is_empty() {
            return Ok(None);
        }
        tree.append_array("%{subcmds:, }s", list)?;
        Ok(Some(tree))
    }

    fn subcmd(&self, fmt: &str, kind: &str) -> ObjTree {
        self.tree(fmt).param("type", kind)
    }

    fn column_subcmd(&self, fmt: &str, kind: &str, column: &str) -> ObjTree {
        self.subcmd(fmt, kind).param("column", column)
    }

    fn option_list(&self, options: &[DefElem], is_reset: bool) -> Result<Vec<ObjValue>> {
        options.iter().map(|opt| self.def_elem(opt, is_reset).map(ObjValue::from)).collect()
    }

    fn unsupported(&self, cmd: &AlterTableCmd) -> Result<Option<ObjTree>> {
        tracing::warn!(target: "pg_ddl_deparse::alter", "unsupported alter table subtype {}", cmd.subtype());
        Ok(None)
    }

    /// Builds one subcommand, collecting the default and constraint
    /// expressions it introduces into `exprs`.
    fn deparse_alter_table_cmd(&self, target: &AlterTarget<'_>, sub: &CollectedAtSubcmd, exprs: &mut Vec<Expr>) -> Result<Option<ObjTree>> {
        let relid = target.rel.oid;
        let address = sub.address.object_id;

        let tree = match &sub.parsetree {
            AlterTableCmd::AddColumn { def, if_not_exists } => {
                let Some(column) = self.deparse_column_def(relid, target.istype, def, true, Some(exprs))? else {
                    return Ok(None);
                };
                self.tree("ADD %{objtype}s %{if_not_exists}s %{definition}s")
                    .param("objtype", target.column_word())
                    .param("type", "add column")
                    .param("if_not_exists", if *if_not_exists { "IF NOT EXISTS" } else { "" })
                    .param("definition", column)
            }

            AlterTableCmd::AddIndexConstraint { index } => {
                let index_rel = self.catalog().relation(index.index_oid)?;
                self.subcmd("ADD CONSTRAINT %{name}I %{constraint_type}s USING INDEX %{index_name}I %{deferrable}s %{init_deferred}s", "add constraint using index")
                    .param("name", self.catalog().constraint(address)?.name)
                    .param("constraint_type", if index.primary { "PRIMARY KEY" } else { "UNIQUE" })
                    .param("index_name", index_rel.name)
                    .param("deferrable", deferrable(index.deferrable))
                    .param("init_deferred", init_deferred(index.initdeferred))
            }

            // internal bookkeeping, or folded into CREATE OR REPLACE VIEW
            AlterTableCmd::ReAddIndex { .. }
            | AlterTableCmd::ReAddConstraint { .. }
            | AlterTableCmd::ReAddDomainConstraint { .. }
            | AlterTableCmd::ReAddComment
            | AlterTableCmd::ReplaceRelOptions { .. }
            | AlterTableCmd::CheckNotNull { .. }
            | AlterTableCmd::ReAddStatistics
            | AlterTableCmd::AddColumnToView { .. } => return Ok(None),

            AlterTableCmd::CookedColumnDefault { attnum } => {
                // only a generation expression is expected here
                if !self.catalog().attribute_by_num(relid, *attnum)?.generated {
                    return self.unsupported(&sub.parsetree);
                }
                return Ok(None);
            }

            AlterTableCmd::ColumnDefault { column, drop: true } => self.column_subcmd("ALTER COLUMN %{column}I DROP DEFAULT", "drop default", column),
            AlterTableCmd::ColumnDefault { column, drop: false } => {
                let attr = self.catalog().attribute(relid, column)?;
                let mut tree = self.column_subcmd("ALTER COLUMN %{column}I SET DEFAULT", "set default", column);
                tree.append_string("%{definition}s", self.column_default(relid, attr.attnum, Some(exprs))?)?;
                tree
            }

            AlterTableCmd::DropNotNull { column } => self.column_subcmd("ALTER COLUMN %{column}I DROP NOT NULL", "drop not null", column),
            AlterTableCmd::SetNotNull { column } => self.column_subcmd("ALTER COLUMN %{column}I SET NOT NULL", "set not null", column),
            AlterTableCmd::DropExpression { column, if_exists: missing_ok } => self
                .column_subcmd("ALTER COLUMN %{column}I DROP EXPRESSION %{if_exists}s", "drop expression", column)
                .param("if_exists", if_exists(*missing_ok)),

            AlterTableCmd::SetStatistics { column: ColumnTarget::Name(name), statistics } => self
                .column_subcmd("ALTER COLUMN %{column}I SET STATISTICS %{statistics}n", "set statistics", name)
                .param("statistics", *statistics),
            AlterTableCmd::SetStatistics { column: ColumnTarget::Number(num), statistics } => self
                .subcmd("ALTER COLUMN %{column}n SET STATISTICS %{statistics}n", "set statistics")
                .param("column", i64::from(*num))
                .param("statistics", *statistics),

            AlterTableCmd::SetOptions { column, options } | AlterTableCmd::ResetOptions { column, options } => {
                let is_reset = matches!(sub.parsetree, AlterTableCmd::ResetOptions { .. });
                let mut tree = self
                    .column_subcmd("ALTER COLUMN %{column}I %{option}s", if is_reset { "reset options" } else { "set options" }, column)
                    .param("option", if is_reset { "RESET" } else { "SET" });
                tree.append_array("(%{options:, }s)", self.option_list(options, is_reset)?)?;
                tree
            }

            AlterTableCmd::SetStorage { column, storage } => self
                .column_subcmd("ALTER COLUMN %{column}I SET STORAGE %{storage}s", "set storage", column)
                .param("storage", storage.as_str()),
            AlterTableCmd::SetCompression { column, method } => self
                .column_subcmd("ALTER COLUMN %{column}I SET COMPRESSION %{compression_method}s", "set compression", column)
                .param("compression_method", method.as_str()),

            AlterTableCmd::DropColumn { column, if_exists: missing_ok, behavior } => {
                let mut tree = self
                    .tree("DROP %{objtype}s %{if_exists}s %{column}I")
                    .param("objtype", target.column_word())
                    .param("type", "drop column")
                    .param("if_exists", if_exists(*missing_ok))
                    .param("column", column.as_str());
                let cascade = self.tree("CASCADE").param("present", *behavior == DropBehavior::Cascade);
                tree.append_object("%{cascade}s", cascade)?;
                tree
            }

            AlterTableCmd::AddIndex { index } => {
                if !index.is_constraint {
                    return Ok(None);
                }
                let idxname = self.catalog().relation(address)?.name;
                let constr_oid = self.catalog().constraint_oid_by_name(relid, &idxname)?;
                self.subcmd("ADD CONSTRAINT %{name}I %{definition}s", "add constraint")
                    .param("definition", self.catalog().constraint_definition(constr_oid)?)
                    .param("name", idxname)
            }

            AlterTableCmd::AddConstraint { constraint } => {
                // recursion into inheritance children reports no constraint
                if address == INVALID_OID {
                    return Ok(None);
                }
                let form = self.catalog().constraint(address)?;
                if !constraint.skip_validation {
                    exprs.extend(form.expr);
                }
                self.subcmd("ADD CONSTRAINT %{name}I %{definition}s", "add constraint")
                    .param("name", form.name)
                    .param("definition", self.catalog().constraint_definition(address)?)
            }

            AlterTableCmd::AlterConstraint { constraint } => {
                if address == INVALID_OID {
                    return Ok(None);
                }
                self.subcmd("ALTER CONSTRAINT %{name}I %{deferrable}s %{init_deferred}s", "alter constraint")
                    .param("name", self.catalog().constraint(address)?.name)
                    .param("deferrable", deferrable(constraint.deferrable))
                    .param("init_deferred", init_deferred(constraint.initdeferred))
            }

            AlterTableCmd::ValidateConstraint { name } => {
                self.subcmd("VALIDATE CONSTRAINT %{constraint}I", "validate constraint").param("constraint", name.as_str())
            }

            AlterTableCmd::DropConstraint { name, if_exists: missing_ok, behavior } => self
                .subcmd("DROP CONSTRAINT %{if_exists}s %{constraint}I %{cascade}s", "drop constraint")
                .param("if_exists", if_exists(*missing_ok))
                .param("constraint", name.as_str())
                .param("cascade", if *behavior == DropBehavior::Cascade { "CASCADE" } else { "" }),

            AlterTableCmd::AlterColumnType { column, using, behavior } => {
                let attnum = i16::try_from(sub.address.object_sub_id).map_err(|_| Error::Unexpected(format!("column number {}", sub.address.object_sub_id)))?;
                let attr = self.catalog().attribute_by_num(relid, attnum)?;

                let mut tree = self
                    .tree("ALTER %{objtype}s %{column}I SET DATA TYPE %{datatype}T")
                    .param("objtype", target.column_word())
                    .param("type", "alter column type")
                    .param("column", column.as_str())
                    .param("datatype", self.type_tree(attr.type_oid, attr.typmod)?);

                let mut collation = self.tree("COLLATE");
                if attr.collation != INVALID_OID {
                    collation.append_object("%{name}D", self.qualname_id(CatalogClass::Collation, attr.collation)?)?;
                } else {
                    collation.append_not_present();
                }
                tree.append_object("%{collation}s", collation)?;

                if target.istype {
                    let mut cascade = self.tree("CASCADE");
                    if *behavior != DropBehavior::Cascade {
                        cascade.append_not_present();
                    }
                    tree.append_object("%{cascade}s", cascade)?;
                } else {
                    let mut using_clause = self.tree("USING");
                    match (using, &sub.using_expr) {
                        (true, Some(expr)) => using_clause.append_string("%{expression}s", expr.as_str())?,
                        _ => using_clause.append_not_present(),
                    }
                    tree.append_object("%{using}s", using_clause)?;
                }
                tree
            }

            // foreign-data wrapper options
            AlterTableCmd::AlterColumnGenericOptions { .. } | AlterTableCmd::GenericOptions { .. } => return self.unsupported(&sub.parsetree),

            AlterTableCmd::ChangeOwner { newowner } => self.subcmd("OWNER TO %{owner}I", "change owner").param("owner", self.rolespec_name(newowner)?),
            AlterTableCmd::ClusterOn { index } => self.subcmd("CLUSTER ON %{index}I", "cluster on").param("index", index.as_str()),
            AlterTableCmd::DropCluster => self.subcmd("SET WITHOUT CLUSTER", "set without cluster"),
            AlterTableCmd::SetLogged => self.subcmd("SET LOGGED", "set logged"),
            AlterTableCmd::SetUnLogged => self.subcmd("SET UNLOGGED", "set unlogged"),
            AlterTableCmd::DropOids => self.subcmd("SET WITHOUT OIDS", "set without oids"),
            AlterTableCmd::SetAccessMethod { name } => {
                self.subcmd("SET ACCESS METHOD %{access_method}I", "set access method").param("access_method", name.as_str())
            }
            AlterTableCmd::SetTableSpace { name } => self.subcmd("SET TABLESPACE %{tablespace}I", "set tablespace").param("tablespace", name.as_str()),

            AlterTableCmd::SetRelOptions { options } | AlterTableCmd::ResetRelOptions { options } => {
                let is_reset = matches!(sub.parsetree, AlterTableCmd::ResetRelOptions { .. });
                let mut tree = self
                    .subcmd("%{set_reset}s", if is_reset { "reset reloptions" } else { "set reloptions" })
                    .param("set_reset", if is_reset { "RESET" } else { "SET" });
                tree.append_array("(%{options:, }s)", self.option_list(options, is_reset)?)?;
                tree
            }

            AlterTableCmd::EnableTrig { name } => self.subcmd("ENABLE TRIGGER %{trigger}I", "enable trigger").param("trigger", name.as_str()),
            AlterTableCmd::EnableAlwaysTrig { name } => {
                self.subcmd("ENABLE ALWAYS TRIGGER %{trigger}I", "enable always trigger").param("trigger", name.as_str())
            }
            AlterTableCmd::EnableReplicaTrig { name } => {
                self.subcmd("ENABLE REPLICA TRIGGER %{trigger}I", "enable replica trigger").param("trigger", name.as_str())
            }
            AlterTableCmd::DisableTrig { name } => self.subcmd("DISABLE TRIGGER %{trigger}I", "disable trigger").param("trigger", name.as_str()),
            AlterTableCmd::EnableTrigAll => self.subcmd("ENABLE TRIGGER ALL", "enable trigger all"),
            AlterTableCmd::DisableTrigAll => self.subcmd("DISABLE TRIGGER ALL", "disable trigger all"),
            AlterTableCmd::EnableTrigUser => self.subcmd("ENABLE TRIGGER USER", "enable trigger user"),
            AlterTableCmd::DisableTrigUser => self.subcmd("DISABLE TRIGGER USER", "disable trigger user"),

            AlterTableCmd::EnableRule { name } => self.subcmd("ENABLE RULE %{rule}I", "enable rule").param("rule", name.as_str()),
            AlterTableCmd::EnableAlwaysRule { name } => self.subcmd("ENABLE ALWAYS RULE %{rule}I", "enable always rule").param("rule", name.as_str()),
            AlterTableCmd::EnableReplicaRule { name } => self.subcmd("ENABLE REPLICA RULE %{rule}I", "enable replica rule").param("rule", name.as_str()),
            AlterTableCmd::DisableRule { name } => self.subcmd("DISABLE RULE %{rule}I", "disable rule").param("rule", name.as_str()),

            // the parent as resolved at execution time
            AlterTableCmd::AddInherit { .. } => {
                self.subcmd("INHERIT %{parent}D", "inherit").param("parent", self.qualname_id(CatalogClass::Relation, address)?)
            }
            AlterTableCmd::DropInherit { .. } => {
                self.subcmd("NO INHERIT %{parent}D", "drop inherit").param("parent", self.qualname_id(CatalogClass::Relation, address)?)
            }
            AlterTableCmd::AddOf => self.subcmd("OF %{type_of}T", "add of").param("type_of", self.type_tree(address, -1)?),
            AlterTableCmd::DropOf => self.subcmd("NOT OF", "not of"),

            AlterTableCmd::ReplicaIdentity { identity } => {
                let mut tree = self.subcmd("REPLICA IDENTITY", "replica identity");
                match identity {
                    ReplicaIdentity::Default => tree.append_string("%{ident}s", "DEFAULT")?,
                    ReplicaIdentity::Full => tree.append_string("%{ident}s", "FULL")?,
                    ReplicaIdentity::Nothing => tree.append_string("%{ident}s", "NOTHING")?,
                    ReplicaIdentity::Index(index) => tree.append_object("%{ident}s", self.tree("USING INDEX %{index}I").param("index", index.as_str()))?,
                }
                tree
            }

            AlterTableCmd::EnableRowSecurity => self.subcmd("ENABLE ROW LEVEL SECURITY", "enable row security"),
            AlterTableCmd::DisableRowSecurity => self.subcmd("DISABLE ROW LEVEL SECURITY", "disable row security"),
            AlterTableCmd::ForceRowSecurity => self.subcmd("FORCE ROW LEVEL SECURITY", "force row security"),
            AlterTableCmd::NoForceRowSecurity => self.subcmd("NO FORCE ROW LEVEL SECURITY", "no force row security"),

            AlterTableCmd::AttachPartition { .. } => {
                let mut tree = self
                    .subcmd("ATTACH PARTITION %{partition_identity}D", "attach partition")
                    .param("partition_identity", self.qualname_id(CatalogClass::Relation, address)?);
                if target.rel.relkind == relkind::PARTITIONED_TABLE {
                    tree.append_string("%{partition_bound}s", self.catalog().partition_bound(address)?)?;
                }
                tree
            }
            AlterTableCmd::DetachPartition { concurrent, .. } => self
                .subcmd("DETACH PARTITION %{partition_identity}D %{concurrent}s", "detach partition")
                .param("partition_identity", self.qualname_id(CatalogClass::Relation, address)?)
                .param("concurrent", if *concurrent { "CONCURRENTLY" } else { "" }),
            AlterTableCmd::DetachPartitionFinalize { .. } => self
                .subcmd("DETACH PARTITION %{partition_identity}D FINALIZE", "detach partition finalize")
                .param("partition_identity", self.qualname_id(CatalogClass::Relation, address)?),

            AlterTableCmd::AddIdentity { column, def } => {
                let mut tree = self.column_subcmd("ALTER COLUMN %{column}I", "add identity", column);
                let attnum = self.catalog().attribute(relid, column)?.attnum;
                if let Some(seqrelid) = self.catalog().identity_sequence(relid, attnum)? {
                    tree.append_object("ADD %{identity_column}s", self.deparse_column_identity(seqrelid, def.identity, false)?)?;
                }
                tree
            }
            AlterTableCmd::SetIdentity { column, generated } => {
                // the sequence snapshot already reflects the new options
                let mut tree = self.column_subcmd("ALTER COLUMN %{column}I", "set identity", column);
                let attnum = self.catalog().attribute(relid, column)?.attnum;
                if let Some(seqrelid) = self.catalog().identity_sequence(relid, attnum)? {
                    tree.append_object("%{definition}s", self.deparse_column_identity(seqrelid, *generated, true)?)?;
                }
                tree
            }
            AlterTableCmd::DropIdentity { column, if_exists: missing_ok } => {
                let mut tree = self.column_subcmd("ALTER COLUMN %{column}I DROP IDENTITY", "drop identity", column);
                tree.append_string("%{if_exists}s", if_exists(*missing_ok))?;
                tree
            }
        };

        Ok(Some(tree))
    }
}
