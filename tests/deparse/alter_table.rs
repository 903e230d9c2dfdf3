//! ALTER TABLE tests.

use super::*;
use pg_ddl_deparse::catalog::CatalogClass;

fn alter(relid: Oid, subcmds: Vec<CollectedAtSubcmd>) -> CollectedCommand {
    let stmt = AlterTableStmt { relation: RangeVar::new("t"), ..Default::default() };
    CollectedCommand::alter_table(relid, stmt, subcmds)
}

fn on(relid: Oid, cmd: AlterTableCmd) -> CollectedAtSubcmd {
    CollectedAtSubcmd::new(ObjectAddress::relation(relid), cmd)
}

fn try_deparse(catalog: &MemoryCatalog, cmd: &CollectedCommand) -> Result<Option<String>, Error> {
    pg_ddl_deparse::deparse_utility_command(cmd, catalog, DeparseOptions::default())
}

/// The only subcommand of an ALTER.
fn single_subcmd(catalog: &MemoryCatalog, relid: Oid, sub: CollectedAtSubcmd) -> Value {
    let value = deparse_value(catalog, &alter(relid, vec![sub]), DeparseOptions::default());
    assert_eq!(len(&value, "subcmds"), 1);
    item(&value, "subcmds", 0).clone()
}

/// `t (a int)`
fn table() -> (MemoryCatalog, Oid) {
    let mut catalog = MemoryCatalog::new();
    let relid = catalog.add_relation("t", relkind::RELATION);
    catalog.add_column(relid, "a", INT4_OID);
    (catalog, relid)
}

#[test]
fn it_deparses_add_column() {
    let (mut catalog, relid) = table();
    let b = catalog.add_column(relid, "b", TEXT_OID);
    catalog.set_default(relid, b, Expr::Const("'x'::text".to_string()));

    let cmd = alter(relid, vec![on(relid, AlterTableCmd::AddColumn { def: ColumnDef::new("b"), if_not_exists: true })]);
    let value = deparse_value(&catalog, &cmd, DeparseOptions::default());
    assert_eq!(value["fmt"], "ALTER %{objtype}s %{identity}D %{subcmds:, }s");
    assert_eq!(value["objtype"], "TABLE");
    assert_eq!(value["identity"]["objname"], "t");

    let sub = item(&value, "subcmds", 0);
    assert_eq!(sub["fmt"], "ADD %{objtype}s %{if_not_exists}s %{definition}s");
    assert_eq!(sub["objtype"], "COLUMN");
    assert_eq!(sub["type"], "add column");
    assert_eq!(sub["if_not_exists"], "IF NOT EXISTS");
    assert_eq!(sub["definition"]["name"], "b");
    assert_eq!(sub["definition"]["default"]["default"], "'x'::text");
}

#[test]
fn it_deparses_add_attribute_to_composite_type() {
    let mut catalog = MemoryCatalog::new();
    let relid = catalog.add_composite_type("pair");
    catalog.add_column(relid, "x", INT4_OID);

    let cmd = alter(relid, vec![on(relid, AlterTableCmd::AddColumn { def: ColumnDef::new("x"), if_not_exists: false })]);
    let value = deparse_value(&catalog, &cmd, DeparseOptions::default());
    assert_eq!(value["objtype"], "TYPE");

    let sub = item(&value, "subcmds", 0);
    assert_eq!(sub["objtype"], "ATTRIBUTE");
    assert_eq!(sub["definition"]["fmt"], "%{name}I %{coltype}T %{compression}s %{collation}s");
}

#[test]
fn it_reports_inherited_subcommands_once() {
    let mut catalog = MemoryCatalog::new();
    let parent = catalog.add_relation("t", relkind::RELATION);
    catalog.add_column(parent, "a", INT4_OID);
    let child = catalog.add_relation("t_child", relkind::RELATION);
    catalog.add_column(child, "a", INT4_OID);
    catalog.add_inherit(child, parent);

    let cmd = alter(
        parent,
        vec![on(parent, AlterTableCmd::SetNotNull { column: "a".to_string() }), on(child, AlterTableCmd::SetNotNull { column: "a".to_string() })],
    );
    let value = deparse_value(&catalog, &cmd, DeparseOptions::default());
    assert_eq!(len(&value, "subcmds"), 1);
    assert_eq!(item(&value, "subcmds", 0)["fmt"], "ALTER COLUMN %{column}I SET NOT NULL");
}

#[test]
fn it_rejects_volatile_defaults() {
    let (mut catalog, relid) = table();
    let b = catalog.add_column(relid, "b", INT4_OID);
    catalog.set_default(relid, b, call(RANDOM_FUNC, "random", vec![]));

    let cmd = alter(relid, vec![on(relid, AlterTableCmd::AddColumn { def: ColumnDef::new("b"), if_not_exists: false })]);
    assert_eq!(try_deparse(&catalog, &cmd), Err(Error::VolatileFunction));

    let cmd = alter(relid, vec![on(relid, AlterTableCmd::ColumnDefault { column: "b".to_string(), drop: false })]);
    assert_eq!(try_deparse(&catalog, &cmd), Err(Error::VolatileFunction));
}

#[test]
fn it_rejects_sequence_defaults() {
    let (mut catalog, relid) = table();
    let seqid = catalog.add_sequence("t_a_seq", seq_data(INT4_OID));
    catalog.set_default(relid, 1, Expr::NextValue(seqid));

    let cmd = alter(relid, vec![on(relid, AlterTableCmd::ColumnDefault { column: "a".to_string(), drop: false })]);
    assert_eq!(try_deparse(&catalog, &cmd), Err(Error::VolatileFunction));
}

#[test]
fn it_finds_volatile_calls_in_deeply_nested_expressions() {
    let catalog = MemoryCatalog::new();
    let mut expr = call(RANDOM_FUNC, "random", vec![]);
    for _ in 0..20_000 {
        expr = Expr::Other(vec![expr]);
    }

    let found = std::thread::scope(|scope| {
        std::thread::Builder::new()
            .stack_size(128 * 1024)
            .spawn_scoped(scope, || pg_ddl_deparse::catalog::contain_volatile_functions(&catalog, std::slice::from_ref(&expr)))
            .unwrap()
            .join()
            .unwrap()
    });
    assert_eq!(found, Ok(true));

    // drop the nesting one level at a time
    while let Expr::Other(mut args) = expr {
        match args.pop() {
            Some(inner) => expr = inner,
            None => break,
        }
    }
}

#[test]
fn it_accepts_stable_defaults() {
    let (mut catalog, relid) = table();
    let at = catalog.add_column(relid, "at", TIMESTAMPTZ_OID);
    catalog.set_default(relid, at, call(NOW_FUNC, "now", vec![]));

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::ColumnDefault { column: "at".to_string(), drop: false }));
    assert_eq!(sub["fmt"], "ALTER COLUMN %{column}I SET DEFAULT %{definition}s");
    assert_eq!(sub["type"], "set default");
    assert_eq!(sub["definition"], "now()");

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::ColumnDefault { column: "at".to_string(), drop: true }));
    assert_eq!(sub["fmt"], "ALTER COLUMN %{column}I DROP DEFAULT");
    assert_eq!(sub["column"], "at");
}

#[test]
fn it_skips_like_expansion() {
    let (catalog, relid) = table();
    let mut cmd = alter(relid, vec![on(relid, AlterTableCmd::SetNotNull { column: "a".to_string() })]);
    if let pg_ddl_deparse::Collected::AlterTable { parsetree, .. } = &mut cmd.command {
        parsetree.table_like = true;
    }
    assert_eq!(try_deparse(&catalog, &cmd), Ok(None));
}

#[test]
fn it_skips_unsupported_and_internal_subcommands() {
    let (catalog, relid) = table();

    let cmd = alter(
        relid,
        vec![
            on(relid, AlterTableCmd::GenericOptions { options: vec![] }),
            on(relid, AlterTableCmd::ReAddComment),
            on(relid, AlterTableCmd::CheckNotNull { column: "a".to_string() }),
        ],
    );
    assert_eq!(try_deparse(&catalog, &cmd), Ok(None));

    let cmd = alter(relid, vec![on(relid, AlterTableCmd::GenericOptions { options: vec![] }), on(relid, AlterTableCmd::SetLogged)]);
    let value = deparse_value(&catalog, &cmd, DeparseOptions::default());
    assert_eq!(len(&value, "subcmds"), 1);
    assert_eq!(item(&value, "subcmds", 0)["fmt"], "SET LOGGED");
}

#[test]
fn it_deparses_drop_column() {
    let (catalog, relid) = table();

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::DropColumn { column: "a".to_string(), if_exists: true, behavior: DropBehavior::Cascade }));
    assert_eq!(sub["fmt"], "DROP %{objtype}s %{if_exists}s %{column}I %{cascade}s");
    assert_eq!(sub["if_exists"], "IF EXISTS");
    assert_eq!(sub["cascade"]["fmt"], "CASCADE");
    assert_eq!(sub["cascade"]["present"], true);

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::DropColumn { column: "a".to_string(), if_exists: false, behavior: DropBehavior::Restrict }));
    assert_eq!(sub["cascade"]["present"], false);
}

#[test]
fn it_deparses_alter_column_type() {
    let mut catalog = MemoryCatalog::new();
    let relid = catalog.add_relation("t", relkind::RELATION);
    let a = catalog.add_column(relid, "a", INT8_OID);
    let b = catalog.add_column_with_typmod(relid, "b", VARCHAR_OID, 14);
    catalog.set_collation(relid, b, C_COLLATION);

    let mut sub = CollectedAtSubcmd::new(
        ObjectAddress::column(relid, a),
        AlterTableCmd::AlterColumnType { column: "a".to_string(), using: true, behavior: DropBehavior::Restrict },
    );
    sub.using_expr = Some("(a)::bigint".to_string());
    let sub = single_subcmd(&catalog, relid, sub);
    assert_eq!(sub["fmt"], "ALTER %{objtype}s %{column}I SET DATA TYPE %{datatype}T %{collation}s %{using}s");
    assert_eq!(sub["type"], "alter column type");
    assert_eq!(sub["datatype"]["typename"], "int8");
    assert_eq!(sub["collation"]["present"], false);
    assert_eq!(sub["using"]["fmt"], "USING %{expression}s");
    assert_eq!(sub["using"]["expression"], "(a)::bigint");

    let sub = CollectedAtSubcmd::new(
        ObjectAddress::column(relid, b),
        AlterTableCmd::AlterColumnType { column: "b".to_string(), using: false, behavior: DropBehavior::Restrict },
    );
    let sub = single_subcmd(&catalog, relid, sub);
    assert_eq!(sub["datatype"]["typmod"], "(14)");
    assert_eq!(sub["collation"]["name"]["objname"], "C");
    assert_eq!(sub["using"]["present"], false);
}

#[test]
fn it_deparses_alter_attribute_type_with_cascade() {
    let mut catalog = MemoryCatalog::new();
    let relid = catalog.add_composite_type("pair");
    let x = catalog.add_column(relid, "x", INT8_OID);

    let sub = CollectedAtSubcmd::new(
        ObjectAddress::column(relid, x),
        AlterTableCmd::AlterColumnType { column: "x".to_string(), using: false, behavior: DropBehavior::Cascade },
    );
    let sub = single_subcmd(&catalog, relid, sub);
    assert_eq!(sub["fmt"], "ALTER %{objtype}s %{column}I SET DATA TYPE %{datatype}T %{collation}s %{cascade}s");
    assert_eq!(sub["objtype"], "ATTRIBUTE");
    assert_eq!(sub["cascade"]["fmt"], "CASCADE");
    assert!(sub["cascade"].get("present").is_none());
}

#[test]
fn it_deparses_add_constraint() {
    let (mut catalog, relid) = table();
    let check = Expr::OpExpr { func: INT4PL_FUNC, op: ">".to_string(), args: vec![Expr::Column("a".to_string()), Expr::Const("0".to_string())] };
    let conid = catalog.add_constraint(relid, "t_a_check", contype::CHECK, "CHECK ((a > 0))", Some(check));

    let sub = CollectedAtSubcmd::new(ObjectAddress::constraint(conid), AlterTableCmd::AddConstraint { constraint: Constraint::new(ConstrType::Check) });
    let sub = single_subcmd(&catalog, relid, sub);
    assert_eq!(sub["fmt"], "ADD CONSTRAINT %{name}I %{definition}s");
    assert_eq!(sub["type"], "add constraint");
    assert_eq!(sub["name"], "t_a_check");
    assert_eq!(sub["definition"], "CHECK ((a > 0))");
}

#[test]
fn it_checks_volatility_of_validated_constraints_only() {
    let (mut catalog, relid) = table();
    let check = Expr::OpExpr { func: INT4PL_FUNC, op: ">".to_string(), args: vec![Expr::Column("a".to_string()), call(RANDOM_FUNC, "random", vec![])] };
    let conid = catalog.add_constraint(relid, "t_a_check", contype::CHECK, "CHECK ((a > random()))", Some(check));

    let sub = CollectedAtSubcmd::new(ObjectAddress::constraint(conid), AlterTableCmd::AddConstraint { constraint: Constraint::new(ConstrType::Check) });
    assert_eq!(try_deparse(&catalog, &alter(relid, vec![sub])), Err(Error::VolatileFunction));

    let mut not_valid = Constraint::new(ConstrType::Check);
    not_valid.skip_validation = true;
    let sub = CollectedAtSubcmd::new(ObjectAddress::constraint(conid), AlterTableCmd::AddConstraint { constraint: not_valid });
    assert!(try_deparse(&catalog, &alter(relid, vec![sub])).unwrap().is_some());
}

#[test]
fn it_skips_constraints_without_address() {
    let (catalog, relid) = table();
    let sub = CollectedAtSubcmd::new(ObjectAddress::constraint(INVALID_OID), AlterTableCmd::AddConstraint { constraint: Constraint::new(ConstrType::Check) });
    assert_eq!(try_deparse(&catalog, &alter(relid, vec![sub])), Ok(None));
}

#[test]
fn it_deparses_constraint_indexes() {
    let (mut catalog, relid) = table();
    let idx = catalog.add_index(relid, "t_pkey", vec![key(1, INT4_OPS)], 1, None);
    let conid = catalog.add_constraint(relid, "t_pkey", contype::PRIMARY, "PRIMARY KEY (a)", None);

    let index = IndexStmt { relation: RangeVar::new("t"), index_oid: idx, primary: true, is_constraint: true, ..Default::default() };
    let sub = single_subcmd(&catalog, relid, on(idx, AlterTableCmd::AddIndex { index: index.clone() }));
    assert_eq!(sub["fmt"], "ADD CONSTRAINT %{name}I %{definition}s");
    assert_eq!(sub["name"], "t_pkey");
    assert_eq!(sub["definition"], "PRIMARY KEY (a)");

    let sub = CollectedAtSubcmd::new(ObjectAddress::constraint(conid), AlterTableCmd::AddIndexConstraint { index });
    let sub = single_subcmd(&catalog, relid, sub);
    assert_eq!(sub["fmt"], "ADD CONSTRAINT %{name}I %{constraint_type}s USING INDEX %{index_name}I %{deferrable}s %{init_deferred}s");
    assert_eq!(sub["constraint_type"], "PRIMARY KEY");
    assert_eq!(sub["index_name"], "t_pkey");
    assert_eq!(sub["deferrable"], "NOT DEFERRABLE");
    assert_eq!(sub["init_deferred"], "INITIALLY IMMEDIATE");

    // plain indexes come with their own CREATE INDEX
    let plain = IndexStmt { relation: RangeVar::new("t"), index_oid: idx, ..Default::default() };
    assert_eq!(try_deparse(&catalog, &alter(relid, vec![on(idx, AlterTableCmd::AddIndex { index: plain })])), Ok(None));
}

#[test]
fn it_deparses_constraint_maintenance() {
    let (mut catalog, relid) = table();
    let conid = catalog.add_constraint(relid, "t_a_key", contype::UNIQUE, "UNIQUE (a)", None);

    let mut constraint = Constraint::new(ConstrType::Unique);
    constraint.deferrable = true;
    constraint.initdeferred = true;
    let sub = single_subcmd(&catalog, relid, CollectedAtSubcmd::new(ObjectAddress::constraint(conid), AlterTableCmd::AlterConstraint { constraint }));
    assert_eq!(sub["fmt"], "ALTER CONSTRAINT %{name}I %{deferrable}s %{init_deferred}s");
    assert_eq!(sub["deferrable"], "DEFERRABLE");
    assert_eq!(sub["init_deferred"], "INITIALLY DEFERRED");

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::ValidateConstraint { name: "t_a_key".to_string() }));
    assert_eq!(sub["fmt"], "VALIDATE CONSTRAINT %{constraint}I");
    assert_eq!(sub["constraint"], "t_a_key");

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::DropConstraint { name: "t_a_key".to_string(), if_exists: false, behavior: DropBehavior::Cascade }));
    assert_eq!(sub["fmt"], "DROP CONSTRAINT %{if_exists}s %{constraint}I %{cascade}s");
    assert_eq!(sub["if_exists"], "");
    assert_eq!(sub["cascade"], "CASCADE");
}

#[test]
fn it_deparses_column_settings() {
    let (catalog, relid) = table();
    let column = || "a".to_string();

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::SetStatistics { column: ColumnTarget::Name(column()), statistics: 500 }));
    assert_eq!(sub["fmt"], "ALTER COLUMN %{column}I SET STATISTICS %{statistics}n");
    assert_eq!(sub["statistics"], 500);

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::SetStatistics { column: ColumnTarget::Number(2), statistics: 100 }));
    assert_eq!(sub["fmt"], "ALTER COLUMN %{column}n SET STATISTICS %{statistics}n");
    assert_eq!(sub["column"], 2);

    let options = vec![DefElem::new("n_distinct", Some(DefArg::Float("-0.5".to_string())))];
    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::SetOptions { column: column(), options: options.clone() }));
    assert_eq!(sub["fmt"], "ALTER COLUMN %{column}I %{option}s (%{options:, }s)");
    assert_eq!(sub["option"], "SET");
    assert_eq!(item(&sub, "options", 0)["value"], "-0.5");

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::ResetOptions { column: column(), options }));
    assert_eq!(sub["option"], "RESET");
    assert_eq!(item(&sub, "options", 0)["fmt"], "%{label}s");

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::SetStorage { column: column(), storage: "external".to_string() }));
    assert_eq!(sub["fmt"], "ALTER COLUMN %{column}I SET STORAGE %{storage}s");
    assert_eq!(sub["storage"], "external");

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::SetCompression { column: column(), method: "lz4".to_string() }));
    assert_eq!(sub["compression_method"], "lz4");

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::DropExpression { column: column(), if_exists: true }));
    assert_eq!(sub["fmt"], "ALTER COLUMN %{column}I DROP EXPRESSION %{if_exists}s");
    assert_eq!(sub["if_exists"], "IF EXISTS");

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::DropNotNull { column: column() }));
    assert_eq!(sub["fmt"], "ALTER COLUMN %{column}I DROP NOT NULL");
    assert_eq!(sub["type"], "drop not null");
}

#[test]
fn it_deparses_relation_settings() {
    let (catalog, relid) = table();

    let owner = RoleSpec { roletype: RoleSpecType::CurrentUser, rolename: String::new() };
    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::ChangeOwner { newowner: owner }));
    assert_eq!(sub["fmt"], "OWNER TO %{owner}I");
    assert_eq!(sub["owner"], "alice");

    let public = RoleSpec { roletype: RoleSpecType::Public, rolename: String::new() };
    assert!(matches!(try_deparse(&catalog, &alter(relid, vec![on(relid, AlterTableCmd::ChangeOwner { newowner: public })])), Err(Error::CatalogLookup(_))));

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::SetTableSpace { name: "fast".to_string() }));
    assert_eq!(sub["fmt"], "SET TABLESPACE %{tablespace}I");
    assert_eq!(sub["tablespace"], "fast");

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::SetAccessMethod { name: "heap2".to_string() }));
    assert_eq!(sub["access_method"], "heap2");

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::ClusterOn { index: "t_idx".to_string() }));
    assert_eq!(sub["fmt"], "CLUSTER ON %{index}I");

    let options = vec![DefElem::new("fillfactor", Some(DefArg::Integer(70)))];
    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::SetRelOptions { options: options.clone() }));
    assert_eq!(sub["fmt"], "%{set_reset}s (%{options:, }s)");
    assert_eq!(sub["set_reset"], "SET");
    assert_eq!(item(&sub, "options", 0)["value"], "70");

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::ResetRelOptions { options }));
    assert_eq!(sub["set_reset"], "RESET");

    for (cmd, fmt) in [
        (AlterTableCmd::DropCluster, "SET WITHOUT CLUSTER"),
        (AlterTableCmd::SetUnLogged, "SET UNLOGGED"),
        (AlterTableCmd::DropOids, "SET WITHOUT OIDS"),
        (AlterTableCmd::EnableTrigAll, "ENABLE TRIGGER ALL"),
        (AlterTableCmd::DisableTrigUser, "DISABLE TRIGGER USER"),
        (AlterTableCmd::EnableRowSecurity, "ENABLE ROW LEVEL SECURITY"),
        (AlterTableCmd::NoForceRowSecurity, "NO FORCE ROW LEVEL SECURITY"),
        (AlterTableCmd::DropOf, "NOT OF"),
    ] {
        let sub = single_subcmd(&catalog, relid, on(relid, cmd));
        assert_eq!(sub["fmt"], fmt);
    }
}

#[test]
fn it_deparses_triggers_and_rules() {
    let (catalog, relid) = table();

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::EnableAlwaysTrig { name: "audit".to_string() }));
    assert_eq!(sub["fmt"], "ENABLE ALWAYS TRIGGER %{trigger}I");
    assert_eq!(sub["type"], "enable always trigger");
    assert_eq!(sub["trigger"], "audit");

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::DisableRule { name: "r".to_string() }));
    assert_eq!(sub["fmt"], "DISABLE RULE %{rule}I");
    assert_eq!(sub["rule"], "r");
}

#[test]
fn it_deparses_replica_identity() {
    let (catalog, relid) = table();

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::ReplicaIdentity { identity: ReplicaIdentity::Full }));
    assert_eq!(sub["fmt"], "REPLICA IDENTITY %{ident}s");
    assert_eq!(sub["ident"], "FULL");

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::ReplicaIdentity { identity: ReplicaIdentity::Index("t_idx".to_string()) }));
    assert_eq!(sub["ident"]["fmt"], "USING INDEX %{index}I");
    assert_eq!(sub["ident"]["index"], "t_idx");
}

#[test]
fn it_deparses_inheritance_and_typing() {
    let (mut catalog, relid) = table();
    let parent = catalog.add_relation("base", relkind::RELATION);
    let type_rel = catalog.add_composite_type("pair");
    let type_oid = catalog.relations[&type_rel].of_type;

    let sub = single_subcmd(&catalog, relid, on(parent, AlterTableCmd::AddInherit { parent: RangeVar::new("base") }));
    assert_eq!(sub["fmt"], "INHERIT %{parent}D");
    assert_eq!(sub["parent"]["objname"], "base");

    let sub = single_subcmd(&catalog, relid, on(parent, AlterTableCmd::DropInherit { parent: RangeVar::new("base") }));
    assert_eq!(sub["fmt"], "NO INHERIT %{parent}D");

    let sub = CollectedAtSubcmd::new(ObjectAddress::new(CatalogClass::Type, type_oid), AlterTableCmd::AddOf);
    let sub = single_subcmd(&catalog, relid, sub);
    assert_eq!(sub["fmt"], "OF %{type_of}T");
    assert_eq!(sub["type_of"]["typename"], "pair");
}

#[test]
fn it_deparses_partition_maintenance() {
    let mut catalog = MemoryCatalog::new();
    let parent = catalog.add_relation("measurement", relkind::PARTITIONED_TABLE);
    let partition = catalog.add_relation("measurement_y2024", relkind::RELATION);
    catalog.partition_bounds.insert(partition, "FOR VALUES FROM (2024) TO (2025)".to_string());

    let sub = single_subcmd(&catalog, parent, on(partition, AlterTableCmd::AttachPartition { name: RangeVar::new("measurement_y2024") }));
    assert_eq!(sub["fmt"], "ATTACH PARTITION %{partition_identity}D %{partition_bound}s");
    assert_eq!(sub["partition_identity"]["objname"], "measurement_y2024");
    assert_eq!(sub["partition_bound"], "FOR VALUES FROM (2024) TO (2025)");

    let sub = single_subcmd(&catalog, parent, on(partition, AlterTableCmd::DetachPartition { name: RangeVar::new("measurement_y2024"), concurrent: true }));
    assert_eq!(sub["fmt"], "DETACH PARTITION %{partition_identity}D %{concurrent}s");
    assert_eq!(sub["concurrent"], "CONCURRENTLY");

    let sub = single_subcmd(&catalog, parent, on(partition, AlterTableCmd::DetachPartitionFinalize { name: RangeVar::new("measurement_y2024") }));
    assert_eq!(sub["fmt"], "DETACH PARTITION %{partition_identity}D FINALIZE");
}

#[test]
fn it_skips_subcommands_addressed_at_an_inheritance_child() {
    let mut catalog = MemoryCatalog::new();
    let parent = catalog.add_relation("measurement", relkind::PARTITIONED_TABLE);
    let partition = catalog.add_relation("measurement_y2024", relkind::RELATION);
    catalog.add_inherit(partition, parent);
    catalog.partition_bounds.insert(partition, "FOR VALUES FROM (2024) TO (2025)".to_string());

    let name = RangeVar::new("measurement_y2024");
    for cmd in [
        AlterTableCmd::AttachPartition { name: name.clone() },
        AlterTableCmd::DetachPartition { name: name.clone(), concurrent: false },
        AlterTableCmd::DetachPartitionFinalize { name: name.clone() },
        AlterTableCmd::AddInherit { parent: name },
    ] {
        assert_eq!(try_deparse(&catalog, &alter(parent, vec![on(partition, cmd)])), Ok(None));
    }
}

#[test]
fn it_deparses_identity_subcommands() {
    let (mut catalog, relid) = table();
    catalog.add_identity(relid, 1, "t_a_seq", seq_data(INT4_OID));

    let mut def = ColumnDef::new("a");
    def.identity = Some(ColumnIdentity::ByDefault);
    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::AddIdentity { column: "a".to_string(), def }));
    assert_eq!(sub["fmt"], "ALTER COLUMN %{column}I ADD %{identity_column}s");
    assert_eq!(sub["type"], "add identity");
    assert_eq!(sub["identity_column"]["identity_type"]["option"], "BY DEFAULT");
    assert_eq!(sub["identity_column"]["fmt"], "%{identity_type}s ( %{seq_definition: }s )");

    let set = AlterTableCmd::SetIdentity { column: "a".to_string(), generated: Some(ColumnIdentity::Always) };
    let sub = single_subcmd(&catalog, relid, on(relid, set));
    assert_eq!(sub["fmt"], "ALTER COLUMN %{column}I %{definition}s");
    let definition = &sub["definition"];
    assert_eq!(definition["fmt"], "%{identity_type}s %{seq_definition: }s");
    assert_eq!(definition["identity_type"]["fmt"], "SET GENERATED %{option}s");
    assert_eq!(definition["identity_type"]["option"], "ALWAYS");
    assert_eq!(item(definition, "seq_definition", 0)["fmt"], "SET CACHE %{value}s");

    let sub = single_subcmd(&catalog, relid, on(relid, AlterTableCmd::DropIdentity { column: "a".to_string(), if_exists: true }));
    assert_eq!(sub["fmt"], "ALTER COLUMN %{column}I DROP IDENTITY %{if_exists}s");
    assert_eq!(sub["if_exists"], "IF EXISTS");
}

#[test]
fn it_rejects_unexpected_relkind() {
    let mut catalog = MemoryCatalog::new();
    let seqid = catalog.add_sequence("s", seq_data(INT8_OID));
    let cmd = alter(seqid, vec![on(seqid, AlterTableCmd::SetLogged)]);
    assert!(matches!(try_deparse(&catalog, &cmd), Err(Error::Unexpected(_))));
}
