//! CREATE INDEX tests.

use super::*;

fn create_index(index_oid: Oid, stmt: IndexStmt) -> CollectedCommand {
    CollectedCommand::simple(index_oid, Node::IndexStmt(Box::new(stmt)))
}

fn index_stmt(index_oid: Oid) -> IndexStmt {
    IndexStmt { idxname: Some("t_idx".to_string()), relation: RangeVar::new("t"), index_oid, ..Default::default() }
}

/// `t (a int, b text)`
fn table() -> (MemoryCatalog, Oid) {
    let mut catalog = MemoryCatalog::new();
    let relid = catalog.add_relation("t", relkind::RELATION);
    catalog.add_column(relid, "a", INT4_OID);
    catalog.add_column(relid, "b", TEXT_OID);
    (catalog, relid)
}

fn a_plus_one() -> Expr {
    Expr::OpExpr { func: INT4PL_FUNC, op: "+".to_string(), args: vec![Expr::Column("a".to_string()), Expr::Const("1".to_string())] }
}

#[test]
fn it_deparses_create_index() {
    let (mut catalog, relid) = table();
    let keys = vec![key(1, INT4_OPS), IndexKey { column: IndexColumn::Attribute(2), collation: C_COLLATION, opclass: TEXT_OPS, options: INDOPTION_DESC }];
    let idx = catalog.add_index(relid, "t_idx", keys, 2, None);

    let value = deparse_value(&catalog, &create_index(idx, index_stmt(idx)), DeparseOptions::default());
    assert_eq!(
        value["fmt"],
        "CREATE %{unique}s INDEX %{concurrently}s %{if_not_exists}s %{name}I ON %{only}s %{table}D USING %{index_am}s %{definition}s %{with}s %{tablespace}s %{where_clause}s NULLS DISTINCT"
    );
    assert_eq!(value["unique"], "");
    assert_eq!(value["only"], "");
    assert_eq!(value["name"], "t_idx");
    assert_eq!(value["table"]["schemaname"], "public");
    assert_eq!(value["table"]["objname"], "t");
    assert_eq!(value["index_am"], "btree");
    assert_eq!(value["definition"], r#"(a pg_catalog.int4_ops, b COLLATE pg_catalog."C" pg_catalog.text_ops DESC NULLS LAST)"#);
    assert_eq!(value["with"]["present"], false);
    assert_eq!(value["tablespace"]["present"], false);
    assert_eq!(value["where_clause"]["present"], false);
}

#[test]
fn it_deparses_include_columns() {
    let (mut catalog, relid) = table();
    let idx = catalog.add_index(relid, "t_idx", vec![key(1, INT4_OPS), key(2, TEXT_OPS)], 1, None);

    let value = deparse_value(&catalog, &create_index(idx, index_stmt(idx)), DeparseOptions::default());
    assert_eq!(value["definition"], "(a pg_catalog.int4_ops) INCLUDE (b)");
}

#[test]
fn it_parenthesizes_expressions_except_function_calls() {
    let (mut catalog, relid) = table();
    let keys = vec![
        IndexKey { column: IndexColumn::Expression(call(LOWER_FUNC, "lower", vec![Expr::Column("b".to_string())])), collation: INVALID_OID, opclass: TEXT_OPS, options: 0 },
        IndexKey { column: IndexColumn::Expression(a_plus_one()), collation: INVALID_OID, opclass: INT4_OPS, options: INDOPTION_NULLS_FIRST },
    ];
    let idx = catalog.add_index(relid, "t_idx", keys, 2, None);

    let value = deparse_value(&catalog, &create_index(idx, index_stmt(idx)), DeparseOptions::default());
    assert_eq!(value["definition"], "(lower(b) pg_catalog.text_ops, (a + 1) pg_catalog.int4_ops NULLS FIRST)");
}

#[test]
fn it_ignores_ordering_for_unordered_access_methods() {
    let (mut catalog, relid) = table();
    let keys = vec![IndexKey { column: IndexColumn::Attribute(1), collation: INVALID_OID, opclass: INT4_OPS, options: INDOPTION_DESC }];
    let idx = catalog.add_index(relid, "t_idx", keys, 1, None);
    catalog.relations.get_mut(&idx).unwrap().access_method = HASH_AM;

    let value = deparse_value(&catalog, &create_index(idx, index_stmt(idx)), DeparseOptions::default());
    assert_eq!(value["index_am"], "hash");
    assert_eq!(value["definition"], "(a pg_catalog.int4_ops)");
}

#[test]
fn it_deparses_index_clauses() {
    let (mut catalog, relid) = table();
    let predicate = Expr::OpExpr { func: INT4PL_FUNC, op: ">".to_string(), args: vec![Expr::Column("a".to_string()), Expr::Const("0".to_string())] };
    let idx = catalog.add_index(relid, "t_idx", vec![key(1, INT4_OPS)], 1, Some(predicate));
    catalog.reloptions.insert(idx, "fillfactor=70".to_string());
    let spcid = catalog.add_tablespace("fast");
    catalog.relations.get_mut(&idx).unwrap().tablespace = spcid;

    let mut stmt = index_stmt(idx);
    stmt.unique = true;
    stmt.concurrent = true;
    stmt.if_not_exists = true;
    stmt.nulls_not_distinct = true;
    stmt.relation.inh = false;

    let value = deparse_value(&catalog, &create_index(idx, stmt), DeparseOptions::default());
    let fmt = value["fmt"].as_str().unwrap();
    assert!(fmt.ends_with("%{where_clause}s NULLS NOT DISTINCT"), "{}", fmt);
    assert_eq!(value["unique"], "UNIQUE");
    assert_eq!(value["concurrently"], "CONCURRENTLY");
    assert_eq!(value["if_not_exists"], "IF NOT EXISTS");
    assert_eq!(value["only"], "ONLY");
    assert_eq!(value["with"]["fmt"], "WITH (%{opts}s)");
    assert_eq!(value["with"]["opts"], "fillfactor=70");
    assert_eq!(value["tablespace"]["fmt"], "TABLESPACE %{tablespace}s");
    assert_eq!(value["tablespace"]["tablespace"], "fast");
    assert_eq!(value["where_clause"]["fmt"], "WHERE %{where}s");
    assert_eq!(value["where_clause"]["where"], "a > 0");
}

#[test]
fn it_skips_constraint_indexes() {
    let (mut catalog, relid) = table();
    let idx = catalog.add_index(relid, "t_pkey", vec![key(1, INT4_OPS)], 1, None);

    let mut primary = index_stmt(idx);
    primary.primary = true;
    let mut constraint = index_stmt(idx);
    constraint.is_constraint = true;

    for stmt in [primary, constraint] {
        let json = pg_ddl_deparse::deparse_utility_command(&create_index(idx, stmt), &catalog, DeparseOptions::default()).unwrap();
        assert_eq!(json, None);
    }
}
