use pretty_assertions::assert_eq;

use super::*;

/// Grammar with the generic rules only.
struct HostGrammar;

impl Grammar for HostGrammar {}

fn row(values: &[(&str, i64)]) -> Row {
    values
        .iter()
        .map(|(name, value)| (SmolStr::from(*name), Value::from(*value)))
        .collect()
}

#[test]
fn wrap_identifiers() {
    let grammar = TarantoolGrammar::new();
    assert_eq!("\"users\"", grammar.wrap("users"));
    assert_eq!("\"u\".\"name\"", grammar.wrap("u.name"));
    assert_eq!("\"u\".*", grammar.wrap("u.*"));
    assert_eq!("\"users\" as \"u\"", grammar.wrap("users AS u"));
    assert_eq!("\"a\"\"b\"", grammar.wrap("a\"b"));
    assert_eq!("\"a\", \"b\"", grammar.columnize(&["a", "b"]));
}

#[test]
fn batch_insert() {
    let values = InsertValues::from(vec![row(&[("a", 1), ("b", 2)]), row(&[("a", 3), ("b", 4)])]);
    let PatternWithParams { pattern, params } =
        TarantoolGrammar::new().compile_insert("t", &values).unwrap();
    assert_eq!(
        "insert into \"t\" (\"a\", \"b\") values (?, ?), (?, ?)",
        pattern
    );
    assert_eq!(
        vec![
            Value::from(1_i64),
            Value::from(2_i64),
            Value::from(3_i64),
            Value::from(4_i64),
        ],
        params
    );
}

#[test]
fn single_row_insert_is_a_batch_of_one() {
    let values = InsertValues::from(row(&[("id", 7), ("\"age\"", 30)]));
    let PatternWithParams { pattern, params } =
        TarantoolGrammar::new().compile_insert("users", &values).unwrap();
    assert_eq!(
        "insert into \"users\" (\"id\", \"age\") values (?, ?)",
        pattern
    );
    assert_eq!(vec![Value::from(7_i64), Value::from(30_i64)], params);
}

#[test]
fn insert_binds_in_first_row_order() {
    let values = InsertValues::from(vec![row(&[("a", 1), ("b", 2)]), row(&[("b", 4), ("a", 3)])]);
    let PatternWithParams { params, .. } =
        TarantoolGrammar::new().compile_insert("t", &values).unwrap();
    assert_eq!(
        vec![
            Value::from(1_i64),
            Value::from(2_i64),
            Value::from(3_i64),
            Value::from(4_i64),
        ],
        params
    );
}

#[test]
fn insert_errors() {
    let grammar = TarantoolGrammar::new();

    let err = grammar
        .compile_insert("t", &InsertValues::Rows(Vec::new()))
        .unwrap_err();
    assert!(matches!(err, TarsqlError::Invalid(Entity::Query, _)));

    let values = InsertValues::from(vec![row(&[("a", 1), ("b", 2)]), row(&[("a", 3)])]);
    let err = grammar.compile_insert("t", &values).unwrap_err();
    assert_eq!(
        "invalid row: row 1 of the insert has no column \"b\"",
        err.to_string()
    );
}

#[test]
fn insert_rejects_extra_columns() {
    let values = InsertValues::from(vec![row(&[("a", 1)]), row(&[("a", 2), ("b", 3)])]);
    let err = TarantoolGrammar::new()
        .compile_insert("t", &values)
        .unwrap_err();
    assert_eq!(
        "invalid row: row 1 of the insert has 2 columns, expected 1",
        err.to_string()
    );
}

#[test]
fn host_grammar_insert() {
    let grammar = HostGrammar;
    let PatternWithParams { pattern, params } = grammar
        .compile_insert("t", &InsertValues::Rows(Vec::new()))
        .unwrap();
    assert_eq!("insert into \"t\" default values", pattern);
    assert!(params.is_empty());

    let values = InsertValues::from(row(&[("a", 1)]));
    let PatternWithParams { pattern, .. } = grammar.compile_insert("t", &values).unwrap();
    assert_eq!("insert into \"t\" (\"a\") values (?)", pattern);
}

#[test]
fn union_branches_are_not_parenthesized() {
    let unions = [
        UnionClause::new("select \"a\" from \"t2\"", false),
        UnionClause::new("select \"a\" from \"t3\"", true),
    ];
    let base = "select \"a\" from \"t1\"";

    assert_eq!(
        "select \"a\" from \"t1\" union select \"a\" from \"t2\" union all select \"a\" from \"t3\"",
        TarantoolGrammar::new().compile_unions(base, &unions)
    );
    assert_eq!(
        "(select \"a\" from \"t1\") union (select \"a\" from \"t2\") union all (select \"a\" from \"t3\")",
        HostGrammar.compile_unions(base, &unions)
    );
    assert_eq!(base, TarantoolGrammar::new().compile_unions(base, &[]));
}
