use pretty_assertions::assert_eq;

use super::*;

#[test]
fn display_descriptors() {
    let err = TarsqlError::Invalid(Entity::Config, Some("host is missing".into()));
    assert_eq!("invalid configuration: host is missing", err.to_string());

    let err = TarsqlError::FailedTo(Action::Connect, Some(Entity::Connection), "refused".into());
    assert_eq!("failed to connect connection: refused", err.to_string());

    let err = TarsqlError::NotFound(Entity::Column, "\"b\"".into());
    assert_eq!("column \"b\" not found", err.to_string());
}

#[test]
fn query_error_keeps_statement_and_bindings() {
    let cause = TarsqlError::Other("Space 'T' does not exist".into());
    let err = cause
        .clone()
        .in_query("select * from t where a = ?", &[Value::from(1_i64)]);

    let TarsqlError::Query(query) = &err else {
        panic!("expected query error, got {err:?}");
    };
    assert_eq!("select * from t where a = ?", query.sql);
    assert_eq!(vec![Value::from(1_i64)], query.params);
    assert_eq!(cause, query.cause);
    assert_eq!(
        "Space 'T' does not exist (SQL: select * from t where a = ?, bindings: [1])",
        err.to_string()
    );
}
