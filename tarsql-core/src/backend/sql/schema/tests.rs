use pretty_assertions::assert_eq;

use super::*;

fn users() -> Blueprint {
    let mut blueprint = Blueprint::new("users");
    blueprint
        .create()
        .id()
        .column(ColumnDef::new("email", ColumnType::String))
        .column(ColumnDef::new("name", ColumnType::String).length(100).nullable())
        .column(ColumnDef::new("active", ColumnType::Boolean).default(true))
        .timestamps();
    blueprint
}

#[test]
fn create_table() {
    let grammar = SchemaGrammar::new();
    assert_eq!(
        concat!(
            r#"CREATE TABLE IF NOT EXISTS "users" ("#,
            r#""id" INTEGER not null PRIMARY KEY AUTOINCREMENT, "#,
            r#""email" VARCHAR(255) not null, "#,
            r#""name" VARCHAR(100), "#,
            r#""active" SCALAR default '1' not null, "#,
            r#""created_at" VARCHAR(200), "#,
            r#""updated_at" VARCHAR(200))"#,
        ),
        grammar.compile_create(&users())
    );
}

#[test]
fn type_mapping() {
    let grammar = SchemaGrammar::new();
    let cases = [
        (ColumnType::Char, "TEXT"),
        (ColumnType::Text, "TEXT"),
        (ColumnType::MediumText, "TEXT"),
        (ColumnType::LongText, "TEXT"),
        (ColumnType::Enum, "TEXT"),
        (ColumnType::Json, "TEXT"),
        (ColumnType::String, "VARCHAR(255)"),
        (ColumnType::Integer, "INTEGER"),
        (ColumnType::BigInteger, "INTEGER"),
        (ColumnType::MediumInteger, "INTEGER"),
        (ColumnType::TinyInteger, "INTEGER"),
        (ColumnType::SmallInteger, "INTEGER"),
        (ColumnType::Float, "NUMBER"),
        (ColumnType::Double, "NUMBER"),
        (ColumnType::Decimal, "NUMBER"),
        (ColumnType::Boolean, "SCALAR"),
        (ColumnType::Binary, "SCALAR"),
        (ColumnType::Date, "VARCHAR(10)"),
        (ColumnType::Time, "VARCHAR(10)"),
        (ColumnType::DateTime, "VARCHAR(30)"),
        (ColumnType::Timestamp, "VARCHAR(200)"),
    ];
    for (column_type, sql) in cases {
        assert_eq!(
            sql,
            grammar.type_sql(&ColumnDef::new("c", column_type)),
            "{column_type}"
        );
    }
}

#[test]
fn default_literals() {
    let grammar = SchemaGrammar::new();
    let column = |c: ColumnDef| grammar.modifiers(&c.nullable());

    assert_eq!(" default 'it''s'", column(ColumnDef::new("c", ColumnType::Text).default("it's")));
    assert_eq!(" default '0'", column(ColumnDef::new("c", ColumnType::Boolean).default(false)));
    assert_eq!(" default '42'", column(ColumnDef::new("c", ColumnType::Integer).default(42_i64)));
    assert_eq!(" default '1.5'", column(ColumnDef::new("c", ColumnType::Double).default(1.5_f64)));
    assert_eq!(
        " default CURRENT_TIMESTAMP",
        column(ColumnDef::new("c", ColumnType::Timestamp).default_raw("CURRENT_TIMESTAMP"))
    );
    assert_eq!("", column(ColumnDef::new("c", ColumnType::Text).default(None::<i64>)));
    assert_eq!(
        " not null",
        grammar.modifiers(&ColumnDef::new("c", ColumnType::Text))
    );
}

#[test]
fn primary_key_injected_once() {
    let grammar = SchemaGrammar::new();
    let columns = vec![
        "\"name\" TEXT not null".to_string(),
        "\"id\" INTEGER not null".to_string(),
        "\"parent_id\" INTEGER".to_string(),
    ];
    let sql = grammar.auto_add_primary_key(columns);
    assert_eq!(
        "\"name\" TEXT not null, \"id\" INTEGER not null PRIMARY KEY AUTOINCREMENT, \"parent_id\" INTEGER",
        sql
    );
    assert_eq!(1, sql.matches("PRIMARY KEY AUTOINCREMENT").count());
}

#[test]
fn primary_key_not_duplicated() {
    let grammar = SchemaGrammar::new();
    let columns = vec![
        "\"code\" TEXT not null primary key".to_string(),
        "\"id\" INTEGER not null".to_string(),
    ];
    assert_eq!(
        "\"code\" TEXT not null primary key, \"id\" INTEGER not null AUTOINCREMENT",
        grammar.auto_add_primary_key(columns)
    );

    let columns = vec!["\"ID\" INTEGER PRIMARY KEY AUTOINCREMENT".to_string()];
    assert_eq!(
        "\"ID\" INTEGER PRIMARY KEY AUTOINCREMENT",
        grammar.auto_add_primary_key(columns)
    );
}

#[test]
fn no_id_column() {
    let grammar = SchemaGrammar::new();
    let columns = vec!["\"user_id\" INTEGER".to_string(), "\"name\" TEXT".to_string()];
    assert_eq!(
        "\"user_id\" INTEGER, \"name\" TEXT",
        grammar.auto_add_primary_key(columns)
    );
    assert_eq!("", grammar.auto_add_primary_key(Vec::new()));
}

#[test]
fn index_commands() {
    let grammar = SchemaGrammar::new();
    let mut blueprint = Blueprint::new("users");
    blueprint
        .unique(&["email"], None)
        .index(&["first_name", "last_name"], None)
        .index(&["email"], Some("unique"))
        .primary(&["id", "email"]);

    assert_eq!(
        vec![
            r#"CREATE UNIQUE INDEX USERS_EMAIL_UNIQUE ON "users" ("email")"#,
            r#"CREATE INDEX USERS_FIRST_NAME_LAST_NAME_INDE ON "users" ("first_name", "last_name")"#,
            r#"CREATE INDEX "UNIQUE" ON "users" ("email")"#,
            r#"alter table "users" add PRIMARY KEY ("id", "email")"#,
        ],
        grammar.to_sql(&blueprint)
    );
}

#[test]
fn long_index_name_truncated() {
    let grammar = SchemaGrammar::new();
    let mut blueprint = Blueprint::new("subscriptions");
    blueprint.index(&["customer_id", "created_at"], None);
    assert_eq!(
        vec![r#"CREATE INDEX SUBSCRIPTIONS_CUSTOMER_ID_CREAT ON "subscriptions" ("customer_id", "created_at")"#],
        grammar.to_sql(&blueprint)
    );
}

#[test]
fn drop_and_foreign_keys() {
    let grammar = SchemaGrammar::new();
    let mut blueprint = Blueprint::new("posts");
    blueprint
        .foreign(&["user_id"], "users", &["id"], None)
        .drop_foreign("posts_user_id_foreign")
        .drop_foreign("check")
        .drop_foreign("batch")
        .drop();

    assert_eq!(
        vec![
            r#"alter table "posts" drop constraint posts_user_id_foreign"#,
            r#"alter table "posts" drop constraint "CHECK""#,
            r#"alter table "posts" drop constraint "BATCH""#,
            r#"drop table "posts""#,
        ],
        grammar.to_sql(&blueprint)
    );
    assert_eq!(None, grammar.compile(&blueprint, &blueprint.commands()[0]));
}

#[test]
fn columns_without_create() {
    let grammar = SchemaGrammar::new();
    let mut blueprint = Blueprint::new("posts");
    blueprint.column(ColumnDef::new("title", ColumnType::String));
    assert!(grammar.to_sql(&blueprint).is_empty());
}

#[test]
fn table_exists() {
    assert_eq!(
        r#"select * from "_space" where "name" = ?"#,
        SchemaGrammar::new().compile_table_exists()
    );
}
