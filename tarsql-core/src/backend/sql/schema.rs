//! Schema grammar.
//!
//! Compiles blueprints into Tarantool DDL. Foreign keys are not
//! supported by the dialect and compile to nothing.

use smol_str::SmolStr;

use crate::backend::sql::query::Grammar;
use crate::backend::sql::words::is_reserved;
use crate::ir::blueprint::{Blueprint, Command};
use crate::ir::column::{ColumnDef, ColumnType, DefaultValue, DEFAULT_STRING_LENGTH};
use crate::ir::value::Value;
use crate::warn;

/// Index names longer than this are truncated.
pub const MAX_INDEX_NAME_LENGTH: usize = 31;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchemaGrammar;

impl Grammar for SchemaGrammar {}

impl SchemaGrammar {
    #[must_use]
    pub fn new() -> Self {
        SchemaGrammar
    }

    /// SQL type of a column.
    #[must_use]
    pub fn type_sql(&self, column: &ColumnDef) -> String {
        match column.r#type {
            ColumnType::Char
            | ColumnType::Text
            | ColumnType::MediumText
            | ColumnType::LongText
            | ColumnType::Enum
            | ColumnType::Json => "TEXT".into(),
            ColumnType::String => {
                format!("VARCHAR({})", column.length.unwrap_or(DEFAULT_STRING_LENGTH))
            }
            ColumnType::Integer
            | ColumnType::BigInteger
            | ColumnType::MediumInteger
            | ColumnType::TinyInteger
            | ColumnType::SmallInteger => "INTEGER".into(),
            ColumnType::Float | ColumnType::Double | ColumnType::Decimal => "NUMBER".into(),
            ColumnType::Boolean | ColumnType::Binary => "SCALAR".into(),
            ColumnType::Date | ColumnType::Time => "VARCHAR(10)".into(),
            ColumnType::DateTime => "VARCHAR(30)".into(),
            ColumnType::Timestamp => "VARCHAR(200)".into(),
        }
    }

    /// Render a column default. Literals are always quoted.
    fn default_value(&self, default: &DefaultValue) -> Option<String> {
        match default {
            DefaultValue::Raw(expression) => Some(expression.to_string()),
            DefaultValue::Literal(value) => match value {
                Value::Null => None,
                Value::Boolean(v) => Some(if *v { "'1'" } else { "'0'" }.into()),
                Value::String(v) => Some(format!("'{}'", v.replace('\'', "''"))),
                Value::Binary(_) => Some(value.to_string()),
                Value::Integer(_) | Value::Unsigned(_) | Value::Double(_) => {
                    Some(format!("'{value}'"))
                }
            },
        }
    }

    /// Column modifiers: the default first, then nullability.
    #[must_use]
    pub fn modifiers(&self, column: &ColumnDef) -> String {
        let mut sql = String::new();
        if let Some(default) = column.default.as_ref().and_then(|d| self.default_value(d)) {
            sql.push_str(" default ");
            sql.push_str(&default);
        }
        if !column.is_nullable {
            sql.push_str(" not null");
        }
        sql
    }

    #[must_use]
    pub fn column_definitions(&self, blueprint: &Blueprint) -> Vec<String> {
        blueprint
            .columns()
            .iter()
            .map(|column| {
                format!(
                    "{} {}{}",
                    self.wrap(&column.name),
                    self.type_sql(column),
                    self.modifiers(column)
                )
            })
            .collect()
    }

    /// Make the `"id"` column the autoincrement primary key unless the
    /// definitions already declare one, then join them.
    #[must_use]
    pub fn auto_add_primary_key(&self, mut columns: Vec<String>) -> String {
        let mut has_primary_key = false;
        let mut has_autoincrement = false;
        let mut id_column: Option<usize> = None;
        for (pos, column) in columns.iter().enumerate() {
            let upper = column.to_uppercase();
            has_primary_key |= upper.contains("PRIMARY KEY");
            has_autoincrement |= upper.contains("AUTOINCREMENT");
            if id_column.is_none() && column.to_lowercase().contains("\"id\"") {
                id_column = Some(pos);
            }
        }

        if let Some(column) = id_column.and_then(|pos| columns.get_mut(pos)) {
            if !has_primary_key {
                column.push_str(" PRIMARY KEY");
            }
            if !has_autoincrement {
                column.push_str(" AUTOINCREMENT");
            }
        }
        columns.join(", ")
    }

    #[must_use]
    pub fn compile_create(&self, blueprint: &Blueprint) -> String {
        let columns = self.auto_add_primary_key(self.column_definitions(blueprint));
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({columns})",
            self.wrap_table(blueprint.table())
        )
    }

    #[must_use]
    pub fn compile_drop(&self, blueprint: &Blueprint) -> String {
        format!("drop table {}", self.wrap_table(blueprint.table()))
    }

    /// The primary key constraint is never named.
    #[must_use]
    pub fn compile_primary(&self, blueprint: &Blueprint, columns: &[SmolStr]) -> String {
        format!(
            "alter table {} add PRIMARY KEY ({})",
            self.wrap_table(blueprint.table()),
            self.columnize(columns)
        )
    }

    #[must_use]
    pub fn compile_unique(&self, blueprint: &Blueprint, index: &str, columns: &[SmolStr]) -> String {
        format!(
            "CREATE UNIQUE INDEX {} ON {} ({})",
            self.index_name(index),
            self.wrap_table(blueprint.table()),
            self.columnize(columns)
        )
    }

    #[must_use]
    pub fn compile_index(&self, blueprint: &Blueprint, index: &str, columns: &[SmolStr]) -> String {
        format!(
            "CREATE INDEX {} ON {} ({})",
            self.index_name(index),
            self.wrap_table(blueprint.table()),
            self.columnize(columns)
        )
    }

    #[must_use]
    pub fn compile_drop_foreign(&self, blueprint: &Blueprint, index: &str) -> String {
        format!(
            "alter table {} drop constraint {}",
            self.wrap_table(blueprint.table()),
            self.bare_identifier(index)
        )
    }

    /// Foreign keys compile to nothing.
    #[must_use]
    pub fn compile_foreign(&self, blueprint: &Blueprint, index: &str) -> Option<String> {
        warn!(
            Option::from("schema grammar"),
            &format!(
                "foreign key {index} on table {} is not supported, skipping it",
                blueprint.table()
            ),
        );
        None
    }

    #[must_use]
    pub fn compile_table_exists(&self) -> &'static str {
        "select * from \"_space\" where \"name\" = ?"
    }

    /// Compile a single command of the blueprint.
    #[must_use]
    pub fn compile(&self, blueprint: &Blueprint, command: &Command) -> Option<String> {
        match command {
            Command::Create => Some(self.compile_create(blueprint)),
            Command::Drop => Some(self.compile_drop(blueprint)),
            Command::Primary { columns } => Some(self.compile_primary(blueprint, columns)),
            Command::Unique { index, columns } => {
                Some(self.compile_unique(blueprint, index, columns))
            }
            Command::Index { index, columns } => {
                Some(self.compile_index(blueprint, index, columns))
            }
            Command::Foreign { index, .. } => self.compile_foreign(blueprint, index),
            Command::DropForeign { index } => Some(self.compile_drop_foreign(blueprint, index)),
        }
    }

    /// Statements of the blueprint, in command order.
    #[must_use]
    pub fn to_sql(&self, blueprint: &Blueprint) -> Vec<String> {
        if !blueprint.columns().is_empty() && !blueprint.creating() {
            warn!(
                Option::from("schema grammar"),
                &format!(
                    "adding columns to the existing table {} is not supported, skipping {} column(s)",
                    blueprint.table(),
                    blueprint.columns().len()
                ),
            );
        }
        blueprint
            .commands()
            .iter()
            .filter_map(|command| self.compile(blueprint, command))
            .collect()
    }

    /// Index names are truncated and upper-cased.
    fn index_name(&self, index: &str) -> String {
        let name: String = index.chars().take(MAX_INDEX_NAME_LENGTH).collect();
        self.bare_identifier(&name.to_uppercase())
    }

    /// Unquoted identifier. A reserved word is quoted in the upper case
    /// Tarantool folds the bare name to.
    fn bare_identifier(&self, name: &str) -> String {
        if is_reserved(name) {
            self.wrap_value(&name.to_uppercase())
        } else {
            name.to_string()
        }
    }
}

#[cfg(test)]
mod tests;
