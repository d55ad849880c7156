//! Query grammar.
//!
//! `Grammar` carries the generic rules of the host query builder:
//! identifier wrapping, placeholders, unions and inserts. The
//! Tarantool dialect overrides the pieces it spells differently.

use indexmap::IndexMap;
use itertools::Itertools;
use smol_str::{format_smolstr, SmolStr};

use crate::backend::sql::ir::PatternWithParams;
use crate::errors::{Entity, TarsqlError};
use crate::ir::value::Value;

/// A record to insert: column name to value, in the order given.
pub type Row = IndexMap<SmolStr, Value>;

/// Values of an insert statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertValues {
    Row(Row),
    Rows(Vec<Row>),
}

impl InsertValues {
    /// Every insert is treated as a batch.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        match self {
            InsertValues::Row(row) => std::slice::from_ref(row),
            InsertValues::Rows(rows) => rows,
        }
    }
}

impl From<Row> for InsertValues {
    fn from(row: Row) -> Self {
        InsertValues::Row(row)
    }
}

impl From<Vec<Row>> for InsertValues {
    fn from(rows: Vec<Row>) -> Self {
        InsertValues::Rows(rows)
    }
}

/// A query joined to the base one with `union [all]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionClause {
    pub sql: String,
    pub all: bool,
}

impl UnionClause {
    #[must_use]
    pub fn new(sql: &str, all: bool) -> Self {
        UnionClause {
            sql: sql.to_string(),
            all,
        }
    }
}

/// Columns of the first row and the bindings of all rows in that
/// column order.
///
/// # Errors
/// - The first row is empty.
/// - A row lacks a column of the first row or has extra ones.
fn batch_bindings(rows: &[Row]) -> Result<(Vec<&SmolStr>, Vec<Value>), TarsqlError> {
    let Some(first) = rows.first() else {
        return Ok((Vec::new(), Vec::new()));
    };
    if first.is_empty() {
        return Err(TarsqlError::Invalid(
            Entity::Row,
            Some("insert row without columns".into()),
        ));
    }
    let columns: Vec<&SmolStr> = first.keys().collect();
    let mut params = Vec::with_capacity(columns.len() * rows.len());
    for (pos, row) in rows.iter().enumerate() {
        for column in &columns {
            let Some(value) = row.get(*column) else {
                return Err(TarsqlError::Invalid(
                    Entity::Row,
                    Some(format_smolstr!(
                        "row {pos} of the insert has no column \"{column}\""
                    )),
                ));
            };
            params.push(value.clone());
        }
        if row.len() != columns.len() {
            return Err(TarsqlError::Invalid(
                Entity::Row,
                Some(format_smolstr!(
                    "row {pos} of the insert has {} columns, expected {}",
                    row.len(),
                    columns.len()
                )),
            ));
        }
    }
    Ok((columns, params))
}

pub trait Grammar {
    /// Quote a single identifier segment. `*` stays as is.
    fn wrap_value(&self, value: &str) -> String {
        if value == "*" {
            return value.to_string();
        }
        format!("\"{}\"", value.replace('"', "\"\""))
    }

    /// Quote an identifier that may be qualified (`a.b`) or
    /// aliased (`a as b`).
    fn wrap(&self, value: &str) -> String {
        let lower = value.to_ascii_lowercase();
        if let Some(pos) = lower.find(" as ") {
            let (name, alias) = (&value[..pos], &value[pos + 4..]);
            return format!("{} as {}", self.wrap(name), self.wrap_value(alias));
        }
        value.split('.').map(|s| self.wrap_value(s)).join(".")
    }

    fn wrap_table(&self, table: &str) -> String {
        self.wrap(table)
    }

    fn columnize<S: AsRef<str>>(&self, columns: &[S]) -> String {
        columns.iter().map(|c| self.wrap(c.as_ref())).join(", ")
    }

    fn parameterize(&self, values: &[Value]) -> String {
        values.iter().map(|_| "?").join(", ")
    }

    /// Wrap a branch of a union.
    fn wrap_union(&self, sql: &str) -> String {
        format!("({sql})")
    }

    fn compile_union(&self, union: &UnionClause) -> String {
        let conjunction = if union.all { " union all " } else { " union " };
        format!("{conjunction}{}", self.wrap_union(&union.sql))
    }

    /// Join the base query with its unions.
    fn compile_unions(&self, base: &str, unions: &[UnionClause]) -> String {
        if unions.is_empty() {
            return base.to_string();
        }
        let mut sql = self.wrap_union(base);
        for union in unions {
            sql.push_str(&self.compile_union(union));
        }
        sql
    }

    /// Compile an insert statement.
    ///
    /// # Errors
    /// - Rows have different columns.
    fn compile_insert(
        &self,
        table: &str,
        values: &InsertValues,
    ) -> Result<PatternWithParams, TarsqlError> {
        let table = self.wrap_table(table);
        let rows = values.rows();
        if rows.is_empty() {
            return Ok(PatternWithParams::new(
                format!("insert into {table} default values"),
                Vec::new(),
            ));
        }
        let (columns, params) = batch_bindings(rows)?;
        let parameters = params
            .chunks(columns.len())
            .map(|row| format!("({})", self.parameterize(row)))
            .join(", ");
        Ok(PatternWithParams::new(
            format!(
                "insert into {table} ({}) values {parameters}",
                self.columnize(&columns)
            ),
            params,
        ))
    }
}

/// Query grammar of the Tarantool SQL dialect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TarantoolGrammar;

impl TarantoolGrammar {
    #[must_use]
    pub fn new() -> Self {
        TarantoolGrammar
    }

    /// Like `columnize`, but names that are already quoted are
    /// kept as is.
    pub fn columnize_custom<S: AsRef<str>>(&self, columns: &[S]) -> String {
        columns
            .iter()
            .map(|c| {
                let c = c.as_ref();
                if c.len() > 1 && c.starts_with('"') && c.ends_with('"') {
                    c.to_string()
                } else {
                    self.wrap(c)
                }
            })
            .join(", ")
    }
}

impl Grammar for TarantoolGrammar {
    /// Tarantool rejects parenthesized union branches.
    fn wrap_union(&self, sql: &str) -> String {
        sql.to_string()
    }

    /// Single rows are compiled as a batch of one. All rows share the
    /// columns of the first one and bind their values in that order.
    fn compile_insert(
        &self,
        table: &str,
        values: &InsertValues,
    ) -> Result<PatternWithParams, TarsqlError> {
        let rows = values.rows();
        if rows.is_empty() {
            return Err(TarsqlError::Invalid(
                Entity::Query,
                Some("insert without rows".into()),
            ));
        }
        let table = self.wrap_table(table);
        let (columns, params) = batch_bindings(rows)?;
        let parameters = params
            .chunks(columns.len())
            .map(|row| format!("({})", self.parameterize(row)))
            .join(", ");
        Ok(PatternWithParams::new(
            format!(
                "insert into {table} ({}) values {parameters}",
                self.columnize_custom(&columns)
            ),
            params,
        ))
    }
}

#[cfg(test)]
mod tests;
