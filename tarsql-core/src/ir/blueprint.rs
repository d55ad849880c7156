//! Schema blueprints.
//!
//! A blueprint collects the columns and the commands of one table
//! migration. The schema grammar turns it into statements.

use smol_str::{format_smolstr, SmolStr};

use crate::ir::column::{ColumnDef, ColumnType};

/// Schema command recorded on a blueprint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Create,
    Drop,
    Primary {
        columns: Vec<SmolStr>,
    },
    Unique {
        index: SmolStr,
        columns: Vec<SmolStr>,
    },
    Index {
        index: SmolStr,
        columns: Vec<SmolStr>,
    },
    Foreign {
        index: SmolStr,
        columns: Vec<SmolStr>,
        on: SmolStr,
        references: Vec<SmolStr>,
    },
    DropForeign {
        index: SmolStr,
    },
}

impl Command {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::Create => "create",
            Command::Drop => "drop",
            Command::Primary { .. } => "primary",
            Command::Unique { .. } => "unique",
            Command::Index { .. } => "index",
            Command::Foreign { .. } => "foreign",
            Command::DropForeign { .. } => "dropForeign",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blueprint {
    table: SmolStr,
    columns: Vec<ColumnDef>,
    commands: Vec<Command>,
}

fn to_names(columns: &[&str]) -> Vec<SmolStr> {
    columns.iter().map(|c| SmolStr::from(*c)).collect()
}

impl Blueprint {
    #[must_use]
    pub fn new(table: &str) -> Self {
        Blueprint {
            table: SmolStr::from(table),
            columns: Vec::new(),
            commands: Vec::new(),
        }
    }

    #[must_use]
    pub fn table(&self) -> &str {
        self.table.as_str()
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Check if the blueprint creates its table.
    #[must_use]
    pub fn creating(&self) -> bool {
        self.commands.iter().any(|c| matches!(c, Command::Create))
    }

    pub fn create(&mut self) -> &mut Self {
        self.commands.push(Command::Create);
        self
    }

    pub fn drop(&mut self) -> &mut Self {
        self.commands.push(Command::Drop);
        self
    }

    pub fn column(&mut self, column: ColumnDef) -> &mut Self {
        self.columns.push(column);
        self
    }

    /// Integer `id` column. The grammar turns it into the
    /// autoincrement primary key of the table.
    pub fn id(&mut self) -> &mut Self {
        self.column(ColumnDef::new("id", ColumnType::BigInteger))
    }

    /// Nullable `created_at` and `updated_at` timestamps.
    pub fn timestamps(&mut self) -> &mut Self {
        self.column(ColumnDef::new("created_at", ColumnType::Timestamp).nullable())
            .column(ColumnDef::new("updated_at", ColumnType::Timestamp).nullable())
    }

    pub fn primary(&mut self, columns: &[&str]) -> &mut Self {
        self.commands.push(Command::Primary {
            columns: to_names(columns),
        });
        self
    }

    pub fn unique(&mut self, columns: &[&str], name: Option<&str>) -> &mut Self {
        let index = self.index_name("unique", columns, name);
        self.commands.push(Command::Unique {
            index,
            columns: to_names(columns),
        });
        self
    }

    pub fn index(&mut self, columns: &[&str], name: Option<&str>) -> &mut Self {
        let index = self.index_name("index", columns, name);
        self.commands.push(Command::Index {
            index,
            columns: to_names(columns),
        });
        self
    }

    pub fn foreign(
        &mut self,
        columns: &[&str],
        on: &str,
        references: &[&str],
        name: Option<&str>,
    ) -> &mut Self {
        let index = self.index_name("foreign", columns, name);
        self.commands.push(Command::Foreign {
            index,
            columns: to_names(columns),
            on: SmolStr::from(on),
            references: to_names(references),
        });
        self
    }

    pub fn drop_foreign(&mut self, name: &str) -> &mut Self {
        self.commands.push(Command::DropForeign {
            index: SmolStr::from(name),
        });
        self
    }

    /// Explicit name wins, otherwise the name is built as
    /// `<table>_<columns>_<kind>`.
    fn index_name(&self, kind: &str, columns: &[&str], name: Option<&str>) -> SmolStr {
        if let Some(name) = name {
            return SmolStr::from(name);
        }
        let index = format_smolstr!("{}_{}_{kind}", self.table, columns.join("_"));
        SmolStr::from(index.to_lowercase().replace(['-', '.'], "_"))
    }
}
