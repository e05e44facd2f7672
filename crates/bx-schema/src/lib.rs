#![forbid(unsafe_code)]

//! Render LLM-generated database schema JSON as Postgres DDL.
//!
//! The schema-generation flow asks the model for a JSON table list; this
//! crate decodes it and emits `CREATE TABLE` text. Like the blueprint
//! renderer, decode failures are a real error because the input is
//! claimed-JSON; within a decoded schema the rendering stays best-effort
//! (an unreadable foreign-key reference is dropped, not fatal).

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Schema decoding failure.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A database schema: the table list the model returned.
///
/// Accepts both the bare `[{...}]` array form and the
/// `{"schema": [{...}]}` envelope the prompt template asks for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Schema {
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Table {
    pub table_name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_unique: bool,
    /// Foreign-key target in `table(column)` form.
    #[serde(default, alias = "foreign_key_to", skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaJson {
    Tables(Vec<Table>),
    Envelope { schema: Vec<Table> },
}

impl Schema {
    /// Decode a schema from the JSON the LLM returned.
    pub fn from_json(input: &str) -> Result<Self, SchemaError> {
        let decoded: SchemaJson = serde_json::from_str(input)?;
        let tables = match decoded {
            SchemaJson::Tables(tables) | SchemaJson::Envelope { schema: tables } => tables,
        };
        Ok(Self { tables })
    }

    /// Render the schema as Postgres `CREATE TABLE` statements.
    ///
    /// Column lines carry `PRIMARY KEY`/`UNIQUE` inline; foreign keys are
    /// collected into named `CONSTRAINT fk_<table>_<column>` clauses at the
    /// end of each table.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut out = String::from("/**\n * Auto-generated SQL schema\n */\n\n");

        for table in &self.tables {
            let mut column_lines = Vec::new();
            let mut constraint_lines = Vec::new();

            for column in &table.columns {
                let mut line = format!("  \"{}\" {}", column.name, map_type(&column.data_type));
                if column.is_primary_key {
                    line.push_str(" PRIMARY KEY");
                }
                if column.is_unique {
                    line.push_str(" UNIQUE");
                }
                column_lines.push(line);

                if let Some(refspec) = &column.references {
                    if let Some((target_table, target_column)) = fk_target(refspec) {
                        constraint_lines.push(format!(
                            "  CONSTRAINT fk_{}_{} FOREIGN KEY (\"{}\") REFERENCES \"{}\" (\"{}\")",
                            table.table_name, column.name, column.name, target_table, target_column
                        ));
                    }
                }
            }

            let _ = writeln!(out, "CREATE TABLE \"{}\" (", table.table_name);
            out.push_str(&column_lines.join(",\n"));
            if !constraint_lines.is_empty() {
                out.push_str(",\n");
                out.push_str(&constraint_lines.join(",\n"));
            }
            out.push_str("\n);\n\n");
        }

        out.trim().to_string()
    }
}

/// Map the model's loose type names onto Postgres types; `VARCHAR(..)` is
/// kept as written and anything unrecognized falls back to `TEXT`.
fn map_type(data_type: &str) -> String {
    let upper = data_type.trim().to_uppercase();
    match upper.as_str() {
        "UUID" | "TEXT" | "INTEGER" | "BOOLEAN" | "JSONB" | "NUMERIC" => upper,
        "TIMESTAMPZ" => "TIMESTAMP WITH TIME ZONE".to_string(),
        _ if upper.starts_with("VARCHAR") => upper,
        _ => "TEXT".to_string(),
    }
}

/// Parse a `table(column)` reference; both parts must be bare identifiers.
fn fk_target(refspec: &str) -> Option<(&str, &str)> {
    let (table, rest) = refspec.split_once('(')?;
    let column = &rest[..rest.find(')')?];
    if is_identifier(table) && is_identifier(column) {
        Some((table, column))
    } else {
        None
    }
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
