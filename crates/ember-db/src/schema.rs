//! Schema introspection over the normal `execute` path.

use ember_core::errors::{EngineResult, QueryEngineError};
use ember_core::trace::traced;
use rusqlite::types::Value;
use tracing::warn;

use crate::classify::validate_identifier;
use crate::manager::{DatabaseManager, QueryOutput};

/// Column metadata from `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
    pub nullable: bool,
    pub is_primary_key: bool,
}

impl DatabaseManager {
    /// Names of all user tables, in lexicographic order.
    pub fn list_tables(&self) -> EngineResult<Vec<String>> {
        traced("list_tables", || {
            let output = self.execute(
                "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name",
                &[],
            )?;
            let QueryOutput::Rows { rows, .. } = output else {
                return Err(QueryEngineError::Internal {
                    message: "catalog query produced no row set".to_string(),
                });
            };
            Ok(rows
                .into_iter()
                .filter_map(|row| row.into_iter().next())
                .filter_map(|value| match value {
                    Value::Text(name) => Some(name),
                    _ => None,
                })
                .collect())
        })
    }

    /// Column metadata for `table`, failing on an invalid name or a
    /// lookup error.
    ///
    /// `PRAGMA table_info` takes no bind parameters, so the table name
    /// is embedded in the statement text — only after it passes
    /// `validate_identifier`.
    pub fn table_info_checked(&self, table: &str) -> EngineResult<Vec<ColumnInfo>> {
        if !validate_identifier(table) {
            return Err(QueryEngineError::InvalidIdentifier {
                name: table.to_string(),
            });
        }
        let output = self.execute(&format!("PRAGMA table_info({table})"), &[])?;
        let QueryOutput::Rows { rows, .. } = output else {
            return Err(QueryEngineError::Internal {
                message: "table_info produced no row set".to_string(),
            });
        };
        Ok(rows.iter().filter_map(|row| column_from_row(row)).collect())
    }

    /// Best-effort column metadata for display: any failure, including
    /// an invalid table name, yields an empty list. Callers that need a
    /// hard failure use [`table_info_checked`](Self::table_info_checked).
    pub fn table_info(&self, table: &str) -> Vec<ColumnInfo> {
        match self.table_info_checked(table) {
            Ok(columns) => columns,
            Err(e) => {
                warn!(table, error = %e, "table info unavailable");
                Vec::new()
            }
        }
    }
}

/// `PRAGMA table_info` row layout: (cid, name, type, notnull, dflt_value, pk).
/// `pk` is the 1-based ordinal within the primary key, 0 otherwise.
fn column_from_row(row: &[Value]) -> Option<ColumnInfo> {
    let name = match row.get(1)? {
        Value::Text(s) => s.clone(),
        _ => return None,
    };
    let declared_type = match row.get(2)? {
        Value::Text(s) => s.clone(),
        Value::Null => String::new(),
        _ => return None,
    };
    let notnull = match row.get(3)? {
        Value::Integer(i) => *i,
        _ => return None,
    };
    let pk = match row.get(5)? {
        Value::Integer(i) => *i,
        _ => return None,
    };
    Some(ColumnInfo {
        name,
        declared_type,
        nullable: notnull == 0,
        is_primary_key: pk > 0,
    })
}
