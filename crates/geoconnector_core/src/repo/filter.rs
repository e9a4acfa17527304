//! Equality filters over per-entity allow-lists.
//!
//! # Responsibility
//! - Turn raw query pairs into typed filter clauses, rejecting malformed
//!   values.
//! - Render clauses as SQL predicates with bound parameters.
//!
//! # Invariants
//! - Only allow-listed field names are honoured; other pairs are ignored.
//! - Empty values are ignored; a repeated scalar field keeps its last value.
//! - A repeated many-to-many field matches records linked to any given id.

use crate::model::RecordId;
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// How a filter value is parsed and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Boolean,
    Text,
    /// Integer id of a referenced row.
    Reference,
    /// Text restricted to a fixed set of values.
    Choice(&'static [&'static str]),
    /// Membership in a join table keyed by the owner's id.
    ManyToMany {
        link_table: &'static str,
        owner_column: &'static str,
        target_column: &'static str,
    },
}

/// One allow-listed filter: public name, SQL column and value kind.
///
/// For `ManyToMany` filters `column` is the owner's id column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: FilterKind,
}

impl FilterField {
    pub const fn boolean(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            kind: FilterKind::Boolean,
        }
    }

    pub const fn text(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            kind: FilterKind::Text,
        }
    }

    pub const fn reference(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            kind: FilterKind::Reference,
        }
    }

    pub const fn choice(
        name: &'static str,
        column: &'static str,
        choices: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            column,
            kind: FilterKind::Choice(choices),
        }
    }

    pub const fn many_to_many(
        name: &'static str,
        owner_id_column: &'static str,
        link_table: &'static str,
        owner_column: &'static str,
        target_column: &'static str,
    ) -> Self {
        Self {
            name,
            column: owner_id_column,
            kind: FilterKind::ManyToMany {
                link_table,
                owner_column,
                target_column,
            },
        }
    }
}

/// Malformed filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for FilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                field,
                value,
                expected,
            } => write!(
                f,
                "invalid value `{value}` for filter `{field}`; expected {expected}"
            ),
        }
    }
}

impl Error for FilterError {}

#[derive(Debug, Clone, PartialEq)]
enum FilterValue {
    Boolean(bool),
    Text(String),
    Reference(RecordId),
    LinkedToAny {
        link_table: &'static str,
        owner_column: &'static str,
        target_column: &'static str,
        ids: Vec<RecordId>,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct FilterClause {
    column: &'static str,
    value: FilterValue,
}

/// Parsed, conjunctive set of filter clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    clauses: Vec<FilterClause>,
}

impl FilterSet {
    /// Filter set matching every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Parses query pairs against an allow-list.
    ///
    /// # Errors
    /// - Returns `FilterError::InvalidValue` when an allow-listed field carries
    ///   a value that does not parse as its kind.
    pub fn parse<K, V>(fields: &[FilterField], params: &[(K, V)]) -> Result<Self, FilterError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut clauses = Vec::new();

        for field in fields {
            let values: Vec<&str> = params
                .iter()
                .filter(|(key, _)| key.as_ref() == field.name)
                .map(|(_, value)| value.as_ref())
                .filter(|value| !value.is_empty())
                .collect();
            let Some(last) = values.last().copied() else {
                continue;
            };

            let value = match field.kind {
                FilterKind::Boolean => FilterValue::Boolean(parse_bool(field.name, last)?),
                FilterKind::Text => FilterValue::Text(last.to_string()),
                FilterKind::Reference => FilterValue::Reference(parse_id(field.name, last)?),
                FilterKind::Choice(choices) => {
                    if !choices.iter().any(|choice| *choice == last) {
                        return Err(FilterError::InvalidValue {
                            field: field.name,
                            value: last.to_string(),
                            expected: "one of the allowed choices",
                        });
                    }
                    FilterValue::Text(last.to_string())
                }
                FilterKind::ManyToMany {
                    link_table,
                    owner_column,
                    target_column,
                } => FilterValue::LinkedToAny {
                    link_table,
                    owner_column,
                    target_column,
                    ids: values
                        .iter()
                        .map(|value| parse_id(field.name, value))
                        .collect::<Result<Vec<_>, _>>()?,
                },
            };

            clauses.push(FilterClause {
                column: field.column,
                value,
            });
        }

        Ok(Self { clauses })
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Appends ` AND ...` predicates to `sql` and their parameters to `binds`.
    pub(crate) fn push_sql(&self, sql: &mut String, binds: &mut Vec<Value>) {
        for clause in &self.clauses {
            let column = clause.column;
            match &clause.value {
                FilterValue::LinkedToAny {
                    link_table,
                    owner_column,
                    target_column,
                    ids,
                } => {
                    let placeholders = vec!["?"; ids.len()].join(", ");
                    sql.push_str(&format!(
                        " AND EXISTS (
                            SELECT 1
                            FROM {link_table}
                            WHERE {link_table}.{owner_column} = {column}
                              AND {link_table}.{target_column} IN ({placeholders})
                        )"
                    ));
                    binds.extend(ids.iter().map(|id| Value::Integer(*id)));
                }
                FilterValue::Boolean(flag) => {
                    sql.push_str(&format!(" AND {column} = ?"));
                    binds.push(Value::Integer(i64::from(*flag)));
                }
                FilterValue::Text(text) => {
                    sql.push_str(&format!(" AND {column} = ?"));
                    binds.push(Value::Text(text.clone()));
                }
                FilterValue::Reference(id) => {
                    sql.push_str(&format!(" AND {column} = ?"));
                    binds.push(Value::Integer(*id));
                }
            }
        }
    }
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool, FilterError> {
    match value {
        "true" | "True" | "1" => Ok(true),
        "false" | "False" | "0" => Ok(false),
        other => Err(FilterError::InvalidValue {
            field,
            value: other.to_string(),
            expected: "a boolean",
        }),
    }
}

fn parse_id(field: &'static str, value: &str) -> Result<RecordId, FilterError> {
    value
        .trim()
        .parse::<RecordId>()
        .map_err(|_| FilterError::InvalidValue {
            field,
            value: value.to_string(),
            expected: "an integer id",
        })
}
