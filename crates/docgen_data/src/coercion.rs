//! Column coercion strategies for tabular sources.
//!
//! Delimited and spreadsheet sources hand over raw cell text; the strategy
//! decides what typed [`Value`]s the column becomes. The strategy is picked
//! once at startup and injected into the adapters.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Cell tokens the enhanced strategy treats as missing values.
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_TOKENS: &[&str] = &["True", "TRUE", "true"];
const FALSE_TOKENS: &[&str] = &["False", "FALSE", "false"];

/// Turns one column of raw cells into typed values.
///
/// `None` marks a cell missing from a short row.
pub trait ColumnCoercion: Send + Sync {
    fn name(&self) -> &'static str;

    fn coerce_column(&self, cells: &[Option<String>]) -> Vec<Value>;
}

/// Every present cell stays text.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicCoercion;

impl ColumnCoercion for BasicCoercion {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn coerce_column(&self, cells: &[Option<String>]) -> Vec<Value> {
        cells
            .iter()
            .map(|cell| match cell {
                Some(text) => Value::Text(text.clone()),
                None => Value::Null,
            })
            .collect()
    }
}

/// Infers integer, float and boolean columns; missing-value tokens become null.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnhancedCoercion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
}

impl EnhancedCoercion {
    fn infer(present: &[&str]) -> ColumnKind {
        if present.is_empty() {
            return ColumnKind::Text;
        }
        if present.iter().all(|c| parse_trimmed::<i64>(c).is_some()) {
            ColumnKind::Integer
        } else if present.iter().all(|c| parse_trimmed::<f64>(c).is_some()) {
            ColumnKind::Float
        } else if present.iter().all(|c| parse_bool(c).is_some()) {
            ColumnKind::Boolean
        } else {
            ColumnKind::Text
        }
    }
}

impl ColumnCoercion for EnhancedCoercion {
    fn name(&self) -> &'static str {
        "enhanced"
    }

    fn coerce_column(&self, cells: &[Option<String>]) -> Vec<Value> {
        let present: Vec<&str> = cells
            .iter()
            .filter_map(|c| c.as_deref())
            .filter(|c| !is_na(c))
            .collect();
        let kind = Self::infer(&present);

        cells
            .iter()
            .map(|cell| {
                let text = match cell.as_deref() {
                    Some(text) if !is_na(text) => text,
                    _ => return Value::Null,
                };
                match kind {
                    ColumnKind::Integer => parse_trimmed::<i64>(text).map(Value::Integer),
                    ColumnKind::Float => parse_trimmed::<f64>(text).map(Value::Float),
                    ColumnKind::Boolean => parse_bool(text).map(Value::Boolean),
                    ColumnKind::Text => None,
                }
                .unwrap_or_else(|| Value::Text(text.to_string()))
            })
            .collect()
    }
}

/// Which coercion strategy to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericMode {
    Basic,
    #[default]
    Enhanced,
}

impl NumericMode {
    pub fn strategy(self) -> Box<dyn ColumnCoercion> {
        match self {
            Self::Basic => Box::new(BasicCoercion),
            Self::Enhanced => Box::new(EnhancedCoercion),
        }
    }
}

impl FromStr for NumericMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "enhanced" => Ok(Self::Enhanced),
            other => Err(format!("unknown numeric mode '{other}' (expected basic or enhanced)")),
        }
    }
}

impl std::fmt::Display for NumericMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Enhanced => write!(f, "enhanced"),
        }
    }
}

fn is_na(cell: &str) -> bool {
    NA_TOKENS.contains(&cell)
}

fn parse_trimmed<T: FromStr>(cell: &str) -> Option<T> {
    cell.trim().parse().ok()
}

fn parse_bool(cell: &str) -> Option<bool> {
    let cell = cell.trim();
    if TRUE_TOKENS.contains(&cell) {
        Some(true)
    } else if FALSE_TOKENS.contains(&cell) {
        Some(false)
    } else {
        None
    }
}
