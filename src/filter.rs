//! Textual filter expressions such as `Score>=30` or `Name~ar`

use crate::error::{Result, TabsyncError};
use crate::schema::{cell_filter, CellFilter, ColumnKind, ColumnSchema};
use crate::table::Table;
use crate::value::CellValue;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Substring match on the raw value's text
    Contains,
}

impl FilterOp {
    fn symbol(self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "!=",
            FilterOp::Lt => "<",
            FilterOp::Le => "<=",
            FilterOp::Gt => ">",
            FilterOp::Ge => ">=",
            FilterOp::Contains => "~",
        }
    }

    fn holds(self, order: Option<Ordering>) -> bool {
        let Some(order) = order else {
            return false;
        };
        match self {
            FilterOp::Eq => order == Ordering::Equal,
            FilterOp::Ne => order != Ordering::Equal,
            FilterOp::Lt => order == Ordering::Less,
            FilterOp::Le => order != Ordering::Greater,
            FilterOp::Gt => order == Ordering::Greater,
            FilterOp::Ge => order != Ordering::Less,
            FilterOp::Contains => false,
        }
    }
}

/// `<column><op><operand>`, e.g. `Score>=30`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpr {
    pub column: String,
    pub op: FilterOp,
    pub operand: String,
}

// Two-character operators first so `<=` is not read as `<`.
const OPERATORS: [(&str, FilterOp); 7] = [
    ("!=", FilterOp::Ne),
    ("<=", FilterOp::Le),
    (">=", FilterOp::Ge),
    ("<", FilterOp::Lt),
    (">", FilterOp::Gt),
    ("=", FilterOp::Eq),
    ("~", FilterOp::Contains),
];

impl FilterExpr {
    pub fn parse(text: &str) -> Result<Self> {
        let start = text
            .find(['=', '!', '<', '>', '~'])
            .ok_or_else(|| TabsyncError::invalid_filter(format!("no operator in '{}'", text)))?;
        let (column, rest) = text.split_at(start);

        let (op, operand) = OPERATORS
            .iter()
            .find_map(|(symbol, op)| rest.strip_prefix(*symbol).map(|operand| (*op, operand)))
            .ok_or_else(|| TabsyncError::invalid_filter(format!("bad operator in '{}'", text)))?;

        let column = column.trim();
        if column.is_empty() {
            return Err(TabsyncError::invalid_filter(format!("missing column in '{}'", text)));
        }

        Ok(Self {
            column: column.to_string(),
            op,
            operand: operand.trim().to_string(),
        })
    }

    /// Index of the column this expression names
    pub fn column_index<E>(&self, columns: &[ColumnSchema<E>]) -> Result<usize> {
        columns
            .iter()
            .position(|c| c.name == self.column)
            .ok_or_else(|| TabsyncError::unknown_column(&self.column))
    }

    /// Resolve the column in `table` and install the predicate on it.
    ///
    /// A filter already on that column is kept: both must hold, so
    /// `Score>=10` then `Score<=20` keeps the range between them.
    pub fn apply<E>(&self, table: &mut Table<E>) -> Result<usize> {
        let col = self.column_index(table.columns())?;
        let next = self.to_filter(table.column_schema(col).kind)?;
        let filter = match table.column_schema(col).filter.clone() {
            Some(prev) => cell_filter(move |value| prev(value) && next(value)),
            None => next,
        };
        table.set_filter(col, filter);
        Ok(col)
    }

    /// Build a predicate for a column of `kind`.
    ///
    /// Numeric kinds compare numerically and need a numeric operand; string
    /// kinds compare lexicographically. `~` always matches on text.
    pub fn to_filter(&self, kind: ColumnKind) -> Result<CellFilter> {
        let op = self.op;
        let operand = self.operand.clone();

        if op == FilterOp::Contains {
            return Ok(cell_filter(move |value| value.to_string().contains(&operand)));
        }

        if !kind.is_numeric() {
            return Ok(cell_filter(move |value| {
                op.holds(Some(value.to_string().as_str().cmp(operand.as_str())))
            }));
        }

        if let Ok(target) = operand.parse::<i128>() {
            return Ok(cell_filter(move |value| match integer_of(value) {
                Some(v) => op.holds(Some(v.cmp(&target))),
                None => op.holds(value.as_number().and_then(|v| v.partial_cmp(&(target as f64)))),
            }));
        }

        let target: f64 = operand.parse().map_err(|_| {
            TabsyncError::invalid_filter(format!(
                "'{}' is not a number for {} column '{}'",
                operand, kind, self.column
            ))
        })?;
        Ok(cell_filter(move |value| {
            op.holds(value.as_number().and_then(|v| v.partial_cmp(&target)))
        }))
    }
}

fn integer_of(value: &CellValue) -> Option<i128> {
    match value {
        CellValue::Int32(v) => Some(*v as i128),
        CellValue::Int64(v) => Some(*v as i128),
        CellValue::UInt32(v) => Some(*v as i128),
        CellValue::UInt64(v) => Some(*v as i128),
        _ => None,
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.column, self.op.symbol(), self.operand)
    }
}
