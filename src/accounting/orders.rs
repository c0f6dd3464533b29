use std::collections::HashMap;

use chrono::NaiveDate;
use getset::{CopyGetters, Getters};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::amount::{is_reduced_rate, parse_amount, parse_date};
use super::JournalError;
use crate::config::JournalConfig;

pub const ORDER_ID_COLUMN: &str = "Name";
pub const PAID_AT_COLUMN: &str = "Paid at";
pub const CREATED_AT_COLUMN: &str = "Created at";
pub const TOTAL_COLUMN: &str = "Total";
pub const SHIPPING_COLUMN: &str = "Shipping";
pub const TAX_COLUMNS: [(&str, &str); 2] = [("Tax 1 Name", "Tax 1 Value"), ("Tax 2 Name", "Tax 2 Value")];

/// Columns an export cannot do without. A blank cell is fine, an absent
/// column is not: it would silently zero every order.
pub const REQUIRED_COLUMNS: [&str; 3] = [ORDER_ID_COLUMN, TOTAL_COLUMN, SHIPPING_COLUMN];
/// At least one of these must be present.
pub const DATE_COLUMNS: [&str; 2] = [PAID_AT_COLUMN, CREATED_AT_COLUMN];

/// Fails on the first required column for which `has_column` is false.
pub fn check_columns<F: Fn(&str) -> bool>(has_column: F) -> Result<(), JournalError> {
    if let Some(column) = REQUIRED_COLUMNS.into_iter().find(|column| !has_column(*column)) {
        return Err(JournalError::MissingColumn {
            column: column.to_string(),
        });
    }

    if !DATE_COLUMNS.into_iter().any(|column| has_column(column)) {
        return Err(JournalError::MissingColumn {
            column: DATE_COLUMNS.join("` or `"),
        });
    }

    Ok(())
}

/// One row of an order export.
///
/// An order spans several rows (one per line item) but only its first row
/// carries the order-level totals. Every column is optional here; a missing
/// column reads the same as a blank cell.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderRow {
    #[serde(skip)]
    pub line: u64,
    #[serde(rename = "Name", default)]
    pub order_id: Option<String>,
    #[serde(rename = "Paid at", default)]
    pub paid_at: Option<String>,
    #[serde(rename = "Created at", default)]
    pub created_at: Option<String>,
    #[serde(rename = "Total", default)]
    pub total: Option<String>,
    #[serde(rename = "Shipping", default)]
    pub shipping: Option<String>,
    #[serde(rename = "Tax 1 Name", default)]
    pub tax_1_name: Option<String>,
    #[serde(rename = "Tax 1 Value", default)]
    pub tax_1_value: Option<String>,
    #[serde(rename = "Tax 2 Name", default)]
    pub tax_2_name: Option<String>,
    #[serde(rename = "Tax 2 Value", default)]
    pub tax_2_value: Option<String>,
}

impl OrderRow {
    pub fn from_map(line: u64, row: &HashMap<String, String>) -> OrderRow {
        let field = |column: &str| row.get(column).cloned();
        let [(tax_1_name, tax_1_value), (tax_2_name, tax_2_value)] = TAX_COLUMNS;

        OrderRow {
            line,
            order_id: field(ORDER_ID_COLUMN),
            paid_at: field(PAID_AT_COLUMN),
            created_at: field(CREATED_AT_COLUMN),
            total: field(TOTAL_COLUMN),
            shipping: field(SHIPPING_COLUMN),
            tax_1_name: field(tax_1_name),
            tax_1_value: field(tax_1_value),
            tax_2_name: field(tax_2_name),
            tax_2_value: field(tax_2_value),
        }
    }

    /// Trimmed order id, `None` when blank.
    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// "Paid at" when set, "Created at" otherwise.
    fn timestamp(&self) -> Option<&str> {
        non_blank(&self.paid_at).or_else(|| non_blank(&self.created_at))
    }

    fn taxes(&self) -> [(Option<&str>, &'static str, Option<&str>); 2] {
        [
            (self.tax_1_name.as_deref(), TAX_COLUMNS[0].1, self.tax_1_value.as_deref()),
            (self.tax_2_name.as_deref(), TAX_COLUMNS[1].1, self.tax_2_value.as_deref()),
        ]
    }

    fn amount(&self, column: &str, value: Option<&str>) -> Result<Decimal, JournalError> {
        let value = value.unwrap_or_default();
        parse_amount(value).map_err(|_| JournalError::InvalidAmount {
            line: self.line,
            field: column.to_string(),
            value: value.to_string(),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Builds rows from column -> value maps, numbering them from 1.
///
/// A column counts as present when at least one map carries it.
pub fn rows_from_maps(maps: &[HashMap<String, String>]) -> Result<Vec<OrderRow>, JournalError> {
    if !maps.is_empty() {
        check_columns(|column| maps.iter().any(|map| map.contains_key(column)))?;
    }

    Ok(maps
        .iter()
        .zip(1u64..)
        .map(|(map, line)| OrderRow::from_map(line, map))
        .collect())
}

#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct OrderRecord {
    #[getset(get = "pub")]
    order_id: String,
    #[getset(get_copy = "pub")]
    date: Option<NaiveDate>,
    #[getset(get_copy = "pub")]
    total: Decimal,
    #[getset(get_copy = "pub")]
    shipping: Decimal,
    #[getset(get_copy = "pub")]
    tax_standard: Decimal,
    #[getset(get_copy = "pub")]
    tax_reduced: Decimal,
}

impl OrderRecord {
    /// Reads the order-level fields of an order's first row.
    ///
    /// Reduced-rate taxes are recognized by name. Any other tax counts as
    /// standard-rate, but only when strictly positive.
    pub fn parse(row: &OrderRow, order_id: &str, config: &JournalConfig) -> Result<OrderRecord, JournalError> {
        let mut tax_standard = Decimal::ZERO;
        let mut tax_reduced = Decimal::ZERO;

        let overflow = || JournalError::OrderOverflow { line: row.line };
        for (name, value_column, value) in row.taxes() {
            let value = row.amount(value_column, value)?;
            if is_reduced_rate(name.unwrap_or_default(), &config.reduced_rate_markers) {
                tax_reduced = tax_reduced.checked_add(value).ok_or_else(overflow)?;
            } else if value > Decimal::ZERO {
                tax_standard = tax_standard.checked_add(value).ok_or_else(overflow)?;
            }
        }

        Ok(OrderRecord {
            order_id: order_id.to_string(),
            date: row.timestamp().and_then(parse_date),
            total: row.amount(TOTAL_COLUMN, row.total.as_deref())?,
            shipping: row.amount(SHIPPING_COLUMN, row.shipping.as_deref())?,
            tax_standard,
            tax_reduced,
        })
    }
}

/// Orders keyed by id, in order of first appearance.
#[derive(Debug, Default)]
pub struct OrderBook {
    index: HashMap<String, usize>,
    orders: Vec<OrderRecord>,
}

impl OrderBook {
    pub fn new() -> OrderBook {
        OrderBook {
            index: HashMap::new(),
            orders: Vec::new(),
        }
    }

    /// Rows with a blank id, or with an id already recorded, are line-item
    /// detail and are skipped without being parsed.
    pub fn record_row(&mut self, row: &OrderRow, config: &JournalConfig) -> Result<(), JournalError> {
        let Some(order_id) = row.order_id() else {
            return Ok(());
        };

        if self.index.contains_key(order_id) {
            return Ok(());
        }

        let record = OrderRecord::parse(row, order_id, config)?;
        self.index.insert(order_id.to_string(), self.orders.len());
        self.orders.push(record);

        Ok(())
    }

    pub fn get(&self, order_id: &str) -> Option<&OrderRecord> {
        self.index.get(order_id).map(|&i| &self.orders[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrderRecord> {
        self.orders.iter()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn undated_count(&self) -> usize {
        self.orders.iter().filter(|order| order.date().is_none()).count()
    }
}

pub fn extract_orders(rows: &[OrderRow], config: &JournalConfig) -> Result<OrderBook, JournalError> {
    let mut book = OrderBook::new();
    for row in rows {
        book.record_row(row, config)?;
    }

    Ok(book)
}
