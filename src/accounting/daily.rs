use std::collections::BTreeMap;

use chrono::NaiveDate;
use getset::CopyGetters;
use rust_decimal::Decimal;

use super::orders::{OrderBook, OrderRecord};
use super::JournalError;

/// Tax-inclusive sums of every dated order of one calendar day.
#[derive(Debug, Clone, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct DailyAggregate {
    date: NaiveDate,
    total: Decimal,
    shipping: Decimal,
    tax_standard: Decimal,
    tax_reduced: Decimal,
}

impl DailyAggregate {
    pub fn new(date: NaiveDate, total: Decimal, shipping: Decimal, tax_standard: Decimal, tax_reduced: Decimal) -> Self {
        DailyAggregate {
            date,
            total,
            shipping,
            tax_standard,
            tax_reduced,
        }
    }

    fn empty(date: NaiveDate) -> Self {
        DailyAggregate::new(date, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    }

    fn add(&mut self, order: &OrderRecord) -> Result<(), JournalError> {
        let date = self.date;
        let sum = |a: Decimal, b: Decimal| a.checked_add(b).ok_or(JournalError::AmountOverflow { date });

        self.total = sum(self.total, order.total())?;
        self.shipping = sum(self.shipping, order.shipping())?;
        self.tax_standard = sum(self.tax_standard, order.tax_standard())?;
        self.tax_reduced = sum(self.tax_reduced, order.tax_reduced())?;

        Ok(())
    }
}

/// Orders without a date are left out.
pub fn aggregate_by_date(book: &OrderBook) -> Result<BTreeMap<NaiveDate, DailyAggregate>, JournalError> {
    let mut daily = BTreeMap::new();
    for order in book.iter() {
        if let Some(date) = order.date() {
            daily
                .entry(date)
                .or_insert_with(|| DailyAggregate::empty(date))
                .add(order)?;
        }
    }

    Ok(daily)
}
