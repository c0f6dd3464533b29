use std::collections::BTreeMap;

use chrono::NaiveDate;
use getset::{CopyGetters, Getters};
use rust_decimal::Decimal;

use super::amount::round_cents;
use super::chart::{Account, AccountRole};
use super::daily::DailyAggregate;
use super::JournalError;
use crate::config::JournalConfig;

const ENTRY_DATE_FORMAT: &str = "%d%m%y";
const PIECE_DATE_FORMAT: &str = "%y%m%d";

/// Tax-exclusive breakdown of one day, credits side.
///
/// The tax lines are the collected amounts as-is. Sales and shipping are
/// derived from them, and whatever cents the divisions lose or gain end up in
/// `sales_standard`, so that the credits always add up to the day's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtSplit {
    pub tax_standard: Decimal,
    pub tax_reduced: Decimal,
    pub sales_standard: Decimal,
    pub sales_reduced: Decimal,
    pub shipping: Decimal,
}

impl HtSplit {
    /// Shipping is taken to be taxed at the standard rate only.
    ///
    /// Fails instead of panicking when an amount leaves the decimal range.
    pub fn compute(day: &DailyAggregate, standard_rate: Decimal, reduced_rate: Decimal) -> Result<HtSplit, JournalError> {
        let overflow = || JournalError::AmountOverflow { date: day.date() };
        let div = |amount: Decimal, rate: Decimal| amount.checked_div(rate).map(round_cents).ok_or_else(overflow);

        let shipping_divisor = Decimal::ONE.checked_add(standard_rate).ok_or_else(overflow)?;
        let shipping = div(day.shipping(), shipping_divisor)?;
        let shipping_tax = day.shipping().checked_sub(shipping).ok_or_else(overflow)?;

        let product_tax_standard = day
            .tax_standard()
            .checked_sub(shipping_tax)
            .ok_or_else(overflow)?
            .max(Decimal::ZERO);
        let mut sales_standard = if product_tax_standard > Decimal::ZERO {
            div(product_tax_standard, standard_rate)?
        } else {
            Decimal::ZERO
        };
        let sales_reduced = if day.tax_reduced() > Decimal::ZERO {
            div(day.tax_reduced(), reduced_rate)?
        } else {
            Decimal::ZERO
        };

        let credits = [day.tax_standard(), day.tax_reduced(), sales_standard, sales_reduced, shipping]
            .into_iter()
            .try_fold(Decimal::ZERO, |sum, amount| sum.checked_add(amount))
            .ok_or_else(overflow)?;
        let residue = day.total().checked_sub(credits).ok_or_else(overflow)?;
        if !residue.is_zero() {
            sales_standard = sales_standard.checked_add(residue).ok_or_else(overflow)?;
        }

        Ok(HtSplit {
            tax_standard: day.tax_standard(),
            tax_reduced: day.tax_reduced(),
            sales_standard,
            sales_reduced,
            shipping,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posting {
    Debit(Decimal),
    Credit(Decimal),
}

impl Posting {
    pub fn debit(&self) -> Option<Decimal> {
        match self {
            Posting::Debit(amount) => Some(*amount),
            Posting::Credit(_) => None,
        }
    }

    pub fn credit(&self) -> Option<Decimal> {
        match self {
            Posting::Debit(_) => None,
            Posting::Credit(amount) => Some(*amount),
        }
    }
}

/// One line of the journal. Due date and lettering are always blank and only
/// exist in the exported record.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct JournalEntry {
    #[getset(get_copy = "pub")]
    role: AccountRole,
    #[getset(get = "pub")]
    account: Account,
    #[getset(get = "pub")]
    journal_code: String,
    #[getset(get_copy = "pub")]
    date: NaiveDate,
    #[getset(get = "pub")]
    comment: String,
    #[getset(get_copy = "pub")]
    posting: Posting,
    #[getset(get = "pub")]
    piece_reference: String,
}

impl JournalEntry {
    pub fn new(role: AccountRole, posting: Posting, date: NaiveDate, config: &JournalConfig) -> JournalEntry {
        let account = config.accounts.account(role).clone();

        JournalEntry {
            role,
            comment: account.label.clone(),
            account,
            journal_code: config.journal_code.clone(),
            date,
            posting,
            piece_reference: piece_reference(&config.journal_code, date),
        }
    }

    /// Day-month-year, as `201025` for 2025-10-20.
    pub fn entry_date(&self) -> String {
        self.date.format(ENTRY_DATE_FORMAT).to_string()
    }

    pub fn debit(&self) -> Option<Decimal> {
        self.posting.debit()
    }

    pub fn credit(&self) -> Option<Decimal> {
        self.posting.credit()
    }
}

/// Journal code followed by the date as `yymmdd`, shared by all lines of a day.
pub fn piece_reference(journal_code: &str, date: NaiveDate) -> String {
    format!("{}{}", journal_code, date.format(PIECE_DATE_FORMAT))
}

/// Debit on clients for the day's total, then the non-zero credits.
pub fn generate_day(day: &DailyAggregate, config: &JournalConfig) -> Result<Vec<JournalEntry>, JournalError> {
    let split = HtSplit::compute(day, config.standard_rate, config.reduced_rate)?;

    let credits = [
        (AccountRole::StandardTax, split.tax_standard),
        (AccountRole::ReducedTax, split.tax_reduced),
        (AccountRole::ReducedSales, split.sales_reduced),
        (AccountRole::StandardSales, split.sales_standard),
        (AccountRole::Shipping, split.shipping),
    ];

    let mut entries = vec![JournalEntry::new(
        AccountRole::Clients,
        Posting::Debit(day.total()),
        day.date(),
        config,
    )];
    entries.extend(
        credits
            .into_iter()
            .filter(|(_, amount)| *amount > Decimal::ZERO)
            .map(|(role, amount)| JournalEntry::new(role, Posting::Credit(amount), day.date(), config)),
    );

    Ok(entries)
}

/// Days come out in ascending date order.
pub fn generate_entries(
    daily: &BTreeMap<NaiveDate, DailyAggregate>,
    config: &JournalConfig,
) -> Result<Vec<JournalEntry>, JournalError> {
    let mut entries = Vec::new();
    for day in daily.values() {
        entries.extend(generate_day(day, config)?);
    }

    Ok(entries)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PieceTotals {
    pub debit: Decimal,
    pub credit: Decimal,
}

impl PieceTotals {
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }
}

/// Debit and credit sums per piece reference. Sums saturate; a saturated
/// piece reads as unbalanced.
pub fn piece_totals(entries: &[JournalEntry]) -> BTreeMap<&str, PieceTotals> {
    let mut totals: BTreeMap<&str, PieceTotals> = BTreeMap::new();
    for entry in entries {
        let piece = totals.entry(entry.piece_reference().as_str()).or_default();
        match entry.posting() {
            Posting::Debit(amount) => piece.debit = piece.debit.saturating_add(amount),
            Posting::Credit(amount) => piece.credit = piece.credit.saturating_add(amount),
        }
    }

    totals
}
