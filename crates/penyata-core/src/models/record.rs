//! Finance record models matching the persistence contract.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A normalized monthly finance record for one branch.
///
/// The serialized form keeps the legacy field names expected by the
/// persistence layer: `wang_masuk` (income), `wang_keluar` (expense)
/// and `baki` (closing balance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceRecord {
    /// Generated statement title.
    pub title: String,

    /// Statement month (1-12).
    pub month: u32,

    /// Statement year.
    pub year: i32,

    /// Total income for the period.
    #[serde(rename = "wang_masuk")]
    pub income_total: Decimal,

    /// Total expenses for the period.
    #[serde(rename = "wang_keluar")]
    pub expense_total: Decimal,

    /// Closing balance, extracted from the statement or computed as
    /// income minus expense. May be negative.
    #[serde(rename = "baki")]
    pub closing_balance: Decimal,

    /// Itemized transactions and the statement summary.
    pub details: RecordDetails,
}

/// Itemized detail section of a finance record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordDetails {
    /// Income line items in order of appearance.
    pub income_items: Vec<LineItem>,

    /// Expense line items in order of appearance.
    pub expense_items: Vec<LineItem>,

    /// Statement summary with all balances populated.
    pub summary: FinancialSummary,
}

/// A single dated transaction within a statement section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Transaction date as printed on the statement (dd.mm.yyyy).
    pub date: String,

    /// Transaction description, trimmed.
    pub description: String,

    /// Transaction amount (non-negative magnitude).
    pub amount: Decimal,
}

impl LineItem {
    /// Parse the printed date as a calendar date.
    ///
    /// Items keep whatever the statement printed; this is only used to
    /// flag impossible dates in extraction warnings.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let mut parts = self.date.split('.');
        let day: u32 = parts.next()?.parse().ok()?;
        let month: u32 = parts.next()?.parse().ok()?;
        let year: i32 = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// Statement summary totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Total income for the period.
    pub income_total: Decimal,

    /// Total expenses for the period.
    pub expense_total: Decimal,

    /// Cash on hand (WANG TUNAI DI TANGAN), 0 when not stated.
    pub cash_on_hand: Decimal,

    /// Bank balance (WANG DI DALAM BANK), 0 when not stated.
    pub bank_balance: Decimal,

    /// Closing balance, extracted or computed.
    pub closing_balance: Decimal,
}

impl FinanceRecord {
    /// Validate the record and return any issues found.
    ///
    /// Issues are advisory; a record with issues is still a valid
    /// pipeline output.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(1..=12).contains(&self.month) {
            issues.push(format!("Month {} is out of range", self.month));
        }

        if !(2000..=2100).contains(&self.year) {
            issues.push(format!("Year {} is out of range", self.year));
        }

        let item_income: Decimal = self.details.income_items.iter().map(|i| i.amount).sum();
        let item_expense: Decimal = self.details.expense_items.iter().map(|i| i.amount).sum();

        if !self.details.income_items.is_empty()
            && (item_income - self.income_total).abs() > Decimal::new(1, 2)
        {
            issues.push(format!(
                "Income line items ({}) differ from income total ({})",
                item_income, self.income_total
            ));
        }

        if !self.details.expense_items.is_empty()
            && (item_expense - self.expense_total).abs() > Decimal::new(1, 2)
        {
            issues.push(format!(
                "Expense line items ({}) differ from expense total ({})",
                item_expense, self.expense_total
            ));
        }

        issues
    }
}
