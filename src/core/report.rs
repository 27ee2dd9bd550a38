//! # Reports
//!
//! Read-only figures derived from the two collections. Nothing here is
//! cached; every view recomputes from current state.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::core::model::{InventoryItem, ItemStatus, RentalTransaction};

/// Number of rentals shown under "Recent Transactions".
pub const RECENT_LIMIT: usize = 5;

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_revenue: u64,
    pub active_rentals: usize,
    pub available_items: usize,
    pub total_items: usize,
    /// Percentage of units not `Available`, 0.0 to 100.0.
    pub utilization_rate: f64,
}

pub fn dashboard_stats(inventory: &[InventoryItem], rentals: &[RentalTransaction]) -> DashboardStats {
    DashboardStats {
        total_revenue: total_revenue(rentals),
        active_rentals: active_rental_count(rentals),
        available_items: available_item_count(inventory),
        total_items: inventory.len(),
        utilization_rate: utilization_rate(inventory),
    }
}

/// Sum of every rental's total, whatever its status.
pub fn total_revenue(rentals: &[RentalTransaction]) -> u64 {
    rentals
        .iter()
        .fold(0u64, |sum, rental| sum.saturating_add(rental.total_cost))
}

pub fn active_rental_count(rentals: &[RentalTransaction]) -> usize {
    rentals.iter().filter(|rental| rental.is_active()).count()
}

pub fn available_item_count(inventory: &[InventoryItem]) -> usize {
    inventory
        .iter()
        .filter(|item| item.status == ItemStatus::Available)
        .count()
}

/// `(total − available) / total × 100`. Maintenance units count as utilized.
/// An empty inventory is 0%.
pub fn utilization_rate(inventory: &[InventoryItem]) -> f64 {
    if inventory.is_empty() {
        return 0.0;
    }
    let total = inventory.len();
    let busy = total - available_item_count(inventory);
    busy as f64 / total as f64 * 100.0
}

/// One bar of the revenue chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub revenue: u64,
}

/// Revenue grouped by rental start date, oldest first.
pub fn revenue_by_date(rentals: &[RentalTransaction]) -> Vec<RevenuePoint> {
    let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for rental in rentals {
        let sum = by_date.entry(rental.start_date).or_default();
        *sum = sum.saturating_add(rental.total_cost);
    }
    by_date
        .into_iter()
        .map(|(date, revenue)| RevenuePoint { date, revenue })
        .collect()
}

/// A row of the ledger summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerLine {
    pub account: &'static str,
    pub debit: Option<u64>,
    pub credit: Option<u64>,
}

/// Two-line "general ledger" shown on the reports tab.
///
/// Display only: both sides are simply total revenue. This is not
/// double-entry bookkeeping and nothing else reads it.
pub fn ledger_summary(rentals: &[RentalTransaction]) -> [LedgerLine; 2] {
    let revenue = total_revenue(rentals);
    [
        LedgerLine {
            account: "Cash / Accounts Receivable",
            debit: Some(revenue),
            credit: None,
        },
        LedgerLine {
            account: "Rental Income",
            debit: None,
            credit: Some(revenue),
        },
    ]
}

/// The newest rentals (the collection is kept newest first).
pub fn recent_rentals(rentals: &[RentalTransaction]) -> &[RentalTransaction] {
    &rentals[..rentals.len().min(RECENT_LIMIT)]
}

/// Active rentals past their end date.
pub fn overdue_rentals(rentals: &[RentalTransaction], today: NaiveDate) -> Vec<&RentalTransaction> {
    rentals.iter().filter(|rental| rental.is_overdue(today)).collect()
}
