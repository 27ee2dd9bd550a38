//! # Rental Workflow
//!
//! ```text
//!   open_rental()                close_rental()
//! ───────────────► Active ───────────────────────► Completed
//!   item: Available → Rented      item: Rented → Available
//! ```
//!
//! `Completed` is terminal; there is no cancel path. The availability check
//! and the status flip happen in the same call, on state owned by a single
//! reducer, so two rentals can never claim the same item.

use chrono::{Days, NaiveDate};

use crate::core::error::DeskError;
use crate::core::model::{InventoryItem, ItemId, ItemStatus, RentalId, RentalStatus, RentalTransaction};

/// A new-rental form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRental {
    pub item_id: ItemId,
    pub customer_name: String,
    pub customer_nik: String,
    pub start_date: NaiveDate,
    pub duration_days: u32,
}

/// The numbers fixed at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub end_date: NaiveDate,
    pub total_cost: u64,
}

/// Prices a rental: `rate × days`, no rounding or proration.
pub fn quote(daily_rate: u64, start_date: NaiveDate, duration_days: u32) -> Result<Quote, DeskError> {
    if duration_days == 0 {
        return Err(DeskError::InvalidDuration);
    }
    let end_date = start_date
        .checked_add_days(Days::new(u64::from(duration_days)))
        .ok_or(DeskError::InvalidDuration)?;
    Ok(Quote {
        end_date,
        total_cost: daily_rate.saturating_mul(u64::from(duration_days)),
    })
}

/// Parses a duration typed by the user. Only positive whole numbers count.
pub fn parse_duration(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().filter(|days| *days > 0)
}

/// Items that can be put into a new rental, in inventory order.
pub fn available_items(inventory: &[InventoryItem]) -> Vec<&InventoryItem> {
    inventory
        .iter()
        .filter(|item| item.status == ItemStatus::Available)
        .collect()
}

/// Creates a rental and marks its item rented.
///
/// The new transaction goes to the head of `rentals`. Its agreement text is
/// left empty; the caller fills it once the draft arrives.
pub fn open_rental(
    inventory: &mut [InventoryItem],
    rentals: &mut Vec<RentalTransaction>,
    draft: NewRental,
) -> Result<RentalId, DeskError> {
    if draft.customer_name.trim().is_empty() {
        return Err(DeskError::MissingField("customer name"));
    }
    if draft.customer_nik.trim().is_empty() {
        return Err(DeskError::MissingField("customer NIK"));
    }

    let item = inventory
        .iter_mut()
        .find(|item| item.id == draft.item_id)
        .ok_or_else(|| DeskError::ItemNotFound(draft.item_id.clone()))?;
    if item.status != ItemStatus::Available {
        return Err(DeskError::ItemUnavailable {
            item_id: item.id.clone(),
            status: item.status,
        });
    }

    let quote = quote(item.daily_rate, draft.start_date, draft.duration_days)?;
    item.status = ItemStatus::Rented;

    let id = RentalId::generate();
    rentals.insert(
        0,
        RentalTransaction {
            id: id.clone(),
            item_id: draft.item_id,
            customer_name: draft.customer_name.trim().to_string(),
            customer_nik: draft.customer_nik.trim().to_string(),
            start_date: draft.start_date,
            end_date: quote.end_date,
            total_cost: quote.total_cost,
            status: RentalStatus::Active,
            actual_return_date: None,
            agreement_text: None,
        },
    );
    Ok(id)
}

/// Marks a rental returned and frees its item.
///
/// If the item was deleted in the meantime the rental still completes.
pub fn close_rental(
    inventory: &mut [InventoryItem],
    rentals: &mut [RentalTransaction],
    rental_id: &RentalId,
    returned_on: NaiveDate,
) -> Result<(), DeskError> {
    let rental = rentals
        .iter_mut()
        .find(|rental| &rental.id == rental_id)
        .ok_or_else(|| DeskError::RentalNotFound(rental_id.clone()))?;
    if rental.status == RentalStatus::Completed {
        return Err(DeskError::AlreadyCompleted(rental_id.clone()));
    }

    rental.status = RentalStatus::Completed;
    rental.actual_return_date = Some(returned_on);

    match inventory.iter_mut().find(|item| item.id == rental.item_id) {
        Some(item) => item.status = ItemStatus::Available,
        None => log::warn!(
            "Rental {} returned but item {} no longer exists",
            rental.id,
            rental.item_id
        ),
    }
    Ok(())
}
