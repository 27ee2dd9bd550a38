//! # Domain Model
//!
//! Inventory items, rental transactions, and the small value types they
//! share. Amounts are whole rupiah (`u64`); there is no fractional currency.
//!
//! ```text
//! InventoryItem ◄──── item_id ──── RentalTransaction
//!   status: Available | Rented | Maintenance
//!                                   status: Active → Completed
//! ```
//!
//! The `item_id` link is not a foreign key. History may point at an item
//! that has since been deleted; display code shows it as removed.

use std::fmt;

use chrono::NaiveDate;

/// Date format used for every date the user types or sees.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of an [`InventoryItem`].
    ItemId
);
string_id!(
    /// Identifier of a [`RentalTransaction`].
    RentalId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemStatus {
    #[default]
    Available,
    Rented,
    Maintenance,
}

impl ItemStatus {
    pub fn label(self) -> &'static str {
        match self {
            ItemStatus::Available => "Available",
            ItemStatus::Rented => "Rented",
            ItemStatus::Maintenance => "Maintenance",
        }
    }

    /// Cycles through the statuses a new item can be entered with (wraps
    /// around). `Rented` is never offered: only a rental sets it.
    pub fn next(self) -> ItemStatus {
        match self {
            ItemStatus::Available => ItemStatus::Maintenance,
            ItemStatus::Rented | ItemStatus::Maintenance => ItemStatus::Available,
        }
    }

    pub fn prev(self) -> ItemStatus {
        // Two entry statuses, so both directions toggle
        self.next()
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalStatus {
    Active,
    /// Terminal. There is no way back to `Active`.
    Completed,
}

impl RentalStatus {
    pub fn label(self) -> &'static str {
        match self {
            RentalStatus::Active => "Active",
            RentalStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A rentable device.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub id: ItemId,
    pub model: String,
    /// Expected to be unique; nothing enforces it.
    pub serial_number: String,
    pub daily_rate: u64,
    pub purchase_value: u64,
    pub status: ItemStatus,
}

/// A rental of one item to one customer.
///
/// `end_date` and `total_cost` are fixed when the rental is created and never
/// recalculated, even if the item's rate changes or it comes back late.
#[derive(Debug, Clone, PartialEq)]
pub struct RentalTransaction {
    pub id: RentalId,
    pub item_id: ItemId,
    pub customer_name: String,
    /// National ID number (NIK).
    pub customer_nik: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_cost: u64,
    pub status: RentalStatus,
    pub actual_return_date: Option<NaiveDate>,
    /// Filled in after creation, once the contract draft comes back.
    pub agreement_text: Option<String>,
}

impl RentalTransaction {
    pub fn is_active(&self) -> bool {
        self.status == RentalStatus::Active
    }

    /// Still out past its end date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_active() && self.end_date < today
    }
}

/// Formats an amount the way the shop prints prices: `Rp 1,250,000`.
pub fn format_rupiah(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("Rp {grouped}")
}

/// Parses a `YYYY-MM-DD` date typed by the user.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rupiah_groups_thousands() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(999), "Rp 999");
        assert_eq!(format_rupiah(1000), "Rp 1,000");
        assert_eq!(format_rupiah(150000), "Rp 150,000");
        assert_eq!(format_rupiah(12000000), "Rp 12,000,000");
    }

    #[test]
    fn test_parse_date_accepts_iso_only() {
        assert_eq!(
            parse_date(" 2023-10-25 "),
            NaiveDate::from_ymd_opt(2023, 10, 25)
        );
        assert_eq!(parse_date("25/10/2023"), None);
        assert_eq!(parse_date("2023-02-30"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_item_status_cycle() {
        assert_eq!(ItemStatus::Available.next(), ItemStatus::Maintenance);
        assert_eq!(ItemStatus::Maintenance.next(), ItemStatus::Available);
        assert_eq!(ItemStatus::Available.prev(), ItemStatus::Maintenance);
        assert_eq!(ItemStatus::Maintenance.prev(), ItemStatus::Available);
        assert_eq!(ItemStatus::Rented.next(), ItemStatus::Available);
        assert_eq!(ItemStatus::default(), ItemStatus::Available);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ItemId::generate(), ItemId::generate());
        assert_ne!(RentalId::generate(), RentalId::generate());
    }

    #[test]
    fn test_overdue_only_applies_to_active_rentals() {
        let day = |d| NaiveDate::from_ymd_opt(2023, 10, d).unwrap();
        let mut rental = RentalTransaction {
            id: RentalId::from("r1"),
            item_id: ItemId::from("1"),
            customer_name: "Ahmad".to_string(),
            customer_nik: "320101".to_string(),
            start_date: day(1),
            end_date: day(4),
            total_cost: 300000,
            status: RentalStatus::Active,
            actual_return_date: None,
            agreement_text: None,
        };
        assert!(!rental.is_overdue(day(4)));
        assert!(rental.is_overdue(day(5)));

        rental.status = RentalStatus::Completed;
        assert!(!rental.is_overdue(day(5)));
    }
}
