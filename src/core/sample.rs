//! Seed data for a fresh session: four phones and one open rental.

use crate::core::model::{
    InventoryItem, ItemId, ItemStatus, RentalId, RentalStatus, RentalTransaction, parse_date,
};

pub fn inventory() -> Vec<InventoryItem> {
    let item = |id: &str, model: &str, serial: &str, rate, value, status| InventoryItem {
        id: ItemId::from(id),
        model: model.to_string(),
        serial_number: serial.to_string(),
        daily_rate: rate,
        purchase_value: value,
        status,
    };
    vec![
        item("1", "iPhone 13", "SN-APL-001", 150_000, 12_000_000, ItemStatus::Available),
        item("2", "Samsung S22", "SN-SAM-002", 140_000, 11_000_000, ItemStatus::Rented),
        item("3", "Xiaomi 12", "SN-XIA-003", 100_000, 8_000_000, ItemStatus::Available),
        item("4", "iPhone 14 Pro", "SN-APL-004", 250_000, 18_000_000, ItemStatus::Maintenance),
    ]
}

/// The Samsung rental matching the `Rented` status above.
pub fn rentals() -> Vec<RentalTransaction> {
    let (Some(start_date), Some(end_date)) = (parse_date("2023-10-25"), parse_date("2023-10-28"))
    else {
        return Vec::new();
    };
    vec![RentalTransaction {
        id: RentalId::from("r1"),
        item_id: ItemId::from("2"),
        customer_name: "Ahmad Fulan".to_string(),
        customer_nik: "3201012345678".to_string(),
        start_date,
        end_date,
        total_cost: 420_000,
        status: RentalStatus::Active,
        actual_return_date: None,
        agreement_text: Some(
            "SURAT PERJANJIAN SEWA\n\nPihak pertama menyewakan Samsung S22 (SN-SAM-002) kepada \
             Ahmad Fulan untuk 3 hari..."
                .to_string(),
        ),
    }]
}
