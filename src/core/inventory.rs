//! # Inventory
//!
//! Adding, removing and searching devices. Status changes caused by rentals
//! live in [`crate::core::rental`]; nothing here touches rentals.

use crate::core::error::DeskError;
use crate::core::model::{InventoryItem, ItemId, ItemStatus};

/// A new-item form submission, already coerced from user text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewItem {
    pub model: String,
    pub serial_number: String,
    pub daily_rate: u64,
    pub purchase_value: u64,
    pub status: ItemStatus,
}

impl NewItem {
    /// Builds a submission from raw form text. Numeric fields that don't
    /// parse become zero rather than failing.
    pub fn from_input(
        model: &str,
        serial_number: &str,
        daily_rate: &str,
        purchase_value: &str,
        status: ItemStatus,
    ) -> Self {
        Self {
            model: model.trim().to_string(),
            serial_number: serial_number.trim().to_string(),
            daily_rate: parse_amount(daily_rate),
            purchase_value: parse_amount(purchase_value),
            status,
        }
    }

    pub fn validate(&self) -> Result<(), DeskError> {
        if self.model.trim().is_empty() {
            return Err(DeskError::MissingField("model name"));
        }
        if self.serial_number.trim().is_empty() {
            return Err(DeskError::MissingField("serial number"));
        }
        if self.status == ItemStatus::Rented {
            return Err(DeskError::InvalidEntryStatus(self.status));
        }
        Ok(())
    }
}

/// Coerces user text into a rupiah amount.
///
/// Commas, underscores and spaces are treated as digit grouping. A decimal
/// value is truncated to whole rupiah. Anything else, including negative
/// numbers, yields 0.
pub fn parse_amount(input: &str) -> u64 {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, ',' | '_') && !c.is_whitespace())
        .collect();
    if let Ok(value) = cleaned.parse::<u64>() {
        return value;
    }
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value <= u64::MAX as f64 => {
            value.trunc() as u64
        }
        _ => 0,
    }
}

/// Validates and appends a new item. Returns the id it was stored under.
pub fn add_item(inventory: &mut Vec<InventoryItem>, draft: NewItem) -> Result<ItemId, DeskError> {
    draft.validate()?;
    let id = ItemId::generate();
    inventory.push(InventoryItem {
        id: id.clone(),
        model: draft.model,
        serial_number: draft.serial_number,
        daily_rate: draft.daily_rate,
        purchase_value: draft.purchase_value,
        status: draft.status,
    });
    Ok(id)
}

/// Removes an item. Rentals that reference it are left as they are.
pub fn remove_item(inventory: &mut Vec<InventoryItem>, id: &ItemId) -> Option<InventoryItem> {
    let index = inventory.iter().position(|item| &item.id == id)?;
    Some(inventory.remove(index))
}

pub fn find_item<'a>(inventory: &'a [InventoryItem], id: &ItemId) -> Option<&'a InventoryItem> {
    inventory.iter().find(|item| &item.id == id)
}

/// Case-insensitive substring search over model name and serial number.
/// An empty query matches everything.
pub fn filter_items<'a>(inventory: &'a [InventoryItem], query: &str) -> Vec<&'a InventoryItem> {
    let needle = query.trim().to_lowercase();
    inventory
        .iter()
        .filter(|item| {
            needle.is_empty()
                || item.model.to_lowercase().contains(&needle)
                || item.serial_number.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_item;

    #[test]
    fn test_parse_amount_coerces_invalid_to_zero() {
        assert_eq!(parse_amount("150000"), 150000);
        assert_eq!(parse_amount(" 150,000 "), 150000);
        assert_eq!(parse_amount("1_000"), 1000);
        assert_eq!(parse_amount("99.9"), 99);
        assert_eq!(parse_amount(""), 0);
        assert_eq!(parse_amount("abc"), 0);
        assert_eq!(parse_amount("-500"), 0);
        assert_eq!(parse_amount("NaN"), 0);
    }

    #[test]
    fn test_add_item_appends_one_available_item() {
        let mut inventory = vec![sample_item("1", "iPhone 13", 150000)];
        let draft = NewItem::from_input("Pixel 8", "SN-GOO-005", "120000", "9000000", ItemStatus::default());

        let id = add_item(&mut inventory, draft).unwrap();

        assert_eq!(inventory.len(), 2);
        let added = inventory.last().unwrap();
        assert_eq!(added.id, id);
        assert_eq!(added.model, "Pixel 8");
        assert_eq!(added.daily_rate, 120000);
        assert_eq!(added.purchase_value, 9000000);
        assert_eq!(added.status, ItemStatus::Available);
    }

    #[test]
    fn test_add_item_rejects_rented_status() {
        let mut inventory = Vec::new();
        let draft = NewItem::from_input("Pixel 8", "SN-1", "1", "1", ItemStatus::Rented);

        let err = add_item(&mut inventory, draft).unwrap_err();

        assert_eq!(err, DeskError::InvalidEntryStatus(ItemStatus::Rented));
        assert_eq!(err.to_string(), "a new item cannot start as Rented");
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_add_item_keeps_explicit_status() {
        let mut inventory = Vec::new();
        let draft = NewItem::from_input("Pixel 8", "SN-1", "1", "1", ItemStatus::Maintenance);
        add_item(&mut inventory, draft).unwrap();
        assert_eq!(inventory[0].status, ItemStatus::Maintenance);
    }

    #[test]
    fn test_add_item_rejects_blank_model_or_serial() {
        let mut inventory = Vec::new();
        let no_model = NewItem::from_input("   ", "SN-1", "1", "", ItemStatus::default());
        assert_eq!(
            add_item(&mut inventory, no_model),
            Err(DeskError::MissingField("model name"))
        );
        let no_serial = NewItem::from_input("Pixel", "", "1", "", ItemStatus::default());
        assert_eq!(
            add_item(&mut inventory, no_serial),
            Err(DeskError::MissingField("serial number"))
        );
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_add_item_with_garbage_rate_stores_zero() {
        let mut inventory = Vec::new();
        let draft = NewItem::from_input("Pixel", "SN-1", "lots", "?", ItemStatus::default());
        add_item(&mut inventory, draft).unwrap();
        assert_eq!(inventory[0].daily_rate, 0);
        assert_eq!(inventory[0].purchase_value, 0);
    }

    #[test]
    fn test_remove_item() {
        let mut inventory = vec![
            sample_item("1", "iPhone 13", 150000),
            sample_item("2", "Samsung S22", 140000),
        ];
        let removed = remove_item(&mut inventory, &ItemId::from("1")).unwrap();
        assert_eq!(removed.model, "iPhone 13");
        assert_eq!(inventory.len(), 1);
        assert!(remove_item(&mut inventory, &ItemId::from("missing")).is_none());
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn test_filter_items_matches_model_or_serial_case_insensitive() {
        let mut pixel = sample_item("3", "Pixel 8", 100000);
        pixel.serial_number = "SN-GOO-APL".to_string();
        let inventory = vec![
            sample_item("1", "iPhone 13", 150000),
            sample_item("2", "Samsung S22", 140000),
            pixel,
        ];

        let by_model: Vec<_> = filter_items(&inventory, "IPHONE").iter().map(|i| i.id.as_str()).collect();
        assert_eq!(by_model, vec!["1"]);

        let by_serial: Vec<_> = filter_items(&inventory, "goo").iter().map(|i| i.id.as_str()).collect();
        assert_eq!(by_serial, vec!["3"]);

        assert_eq!(filter_items(&inventory, "").len(), 3);
        assert!(filter_items(&inventory, "nokia").is_empty());
    }
}
