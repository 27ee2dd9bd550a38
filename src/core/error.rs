use std::fmt;

use crate::core::model::{ItemId, ItemStatus, RentalId};

/// Why the core refused an inventory or rental operation.
///
/// None of these are fatal. The reducer turns them into a status line and
/// leaves state untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum DeskError {
    /// A required form field was empty.
    MissingField(&'static str),
    /// New items can't be entered as `Rented`; only a rental sets it.
    InvalidEntryStatus(ItemStatus),
    /// Rental duration must be a whole number of days, at least one.
    InvalidDuration,
    ItemNotFound(ItemId),
    /// The item exists but is not `Available` right now.
    ItemUnavailable { item_id: ItemId, status: ItemStatus },
    RentalNotFound(RentalId),
    AlreadyCompleted(RentalId),
}

impl fmt::Display for DeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeskError::MissingField(field) => write!(f, "{field} is required"),
            DeskError::InvalidEntryStatus(status) => {
                write!(f, "a new item cannot start as {status}")
            }
            DeskError::InvalidDuration => write!(f, "duration must be at least one day"),
            DeskError::ItemNotFound(id) => write!(f, "item {id} not found"),
            DeskError::ItemUnavailable { item_id, status } => {
                write!(f, "item {item_id} is not available ({status})")
            }
            DeskError::RentalNotFound(id) => write!(f, "rental {id} not found"),
            DeskError::AlreadyCompleted(id) => write!(f, "rental {id} is already completed"),
        }
    }
}

impl std::error::Error for DeskError {}
