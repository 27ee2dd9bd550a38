//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::core::model::{
    InventoryItem, ItemId, ItemStatus, RentalId, RentalStatus, RentalTransaction, parse_date,
};
use crate::core::rental;
use crate::core::state::App;
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

/// Answers every request with the same text and remembers what it was asked.
pub struct RecordingProvider {
    reply: String,
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingProvider {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(model, prompt)` pairs, oldest first.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for RecordingProvider {
    fn name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((request.model.to_string(), request.prompt.to_string()));
        }
        Ok(self.reply.clone())
    }
}

/// Fails every request like an unreachable API.
pub struct FailingProvider;

#[async_trait]
impl CompletionProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        Err(ProviderError::Network("connection refused".to_string()))
    }
}

/// Creates an empty test App backed by a RecordingProvider.
pub fn test_app() -> App {
    App::new(Arc::new(RecordingProvider::new("stub text")), "test-model".to_string())
}

pub fn date(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

/// An Available item with serial `SN-{id}` and a purchase value of 10× the rate.
pub fn sample_item(id: &str, model: &str, daily_rate: u64) -> InventoryItem {
    InventoryItem {
        id: ItemId::from(id),
        model: model.to_string(),
        serial_number: format!("SN-{id}"),
        daily_rate,
        purchase_value: daily_rate * 10,
        status: ItemStatus::Available,
    }
}

/// An Active three-day rental starting on `start`.
pub fn sample_rental(id: &str, item_id: &str, start: &str, total_cost: u64) -> RentalTransaction {
    let start_date = date(start);
    RentalTransaction {
        id: RentalId::from(id),
        item_id: ItemId::from(item_id),
        customer_name: "Ahmad Fulan".to_string(),
        customer_nik: "3201012345678".to_string(),
        start_date,
        end_date: rental::quote(0, start_date, 3).unwrap().end_date,
        total_cost,
        status: RentalStatus::Active,
        actual_return_date: None,
        agreement_text: None,
    }
}
