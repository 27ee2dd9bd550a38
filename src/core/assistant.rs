//! # Assistant
//!
//! The two things the dashboard asks a language model for: a rental
//! agreement draft and a short financial read-out. Both always return text.
//! A failure is logged and replaced with a fixed sentence, so callers never
//! handle provider errors.

use log::{info, warn};

use crate::core::model::{InventoryItem, RentalTransaction, format_date, format_rupiah};
use crate::core::report;
use crate::inference::{CompletionProvider, CompletionRequest};

/// Stored as the agreement when the provider call fails.
pub const AGREEMENT_ERROR: &str = "Error generating agreement. Please check API key.";
/// Stored as the agreement when the provider answers with nothing.
pub const AGREEMENT_EMPTY: &str = "Failed to generate agreement.";
pub const ANALYSIS_ERROR: &str = "Error analyzing financials.";
pub const ANALYSIS_EMPTY: &str = "Analysis unavailable.";

pub fn agreement_prompt(business: &str, rental: &RentalTransaction, item: &InventoryItem) -> String {
    format!(
        "You are the legal assistant of \"{business}\", a phone rental company.\n\
         Write a formal, short and clear rental agreement (Surat Perjanjian Sewa) in Bahasa Indonesia.\n\
         \n\
         Details:\n\
         - Company: {business}\n\
         - Customer: {customer} (NIK: {nik})\n\
         - Item: {model} (SN: {serial})\n\
         - Start date: {start}\n\
         - End date: {end}\n\
         - Daily rate: {rate}\n\
         - Total estimated cost: {total}\n\
         \n\
         Include clauses on responsibility for damage, fees for late return, and that the item \
         remains the property of {business}. Keep it professional and under 200 words.",
        customer = rental.customer_name,
        nik = rental.customer_nik,
        model = item.model,
        serial = item.serial_number,
        start = format_date(rental.start_date),
        end = format_date(rental.end_date),
        rate = format_rupiah(item.daily_rate),
        total = format_rupiah(rental.total_cost),
    )
}

pub fn financial_prompt(
    business: &str,
    rentals: &[RentalTransaction],
    inventory: &[InventoryItem],
) -> String {
    format!(
        "Act as a senior accountant reviewing \"{business}\", a phone rental company.\n\
         - Total revenue: {revenue}\n\
         - Units in inventory: {units}\n\
         - Active rentals: {active}\n\
         - Total transactions: {transactions}\n\
         \n\
         Give a three-sentence summary of the company's financial health, then one concrete \
         suggestion for improving it. Tone: professional, academic yet practical.",
        revenue = format_rupiah(report::total_revenue(rentals)),
        units = inventory.len(),
        active = report::active_rental_count(rentals),
        transactions = rentals.len(),
    )
}

/// Drafts the agreement for a freshly created rental.
pub async fn draft_agreement(
    provider: &dyn CompletionProvider,
    model: &str,
    business: &str,
    rental: &RentalTransaction,
    item: &InventoryItem,
) -> String {
    let prompt = agreement_prompt(business, rental, item);
    info!("Drafting agreement for rental {} via {}", rental.id, provider.name());
    generate(provider, model, &prompt, AGREEMENT_EMPTY, AGREEMENT_ERROR).await
}

/// Summarizes the shop's financial health from the full collections.
pub async fn summarize_financials(
    provider: &dyn CompletionProvider,
    model: &str,
    business: &str,
    rentals: &[RentalTransaction],
    inventory: &[InventoryItem],
) -> String {
    let prompt = financial_prompt(business, rentals, inventory);
    info!("Requesting financial summary via {}", provider.name());
    generate(provider, model, &prompt, ANALYSIS_EMPTY, ANALYSIS_ERROR).await
}

async fn generate(
    provider: &dyn CompletionProvider,
    model: &str,
    prompt: &str,
    if_empty: &str,
    if_failed: &str,
) -> String {
    match provider.complete(CompletionRequest { model, prompt }).await {
        Ok(text) if text.trim().is_empty() => {
            warn!("{} returned empty text", provider.name());
            if_empty.to_string()
        }
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!("{} generation failed: {}", provider.name(), e);
            if_failed.to_string()
        }
    }
}
