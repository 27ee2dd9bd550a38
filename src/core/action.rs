//! # Actions
//!
//! Everything that can happen in RentDesk becomes an `Action`.
//! User submits the rental form? That's `Action::CreateRental(draft)`.
//! The agreement draft comes back? That's `Action::AgreementDrafted { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing any I/O the caller should
//! perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::core::inventory::{self, NewItem};
use crate::core::model::{InventoryItem, ItemId, RentalId, RentalTransaction};
use crate::core::rental::{self, NewRental};
use crate::core::state::{App, Tab};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectTab(Tab),
    NextTab,
    PrevTab,
    AddItem(NewItem),
    DeleteItem(ItemId),
    CreateRental(NewRental),
    /// `returned_on` is supplied by the caller so "today" is testable.
    ReturnRental {
        rental_id: RentalId,
        returned_on: NaiveDate,
    },
    AgreementDrafted {
        rental_id: RentalId,
        text: String,
    },
    RequestAnalysis,
    AnalysisReady(String),
    Quit,
}

/// Snapshot handed to the background agreement task.
#[derive(Debug, Clone, PartialEq)]
pub struct AgreementJob {
    pub rental: RentalTransaction,
    pub item: InventoryItem,
}

/// Snapshot handed to the background analysis task.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisJob {
    pub rentals: Vec<RentalTransaction>,
    pub inventory: Vec<InventoryItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// The action was refused; `status_message` says why.
    Rejected,
    DraftAgreement(AgreementJob),
    SummarizeFinancials(AnalysisJob),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::SelectTab(tab) => {
            app.active_tab = tab;
            Effect::None
        }
        Action::NextTab => {
            app.active_tab = app.active_tab.next();
            Effect::None
        }
        Action::PrevTab => {
            app.active_tab = app.active_tab.prev();
            Effect::None
        }
        Action::AddItem(draft) => {
            let model = draft.model.trim().to_string();
            match inventory::add_item(&mut app.inventory, draft) {
                Ok(id) => {
                    info!("Added item {} ({})", id, model);
                    app.status_message = format!("Added {model}");
                    Effect::None
                }
                Err(e) => reject(app, e),
            }
        }
        Action::DeleteItem(id) => {
            match inventory::remove_item(&mut app.inventory, &id) {
                Some(item) => {
                    info!("Deleted item {} ({})", item.id, item.model);
                    app.status_message = format!("Deleted {}", item.model);
                }
                None => debug!("Delete ignored: no item {}", id),
            }
            Effect::None
        }
        Action::CreateRental(draft) => {
            if app.is_drafting() {
                app.status_message = "Wait for the current agreement draft to finish".to_string();
                return Effect::Rejected;
            }
            match rental::open_rental(&mut app.inventory, &mut app.rentals, draft) {
                Ok(rental_id) => {
                    let rental = app.rentals.iter().find(|r| r.id == rental_id).cloned();
                    let item = rental
                        .as_ref()
                        .and_then(|r| inventory::find_item(&app.inventory, &r.item_id))
                        .cloned();
                    let (Some(rental), Some(item)) = (rental, item) else {
                        warn!("Rental {} created but could not be snapshotted", rental_id);
                        return Effect::None;
                    };
                    info!(
                        "Opened rental {} for {} on {}",
                        rental.id, rental.customer_name, item.model
                    );
                    app.status_message = format!("Rental created for {}. Drafting agreement...", rental.customer_name);
                    app.drafting.insert(rental_id);
                    Effect::DraftAgreement(AgreementJob { rental, item })
                }
                Err(e) => reject(app, e),
            }
        }
        Action::ReturnRental {
            rental_id,
            returned_on,
        } => match rental::close_rental(&mut app.inventory, &mut app.rentals, &rental_id, returned_on) {
            Ok(()) => {
                info!("Rental {} returned on {}", rental_id, returned_on);
                app.status_message = "Item returned".to_string();
                Effect::None
            }
            Err(e) => reject(app, e),
        },
        Action::AgreementDrafted { rental_id, text } => {
            app.drafting.remove(&rental_id);
            match app.rentals.iter_mut().find(|r| r.id == rental_id) {
                Some(rental) => {
                    rental.agreement_text = Some(text);
                    app.status_message = "Agreement ready".to_string();
                }
                None => warn!("Dropping agreement for unknown rental {}", rental_id),
            }
            Effect::None
        }
        Action::RequestAnalysis => {
            if app.is_analyzing {
                debug!("Analysis already in flight, ignoring request");
                return Effect::None;
            }
            app.is_analyzing = true;
            app.status_message = "Analyzing financials...".to_string();
            Effect::SummarizeFinancials(AnalysisJob {
                rentals: app.rentals.clone(),
                inventory: app.inventory.clone(),
            })
        }
        Action::AnalysisReady(text) => {
            app.is_analyzing = false;
            app.analysis = Some(text);
            app.status_message = "Analysis ready".to_string();
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn reject(app: &mut App, error: crate::core::error::DeskError) -> Effect {
    info!("Rejected: {}", error);
    app.status_message = error.to_string();
    Effect::Rejected
}
