//! # Core Application Logic
//!
//! This module contains RentDesk's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No UI. Prompts only.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │ inference  │
//!           │  Adapter   │              │ providers  │
//!           │ (ratatui)  │              │  (HTTP)    │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`model`]: Items, rentals, ids and formatting helpers
//! - [`inventory`], [`rental`], [`report`]: the operations `update()` calls
//! - [`assistant`]: prompts and fallbacks for generated text
//! - [`config`]: layered settings

pub mod action;
pub mod assistant;
pub mod config;
pub mod error;
pub mod inventory;
pub mod model;
pub mod rental;
pub mod report;
pub mod sample;
pub mod state;
