//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Key Routing
//!
//! 1. Ctrl+C quits from anywhere.
//! 2. An open confirm overlay takes every key.
//! 3. When no text input owns the keyboard: `1`-`4` and Tab switch views,
//!    `q` quits, `g` on Reports requests the financial summary.
//! 4. Everything else goes to the active view.
//!
//! ## Redraw Strategy
//!
//! - **Busy** (agreement draft or analysis in flight): draws every ~80ms so
//!   the spinner moves.
//! - **Idle**: sleeps up to 500ms, only redraws on events or when a
//!   background result arrives.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::Provider;
use crate::core::action::{Action, AgreementJob, AnalysisJob, Effect, update};
use crate::core::assistant;
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, Tab};
use crate::inference::{CompletionProvider, GeminiProvider, OpenRouterProvider, UnconfiguredProvider};
use crate::tui::components::{
    ConfirmEvent, ConfirmState, InventoryEvent, InventoryViewState, PendingAction, RentalsEvent,
    RentalsProps, RentalsViewState, item_label,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const BUSY_POLL: Duration = Duration::from_millis(80);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub inventory: InventoryViewState,
    pub rentals: RentalsViewState,
    // Confirm overlay (None = hidden)
    pub confirm: Option<ConfirmState>,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            inventory: InventoryViewState::new(),
            rentals: RentalsViewState::new(),
            confirm: None,
        }
    }

    /// True when the active view has a form, search box or viewer open.
    pub fn captures_text(&self, tab: Tab) -> bool {
        match tab {
            Tab::Inventory => self.inventory.captures_text(),
            Tab::Rentals => self.rentals.captures_text(),
            Tab::Dashboard | Tab::Reports => false,
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Terminals without the Kitty protocol ignore the enhancement flags
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock, // Non-blinking: redraws reset the blink timer
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Build a provider from a resolved config's provider and credentials.
///
/// A missing key is not fatal: the dashboard runs and every generation
/// falls back to its fixed message.
pub fn build_provider(config: &ResolvedConfig) -> Arc<dyn CompletionProvider> {
    let Some(api_key) = config.api_key().map(str::to_string) else {
        let (name, reason) = match config.provider {
            Provider::Gemini => ("gemini", "GEMINI_API_KEY (or API_KEY) is not set"),
            Provider::OpenRouter => ("openrouter", "OPENROUTER_API_KEY is not set"),
        };
        warn!("{reason}; generated text will use fallback messages");
        return Arc::new(UnconfiguredProvider::new(name, reason));
    };
    match config.provider {
        Provider::Gemini => Arc::new(GeminiProvider::new(
            api_key,
            Some(config.gemini_base_url.clone()),
            Some(config.request_timeout),
        )),
        Provider::OpenRouter => Arc::new(OpenRouterProvider::new(
            api_key,
            Some(config.openrouter_base_url.clone()),
            Some(config.request_timeout),
        )),
    }
}

/// Routes one terminal event and returns the effect the loop must run.
pub fn dispatch(app: &mut App, tui: &mut TuiState, event: &TuiEvent, today: NaiveDate) -> Effect {
    match event {
        TuiEvent::ForceQuit => return update(app, Action::Quit),
        TuiEvent::Resize => return Effect::None,
        _ => {}
    }

    if let Some(confirm) = tui.confirm.as_mut() {
        match confirm.handle_event(event) {
            Some(ConfirmEvent::Accept(pending)) => {
                tui.confirm = None;
                let action = match pending {
                    PendingAction::DeleteItem(id) => Action::DeleteItem(id),
                    PendingAction::ReturnRental(rental_id) => Action::ReturnRental {
                        rental_id,
                        returned_on: today,
                    },
                };
                return update(app, action);
            }
            Some(ConfirmEvent::Dismiss) => {
                tui.confirm = None;
                app.status_message = "Cancelled".to_string();
            }
            None => {}
        }
        return Effect::None;
    }

    if !tui.captures_text(app.active_tab)
        && let Some(action) = global_action(event, app.active_tab)
    {
        return update(app, action);
    }

    match app.active_tab {
        Tab::Inventory => dispatch_inventory(app, tui, event),
        Tab::Rentals => dispatch_rentals(app, tui, event, today),
        Tab::Dashboard | Tab::Reports => Effect::None,
    }
}

fn global_action(event: &TuiEvent, tab: Tab) -> Option<Action> {
    match event {
        TuiEvent::InputChar('q') => Some(Action::Quit),
        TuiEvent::InputChar(c @ '1'..='4') => c
            .to_digit(10)
            .and_then(|n| Tab::ALL.get(n as usize - 1))
            .map(|tab| Action::SelectTab(*tab)),
        TuiEvent::NextField => Some(Action::NextTab),
        TuiEvent::PrevField => Some(Action::PrevTab),
        TuiEvent::InputChar('g') if tab == Tab::Reports => Some(Action::RequestAnalysis),
        _ => None,
    }
}

fn dispatch_inventory(app: &mut App, tui: &mut TuiState, event: &TuiEvent) -> Effect {
    match tui.inventory.handle_event(event, &app.inventory) {
        Some(InventoryEvent::Add(draft)) => {
            let effect = update(app, Action::AddItem(draft));
            // A rejected form stays open so the user can fix it
            if effect != Effect::Rejected {
                tui.inventory.form = None;
            }
            effect
        }
        Some(InventoryEvent::RequestDelete(id)) => {
            let model = item_label(&app.inventory, &id);
            tui.confirm = Some(ConfirmState::new(
                "Delete item",
                format!("Delete {model}? Past rentals keep their records."),
                PendingAction::DeleteItem(id),
            ));
            Effect::None
        }
        None => Effect::None,
    }
}

fn dispatch_rentals(app: &mut App, tui: &mut TuiState, event: &TuiEvent, today: NaiveDate) -> Effect {
    let props = RentalsProps {
        rentals: &app.rentals,
        inventory: &app.inventory,
        drafting: &app.drafting,
        today,
    };
    match tui.rentals.handle_event(event, &props) {
        Some(RentalsEvent::Create(draft)) => {
            let effect = update(app, Action::CreateRental(draft));
            if effect != Effect::Rejected {
                tui.rentals.close_form();
            }
            effect
        }
        Some(RentalsEvent::Invalid(reason)) => {
            app.status_message = reason;
            Effect::Rejected
        }
        Some(RentalsEvent::RequestReturn(rental_id)) => {
            let customer = app
                .rentals
                .iter()
                .find(|r| r.id == rental_id)
                .map(|r| r.customer_name.clone())
                .unwrap_or_default();
            tui.confirm = Some(ConfirmState::new(
                "Return rental",
                format!("Mark the rental for {customer} as returned today?"),
                PendingAction::ReturnRental(rental_id),
            ));
            Effect::None
        }
        None => Effect::None,
    }
}

/// Runs an effect's I/O. Returns true when the app should exit.
fn execute_effect(app: &App, effect: Effect, tx: &mpsc::Sender<Action>) -> bool {
    match effect {
        Effect::Quit => return true,
        Effect::DraftAgreement(job) => spawn_agreement(app, job, tx.clone()),
        Effect::SummarizeFinancials(job) => spawn_analysis(app, job, tx.clone()),
        Effect::None | Effect::Rejected => {}
    }
    false
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let provider = build_provider(&config);
    let mut app = App::from_config(provider, &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let busy = app.is_busy();
        if busy {
            needs_redraw = true;
        }

        // Date can roll over while the app is open
        let today = chrono::Local::now().date_naive();

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 8.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, today, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if busy { BUSY_POLL } else { IDLE_POLL };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let effect = dispatch(&mut app, &mut tui, &event, today);
            if execute_effect(&app, effect, &tx) {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            break;
        }

        // Results from background generation
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if execute_effect(&app, effect, &tx) {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }
    }

    info!("RentDesk shutting down");
    ratatui::restore();
    Ok(())
}

fn spawn_agreement(app: &App, job: AgreementJob, tx: mpsc::Sender<Action>) {
    info!("Spawning agreement draft for rental {}", job.rental.id);
    let provider = app.provider.clone();
    let model = app.model_name.clone();
    let business = app.business_name.clone();

    tokio::spawn(async move {
        let text =
            assistant::draft_agreement(provider.as_ref(), &model, &business, &job.rental, &job.item).await;
        let rental_id = job.rental.id;
        if tx
            .send(Action::AgreementDrafted {
                rental_id: rental_id.clone(),
                text,
            })
            .is_err()
        {
            warn!("Failed to send agreement for rental {}: receiver dropped", rental_id);
        }
    });
}

fn spawn_analysis(app: &App, job: AnalysisJob, tx: mpsc::Sender<Action>) {
    info!(
        "Spawning financial analysis ({} rentals, {} items)",
        job.rentals.len(),
        job.inventory.len()
    );
    let provider = app.provider.clone();
    let model = app.model_name.clone();
    let business = app.business_name.clone();

    tokio::spawn(async move {
        let text =
            assistant::summarize_financials(provider.as_ref(), &model, &business, &job.rentals, &job.inventory)
                .await;
        if tx.send(Action::AnalysisReady(text)).is_err() {
            warn!("Failed to send financial analysis: receiver dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CliOverrides, RentDeskConfig, resolve_from};
    use crate::core::model::{ItemId, ItemStatus, RentalId, RentalStatus};
    use crate::test_support::{date, test_app};

    const TODAY: &str = "2023-10-27";

    fn send(app: &mut App, tui: &mut TuiState, events: &[TuiEvent]) -> Vec<Effect> {
        events
            .iter()
            .map(|event| dispatch(app, tui, event, date(TODAY)))
            .collect()
    }

    fn chars(s: &str) -> Vec<TuiEvent> {
        s.chars().map(TuiEvent::InputChar).collect()
    }

    #[test]
    fn test_digits_and_tab_switch_views() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        send(&mut app, &mut tui, &chars("3"));
        assert_eq!(app.active_tab, Tab::Rentals);
        send(&mut app, &mut tui, &[TuiEvent::NextField]);
        assert_eq!(app.active_tab, Tab::Reports);
        send(&mut app, &mut tui, &[TuiEvent::PrevField, TuiEvent::PrevField]);
        assert_eq!(app.active_tab, Tab::Inventory);
    }

    #[test]
    fn test_q_quits_but_not_while_typing() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        assert_eq!(send(&mut app, &mut tui, &chars("q")), vec![Effect::Quit]);

        send(&mut app, &mut tui, &chars("2a"));
        assert!(tui.inventory.form.is_some());
        assert_eq!(send(&mut app, &mut tui, &chars("q")), vec![Effect::None]);
        assert_eq!(
            send(&mut app, &mut tui, &[TuiEvent::ForceQuit]),
            vec![Effect::Quit]
        );
    }

    #[test]
    fn test_add_item_closes_form_only_on_success() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        send(&mut app, &mut tui, &chars("2a"));

        // Blank model is rejected and the form stays open
        let effects = send(&mut app, &mut tui, &[TuiEvent::Submit]);
        assert_eq!(effects, vec![Effect::Rejected]);
        assert_eq!(app.status_message, "model name is required");
        assert!(tui.inventory.form.is_some());

        let mut events = chars("Pixel 8");
        events.push(TuiEvent::NextField);
        events.extend(chars("SN-GOO-005"));
        events.push(TuiEvent::NextField);
        events.extend(chars("120000"));
        events.push(TuiEvent::Submit);
        send(&mut app, &mut tui, &events);

        assert!(tui.inventory.form.is_none());
        assert_eq!(app.inventory.len(), 1);
        assert_eq!(app.inventory[0].daily_rate, 120000);
    }

    #[test]
    fn test_added_item_cannot_be_left_rented() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let mut events = chars("2aPixel");
        events.push(TuiEvent::NextField);
        events.extend(chars("SN-1"));
        events.extend([TuiEvent::NextField, TuiEvent::NextField, TuiEvent::NextField]);
        events.extend([TuiEvent::CursorRight, TuiEvent::CursorRight, TuiEvent::Submit]);
        send(&mut app, &mut tui, &events);

        assert_eq!(app.inventory.len(), 1);
        assert_eq!(app.inventory[0].status, ItemStatus::Available);
        assert_eq!(app.available_items().len(), 1);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = test_app().with_sample_data();
        let mut tui = TuiState::new();
        send(&mut app, &mut tui, &chars("2d"));
        assert!(tui.confirm.is_some());
        assert_eq!(app.inventory.len(), 4);

        // Keys other than y/n are swallowed by the overlay
        send(&mut app, &mut tui, &chars("3"));
        assert_eq!(app.active_tab, Tab::Inventory);

        send(&mut app, &mut tui, &chars("n"));
        assert!(tui.confirm.is_none());
        assert_eq!(app.inventory.len(), 4);

        send(&mut app, &mut tui, &chars("dy"));
        assert_eq!(app.inventory.len(), 3);
        assert!(!app.inventory.iter().any(|item| item.id == ItemId::from("1")));
    }

    #[test]
    fn test_create_rental_spawns_agreement_draft() {
        let mut app = test_app().with_sample_data();
        let mut tui = TuiState::new();
        send(&mut app, &mut tui, &chars("3n"));

        let mut events = vec![TuiEvent::NextField];
        events.extend(chars("Budi"));
        events.push(TuiEvent::NextField);
        events.extend(chars("3201"));
        events.push(TuiEvent::Submit);
        let effects = send(&mut app, &mut tui, &events);

        let Some(Effect::DraftAgreement(job)) = effects.last() else {
            panic!("expected agreement job, got {effects:?}");
        };
        assert_eq!(job.item.id, ItemId::from("1"));
        assert_eq!(job.rental.start_date, date(TODAY));
        assert_eq!(job.rental.total_cost, 150000);
        assert!(tui.rentals.form.is_none());
        assert!(app.is_drafting());
        assert_eq!(app.rentals[0].customer_name, "Budi");
    }

    #[test]
    fn test_invalid_rental_form_reports_reason() {
        let mut app = test_app().with_sample_data();
        let mut tui = TuiState::new();
        send(&mut app, &mut tui, &chars("3n"));
        let mut events = vec![TuiEvent::PrevField, TuiEvent::Backspace];
        events.extend(chars("x"));
        events.push(TuiEvent::Submit);
        let effects = send(&mut app, &mut tui, &events);
        assert_eq!(effects.last(), Some(&Effect::Rejected));
        assert_eq!(app.status_message, "Duration must be a whole number of days");
        assert!(tui.rentals.form.is_some());
    }

    #[test]
    fn test_return_uses_today() {
        let mut app = test_app().with_sample_data();
        let mut tui = TuiState::new();
        send(&mut app, &mut tui, &chars("3ry"));

        let rental = &app.rentals[0];
        assert_eq!(rental.id, RentalId::from("r1"));
        assert_eq!(rental.status, RentalStatus::Completed);
        assert_eq!(rental.actual_return_date, Some(date(TODAY)));
        assert_eq!(app.inventory[1].status, ItemStatus::Available);
    }

    #[test]
    fn test_g_requests_analysis_on_reports_only() {
        let mut app = test_app().with_sample_data();
        let mut tui = TuiState::new();
        assert_eq!(send(&mut app, &mut tui, &chars("g")), vec![Effect::None]);
        assert!(!app.is_analyzing);

        let effects = send(&mut app, &mut tui, &chars("4g"));
        assert!(matches!(effects[1], Effect::SummarizeFinancials(_)));
        assert!(app.is_analyzing);

        // Second press while in flight is ignored
        assert_eq!(send(&mut app, &mut tui, &chars("g")), vec![Effect::None]);
    }

    #[test]
    fn test_missing_key_builds_unconfigured_provider() {
        let resolved = resolve_from(&RentDeskConfig::default(), &CliOverrides::default(), |_| None);
        let provider = build_provider(&resolved);
        assert_eq!(provider.name(), "gemini");

        let resolved = resolve_from(&RentDeskConfig::default(), &CliOverrides::default(), |name| match name {
            "RENTDESK_PROVIDER" => Some("openrouter".to_string()),
            "OPENROUTER_API_KEY" => Some("sk-or-test".to_string()),
            _ => None,
        });
        assert_eq!(resolved.api_key(), Some("sk-or-test"));
        assert_eq!(build_provider(&resolved).name(), "openrouter");
    }

    #[tokio::test]
    async fn test_unconfigured_provider_yields_fallback_agreement() {
        let resolved = resolve_from(&RentDeskConfig::default(), &CliOverrides::default(), |_| None);
        let app = App::from_config(build_provider(&resolved), &resolved);
        let (tx, rx) = mpsc::channel();
        let job = AgreementJob {
            rental: app.rentals[0].clone(),
            item: app.inventory[1].clone(),
        };
        spawn_agreement(&app, job, tx);

        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            action,
            Action::AgreementDrafted {
                rental_id: RentalId::from("r1"),
                text: assistant::AGREEMENT_ERROR.to_string(),
            }
        );
    }
}
