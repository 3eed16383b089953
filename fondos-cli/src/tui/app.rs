//! TUI view model: controller state plus what only the terminal needs
//! (form buffers, cursors, last sync time) and the key bindings.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyModifiers};
use fondos_core::{AppState, Effect, Event, FormError, Fund, Modal, TransactionKind};

use super::input::FormBuffer;

pub struct Ui {
    pub state: AppState,
    pub form: Option<FormBuffer>,
    pub catalog_cursor: usize,
    pub fund_cursor: usize,
    pub last_sync: Option<DateTime<Local>>,
    pub should_quit: bool,
}

impl Ui {
    pub fn new(session: Option<String>) -> Self {
        Self {
            state: AppState::new(session),
            form: None,
            catalog_cursor: 0,
            fund_cursor: 0,
            last_sync: None,
            should_quit: false,
        }
    }

    /// Feed one event to the controller and keep the view model in step.
    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        let before = self.state.modal().clone();
        let synced = match &event {
            Event::FundsLoaded { request, .. } | Event::TransactionsLoaded { request, .. } => {
                self.state.is_outstanding(*request)
            }
            _ => false,
        };

        let effects = self.state.apply(event);

        if synced {
            self.last_sync = Some(Local::now());
        }
        match self.state.modal() {
            Modal::None => self.form = None,
            m if *m != before => {
                self.form = Some(match m {
                    Modal::Subscribe(_) => FormBuffer::subscribe(),
                    _ => FormBuffer::transaction(self.state.session().unwrap_or_default()),
                });
            }
            _ => {}
        }
        self.clamp_cursors();
        effects
    }

    fn clamp_cursors(&mut self) {
        let funds = self.state.funds().len();
        self.catalog_cursor = self.catalog_cursor.min(funds.saturating_sub(1));
        let balances = self.state.balances().len();
        self.fund_cursor = self.fund_cursor.min(balances.saturating_sub(1));
    }

    pub fn selected_fund(&self) -> Option<&Fund> {
        self.state.funds().get(self.catalog_cursor)
    }

    /// Fund name under the cursor in the investment summary.
    pub fn selected_balance(&self) -> Option<String> {
        self.state
            .balances()
            .fund_names()
            .get(self.fund_cursor)
            .map(|s| s.to_string())
    }

    /// Translate a key press into a controller event, if it maps to one.
    pub fn on_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Option<Event> {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }
        if self.state.modal().is_open() {
            return self.on_modal_key(code);
        }

        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('r') => Some(Event::Refresh),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Left | KeyCode::Char('h') => {
                self.move_cursor(false);
                None
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Right | KeyCode::Char('l') => {
                self.move_cursor(true);
                None
            }
            KeyCode::Enter | KeyCode::Char('s') if self.state.is_catalog_visible() => {
                self.selected_fund().cloned().map(Event::OpenSubscribe)
            }
            KeyCode::Char('d') if self.state.is_dashboard_visible() => {
                self.selected_balance().map(|fund| Event::OpenTransaction {
                    fund,
                    kind: TransactionKind::Deposit,
                })
            }
            KeyCode::Char('w') if self.state.is_dashboard_visible() => {
                self.selected_balance().map(|fund| Event::OpenTransaction {
                    fund,
                    kind: TransactionKind::Cancellation,
                })
            }
            KeyCode::Char('o') if self.state.is_dashboard_visible() => Some(Event::Logout),
            _ => None,
        }
    }

    fn move_cursor(&mut self, forward: bool) {
        let (cursor, len) = if self.state.is_catalog_visible() {
            (&mut self.catalog_cursor, self.state.funds().len())
        } else {
            (&mut self.fund_cursor, self.state.balances().len())
        };
        if len == 0 {
            return;
        }
        *cursor = if forward {
            (*cursor + 1).min(len - 1)
        } else {
            cursor.saturating_sub(1)
        };
    }

    fn on_modal_key(&mut self, code: KeyCode) -> Option<Event> {
        let form = self.form.as_mut()?;
        match code {
            KeyCode::Esc => Some(Event::CloseModal),
            KeyCode::Tab | KeyCode::Down => {
                form.next_field();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.prev_field();
                None
            }
            KeyCode::Backspace => {
                form.backspace();
                None
            }
            KeyCode::Char(c) => {
                form.push(c);
                None
            }
            KeyCode::Enter => Some(self.submit()),
            _ => None,
        }
    }

    fn submit(&self) -> Event {
        let Some(form) = self.form.as_ref() else {
            return Event::CloseModal;
        };
        match self.state.modal() {
            Modal::Subscribe(fund) => match form.to_subscribe_form().validate(fund) {
                Ok(payload) => Event::SubmitSubscribe(payload),
                Err(e) => Event::FormInvalid(e),
            },
            Modal::Transaction { fund, kind } => {
                let Some(cedula) = self.state.session() else {
                    return Event::FormInvalid(FormError::Required("cedula"));
                };
                match form
                    .to_transaction_form()
                    .validate(cedula, fund, kind.clone())
                {
                    Ok(payload) => Event::SubmitTransaction(payload),
                    Err(e) => Event::FormInvalid(e),
                }
            }
            Modal::None => Event::CloseModal,
        }
    }
}
