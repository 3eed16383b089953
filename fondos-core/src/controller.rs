//! View controller for the fund client.
//!
//! All UI state lives in [`AppState`] and changes only through
//! [`AppState::apply`]. `apply` never performs I/O: it returns the
//! [`Effect`]s the caller must run (HTTP calls, session writes), and the
//! caller feeds the outcome back in as another [`Event`].
//!
//! Every HTTP effect carries a [`RequestId`]. A completion whose id is not the
//! one currently outstanding for its slot is stale and gets dropped, so a
//! slow response can never overwrite state from a later transition.

use tracing::{debug, info, warn};

use crate::balance::{BalanceSummary, aggregate};
use crate::forms::FormError;
use crate::fund::Fund;
use crate::requests::{SubscriptionRequest, TransactionRequest};
use crate::transaction::{Transaction, TransactionKind};

pub const SUBSCRIBED_MESSAGE: &str = "Subscription successful. Showing your transactions.";
pub const TRANSACTION_MESSAGE: &str = "Transaction completed successfully.";
pub const LOGGED_OUT_MESSAGE: &str = "You have logged out.";

/// Monotonic id attached to each issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Modal {
    #[default]
    None,
    /// Subscribe form scoped to one fund.
    Subscribe(Fund),
    /// Deposit/withdraw form scoped to a fund name and kind.
    Transaction { fund: String, kind: TransactionKind },
}

impl Modal {
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::None)
    }
}

/// Loading flag plus the single error/success line shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Process start; triggers the initial fetch for the visible panel.
    Started,
    /// Refetch whatever the visible panels show.
    Refresh,
    OpenSubscribe(Fund),
    SubmitSubscribe(SubscriptionRequest),
    OpenTransaction { fund: String, kind: TransactionKind },
    SubmitTransaction(TransactionRequest),
    CloseModal,
    Logout,

    /// Client-side validation blocked a submission.
    FormInvalid(FormError),
    /// A session write failed. `user` is what the store still holds; the
    /// in-memory session and panels are brought back in line with it.
    SessionWriteFailed { user: Option<String>, message: String },

    FundsLoaded { request: RequestId, funds: Vec<Fund> },
    TransactionsLoaded { request: RequestId, transactions: Vec<Transaction> },
    SubscribeSucceeded { request: RequestId, cedula: String },
    TransactionSucceeded { request: RequestId },
    RequestFailed { request: RequestId, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchFunds { request: RequestId },
    FetchTransactions { request: RequestId, user: String },
    Subscribe { request: RequestId, payload: SubscriptionRequest },
    CreateTransaction { request: RequestId, payload: TransactionRequest },
    PersistSession(String),
    ClearSession,
}

impl Effect {
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            Effect::FetchFunds { request }
            | Effect::FetchTransactions { request, .. }
            | Effect::Subscribe { request, .. }
            | Effect::CreateTransaction { request, .. } => Some(*request),
            Effect::PersistSession(_) | Effect::ClearSession => None,
        }
    }
}

/// Outstanding request per slot. `None` means idle.
#[derive(Debug, Clone, Default)]
struct InFlight {
    funds: Option<RequestId>,
    transactions: Option<RequestId>,
    submit: Option<RequestId>,
}

impl InFlight {
    fn any(&self) -> bool {
        self.funds.is_some() || self.transactions.is_some() || self.submit.is_some()
    }

    /// Release whichever slot holds `id`; false if none does (stale).
    fn settle(&mut self, id: RequestId) -> bool {
        for slot in [&mut self.funds, &mut self.transactions, &mut self.submit] {
            if *slot == Some(id) {
                *slot = None;
                return true;
            }
        }
        false
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    show_catalog: bool,
    show_dashboard: bool,
    modal: Modal,
    session: Option<String>,

    funds: Vec<Fund>,
    transactions: Vec<Transaction>,
    balances: BalanceSummary,

    status: Status,
    in_flight: InFlight,
    next_request: u64,
}

impl AppState {
    /// Initial state: catalog when logged out, dashboard when a session exists.
    pub fn new(session: Option<String>) -> Self {
        let logged_in = session.is_some();
        Self {
            show_catalog: !logged_in,
            show_dashboard: logged_in,
            modal: Modal::None,
            session,
            funds: Vec::new(),
            transactions: Vec::new(),
            balances: BalanceSummary::default(),
            status: Status::default(),
            in_flight: InFlight::default(),
            next_request: 1,
        }
    }

    pub fn is_catalog_visible(&self) -> bool {
        self.show_catalog
    }

    pub fn is_dashboard_visible(&self) -> bool {
        self.show_dashboard
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn funds(&self) -> &[Fund] {
        &self.funds
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn balances(&self) -> &BalanceSummary {
        &self.balances
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.submit.is_some()
    }

    /// True if a completion carrying `request` would be accepted.
    pub fn is_outstanding(&self, request: RequestId) -> bool {
        let slot = Some(request);
        self.in_flight.funds == slot
            || self.in_flight.transactions == slot
            || self.in_flight.submit == slot
    }

    /// Apply one event and return the effects the caller must run, in order.
    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        let mut effects = Vec::new();

        match event {
            Event::Started => {
                if self.show_catalog {
                    self.fetch_funds(&mut effects);
                }
                if self.show_dashboard {
                    self.fetch_transactions(&mut effects);
                }
            }

            Event::Refresh => {
                self.status.success = None;
                if self.show_catalog {
                    self.fetch_funds(&mut effects);
                }
                if self.show_dashboard {
                    self.fetch_transactions(&mut effects);
                }
            }

            Event::OpenSubscribe(fund) => {
                if !self.show_catalog {
                    debug!(fund = %fund.nombre, "subscribe ignored: catalog not shown");
                } else {
                    self.modal = Modal::Subscribe(fund);
                }
            }

            Event::SubmitSubscribe(payload) => {
                if !matches!(self.modal, Modal::Subscribe(_)) {
                    debug!("subscribe submit ignored: modal not open");
                } else if self.in_flight.submit.is_some() {
                    debug!("subscribe submit ignored: submission pending");
                } else {
                    let request = self.issue();
                    self.in_flight.submit = Some(request);
                    self.status.error = None;
                    self.status.success = None;
                    info!(request = request.0, fund = %payload.fondo.nombre, "submitting subscription");
                    effects.push(Effect::Subscribe { request, payload });
                }
            }

            Event::OpenTransaction { fund, kind } => {
                if !self.show_dashboard || self.session.is_none() {
                    debug!(%fund, "transaction ignored: dashboard not shown");
                } else if !kind.is_user_operation() {
                    debug!(%fund, %kind, "transaction ignored: not a user operation");
                } else {
                    self.modal = Modal::Transaction { fund, kind };
                }
            }

            Event::SubmitTransaction(payload) => {
                if !matches!(self.modal, Modal::Transaction { .. }) {
                    debug!("transaction submit ignored: modal not open");
                } else if self.in_flight.submit.is_some() {
                    debug!("transaction submit ignored: submission pending");
                } else {
                    let request = self.issue();
                    self.in_flight.submit = Some(request);
                    self.status.error = None;
                    self.status.success = None;
                    info!(
                        request = request.0,
                        fund = %payload.fondo,
                        kind = %payload.operacion,
                        "submitting transaction"
                    );
                    effects.push(Effect::CreateTransaction { request, payload });
                }
            }

            Event::CloseModal => {
                self.modal = Modal::None;
            }

            Event::Logout => {
                if !self.show_dashboard {
                    debug!("logout ignored: dashboard not shown");
                } else {
                    self.session = None;
                    self.modal = Modal::None;
                    self.transactions.clear();
                    self.balances = BalanceSummary::default();
                    self.in_flight.transactions = None;
                    self.show_dashboard = false;
                    effects.push(Effect::ClearSession);

                    self.status.error = None;
                    self.status.success = Some(LOGGED_OUT_MESSAGE.to_string());
                    self.show_catalog = true;
                    self.fetch_funds(&mut effects);
                }
            }

            Event::FormInvalid(err) => {
                self.status.success = None;
                self.status.error = Some(err.to_string());
            }

            Event::SessionWriteFailed { user, message } => {
                warn!(%message, stored = ?user, "session write failed");
                if self.session != user {
                    self.session = user;
                    self.modal = Modal::None;
                    if self.session.is_some() {
                        self.show_catalog = false;
                        self.show_dashboard = true;
                        self.fetch_transactions(&mut effects);
                    } else {
                        self.transactions.clear();
                        self.balances = BalanceSummary::default();
                        self.in_flight.transactions = None;
                        self.show_dashboard = false;
                        self.show_catalog = true;
                        self.fetch_funds(&mut effects);
                    }
                }
                self.status.success = None;
                self.status.error = Some(message);
            }

            Event::FundsLoaded { request, funds } => {
                if self.settle(request) {
                    debug!(count = funds.len(), "catalog loaded");
                    self.funds = funds;
                }
            }

            Event::TransactionsLoaded {
                request,
                transactions,
            } => {
                if self.settle(request) {
                    self.balances = aggregate(&transactions);
                    debug!(
                        count = transactions.len(),
                        funds = self.balances.len(),
                        "transactions loaded"
                    );
                    self.transactions = transactions;
                }
            }

            Event::SubscribeSucceeded { request, cedula } => {
                if self.settle(request) {
                    info!(user = %cedula, "subscription accepted");
                    self.session = Some(cedula.clone());
                    effects.push(Effect::PersistSession(cedula));
                    self.modal = Modal::None;
                    self.show_catalog = false;
                    self.status.success = Some(SUBSCRIBED_MESSAGE.to_string());
                    self.show_dashboard = true;
                    self.fetch_transactions(&mut effects);
                }
            }

            Event::TransactionSucceeded { request } => {
                if self.settle(request) {
                    self.modal = Modal::None;
                    self.status.success = Some(TRANSACTION_MESSAGE.to_string());
                    self.show_dashboard = true;
                    self.fetch_transactions(&mut effects);
                }
            }

            Event::RequestFailed { request, message } => {
                if self.settle(request) {
                    warn!(request = request.0, %message, "request failed");
                    self.status.error = Some(message);
                }
            }
        }

        self.status.loading = self.in_flight.any();
        effects
    }

    fn issue(&mut self) -> RequestId {
        let id = RequestId(self.next_request);
        self.next_request += 1;
        id
    }

    fn settle(&mut self, request: RequestId) -> bool {
        let current = self.in_flight.settle(request);
        if !current {
            debug!(request = request.0, "dropping stale response");
        }
        current
    }

    /// Error is cleared; a success message set by the triggering transition stays.
    fn fetch_funds(&mut self, effects: &mut Vec<Effect>) {
        let request = self.issue();
        self.in_flight.funds = Some(request);
        self.status.error = None;
        effects.push(Effect::FetchFunds { request });
    }

    fn fetch_transactions(&mut self, effects: &mut Vec<Effect>) {
        let Some(user) = self.session.clone() else {
            return;
        };
        let request = self.issue();
        self.in_flight.transactions = Some(request);
        self.status.error = None;
        effects.push(Effect::FetchTransactions { request, user });
    }
}
