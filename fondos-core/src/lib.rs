//! fondos-core: domain types and client-side logic for the fund platform

pub mod balance;
pub mod controller;
pub mod forms;
pub mod fund;
pub mod requests;
pub mod session;
pub mod transaction;

pub use balance::{BalanceSummary, aggregate};
pub use controller::{AppState, Effect, Event, Modal, RequestId, Status};
pub use forms::{FormError, SubscribeForm, TransactionForm};
pub use fund::{Fund, find_fund};
pub use requests::{FundRef, SubscriptionRequest, TransactionRequest};
pub use session::{MemorySessionStore, Session, SessionStore};
pub use transaction::{Transaction, TransactionKind};
