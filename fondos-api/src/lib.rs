//! fondos-api: HTTP gateway client for the fund service

pub mod client;
pub mod error;
pub mod wire;

pub use client::FondosClient;
pub use error::{ApiError, DecodeError};
pub use wire::Confirmation;
