//! # auconnect
//!
//! Client-side sync layer for the AuConnect university network.
//!
//! The backend owns all data; this crate holds view state, composes REST
//! calls and guards routes. Its core is the notification and optimistic-sync
//! machinery: [`poller::Poller`] keeps badge counts fresh,
//! [`sync::OptimisticMutator`] applies user actions locally before the
//! backend confirms them, and [`notifier::Notifier`] lets one view tell the
//! others that something changed. View controllers in [`pages`] tie these
//! together for a UI shell to drive.

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod notifier;
pub mod pages;
pub mod poller;
pub mod routes;
pub mod session;
pub mod state;
pub mod sync;

pub use config::ClientConfig;
pub use error::ClientError;
pub use state::AppContext;
