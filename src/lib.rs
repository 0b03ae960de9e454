//! # Royalty Ledger
//!
//! An HTTP service that tracks what authors have earned from book sales and
//! records their withdrawal requests.
//!
//! ## Design Principles
//!
//! - **Exact arithmetic**: Money uses `rust_decimal`, never floats
//! - **Derived balances**: Available balance is earnings minus withdrawals, computed on demand
//! - **Append-only log**: Withdrawals are never updated or removed
//! - **Single writer**: One lock covers the balance check and the append
//!
//! ## Example
//!
//! ```no_run
//! use royalty_ledger::{api, Catalog, RoyaltyLedger};
//! use std::sync::Arc;
//!
//! # async fn serve() -> std::io::Result<()> {
//! let ledger = Arc::new(RoyaltyLedger::new(Catalog::seed()));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, api::router(ledger)).await
//! # }
//! ```

pub mod api;
pub mod catalog;
pub mod config;
pub mod earnings;
pub mod error;
pub mod ledger;
pub mod money;
pub mod views;
pub mod withdrawal;

pub use catalog::{Author, AuthorId, Book, BookId, Catalog, Sale};
pub use config::Config;
pub use earnings::compute_earnings;
pub use error::{ConfigError, LedgerError, Result, ServiceError};
pub use ledger::{RoyaltyLedger, MINIMUM_WITHDRAWAL};
pub use money::Money;
pub use withdrawal::{Withdrawal, WithdrawalReceipt, WithdrawalRequest, WithdrawalStatus};
