//! Response payloads for the read endpoints.

use crate::catalog::{AuthorId, BookId};
use crate::money::Money;
use chrono::NaiveDate;
use serde::Serialize;

/// One row of `GET /authors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSummary {
    pub id: AuthorId,
    pub name: String,
    pub total_earnings: Money,
    /// Reported equal to `total_earnings`; withdrawals are not subtracted here.
    pub current_balance: Money,
}

/// Per-book line of an author's detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookBreakdown {
    pub id: BookId,
    pub title: String,
    pub royalty_per_sale: Money,
    pub total_sold: u64,
    pub total_royalty: Money,
}

/// `GET /authors/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorDetail {
    pub id: AuthorId,
    pub name: String,
    pub email: String,
    pub total_books: usize,
    pub total_earnings: Money,
    /// Same earnings-only figure as [`AuthorSummary::current_balance`].
    pub current_balance: Money,
    pub books: Vec<BookBreakdown>,
}

/// A sale annotated with its book and the royalty it earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleRecord {
    pub book_title: String,
    pub quantity: u32,
    pub royalty_earned: Money,
    /// `YYYY-MM-DD`
    pub sale_date: NaiveDate,
}
