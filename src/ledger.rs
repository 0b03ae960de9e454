//! Royalty ledger: catalog queries and the withdrawal log.
//!
//! The catalog is read-only. Withdrawals are appended to a log owned by the
//! ledger; balances are derived from earnings and that log on every request
//! and never stored.

use crate::catalog::{Author, AuthorId, Catalog};
use crate::earnings::{book_totals, compute_earnings};
use crate::error::{LedgerError, Result};
use crate::money::Money;
use crate::views::{AuthorDetail, AuthorSummary, BookBreakdown, SaleRecord};
use crate::withdrawal::{Withdrawal, WithdrawalReceipt, WithdrawalRequest, WithdrawalStatus};
use log::{debug, info};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Smallest amount, in whole currency units, a withdrawal may request.
pub const MINIMUM_WITHDRAWAL: i64 = 500;

/// The royalty ledger.
///
/// Holds the seeded catalog and the append-only withdrawal log.
///
/// # Concurrency
///
/// The withdrawal log sits behind a single async mutex. Creating a
/// withdrawal holds the lock from reading the author's withdrawn total
/// through appending the new record, so two concurrent requests can never
/// spend the same balance.
pub struct RoyaltyLedger {
    catalog: Catalog,

    /// Every withdrawal ever accepted, in creation order.
    withdrawals: Mutex<Vec<Withdrawal>>,

    clock: Arc<dyn Clock + Send + Sync>,
}

impl RoyaltyLedger {
    /// Creates a ledger over `catalog` with an empty withdrawal log.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_clock(catalog, Arc::new(DefaultClock))
    }

    /// Creates a ledger that stamps withdrawals using `clock`.
    pub fn with_clock(catalog: Catalog, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        RoyaltyLedger {
            catalog,
            withdrawals: Mutex::new(Vec::new()),
            clock,
        }
    }

    fn require_author(&self, author_id: AuthorId) -> Result<&Author> {
        self.catalog.author(author_id).ok_or_else(|| {
            debug!("Unknown author {}", author_id);
            LedgerError::AuthorNotFound
        })
    }

    /// Lifetime gross earnings for an author (zero for unknown ids).
    pub fn earnings(&self, author_id: AuthorId) -> Money {
        compute_earnings(&self.catalog, author_id)
    }

    /// Every author with their earnings, in catalog order.
    pub fn list_authors(&self) -> Vec<AuthorSummary> {
        self.catalog
            .authors()
            .iter()
            .map(|author| {
                let total_earnings = self.earnings(author.id);
                AuthorSummary {
                    id: author.id,
                    name: author.name.clone(),
                    total_earnings,
                    current_balance: total_earnings,
                }
            })
            .collect()
    }

    /// Profile and per-book royalty breakdown for one author.
    pub fn author_detail(&self, author_id: AuthorId) -> Result<AuthorDetail> {
        let author = self.require_author(author_id)?;

        let books: Vec<BookBreakdown> = self
            .catalog
            .books_by(author.id)
            .map(|book| {
                let totals = book_totals(&self.catalog, book);
                BookBreakdown {
                    id: book.id,
                    title: book.title.clone(),
                    royalty_per_sale: book.royalty,
                    total_sold: totals.units_sold,
                    total_royalty: totals.royalty,
                }
            })
            .collect();

        let total_earnings = self.earnings(author.id);

        Ok(AuthorDetail {
            id: author.id,
            name: author.name.clone(),
            email: author.email.clone(),
            total_books: books.len(),
            total_earnings,
            current_balance: total_earnings,
            books,
        })
    }

    /// Sales of the author's books, most recent first.
    ///
    /// Sales on the same date keep their catalog order.
    pub fn author_sales(&self, author_id: AuthorId) -> Result<Vec<SaleRecord>> {
        let author = self.require_author(author_id)?;

        let mut records: Vec<SaleRecord> = self
            .catalog
            .sales()
            .iter()
            .filter_map(|sale| {
                let book = self
                    .catalog
                    .book(sale.book_id)
                    .filter(|b| b.author_id == author.id)?;

                Some(SaleRecord {
                    book_title: book.title.clone(),
                    quantity: sale.quantity,
                    royalty_earned: book.royalty.times(u64::from(sale.quantity)),
                    sale_date: sale.date,
                })
            })
            .collect();

        records.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));
        Ok(records)
    }

    /// The author's withdrawals, newest first.
    pub async fn author_withdrawals(&self, author_id: AuthorId) -> Result<Vec<Withdrawal>> {
        let author = self.require_author(author_id)?;

        let mut history: Vec<Withdrawal> = self
            .withdrawals
            .lock()
            .await
            .iter()
            .filter(|w| w.author_id == author.id)
            .cloned()
            .collect();

        history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(history)
    }

    /// Earnings minus everything the author has withdrawn so far.
    pub async fn available_balance(&self, author_id: AuthorId) -> Result<Money> {
        let author = self.require_author(author_id)?;
        let withdrawals = self.withdrawals.lock().await;
        Ok(self.earnings(author.id) - withdrawn_by(&withdrawals, author.id))
    }

    /// Validates and records a withdrawal.
    ///
    /// Checks run in order and stop at the first failure:
    /// 1. the author must exist
    /// 2. the amount must be at least [`MINIMUM_WITHDRAWAL`]
    /// 3. the amount must not exceed earnings minus prior withdrawals
    ///
    /// A missing author id is treated as unknown and a missing amount as
    /// below the minimum.
    pub async fn create_withdrawal(&self, request: WithdrawalRequest) -> Result<WithdrawalReceipt> {
        let author_id = request.author_id.ok_or(LedgerError::AuthorNotFound)?;
        let author = self.require_author(author_id)?;

        let minimum = Money::from_units(MINIMUM_WITHDRAWAL);
        let amount = match request.amount {
            Some(amount) if amount >= minimum => amount,
            other => {
                debug!(
                    "Rejecting withdrawal of {:?} for author {}: below minimum {}",
                    other, author.id, minimum
                );
                return Err(LedgerError::BelowMinimum { minimum });
            }
        };

        let earnings = self.earnings(author.id);

        // Held until the new record is appended
        let mut withdrawals = self.withdrawals.lock().await;
        let available = earnings - withdrawn_by(&withdrawals, author.id);

        if amount > available {
            debug!(
                "Rejecting withdrawal of {} for author {}: only {} available",
                amount, author.id, available
            );
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        let withdrawal = Withdrawal {
            id: withdrawals.len() as u64 + 1,
            author_id: author.id,
            amount,
            status: WithdrawalStatus::Pending,
            created_at: self.clock.utc(),
        };
        withdrawals.push(withdrawal.clone());

        let new_balance = available - amount;
        info!(
            "Recorded withdrawal {} of {} for author {}, balance now {}",
            withdrawal.id, amount, author.id, new_balance
        );

        Ok(WithdrawalReceipt {
            withdrawal,
            new_balance,
        })
    }
}

impl Default for RoyaltyLedger {
    fn default() -> Self {
        Self::new(Catalog::seed())
    }
}

/// Sum of an author's withdrawals in `log`.
fn withdrawn_by(log: &[Withdrawal], author_id: AuthorId) -> Money {
    log.iter()
        .filter(|w| w.author_id == author_id)
        .map(|w| w.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
    use std::sync::Mutex as StdMutex;

    /// Advances one minute on every read.
    struct SteppingClock(StdMutex<DateTime<Utc>>);

    impl SteppingClock {
        fn starting_at(start: DateTime<Utc>) -> Arc<Self> {
            Arc::new(SteppingClock(StdMutex::new(start)))
        }
    }

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            let mut now = self.0.lock().unwrap();
            let current = *now;
            *now += TimeDelta::minutes(1);
            current
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap()
    }

    fn ledger() -> RoyaltyLedger {
        RoyaltyLedger::with_clock(Catalog::seed(), SteppingClock::starting_at(start()))
    }

    fn request(author_id: AuthorId, amount: i64) -> WithdrawalRequest {
        WithdrawalRequest::new(author_id, Money::from_units(amount))
    }

    #[test]
    fn test_list_authors_reports_earnings_as_balance() {
        let summaries = ledger().list_authors();

        let totals: Vec<_> = summaries
            .iter()
            .map(|s| (s.id, s.total_earnings, s.current_balance))
            .collect();
        assert_eq!(
            totals,
            [
                (1, Money::from_units(3825), Money::from_units(3825)),
                (2, Money::from_units(9975), Money::from_units(9975)),
                (3, Money::from_units(400), Money::from_units(400)),
            ]
        );
    }

    #[test]
    fn test_author_detail_breaks_down_books() {
        let detail = ledger().author_detail(1).unwrap();

        assert_eq!(detail.name, "Priya Sharma");
        assert_eq!(detail.email, "priya@email.com");
        assert_eq!(detail.total_books, 2);
        assert_eq!(detail.total_earnings, Money::from_units(3825));

        let river = &detail.books[0];
        assert_eq!(river.title, "The Silent River");
        assert_eq!(river.royalty_per_sale, Money::from_units(45));
        assert_eq!(river.total_sold, 65);
        assert_eq!(river.total_royalty, Money::from_units(2925));

        let mumbai = &detail.books[1];
        assert_eq!(mumbai.total_sold, 15);
        assert_eq!(mumbai.total_royalty, Money::from_units(900));
    }

    #[test]
    fn test_unknown_author_is_not_found() {
        let ledger = ledger();
        assert_eq!(ledger.author_detail(9), Err(LedgerError::AuthorNotFound));
        assert_eq!(ledger.author_sales(9), Err(LedgerError::AuthorNotFound));
    }

    #[test]
    fn test_author_sales_sorted_newest_first() {
        let sales = ledger().author_sales(1).unwrap();

        let rows: Vec<_> = sales
            .iter()
            .map(|s| (s.sale_date.to_string(), s.quantity, s.royalty_earned))
            .collect();
        assert_eq!(
            rows,
            [
                ("2025-01-12".to_string(), 40, Money::from_units(1800)),
                ("2025-01-08".to_string(), 15, Money::from_units(900)),
                ("2025-01-05".to_string(), 25, Money::from_units(1125)),
            ]
        );
        assert_eq!(sales[0].book_title, "The Silent River");
        assert_eq!(sales[1].book_title, "Midnight in Mumbai");
    }

    #[test]
    fn test_same_day_sales_keep_catalog_order() {
        use crate::catalog::{Book, Sale};
        use chrono::NaiveDate;

        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let catalog = Catalog::new(
            Catalog::seed().authors().to_vec(),
            vec![Book {
                id: 1,
                title: "Twice".to_string(),
                author_id: 1,
                royalty: Money::from_units(10),
            }],
            vec![
                Sale {
                    book_id: 1,
                    quantity: 1,
                    date: day,
                },
                Sale {
                    book_id: 1,
                    quantity: 2,
                    date: day,
                },
                Sale {
                    book_id: 1,
                    quantity: 3,
                    date: day.pred_opt().unwrap(),
                },
            ],
        );

        let sales = RoyaltyLedger::new(catalog).author_sales(1).unwrap();
        let quantities: Vec<_> = sales.iter().map(|s| s.quantity).collect();
        assert_eq!(quantities, [1, 2, 3]);
    }

    #[tokio::test]
    async fn test_withdrawal_success_returns_receipt() {
        let ledger = ledger();
        let receipt = ledger.create_withdrawal(request(2, 1500)).await.unwrap();

        assert_eq!(receipt.withdrawal.id, 1);
        assert_eq!(receipt.withdrawal.author_id, 2);
        assert_eq!(receipt.withdrawal.amount, Money::from_units(1500));
        assert_eq!(receipt.withdrawal.status, WithdrawalStatus::Pending);
        assert_eq!(receipt.withdrawal.created_at, start());
        assert_eq!(receipt.new_balance, Money::from_units(8475));
    }

    #[tokio::test]
    async fn test_withdrawal_validation_order() {
        let ledger = ledger();

        // Unknown author wins over a bad amount
        assert_eq!(
            ledger.create_withdrawal(request(9, 1)).await,
            Err(LedgerError::AuthorNotFound)
        );
        assert_eq!(
            ledger.create_withdrawal(WithdrawalRequest::default()).await,
            Err(LedgerError::AuthorNotFound)
        );

        // Minimum wins over balance
        assert_eq!(
            ledger.create_withdrawal(request(3, 499)).await,
            Err(LedgerError::BelowMinimum {
                minimum: Money::from_units(500)
            })
        );

        assert_eq!(
            ledger.create_withdrawal(request(3, 500)).await,
            Err(LedgerError::InsufficientBalance {
                requested: Money::from_units(500),
                available: Money::from_units(400),
            })
        );

        assert!(ledger.author_withdrawals(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_amount_is_below_minimum() {
        let request = WithdrawalRequest {
            author_id: Some(1),
            amount: None,
        };
        assert!(matches!(
            ledger().create_withdrawal(request).await,
            Err(LedgerError::BelowMinimum { .. })
        ));
    }

    #[tokio::test]
    async fn test_withdrawals_reduce_available_balance() {
        let ledger = ledger();

        ledger.create_withdrawal(request(1, 1000)).await.unwrap();
        let second = ledger.create_withdrawal(request(1, 800)).await.unwrap();
        assert_eq!(second.new_balance, Money::from_units(2025));
        assert_eq!(
            ledger.available_balance(1).await.unwrap(),
            Money::from_units(2025)
        );

        assert_eq!(
            ledger.create_withdrawal(request(1, 2026)).await,
            Err(LedgerError::InsufficientBalance {
                requested: Money::from_units(2026),
                available: Money::from_units(2025),
            })
        );

        // Draining the exact balance is allowed
        let last = ledger.create_withdrawal(request(1, 2025)).await.unwrap();
        assert!(last.new_balance.is_zero());

        // Earnings stay gross
        assert_eq!(ledger.earnings(1), Money::from_units(3825));
        assert_eq!(ledger.list_authors()[0].current_balance, Money::from_units(3825));
    }

    #[tokio::test]
    async fn test_withdrawal_ids_are_global() {
        let ledger = ledger();

        let a = ledger.create_withdrawal(request(1, 500)).await.unwrap();
        let b = ledger.create_withdrawal(request(2, 500)).await.unwrap();
        let rejected = ledger.create_withdrawal(request(3, 500)).await;
        assert!(matches!(
            rejected,
            Err(LedgerError::InsufficientBalance { .. })
        ));
        let c = ledger.create_withdrawal(request(1, 600)).await.unwrap();

        assert_eq!(
            [a.withdrawal.id, b.withdrawal.id, c.withdrawal.id],
            [1, 2, 3]
        );
    }

    #[tokio::test]
    async fn test_author_withdrawals_newest_first() {
        let ledger = ledger();

        ledger.create_withdrawal(request(2, 500)).await.unwrap();
        ledger.create_withdrawal(request(1, 700)).await.unwrap();
        ledger.create_withdrawal(request(2, 900)).await.unwrap();

        let history = ledger.author_withdrawals(2).await.unwrap();
        let ids: Vec<_> = history.iter().map(|w| w.id).collect();
        assert_eq!(ids, [3, 1]);
        assert!(history[0].created_at > history[1].created_at);

        assert_eq!(
            ledger.author_withdrawals(7).await,
            Err(LedgerError::AuthorNotFound)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_withdrawals_never_overdraw() {
        let ledger = Arc::new(ledger());

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                tokio::spawn(async move { ledger.create_withdrawal(request(1, 1000)).await })
            })
            .collect();

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                accepted += 1;
            }
        }

        // 3825 covers three withdrawals of 1000
        assert_eq!(accepted, 3);
        assert_eq!(
            ledger.available_balance(1).await.unwrap(),
            Money::from_units(825)
        );
    }
}
