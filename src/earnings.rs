//! Royalty aggregation over the catalog.
//!
//! Earnings are a lifetime gross figure: units sold times royalty, summed over
//! an author's books. Withdrawals never reduce them.

use crate::catalog::{AuthorId, Book, Catalog};
use crate::money::Money;

/// Units sold and royalty accrued for one book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookTotals {
    pub units_sold: u64,
    pub royalty: Money,
}

/// Totals a single book's sales.
///
/// Quantities are summed first and multiplied by the royalty once.
pub fn book_totals(catalog: &Catalog, book: &Book) -> BookTotals {
    let units_sold: u64 = catalog
        .sales_of(book.id)
        .map(|s| u64::from(s.quantity))
        .sum();

    BookTotals {
        units_sold,
        royalty: book.royalty.times(units_sold),
    }
}

/// Computes an author's total earnings across all their books.
///
/// Does not check that the author exists; an unknown id simply earns zero.
pub fn compute_earnings(catalog: &Catalog, author_id: AuthorId) -> Money {
    catalog
        .books_by(author_id)
        .map(|book| book_totals(catalog, book).royalty)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Author, Sale};
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, day).unwrap()
    }

    #[test]
    fn test_seed_earnings_per_author() {
        let catalog = Catalog::seed();

        // 65 x 45 + 15 x 60
        assert_eq!(compute_earnings(&catalog, 1), Money::from_units(3825));
        // 105 x 75 + 30 x 50 + 20 x 30
        assert_eq!(compute_earnings(&catalog, 2), Money::from_units(9975));
        // 10 x 40
        assert_eq!(compute_earnings(&catalog, 3), Money::from_units(400));
    }

    #[test]
    fn test_unknown_author_earns_zero() {
        let catalog = Catalog::seed();
        assert!(compute_earnings(&catalog, 42).is_zero());
    }

    #[test]
    fn test_book_without_sales_contributes_zero() {
        let catalog = Catalog::new(
            vec![Author {
                id: 1,
                name: "Solo".to_string(),
                email: "solo@email.com".to_string(),
                bank_account: "1".to_string(),
                ifsc: "X".to_string(),
            }],
            vec![
                Book {
                    id: 10,
                    title: "Unsold".to_string(),
                    author_id: 1,
                    royalty: Money::from_units(99),
                },
                Book {
                    id: 11,
                    title: "Sold".to_string(),
                    author_id: 1,
                    royalty: "12.5".parse().unwrap(),
                },
            ],
            vec![
                Sale {
                    book_id: 11,
                    quantity: 3,
                    date: date(1),
                },
                Sale {
                    book_id: 11,
                    quantity: 1,
                    date: date(2),
                },
            ],
        );

        let unsold = catalog.book(10).unwrap();
        assert_eq!(
            book_totals(&catalog, unsold),
            BookTotals {
                units_sold: 0,
                royalty: Money::ZERO
            }
        );

        let sold = catalog.book(11).unwrap();
        assert_eq!(book_totals(&catalog, sold).units_sold, 4);
        assert_eq!(compute_earnings(&catalog, 1), Money::from_units(50));
    }

    #[test]
    fn test_book_totals_for_seed_book() {
        let catalog = Catalog::seed();
        let book = catalog.book(3).unwrap();

        let totals = book_totals(&catalog, book);
        assert_eq!(totals.units_sold, 105);
        assert_eq!(totals.royalty, Money::from_units(7875));
    }
}
