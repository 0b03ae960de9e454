//! Immutable author, book, and sale records.
//!
//! The catalog is seeded once at startup and never changes for the lifetime
//! of the process. Referential integrity (books point at authors, sales point
//! at books) is a property of the seed data and is not checked at runtime.

use crate::money::Money;
use chrono::NaiveDate;

/// Author identifier.
pub type AuthorId = u32;

/// Book identifier.
pub type BookId = u32;

/// A royalty-earning author.
///
/// Bank details are kept for payouts but never leave the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub email: String,
    pub bank_account: String,
    pub ifsc: String,
}

/// A book and the fixed royalty its author earns per unit sold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author_id: AuthorId,
    pub royalty: Money,
}

/// A batch of units sold on a single day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    pub book_id: BookId,
    pub quantity: u32,
    pub date: NaiveDate,
}

/// The read-only record store.
///
/// Lookups are linear scans; record order is the seed order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    authors: Vec<Author>,
    books: Vec<Book>,
    sales: Vec<Sale>,
}

impl Catalog {
    /// Creates a catalog from explicit record lists.
    pub fn new(authors: Vec<Author>, books: Vec<Book>, sales: Vec<Sale>) -> Self {
        Catalog {
            authors,
            books,
            sales,
        }
    }

    /// The records the service starts with.
    pub fn seed() -> Self {
        let authors = vec![
            author(1, "Priya Sharma", "priya@email.com", "1234567890", "HDFC0001234"),
            author(2, "Rahul Verma", "rahul@email.com", "0987654321", "ICIC0005678"),
            author(3, "Anita Desai", "anita@email.com", "5678901234", "SBIN0009012"),
        ];

        let books = vec![
            book(1, "The Silent River", 1, 45),
            book(2, "Midnight in Mumbai", 1, 60),
            book(3, "Code & Coffee", 2, 75),
            book(4, "Startup Diaries", 2, 50),
            book(5, "Poetry of Pain", 2, 30),
            book(6, "Garden of Words", 3, 40),
        ];

        let sales = vec![
            sale(1, 25, 5),
            sale(1, 40, 12),
            sale(2, 15, 8),
            sale(3, 60, 3),
            sale(3, 45, 15),
            sale(4, 30, 10),
            sale(5, 20, 18),
            sale(6, 10, 20),
        ];

        Catalog::new(authors, books, sales)
    }

    /// All authors in seed order.
    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    /// Looks up an author by id.
    pub fn author(&self, id: AuthorId) -> Option<&Author> {
        self.authors.iter().find(|a| a.id == id)
    }

    /// Looks up a book by id.
    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Books written by the given author.
    pub fn books_by(&self, author_id: AuthorId) -> impl Iterator<Item = &Book> + '_ {
        self.books.iter().filter(move |b| b.author_id == author_id)
    }

    /// Sales recorded against the given book.
    pub fn sales_of(&self, book_id: BookId) -> impl Iterator<Item = &Sale> + '_ {
        self.sales.iter().filter(move |s| s.book_id == book_id)
    }

    /// All sales in seed order.
    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }
}

fn author(id: AuthorId, name: &str, email: &str, bank_account: &str, ifsc: &str) -> Author {
    Author {
        id,
        name: name.to_string(),
        email: email.to_string(),
        bank_account: bank_account.to_string(),
        ifsc: ifsc.to_string(),
    }
}

fn book(id: BookId, title: &str, author_id: AuthorId, royalty: i64) -> Book {
    Book {
        id,
        title: title.to_string(),
        author_id,
        royalty: Money::from_units(royalty),
    }
}

/// Seed sales all fall in January 2025.
fn sale(book_id: BookId, quantity: u32, day: u32) -> Sale {
    Sale {
        book_id,
        quantity,
        // Seed days are all within January
        date: NaiveDate::from_ymd_opt(2025, 1, day).expect("valid seed date"),
    }
}
