//! Data models for the circulation server

pub mod book;
pub mod librarian;
pub mod member;
pub mod rental;

// Re-export commonly used types
pub use book::{Book, GenreTotal};
pub use librarian::{Librarian, LibrarianClaims};
pub use member::Member;
pub use rental::{Rental, RentalDetails, ReturnOutcome};
