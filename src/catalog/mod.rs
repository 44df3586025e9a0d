//! Catalog state: the items on the shelf and the loans against them.
//!
//! Both stores guard their own collection. Operations that need to look at
//! both (opening a loan, removing a loaned item) are serialised by the
//! facade, see [`crate::LibraryRegistry`].

mod ledger;
mod store;

pub use ledger::{LoanLedger, LoanPolicy};
pub use store::CatalogStore;
