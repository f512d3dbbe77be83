//! Domain models for the point-of-sale backend.
//!
//! These are the named records that cross the data-layer boundary. Row
//! structs used for decoding live next to their queries in `db`.

pub mod catalog;
pub mod customer;
pub mod order;
pub mod report;
pub mod session;

pub use catalog::{Category, NewProduct, ProductListing};
pub use customer::{MemberProfile, MemberSummary, NewCustomer, NewMember};
pub use order::{CustomerRef, NewOrder, OrderItemDetail, OrderLine, OrderSummary, PlacedOrder};
pub use report::{CustomerSpend, DailySales, DateRange, ProductSales};
pub use session::{CurrentAdmin, keys as session_keys};
