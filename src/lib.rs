//! # Arcade Engine
//!
//! Point-of-sale and analytics logic for a small arcade: a catalog of
//! priced attractions, a registry of customers with prepaid balances, and a
//! transaction engine that charges plays and accumulates revenue.
//!
//! ## Design Principles
//!
//! - **Integer money**: all amounts are whole pence, discount rates are
//!   applied exactly with `rust_decimal` and truncated toward zero
//! - **Enum dispatch**: each attraction variant carries its own pricing rule
//! - **Ordered checks**: age eligibility is checked before balance
//! - **Fault-tolerant ingestion**: a malformed line is reported and skipped
//!
//! ## Example
//!
//! ```
//! use arcade_engine::{Attraction, Customer, DiscountCategory, Pence, VenueRegistry};
//!
//! let mut arcade = VenueRegistry::new("Level Up!");
//! arcade.register_attraction(
//!     Attraction::standard("C123456789", "Darts", Pence::new(300), true).unwrap(),
//! );
//! arcade.register_customer(Customer::new(
//!     "AB1234",
//!     "Sam",
//!     20,
//!     DiscountCategory::None,
//!     Pence::new(1000),
//! ));
//!
//! let charged = arcade.process_transaction("AB1234", "C123456789", false).unwrap();
//! assert_eq!(charged, Pence::new(240));
//! assert_eq!(arcade.formatted_revenue(), "£2.40");
//! ```

pub mod attraction;
pub mod command;
pub mod customer;
pub mod error;
pub mod ingest;
pub mod money;
pub mod registry;

pub use attraction::{ActiveRules, Attraction, AttractionCategory, AttractionKind, EquipmentTier};
pub use command::Command;
pub use customer::{Customer, DiscountCategory};
pub use error::{EngineError, Result};
pub use ingest::Diagnostic;
pub use money::Pence;
pub use registry::{CategoryCounts, VenueRegistry};
