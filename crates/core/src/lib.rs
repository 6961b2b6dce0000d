//! Core types for the ordering engine
//!
//! This crate provides the foundational types used across all other crates:
//! - Catalog types (sections, items, single/dual pricing, supplements)
//! - Cart types with computed totals
//! - Order state (phases, pending selection, customer answers)
//! - Script detection for bilingual reply selection
//!
//! No business logic lives here beyond data invariants; the state machine
//! and classifier consume these types from their own crates.

pub mod cart;
pub mod catalog;
pub mod script;
pub mod state;

pub use cart::{Cart, CartLine, ChosenExtra};
pub use catalog::{
    Catalog, CatalogError, CatalogItem, CatalogSection, ItemPrice, PricingMode, SizeChoice,
    Supplement,
};
pub use script::{contains_arabic, is_arabic_char};
pub use state::{
    CustomerDetails, DeliveryMethod, DistanceTier, GeoPoint, OrderPhase, OrderState,
    PaymentMethod, PendingSelection, TurnResponse,
};
