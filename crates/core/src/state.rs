//! Order state: phases, pending selection, customer answers
//!
//! The caller owns the `OrderState` value; every engine call reads an
//! immutable prior state and returns a new one, so the whole struct is
//! serde round-trippable for callers that checkpoint between turns.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::catalog::SizeChoice;

/// Phase of the guided ordering flow
///
/// A closed set; there is no terminal phase. Finalizing an order emits the
/// summary and hands back a fresh `Idle` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderPhase {
    /// Not ordering; open chat and menu browsing entry point
    #[default]
    Idle,
    /// A section is open, waiting for an item pick
    Browsing,
    /// Waiting for small/large on a dual-priced item
    AwaitSize,
    /// Waiting for how many
    AwaitQuantity,
    /// Waiting for a sauce pick (sauce sections only)
    AskSauce,
    /// Waiting for extras (yes/no or named extras)
    AwaitExtras,
    /// Line committed; add more, remove, or finish
    CartActions,
    /// Delivery or pickup
    DeliveryMethod,
    /// One of the three distance tiers
    DeliveryDistance,
    /// Free-text delivery address
    Address,
    /// Cash or card
    Payment,
}

impl OrderPhase {
    /// Whether the guided flow owns the turn unconditionally
    ///
    /// Everything except `Idle` is a structured prompt the classifier must
    /// not steal ("enter your address" would break otherwise).
    pub fn is_guided(&self) -> bool {
        !matches!(self, OrderPhase::Idle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderPhase::Idle => "idle",
            OrderPhase::Browsing => "browsing",
            OrderPhase::AwaitSize => "await_size",
            OrderPhase::AwaitQuantity => "await_quantity",
            OrderPhase::AskSauce => "ask_sauce",
            OrderPhase::AwaitExtras => "await_extras",
            OrderPhase::CartActions => "cart_actions",
            OrderPhase::DeliveryMethod => "delivery_method",
            OrderPhase::DeliveryDistance => "delivery_distance",
            OrderPhase::Address => "address",
            OrderPhase::Payment => "payment",
        }
    }
}

impl std::fmt::Display for OrderPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transient in-progress item pick
///
/// Created when a section is opened, filled in as the guided phases answer
/// size/quantity/sauce, and dropped the moment the line is committed or the
/// flow resets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSelection {
    /// Index of the open section in the catalog
    pub section_idx: usize,
    /// Index of the picked item within the section; `None` while browsing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_idx: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sauce: Option<String>,
}

impl PendingSelection {
    /// Start browsing a section, no item picked yet
    pub fn browsing(section_idx: usize) -> Self {
        Self {
            section_idx,
            item_idx: None,
            size: None,
            quantity: None,
            sauce: None,
        }
    }
}

/// How the order leaves the restaurant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    Delivery,
    Pickup,
}

/// The three fixed delivery distance tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceTier {
    /// Under 2 km
    Near,
    /// 2 to 5 km
    Mid,
    /// Over 5 km
    Far,
}

impl DistanceTier {
    pub const ALL: [DistanceTier; 3] = [DistanceTier::Near, DistanceTier::Mid, DistanceTier::Far];

    /// Map a computed distance onto a tier
    pub fn from_km(km: f64) -> Self {
        if km < 2.0 {
            DistanceTier::Near
        } else if km <= 5.0 {
            DistanceTier::Mid
        } else {
            DistanceTier::Far
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DistanceTier::Near => "less than 2 km",
            DistanceTier::Mid => "2 to 5 km",
            DistanceTier::Far => "more than 5 km",
        }
    }
}

/// Payment choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }
}

/// A geolocation fix supplied by the caller's location layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// The customer's in-progress answers for the checkout phases
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_tier: Option<DistanceTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentMethod>,
    /// Optional fix from the caller's location layer; the engine only reads it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoPoint>,
    /// Distance computed by the caller, in km
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Full per-conversation order state, passed and returned by value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderState {
    #[serde(default)]
    pub phase: OrderPhase,
    #[serde(default)]
    pub cart: Cart,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<PendingSelection>,
    #[serde(default)]
    pub customer: CustomerDetails,
}

impl OrderState {
    /// Fresh idle state with an empty cart
    pub fn idle() -> Self {
        Self::default()
    }

    /// Back to idle keeping the cart (e.g. "add more")
    pub fn reset_to_idle(mut self) -> Self {
        self.phase = OrderPhase::Idle;
        self.pending = None;
        self
    }
}

/// Uniform envelope every processed turn returns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    /// Natural-language reply
    pub reply: String,
    /// Suggested quick-reply options
    pub options: Vec<String>,
    /// New state the caller must keep for the next turn
    pub state: OrderState,
    /// Name of the intent or phase that handled the turn
    pub intent: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;

    #[test]
    fn test_distance_tier_from_km() {
        assert_eq!(DistanceTier::from_km(0.5), DistanceTier::Near);
        assert_eq!(DistanceTier::from_km(2.0), DistanceTier::Mid);
        assert_eq!(DistanceTier::from_km(5.0), DistanceTier::Mid);
        assert_eq!(DistanceTier::from_km(8.3), DistanceTier::Far);
    }

    #[test]
    fn test_guided_phases() {
        assert!(!OrderPhase::Idle.is_guided());
        assert!(OrderPhase::Address.is_guided());
        assert!(OrderPhase::CartActions.is_guided());
    }

    #[test]
    fn test_reset_keeps_cart() {
        let mut state = OrderState::idle();
        state.phase = OrderPhase::CartActions;
        state.pending = Some(PendingSelection::browsing(0));
        state
            .cart
            .push(CartLine::new("Pizza", "Margherita", 1, None, None, vec![], 30.0));

        let state = state.reset_to_idle();
        assert_eq!(state.phase, OrderPhase::Idle);
        assert!(state.pending.is_none());
        assert_eq!(state.cart.len(), 1);
    }

    #[test]
    fn test_state_serde_round_trip() {
        let mut state = OrderState::idle();
        state.phase = OrderPhase::AwaitQuantity;
        let mut pending = PendingSelection::browsing(1);
        pending.item_idx = Some(2);
        state.pending = Some(pending);
        state.customer.delivery = Some(DeliveryMethod::Delivery);
        state.customer.distance_km = Some(3.4);

        let json = serde_json::to_string(&state).unwrap();
        let back: OrderState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
