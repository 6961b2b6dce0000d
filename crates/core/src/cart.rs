//! Shopping cart types
//!
//! Cart lines are created only by the state machine's commit transition and
//! are immutable once added except by full removal. All money math lives in
//! `CartLine::new` so the `line_total == unit_price * quantity` invariant
//! holds by construction.

use serde::{Deserialize, Serialize};

use crate::catalog::SizeChoice;

/// An extra the customer picked for one cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChosenExtra {
    pub name: String,
    pub unit_price: f64,
}

impl ChosenExtra {
    pub fn new(name: impl Into<String>, unit_price: f64) -> Self {
        Self {
            name: name.into(),
            unit_price,
        }
    }
}

/// One committed cart entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Title of the section the item came from
    pub section_title: String,
    pub item_name: String,
    /// Always at least 1
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sauce: Option<String>,
    #[serde(default)]
    pub extras: Vec<ChosenExtra>,
    /// Base price plus the sum of extras
    pub unit_price: f64,
    /// `unit_price * quantity`
    pub line_total: f64,
}

impl CartLine {
    /// Build a line from a base price and the chosen options
    ///
    /// Extras apply once per line, not per unit.
    pub fn new(
        section_title: impl Into<String>,
        item_name: impl Into<String>,
        quantity: u32,
        size: Option<SizeChoice>,
        sauce: Option<String>,
        extras: Vec<ChosenExtra>,
        base_price: f64,
    ) -> Self {
        let quantity = quantity.max(1);
        let extras_sum: f64 = extras.iter().map(|e| e.unit_price).sum();
        let unit_price = base_price + extras_sum;
        Self {
            section_title: section_title.into(),
            item_name: item_name.into(),
            quantity,
            size,
            sauce,
            extras,
            unit_price,
            line_total: unit_price * quantity as f64,
        }
    }
}

/// The accumulated order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn push(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    /// Remove a line by index; out-of-range indices are ignored
    pub fn remove(&mut self, index: usize) -> Option<CartLine> {
        if index < self.lines.len() {
            Some(self.lines.remove(index))
        } else {
            None
        }
    }

    /// Remove the most recently added line
    pub fn remove_last(&mut self) -> Option<CartLine> {
        self.lines.pop()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all line totals, before any delivery fee
    pub fn total(&self) -> f64 {
        self.lines.iter().map(|l| l.line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_invariant() {
        let line = CartLine::new(
            "Tacos",
            "Tacos Poulet",
            3,
            None,
            Some("algerienne".to_string()),
            vec![ChosenExtra::new("cheese", 5.0), ChosenExtra::new("egg", 3.0)],
            25.0,
        );
        assert_eq!(line.unit_price, 33.0);
        assert_eq!(line.line_total, 99.0);
    }

    #[test]
    fn test_extras_order_does_not_change_total() {
        let a = CartLine::new(
            "Pizza",
            "Margherita",
            2,
            Some(SizeChoice::Large),
            None,
            vec![ChosenExtra::new("cheese", 5.0), ChosenExtra::new("olives", 2.0)],
            50.0,
        );
        let b = CartLine::new(
            "Pizza",
            "Margherita",
            2,
            Some(SizeChoice::Large),
            None,
            vec![ChosenExtra::new("olives", 2.0), ChosenExtra::new("cheese", 5.0)],
            50.0,
        );
        assert_eq!(a.line_total, b.line_total);
    }

    #[test]
    fn test_zero_quantity_clamps_to_one() {
        let line = CartLine::new("Pizza", "Margherita", 0, None, None, vec![], 30.0);
        assert_eq!(line.quantity, 1);
        assert_eq!(line.line_total, 30.0);
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        let mut cart = Cart::default();
        cart.push(CartLine::new("Pizza", "Margherita", 1, None, None, vec![], 30.0));
        let before_len = cart.len();
        let before_total = cart.total();

        cart.push(CartLine::new("Tacos", "Tacos Viande", 2, None, None, vec![], 28.0));
        cart.remove_last();

        assert_eq!(cart.len(), before_len);
        assert_eq!(cart.total(), before_total);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut cart = Cart::default();
        assert!(cart.remove(3).is_none());
        assert!(cart.remove_last().is_none());
    }
}
