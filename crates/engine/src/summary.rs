//! Order summary rendering and deep-link building
//!
//! Pure formatting: the finalized cart and customer answers become a
//! plain-text summary, and the summary becomes a `wa.me` deep link with the
//! text percent-encoded. No network calls.

use snackbot_config::EngineSettings;
use snackbot_core::{Cart, CustomerDetails, DeliveryMethod};

/// Format an amount without a trailing ".0" for whole values
pub fn fmt_amount(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Render the itemized plain-text order summary
///
/// Lines carry size/sauce/extras annotations; the delivery fee appears only
/// when delivery was chosen, and the grand total includes it.
pub fn render_summary(cart: &Cart, customer: &CustomerDetails, settings: &EngineSettings) -> String {
    let currency = settings.currency.as_str();
    let mut out = String::from("🧾 Commande:\n");

    for line in &cart.lines {
        let mut annotations = Vec::new();
        if let Some(size) = line.size {
            annotations.push(size.as_str().to_string());
        }
        if let Some(sauce) = &line.sauce {
            annotations.push(format!("sauce {}", sauce));
        }
        for extra in &line.extras {
            annotations.push(format!("+ {}", extra.name));
        }
        let details = if annotations.is_empty() {
            String::new()
        } else {
            format!(" ({})", annotations.join(", "))
        };
        out.push_str(&format!(
            "- {}x {}{} — {} {}\n",
            line.quantity,
            line.item_name,
            details,
            fmt_amount(line.line_total),
            currency
        ));
    }

    let subtotal = cart.total();
    out.push_str(&format!("Sous-total: {} {}\n", fmt_amount(subtotal), currency));

    let mut grand_total = subtotal;
    match customer.delivery {
        Some(DeliveryMethod::Delivery) => {
            if let Some(tier) = customer.distance_tier {
                let fee = settings.delivery_fees.for_tier(tier);
                grand_total += fee;
                out.push_str(&format!(
                    "Livraison ({}): {} {}\n",
                    tier.label(),
                    fmt_amount(fee),
                    currency
                ));
            }
            if let Some(address) = &customer.address {
                out.push_str(&format!("📍 Adresse: {}\n", address));
            }
        }
        Some(DeliveryMethod::Pickup) => {
            out.push_str("🏪 Récupération sur place\n");
        }
        None => {}
    }

    out.push_str(&format!("Total: {} {}\n", fmt_amount(grand_total), currency));

    if let Some(payment) = customer.payment {
        out.push_str(&format!("💳 Paiement: {}\n", payment.label()));
    }

    out
}

/// Build the order-confirmation deep link
///
/// Byte-compatible with existing consumers:
/// `https://wa.me/<number>?text=<percent-encoded summary>`.
pub fn build_deep_link(phone_number: &str, text: &str) -> String {
    format!("https://wa.me/{}?text={}", phone_number, urlencoding::encode(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use snackbot_core::{CartLine, ChosenExtra, DistanceTier, PaymentMethod, SizeChoice};

    fn settings() -> EngineSettings {
        EngineSettings::default()
    }

    fn delivery_customer() -> CustomerDetails {
        CustomerDetails {
            delivery: Some(DeliveryMethod::Delivery),
            distance_tier: Some(DistanceTier::Mid),
            address: Some("12 Rue Atlas".to_string()),
            payment: Some(PaymentMethod::Cash),
            geo: None,
            distance_km: None,
        }
    }

    #[test]
    fn test_fmt_amount() {
        assert_eq!(fmt_amount(50.0), "50");
        assert_eq!(fmt_amount(12.5), "12.50");
    }

    #[test]
    fn test_summary_includes_fee_and_grand_total() {
        let mut cart = Cart::default();
        cart.push(CartLine::new(
            "Pizza",
            "Margherita",
            2,
            Some(SizeChoice::Large),
            None,
            vec![],
            50.0,
        ));

        let summary = render_summary(&cart, &delivery_customer(), &settings());
        assert!(summary.contains("2x Margherita (large) — 100 dh"));
        assert!(summary.contains("Sous-total: 100 dh"));
        assert!(summary.contains("Livraison (2 to 5 km): 12 dh"));
        assert!(summary.contains("Total: 112 dh"));
        assert!(summary.contains("12 Rue Atlas"));
        assert!(summary.contains("Paiement: cash"));
    }

    #[test]
    fn test_pickup_has_no_fee() {
        let mut cart = Cart::default();
        cart.push(CartLine::new("Tacos", "Tacos Poulet", 1, None, None, vec![], 25.0));

        let customer = CustomerDetails {
            delivery: Some(DeliveryMethod::Pickup),
            payment: Some(PaymentMethod::Card),
            ..Default::default()
        };

        let summary = render_summary(&cart, &customer, &settings());
        assert!(summary.contains("Récupération sur place"));
        assert!(!summary.contains("Livraison"));
        assert!(summary.contains("Total: 25 dh"));
    }

    #[test]
    fn test_annotations() {
        let mut cart = Cart::default();
        cart.push(CartLine::new(
            "Tacos",
            "Tacos Mixte",
            1,
            None,
            Some("algerienne".to_string()),
            vec![ChosenExtra::new("cheese", 5.0)],
            32.0,
        ));

        let summary = render_summary(&cart, &CustomerDetails::default(), &settings());
        assert!(summary.contains("(sauce algerienne, + cheese)"));
    }

    #[test]
    fn test_deep_link_encoding() {
        let link = build_deep_link("212600000000", "Commande: 2x Margherita — 100 dh");
        assert!(link.starts_with("https://wa.me/212600000000?text="));
        // Spaces and unicode are percent-encoded, no raw spaces survive
        assert!(!link.contains(' '));
        assert!(link.contains("Commande%3A"));
    }
}
