//! Catalog loading
//!
//! The catalog is plain data: an ordered list of sections deserialized from
//! YAML, validated once, then handed to the engine read-only. A built-in
//! default catalog covers tests and first-run setups with no config files.

use std::path::Path;

use snackbot_core::{Catalog, CatalogItem, CatalogSection, PricingMode, Supplement};

use crate::ConfigError;

/// Load and validate a catalog from a YAML file
///
/// The file holds the same shape `Catalog` serializes to:
///
/// ```yaml
/// sections:
///   - id: pizza
///     title: Pizza
///     pricing_mode: dual_price
///     items:
///       - name: Margherita
///         price: { dual: { small: 30.0, large: 50.0 } }
///     supplements:
///       - { name: extra cheese, unit_price: 5.0 }
/// ```
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        ConfigError::FileNotFound(path.as_ref().display().to_string(), e.to_string())
    })?;
    parse_catalog(&content)
}

/// Parse and validate a catalog from a YAML string
pub fn parse_catalog(yaml: &str) -> Result<Catalog, ConfigError> {
    let catalog: Catalog =
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    catalog.validate()?;
    tracing::debug!(sections = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Built-in default catalog
///
/// A snack-restaurant menu: dual-priced pizza, sauce-first tacos/kabab and
/// plats, extras-only sandwiches, drinks that commit straight after the
/// quantity, and one informational promo section.
pub fn default_catalog() -> Catalog {
    Catalog::new(vec![
        CatalogSection {
            id: "pizza".to_string(),
            title: "Pizza".to_string(),
            pricing_mode: PricingMode::DualPrice,
            items: vec![
                CatalogItem::dual("Margherita", 30.0, 50.0),
                CatalogItem::dual("Pepperoni", 35.0, 55.0),
                CatalogItem::dual("Vegetarienne", 32.0, 52.0),
                CatalogItem::dual("Fruits de Mer", 45.0, 70.0),
            ],
            supplements: vec![
                Supplement::new("extra cheese", 5.0),
                Supplement::new("mushrooms", 4.0),
                Supplement::new("olives", 2.0),
            ],
            note: None,
            needs_sauce: false,
        },
        CatalogSection {
            id: "tacos".to_string(),
            title: "Tacos".to_string(),
            pricing_mode: PricingMode::SinglePrice,
            items: vec![
                CatalogItem::single("Tacos Poulet", 25.0),
                CatalogItem::single("Tacos Viande", 28.0),
                CatalogItem::single("Tacos Mixte", 32.0),
            ],
            supplements: vec![
                Supplement::new("cheese", 5.0),
                Supplement::new("egg", 3.0),
            ],
            note: None,
            needs_sauce: true,
        },
        CatalogSection {
            id: "kabab".to_string(),
            title: "Kabab".to_string(),
            pricing_mode: PricingMode::SinglePrice,
            items: vec![
                CatalogItem::single("Kabab Simple", 20.0),
                CatalogItem::single("Kabab Royal", 30.0),
            ],
            supplements: vec![
                Supplement::new("cheese", 5.0),
                Supplement::new("egg", 3.0),
            ],
            note: None,
            needs_sauce: true,
        },
        CatalogSection {
            id: "plats".to_string(),
            title: "Plats".to_string(),
            pricing_mode: PricingMode::SinglePrice,
            items: vec![
                CatalogItem::single("Plat Poulet", 35.0),
                CatalogItem::single("Plat Viande", 45.0),
                CatalogItem::single("Plat Mixte", 50.0),
            ],
            supplements: vec![],
            note: Some("Served with fries and salad".to_string()),
            needs_sauce: true,
        },
        CatalogSection {
            id: "sandwich".to_string(),
            title: "Sandwich".to_string(),
            pricing_mode: PricingMode::SinglePrice,
            items: vec![
                CatalogItem::single("Sandwich Thon", 15.0),
                CatalogItem::single("Sandwich Poulet", 18.0),
                CatalogItem::single("Sandwich Kefta", 20.0),
            ],
            supplements: vec![Supplement::new("fries", 5.0)],
            note: None,
            needs_sauce: false,
        },
        CatalogSection {
            id: "drinks".to_string(),
            title: "Boissons".to_string(),
            pricing_mode: PricingMode::SinglePrice,
            items: vec![
                CatalogItem::single("Coca", 7.0),
                CatalogItem::single("Eau", 4.0),
                CatalogItem::single("Jus d'Orange", 10.0),
            ],
            supplements: vec![],
            note: None,
            needs_sauce: false,
        },
        CatalogSection {
            id: "promo".to_string(),
            title: "Promotions".to_string(),
            pricing_mode: PricingMode::ListOnly,
            items: vec![
                CatalogItem::single("Menu Midi: Sandwich + Boisson", 20.0),
                CatalogItem::single("Family Deal: 2 Pizza + 2 Coca", 95.0),
            ],
            supplements: vec![],
            note: Some("In-store promotions, ask when ordering".to_string()),
            needs_sauce: false,
        },
    ])
}
