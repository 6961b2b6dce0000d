//! Menu catalog types
//!
//! Read-only view over section → item → price data. The catalog is supplied
//! once per session by an external data source and never mutated by the
//! engine; lookups work on identifiers and pre-normalized free text.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a section prices its items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// One flat price per item
    #[default]
    SinglePrice,
    /// Separate small/large prices per item
    DualPrice,
    /// Items are informational, not orderable
    ListOnly,
}

/// Size chosen for a dual-priced item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeChoice {
    Small,
    Large,
}

impl SizeChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeChoice::Small => "small",
            SizeChoice::Large => "large",
        }
    }
}

impl std::fmt::Display for SizeChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Price of a single catalog item
///
/// Exactly one shape per item; the tagged union makes the "never both"
/// rule unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemPrice {
    /// One flat price
    Single(f64),
    /// Small/large price pair
    Dual { small: f64, large: f64 },
}

impl ItemPrice {
    /// Whether this item needs a size choice before it can be priced
    pub fn is_dual(&self) -> bool {
        matches!(self, ItemPrice::Dual { .. })
    }

    /// Resolve the base price for an optional size choice
    ///
    /// Dual-priced items default to the small price when no size was
    /// recorded; single-priced items ignore the size entirely.
    pub fn resolve(&self, size: Option<SizeChoice>) -> f64 {
        match self {
            ItemPrice::Single(p) => *p,
            ItemPrice::Dual { small, large } => match size {
                Some(SizeChoice::Large) => *large,
                _ => *small,
            },
        }
    }

    fn min_value(&self) -> f64 {
        match self {
            ItemPrice::Single(p) => *p,
            ItemPrice::Dual { small, large } => small.min(*large),
        }
    }
}

/// A single orderable (or informational) menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub price: ItemPrice,
}

impl CatalogItem {
    pub fn single(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price: ItemPrice::Single(price),
        }
    }

    pub fn dual(name: impl Into<String>, small: f64, large: f64) -> Self {
        Self {
            name: name.into(),
            price: ItemPrice::Dual { small, large },
        }
    }
}

/// An optional paid extra a section offers on top of its items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplement {
    pub name: String,
    pub unit_price: f64,
}

impl Supplement {
    pub fn new(name: impl Into<String>, unit_price: f64) -> Self {
        Self {
            name: name.into(),
            unit_price,
        }
    }
}

/// One menu section (category) with its items and pricing rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSection {
    /// Stable identifier, lowercase
    pub id: String,
    /// Display title
    pub title: String,
    #[serde(default)]
    pub pricing_mode: PricingMode,
    pub items: Vec<CatalogItem>,
    /// Paid extras offered for this section's items
    #[serde(default)]
    pub supplements: Vec<Supplement>,
    /// Footnote shown when listing the section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Whether a sauce is asked for before extras
    #[serde(default)]
    pub needs_sauce: bool,
}

impl CatalogSection {
    /// Find an item by fuzzy contains-match against pre-normalized text
    ///
    /// The item matches when its lowercased name appears in the text or the
    /// text appears in the name, so "pizza margherita" and "margherita" both
    /// resolve to the same item.
    pub fn find_item(&self, normalized: &str) -> Option<(usize, &CatalogItem)> {
        if normalized.is_empty() {
            return None;
        }
        self.items.iter().enumerate().find(|(_, item)| {
            let name = item.name.to_lowercase();
            // The reverse containment needs 3+ chars so "a" can't hit everything
            normalized.contains(name.as_str())
                || (normalized.chars().count() >= 3 && name.contains(normalized))
        })
    }

    /// Whether pre-normalized text names this section
    pub fn matches(&self, normalized: &str) -> bool {
        if normalized.is_empty() {
            return false;
        }
        let title = self.title.to_lowercase();
        normalized.contains(self.id.as_str())
            || normalized.contains(title.as_str())
            || (normalized.chars().count() >= 3 && title.contains(normalized))
    }

    /// Whether committing a line from this section asks about extras
    pub fn has_supplements(&self) -> bool {
        !self.supplements.is_empty()
    }
}

/// Catalog validation failures, reported at load time
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate section id: {0}")]
    DuplicateSection(String),

    #[error("section {0} has an empty title")]
    EmptyTitle(String),

    #[error("section {section} item {item} has a negative price")]
    NegativePrice { section: String, item: String },

    #[error("section {section} item {item} does not match pricing mode {mode:?}")]
    PricingShapeMismatch {
        section: String,
        item: String,
        mode: PricingMode,
    },
}

/// The full menu: an ordered list of sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub sections: Vec<CatalogSection>,
}

impl Catalog {
    pub fn new(sections: Vec<CatalogSection>) -> Self {
        Self { sections }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn section(&self, idx: usize) -> Option<&CatalogSection> {
        self.sections.get(idx)
    }

    pub fn section_by_id(&self, id: &str) -> Option<&CatalogSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// First section (in catalog order) matching pre-normalized text
    pub fn match_section(&self, normalized: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.matches(normalized))
    }

    /// Display titles of every section, in catalog order
    pub fn titles(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.title.clone()).collect()
    }

    /// Check structural invariants; call once after loading
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (i, section) in self.sections.iter().enumerate() {
            if self.sections[..i].iter().any(|s| s.id == section.id) {
                return Err(CatalogError::DuplicateSection(section.id.clone()));
            }
            if section.title.trim().is_empty() {
                return Err(CatalogError::EmptyTitle(section.id.clone()));
            }
            for item in &section.items {
                if item.price.min_value() < 0.0 {
                    return Err(CatalogError::NegativePrice {
                        section: section.id.clone(),
                        item: item.name.clone(),
                    });
                }
                let shape_ok = match section.pricing_mode {
                    PricingMode::SinglePrice | PricingMode::ListOnly => !item.price.is_dual(),
                    PricingMode::DualPrice => item.price.is_dual(),
                };
                if !shape_ok {
                    return Err(CatalogError::PricingShapeMismatch {
                        section: section.id.clone(),
                        item: item.name.clone(),
                        mode: section.pricing_mode,
                    });
                }
            }
        }
        Ok(())
    }
}
