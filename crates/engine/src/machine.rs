//! Guided ordering state machine
//!
//! One handler per phase; every handler is total on its input. Anything that
//! fails to parse re-emits the same prompt and options without touching the
//! cart or the phase, and a pending selection that went missing soft-resets
//! to idle instead of crashing.

use snackbot_config::EngineSettings;
use snackbot_core::{
    CartLine, Catalog, CatalogItem, CatalogSection, ChosenExtra, DeliveryMethod, DistanceTier,
    ItemPrice, OrderPhase, OrderState, PaymentMethod, PendingSelection, PricingMode,
};
use snackbot_nlu::extract_size;

use crate::summary::{build_deep_link, fmt_amount, render_summary};

/// Output of one guided-flow step
#[derive(Debug, Clone)]
pub struct MachineReply {
    pub reply: String,
    pub options: Vec<String>,
    pub state: OrderState,
    pub intent: String,
}

const RESET_KEYWORDS: &[&str] = &["reset", "annuler", "cancel", "nbda", "نبدا"];
const BACK_KEYWORDS: &[&str] = &["back", "retour", "rje3", "رجع"];
const NO_KEYWORDS: &[&str] = &["no", "non", "la", "bla", "safi", "لا"];
const ADD_MORE_KEYWORDS: &[&str] = &["zid", "add", "more", "encore", "زيد"];
const FINISH_KEYWORDS: &[&str] = &["salina", "finish", "done", "sali", "صافي", "سالينا"];
const REMOVE_KEYWORDS: &[&str] = &["7iyed", "hiyed", "remove", "supprimer", "حيد"];
const DELIVERY_KEYWORDS: &[&str] = &["livraison", "delivery", "tawsil", "wasslo", "توصيل"];
const PICKUP_KEYWORDS: &[&str] = &["pickup", "naji", "retrait", "surplace", "نجي"];
const CASH_KEYWORDS: &[&str] = &["cash", "kach", "espece", "especes", "كاش", "فلوس"];
const CARD_KEYWORDS: &[&str] = &["card", "carte", "bitaqa", "كارط", "بطاقة"];
const NEAR_KEYWORDS: &[&str] = &["9rib", "proche", "near", "قريب"];
const MID_KEYWORDS: &[&str] = &["wasat", "moyen", "medium", "وسط"];
const FAR_KEYWORDS: &[&str] = &["b3id", "loin", "far", "بعيد"];

/// Dish sauces, used when the section title carries the main-dish marker
const DISH_SAUCES: &[&str] = &["sauce champignon", "sauce poivre", "sauce blanche"];
/// Tacos/kabab sauces, used for every other sauce section
const TACOS_SAUCES: &[&str] = &[
    "algerienne",
    "samurai",
    "biggy",
    "ketchup",
    "mayonnaise",
    "harissa",
];

/// Marker in a section title that selects the dish-sauce list
const MAIN_DISH_MARKER: &str = "plat";

fn has_keyword(normalized: &str, keywords: &[&str]) -> bool {
    normalized
        .split_whitespace()
        .any(|w| keywords.iter().any(|k| w == *k))
}

/// Quantity words mapped 1–4, plus plain integers
fn parse_quantity(normalized: &str) -> Option<u32> {
    for word in normalized.split_whitespace() {
        if let Ok(n) = word.parse::<u32>() {
            if (1..=99).contains(&n) {
                return Some(n);
            }
        }
        let mapped = match word {
            "wa7ed" | "wahed" | "un" | "une" | "one" | "واحد" | "وحدة" => Some(1),
            "juj" | "jouj" | "deux" | "two" | "جوج" => Some(2),
            "tlata" | "trois" | "three" | "تلاتة" | "ثلاثة" => Some(3),
            "rb3a" | "rab3a" | "quatre" | "four" | "ربعة" | "أربعة" => Some(4),
            _ => None,
        };
        if mapped.is_some() {
            return mapped;
        }
    }
    None
}

/// The sauce list a section uses, dispatched on section identity
fn sauce_list_for(section: &CatalogSection) -> &'static [&'static str] {
    if section.title.to_lowercase().contains(MAIN_DISH_MARKER) {
        DISH_SAUCES
    } else {
        TACOS_SAUCES
    }
}

/// The guided ordering flow over one catalog
pub struct OrderMachine<'a> {
    catalog: &'a Catalog,
    settings: &'a EngineSettings,
}

impl<'a> OrderMachine<'a> {
    pub fn new(catalog: &'a Catalog, settings: &'a EngineSettings) -> Self {
        Self { catalog, settings }
    }

    /// Process one turn of the guided flow
    ///
    /// `raw` is kept for free-text answers (the address); everything else
    /// matches on `normalized`.
    pub fn handle(&self, raw: &str, normalized: &str, state: OrderState) -> MachineReply {
        match state.phase {
            OrderPhase::Idle => self.handle_idle(normalized, state),
            OrderPhase::Browsing => self.handle_browsing(normalized, state),
            OrderPhase::AwaitSize => self.handle_await_size(normalized, state),
            OrderPhase::AwaitQuantity => self.handle_await_quantity(normalized, state),
            OrderPhase::AskSauce => self.handle_ask_sauce(normalized, state),
            OrderPhase::AwaitExtras => self.handle_await_extras(normalized, state),
            OrderPhase::CartActions => self.handle_cart_actions(normalized, state),
            OrderPhase::DeliveryMethod => self.handle_delivery_method(normalized, state),
            OrderPhase::DeliveryDistance => self.handle_delivery_distance(normalized, state),
            OrderPhase::Address => self.handle_address(raw, state),
            OrderPhase::Payment => self.handle_payment(normalized, state),
        }
    }

    // --- phase handlers ---

    fn handle_idle(&self, normalized: &str, state: OrderState) -> MachineReply {
        if self.catalog.is_empty() {
            return MachineReply {
                reply: "Smh lina, l menu mazal makaynch daba. 3awd jarreb mn b3d 🙏".to_string(),
                options: vec![],
                state,
                intent: "order_no_menu".to_string(),
            };
        }

        if has_keyword(normalized, RESET_KEYWORDS) {
            let (reply, options) = self.menu_prompt();
            return MachineReply {
                reply,
                options,
                state: state.reset_to_idle(),
                intent: "order_idle".to_string(),
            };
        }

        if let Some(idx) = self.catalog.match_section(normalized) {
            return self.enter_section(idx, state);
        }

        let (reply, options) = self.menu_prompt();
        MachineReply {
            reply,
            options,
            state,
            intent: "order_idle".to_string(),
        }
    }

    /// Open a section by id, the hand-off used when the classifier already
    /// resolved the category (including via aliases the text match would
    /// miss, like Arabic-script section names)
    pub fn open_section(&self, id: &str, state: OrderState) -> MachineReply {
        match self.catalog.sections.iter().position(|s| s.id == id) {
            Some(idx) => self.enter_section(idx, state),
            None => self.handle_idle("", state),
        }
    }

    fn enter_section(&self, idx: usize, state: OrderState) -> MachineReply {
        let section = &self.catalog.sections[idx];

        if section.pricing_mode == PricingMode::ListOnly {
            // Informational section: display it, stay idle
            let mut reply = format!("{}:\n{}", section.title, self.item_listing(section));
            if let Some(note) = &section.note {
                reply.push_str(&format!("\nℹ️ {}", note));
            }
            return MachineReply {
                reply,
                options: self.catalog.titles(),
                state: state.reset_to_idle(),
                intent: "order_info".to_string(),
            };
        }

        let mut state = state;
        state.phase = OrderPhase::Browsing;
        state.pending = Some(PendingSelection::browsing(idx));
        let (reply, options) = self.section_prompt(section);
        MachineReply {
            reply,
            options,
            state,
            intent: "order_browsing".to_string(),
        }
    }

    fn handle_browsing(&self, normalized: &str, state: OrderState) -> MachineReply {
        if has_keyword(normalized, BACK_KEYWORDS) {
            let (reply, options) = self.menu_prompt();
            return MachineReply {
                reply,
                options,
                state: state.reset_to_idle(),
                intent: "order_idle".to_string(),
            };
        }

        let section_idx = state.pending.as_ref().map(|p| p.section_idx);
        let section = match section_idx.and_then(|i| self.catalog.section(i)) {
            Some(section) => section,
            None => return self.soft_reset(state, "browsing without an open section"),
        };

        // Size markers are stripped before the item lookup so
        // "margherita kbira" and "margherita" hit the same item
        let (size_hint, rest) = extract_size(normalized);

        if let Some((item_idx, item)) = section.find_item(&rest) {
            let item_name = item.name.clone();
            let dual = item.price.is_dual();
            let ask_size = dual && size_hint.is_none();

            let mut state = state;
            if let Some(pending) = state.pending.as_mut() {
                pending.item_idx = Some(item_idx);
                if dual {
                    pending.size = size_hint;
                }
            }

            if ask_size {
                state.phase = OrderPhase::AwaitSize;
                let (reply, options) = self.size_prompt(item);
                return MachineReply {
                    reply,
                    options,
                    state,
                    intent: "order_await_size".to_string(),
                };
            }

            state.phase = OrderPhase::AwaitQuantity;
            let (reply, options) = self.quantity_prompt(&item_name);
            return MachineReply {
                reply,
                options,
                state,
                intent: "order_await_quantity".to_string(),
            };
        }

        let (reply, options) = self.section_prompt(section);
        MachineReply {
            reply,
            options,
            state,
            intent: "order_browsing".to_string(),
        }
    }

    fn handle_await_size(&self, normalized: &str, state: OrderState) -> MachineReply {
        let item = match self.picked_item(&state) {
            Some(item) => item,
            None => return self.soft_reset(state, "size asked with no picked item"),
        };

        let (size, _) = extract_size(normalized);
        if let Some(size) = size {
            let item_name = item.name.clone();
            let mut state = state;
            if let Some(pending) = state.pending.as_mut() {
                pending.size = Some(size);
            }
            state.phase = OrderPhase::AwaitQuantity;
            let (reply, options) = self.quantity_prompt(&item_name);
            return MachineReply {
                reply,
                options,
                state,
                intent: "order_await_quantity".to_string(),
            };
        }

        let (reply, options) = self.size_prompt(item);
        MachineReply {
            reply,
            options,
            state,
            intent: "order_await_size".to_string(),
        }
    }

    fn handle_await_quantity(&self, normalized: &str, state: OrderState) -> MachineReply {
        let (section, item) = match self.picked_section_item(&state) {
            Some(pair) => pair,
            None => return self.soft_reset(state, "quantity asked with no picked item"),
        };

        if let Some(qty) = parse_quantity(normalized) {
            let mut state = state;
            if let Some(pending) = state.pending.as_mut() {
                pending.quantity = Some(qty);
            }

            if section.needs_sauce {
                state.phase = OrderPhase::AskSauce;
                let (reply, options) = self.sauce_prompt(sauce_list_for(section));
                return MachineReply {
                    reply,
                    options,
                    state,
                    intent: "order_ask_sauce".to_string(),
                };
            }
            if section.has_supplements() {
                state.phase = OrderPhase::AwaitExtras;
                let (reply, options) = self.extras_prompt(section);
                return MachineReply {
                    reply,
                    options,
                    state,
                    intent: "order_await_extras".to_string(),
                };
            }
            return self.commit(state, vec![]);
        }

        let (reply, options) = self.quantity_prompt(&item.name);
        MachineReply {
            reply,
            options,
            state,
            intent: "order_await_quantity".to_string(),
        }
    }

    fn handle_ask_sauce(&self, normalized: &str, state: OrderState) -> MachineReply {
        let section = match self.picked_section_item(&state) {
            Some((section, _)) => section,
            None => return self.soft_reset(state, "sauce asked with no picked item"),
        };
        let sauces = sauce_list_for(section);

        let matched = sauces
            .iter()
            .find(|s| !normalized.is_empty() && (normalized.contains(**s) || s.contains(normalized)));

        if let Some(sauce) = matched {
            let mut state = state;
            if let Some(pending) = state.pending.as_mut() {
                pending.sauce = Some(sauce.to_string());
            }

            if section.has_supplements() {
                state.phase = OrderPhase::AwaitExtras;
                let (reply, options) = self.extras_prompt(section);
                return MachineReply {
                    reply,
                    options,
                    state,
                    intent: "order_await_extras".to_string(),
                };
            }
            return self.commit(state, vec![]);
        }

        let (reply, options) = self.sauce_prompt(sauces);
        MachineReply {
            reply,
            options,
            state,
            intent: "order_ask_sauce".to_string(),
        }
    }

    fn handle_await_extras(&self, normalized: &str, state: OrderState) -> MachineReply {
        let section = match self.picked_section_item(&state) {
            Some((section, _)) => section,
            None => return self.soft_reset(state, "extras asked with no picked item"),
        };

        if has_keyword(normalized, NO_KEYWORDS) {
            return self.commit(state, vec![]);
        }

        let matched: Vec<ChosenExtra> = section
            .supplements
            .iter()
            .filter(|s| {
                let name = s.name.to_lowercase();
                !normalized.is_empty()
                    && (normalized.contains(name.as_str()) || name.contains(normalized))
            })
            .map(|s| ChosenExtra::new(s.name.clone(), s.unit_price))
            .collect();

        if !matched.is_empty() {
            return self.commit(state, matched);
        }

        // A bare "yes" is recognized but incomplete: list the extras again
        let (reply, options) = self.extras_prompt(section);
        MachineReply {
            reply,
            options,
            state,
            intent: "order_await_extras".to_string(),
        }
    }

    fn handle_cart_actions(&self, normalized: &str, state: OrderState) -> MachineReply {
        if has_keyword(normalized, ADD_MORE_KEYWORDS) {
            let (reply, options) = self.menu_prompt();
            return MachineReply {
                reply: format!("Wakha! {}", reply),
                options,
                state: state.reset_to_idle(),
                intent: "order_idle".to_string(),
            };
        }

        if has_keyword(normalized, REMOVE_KEYWORDS) {
            let mut state = state;
            if let Some(line) = state.cart.remove_last() {
                tracing::debug!(item = %line.item_name, "cart line removed");
            }
            if state.cart.is_empty() {
                let (reply, options) = self.menu_prompt();
                return MachineReply {
                    reply: format!("7iyednaha, l panier khawi daba. {}", reply),
                    options,
                    state: state.reset_to_idle(),
                    intent: "order_idle".to_string(),
                };
            }
            let (reply, options) = self.cart_prompt(&state);
            return MachineReply {
                reply: format!("7iyedna l akhira. {}", reply),
                options,
                state,
                intent: "order_cart_actions".to_string(),
            };
        }

        if has_keyword(normalized, FINISH_KEYWORDS) {
            let mut state = state;
            state.phase = OrderPhase::DeliveryMethod;
            let (reply, options) = self.delivery_method_prompt();
            return MachineReply {
                reply,
                options,
                state,
                intent: "order_delivery_method".to_string(),
            };
        }

        let (reply, options) = self.cart_prompt(&state);
        MachineReply {
            reply,
            options,
            state,
            intent: "order_cart_actions".to_string(),
        }
    }

    fn handle_delivery_method(&self, normalized: &str, state: OrderState) -> MachineReply {
        if has_keyword(normalized, DELIVERY_KEYWORDS) {
            let mut state = state;
            state.customer.delivery = Some(DeliveryMethod::Delivery);

            // A caller-supplied distance fix skips the tier question
            if let Some(km) = state.customer.distance_km {
                let tier = DistanceTier::from_km(km);
                state.customer.distance_tier = Some(tier);
                state.phase = OrderPhase::Address;
                let fee = self.settings.delivery_fees.for_tier(tier);
                return MachineReply {
                    reply: format!(
                        "Nta 3la {} ({} {}). {}",
                        tier.label(),
                        fmt_amount(fee),
                        self.settings.currency,
                        self.address_prompt().0
                    ),
                    options: vec![],
                    state,
                    intent: "order_address".to_string(),
                };
            }

            state.phase = OrderPhase::DeliveryDistance;
            let (reply, options) = self.distance_prompt();
            return MachineReply {
                reply,
                options,
                state,
                intent: "order_delivery_distance".to_string(),
            };
        }

        if has_keyword(normalized, PICKUP_KEYWORDS) {
            let mut state = state;
            state.customer.delivery = Some(DeliveryMethod::Pickup);
            state.phase = OrderPhase::Payment;
            let (reply, options) = self.payment_prompt();
            return MachineReply {
                reply,
                options,
                state,
                intent: "order_payment".to_string(),
            };
        }

        let (reply, options) = self.delivery_method_prompt();
        MachineReply {
            reply,
            options,
            state,
            intent: "order_delivery_method".to_string(),
        }
    }

    fn handle_delivery_distance(&self, normalized: &str, state: OrderState) -> MachineReply {
        let tier = if has_keyword(normalized, &["1"]) || has_keyword(normalized, NEAR_KEYWORDS) {
            Some(DistanceTier::Near)
        } else if has_keyword(normalized, &["2"]) || has_keyword(normalized, MID_KEYWORDS) {
            Some(DistanceTier::Mid)
        } else if has_keyword(normalized, &["3"]) || has_keyword(normalized, FAR_KEYWORDS) {
            Some(DistanceTier::Far)
        } else {
            None
        };

        if let Some(tier) = tier {
            let mut state = state;
            state.customer.distance_tier = Some(tier);
            state.phase = OrderPhase::Address;
            let (reply, options) = self.address_prompt();
            return MachineReply {
                reply,
                options,
                state,
                intent: "order_address".to_string(),
            };
        }

        let (reply, options) = self.distance_prompt();
        MachineReply {
            reply,
            options,
            state,
            intent: "order_delivery_distance".to_string(),
        }
    }

    fn handle_address(&self, raw: &str, state: OrderState) -> MachineReply {
        let address = raw.trim();
        if address.is_empty() {
            let (reply, options) = self.address_prompt();
            return MachineReply {
                reply,
                options,
                state,
                intent: "order_address".to_string(),
            };
        }

        let mut state = state;
        state.customer.address = Some(address.to_string());
        state.phase = OrderPhase::Payment;
        let (reply, options) = self.payment_prompt();
        MachineReply {
            reply,
            options,
            state,
            intent: "order_payment".to_string(),
        }
    }

    fn handle_payment(&self, normalized: &str, state: OrderState) -> MachineReply {
        let payment = if has_keyword(normalized, CASH_KEYWORDS) {
            Some(PaymentMethod::Cash)
        } else if has_keyword(normalized, CARD_KEYWORDS) {
            Some(PaymentMethod::Card)
        } else {
            None
        };

        if let Some(payment) = payment {
            let mut state = state;
            state.customer.payment = Some(payment);

            let summary = render_summary(&state.cart, &state.customer, self.settings);
            let link = build_deep_link(&self.settings.phone_number, &summary);
            tracing::debug!(
                lines = state.cart.len(),
                total = state.cart.total(),
                "order finalized"
            );

            return MachineReply {
                reply: format!(
                    "{}\nSifet lina la commande b click wa7d:\n{}\nChokran bzaf! 🙏",
                    summary, link
                ),
                options: self.catalog.titles(),
                state: OrderState::idle(),
                intent: "order_finalized".to_string(),
            };
        }

        let (reply, options) = self.payment_prompt();
        MachineReply {
            reply,
            options,
            state,
            intent: "order_payment".to_string(),
        }
    }

    // --- commit ---

    fn commit(&self, mut state: OrderState, extras: Vec<ChosenExtra>) -> MachineReply {
        let pending = match state.pending.take() {
            Some(p) => p,
            None => return self.soft_reset(state, "commit with no pending selection"),
        };
        let picked = self.catalog.section(pending.section_idx).and_then(|s| {
            pending
                .item_idx
                .and_then(|i| s.items.get(i))
                .map(|item| (s, item))
        });
        let (section, item) = match picked {
            Some(pair) => pair,
            None => return self.soft_reset(state, "commit with out-of-range selection"),
        };

        let qty = pending.quantity.unwrap_or(1);
        let base = item.price.resolve(pending.size);
        let line = CartLine::new(
            section.title.clone(),
            item.name.clone(),
            qty,
            pending.size,
            pending.sauce.clone(),
            extras,
            base,
        );
        tracing::debug!(
            item = %line.item_name,
            qty = line.quantity,
            line_total = line.line_total,
            "cart line committed"
        );

        let line_text = format!(
            "Zdna: {}x {} — {} {}",
            line.quantity,
            line.item_name,
            fmt_amount(line.line_total),
            self.settings.currency
        );
        state.cart.push(line);
        state.phase = OrderPhase::CartActions;

        let (prompt, options) = self.cart_prompt(&state);
        MachineReply {
            reply: format!("{}\n{}", line_text, prompt),
            options,
            state,
            intent: "order_cart_actions".to_string(),
        }
    }

    // --- lookups ---

    fn picked_section_item(&self, state: &OrderState) -> Option<(&CatalogSection, &CatalogItem)> {
        let pending = state.pending.as_ref()?;
        let section = self.catalog.section(pending.section_idx)?;
        let item = section.items.get(pending.item_idx?)?;
        Some((section, item))
    }

    fn picked_item(&self, state: &OrderState) -> Option<&CatalogItem> {
        self.picked_section_item(state).map(|(_, item)| item)
    }

    fn soft_reset(&self, state: OrderState, reason: &str) -> MachineReply {
        tracing::warn!(reason, "pending selection lost, soft reset to idle");
        let (reply, options) = self.menu_prompt();
        MachineReply {
            reply,
            options,
            state: state.reset_to_idle(),
            intent: "order_idle".to_string(),
        }
    }

    // --- prompts ---

    fn menu_prompt(&self) -> (String, Vec<String>) {
        let titles = self.catalog.titles();
        (
            format!(
                "Ach bghiti takol? Hak l menu dyalna:\n• {}",
                titles.join("\n• ")
            ),
            titles,
        )
    }

    fn item_listing(&self, section: &CatalogSection) -> String {
        section
            .items
            .iter()
            .map(|item| match item.price {
                ItemPrice::Single(p) => {
                    format!("• {} — {} {}", item.name, fmt_amount(p), self.settings.currency)
                }
                ItemPrice::Dual { small, large } => format!(
                    "• {} — {} / {} {}",
                    item.name,
                    fmt_amount(small),
                    fmt_amount(large),
                    self.settings.currency
                ),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn section_prompt(&self, section: &CatalogSection) -> (String, Vec<String>) {
        let mut reply = format!("{}:\n{}", section.title, self.item_listing(section));
        if let Some(note) = &section.note {
            reply.push_str(&format!("\nℹ️ {}", note));
        }
        reply.push_str("\nAch mn wa7da bghiti?");
        let options = section.items.iter().map(|i| i.name.clone()).collect();
        (reply, options)
    }

    fn size_prompt(&self, item: &CatalogItem) -> (String, Vec<String>) {
        let reply = match item.price {
            ItemPrice::Dual { small, large } => format!(
                "{}: sghira ({} {}) wla kbira ({} {})?",
                item.name,
                fmt_amount(small),
                self.settings.currency,
                fmt_amount(large),
                self.settings.currency
            ),
            _ => format!("{}: sghira wla kbira?", item.name),
        };
        (reply, vec!["Sghira".to_string(), "Kbira".to_string()])
    }

    fn quantity_prompt(&self, item_name: &str) -> (String, Vec<String>) {
        (
            format!("Ch7al bghiti mn {}?", item_name),
            vec![
                "1".to_string(),
                "2".to_string(),
                "3".to_string(),
                "4".to_string(),
            ],
        )
    }

    fn sauce_prompt(&self, sauces: &[&str]) -> (String, Vec<String>) {
        (
            format!("Ach mn sauce bghiti? ({})", sauces.join(", ")),
            sauces.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn extras_prompt(&self, section: &CatalogSection) -> (String, Vec<String>) {
        let listing = section
            .supplements
            .iter()
            .map(|s| {
                format!(
                    "{} ({} {})",
                    s.name,
                    fmt_amount(s.unit_price),
                    self.settings.currency
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        let mut options: Vec<String> = section.supplements.iter().map(|s| s.name.clone()).collect();
        options.push("La, safi".to_string());
        (format!("Bghiti chi extra? {}", listing), options)
    }

    fn cart_prompt(&self, state: &OrderState) -> (String, Vec<String>) {
        (
            format!(
                "Total dyal l panier: {} {} ({} articles). Bghiti tzid chi 7aja wla salina?",
                fmt_amount(state.cart.total()),
                self.settings.currency,
                state.cart.len()
            ),
            vec![
                "Zid 7aja okhra".to_string(),
                "Salina".to_string(),
                "7iyed l akhira".to_string(),
            ],
        )
    }

    fn delivery_method_prompt(&self) -> (String, Vec<String>) {
        (
            "Livraison wla pickup mn l magasin?".to_string(),
            vec!["Livraison".to_string(), "Pickup".to_string()],
        )
    }

    fn distance_prompt(&self) -> (String, Vec<String>) {
        let options: Vec<String> = DistanceTier::ALL
            .iter()
            .enumerate()
            .map(|(i, tier)| {
                format!(
                    "{}. {} ({} {})",
                    i + 1,
                    tier.label(),
                    fmt_amount(self.settings.delivery_fees.for_tier(*tier)),
                    self.settings.currency
                )
            })
            .collect();
        (
            format!("Ch7al b3id 3lina? Khtar:\n{}", options.join("\n")),
            options,
        )
    }

    fn address_prompt(&self) -> (String, Vec<String>) {
        ("3tina l adresse dyalek kamla:".to_string(), vec![])
    }

    fn payment_prompt(&self) -> (String, Vec<String>) {
        (
            "Kifach bghiti tkhelless? Cash wla carte?".to_string(),
            vec!["Cash".to_string(), "Carte".to_string()],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snackbot_config::default_catalog;
    use snackbot_core::SizeChoice;

    fn machine_parts() -> (Catalog, EngineSettings) {
        (default_catalog(), EngineSettings::default())
    }

    fn step(
        catalog: &Catalog,
        settings: &EngineSettings,
        input: &str,
        state: OrderState,
    ) -> MachineReply {
        let machine = OrderMachine::new(catalog, settings);
        let normalized = snackbot_nlu::normalize(input);
        machine.handle(input, &normalized, state)
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("2"), Some(2));
        assert_eq!(parse_quantity("bghit juj"), Some(2));
        assert_eq!(parse_quantity("تلاتة"), Some(3));
        assert_eq!(parse_quantity("bezaf"), None);
        assert_eq!(parse_quantity("0"), None);
    }

    #[test]
    fn test_sauce_list_dispatch() {
        let (catalog, _) = machine_parts();
        let plats = catalog.section_by_id("plats").unwrap();
        let tacos = catalog.section_by_id("tacos").unwrap();
        assert_eq!(sauce_list_for(plats), DISH_SAUCES);
        assert_eq!(sauce_list_for(tacos), TACOS_SAUCES);
    }

    #[test]
    fn test_idle_opens_section() {
        let (catalog, settings) = machine_parts();
        let out = step(&catalog, &settings, "pizza", OrderState::idle());
        assert_eq!(out.state.phase, OrderPhase::Browsing);
        assert!(out.options.contains(&"Margherita".to_string()));
        assert!(out.reply.contains("Margherita"));
    }

    #[test]
    fn test_idle_unrecognized_reprompts() {
        let (catalog, settings) = machine_parts();
        let out = step(&catalog, &settings, "blablabla", OrderState::idle());
        assert_eq!(out.state.phase, OrderPhase::Idle);
        assert!(out.options.contains(&"Pizza".to_string()));
    }

    #[test]
    fn test_empty_catalog_is_graceful() {
        let settings = EngineSettings::default();
        let catalog = Catalog::default();
        let out = step(&catalog, &settings, "pizza", OrderState::idle());
        assert_eq!(out.intent, "order_no_menu");
        assert_eq!(out.state.phase, OrderPhase::Idle);
    }

    #[test]
    fn test_dual_price_item_asks_size() {
        let (catalog, settings) = machine_parts();
        let out = step(&catalog, &settings, "pizza", OrderState::idle());
        let out = step(&catalog, &settings, "Margherita", out.state);
        assert_eq!(out.state.phase, OrderPhase::AwaitSize);
        assert!(out.options.contains(&"Kbira".to_string()));
    }

    #[test]
    fn test_size_in_same_utterance_skips_size_phase() {
        let (catalog, settings) = machine_parts();
        let out = step(&catalog, &settings, "pizza", OrderState::idle());
        let out = step(&catalog, &settings, "margherita kbira", out.state);
        assert_eq!(out.state.phase, OrderPhase::AwaitQuantity);
        assert_eq!(
            out.state.pending.as_ref().unwrap().size,
            Some(SizeChoice::Large)
        );
    }

    #[test]
    fn test_single_price_item_skips_size() {
        let (catalog, settings) = machine_parts();
        let out = step(&catalog, &settings, "tacos", OrderState::idle());
        let out = step(&catalog, &settings, "tacos poulet", out.state);
        assert_eq!(out.state.phase, OrderPhase::AwaitQuantity);
    }

    #[test]
    fn test_sauce_section_asks_sauce_after_quantity() {
        let (catalog, settings) = machine_parts();
        let out = step(&catalog, &settings, "tacos", OrderState::idle());
        let out = step(&catalog, &settings, "tacos poulet", out.state);
        let out = step(&catalog, &settings, "2", out.state);
        assert_eq!(out.state.phase, OrderPhase::AskSauce);
        assert!(out.reply.contains("algerienne"));
    }

    #[test]
    fn test_drinks_commit_straight_after_quantity() {
        let (catalog, settings) = machine_parts();
        let out = step(&catalog, &settings, "boissons", OrderState::idle());
        let out = step(&catalog, &settings, "coca", out.state);
        let out = step(&catalog, &settings, "2", out.state);
        assert_eq!(out.state.phase, OrderPhase::CartActions);
        assert_eq!(out.state.cart.len(), 1);
        assert_eq!(out.state.cart.lines[0].line_total, 14.0);
        assert!(out.state.pending.is_none());
    }

    #[test]
    fn test_extras_no_commits_without_extras() {
        let (catalog, settings) = machine_parts();
        let out = step(&catalog, &settings, "pizza", OrderState::idle());
        let out = step(&catalog, &settings, "margherita kbira", out.state);
        let out = step(&catalog, &settings, "2", out.state);
        assert_eq!(out.state.phase, OrderPhase::AwaitExtras);
        let out = step(&catalog, &settings, "la", out.state);

        assert_eq!(out.state.phase, OrderPhase::CartActions);
        let line = &out.state.cart.lines[0];
        assert_eq!(line.unit_price, 50.0);
        assert_eq!(line.line_total, 100.0);
        assert!(line.extras.is_empty());
    }

    #[test]
    fn test_named_extras_commit_with_them() {
        let (catalog, settings) = machine_parts();
        let out = step(&catalog, &settings, "pizza", OrderState::idle());
        let out = step(&catalog, &settings, "pepperoni sghira", out.state);
        let out = step(&catalog, &settings, "1", out.state);
        let out = step(&catalog, &settings, "extra cheese w olives", out.state);

        let line = &out.state.cart.lines[0];
        assert_eq!(line.extras.len(), 2);
        // 35 base + 5 cheese + 2 olives
        assert_eq!(line.unit_price, 42.0);
    }

    #[test]
    fn test_bare_yes_reprompts_extras() {
        let (catalog, settings) = machine_parts();
        let out = step(&catalog, &settings, "pizza", OrderState::idle());
        let out = step(&catalog, &settings, "margherita kbira", out.state);
        let out = step(&catalog, &settings, "1", out.state);
        let before = out.state.clone();
        let out = step(&catalog, &settings, "wah", out.state);
        assert_eq!(out.state.phase, OrderPhase::AwaitExtras);
        assert_eq!(out.state.cart.len(), before.cart.len());
    }

    #[test]
    fn test_unparseable_input_never_advances() {
        let (catalog, settings) = machine_parts();
        let out = step(&catalog, &settings, "pizza", OrderState::idle());
        let out = step(&catalog, &settings, "margherita", out.state);

        let before = out.state.clone();
        let first = step(&catalog, &settings, "zzz qqq", out.state);
        assert_eq!(first.state, before);

        let second = step(&catalog, &settings, "zzz qqq", first.state);
        assert_eq!(second.state, before);
        assert_eq!(second.reply, first.reply);
        assert_eq!(second.options, first.options);
    }

    #[test]
    fn test_cart_remove_round_trip() {
        let (catalog, settings) = machine_parts();
        let out = step(&catalog, &settings, "boissons", OrderState::idle());
        let out = step(&catalog, &settings, "coca", out.state);
        let out = step(&catalog, &settings, "1", out.state);
        assert_eq!(out.state.cart.len(), 1);

        let out = step(&catalog, &settings, "7iyed", out.state);
        assert!(out.state.cart.is_empty());
        assert_eq!(out.state.phase, OrderPhase::Idle);
    }

    #[test]
    fn test_corrupted_pending_soft_resets() {
        let (catalog, settings) = machine_parts();
        let mut state = OrderState::idle();
        state.phase = OrderPhase::AwaitQuantity;
        state.pending = None;

        let out = step(&catalog, &settings, "2", state);
        assert_eq!(out.state.phase, OrderPhase::Idle);
        assert!(out.state.pending.is_none());
    }

    #[test]
    fn test_out_of_range_pending_soft_resets() {
        let (catalog, settings) = machine_parts();
        let mut state = OrderState::idle();
        state.phase = OrderPhase::Browsing;
        state.pending = Some(PendingSelection::browsing(99));

        let out = step(&catalog, &settings, "margherita", state);
        assert_eq!(out.state.phase, OrderPhase::Idle);
    }

    #[test]
    fn test_distance_fix_skips_tier_question() {
        let (catalog, settings) = machine_parts();
        let out = step(&catalog, &settings, "boissons", OrderState::idle());
        let out = step(&catalog, &settings, "eau", out.state);
        let out = step(&catalog, &settings, "1", out.state);

        let mut state = out.state;
        state.customer.distance_km = Some(3.0);
        let out = step(&catalog, &settings, "salina", state);
        assert_eq!(out.state.phase, OrderPhase::DeliveryMethod);

        let out = step(&catalog, &settings, "livraison", out.state);
        assert_eq!(out.state.phase, OrderPhase::Address);
        assert_eq!(out.state.customer.distance_tier, Some(DistanceTier::Mid));
    }

    #[test]
    fn test_pickup_skips_distance_and_address() {
        let (catalog, settings) = machine_parts();
        let out = step(&catalog, &settings, "boissons", OrderState::idle());
        let out = step(&catalog, &settings, "eau", out.state);
        let out = step(&catalog, &settings, "1", out.state);
        let out = step(&catalog, &settings, "salina", out.state);
        let out = step(&catalog, &settings, "pickup", out.state);
        assert_eq!(out.state.phase, OrderPhase::Payment);
        assert_eq!(out.state.customer.delivery, Some(DeliveryMethod::Pickup));
    }

    #[test]
    fn test_list_only_section_stays_idle() {
        let (catalog, settings) = machine_parts();
        let out = step(&catalog, &settings, "promotions", OrderState::idle());
        assert_eq!(out.state.phase, OrderPhase::Idle);
        assert_eq!(out.intent, "order_info");
        assert!(out.reply.contains("Family Deal"));
    }
}
