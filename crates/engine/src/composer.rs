//! Response composition
//!
//! Merges whichever subsystem handled the turn into the uniform
//! `{reply, options, state, intent}` envelope. Classifier-handled turns get
//! quick-reply options derived from the winning intent; guided-flow turns
//! pass the phase prompt's options through untouched.

use snackbot_config::EngineSettings;
use snackbot_core::{Catalog, OrderState, TurnResponse};
use snackbot_nlu::Classification;

use crate::machine::MachineReply;

/// Fallback when a group matched but carries no usable reply
const UNDERSTOOD_FALLBACK: &str = "Fhemtek, walakin ma3endich jwab wadh daba 😅 Chouf l menu!";

/// Wrap a guided-flow step into the turn envelope
pub fn compose_guided(step: MachineReply) -> TurnResponse {
    TurnResponse {
        reply: step.reply,
        options: step.options,
        state: step.state,
        intent: step.intent,
    }
}

/// Wrap a classifier win into the turn envelope
///
/// `reply` is the classifier's selected reply, if the group carried one.
/// State passes through unchanged; open chat never touches the cart.
pub fn compose_classified(
    classification: &Classification<'_>,
    reply: Option<String>,
    catalog: &Catalog,
    settings: &EngineSettings,
    state: OrderState,
) -> TurnResponse {
    let group = classification.group;

    let reply = reply.unwrap_or_else(|| UNDERSTOOD_FALLBACK.to_string());
    let options = options_for_intent(group.name.as_str(), catalog, settings);

    tracing::debug!(
        intent = %group.name,
        confidence = classification.confidence,
        "turn handled by classifier"
    );

    TurnResponse {
        reply,
        options,
        state,
        intent: group.name.clone(),
    }
}

/// Quick replies for a winning intent
///
/// A spicy preference suggests the spicy picks, a budget mood suggests the
/// promos; everything else points back at the menu entry points.
fn options_for_intent(name: &str, catalog: &Catalog, settings: &EngineSettings) -> Vec<String> {
    match name {
        "mood_spicy" => settings.spicy_suggestions.clone(),
        "mood_budget" => settings.promo_suggestions.clone(),
        _ => catalog.titles(),
    }
}
