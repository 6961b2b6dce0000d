//! The turn-processing facade
//!
//! `OrderEngine` owns the catalog, the classifier and the settings, all
//! immutable after construction. Each call reads the caller's prior state
//! and returns a new one; there is no interior mutability, so one engine
//! serves any number of conversations.

use rand::rngs::ThreadRng;
use rand::Rng;

use snackbot_config::EngineSettings;
use snackbot_core::{Catalog, OrderState, TurnResponse};
use snackbot_nlu::{normalize, GroupTier, IntentClassifier, KnowledgeBase};

use crate::composer::{compose_classified, compose_guided};
use crate::machine::OrderMachine;

/// Confidence the classifier needs before it is allowed to answer;
/// anything below falls through to the guided flow.
const CONFIDENCE_THRESHOLD: f32 = 0.3;

/// The conversational ordering engine
pub struct OrderEngine {
    catalog: Catalog,
    classifier: IntentClassifier,
    settings: EngineSettings,
}

impl OrderEngine {
    pub fn new(catalog: Catalog, knowledge: KnowledgeBase, settings: EngineSettings) -> Self {
        Self {
            catalog,
            classifier: IntentClassifier::new(knowledge),
            settings,
        }
    }

    /// Engine over the built-in catalog, knowledge base and settings
    pub fn with_defaults() -> Self {
        let catalog = snackbot_config::default_catalog();
        let knowledge = KnowledgeBase::for_catalog(&catalog);
        Self::new(catalog, knowledge, EngineSettings::default())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Process one inbound message
    ///
    /// Variant replies draw from the thread RNG; use [`process_with_rng`]
    /// with a seeded RNG for deterministic tests.
    ///
    /// [`process_with_rng`]: OrderEngine::process_with_rng
    pub fn process(&self, raw_input: &str, prior: &OrderState) -> TurnResponse {
        let mut rng: ThreadRng = rand::thread_rng();
        self.process_with_rng(raw_input, prior, &mut rng)
    }

    /// Process one inbound message with an injected RNG
    ///
    /// Control flow: a guided phase owns the turn unconditionally so
    /// structured prompts ("enter your address") can't be stolen by the
    /// classifier. From idle the classifier answers first, and only below
    /// its confidence threshold does the guided flow's menu prompt take
    /// over.
    pub fn process_with_rng<R: Rng>(
        &self,
        raw_input: &str,
        prior: &OrderState,
        rng: &mut R,
    ) -> TurnResponse {
        let normalized = normalize(raw_input);
        let machine = OrderMachine::new(&self.catalog, &self.settings);

        if prior.phase.is_guided() {
            return compose_guided(machine.handle(raw_input, &normalized, prior.clone()));
        }

        if let Some(classification) = self.classifier.classify(&normalized) {
            if classification.confidence > CONFIDENCE_THRESHOLD {
                // A category win IS an order: the guided flow opens the
                // section, by id so aliases the text match would miss work
                if classification.group.tier == GroupTier::Category {
                    return compose_guided(
                        machine.open_section(classification.group.name.as_str(), prior.clone()),
                    );
                }
                let reply = self
                    .classifier
                    .select_reply(&classification, raw_input, rng);
                return compose_classified(
                    &classification,
                    reply,
                    &self.catalog,
                    &self.settings,
                    prior.clone(),
                );
            }
            tracing::debug!(
                intent = %classification.group.name,
                confidence = classification.confidence,
                "classification below threshold, falling through to guided flow"
            );
        }

        compose_guided(machine.handle(raw_input, &normalized, prior.clone()))
    }
}
