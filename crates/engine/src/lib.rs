//! Conversational ordering engine
//!
//! The deterministic order-taking state machine fused with the keyword
//! intent classifier. One inbound message becomes one synchronous call:
//!
//! ```
//! use snackbot_core::OrderState;
//! use snackbot_engine::OrderEngine;
//!
//! let engine = OrderEngine::with_defaults();
//! let response = engine.process("salam", &OrderState::idle());
//! assert!(!response.reply.is_empty());
//! ```
//!
//! A guided ordering phase always owns the turn; from idle the classifier
//! answers first and falls through to the guided menu prompt below its
//! confidence threshold. Every call returns a new state value; the caller
//! keeps it between turns.

pub mod composer;
pub mod engine;
pub mod machine;
pub mod summary;

pub use composer::{compose_classified, compose_guided};
pub use engine::OrderEngine;
pub use machine::{MachineReply, OrderMachine};
pub use summary::{build_deep_link, render_summary};
