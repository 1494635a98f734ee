//! Conversation session and request orchestration.
//!
//! - [`session`]: the ordered transcript plus session identity.
//! - [`parameters`]: parameter controls and request payload construction.
//! - [`affordance`]: input affordances (submit, processing, follow-ups, focus).
//! - [`orchestrator`]: drives one chat exchange at a time.
//! - [`persistence`]: save, list, load, delete and clear flows.
//! - [`controller`]: the command/dispatch facade used by the presentation layer.

pub mod affordance;
pub mod controller;
pub mod orchestrator;
pub mod parameters;
pub mod persistence;
pub mod session;

pub use affordance::{Focus, InputAffordances, InputSource};
pub use controller::ChatController;
pub use orchestrator::{ExchangeOutcome, RequestOrchestrator};
pub use parameters::ParameterControls;
pub use persistence::PersistenceCoordinator;
pub use session::SessionState;
