//! Ingestion pipeline stages.

pub mod bot_filter;
pub mod dedup_gate;
pub mod dispatcher;
pub mod enrichment;
pub mod identity;
pub mod user_agent;

pub use bot_filter::{BotFilter, UserAgentBotFilter};
pub use dedup_gate::{Admission, DEDUP_CAP, DEDUP_WINDOW, DedupGate};
pub use dispatcher::{Destination, DestinationOutcome, Dispatcher, WriteAck};
pub use enrichment::{GeoResolver, PlatformHeaderGeo, RequestEnricher};
pub use identity::IdentityResolver;
pub use user_agent::{UserAgentDetails, UserAgentParser};
