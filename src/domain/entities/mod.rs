//! Core domain entities consumed by the ingestion pipeline.
//!
//! Entities are plain data structures without business logic.
//!
//! # Entity Types
//!
//! - [`InboundRequest`] - The parts of a redirect request the pipeline reads
//! - [`IdentityToken`] - Hashed visitor identity, the dedup key
//! - [`Enrichment`] - Geo, device, software and referer context
//! - [`ClickInput`] / [`ConversionInput`] - Caller-supplied identifiers
//! - [`LinkSnapshot`] - Link catalog fields for metadata events
//! - [`DeploymentEnv`] - Injected deployment context

pub mod click;
pub mod deployment;
pub mod enrichment;
pub mod link;
pub mod request;

pub use click::{ClickInput, ConversionInput};
pub use deployment::DeploymentEnv;
pub use enrichment::{DEFAULT_DEVICE, DIRECT, Device, Enrichment, Geo, Referer, Software, UNKNOWN};
pub use link::LinkSnapshot;
pub use request::{IdentityToken, InboundRequest};
