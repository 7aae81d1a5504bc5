//! Utility functions shared by the event builders and the enricher.
//!
//! - [`click_id`] - Click id generation and validation
//! - [`referer`] - Referer header normalization

pub mod click_id;
pub mod referer;
