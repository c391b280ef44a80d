//! Nozomi Core - Shared types for the nozomi Slack webhook.
//!
//! This crate provides the types that flow through a single webhook
//! invocation:
//! - [`InboundRequest`] - what the hosting layer hands us
//! - [`DecodedFields`] - the form-encoded body, decoded
//! - [`CommandInvocation`] - the `/nozomi <keyword> <rest>` view of those fields
//! - [`Reply`] - what a handler produced, and its Block Kit rendering
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no clocks. Signature verification and dispatch live in
//! `nozomi-webhook`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
