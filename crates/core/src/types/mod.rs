//! Core types for nozomi.
//!
//! This module provides the request, form, command and reply types shared by
//! the webhook and the CLI.

pub mod blocks;
pub mod command;
pub mod form;
pub mod reply;
pub mod request;

pub use blocks::{Accessory, Block, ResponseBody, ResponseEnvelope, ResponseType, Text};
pub use command::{CommandInvocation, split_first_space};
pub use form::{DecodedFields, decode};
pub use reply::{Button, Reply, ResponseKind};
pub use request::{InboundRequest, RequestKind, SIGNATURE_HEADER, TIMESTAMP_HEADER};
