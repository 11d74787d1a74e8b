//! # xjcp-core
//!
//! Protocol vocabulary for the XJCP messaging protocol.
//!
//! XJCP is an asynchronous request/response protocol over HTTP+JSON: each
//! request is a single JSON envelope carrying the session id and one
//! operation, and each response may carry the operation's result plus a
//! list of server-pushed events.
//!
//! This crate provides the shared vocabulary used by the client engine:
//!
//! - **Commands**: [`command::Command`] and [`command::Op`] — the named
//!   operations and their payloads
//! - **Envelope codec**: [`envelope::encode_request`] and
//!   [`envelope::ResponseEnvelope`]
//! - **Events**: [`event::Event`] — server-pushed notifications
//! - **Records**: [`records::Conversation`], [`records::Contact`],
//!   [`records::ChatHistory`] domain payloads
//! - **Errors**: [`error::EnvelopeError`]
//!
//! ## Crate Position
//!
//! Foundation crate. No async machinery; depended on by `xjcp-client`.

#![deny(unsafe_code)]

pub mod command;
pub mod envelope;
pub mod error;
pub mod event;
pub mod records;
