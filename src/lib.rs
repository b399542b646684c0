//! Merchat is a terminal chat client for a product & supplier assistant
//! service.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation state machine, the append-only
//!   transcript, and the classification of response payloads into the three
//!   presentation shapes (plain text, table, comparison).
//! - [`api`] is the HTTP transport to the assistant's chat endpoint, behind
//!   a trait seam so the controller can be tested without a network.
//! - [`auth`] stores the session credential in the OS keyring.
//! - [`ui`] formats renderer views as line-oriented terminal output.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into the interactive chat
//! loop.

pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod ui;
