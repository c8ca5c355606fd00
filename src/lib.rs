//! eve-client is a terminal front-end for the EVE character-chat backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`api`] defines the backend payloads and the HTTP client that reads them.
//! - [`core`] owns configuration, character selection and the per-screen
//!   view state built on top of the client.
//! - [`cli`] parses arguments and renders each view as plain text.
//! - [`utils`] holds URL helpers and logging setup.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod utils;
