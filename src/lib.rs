// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) parses arguments and hands them to `cli::run`.
//
// Module responsibilities:
// - `api`: Talks to the secureshare web service (create a share link,
//   reveal a share link) using a short-lived cookie session per call.
// - `html`: Scrapes the pieces we need out of the service's HTML pages.
// - `cli`: Argument surface and the dispatch between create and reveal.
// - `ui`: Terminal concerns: spinner, password prompt, output.
// - `error`: The error kinds every operation can fail with.
pub mod api;
pub mod cli;
pub mod error;
pub mod html;
pub mod ui;

pub use error::{Result, ShareError};
