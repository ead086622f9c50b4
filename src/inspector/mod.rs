//! Web inspector
//!
//! A small JSON HTTP API over a storage adapter, for looking at and cleaning
//! up what an application has stored. Local inspection only.

mod server;
mod handlers;

pub use server::{router, run_web_server};
pub use handlers::AppState;
