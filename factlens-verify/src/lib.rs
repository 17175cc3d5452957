//! Client for the remote fact-checking service.
//!
//! The service exposes a single operation: `POST /verify` with a free-text
//! body, answered by an ordered list of verdict records. Everything
//! algorithmic (claim extraction, evidence retrieval, scoring) lives behind
//! that endpoint; this crate only speaks its wire format.

mod client;
mod types;

pub use client::VerifyApi;
pub use factlens_http::HttpError;
pub use types::{Verdict, VerifyRequest};
