//! Minimal wrapper around the verification endpoint with Factlens defaults.
//!
//! One request shape, one response shape, no retries: a failed call is
//! reported to the view, which keeps whatever results it already had.

use crate::types::{Verdict, VerifyRequest};
use factlens_http::{HttpClient, HttpError};

#[derive(Clone)]
pub struct VerifyApi {
    http: HttpClient,
}

impl VerifyApi {
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        let http = HttpClient::new(base_url)?;
        Ok(Self { http })
    }

    /// Submit a text blob for verification and return the verdicts in
    /// response order.
    pub async fn verify(&self, text: &str) -> Result<Vec<Verdict>, HttpError> {
        let req = VerifyRequest { text: text.into() };
        let verdicts: Vec<Verdict> = self.http.post_json("verify", &req).await?;
        tracing::debug!(count = verdicts.len(), "verify response");
        Ok(verdicts)
    }
}
