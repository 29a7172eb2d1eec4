// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` by the commands that
//! describe a mutation (`enqueue`, `send`).

use clap::Args;
use outbox_core::{Headers, Method, Mutation};

use crate::error::{Error, Result};

/// Description of an HTTP mutation on the command line.
#[derive(Args, Clone, Debug, Default)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS)
    pub method: String,

    /// Target URL, absolute or relative to base_url
    pub url: String,

    /// JSON request body
    #[arg(long, short = 'd', value_name = "JSON")]
    pub data: Option<String>,

    /// Request header as 'Name: value' (repeatable, replaces the JSON default)
    #[arg(long = "header", short = 'H', value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Tag naming the originating feature
    #[arg(long, short = 'f')]
    pub feature: Option<String>,
}

impl RequestArgs {
    /// Validate the arguments and build a mutation.
    pub fn to_mutation(&self) -> Result<Mutation> {
        let method: Method = self.method.parse()?;

        if self.url.trim().is_empty() {
            return Err(Error::InvalidUrl {
                url: self.url.clone(),
                reason: "cannot be empty".to_string(),
            });
        }

        let mut mutation = Mutation::new(method, self.url.trim());

        if let Some(data) = &self.data {
            let body: serde_json::Value =
                serde_json::from_str(data).map_err(|e| Error::InvalidBody(e.to_string()))?;
            mutation = mutation.with_body(body);
        }

        if !self.headers.is_empty() {
            mutation.headers = Some(parse_headers(&self.headers)?);
        }

        if let Some(feature) = &self.feature {
            mutation = mutation.with_feature(feature.clone());
        }

        Ok(mutation)
    }
}

/// Parse `Name: value` header strings.
pub fn parse_headers(raw: &[String]) -> Result<Headers> {
    let mut headers = Headers::new();
    for header in raw {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| Error::InvalidHeader(header.clone()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidHeader(header.clone()));
        }
        headers.insert(name.to_string(), value.trim().to_string());
    }
    Ok(headers)
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
