//! Shape normalization for list responses.
//!
//! The backend answers list endpoints either with a bare array or with an
//! object wrapping the array under a named key. Anything else is treated as an
//! empty list.

use std::collections::HashSet;

use dashboard_core::{CandidateMatchRecord, Job};
use dashboard_logging::{dash_debug, dash_warn, mask_email};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const MATCHES_KEY: &str = "matches";
pub const JOBS_KEY: &str = "jobs";

/// Extracts the list from `body`, decoding each element on its own.
/// Elements that fail to decode are skipped.
pub fn normalize_list<T: DeserializeOwned>(body: Value, key: &str) -> Vec<T> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            other => {
                dash_debug!(
                    "Response object has no `{key}` array (found {}); using empty list",
                    describe(other.as_ref())
                );
                Vec::new()
            }
        },
        other => {
            dash_debug!(
                "Unexpected response shape {}; using empty list",
                describe(Some(&other))
            );
            Vec::new()
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<T>(item) {
            Ok(value) => Some(value),
            Err(err) => {
                dash_warn!("Skipping malformed `{key}` element {index}: {err}");
                None
            }
        })
        .collect()
}

/// Match records keyed by email; a repeated email keeps its first record.
pub fn normalize_matches(body: Value) -> Vec<CandidateMatchRecord> {
    let mut seen = HashSet::new();
    normalize_list::<CandidateMatchRecord>(body, MATCHES_KEY)
        .into_iter()
        .filter(|record| {
            let email = record.email();
            if email.is_empty() || seen.insert(email.to_string()) {
                true
            } else {
                dash_warn!("Dropping duplicate record for {}", mask_email(email));
                false
            }
        })
        .collect()
}

pub fn normalize_jobs(body: Value) -> Vec<Job> {
    let mut seen = HashSet::new();
    normalize_list::<Job>(body, JOBS_KEY)
        .into_iter()
        .filter(|job| {
            if job.id.is_empty() || seen.insert(job.id.clone()) {
                true
            } else {
                dash_warn!("Dropping duplicate job {}", job.id);
                false
            }
        })
        .collect()
}

fn describe(value: Option<&Value>) -> &'static str {
    match value {
        None | Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "bool",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}
