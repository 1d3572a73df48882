//! Lenient field decoders for server payloads.
//!
//! The backend is loose about types: numbers show up where strings are
//! expected, lists arrive as comma-separated text, and any field may be
//! `null`. These helpers fold all of that into the plain types the model uses.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer};

use crate::CandidateStatus;

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Scalar(Scalar),
    List(Vec<Option<Scalar>>),
}

fn list_items(items: Vec<Option<Scalar>>) -> impl Iterator<Item = String> {
    items
        .into_iter()
        .flatten()
        .map(Scalar::into_string)
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
}

fn split_commas(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Any scalar becomes its string form; a list is joined with `", "`.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Loose> = Option::deserialize(deserializer)?;
    Ok(match raw {
        None => String::new(),
        Some(Loose::Scalar(scalar)) => scalar.into_string(),
        Some(Loose::List(items)) => list_items(items).collect::<Vec<_>>().join(", "),
    })
}

/// A list keeps its order; text is split on commas.
pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Loose> = Option::deserialize(deserializer)?;
    Ok(match raw {
        None => Vec::new(),
        Some(Loose::Scalar(scalar)) => split_commas(&scalar.into_string()),
        Some(Loose::List(items)) => list_items(items).collect(),
    })
}

pub(crate) fn string_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    string_list(deserializer).map(|items| items.into_iter().collect())
}

pub(crate) fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Scalar::Float(f)) if f.is_finite() => f,
        Some(Scalar::Int(n)) => n as f64,
        Some(Scalar::Text(text)) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Unknown, empty, and `null` statuses all read as unset.
pub(crate) fn lenient_status<'de, D>(deserializer: D) -> Result<Option<CandidateStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(Scalar::into_string)
        .as_deref()
        .and_then(CandidateStatus::parse))
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
