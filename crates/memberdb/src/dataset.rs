//! Loading the member dataset
use anyhow::{Context, Result};
use page::fetch::{fetch_text, Fetch};
use page::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::DatasetError;
use crate::model::MemberRecord;

/// The published dataset, either a bare member list or an object wrapping one.
///
/// An object without a `members` list holds no members.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberDataset {
    List(Vec<MemberRecord>),
    Wrapped { members: Option<Vec<MemberRecord>> },
}

fn malformed(why: impl std::fmt::Display) -> DatasetError {
    DatasetError::Malformed(why.to_string())
}

impl MemberDataset {
    /// Parse a dataset document.
    /// ```
    /// use memberdb::dataset::MemberDataset;
    ///
    /// let bare = MemberDataset::parse(r#"[{"nickname":"Foo"}]"#).unwrap();
    /// let wrapped = MemberDataset::parse(r#"{"members":[{"nickname":"Foo"}]}"#).unwrap();
    /// assert_eq!(bare.into_members(), wrapped.into_members());
    /// ```
    ///
    /// # Errors
    /// Returns [`DatasetError::Malformed`] if the document isn't JSON of either shape, or if one
    /// of the listed members isn't an object.
    pub fn parse(json: &str) -> Result<Self, DatasetError> {
        let document: Value = serde_json::from_str(json).map_err(malformed)?;
        match document {
            list @ Value::Array(_) => Vec::<MemberRecord>::deserialize(list).map(Self::List).map_err(malformed),
            Value::Object(mut wrapper) => match wrapper.remove("members") {
                None | Some(Value::Null) => Ok(Self::Wrapped { members: None }),
                Some(list @ Value::Array(_)) => Vec::<MemberRecord>::deserialize(list)
                    .map(|members| Self::Wrapped { members: Some(members) })
                    .map_err(malformed),
                Some(other) => Err(malformed(format!("expected a member list under \"members\", found {}", other))),
            },
            other => Err(malformed(format!("expected a member list, found {}", other))),
        }
    }

    /// Take the members out, in published order
    pub fn into_members(self) -> Vec<MemberRecord> {
        match self {
            Self::List(members) => members,
            Self::Wrapped { members } => members.unwrap_or_default(),
        }
    }
}

/// Fetch and parse the dataset at `url`.
///
/// # Errors
/// Returns the fetch error if the dataset can't be fetched or didn't answer 2xx, and
/// [`DatasetError::Malformed`] if it can't be parsed.
pub async fn fetch_members(fetcher: &dyn Fetch, url: &Url) -> Result<Vec<MemberRecord>> {
    let body = fetch_text(fetcher, url).await.context("Failed to fetch member dataset")?;
    let members = MemberDataset::parse(&body)
        .with_context(|| format!("Failed to read member dataset from '{}'", url))?
        .into_members();
    info!("Loaded {} members from '{}'", members.len(), url);
    Ok(members)
}
