//! Types with the information the UI shows.
//!
//! Everything is already formatted as strings so that the UI doesn't have to bother with that.
use compact_str::{CompactString, ToCompactString};
use serde::{Deserialize, Serialize};

use super::Model;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewModel {
    /// The status of the location permissions, e.g. "Granted".
    pub permission: CompactString,
    /// Identifiers of the monitored regions, sorted.
    pub monitored: Vec<CompactString>,
    /// A message to the user. May be empty.
    pub msg: CompactString,
}

impl ViewModel {
    pub fn make(model: &Model) -> Self {
        Self {
            permission: model.permission.to_compact_string(),
            monitored: model
                .monitored
                .iter()
                .map(|id| id.as_str().into())
                .collect(),
            msg: model.msg.clone(),
        }
    }
}
