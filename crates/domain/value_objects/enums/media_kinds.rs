use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Gallery,
    InvestorDocument,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Gallery => "gallery",
            MediaKind::InvestorDocument => "investor_document",
        }
    }

    /// Object key prefix inside the media bucket.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            MediaKind::Gallery => "gallery",
            MediaKind::InvestorDocument => "documents",
        }
    }

    /// Investor documents are only listed to signed-in users.
    pub fn requires_auth(&self) -> bool {
        matches!(self, MediaKind::InvestorDocument)
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
