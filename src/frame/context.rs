//! Context the frame host hands to the app on launch

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Host-supplied launch context; every field may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameContext {
    #[serde(default)]
    pub user: Option<FrameUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameUser {
    #[serde(default)]
    pub fid: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
}

impl FrameContext {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Social username, when the host knows one
    pub fn username(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.username.as_deref())
            .filter(|u| !u.is_empty())
    }

    pub fn fid(&self) -> Option<u64> {
        self.user.as_ref().and_then(|u| u.fid)
    }
}
