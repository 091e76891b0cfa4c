use serde::{Deserialize, Serialize};

use super::null_as_default;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    /// Workspace the user last had open in the web app. Used when no
    /// workspace is configured explicitly.
    #[serde(default, deserialize_with = "null_as_default")]
    pub active_workspace: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub default_workspace: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
}
