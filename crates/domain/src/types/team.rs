//! Team DTO

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub join_code: Option<String>,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub is_owner: bool,
}
