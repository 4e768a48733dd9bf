//! API models

use serde::{Deserialize, Serialize};

/// Login request body (`POST /api/auth`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateRequest {
    pub username: String,
    pub password: String,
}

/// Login response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateResponse {
    pub jwt: String,
}

/// A stack environment variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVariable {
    pub name: String,
    pub value: String,
}

/// A stack as returned by `GET /api/stacks`
///
/// Portainer sends `"Env": null` for stacks without variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackData {
    #[serde(rename = "Id")]
    pub id: u64,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "EndpointId")]
    pub endpoint_id: u64,

    #[serde(rename = "Env", default)]
    pub env: Option<Vec<EnvVariable>>,
}

/// Query parameters of `POST /api/stacks/create/{kind}/{method}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStackParams {
    /// Stack type: 1 for swarm, 2 for standalone compose
    #[serde(rename = "type")]
    pub stack_type: u8,
    pub method: String,
    pub endpoint_id: u64,
}

/// Body of `POST /api/stacks/create/{kind}/{method}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStackBody {
    pub from_app_template: bool,
    pub name: String,
    pub stack_file_content: String,
    #[serde(rename = "swarmID", skip_serializing_if = "Option::is_none", default)]
    pub swarm_id: Option<String>,
}

/// Query parameters of `PUT /api/stacks/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStackParams {
    pub endpoint_id: u64,
}

/// Body of `PUT /api/stacks/{id}`
///
/// `env` is echoed from the listing, a missing list is sent as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStackBody {
    pub env: Option<Vec<EnvVariable>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stack_file_content: Option<String>,
    pub prune: bool,
    pub pull_image: bool,
}
