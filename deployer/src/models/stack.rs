//! Remote stack models

use openapi_client::models::StackData;

pub use openapi_client::models::EnvVariable;

/// Identity of a stack on the Portainer instance
pub type StackId = u64;

/// Identity of a Portainer environment (endpoint)
pub type EndpointId = u64;

/// Method used when creating a stack: the definition is sent inline
pub const CREATE_METHOD_STRING: &str = "string";

/// A stack owned by the Portainer instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStack {
    pub id: StackId,
    pub name: String,
    pub endpoint_id: EndpointId,
    /// `None` when Portainer lists `"Env": null`
    pub env: Option<Vec<EnvVariable>>,
}

impl From<StackData> for RemoteStack {
    fn from(data: StackData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            endpoint_id: data.endpoint_id,
            env: data.env,
        }
    }
}

/// Stack orchestration kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    Swarm,
    Standalone,
}

impl StackKind {
    /// Swarm when a swarm id is given, standalone compose otherwise
    pub fn for_swarm_id(swarm_id: Option<&str>) -> Self {
        match swarm_id {
            Some(_) => StackKind::Swarm,
            None => StackKind::Standalone,
        }
    }

    /// Path segment of the create endpoint
    pub fn path_segment(&self) -> &'static str {
        match self {
            StackKind::Swarm => "swarm",
            StackKind::Standalone => "standalone",
        }
    }

    /// Numeric `type` query parameter
    pub fn api_type(&self) -> u8 {
        match self {
            StackKind::Swarm => 1,
            StackKind::Standalone => 2,
        }
    }
}

/// Parameters of a stack creation
#[derive(Debug, Clone)]
pub struct NewStack<'a> {
    pub kind: StackKind,
    pub method: &'a str,
    pub endpoint_id: EndpointId,
    pub name: &'a str,
    pub definition: &'a str,
    pub swarm_id: Option<&'a str>,
}

/// Parameters of a stack update
#[derive(Debug, Clone)]
pub struct StackUpdate<'a> {
    pub stack_id: StackId,
    pub endpoint_id: EndpointId,
    pub env: Option<&'a [EnvVariable]>,
    pub definition: Option<&'a str>,
    pub prune: bool,
    pub pull_image: bool,
}
