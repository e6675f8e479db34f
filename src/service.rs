use crate::conf::Rm;
use crate::erx::ResultE;
use crate::model::NodeSourceRequest;
use crate::tools::httpclient::{Client, ClientBuilder};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Resource Manager path creating a node source
pub const CREATE_NODE_SOURCE_PATH: &str = "nodesource/create";

/// Backend owning node source creation.
/// Returns the backend's JSON answer; `"true"` means created.
#[async_trait]
pub trait NodeSourceService: Send + Sync {
    async fn create_node_source(&self, request: &NodeSourceRequest) -> ResultE<String>;
}

pub type SharedNodeSourceService = Arc<dyn NodeSourceService>;

/// `NodeSourceService` over the Resource Manager REST api.
#[derive(Clone, Debug)]
pub struct RestNodeSourceService {
    client: Client,
    nodes_recoverable: bool,
}

impl RestNodeSourceService {
    pub fn new(rm: &Rm) -> ResultE<Self> {
        let client = ClientBuilder::new(&rm.url).set_timeout(Duration::from_secs(rm.timeout_secs)).build()?;
        Ok(RestNodeSourceService { client, nodes_recoverable: rm.nodes_recoverable })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl NodeSourceService for RestNodeSourceService {
    async fn create_node_source(&self, request: &NodeSourceRequest) -> ResultE<String> {
        tracing::info!(
            name = %request.name,
            infrastructure = %request.infrastructure,
            policy = %request.policy,
            "creating node source"
        );
        let form = request.form_pairs(self.nodes_recoverable);
        let answer = self
            .client
            .post_form(CREATE_NODE_SOURCE_PATH, &[("sessionid", request.session_id.as_str())], &form)
            .await;
        if let Err(err) = &answer {
            tracing::warn!(name = %request.name, "node source creation failed: {}", err.description());
        }
        answer
    }
}
