use serde::{Deserialize, Serialize};

/// A node source creation request as read from the upload form.
/// Parameter lists keep the order in which the fields were submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSourceRequest {
    pub session_id: String,
    pub callback: String,
    pub name: String,
    pub infrastructure: String,
    pub infrastructure_params: Vec<String>,
    pub infrastructure_file_params: Vec<String>,
    pub policy: String,
    pub policy_params: Vec<String>,
    pub policy_file_params: Vec<String>,
}

/// placeholder the portal form submits when nothing was picked
pub const UNDEFINED: &str = "undefined";

impl NodeSourceRequest {
    pub fn has_policy(&self) -> bool {
        !self.policy.is_empty() && self.policy != UNDEFINED
    }

    pub fn has_infrastructure(&self) -> bool {
        !self.infrastructure.is_empty() && self.infrastructure != UNDEFINED
    }

    /// Form fields of the Resource Manager `nodesource/create` call,
    /// repeated keys in submission order.
    pub fn form_pairs(&self, nodes_recoverable: bool) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("nodeSourceName", self.name.clone()), ("infrastructureType", self.infrastructure.clone())];
        pairs.extend(self.infrastructure_params.iter().map(|v| ("infrastructureParameters", v.clone())));
        pairs.extend(self.infrastructure_file_params.iter().map(|v| ("infrastructureFileParameters", v.clone())));
        pairs.push(("policyType", self.policy.clone()));
        pairs.extend(self.policy_params.iter().map(|v| ("policyParameters", v.clone())));
        pairs.extend(self.policy_file_params.iter().map(|v| ("policyFileParameters", v.clone())));
        pairs.push(("nodesRecoverable", nodes_recoverable.to_string()));
        pairs
    }
}
