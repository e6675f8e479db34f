//! Node source creation from the popup upload form.
//!
//! Fields are read in submission order. `infra` opens a run of infrastructure
//! parameters and `policy` a run of policy parameters; plain fields of a run
//! are parameters and file parts are file parameters. `sessionId`, `nsCallback`
//! and `nsName` are recognized anywhere.

use crate::model::NodeSourceRequest;
use crate::service::SharedNodeSourceService;
use crate::web::api::Out;
use crate::web::except::Except;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use tracing::Instrument;

pub const FIELD_SESSION_ID: &str = "sessionId";
pub const FIELD_CALLBACK: &str = "nsCallback";
pub const FIELD_NAME: &str = "nsName";
pub const FIELD_INFRASTRUCTURE: &str = "infra";
pub const FIELD_POLICY: &str = "policy";

pub const MISSING_NAME: &str = "You need to pick a name for the new Node Source";
pub const MISSING_POLICY: &str = "No Policy selected";
pub const MISSING_INFRASTRUCTURE: &str = "No Infrastructure selected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Run {
    #[default]
    Head,
    Infrastructure,
    Policy,
}

/// Accumulates the ordered multipart fields into a [`NodeSourceRequest`].
#[derive(Debug, Default)]
pub struct NodeSourceForm {
    request: NodeSourceRequest,
    run: Run,
}

impl NodeSourceForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// callback name read so far, empty until `nsCallback` arrives
    pub fn callback(&self) -> &str {
        &self.request.callback
    }

    pub fn request(&self) -> &NodeSourceRequest {
        &self.request
    }

    pub fn field(&mut self, name: &str, value: String) {
        match name {
            FIELD_SESSION_ID => self.request.session_id = value,
            FIELD_CALLBACK => self.request.callback = value,
            FIELD_NAME => self.request.name = value,
            FIELD_INFRASTRUCTURE => {
                self.request.infrastructure = value;
                self.run = Run::Infrastructure;
            },
            FIELD_POLICY => {
                self.request.policy = value;
                self.run = Run::Policy;
            },
            _ => match self.run {
                Run::Infrastructure => self.request.infrastructure_params.push(value),
                Run::Policy => self.request.policy_params.push(value),
                Run::Head => tracing::warn!("Unexpected param {}", name),
            },
        }
    }

    pub fn file(&mut self, name: &str, content: String) {
        match self.run {
            Run::Infrastructure => self.request.infrastructure_file_params.push(content),
            Run::Policy => self.request.policy_file_params.push(content),
            Run::Head => tracing::warn!("Unexpected param {}", name),
        }
    }

    /// Fail fast on the first missing selection: name, then policy, then infrastructure.
    pub fn validated(&self) -> Result<&NodeSourceRequest, Except> {
        if self.request.name.is_empty() {
            return Err(Except::FailFast(MISSING_NAME.to_string()));
        }
        if !self.request.has_policy() {
            return Err(Except::FailFast(MISSING_POLICY.to_string()));
        }
        if !self.request.has_infrastructure() {
            return Err(Except::FailFast(MISSING_INFRASTRUCTURE.to_string()));
        }
        Ok(&self.request)
    }
}

#[derive(Clone)]
pub struct UploadState {
    pub service: SharedNodeSourceService,
    pub upload_max_size: usize,
}

/// `GET|POST /createnodesource`
pub async fn create_node_source(
    State(state): State<UploadState>, multipart: Result<Multipart, MultipartRejection>,
) -> Out {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("createnodesource", %request_id);

    async move {
        let mut form = NodeSourceForm::new();
        match create(&state, multipart, &mut form).await {
            Ok(answer) => Out::result(form.callback(), &answer),
            Err(except) => {
                tracing::warn!("node source not created: {}", except);
                except.out(form.callback())
            },
        }
    }
    .instrument(span)
    .await
}

async fn create(
    state: &UploadState, multipart: Result<Multipart, MultipartRejection>, form: &mut NodeSourceForm,
) -> Result<String, Except> {
    let multipart = multipart.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Except::TooLarge(state.upload_max_size)
        } else {
            Except::Multipart(rejection.body_text())
        }
    })?;
    read_form(multipart, form, state.upload_max_size).await?;
    let request = form.validated()?;
    Ok(state.service.create_node_source(request).await?)
}

async fn read_form(mut multipart: Multipart, form: &mut NodeSourceForm, limit: usize) -> Result<(), Except> {
    let except = |err: MultipartError| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Except::TooLarge(limit)
        } else {
            Except::Multipart(err.body_text())
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(except)? {
        let name = field.name().unwrap_or_default().to_string();
        let is_file = field.file_name().is_some();
        let bytes = field.bytes().await.map_err(except)?;
        let value = String::from_utf8_lossy(&bytes).into_owned();

        if is_file {
            form.file(&name, value);
        } else {
            form.field(&name, value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str, bool)]) -> NodeSourceForm {
        let mut form = NodeSourceForm::new();
        for (name, value, is_file) in fields {
            if *is_file {
                form.file(name, value.to_string());
            } else {
                form.field(name, value.to_string());
            }
        }
        form
    }

    #[test]
    fn test_ordered_runs() {
        let form = form(&[
            ("sessionId", "s1", false),
            ("nsCallback", "cb", false),
            ("nsName", "ns", false),
            ("stray", "ignored", false),
            ("infra", "SSHInfrastructure", false),
            ("hosts", "a b", false),
            ("key", "-----KEY-----", true),
            ("port", "22", false),
            ("policy", "StaticPolicy", false),
            ("userAccess", "ALL", false),
            ("nsName", "renamed", false),
            ("script", "echo", true),
        ]);
        let request = form.validated().unwrap();
        assert_eq!(request.session_id, "s1");
        assert_eq!(request.name, "renamed");
        assert_eq!(request.infrastructure_params, vec!["a b", "22"]);
        assert_eq!(request.infrastructure_file_params, vec!["-----KEY-----"]);
        assert_eq!(request.policy_params, vec!["ALL"]);
        assert_eq!(request.policy_file_params, vec!["echo"]);
        assert_eq!(form.callback(), "cb");
    }

    #[test]
    fn test_head_files_are_skipped() {
        let form = form(&[("upload", "content", true), ("nsName", "ns", false)]);
        assert!(form.request().infrastructure_file_params.is_empty());
        assert!(form.request().policy_file_params.is_empty());
    }

    #[test]
    fn test_validation_order() {
        let missing = |fields: &[(&str, &str, bool)]| form(fields).validated().unwrap_err().message();
        assert_eq!(missing(&[("policy", "", false), ("infra", "", false)]), MISSING_NAME);
        assert_eq!(missing(&[("nsName", "ns", false), ("infra", "", false), ("policy", "undefined", false)]), MISSING_POLICY);
        assert_eq!(missing(&[("nsName", "ns", false), ("policy", "StaticPolicy", false)]), MISSING_INFRASTRUCTURE);
        assert_eq!(
            missing(&[("nsName", "ns", false), ("infra", "undefined", false), ("policy", "StaticPolicy", false)]),
            MISSING_INFRASTRUCTURE
        );
    }
}
