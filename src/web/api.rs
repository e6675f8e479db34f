use crate::web::javascript::{callback_script, escaped_simple_json_pair, simple_json_pair};
use axum::http::StatusCode;
use axum::response::Response;

const API_HEADERS: [(&str, &str); 2] = [("Content-Type", "text/html; charset=utf-8"), ("Powered-By", "gridportal")];

/// Callback response of a popup upload.
/// Always answered with `200 OK`; success and failure differ only in the JSON handed to the callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Out {
    callback: String,
    json: String,
}

impl Out {
    pub fn new(callback: &str, json: String) -> Self {
        Out { callback: callback.to_string(), json }
    }

    /// Backend answer: a bare `true` becomes `{ "result" : true }`,
    /// anything else is already JSON and passed through.
    pub fn result(callback: &str, backend: &str) -> Self {
        if backend == "true" {
            return Out::new(callback, simple_json_pair("result", "true"));
        }
        Out::new(callback, backend.to_string())
    }

    pub fn error(callback: &str, message: &str) -> Self {
        Out::new(callback, escaped_simple_json_pair("errorMessage", message))
    }

    pub fn callback(&self) -> &str {
        &self.callback
    }

    pub fn json(&self) -> &str {
        &self.json
    }

    pub fn script(&self) -> String {
        callback_script(&self.callback, &self.json)
    }
}

impl axum::response::IntoResponse for Out {
    fn into_response(self) -> Response {
        (StatusCode::OK, API_HEADERS, self.script()).into_response()
    }
}
