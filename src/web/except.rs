use crate::erx::{Erx, Layouted, LayoutedC, PreL4};
use crate::web::api::Out;
use serde::{Deserialize, Serialize};

// Except is what an upload action fails with.
// it only becomes a callback payload at the response boundary.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Except {
    /// a required form field is missing or unset
    FailFast(String),
    /// the request body could not be read as multipart
    Multipart(String),
    /// the body exceeded the upload limit (bytes)
    TooLarge(usize),
    /// the backend refused or could not be reached
    Backend(String),
}

impl Except {
    pub fn message(&self) -> String {
        match self {
            Except::FailFast(m) | Except::Multipart(m) | Except::Backend(m) => m.clone(),
            Except::TooLarge(limit) => {
                format!("the request was rejected because its size exceeds the configured maximum ({})", limit)
            },
        }
    }

    pub fn code(&self) -> LayoutedC {
        match self {
            Except::FailFast(_) => Layouted::upload(PreL4::COMM.four(), "1000"),
            Except::Multipart(_) => Layouted::upload(PreL4::FUZZ.four(), "1001"),
            Except::TooLarge(_) => Layouted::upload(PreL4::COMM.four(), "1413"),
            Except::Backend(_) => Layouted::rm(PreL4::FUZZ.four(), "2000"),
        }
    }

    /// convert to the callback response
    pub fn out(&self, callback: &str) -> Out {
        Out::error(callback, &self.message())
    }
}

impl std::fmt::Display for Except {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code().layout_string(), self.message())
    }
}

impl From<Erx> for Except {
    fn from(value: Erx) -> Self {
        Except::Backend(value.message_string())
    }
}
