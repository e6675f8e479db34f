/// Layouted: predefined LayoutedC shortcuts
/// ResultE<T> = Result<T, Erx>;
/// ResultEX = ResultE<()>;
/// fn smp<T: ToString>(error: T) -> Erx
/// fn amp<T: ToString>(additional: &str) -> impl Fn(T) -> Erx
/// fn emp<T: std::error::Error>(error: T) -> Erx
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::Display;

/// application segment of every layouted code
pub static APP_SHORT: &str = "GRDP";

/// ResultE<T> = Result<T, Erx>;
pub type ResultE<T> = Result<T, Erx>;

/// ResultEX = ResultE<()>;
pub type ResultEX = ResultE<()>;

/// Layouted: Some predefined Layouted methods
pub struct Layouted;

pub fn describe_error(e: &dyn std::error::Error) -> String {
    let mut description = e.to_string();
    let mut current = e.source();
    while let Some(source) = current {
        description.push_str(&format!("\nCaused by: {}", source));
        current = source.source();
    }
    description
}

/// emp: error message processor
///
/// Converts a `std::error::Error` into an `Erx`, keeping the whole source
/// chain under the `ORIGIN` extra key.
///
/// # Example
/// ```
/// let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
/// let erx = gridportal::erx::emp(io_error);
/// assert_eq!(erx.message(), "File not found");
/// assert!(erx.extra_val("ORIGIN").is_some());
/// ```
pub fn emp<T: std::error::Error>(error: T) -> Erx {
    let extra = vec![(String::from("ORIGIN"), describe_error(&error))];
    let message = error.to_string();
    Erx { code: Default::default(), message, extra }
}

/// smp: simple convert T: ToString to Erx
///
/// # Example
/// ```
/// let erx: gridportal::erx::Erx = "42x".parse::<u16>().map_err(gridportal::erx::smp).unwrap_err();
/// assert_eq!(erx.message(), "invalid digit found in string");
/// ```
pub fn smp<T: ToString>(error: T) -> Erx {
    Erx { code: Default::default(), message: error.to_string(), extra: Vec::new() }
}

/// amp: return a function that converts T: ToString to Erx, prefixed with `additional`
///
/// # Example
/// ```
/// let convert = gridportal::erx::amp("Resource Manager unreachable");
/// let erx = convert("connection refused");
/// assert_eq!(erx.message(), "Resource Manager unreachable : connection refused");
/// ```
pub fn amp<T: ToString>(additional: &str) -> impl Fn(T) -> Erx {
    let additional = additional.to_string();
    move |err: T| Erx { code: Default::default(), message: format!("{} : {}", additional, err.to_string()), extra: Vec::new() }
}

/// Predefined Layouted Code with length 4
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum PreL4 {
    /// Fuzz
    FUZZ,
    /// Common
    COMM,
    /// Configuration
    CONF,
    /// Upload
    UPLD,
    /// Resource Manager backend
    RMGR,
    /// Undefined
    UNDF,
}

impl PreL4 {
    pub fn four(&self) -> &'static str {
        match self {
            PreL4::FUZZ => "FUZZ",
            PreL4::COMM => "COMM",
            PreL4::CONF => "CONF",
            PreL4::UPLD => "UPLD",
            PreL4::RMGR => "RMGR",
            PreL4::UNDF => "UNDF",
        }
    }
}

impl Display for PreL4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.four())
    }
}

impl From<PreL4> for String {
    fn from(value: PreL4) -> Self {
        value.four().to_string()
    }
}

impl Layouted {
    pub fn common(category: &str, detail: &str) -> LayoutedC {
        LayoutedC::new(PreL4::COMM.four(), category, detail)
    }

    pub fn conf(category: &str, detail: &str) -> LayoutedC {
        LayoutedC::new(PreL4::CONF.four(), category, detail)
    }

    pub fn upload(category: &str, detail: &str) -> LayoutedC {
        LayoutedC::new(PreL4::UPLD.four(), category, detail)
    }

    pub fn rm(category: &str, detail: &str) -> LayoutedC {
        LayoutedC::new(PreL4::RMGR.four(), category, detail)
    }
}

/// Code format
/// aaaa-xxxx-yyyy-zzzz
///
///    aaaa : application
///    xxxx : domain
///    yyyy : category inside the domain
///    zzzz : concrete error
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LayoutedC {
    pub application: String,
    pub domain: String,
    pub category: String,
    pub detail: String,
}

impl LayoutedC {
    pub fn new(domain: &str, category: &str, detail: &str) -> LayoutedC {
        LayoutedC { application: APP_SHORT.into(), domain: domain.into(), category: category.into(), detail: detail.into() }
    }

    pub fn layout_string(&self) -> String {
        format!("{}-{}-{}-{}", self.application, self.domain, self.category, self.detail)
    }
}

impl Default for LayoutedC {
    fn default() -> Self {
        LayoutedC { application: APP_SHORT.into(), domain: PreL4::UNDF.into(), category: PreL4::UNDF.into(), detail: PreL4::UNDF.into() }
    }
}

impl From<LayoutedC> for String {
    fn from(value: LayoutedC) -> Self {
        value.layout_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Erx {
    code: LayoutedC,
    message: String,
    extra: Vec<(String, String)>,
}

impl Erx {
    pub fn new(message: &str) -> Erx {
        Erx { code: Default::default(), message: message.to_string(), extra: Vec::new() }
    }

    pub fn coded(code: LayoutedC, message: &str) -> Erx {
        Erx { code, message: message.to_string(), extra: Vec::new() }
    }

    pub fn code(&self) -> LayoutedC {
        self.code.clone()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn message_string(&self) -> String {
        self.message.clone()
    }

    pub fn description(&self) -> String {
        let mut description = self.code.layout_string();
        description.push(' ');
        description.push_str(&self.message);
        if self.extra.is_empty() {
            return description;
        }

        let pairs: Vec<String> = self.extra.iter().map(|x| format!("{}={}", x.0, x.1)).collect();
        description.push_str(" { ");
        description.push_str(&pairs.join(", "));
        description.push_str(" }");

        description
    }

    /// get extra
    pub fn extra(&self) -> &Vec<(String, String)> {
        &self.extra
    }

    /// get extra value, if not exists, return None
    pub fn extra_val(&self, key: &str) -> Option<String> {
        self.extra.iter().find(|e| e.0.eq(key)).map(|e| e.1.clone())
    }

    /// add extra
    /// if key exists, replace value
    pub fn add_extra(&mut self, key: &str, value: &str) -> &mut Self {
        for (k, v) in self.extra.iter_mut() {
            if *k == key {
                *v = value.to_string();
                return self;
            }
        }

        self.extra.push((key.to_string(), value.to_string()));
        self
    }
}

impl Display for Erx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Erx {}

impl From<Infallible> for Erx {
    fn from(_: Infallible) -> Self {
        Erx::default()
    }
}

impl From<&str> for Erx {
    fn from(s: &str) -> Self {
        Erx::new(s)
    }
}

impl From<String> for Erx {
    fn from(str: String) -> Erx {
        Erx::new(&str)
    }
}

impl From<std::io::Error> for Erx {
    fn from(value: std::io::Error) -> Self {
        emp(value)
    }
}

impl From<config::ConfigError> for Erx {
    fn from(value: config::ConfigError) -> Self {
        let mut erx = emp(value);
        erx.code = Layouted::conf(PreL4::FUZZ.four(), "0001");
        erx
    }
}

impl From<reqwest::Error> for Erx {
    fn from(value: reqwest::Error) -> Self {
        let mut erx = emp(value);
        erx.code = Layouted::rm(PreL4::COMM.four(), "0001");
        erx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_string_roundtrip() {
        let code = Layouted::upload("FORM", "0002");
        let s: String = code.clone().into();
        assert_eq!(s, "GRDP-UPLD-FORM-0002");
    }

    #[test]
    fn test_extra_replaces_existing_key() {
        let mut erx = Erx::new("boom");
        erx.add_extra("file", "a.properties").add_extra("file", "b.properties");
        assert_eq!(erx.extra().len(), 1);
        assert_eq!(erx.extra_val("file").as_deref(), Some("b.properties"));
        assert!(erx.description().ends_with("boom { file=b.properties }"));
    }

    #[test]
    fn test_display_is_message_only() {
        let erx = amp("Resource Manager")("timeout");
        assert_eq!(erx.to_string(), "Resource Manager : timeout");
    }
}
