use reqwest::Response;
use std::time::Duration;

use crate::erx::{Erx, Layouted, PreL4, ResultE};
use crate::web::url::join as url_join;

static DEFAULT_USER_AGENT: &str = concat!("gridportal/", env!("CARGO_PKG_VERSION"));

pub struct ClientBuilder {
    base: String,
    timeout: Duration,
}

/// REST client bound to a base url.
/// Non-2xx answers are errors carrying the response body as message.
#[derive(Clone, Debug)]
pub struct Client {
    base: String,
    cli: reqwest::Client,
}

impl ClientBuilder {
    pub fn new(base: &str) -> ClientBuilder {
        ClientBuilder { base: base.to_string(), timeout: Duration::from_secs(10) }
    }

    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    pub fn build(&self) -> ResultE<Client> {
        let cli = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Client { base: self.base.clone(), cli })
    }
}

impl Client {
    pub fn url(&self, path: &str) -> String {
        url_join(&self.base, path)
    }

    /// POST an `application/x-www-form-urlencoded` body; repeated keys are kept.
    pub async fn post_form<T>(&self, path: &str, headers: &[(&str, &str)], form: &T) -> ResultE<String>
    where
        T: serde::Serialize + ?Sized,
    {
        let mut request = self.cli.post(self.url(path)).form(form);
        for (key, value) in headers {
            request = request.header(*key, *value);
        }
        Self::_response_untyped(request.send().await?).await
    }

    async fn _response_untyped(response: Response) -> ResultE<String> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            let message = if body.trim().is_empty() { status.to_string() } else { body };
            let mut err = Erx::coded(Layouted::rm(PreL4::COMM.four(), &format!("{:04}", status.as_u16())), &message);
            err.add_extra("status", status.as_str());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let client = ClientBuilder::new("http://rm:8080/rest/rm/").build().unwrap();
        assert_eq!(client.url("/nodesource/create"), "http://rm:8080/rest/rm/nodesource/create");
    }

    #[tokio::test]
    async fn test_invalid_header_is_an_error() {
        let client = ClientBuilder::new("http://127.0.0.1:1").build().unwrap();
        let form = [("nodeSourceName", "ns")];
        assert!(client.post_form("nodesource/create", &[("bad header", "x")], &form).await.is_err());
    }
}
