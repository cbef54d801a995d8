//! GitLab remote store.
//!
//! Talks to the project variables endpoints of the REST v4 API:
//!
//! | Call   | Endpoint                                                        |
//! |--------|-----------------------------------------------------------------|
//! | list   | `GET    /projects/:id/variables?page=N&per_page=100`            |
//! | create | `POST   /projects/:id/variables`                                |
//! | update | `PUT    /projects/:id/variables/:key?filter[environment_scope]=` |
//! | delete | `DELETE /projects/:id/variables/:key?filter[environment_scope]=` |
//! | lookup | `GET    /projects/:url-encoded-path`                            |
//!
//! Every request carries the token in the `PRIVATE-TOKEN` header.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

use super::{merge_pages, RemoteStore};
use crate::core::constants;
use crate::core::domain::{ProjectSecrets, Secret, VariableType};
use crate::core::types::ProjectId;
use crate::error::{RemoteError, Result};

/// Header GitLab uses to announce the next page.
const NEXT_PAGE_HEADER: &str = "x-next-page";

/// GitLab REST client.
pub struct GitLab {
    agent: ureq::Agent,
    api_base: String,
    token: String,
}

impl std::fmt::Debug for GitLab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLab")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// A variable as the API returns it.
#[derive(Debug, Deserialize)]
struct ApiVariable {
    key: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    variable_type: VariableType,
    #[serde(default = "default_scope")]
    environment_scope: String,
    #[serde(default)]
    protected: bool,
    #[serde(default)]
    masked: bool,
    #[serde(default)]
    raw: bool,
}

fn default_scope() -> String {
    constants::DEFAULT_SCOPE.to_string()
}

impl From<ApiVariable> for Secret {
    fn from(v: ApiVariable) -> Self {
        Secret {
            key: v.key,
            value: v.value,
            description: v.description.unwrap_or_default(),
            variable_type: v.variable_type,
            environment_scope: v.environment_scope,
            protect: v.protected,
            mask: v.masked,
            raw: v.raw,
        }
    }
}

/// Request body for create and update.
#[derive(Debug, Serialize)]
struct VariableBody<'a> {
    key: &'a str,
    value: &'a str,
    description: &'a str,
    variable_type: VariableType,
    environment_scope: &'a str,
    protected: bool,
    masked: bool,
    raw: bool,
}

impl<'a> From<&'a Secret> for VariableBody<'a> {
    fn from(s: &'a Secret) -> Self {
        Self {
            key: &s.key,
            value: &s.value,
            description: &s.description,
            variable_type: s.variable_type,
            environment_scope: &s.environment_scope,
            protected: s.protect,
            masked: s.mask,
            raw: s.raw,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiProject {
    id: ProjectId,
}

impl GitLab {
    /// Create a client for a GitLab instance (e.g., `https://gitlab.com`).
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::MissingToken` if the token is empty.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(RemoteError::MissingToken.into());
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(constants::HTTP_TIMEOUT_SECS))
            .user_agent(concat!("credder/", env!("CARGO_PKG_VERSION")))
            .build();

        Ok(Self {
            agent,
            api_base: api_base(base_url),
            token: token.trim().to_string(),
        })
    }

    /// Base URL of the v4 API.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn variables_url(&self, project_id: ProjectId) -> String {
        format!("{}/projects/{}/variables", self.api_base, project_id)
    }

    fn variable_url(&self, project_id: ProjectId, key: &str) -> String {
        format!("{}/{}", self.variables_url(project_id), encode_segment(key))
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        trace!(method, url, "gitlab request");
        self.agent
            .request(method, url)
            .set("PRIVATE-TOKEN", &self.token)
    }

    fn fetch_page(&self, project_id: ProjectId, page: u32) -> Result<(Vec<Secret>, Option<u32>)> {
        let what = format!("variables of project {}", project_id);
        let response = self
            .request("GET", &self.variables_url(project_id))
            .query("page", &page.to_string())
            .query("per_page", &constants::PAGE_SIZE.to_string())
            .call()
            .map_err(|e| classify(e, &what))?;

        let next = response
            .header(NEXT_PAGE_HEADER)
            .and_then(|h| h.trim().parse::<u32>().ok());

        let variables: Vec<ApiVariable> = response
            .into_json()
            .map_err(|e| RemoteError::Parse(e.to_string()))?;

        Ok((variables.into_iter().map(Secret::from).collect(), next))
    }
}

impl RemoteStore for GitLab {
    fn lookup_project(&self, path: &str) -> Result<ProjectId> {
        let url = format!("{}/projects/{}", self.api_base, encode_segment(path));
        debug!(path, "looking up project id");

        let project: ApiProject = self
            .request("GET", &url)
            .call()
            .map_err(|e| classify(e, &format!("project {}", path)))?
            .into_json()
            .map_err(|e| RemoteError::Parse(e.to_string()))?;

        Ok(project.id)
    }

    fn fetch(&self, project_id: ProjectId) -> Result<ProjectSecrets> {
        let mut pages = Vec::new();
        let mut page = 1;

        loop {
            let (variables, next) = self.fetch_page(project_id, page)?;
            debug!(page, count = variables.len(), "fetched variables page");
            pages.push(variables);

            match next {
                Some(n) if n > page => page = n,
                _ => break,
            }
        }

        merge_pages(project_id, pages)
    }

    fn create(&self, project_id: ProjectId, secret: &Secret) -> Result<()> {
        debug!(key = %secret.key, scope = %secret.environment_scope, "creating variable");

        self.request("POST", &self.variables_url(project_id))
            .send_json(VariableBody::from(secret))
            .map_err(|e| classify(e, &secret.to_string()))?;
        Ok(())
    }

    fn update(&self, project_id: ProjectId, secret: &Secret) -> Result<()> {
        debug!(key = %secret.key, scope = %secret.environment_scope, "updating variable");

        self.request("PUT", &self.variable_url(project_id, &secret.key))
            .query("filter[environment_scope]", &secret.environment_scope)
            .send_json(VariableBody::from(secret))
            .map_err(|e| classify(e, &secret.to_string()))?;
        Ok(())
    }

    fn delete(&self, project_id: ProjectId, key: &str, environment_scope: &str) -> Result<()> {
        debug!(key, scope = environment_scope, "deleting variable");

        self.request("DELETE", &self.variable_url(project_id, key))
            .query("filter[environment_scope]", environment_scope)
            .call()
            .map_err(|e| classify(e, &format!("{} ({})", key, environment_scope)))?;
        Ok(())
    }
}

/// `https://gitlab.example.com/` -> `https://gitlab.example.com/api/v4`
fn api_base(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.ends_with("/api/v4") {
        trimmed.to_string()
    } else {
        format!("{}/api/v4", trimmed)
    }
}

/// Percent-encode a path segment, keeping only unreserved characters.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn classify(error: ureq::Error, what: &str) -> RemoteError {
    match error {
        ureq::Error::Status(401, _) => RemoteError::Unauthorized,
        ureq::Error::Status(403, _) => RemoteError::Forbidden,
        ureq::Error::Status(404, _) => RemoteError::NotFound(what.to_string()),
        ureq::Error::Status(status, response) => RemoteError::Http {
            status,
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(t) => RemoteError::Transport(t.to_string()),
    }
}
