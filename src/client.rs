use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use crate::config::{ClientConfig, Credentials};
use crate::error::{ProviderError, Result};
use crate::model::{DeploymentProcess, OctopusResource, Project, Resources, Space};

const API_KEY_HEADER: &str = "x-octopus-apikey";
const REDIRECTION_HOST_HEADER: &str = "x_redirection_upstream_host";
const REDIRECTION_KEY_HEADER: &str = "x_redirection_service_api_key";

/// Filters accepted by collection endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub ids: Vec<String>,
    pub partial_name: Option<String>,
    pub skip: Option<i64>,
    pub take: Option<i64>,
    pub extra: Vec<(&'static str, String)>,
}

impl Query {
    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.extra.push((key, value.into()));
        self
    }

    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.ids.is_empty() {
            pairs.push(("ids", self.ids.join(",")));
        }
        if let Some(partial_name) = self.partial_name.as_ref().filter(|p| !p.is_empty()) {
            pairs.push(("partialName", partial_name.clone()));
        }
        if let Some(skip) = self.skip {
            pairs.push(("skip", skip.to_string()));
        }
        if let Some(take) = self.take {
            pairs.push(("take", take.to_string()));
        }
        pairs.extend(self.extra.iter().cloned());
        pairs
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiErrorBody {
    #[serde(default)]
    error_message: String,
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct OctopusClient {
    http: reqwest::Client,
    address: Url,
    space_id: String,
}

impl OctopusClient {
    /// Builds the HTTP client and pins it to the configured or default space.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let mut client = Self {
            http: build_http(config)?,
            address: config.address.clone(),
            space_id: String::new(),
        };
        let space = match config.space_id.as_deref() {
            Some(space_id) => client.space(space_id).await?,
            None => client.default_space().await?,
        };
        info!(address = %client.address, space_id = %space.id, space = %space.name, "connected to Octopus server");
        client.space_id = space.id;
        Ok(client)
    }

    pub fn space_id(&self) -> &str {
        &self.space_id
    }

    /// Space a request targets: the given one, or the client's own when empty.
    pub fn scope<'a>(&'a self, space_id: &'a str) -> &'a str {
        if space_id.is_empty() {
            &self.space_id
        } else {
            space_id
        }
    }

    pub async fn space(&self, space_id: &str) -> Result<Space> {
        let url = self.url(None, &["spaces", space_id])?;
        self.send(self.http.get(url)).await
    }

    pub async fn default_space(&self) -> Result<Space> {
        let url = self.url(None, &["spaces", "all"])?;
        let spaces: Vec<Space> = self.send(self.http.get(url)).await?;
        spaces
            .into_iter()
            .find(|space| space.is_default)
            .ok_or_else(|| ProviderError::Config("the Octopus server has no default space; set space_id".into()))
    }

    pub async fn get<T: OctopusResource>(&self, space_id: &str, id: &str) -> Result<T> {
        let url = self.url(Some(self.scope(space_id)), &[T::COLLECTION, id])?;
        self.send(self.http.get(url)).await
    }

    pub async fn list<T: OctopusResource>(&self, space_id: &str, query: &Query) -> Result<Resources<T>> {
        let url = self.url(Some(self.scope(space_id)), &[T::COLLECTION])?;
        self.send(self.http.get(url).query(&query.pairs())).await
    }

    pub async fn create<T: OctopusResource>(&self, space_id: &str, resource: &T) -> Result<T> {
        let url = self.url(Some(self.scope(space_id)), &[T::COLLECTION])?;
        self.send(self.http.post(url).json(resource)).await
    }

    pub async fn update<T: OctopusResource>(&self, space_id: &str, resource: &T) -> Result<T> {
        let id = resource.id().ok_or_else(|| {
            ProviderError::Mapping(format!("cannot update {} without an id", T::COLLECTION))
        })?;
        let url = self.url(Some(self.scope(space_id)), &[T::COLLECTION, id])?;
        self.send(self.http.put(url).json(resource)).await
    }

    pub async fn delete<T: OctopusResource>(&self, space_id: &str, id: &str) -> Result<()> {
        let url = self.url(Some(self.scope(space_id)), &[T::COLLECTION, id])?;
        debug!(method = %Method::DELETE, %url, "octopus request");
        check(self.http.delete(url).send().await?).await?;
        Ok(())
    }

    /// Process owned by `project_id`. Version-controlled projects are addressed by branch.
    pub async fn project_deployment_process(
        &self,
        space_id: &str,
        project_id: &str,
        branch: Option<&str>,
    ) -> Result<DeploymentProcess> {
        let space_id = self.scope(space_id);
        let mut process: DeploymentProcess = match branch.filter(|b| !b.is_empty()) {
            Some(branch) => {
                let url = self.url(
                    Some(space_id),
                    &["projects", project_id, branch, DeploymentProcess::COLLECTION],
                )?;
                self.send(self.http.get(url)).await?
            }
            None => {
                let project: Project = self.get(space_id, project_id).await?;
                let process_id = project.deployment_process_id.ok_or_else(|| {
                    ProviderError::Mapping(format!("project {project_id} has no deployment process"))
                })?;
                self.get(space_id, &process_id).await?
            }
        };
        process.branch = branch.map(str::to_string);
        Ok(process)
    }

    pub async fn update_deployment_process(&self, process: &DeploymentProcess) -> Result<DeploymentProcess> {
        let space_id = self.scope(process.space_id.as_deref().unwrap_or_default());
        let branch = process.branch.as_deref().filter(|b| !b.is_empty());
        let mut updated: DeploymentProcess = match branch {
            Some(branch) => {
                let url = self.url(
                    Some(space_id),
                    &["projects", process.project_id.as_str(), branch, DeploymentProcess::COLLECTION],
                )?;
                self.send(self.http.put(url).json(process)).await?
            }
            None => self.update(space_id, process).await?,
        };
        updated.branch = process.branch.clone();
        Ok(updated)
    }

    fn url(&self, space_id: Option<&str>, parts: &[&str]) -> Result<Url> {
        let mut url = self.address.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ProviderError::Config(format!("address {} cannot be used as a base URL", self.address))
            })?;
            segments.pop_if_empty().push("api");
            if let Some(space_id) = space_id {
                segments.push(space_id);
            }
            segments.extend(parts);
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = request.build()?;
        debug!(method = %request.method(), url = %request.url(), "octopus request");
        let response = check(self.http.execute(request).await?).await?;
        Ok(response.json().await?)
    }
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Api {
        status: status.as_u16(),
        message: error_message(&body, status.canonical_reason().unwrap_or("request failed")),
    })
}

fn error_message(body: &str, fallback: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.error_message.is_empty() || !parsed.errors.is_empty() => {
            let mut parts = Vec::new();
            if !parsed.error_message.is_empty() {
                parts.push(parsed.error_message);
            }
            parts.extend(parsed.errors);
            parts.join("; ")
        }
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn build_http(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    match &config.credentials {
        Credentials::ApiKey(key) => {
            headers.insert(HeaderName::from_static(API_KEY_HEADER), secret_header(key)?);
        }
        Credentials::AccessToken(token) => {
            headers.insert(AUTHORIZATION, secret_header(&format!("Bearer {token}"))?);
        }
    }
    if let Some(redirection) = &config.redirection {
        headers.insert(
            HeaderName::from_static(REDIRECTION_HOST_HEADER),
            header(&redirection.upstream_host)?,
        );
        headers.insert(
            HeaderName::from_static(REDIRECTION_KEY_HEADER),
            secret_header(&redirection.api_key)?,
        );
    }
    headers.insert(
        USER_AGENT,
        header(concat!("terraform-provider-octopusdeploy/", env!("CARGO_PKG_VERSION")))?,
    );

    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}

fn header(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|err| ProviderError::Config(format!("invalid header value: {err}")))
}

fn secret_header(value: &str) -> Result<HeaderValue> {
    let mut value = header(value)?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_skip_empty_filters() {
        let query = Query {
            ids: vec!["Environments-1".into(), "Environments-2".into()],
            partial_name: Some(String::new()),
            take: Some(10),
            ..Default::default()
        }
        .with("name", "Production");

        assert_eq!(
            query.pairs(),
            vec![
                ("ids", "Environments-1,Environments-2".to_string()),
                ("take", "10".to_string()),
                ("name", "Production".to_string()),
            ]
        );
    }

    #[test]
    fn error_message_prefers_octopus_body() {
        let body = r#"{"ErrorMessage":"There was a problem","Errors":["Name is required"]}"#;
        assert_eq!(error_message(body, "Bad Request"), "There was a problem; Name is required");
        assert_eq!(error_message("plain failure", "Bad Request"), "plain failure");
        assert_eq!(error_message("", "Not Found"), "Not Found");
    }
}
