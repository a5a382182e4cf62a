//! # Hosting Provider
//!
//! Deploys a site document to the hosting provider's deployments API.

use crate::error::PublishError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use siteforge_editor::Site;

pub const DEFAULT_HOSTING_API_URL: &str = "https://api.vercel.com/v1/deployments";

/// Something that can put a site on the web
#[async_trait]
pub trait Deployer: Send + Sync {
    /// Deploy the site and return the deployment host (e.g. `shop-abc.vercel.app`)
    async fn deploy(&self, site: &Site) -> Result<String, PublishError>;
}

#[derive(Debug, Clone)]
pub struct HostingSettings {
    pub api_url: String,
    pub project_id: Option<String>,

    /// Access token; deploys fail with `MissingToken` without one
    pub token: Option<String>,
}

impl Default for HostingSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_HOSTING_API_URL.to_string(),
            project_id: None,
            token: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeploymentResponse {
    url: String,
}

#[derive(Debug, Clone)]
pub struct HostingClient {
    http: reqwest::Client,
    settings: HostingSettings,
}

impl HostingClient {
    pub fn new(settings: HostingSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    fn deployment_body(&self, site: &Site) -> Result<serde_json::Value, PublishError> {
        Ok(json!({
            "name": site.name,
            "target": "production",
            "project": self.settings.project_id,
            "files": [
                { "file": "site.json", "data": serde_json::to_string(site)? }
            ]
        }))
    }
}

#[async_trait]
impl Deployer for HostingClient {
    async fn deploy(&self, site: &Site) -> Result<String, PublishError> {
        let token = self
            .settings
            .token
            .as_deref()
            .ok_or(PublishError::MissingToken)?;

        let response = self
            .http
            .post(&self.settings.api_url)
            .bearer_auth(token)
            .json(&self.deployment_body(site)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let deployment: DeploymentResponse = response.json().await?;
        tracing::info!(site_id = %site.id, url = %deployment.url, "deployment created");
        Ok(deployment.url)
    }
}

/// Public URL for a deployment host
pub fn public_url(deployment: &str) -> String {
    if deployment.starts_with("http://") || deployment.starts_with("https://") {
        deployment.to_string()
    } else {
        format!("https://{}", deployment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url() {
        assert_eq!(public_url("shop.vercel.app"), "https://shop.vercel.app");
        assert_eq!(public_url("https://shop.example"), "https://shop.example");
    }

    #[test]
    fn test_deployment_body_embeds_site_json() {
        let client = HostingClient::new(HostingSettings {
            project_id: Some("prj_1".to_string()),
            ..HostingSettings::default()
        });
        let site = Site::new("shop");

        let body = client.deployment_body(&site).unwrap();

        assert_eq!(body["name"], "New Site");
        assert_eq!(body["target"], "production");
        assert_eq!(body["project"], "prj_1");
        let data = body["files"][0]["data"].as_str().unwrap();
        assert_eq!(serde_json::from_str::<Site>(data).unwrap(), site);
    }

    #[tokio::test]
    async fn test_deploy_without_token_fails() {
        let client = HostingClient::new(HostingSettings::default());
        let err = client.deploy(&Site::new("shop")).await.unwrap_err();
        assert!(matches!(err, PublishError::MissingToken));
    }
}
