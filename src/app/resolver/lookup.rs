//! Lookup-based resolution through the project-widget metadata API
//!
//! One metadata GET per descriptor returns the project's file records. While
//! the service is still indexing a project it answers HTTP 202; the resolver
//! then sleeps a fixed poll interval and retries up to a configurable attempt
//! ceiling. Once metadata is available the requested file id is matched first
//! against the primary/latest record, then against the per-minecraft-version
//! list, and the CDN download URL is derived from the numeric file id.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::UrlResolver;
use crate::app::models::{ItemDescriptor, ProviderKind, ResolvedTarget};
use crate::constants::{curse, limits};
use crate::errors::{ResolutionError, ResolutionResult};

/// Poll behavior while a project is still being indexed
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Fixed delay between metadata polls
    pub poll_delay: Duration,
    /// Maximum polls before reporting the project as never indexed
    pub max_poll_attempts: u32,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            poll_delay: limits::INDEX_POLL_DELAY,
            max_poll_attempts: limits::INDEX_MAX_ATTEMPTS,
        }
    }
}

/// One file record in the widget metadata
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WidgetFile {
    pub id: u64,
    pub name: String,
}

/// Widget metadata for one project
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WidgetProject {
    /// Primary/latest file record
    #[serde(default)]
    pub download: Option<WidgetFile>,
    /// File records grouped by game version
    #[serde(default)]
    pub versions: HashMap<String, Vec<WidgetFile>>,
}

impl WidgetProject {
    /// Match a file id, primary record first, then the per-version list
    pub(crate) fn find_file(&self, file_id: u64, minecraft_version: &str) -> Option<&WidgetFile> {
        if let Some(primary) = self.download.as_ref().filter(|f| f.id == file_id) {
            return Some(primary);
        }
        self.versions
            .get(minecraft_version)
            .and_then(|files| files.iter().find(|f| f.id == file_id))
    }
}

/// Resolver issuing widget metadata lookups for mod artifacts
#[derive(Debug, Clone)]
pub struct WidgetResolver {
    client: Client,
    api_base: String,
    media_base: String,
    config: LookupConfig,
}

impl WidgetResolver {
    /// Create a resolver over a shared HTTP client
    pub fn new(client: Client, config: LookupConfig) -> Self {
        Self {
            client,
            api_base: curse::WIDGET_API_BASE.to_string(),
            media_base: curse::MEDIA_BASE.to_string(),
            config,
        }
    }

    /// Override the API and CDN base URLs (used by tests)
    pub fn with_bases(
        mut self,
        api_base: impl Into<String>,
        media_base: impl Into<String>,
    ) -> Self {
        self.api_base = api_base.into();
        self.media_base = media_base.into();
        self
    }

    /// CDN URL for a matched record: the numeric id splits into a
    /// `id/1000`, `id%1000` segment pair
    fn download_url(&self, file: &WidgetFile) -> ResolutionResult<Url> {
        let raw = format!(
            "{}/files/{}/{}/{}",
            self.media_base,
            file.id / 1000,
            file.id % 1000,
            file.name
        );
        Url::parse(&raw).map_err(|e| ResolutionError::MalformedMetadata {
            project: file.name.clone(),
            reason: format!("cannot build download url: {}", e),
        })
    }

    /// Fetch project metadata, polling while the service reports it queued
    async fn fetch_metadata(&self, project: &str) -> ResolutionResult<WidgetProject> {
        let url = format!("{}/{}", self.api_base.trim_end_matches('/'), project);

        let mut attempt = 0;
        loop {
            attempt += 1;
            let response = self.client.get(&url).send().await?;
            let status = response.status().as_u16();

            if status == curse::QUEUED_STATUS {
                if attempt >= self.config.max_poll_attempts {
                    return Err(ResolutionError::NeverIndexed {
                        project: project.to_string(),
                        attempts: attempt,
                    });
                }
                warn!(
                    "Project {} still queued for indexing (poll {}/{}), waiting {:?}",
                    project, attempt, self.config.max_poll_attempts, self.config.poll_delay
                );
                tokio::time::sleep(self.config.poll_delay).await;
                continue;
            }

            if !response.status().is_success() {
                return Err(ResolutionError::UnexpectedStatus {
                    project: project.to_string(),
                    status,
                });
            }

            let body = response.text().await?;
            return serde_json::from_str(&body).map_err(|e| {
                ResolutionError::MalformedMetadata {
                    project: project.to_string(),
                    reason: e.to_string(),
                }
            });
        }
    }
}

#[async_trait]
impl UrlResolver for WidgetResolver {
    async fn resolve(&self, item: &ItemDescriptor) -> ResolutionResult<ResolvedTarget> {
        if item.provider != ProviderKind::CurseMod {
            return Err(ResolutionError::UnsupportedDescriptor {
                reason: format!("lookup resolver cannot handle {} items", item.provider),
            });
        }
        let file_id = item
            .file_ref
            .ok_or_else(|| ResolutionError::UnsupportedDescriptor {
                reason: "mod descriptor carries no file id".to_string(),
            })?;

        let metadata = self.fetch_metadata(&item.project_ref).await?;
        let file = metadata
            .find_file(file_id, &item.minecraft_version)
            .ok_or_else(|| ResolutionError::FileNotFound {
                project: item.project_ref.clone(),
                file_id,
            })?;

        let url = self.download_url(file)?;
        debug!("Resolved {} to {}", item.label(), url);
        Ok(ResolvedTarget {
            filename: file.name.clone(),
            url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::client::ClientConfig;

    fn project_with(download_id: u64, versioned_id: u64) -> WidgetProject {
        let mut versions = HashMap::new();
        versions.insert(
            "1.16.4".to_string(),
            vec![WidgetFile {
                id: versioned_id,
                name: "versioned.jar".to_string(),
            }],
        );
        WidgetProject {
            download: Some(WidgetFile {
                id: download_id,
                name: "primary.jar".to_string(),
            }),
            versions,
        }
    }

    #[test]
    fn test_primary_record_wins_when_it_matches() {
        let project = project_with(3040523, 3040523);
        let file = project.find_file(3040523, "1.16.4").unwrap();
        assert_eq!(file.name, "primary.jar");
    }

    #[test]
    fn test_version_list_scanned_when_primary_mismatches() {
        let project = project_with(9999999, 3040523);
        let file = project.find_file(3040523, "1.16.4").unwrap();
        assert_eq!(file.name, "versioned.jar");
    }

    #[test]
    fn test_no_match_anywhere() {
        let project = project_with(1, 2);
        assert!(project.find_file(3, "1.16.4").is_none());
        // The right id under a different game version does not match either
        assert!(project.find_file(2, "1.12.2").is_none());
    }

    #[test]
    fn test_download_url_segment_split() {
        let client = ClientConfig::default().build_http_client().unwrap();
        let resolver = WidgetResolver::new(client, LookupConfig::default());

        let url = resolver
            .download_url(&WidgetFile {
                id: 3040523,
                name: "jei-1.16.4.jar".to_string(),
            })
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://media.forgecdn.net/files/3040/523/jei-1.16.4.jar"
        );

        // Leading zeros in the remainder collapse, matching the CDN layout
        let url = resolver
            .download_url(&WidgetFile {
                id: 3040045,
                name: "other.jar".to_string(),
            })
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://media.forgecdn.net/files/3040/45/other.jar"
        );
    }

    #[test]
    fn test_filename_with_spaces_is_encoded() {
        let client = ClientConfig::default().build_http_client().unwrap();
        let resolver = WidgetResolver::new(client, LookupConfig::default());

        let url = resolver
            .download_url(&WidgetFile {
                id: 2998133,
                name: "Thermal Expansion.jar".to_string(),
            })
            .unwrap();
        assert!(url.as_str().ends_with("/Thermal%20Expansion.jar"));
    }

    #[test]
    fn test_metadata_parses_widget_shape() {
        let body = r#"{
            "id": 238222,
            "title": "JEI",
            "download": { "id": 3040523, "name": "jei.jar", "version": "7.6.1.71" },
            "versions": {
                "1.16.4": [ { "id": 3040523, "name": "jei.jar" } ]
            }
        }"#;
        let project: WidgetProject = serde_json::from_str(body).unwrap();
        assert_eq!(project.download.unwrap().id, 3040523);
        assert_eq!(project.versions["1.16.4"].len(), 1);
    }
}
