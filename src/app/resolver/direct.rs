//! Direct-template resolution for the Forge installer
//!
//! The installer artifact lives at a fixed Maven coordinate derived from the
//! Minecraft and Forge versions, so resolution is pure string templating with
//! no network round-trip. The only failure mode is a malformed version
//! string.

use async_trait::async_trait;
use url::Url;

use super::UrlResolver;
use crate::app::models::{ItemDescriptor, ProviderKind, ResolvedTarget};
use crate::constants::forge;
use crate::errors::{ResolutionError, ResolutionResult};

/// Resolver templating the Forge Maven installer URL
#[derive(Debug, Clone)]
pub struct ForgeInstallerResolver {
    loader_version: String,
    maven_base: String,
}

impl ForgeInstallerResolver {
    /// Create a resolver for the loader version the manifest declares
    pub fn new(loader_version: impl Into<String>) -> Self {
        Self {
            loader_version: loader_version.into(),
            maven_base: forge::MAVEN_BASE.to_string(),
        }
    }

    /// Override the Maven base URL (used by tests)
    pub fn with_maven_base(mut self, maven_base: impl Into<String>) -> Self {
        self.maven_base = maven_base.into();
        self
    }

    /// Installer filename for a Minecraft/Forge version pair
    pub fn installer_filename(minecraft_version: &str, loader_version: &str) -> String {
        format!(
            "forge-{}-{}-installer.jar",
            minecraft_version, loader_version
        )
    }

    /// Reject version strings that cannot be templated into a URL segment
    fn validate_version(value: &str) -> ResolutionResult<()> {
        let well_formed = !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if well_formed {
            Ok(())
        } else {
            Err(ResolutionError::InvalidVersion {
                value: value.to_string(),
            })
        }
    }
}

#[async_trait]
impl UrlResolver for ForgeInstallerResolver {
    async fn resolve(&self, item: &ItemDescriptor) -> ResolutionResult<ResolvedTarget> {
        if item.provider != ProviderKind::ForgeInstaller {
            return Err(ResolutionError::UnsupportedDescriptor {
                reason: format!("direct resolver cannot handle {} items", item.provider),
            });
        }

        Self::validate_version(&item.minecraft_version)?;
        Self::validate_version(&self.loader_version)?;

        let coordinate = format!("{}-{}", item.minecraft_version, self.loader_version);
        let filename = Self::installer_filename(&item.minecraft_version, &self.loader_version);
        let url = Url::parse(&format!(
            "{}/{}/{}/{}",
            self.maven_base,
            forge::INSTALLER_PATH,
            coordinate,
            filename
        ))
        .map_err(|_| ResolutionError::InvalidVersion {
            value: coordinate.clone(),
        })?;

        Ok(ResolvedTarget { filename, url })
    }
}
