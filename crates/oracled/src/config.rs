//! Configuration file handling for oracled

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use oracle_api::SearchLimits;
use oracle_data::CatalogSource;
use serde::Deserialize;

/// Daemon configuration (TOML)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 18090,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Serve the sample dataset compiled into the binary
    pub builtin: bool,
    /// Catalog files or directories, relative to the config file
    pub paths: Vec<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            builtin: true,
            paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let limits = SearchLimits::default();
        Self {
            default_limit: limits.default_limit,
            max_limit: limits.max_limit,
        }
    }
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path.
    ///
    /// Relative catalog paths are resolved against the config file's directory.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(base) = path.parent() {
            for p in &mut config.catalog.paths {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            }
        }
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.search.default_limit == 0 {
            bail!("search.default_limit must be greater than zero");
        }
        if self.search.max_limit < self.search.default_limit {
            bail!(
                "search.max_limit ({}) is below search.default_limit ({})",
                self.search.max_limit,
                self.search.default_limit
            );
        }
        Ok(())
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(mut self, port: Option<u16>, data: &[PathBuf], no_builtin: bool) -> Self {
        if let Some(port) = port {
            self.server.port = port;
        }
        self.catalog.paths.extend(data.iter().cloned());
        if no_builtin {
            self.catalog.builtin = false;
        }
        self
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.bind, self.server.port)
    }

    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource {
            builtin: self.catalog.builtin,
            paths: self.catalog.paths.clone(),
        }
    }

    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            default_limit: self.search.default_limit,
            max_limit: self.search.max_limit,
        }
    }
}
