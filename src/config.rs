//! Configuration management for the filesystem proxy
//!
//! Defaults are set in code; `config.toml` and `FS_PROXY_*` environment
//! variables override them, in that order. List keys (`allowed_roots`,
//! `resolver.args`) are comma-separated in the environment.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Complete proxy configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address the request listener binds to. Keep this on loopback:
    /// callers are trusted only as far as the local machine is.
    /// Environment: FS_PROXY_BIND_ADDRESS
    pub bind_address: String,

    /// Environment: FS_PROXY_PORT
    pub port: u16,

    /// Maximum concurrent connections
    pub max_clients: usize,

    /// Maximum request line length in bytes
    pub max_request_length: usize,

    /// Paths outside these roots are rejected. Empty allows any absolute path.
    #[serde(default)]
    pub allowed_roots: Vec<PathBuf>,

    pub resolver: ResolverConfig,
}

/// How the validation engine resolves paths
#[derive(Debug, Deserialize, Clone)]
pub struct ResolverConfig {
    /// Environment: FS_PROXY_RESOLVER__KIND
    pub kind: ResolverKind,

    /// External utility used by the subprocess resolver
    pub program: String,
    pub args: Vec<String>,

    /// Environment variable carrying the candidate path to `program`
    pub env_var: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    /// Stat the path through the OS
    Native,
    /// Always ask the external utility
    Subprocess,
    /// External utility for UNC share paths, native otherwise
    Auto,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".into(),
            port: 7350,
            max_clients: 16,
            max_request_length: 4096,
            allowed_roots: Vec::new(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            kind: ResolverKind::Auto,
            program: "powershell".into(),
            args: vec!["/c".into(), "Test-Path $Env:remotepath".into()],
            env_var: "remotepath".into(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix("FS_PROXY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("allowed_roots")
            .with_list_parse_key("resolver.args")
    }

    fn load_with_env(env: Environment) -> Result<Self, ConfigError> {
        let config_paths = [
            "fs-proxy/config", // packaged layout: <install dir>/fs-proxy/config.toml
            "config",          // local development: ./config.toml
        ];

        let mut builder = Self::defaults(Config::builder())?;
        for config_path in config_paths {
            builder = builder.add_source(File::with_name(config_path).required(false));
        }

        let settings = builder.add_source(env).build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file, still honouring defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Self::defaults(Config::builder())?
            .add_source(File::from(path))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let defaults = ServerConfig::default();
        builder
            .set_default("bind_address", defaults.bind_address)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("max_clients", defaults.max_clients as i64)?
            .set_default("max_request_length", defaults.max_request_length as i64)?
            .set_default("allowed_roots", Vec::<String>::new())?
            .set_default("resolver.kind", "auto")?
            .set_default("resolver.program", defaults.resolver.program)?
            .set_default("resolver.args", defaults.resolver.args)?
            .set_default("resolver.env_var", defaults.resolver.env_var)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.is_empty() {
            return Err(ConfigError::Message("bind_address cannot be empty".into()));
        }

        if self.max_clients == 0 {
            return Err(ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.max_request_length == 0 {
            return Err(ConfigError::Message(
                "max_request_length must be greater than 0".into(),
            ));
        }

        if let Some(root) = self.allowed_roots.iter().find(|r| !r.is_absolute()) {
            return Err(ConfigError::Message(format!(
                "allowed root must be absolute: {}",
                root.display()
            )));
        }

        if self.resolver.kind != ResolverKind::Native && self.resolver.program.is_empty() {
            return Err(ConfigError::Message(
                "resolver.program cannot be empty".into(),
            ));
        }

        if self.resolver.env_var.is_empty() || self.resolver.env_var.contains('=') {
            return Err(ConfigError::Message(
                "resolver.env_var must be a non-empty name without '='".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
