use std::any::Any;
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::de::DeserializeOwned;

use crate::components::cli::{CliArguments, CliOptions};
use crate::config::error::ConfigError;
use crate::config::loader::load_config;
use crate::kernel::component::Component;
use crate::kernel::constants;
use crate::kernel::context::AppContext;
use crate::kernel::error::Result;
use crate::utils::path::{resolve_against, resolve_exec_path};

/// Loads a configuration file into `T` and registers it in the service registry.
///
/// When a CLI component is present it waits for parsed arguments so that the
/// `--config` override can be honoured.
pub struct ConfigComponent<T> {
    default_file: PathBuf,
    cli_key: String,
    base_dir: Option<PathBuf>,
    loaded_from: Option<PathBuf>,
    initialized: bool,
    _config: PhantomData<fn() -> T>,
}

impl<T> ConfigComponent<T>
where
    T: DeserializeOwned + Any + Send + Sync,
{
    pub fn new() -> Self {
        Self::with_file(constants::DEFAULT_CONFIG_FILE, constants::CONFIG_CLI_KEY)
    }

    /// `default_file` is used unless the CLI option `cli_key` is given.
    pub fn with_file(default_file: impl Into<PathBuf>, cli_key: impl Into<String>) -> Self {
        Self {
            default_file: default_file.into(),
            cli_key: cli_key.into(),
            base_dir: None,
            loaded_from: None,
            initialized: false,
            _config: PhantomData,
        }
    }

    /// Resolve relative paths against `dir` instead of the executable directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Path the configuration was read from, once loaded.
    pub fn loaded_from(&self) -> Option<&PathBuf> {
        self.loaded_from.as_ref()
    }

    fn resolve_file_path(&self, ctx: &AppContext) -> std::result::Result<PathBuf, ConfigError> {
        let services = ctx.services();
        let from_cli = if services.has::<CliArguments>() {
            services
                .get::<CliArguments>()
                .ok()
                .and_then(|args| args.get::<String>(&self.cli_key))
        } else {
            None
        };
        let requested = from_cli
            .map(PathBuf::from)
            .unwrap_or_else(|| self.default_file.clone());

        let resolved = match &self.base_dir {
            Some(dir) => resolve_against(dir, &requested),
            None => resolve_exec_path(&requested),
        };
        resolved.map_err(|e| ConfigError::PathResolution {
            path: requested,
            reason: e.to_string(),
        })
    }

    fn load(&mut self, ctx: &AppContext) -> Result<()> {
        let path = self.resolve_file_path(ctx)?;
        let config: T = load_config(&path).inspect_err(|e| {
            log::error!("Failed to load config file {}: {}", path.display(), e);
        })?;
        ctx.services().register(config)?;
        log::info!("Configuration loaded from {}", path.display());
        self.loaded_from = Some(path);
        Ok(())
    }
}

impl<T> Default for ConfigComponent<T>
where
    T: DeserializeOwned + Any + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Component for ConfigComponent<T>
where
    T: DeserializeOwned + Any + Send + Sync,
{
    fn name(&self) -> &str {
        "config"
    }

    fn initialize(&mut self, ctx: &AppContext) -> Result<bool> {
        let services = ctx.services();
        if services.has::<CliOptions>() && !services.has::<CliArguments>() {
            return Ok(false);
        }
        self.load(ctx)?;
        self.initialized = true;
        Ok(true)
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn process(&mut self, _ctx: &AppContext) -> Result<()> {
        Ok(())
    }
}
