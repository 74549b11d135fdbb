use std::sync::Arc;

use clap::{Arg, Command};
use serde::Deserialize;
use tempfile::tempdir;

use crate::components::cli::CliComponent;
use crate::config::component::ConfigComponent;
use crate::kernel::component::Component;
use crate::kernel::context::{AppContext, StopHandle};
use crate::kernel::error::Error;
use crate::kernel::registry::ServiceRegistry;

#[derive(Debug, Deserialize)]
struct AppConfig {
    text: String,
}

fn test_context() -> AppContext {
    AppContext::new(Arc::new(ServiceRegistry::new()), StopHandle::new())
}

fn config_arg(cmd: Command) -> Command {
    cmd.arg(Arg::new("config").short('c').long("config"))
}

#[test]
fn test_loads_default_file_and_registers_config() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"text": "default"}"#).unwrap();
    let ctx = test_context();

    let mut component = ConfigComponent::<AppConfig>::new().with_base_dir(dir.path());
    assert!(!component.is_initialized());
    assert!(component.initialize(&ctx).unwrap());

    assert!(component.is_initialized());
    assert_eq!(component.name(), "config");
    assert_eq!(ctx.services().get::<AppConfig>().unwrap().text, "default");
    assert_eq!(component.loaded_from(), Some(&dir.path().join("config.json")));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let ctx = test_context();
    let mut component = ConfigComponent::<AppConfig>::with_file("absent.json", "config").with_base_dir(dir.path());

    let err = component.initialize(&ctx).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(!component.is_initialized());
    assert!(!ctx.services().has::<AppConfig>());
}

#[test]
fn test_waits_for_parsed_arguments() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"text": "default"}"#).unwrap();
    std::fs::write(dir.path().join("other.json"), r#"{"text": "override"}"#).unwrap();
    let ctx = test_context();

    let mut cli = CliComponent::new("demo", "test", config_arg).with_args(["demo", "--config", "other.json"]);
    cli.on_register(ctx.services()).unwrap();

    let mut config = ConfigComponent::<AppConfig>::new().with_base_dir(dir.path());
    assert!(!config.initialize(&ctx).unwrap(), "Config must wait until arguments are parsed");

    assert!(cli.initialize(&ctx).unwrap());
    assert!(config.initialize(&ctx).unwrap());
    assert_eq!(ctx.services().get::<AppConfig>().unwrap().text, "override");
}

#[test]
fn test_absolute_cli_path_is_used_as_is() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("abs.jsonc");
    std::fs::write(&file, "{\"text\": \"absolute\" /* note */}").unwrap();
    let ctx = test_context();

    let mut cli = CliComponent::new("demo", "test", config_arg)
        .with_args(["demo".into(), "-c".into(), file.clone().into_os_string()]);
    cli.on_register(ctx.services()).unwrap();
    cli.initialize(&ctx).unwrap();

    let mut config = ConfigComponent::<AppConfig>::new().with_base_dir("/nonexistent");
    assert!(config.initialize(&ctx).unwrap());
    assert_eq!(config.loaded_from(), Some(&file));
}
