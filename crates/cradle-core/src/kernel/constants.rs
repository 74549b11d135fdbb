use std::time::Duration;

/// Library name
pub const APP_NAME: &str = "Cradle";

/// Library version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit code for a clean shutdown
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code used when an unhandled failure terminates the run loop
pub const EXIT_FATAL: i32 = -1;

/// Pause between unsuccessful initialization passes
pub const DEFAULT_INIT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Default configuration file, resolved next to the executable
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// CLI option id that overrides the configuration file path
pub const CONFIG_CLI_KEY: &str = "config";

/// CLI flag id that raises log verbosity
pub const DEBUG_CLI_KEY: &str = "debug";

/// Sleep per pass of a loop component that has nothing to execute
pub const DEFAULT_IDLE_SLEEP: Duration = Duration::from_millis(1);
