use std::thread;
use std::time::Duration;

use clap::{Args, FromArgMatches};
use console::{style, Color};
use log::{debug, info};
use serde::Deserialize;

use cradle_core::kernel::constants::{APP_NAME, EXIT_FATAL};
use cradle_core::{
    AppContext, AppLoop, Application, CliArguments, CliComponent, ConfigComponent, LogControl, LoggerComponent, LogoComponent,
    LoopHost, Result, TitleComponent,
};

/// Options understood by the demo, merged into the CLI component's command.
#[derive(Args, Debug)]
struct DemoArgs {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debugging mode
    #[arg(short, long)]
    debug: bool,

    /// Pause between loop passes in milliseconds, overrides the config file
    #[arg(short, long)]
    period: Option<u64>,

    /// Stop after this many loop passes
    #[arg(short, long)]
    iterations: Option<u64>,
}

fn default_period() -> u64 {
    10
}

/// Contents of `config.json`.
#[derive(Debug, Deserialize)]
struct DemoConfig {
    text: String,
    #[serde(default)]
    items: Vec<String>,
    #[serde(default = "default_period")]
    period: u64,
    #[serde(default)]
    debug_mode: bool,
}

#[derive(Debug, Default)]
struct DemoLoop {
    period: Option<u64>,
    iterations: Option<u64>,
    passes: u64,
}

impl AppLoop for DemoLoop {
    fn on_once(&mut self, ctx: &AppContext) -> Result<bool> {
        let services = ctx.services();
        // Nothing to do until arguments are parsed and the config is loaded.
        if !services.has::<CliArguments>() || !services.has::<DemoConfig>() {
            return Ok(false);
        }
        println!("{}{}", style("Hello, ").fg(Color::Green), style("world!").fg(Color::Yellow));

        let args = services.get::<CliArguments>()?;
        let demo = DemoArgs::from_arg_matches(args.matches())?;
        debug!("Parsed demo arguments: {:?}", demo);
        self.period = demo.period;
        self.iterations = demo.iterations;

        let config = services.get::<DemoConfig>()?;
        // The config file can switch debug logging on; `--debug` keeps it on.
        if services.has::<LogControl>() {
            services.get::<LogControl>()?.set_debug_mode(config.debug_mode || demo.debug)?;
        }
        if config.debug_mode {
            debug!("Debug mode enabled by the configuration file");
        }
        Ok(true)
    }

    fn on_loop(&mut self, ctx: &AppContext) -> Result<()> {
        if self.iterations.is_some_and(|max| self.passes >= max) {
            info!("Finished {} pass(es)", self.passes);
            ctx.stop();
            return Ok(());
        }
        self.passes += 1;

        let config = ctx.services().get::<DemoConfig>()?;
        println!("{}", config.text);
        println!("{}", style("items:").fg(Color::Green));
        for item in &config.items {
            println!("  {}", style(item).fg(Color::Cyan));
        }

        thread::sleep(Duration::from_millis(self.period.unwrap_or(config.period)));
        Ok(())
    }

    fn on_shutdown(&mut self, signal: i32) -> Result<()> {
        println!("Application is shutting down. Received signal: {}", signal);
        Ok(())
    }
}

fn build_application() -> Result<Application> {
    let mut app = Application::new();

    app.add(TitleComponent::new(format!("{} demo", APP_NAME)))?;
    // Added early so that later components log through it.
    app.add(LoggerComponent::new())?;
    app.add(CliComponent::new(
        "cradle",
        "A demonstration program showing logging, configuration and command-line handling.",
        |cmd| DemoArgs::augment_args(cmd.version(env!("CARGO_PKG_VERSION"))),
    ))?;
    app.add(LogoComponent::new(Color::Yellow))?;
    app.add(ConfigComponent::<DemoConfig>::new())?;
    app.add(LoopHost::named("demo-loop", DemoLoop::default()))?;

    Ok(app)
}

fn main() {
    match build_application() {
        Ok(app) => app.run_and_exit(),
        Err(e) => {
            eprintln!("Failed to set up application: {}", e);
            std::process::exit(EXIT_FATAL);
        }
    }
}
