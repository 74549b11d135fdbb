use std::any::Any;
use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{ArgMatches, Command};

use crate::kernel::component::Component;
use crate::kernel::context::AppContext;
use crate::kernel::error::Result;
use crate::kernel::registry::ServiceRegistry;

/// Published when a [`CliComponent`] is added. Its presence tells other
/// components that parsed arguments will show up as [`CliArguments`].
#[derive(Debug, Clone)]
pub struct CliOptions {
    name: String,
    about: String,
    help: String,
}

impl CliOptions {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn about(&self) -> &str {
        &self.about
    }

    /// Rendered `--help` text.
    pub fn help(&self) -> &str {
        &self.help
    }
}

/// Parsed command line, registered once parsing succeeded.
#[derive(Debug, Clone)]
pub struct CliArguments {
    matches: ArgMatches,
}

impl CliArguments {
    pub fn new(matches: ArgMatches) -> Self {
        Self { matches }
    }

    pub fn matches(&self) -> &ArgMatches {
        &self.matches
    }

    /// Value of option `id`, including its default. `None` for unknown ids or a
    /// type mismatch.
    pub fn get<T>(&self, id: &str) -> Option<T>
    where
        T: Any + Clone + Send + Sync + 'static,
    {
        self.matches.try_get_one::<T>(id).ok().flatten().cloned()
    }

    pub fn values<T>(&self, id: &str) -> Vec<T>
    where
        T: Any + Clone + Send + Sync + 'static,
    {
        match self.matches.try_get_many::<T>(id) {
            Ok(Some(values)) => values.cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// True for a `SetTrue` flag that was passed.
    pub fn flag(&self, id: &str) -> bool {
        matches!(self.matches.try_get_one::<bool>(id), Ok(Some(true)))
    }

    /// True when `id` was given explicitly (command line or environment), not
    /// just filled from a default.
    pub fn contains(&self, id: &str) -> bool {
        if !self.matches.try_contains_id(id).unwrap_or(false) {
            return false;
        }
        matches!(
            self.matches.value_source(id),
            Some(ValueSource::CommandLine) | Some(ValueSource::EnvVariable)
        )
    }
}

type CommandDefiner = Box<dyn FnOnce(Command) -> Command + Send>;

/// Parses the command line during initialization.
///
/// The option set comes from a definer closure applied to a `clap::Command`.
/// `--help` and `--version` print their text and request exit code 0.
pub struct CliComponent {
    name: String,
    about: String,
    definer: Option<CommandDefiner>,
    command: Option<Command>,
    args: Option<Vec<OsString>>,
    initialized: bool,
}

impl CliComponent {
    pub fn new<F>(name: impl Into<String>, about: impl Into<String>, definer: F) -> Self
    where
        F: FnOnce(Command) -> Command + Send + 'static,
    {
        Self {
            name: name.into(),
            about: about.into(),
            definer: Some(Box::new(definer)),
            command: None,
            args: None,
            initialized: false,
        }
    }

    /// Parse these arguments instead of the process arguments. The first item is
    /// the program name.
    pub fn with_args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    fn command(&mut self) -> &Command {
        let name = self.name.clone();
        let about = self.about.clone();
        let definer = self.definer.take();
        self.command.get_or_insert_with(|| {
            let base = Command::new(name).about(about);
            match definer {
                Some(define) => define(base),
                None => base,
            }
        })
    }
}

impl Component for CliComponent {
    fn name(&self) -> &str {
        "cli"
    }

    fn on_register(&mut self, services: &ServiceRegistry) -> Result<()> {
        let help = self.command().clone().render_help().to_string();
        services.register(CliOptions {
            name: self.name.clone(),
            about: self.about.clone(),
            help,
        })?;
        Ok(())
    }

    fn initialize(&mut self, ctx: &AppContext) -> Result<bool> {
        let command = self.command().clone();
        let args = self.args.clone().unwrap_or_else(|| std::env::args_os().collect());

        match command.try_get_matches_from(args) {
            Ok(matches) => {
                ctx.services().register(CliArguments::new(matches))?;
                self.initialized = true;
                Ok(true)
            }
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                let _ = e.print();
                log::debug!("Help or version requested, stopping");
                ctx.exit(0);
                self.initialized = true;
                Ok(true)
            }
            Err(e) => {
                log::error!("Error parsing command-line arguments: {}", e);
                Err(e.into())
            }
        }
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn process(&mut self, _ctx: &AppContext) -> Result<()> {
        Ok(())
    }
}
