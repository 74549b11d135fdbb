use std::io::Write;

use console::{Color, Term, style};

use crate::kernel::component::Component;
use crate::kernel::context::AppContext;
use crate::kernel::error::Result;

const DEFAULT_LOGO: &str = r"
  ____ ____      _    ____  _     _____
 / ___|  _ \    / \  |  _ \| |   | ____|
| |   | |_) |  / _ \ | | | | |   |  _|
| |___|  _ <  / ___ \| |_| | |___| |___
 \____|_| \_\/_/   \_\____/|_____|_____|
";

/// Prints an ASCII logo once during initialization.
pub struct LogoComponent {
    logo: String,
    color: Color,
    out: Box<dyn Write + Send>,
    initialized: bool,
}

impl LogoComponent {
    pub fn new(color: Color) -> Self {
        Self::with_logo(DEFAULT_LOGO.trim_start_matches('\n'), color)
    }

    pub fn with_logo(logo: impl Into<String>, color: Color) -> Self {
        Self {
            logo: logo.into(),
            color,
            out: Box::new(Term::stdout()),
            initialized: false,
        }
    }

    /// Write the logo somewhere other than stdout.
    pub fn with_writer<W: Write + Send + 'static>(mut self, out: W) -> Self {
        self.out = Box::new(out);
        self
    }

    pub fn set_logo(&mut self, logo: impl Into<String>, color: Color) {
        self.logo = logo.into();
        self.color = color;
    }

    pub fn logo(&self) -> &str {
        &self.logo
    }
}

impl Default for LogoComponent {
    fn default() -> Self {
        Self::new(Color::Yellow)
    }
}

impl Component for LogoComponent {
    fn name(&self) -> &str {
        "logo"
    }

    fn initialize(&mut self, _ctx: &AppContext) -> Result<bool> {
        if !self.logo.is_empty() {
            let styled = style(&self.logo).fg(self.color);
            if let Err(e) = writeln!(self.out, "{}", styled).and_then(|_| self.out.flush()) {
                log::warn!("Failed to print logo: {}", e);
            }
        }
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
