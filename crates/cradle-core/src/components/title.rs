use std::io::Write;

use console::Term;

use crate::kernel::component::Component;
use crate::kernel::context::AppContext;
use crate::kernel::error::Result;
use crate::utils::path::exec_name;

/// Sets the terminal window title. Always ready.
#[derive(Debug, Default)]
pub struct TitleComponent {
    title: String,
}

impl TitleComponent {
    pub fn new(title: impl Into<String>) -> Self {
        let mut component = Self::default();
        let title = title.into();
        if !title.is_empty() {
            component.set_title(title);
        }
        component
    }

    /// Update the title. Nothing is written when stdout is not a terminal.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        let mut term = Term::stdout();
        if !term.is_term() {
            return;
        }
        // OSC 0 sets both the icon name and the window title.
        if let Err(e) = write!(term, "\x1b]0;{}\x07", self.title).and_then(|_| term.flush()) {
            log::warn!("Failed to set terminal title: {}", e);
        }
    }

    /// Last title set.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn executable_name() -> String {
        exec_name()
    }
}

impl Component for TitleComponent {
    fn name(&self) -> &str {
        "title"
    }

    fn initialize(&mut self, _ctx: &AppContext) -> Result<bool> {
        Ok(true)
    }

    fn is_initialized(&self) -> bool {
        true
    }

    fn process(&mut self, _ctx: &AppContext) -> Result<()> {
        Ok(())
    }
}
