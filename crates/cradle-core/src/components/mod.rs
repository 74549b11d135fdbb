//! Stock components for console programs.
//!
//! Each one is an ordinary [`Component`](crate::kernel::Component); add the ones
//! you need to an [`Application`](crate::kernel::Application) in the order they
//! should initialize and process.
pub mod cli;
pub mod logger;
pub mod logo;
pub mod loop_component;
pub mod title;

pub use cli::{CliArguments, CliComponent, CliOptions};
pub use logger::{LogControl, LoggerComponent};
pub use logo::LogoComponent;
pub use loop_component::{AppLoop, LoopComponent, LoopHost};
pub use title::TitleComponent;

#[cfg(test)]
mod tests;
