mod args;
mod commands;
mod handlers;
mod logging;
pub mod presentation;

pub use args::{
    AttachCommand, Cli, Commands, CompanyCommand, FilterAction, FilterCommand, LayoutCommand,
    LinkCommand, LogLevel, OppCommand, OutputFormat,
};
pub use commands::run;
