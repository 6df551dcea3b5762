//! Result printing for every command.
//!
//! A [`Printer`] is built once from the global flags. Data goes to stdout
//! in the `--output` format; progress notes go to stderr and are silenced
//! by `--quiet`.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub struct Printer {
    format: OutputFormat,
    quiet: bool,
    color: bool,
}

impl Printer {
    pub fn new(global: &GlobalOpts) -> Self {
        let color = match global.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        };
        Self {
            format: global.output.clone(),
            quiet: global.quiet,
            color,
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// "online" / "offline", green or red when color is on.
    pub fn online(&self, online: bool) -> String {
        let label = if online { "online" } else { "offline" };
        match (self.color, online) {
            (false, _) => label.to_owned(),
            (true, true) => label.green().to_string(),
            (true, false) => label.red().to_string(),
        }
    }

    /// A collection: a rounded table of `row`s, the raw items as JSON, or
    /// one `key` per line.
    pub fn list<T, R>(
        &self,
        items: &[T],
        row: impl Fn(&T) -> R,
        key: impl Fn(&T) -> String,
    ) -> Result<(), CliError>
    where
        T: Serialize,
        R: Tabled,
    {
        let text = match self.format {
            OutputFormat::Table if items.is_empty() => String::from("(none)"),
            OutputFormat::Table => {
                let rows: Vec<R> = items.iter().map(row).collect();
                Table::new(rows).with(Style::rounded()).to_string()
            }
            OutputFormat::Json => serde_json::to_string_pretty(items)?,
            OutputFormat::JsonCompact => serde_json::to_string(items)?,
            OutputFormat::Plain => items.iter().map(key).collect::<Vec<_>>().join("\n"),
        };
        self.emit(&text)
    }

    /// A single value: `detail` renders the human block used for tables.
    pub fn item<T: Serialize>(
        &self,
        item: &T,
        detail: impl Fn(&T) -> String,
        key: impl Fn(&T) -> String,
    ) -> Result<(), CliError> {
        let text = match self.format {
            OutputFormat::Table => detail(item),
            OutputFormat::Json => serde_json::to_string_pretty(item)?,
            OutputFormat::JsonCompact => serde_json::to_string(item)?,
            OutputFormat::Plain => key(item),
        };
        self.emit(&text)
    }

    /// Unformatted line on stdout (paths and the like).
    pub fn line(&self, text: impl Display) -> Result<(), CliError> {
        self.emit(&text.to_string())
    }

    /// Status message on stderr.
    pub fn note(&self, text: impl Display) {
        if !self.quiet {
            eprintln!("{text}");
        }
    }

    fn emit(&self, text: &str) -> Result<(), CliError> {
        if self.quiet || text.is_empty() {
            return Ok(());
        }
        writeln!(io::stdout().lock(), "{text}")?;
        Ok(())
    }
}
