use console::style;
use serde::Serialize;
use std::fmt::Display;
use tabled::{settings::Style, Table, Tabled};

/// Output format mode
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Human,
    Json,
}

pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self {
            format: if json { OutputFormat::Json } else { OutputFormat::Human },
        }
    }

    pub fn success(&self, message: impl Display) {
        if let OutputFormat::Human = self.format {
            println!("{} {}", style("✓").green().bold(), message);
        }
    }

    pub fn info(&self, message: impl Display) {
        if let OutputFormat::Human = self.format {
            println!("{} {}", style("ℹ").blue().bold(), message);
        }
    }

    pub fn warning(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", style("⚠").yellow().bold(), message);
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "status": "warning",
                    "message": message.to_string(),
                });
                eprintln!("{}", output);
            }
        }
    }

    /// Report a failed command; in JSON mode the error goes to stdout so
    /// callers always get one JSON document
    pub fn error(&self, message: impl Display, kind: &str) {
        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", style("✗").red().bold(), message);
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "status": "error",
                    "kind": kind,
                    "message": message.to_string(),
                });
                match serde_json::to_string_pretty(&output) {
                    Ok(json) => println!("{}", json),
                    Err(_) => println!("{}", output),
                }
            }
        }
    }

    /// Render rows as a table; JSON output is produced by [`Self::result`]
    pub fn table<T: Tabled>(&self, rows: Vec<T>) {
        if let OutputFormat::Human = self.format {
            if rows.is_empty() {
                println!("{}", style("(no data)").dim());
            } else {
                let mut table = Table::new(rows);
                table.with(Style::rounded());
                println!("{}", table);
            }
        }
    }

    /// Emit the command's result document in JSON mode
    pub fn result<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if let OutputFormat::Json = self.format {
            let output = serde_json::json!({
                "status": "success",
                "data": data,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Ok(())
    }

    pub fn kv(&self, key: impl Display, value: impl Display) {
        if let OutputFormat::Human = self.format {
            println!("{}: {}", style(key).bold(), value);
        }
    }

    pub fn section(&self, title: impl Display) {
        if let OutputFormat::Human = self.format {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}

/// Format a distance for display
pub fn meters(distance: f64) -> String {
    if distance >= 1_000.0 {
        format!("{:.2} km", distance / 1_000.0)
    } else {
        format!("{:.1} m", distance)
    }
}

/// Format an optional distance for display
pub fn maybe_meters(distance: Option<f64>) -> String {
    distance.map(meters).unwrap_or_else(|| "-".to_string())
}
