use std::io::Write;

use clap::ValueEnum;
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::outcome::{Outcome, OutcomeKind};

use super::{escape_controls, sanitize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Html,
    Json,
}

const fn kind_color(kind: OutcomeKind) -> Color {
    match kind {
        OutcomeKind::Success => Color::Green,
        OutcomeKind::Warning => Color::Yellow,
        OutcomeKind::ApplicationError | OutcomeKind::ConnectionError => Color::Red,
    }
}

const fn html_class(kind: OutcomeKind) -> &'static str {
    match kind {
        OutcomeKind::Success => "text-success",
        OutcomeKind::Warning => "text-warning",
        OutcomeKind::ApplicationError | OutcomeKind::ConnectionError => "text-danger",
    }
}

/// `kind: message` followed by the server detail, uncoloured. Control
/// characters in either are escaped.
#[must_use]
pub fn render_plain(outcome: &Outcome) -> String {
    let mut lines = vec![format!(
        "{}: {}",
        outcome.kind.as_str(),
        escape_controls(&outcome.message)
    )];
    if let Some(detail) = outcome.detail.as_ref() {
        lines.push(escape_controls(detail.trim_end()));
    }
    lines.join("\n")
}

/// Paragraph fragment styled by outcome kind. Every piece of text passes
/// through `sanitize`.
#[must_use]
pub fn render_html(outcome: &Outcome) -> String {
    let prefix = match outcome.kind {
        OutcomeKind::ApplicationError => "an error occurred: ",
        OutcomeKind::Success | OutcomeKind::Warning | OutcomeKind::ConnectionError => "",
    };
    let detail = outcome
        .detail
        .as_deref()
        .map(|detail| format!("<br /><br />{}", sanitize(detail)))
        .unwrap_or_default();
    format!(
        "<p class=\"{}\">{}{}{}</p>",
        html_class(outcome.kind),
        prefix,
        sanitize(&outcome.message),
        detail
    )
}

/// # Errors
///
/// Returns an error when the outcome cannot be serialized.
pub fn render_json(outcome: &Outcome) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

/// Writes the outcome to stdout in `format`.
///
/// # Errors
///
/// Returns an error when stdout cannot be written.
pub fn print_outcome(outcome: &Outcome, format: OutputFormat, no_color: bool) -> AppResult<()> {
    let mut out = std::io::stdout();
    match format {
        OutputFormat::Plain if !no_color => {
            queue!(
                out,
                SetForegroundColor(kind_color(outcome.kind)),
                Print(outcome.kind.as_str()),
                ResetColor,
                Print(format!(": {}\n", escape_controls(&outcome.message)))
            )?;
            if let Some(detail) = outcome.detail.as_ref() {
                queue!(out, Print(format!("{}\n", escape_controls(detail.trim_end()))))?;
            }
        }
        OutputFormat::Plain => writeln!(out, "{}", render_plain(outcome))?,
        OutputFormat::Html => writeln!(out, "{}", render_html(outcome))?,
        OutputFormat::Json => writeln!(out, "{}", render_json(outcome)?)?,
    }
    out.flush()?;
    Ok(())
}
