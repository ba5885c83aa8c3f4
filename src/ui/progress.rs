use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::domain::TransferDirection;
use crate::http::{ProgressCallback, ProgressEvent};

use super::formatting::format_size;

const BAR_WIDTH: u64 = 30;
const NOT_DRAWN: u64 = u64::MAX;

/// Progress callback drawing a single line on stderr, or `None` when
/// stderr is not a terminal.
#[must_use]
pub fn progress_reporter(no_color: bool) -> Option<ProgressCallback> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    let last_percent = Arc::new(AtomicU64::new(NOT_DRAWN));
    Some(Arc::new(move |event: ProgressEvent| {
        let percent = event.percent().unwrap_or(0);
        if last_percent.swap(percent, Ordering::Relaxed) == percent {
            return;
        }
        if render_progress_line(&event, no_color).is_err() {
            last_percent.store(NOT_DRAWN, Ordering::Relaxed);
        }
    }))
}

/// Moves past the progress line once the attempt is over.
///
/// # Errors
///
/// Returns an error when stderr cannot be written.
pub fn finish_progress_line() -> Result<(), std::io::Error> {
    if !std::io::stderr().is_terminal() {
        return Ok(());
    }
    let mut out = std::io::stderr();
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

fn render_progress_line(event: &ProgressEvent, no_color: bool) -> Result<(), std::io::Error> {
    let (bar, percent_text, size_text) = build_progress_line(event);
    let mut out = std::io::stderr();
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    queue!(out, Print(bar))?;
    if no_color {
        queue!(out, Print(percent_text), Print(size_text))?;
    } else {
        queue!(
            out,
            SetForegroundColor(Color::Cyan),
            Print(percent_text),
            ResetColor,
            SetForegroundColor(Color::Yellow),
            Print(size_text),
            ResetColor
        )?;
    }
    out.flush()?;
    Ok(())
}

pub(super) fn build_progress_line(event: &ProgressEvent) -> (String, String, String) {
    let percent = event.percent().unwrap_or(0).min(100);
    let complete = percent
        .saturating_mul(BAR_WIDTH)
        .checked_div(100)
        .unwrap_or(0);
    let incomplete = BAR_WIDTH.saturating_sub(complete);
    let bar = format!(
        "[{}{}]",
        "#".repeat(usize::try_from(complete).unwrap_or(0)),
        "-".repeat(usize::try_from(incomplete).unwrap_or(0))
    );
    let verb = match event.direction {
        TransferDirection::Upload => "uploaded",
        TransferDirection::Download => "downloaded",
    };
    let total = event.total.map_or_else(|| "?".to_owned(), format_size);
    (
        bar,
        format!(" {}%", percent),
        format!(" | {} / {} {}", format_size(event.transferred), total, verb),
    )
}
