//! Size/rate formatting, output sanitizing and outcome rendering.
pub mod formatting;
mod present;
mod progress;
mod sanitize;


pub use formatting::{format_rate, format_size, format_size_with};
pub use present::{OutputFormat, print_outcome, render_html, render_json, render_plain};
pub use progress::{finish_progress_line, progress_reporter};
pub use sanitize::{escape_controls, sanitize};
