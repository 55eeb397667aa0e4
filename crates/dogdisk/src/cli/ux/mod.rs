mod presenter;
mod progress;

pub use presenter::{MessageType, format_outcome, style_text};
pub use progress::StepSpinner;

use console::style;

pub fn present_error(error: anyhow::Error) {
    let error_text = style("ERROR:").red().bold();
    eprintln!("\n{error_text} {error:#}");
}
