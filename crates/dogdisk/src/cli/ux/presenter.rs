use console::{Style, StyledObject};

use crate::svc::scenario::BreedOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Heading,
    Footer,
    Pass,
    Error,
}

pub fn style_text(text: &str, style: MessageType) -> StyledObject<&str> {
    let style_obj = match style {
        MessageType::Heading => Style::new().blue().bold(),
        MessageType::Footer => Style::new().white().dim(),
        MessageType::Pass => Style::new().green().bold(),
        MessageType::Error => Style::new().red().bold(),
    };
    style_obj.apply_to(text)
}

/// One summary line per breed, e.g. `PASS bulldog: 2 files in test_folder_bulldog`.
pub fn format_outcome(outcome: &BreedOutcome) -> String {
    match &outcome.result {
        Ok(report) => {
            let files = match report.files.len() {
                1 => "1 file".to_string(),
                n => format!("{n} files"),
            };
            let mut line = format!(
                "{} {}: {files} in {}",
                style_text("PASS", MessageType::Pass),
                report.breed,
                report.folder
            );
            if !report.sub_breeds.is_empty() {
                line.push_str(&format!(" ({})", report.sub_breeds.join(", ")));
            }
            line
        }
        Err(e) => format!(
            "{} {}: {e:#}",
            style_text("FAIL", MessageType::Error),
            outcome.breed
        ),
    }
}
