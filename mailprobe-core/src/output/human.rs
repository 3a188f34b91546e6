use colored::Colorize;

use super::OutputFormatter;
use crate::bulk::BulkResult;
use crate::status::StatusId;

pub struct HumanFormatter {
    use_colors: bool,
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    fn status_label(&self, result: &BulkResult) -> String {
        if !self.use_colors {
            return result.status.name.clone();
        }
        let name = result.status.name.as_str();
        match result.status.id {
            StatusId::Live => name.bright_green().bold().to_string(),
            StatusId::NotExists => name.bright_yellow().to_string(),
            StatusId::Disabled | StatusId::VerifyPhone => name.bright_magenta().to_string(),
            StatusId::CheckError | StatusId::FormatInvalid => name.bright_red().to_string(),
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_result(&self, result: &BulkResult) -> String {
        format!(
            "{:<40} {} ({}ms)",
            result.email,
            self.status_label(result),
            result.duration_ms
        )
    }

    fn format_report(&self, results: &[BulkResult]) -> String {
        results
            .iter()
            .map(|result| self.format_result(result))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
