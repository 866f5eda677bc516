//! End-of-run summary rendering shared by the terminal UIs.

use crate::runner::RunReport;

use super::progress::format_duration;
use super::theme::RigupTheme;

/// Render the run summary as lines, styled with `theme`.
pub fn render_summary(report: &RunReport, theme: &RigupTheme) -> Vec<String> {
    let mut lines = Vec::new();
    let border = |s: &str| theme.border.apply_to(s).to_string();
    let bar = border("│");

    lines.push(String::new());
    lines.push(format!(
        "  {} {}",
        border("┌─"),
        theme.highlight.apply_to(format!(
            "Summary · started {}",
            report.started_at().format("%Y-%m-%d %H:%M")
        ))
    ));

    for record in report.records() {
        let icon = record.outcome.status_kind().styled(theme);
        let mut right = match record.outcome.detail() {
            Some(detail) if !detail.is_empty() => {
                format!("{}: {}", record.outcome.label(), detail)
            }
            _ => record.outcome.label().to_string(),
        };
        if let Some(note) = &record.note {
            right = format!("{} ({})", right, note);
        }
        if record.attempts > 1 {
            right = format!("{} [{} attempts]", right, record.attempts);
        }
        lines.push(format!(
            "  {} {} {:<20} {}",
            bar,
            icon,
            record.name,
            theme.dim.apply_to(right)
        ));
    }

    let counts = report.counts();
    lines.push(format!("  {}", border("├────────────────────────────────────")));
    lines.push(format!(
        "  {} {} succeeded · {} already satisfied · {} skipped · {} failed · {}",
        bar,
        counts.succeeded,
        counts.noop,
        counts.skipped,
        counts.failed,
        format_duration(report.duration()),
    ));
    lines.push(format!("  {}", border("└────────────────────────────────────")));

    let failed = report.failed_steps();
    if let Some(step) = report.halted_by() {
        lines.push(theme.format_error(&format!(
            "Run halted: required step '{}' failed",
            step
        )));
    } else if !failed.is_empty() {
        lines.push(theme.format_warning(&format!(
            "Finished with failures: {} (install these manually or re-run rigup)",
            failed.join(", ")
        )));
    } else if report.dry_run() {
        lines.push(theme.format_success(
            "Dry run complete. Re-run without --dry-run to apply these changes",
        ));
    } else {
        lines.push(theme.format_success("Setup complete!"));
    }

    lines.push(String::new());
    lines.push(format!("  {}", theme.highlight.apply_to("Manual follow-up:")));
    for (i, item) in report.follow_ups().iter().enumerate() {
        lines.push(format!("    {}. {}", i + 1, item));
    }

    lines
}
