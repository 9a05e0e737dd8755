use crate::model::{RankEntry, ReportOutput};
use anyhow::Result;
use console::Style;
use std::io::Write;

/// Named style tokens used by every console line this tool prints.
#[derive(Debug, Clone)]
pub struct Palette {
    pub title: Style,
    pub label: Style,
    pub value: Style,
    pub rank: Style,
    pub subtle: Style,
    pub highlight: Style,
    pub error: Style,
}

impl Palette {
    pub fn colored() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().cyan(),
            value: Style::new().blue().bright(),
            rank: Style::new().dim(),
            subtle: Style::new().dim(),
            highlight: Style::new().magenta(),
            error: Style::new().red(),
        }
    }

    /// No escape sequences at all.
    pub fn plain() -> Self {
        Self {
            title: Style::new(),
            label: Style::new(),
            value: Style::new(),
            rank: Style::new(),
            subtle: Style::new(),
            highlight: Style::new(),
            error: Style::new(),
        }
    }

    pub fn for_terminal(no_color: bool) -> Self {
        if no_color || !console::colors_enabled() {
            Self::plain()
        } else {
            Self::colored()
        }
    }
}

pub fn output_json<W: Write>(out: &mut W, report: &ReportOutput) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
    Ok(())
}

pub fn output_report<W: Write>(
    out: &mut W,
    report: &ReportOutput,
    palette: &Palette,
) -> Result<()> {
    let rule = "#".to_string() + &"-".repeat(30) + "#";

    writeln!(out, "{}", palette.title.apply_to(&rule))?;
    writeln!(
        out,
        "{}",
        palette
            .title
            .apply_to(format!("{}/{} ({})", report.owner, report.repo, report.branch))
    )?;

    let totals = &report.totals;
    let lines = [
        ("Total lines of code", totals.lines_of_code.to_string()),
        ("Commits", totals.commits.to_string()),
        ("Merges", totals.merges.to_string()),
        ("Pull requests", totals.pull_requests.to_string()),
    ];
    for (label, value) in lines {
        writeln!(
            out,
            "{} {}",
            palette.label.apply_to(format!("{label}:")),
            palette.value.apply_to(value)
        )?;
    }

    let rankings = &report.rankings;
    output_top(out, "Most pull requests", &rankings.pull_request_authors, palette)?;
    output_top(out, "Most commits", &rankings.commit_authors, palette)?;
    output_top(out, "Largest files", &rankings.largest_files, palette)?;
    output_top(out, "Most changed files", &rankings.most_changed_files, palette)?;

    writeln!(out)?;
    writeln!(
        out,
        "{} {}",
        palette.subtle.apply_to("Requests made:"),
        palette.subtle.apply_to(totals.requests_made)
    )?;
    writeln!(
        out,
        "{} {}",
        palette.subtle.apply_to("Rate limit remaining:"),
        palette.highlight.apply_to(totals.rate_limit_remaining)
    )?;
    writeln!(out, "{}", palette.title.apply_to(&rule))?;
    Ok(())
}

fn output_top<W: Write>(
    out: &mut W,
    title: &str,
    entries: &[RankEntry],
    palette: &Palette,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", palette.title.apply_to(title))?;
    if entries.is_empty() {
        writeln!(out, "  {}", palette.subtle.apply_to("(none)"))?;
    }
    for (index, entry) in entries.iter().enumerate() {
        writeln!(
            out,
            "  {} {} {}",
            palette.rank.apply_to(format!("{}.", index + 1)),
            palette.highlight.apply_to(&entry.name),
            palette.subtle.apply_to(entry.count)
        )?;
    }
    Ok(())
}
