//! Light markdown rendering for AI explanations in the terminal.
//!
//! Handles exactly what the explanations use: `##`/`###` headings,
//! `**bold**`, `` `inline code` ``, and line breaks, as ANSI styling.

const BOLD: &str = "\x1b[1m";
const UNDERLINE: &str = "\x1b[4m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Render markdown-ish text for the terminal.
pub fn render_markdown(text: &str) -> String {
    text.lines()
        .map(|line| {
            if let Some(rest) = line.strip_prefix("### ") {
                format!("{BOLD}{rest}{RESET}")
            } else if let Some(rest) = line.strip_prefix("## ") {
                format!("{BOLD}{UNDERLINE}{rest}{RESET}")
            } else {
                let styled = style_pairs(line, "**", BOLD);
                style_pairs(&styled, "`", CYAN)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Style text between pairs of `delimiter`. An unpaired trailing delimiter
/// is left as-is.
fn style_pairs(text: &str, delimiter: &str, style: &str) -> String {
    let parts: Vec<&str> = text.split(delimiter).collect();
    if parts.len() < 3 {
        return text.to_string();
    }

    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        let is_last = i + 1 == parts.len();
        if i % 2 == 1 && !is_last {
            out.push_str(style);
            out.push_str(part);
            out.push_str(RESET);
        } else {
            if i % 2 == 1 {
                // Odd, unpaired remainder: restore the delimiter we split on.
                out.push_str(delimiter);
            }
            out.push_str(part);
        }
    }
    out
}
