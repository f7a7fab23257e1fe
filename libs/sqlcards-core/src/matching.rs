//! Answer normalization and grading for typed practice answers.

/// Collapse whitespace runs to single spaces (trimming the ends) and
/// uppercase, so `"select "` grades equal to `SELECT`.
pub fn normalize_command(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Exact comparison of normalized answers.
pub fn answers_match(expected: &str, answer: &str) -> bool {
    normalize_command(expected) == normalize_command(answer)
}

/// The first third of the command (rounded up), followed by an ellipsis.
pub fn command_hint(command: &str) -> String {
    let chars: Vec<char> = command.chars().collect();
    let shown = chars.len().div_ceil(3);
    let mut hint: String = chars[..shown].iter().collect();
    hint.push_str("...");
    hint
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn trailing_space_normalizes_equal() {
        assert!(answers_match("SELECT", "select "));
        assert!(answers_match("GROUP BY", "  group   by"));
    }

    #[test]
    fn internal_split_does_not_match() {
        assert!(!answers_match("SELECT", "SE LECT"));
    }

    #[test]
    fn normalization_uppercases_and_collapses() {
        assert_eq!(normalize_command("  inner   join "), "INNER JOIN");
    }

    #[test]
    fn hint_shows_first_third_rounded_up() {
        assert_eq!(command_hint("SELECT"), "SE...");
        assert_eq!(command_hint("INSERT INTO"), "INSE...");
        assert_eq!(command_hint("A"), "A...");
    }
}
