//! Slash-command text parsing.
//!
//! Recognised options:
//! - `--dry-run`: report-only mode, no remote state changes
//!
//! Matching is per whitespace-separated token and case-insensitive. Anything
//! else is kept in `rest` and otherwise ignored.

/// Options parsed from the command text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepCommand {
    pub dry_run: bool,
    /// Unrecognised tokens, in order.
    pub rest: Vec<String>,
}

impl SweepCommand {
    pub fn parse(text: &str) -> Self {
        let mut command = SweepCommand::default();
        for token in text.split_whitespace() {
            if token.eq_ignore_ascii_case("--dry-run") {
                command.dry_run = true;
            } else {
                command.rest.push(token.to_string());
            }
        }
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_live() {
        assert_eq!(SweepCommand::parse(""), SweepCommand::default());
        assert!(!SweepCommand::parse("   ").dry_run);
    }

    #[test]
    fn test_bare_flag() {
        assert!(SweepCommand::parse("--dry-run").dry_run);
    }

    #[test]
    fn test_flag_is_case_insensitive_and_trimmed() {
        assert!(SweepCommand::parse("  --DRY-RUN \n").dry_run);
    }

    #[test]
    fn test_trailing_text_is_harmless() {
        let cmd = SweepCommand::parse("please --dry-run now");
        assert!(cmd.dry_run);
        assert_eq!(cmd.rest, vec!["please", "now"]);
    }

    #[test]
    fn test_similar_tokens_do_not_enable_dry_run() {
        assert!(!SweepCommand::parse("--dry-runs").dry_run);
        assert!(!SweepCommand::parse("dry-run").dry_run);
    }
}
