//! Voice-triggered actions.
//!
//! Matches configured regex rules against a transcript and runs the command
//! of the first rule that matches. Default rules open the macOS Weather and
//! Calculator apps when the transcript mentions them.

use std::process::Command;

use regex::Regex;

use crate::config::ActionRule;

/// Finds the first rule whose pattern matches the transcript.
///
/// Rules with invalid regex patterns are logged and skipped.
pub fn find_match<'a>(rules: &'a [ActionRule], transcript: &str) -> Option<&'a ActionRule> {
    for rule in rules {
        let regex = match Regex::new(&rule.pattern) {
            Ok(regex) => regex,
            Err(e) => {
                tracing::warn!("Invalid action pattern '{}': {e}", rule.pattern);
                continue;
            }
        };

        if regex.is_match(transcript) {
            return Some(rule);
        }
    }

    None
}

/// Dispatches the first matching action for a transcript, if any.
///
/// The command's exit status is logged; a failing or missing command never
/// propagates an error since the transcript itself was already produced.
pub fn dispatch(rules: &[ActionRule], transcript: &str) -> bool {
    let Some(rule) = find_match(rules, transcript) else {
        tracing::debug!("No action matched the transcript");
        return false;
    };

    tracing::info!(
        "Action matched ('{}'): running {} {:?}",
        rule.pattern,
        rule.command,
        rule.args
    );

    match Command::new(&rule.command).args(&rule.args).status() {
        Ok(status) if status.success() => {
            tracing::info!("Action command completed");
            true
        }
        Ok(status) => {
            tracing::error!(
                "Action command exited with code {}",
                status.code().unwrap_or(-1)
            );
            false
        }
        Err(e) => {
            tracing::error!("Failed to run action command '{}': {e}", rule.command);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, command: &str) -> ActionRule {
        ActionRule {
            pattern: pattern.to_string(),
            command: command.to_string(),
            args: Vec::new(),
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = vec![
            rule(r"(?i)\bweather\b", "open-weather"),
            rule(r"(?i)\bcalculator\b", "open-calculator"),
        ];

        let matched = find_match(&rules, "What's the weather like today?").unwrap();
        assert_eq!(matched.command, "open-weather");

        let matched = find_match(&rules, "Open the calculator please").unwrap();
        assert_eq!(matched.command, "open-calculator");
    }

    #[test]
    fn matching_is_case_insensitive_with_default_patterns() {
        let rules = vec![rule(r"(?i)\bweather\b", "open-weather")];
        assert!(find_match(&rules, "WEATHER report").is_some());
    }

    #[test]
    fn no_match_returns_none() {
        let rules = vec![rule(r"(?i)\bweather\b", "open-weather")];
        assert!(find_match(&rules, "Set a timer for five minutes").is_none());
    }

    #[test]
    fn word_boundaries_prevent_substring_matches() {
        let rules = vec![rule(r"(?i)\bweather\b", "open-weather")];
        assert!(find_match(&rules, "whether we go or not").is_none());
        assert!(find_match(&rules, "weathering the storm").is_none());
    }

    #[test]
    fn invalid_pattern_is_skipped() {
        let rules = vec![
            rule(r"(unclosed", "broken"),
            rule(r"(?i)\bweather\b", "open-weather"),
        ];

        let matched = find_match(&rules, "weather").unwrap();
        assert_eq!(matched.command, "open-weather");
    }
}
