//! Single-match pattern extraction over server-rendered pages.

use regex::Regex;

/// Run `pattern` over `text` and return its first capture group.
///
/// Zero matches is always `None`, never an empty-string success; an empty
/// capture from a real match is still a match.
pub(crate) fn capture(text: &str, pattern: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_first_group() {
        let text = "amsc=testCookie; path=/;";
        assert_eq!(
            capture(text, r"(?s)amsc=(.*?);"),
            Some("testCookie".to_string())
        );
    }

    #[test]
    fn non_greedy_match_stops_at_first_terminator() {
        let text = "var ServerData={\"apiCanary\":\"abc\"};var Other=1;";
        assert_eq!(
            capture(text, r"(?s)var ServerData=(.*?);"),
            Some("{\"apiCanary\":\"abc\"}".to_string())
        );
    }

    #[test]
    fn dot_matches_newline() {
        let text = "amsc=line1\nline2;";
        assert_eq!(
            capture(text, r"(?s)amsc=(.*?);"),
            Some("line1\nline2".to_string())
        );
    }

    #[test]
    fn zero_matches_is_none() {
        assert_eq!(capture("no cookies here", r"(?s)amsc=(.*?);"), None);
    }

    #[test]
    fn empty_capture_is_still_a_match() {
        assert_eq!(capture("amsc=;", r"(?s)amsc=(.*?);"), Some(String::new()));
    }
}
