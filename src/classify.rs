//! Request classification.
//!
//! Every request that names a user is sorted into one of four buckets before
//! any upstream work happens:
//!
//! | Verdict | Typical source |
//! |---|---|
//! | `legitimate` | a browser asking for a well-formed username |
//! | `bot` | crawlers, HTTP CLIs, scanners asking for a well-formed username |
//! | `suspicious` | malformed usernames, empty user-agents |
//! | `attack` | probes for admin panels, scripts, dotfiles and friends |
//!
//! Classification is pure: no I/O, no shared state, no allocation beyond one
//! lowercase copy of each input. It runs inline on every request.
//!
//! The pattern tables below are data. Add entries there, not branches here.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Longest username the upstream service will ever issue.
pub const MAX_USERNAME_LEN: usize = 64;

/// Substrings that never appear in a real username. Checked in order; the
/// first hit is reported as the reason.
pub const ATTACK_PATTERNS: &[&str] = &[
    // script and document extensions
    ".php", ".asp", ".aspx", ".jsp", ".cgi", ".pl", ".py", ".rb",
    ".html", ".htm", ".xml", ".json", ".txt", ".log", ".bak",
    // admin panels, CMS installs, infrastructure
    "admin", "administrator", "root", "test", "guest",
    "wp-", "wordpress", "drupal", "joomla", "phpmyadmin",
    "config", "backup", "database", "db", "sql", "ftp",
    "mail", "email", "webmail", "cpanel", "whm",
    "api", "rest", "graphql", "swagger",
    "login", "signin", "auth", "oauth", "sso",
    "robots.txt", "sitemap.xml", "favicon.ico",
    // punctuation
    ".", "..", "~", "@", "#", "$", "%", "^", "&", "*",
    "(", ")", "[", "]", "{", "}", "<", ">", "|", "\\", "/",
    "'", "\"", "`", "=", "+", "?", "!", ";", ":",
];

/// User-agent substrings that mark automated clients.
pub const BOT_USER_AGENTS: &[&str] = &[
    "bot", "crawler", "spider", "scraper", "scanner",
    "curl", "wget", "python", "perl", "ruby", "php",
    "postman", "insomnia", "httpie",
    "nmap", "masscan", "zmap", "sqlmap",
    "nikto", "dirb", "gobuster", "dirbuster",
    "burp", "owasp", "zap",
];

/// One alphanumeric, or alphanumeric at both ends with alphanumerics and
/// hyphens in between.
static USERNAME_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9\-]*[a-zA-Z0-9]$|^[a-zA-Z0-9]$")
        .expect("username shape pattern compiles")
});

// ── Verdict ───────────────────────────────────────────────────────────────────

/// Outcome of classifying one request.
///
/// Not a severity scale. Each verdict has its own row in the admission table
/// (see [`crate::middleware::admission`]), so never compare them by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Legitimate,
    Bot,
    Suspicious,
    Attack,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Legitimate => "legitimate",
            Self::Bot        => "bot",
            Self::Suspicious => "suspicious",
            Self::Attack     => "attack",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Username validation ───────────────────────────────────────────────────────

/// Result of [`validate_username`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameCheck {
    pub valid: bool,
    pub verdict: Verdict,
    /// Why the username was rejected. Empty when `valid`.
    pub reason: String,
}

impl UsernameCheck {
    fn ok() -> Self {
        Self { valid: true, verdict: Verdict::Legitimate, reason: String::new() }
    }

    fn reject(verdict: Verdict, reason: impl Into<String>) -> Self {
        Self { valid: false, verdict, reason: reason.into() }
    }
}

/// Checks a username against the length limit, the attack-pattern table and
/// the username shape, in that order.
pub fn validate_username(username: &str) -> UsernameCheck {
    if username.is_empty() {
        return UsernameCheck::reject(Verdict::Suspicious, "empty username");
    }

    if username.len() > MAX_USERNAME_LEN {
        return UsernameCheck::reject(Verdict::Suspicious, "username too long");
    }

    let lower = username.to_lowercase();
    if let Some(pattern) = ATTACK_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return UsernameCheck::reject(
            Verdict::Attack,
            format!("contains attack pattern: {pattern}"),
        );
    }

    if !USERNAME_SHAPE.is_match(username) {
        return UsernameCheck::reject(Verdict::Suspicious, "invalid username format");
    }

    UsernameCheck::ok()
}

// ── User-agent classification ─────────────────────────────────────────────────

/// Empty user-agents are suspicious; known tooling is a bot; the rest pass.
pub fn classify_user_agent(user_agent: &str) -> Verdict {
    if user_agent.is_empty() {
        return Verdict::Suspicious;
    }

    let lower = user_agent.to_lowercase();
    if BOT_USER_AGENTS.iter().any(|token| lower.contains(token)) {
        return Verdict::Bot;
    }

    Verdict::Legitimate
}

// ── Combined ──────────────────────────────────────────────────────────────────

/// Classifies a request.
///
/// The username decides first. A rejected username short-circuits and the
/// user-agent is never looked at, so a malformed name from a browser is
/// `suspicious` while a clean name from a scanner is only a `bot`.
pub fn classify(username: &str, user_agent: &str, path: &str) -> Verdict {
    let check = validate_username(username);
    if !check.valid {
        debug!(
            username,
            classification = %check.verdict,
            reason = %check.reason,
            user_agent,
            path,
            "invalid username detected"
        );
        return check.verdict;
    }

    classify_user_agent(user_agent)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BROWSER: &str =
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 Version/17.4 Safari/605.1.15";

    #[test]
    fn well_formed_usernames_are_legitimate() {
        for name in ["a", "Z", "7", "ab", "alice", "Bob42", "dj-shadow", "a-b-c", "x1-y2-z3"] {
            assert_eq!(classify(name, BROWSER, &format!("/{name}")), Verdict::Legitimate, "{name}");
        }
    }

    #[test]
    fn attack_patterns_win_regardless_of_case() {
        for name in ["wp-admin", "WP-ADMIN", "phpMyAdmin", "myconfig", "OAuth2", "index.php", "a.b"] {
            assert_eq!(classify(name, BROWSER, "/"), Verdict::Attack, "{name}");
        }
    }

    #[test]
    fn attack_patterns_win_over_valid_shape() {
        // shape-valid, but contains "test" / "db" / "api"
        for name in ["tester", "dbz", "rapid"] {
            assert!(USERNAME_SHAPE.is_match(name));
            assert_eq!(classify(name, BROWSER, "/"), Verdict::Attack, "{name}");
        }
    }

    #[test]
    fn every_attack_pattern_is_detected() {
        for pattern in ATTACK_PATTERNS {
            let name = format!("x{pattern}x");
            let check = validate_username(&name);
            assert_eq!(check.verdict, Verdict::Attack, "{name}");
            assert!(!check.valid);
        }
    }

    #[test]
    fn first_matching_pattern_is_reported() {
        let check = validate_username("admin.php");
        assert_eq!(check.reason, "contains attack pattern: .php");
    }

    #[test]
    fn empty_username_is_suspicious() {
        assert_eq!(classify("", BROWSER, "/"), Verdict::Suspicious);
        assert_eq!(classify("", "curl/8.4.0", "/"), Verdict::Suspicious);
        assert_eq!(validate_username("").reason, "empty username");
    }

    #[test]
    fn overlong_username_is_suspicious() {
        let name = "a".repeat(MAX_USERNAME_LEN + 1);
        let check = validate_username(&name);
        assert_eq!(check.verdict, Verdict::Suspicious);
        assert_eq!(check.reason, "username too long");
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LEN)).valid);
    }

    #[test]
    fn bad_shape_is_suspicious() {
        for name in ["-alice", "alice-", "-", "al_ice", "ålice"] {
            let check = validate_username(name);
            assert_eq!(check.verdict, Verdict::Suspicious, "{name}");
            assert_eq!(check.reason, "invalid username format");
        }
    }

    #[test]
    fn empty_user_agent_is_suspicious_for_valid_username() {
        assert_eq!(classify("ok-user", "", "/ok-user"), Verdict::Suspicious);
        assert_eq!(classify("night-owl", "", "/night-owl"), Verdict::Suspicious);
    }

    #[test]
    fn names_containing_user_are_not_attacks() {
        assert_eq!(classify("validuser", BROWSER, "/validuser"), Verdict::Legitimate);
        assert_eq!(classify("ok-user", BROWSER, "/ok-user"), Verdict::Legitimate);
        assert!(validate_username("superuser").valid);
    }

    #[test]
    fn tooling_user_agents_are_bots() {
        for ua in ["curl/8.4.0", "Wget/1.21", "python-requests/2.31", "Googlebot/2.1", "sqlmap/1.7", "PostmanRuntime/7.36"] {
            assert_eq!(classify_user_agent(ua), Verdict::Bot, "{ua}");
            assert_eq!(classify("alice", ua, "/alice"), Verdict::Bot, "{ua}");
        }
    }

    #[test]
    fn invalid_username_skips_user_agent() {
        assert_eq!(classify("-bad", "curl/8.4.0", "/-bad"), Verdict::Suspicious);
        assert_eq!(classify("wp-login", "", "/wp-login"), Verdict::Attack);
    }
}
