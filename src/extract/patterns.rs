use std::sync::LazyLock;

use regex::Regex;

pub const SAFETY_CONFIRMED: &str = "Driver confirmed everyone is safe";
pub const NO_INJURIES: &str = "No injuries reported";
pub const INJURIES: &str = "Injuries reported";

/// Location mentions, highest priority first. Matched case-insensitively
/// against the original transcript.
static LOCATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(
            r"(?i)\b(on\s+(?:i-?\d+|interstate\s+\d+|highway\s+\d+|hwy\s+\d+|route\s+\d+))",
        )
        .unwrap(),
        // Horizontal whitespace only, so a match stops at the end of the utterance
        Regex::new(r"(?i)\b(near[ \t]+[a-z][a-z \t]*)").unwrap(),
        Regex::new(r"(?i)\b(mile\s+marker\s+\d+)").unwrap(),
        Regex::new(r"(?i)\b(exit\s+\d+)").unwrap(),
        Regex::new(r"(?i)\b((?:(?:at|into|to)\s+)?door\s+#?\d+)").unwrap(),
    ]
});

/// ETA mentions, highest priority first
static ETA_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(
            r"(?i)\b((?:tomorrow|today|tonight)\s*(?:at\s*)?\d{1,2}(?::\d{2})?\s*(?:am|pm)?)",
        )
        .unwrap(),
        Regex::new(r"(?i)(\d{1,2}:\d{2}\s*(?:am|pm)?)").unwrap(),
        Regex::new(r"(?i)\b(in\s+\d+\s+(?:hours?|minutes?))").unwrap(),
        Regex::new(r"(?i)\b(\d+\s+hours?\s+(?:away|out))").unwrap(),
    ]
});

// The remaining patterns run on lower-cased text.

static SAFETY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"everyone.*(ok|safe|fine)|we('re| are) (ok|safe|fine)|i('m| am) (ok|safe)").unwrap()
});

static NO_INJURY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"no injur|no one.*hurt|nobody.*hurt|everyone.*ok").unwrap()
});

static INJURY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"injur|hurt|bleeding").unwrap());

static LOAD_SECURE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"load.*(secure|fine|ok|good)").unwrap());

static LOAD_COMPROMISED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"load.*(damage|spill|shift)").unwrap());

/// First capture of the first pattern that matches, trimmed
fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Where the driver or the incident is, e.g. "on I-10" or "exit 42"
pub fn extract_location(original: &str) -> Option<String> {
    first_capture(&LOCATION_PATTERNS, original)
}

/// Expected arrival, e.g. "tomorrow at 8 am" or "in 2 hours"
pub fn extract_eta(original: &str) -> Option<String> {
    first_capture(&ETA_PATTERNS, original)
}

pub fn safety_status(lower: &str) -> Option<String> {
    SAFETY_PATTERN
        .is_match(lower)
        .then(|| SAFETY_CONFIRMED.to_string())
}

/// Negated phrasing is checked first, so "no one is hurt" is not an injury
pub fn injury_status(lower: &str) -> Option<String> {
    if NO_INJURY_PATTERN.is_match(lower) {
        Some(NO_INJURIES.to_string())
    } else if INJURY_PATTERN.is_match(lower) {
        Some(INJURIES.to_string())
    } else {
        None
    }
}

/// `None` when the load never came up
pub fn load_secure(lower: &str) -> Option<bool> {
    if LOAD_SECURE_PATTERN.is_match(lower) {
        Some(true)
    } else if LOAD_COMPROMISED_PATTERN.is_match(lower) {
        Some(false)
    } else {
        None
    }
}

/// First reason in `reasons` found in the text, capitalized
pub fn delay_reason(lower: &str, reasons: &[String]) -> Option<String> {
    reasons
        .iter()
        .find(|r| lower.contains(r.as_str()))
        .map(|r| capitalize(r))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
