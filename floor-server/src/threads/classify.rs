//! Keyword → tag auto-classification for free-text messages
//!
//! Ordered rules, first match wins: a message containing both a SECURITY
//! keyword and a FLOOR keyword classifies as SECURITY because that rule is
//! evaluated first. Matching is lower-cased substring containment.

use shared::thread::ThreadTag;

/// Keyword rules in evaluation order
const TAG_KEYWORD_RULES: &[(ThreadTag, &[&str])] = &[
    (
        ThreadTag::Security,
        &[
            "harass", "fight", "emergency", "help", "unsafe", "threat", "weapon", "security",
            "assault", "trouble",
        ],
    ),
    (
        ThreadTag::Floor,
        &[
            "need my waitress",
            "need waitress",
            "need ice",
            "need water",
            "need hookah",
            "need coal",
            "need another bottle",
            "need btl",
            "another bottle",
            "more ice",
            "more water",
            "hookah",
            "coal",
            "refill",
            "waitress",
            "server",
            "service",
        ],
    ),
    (
        ThreadTag::Reservation,
        &[
            "table",
            "reservation",
            "reserve",
            "bottle service",
            "booth",
            "vip table",
            "book",
        ],
    ),
    (
        ThreadTag::Vip,
        &["vip", "vip host", "host", "upgrade", "vip section", "velvet"],
    ),
    (
        ThreadTag::Management,
        &[
            "manager",
            "complaint",
            "issue",
            "problem",
            "overcharged",
            "wrong",
            "escalate",
        ],
    ),
];

/// Classify free text into a display tag
pub fn auto_classify(text: &str) -> ThreadTag {
    if text.is_empty() {
        return ThreadTag::General;
    }
    let lower = text.to_lowercase();
    for (tag, words) in TAG_KEYWORD_RULES {
        if words.iter().any(|w| lower.contains(w)) {
            return *tag;
        }
    }
    ThreadTag::General
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_general() {
        assert_eq!(auto_classify(""), ThreadTag::General);
        assert_eq!(auto_classify("hello there"), ThreadTag::General);
    }

    #[test]
    fn security_beats_floor_when_both_match() {
        // "emergency" (SECURITY) + "ice" via "more ice" (FLOOR)
        assert_eq!(
            auto_classify("Emergency! We need more ice at table 4"),
            ThreadTag::Security
        );
    }

    #[test]
    fn floor_keywords_match_substrings() {
        assert_eq!(auto_classify("can we get a refill"), ThreadTag::Floor);
        assert_eq!(auto_classify("Need another BOTTLE please"), ThreadTag::Floor);
    }

    #[test]
    fn reservation_and_vip_and_management() {
        assert_eq!(auto_classify("can I book a booth"), ThreadTag::Reservation);
        assert_eq!(auto_classify("upgrade us please"), ThreadTag::Vip);
        assert_eq!(auto_classify("I was overcharged"), ThreadTag::Management);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(auto_classify("THERE IS A FIGHT"), ThreadTag::Security);
    }
}
