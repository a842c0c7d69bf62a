//! Memory directive extraction from assistant replies.
//!
//! The persona asks the model to prefix a reply with
//! `<REMEMBER THIS FOR <timeframe>: <content>>` when something is worth
//! keeping. This module finds the first such directive, splits it into a
//! timeframe and content, and returns the visible reply text that follows it.
//!
//! Parsing fails closed: a directive missing its closing `>` or its `:` is
//! never partially applied, and the reply is returned unchanged.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use keepsake_types::memory::{MemoryRecord, Timeframe};

/// Literal that opens a directive.
pub const DIRECTIVE_MARKER: &str = "<REMEMBER THIS FOR ";

/// Why a directive could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    /// No closing `>` after the marker.
    Unterminated,
    /// The directive body has no `:` separating timeframe from content.
    MissingSeparator,
}

/// A well-formed directive, borrowing from the reply it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    /// Trimmed timeframe token, not yet validated.
    pub timeframe: &'a str,
    /// Trimmed content.
    pub content: &'a str,
    /// Trimmed text after the closing `>`.
    pub visible: &'a str,
}

/// Result of scanning a reply for a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveParse<'a> {
    Absent,
    Malformed(Malformed),
    Parsed(Directive<'a>),
}

/// Scanner position inside the directive body.
#[derive(Clone, Copy)]
enum State {
    Timeframe,
    Content { colon: usize },
}

/// Scan `reply` for the first memory directive.
///
/// Only the first marker is considered; any later markers stay in the
/// visible text verbatim. The first `>` closes the directive, so content
/// cannot contain `>`. Only the first `:` separates, so content may
/// contain `:`.
pub fn parse_directive(reply: &str) -> DirectiveParse<'_> {
    let Some(marker_at) = reply.find(DIRECTIVE_MARKER) else {
        return DirectiveParse::Absent;
    };
    let body = &reply[marker_at + DIRECTIVE_MARKER.len()..];

    let mut state = State::Timeframe;
    for (idx, ch) in body.char_indices() {
        match (state, ch) {
            (State::Timeframe, ':') => state = State::Content { colon: idx },
            (State::Timeframe, '>') => {
                return DirectiveParse::Malformed(Malformed::MissingSeparator);
            }
            (State::Content { colon }, '>') => {
                return DirectiveParse::Parsed(Directive {
                    timeframe: body[..colon].trim(),
                    content: body[colon + 1..idx].trim(),
                    visible: body[idx + 1..].trim(),
                });
            }
            _ => {}
        }
    }

    DirectiveParse::Malformed(Malformed::Unterminated)
}

/// Visible reply plus the record a directive produced, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub reply: String,
    pub record: Option<MemoryRecord>,
}

/// Split an assistant reply into visible text and an optional new record.
///
/// - No directive: reply unchanged, no record.
/// - Malformed directive: reply unchanged, no record (logged at warn).
/// - Well-formed directive: reply is the text after `>`; a record is built
///   unless the content is blank.
pub fn extract_memory(reply: &str, now: DateTime<Utc>) -> Extraction {
    match parse_directive(reply) {
        DirectiveParse::Absent => Extraction {
            reply: reply.to_string(),
            record: None,
        },
        DirectiveParse::Malformed(reason) => {
            warn!(?reason, "Malformed memory directive; leaving reply untouched");
            Extraction {
                reply: reply.to_string(),
                record: None,
            }
        }
        DirectiveParse::Parsed(directive) => {
            let record = if directive.content.is_empty() {
                debug!(timeframe = directive.timeframe, "Memory directive with empty content; nothing stored");
                None
            } else {
                Some(MemoryRecord::new(
                    directive.content,
                    Timeframe::parse(directive.timeframe),
                    now,
                ))
            };
            Extraction {
                reply: directive.visible.to_string(),
                record,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_directive() {
        let extraction = extract_memory("<REMEMBER THIS FOR day: Exam tomorrow>Good luck!", Utc::now());
        assert_eq!(extraction.reply, "Good luck!");
        let record = extraction.record.unwrap();
        assert_eq!(record.timeframe, Timeframe::Day);
        assert_eq!(record.content, "Exam tomorrow");
    }

    #[test]
    fn test_record_timestamp_is_now() {
        let now = Utc::now();
        let extraction = extract_memory("<REMEMBER THIS FOR week: Gym on Tuesday> ok", now);
        assert_eq!(extraction.record.unwrap().created_at, now);
    }

    #[test]
    fn test_unterminated_directive_fails_closed() {
        let reply = "<REMEMBER THIS FOR day: Exam tomorrow";
        let extraction = extract_memory(reply, Utc::now());
        assert_eq!(extraction.reply, reply);
        assert!(extraction.record.is_none());
        assert_eq!(
            parse_directive(reply),
            DirectiveParse::Malformed(Malformed::Unterminated)
        );
    }

    #[test]
    fn test_missing_colon_fails_closed() {
        let reply = "<REMEMBER THIS FOR day Exam tomorrow> Good luck!";
        let extraction = extract_memory(reply, Utc::now());
        assert_eq!(extraction.reply, reply);
        assert!(extraction.record.is_none());
        assert_eq!(
            parse_directive(reply),
            DirectiveParse::Malformed(Malformed::MissingSeparator)
        );
    }

    #[test]
    fn test_no_colon_and_no_close_is_unterminated() {
        assert_eq!(
            parse_directive("<REMEMBER THIS FOR day Exam tomorrow"),
            DirectiveParse::Malformed(Malformed::Unterminated)
        );
    }

    #[test]
    fn test_no_marker_returns_reply_unchanged() {
        let reply = "  Just a normal reply! ";
        let extraction = extract_memory(reply, Utc::now());
        assert_eq!(extraction.reply, reply);
        assert!(extraction.record.is_none());
        assert_eq!(parse_directive(reply), DirectiveParse::Absent);
    }

    #[test]
    fn test_marker_requires_trailing_space() {
        let reply = "<REMEMBER THIS FORday: x> hi";
        assert_eq!(parse_directive(reply), DirectiveParse::Absent);
    }

    #[test]
    fn test_colon_inside_content_is_kept() {
        let parsed = parse_directive("<REMEMBER THIS FOR indefinitely: Alarm at 7:30 daily> Noted!");
        assert_eq!(
            parsed,
            DirectiveParse::Parsed(Directive {
                timeframe: "indefinitely",
                content: "Alarm at 7:30 daily",
                visible: "Noted!",
            })
        );
    }

    #[test]
    fn test_first_close_bracket_ends_content() {
        let extraction = extract_memory("<REMEMBER THIS FOR day: a > b> rest", Utc::now());
        assert_eq!(extraction.record.unwrap().content, "a");
        assert_eq!(extraction.reply, "b> rest");
    }

    #[test]
    fn test_second_marker_left_verbatim() {
        let reply = "<REMEMBER THIS FOR day: first> Sure! <REMEMBER THIS FOR week: second> Bye";
        let extraction = extract_memory(reply, Utc::now());
        assert_eq!(extraction.record.unwrap().content, "first");
        assert_eq!(extraction.reply, "Sure! <REMEMBER THIS FOR week: second> Bye");
    }

    #[test]
    fn test_unknown_timeframe_is_kept_not_rejected() {
        let extraction = extract_memory("<REMEMBER THIS FOR year: Anniversary in June> Yay", Utc::now());
        let record = extraction.record.unwrap();
        assert_eq!(record.timeframe, Timeframe::Unrecognized("year".to_string()));
        assert_eq!(extraction.reply, "Yay");
    }

    #[test]
    fn test_empty_content_strips_directive_without_record() {
        let extraction = extract_memory("<REMEMBER THIS FOR day:   > Okay!", Utc::now());
        assert!(extraction.record.is_none());
        assert_eq!(extraction.reply, "Okay!");
    }

    #[test]
    fn test_text_before_marker_is_dropped() {
        let extraction = extract_memory("Hmm. <REMEMBER THIS FOR day: Dentist at 3> Don't be late!", Utc::now());
        assert_eq!(extraction.reply, "Don't be late!");
        assert_eq!(extraction.record.unwrap().content, "Dentist at 3");
    }

    #[test]
    fn test_multibyte_content_is_preserved() {
        let extraction = extract_memory("<REMEMBER THIS FOR week: 試験は金曜日 💖> がんばって！", Utc::now());
        assert_eq!(extraction.record.unwrap().content, "試験は金曜日 💖");
        assert_eq!(extraction.reply, "がんばって！");
    }
}
