//! Raw log codes → semantic events
//!
//! `EVENT_CODES` and `SPACE_CODES` are the single contract between the logs
//! store and every report. Nothing else interprets raw codes.
//!
//! | event code | event       | space code | space   |
//! |-----------:|-------------|-----------:|---------|
//! | 0          | login       | 0          | global  |
//! | 1          | comment     | 2          | comment |
//! | 2          | create_post | 1          | post    |
//! | 3          | delete_post | 1          | post    |
//! | 4          | logout      | 0          | global  |

use super::record::{Record, Value};
use serde::Serialize;

/// Column holding the raw event code in a log record
pub const EVENT_CODE_FIELD: &str = "event_type_id";
/// Column holding the raw space code in a log record
pub const SPACE_CODE_FIELD: &str = "space_type_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceKind {
    Global,
    Post,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticEvent {
    Login,
    Logout,
    Comment,
    CreatePost,
    DeletePost,
    /// Code outside the table, or an event logged in a space it cannot occur in
    Unknown,
}

/// (code, space)
pub const SPACE_CODES: [(i64, SpaceKind); 3] = [
    (0, SpaceKind::Global),
    (1, SpaceKind::Post),
    (2, SpaceKind::Comment),
];

/// (code, event)
pub const EVENT_CODES: [(i64, SemanticEvent); 5] = [
    (0, SemanticEvent::Login),
    (1, SemanticEvent::Comment),
    (2, SemanticEvent::CreatePost),
    (3, SemanticEvent::DeletePost),
    (4, SemanticEvent::Logout),
];

impl SpaceKind {
    pub fn from_code(code: i64) -> Option<Self> {
        SPACE_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, space)| *space)
    }

    pub fn code(&self) -> i64 {
        match self {
            SpaceKind::Global => 0,
            SpaceKind::Post => 1,
            SpaceKind::Comment => 2,
        }
    }

    /// Name stored in the `space_type` lookup table
    pub fn as_str(&self) -> &'static str {
        match self {
            SpaceKind::Global => "global",
            SpaceKind::Post => "post",
            SpaceKind::Comment => "commit",
        }
    }
}

impl SemanticEvent {
    pub fn from_code(code: i64) -> Self {
        EVENT_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map_or(SemanticEvent::Unknown, |(_, event)| *event)
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            SemanticEvent::Login => Some(0),
            SemanticEvent::Comment => Some(1),
            SemanticEvent::CreatePost => Some(2),
            SemanticEvent::DeletePost => Some(3),
            SemanticEvent::Logout => Some(4),
            SemanticEvent::Unknown => None,
        }
    }

    /// Space the seeder logs this event in. Classification never checks it.
    pub fn space(&self) -> Option<SpaceKind> {
        match self {
            SemanticEvent::Login | SemanticEvent::Logout => Some(SpaceKind::Global),
            SemanticEvent::Comment => Some(SpaceKind::Comment),
            SemanticEvent::CreatePost | SemanticEvent::DeletePost => Some(SpaceKind::Post),
            SemanticEvent::Unknown => None,
        }
    }

    /// Name stored in the `event_type` lookup table
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticEvent::Login => "login",
            SemanticEvent::Logout => "logout",
            SemanticEvent::Comment => "comment",
            SemanticEvent::CreatePost => "create_post",
            SemanticEvent::DeletePost => "delete_post",
            SemanticEvent::Unknown => "unknown",
        }
    }
}

/// Semantic reading of one log row's code columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub event: SemanticEvent,
    /// `None` for a space code outside the table
    pub space: Option<SpaceKind>,
}

/// Classify a raw (event, space) code pair.
///
/// The two codes are read independently: an event code outside the table is
/// `Unknown` whatever the space, and a known event keeps its meaning in any
/// space.
pub fn classify(event_code: i64, space_code: i64) -> Classification {
    Classification {
        event: SemanticEvent::from_code(event_code),
        space: SpaceKind::from_code(space_code),
    }
}

/// Classify the code columns of a log-derived record.
///
/// A missing or non-integer column reads as an out-of-table code.
pub fn classify_record(record: &Record) -> Classification {
    let event = record.get(EVENT_CODE_FIELD).and_then(Value::as_integer);
    let space = record.get(SPACE_CODE_FIELD).and_then(Value::as_integer);
    Classification {
        event: event.map_or(SemanticEvent::Unknown, SemanticEvent::from_code),
        space: space.and_then(SpaceKind::from_code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_codes() {
        assert_eq!(classify(0, 0).event, SemanticEvent::Login);
        assert_eq!(classify(1, 2).event, SemanticEvent::Comment);
        assert_eq!(classify(2, 1).event, SemanticEvent::CreatePost);
        assert_eq!(classify(3, 1).event, SemanticEvent::DeletePost);
        assert_eq!(classify(4, 0).event, SemanticEvent::Logout);
        assert_eq!(classify(2, 1).space, Some(SpaceKind::Post));
    }

    #[test]
    fn test_out_of_range_codes() {
        assert_eq!(classify(5, 0).event, SemanticEvent::Unknown);
        assert_eq!(classify(-1, 0).event, SemanticEvent::Unknown);
        // unknown space does not touch the event
        assert_eq!(classify(0, 3), Classification { event: SemanticEvent::Login, space: None });
    }

    #[test]
    fn test_mixed_pairs_keep_both_codes() {
        // login logged in the post space
        assert_eq!(
            classify(0, 1),
            Classification {
                event: SemanticEvent::Login,
                space: Some(SpaceKind::Post),
            }
        );
        // create_post code in the comment space
        assert_eq!(classify(2, 2).event, SemanticEvent::CreatePost);
        assert_eq!(classify(2, 2).space, Some(SpaceKind::Comment));
        // out-of-table event in the post space still has a space
        assert_eq!(
            classify(7, 1),
            Classification {
                event: SemanticEvent::Unknown,
                space: Some(SpaceKind::Post),
            }
        );
    }

    #[test]
    fn test_codes_agree_with_table() {
        for (code, event) in EVENT_CODES {
            assert_eq!(event.code(), Some(code));
            assert_eq!(SemanticEvent::from_code(code), event);
            let space = event.space().unwrap();
            assert_eq!(classify(code, space.code()).event, event);
        }
        for (code, space) in SPACE_CODES {
            assert_eq!(space.code(), code);
            assert_eq!(SpaceKind::from_code(code), Some(space));
        }
    }

    #[test]
    fn test_classify_record() {
        let comment = Record::new().with(EVENT_CODE_FIELD, 1).with(SPACE_CODE_FIELD, 2);
        assert_eq!(
            classify_record(&comment),
            Classification {
                event: SemanticEvent::Comment,
                space: Some(SpaceKind::Comment),
            }
        );

        let missing_space = Record::new().with(EVENT_CODE_FIELD, 1);
        assert_eq!(classify_record(&missing_space).event, SemanticEvent::Comment);
        assert_eq!(classify_record(&missing_space).space, None);

        let text_code = Record::new().with(EVENT_CODE_FIELD, "1").with(SPACE_CODE_FIELD, 2);
        assert_eq!(classify_record(&text_code).event, SemanticEvent::Unknown);
        assert_eq!(classify_record(&text_code).space, Some(SpaceKind::Comment));
    }
}
