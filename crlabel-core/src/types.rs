//! Wire and domain types shared between the controller, the HTTP client and the UI.
//!
//! Field names on the wire follow the annotation backend's DTOs (camelCase,
//! `oldCode` / `newCode` for the two diff sides). Every type here is fully owned
//! so values can cross from the API worker thread to the UI thread.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Which side of the diff a review comment is anchored to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// The pre-change file (`oldCode`).
    Parent,
    /// The post-change file (`newCode`).
    #[default]
    Revision,
}

/// One review comment plus its surrounding diff context, the unit being labeled.
///
/// Immutable once received. A new `Target` supersedes the previous one; it is
/// never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Opaque comment identifier, display only.
    #[serde(rename = "id", default)]
    pub identifier: Option<String>,
    /// Link to the originating review comment.
    #[serde(rename = "url", default)]
    pub source_url: Option<String>,
    #[serde(rename = "oldCode")]
    pub before_text: String,
    #[serde(rename = "newCode")]
    pub after_text: String,
    pub side: Side,
    /// 1-based, inclusive.
    #[serde(rename = "startLine")]
    pub comment_range_start: u32,
    /// 1-based, inclusive. Never less than `comment_range_start`.
    #[serde(rename = "endLine")]
    pub comment_range_end: u32,
    #[serde(rename = "content")]
    pub comment_body: String,
}

impl Target {
    /// Text of the side the comment is anchored to.
    pub fn side_text(&self) -> &str {
        match self.side {
            Side::Parent => &self.before_text,
            Side::Revision => &self.after_text,
        }
    }

    /// The comment range with `start <= end` enforced.
    ///
    /// The backend reports `0` for both ends when a comment has no line anchor;
    /// that is clamped to line 1.
    pub fn comment_range(&self) -> (u32, u32) {
        let start = self.comment_range_start.max(1);
        let end = self.comment_range_end.max(start);
        (start, end)
    }

    /// Last path segment of `source_url`, used as a compact link label.
    pub fn url_tail(&self) -> Option<&str> {
        self.source_url
            .as_deref()
            .and_then(|url| url.rsplit('/').next())
            .filter(|tail| !tail.is_empty())
    }
}

/// Aggregate annotation statistics served by the backend.
///
/// Never mutated locally; the default is what the stat bar shows before the
/// first successful fetch.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    #[serde(rename = "currentAnnotatorEmail", default)]
    pub annotator_identity: String,
    /// Inter-annotator agreement; the backend owns its meaning.
    #[serde(rename = "kirpendorffAlpha", default)]
    pub agreement_score: f64,
    #[serde(rename = "totalReadyCount", default)]
    pub total_ready_count: u64,
    #[serde(rename = "annotatedByCurrentCount", default)]
    pub annotated_by_current_count: u64,
}

impl SessionInfo {
    /// Stat lines in display order, agreement rounded to 3 decimal places.
    pub fn stat_lines(&self) -> [String; 3] {
        [
            format!("Kirpendorff's alpha: {:.3}", self.agreement_score),
            format!("Total ready comments: {}", self.total_ready_count),
            format!("Annotated by current: {}", self.annotated_by_current_count),
        ]
    }
}

/// The closed set of categories a target can be labeled with.
///
/// Declaration order is display order and hotkey order (`1`..=`6`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Discuss,
    Documentation,
    FalsePositive,
    Function,
    Refactoring,
    Skip,
}

/// Error returned by [`Label::from_str`] for anything but an exact wire literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown label: {0:?}")]
pub struct UnknownLabel(pub String);

impl Label {
    pub const ALL: [Label; 6] = [
        Label::Discuss,
        Label::Documentation,
        Label::FalsePositive,
        Label::Function,
        Label::Refactoring,
        Label::Skip,
    ];

    /// Literal transmitted in `PUT /api/target?label=...`. Casing and the space
    /// in `FALSE POSITIVE` are part of the wire contract.
    pub fn wire_name(self) -> &'static str {
        match self {
            Label::Discuss => "DISCUSS",
            Label::Documentation => "DOCUMENTATION",
            Label::FalsePositive => "FALSE POSITIVE",
            Label::Function => "FUNCTION",
            Label::Refactoring => "REFACTORING",
            Label::Skip => "SKIP",
        }
    }

    /// Human-facing button caption.
    pub fn display_name(self) -> &'static str {
        match self {
            Label::Discuss => "discussion",
            Label::Documentation => "documentation",
            Label::FalsePositive => "false positive",
            Label::Function => "functional",
            Label::Refactoring => "refactoring",
            Label::Skip => "SKIP",
        }
    }

    /// Hotkey digit shown on the label bar.
    pub fn hotkey(self) -> char {
        match self {
            Label::Discuss => '1',
            Label::Documentation => '2',
            Label::FalsePositive => '3',
            Label::Function => '4',
            Label::Refactoring => '5',
            Label::Skip => '6',
        }
    }

    pub fn from_hotkey(c: char) -> Option<Label> {
        Label::ALL.into_iter().find(|l| l.hotkey() == c)
    }

    /// SKIP bypasses the reading lock; every other label waits for it.
    pub fn requires_unlock(self) -> bool {
        self != Label::Skip
    }

    /// Annotation guidelines for this category.
    pub fn help(self) -> &'static [&'static str] {
        match self {
            Label::Discuss => &[
                "If reviewers ask anything to the code author for clarification.",
                "Review comments that praise, complement or thank the developer.",
            ],
            Label::Documentation => &[
                "Review comments that address issues related to code comments or documentation files for aiding code comprehension.",
            ],
            Label::FalsePositive => &[
                "A CR comment is considered a false positive if the code owner explicitly mentions the comment as an invalid concern.",
            ],
            Label::Function => &[
                "Defects where a code functionality is missing or implemented incorrectly.",
                "Defects where there exist control flow problems or logical mistakes.",
                "All types of user data sanitization issues or issues related to exception handling.",
                "Any kind of variable, memory, or file issues while handling or manipulating them.",
                "Any kind of synchronization issues while using threads.",
                "Any kind of support system related issues (e.g., configuration problem or version mismatch).",
                "Any types of interfacing issues such as issues in import statements or database access issues.",
            ],
            Label::Refactoring => &[
                "Review comments that suggest an alternative approach for problem-solving.",
                "Review comments that address issues within outputs (including error messages) shown to the users.",
                "Code organization or refactoring issues presented in the catalog of Martin Fowler.",
                "Review comments that address the violation of the variable naming convention.",
                "Any kind of formatting (indentation, blank line, or code spacing-related) issues.",
            ],
            Label::Skip => &[
                "The context given to the annotator is not sufficient to label the comment.",
                "This label should be used even if the annotator is only a bit unsure, to maintain good data quality.",
                "It is possible, or even likely, that you might want to skip most of the comments.",
            ],
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Label {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .into_iter()
            .find(|l| l.wire_name() == s)
            .ok_or_else(|| UnknownLabel(s.to_owned()))
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_name())
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_literals_are_exact() {
        let literals: Vec<_> = Label::ALL.iter().map(|l| l.wire_name()).collect();
        assert_eq!(
            literals,
            ["DISCUSS", "DOCUMENTATION", "FALSE POSITIVE", "FUNCTION", "REFACTORING", "SKIP"]
        );
        assert_eq!("FALSE POSITIVE".parse::<Label>(), Ok(Label::FalsePositive));
        assert!("FALSE_POSITIVE".parse::<Label>().is_err());
        assert!("skip".parse::<Label>().is_err());
    }

    #[test]
    fn only_skip_bypasses_lock() {
        let bypass: Vec<_> = Label::ALL.into_iter().filter(|l| !l.requires_unlock()).collect();
        assert_eq!(bypass, [Label::Skip]);
    }

    #[test]
    fn hotkeys_follow_display_order() {
        for (i, label) in Label::ALL.into_iter().enumerate() {
            let digit = char::from_digit(i as u32 + 1, 10).unwrap();
            assert_eq!(label.hotkey(), digit);
            assert_eq!(Label::from_hotkey(digit), Some(label));
        }
        assert_eq!(Label::from_hotkey('7'), None);
    }

    #[test]
    fn target_decodes_backend_dto() {
        let json = r#"{
            "id": "9fdfeff1_719b5072",
            "url": "https://review.opendev.org/c/openstack/nova/+/639653/3/nova/report.py@1686",
            "startLine": 4,
            "endLine": 6,
            "content": "why not a dict here?",
            "side": "PARENT",
            "oldCode": "a\nb\n",
            "newCode": "a\nc\n",
            "extra": true
        }"#;
        let target: Target = serde_json::from_str(json).unwrap();
        assert_eq!(target.identifier.as_deref(), Some("9fdfeff1_719b5072"));
        assert_eq!(target.side, Side::Parent);
        assert_eq!(target.side_text(), "a\nb\n");
        assert_eq!(target.comment_range(), (4, 6));
        assert_eq!(target.url_tail(), Some("report.py@1686"));
    }

    #[test]
    fn target_without_identity_or_anchor() {
        let json = r#"{"startLine":0,"endLine":0,"content":"","side":"REVISION","oldCode":"","newCode":""}"#;
        let target: Target = serde_json::from_str(json).unwrap();
        assert_eq!(target.identifier, None);
        assert_eq!(target.url_tail(), None);
        assert_eq!(target.comment_range(), (1, 1));
    }

    #[test]
    fn stats_render_three_decimals() {
        let info = SessionInfo {
            annotator_identity: "a@example.org".into(),
            agreement_score: 0.66666,
            total_ready_count: 12,
            annotated_by_current_count: 3,
        };
        assert_eq!(info.stat_lines()[0], "Kirpendorff's alpha: 0.667");
        assert_eq!(SessionInfo::default().stat_lines()[0], "Kirpendorff's alpha: 0.000");
    }
}
