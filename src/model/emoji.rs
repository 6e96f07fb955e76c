//! Closed reaction emoji set.
//!
//! # Responsibility
//! - Define the fixed emoji vocabulary a post can be reacted with.
//! - Provide the wire/storage mapping between variants and glyphs.
//!
//! # Invariants
//! - The set is closed: any other input is rejected at the boundary.
//! - Variant order is the canonical display order (🔥 😂 🤯 😬 😭).

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One of the fixed reaction emoji a post accepts.
///
/// Serialized as the glyph itself so a serialized counter map reads
/// `{"🔥": 3, ...}`, matching the stored document shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EmojiKind {
    /// 🔥
    #[serde(rename = "🔥")]
    Fire,
    /// 😂
    #[serde(rename = "😂")]
    Joy,
    /// 🤯
    #[serde(rename = "🤯")]
    MindBlown,
    /// 😬
    #[serde(rename = "😬")]
    Grimace,
    /// 😭
    #[serde(rename = "😭")]
    Sob,
}

impl EmojiKind {
    /// All reaction kinds in canonical display order.
    pub const ALL: [EmojiKind; 5] = [
        EmojiKind::Fire,
        EmojiKind::Joy,
        EmojiKind::MindBlown,
        EmojiKind::Grimace,
        EmojiKind::Sob,
    ];

    /// Returns the glyph used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fire => "🔥",
            Self::Joy => "😂",
            Self::MindBlown => "🤯",
            Self::Grimace => "😬",
            Self::Sob => "😭",
        }
    }

    /// Parses a glyph back into a reaction kind.
    ///
    /// Returns `None` for anything outside the closed set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "🔥" => Some(Self::Fire),
            "😂" => Some(Self::Joy),
            "🤯" => Some(Self::MindBlown),
            "😬" => Some(Self::Grimace),
            "😭" => Some(Self::Sob),
            _ => None,
        }
    }
}

impl Display for EmojiKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::EmojiKind;

    #[test]
    fn parse_and_as_str_agree_for_all_kinds() {
        for kind in EmojiKind::ALL {
            assert_eq!(EmojiKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn parse_rejects_glyphs_outside_the_set() {
        assert_eq!(EmojiKind::parse("👍"), None);
        assert_eq!(EmojiKind::parse("💥"), None);
        assert_eq!(EmojiKind::parse(""), None);
        assert_eq!(EmojiKind::parse("fire"), None);
    }
}
