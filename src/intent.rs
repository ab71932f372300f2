//! Intent classification for spoken utterances.
//!
//! Two pure classifiers map recognized speech to discrete tokens:
//!
//! - [`classify_role`] runs while no role is selected and looks for one of
//!   the three role names in the utterance.
//! - [`classify_command`] runs on the dashboard and matches an ordered list
//!   of command keyword groups. Each group carries an ASCII keyword and,
//!   where one exists, a Hindi (Devanagari) keyword, so commands work in
//!   both interface languages.
//!
//! Matching is case-insensitive substring search. Groups are evaluated in
//! declared order and the first group with any matching keyword wins; list
//! order is the only precedence between languages.

/// Operating role of the current user.
///
/// Gates which dashboard panel and which chat reply rules apply. Set once
/// per session by voice or manual selection, cleared only by an explicit
/// return to role selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Farmer,
    Seller,
    Buyer,
}

impl Role {
    /// Capitalized label for prompts and UI badges.
    pub fn label(self) -> &'static str {
        match self {
            Role::Farmer => "Farmer",
            Role::Seller => "Seller",
            Role::Buyer => "Buyer",
        }
    }

    /// The role keyword listened for in spoken input.
    fn keyword(self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Seller => "seller",
            Role::Buyer => "buyer",
        }
    }

    /// All roles in declared priority order.
    pub const ALL: [Role; 3] = [Role::Farmer, Role::Seller, Role::Buyer];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A dashboard voice command recognized from an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move forward in the dashboard flow.
    NavigateNext,
    /// Return to the role selection screen (also clears the role).
    NavigateBack,
    /// Trigger the crop prediction action.
    CropPrediction,
    /// Trigger the fertilizer recommendation action.
    Fertilizer,
    /// Trigger the cultivation guide action.
    CultivationGuide,
    /// Move focus to the language selector.
    FocusLanguage,
    /// Read the loaded procedure steps aloud.
    ReadAloud,
}

/// Ordered command keyword groups. First group with a hit wins.
const COMMAND_RULES: &[(Command, &[&str])] = &[
    (Command::NavigateNext, &["next", "अगला"]),
    (Command::NavigateBack, &["back", "पीछे"]),
    (Command::CropPrediction, &["crop", "फसल"]),
    (Command::Fertilizer, &["fertilizer", "उर्वरक"]),
    (Command::CultivationGuide, &["guide", "गाइड", "procedure"]),
    (Command::FocusLanguage, &["language", "भाषा"]),
    (Command::ReadAloud, &["read", "aloud", "सुनाओ"]),
];

/// Classify an utterance heard during role selection.
///
/// Returns the first role (in [`Role::ALL`] order) whose keyword appears in
/// the text, or `None` when no role name is present.
pub fn classify_role(text: &str) -> Option<Role> {
    let normalized = text.trim().to_lowercase();
    Role::ALL
        .into_iter()
        .find(|role| normalized.contains(role.keyword()))
}

/// Classify an utterance heard while the dashboard command controller is on.
///
/// Returns the first matching [`Command`] group, or `None` when the
/// utterance matches no command. Unmatched utterances are not an error;
/// the controller only updates its "last heard" display for them.
pub fn classify_command(text: &str) -> Option<Command> {
    let normalized = text.trim().to_lowercase();
    for (command, keywords) in COMMAND_RULES {
        if keywords.iter().any(|k| normalized.contains(k)) {
            return Some(*command);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    // ── classify_role ────────────────────────────────────────────────

    #[test]
    fn role_farmer_substring() {
        assert_eq!(classify_role("I am a farmer, please help"), Some(Role::Farmer));
    }

    #[test]
    fn role_case_insensitive() {
        assert_eq!(classify_role("SELLER"), Some(Role::Seller));
        assert_eq!(classify_role("I'm a Buyer today"), Some(Role::Buyer));
    }

    #[test]
    fn role_priority_order_on_multiple_mentions() {
        // Declared order wins, not position in the text.
        assert_eq!(classify_role("buyer or farmer"), Some(Role::Farmer));
        assert_eq!(classify_role("not a buyer but a seller"), Some(Role::Seller));
    }

    #[test]
    fn role_none_when_absent() {
        assert_eq!(classify_role("hello there"), None);
        assert_eq!(classify_role(""), None);
    }

    // ── classify_command ─────────────────────────────────────────────

    #[test]
    fn command_english_keywords() {
        assert_eq!(classify_command("open crop prediction"), Some(Command::CropPrediction));
        assert_eq!(classify_command("show me the fertilizer"), Some(Command::Fertilizer));
        assert_eq!(classify_command("cultivation guide please"), Some(Command::CultivationGuide));
        assert_eq!(classify_command("change language"), Some(Command::FocusLanguage));
        assert_eq!(classify_command("read it aloud"), Some(Command::ReadAloud));
    }

    #[test]
    fn command_hindi_keywords() {
        assert_eq!(classify_command("अगला"), Some(Command::NavigateNext));
        assert_eq!(classify_command("पीछे जाओ"), Some(Command::NavigateBack));
        assert_eq!(classify_command("फसल दिखाओ"), Some(Command::CropPrediction));
        assert_eq!(classify_command("उर्वरक"), Some(Command::Fertilizer));
        assert_eq!(classify_command("मुझे सुनाओ"), Some(Command::ReadAloud));
    }

    #[test]
    fn command_first_group_wins() {
        // "next" (group 1) beats "crop" (group 3) regardless of position.
        assert_eq!(classify_command("crop next"), Some(Command::NavigateNext));
    }

    #[test]
    fn command_none_for_free_text() {
        assert_eq!(classify_command("what a sunny day"), None);
        assert_eq!(classify_command(""), None);
    }

    #[test]
    fn command_case_insensitive() {
        assert_eq!(classify_command("FERTILIZER NOW"), Some(Command::Fertilizer));
    }
}
