//! Access levels and their chain-of-command mapping

use crate::hierarchy::HierarchyOracle;
use crate::identity::PersonId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How broad a role's organizational reach is.
///
/// Levels are ordered: `None < Self < Division < Department < Command`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AccessLevel {
    /// No reach at all
    #[default]
    None,
    /// Only the actor's own record
    #[serde(rename = "Self")]
    SelfOnly,
    /// Everyone in the actor's division
    Division,
    /// Everyone in the actor's department
    Department,
    /// Everyone in the actor's command
    Command,
}

impl AccessLevel {
    /// All levels in ascending order.
    pub const ALL: [AccessLevel; 5] = [
        AccessLevel::None,
        AccessLevel::SelfOnly,
        AccessLevel::Division,
        AccessLevel::Department,
        AccessLevel::Command,
    ];

    /// Whether `actor` is in `target`'s chain of command at this level.
    ///
    /// Command asks the oracle for "same command", Department for "same
    /// department", Division for "same division". Self and None never confer
    /// superiority.
    pub fn chain_of_command<O>(self, oracle: &O, actor: &PersonId, target: &PersonId) -> bool
    where
        O: HierarchyOracle + ?Sized,
    {
        match self {
            AccessLevel::Command => oracle.same_command(actor, target),
            AccessLevel::Department => oracle.same_department(actor, target),
            AccessLevel::Division => oracle.same_division(actor, target),
            AccessLevel::SelfOnly | AccessLevel::None => false,
        }
    }

    /// Whether this level is one of the three organizational levels.
    pub fn is_organizational(self) -> bool {
        matches!(
            self,
            AccessLevel::Division | AccessLevel::Department | AccessLevel::Command
        )
    }

    /// Stable display name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            AccessLevel::None => "None",
            AccessLevel::SelfOnly => "Self",
            AccessLevel::Division => "Division",
            AccessLevel::Department => "Department",
            AccessLevel::Command => "Command",
        }
    }

    /// Parse a level name, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        command: bool,
        department: bool,
        division: bool,
    }

    impl HierarchyOracle for Fixed {
        fn same_command(&self, _: &PersonId, _: &PersonId) -> bool {
            self.command
        }
        fn same_department(&self, _: &PersonId, _: &PersonId) -> bool {
            self.department
        }
        fn same_division(&self, _: &PersonId, _: &PersonId) -> bool {
            self.division
        }
    }

    #[test]
    fn test_level_ordering() {
        assert!(AccessLevel::None < AccessLevel::SelfOnly);
        assert!(AccessLevel::SelfOnly < AccessLevel::Division);
        assert!(AccessLevel::Division < AccessLevel::Department);
        assert!(AccessLevel::Department < AccessLevel::Command);
        assert_eq!(
            AccessLevel::ALL.iter().max(),
            Some(&AccessLevel::Command)
        );
    }

    #[test]
    fn test_chain_of_command_picks_predicate_by_level() {
        let a = PersonId::from_bytes([1; 16]);
        let b = PersonId::from_bytes([2; 16]);
        let only_division = Fixed {
            command: false,
            department: false,
            division: true,
        };

        assert!(AccessLevel::Division.chain_of_command(&only_division, &a, &b));
        assert!(!AccessLevel::Department.chain_of_command(&only_division, &a, &b));
        assert!(!AccessLevel::Command.chain_of_command(&only_division, &a, &b));

        let everything = Fixed {
            command: true,
            department: true,
            division: true,
        };
        assert!(!AccessLevel::SelfOnly.chain_of_command(&everything, &a, &b));
        assert!(!AccessLevel::None.chain_of_command(&everything, &a, &b));
    }

    #[test]
    fn test_parse_and_serde_names() {
        assert_eq!(AccessLevel::parse("self"), Some(AccessLevel::SelfOnly));
        assert_eq!(AccessLevel::parse(" COMMAND "), Some(AccessLevel::Command));
        assert_eq!(AccessLevel::parse("fleet"), None);

        let parsed: AccessLevel = toml::from_str::<Wrapper>("level = \"Self\"").unwrap().level;
        assert_eq!(parsed, AccessLevel::SelfOnly);
    }

    #[derive(Deserialize)]
    struct Wrapper {
        level: AccessLevel,
    }
}
