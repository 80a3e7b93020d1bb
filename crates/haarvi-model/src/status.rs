//! REDCap participation-status flags.

use std::fmt;

/// How a status flag affects scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRule {
    /// The participant is excluded unless this flag is set.
    ExcludeWhenClear,
    /// The participant is excluded when this flag is set.
    ExcludeWhenSet,
    /// Tracked for reporting only.
    Informational,
}

/// One checkbox of the `participant_status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusFlag {
    ActivelyParticipating,
    OptedOut,
    MovedAway,
    Removed,
    NonCommunicating,
    OptedOutOfDraws,
    SurveysOnly,
    Deceased,
}

impl StatusFlag {
    pub const ALL: [StatusFlag; 8] = [
        StatusFlag::ActivelyParticipating,
        StatusFlag::OptedOut,
        StatusFlag::MovedAway,
        StatusFlag::Removed,
        StatusFlag::NonCommunicating,
        StatusFlag::OptedOutOfDraws,
        StatusFlag::SurveysOnly,
        StatusFlag::Deceased,
    ];

    /// REDCap checkbox number (1-8).
    pub fn number(&self) -> u8 {
        match self {
            StatusFlag::ActivelyParticipating => 1,
            StatusFlag::OptedOut => 2,
            StatusFlag::MovedAway => 3,
            StatusFlag::Removed => 4,
            StatusFlag::NonCommunicating => 5,
            StatusFlag::OptedOutOfDraws => 6,
            StatusFlag::SurveysOnly => 7,
            StatusFlag::Deceased => 8,
        }
    }

    pub fn rule(&self) -> StatusRule {
        match self {
            StatusFlag::ActivelyParticipating => StatusRule::ExcludeWhenClear,
            StatusFlag::NonCommunicating => StatusRule::Informational,
            _ => StatusRule::ExcludeWhenSet,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StatusFlag::ActivelyParticipating => "actively participating",
            StatusFlag::OptedOut => "voluntarily opted out",
            StatusFlag::MovedAway => "moved away",
            StatusFlag::Removed => "removed from study",
            StatusFlag::NonCommunicating => "non-communicating",
            StatusFlag::OptedOutOfDraws => "opted out of blood draws",
            StatusFlag::SurveysOnly => "surveys only",
            StatusFlag::Deceased => "deceased",
        }
    }

    /// Export column holding this flag, e.g. `participant_status___1`.
    pub fn column_name(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.number())
    }

    /// Whether a flag value excludes the participant.
    ///
    /// `None` is a blank cell, which never excludes.
    pub fn excludes(&self, value: Option<bool>) -> bool {
        match (self.rule(), value) {
            (StatusRule::ExcludeWhenClear, Some(false)) => true,
            (StatusRule::ExcludeWhenSet, Some(true)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {} ({})", self.number(), self.description())
    }
}
