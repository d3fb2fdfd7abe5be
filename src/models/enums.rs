use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored integer code that does not map to any variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown {kind} code: {code}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: i32,
}

/// Declares a closed enum together with its stored integer codes.
///
/// Codes are written out per variant so reordering the declaration never
/// changes what is read from or written to storage.
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident : $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Integer code used by the stored representation
            pub fn code(self) -> i32 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = UnknownCode;

            fn try_from(code: i32) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok($name::$variant),)+
                    _ => Err(UnknownCode { kind: $kind, code }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

coded_enum! {
    /// Self-reported training level, ordered Beginner < Intermediate < Advanced < Expert
    #[derive(Default)]
    FitnessLevel: "fitness level" {
        #[default]
        Beginner = 1,
        Intermediate = 2,
        Advanced = 3,
        Expert = 4,
    }
}

impl FitnessLevel {
    /// Ordinal rank used for level-difference scoring
    pub fn rank(self) -> u8 {
        match self {
            FitnessLevel::Beginner => 1,
            FitnessLevel::Intermediate => 2,
            FitnessLevel::Advanced => 3,
            FitnessLevel::Expert => 4,
        }
    }

    /// Number of levels between two profiles
    pub fn distance_to(self, other: FitnessLevel) -> u8 {
        self.rank().abs_diff(other.rank())
    }
}

coded_enum! {
    ActivityCategory: "activity category" {
        Cardio = 0,
        Strength = 1,
        Flexibility = 2,
        Sports = 3,
        Outdoor = 4,
        MindBody = 5,
        MartialArts = 6,
        Dance = 7,
        Other = 8,
    }
}

coded_enum! {
    FitnessGoal: "fitness goal" {
        WeightLoss = 0,
        MuscleGain = 1,
        Endurance = 2,
        Flexibility = 3,
        GeneralFitness = 4,
        SportPerformance = 5,
        Rehabilitation = 6,
        StressRelief = 7,
    }
}

coded_enum! {
    /// Two- to three-hour availability bands, EarlyMorning (5-7 AM) through Night (7-10 PM)
    TimeSlot: "time slot" {
        EarlyMorning = 0,
        Morning = 1,
        MidMorning = 2,
        Lunch = 3,
        Afternoon = 4,
        Evening = 5,
        Night = 6,
    }
}

coded_enum! {
    /// Advisory only; the scorer does not filter on it
    #[derive(Default)]
    GenderPreference: "gender preference" {
        #[default]
        Any = 0,
        Same = 1,
        Different = 2,
    }
}

coded_enum! {
    MatchStatus: "match status" {
        Pending = 0,
        Accepted = 1,
        Rejected = 2,
        Expired = 3,
        Blocked = 4,
    }
}

impl MatchStatus {
    /// Statuses that end a relationship and let the pair be suggested again
    pub const TERMINAL: [MatchStatus; 2] = [MatchStatus::Rejected, MatchStatus::Expired];

    /// Whether a match in this status keeps the pair out of candidate generation
    pub fn blocks_rematch(self) -> bool {
        !Self::TERMINAL.contains(&self)
    }
}

/// Convert a stored day-of-week code (Sunday = 0 .. Saturday = 6)
pub fn weekday_from_code(code: i32) -> Result<chrono::Weekday, UnknownCode> {
    use chrono::Weekday;

    match code {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        _ => Err(UnknownCode { kind: "day of week", code }),
    }
}
