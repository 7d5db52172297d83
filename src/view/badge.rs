use crate::types::Recommendation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Green,
    Amber,
    Red,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub tone: BadgeTone,
    pub icon: &'static str,
}

/// Fixed four-way mapping; unrecognized labels get the neutral badge.
pub fn badge_for(recommendation: &Recommendation) -> Badge {
    match recommendation {
        Recommendation::Pass => Badge {
            tone: BadgeTone::Green,
            icon: "✅",
        },
        Recommendation::Review => Badge {
            tone: BadgeTone::Amber,
            icon: "⚠️",
        },
        Recommendation::Fail => Badge {
            tone: BadgeTone::Red,
            icon: "❌",
        },
        Recommendation::Other(_) => Badge {
            tone: BadgeTone::Neutral,
            icon: "📊",
        },
    }
}
