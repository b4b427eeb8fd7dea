use serde::{Deserialize, Serialize};

/// Which of the two rolling pages an item lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageKind {
    Today,
    Tomorrow,
}

impl PageKind {
    /// The page items move to/from on `move to other page`
    pub fn other(&self) -> Self {
        match self {
            Self::Today => Self::Tomorrow,
            Self::Tomorrow => Self::Today,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
        }
    }
}

/// Color tag on an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemColor {
    #[default]
    None,
    Red,
    Blue,
    Green,
}

impl ItemColor {
    /// Parse a color from its stable wire name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "none" => Some(Self::None),
            "red" => Some(Self::Red),
            "blue" => Some(Self::Blue),
            "green" => Some(Self::Green),
            _ => None,
        }
    }

    pub fn to_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
        }
    }

    /// Next color in the cycling order (wraps back to None)
    pub fn next(&self) -> Self {
        match self {
            Self::None => Self::Red,
            Self::Red => Self::Blue,
            Self::Blue => Self::Green,
            Self::Green => Self::None,
        }
    }
}

/// How long item locks survive day rollovers before expiring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockExpirationPolicy {
    /// Locks never expire; locked items stay on the tomorrow page
    Never,
    /// Locks expire when the rollover crosses an ISO week boundary
    #[default]
    Weekly,
    /// Locks expire when the rollover crosses a calendar month boundary
    Monthly,
}

impl LockExpirationPolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "never" => Some(Self::Never),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    pub fn to_name(&self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// How much of the tomorrow page a day rollover moves to today
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushScope {
    /// No rollover happened since the last push
    None,
    /// Rollover: move unlocked items, locked items stay put
    UnlockedOnly,
    /// Rollover across the lock expiry boundary: move everything, unlocking
    All,
}
