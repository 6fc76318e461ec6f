//! Scene and chapter type.

/// Whether a scene or chapter belongs to the manuscript.
///
/// The discriminants are the ordinals yWriter uses internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    /// Part of the manuscript
    #[default]
    Normal = 0,
    /// Planning notes
    Notes = 1,
    /// To-do list
    Todo = 2,
    /// Excluded from the manuscript
    Unused = 3,
}

impl ContentType {
    /// All types in ordinal order.
    pub const ALL: [Self; 4] = [Self::Normal, Self::Notes, Self::Todo, Self::Unused];

    /// Returns the yWriter ordinal.
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Looks a type up by its yWriter ordinal.
    pub const fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Normal),
            1 => Some(Self::Notes),
            2 => Some(Self::Todo),
            3 => Some(Self::Unused),
            _ => None,
        }
    }

    /// Checks whether the content counts toward the manuscript.
    pub const fn is_normal(self) -> bool {
        matches!(self, Self::Normal)
    }
}
