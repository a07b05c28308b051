use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::GenreId;

/// User-selectable mood
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Mood {
    Happy,
    Sad,
    Excited,
    Relaxed,
    Thrilled,
    Romantic,
    Curious,
    #[default]
    #[serde(alias = "none")]
    None,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Excited,
        Mood::Relaxed,
        Mood::Thrilled,
        Mood::Romantic,
        Mood::Curious,
        Mood::None,
    ];
}

/// Mood → genre lookup tables
///
/// Built once at start-up and shared read-only by the query planner and the
/// scorer. Every mood has an entry in both tables; `Mood::None` maps to empty
/// sets.
#[derive(Debug, Clone)]
pub struct MoodTables {
    prefer: HashMap<Mood, Vec<GenreId>>,
    exclude: HashMap<Mood, Vec<GenreId>>,
}

impl MoodTables {
    /// The standard mood tables
    pub fn standard() -> Self {
        let prefer = HashMap::from([
            (Mood::Happy, vec![35, 16, 10751, 14, 10402]),
            (Mood::Sad, vec![18, 10749, 10402]),
            (Mood::Excited, vec![28, 12, 878, 14, 53]),
            (Mood::Relaxed, vec![99, 10751, 35, 37, 18]),
            (Mood::Thrilled, vec![53, 27, 80, 9648]),
            (Mood::Romantic, vec![10749, 18, 35]),
            (Mood::Curious, vec![99, 9648, 36, 10770, 878]),
            (Mood::None, vec![]),
        ]);

        let exclude = HashMap::from([
            (Mood::Happy, vec![27, 53, 10752, 80]),
            (Mood::Sad, vec![28, 12, 35, 16]),
            (Mood::Excited, vec![99, 10751, 37]),
            (Mood::Relaxed, vec![28, 27, 53, 10752, 12]),
            (Mood::Thrilled, vec![10751, 16, 35, 10749]),
            (Mood::Romantic, vec![27, 53, 10752, 28, 80]),
            (Mood::Curious, vec![35, 16, 10751]),
            (Mood::None, vec![]),
        ]);

        Self { prefer, exclude }
    }

    /// Genres to favour for `mood`
    pub fn preferred(&self, mood: Mood) -> &[GenreId] {
        self.prefer.get(&mood).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Genres that must never be recommended for `mood`
    pub fn excluded(&self, mood: Mood) -> &[GenreId] {
        self.exclude.get(&mood).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for MoodTables {
    fn default() -> Self {
        Self::standard()
    }
}
