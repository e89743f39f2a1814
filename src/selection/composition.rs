use std::collections::HashMap;

use crate::domain::{BowlingStyle, MatchFormat, PitchCategory, TeamComposition};
use crate::error::{Result, XiError};

/// Fallback for any (format, category) pair missing from the table.
pub const BALANCED: TeamComposition = TeamComposition::new(1, 4, 3, 3);

/// Role counts keyed by (format, pitch category).
#[derive(Debug, Clone)]
pub struct CompositionTable {
    entries: HashMap<(MatchFormat, PitchCategory), TeamComposition>,
}

impl Default for CompositionTable {
    fn default() -> Self {
        use BowlingStyle::{Pacer, Spinner};
        use MatchFormat::{Odi, Test, T20};
        use PitchCategory::{Balanced, BattingFriendly, BowlingFriendly, SpinFriendly};

        let entries = HashMap::from([
            ((Odi, BattingFriendly), TeamComposition::new(1, 4, 3, 3)),
            ((Odi, SpinFriendly), TeamComposition::new(1, 4, 2, 4).with_bias(Spinner, 3)),
            ((Odi, BowlingFriendly), TeamComposition::new(1, 4, 2, 4).with_bias(Pacer, 3)),
            ((Odi, Balanced), BALANCED),
            ((T20, BattingFriendly), TeamComposition::new(1, 4, 4, 2)),
            ((T20, SpinFriendly), TeamComposition::new(1, 3, 4, 3).with_bias(Spinner, 2)),
            ((T20, BowlingFriendly), TeamComposition::new(1, 3, 3, 4).with_bias(Pacer, 3)),
            ((T20, Balanced), BALANCED),
            ((Test, BattingFriendly), TeamComposition::new(1, 5, 2, 3)),
            ((Test, SpinFriendly), TeamComposition::new(1, 4, 2, 4).with_bias(Spinner, 3)),
            ((Test, BowlingFriendly), TeamComposition::new(1, 4, 1, 5).with_bias(Pacer, 3)),
            ((Test, Balanced), BALANCED),
        ]);
        Self { entries }
    }
}

impl CompositionTable {
    /// A table that answers `composition` for every key.
    pub fn uniform(composition: TeamComposition) -> Result<Self> {
        composition.validate().map_err(XiError::Validation)?;
        let mut entries = HashMap::new();
        for format in MatchFormat::ALL {
            for category in PitchCategory::ALL {
                entries.insert((format, category), composition);
            }
        }
        Ok(Self { entries })
    }

    /// Replace one entry; the composition is validated first.
    pub fn set(
        &mut self,
        format: MatchFormat,
        category: PitchCategory,
        composition: TeamComposition,
    ) -> Result<()> {
        composition.validate().map_err(|e| {
            XiError::Validation(format!("composition for {format}/{category}: {e}"))
        })?;
        self.entries.insert((format, category), composition);
        Ok(())
    }

    pub fn get(&self, format: MatchFormat, category: PitchCategory) -> TeamComposition {
        self.entries
            .get(&(format, category))
            .copied()
            .unwrap_or(BALANCED)
    }

    /// Composition for a free-text pitch description.
    pub fn lookup(&self, format: MatchFormat, pitch_type: &str) -> TeamComposition {
        self.get(format, PitchCategory::classify(pitch_type))
    }
}
