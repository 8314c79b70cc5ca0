use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// One step of a resolution, in the order it happened. The presentation
/// layer replays these for effects, sound, and animation; the engine never
/// waits on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    MatchCleared {
        coords: SmallVec<[Coord2; 4]>,
        shape: MatchShape,
    },
    ComboBonus {
        amount: u32,
        combo_index: u32,
    },
    SpecialSpawned {
        x: Coord,
        y: Coord,
        category: Category,
    },
    SpecialActivated {
        target_category: Category,
    },
    Dropped {
        from: Coord2,
        to: Coord2,
    },
    Refilled {
        x: Coord,
        y: Coord,
        category: Category,
    },
    GameOver {
        final_score: u32,
        stars: u8,
    },
}
