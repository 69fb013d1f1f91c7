use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub(crate) const SAVE_VERSION: u32 = 1;

pub(crate) const STAT_MAX: u8 = 100;
pub(crate) const STAT_DEFAULT: u8 = STAT_MAX / 2;

pub(crate) const FEED_RELIEF: u8 = 10;
pub(crate) const WATER_RELIEF: u8 = 10;
pub(crate) const PLAY_COST: u8 = 20;
pub(crate) const TICK_HUNGER: u8 = 10;
pub(crate) const TICK_THIRST: u8 = 10;
pub(crate) const TICK_ENERGY: u8 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Mood {
    Happy,
    Okay,
    Meh,
    Angry,
    Sad,
    Dead,
    Sleepy,
}

impl Mood {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Okay => "okay",
            Mood::Meh => "meh",
            Mood::Angry => "angry",
            Mood::Sad => "sad",
            Mood::Dead => "dead",
            Mood::Sleepy => "sleepy",
        }
    }
}

/// The persisted row: the three meters and nothing else. Sleep state is
/// session-only, so a reloaded pet always wakes up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PetRow {
    pub(crate) hunger: u8,
    pub(crate) thirst: u8,
    pub(crate) energy: u8,
}

impl Default for PetRow {
    fn default() -> Self {
        Self {
            hunger: STAT_DEFAULT,
            thirst: STAT_DEFAULT,
            energy: STAT_DEFAULT,
        }
    }
}

impl PetRow {
    // A hand-edited save file may carry out-of-range values.
    pub(crate) fn clamped(self) -> Self {
        Self {
            hunger: self.hunger.min(STAT_MAX),
            thirst: self.thirst.min(STAT_MAX),
            energy: self.energy.min(STAT_MAX),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PetState {
    pub(crate) hunger: u8,
    pub(crate) thirst: u8,
    pub(crate) energy: u8,
    pub(crate) sleeping: bool,
    pub(crate) mood: Mood,
}

impl PetState {
    pub(crate) fn from_row(row: PetRow) -> Self {
        let row = row.clamped();
        let mut pet = Self {
            hunger: row.hunger,
            thirst: row.thirst,
            energy: row.energy,
            sleeping: false,
            mood: Mood::Meh,
        };
        pet.refresh_mood();
        pet
    }

    pub(crate) fn row(&self) -> PetRow {
        PetRow {
            hunger: self.hunger,
            thirst: self.thirst,
            energy: self.energy,
        }
    }
}

impl Default for PetState {
    fn default() -> Self {
        Self::from_row(PetRow::default())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Rules {
    pub(crate) tick_interval_ms: u64,
    pub(crate) sleep_recovery_interval_ms: u64,
    pub(crate) sleep_recovery_points: u8,
    pub(crate) tick_while_sleeping: bool,
    pub(crate) sleep_gates_play: bool,
    pub(crate) catchup_max_secs: i64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10_000,
            sleep_recovery_interval_ms: 1_000,
            sleep_recovery_points: 1,
            tick_while_sleeping: true,
            sleep_gates_play: false,
            catchup_max_secs: 48 * 3600,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct SaveFile {
    pub(crate) version: u32,
    pub(crate) last_seen_utc: DateTime<Utc>,
    pub(crate) pet: PetRow,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct CatchupSummary {
    pub(crate) ticks_simulated: u64,
    pub(crate) hunger_peak: u8,
    pub(crate) thirst_peak: u8,
    pub(crate) energy_low: u8,
}

impl CatchupSummary {
    pub(crate) fn new(pet: &PetState) -> Self {
        Self {
            ticks_simulated: 0,
            hunger_peak: pet.hunger,
            thirst_peak: pet.thirst,
            energy_low: pet.energy,
        }
    }

    pub(crate) fn record(&mut self, pet: &PetState) {
        self.ticks_simulated += 1;
        self.hunger_peak = self.hunger_peak.max(pet.hunger);
        self.thirst_peak = self.thirst_peak.max(pet.thirst);
        self.energy_low = self.energy_low.min(pet.energy);
    }

    pub(crate) fn has_anything(&self) -> bool {
        self.ticks_simulated > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pet_starts_at_midpoints_awake() {
        let pet = PetState::default();
        assert_eq!(pet.hunger, 50);
        assert_eq!(pet.thirst, 50);
        assert_eq!(pet.energy, 50);
        assert!(!pet.sleeping);
        assert_eq!(pet.mood, Mood::Meh);
    }

    #[test]
    fn out_of_range_row_is_clamped_on_load() {
        let pet = PetState::from_row(PetRow {
            hunger: 250,
            thirst: 101,
            energy: 7,
        });
        assert_eq!(pet.row(), PetRow {
            hunger: 100,
            thirst: 100,
            energy: 7,
        });
    }
}
