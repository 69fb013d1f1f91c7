use crate::model::{
    CatchupSummary, Mood, PetState, Rules, FEED_RELIEF, PLAY_COST, STAT_MAX, TICK_ENERGY,
    TICK_HUNGER, TICK_THIRST, WATER_RELIEF,
};
use chrono::{DateTime, Duration as ChronoDuration, Utc};

/// The only events the pet ever sees. How they were produced (keypress,
/// drag-and-drop, catch-up) is the input surface's business.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PetAction {
    Feed,
    GiveWater,
    Play,
    SleepToggle,
}

impl PetState {
    /// Returns true if state changed; callers persist on true.
    pub(crate) fn apply(&mut self, action: PetAction, rules: &Rules) -> bool {
        match action {
            PetAction::Feed => self.feed(),
            PetAction::GiveWater => self.give_water(),
            PetAction::Play => self.play(rules),
            PetAction::SleepToggle => self.toggle_sleep(),
        }
    }

    pub(crate) fn feed(&mut self) -> bool {
        if self.sleeping || self.hunger == 0 {
            return false;
        }
        self.hunger = self.hunger.saturating_sub(FEED_RELIEF);
        self.refresh_mood();
        true
    }

    pub(crate) fn give_water(&mut self) -> bool {
        if self.sleeping || self.thirst == 0 {
            return false;
        }
        self.thirst = self.thirst.saturating_sub(WATER_RELIEF);
        self.refresh_mood();
        true
    }

    pub(crate) fn play(&mut self, rules: &Rules) -> bool {
        if rules.sleep_gates_play && self.sleeping {
            return false;
        }
        if self.energy < PLAY_COST {
            return false;
        }
        self.energy -= PLAY_COST;
        self.refresh_mood();
        true
    }

    pub(crate) fn toggle_sleep(&mut self) -> bool {
        self.sleeping = !self.sleeping;
        self.refresh_mood();
        true
    }

    /// Main decay step, run every `tick_interval_ms` while awake (and
    /// while asleep too, unless the rules say otherwise).
    pub(crate) fn tick(&mut self, rules: &Rules) -> bool {
        if self.sleeping && !rules.tick_while_sleeping {
            return false;
        }
        self.hunger = (self.hunger + TICK_HUNGER).min(STAT_MAX);
        self.thirst = (self.thirst + TICK_THIRST).min(STAT_MAX);
        self.energy = self.energy.saturating_sub(TICK_ENERGY);
        self.refresh_mood();
        true
    }

    /// Passive recovery while asleep, on its own cadence independent of
    /// the main tick.
    pub(crate) fn sleep_recovery_step(&mut self, rules: &Rules) -> bool {
        if !self.sleeping || self.energy >= STAT_MAX {
            return false;
        }
        self.energy = self
            .energy
            .saturating_add(rules.sleep_recovery_points)
            .min(STAT_MAX);
        self.refresh_mood();
        true
    }

    pub(crate) fn refresh_mood(&mut self) {
        self.mood = derive_mood(self.hunger, self.thirst, self.energy, self.sleeping);
    }
}

pub(crate) fn derive_mood(hunger: u8, thirst: u8, energy: u8, sleeping: bool) -> Mood {
    if sleeping {
        return Mood::Sleepy;
    }
    // First match wins. The table is not a total partition: plenty of
    // combinations match nothing and land on the default.
    if hunger <= 10 && thirst <= 10 && energy >= 90 {
        Mood::Happy
    } else if hunger >= 30 && thirst >= 30 && energy >= 70 {
        Mood::Okay
    } else if hunger >= 50 && thirst >= 50 && energy >= 50 {
        Mood::Meh
    } else if hunger >= 70 && thirst >= 70 && energy >= 30 {
        Mood::Angry
    } else if hunger >= 90 && thirst >= 90 && energy >= 20 {
        Mood::Sad
    } else if hunger == 100 && thirst == 100 && energy == 0 {
        Mood::Dead
    } else if hunger == 0 && thirst == 0 && energy == 0 {
        Mood::Sleepy
    } else {
        Mood::Meh
    }
}

/// Replay the decay ticks missed while the app was closed, bounded by
/// `catchup_max_secs`. Negative elapsed (clock skew) applies nothing.
pub(crate) fn catch_up(
    pet: &mut PetState,
    last_seen: DateTime<Utc>,
    now: DateTime<Utc>,
    rules: &Rules,
) -> CatchupSummary {
    let max_elapsed = ChronoDuration::seconds(rules.catchup_max_secs.max(0));
    let elapsed = (now - last_seen).clamp(ChronoDuration::zero(), max_elapsed);

    let step_ms = rules.tick_interval_ms.max(1) as i64;
    let ticks = elapsed.num_milliseconds() / step_ms;

    let mut summary = CatchupSummary::new(pet);
    for _ in 0..ticks {
        if pet.tick(rules) {
            summary.record(pet);
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PetRow;

    fn pet(hunger: u8, thirst: u8, energy: u8) -> PetState {
        PetState::from_row(PetRow {
            hunger,
            thirst,
            energy,
        })
    }

    fn in_range(p: &PetState) -> bool {
        p.hunger <= STAT_MAX && p.thirst <= STAT_MAX && p.energy <= STAT_MAX
    }

    #[test]
    fn stats_stay_in_range_under_any_action_sequence() {
        let rules = Rules::default();
        let actions = [
            PetAction::Feed,
            PetAction::GiveWater,
            PetAction::Play,
            PetAction::SleepToggle,
        ];
        let mut p = pet(0, 100, 15);
        for i in 0..500 {
            p.apply(actions[i % actions.len()], &rules);
            assert!(in_range(&p), "out of range after step {i}: {p:?}");
            if i % 3 == 0 {
                p.tick(&rules);
                assert!(in_range(&p));
            }
            if i % 5 == 0 {
                p.sleep_recovery_step(&rules);
                assert!(in_range(&p));
            }
        }
    }

    #[test]
    fn feed_reduces_hunger_by_ten() {
        let mut p = pet(50, 50, 50);
        assert!(p.feed());
        assert_eq!(p.hunger, 40);
    }

    #[test]
    fn feed_at_zero_hunger_is_a_noop() {
        let mut p = pet(0, 50, 50);
        let before = p.clone();
        assert!(!p.feed());
        assert_eq!(p, before);
    }

    #[test]
    fn feed_while_sleeping_is_a_noop() {
        let mut p = pet(50, 50, 50);
        p.toggle_sleep();
        assert!(!p.feed());
        assert_eq!(p.hunger, 50);
    }

    #[test]
    fn give_water_mirrors_feed() {
        let mut p = pet(50, 50, 50);
        assert!(p.give_water());
        assert_eq!(p.thirst, 40);

        let mut dry = pet(50, 0, 50);
        assert!(!dry.give_water());
        assert_eq!(dry.thirst, 0);

        p.toggle_sleep();
        assert!(!p.give_water());
        assert_eq!(p.thirst, 40);
    }

    #[test]
    fn play_below_cost_is_a_noop() {
        let rules = Rules::default();
        let mut p = pet(50, 50, 19);
        let before = p.clone();
        assert!(!p.play(&rules));
        assert_eq!(p, before);
    }

    #[test]
    fn play_at_exact_cost_drains_to_zero() {
        let rules = Rules::default();
        let mut p = pet(50, 50, 20);
        assert!(p.play(&rules));
        assert_eq!(p.energy, 0);
    }

    #[test]
    fn play_while_sleeping_follows_policy() {
        let mut rules = Rules::default();
        let mut p = pet(50, 50, 80);
        p.toggle_sleep();

        // Default: not gated; energy drops but mood stays frozen asleep.
        assert!(p.play(&rules));
        assert_eq!(p.energy, 60);
        assert_eq!(p.mood, Mood::Sleepy);

        rules.sleep_gates_play = true;
        assert!(!p.play(&rules));
        assert_eq!(p.energy, 60);
    }

    #[test]
    fn entering_sleep_forces_sleepy_regardless_of_stats() {
        let mut p = pet(10, 10, 90);
        assert_eq!(p.mood, Mood::Happy);
        p.toggle_sleep();
        assert_eq!(p.mood, Mood::Sleepy);
    }

    #[test]
    fn waking_recomputes_mood_from_stats() {
        let mut p = pet(10, 10, 90);
        p.toggle_sleep();
        p.toggle_sleep();
        assert_eq!(p.mood, Mood::Happy);

        let mut q = pet(40, 50, 50);
        q.toggle_sleep();
        q.toggle_sleep();
        assert_eq!(q.mood, Mood::Meh);
    }

    #[test]
    fn mood_table_priority_and_fallthrough() {
        assert_eq!(derive_mood(10, 10, 90, false), Mood::Happy);
        assert_eq!(derive_mood(30, 30, 70, false), Mood::Okay);
        assert_eq!(derive_mood(50, 50, 50, false), Mood::Meh);
        assert_eq!(derive_mood(70, 70, 30, false), Mood::Angry);
        assert_eq!(derive_mood(90, 90, 20, false), Mood::Sad);
        // Dead wins over Sad at 100/100/0 because Sad needs energy >= 20.
        assert_eq!(derive_mood(100, 100, 0, false), Mood::Dead);
        assert_eq!(derive_mood(0, 0, 0, false), Mood::Sleepy);
        // Not a total partition: this matches no rule.
        assert_eq!(derive_mood(40, 40, 40, false), Mood::Meh);
        // Sleep freeze wins over everything.
        assert_eq!(derive_mood(10, 10, 90, true), Mood::Sleepy);
    }

    #[test]
    fn derive_mood_is_pure() {
        for _ in 0..3 {
            assert_eq!(derive_mood(72, 85, 33, false), Mood::Angry);
        }
    }

    #[test]
    fn feed_from_midpoints_falls_through_to_meh() {
        let mut p = pet(50, 50, 50);
        assert_eq!(p.mood, Mood::Meh);
        p.feed();
        assert_eq!(p.hunger, 40);
        // 40/50/50 matches no rule; still Meh, but via the default arm.
        assert_eq!(p.mood, Mood::Meh);
    }

    #[test]
    fn tick_decays_and_clamps() {
        let rules = Rules::default();
        let mut p = pet(50, 50, 50);
        assert!(p.tick(&rules));
        assert_eq!((p.hunger, p.thirst, p.energy), (60, 60, 45));

        let mut worst = pet(95, 100, 3);
        worst.tick(&rules);
        assert_eq!((worst.hunger, worst.thirst, worst.energy), (100, 100, 0));
        assert_eq!(worst.mood, Mood::Dead);
    }

    #[test]
    fn tick_during_sleep_follows_policy() {
        let mut rules = Rules::default();
        let mut p = pet(50, 50, 50);
        p.toggle_sleep();

        assert!(p.tick(&rules));
        assert_eq!((p.hunger, p.thirst, p.energy), (60, 60, 45));
        assert_eq!(p.mood, Mood::Sleepy);

        rules.tick_while_sleeping = false;
        assert!(!p.tick(&rules));
        assert_eq!((p.hunger, p.thirst, p.energy), (60, 60, 45));
    }

    #[test]
    fn sleep_recovery_adds_one_per_step_and_stays_sleepy() {
        let rules = Rules::default();
        let mut p = pet(50, 50, 80);
        p.toggle_sleep();
        assert!(p.sleep_recovery_step(&rules));
        assert!(p.sleep_recovery_step(&rules));
        assert_eq!(p.energy, 82);
        assert_eq!(p.mood, Mood::Sleepy);
    }

    #[test]
    fn sleep_recovery_clamps_at_full_and_noops_awake() {
        let rules = Rules::default();
        let mut p = pet(50, 50, 100);
        p.toggle_sleep();
        assert!(!p.sleep_recovery_step(&rules));
        assert_eq!(p.energy, 100);

        let mut awake = pet(50, 50, 40);
        assert!(!awake.sleep_recovery_step(&rules));
        assert_eq!(awake.energy, 40);
    }

    #[test]
    fn catch_up_applies_one_tick_per_interval() {
        let rules = Rules::default();
        let mut p = pet(50, 50, 50);
        let now = Utc::now();
        let last_seen = now - ChronoDuration::milliseconds(rules.tick_interval_ms as i64 * 3);
        let summary = catch_up(&mut p, last_seen, now, &rules);
        assert_eq!(summary.ticks_simulated, 3);
        assert_eq!((p.hunger, p.thirst, p.energy), (80, 80, 35));
        assert_eq!(summary.hunger_peak, 80);
        assert_eq!(summary.energy_low, 35);
    }

    #[test]
    fn catch_up_honors_the_cap() {
        let rules = Rules {
            tick_interval_ms: 1_000,
            catchup_max_secs: 5,
            ..Rules::default()
        };
        let mut p = pet(0, 0, 100);
        let now = Utc::now();
        let summary = catch_up(&mut p, now - ChronoDuration::days(30), now, &rules);
        assert_eq!(summary.ticks_simulated, 5);
    }

    #[test]
    fn catch_up_ignores_clock_skew() {
        let rules = Rules::default();
        let mut p = pet(50, 50, 50);
        let now = Utc::now();
        let summary = catch_up(&mut p, now + ChronoDuration::hours(1), now, &rules);
        assert!(!summary.has_anything());
        assert_eq!((p.hunger, p.thirst, p.energy), (50, 50, 50));
    }
}
