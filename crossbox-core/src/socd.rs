//! Simultaneous-opposite-cardinal-direction (SOCD) cleaning.
//!
//! Each opposite-direction pair is an independent state machine. The
//! cleaner is a pure function of the immediately preceding raw snapshot
//! plus the per-pair history each policy explicitly needs: transition
//! order for second-input priority, and a suppression latch for the
//! no-reactivation variant.

use crate::inputs::Inputs;

/// Resolution strategy for a simultaneous opposite-direction press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SocdPolicy {
    /// Both directions read as unpressed while both are held.
    Neutral,
    /// The more recently pressed direction wins.
    SecondInputPriority,
    /// The more recently pressed direction wins, and when the winner is
    /// released the older press does not re-activate; it stays suppressed
    /// until both directions have been released.
    SecondInputPriorityNoReactivation,
}

/// The opposite-direction pairs cleaned on this layout.
pub const SOCD_PAIRS: [(Inputs, Inputs); 4] = [
    (Inputs::LEFT, Inputs::RIGHT),
    (Inputs::DOWN, Inputs::UP),
    (Inputs::C_LEFT, Inputs::C_RIGHT),
    (Inputs::C_DOWN, Inputs::C_UP),
];

/// Which member of a pair, in [`SOCD_PAIRS`] order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    First,
    Second,
}

/// Per-pair cleaning history.
#[derive(Clone, Copy, Debug, Default)]
struct PairState {
    prev_first: bool,
    prev_second: bool,
    /// Direction that most recently transitioned to pressed.
    winner: Option<Side>,
    /// Direction suppressed by the no-reactivation latch.
    latched: Option<Side>,
}

impl PairState {
    /// Resolve one pair for one cycle, returning the cleaned press states.
    fn resolve(&mut self, policy: SocdPolicy, first: bool, second: bool) -> (bool, bool) {
        let out = match (first, second) {
            (false, false) => {
                // Both released: all history clears.
                self.winner = None;
                self.latched = None;
                (false, false)
            }
            (true, true) => {
                if !self.prev_first {
                    self.winner = Some(Side::First);
                }
                if !self.prev_second {
                    self.winner = Some(Side::Second);
                }
                match policy {
                    SocdPolicy::Neutral => (false, false),
                    _ => match self.winner {
                        Some(Side::First) => (true, false),
                        Some(Side::Second) => (false, true),
                        // Both held with no observed press order.
                        None => (false, false),
                    },
                }
            }
            (true, false) => {
                if policy == SocdPolicy::SecondInputPriorityNoReactivation
                    && self.prev_first
                    && self.prev_second
                    && self.winner == Some(Side::Second)
                {
                    // The winning direction released out of a conflict
                    // while this one is still held: suppress it.
                    self.latched = Some(Side::First);
                }
                self.winner = Some(Side::First);
                (self.latched != Some(Side::First), false)
            }
            (false, true) => {
                if policy == SocdPolicy::SecondInputPriorityNoReactivation
                    && self.prev_first
                    && self.prev_second
                    && self.winner == Some(Side::First)
                {
                    self.latched = Some(Side::Second);
                }
                self.winner = Some(Side::Second);
                (false, self.latched != Some(Side::Second))
            }
        };
        self.prev_first = first;
        self.prev_second = second;
        out
    }
}

/// SOCD cleaner over the fixed pair list, one policy per instance.
///
/// Each game mode owns one cleaner with the policy that profile calls
/// for; a freshly constructed cleaner has empty history.
#[derive(Clone, Copy, Debug)]
pub struct SocdCleaner {
    policy: SocdPolicy,
    pairs: [PairState; SOCD_PAIRS.len()],
}

impl SocdCleaner {
    #[must_use]
    pub const fn new(policy: SocdPolicy) -> Self {
        Self {
            policy,
            pairs: [PairState {
                prev_first: false,
                prev_second: false,
                winner: None,
                latched: None,
            }; SOCD_PAIRS.len()],
        }
    }

    /// The policy this cleaner resolves conflicts with.
    #[inline]
    #[must_use]
    pub const fn policy(&self) -> SocdPolicy {
        self.policy
    }

    /// Produce a conflict-resolved snapshot from a raw one.
    ///
    /// Non-direction bits pass through untouched. The output never has
    /// both members of a pair set.
    #[must_use]
    pub fn clean(&mut self, raw: Inputs) -> Inputs {
        let mut cleaned = raw;
        for (state, &(first, second)) in self.pairs.iter_mut().zip(SOCD_PAIRS.iter()) {
            let (f, s) = state.resolve(self.policy, raw.contains(first), raw.contains(second));
            cleaned.set(first, f);
            cleaned.set(second, s);
        }
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(inputs: &[Inputs]) -> Inputs {
        inputs.iter().fold(Inputs::NONE, |acc, &i| acc | i)
    }

    #[test]
    fn single_direction_passes_through() {
        for policy in [
            SocdPolicy::Neutral,
            SocdPolicy::SecondInputPriority,
            SocdPolicy::SecondInputPriorityNoReactivation,
        ] {
            let mut cleaner = SocdCleaner::new(policy);
            let cleaned = cleaner.clean(Inputs::UP | Inputs::A);
            assert_eq!(cleaned, Inputs::UP | Inputs::A);
        }
    }

    #[test]
    fn no_pair_ever_reports_both() {
        // Exhaustive over all four press states per policy, fed in every
        // order a single transition allows.
        for policy in [
            SocdPolicy::Neutral,
            SocdPolicy::SecondInputPriority,
            SocdPolicy::SecondInputPriorityNoReactivation,
        ] {
            let mut cleaner = SocdCleaner::new(policy);
            for step in [
                press(&[Inputs::LEFT]),
                press(&[Inputs::LEFT, Inputs::RIGHT]),
                press(&[Inputs::RIGHT]),
                press(&[Inputs::LEFT, Inputs::RIGHT]),
                Inputs::NONE,
                press(&[Inputs::LEFT, Inputs::RIGHT]),
            ] {
                let cleaned = cleaner.clean(step);
                for (first, second) in SOCD_PAIRS {
                    assert!(!cleaned.contains(first | second), "policy {policy:?}");
                }
            }
        }
    }

    #[test]
    fn neutral_resolves_conflict_to_nothing() {
        let mut cleaner = SocdCleaner::new(SocdPolicy::Neutral);
        let cleaned = cleaner.clean(Inputs::LEFT | Inputs::RIGHT);
        assert!(!cleaned.contains(Inputs::LEFT));
        assert!(!cleaned.contains(Inputs::RIGHT));
    }

    #[test]
    fn second_input_wins() {
        let mut cleaner = SocdCleaner::new(SocdPolicy::SecondInputPriority);
        assert_eq!(cleaner.clean(Inputs::LEFT), Inputs::LEFT);
        // Right pressed while left held: right wins.
        assert_eq!(cleaner.clean(Inputs::LEFT | Inputs::RIGHT), Inputs::RIGHT);
        // Right released: left re-activates under plain 2IP.
        assert_eq!(cleaner.clean(Inputs::LEFT), Inputs::LEFT);
    }

    #[test]
    fn second_input_priority_alternating_presses() {
        let mut cleaner = SocdCleaner::new(SocdPolicy::SecondInputPriority);
        cleaner.clean(Inputs::RIGHT);
        assert_eq!(cleaner.clean(Inputs::LEFT | Inputs::RIGHT), Inputs::LEFT);
        // Release and re-press right without releasing left.
        assert_eq!(cleaner.clean(Inputs::LEFT), Inputs::LEFT);
        assert_eq!(cleaner.clean(Inputs::LEFT | Inputs::RIGHT), Inputs::RIGHT);
    }

    #[test]
    fn no_reactivation_suppresses_older_press() {
        let mut cleaner = SocdCleaner::new(SocdPolicy::SecondInputPriorityNoReactivation);
        // Left down, right down, right up (left still down): left must NOT
        // re-activate.
        cleaner.clean(Inputs::LEFT);
        assert_eq!(cleaner.clean(Inputs::LEFT | Inputs::RIGHT), Inputs::RIGHT);
        assert_eq!(cleaner.clean(Inputs::LEFT), Inputs::NONE);
        // Still suppressed on subsequent cycles.
        assert_eq!(cleaner.clean(Inputs::LEFT), Inputs::NONE);
        // Both released: latch clears, a fresh press works again.
        cleaner.clean(Inputs::NONE);
        assert_eq!(cleaner.clean(Inputs::LEFT), Inputs::LEFT);
    }

    #[test]
    fn no_reactivation_new_press_beats_latch() {
        let mut cleaner = SocdCleaner::new(SocdPolicy::SecondInputPriorityNoReactivation);
        cleaner.clean(Inputs::LEFT);
        cleaner.clean(Inputs::LEFT | Inputs::RIGHT);
        // Left suppressed.
        assert_eq!(cleaner.clean(Inputs::LEFT), Inputs::NONE);
        // Right pressed again: it is a new input and wins outright.
        assert_eq!(cleaner.clean(Inputs::LEFT | Inputs::RIGHT), Inputs::RIGHT);
        // Winner releases again: left stays suppressed.
        assert_eq!(cleaner.clean(Inputs::LEFT), Inputs::NONE);
    }

    #[test]
    fn pairs_are_independent() {
        let mut cleaner = SocdCleaner::new(SocdPolicy::SecondInputPriority);
        cleaner.clean(Inputs::LEFT | Inputs::DOWN);
        let cleaned = cleaner.clean(Inputs::LEFT | Inputs::RIGHT | Inputs::DOWN);
        assert_eq!(cleaned, Inputs::RIGHT | Inputs::DOWN);
    }

    #[test]
    fn cleaning_is_idempotent_on_cleaned_snapshots() {
        for policy in [
            SocdPolicy::Neutral,
            SocdPolicy::SecondInputPriority,
            SocdPolicy::SecondInputPriorityNoReactivation,
        ] {
            let mut cleaner = SocdCleaner::new(policy);
            cleaner.clean(Inputs::LEFT);
            let cleaned = cleaner.clean(Inputs::LEFT | Inputs::RIGHT | Inputs::A);
            assert_eq!(cleaner.clean(cleaned), cleaned, "policy {policy:?}");
        }
    }
}
