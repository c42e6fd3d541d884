// SPDX-License-Identifier: MIT OR Apache-2.0
//! The animation clock and selection-dependent duration policy.
//!
//! The clock advances a current timestamp toward the end of the resolved
//! range over a wall-clock duration chosen by the [`DurationPolicy`]. It is
//! driven externally, one tick per display frame, and owns no scheduling:
//! the engine requests frames and feeds the resulting wall-clock timestamps
//! into [`AnimationClock::tick`].

use crate::catalog::WatershedCatalog;
use crate::range::{TimeRange, Timestamp};
use crate::selection::Selection;
use serde::{Deserialize, Serialize};

/// Wall-clock milliseconds, as reported by the host's frame callbacks.
pub type WallMillis = f64;

/// An in-flight playback run.
///
/// `wall_start` is captured on the first frame callback after play, not at
/// the play request, so the first visible frame maps to progress zero even
/// when the host delays the callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    /// Timestamp the run started from
    pub origin: Timestamp,
    /// Effective wall-clock duration for the remaining distance
    pub duration_ms: f64,
    /// Wall clock at the first tick of the run
    pub wall_start: Option<WallMillis>,
}

/// Result of advancing the clock by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Playback continues; another frame should be scheduled
    Advanced(Timestamp),
    /// The range end was reached exactly; the clock is idle again
    Completed(Timestamp),
    /// The clock was not playing; nothing happened
    Idle,
}

/// Monotonic animation clock over a resolved time range.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClock {
    current: Timestamp,
    playback: Option<Playback>,
}

impl AnimationClock {
    /// Create an idle clock parked at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: start,
            playback: None,
        }
    }

    /// The current animation timestamp.
    pub fn current(&self) -> Timestamp {
        self.current
    }

    /// Whether a playback run is in flight.
    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    /// The in-flight run, if any.
    pub fn playback(&self) -> Option<&Playback> {
        self.playback.as_ref()
    }

    /// Start playing toward `range.max` over `full_duration_ms` (the nominal
    /// duration for traversing the whole range).
    ///
    /// Returns `false` without starting when the range is degenerate. When
    /// the current value already sits at the range end, it first snaps back
    /// to `range.min` so replay restarts from the beginning. Starting from a
    /// midpoint scales the duration proportionally, so a resumed run reaches
    /// the end in time proportional to the remaining distance.
    pub fn play(&mut self, range: TimeRange, full_duration_ms: u64) -> bool {
        if range.is_degenerate() {
            return false;
        }
        if self.current >= range.max {
            self.current = range.min;
        }
        let remaining = (range.max - self.current) as f64;
        let adjusted = full_duration_ms as f64 * remaining / range.span() as f64;
        self.playback = Some(Playback {
            origin: self.current,
            duration_ms: adjusted,
            wall_start: None,
        });
        true
    }

    /// Stop playing; the current value stays where it is.
    pub fn pause(&mut self) {
        self.playback = None;
    }

    /// Jump to `t` (clamped into `range`) and stop playing.
    pub fn scrub(&mut self, t: Timestamp, range: TimeRange) {
        self.playback = None;
        self.current = range.clamp(t);
    }

    /// Park the clock, idle, at `start`.
    pub fn reset(&mut self, start: Timestamp) {
        self.playback = None;
        self.current = start;
    }

    /// Clamp the current value into `range` without touching playback.
    pub fn clamp_into(&mut self, range: TimeRange) {
        self.current = range.clamp(self.current);
    }

    /// Advance one frame at wall time `now_ms`.
    ///
    /// Progress is elapsed wall time over the run's adjusted duration,
    /// clamped to `[0, 1]`; the current value is non-decreasing across ticks
    /// and lands on `range.max` exactly at completion.
    pub fn tick(&mut self, range: TimeRange, now_ms: WallMillis) -> Tick {
        let Some(playback) = self.playback.as_mut() else {
            return Tick::Idle;
        };

        let start = *playback.wall_start.get_or_insert(now_ms);
        let elapsed = (now_ms - start).max(0.0);
        let progress = if playback.duration_ms <= 0.0 {
            1.0
        } else {
            (elapsed / playback.duration_ms).clamp(0.0, 1.0)
        };

        // Guard against a host clock that steps backwards between frames:
        // the current value never decreases while playing.
        let distance = (range.max - playback.origin) as f64;
        let next = playback.origin + (distance * progress).round() as Timestamp;
        self.current = next.max(self.current);

        if progress >= 1.0 {
            self.current = range.max;
            self.playback = None;
            Tick::Completed(self.current)
        } else {
            Tick::Advanced(self.current)
        }
    }
}

/// Which selections a duration tier applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierSelector {
    /// The full catalog universe
    Full,
    /// A selection exactly equal to the named catalog group
    Group(String),
}

/// One duration rule: selections matching `selector` play over `millis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationTier {
    /// Selection shape the tier applies to
    pub selector: TierSelector,
    /// Nominal full-range duration in milliseconds
    pub millis: u64,
}

/// Ordered duration rules, evaluated top-down at every play start.
///
/// Curated groupings are meant to read faster or slower than the default,
/// so the duration depends on the selection's shape. New tiers are additive;
/// nothing here is cached across selection changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationPolicy {
    /// Tiers tried in order; the first match wins
    pub tiers: Vec<DurationTier>,
    /// Duration for selections matching no tier
    pub default_millis: u64,
}

impl DurationPolicy {
    /// The nominal full-range duration for `selection`.
    pub fn duration_for(&self, selection: &Selection, catalog: &WatershedCatalog) -> u64 {
        for tier in &self.tiers {
            let matched = match &tier.selector {
                TierSelector::Full => selection.is_full(catalog),
                TierSelector::Group(name) => catalog
                    .group(name)
                    .is_some_and(|members| selection.matches_group(members)),
            };
            if matched {
                return tier.millis;
            }
        }
        self.default_millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::WatershedId;
    use crate::testutil::test_catalog;

    fn range() -> TimeRange {
        TimeRange::new(1_000, 2_000)
    }

    #[test]
    fn test_play_rejects_degenerate_range() {
        let mut clock = AnimationClock::new(500);
        assert!(!clock.play(TimeRange::degenerate_at(500), 10_000));
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_full_run_takes_nominal_duration() {
        let mut clock = AnimationClock::new(1_000);
        assert!(clock.play(range(), 10_000));

        assert_eq!(clock.tick(range(), 0.0), Tick::Advanced(1_000));
        assert_eq!(clock.tick(range(), 5_000.0), Tick::Advanced(1_500));
        assert_eq!(clock.tick(range(), 10_000.0), Tick::Completed(2_000));
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_replay_at_end_restarts_from_min() {
        let mut clock = AnimationClock::new(2_000);
        assert!(clock.play(range(), 10_000));
        assert_eq!(clock.current(), 1_000);
        assert_eq!(clock.playback().unwrap().origin, 1_000);
    }

    #[test]
    fn test_resume_scales_duration_to_remaining_distance() {
        let mut clock = AnimationClock::new(1_750);
        assert!(clock.play(range(), 10_000));

        // A quarter of the range remains, so the run lasts a quarter of the
        // nominal duration.
        let playback = clock.playback().unwrap();
        assert!((playback.duration_ms - 2_500.0).abs() < f64::EPSILON);

        assert_eq!(clock.tick(range(), 100.0), Tick::Advanced(1_750));
        assert_eq!(clock.tick(range(), 1_350.0), Tick::Advanced(1_875));
        assert_eq!(clock.tick(range(), 2_600.0), Tick::Completed(2_000));
    }

    #[test]
    fn test_tick_is_monotonic_and_capped() {
        let mut clock = AnimationClock::new(1_000);
        clock.play(range(), 1_000);

        let mut last = clock.current();
        for now in [0.0, 10.0, 250.0, 249.0, 700.0, 5_000.0] {
            match clock.tick(range(), now) {
                Tick::Advanced(t) | Tick::Completed(t) => {
                    assert!(t >= last);
                    assert!(t <= range().max);
                    last = t;
                }
                Tick::Idle => break,
            }
        }
        assert_eq!(last, range().max);
    }

    #[test]
    fn test_scrub_cancels_playback_and_clamps() {
        let mut clock = AnimationClock::new(1_000);
        clock.play(range(), 10_000);
        clock.tick(range(), 0.0);

        clock.scrub(5_000, range());
        assert!(!clock.is_playing());
        assert_eq!(clock.current(), 2_000);

        clock.scrub(1_234, range());
        assert_eq!(clock.current(), 1_234);
    }

    #[test]
    fn test_tick_while_idle_is_noop() {
        let mut clock = AnimationClock::new(1_500);
        assert_eq!(clock.tick(range(), 99.0), Tick::Idle);
        assert_eq!(clock.current(), 1_500);
    }

    #[test]
    fn test_duration_tiers_evaluate_top_down() {
        let catalog = test_catalog();
        let policy = DurationPolicy {
            tiers: vec![
                DurationTier {
                    selector: TierSelector::Full,
                    millis: 15_000,
                },
                DurationTier {
                    selector: TierSelector::Group("Uplands".to_string()),
                    millis: 5_000,
                },
            ],
            default_millis: 10_000,
        };

        let full = Selection::full(&catalog);
        assert_eq!(policy.duration_for(&full, &catalog), 15_000);

        let mut uplands = Selection::empty();
        uplands.toggle_group(catalog.group("Uplands").unwrap());
        assert_eq!(policy.duration_for(&uplands, &catalog), 5_000);

        let mut partial = uplands.clone();
        partial.toggle(WatershedId::from("W9"));
        assert_eq!(policy.duration_for(&partial, &catalog), 10_000);

        let unknown_group = DurationPolicy {
            tiers: vec![DurationTier {
                selector: TierSelector::Group("Nowhere".to_string()),
                millis: 1,
            }],
            default_millis: 10_000,
        };
        assert_eq!(unknown_group.duration_for(&uplands, &catalog), 10_000);
    }
}
