//! The cyclic day/night clock.

use crate::error::SkyError;

/// Coarse part of the day, used for logging and gameplay hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DayPhase {
    Night,
    Dawn,
    Day,
    Dusk,
}

impl DayPhase {
    /// Phase containing normalized time `t`.
    ///
    /// Dawn spans predawn to morning (0.2..0.3), dusk spans sunset glow to
    /// the end of twilight (0.7..0.8).
    pub fn at(t: f32) -> Self {
        match t {
            t if (0.2..0.3).contains(&t) => DayPhase::Dawn,
            t if (0.3..0.7).contains(&t) => DayPhase::Day,
            t if (0.7..0.8).contains(&t) => DayPhase::Dusk,
            _ => DayPhase::Night,
        }
    }
}

/// Owns the normalized time of day.
///
/// Time is kept in seconds within `[0, cycle_seconds)` and exposed in
/// normalized form: 0 = midnight, 0.25 = sunrise, 0.5 = noon, 0.75 = sunset.
#[derive(Clone, Debug)]
pub struct TimeProvider {
    cycle_seconds: f64,
    current_seconds: f64,
    time_scale: f32,
    day_count: u64,
}

impl TimeProvider {
    /// Default cycle length in minutes.
    pub const DEFAULT_CYCLE_MINUTES: f32 = 20.0;
    /// Default start time (dawn).
    pub const DEFAULT_START: f32 = 0.25;

    /// Clock with a `cycle_minutes` long day starting at normalized `start`.
    pub fn new(cycle_minutes: f32, start: f32) -> Result<Self, SkyError> {
        if !cycle_minutes.is_finite() || cycle_minutes <= 0.0 {
            return Err(SkyError::InvalidCycleDuration(cycle_minutes));
        }
        let mut provider = Self {
            cycle_seconds: f64::from(cycle_minutes) * 60.0,
            current_seconds: 0.0,
            time_scale: 1.0,
            day_count: 0,
        };
        provider.set_time_normalized(start);
        Ok(provider)
    }

    /// Advance the clock by `delta_seconds` (scaled by the time scale).
    ///
    /// Deltas spanning several cycles wrap correctly; each full wrap counts
    /// as one elapsed day. Negative or non-finite deltas are ignored.
    pub fn update(&mut self, delta_seconds: f32) {
        let delta = f64::from(delta_seconds) * f64::from(self.time_scale);
        if !delta.is_finite() || delta <= 0.0 {
            return;
        }
        let advanced = self.current_seconds + delta;
        let wraps = (advanced / self.cycle_seconds).floor();
        self.day_count = self.day_count.saturating_add(wraps as u64);
        self.current_seconds = self.wrap(advanced);
    }

    /// Current time in `[0, 1)`.
    pub fn time_normalized(&self) -> f32 {
        let t = (self.current_seconds / self.cycle_seconds) as f32;
        // f64 -> f32 rounding can land exactly on 1.0 just before the wrap.
        if t >= 1.0 { 0.0 } else { t }
    }

    /// Jump to normalized time `t`, clamped to `[0, 1]`. `1.0` is the same
    /// instant as midnight and reads back as `0.0`. Does not count days.
    pub fn set_time_normalized(&mut self, t: f32) {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        self.current_seconds = self.wrap(f64::from(t) * self.cycle_seconds);
    }

    /// Cycle length in seconds.
    pub fn cycle_seconds(&self) -> f64 {
        self.cycle_seconds
    }

    /// Seconds elapsed since midnight of the current cycle.
    pub fn current_seconds(&self) -> f64 {
        self.current_seconds
    }

    /// Multiplier applied to every delta.
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set the clock speed. Negative values are treated as paused.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = if scale.is_finite() { scale.max(0.0) } else { 0.0 };
    }

    /// Number of completed cycles since creation.
    pub fn day_count(&self) -> u64 {
        self.day_count
    }

    /// Current [`DayPhase`].
    pub fn phase(&self) -> DayPhase {
        DayPhase::at(self.time_normalized())
    }

    fn wrap(&self, seconds: f64) -> f64 {
        let wrapped = seconds.rem_euclid(self.cycle_seconds);
        if wrapped >= self.cycle_seconds { 0.0 } else { wrapped }
    }
}

impl Default for TimeProvider {
    fn default() -> Self {
        Self {
            cycle_seconds: f64::from(Self::DEFAULT_CYCLE_MINUTES) * 60.0,
            current_seconds: f64::from(Self::DEFAULT_START)
                * f64::from(Self::DEFAULT_CYCLE_MINUTES)
                * 60.0,
            time_scale: 1.0,
            day_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_twenty_minute_day_at_dawn() {
        let time = TimeProvider::default();
        assert_eq!(time.cycle_seconds(), 1200.0);
        assert!((time.time_normalized() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_non_positive_cycle() {
        assert!(matches!(
            TimeProvider::new(0.0, 0.0),
            Err(SkyError::InvalidCycleDuration(_))
        ));
        assert!(TimeProvider::new(f32::NAN, 0.0).is_err());
    }

    #[test]
    fn test_update_advances_linearly() {
        let mut time = TimeProvider::new(1.0, 0.0).unwrap();
        time.update(15.0);
        assert!((time.time_normalized() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_wraps_at_cycle_end() {
        let mut time = TimeProvider::new(1.0, 0.9).unwrap();
        time.update(12.0);
        let t = time.time_normalized();
        assert!((t - 0.1).abs() < 1e-5, "expected wrap to 0.1, got {t}");
        assert_eq!(time.day_count(), 1);
    }

    #[test]
    fn test_huge_delta_wraps_multiple_cycles() {
        let mut time = TimeProvider::new(1.0, 0.0).unwrap();
        time.update(60.0 * 3.5);
        let t = time.time_normalized();
        assert!((t - 0.5).abs() < 1e-5, "expected 0.5 after 3.5 cycles, got {t}");
        assert_eq!(time.day_count(), 3);
    }

    #[test]
    fn test_stays_in_range_and_continuous_across_many_cycles() {
        let mut time = TimeProvider::new(0.5, 0.0).unwrap();
        let delta = 0.37_f32;
        let step = f64::from(delta) / time.cycle_seconds();
        let mut previous = time.time_normalized();

        for _ in 0..1000 {
            time.update(delta);
            let t = time.time_normalized();
            assert!((0.0..1.0).contains(&t), "time {t} escaped [0, 1)");

            // Forward distance on the circle.
            let advanced = f64::from((t - previous).rem_euclid(1.0));
            assert!(
                (advanced - step).abs() < 1e-4,
                "discontinuity: {previous} -> {t} (expected step {step})"
            );
            previous = t;
        }
        assert!(time.day_count() >= 3);
    }

    #[test]
    fn test_exact_cycle_lands_on_midnight() {
        let mut time = TimeProvider::new(1.0, 0.0).unwrap();
        time.update(60.0);
        assert_eq!(time.time_normalized(), 0.0);
        assert_eq!(time.day_count(), 1);
    }

    #[test]
    fn test_set_time_clamps() {
        let mut time = TimeProvider::default();
        time.set_time_normalized(-3.0);
        assert_eq!(time.time_normalized(), 0.0);
        time.set_time_normalized(0.6);
        assert!((time.time_normalized() - 0.6).abs() < 1e-6);
        time.set_time_normalized(1.0);
        assert_eq!(time.time_normalized(), 0.0, "1.0 is midnight");
        time.set_time_normalized(7.0);
        assert_eq!(time.time_normalized(), 0.0);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut time = TimeProvider::new(1.0, 0.4).unwrap();
        time.update(-10.0);
        assert!((time.time_normalized() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_time_scale() {
        let mut time = TimeProvider::new(1.0, 0.0).unwrap();
        time.set_time_scale(2.0);
        time.update(15.0);
        assert!((time.time_normalized() - 0.5).abs() < 1e-6);

        time.set_time_scale(0.0);
        time.update(15.0);
        assert!((time.time_normalized() - 0.5).abs() < 1e-6, "paused clock moved");

        time.set_time_scale(-1.0);
        assert_eq!(time.time_scale(), 0.0);
    }

    #[test]
    fn test_phases() {
        assert_eq!(DayPhase::at(0.0), DayPhase::Night);
        assert_eq!(DayPhase::at(0.25), DayPhase::Dawn);
        assert_eq!(DayPhase::at(0.5), DayPhase::Day);
        assert_eq!(DayPhase::at(0.75), DayPhase::Dusk);
        assert_eq!(DayPhase::at(0.9), DayPhase::Night);

        let time = TimeProvider::new(1.0, 0.5).unwrap();
        assert_eq!(time.phase(), DayPhase::Day);
    }
}
