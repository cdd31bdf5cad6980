//! Keyframed sky/fog/ambient palette sampled by time of day.
//!
//! Stops are dense around sunrise and sunset, so those transitions are fast,
//! and sparse around noon and midnight, where the tones hold steady.

use glam::Vec3;

use crate::error::SkyError;
use crate::time::TimeProvider;

/// One palette keyframe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    /// Normalized time in `[0, 1]`.
    pub time: f32,
    /// Background shell color.
    pub sky: Vec3,
    /// Scene fog color.
    pub fog: Vec3,
    /// Ambient light color.
    pub ambient: Vec3,
    /// Ambient light intensity in `[0, 1]`.
    pub ambient_intensity: f32,
    /// Star layer opacity in `[0, 1]`.
    pub star_intensity: f32,
}

const fn stop(
    time: f32,
    sky: [f32; 3],
    fog: [f32; 3],
    ambient: [f32; 3],
    ambient_intensity: f32,
    star_intensity: f32,
) -> ColorStop {
    ColorStop {
        time,
        sky: Vec3::new(sky[0], sky[1], sky[2]),
        fog: Vec3::new(fog[0], fog[1], fog[2]),
        ambient: Vec3::new(ambient[0], ambient[1], ambient[2]),
        ambient_intensity,
        star_intensity,
    }
}

/// Midnight, predawn, sunrise, morning, midday, afternoon, sunset, dusk, midnight.
pub const DEFAULT_PALETTE: [ColorStop; 9] = [
    stop(0.0, [0.02, 0.02, 0.08], [0.03, 0.03, 0.08], [0.25, 0.28, 0.45], 0.15, 1.0),
    stop(0.2, [0.10, 0.08, 0.22], [0.12, 0.10, 0.22], [0.35, 0.32, 0.50], 0.2, 0.8),
    stop(0.25, [0.95, 0.55, 0.35], [0.85, 0.55, 0.40], [0.90, 0.65, 0.50], 0.4, 0.2),
    stop(0.3, [0.55, 0.70, 0.95], [0.70, 0.78, 0.90], [0.95, 0.90, 0.85], 0.6, 0.0),
    stop(0.5, [0.40, 0.65, 1.00], [0.75, 0.85, 1.00], [1.00, 1.00, 1.00], 0.8, 0.0),
    stop(0.7, [0.50, 0.68, 0.95], [0.78, 0.82, 0.92], [1.00, 0.95, 0.88], 0.65, 0.0),
    stop(0.75, [0.98, 0.45, 0.25], [0.90, 0.50, 0.35], [0.95, 0.60, 0.45], 0.4, 0.2),
    stop(0.8, [0.20, 0.12, 0.30], [0.18, 0.12, 0.26], [0.40, 0.35, 0.55], 0.22, 0.7),
    stop(1.0, [0.02, 0.02, 0.08], [0.03, 0.03, 0.08], [0.25, 0.28, 0.45], 0.15, 1.0),
];

/// Interpolated palette values for one instant. The default is black with
/// no ambient light and no stars.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SkyColors {
    pub sky: Vec3,
    pub fog: Vec3,
    pub ambient: Vec3,
    pub ambient_intensity: f32,
    pub star_intensity: f32,
}

impl SkyColors {
    fn lerp(a: &ColorStop, b: &ColorStop, u: f32) -> Self {
        // Weighted form so u = 0 and u = 1 reproduce the stops exactly.
        let v = 1.0 - u;
        Self {
            sky: a.sky * v + b.sky * u,
            fog: a.fog * v + b.fog * u,
            ambient: a.ambient * v + b.ambient * u,
            ambient_intensity: a.ambient_intensity * v + b.ambient_intensity * u,
            star_intensity: a.star_intensity * v + b.star_intensity * u,
        }
    }
}

impl From<&ColorStop> for SkyColors {
    fn from(stop: &ColorStop) -> Self {
        Self::lerp(stop, stop, 0.0)
    }
}

/// Indices of the stops bracketing `t`: `next` is the first stop at or after
/// `t` (wrapping to the first stop), `prev` the one before it (wrapping to
/// the last). `None` for an empty table.
fn bracket(stops: &[ColorStop], t: f32) -> Option<(usize, usize)> {
    let last = stops.len().checked_sub(1)?;
    let next = stops.iter().position(|s| s.time >= t).unwrap_or(0);
    let prev = if next == 0 { last } else { next - 1 };
    Some((prev, next))
}

/// Sample a sorted stop table at `t` with wraparound across the 0/1 seam.
/// Works for palettes that do not close at 0 and 1 as well. An empty table
/// samples as [`SkyColors::default`].
pub fn interpolate(stops: &[ColorStop], t: f32) -> SkyColors {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let Some((prev_idx, next_idx)) = bracket(stops, t) else {
        return SkyColors::default();
    };
    let (prev, next) = (&stops[prev_idx], &stops[next_idx]);

    let (elapsed, duration) = if prev.time > next.time {
        // Segment crosses midnight.
        let duration = (1.0 - prev.time) + next.time;
        let elapsed = if t >= prev.time {
            t - prev.time
        } else {
            (1.0 - prev.time) + t
        };
        (elapsed, duration)
    } else {
        (t - prev.time, next.time - prev.time)
    };

    let u = if duration > f32::EPSILON {
        (elapsed / duration).clamp(0.0, 1.0)
    } else {
        0.0
    };
    SkyColors::lerp(prev, next, u)
}

fn validate(stops: &[ColorStop]) -> Result<(), SkyError> {
    let invalid = |msg: String| Err(SkyError::InvalidPalette(msg));

    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return invalid("palette is empty".into());
    };
    if stops.len() < 2 {
        return invalid("palette needs at least two stops".into());
    }
    if first.time != 0.0 || last.time != 1.0 {
        return invalid(format!(
            "palette must span 0.0..=1.0, got {}..={}",
            first.time, last.time
        ));
    }
    if stops.iter().any(|s| !s.time.is_finite()) {
        return invalid("stop times must be finite".into());
    }
    for pair in stops.windows(2) {
        if pair[0].time >= pair[1].time {
            return invalid(format!(
                "stop times must strictly increase, got {} then {}",
                pair[0].time, pair[1].time
            ));
        }
    }
    for s in stops {
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        if !in_unit(s.ambient_intensity) || !in_unit(s.star_intensity) {
            return invalid(format!("intensities at t={} must lie in [0, 1]", s.time));
        }
    }
    let seam = SkyColors::from(first);
    let closing = SkyColors::from(last);
    let close = |a: Vec3, b: Vec3| a.abs_diff_eq(b, 1e-6);
    if !close(seam.sky, closing.sky)
        || !close(seam.fog, closing.fog)
        || !close(seam.ambient, closing.ambient)
        || (seam.ambient_intensity - closing.ambient_intensity).abs() > 1e-6
        || (seam.star_intensity - closing.star_intensity).abs() > 1e-6
    {
        return invalid("first and last stops must match so the palette wraps seamlessly".into());
    }
    Ok(())
}

/// Maps the current time of day to sky, fog and ambient values.
///
/// Call [`update_colors`](Self::update_colors) once per frame; the accessors
/// return the values computed by that call without recomputing.
#[derive(Clone, Debug)]
pub struct ColorProvider {
    stops: Vec<ColorStop>,
    current: SkyColors,
}

impl ColorProvider {
    /// Provider over a validated stop table.
    pub fn with_stops(stops: Vec<ColorStop>) -> Result<Self, SkyError> {
        if let Err(err) = validate(&stops) {
            log::warn!("rejected sky palette: {err}");
            return Err(err);
        }
        let current = SkyColors::from(&stops[0]);
        Ok(Self { stops, current })
    }

    /// Palette values at `t` without touching the cached state.
    pub fn sample(&self, t: f32) -> SkyColors {
        interpolate(&self.stops, t)
    }

    /// Recompute the cached values from the clock.
    pub fn update_colors(&mut self, time: &TimeProvider) {
        self.current = self.sample(time.time_normalized());
    }

    /// Values computed by the last [`update_colors`](Self::update_colors).
    pub fn current(&self) -> &SkyColors {
        &self.current
    }

    pub fn sky_color(&self) -> Vec3 {
        self.current.sky
    }

    pub fn fog_color(&self) -> Vec3 {
        self.current.fog
    }

    pub fn ambient_color(&self) -> Vec3 {
        self.current.ambient
    }

    pub fn ambient_intensity(&self) -> f32 {
        self.current.ambient_intensity
    }

    pub fn star_intensity(&self) -> f32 {
        self.current.star_intensity
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }
}

impl Default for ColorProvider {
    fn default() -> Self {
        Self {
            stops: DEFAULT_PALETTE.to_vec(),
            current: SkyColors::from(&DEFAULT_PALETTE[0]),
        }
    }
}
