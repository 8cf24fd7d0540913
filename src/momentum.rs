use crate::timeline::Timeline;

/// Axis floor: a close game still renders against a ±10 scale.
const MIN_MARGIN_SCALE: i32 = 10;

/// One point on the score-margin-over-time curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumPoint {
    /// Seconds since the first action's wall timestamp.
    pub t: f64,
    /// Home score minus away score at this instant.
    pub margin: i32,
}

/// Margin curve over the full timeline: `(0, 0)` prepended, terminal point at
/// `total_duration` holding the last known margin.
pub fn momentum_series(timeline: &Timeline) -> Vec<MomentumPoint> {
    let mut points = vec![MomentumPoint { t: 0.0, margin: 0 }];
    let mut last_margin = 0;
    for timed in &timeline.actions {
        let margin =
            i32::from(timed.action.home_score) - i32::from(timed.action.away_score);
        points.push(MomentumPoint {
            t: timed.wall_time_offset,
            margin,
        });
        last_margin = margin;
    }
    points.push(MomentumPoint {
        t: timeline.total_duration,
        margin: last_margin,
    });
    points
}

/// The curve truncated to "now", plus its axis scale.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleCurve {
    pub points: Vec<MomentumPoint>,
    /// Max absolute visible margin, floored at 10. Derived from surviving
    /// points only so the final outcome is never inferable from the axis
    /// before it is actually reached.
    pub max_margin: i32,
}

/// Clip the full curve to `current_time`, discarding every point beyond it
/// and carrying the last margin forward to a virtual point at `current_time`
/// so the line stays continuous.
pub fn visible_at(full: &[MomentumPoint], current_time: f64, total_duration: f64) -> VisibleCurve {
    let mut points: Vec<MomentumPoint> =
        full.iter().copied().filter(|p| p.t <= current_time).collect();

    if let Some(last) = points.last().copied()
        && last.t < current_time
        && current_time <= total_duration
    {
        points.push(MomentumPoint {
            t: current_time,
            margin: last.margin,
        });
    }

    let max_margin = points
        .iter()
        .map(|p| p.margin.abs())
        .max()
        .unwrap_or(0)
        .max(MIN_MARGIN_SCALE);

    VisibleCurve { points, max_margin }
}

/// Map a horizontal pointer position within a rendered width to its
/// proportional time on the timeline, for issuing a clock seek.
pub fn seek_target(x: f64, width: f64, total_duration: f64) -> f64 {
    if width <= 0.0 {
        return 0.0;
    }
    (x / width).clamp(0.0, 1.0) * total_duration
}
