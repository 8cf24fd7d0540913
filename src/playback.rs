use std::time::Instant;

/// Virtual-time playback state machine, decoupled from real time.
///
/// The clock only advances through [`PlaybackClock::tick`], which the runtime
/// drives every 100 ms while playing. Deltas are always measured against the
/// previous tick's real timestamp, never a fixed origin, so pausing, resuming
/// or a live `total_duration` change cannot compound drift.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    current_time: f64,
    total_duration: f64,
    speed: f64,
    playing: bool,
    last_tick: Option<Instant>,
}

impl PlaybackClock {
    pub fn new(total_duration: f64) -> Self {
        Self {
            current_time: 0.0,
            total_duration: total_duration.max(0.0),
            speed: 1.0,
            playing: false,
            last_tick: None,
        }
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn toggle_play(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.playing = true;
            // Fresh reference point; the first tick after resuming measures
            // from here rather than from the pre-pause timestamp.
            self.last_tick = None;
        }
    }

    fn pause(&mut self) {
        self.playing = false;
        self.last_tick = None;
    }

    /// Clamp `t` into `[0, total_duration]` and assign it immediately,
    /// regardless of play state.
    pub fn seek(&mut self, t: f64) {
        self.current_time = t.clamp(0.0, self.total_duration);
    }

    /// Replace the speed multiplier. Deliberately leaves the tick reference
    /// timestamp alone so a speed change cannot produce a time jump.
    pub fn set_speed(&mut self, multiplier: f64) {
        if multiplier > 0.0 {
            self.speed = multiplier;
        }
    }

    /// Accept live growth of the playable range. The duration never shrinks
    /// across refreshes of the same game.
    pub fn set_total_duration(&mut self, total_duration: f64) {
        if total_duration > self.total_duration {
            self.total_duration = total_duration;
        }
    }

    /// Advance virtual time by the real delta since the previous tick, scaled
    /// by the speed multiplier. Returns true when this tick reached the end
    /// of the timeline; the end transition fires exactly once.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.playing {
            return false;
        }
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return false;
        };
        self.last_tick = Some(now);

        let delta = now.saturating_duration_since(last).as_secs_f64();
        let next = self.current_time + delta * self.speed;
        if next >= self.total_duration {
            self.current_time = self.total_duration;
            self.pause();
            true
        } else {
            self.current_time = next;
            false
        }
    }
}
