use crate::boxscore::{BoxScore, InitialRoster, calculate_box_score};
use crate::momentum::{MomentumPoint, VisibleCurve, momentum_series, seek_target, visible_at};
use crate::playback::PlaybackClock;
use crate::timeline::{TimedAction, Timeline, normalize};
use chrono::Duration;
use log::{debug, info};
use nba_api::{Action, GameMeta};
use std::time::Instant;

/// Restricts the aggregator's input slice to one period. The clock and
/// timeline are untouched by the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PeriodFilter {
    #[default]
    All,
    Period(u8),
}

/// Everything the presentation layer reads, derived fresh per call so there
/// is no stale residue when scrubbing backward.
#[derive(Debug, Clone)]
pub struct ReplayView {
    /// "Q2 05:20", "OT1 02:30", or "Pre-game" before any visible action.
    pub game_clock_label: String,
    /// Real-world time of day at the playback position, "--:--:--" with no data.
    pub wall_clock_label: String,
    /// The visible prefix, newest first (how a live feed reads).
    pub visible_actions: Vec<TimedAction>,
    pub box_score: BoxScore,
    pub momentum: VisibleCurve,
    pub is_live: bool,
    pub is_playing: bool,
    pub current_time: f64,
    pub total_duration: f64,
    pub speed: f64,
}

/// Single owner of all replay state for one game-viewing session. Mutated
/// only by user calls and by the runtime applying [`crate::messages::SessionEvent`]s;
/// everything else is a pure derivation.
#[derive(Debug)]
pub struct ReplaySession {
    game_id: String,
    timeline: Timeline,
    clock: PlaybackClock,
    meta: Option<GameMeta>,
    momentum: Vec<MomentumPoint>,
    period_filter: PeriodFilter,
    is_live: bool,
}

impl ReplaySession {
    pub fn new(game_id: impl Into<String>, actions: Vec<Action>, meta: Option<GameMeta>) -> Self {
        let timeline = normalize(actions, known_teams(meta.as_ref()));
        let momentum = momentum_series(&timeline);
        let clock = PlaybackClock::new(timeline.total_duration);
        let is_live = meta.as_ref().is_some_and(|m| m.status.is_live());
        Self {
            game_id: game_id.into(),
            timeline,
            clock,
            meta,
            momentum,
            period_filter: PeriodFilter::All,
            is_live,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn is_live(&self) -> bool {
        self.is_live
    }

    // -----------------------------------------------------------------------
    // Mutators — immediate, synchronous, last-write-wins
    // -----------------------------------------------------------------------

    pub fn toggle_play(&mut self) {
        self.clock.toggle_play();
    }

    pub fn seek(&mut self, seconds: f64) {
        self.clock.seek(seconds);
    }

    /// Pointer interaction on the momentum graph: a horizontal position in
    /// the rendered width seeks the proportional time.
    pub fn seek_to_position(&mut self, x: f64, width: f64) {
        self.clock
            .seek(seek_target(x, width, self.clock.total_duration()));
    }

    pub fn set_speed(&mut self, multiplier: f64) {
        self.clock.set_speed(multiplier);
    }

    pub fn select_period_filter(&mut self, filter: PeriodFilter) {
        self.period_filter = filter;
    }

    // -----------------------------------------------------------------------
    // Event handlers — called from the runtime event loop
    // -----------------------------------------------------------------------

    pub fn on_tick(&mut self, now: Instant) {
        if self.clock.tick(now) {
            debug!("game {}: playback reached end of timeline", self.game_id);
        }
    }

    /// Apply one live refresh as a single atomic replacement: the timeline is
    /// rebuilt wholesale from the new batch and the metadata swapped in the
    /// same call, so replay-while-live cannot desynchronize.
    pub fn on_snapshot(&mut self, actions: Vec<Action>, meta: GameMeta) {
        self.timeline = normalize(actions, known_teams(Some(&meta)));
        self.momentum = momentum_series(&self.timeline);
        self.clock.set_total_duration(self.timeline.total_duration);
        if self.is_live && meta.status.is_terminal() {
            info!("game {} is final; leaving live mode", self.game_id);
            self.is_live = false;
        }
        self.meta = Some(meta);
    }

    // -----------------------------------------------------------------------
    // Read model
    // -----------------------------------------------------------------------

    pub fn view(&self) -> ReplayView {
        let current_time = self.clock.current_time();
        let visible = self.timeline.visible_at(current_time);

        let box_score = match self.period_filter {
            PeriodFilter::All => self.aggregate(&visible),
            PeriodFilter::Period(p) => {
                let filtered: Vec<TimedAction> = visible
                    .iter()
                    .filter(|t| t.action.period == p)
                    .cloned()
                    .collect();
                self.aggregate(&filtered)
            }
        };

        let momentum = visible_at(&self.momentum, current_time, self.timeline.total_duration);

        let game_clock_label = game_clock_label(visible.last());
        let mut visible_actions = visible;
        visible_actions.reverse();

        ReplayView {
            game_clock_label,
            wall_clock_label: wall_clock_label(&self.timeline, current_time),
            visible_actions,
            box_score,
            momentum,
            is_live: self.is_live,
            is_playing: self.clock.is_playing(),
            current_time,
            total_duration: self.clock.total_duration(),
            speed: self.clock.speed(),
        }
    }

    fn aggregate(&self, slice: &[TimedAction]) -> BoxScore {
        let roster = self.meta.as_ref().map(|m| InitialRoster {
            home: &m.home_roster,
            away: &m.away_roster,
        });
        calculate_box_score(
            slice,
            self.timeline.home_team_id,
            self.timeline.away_team_id,
            roster,
        )
    }
}

fn known_teams(meta: Option<&GameMeta>) -> Option<(u32, u32)> {
    meta.filter(|m| m.home_team_id != 0 && m.away_team_id != 0)
        .map(|m| (m.home_team_id, m.away_team_id))
}

fn game_clock_label(latest: Option<&TimedAction>) -> String {
    let Some(latest) = latest else {
        return "Pre-game".to_owned();
    };
    let period = latest.action.period;
    let secs = latest.action.clock_remaining.max(0.0) as u64;
    let clock = format!("{:02}:{:02}", secs / 60, secs % 60);
    if period <= 4 {
        format!("Q{period} {clock}")
    } else {
        format!("OT{} {clock}", period - 4)
    }
}

fn wall_clock_label(timeline: &Timeline, current_time: f64) -> String {
    let Some(first) = timeline.actions.first() else {
        return "--:--:--".to_owned();
    };
    let at = first.action.wall_timestamp
        + Duration::milliseconds((current_time * 1000.0) as i64);
    at.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use nba_api::{GameStatus, RosterPlayer};
    use std::time::Duration as StdDuration;

    const HOME: u32 = 101;
    const AWAY: u32 = 102;

    fn meta(status: GameStatus) -> GameMeta {
        GameMeta {
            game_id: "0022300001".into(),
            status,
            home_team_id: HOME,
            away_team_id: AWAY,
            home_tricode: "BOS".into(),
            away_tricode: "LAL".into(),
            home_roster: vec![RosterPlayer { person_id: 11, name: "Tatum".into() }],
            away_roster: vec![RosterPlayer { person_id: 22, name: "James".into() }],
        }
    }

    fn shot(seq: u32, period: u8, clock: f64, wall_secs: i64, team_id: u32, made_score: (u16, u16)) -> Action {
        Action {
            sequence_id: seq,
            period,
            clock_remaining: clock,
            wall_timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 0, 10, 0).unwrap()
                + Duration::seconds(wall_secs),
            kind: "2pt".into(),
            actor_id: 11,
            team_id,
            shot_made: true,
            home_score: made_score.0,
            away_score: made_score.1,
            ..Default::default()
        }
    }

    fn session() -> ReplaySession {
        let actions = vec![
            shot(1, 1, 700.0, 0, HOME, (2, 0)),
            shot(2, 2, 700.0, 60, AWAY, (2, 2)),
            shot(3, 3, 700.0, 120, HOME, (4, 2)),
        ];
        ReplaySession::new("0022300001", actions, Some(meta(GameStatus::InProgress)))
    }

    #[test]
    fn view_before_playback_shows_pregame_and_zero_visible_beyond_first() {
        let s = session();
        let view = s.view();
        assert_eq!(view.current_time, 0.0);
        // The first action sits at offset 0 and is already visible.
        assert_eq!(view.visible_actions.len(), 1);
        assert_eq!(view.game_clock_label, "Q1 11:40");
        assert!(view.is_live);
        assert!(!view.is_playing);
    }

    #[test]
    fn seeking_reveals_a_monotone_prefix() {
        let mut s = session();
        s.seek(60.0);
        assert_eq!(s.view().visible_actions.len(), 2);
        s.seek(1e9); // clamped to total_duration
        assert_eq!(s.view().visible_actions.len(), 3);
        s.seek(0.0);
        assert_eq!(s.view().visible_actions.len(), 1);
    }

    #[test]
    fn late_corrections_do_not_reveal_future_actions() {
        // Wall offsets 0,40,20,60 against game-time order 1,2,3,4: the
        // correction at offset 20 shows at t=25, the offset-40 action not yet.
        let actions = vec![
            shot(1, 1, 700.0, 0, HOME, (2, 0)),
            shot(2, 2, 700.0, 40, AWAY, (2, 2)),
            shot(3, 3, 700.0, 20, HOME, (4, 2)),
            shot(4, 4, 700.0, 60, AWAY, (4, 4)),
        ];
        let mut s = ReplaySession::new("g", actions, Some(meta(GameStatus::InProgress)));
        s.seek(25.0);
        let view = s.view();
        let ids: Vec<u32> = view
            .visible_actions
            .iter()
            .map(|t| t.action.sequence_id)
            .collect();
        assert_eq!(ids, vec![3, 1]);
        // The aggregate sees only the two home baskets that have happened.
        assert_eq!(view.box_score.home.totals.points, 4);
        assert_eq!(view.box_score.away.totals.points, 0);
    }

    #[test]
    fn visible_actions_are_newest_first() {
        let mut s = session();
        s.seek(120.0);
        let view = s.view();
        assert_eq!(view.visible_actions[0].action.sequence_id, 3);
        assert_eq!(view.visible_actions[2].action.sequence_id, 1);
    }

    #[test]
    fn period_filter_restricts_aggregation_but_not_the_clock() {
        let mut s = session();
        s.seek(120.0);
        s.select_period_filter(PeriodFilter::Period(2));
        let view = s.view();
        // Only the away team's period-2 basket survives the filter.
        assert_eq!(view.box_score.home.totals.points, 0);
        assert_eq!(view.box_score.away.totals.points, 2);
        assert_eq!(view.current_time, 120.0);
        assert_eq!(view.visible_actions.len(), 3);

        s.select_period_filter(PeriodFilter::All);
        assert_eq!(s.view().box_score.home.totals.points, 4);
    }

    #[test]
    fn roster_rows_appear_before_any_action() {
        let s = ReplaySession::new(
            "0022300001",
            Vec::new(),
            Some(meta(GameStatus::InProgress)),
        );
        let view = s.view();
        assert_eq!(view.box_score.home.players[0].name, "Tatum");
        assert_eq!(view.box_score.away.players[0].name, "James");
        assert_eq!(view.game_clock_label, "Pre-game");
        assert_eq!(view.wall_clock_label, "--:--:--");
    }

    #[test]
    fn snapshot_replaces_wholesale_and_preserves_playback_position() {
        let mut s = session();
        s.seek(60.0);
        let mut actions: Vec<Action> = vec![
            shot(1, 1, 700.0, 0, HOME, (2, 0)),
            shot(2, 2, 700.0, 60, AWAY, (2, 2)),
            shot(3, 3, 700.0, 120, HOME, (4, 2)),
            shot(4, 4, 700.0, 200, AWAY, (4, 4)),
        ];
        // Live feeds append; ordering is re-derived either way.
        actions.swap(0, 3);
        s.on_snapshot(actions, meta(GameStatus::InProgress));

        let view = s.view();
        assert_eq!(view.current_time, 60.0);
        assert_eq!(view.total_duration, 200.0);
        assert_eq!(view.visible_actions.len(), 2);
        assert!(view.is_live);
    }

    #[test]
    fn total_duration_is_non_decreasing_across_refreshes() {
        let mut s = session();
        // A shrunken batch must not shrink the playable range.
        s.on_snapshot(vec![shot(1, 1, 700.0, 0, HOME, (2, 0))], meta(GameStatus::InProgress));
        assert_eq!(s.view().total_duration, 120.0);
    }

    #[test]
    fn terminal_snapshot_flips_is_live_exactly_once() {
        let mut s = session();
        assert!(s.is_live());
        s.on_snapshot(Vec::new(), meta(GameStatus::Final));
        assert!(!s.is_live());
        // A repeated terminal snapshot is a no-op for liveness.
        s.on_snapshot(Vec::new(), meta(GameStatus::Final));
        assert!(!s.is_live());
    }

    #[test]
    fn tick_advances_while_playing_and_momentum_is_clipped() {
        let mut s = session();
        s.toggle_play();
        let start = Instant::now();
        s.on_tick(start);
        s.on_tick(start + StdDuration::from_secs(70));
        let view = s.view();
        assert!((view.current_time - 70.0).abs() < 0.1);
        assert!(view.momentum.points.iter().all(|p| p.t <= view.current_time));
    }

    #[test]
    fn overtime_clock_label_counts_from_ot1() {
        let a = shot(1, 5, 150.0, 0, HOME, (100, 100));
        let s = ReplaySession::new("g", vec![a], Some(meta(GameStatus::Final)));
        assert_eq!(s.view().game_clock_label, "OT1 02:30");
    }
}
