use nba_api::Action;

const REGULATION_PERIOD_SECS: f64 = 720.0;
const OVERTIME_PERIOD_SECS: f64 = 300.0;
const REGULATION_TOTAL_SECS: f64 = 2880.0;

/// An action plus the offsets derived during normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedAction {
    pub action: Action,
    /// Seconds elapsed in-game since tip-off. Defines canonical order.
    pub game_time_offset: f64,
    /// Seconds since the first sorted action's wall timestamp.
    pub wall_time_offset: f64,
}

/// The full normalized action sequence for one game. Owned exclusively by the
/// normalizer; rebuilt wholesale on every new raw batch, never patched.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    pub actions: Vec<TimedAction>,
    /// Final action's wall-time offset; one regulation game for an empty batch.
    pub total_duration: f64,
    pub home_team_id: u32,
    pub away_team_id: u32,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Actions whose wall-time offset lies at or before `current_time`, in
    /// canonical game-time order. For t1 < t2 the set at t1 is a subset of
    /// the set at t2.
    ///
    /// A plain filter, not a range cut: wall offsets are not monotone in
    /// game-time order once corrections land out of sequence, so there is no
    /// contiguous prefix to slice.
    pub fn visible_at(&self, current_time: f64) -> Vec<TimedAction> {
        self.actions
            .iter()
            .filter(|a| a.wall_time_offset <= current_time)
            .cloned()
            .collect()
    }
}

/// Seconds elapsed in-game since tip-off: 12-minute regulation periods,
/// 5-minute overtimes.
pub fn game_time_offset(period: u8, clock_remaining: f64) -> f64 {
    let period = f64::from(period.max(1));
    if period <= 4.0 {
        (period - 1.0) * REGULATION_PERIOD_SECS + (REGULATION_PERIOD_SECS - clock_remaining)
    } else {
        REGULATION_TOTAL_SECS
            + (period - 5.0) * OVERTIME_PERIOD_SECS
            + (OVERTIME_PERIOD_SECS - clock_remaining)
    }
}

/// Canonicalize a raw, possibly out-of-order action batch into a time-ordered
/// timeline. `known_teams` is the (home, away) pair from metadata when
/// available; without it, identities fall back to [`infer_team_ids`].
pub fn normalize(actions: Vec<Action>, known_teams: Option<(u32, u32)>) -> Timeline {
    if actions.is_empty() {
        let (home_team_id, away_team_id) = known_teams.unwrap_or((0, 0));
        return Timeline {
            actions: Vec::new(),
            total_duration: REGULATION_TOTAL_SECS,
            home_team_id,
            away_team_id,
        };
    }

    let mut timed: Vec<TimedAction> = actions
        .into_iter()
        .map(|action| {
            let game_time_offset = game_time_offset(action.period, action.clock_remaining);
            TimedAction {
                action,
                game_time_offset,
                wall_time_offset: 0.0,
            }
        })
        .collect();

    // Game time is the primary key; source sequence numbers only break ties,
    // since corrections can be appended out of order.
    timed.sort_by(|a, b| {
        a.game_time_offset
            .total_cmp(&b.game_time_offset)
            .then_with(|| a.action.sequence_id.cmp(&b.action.sequence_id))
    });

    let start = timed[0].action.wall_timestamp;
    for t in &mut timed {
        t.wall_time_offset =
            (t.action.wall_timestamp - start).num_milliseconds() as f64 / 1000.0;
    }

    let total_duration = timed
        .last()
        .map(|t| t.wall_time_offset)
        .unwrap_or(REGULATION_TOTAL_SECS);

    let (home_team_id, away_team_id) = match known_teams {
        Some(ids) => ids,
        None => infer_team_ids(&timed),
    };

    Timeline {
        actions: timed,
        total_duration,
        home_team_id,
        away_team_id,
    }
}

/// Fallback team-identity inference: the first two distinct non-zero team ids
/// in sorted encounter order become (away, home) respectively.
///
/// Known limitation: this can swap home and away under unlucky action
/// orderings. Metadata ids always take precedence; this only exists so a
/// batch without metadata still produces a usable box score.
fn infer_team_ids(sorted: &[TimedAction]) -> (u32, u32) {
    let mut away = 0;
    let mut home = 0;
    for t in sorted {
        let id = t.action.team_id;
        if id == 0 || id == away {
            continue;
        }
        if away == 0 {
            away = id;
        } else {
            home = id;
            break;
        }
    }
    (home, away)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn action(sequence_id: u32, period: u8, clock: f64, wall_secs: i64) -> Action {
        Action {
            sequence_id,
            period,
            clock_remaining: clock,
            wall_timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 0, 10, 0).unwrap()
                + Duration::seconds(wall_secs),
            ..Default::default()
        }
    }

    #[test]
    fn game_time_offset_covers_regulation_and_overtime() {
        assert_eq!(game_time_offset(1, 720.0), 0.0);
        assert_eq!(game_time_offset(1, 320.0), 400.0);
        assert_eq!(game_time_offset(2, 720.0), 720.0);
        assert_eq!(game_time_offset(4, 0.0), 2880.0);
        assert_eq!(game_time_offset(5, 300.0), 2880.0);
        assert_eq!(game_time_offset(5, 0.0), 3180.0);
        assert_eq!(game_time_offset(6, 120.0), 3360.0);
    }

    #[test]
    fn orders_by_game_time_with_sequence_tiebreak() {
        // Corrections appended out of sequence order: 618 at 5:20, 669 at
        // 5:19, 621 at 5:18 must come out chronological, not numeric.
        let batch = vec![
            action(621, 2, 318.0, 30),
            action(618, 2, 320.0, 10),
            action(669, 2, 319.0, 20),
        ];
        let timeline = normalize(batch, None);
        let order: Vec<u32> = timeline
            .actions
            .iter()
            .map(|t| t.action.sequence_id)
            .collect();
        assert_eq!(order, vec![618, 669, 621]);
    }

    #[test]
    fn equal_game_times_fall_back_to_sequence_order() {
        let batch = vec![
            action(12, 1, 700.0, 5),
            action(10, 1, 700.0, 4),
            action(11, 1, 700.0, 6),
        ];
        let timeline = normalize(batch, None);
        let order: Vec<u32> = timeline
            .actions
            .iter()
            .map(|t| t.action.sequence_id)
            .collect();
        assert_eq!(order, vec![10, 11, 12]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let batch = vec![
            action(3, 1, 650.0, 40),
            action(1, 1, 720.0, 0),
            action(2, 1, 700.0, 15),
        ];
        let once = normalize(batch, None);
        let again = normalize(
            once.actions.iter().map(|t| t.action.clone()).collect(),
            None,
        );
        assert_eq!(once.actions, again.actions);
        assert_eq!(once.total_duration, again.total_duration);
    }

    #[test]
    fn wall_offsets_are_relative_to_first_sorted_action() {
        let batch = vec![action(2, 1, 700.0, 90), action(1, 1, 720.0, 0)];
        let timeline = normalize(batch, None);
        assert_eq!(timeline.actions[0].wall_time_offset, 0.0);
        assert_eq!(timeline.actions[1].wall_time_offset, 90.0);
        assert_eq!(timeline.total_duration, 90.0);
    }

    #[test]
    fn empty_batch_defaults_to_one_regulation_game() {
        let timeline = normalize(Vec::new(), None);
        assert!(timeline.is_empty());
        assert_eq!(timeline.total_duration, 2880.0);
    }

    #[test]
    fn metadata_team_ids_take_precedence() {
        let mut a = action(1, 1, 700.0, 0);
        a.team_id = 55;
        let timeline = normalize(vec![a], Some((101, 102)));
        assert_eq!(timeline.home_team_id, 101);
        assert_eq!(timeline.away_team_id, 102);
    }

    #[test]
    fn inference_assigns_first_seen_id_as_away() {
        let mut first = action(1, 1, 710.0, 0);
        first.team_id = 102;
        let mut neutral = action(2, 1, 705.0, 5);
        neutral.team_id = 0;
        let mut second = action(3, 1, 700.0, 10);
        second.team_id = 101;
        let timeline = normalize(vec![first, neutral, second], None);
        assert_eq!(timeline.away_team_id, 102);
        assert_eq!(timeline.home_team_id, 101);
    }

    #[test]
    fn visibility_follows_wall_offsets_even_when_not_monotone_in_game_time() {
        // A correction recorded late: canonical game-time order 1,2,3,4 but
        // wall offsets 0,40,20,60. At t=25 only the 0 and 20 actions may
        // show; the 40-offset action lies in the future.
        let batch = vec![
            action(1, 1, 720.0, 0),
            action(2, 1, 700.0, 40),
            action(3, 1, 680.0, 20),
            action(4, 1, 660.0, 60),
        ];
        let timeline = normalize(batch, None);
        let ids = |t: f64| -> Vec<u32> {
            timeline
                .visible_at(t)
                .iter()
                .map(|a| a.action.sequence_id)
                .collect()
        };
        assert_eq!(ids(25.0), vec![1, 3]);
        assert_eq!(ids(40.0), vec![1, 2, 3]);
        assert_eq!(ids(60.0), vec![1, 2, 3, 4]);
    }

    #[test]
    fn visible_prefix_is_monotone() {
        let batch = vec![
            action(1, 1, 720.0, 0),
            action(2, 1, 700.0, 30),
            action(3, 1, 680.0, 60),
        ];
        let timeline = normalize(batch, None);
        assert_eq!(timeline.visible_at(0.0).len(), 1);
        assert_eq!(timeline.visible_at(30.0).len(), 2);
        assert_eq!(timeline.visible_at(59.9).len(), 2);
        assert_eq!(timeline.visible_at(1e9).len(), 3);
    }
}
