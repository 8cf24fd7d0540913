use crate::timeline::TimedAction;
use nba_api::{Action, RosterPlayer};
use std::collections::HashMap;

/// Shared counter block for both team totals and individual player rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatLine {
    pub points: u16,
    pub fgm: u16,
    pub fga: u16,
    pub fg3m: u16,
    pub fg3a: u16,
    pub ftm: u16,
    pub fta: u16,
    pub oreb: u16,
    pub dreb: u16,
    pub reb: u16,
    pub ast: u16,
    pub stl: u16,
    pub blk: u16,
    pub tov: u16,
    pub pf: u16,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStats {
    pub person_id: u32,
    pub name: String,
    pub team_id: u32,
    /// Stable display position: roster order for seeded players, then first
    /// appearance order for anyone else.
    pub order: usize,
    pub line: StatLine,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamStats {
    pub team_id: u32,
    /// Tricode when the feed provides one, otherwise a placeholder.
    pub label: String,
    pub totals: StatLine,
    /// Sorted by `order`.
    pub players: Vec<PlayerStats>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxScore {
    pub home: TeamStats,
    pub away: TeamStats,
}

/// Starters/roster rows to seed before folding in actions, so rostered
/// players with zero recorded actions still appear, in supplied order.
#[derive(Debug, Clone, Copy)]
pub struct InitialRoster<'a> {
    pub home: &'a [RosterPlayer],
    pub away: &'a [RosterPlayer],
}

struct TeamBuilder {
    team_id: u32,
    label: String,
    totals: StatLine,
    players: HashMap<u32, PlayerStats>,
    next_order: usize,
}

impl TeamBuilder {
    fn new(team_id: u32, placeholder: &str) -> Self {
        Self {
            team_id,
            label: placeholder.to_owned(),
            totals: StatLine::default(),
            players: HashMap::new(),
            next_order: 0,
        }
    }

    fn player(&mut self, person_id: u32, name: &str) -> &mut PlayerStats {
        let team_id = self.team_id;
        let next_order = &mut self.next_order;
        let entry = self.players.entry(person_id).or_insert_with(|| {
            let order = *next_order;
            *next_order += 1;
            PlayerStats {
                person_id,
                name: String::new(),
                team_id,
                order,
                line: StatLine::default(),
            }
        });
        // Roster seeding and assist references may not know the name yet;
        // keep the first non-empty one seen.
        if entry.name.is_empty() && !name.is_empty() {
            entry.name = name.to_owned();
        }
        entry
    }

    fn finish(self) -> TeamStats {
        let mut players: Vec<PlayerStats> = self.players.into_values().collect();
        players.sort_by_key(|p| p.order);
        TeamStats {
            team_id: self.team_id,
            label: self.label,
            totals: self.totals,
            players,
        }
    }
}

/// Recompute cumulative statistics from a time-bounded action slice.
///
/// Pure derivation: always invoked on a fresh, already-chronological slice
/// and never used as an incremental accumulator, so scrubbing backward in
/// time simply re-derives a smaller result with no stale residue. Always
/// returns a result; unresolvable team ids yield placeholder teams with zero
/// stats, and unrecognized action kinds are inert for forward compatibility.
pub fn calculate_box_score(
    visible_actions: &[TimedAction],
    home_team_id: u32,
    away_team_id: u32,
    initial_roster: Option<InitialRoster<'_>>,
) -> BoxScore {
    let mut home = TeamBuilder::new(home_team_id, "HOME");
    let mut away = TeamBuilder::new(away_team_id, "AWAY");

    if let Some(roster) = initial_roster {
        for p in roster.home {
            home.player(p.person_id, &p.name);
        }
        for p in roster.away {
            away.player(p.person_id, &p.name);
        }
    }

    for timed in visible_actions {
        let action = &timed.action;
        // teamId 0 marks clock/period events; nothing to attribute.
        if action.team_id == 0 {
            continue;
        }
        let team = if action.team_id == home_team_id {
            &mut home
        } else if action.team_id == away_team_id {
            &mut away
        } else {
            continue;
        };
        if (team.label == "HOME" || team.label == "AWAY") && !action.team_tricode.is_empty() {
            team.label = action.team_tricode.clone();
        }
        apply_action(team, action);
    }

    BoxScore {
        home: home.finish(),
        away: away.finish(),
    }
}

fn apply_action(team: &mut TeamBuilder, action: &Action) {
    match action.kind.as_str() {
        "2pt" | "3pt" => apply_shot(team, action, action.kind == "3pt"),
        "freethrow" => {
            let p = team.player(action.actor_id, &action.player_name);
            p.line.fta += 1;
            team.totals.fta += 1;
            if action.shot_made {
                let p = team.player(action.actor_id, &action.player_name);
                p.line.ftm += 1;
                p.line.points += 1;
                team.totals.ftm += 1;
                team.totals.points += 1;
            }
        }
        "rebound" => {
            let offensive = action.sub_kind == "offensive";
            if action.actor_id != 0 {
                let p = team.player(action.actor_id, &action.player_name);
                if offensive {
                    p.line.oreb += 1;
                } else {
                    p.line.dreb += 1;
                }
                p.line.reb += 1;
            }
            if offensive {
                team.totals.oreb += 1;
            } else {
                team.totals.dreb += 1;
            }
            team.totals.reb += 1;
        }
        "turnover" => {
            team.player(action.actor_id, &action.player_name).line.tov += 1;
            team.totals.tov += 1;
        }
        "steal" => {
            team.player(action.actor_id, &action.player_name).line.stl += 1;
            team.totals.stl += 1;
        }
        "block" => {
            team.player(action.actor_id, &action.player_name).line.blk += 1;
            team.totals.blk += 1;
        }
        "foul" => {
            team.player(action.actor_id, &action.player_name).line.pf += 1;
            team.totals.pf += 1;
        }
        // Unrecognized kinds are inert, not an error: the upstream schema
        // grows new action types without notice.
        _ => {}
    }
}

fn apply_shot(team: &mut TeamBuilder, action: &Action, is_three: bool) {
    {
        let p = team.player(action.actor_id, &action.player_name);
        p.line.fga += 1;
        if is_three {
            p.line.fg3a += 1;
        }
    }
    team.totals.fga += 1;
    if is_three {
        team.totals.fg3a += 1;
    }

    if !action.shot_made {
        return;
    }

    let points = if is_three { 3 } else { 2 };
    {
        let p = team.player(action.actor_id, &action.player_name);
        p.line.fgm += 1;
        p.line.points += points;
        if is_three {
            p.line.fg3m += 1;
        }
    }
    team.totals.fgm += 1;
    team.totals.points += points;
    if is_three {
        team.totals.fg3m += 1;
    }

    if let Some(assist_id) = action.assist_actor_id {
        team.player(assist_id, &action.assist_player_name).line.ast += 1;
        team.totals.ast += 1;
    }
}
