// Weekly head-to-head section: scores, outcome labels, and every starter's
// stat line with the top scorer and biggest bust called out per side.

use crate::directory::TeamDirectory;
use crate::model::{PlayerStat, WeeklyMatchup};

pub const TOP_SCORER_MARKER: &str = " \u{2b50} TOP SCORER";
pub const BIGGEST_BUST_MARKER: &str = " \u{1f4a9} BIGGEST BUST";

/// Result of a matchup from one side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Win => "WIN",
            Outcome::Loss => "LOSS",
            Outcome::Tie => "TIE",
        }
    }

    /// Outcomes for (home, away).
    pub fn from_scores(home_score: f64, away_score: f64) -> (Outcome, Outcome) {
        if home_score > away_score {
            (Outcome::Win, Outcome::Loss)
        } else if away_score > home_score {
            (Outcome::Loss, Outcome::Win)
        } else {
            (Outcome::Tie, Outcome::Tie)
        }
    }
}

/// Positions (within the starter list) of the top scorer and biggest bust.
///
/// Both use a stable scan, so the first of several tied players wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlights {
    pub top: usize,
    pub bust: usize,
}

impl Highlights {
    pub fn find(starters: &[&PlayerStat]) -> Option<Self> {
        let first = starters.first()?;
        let mut top = (0, first.points);
        let mut bust = (0, first.points);
        for (i, p) in starters.iter().enumerate().skip(1) {
            if p.points > top.1 {
                top = (i, p.points);
            }
            if p.points < bust.1 {
                bust = (i, p.points);
            }
        }
        Some(Highlights {
            top: top.0,
            bust: bust.0,
        })
    }

    /// Marker for the starter at `index`. The top scorer check runs first,
    /// so a player who is both (a lone starter, or an all-tied lineup) is
    /// only ever tagged as top scorer.
    pub fn marker(&self, index: usize) -> &'static str {
        if index == self.top {
            TOP_SCORER_MARKER
        } else if index == self.bust {
            BIGGEST_BUST_MARKER
        } else {
            ""
        }
    }
}

/// Starters only; bench players never appear in the prompt.
pub fn starters(players: &[PlayerStat]) -> Vec<&PlayerStat> {
    players.iter().filter(|p| p.is_starter).collect()
}

/// Section header, e.g. `WEEK 8'S MATCHUPS`. A blank week counts as unknown.
pub fn week_label(week_number: Option<&str>) -> String {
    match week_number {
        Some(week) if !week.is_empty() => format!("WEEK {week}'S MATCHUPS"),
        _ => "THIS WEEK'S MATCHUPS".to_string(),
    }
}

/// Render the matchups section. Returns an empty string when there are no
/// matchups; the prompt then keeps its season-aggregate shape.
pub fn format_matchups_section(
    matchups: &[WeeklyMatchup],
    directory: &TeamDirectory<'_>,
    week_number: Option<&str>,
) -> String {
    if matchups.is_empty() {
        return String::new();
    }

    let mut lines = vec![format!("=== {} ===", week_label(week_number)), String::new()];

    for m in matchups {
        let home_name = directory.name(&m.home_team_id);
        let away_name = directory.name(&m.away_team_id);
        let (home_result, away_result) = Outcome::from_scores(m.home_score, m.away_score);

        lines.push(format!(
            "{} ({:.1}) vs {} ({:.1})",
            home_name, m.home_score, away_name, m.away_score
        ));
        lines.push(String::new());

        let sides = [
            (&home_name, m.home_score, home_result, &m.home_players),
            (&away_name, m.away_score, away_result, &m.away_players),
        ];
        for (name, score, result, players) in sides {
            lines.push(format!("  {} -- {:.1} pts ({})", name, score, result.label()));
            push_starter_lines(&mut lines, players);
            lines.push(String::new());
        }

        lines.push("---".to_string());
    }

    lines.join("\n")
}

fn push_starter_lines(lines: &mut Vec<String>, players: &[PlayerStat]) {
    let starters = starters(players);
    let Some(highlights) = Highlights::find(&starters) else {
        lines.push("    No starter data available".to_string());
        return;
    };

    for (i, p) in starters.iter().enumerate() {
        lines.push(format!(
            "    {} ({}): {:.1} pts{}",
            p.name,
            p.position,
            p.points,
            highlights.marker(i)
        ));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
