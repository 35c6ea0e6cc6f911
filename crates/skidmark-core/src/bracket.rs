// Playoff bracket section: championship, winners and consolation groups.

use std::borrow::Cow;

use crate::directory::TeamDirectory;
use crate::model::PlayoffBracketEntry;

/// Which list of the bracket section an entry is printed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketGroup {
    Championship,
    Winners,
    Consolation,
}

impl PlayoffBracketEntry {
    /// `is_championship` dominates, then `is_consolation`; everything else
    /// is in the winners bracket.
    pub fn group(&self) -> BracketGroup {
        if self.is_championship {
            BracketGroup::Championship
        } else if self.is_consolation {
            BracketGroup::Consolation
        } else {
            BracketGroup::Winners
        }
    }

    pub fn seed_label(&self) -> &str {
        self.seed.as_deref().unwrap_or("?")
    }

    pub fn round_label(&self) -> &str {
        self.current_round.as_deref().unwrap_or("?")
    }

    /// Opponent display name, or `TBD` when no opponent is set yet.
    pub fn opponent_name<'a>(&self, directory: &TeamDirectory<'a>) -> Cow<'a, str> {
        match self.opponent_team_id.as_deref() {
            None | Some("") => Cow::Borrowed("TBD"),
            Some(id) => directory.name(id),
        }
    }

    fn eliminated_suffix(&self) -> &'static str {
        if self.is_eliminated {
            " [ELIMINATED]"
        } else {
            ""
        }
    }
}

/// Entries of one bracket group, in input order.
pub fn entries_in(
    bracket: &[PlayoffBracketEntry],
    group: BracketGroup,
) -> Vec<&PlayoffBracketEntry> {
    bracket.iter().filter(|e| e.group() == group).collect()
}

/// Render the bracket section. Empty bracket renders as an empty string;
/// empty groups are skipped entirely.
pub fn format_playoff_bracket_section(
    bracket: &[PlayoffBracketEntry],
    directory: &TeamDirectory<'_>,
) -> String {
    if bracket.is_empty() {
        return String::new();
    }

    let mut lines = vec!["=== PLAYOFF BRACKET ===".to_string(), String::new()];

    let championship = entries_in(bracket, BracketGroup::Championship);
    if !championship.is_empty() {
        lines.push("\u{1f3c6} CHAMPIONSHIP MATCHUP:".to_string());
        for e in championship {
            lines.push(format!(
                "  #{} {} vs {}",
                e.seed_label(),
                directory.name(&e.team_id),
                e.opponent_name(directory)
            ));
        }
        lines.push(String::new());
    }

    let winners = entries_in(bracket, BracketGroup::Winners);
    if !winners.is_empty() {
        lines.push("WINNERS BRACKET:".to_string());
        for e in winners {
            lines.push(format!(
                "  #{} {} (Round {}) vs {}{}",
                e.seed_label(),
                directory.name(&e.team_id),
                e.round_label(),
                e.opponent_name(directory),
                e.eliminated_suffix()
            ));
        }
        lines.push(String::new());
    }

    let consolation = entries_in(bracket, BracketGroup::Consolation);
    if !consolation.is_empty() {
        lines.push("CONSOLATION BRACKET (the losers' lounge):".to_string());
        for e in consolation {
            lines.push(format!(
                "  #{} {}{}",
                e.seed_label(),
                directory.name(&e.team_id),
                e.eliminated_suffix()
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Team;

    fn team(id: &str, name: &str) -> Team {
        Team {
            id: id.into(),
            name: name.into(),
            owner: "Owner".into(),
            record: "9-5".into(),
            points_for: None,
            points_against: None,
            streak: None,
            top_players: vec![],
        }
    }

    fn teams() -> Vec<Team> {
        vec![
            team("1", "Eagles"),
            team("2", "Bears"),
            team("3", "Lions"),
            team("4", "Rams"),
            team("5", "Jets"),
            team("6", "Colts"),
        ]
    }

    fn entry(team_id: &str, seed: u32, opponent: Option<&str>) -> PlayoffBracketEntry {
        PlayoffBracketEntry {
            team_id: team_id.into(),
            seed: Some(seed.to_string()),
            current_round: Some("1".into()),
            opponent_team_id: opponent.map(String::from),
            is_eliminated: false,
            is_consolation: false,
            is_championship: false,
        }
    }

    fn render(bracket: &[PlayoffBracketEntry]) -> String {
        let teams = teams();
        let dir = TeamDirectory::new(&teams);
        format_playoff_bracket_section(bracket, &dir)
    }

    #[test]
    fn empty_bracket_renders_nothing() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn championship_entries_reference_each_other() {
        let mut a = entry("1", 1, Some("2"));
        a.is_championship = true;
        let mut b = entry("2", 2, Some("1"));
        b.is_championship = true;

        let out = render(&[a, b]);
        assert!(out.contains("\u{1f3c6} CHAMPIONSHIP MATCHUP:"));
        assert!(out.contains("#1 Eagles vs Bears"));
        assert!(out.contains("#2 Bears vs Eagles"));
        assert_eq!(out.matches("CHAMPIONSHIP MATCHUP").count(), 1);
        assert!(!out.contains("WINNERS BRACKET"));
        assert!(!out.contains("CONSOLATION BRACKET"));
    }

    #[test]
    fn winners_bracket_line() {
        let out = render(&[entry("3", 3, Some("4"))]);
        assert!(out.contains("WINNERS BRACKET:"));
        assert!(out.contains("#3 Lions (Round 1) vs Rams"));
    }

    #[test]
    fn eliminated_tag() {
        let mut e = entry("5", 5, Some("1"));
        e.is_eliminated = true;
        let out = render(&[e]);
        assert!(out.contains("#5 Jets (Round 1) vs Eagles [ELIMINATED]"));
    }

    #[test]
    fn consolation_bracket_line() {
        let mut e = entry("6", 6, None);
        e.is_consolation = true;
        let mut f = entry("5", 5, None);
        f.is_consolation = true;
        f.is_eliminated = true;
        let out = render(&[e, f]);
        assert!(out.contains("CONSOLATION BRACKET (the losers' lounge):"));
        assert!(out.contains("  #6 Colts\n"));
        assert!(out.contains("  #5 Jets [ELIMINATED]"));
    }

    #[test]
    fn missing_opponent_is_tbd() {
        let out = render(&[entry("3", 3, None), entry("4", 4, Some(""))]);
        assert!(out.contains("#3 Lions (Round 1) vs TBD"));
        assert!(out.contains("#4 Rams (Round 1) vs TBD"));
    }

    #[test]
    fn unknown_team_falls_back() {
        let out = render(&[entry("99", 7, Some("98"))]);
        assert!(out.contains("#7 Team 99 (Round 1) vs Team 98"));
    }

    #[test]
    fn missing_seed_and_round_render_question_marks() {
        let mut e = entry("3", 3, None);
        e.seed = None;
        e.current_round = None;
        let out = render(&[e]);
        assert!(out.contains("#? Lions (Round ?) vs TBD"));
    }

    #[test]
    fn championship_dominates_consolation() {
        let mut e = entry("1", 1, Some("2"));
        e.is_championship = true;
        e.is_consolation = true;
        assert_eq!(e.group(), BracketGroup::Championship);

        let out = render(&[e]);
        assert!(out.contains("CHAMPIONSHIP MATCHUP"));
        assert!(!out.contains("CONSOLATION BRACKET"));
    }

    #[test]
    fn groups_render_in_fixed_order() {
        let mut cons = entry("6", 6, None);
        cons.is_consolation = true;
        let mut champ = entry("1", 1, Some("2"));
        champ.is_championship = true;
        let out = render(&[cons, entry("3", 3, Some("4")), champ]);

        let c = out.find("CHAMPIONSHIP MATCHUP").unwrap();
        let w = out.find("WINNERS BRACKET").unwrap();
        let l = out.find("CONSOLATION BRACKET").unwrap();
        assert!(c < w && w < l);
        assert!(out.starts_with("=== PLAYOFF BRACKET ===\n\n"));
    }
}
