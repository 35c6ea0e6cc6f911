// Narrative mode selection and the mode-specific "roasting approach" copy.
//
// A request is rendered in exactly one of three modes. Playoff mode needs
// both the playoffs phase and a non-empty bracket; a playoffs phase without
// bracket data renders as a regular-season prompt.

use crate::directory::TeamDirectory;
use crate::model::{LeagueContext, PlayoffBracketEntry, SeasonPhase};

pub const TOP_CUTOFF: usize = 3;
pub const MAX_MID_CUTOFF: usize = 7;

/// Extra requirement lines appended in playoff mode.
pub const PLAYOFF_REQUIREMENTS: &str = "\
- Reference each team's playoff seed and bracket position.
- Emphasize elimination pressure -- every loss could be the last.
- Mock eliminated teams mercilessly and reference their consolation bracket exile.
- For head-to-head playoff matchups, reference what is at stake.
- Give championship matchup teams an elevated, legacy-defining roast treatment.";

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Top,
    Middle,
    Bottom,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::Top => "TOP TIER",
            Tier::Middle => "MIDDLE TIER",
            Tier::Bottom => "BOTTOM TIER",
        }
    }
}

/// Rank cutoffs for the three standings tiers.
///
/// Rank is 1-based position in the caller's team order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierBoundaries {
    pub top_cutoff: usize,
    pub mid_cutoff: usize,
}

impl TierBoundaries {
    pub fn for_team_count(total_teams: usize) -> Self {
        Self {
            top_cutoff: TOP_CUTOFF,
            mid_cutoff: MAX_MID_CUTOFF.min(total_teams.saturating_sub(1)),
        }
    }

    /// `TOP TIER (ranks 1-3)` style heading used by the approach copy.
    pub fn heading(&self, tier: Tier) -> String {
        match tier {
            Tier::Top => format!("{} (ranks 1-{})", tier.label(), self.top_cutoff),
            Tier::Middle => format!(
                "{} (ranks {}-{})",
                tier.label(),
                self.top_cutoff + 1,
                self.mid_cutoff
            ),
            Tier::Bottom => format!("{} (ranks {}+)", tier.label(), self.mid_cutoff + 1),
        }
    }

    /// Tier for a 1-based rank. Checked top-down, so small leagues where
    /// `mid_cutoff < top_cutoff` still get every rank in exactly one tier.
    #[cfg(test)]
    pub(crate) fn tier_of(&self, rank: usize) -> Tier {
        if rank <= self.top_cutoff {
            Tier::Top
        } else if rank <= self.mid_cutoff {
            Tier::Middle
        } else {
            Tier::Bottom
        }
    }
}

// ---------------------------------------------------------------------------
// Mode selection
// ---------------------------------------------------------------------------

/// The narrative framing for one prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NarrativeMode<'a> {
    RegularSeason(TierBoundaries),
    Offseason(TierBoundaries),
    Playoffs(&'a [PlayoffBracketEntry]),
}

impl<'a> NarrativeMode<'a> {
    pub fn select(
        phase: SeasonPhase,
        bracket: &'a [PlayoffBracketEntry],
        total_teams: usize,
    ) -> Self {
        let tiers = TierBoundaries::for_team_count(total_teams);
        match phase {
            SeasonPhase::Playoffs if !bracket.is_empty() => NarrativeMode::Playoffs(bracket),
            SeasonPhase::Offseason => NarrativeMode::Offseason(tiers),
            _ => NarrativeMode::RegularSeason(tiers),
        }
    }

    pub fn is_playoffs(&self) -> bool {
        matches!(self, NarrativeMode::Playoffs(_))
    }

    /// The bracket to render, present only in playoff mode.
    pub fn bracket(&self) -> Option<&'a [PlayoffBracketEntry]> {
        match *self {
            NarrativeMode::Playoffs(bracket) => Some(bracket),
            _ => None,
        }
    }

    /// The `=== ROASTING APPROACH ... ===` block for this mode.
    pub fn approach(&self, context: &LeagueContext, directory: &TeamDirectory<'_>) -> String {
        match self {
            NarrativeMode::RegularSeason(tiers) => regular_season_approach(tiers, context),
            NarrativeMode::Offseason(tiers) => offseason_approach(tiers, context),
            NarrativeMode::Playoffs(bracket) => playoff_approach(bracket, directory),
        }
    }

    pub fn extra_requirements(&self) -> Option<&'static str> {
        match self {
            NarrativeMode::Playoffs(_) => Some(PLAYOFF_REQUIREMENTS),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Approach copy
// ---------------------------------------------------------------------------

fn regular_season_approach(tiers: &TierBoundaries, context: &LeagueContext) -> String {
    let sacko_line = if context.has_sacko() {
        format!(
            "The sacko punishment ({}) is looming -- remind them VIVIDLY.",
            context.sacko_text()
        )
    } else {
        "They are not tanking, they are just bad.".to_string()
    };

    format!(
        "=== ROASTING APPROACH ===\n\
         \n\
         {top}: Celebrate success with backhanded compliments. Find the crack -- luck-carried records, boneheaded decisions, fraudulent point differentials -- and stick your finger in it.\n\
         \n\
         {middle}: These are the frauds and pretenders. Mock their inconsistency and mediocrity ruthlessly. Not good enough to celebrate, not bad enough to pity.\n\
         \n\
         {bottom}: Absolute destruction. Reference their actual terrible stats. Mock delusional optimism. {sacko_line}",
        top = tiers.heading(Tier::Top),
        middle = tiers.heading(Tier::Middle),
        bottom = tiers.heading(Tier::Bottom),
    )
}

fn offseason_approach(tiers: &TierBoundaries, context: &LeagueContext) -> String {
    let sacko_line = if context.has_sacko() {
        format!(
            "The sacko punishment ({}) awaits -- describe their impending humiliation in vivid detail.",
            context.sacko_text()
        )
    } else {
        "They have nothing to show for an entire season of effort.".to_string()
    };

    format!(
        "=== ROASTING APPROACH (OFFSEASON MODE) ===\n\
         \n\
         The season is OVER. These are the final standings. Every win, every loss, every embarrassing stat line is now permanently etched in league history. There are no more chances to redeem a garbage season or prove the doubters wrong.\n\
         \n\
         {top}: They won when it mattered. But did they REALLY earn it, or did they get carried by one lucky draft pick? Question their legacy. Were they actually good, or was everyone else just worse?\n\
         \n\
         {middle}: The most forgettable teams in league history. Not good enough to celebrate, not bad enough to be memorable. They existed. That's about it.\n\
         \n\
         {bottom}: Their season was a disaster from start to finish. {sacko_line}",
        top = tiers.heading(Tier::Top),
        middle = tiers.heading(Tier::Middle),
        bottom = tiers.heading(Tier::Bottom),
    )
}

fn playoff_approach(bracket: &[PlayoffBracketEntry], directory: &TeamDirectory<'_>) -> String {
    let championship: Vec<_> = bracket.iter().filter(|e| e.is_championship).collect();
    let eliminated: Vec<_> = bracket.iter().filter(|e| e.is_eliminated).collect();
    let consolation = bracket
        .iter()
        .any(|e| e.is_consolation && !e.is_eliminated);
    let active = bracket
        .iter()
        .any(|e| !e.is_championship && !e.is_eliminated && !e.is_consolation);

    let join_names = |entries: &[&PlayoffBracketEntry]| {
        entries
            .iter()
            .map(|e| directory.name(&e.team_id))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut sections = vec![
        "=== ROASTING APPROACH (PLAYOFF MODE) ===".to_string(),
        "This is the PLAYOFFS. Every game is win-or-go-home. The stakes are real, the pressure is crushing, and the roasts should match the intensity.".to_string(),
    ];

    if !championship.is_empty() {
        sections.push(format!(
            "\u{1f3c6} CHAMPIONSHIP CONTENDERS ({}): These teams are playing for the title and their legacy. \
             Roast them like legends on trial -- acknowledge they made it this far, then question whether they deserve it. \
             Reference their seed, their bracket path, and why their opponent might end their dream.",
            join_names(&championship)
        ));
    }

    if active {
        sections.push(
            "ACTIVE BRACKET: Still alive but one bad week from elimination. Mock their playoff seed, \
             their matchup, and the pressure of knowing it could all end. \
             Reference their opponent and what a loss would mean."
                .to_string(),
        );
    }

    if consolation {
        sections.push(
            "CONSOLATION BRACKET: Already out of title contention but still playing meaningless games. \
             Mock the futility of consolation playoff wins. They are playing for pride that does not exist."
                .to_string(),
        );
    }

    if !eliminated.is_empty() {
        sections.push(format!(
            "ELIMINATED ({}): Absolute destruction. Their season is OVER. \
             They are watching from the couch while others compete for glory. \
             Reference their seed, how far they fell, and the shame of early elimination.",
            join_names(&eliminated)
        ));
    }

    sections.join("\n\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
