// Roast prompt assembly.
//
// Builds the single text prompt sent to the generation service for one
// batch of teams. The output is a pure function of its inputs: the same
// request always yields byte-identical text.

use serde_json::Number;

use crate::bracket::format_playoff_bracket_section;
use crate::directory::TeamDirectory;
use crate::matchups::format_matchups_section;
use crate::model::{
    LeagueContext, PlayoffBracketEntry, RoastRequest, SeasonPhase, Team, WeeklyMatchup,
};
use crate::narrative::NarrativeMode;

// ---------------------------------------------------------------------------
// Fixed copy
// ---------------------------------------------------------------------------

const PERSONA: &str = "You are Skidmark -- the most vulgar, profane, brutally honest fantasy football roast bot ever created. \
Swearing is your native language: \"fucking,\" \"shit,\" \"ass,\" \"goddamn\" and creative compound insults flow in every roast. \
You call out poor performances with zero sugarcoating. You are roasting FRIENDS -- the goal is laughs so hard they screenshot it \
for the group chat, not cruelty without comedic payoff.";

const BASE_REQUIREMENTS: &str = "\
- Every stat, score, and record you reference MUST be exactly correct from the data provided. Use real numbers to twist the knife.
- Weave inside jokes and personality descriptions naturally into roasts -- these are GOLD. Generic insults are forgettable; personal references hit different. Only include inside jokes if you are confident it will make sense to the recipient and there is inside joke content loaded.
- Write exactly 3-5 punchy sentences per team. No filler, no warm-up intros. Every sentence hits.
- Reference at least one actual statistic per roast.
- Use vivid metaphors, pop culture references, dark humor, and absurd comparisons.";

/// Requirement lines added whenever the request carries matchup data.
pub const MATCHUP_REQUIREMENTS: &str = "\
- Reference specific player performances from this week's matchups. Call out breakout games and busts BY NAME.
- Mention at least one specific player performance per roast -- use their actual point totals.
- Mock teams that lost despite having a high-scoring player on their roster. Mock teams that won despite having a bust starter.";

const CLOSING: &str = "Now channel your inner Skidmark. Be vulgar. Be brutal. Be statistically accurate. Be fucking hilarious. Go.";

/// Prefix of the output-format line listing the expected response keys.
pub const KEYS_LINE_PREFIX: &str = "Keys for this batch: ";

const NONE_PROVIDED: &str = "None provided.";

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Build the prompt for one batch of a request.
///
/// `teams` are the teams to roast in this call; the full request team list
/// is used for tier sizing and for resolving names in matchups and bracket.
pub fn build_batch_prompt(teams: &[Team], request: &RoastRequest) -> String {
    build_roast_prompt(
        teams,
        &request.context,
        request.teams.len(),
        &request.matchups,
        request.week_number.as_deref(),
        request.season_phase,
        &request.playoff_bracket,
        Some(request.teams.as_slice()),
    )
}

/// Build a roast prompt.
///
/// Names in the matchup and bracket sections are resolved against
/// `all_teams` (falling back to `teams` when absent). Only `teams` appear
/// in the league data block and in the expected output keys.
#[allow(clippy::too_many_arguments)]
pub fn build_roast_prompt(
    teams: &[Team],
    context: &LeagueContext,
    total_teams: usize,
    matchups: &[WeeklyMatchup],
    week_number: Option<&str>,
    season_phase: SeasonPhase,
    playoff_bracket: &[PlayoffBracketEntry],
    all_teams: Option<&[Team]>,
) -> String {
    let resolve_teams = match all_teams {
        Some(all) if !all.is_empty() => all,
        _ => teams,
    };
    let directory = TeamDirectory::new(resolve_teams);
    let mode = NarrativeMode::select(season_phase, playoff_bracket, total_teams);

    let mut prompt = String::with_capacity(4096);

    prompt.push_str(PERSONA);
    prompt.push_str("\n\n");
    prompt.push_str(mode.approach(context, &directory).trim_end());
    prompt.push_str("\n\n");

    let matchups_section = format_matchups_section(matchups, &directory, week_number);
    push_section(&mut prompt, &matchups_section);
    if let Some(bracket) = mode.bracket() {
        push_section(&mut prompt, &format_playoff_bracket_section(bracket, &directory));
    }

    // Requirements
    prompt.push_str("=== REQUIREMENTS ===\n\n");
    prompt.push_str(BASE_REQUIREMENTS);
    prompt.push('\n');
    if !matchups.is_empty() {
        prompt.push_str(MATCHUP_REQUIREMENTS);
        prompt.push('\n');
    }
    if let Some(extra) = mode.extra_requirements() {
        prompt.push_str(extra);
        prompt.push('\n');
    }
    prompt.push('\n');

    // League data
    prompt.push_str("=== LEAGUE DATA ===\n\n");
    prompt.push_str("TEAMS (ranked by standing):\n");
    prompt.push_str(&format_teams(teams));
    prompt.push_str("\n\n");
    prompt.push_str("INSIDE JOKES:\n");
    prompt.push_str(&format_inside_jokes(context));
    prompt.push_str("\n\n");
    prompt.push_str("OWNER PERSONALITIES:\n");
    prompt.push_str(&format_personalities(context));
    prompt.push_str("\n\n");
    prompt.push_str(&format!("SACKO PUNISHMENT: {}\n", context.sacko_text()));
    prompt.push_str(&format!("LEAGUE CULTURE: {}\n\n", context.culture_text()));

    // Output format
    prompt.push_str("=== OUTPUT FORMAT ===\n\n");
    prompt.push_str(
        "Return ONLY valid JSON (no markdown, no code fences). Each key is the team ID string, \
         each value is the roast text (3-5 sentences).\n",
    );
    prompt.push_str(KEYS_LINE_PREFIX);
    prompt.push_str(&format_key_list(teams));
    prompt.push_str("\n\n");
    prompt.push_str("Example: {\"1\": \"roast text here\", \"2\": \"roast text here\"}\n\n");
    prompt.push_str(CLOSING);

    prompt
}

fn push_section(prompt: &mut String, section: &str) {
    if section.is_empty() {
        return;
    }
    prompt.push_str(section.trim_end());
    prompt.push_str("\n\n");
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Format the team data block, one three-line entry per team.
pub fn format_teams(teams: &[Team]) -> String {
    teams
        .iter()
        .map(format_team)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_team(team: &Team) -> String {
    let players = team
        .top_players
        .iter()
        .map(|p| format!("{} ({}, {} pts)", p.name, p.position, p.points))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "- ID: {} | \"{}\" owned by {}\n  Record: {} | PF: {} | PA: {} | Streak: {}\n  Top players: {}",
        team.id,
        team.name,
        team.owner,
        team.record,
        or_unknown(team.points_for.as_ref()),
        or_unknown(team.points_against.as_ref()),
        team.streak.as_deref().unwrap_or("?"),
        if players.is_empty() { "none listed" } else { players.as_str() },
    )
}

fn or_unknown(value: Option<&Number>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

fn format_inside_jokes(context: &LeagueContext) -> String {
    if context.inside_jokes.is_empty() {
        return NONE_PROVIDED.to_string();
    }
    context
        .inside_jokes
        .iter()
        .map(|j| format!("- \"{}\": {}", j.term, j.explanation))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_personalities(context: &LeagueContext) -> String {
    if context.personalities.is_empty() {
        return NONE_PROVIDED.to_string();
    }
    context
        .personalities
        .iter()
        .map(|p| format!("- {}: {}", p.player_name, p.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `"1", "2", "3"` for the batch's own team ids.
pub fn format_key_list(teams: &[Team]) -> String {
    teams
        .iter()
        .map(|t| format!("\"{}\"", t.id))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
