// End-to-end tests: JSON request -> batch prompts -> fake generation ->
// merged roasts.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use skidmark_core::prompt::KEYS_LINE_PREFIX;
use skidmark_core::{BatchCoordinator, RoastRequest, RoastResult, SeasonPhase, TextGenerator};

const PLAYOFF_REQUEST: &str = r#"{
    "teams": [
        {"id": "1", "name": "Eagles", "owner": "Sam", "record": "11-3", "points_for": 1650.4,
         "points_against": 1402.2, "streak": "W4",
         "top_players": [{"name": "Josh Allen", "position": "QB", "points": 380.2}]},
        {"id": "2", "name": "Bears", "owner": "Al", "record": "10-4"},
        {"id": "3", "name": "Lions", "owner": "Kim", "record": "8-6"},
        {"id": "4", "name": "Rams", "owner": "Lee", "record": "7-7"},
        {"id": 5, "name": "Jets", "owner": "Pat", "record": "3-11", "streak": "L6"}
    ],
    "context": {
        "inside_jokes": [{"term": "The Tush", "explanation": "Pat's 2021 draft strategy"}],
        "sacko_punishment": "Karaoke night, song chosen by the league"
    },
    "matchups": [
        {"home_team_id": "1", "away_team_id": "2", "home_score": 131.2, "away_score": 99.8,
         "home_players": [
            {"name": "Josh Allen", "position": "QB", "points": 31.4, "is_starter": true},
            {"name": "Backup Guy", "position": "WR", "points": 0.4, "is_starter": false}
         ],
         "away_players": [
            {"name": "DJ Moore", "position": "WR", "points": 3.2, "is_starter": true},
            {"name": "Swift", "position": "RB", "points": 22.0, "is_starter": true}
         ]}
    ],
    "week_number": 16,
    "season_phase": "playoffs",
    "playoff_bracket": [
        {"team_id": "1", "seed": 1, "current_round": 2, "opponent_team_id": "2", "is_championship": true},
        {"team_id": "2", "seed": 2, "current_round": 2, "opponent_team_id": "1", "is_championship": true},
        {"team_id": "3", "seed": 3, "current_round": 2, "is_consolation": true},
        {"team_id": 5, "seed": 5, "current_round": 1, "is_eliminated": true, "is_consolation": true}
    ]
}"#;

#[derive(Default)]
struct RecordingGenerator {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let keys = prompt
            .lines()
            .find_map(|l| l.strip_prefix(KEYS_LINE_PREFIX))
            .unwrap_or_default();
        let map: RoastResult = keys
            .split(", ")
            .map(|k| k.trim_matches('"').to_string())
            .map(|k| {
                let text = format!("{k} got cooked");
                (k, text)
            })
            .collect();
        Ok(serde_json::to_string(&map)?)
    }
}

#[tokio::test]
async fn playoff_request_end_to_end() {
    let request: RoastRequest = serde_json::from_str(PLAYOFF_REQUEST).unwrap();
    assert_eq!(request.season_phase, SeasonPhase::Playoffs);

    let generator = Arc::new(RecordingGenerator::default());
    let coordinator = BatchCoordinator::new(Arc::clone(&generator), 2);
    let roasts = coordinator.generate_roasts(&request).await.unwrap();

    let keys: Vec<&str> = roasts.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["1", "2", "3", "4", "5"]);
    assert_eq!(roasts["5"], "5 got cooked");

    let mut prompts = generator.prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 3);
    prompts.sort_by_key(|p| p.find("- ID: ").map(|i| p[i..].to_string()));

    for prompt in &prompts {
        // Every batch carries the full shared context.
        assert!(prompt.contains("=== ROASTING APPROACH (PLAYOFF MODE) ==="));
        assert!(prompt.contains("CHAMPIONSHIP CONTENDERS (Eagles, Bears)"));
        assert!(prompt.contains("ELIMINATED (Jets)"));
        assert!(prompt.contains("WEEK 16'S MATCHUPS"));
        assert!(prompt.contains("Eagles (131.2) vs Bears (99.8)"));
        assert!(prompt.contains("Josh Allen (QB): 31.4 pts \u{2b50} TOP SCORER"));
        assert!(prompt.contains("DJ Moore (WR): 3.2 pts \u{1f4a9} BIGGEST BUST"));
        assert!(!prompt.contains("Backup Guy"));
        assert!(prompt.contains("#1 Eagles vs Bears"));
        assert!(prompt.contains("#5 Jets [ELIMINATED]"));
        assert!(prompt.contains("#3 Lions\n"));
        assert!(prompt.contains("- \"The Tush\": Pat's 2021 draft strategy"));
        assert!(prompt.contains("SACKO PUNISHMENT: Karaoke night, song chosen by the league"));
        assert!(!prompt.contains("TOP TIER"));
    }

    let key_lines: Vec<&str> = prompts
        .iter()
        .filter_map(|p| p.lines().find(|l| l.starts_with(KEYS_LINE_PREFIX)))
        .collect();
    assert!(key_lines.contains(&"Keys for this batch: \"1\", \"2\""));
    assert!(key_lines.contains(&"Keys for this batch: \"3\", \"4\""));
    assert!(key_lines.contains(&"Keys for this batch: \"5\""));
}

#[tokio::test]
async fn playoffs_without_bracket_fall_back_to_regular_season() {
    let mut request: RoastRequest = serde_json::from_str(PLAYOFF_REQUEST).unwrap();
    request.playoff_bracket.clear();

    let generator = Arc::new(RecordingGenerator::default());
    let coordinator = BatchCoordinator::new(Arc::clone(&generator), 5);
    coordinator.generate_roasts(&request).await.unwrap();

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0];
    assert!(prompt.contains("=== ROASTING APPROACH ==="));
    assert!(prompt.contains("TOP TIER (ranks 1-3)"));
    assert!(prompt.contains("MIDDLE TIER (ranks 4-4)"));
    assert!(prompt.contains("BOTTOM TIER (ranks 5+)"));
    assert!(prompt.contains("The sacko punishment (Karaoke night, song chosen by the league) is looming"));
    assert!(!prompt.contains("PLAYOFF MODE"));
    assert!(!prompt.contains("PLAYOFF BRACKET"));
    assert!(prompt.contains("WEEK 16'S MATCHUPS"));
}
