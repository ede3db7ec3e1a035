use crate::stats;

/// One row of the profile match history, as aggregated by the backend.
///
/// Fetched as a list per profile view, immutable once fetched and replaced
/// wholesale on refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: u64,
    pub match_id: String,
    pub agent_name: String,
    pub agent_image: String,
    pub map: String,
    pub result: MatchResult,
    pub rounds_won: u32,
    pub rounds_lost: u32,
    /// Preformatted `kills/deaths/assists` string.
    pub kda: String,
    pub kd_ratio: f64,
    /// Display label for the scoreboard slot, e.g. "MVP".
    pub position_label: String,
    pub hs_percent: f64,
    pub adr: f64,
    pub acs: f64,
    pub start_time: Option<i64>,
}

impl Match {
    /// Split the preformatted `k/d/a` string back into its counts.
    /// Malformed components count as zero.
    pub fn kda_parts(&self) -> (u32, u32, u32) {
        let mut parts = self
            .kda
            .split('/')
            .map(|p| p.trim().parse::<u32>().unwrap_or(0));
        (
            parts.next().unwrap_or(0),
            parts.next().unwrap_or(0),
            parts.next().unwrap_or(0),
        )
    }

    pub fn to_formatted_score(&self) -> String {
        format!("{}:{}", self.rounds_won, self.rounds_lost)
    }
}

/// Outcome of a match from the tracked player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

impl From<&str> for MatchResult {
    fn from(value: &str) -> Self {
        match value {
            "win" => Self::Win,
            "draw" => Self::Draw,
            _ => Self::Loss,
        }
    }
}

impl MatchResult {
    pub fn to_title_string(&self) -> String {
        match self {
            MatchResult::Win => "Victory".to_string(),
            MatchResult::Loss => "Defeat".to_string(),
            MatchResult::Draw => "Draw".to_string(),
        }
    }
}

/// Full scoreboard for a single match, fetched lazily when a history row is
/// opened and discarded when the detail view closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchDetail {
    pub id: String,
    pub map_name: String,
    pub start_time: i64,
    pub duration_ms: u64,
    pub winning_team: String,
    pub rounds_played: u32,
    pub participations: Vec<Participation>,
}

impl MatchDetail {
    pub fn participation_of(&self, puuid: &str) -> Option<&Participation> {
        self.participations.iter().find(|p| p.puuid == puuid)
    }

    /// Members of one team ordered by scoreboard position.
    pub fn team(&self, team_id: &str) -> Vec<&Participation> {
        let mut members: Vec<&Participation> = self
            .participations
            .iter()
            .filter(|p| p.team_id == team_id)
            .collect();
        members.sort_by_key(|p| p.position);
        members
    }

    pub fn to_formatted_duration(&self) -> String {
        let minutes = self.duration_ms / 60_000;
        let seconds = (self.duration_ms % 60_000) / 1000;
        format!("{}:{:02}", minutes, seconds)
    }
}

/// One player's raw line on a match scoreboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Participation {
    pub puuid: String,
    pub user_id: String,
    pub user_tag: String,
    pub agent_name: String,
    pub team_id: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub combat_score: u32,
    pub damage_dealt: u32,
    pub headshots: u32,
    pub othershots: u32,
    pub rounds_played: u32,
    pub result: MatchResult,
    pub position: u32,
}

impl Participation {
    pub fn kd_ratio(&self) -> f64 {
        stats::kd_ratio(self.kills, self.deaths)
    }

    pub fn adr(&self) -> f64 {
        stats::per_round(self.damage_dealt, self.rounds_played)
    }

    pub fn acs(&self) -> f64 {
        stats::per_round(self.combat_score, self.rounds_played)
    }

    pub fn hs_percent(&self) -> f64 {
        stats::headshot_percent(self.headshots, self.othershots)
    }

    pub fn position_label(&self) -> String {
        stats::position_label(self.position)
    }

    pub fn to_formatted_kda(&self) -> String {
        format!("{}/{}/{}", self.kills, self.deaths, self.assists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participation(puuid: &str, team: &str, position: u32) -> Participation {
        Participation {
            puuid: puuid.to_string(),
            user_id: "Tester".to_string(),
            user_tag: "NA1".to_string(),
            agent_name: "Sova".to_string(),
            team_id: team.to_string(),
            kills: 18,
            deaths: 0,
            assists: 4,
            combat_score: 4400,
            damage_dealt: 2800,
            headshots: 9,
            othershots: 27,
            rounds_played: 20,
            result: MatchResult::Win,
            position,
        }
    }

    #[test]
    fn kda_parts_parses_and_defaults() {
        let mut m = Match {
            id: 1,
            match_id: "m-1".to_string(),
            agent_name: "Jett".to_string(),
            agent_image: String::new(),
            map: "Bind".to_string(),
            result: MatchResult::Win,
            rounds_won: 13,
            rounds_lost: 11,
            kda: "12/7/3".to_string(),
            kd_ratio: 1.71,
            position_label: "2nd".to_string(),
            hs_percent: 22.0,
            adr: 140.0,
            acs: 210.0,
            start_time: None,
        };
        assert_eq!(m.kda_parts(), (12, 7, 3));
        assert_eq!(m.to_formatted_score(), "13:11");

        m.kda = "12/x".to_string();
        assert_eq!(m.kda_parts(), (12, 0, 0));
    }

    #[test]
    fn match_result_from_wire_string() {
        assert_eq!(MatchResult::from("win"), MatchResult::Win);
        assert_eq!(MatchResult::from("loss"), MatchResult::Loss);
        assert_eq!(MatchResult::from("draw"), MatchResult::Draw);
        assert_eq!(MatchResult::from("surrender"), MatchResult::Loss);
    }

    #[test]
    fn detail_duration_formats_mm_ss() {
        let detail = MatchDetail {
            id: "m-1".to_string(),
            map_name: "Haven".to_string(),
            start_time: 0,
            duration_ms: 2_215_000,
            winning_team: "Blue".to_string(),
            rounds_played: 21,
            participations: vec![],
        };
        assert_eq!(detail.to_formatted_duration(), "36:55");
    }

    #[test]
    fn team_filters_and_sorts_by_position() {
        let detail = MatchDetail {
            id: "m-1".to_string(),
            map_name: "Haven".to_string(),
            start_time: 0,
            duration_ms: 0,
            winning_team: "Red".to_string(),
            rounds_played: 20,
            participations: vec![
                participation("c", "Blue", 5),
                participation("a", "Blue", 1),
                participation("r", "Red", 2),
            ],
        };
        let blue = detail.team("Blue");
        assert_eq!(
            blue.iter().map(|p| p.puuid.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
        assert!(detail.participation_of("r").is_some());
        assert!(detail.participation_of("zz").is_none());
    }

    #[test]
    fn participation_ratios_never_divide_by_zero() {
        let p = participation("a", "Blue", 1);
        // deathless player keeps the raw kill count as the ratio
        assert_eq!(p.kd_ratio(), 18.0);
        assert_eq!(p.adr(), 140.0);
        assert_eq!(p.acs(), 220.0);
        assert_eq!(p.hs_percent(), 25.0);
        assert_eq!(p.position_label(), "MVP");
        assert_eq!(p.to_formatted_kda(), "18/0/4");
    }
}
