//! Pure stat transforms shared by every view.
//!
//! All ratios follow the same division-by-zero policy: a zero denominator
//! falls back to the raw numerator instead of dividing. Nothing in this
//! module ever returns NaN or infinity.

use crate::val_match::{Match, MatchResult};

/// Kills per death. A deathless match reports the raw kill count.
pub fn kd_ratio(kills: u32, deaths: u32) -> f64 {
    if deaths == 0 {
        kills as f64
    } else {
        kills as f64 / deaths as f64
    }
}

/// Share of shots that were headshots, in percent. No shots means 0.
pub fn headshot_percent(headshots: u32, othershots: u32) -> f64 {
    let total = headshots + othershots;
    if total == 0 {
        0.0
    } else {
        headshots as f64 / total as f64 * 100.0
    }
}

/// Per-round average used for ADR and ACS. Zero rounds reports the raw value.
pub fn per_round(value: u32, rounds_played: u32) -> f64 {
    if rounds_played == 0 {
        value as f64
    } else {
        value as f64 / rounds_played as f64
    }
}

/// Scoreboard position to display label. The top slot is the match MVP.
pub fn position_label(position: u32) -> String {
    match position {
        1 => "MVP".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n => format!("{n}th"),
    }
}

pub fn format_ratio(value: f64) -> String {
    format!("{value:.2}")
}

/// Aggregates computed over the currently displayed match list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileStats {
    pub total_matches: usize,
    pub wins: usize,
    pub losses: usize,
    /// Rounded percentage, 0 for an empty list.
    pub win_rate: u32,
    pub avg_kd: f64,
    pub avg_hs: u32,
    pub avg_adr: u32,
    pub avg_acs: u32,
    pub total_kills: u32,
    pub total_deaths: u32,
    pub total_assists: u32,
    pub mvp_count: usize,
}

impl ProfileStats {
    pub fn from_matches(matches: &[Match]) -> Self {
        if matches.is_empty() {
            return Self::default();
        }

        let total = matches.len();
        let wins = matches
            .iter()
            .filter(|m| m.result == MatchResult::Win)
            .count();
        let losses = matches
            .iter()
            .filter(|m| m.result == MatchResult::Loss)
            .count();
        let mvp_count = matches.iter().filter(|m| m.position_label == "MVP").count();

        let kd_sum: f64 = matches.iter().map(|m| m.kd_ratio).sum();
        let hs_sum: f64 = matches.iter().map(|m| m.hs_percent).sum();
        let adr_sum: f64 = matches.iter().map(|m| m.adr).sum();
        let acs_sum: f64 = matches.iter().map(|m| m.acs).sum();

        let mut total_kills = 0;
        let mut total_deaths = 0;
        let mut total_assists = 0;
        for m in matches {
            let (k, d, a) = m.kda_parts();
            total_kills += k;
            total_deaths += d;
            total_assists += a;
        }

        Self {
            total_matches: total,
            wins,
            losses,
            win_rate: (wins as f64 / total as f64 * 100.0).round() as u32,
            avg_kd: kd_sum / total as f64,
            avg_hs: (hs_sum / total as f64).round() as u32,
            avg_adr: (adr_sum / total as f64).round() as u32,
            avg_acs: (acs_sum / total as f64).round() as u32,
            total_kills,
            total_deaths,
            total_assists,
            mvp_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::val_match::Match;

    fn sample_match(result: MatchResult, kd: f64, position_label: &str) -> Match {
        Match {
            id: 1,
            match_id: "m-1".to_string(),
            agent_name: "Jett".to_string(),
            agent_image: String::new(),
            map: "Ascent".to_string(),
            result,
            rounds_won: 13,
            rounds_lost: 7,
            kda: "20/10/5".to_string(),
            kd_ratio: kd,
            position_label: position_label.to_string(),
            hs_percent: 30.0,
            adr: 150.0,
            acs: 240.0,
            start_time: None,
        }
    }

    #[test]
    fn kd_ratio_falls_back_to_kills_on_zero_deaths() {
        assert_eq!(kd_ratio(17, 0), 17.0);
        assert_eq!(kd_ratio(0, 0), 0.0);
        assert_eq!(kd_ratio(10, 4), 2.5);
    }

    #[test]
    fn headshot_percent_handles_no_shots() {
        assert_eq!(headshot_percent(0, 0), 0.0);
        assert_eq!(headshot_percent(25, 75), 25.0);
    }

    #[test]
    fn per_round_handles_zero_rounds() {
        assert_eq!(per_round(3120, 0), 3120.0);
        assert_eq!(per_round(3120, 20), 156.0);
    }

    #[test]
    fn position_labels() {
        assert_eq!(position_label(1), "MVP");
        assert_eq!(position_label(2), "2nd");
        assert_eq!(position_label(3), "3rd");
        assert_eq!(position_label(7), "7th");
    }

    #[test]
    fn empty_list_yields_zero_win_rate() {
        let stats = ProfileStats::from_matches(&[]);
        assert_eq!(stats.win_rate, 0);
        assert_eq!(stats.total_matches, 0);
    }

    #[test]
    fn aggregates_over_match_list() {
        let matches = vec![
            sample_match(MatchResult::Win, 2.0, "MVP"),
            sample_match(MatchResult::Win, 1.0, "4th"),
            sample_match(MatchResult::Loss, 0.5, "9th"),
        ];
        let stats = ProfileStats::from_matches(&matches);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 1);
        // 2/3 rounded to the nearest integer percent
        assert_eq!(stats.win_rate, 67);
        assert_eq!(stats.mvp_count, 1);
        assert!((stats.avg_kd - 3.5 / 3.0).abs() < f64::EPSILON);
        assert_eq!(stats.total_kills, 60);
        assert_eq!(stats.total_deaths, 30);
        assert_eq!(stats.total_assists, 15);
    }

    #[test]
    fn draws_count_in_neither_column() {
        let matches = vec![
            sample_match(MatchResult::Win, 1.0, "4th"),
            sample_match(MatchResult::Draw, 1.0, "4th"),
        ];
        let stats = ProfileStats::from_matches(&matches);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 0);
        assert_eq!(stats.win_rate, 50);
    }
}
