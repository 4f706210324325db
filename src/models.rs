use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single match forecast as served by the prediction API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub match_id: String,
    pub home_team_name: String,
    pub away_team_name: String,
    /// Scheduled kickoff
    pub date_time: DateTime<Utc>,
    /// Predicted final score digits
    pub home_prediction: String,
    pub away_prediction: String,
    /// Outcome probabilities (0.0–1.0), expected to sum to roughly 1
    pub prob_home_win: f64,
    pub prob_draw: f64,
    pub prob_away_win: f64,
    /// Expected-goals model output
    pub expected_home_goals: f64,
    pub expected_away_goals: f64,
}

impl Prediction {
    pub fn probability_total(&self) -> f64 {
        self.prob_home_win + self.prob_draw + self.prob_away_win
    }
}

#[cfg(test)]
pub(crate) fn sample_prediction(match_id: &str, date_time: DateTime<Utc>) -> Prediction {
    Prediction {
        match_id: match_id.to_string(),
        home_team_name: "Manchester United".to_string(),
        away_team_name: "Chelsea".to_string(),
        date_time,
        home_prediction: "2".to_string(),
        away_prediction: "1".to_string(),
        prob_home_win: 0.48,
        prob_draw: 0.27,
        prob_away_win: 0.25,
        expected_home_goals: 1.84,
        expected_away_goals: 1.12,
    }
}
