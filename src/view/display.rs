//! Display values derived from a `Prediction` for its card.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Prediction;

/// Most likely result of a match according to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
}

/// Pick the outcome with the highest probability.
///
/// Ties go to the first branch checked: home, then away, then draw. So a
/// 0.4 / 0.2 / 0.4 home/draw/away split reads as a home win, never a draw.
pub fn determine_outcome(prob_home_win: f64, prob_draw: f64, prob_away_win: f64) -> Outcome {
    if prob_home_win >= prob_away_win && prob_home_win >= prob_draw {
        Outcome::HomeWin
    } else if prob_away_win >= prob_draw {
        Outcome::AwayWin
    } else {
        Outcome::Draw
    }
}

/// The winning team's name, or "Draw".
pub fn outcome_text(prediction: &Prediction) -> String {
    match determine_outcome(
        prediction.prob_home_win,
        prediction.prob_draw,
        prediction.prob_away_win,
    ) {
        Outcome::HomeWin => prediction.home_team_name.clone(),
        Outcome::AwayWin => prediction.away_team_name.clone(),
        Outcome::Draw => "Draw".to_string(),
    }
}

/// Countdown until kickoff: "1h 30m", "45m", or "Match ended" once kickoff
/// has passed. Partial minutes are truncated.
pub fn time_remaining(kickoff: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = kickoff.signed_duration_since(now);
    if diff < chrono::Duration::zero() {
        return "Match ended".to_string();
    }
    let hours = diff.num_hours();
    let minutes = diff.num_minutes() % 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Render a unit fraction as a whole percentage: 0.42 → "42%".
pub fn format_percentage(value: f64) -> String {
    format!("{}%", percent(value))
}

fn percent(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// Lowercase the team name and collapse each whitespace run into a hyphen.
pub fn team_slug(team_name: &str) -> String {
    let mut slug = String::with_capacity(team_name.len());
    let mut in_space = false;
    for c in team_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(c.to_lowercase());
            in_space = false;
        }
    }
    slug
}

/// Interpolate the team slug into the icon-service template. The result is
/// not checked; the page swaps in a placeholder if the image fails to load.
pub fn team_logo_url(template: &str, team_name: &str) -> String {
    template.replace("{slug}", &team_slug(team_name))
}

/// Every derived value a prediction card shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionCard {
    pub match_id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_logo_url: String,
    pub away_logo_url: String,
    pub kickoff: DateTime<Utc>,
    pub time_remaining: String,
    pub predicted_score: String,
    pub home_win: String,
    pub draw: String,
    pub away_win: String,
    /// Bar widths in whole percent, clamped to 0–100
    pub home_bar: u8,
    pub draw_bar: u8,
    pub away_bar: u8,
    pub outcome: Outcome,
    pub outcome_text: String,
    pub expected_goals: String,
}

impl PredictionCard {
    pub fn build(prediction: &Prediction, now: DateTime<Utc>, logo_template: &str) -> Self {
        PredictionCard {
            match_id: prediction.match_id.clone(),
            home_team: prediction.home_team_name.clone(),
            away_team: prediction.away_team_name.clone(),
            home_logo_url: team_logo_url(logo_template, &prediction.home_team_name),
            away_logo_url: team_logo_url(logo_template, &prediction.away_team_name),
            kickoff: prediction.date_time,
            time_remaining: time_remaining(prediction.date_time, now),
            predicted_score: format!(
                "{} - {}",
                prediction.home_prediction, prediction.away_prediction
            ),
            home_win: format_percentage(prediction.prob_home_win),
            draw: format_percentage(prediction.prob_draw),
            away_win: format_percentage(prediction.prob_away_win),
            home_bar: bar_width(prediction.prob_home_win),
            draw_bar: bar_width(prediction.prob_draw),
            away_bar: bar_width(prediction.prob_away_win),
            outcome: determine_outcome(
                prediction.prob_home_win,
                prediction.prob_draw,
                prediction.prob_away_win,
            ),
            outcome_text: outcome_text(prediction),
            expected_goals: format!(
                "{:.1} - {:.1}",
                prediction.expected_home_goals, prediction.expected_away_goals
            ),
        }
    }
}

fn bar_width(value: f64) -> u8 {
    percent(value).clamp(0, 100) as u8
}
