//! Server-side rendering of the prediction page.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::view::{PredictionCard, ViewSnapshot, ViewState};

/// Shown when a successful fetch returns no matches
pub const EMPTY_MESSAGE: &str = "No predictions available for today.";

pub const PLACEHOLDER_LOGO_PATH: &str = "/placeholder.svg";

/// Render the whole page for the current view state.
pub fn render_page(snapshot: &ViewSnapshot, now: DateTime<Utc>, logo_template: &str) -> String {
    let last_updated = match snapshot.last_updated {
        Some(ts) => format!("Last updated {}", ts.format("%H:%M:%S UTC")),
        None => String::new(),
    };

    let body = match &snapshot.state {
        ViewState::Loading => {
            r#"<div class="status"><span class="spinner"></span><p>Loading predictions…</p></div>"#
                .to_string()
        }
        ViewState::Error { message } => format!(
            r#"<div class="status error"><p>{}</p><form method="post" action="/retry"><button type="submit" class="retry-btn">↻ Retry</button></form></div>"#,
            escape_html(message)
        ),
        ViewState::Loaded { predictions } if predictions.is_empty() => {
            format!(r#"<div class="status empty"><p>{}</p></div>"#, EMPTY_MESSAGE)
        }
        ViewState::Loaded { predictions } => {
            let mut cards = String::from(r#"<div class="cards">"#);
            for (i, p) in predictions.iter().enumerate() {
                let card = PredictionCard::build(p, now, logo_template);
                render_card(&mut cards, &card, i);
            }
            cards.push_str("</div>");
            cards
        }
    };

    PAGE_HTML
        .replace("{{last_updated}}", &escape_html(&last_updated))
        .replace("{{body}}", &body)
}

fn render_card(out: &mut String, card: &PredictionCard, index: usize) {
    // Writing to a String cannot fail.
    let _ = write!(
        out,
        r#"<article class="card" style="animation-delay:{delay}ms" data-match-id="{id}">
  <div class="teams">
    <div class="team"><img src="{home_logo}" alt="" onerror="this.onerror=null;this.src='{placeholder}'"><span>{home}</span></div>
    <div class="score">{score}</div>
    <div class="team"><img src="{away_logo}" alt="" onerror="this.onerror=null;this.src='{placeholder}'"><span>{away}</span></div>
  </div>
  <div class="meta"><span class="countdown">{remaining}</span><span>xG {xg}</span></div>
  <div class="bars">
    <div class="bar-row"><span class="bar-label">Home</span><div class="bar"><div class="fill home" style="width:{home_bar}%"></div></div><span class="pct">{home_pct}</span></div>
    <div class="bar-row"><span class="bar-label">Draw</span><div class="bar"><div class="fill draw" style="width:{draw_bar}%"></div></div><span class="pct">{draw_pct}</span></div>
    <div class="bar-row"><span class="bar-label">Away</span><div class="bar"><div class="fill away" style="width:{away_bar}%"></div></div><span class="pct">{away_pct}</span></div>
  </div>
  <div class="outcome">Likely outcome: <strong>{outcome}</strong></div>
</article>"#,
        delay = index * 80,
        id = escape_html(&card.match_id),
        home_logo = escape_html(&card.home_logo_url),
        away_logo = escape_html(&card.away_logo_url),
        placeholder = PLACEHOLDER_LOGO_PATH,
        home = escape_html(&card.home_team),
        away = escape_html(&card.away_team),
        score = escape_html(&card.predicted_score),
        remaining = escape_html(&card.time_remaining),
        xg = escape_html(&card.expected_goals),
        home_bar = card.home_bar,
        draw_bar = card.draw_bar,
        away_bar = card.away_bar,
        home_pct = card.home_win,
        draw_pct = card.draw,
        away_pct = card.away_win,
        outcome = escape_html(&card.outcome_text),
    );
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Local fallback for team logos that fail to load
pub const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="48" viewBox="0 0 48 48"><circle cx="24" cy="24" r="22" fill="#2a2d3a" stroke="#8888aa" stroke-width="2"/><path d="M24 10l6 4v8l-6 4-6-4v-8z" fill="#8888aa"/></svg>"##;

/// Page shell; `{{last_updated}}` and `{{body}}` are filled in per request.
/// The page reloads every minute so countdowns stay current.
const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<meta http-equiv="refresh" content="60">
<title>Matchday Predictions</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #6c63ff;
    --green: #00c896;
    --red: #ff4f6a;
    --amber: #ff9800;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  #last-updated { margin-left: auto; color: var(--muted); font-size: .8rem; }
  main { padding: 1.5rem 2rem; }
  .cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 1.2rem; }
  .card { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1.2rem; opacity: 0; animation: rise .45s ease-out forwards; }
  @keyframes rise { from { opacity: 0; transform: translateY(12px); } to { opacity: 1; transform: none; } }
  .teams { display: flex; align-items: center; justify-content: space-between; gap: .8rem; }
  .team { display: flex; flex-direction: column; align-items: center; gap: .4rem; flex: 1; text-align: center; font-weight: 600; }
  .team img { width: 48px; height: 48px; object-fit: contain; }
  .score { font-size: 1.8rem; font-weight: 700; color: var(--accent); }
  .meta { display: flex; justify-content: space-between; color: var(--muted); font-size: .8rem; margin: .9rem 0 .6rem; }
  .countdown { color: var(--amber); font-weight: 600; }
  .bar-row { display: grid; grid-template-columns: 3rem 1fr 3rem; align-items: center; gap: .5rem; margin: .3rem 0; font-size: .8rem; }
  .bar { height: 8px; background: var(--border); border-radius: 4px; overflow: hidden; }
  .fill { height: 100%; border-radius: 4px; animation: grow .8s ease-out; }
  @keyframes grow { from { width: 0; } }
  .fill.home { background: var(--green); }
  .fill.draw { background: var(--muted); }
  .fill.away { background: var(--red); }
  .pct { text-align: right; }
  .outcome { margin-top: .8rem; font-size: .9rem; color: var(--muted); }
  .outcome strong { color: var(--text); }
  .status { text-align: center; padding: 3rem 1rem; color: var(--muted); }
  .status.error p { color: var(--red); margin-bottom: 1rem; }
  .spinner { display: inline-block; width: 28px; height: 28px; border: 3px solid var(--border); border-top-color: var(--accent); border-radius: 50%; animation: spin 1s linear infinite; margin-bottom: .8rem; }
  @keyframes spin { to { transform: rotate(360deg); } }
  .retry-btn { background: none; border: 1px solid var(--border); color: var(--muted); padding: .4rem 1rem; border-radius: 6px; cursor: pointer; font-size: .85rem; }
  .retry-btn:hover { border-color: var(--accent); color: var(--accent); }
</style>
</head>
<body>
<header>
  <h1>⚽ Matchday Predictions</h1>
  <span id="last-updated">{{last_updated}}</span>
</header>
<main>
{{body}}
</main>
</body>
</html>"#;
