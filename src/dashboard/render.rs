//! Server-side HTML for the two dashboard tabs and the match detail page.

use crate::api::Match;
use crate::view::derived::{score_line, CorrelationCard, DashboardView, HistoryRow, OddPoint};
use crate::view::{Tab, ViewModel};

const CHART_WIDTH: f64 = 560.0;
const CHART_HEIGHT: f64 = 220.0;

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full page for the active tab.
pub fn page(vm: &ViewModel) -> String {
    let title = match vm.active_tab {
        Tab::Dashboard => "Insight Dashboard",
        Tab::History => "Historical Analysis",
    };

    let body = if vm.loading {
        r#"<div class="loading"><div class="spinner"></div></div>"#.to_string()
    } else {
        match vm.active_tab {
            Tab::Dashboard => vm.dashboard.as_ref().map(dashboard).unwrap_or_default(),
            Tab::History => history(&vm.history),
        }
    };

    // Keep polling while a load is in flight so the page picks up the result.
    let auto_refresh = if vm.loading {
        r#"<meta http-equiv="refresh" content="1">"#
    } else {
        ""
    };

    let nav_class = |tab: Tab| if vm.active_tab == tab { "nav active" } else { "nav" };

    layout(
        auto_refresh,
        &format!(
            r#"<nav class="sidebar">
  <div class="brand">⚡ Birbucuk</div>
  <a class="{dash_class}" href="/tab/dashboard">Dashboard</a>
  <a class="{hist_class}" href="/tab/history">Match History</a>
</nav>
<main>
  <header>
    <div>
      <h1>{title}</h1>
      <p class="muted">Real-time betting correlations and historical data archive.</p>
    </div>
    <form method="post" action="/refresh"><button class="refresh-btn" type="submit">↻ Refresh Data</button></form>
  </header>
  {body}
</main>"#,
            dash_class = nav_class(Tab::Dashboard),
            hist_class = nav_class(Tab::History),
        ),
    )
}

fn dashboard(view: &DashboardView) -> String {
    let cards: String = view.cards.iter().map(card).collect();
    format!(
        r#"<div class="cards">{cards}</div>
<div class="two-col">
  <div class="panel"><div class="panel-header">Winning Counts by Type</div>{bars}</div>
  <div class="panel"><div class="panel-header">Average Winning Odds</div>{line}</div>
</div>"#,
        bars = count_chart(view),
        line = odd_chart(&view.odd_series),
    )
}

fn card(c: &CorrelationCard) -> String {
    let range = match (c.min_odd, c.max_odd) {
        (Some(min), Some(max)) => format!(r#"<div class="muted small">Range {:.2} – {:.2}</div>"#, min, max),
        _ => String::new(),
    };
    let missing = if c.missing {
        r#"<div class="muted small">No data</div>"#
    } else {
        ""
    };
    format!(
        r#"<div class="card" data-key="{key}">
  <h3>{title}</h3>
  <div class="card-grid">
    <div><div class="label">Win Count</div><div class="value">{count}</div></div>
    <div><div class="label">Avg Odd</div><div class="value accent">{avg}</div></div>
  </div>
  {range}{missing}
  <div class="progress"><div class="progress-fill" style="width: {pct}%"></div></div>
</div>"#,
        key = escape(&c.key),
        title = escape(&c.title),
        count = c.count,
        avg = c.avg_odd_display,
        pct = c.progress_pct,
    )
}

fn count_chart(view: &DashboardView) -> String {
    if view.count_series.is_empty() {
        return r#"<div class="empty">No data</div>"#.to_string();
    }
    let max = view.count_series.iter().map(|p| p.count).max().unwrap_or(0).max(1) as f64;
    let mut out = String::from(r#"<div class="bars">"#);
    for p in &view.count_series {
        out.push_str(&format!(
            r#"<div class="bar-col" title="{name}: {count}"><div class="bar" style="height: {h:.1}%"></div><span class="bar-label">{name}</span></div>"#,
            name = escape(&p.name),
            count = p.count,
            h = p.count as f64 / max * 100.0,
        ));
    }
    out.push_str("</div>");
    out
}

fn odd_chart(series: &[OddPoint]) -> String {
    if series.is_empty() {
        return r#"<div class="empty">No data</div>"#.to_string();
    }
    let max = series.iter().map(|p| p.odd).fold(0.0_f64, f64::max).max(1.0);
    let step = if series.len() > 1 {
        CHART_WIDTH / (series.len() - 1) as f64
    } else {
        0.0
    };
    let points: Vec<(f64, f64, &OddPoint)> = series
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64 * step, CHART_HEIGHT - p.odd / max * CHART_HEIGHT, p))
        .collect();

    let polyline: Vec<String> = points.iter().map(|(x, y, _)| format!("{:.1},{:.1}", x, y)).collect();
    let mut out = format!(
        r##"<svg class="line-chart" viewBox="-10 -10 {w} {h}" preserveAspectRatio="none"><polyline fill="none" stroke="#818cf8" stroke-width="3" points="{pts}"/>"##,
        w = CHART_WIDTH + 20.0,
        h = CHART_HEIGHT + 20.0,
        pts = polyline.join(" "),
    );
    for (x, y, p) in &points {
        out.push_str(&format!(
            r##"<circle cx="{x:.1}" cy="{y:.1}" r="4" fill="#818cf8"><title>{name}: {odd:.2}</title></circle>"##,
            name = escape(&p.name),
            odd = p.odd,
        ));
    }
    out.push_str("</svg>");
    out
}

fn history(rows: &[HistoryRow]) -> String {
    let body: String = rows
        .iter()
        .map(|r| {
            format!(
                r#"<tr data-id="{id}"><td>{date}</td><td><a href="/matches/{id}"><strong>{home}</strong> <span class="muted">vs</span> <strong>{away}</strong></a></td><td class="muted">{league}</td><td class="accent">{ht}</td><td class="pos">{ft}</td></tr>"#,
                id = r.id,
                date = escape(&r.date),
                home = escape(&r.home_team),
                away = escape(&r.away_team),
                league = escape(&r.league),
                ht = r.half_time,
                ft = r.full_time,
            )
        })
        .collect();
    format!(
        r#"<div class="panel"><table>
<thead><tr><th>Date</th><th>Match</th><th>League</th><th>HT Score</th><th>FT Score</th></tr></thead>
<tbody>{body}</tbody>
</table></div>"#
    )
}

/// Single match with its odds; winning odds are highlighted.
pub fn match_detail(m: &Match, date: &str) -> String {
    let odds: String = m
        .odds
        .iter()
        .map(|o| {
            format!(
                r#"<tr class="{class}"><td>{market}</td><td>{value:.2}</td><td>{won}</td></tr>"#,
                class = if o.is_winning { "winning" } else { "" },
                market = escape(&o.market_label()),
                value = o.odd_value,
                won = if o.is_winning { "✓" } else { "" },
            )
        })
        .collect();
    let odds = if odds.is_empty() {
        r#"<tr><td colspan="3" class="empty">No odds recorded</td></tr>"#.to_string()
    } else {
        odds
    };

    layout(
        "",
        &format!(
            r#"<main>
  <header>
    <div>
      <h1>{home} vs {away}</h1>
      <p class="muted">{league} · {date}</p>
    </div>
    <a class="refresh-btn" href="/">← Back</a>
  </header>
  <div class="cards">
    <div class="card"><div class="label">HT Score</div><div class="value accent">{ht}</div></div>
    <div class="card"><div class="label">FT Score</div><div class="value pos">{ft}</div></div>
  </div>
  <div class="panel"><table>
    <thead><tr><th>Market</th><th>Odd</th><th>Won</th></tr></thead>
    <tbody>{odds}</tbody>
  </table></div>
</main>"#,
            home = escape(&m.home_team),
            away = escape(&m.away_team),
            league = escape(m.league.as_deref().unwrap_or("")),
            date = escape(date),
            ht = score_line(m.score_home_iy, m.score_away_iy),
            ft = score_line(m.score_home, m.score_away),
        ),
    )
}

fn layout(head_extra: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
{head_extra}
<title>Birbucuk</title>
<style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>"#
    )
}

const STYLE: &str = r#"
  :root {
    --bg: #020617;
    --card: #0f172a;
    --border: #1e293b;
    --accent: #38bdf8;
    --green: #4ade80;
    --text: #f8fafc;
    --muted: #94a3b8;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; display: flex; min-height: 100vh; }
  a { color: inherit; text-decoration: none; }
  .sidebar { width: 16rem; border-right: 1px solid var(--border); padding: 1.5rem; display: flex; flex-direction: column; gap: .5rem; }
  .brand { font-size: 1.25rem; font-weight: 700; margin-bottom: 1.5rem; }
  .nav { padding: .75rem 1rem; border-radius: .75rem; color: var(--muted); }
  .nav.active { background: rgba(56,189,248,.1); color: var(--accent); border: 1px solid rgba(56,189,248,.2); }
  main { flex: 1; padding: 2rem; display: grid; gap: 1.5rem; align-content: start; }
  header { display: flex; justify-content: space-between; align-items: center; }
  header h1 { font-size: 1.8rem; margin-bottom: .4rem; }
  .muted { color: var(--muted); }
  .small { font-size: .75rem; }
  .accent { color: var(--accent); }
  .pos { color: var(--green); }
  .cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 1.5rem; }
  .card { background: var(--card); border: 1px solid var(--border); border-radius: 1rem; padding: 1.5rem; display: grid; gap: 1rem; }
  .card-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
  .label { color: var(--muted); font-size: .85rem; }
  .value { font-size: 1.6rem; font-weight: 700; }
  .progress { background: var(--border); height: 6px; border-radius: 999px; }
  .progress-fill { background: #0ea5e9; height: 100%; border-radius: 999px; }
  .two-col { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; }
  @media (max-width: 1024px) { .two-col { grid-template-columns: 1fr; } }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 1.5rem; overflow: hidden; }
  .panel-header { padding: 1rem 1.5rem; font-weight: 700; border-bottom: 1px solid var(--border); }
  .bars { display: flex; align-items: flex-end; gap: .75rem; height: 20rem; padding: 1.5rem; }
  .bar-col { flex: 1; display: flex; flex-direction: column; justify-content: flex-end; align-items: center; height: 100%; gap: .4rem; }
  .bar { width: 100%; background: var(--accent); border-radius: 6px 6px 0 0; }
  .bar-label { font-size: .7rem; color: var(--muted); text-align: center; }
  .line-chart { width: 100%; height: 20rem; padding: 1.5rem; }
  table { width: 100%; border-collapse: collapse; text-align: left; }
  th { padding: 1rem; font-size: .85rem; color: var(--muted); border-bottom: 1px solid #334155; background: rgba(30,41,59,.5); }
  td { padding: 1rem; font-size: .9rem; border-bottom: 1px solid var(--border); }
  tr.winning td { color: var(--green); font-weight: 600; }
  .empty { color: var(--muted); text-align: center; padding: 2rem; }
  .loading { display: flex; justify-content: center; align-items: center; height: 16rem; }
  .spinner { width: 3rem; height: 3rem; border-radius: 50%; border-bottom: 2px solid #0ea5e9; animation: spin 1s linear infinite; }
  @keyframes spin { to { transform: rotate(360deg); } }
  .refresh-btn { background: #0284c7; border: none; color: #fff; padding: .6rem 1.2rem; border-radius: .75rem; cursor: pointer; font-weight: 500; }
  .refresh-btn:hover { background: #0ea5e9; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::tests::{sample_correlations, sample_match};
    use crate::view::{default_highlights, ViewState};

    fn vm(state: &ViewState) -> ViewModel {
        ViewModel::build(state, &default_highlights(), "%d.%m.%Y")
    }

    fn loaded_state() -> ViewState {
        ViewState {
            active_tab: Tab::Dashboard,
            matches: vec![sample_match(1)],
            correlations: Some(sample_correlations()),
            loading: false,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<b>"A" & 'B'</b>"#), "&lt;b&gt;&quot;A&quot; &amp; &#39;B&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_loading_page_shows_spinner_only() {
        let html = page(&vm(&ViewState::default()));
        assert!(html.contains(r#"class="spinner""#));
        assert!(html.contains(r#"http-equiv="refresh""#));
        assert!(!html.contains(r#"class="card""#));
    }

    #[test]
    fn test_dashboard_page_has_four_cards() {
        let html = page(&vm(&loaded_state()));
        assert_eq!(html.matches(r#"<div class="card" data-key="#).count(), 4);
        assert!(html.contains("Insight Dashboard"));
        assert!(html.contains(r#"style="width: 42%""#));
        assert!(html.contains(">2.35<"));
        assert!(!html.contains(r#"http-equiv="refresh""#));
    }

    #[test]
    fn test_dashboard_without_correlations_renders_no_cards() {
        let mut state = loaded_state();
        state.correlations = None;
        let html = page(&vm(&state));
        assert!(!html.contains(r#"class="card""#));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_history_page_rows() {
        let mut state = loaded_state();
        state.active_tab = Tab::History;
        let html = page(&vm(&state));
        assert!(html.contains("Historical Analysis"));
        assert!(html.contains(r#"<tr data-id="1">"#));
        assert!(html.contains(r#"<td class="accent">1-0</td>"#));
        assert!(html.contains(r#"<td class="pos">2-1</td>"#));
        assert!(html.contains("05.01.2024"));
    }

    #[test]
    fn test_empty_history_has_header_only() {
        let state = ViewState {
            active_tab: Tab::History,
            loading: false,
            ..ViewState::default()
        };
        let html = page(&vm(&state));
        assert!(html.contains("<th>HT Score</th>"));
        assert!(html.contains("<tbody></tbody>"));
    }

    #[test]
    fn test_match_detail_highlights_winning_odds() {
        let mut m = sample_match(1);
        m.odds = vec![
            crate::api::Odd {
                id: 1,
                bet_type: "MS".into(),
                option: "1".into(),
                odd_value: 2.1,
                is_winning: true,
            },
            crate::api::Odd {
                id: 2,
                bet_type: "MS".into(),
                option: "X".into(),
                odd_value: 3.2,
                is_winning: false,
            },
        ];
        let html = match_detail(&m, "05.01.2024");
        assert_eq!(html.matches(r#"<tr class="winning">"#).count(), 1);
        assert!(html.contains("<td>MS - X</td><td>3.20</td>"));
    }
}
