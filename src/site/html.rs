//! `index.html` generation.
//!
//! Markup is built from the render descriptions; all data-derived text goes
//! through `escape`. Charts are embedded as one JSON payload and constructed by
//! a small bootstrap script on load.

use std::io::{self, Write};

use serde_json::Value;

use crate::domain::Section;
use crate::render::nanahachi::NanahachiSection;
use crate::render::rikishi::row_rate;
use crate::render::star_trade::{Matrix, MatrixCell};
use crate::render::streaks::STREAK_UNIT;
use crate::render::{Page, ReciprocityCard, RichText, StreakCard, WinRateRow};

/// Write the complete page. `charts` is the payload from `chartjs::charts_payload`.
pub fn write<W: Write>(writer: &mut W, page: &Page, charts: &Value) -> io::Result<()> {
    let nav = Section::ALL
        .iter()
        .filter(|s| **s != Section::Hero)
        .map(|s| format!(r##"<li><a href="#{}">{}</a></li>"##, s.anchor(), s.title()))
        .collect::<Vec<_>>()
        .join("");

    let stat_cards = page
        .hero
        .cards
        .iter()
        .map(|c| {
            format!(
                r#"<div class="stat-card"><div class="stat-value">{}</div><div class="stat-label">{}</div></div>"#,
                escape(&c.value),
                escape(c.label)
            )
        })
        .collect::<String>();

    let win_rate_rows = page.rikishi.table.iter().map(table_row).collect::<String>();
    let streak_cards = page.streaks.cards.iter().map(streak_card).collect::<String>();
    let reciprocity = page.star_trade.reciprocity.iter().map(reciprocity_card).collect::<String>();
    let (matrix_head, matrix_body) = matrix(&page.star_trade.matrix);

    write!(
        writer,
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>SUMO DATA LAB</title>
    <link rel="preconnect" href="https://fonts.googleapis.com">
    <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;700&family=Noto+Sans+JP:wght@400;700;900&display=swap" rel="stylesheet">
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4"></script>
    <style>
        :root {{
            --bg: #0f0f14;
            --card: #1a1a22;
            --border: #2a2a35;
            --text: #f0f0f0;
            --sub-text: #888;
            --gold: #e6b422;
            --purple: #7b2d8b;
            --red: #e74c3c;
        }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{ font-family: 'Noto Sans JP', 'Inter', sans-serif; background: var(--bg); color: var(--text); line-height: 1.7; }}
        nav {{ position: sticky; top: 0; z-index: 10; display: flex; justify-content: space-between; align-items: center; padding: 0.75rem 2rem; background: rgba(15, 15, 20, 0.9); border-bottom: 1px solid var(--border); }}
        .nav-logo {{ font-weight: 900; color: var(--gold); letter-spacing: 0.1em; }}
        .nav-links {{ display: flex; gap: 1.25rem; list-style: none; }}
        .nav-links a {{ color: var(--sub-text); text-decoration: none; font-size: 0.85rem; }}
        .nav-links a:hover {{ color: var(--gold); }}
        .nav-toggle {{ display: none; background: none; border: 0; color: var(--text); font-size: 1.4rem; }}
        @media (max-width: 900px) {{
            .nav-toggle {{ display: block; }}
            .nav-links {{ display: none; position: absolute; top: 100%; left: 0; right: 0; flex-direction: column; padding: 1rem 2rem; background: var(--bg); }}
            .nav-links.open {{ display: flex; }}
        }}
        main {{ max-width: 1100px; margin: 0 auto; padding: 2rem; }}
        .section {{ padding: 4rem 0; opacity: 0; transform: translateY(24px); transition: opacity 0.6s, transform 0.6s; }}
        .section.visible {{ opacity: 1; transform: none; }}
        h1 {{ font-size: 3rem; font-weight: 900; color: var(--gold); letter-spacing: 0.08em; }}
        h2 {{ font-size: 1.6rem; margin-bottom: 1.5rem; }}
        .stat-cards {{ display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; margin-top: 2rem; }}
        .stat-card, .streak-card, .reciprocity-card {{ background: var(--card); border: 1px solid var(--border); border-radius: 12px; padding: 1.25rem; }}
        .stat-value {{ font-size: 2rem; font-weight: 700; color: var(--gold); }}
        .stat-label, .big-stat-label, .streak-period, .reciprocity-detail {{ color: var(--sub-text); font-size: 0.85rem; }}
        .chart-container {{ position: relative; height: 420px; }}
        .chart-container.tall {{ height: 560px; }}
        .insight {{ margin-top: 1.5rem; padding: 1rem 1.25rem; border-left: 3px solid var(--gold); background: var(--card); }}
        .insight strong {{ color: var(--gold); }}
        table {{ width: 100%; border-collapse: collapse; margin-top: 2rem; font-size: 0.9rem; }}
        th, td {{ padding: 0.5rem; border-bottom: 1px solid var(--border); text-align: left; }}
        .highlight-row {{ background: rgba(230, 180, 34, 0.08); }}
        .win-rate-bar {{ display: inline-block; height: 8px; margin-right: 0.5rem; border-radius: 4px; background: var(--gold); }}
        .streak-cards, .reciprocity-cards {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 1rem; }}
        .streak-card.champion {{ border-color: var(--gold); }}
        .streak-rank {{ color: var(--sub-text); font-weight: 700; }}
        .streak-number {{ font-size: 2rem; font-weight: 900; color: var(--gold); }}
        .big-stat {{ display: flex; justify-content: center; align-items: center; gap: 2rem; margin-bottom: 1.5rem; }}
        .big-stat-value {{ font-size: 3rem; font-weight: 900; }}
        .big-stat-value.highlight {{ color: var(--gold); }}
        .big-stat-value.dim {{ color: var(--sub-text); }}
        .big-stat-vs {{ color: var(--sub-text); }}
        .description {{ margin-bottom: 2rem; }}
        .matrix td, .matrix th {{ text-align: center; }}
        .reciprocity-arrow {{ margin: 0 0.5rem; color: var(--red); }}
    </style>
</head>
<body>
<nav>
    <div class="nav-logo">SUMO DATA LAB</div>
    <button class="nav-toggle" aria-label="menu">&#9776;</button>
    <ul class="nav-links">{nav}</ul>
</nav>
<main>
<section id="hero" class="section">
    <h1>SUMO DATA LAB</h1>
    <div id="stat-cards" class="stat-cards">{stat_cards}</div>
</section>

<section id="kimarite" class="section">
    <h2>{kimarite_title}</h2>
    <div class="chart-container tall"><canvas id="kimariteChart"></canvas></div>
    <div id="kimarite-insight" class="insight">{kimarite_insight}</div>
</section>

<section id="trend" class="section">
    <h2>{trend_title}</h2>
    <div class="chart-container"><canvas id="trendChart"></canvas></div>
    <div id="trend-insight" class="insight">{trend_insight}</div>
</section>

<section id="rikishi" class="section">
    <h2>{rikishi_title}</h2>
    <div class="chart-container tall"><canvas id="rikishiChart"></canvas></div>
    <table id="winRateTable">
        <thead><tr><th>#</th><th>力士</th><th>勝率</th><th>勝敗</th></tr></thead>
        <tbody>{win_rate_rows}</tbody>
    </table>
    <div id="rikishi-insight" class="insight">{rikishi_insight}</div>
</section>

<section id="yokozuna" class="section">
    <h2>{yokozuna_title}</h2>
    <div class="chart-container"><canvas id="yokozunaChart"></canvas></div>
</section>

<section id="upset" class="section">
    <h2>{upset_title}</h2>
    <div class="chart-container"><canvas id="upsetChart"></canvas></div>
    <div id="upset-insight" class="insight">{upset_insight}</div>
</section>

<section id="streaks" class="section">
    <h2>{streaks_title}</h2>
    <div id="streak-cards" class="streak-cards">{streak_cards}</div>
</section>

<section id="nanahachi" class="section">
    <h2>{nanahachi_title}</h2>
    <div id="nanahachi-big-stat" class="big-stat">{big_stat}</div>
    <p id="nanahachi-description" class="description">{nanahachi_description}</p>
    <div class="chart-container"><canvas id="nanahachi-bar-chart"></canvas></div>
    <div class="chart-container"><canvas id="nanahachi-line-chart"></canvas></div>
    <div id="nanahachi-insight" class="insight">{nanahachi_insight}</div>
</section>

<section id="startrade" class="section">
    <h2>{startrade_title}</h2>
    <p id="startrade-description" class="description">{startrade_description}</p>
    <div class="chart-container"><canvas id="startrade-trend-chart"></canvas></div>
    <table id="startrade-matrix" class="matrix">
        <thead>{matrix_head}</thead>
        <tbody>{matrix_body}</tbody>
    </table>
    <div id="startrade-reciprocity" class="reciprocity-cards">{reciprocity}</div>
    <div id="startrade-insight" class="insight">{startrade_insight}</div>
</section>
</main>

<script id="chart-data" type="application/json">{charts_json}</script>
<script>
(function () {{
    const toggle = document.querySelector('.nav-toggle');
    const links = document.querySelector('.nav-links');
    toggle.addEventListener('click', () => links.classList.toggle('open'));
    links.querySelectorAll('a').forEach((a) => a.addEventListener('click', () => links.classList.remove('open')));

    const observer = new IntersectionObserver((entries) => {{
        entries.forEach((entry) => {{
            if (entry.isIntersecting) entry.target.classList.add('visible');
        }});
    }}, {{ threshold: 0.08 }});
    document.querySelectorAll('.section').forEach((el) => observer.observe(el));

    function drawAnnotations(chart, annotations) {{
        const x = chart.scales.x;
        const y = chart.scales.y;
        const ctx = chart.ctx;
        annotations.forEach((a) => {{
            const px = a.type === 'value_line' ? x.getPixelForValue(a.value) : x.getPixelForValue(a.index);
            ctx.save();
            ctx.strokeStyle = a.color;
            ctx.lineWidth = a.width;
            ctx.setLineDash(a.dash);
            ctx.beginPath();
            ctx.moveTo(px, y.top);
            ctx.lineTo(px, y.bottom);
            ctx.stroke();
            if (a.type === 'index_marker') {{
                ctx.setLineDash([]);
                ctx.fillStyle = a.color;
                ctx.font = '11px "Noto Sans JP", sans-serif';
                ctx.textAlign = 'center';
                const n = a.label.length;
                a.label.forEach((line, i) => ctx.fillText(line, px, y.top - 2 - 12 * (n - 1 - i)));
            }}
            ctx.restore();
        }});
    }}

    const payloads = JSON.parse(document.getElementById('chart-data').textContent);
    payloads.forEach((p) => {{
        const config = p.config;
        config.options.plugins.tooltip = {{
            callbacks: {{
                label: (ctx) => (p.tooltips[ctx.datasetIndex] || [])[ctx.dataIndex] || '',
            }},
        }};
        p.percentAxes.forEach((axis) => {{
            const scale = config.options.scales[axis];
            scale.ticks = Object.assign(scale.ticks || {{}}, {{ callback: (v) => v + '%' }});
        }});
        if (p.annotations.length > 0) {{
            config.plugins = [{{ id: p.canvas + '-annotations', afterDraw: (chart) => drawAnnotations(chart, p.annotations) }}];
        }}
        new Chart(document.getElementById(p.canvas), config);
    }});
}})();
</script>
</body>
</html>
"#,
        nav = nav,
        stat_cards = stat_cards,
        kimarite_title = Section::Kimarite.title(),
        kimarite_insight = rich(&page.kimarite.insight),
        trend_title = Section::Trend.title(),
        trend_insight = rich(&page.trend.insight),
        rikishi_title = Section::Rikishi.title(),
        win_rate_rows = win_rate_rows,
        rikishi_insight = rich(&page.rikishi.insight),
        yokozuna_title = Section::Yokozuna.title(),
        upset_title = Section::Upset.title(),
        upset_insight = rich(&page.upset.insight),
        streaks_title = Section::Streaks.title(),
        streak_cards = streak_cards,
        nanahachi_title = Section::Nanahachi.title(),
        big_stat = big_stat(&page.nanahachi),
        nanahachi_description = rich(&page.nanahachi.description),
        nanahachi_insight = rich(&page.nanahachi.insight),
        startrade_title = Section::StarTrade.title(),
        startrade_description = rich(&page.star_trade.description),
        matrix_head = matrix_head,
        matrix_body = matrix_body,
        reciprocity = reciprocity,
        startrade_insight = rich(&page.star_trade.insight),
        charts_json = script_json(charts),
    )
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// JSON safe to inline in a `<script>` element.
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

pub fn rich(text: &RichText) -> String {
    text.spans
        .iter()
        .map(|s| {
            if s.strong {
                format!("<strong>{}</strong>", escape(&s.text))
            } else {
                escape(&s.text)
            }
        })
        .collect()
}

fn table_row(row: &WinRateRow) -> String {
    format!(
        r#"<tr class="{class}"><td>{rank}</td><td>{name}</td><td><span class="win-rate-bar" style="width:{width}px"></span>{rate}</td><td>{record}</td></tr>"#,
        class = if row.highlight { "highlight-row" } else { "" },
        rank = row.rank,
        name = escape(&row.shikona),
        width = row.bar_width,
        rate = row_rate(row),
        record = row.record,
    )
}

fn streak_card(card: &StreakCard) -> String {
    format!(
        r#"<div class="streak-card{champion}"><span class="streak-rank">{rank}</span><div class="streak-name">{name}</div><div class="streak-number">{streak}<span style="font-size:0.9rem;color:var(--sub-text)">{unit}</span></div><div class="streak-period">{period}</div></div>"#,
        champion = if card.champion { " champion" } else { "" },
        rank = card.rank,
        name = escape(&card.shikona),
        streak = card.streak,
        unit = STREAK_UNIT,
        period = escape(&card.period),
    )
}

fn big_stat(section: &NanahachiSection) -> String {
    section
        .big_stats
        .iter()
        .map(|s| {
            format!(
                r#"<div class="big-stat-item"><div class="big-stat-value {class}">{value}</div><div class="big-stat-label">{label}</div></div>"#,
                class = if s.highlight { "highlight" } else { "dim" },
                value = escape(&s.value),
                label = s.label,
            )
        })
        .collect::<Vec<_>>()
        .join(r#"<div class="big-stat-vs">vs</div>"#)
}

fn matrix(m: &Matrix) -> (String, String) {
    let head = format!(
        "<tr><th>{}</th>{}</tr>",
        escape(m.corner),
        m.columns.iter().map(|c| format!("<th>{c}</th>")).collect::<String>()
    );
    let body = m
        .rows
        .iter()
        .map(|row| {
            let cells = row
                .cells
                .iter()
                .map(|cell| match cell {
                    MatrixCell::NoData => r#"<td style="color:var(--sub-text);">-</td>"#.to_string(),
                    MatrixCell::Rate {
                        background, title, ..
                    } => format!(
                        r#"<td style="background:{background};" title="{title}">{text}</td>"#,
                        title = escape(title),
                        text = cell.text(),
                    ),
                })
                .collect::<String>();
            format!(
                r#"<tr><td style="font-weight:700;color:var(--text);">{}</td>{cells}</tr>"#,
                row.record
            )
        })
        .collect();
    (head, body)
}

fn reciprocity_card(card: &ReciprocityCard) -> String {
    format!(
        r#"<div class="reciprocity-card"><div class="reciprocity-names">{a}<span class="reciprocity-arrow">&harr;</span>{b}</div><div class="reciprocity-detail">{detail}</div></div>"#,
        a = escape(&card.rikishi_a),
        b = escape(&card.rikishi_b),
        detail = escape(&card.detail()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::fixtures;
    use crate::render::{ChartTheme, render_page};
    use crate::site::chartjs::charts_payload;

    fn page_html() -> String {
        let page = render_page(&fixtures::bundle()).unwrap();
        let charts = charts_payload(page.charts(), &ChartTheme::default());
        let mut buf = Vec::new();
        write(&mut buf, &page, &charts).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn every_target_id_is_present() {
        let html = page_html();
        for id in [
            "stat-cards",
            "kimariteChart",
            "kimarite-insight",
            "trendChart",
            "trend-insight",
            "rikishiChart",
            "winRateTable",
            "rikishi-insight",
            "yokozunaChart",
            "upsetChart",
            "upset-insight",
            "streak-cards",
            "nanahachi-big-stat",
            "nanahachi-description",
            "nanahachi-bar-chart",
            "nanahachi-line-chart",
            "nanahachi-insight",
            "startrade-description",
            "startrade-trend-chart",
            "startrade-matrix",
            "startrade-reciprocity",
            "startrade-insight",
        ] {
            assert!(html.contains(&format!(r#"id="{id}""#)), "missing #{id}");
        }
    }

    #[test]
    fn insight_emphasis_becomes_strong() {
        let html = page_html();
        assert!(html.contains("約<strong>56.0%</strong>を占めています"));
        assert!(html.contains(r#"<tr class="highlight-row"><td>1</td><td>白鵬</td>"#));
        assert!(html.contains(r#"<td style="color:var(--sub-text);">-</td>"#));
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape(r#"<b>"x" & 'y'</b>"#), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
        let t = RichText::new().plain("a<").strong("&b");
        assert_eq!(rich(&t), "a&lt;<strong>&amp;b</strong>");
    }

    #[test]
    fn embedded_json_cannot_close_the_script() {
        let v = serde_json::json!(["</script><script>alert(1)</script>"]);
        assert!(!script_json(&v).contains("</script>"));
    }

    #[test]
    fn output_is_deterministic() {
        assert_eq!(page_html(), page_html());
    }
}
