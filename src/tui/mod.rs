//! Ratatui-based terminal UI.
//!
//! Pages through the rendered sections one at a time: charts through the
//! Plotters widget, tables and cards through Ratatui widgets.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
};

use crate::domain::Section;
use crate::error::AppError;
use crate::render::chart::Color as ChartColor;
use crate::render::star_trade::MatrixCell;
use crate::render::{Page, RichText};

mod plotters_chart;

use plotters_chart::SpecChart;

/// Start the TUI over an already rendered page.
pub fn run(page: &Page, source: &str) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::output(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(page, source);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::output(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::output(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App<'a> {
    page: &'a Page,
    source: &'a str,
    section: Section,
    /// Which of the section's charts is shown (the 7-7 section has two).
    chart: usize,
    scroll: u16,
}

impl<'a> App<'a> {
    fn new(page: &'a Page, source: &'a str) -> Self {
        Self {
            page,
            source,
            section: Section::Hero,
            chart: 0,
            scroll: 0,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::output(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::output(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::output(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => self.goto(self.section.next()),
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => self.goto(self.section.prev()),
            KeyCode::Char('c') => {
                let n = self.page.section_charts(self.section).len();
                if n > 0 {
                    self.chart = (self.chart + 1) % n;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Char(c) => {
                if let Some(section) = c
                    .to_digit(10)
                    .and_then(|d| (d as usize).checked_sub(1))
                    .and_then(|i| Section::ALL.get(i))
                {
                    self.goto(*section);
                }
            }
            _ => {}
        }
        false
    }

    fn goto(&mut self, section: Section) {
        self.section = section;
        self.chart = 0;
        self.scroll = 0;
    }

    fn position(&self) -> usize {
        Section::ALL
            .iter()
            .position(|s| *s == self.section)
            .map_or(1, |i| i + 1)
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("sumo", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" [{}/{}] ", self.position(), Section::ALL.len())),
            Span::styled(
                self.section.title(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" | {}", self.source), Style::default().fg(Color::Gray)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let page = self.page;
        match self.section {
            Section::Hero => {
                let items: Vec<ListItem> = page
                    .hero
                    .cards
                    .iter()
                    .map(|c| {
                        ListItem::new(Line::from(vec![
                            Span::styled(format!("{:>12}", c.value), Style::default().fg(Color::Yellow)),
                            Span::raw(format!("  {}", c.label)),
                        ]))
                    })
                    .collect();
                let list = List::new(items).block(titled("Overview"));
                frame.render_widget(list, area);
            }
            Section::Kimarite => self.chart_with_text(frame, area, &page.kimarite.insight),
            Section::Trend => self.chart_with_text(frame, area, &page.trend.insight),
            Section::Upset => self.chart_with_text(frame, area, &page.upset.insight),
            Section::Yokozuna => {
                let caption = RichText::new().plain(format!(
                    "{} 場所 / {} 力士",
                    page.yokozuna.basho.len(),
                    page.yokozuna.chart.datasets.len()
                ));
                self.chart_with_text(frame, area, &caption);
            }
            Section::Rikishi => {
                let rows = split(area, Direction::Horizontal, [Constraint::Percentage(55), Constraint::Percentage(45)]);
                self.chart_with_text(frame, rows[0], &page.rikishi.insight);
                frame.render_widget(win_rate_table(page), rows[1]);
            }
            Section::Streaks => {
                let items: Vec<ListItem> = page
                    .streaks
                    .cards
                    .iter()
                    .map(|c| {
                        let style = if c.champion {
                            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        };
                        ListItem::new(Line::from(vec![
                            Span::styled(format!("{:>2}. {} {}連勝", c.rank, c.shikona, c.streak), style),
                            Span::styled(format!("  {}", c.period), Style::default().fg(Color::Gray)),
                        ]))
                    })
                    .collect();
                frame.render_widget(List::new(items).block(titled("連勝記録")), area);
            }
            Section::Nanahachi => {
                let rows = split(area, Direction::Vertical, [Constraint::Length(3), Constraint::Min(0)]);
                let [main, expected] = &page.nanahachi.big_stats;
                let stats = Line::from(vec![
                    Span::styled(main.value.clone(), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                    Span::raw(format!(" {}   vs   ", main.label)),
                    Span::styled(expected.value.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(format!(" {}", expected.label)),
                ]);
                frame.render_widget(Paragraph::new(stats).block(Block::default().borders(Borders::ALL)), rows[0]);
                self.chart_with_text(frame, rows[1], &page.nanahachi.insight);
            }
            Section::StarTrade => {
                let rows = split(area, Direction::Vertical, [Constraint::Percentage(55), Constraint::Percentage(45)]);
                self.chart_with_text(frame, rows[0], &page.star_trade.insight);
                let cols = split(rows[1], Direction::Horizontal, [Constraint::Percentage(65), Constraint::Percentage(35)]);
                frame.render_widget(matrix_table(page), cols[0]);
                let cards: Vec<ListItem> = page
                    .star_trade
                    .reciprocity
                    .iter()
                    .map(|c| ListItem::new(vec![Line::from(c.names()), Line::from(c.detail())]))
                    .collect();
                frame.render_widget(List::new(cards).block(titled("相互の貸し借り")), cols[1]);
            }
        }
    }

    fn chart_with_text(&self, frame: &mut ratatui::Frame<'_>, area: Rect, text: &RichText) {
        let rows = split(area, Direction::Vertical, [Constraint::Min(0), Constraint::Length(5)]);
        let charts = self.page.section_charts(self.section);

        if let Some(&spec) = charts.get(self.chart % charts.len().max(1)) {
            let title = if charts.len() > 1 {
                format!("{} ({}/{}, c: next)", spec.canvas_id, self.chart + 1, charts.len())
            } else {
                spec.canvas_id.to_string()
            };
            let block = titled(&title);
            let inner = block.inner(rows[0]);
            frame.render_widget(block, rows[0]);
            frame.render_widget(Clear, inner);
            frame.render_widget(SpecChart { spec }, inner);
        }

        let p = Paragraph::new(rich_line(text))
            .wrap(Wrap { trim: true })
            .scroll((self.scroll, 0))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, rows[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ section  1-9 jump  c chart  ↑/↓ scroll  q quit";
        let p = Paragraph::new(Span::styled(help, Style::default().fg(Color::Gray)))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn titled(title: &str) -> Block<'_> {
    Block::default().title(title).borders(Borders::ALL)
}

fn split<const N: usize>(area: Rect, direction: Direction, constraints: [Constraint; N]) -> std::rc::Rc<[Rect]> {
    Layout::default().direction(direction).constraints(constraints).split(area)
}

fn rich_line(text: &RichText) -> Text<'_> {
    let spans: Vec<Span> = text
        .spans
        .iter()
        .map(|s| {
            if s.strong {
                Span::styled(s.text.as_str(), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else {
                Span::raw(s.text.as_str())
            }
        })
        .collect();
    Text::from(Line::from(spans))
}

fn win_rate_table(page: &Page) -> Table<'_> {
    let rows = page.rikishi.table.iter().map(|r| {
        let style = if r.highlight {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Row::new(vec![
            r.rank.to_string(),
            r.shikona.clone(),
            crate::render::rikishi::row_rate(r),
            r.record.clone(),
            r.basho_count.to_string(),
        ])
        .style(style)
    });
    Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Length(5),
        ],
    )
    .header(Row::new(vec!["#", "力士", "勝率", "勝敗", "場所"]).style(Style::default().fg(Color::Gray)))
    .block(titled("勝率ランキング (40場所以上)"))
}

fn matrix_table(page: &Page) -> Table<'_> {
    let matrix = &page.star_trade.matrix;
    let header = Row::new(
        std::iter::once(matrix.corner)
            .chain(matrix.columns.iter().copied())
            .map(Cell::from)
            .collect::<Vec<_>>(),
    )
    .style(Style::default().fg(Color::Gray));

    let rows = matrix.rows.iter().map(|row| {
        let cells = std::iter::once(Cell::from(row.record)).chain(row.cells.iter().map(|cell| {
            let style = match cell {
                MatrixCell::NoData => Style::default().fg(Color::DarkGray),
                MatrixCell::Rate { background, .. } => Style::default().bg(tint(*background)),
            };
            Cell::from(cell.text()).style(style)
        }));
        Row::new(cells.collect::<Vec<_>>())
    });

    let mut widths = vec![Constraint::Length(12)];
    widths.extend(matrix.columns.iter().map(|_| Constraint::Length(6)));
    Table::new(rows, widths).header(header).block(titled("成績別対戦勝率"))
}

/// Blend a translucent page colour onto a black terminal background.
fn tint(color: ChartColor) -> Color {
    let (r, g, b) = color.rgb();
    let a = color.alpha();
    let scale = |c: u8| (f64::from(c) * a).round() as u8;
    Color::Rgb(scale(r), scale(g), scale(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::fixtures;
    use crate::render::render_page;
    use ratatui::backend::TestBackend;

    fn page() -> Page {
        render_page(&fixtures::bundle()).unwrap()
    }

    #[test]
    fn arrows_cycle_sections() {
        let page = page();
        let mut app = App::new(&page, "fixtures");
        assert!(!app.handle_key(KeyCode::Left));
        assert_eq!(app.section, Section::StarTrade);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.section, Section::Kimarite);
        app.handle_key(KeyCode::Char('8'));
        assert_eq!(app.section, Section::Nanahachi);
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn chart_key_cycles_within_section() {
        let page = page();
        let mut app = App::new(&page, "fixtures");
        app.goto(Section::Nanahachi);
        app.handle_key(KeyCode::Char('c'));
        assert_eq!(app.chart, 1);
        app.handle_key(KeyCode::Char('c'));
        assert_eq!(app.chart, 0);
        app.handle_key(KeyCode::Char('c'));
        app.handle_key(KeyCode::Right);
        assert_eq!(app.chart, 0);
    }

    #[test]
    fn draws_text_sections() {
        let page = page();
        let mut app = App::new(&page, "fixtures");
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        for section in [Section::Hero, Section::Streaks] {
            app.goto(section);
            terminal.draw(|f| app.draw(f)).unwrap();
        }
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains("q quit"));
        assert!(screen.contains("[7/9]"));
        assert!(screen.contains("fixtures"));
    }

    #[test]
    fn tint_darkens_by_alpha() {
        assert_eq!(tint(ChartColor::Rgba(200, 100, 50, 0.5)), Color::Rgb(100, 50, 25));
    }
}
