use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant, SystemTime};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table};
use ratatui::{Frame, Terminal};

use formguide::export;
use formguide::feed;
use formguide::state::{
    apply_delta, league_label, AppState, Delta, FeedCommand, LeagueMode, Screen,
};
use formguide::team_metrics::FORM_WINDOW;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<FeedCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<FeedCommand>, league_mode: LeagueMode) -> Self {
        Self {
            state: AppState::new(league_mode),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Standings,
            KeyCode::Char('2') => self.state.screen = Screen::Teams,
            KeyCode::Char('3') => self.state.screen = Screen::Compare,
            KeyCode::Char('b') | KeyCode::Esc => self.state.screen = Screen::Standings,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.state.cycle_league_mode();
                let league_id = self.state.league_mode.league_id();
                if self.cmd_tx.send(FeedCommand::SwitchLeague(league_id)).is_err() {
                    self.state.push_log("[WARN] feed thread is gone");
                }
            }
            KeyCode::Char('r') => self.request_refresh(false),
            KeyCode::Char('R') => self.request_refresh(true),
            KeyCode::Char('c') | KeyCode::Enter => self.pick_for_compare(),
            KeyCode::Char('x') => {
                self.state.clear_compare();
                self.state.push_log("[INFO] comparison cleared");
            }
            KeyCode::Char('e') => self.export_current(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn request_refresh(&mut self, force: bool) {
        self.state.loading = true;
        if self.cmd_tx.send(FeedCommand::Refresh { force }).is_err() {
            self.state.push_log("[WARN] feed thread is gone");
            self.state.loading = false;
        } else if force {
            self.state.push_log("[INFO] forced refresh requested");
        }
    }

    fn pick_for_compare(&mut self) {
        let Some(team_id) = self.state.selected_team_id() else {
            return;
        };
        self.state.push_compare_selection(team_id);
        let slots = self.state.compare_slots;
        if slots[1].is_some() {
            self.state.screen = Screen::Compare;
        } else {
            let name = self
                .state
                .snapshot
                .as_ref()
                .and_then(|s| s.team_name(team_id))
                .unwrap_or("team")
                .to_string();
            self.state.push_log(format!("[INFO] {name} set; pick an opponent"));
        }
    }

    fn export_current(&mut self) {
        let Some(snapshot) = self.state.snapshot.clone() else {
            self.state.push_log("[INFO] nothing to export yet");
            return;
        };
        let slug = league_label(self.state.league_mode)
            .to_lowercase()
            .replace(' ', "_");
        let xlsx = PathBuf::from(format!("{slug}.xlsx"));
        let csv = PathBuf::from(format!("{slug}_standings.csv"));
        match export::export_league_workbook(&xlsx, &snapshot) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] wrote {} ({} teams, {} fixtures)",
                xlsx.display(),
                report.teams,
                report.fixtures
            )),
            Err(err) => self.state.push_log(format!("[WARN] export failed: {err}")),
        }
        match export::export_standings_csv(&csv, &snapshot) {
            Ok(rows) => self
                .state
                .push_log(format!("[INFO] wrote {} ({rows} rows)", csv.display())),
            Err(err) => self.state.push_log(format!("[WARN] csv export failed: {err}")),
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let league_mode = std::env::var("LEAGUE_ID")
        .ok()
        .and_then(|val| val.parse::<u32>().ok())
        .and_then(LeagueMode::from_league_id)
        .unwrap_or(LeagueMode::PremierLeague);

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    feed::spawn_feed(tx, cmd_rx, league_mode.league_id());

    let mut app = App::new(cmd_tx, league_mode);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Standings => render_standings(frame, chunks[1], &app.state),
        Screen::Teams => render_teams(frame, chunks[1], &app.state),
        Screen::Compare => render_compare(frame, chunks[1], &app.state),
    }

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let tab = match state.screen {
        Screen::Standings => "STANDINGS",
        Screen::Teams => "TEAMS",
        Screen::Compare => "COMPARE",
    };
    let status = if state.loading {
        "refreshing...".to_string()
    } else {
        match state.refreshed_at {
            Some(at) => format!("updated {}", format_age(at)),
            None => "no data".to_string(),
        }
    };
    format!(
        "formguide | {} | [{tab}] | {status}",
        league_label(state.league_mode)
    )
}

fn footer_text(state: &AppState) -> String {
    let last_log = state.logs.back().map(String::as_str).unwrap_or("");
    format!("1/2/3 screens  j/k move  c compare  l league  r/R refresh  e export  ? help  q quit\n{last_log}")
}

fn render_standings(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.standings.is_empty() {
        let msg = if state.loading {
            "Loading league data..."
        } else {
            "No standings available"
        };
        frame.render_widget(
            Paragraph::new(msg).block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    }

    let header = Row::new(vec!["#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = state
        .standings
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let cells = vec![
                (idx + 1).to_string(),
                row.name.clone(),
                row.played.to_string(),
                row.won.to_string(),
                row.drawn.to_string(),
                row.lost.to_string(),
                row.goals_for.to_string(),
                row.goals_against.to_string(),
                row.goal_diff.to_string(),
                row.points.to_string(),
            ];
            let style = if idx == state.selected && state.screen == Screen::Standings {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            Row::new(cells).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(20),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(5),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("League table"));
    frame.render_widget(table, area);
}

fn render_teams(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(snapshot) = state.snapshot.as_ref() else {
        frame.render_widget(
            Paragraph::new("Loading league data...")
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    };

    let header = Row::new(vec![
        "Team", "P", "GF", "GA", "AvgF", "AvgA", "Att", "Def", "Form",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = snapshot
        .list_teams()
        .iter()
        .zip(state.team_metrics.iter())
        .enumerate()
        .map(|(idx, (team, m))| {
            let cells = vec![
                team.name.clone(),
                m.played.to_string(),
                m.goals_for.to_string(),
                m.goals_against.to_string(),
                format!("{:.2}", m.avg_goals_for),
                format!("{:.2}", m.avg_goals_against),
                format!("{:.2}", m.attack),
                format!("{:.2}", m.defense),
                format!("{:.0}% ({}/{})", m.form * 100.0, m.recent_points, 3 * FORM_WINDOW),
            ];
            let style = if idx == state.selected && state.screen == Screen::Teams {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            Row::new(cells).style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Team metrics"));
    frame.render_widget(table, area);
}

fn render_compare(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::ALL).title("Head to head");
    let Some(compare) = state.compare.as_ref() else {
        let hint = match state.compare_slots {
            [None, _] => "Pick two teams with 'c' on the standings or teams screen.",
            [Some(_), None] => "One team picked; select an opponent with 'c'.",
            _ => "Waiting for league data...",
        };
        frame.render_widget(Paragraph::new(hint).block(block), area);
        return;
    };

    let name = |team_id: u32| {
        state
            .snapshot
            .as_ref()
            .and_then(|s| s.team_name(team_id))
            .unwrap_or("unknown")
            .to_string()
    };
    let name_a = name(compare.metrics_a.team_id);
    let name_b = name(compare.metrics_b.team_id);

    let lines = [
        format!("{name_a}  vs  {name_b}"),
        String::new(),
        format!(
            "Rating      {:>8.3}   {:>8.3}",
            compare.rating_a, compare.rating_b
        ),
        format!(
            "Win chance  {:>7.1}%   {:>7.1}%",
            compare.p_a, compare.p_b
        ),
        format!(
            "Attack      {:>8.2}   {:>8.2}",
            compare.metrics_a.attack, compare.metrics_b.attack
        ),
        format!(
            "Defense     {:>8.2}   {:>8.2}",
            compare.metrics_a.defense, compare.metrics_b.defense
        ),
        format!(
            "Form        {:>8.2}   {:>8.2}",
            compare.metrics_a.form, compare.metrics_b.form
        ),
        String::new(),
        format!(
            "Projected score: {name_a} {} : {} {name_b}",
            compare.projected_a, compare.projected_b
        ),
        String::new(),
        "x clears the selection.".to_string(),
    ]
    .join("\n");

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn format_age(at: SystemTime) -> String {
    let Ok(age) = at.elapsed() else {
        return "just now".to_string();
    };
    let secs = age.as_secs();
    if secs < 60 {
        format!("{secs}s ago")
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "formguide - Help",
        "",
        "Global:",
        "  1            Standings",
        "  2            Team metrics",
        "  3            Head-to-head",
        "  b / Esc      Back to standings",
        "  l            Cycle league",
        "  r            Refresh (cache-aware)",
        "  R            Force refresh",
        "  e            Export xlsx + csv",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Lists:",
        "  j/k or ↑/↓   Move selection",
        "  c / Enter    Pick team for comparison",
        "  x            Clear comparison",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
