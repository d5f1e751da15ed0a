//! Main application state and rendering

use crate::config::MAX_HOPE;
use crate::game::{Phase, Reveal, Session};
use crate::tui::widgets::{DramaticBox, HopeBar};
use crate::tui::{
    centered_rect, create_card_layout, create_main_layout, hope_color, outcome_color,
    styled_block, Theme, HELP_TEXT, SMALL_LOGO,
};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::time::{Duration, Instant};
use tracing::warn;

/// Spinner frames shown while an outcome is pending
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Application state
pub struct App {
    pub session: Session,
    pub theme: Theme,
    pub running: bool,
    pub show_help: bool,
    pub solution_state: ListState,
    ticks: usize,
}

impl App {
    pub fn new(session: Session) -> Self {
        let mut solution_state = ListState::default();
        solution_state.select(Some(0));

        Self {
            session,
            theme: Theme::default(),
            running: true,
            show_help: false,
            solution_state,
            ticks: 0,
        }
    }

    /// Handle keyboard input and advance any pending reveal
    pub fn handle_input(&mut self) -> std::io::Result<bool> {
        self.tick(Instant::now());

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(true);
                }
                self.handle_key(key.code, Instant::now());
            }
        }
        Ok(self.running)
    }

    /// Reveal the pending outcome once its delay has passed
    pub fn tick(&mut self, now: Instant) {
        self.ticks = self.ticks.wrapping_add(1);
        match self.session.poll(now) {
            // Plan B brings its own solution list
            Ok(Some(Reveal::Applied { plan_b_activated: true, .. })) => {
                self.solution_state.select(Some(0));
            }
            Ok(_) => {}
            Err(err) => warn!(target: "tui", %err, "Reveal failed"),
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, now: Instant) {
        match code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('?') => self.show_help = !self.show_help,
            KeyCode::Esc => {
                if self.show_help {
                    self.show_help = false;
                } else if self.session.state().show_share_report {
                    self.session.close_share_report();
                }
            }
            KeyCode::Char('x') => self.session.close_share_report(),
            KeyCode::Char('r') => {
                self.session.reset();
                self.solution_state.select(Some(0));
            }
            KeyCode::Char('s') if self.session.can_skip() => {
                self.session.skip_crisis();
                self.solution_state.select(Some(0));
            }
            KeyCode::Up => self.navigate_up(),
            KeyCode::Down => self.navigate_down(),
            KeyCode::Enter => self.handle_enter(now),
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let index = c as usize - '1' as usize;
                if index < self.solution_count() {
                    self.solution_state.select(Some(index));
                    self.choose_highlighted(now);
                }
            }
            _ => {}
        }
    }

    fn solution_count(&self) -> usize {
        self.session.state().current_crisis.solutions.len()
    }

    fn navigate_up(&mut self) {
        let i = self.solution_state.selected().unwrap_or(0);
        if i > 0 {
            self.solution_state.select(Some(i - 1));
        }
    }

    fn navigate_down(&mut self) {
        let i = self.solution_state.selected().unwrap_or(0);
        if i + 1 < self.solution_count() {
            self.solution_state.select(Some(i + 1));
        }
    }

    fn handle_enter(&mut self, now: Instant) {
        match self.session.phase() {
            Phase::Active => self.choose_highlighted(now),
            Phase::ShowingResult | Phase::Terminal => {
                self.session.continue_game();
                self.solution_state.select(Some(0));
            }
            Phase::Loading => {}
        }
    }

    fn choose_highlighted(&mut self, now: Instant) {
        if self.session.phase() != Phase::Active || self.session.is_loading() {
            return;
        }
        let index = self.solution_state.selected().unwrap_or(0);
        let Some(id) = self
            .session
            .state()
            .current_crisis
            .solutions
            .get(index)
            .map(|s| s.id.clone())
        else {
            return;
        };
        if let Err(err) = self.session.select_solution(&id, now) {
            warn!(target: "tui", %err, "Selection rejected");
        }
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let layout = create_main_layout(frame.area());

        self.render_header(frame, layout[0]);
        match self.session.phase() {
            Phase::Active | Phase::Loading => self.render_crisis_card(frame, layout[1]),
            Phase::ShowingResult | Phase::Terminal => self.render_result(frame, layout[1]),
        }
        self.render_message(frame, layout[2]);
        self.render_status_bar(frame, layout[3]);

        if self.session.state().show_share_report {
            self.render_share_report(frame);
        }
        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let header_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(19),
                Constraint::Min(20),
                Constraint::Length(30),
            ])
            .split(area);

        let logo = Paragraph::new(SMALL_LOGO)
            .style(Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(logo, header_layout[0]);

        let state = self.session.state();
        let mut title = vec![Line::from(Span::styled(
            format!("Saved today: {}", state.today_saved_count),
            Style::default().fg(self.theme.success),
        ))];
        if state.is_daily_challenge {
            title.push(Line::from(Span::styled(
                "★ Daily challenge",
                Style::default().fg(self.theme.header),
            )));
        }
        let title = Paragraph::new(title)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(title, header_layout[1]);

        let hope_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border));
        let inner = hope_block.inner(header_layout[2]);
        frame.render_widget(hope_block, header_layout[2]);
        frame.render_widget(
            HopeBar::new("Hope", state.hope_value, MAX_HOPE).color(hope_color(state.hope_value)),
            inner,
        );
    }

    fn render_crisis_card(&mut self, frame: &mut Frame, area: Rect) {
        let crisis = self.session.state().current_crisis.clone();
        let chunks = create_card_layout(area);

        let description = vec![
            Line::from(Span::styled(
                crisis.title.clone(),
                Style::default().fg(self.theme.warning).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(crisis.description.clone()),
        ];
        let card = Paragraph::new(description)
            .wrap(Wrap { trim: true })
            .block(styled_block("Crisis", &self.theme));
        frame.render_widget(card, chunks[0]);

        if self.session.is_loading() {
            let chosen = self
                .session
                .last_solution()
                .map(|s| s.text.clone())
                .unwrap_or_default();
            let spinner = SPINNER[(self.ticks / 2) % SPINNER.len()];
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("{} Deploying: {}", spinner, chosen),
                    Style::default().fg(self.theme.accent),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "The world holds its breath...",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            let loading = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(styled_block("Solutions", &self.theme));
            frame.render_widget(loading, chunks[1]);
            return;
        }

        let items: Vec<ListItem> = crisis
            .solutions
            .iter()
            .enumerate()
            .map(|(i, s)| ListItem::new(format!("  [{}] {}", i + 1, s.text)))
            .collect();
        let list = List::new(items)
            .block(styled_block("Solutions", &self.theme))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▶");
        frame.render_stateful_widget(list, chunks[1], &mut self.solution_state);
    }

    fn render_result(&self, frame: &mut Frame, area: Rect) {
        let terminal = self.session.phase() == Phase::Terminal;
        let mut text = vec![Line::from("")];

        if let Some(solution) = self.session.last_solution() {
            text.push(Line::from(vec![
                Span::styled(
                    format!("{} {} ", solution.outcome.symbol(), solution.outcome),
                    Style::default()
                        .fg(outcome_color(&solution.outcome))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(solution.text.clone()),
            ]));
            if let Some(meme) = &solution.meme_image {
                text.push(Line::from(Span::styled(
                    format!("[meme: {}]", meme),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            text.push(Line::from(""));
        }

        text.push(Line::from(self.session.state().message.clone()));
        text.push(Line::from(""));

        if terminal {
            text.push(Line::from(Span::styled(
                "GAME OVER",
                Style::default().fg(self.theme.alert).add_modifier(Modifier::BOLD),
            )));
            text.push(Line::from("Press Enter to start over"));
        } else {
            text.push(Line::from(Span::styled(
                "Press Enter to face the next crisis",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let result = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(styled_block("Result", &self.theme));
        frame.render_widget(result, area);
    }

    fn render_message(&self, frame: &mut Frame, area: Rect) {
        let line = match self.session.saved_banner() {
            Some(banner) => Line::from(vec![
                Span::raw(self.session.state().message.clone()),
                Span::raw("  "),
                Span::styled(banner, Style::default().fg(Color::Black).bg(self.theme.success)),
            ]),
            None => Line::from(self.session.state().message.clone()),
        };
        let message = Paragraph::new(line).block(styled_block("News", &self.theme));
        frame.render_widget(message, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let skip = if self.session.can_skip() { "s skip | " } else { "" };
        let status_text = format!(
            " {} | {}Enter choose | r restart | ? help | q quit ",
            self.session.phase().name(),
            skip,
        );

        let status = Paragraph::new(status_text)
            .style(Style::default().fg(self.theme.fg).bg(Color::DarkGray));
        frame.render_widget(status, area);
    }

    fn render_share_report(&self, frame: &mut Frame) {
        let today = chrono::Local::now().date_naive();
        let Some(report) = self.session.share_report(today) else {
            return;
        };
        let mut lines = report.lines();
        lines.push(String::new());
        lines.push("Press x to close".to_string());

        let popup_area = centered_rect(46, lines.len() as u16 + 2, frame.area());
        frame.render_widget(Clear, popup_area);
        frame.render_widget(
            DramaticBox::new("Share")
                .content(lines)
                .border_color(self.theme.success),
            popup_area,
        );
    }

    fn render_help_overlay(&self, frame: &mut Frame) {
        let popup_area = centered_rect(55, 14, frame.area());
        frame.render_widget(Clear, popup_area);

        let help = Paragraph::new(HELP_TEXT)
            .style(Style::default().fg(self.theme.fg))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.accent)));
        frame.render_widget(help, popup_area);
    }
}
