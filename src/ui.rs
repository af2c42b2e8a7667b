//! Layout and drawing: stage, falling block, sidebar, and the ready/pause/confirm/game-over overlays.

use crate::game::{Game, SessionState};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Each stone is two terminal columns wide so cells look square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 24;
/// Duration of the game-over fade (TachyonFX) in ms.
const GAME_OVER_FADE_MS: u32 = 600;

/// Board size in terminal cells including the border.
fn board_outer_size(game: &Game) -> (u16, u16) {
    let stage = game.stage();
    (
        stage.width() as u16 * CELL_WIDTH + 2,
        stage.height() as u16 + 2,
    )
}

/// Draw the whole screen. Once the game is over the board fades out via
/// `game_over_effect`, which is created lazily and advanced by the time since
/// `effect_time`.
pub fn draw(
    frame: &mut Frame,
    game: &Game,
    theme: &Theme,
    confirming: bool,
    game_over_effect: &mut Option<Effect>,
    effect_time: &mut Option<Instant>,
    now: Instant,
) {
    let area = frame.area();
    let (board_w, board_h) = board_outer_size(game);
    let total_w = board_w + SIDEBAR_WIDTH;

    // Center horizontally
    let horiz_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);

    // Center vertically
    let vert_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(board_h),
            Constraint::Fill(1),
        ])
        .split(horiz_chunks[1]);

    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_w), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert_chunks[1]);
    let (board_area, sidebar_area) = (inner[0], inner[1]);

    let faded = game.state() == SessionState::End
        && game_over_effect.as_ref().is_some_and(|e| e.done());
    let board_rect = draw_board(frame, game, theme, board_area, faded);
    draw_sidebar(frame, game, theme, sidebar_area);

    if game.state() == SessionState::End && !faded {
        apply_game_over_effect(frame, theme, board_rect, game_over_effect, effect_time, now);
    }

    if confirming {
        draw_overlay(
            frame,
            theme,
            board_area,
            " Start over? ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
            vec!["Current game will be lost".to_string(), String::new(), "Y  Yes    N  No".to_string()],
        );
        return;
    }
    match game.state() {
        SessionState::Ready => draw_overlay(
            frame,
            theme,
            board_area,
            " blocktris ",
            Style::default().fg(Color::Black).bg(theme.title),
            vec!["S  Start".to_string(), "Q  Quit".to_string()],
        ),
        SessionState::Paused => draw_overlay(
            frame,
            theme,
            board_area,
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
            vec!["R  Resume".to_string(), "S  New game".to_string()],
        ),
        SessionState::End => draw_overlay(
            frame,
            theme,
            board_area,
            " Game Over ",
            Style::default().fg(Color::White).bg(Color::Red),
            vec![
                format!("Score: {}", game.score()),
                format!("Level: {}", game.level()),
                String::new(),
                "S  New game".to_string(),
                "Q  Quit".to_string(),
            ],
        ),
        SessionState::Active => {}
    }
}

/// Border, settled stones, then the falling block on top. Returns the inner board rect.
fn draw_board(frame: &mut Frame, game: &Game, theme: &Theme, area: Rect, faded: bool) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" blocktris ", theme.title));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let buf = frame.buffer_mut();
    for y in inner.y..inner.y + inner.height {
        for x in inner.x..inner.x + inner.width {
            buf[(x, y)].set_symbol(" ").set_style(Style::default().bg(theme.bg));
        }
    }

    let mut paint = |x: usize, y: usize, color: Color| {
        let rx = inner.x + x as u16 * CELL_WIDTH;
        let ry = inner.y + y as u16;
        if ry >= inner.y + inner.height {
            return;
        }
        for dx in 0..CELL_WIDTH {
            if rx + dx < inner.x + inner.width {
                buf[(rx + dx, ry)]
                    .set_symbol("█")
                    .set_style(Style::default().fg(color).bg(theme.bg));
            }
        }
    };
    let tint = |token| {
        if faded {
            theme.inactive_fg
        } else {
            theme.stone_color(token)
        }
    };
    game.stage().each_stone(|x, y, token| paint(x, y, tint(token)));
    if let Some(block) = game.block() {
        block.each_stone(|x, y, token| paint(x, y, tint(token)));
    }
    inner
}

/// Create or advance the game-over fade (TachyonFX: stones fade to the inactive colour).
fn apply_game_over_effect(
    frame: &mut Frame,
    theme: &Theme,
    board_rect: Rect,
    game_over_effect: &mut Option<Effect>,
    effect_time: &mut Option<Instant>,
    now: Instant,
) {
    let delta = effect_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    *effect_time = Some(now);

    let effect = game_over_effect.get_or_insert_with(|| {
        fx::fade_to(
            theme.inactive_fg,
            theme.bg,
            (GAME_OVER_FADE_MS, Interpolation::Linear),
        )
        .with_area(board_rect)
    });
    frame.render_effect(effect, board_rect, TfxDuration::from_millis(delta_ms));
}

fn draw_sidebar(frame: &mut Frame, game: &Game, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let help_style = Style::default().fg(theme.inactive_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Stats (border + score, level, speed, state)
            Constraint::Length(1), // gap
            Constraint::Length(9), // Controls
        ])
        .split(area);

    let stat = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, title_style),
            Span::styled(value, fg_style),
        ])
    };
    let stats_lines = vec![
        stat("Score: ", game.score().to_string()),
        stat("Level: ", game.level().to_string()),
        stat("Speed: ", format!("{}ms", game.interval().as_millis())),
        stat("State: ", game.state().label().to_string()),
    ];
    Paragraph::new(stats_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .render(chunks[0], frame.buffer_mut());

    let help = [
        "←/J  Move left",
        "→/L  Move right",
        "↑/I  Rotate",
        "↓/K  Soft drop",
        "P    Pause",
        "R    Resume",
        "S    New game",
    ];
    Paragraph::new(
        help.iter()
            .map(|h| Line::from(Span::styled(*h, help_style)))
            .collect::<Vec<_>>(),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(" Controls ", title_style)),
    )
    .render(chunks[2], frame.buffer_mut());
}

/// Centered popup over the board with a highlighted title line.
fn draw_overlay(
    frame: &mut Frame,
    theme: &Theme,
    area: Rect,
    title: &str,
    title_style: Style,
    body: Vec<String>,
) {
    let popup_w = (CELL_WIDTH * 10).max(24).min(area.width);
    let popup_h = (body.len() as u16 + 4).min(area.height);
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w,
        height: popup_h,
    };
    let mut lines = vec![
        Line::from(Span::styled(title.to_string(), title_style.add_modifier(Modifier::BOLD))),
        Line::from(""),
    ];
    lines.extend(
        body.into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.main_fg)))),
    );
    frame.render_widget(Clear, popup);
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .style(Style::default().bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}
