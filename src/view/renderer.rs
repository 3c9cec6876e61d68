use crate::app::session::{ServiceRequest, Session, SessionAction, SessionMessage, Status};
use crate::core::errors::AppError;
use crate::core::service::BoardService;
use crate::core::theme::Theme;
use crate::level::choreographer::{AnimationPhase, Timings};
use crate::level::replay_actor::{GetPhaseMessage, Replay, ReplayActor, ResetReplay, StopReplay};
use crate::view::board::{BoardTableActor, GetTuiRowsMessage, GetTuiWidthsMessage};
use crate::view::events::{Config, Event, Events};
use actix::prelude::*;
use futures::channel::mpsc::UnboundedSender;
use log::{info, warn};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use termion::event::Key;
use termion::raw::IntoRawMode;
use termion::screen::AlternateScreen;
use tui::backend::TermionBackend;
use tui::layout::{Constraint, Direction, Layout, Rect};
use tui::style::Style;
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, Paragraph, Row, Table};
use tui::Terminal;

type SharedService = Arc<Mutex<Box<dyn BoardService + Send>>>;

struct PaneView {
    rows: Vec<Row<'static>>,
    widths: Vec<Constraint>,
}

async fn fetch_pane(pane: &Addr<BoardTableActor>) -> Result<PaneView, AppError> {
    let rows = pane
        .send(GetTuiRowsMessage {})
        .await
        .map_err(|e| AppError {
            message: format!("Can't get board rows: {}", e),
        })?;
    let widths = pane
        .send(GetTuiWidthsMessage {})
        .await
        .map_err(|e| AppError {
            message: format!("Can't get board widths: {}", e),
        })?;

    Ok(PaneView { rows, widths })
}

fn spawn_request(service: SharedService, request: ServiceRequest, tx: UnboundedSender<Event>) {
    info!("requesting {}", request_name(&request));

    tokio::task::spawn_blocking(move || {
        let response = match service.lock() {
            Ok(mut service) => match request {
                ServiceRequest::Generate(seed) => SessionMessage::Generated {
                    seed,
                    result: service.generate(seed),
                },
                ServiceRequest::Level(board) => SessionMessage::Leveled(service.level(&board)),
            },
            Err(_) => {
                let e = AppError::new("board service is unusable after a previous failure");
                match request {
                    ServiceRequest::Generate(seed) => SessionMessage::Generated {
                        seed,
                        result: Err(e),
                    },
                    ServiceRequest::Level(_) => SessionMessage::Leveled(Err(e)),
                }
            }
        };

        if tx.unbounded_send(Event::Response(response)).is_err() {
            warn!("service response dropped, the view is gone");
        }
    });
}

fn request_name(request: &ServiceRequest) -> String {
    match request {
        ServiceRequest::Generate(seed) => format!("generate {}", seed),
        ServiceRequest::Level(board) => format!("level of board {}", board.seed),
    }
}

fn status_line<'a>(session: &Session, phase: AnimationPhase, theme: &Theme) -> Spans<'a> {
    let mut spans = vec![Span::raw(
        "[g] generate  [l] level  [r] replay  [q] quit   ".to_string(),
    )];

    spans.push(Span::raw(format!("seed {}   ", session.seed())));

    if let Some(counts) = session.territory_counts() {
        spans.push(Span::raw(format!(
            "black {} / white {}   ",
            counts.black, counts.white
        )));
    }

    if phase != AnimationPhase::Idle {
        spans.push(Span::raw(format!("replay {}   ", phase.name())));
    }

    match session.status() {
        Status::Idle => {}
        Status::Loading => spans.push(Span::styled(
            " loading ".to_string(),
            Style::default()
                .fg(theme.loading_label_fg)
                .bg(theme.loading_label_bg),
        )),
        Status::Error => spans.push(Span::styled(
            format!(
                " error: {} ",
                session
                    .last_error()
                    .map(|e| e.message.as_str())
                    .unwrap_or("unknown")
            ),
            Style::default()
                .fg(theme.error_message_fg)
                .bg(theme.error_message_bg),
        )),
    }

    Spans::from(spans)
}

pub async fn render_app(
    service: Box<dyn BoardService + Send>,
    initial_seed: u32,
    tick_rate: Duration,
) -> Result<(), AppError> {
    let stdout = std::io::stdout().into_raw_mode().map_err(|_| AppError {
        message: "Can't get stdout".to_string(),
    })?;
    let stdout = AlternateScreen::from(stdout);
    let backend = TermionBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|_| AppError {
        message: "Can't get terminal".to_string(),
    })?;

    let theme = Theme::load()?;

    let generated_pane = BoardTableActor::new(&theme).start();
    let leveled_pane = BoardTableActor::new(&theme).start();
    let replay = ReplayActor::new(leveled_pane.clone().recipient(), Timings::default()).start();

    let service: SharedService = Arc::new(Mutex::new(service));
    let mut events = Events::with_config(Config { tick_rate });
    let mut session = Session::new(initial_seed);

    let mut actions = session.start();

    let board_default_style = Style::default()
        .bg(theme.board_bg_color)
        .fg(theme.text_fg_color);

    loop {
        for action in actions.drain(..) {
            match action {
                SessionAction::Request(request) => {
                    spawn_request(service.clone(), request, events.sender())
                }
                SessionAction::ResetReplay => replay.do_send(ResetReplay {}),
                SessionAction::Replay { replayable } => replay.do_send(Replay { replayable }),
                SessionAction::RefreshPanes => {
                    generated_pane.do_send(session.generated_pane());
                    leveled_pane.do_send(session.leveled_pane());
                }
            }
        }

        let generated_view = fetch_pane(&generated_pane).await?;
        let leveled_view = fetch_pane(&leveled_pane).await?;
        let phase = replay.send(GetPhaseMessage {}).await.map_err(|e| AppError {
            message: format!("Can't get replay phase: {}", e),
        })?;
        let leveled = session.is_leveled();
        let status = status_line(&session, phase, &theme);

        terminal
            .draw(|f| {
                let board_width = generated_view
                    .widths
                    .iter()
                    .map(|c| match c {
                        Constraint::Length(l) => *l,
                        _ => 0,
                    })
                    .sum::<u16>()
                    + 2;
                let board_height = generated_view.rows.len() as u16 + 2;

                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(board_height), Constraint::Length(1)].as_ref())
                    .split(Rect {
                        x: 0,
                        y: 0,
                        width: f.size().width,
                        height: f.size().height.min(board_height + 1),
                    });

                let panes = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints(
                        [
                            Constraint::Length(board_width),
                            Constraint::Length(board_width),
                            Constraint::Min(0),
                        ]
                        .as_ref(),
                    )
                    .split(rows[0]);

                let generated = Table::new(generated_view.rows.clone())
                    .block(
                        Block::default()
                            .title("generated")
                            .borders(Borders::ALL)
                            .style(board_default_style),
                    )
                    .column_spacing(0)
                    .widths(&generated_view.widths);
                f.render_widget(generated, panes[0]);

                if leveled {
                    let leveled_table = Table::new(leveled_view.rows.clone())
                        .block(
                            Block::default()
                                .title("leveled")
                                .borders(Borders::ALL)
                                .style(board_default_style),
                        )
                        .column_spacing(0)
                        .widths(&leveled_view.widths);
                    f.render_widget(leveled_table, panes[1]);
                } else {
                    let hint = Paragraph::new("not leveled yet, press [l]")
                        .block(Block::default().title("leveled").borders(Borders::ALL));
                    f.render_widget(hint, panes[1]);
                }

                f.render_widget(Paragraph::new(status), rows[1]);
            })
            .map_err(|_| AppError {
                message: "Can't draw terminal".to_string(),
            })?;

        let next_event = match events.next().await {
            Some(event) => event,
            None => break,
        };

        actions = match next_event {
            Event::Input(input) => match input {
                Key::Char('q') | Key::Ctrl('c') => break,
                Key::Char('g') => session.update(SessionMessage::Generate),
                Key::Char('l') => session.update(SessionMessage::Level),
                Key::Char('r') => session.update(SessionMessage::Replay),
                _ => vec![],
            },
            Event::Response(message) => session.update(message),
            Event::Tick => vec![],
        };
    }

    replay.send(StopReplay {}).await.map_err(|e| AppError {
        message: format!("Can't stop the replay: {}", e),
    })?;

    Ok(())
}
