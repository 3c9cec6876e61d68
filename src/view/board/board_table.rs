use crate::core::entities::{BoardState, Coords, StoneColor, StoneMove, TerritoryOwner, BOARD_SIZE};
use crate::core::helpers::get_column_name;
use crate::core::theme::Theme;
use crate::level::choreographer::{AnimationPhase, TRANSITION_DURATION};
use crate::level::move_index::MoveIndex;
use crate::level::projection::{project, Projection, StoneMarker};
use crate::level::replay_actor::SurfaceUpdate;
use actix::prelude::*;
use log::debug;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tui::layout::Constraint;
use tui::style::Style;
use tui::widgets::{Cell, Row};

/// A slide from wherever the stone was drawn to its new intersection.
#[derive(Debug, Copy, Clone)]
struct Motion {
    from: (f32, f32),
    to: Coords,
    started_at: Instant,
    duration: Duration,
}

impl Motion {
    fn progress(&self, now: Instant) -> f32 {
        if self.duration.as_secs_f32() <= 0.0 {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at).as_secs_f32();
        (elapsed / self.duration.as_secs_f32()).min(1.0)
    }

    fn is_done(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    fn sample(&self, now: Instant) -> (f32, f32) {
        let t = self.progress(now);
        // ease-in-out
        let eased = if t < 0.5 {
            2.0 * t * t
        } else {
            1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
        };
        let (to_x, to_y) = (self.to.x as f32, self.to.y as f32);

        (
            self.from.0 + (to_x - self.from.0) * eased,
            self.from.1 + (to_y - self.from.1) * eased,
        )
    }
}

/// One drawn stone. `position` plays the part of a DOM attribute: it is
/// only rewritten when the declared position changes or the replay moves
/// the stone explicitly.
#[derive(Debug, Clone)]
struct StoneElement {
    color: StoneColor,
    declared: Coords,
    position: Coords,
    transitioning: bool,
    motion: Option<Motion>,
}

impl StoneElement {
    fn from(marker: &StoneMarker) -> Self {
        StoneElement {
            color: marker.color,
            declared: marker.position,
            position: marker.position,
            transitioning: marker.is_transitioning,
            motion: None,
        }
    }

    fn point(&self, now: Instant) -> (f32, f32) {
        match self.motion {
            Some(motion) if !motion.is_done(now) => motion.sample(now),
            _ => (self.position.x as f32, self.position.y as f32),
        }
    }

    fn drawn_at(&self, now: Instant) -> Coords {
        let (x, y) = self.point(now);
        Coords::from(x.round() as u8, y.round() as u8)
    }

    fn move_to(&mut self, target: Coords, now: Instant, duration: Duration) {
        if target == self.position {
            return;
        }

        self.motion = if self.transitioning {
            Some(Motion {
                from: self.point(now),
                to: target,
                started_at: now,
                duration,
            })
        } else {
            None
        };
        self.position = target;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardCell {
    pub cell_text: String,
    pub cell_style: Style,
    pub stone: Option<StoneColor>,
}

impl BoardCell {
    fn new(cell_text: String, cell_style: Style, stone: Option<StoneColor>) -> Self {
        BoardCell {
            cell_text,
            cell_style,
            stone,
        }
    }

    fn spacing(style: Style) -> Self {
        BoardCell::new("".to_string(), style, None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardRow {
    pub cells: Vec<BoardCell>,
}

impl BoardRow {
    fn from(cells: Vec<BoardCell>) -> Self {
        BoardRow { cells }
    }
}

/// Draws one pane: grid, territory tints and the stone elements.
pub struct BoardTableActor {
    board_size: u8,
    number_column_size: u8,
    theme: Theme,
    star_points: HashSet<Coords>,
    grid: Vec<BoardRow>,
    primary: Option<Arc<BoardState>>,
    counterpart: Option<Arc<BoardState>>,
    move_index: MoveIndex,
    phase: AnimationPhase,
    projection: Projection,
    elements: HashMap<Coords, StoneElement>,
    transition: Duration,
}

impl Actor for BoardTableActor {
    type Context = Context<Self>;
}

pub struct SetBoardsMessage {
    pub primary: Option<Arc<BoardState>>,
    pub counterpart: Option<Arc<BoardState>>,
    pub moves: Vec<StoneMove>,
}

impl Message for SetBoardsMessage {
    type Result = ();
}

impl Handler<SetBoardsMessage> for BoardTableActor {
    type Result = ();

    fn handle(&mut self, msg: SetBoardsMessage, _: &mut Context<Self>) -> Self::Result {
        self.set_boards(msg.primary, msg.counterpart, &msg.moves, Instant::now());
    }
}

impl Handler<SurfaceUpdate> for BoardTableActor {
    type Result = ();

    fn handle(&mut self, msg: SurfaceUpdate, _: &mut Context<Self>) -> Self::Result {
        let now = Instant::now();
        match msg {
            SurfaceUpdate::Phase(phase) => self.set_phase(phase, now),
            SurfaceUpdate::ApplyDestinations => self.apply_destinations(now),
        }
    }
}

pub struct GetTuiRowsMessage {}

impl Message for GetTuiRowsMessage {
    type Result = Vec<Row<'static>>;
}

impl Handler<GetTuiRowsMessage> for BoardTableActor {
    type Result = Vec<Row<'static>>;

    fn handle(&mut self, _: GetTuiRowsMessage, _: &mut Context<Self>) -> Self::Result {
        self.refresh_ui_rows(Instant::now())
            .iter()
            .map(|board_row| {
                Row::new(
                    board_row
                        .cells
                        .iter()
                        .map(|board_cell| {
                            Cell::from(board_cell.cell_text.clone()).style(board_cell.cell_style)
                        })
                        .collect::<Vec<Cell>>(),
                )
            })
            .collect::<Vec<Row>>()
    }
}

pub struct GetTuiWidthsMessage {}

impl Message for GetTuiWidthsMessage {
    type Result = Vec<Constraint>;
}

impl Handler<GetTuiWidthsMessage> for BoardTableActor {
    type Result = Vec<Constraint>;

    fn handle(&mut self, _: GetTuiWidthsMessage, _: &mut Context<Self>) -> Self::Result {
        let mut widths: Vec<Constraint> = vec![Constraint::Length(self.number_column_size as u16)];

        for _ in 0..self.board_size {
            widths.push(Constraint::Length(1)); // padding
            widths.push(Constraint::Length(1)); // column
        }
        widths.push(Constraint::Length(1)); // spacing cell
        widths.push(Constraint::Length(self.number_column_size as u16)); // number column

        widths
    }
}

impl BoardTableActor {
    pub fn new(theme: &Theme) -> Self {
        let board_size = BOARD_SIZE as u8;

        let mut table = BoardTableActor {
            board_size,
            number_column_size: 3,
            theme: theme.clone(),
            star_points: make_star_points(board_size),
            grid: vec![],
            primary: None,
            counterpart: None,
            move_index: MoveIndex::default(),
            phase: AnimationPhase::Idle,
            projection: Projection::default(),
            elements: HashMap::new(),
            transition: TRANSITION_DURATION,
        };

        table.grid = table.make_grid();

        table
    }

    pub fn set_boards(
        &mut self,
        primary: Option<Arc<BoardState>>,
        counterpart: Option<Arc<BoardState>>,
        moves: &[StoneMove],
        now: Instant,
    ) {
        self.primary = primary;
        self.counterpart = counterpart;
        self.move_index = MoveIndex::new(moves);
        self.reconcile(now);
    }

    pub fn set_phase(&mut self, phase: AnimationPhase, now: Instant) {
        self.phase = phase;
        self.reconcile(now);
    }

    /// Sends every transitioning stone towards its destination.
    pub fn apply_destinations(&mut self, now: Instant) {
        if self.move_index.is_empty() {
            return;
        }
        let transition = self.transition;

        for marker in self.projection.stone_markers.iter() {
            if let (true, Some(stone_move)) = (marker.is_transitioning, marker.associated_move) {
                if let Some(element) = self.elements.get_mut(&marker.element_key()) {
                    element.move_to(stone_move.to, now, transition);
                }
            }
        }
    }

    /// Current position attribute of every element, by element key.
    #[cfg(test)]
    pub fn element_positions(&self) -> HashMap<Coords, Coords> {
        self.elements
            .iter()
            .map(|(key, element)| (*key, element.position))
            .collect()
    }

    #[cfg(test)]
    pub fn is_sliding(&self, now: Instant) -> bool {
        self.elements
            .values()
            .any(|element| matches!(element.motion, Some(motion) if !motion.is_done(now)))
    }

    fn reconcile(&mut self, now: Instant) {
        self.projection = match &self.primary {
            Some(primary) => project(
                primary,
                self.counterpart.as_deref(),
                &self.move_index,
                self.phase,
            ),
            None => Projection::default(),
        };

        let live: HashSet<Coords> = self
            .projection
            .stone_markers
            .iter()
            .map(StoneMarker::element_key)
            .collect();
        self.elements.retain(|key, _| live.contains(key));

        let transition = self.transition;
        for marker in self.projection.stone_markers.iter() {
            let element = self
                .elements
                .entry(marker.element_key())
                .or_insert_with(|| StoneElement::from(marker));

            element.color = marker.color;
            element.transitioning = marker.is_transitioning;
            if element.declared != marker.position {
                element.declared = marker.position;
                element.move_to(marker.position, now, transition);
            }
        }

        debug!(
            "pane reconciled in {} with {} stones and {} moves",
            self.phase.name(),
            self.elements.len(),
            self.move_index.len()
        );
    }

    fn make_grid(&self) -> Vec<BoardRow> {
        let default_style = Style::default()
            .bg(self.theme.board_bg_color)
            .fg(self.theme.text_fg_color);
        let header_style = default_style.add_modifier(self.theme.header_text_style);
        let intersection_style = default_style.fg(self.theme.intersection_color);

        let mut rows: Vec<BoardRow> = vec![self.make_header_row(header_style)];

        for y in 0..self.board_size {
            let line_nr = self.board_size - y;
            let mut cells = vec![BoardCell::new(
                format!("{: >3}", line_nr),
                header_style,
                None,
            )];

            for x in 0..self.board_size {
                if x > 0 {
                    cells.push(BoardCell::new(
                        self.theme.intersection_horiz_char.clone(),
                        intersection_style,
                        None,
                    ));
                } else {
                    cells.push(BoardCell::spacing(intersection_style));
                }

                if self.star_points.contains(&Coords::from(x, y)) {
                    cells.push(BoardCell::new(
                        self.theme.intersection_star_char.clone(),
                        intersection_style.fg(self.theme.intersection_star_color),
                        None,
                    ));
                } else {
                    cells.push(BoardCell::new(
                        self.theme.intersection_char.clone(),
                        intersection_style,
                        None,
                    ));
                }
            }

            cells.push(BoardCell::spacing(intersection_style)); // spacing cell
            cells.push(BoardCell::new(
                format!("{: <3}", line_nr),
                header_style,
                None,
            )); // number column

            rows.push(BoardRow::from(cells));
        }

        rows.push(self.make_header_row(header_style));

        rows
    }

    fn make_header_row(&self, header_style: Style) -> BoardRow {
        let mut cells: Vec<BoardCell> = vec![BoardCell::spacing(header_style)];

        for column in 0..self.board_size {
            cells.push(BoardCell::spacing(header_style));
            cells.push(BoardCell::new(
                get_column_name(column).to_string(),
                header_style,
                None,
            ));
        }
        cells.push(BoardCell::spacing(header_style)); // spacing cell
        cells.push(BoardCell::spacing(header_style)); // number column

        BoardRow::from(cells)
    }

    /// Cached grid with territory and the stones as drawn at `now`.
    pub fn refresh_ui_rows(&self, now: Instant) -> Vec<BoardRow> {
        let mut rows = self.grid.clone();

        for marker in &self.projection.territory_markers {
            let tint = match marker.owner {
                TerritoryOwner::Black => self.theme.black_territory_color,
                TerritoryOwner::White => self.theme.white_territory_color,
                TerritoryOwner::None => continue,
            };
            if let Some(cell) = self.cell_mut(&mut rows, marker.position) {
                cell.cell_style = cell.cell_style.bg(tint);
            }
        }

        // sliding stones go last so they pass over the others
        let mut elements: Vec<&StoneElement> = self.elements.values().collect();
        elements.sort_by_key(|element| element.transitioning);

        for element in elements {
            let at = element.drawn_at(now);
            if let Some(cell) = self.cell_mut(&mut rows, at) {
                let stone_color = match element.color {
                    StoneColor::Black => self.theme.black_stone_color,
                    StoneColor::White => self.theme.white_stone_color,
                };
                cell.cell_text = self.theme.stone_char.clone();
                cell.cell_style = cell.cell_style.fg(stone_color);
                cell.stone = Some(element.color);
            }
        }

        rows
    }

    fn cell_mut<'r>(&self, rows: &'r mut [BoardRow], coords: Coords) -> Option<&'r mut BoardCell> {
        if coords.x >= self.board_size || coords.y >= self.board_size {
            return None;
        }

        rows.get_mut(coords.y as usize + 1)
            .and_then(|row| row.cells.get_mut(2 + 2 * coords.x as usize))
    }
}

fn make_star_points(board_size: u8) -> HashSet<Coords> {
    let margin = if board_size >= 13 { 3u8 } else { 2u8 };
    let far = board_size - margin - 1;
    let middle = board_size / 2;

    let mut points: Vec<Coords> = vec![
        Coords::from(margin, margin),   // top left
        Coords::from(far, margin),      // top right
        Coords::from(margin, far),      // bottom left
        Coords::from(far, far),         // bottom right
        Coords::from(middle, middle),   // middle point
    ];

    if board_size >= 19 {
        points.push(Coords::from(middle, margin)); // top middle
        points.push(Coords::from(middle, far)); // bottom middle
        points.push(Coords::from(margin, middle)); // left middle
        points.push(Coords::from(far, middle)); // right middle
    }

    points.into_iter().collect()
}
