use crate::core::entities::{BoardState, LevelResult, StoneMove, TerritoryCounts};
use crate::core::errors::AppError;
use crate::view::board::SetBoardsMessage;
use log::{error, info};
use std::sync::Arc;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Error,
}

#[derive(Debug)]
pub enum SessionMessage {
    Generate,
    Level,
    Replay,
    Generated {
        seed: u32,
        result: Result<BoardState, AppError>,
    },
    Leveled(Result<LevelResult, AppError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceRequest {
    Generate(u32),
    Level(BoardState),
}

/// Work the session hands back to whoever runs it.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    Request(ServiceRequest),
    ResetReplay,
    Replay { replayable: bool },
    RefreshPanes,
}

/// The generated board, its leveled counterpart and the request status.
pub struct Session {
    status: Status,
    seed: u32,
    board: Option<Arc<BoardState>>,
    leveled: Option<Arc<BoardState>>,
    moves: Vec<StoneMove>,
    last_error: Option<AppError>,
}

impl Session {
    pub fn new(initial_seed: u32) -> Self {
        Session {
            status: Status::Idle,
            seed: initial_seed,
            board: None,
            leveled: None,
            moves: vec![],
            last_error: None,
        }
    }

    pub fn start(&mut self) -> Vec<SessionAction> {
        self.status = Status::Loading;

        vec![SessionAction::Request(ServiceRequest::Generate(self.seed))]
    }

    pub fn update(&mut self, message: SessionMessage) -> Vec<SessionAction> {
        match message {
            SessionMessage::Generate => {
                if self.status == Status::Loading {
                    return vec![];
                }
                self.status = Status::Loading;

                vec![SessionAction::Request(ServiceRequest::Generate(
                    self.seed.wrapping_add(1),
                ))]
            }
            SessionMessage::Level => match (&self.board, self.status) {
                (Some(board), status) if status != Status::Loading => {
                    let request = ServiceRequest::Level(board.as_ref().clone());
                    self.status = Status::Loading;

                    vec![SessionAction::ResetReplay, SessionAction::Request(request)]
                }
                _ => vec![],
            },
            SessionMessage::Replay => vec![SessionAction::Replay {
                replayable: self.can_replay(),
            }],
            SessionMessage::Generated {
                seed,
                result: Ok(board),
            } => {
                info!("board generated with seed {}", seed);
                self.seed = seed;
                self.board = Some(Arc::new(board));
                self.leveled = None;
                self.moves = vec![];
                self.succeed();

                vec![SessionAction::ResetReplay, SessionAction::RefreshPanes]
            }
            SessionMessage::Leveled(Ok(result)) => {
                info!("board leveled with {} moves", result.moves.len());
                self.leveled = Some(Arc::new(result.board));
                self.moves = result.moves;
                self.succeed();

                vec![SessionAction::ResetReplay, SessionAction::RefreshPanes]
            }
            SessionMessage::Generated { result: Err(e), .. } => self.fail("generate", e),
            SessionMessage::Leveled(Err(e)) => self.fail("level", e),
        }
    }

    pub fn can_replay(&self) -> bool {
        self.status != Status::Loading && self.leveled.is_some() && !self.moves.is_empty()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    pub fn is_leveled(&self) -> bool {
        self.leveled.is_some()
    }

    pub fn territory_counts(&self) -> Option<TerritoryCounts> {
        self.board.as_ref().map(|board| board.territory_counts())
    }

    pub fn generated_pane(&self) -> SetBoardsMessage {
        SetBoardsMessage {
            primary: self.board.clone(),
            counterpart: None,
            moves: vec![],
        }
    }

    pub fn leveled_pane(&self) -> SetBoardsMessage {
        SetBoardsMessage {
            primary: self.leveled.clone(),
            counterpart: self.board.clone(),
            moves: self.moves.clone(),
        }
    }

    fn succeed(&mut self) {
        self.status = Status::Idle;
        self.last_error = None;
    }

    fn fail(&mut self, request: &str, e: AppError) -> Vec<SessionAction> {
        error!("{} failed: {}", request, e);
        self.status = Status::Error;
        self.last_error = Some(e);

        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entities::{Coords, Intersection, StoneColor, TerritoryOwner, BOARD_SIZE};

    fn generated(session: &mut Session, seed: u32) -> BoardState {
        let mut board = BoardState::empty(BOARD_SIZE, seed);
        board.stones[0] = Intersection::Black;
        board.territory[1] = TerritoryOwner::Black;
        session.update(SessionMessage::Generated {
            seed,
            result: Ok(board.clone()),
        });
        board
    }

    fn leveled(session: &mut Session, moves: Vec<StoneMove>) {
        session.update(SessionMessage::Level);
        session.update(SessionMessage::Leveled(Ok(LevelResult {
            board: BoardState::empty(BOARD_SIZE, 1),
            moves,
        })));
    }

    fn one_move() -> Vec<StoneMove> {
        vec![StoneMove {
            color: StoneColor::Black,
            from: Coords::from(0, 0),
            to: Coords::from(5, 5),
        }]
    }

    #[test]
    fn start_generates_the_initial_seed() {
        let mut session = Session::new(1);

        assert_eq!(
            session.start(),
            vec![SessionAction::Request(ServiceRequest::Generate(1))]
        );
        assert_eq!(session.status(), Status::Loading);
    }

    #[test]
    fn generate_asks_for_the_next_seed() {
        let mut session = Session::new(1);
        generated(&mut session, 1);

        let actions = session.update(SessionMessage::Generate);

        assert_eq!(
            actions,
            vec![SessionAction::Request(ServiceRequest::Generate(2))]
        );
        assert_eq!(session.seed(), 1);
    }

    #[test]
    fn requests_are_ignored_while_loading() {
        let mut session = Session::new(1);
        session.start();

        assert!(session.update(SessionMessage::Generate).is_empty());
        assert!(session.update(SessionMessage::Level).is_empty());
        assert_eq!(
            session.update(SessionMessage::Replay),
            vec![SessionAction::Replay { replayable: false }]
        );
    }

    #[test]
    fn new_board_clears_the_leveling_and_resets_the_replay() {
        let mut session = Session::new(1);
        generated(&mut session, 1);
        leveled(&mut session, one_move());
        assert!(session.is_leveled());

        session.update(SessionMessage::Generate);
        let actions = session.update(SessionMessage::Generated {
            seed: 2,
            result: Ok(BoardState::empty(BOARD_SIZE, 2)),
        });

        assert_eq!(
            actions,
            vec![SessionAction::ResetReplay, SessionAction::RefreshPanes]
        );
        assert_eq!(session.seed(), 2);
        assert!(!session.is_leveled());
        assert!(!session.can_replay());
    }

    #[test]
    fn level_sends_the_generated_board() {
        let mut session = Session::new(1);
        let board = generated(&mut session, 1);

        let actions = session.update(SessionMessage::Level);

        assert_eq!(
            actions,
            vec![
                SessionAction::ResetReplay,
                SessionAction::Request(ServiceRequest::Level(board))
            ]
        );
    }

    #[test]
    fn level_without_a_board_does_nothing() {
        let mut session = Session::new(1);

        assert!(session.update(SessionMessage::Level).is_empty());
    }

    #[test]
    fn replay_needs_a_leveled_board_with_moves() {
        let mut session = Session::new(1);
        generated(&mut session, 1);
        assert!(!session.can_replay());

        leveled(&mut session, vec![]);
        assert!(!session.can_replay());

        leveled(&mut session, one_move());
        assert_eq!(
            session.update(SessionMessage::Replay),
            vec![SessionAction::Replay { replayable: true }]
        );
    }

    #[test]
    fn failures_keep_the_previous_boards() {
        let mut session = Session::new(1);
        generated(&mut session, 1);
        leveled(&mut session, one_move());

        session.update(SessionMessage::Generate);
        let actions = session.update(SessionMessage::Generated {
            seed: 2,
            result: Err(AppError::new("service down")),
        });

        assert!(actions.is_empty());
        assert_eq!(session.status(), Status::Error);
        assert_eq!(session.seed(), 1);
        assert!(session.is_leveled());
        assert!(session.can_replay());
        assert_eq!(session.last_error().map(|e| e.message.as_str()), Some("service down"));

        session.update(SessionMessage::Generate);
        assert_eq!(session.status(), Status::Loading);
    }

    #[test]
    fn panes_share_the_generated_board() {
        let mut session = Session::new(1);
        generated(&mut session, 1);
        leveled(&mut session, one_move());

        let left = session.generated_pane();
        let right = session.leveled_pane();

        assert!(left.counterpart.is_none());
        assert!(left.moves.is_empty());
        assert!(Arc::ptr_eq(
            left.primary.as_ref().unwrap(),
            right.counterpart.as_ref().unwrap()
        ));
        assert_eq!(right.moves, one_move());
    }

    #[test]
    fn territory_counts_come_from_the_generated_board() {
        let mut session = Session::new(1);
        assert_eq!(session.territory_counts(), None);

        generated(&mut session, 1);

        assert_eq!(
            session.territory_counts(),
            Some(TerritoryCounts { black: 1, white: 0 })
        );
    }
}
