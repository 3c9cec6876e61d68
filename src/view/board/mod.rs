mod board_table;

pub use board_table::{
    BoardTableActor, GetTuiRowsMessage, GetTuiWidthsMessage, SetBoardsMessage,
};
