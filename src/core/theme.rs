use super::errors::AppError;
use crate::core::helpers::parse_color;
use tui::style::{Color, Modifier};

#[derive(Debug, Clone)]
pub struct Theme {
    pub board_bg_color: Color,
    pub text_fg_color: Color,
    pub header_text_style: Modifier,
    pub intersection_char: String,
    pub intersection_star_char: String,
    pub intersection_star_color: Color,
    pub intersection_horiz_char: String,
    pub intersection_color: Color,
    pub stone_char: String,
    pub white_stone_color: Color,
    pub black_stone_color: Color,
    pub black_territory_color: Color,
    pub white_territory_color: Color,
    pub error_message_fg: Color,
    pub error_message_bg: Color,
    pub loading_label_fg: Color,
    pub loading_label_bg: Color,
}

impl Theme {
    pub fn load() -> Result<Self, AppError> {
        Ok(Theme {
            board_bg_color: parse_color("#af9769")?,
            text_fg_color: parse_color("#1c1f25")?,
            header_text_style: Modifier::BOLD,
            intersection_char: "┼".to_string(),
            intersection_star_char: "╋".to_string(),
            intersection_star_color: parse_color("#7d6c4b")?,
            intersection_horiz_char: "─".to_string(),
            intersection_color: parse_color("#7d6c4b")?,
            stone_char: "●".to_string(),
            white_stone_color: parse_color("#FFFFFF")?,
            black_stone_color: parse_color("#000000")?,
            black_territory_color: parse_color("#6e6450")?,
            white_territory_color: parse_color("#e8dcc0")?,
            error_message_fg: parse_color("#FFFFFF")?,
            error_message_bg: parse_color("#FF0000")?,
            loading_label_fg: parse_color("#FFFFFF")?,
            loading_label_bg: parse_color("#00a000")?,
        })
    }
}
