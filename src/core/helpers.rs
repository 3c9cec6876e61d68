use super::errors::AppError;
use crate::core::entities::Coords;
use read_color::rgb;
use tui::style::Color;

/// Row-major cell index to board coordinate.
pub fn index_to_coords(index: usize, size: usize) -> Coords {
    Coords::from((index % size) as u8, (index / size) as u8)
}

#[cfg(test)]
pub fn coords_to_index(coords: Coords, size: usize) -> usize {
    coords.y as usize * size + coords.x as usize
}

/// Column label for a zero-based column, the letter I is never used.
pub fn get_column_name(col: u8) -> char {
    let add = if col >= 8 { 1 } else { 0 };
    (65u8 + col + add) as char
}

pub fn parse_color(text: &str) -> Result<Color, AppError> {
    if let Some(hex) = text.strip_prefix('#') {
        let mut chars = hex.chars();

        return match rgb(&mut chars) {
            Some([r, g, b]) => Ok(Color::Rgb(r, g, b)),
            None => Err(AppError {
                message: format!("Can't parse hex color {}", text),
            }),
        };
    }

    Err(AppError {
        message: format!("Can't parse color {}", text),
    })
}
