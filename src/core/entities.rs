use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Edge length of the only board the panes know how to draw.
pub const BOARD_SIZE: u32 = 19;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StoneColor {
    Black,
    White,
}

impl TryFrom<u8> for StoneColor {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Black),
            2 => Ok(Self::White),
            _ => Err(format!("invalid stone color {}", value)),
        }
    }
}

impl From<StoneColor> for u8 {
    fn from(color: StoneColor) -> u8 {
        match color {
            StoneColor::Black => 1,
            StoneColor::White => 2,
        }
    }
}

/// Content of one board cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Intersection {
    Empty,
    Black,
    White,
}

impl Intersection {
    pub fn stone(&self) -> Option<StoneColor> {
        match self {
            Self::Empty => None,
            Self::Black => Some(StoneColor::Black),
            Self::White => Some(StoneColor::White),
        }
    }
}

impl TryFrom<u8> for Intersection {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Empty),
            1 => Ok(Self::Black),
            2 => Ok(Self::White),
            _ => Err(format!("invalid stone value {}", value)),
        }
    }
}

impl From<Intersection> for u8 {
    fn from(value: Intersection) -> u8 {
        match value {
            Intersection::Empty => 0,
            Intersection::Black => 1,
            Intersection::White => 2,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TerritoryOwner {
    None,
    Black,
    White,
}

impl TryFrom<u8> for TerritoryOwner {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Black),
            2 => Ok(Self::White),
            _ => Err(format!("invalid territory value {}", value)),
        }
    }
}

impl From<TerritoryOwner> for u8 {
    fn from(value: TerritoryOwner) -> u8 {
        match value {
            TerritoryOwner::None => 0,
            TerritoryOwner::Black => 1,
            TerritoryOwner::White => 2,
        }
    }
}

/// Zero-based board coordinate, `x` grows to the right and `y` downwards.
/// Serialized as an `[x, y]` pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u8, u8)", into = "(u8, u8)")]
pub struct Coords {
    pub x: u8,
    pub y: u8,
}

impl Coords {
    pub fn from(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

impl From<(u8, u8)> for Coords {
    fn from((x, y): (u8, u8)) -> Self {
        Coords { x, y }
    }
}

impl From<Coords> for (u8, u8) {
    fn from(coords: Coords) -> (u8, u8) {
        (coords.x, coords.y)
    }
}

/// One immutable board snapshot as produced by the board service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    pub size: u32,
    pub seed: u32,
    pub stones: Vec<Intersection>,
    pub territory: Vec<TerritoryOwner>,
}

impl BoardState {
    #[cfg(test)]
    pub fn empty(size: u32, seed: u32) -> Self {
        let cells = (size * size) as usize;
        BoardState {
            size,
            seed,
            stones: vec![Intersection::Empty; cells],
            territory: vec![TerritoryOwner::None; cells],
        }
    }

    pub fn is_well_formed(&self) -> bool {
        let cells = (self.size as usize) * (self.size as usize);
        self.stones.len() == cells && self.territory.len() == cells
    }

    pub fn territory_counts(&self) -> TerritoryCounts {
        self.territory
            .iter()
            .fold(TerritoryCounts::default(), |mut counts, owner| {
                match owner {
                    TerritoryOwner::Black => counts.black += 1,
                    TerritoryOwner::White => counts.white += 1,
                    TerritoryOwner::None => {}
                }
                counts
            })
    }
}

/// A stone relocation reported by the leveling service.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoneMove {
    pub color: StoneColor,
    pub from: Coords,
    pub to: Coords,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    pub board: BoardState,
    pub moves: Vec<StoneMove>,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TerritoryCounts {
    pub black: usize,
    pub white: usize,
}
