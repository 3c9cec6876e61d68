use crate::core::entities::{BoardState, Coords, StoneColor, StoneMove, TerritoryOwner, BOARD_SIZE};
use crate::core::helpers::index_to_coords;
use crate::level::choreographer::AnimationPhase;
use crate::level::move_index::MoveIndex;
use log::warn;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct StoneMarker {
    pub position: Coords,
    pub color: StoneColor,
    pub associated_move: Option<StoneMove>,
    pub is_transitioning: bool,
}

impl StoneMarker {
    /// Identity of the drawn element. A moved stone keeps the key of its
    /// destination through every phase so the surface can slide it instead
    /// of redrawing it.
    pub fn element_key(&self) -> Coords {
        match self.associated_move {
            Some(stone_move) => stone_move.to,
            None => self.position,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TerritoryMarker {
    pub position: Coords,
    pub owner: TerritoryOwner,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub stone_markers: Vec<StoneMarker>,
    pub territory_markers: Vec<TerritoryMarker>,
}

/// Markers for one pane. `primary` is the board the pane stands for,
/// `counterpart` the board it started from before leveling.
pub fn project(
    primary: &BoardState,
    counterpart: Option<&BoardState>,
    move_index: &MoveIndex,
    phase: AnimationPhase,
) -> Projection {
    if primary.size != BOARD_SIZE || !primary.is_well_formed() {
        warn!(
            "can't project a {}x{} board with {} stones and {} territory cells",
            primary.size,
            primary.size,
            primary.stones.len(),
            primary.territory.len()
        );
        return Projection::default();
    }

    let size = primary.size as usize;
    let replaying = phase != AnimationPhase::Idle;

    let territory_markers = primary
        .territory
        .iter()
        .enumerate()
        .filter(|(_, owner)| **owner != TerritoryOwner::None)
        .map(|(i, owner)| TerritoryMarker {
            position: index_to_coords(i, size),
            owner: *owner,
        })
        .collect();

    let stone_source = match counterpart {
        Some(before) if replaying && before.size == primary.size && before.is_well_formed() => {
            before
        }
        _ => primary,
    };

    let stone_markers = stone_source
        .stones
        .iter()
        .enumerate()
        .filter_map(|(i, value)| value.stone().map(|color| (i, color)))
        .map(|(i, color)| {
            let coords = index_to_coords(i, size);
            let associated_move = (if replaying {
                move_index.by_origin(coords)
            } else {
                move_index.by_destination(coords)
            })
            .copied();

            match associated_move {
                Some(stone_move) if phase == AnimationPhase::Animating => StoneMarker {
                    position: stone_move.from,
                    color,
                    associated_move,
                    is_transitioning: true,
                },
                _ => StoneMarker {
                    position: coords,
                    color,
                    associated_move,
                    is_transitioning: false,
                },
            }
        })
        .collect();

    Projection {
        stone_markers,
        territory_markers,
    }
}
