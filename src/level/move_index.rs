use crate::core::entities::{Coords, StoneMove};
use log::debug;
use std::collections::HashMap;

/// Moves looked up from both ends: where a stone started and where it ended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveIndex {
    by_origin: HashMap<Coords, StoneMove>,
    by_destination: HashMap<Coords, StoneMove>,
}

impl MoveIndex {
    /// Later moves overwrite earlier ones sharing an origin or destination.
    pub fn new(moves: &[StoneMove]) -> Self {
        let mut index = MoveIndex::default();

        for stone_move in moves {
            if index.by_origin.insert(stone_move.from, *stone_move).is_some() {
                debug!("duplicate move origin {:?}", stone_move.from);
            }
            if index.by_destination.insert(stone_move.to, *stone_move).is_some() {
                debug!("duplicate move destination {:?}", stone_move.to);
            }
        }

        index
    }

    pub fn by_origin(&self, coords: Coords) -> Option<&StoneMove> {
        self.by_origin.get(&coords)
    }

    pub fn by_destination(&self, coords: Coords) -> Option<&StoneMove> {
        self.by_destination.get(&coords)
    }

    pub fn is_empty(&self) -> bool {
        self.by_origin.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_origin.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entities::StoneColor;

    fn mv(color: StoneColor, from: (u8, u8), to: (u8, u8)) -> StoneMove {
        StoneMove {
            color,
            from: from.into(),
            to: to.into(),
        }
    }

    #[test]
    fn empty_move_list_gives_empty_lookups() {
        let index = MoveIndex::new(&[]);

        assert!(index.is_empty());
        assert_eq!(index.by_origin(Coords::from(0, 0)), None);
        assert_eq!(index.by_destination(Coords::from(0, 0)), None);
    }

    #[test]
    fn origin_and_destination_lookups_are_inverse() {
        let moves = vec![
            mv(StoneColor::Black, (0, 0), (5, 5)),
            mv(StoneColor::White, (3, 4), (3, 5)),
            mv(StoneColor::Black, (5, 5), (6, 6)),
        ];
        let index = MoveIndex::new(&moves);

        assert_eq!(index.len(), 3);
        for stone_move in &moves {
            let found = index.by_origin(stone_move.from).unwrap();
            assert_eq!(index.by_destination(found.to), Some(stone_move));

            let found = index.by_destination(stone_move.to).unwrap();
            assert_eq!(index.by_origin(found.from), Some(stone_move));
        }
    }

    #[test]
    fn a_cell_can_be_origin_of_one_move_and_destination_of_another() {
        let first = mv(StoneColor::Black, (0, 0), (5, 5));
        let second = mv(StoneColor::Black, (5, 5), (6, 6));
        let index = MoveIndex::new(&[first, second]);

        assert_eq!(index.by_destination(Coords::from(5, 5)), Some(&first));
        assert_eq!(index.by_origin(Coords::from(5, 5)), Some(&second));
    }

    #[test]
    fn duplicate_keys_keep_the_last_move() {
        let first = mv(StoneColor::Black, (1, 1), (2, 2));
        let second = mv(StoneColor::White, (1, 1), (3, 3));
        let index = MoveIndex::new(&[first, second]);

        assert_eq!(index.by_origin(Coords::from(1, 1)), Some(&second));
        assert_eq!(index.by_destination(Coords::from(2, 2)), Some(&first));
        assert_eq!(index.by_destination(Coords::from(3, 3)), Some(&second));
    }
}
