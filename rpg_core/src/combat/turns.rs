//! Turn-batch scheduling

use crate::types::Side;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

/// Attack counts for one batch of turns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnBatch {
    pub player_attacks: u32,
    pub enemy_attacks: u32,
    pub player_first: bool,
}

impl TurnBatch {
    /// Tokens in acting order; each side's attacks are contiguous
    pub fn tokens(&self) -> Vec<Side> {
        let player = std::iter::repeat(Side::Player).take(self.player_attacks as usize);
        let enemy = std::iter::repeat(Side::Enemy).take(self.enemy_attacks as usize);
        if self.player_first {
            player.chain(enemy).collect()
        } else {
            enemy.chain(player).collect()
        }
    }
}

/// Size a batch from the two agilities. The faster side gets proportionally
/// more attacks; ties go to the player.
pub fn calculate_turns(player_agility: f64, enemy_agility: f64) -> TurnBatch {
    let player = player_agility.max(1.0);
    let enemy = enemy_agility.max(1.0);
    TurnBatch {
        player_attacks: ((player / enemy).round() as u32).max(1),
        enemy_attacks: ((enemy / player).round() as u32).max(1),
        player_first: player >= enemy,
    }
}

/// Pending actions of one battle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnQueue {
    tokens: VecDeque<Side>,
}

impl TurnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_batch(&mut self, batch: &TurnBatch) {
        self.tokens.extend(batch.tokens());
    }

    pub fn pop(&mut self) -> Option<Side> {
        self.tokens.pop_front()
    }

    pub fn peek(&self) -> Option<Side> {
        self.tokens.front().copied()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.tokens.make_contiguous().shuffle(rng);
    }

    pub fn iter(&self) -> impl Iterator<Item = Side> + '_ {
        self.tokens.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_equal_agility() {
        let batch = calculate_turns(12.0, 12.0);
        assert_eq!(batch.player_attacks, 1);
        assert_eq!(batch.enemy_attacks, 1);
        assert!(batch.player_first);
        assert_eq!(batch.tokens(), vec![Side::Player, Side::Enemy]);
    }

    #[test]
    fn test_faster_enemy_batch() {
        let batch = calculate_turns(10.0, 25.0);
        assert_eq!(batch.player_attacks, 1);
        assert_eq!(batch.enemy_attacks, 3);
        assert!(!batch.player_first);
        assert_eq!(
            batch.tokens(),
            vec![Side::Enemy, Side::Enemy, Side::Enemy, Side::Player]
        );
    }

    #[test]
    fn test_agility_floor() {
        let batch = calculate_turns(0.0, -5.0);
        assert_eq!(batch.player_attacks, 1);
        assert_eq!(batch.enemy_attacks, 1);
        assert!(batch.player_first);
    }

    #[test]
    fn test_queue_order_and_shuffle_keeps_tokens() {
        let mut queue = TurnQueue::new();
        queue.push_batch(&calculate_turns(30.0, 10.0));
        assert_eq!(queue.len(), 4);
        assert_eq!(queue.peek(), Some(Side::Player));

        let mut rng = rand::rngs::mock::StepRng::new(7, 13);
        queue.shuffle(&mut rng);
        assert_eq!(queue.iter().filter(|s| *s == Side::Player).count(), 3);
        assert_eq!(queue.iter().filter(|s| *s == Side::Enemy).count(), 1);
    }

    proptest! {
        #[test]
        fn prop_turn_batch_symmetry(a in 1.0f64..500.0, b in 1.0f64..500.0) {
            prop_assume!((a - b).abs() > f64::EPSILON);
            let forward = calculate_turns(a, b);
            let reverse = calculate_turns(b, a);
            prop_assert_eq!(forward.player_attacks, reverse.enemy_attacks);
            prop_assert_eq!(forward.enemy_attacks, reverse.player_attacks);
            prop_assert_ne!(forward.player_first, reverse.player_first);
        }

        #[test]
        fn prop_equal_agility_is_one_each(x in 0.0f64..500.0) {
            let batch = calculate_turns(x, x);
            prop_assert_eq!(batch.player_attacks, 1);
            prop_assert_eq!(batch.enemy_attacks, 1);
            prop_assert!(batch.player_first);
        }
    }
}
