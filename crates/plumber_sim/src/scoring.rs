//! Chain-kill and flagpole score tables.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reward {
    Points(u32),
    ExtraLife,
}

/// Reward for kill number `index` (0-based) of an unbroken chain.
///
/// Indexes past the end of `table` pay an extra life instead of points.
pub fn chain_reward(index: usize, table: &[u32]) -> Reward {
    match table.get(index) {
        Some(points) => Reward::Points(*points),
        None => Reward::ExtraLife,
    }
}

/// Counts kills made without the player touching the floor in between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainCounter {
    index: usize,
}

impl ChainCounter {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Reward for the next kill, advancing the chain.
    pub fn next_reward(&mut self, table: &[u32]) -> Reward {
        let reward = chain_reward(self.index, table);
        self.index += 1;
        reward
    }
}

/// Flagpole score for a grab whose top edge is at `contact_y`.
///
/// Higher contact points fall into higher bands; anything above the last band
/// gets the top score.
pub fn flag_score(contact_y: f32, screen_height: f32, band_height: f32, table: &[u32]) -> u32 {
    let Some(last) = table.len().checked_sub(1) else {
        return 0;
    };
    let height = (screen_height - contact_y).max(0.0);
    let band = (height / band_height).floor() as usize;
    table[band.min(last)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CHAIN_SCORES, FLAG_SCORES};

    #[test]
    fn chain_walks_the_table_then_pays_lives() {
        let mut chain = ChainCounter::default();
        for expected in CHAIN_SCORES {
            assert_eq!(chain.next_reward(&CHAIN_SCORES), Reward::Points(expected));
        }
        assert_eq!(chain.index(), CHAIN_SCORES.len());
        assert_eq!(chain.next_reward(&CHAIN_SCORES), Reward::ExtraLife);
        assert_eq!(chain.next_reward(&CHAIN_SCORES), Reward::ExtraLife);
    }

    #[test]
    fn reset_restarts_at_the_bottom() {
        let mut chain = ChainCounter::default();
        chain.next_reward(&CHAIN_SCORES);
        chain.next_reward(&CHAIN_SCORES);
        chain.reset();
        assert_eq!(chain.next_reward(&CHAIN_SCORES), Reward::Points(100));
    }

    #[test]
    fn short_table_switches_to_lives_early() {
        let table = [100, 200, 400];
        assert_eq!(chain_reward(2, &table), Reward::Points(400));
        assert_eq!(chain_reward(3, &table), Reward::ExtraLife);
    }

    #[test]
    fn flag_bands_rise_with_contact_height() {
        // Standing on the ground row (top at 192): 48px up, second band.
        assert_eq!(flag_score(192.0, 240.0, 40.0, &FLAG_SCORES), 400);
        assert_eq!(flag_score(239.0, 240.0, 40.0, &FLAG_SCORES), 100);
        assert_eq!(flag_score(80.0, 240.0, 40.0, &FLAG_SCORES), 5000);
        assert_eq!(flag_score(-50.0, 240.0, 40.0, &FLAG_SCORES), 5000);
        assert_eq!(flag_score(300.0, 240.0, 40.0, &FLAG_SCORES), 100);
    }

    #[test]
    fn empty_flag_table_scores_nothing() {
        assert_eq!(flag_score(10.0, 240.0, 40.0, &[]), 0);
    }
}
