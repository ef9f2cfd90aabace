// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Friend-challenge leaderboard ranking.

use crate::models::{LeaderboardEntry, Participant};

/// Rank participants by steps, highest first.
///
/// Equal step counts share a rank and the next rank skips the tied
/// positions (1, 1, 3). The sort is stable, so tied participants are listed
/// in input order.
pub fn rank_participants(participants: &[Participant], target_steps: u64) -> Vec<LeaderboardEntry> {
    let mut ordered: Vec<&Participant> = participants.iter().collect();
    ordered.sort_by(|a, b| b.steps.cmp(&a.steps));

    let mut board: Vec<LeaderboardEntry> = Vec::with_capacity(ordered.len());
    for (i, p) in ordered.into_iter().enumerate() {
        let rank = match board.last() {
            Some(prev) if prev.steps == p.steps => prev.rank,
            _ => (i + 1) as u32,
        };
        board.push(LeaderboardEntry {
            rank,
            participant_id: p.id.clone(),
            name: p.name.clone(),
            steps: p.steps,
            goal_reached: p.goal_reached(target_steps),
        });
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participants(steps: &[u64]) -> Vec<Participant> {
        steps
            .iter()
            .enumerate()
            .map(|(i, s)| Participant {
                id: format!("p{}", i),
                name: format!("Player {}", i),
                steps: *s,
            })
            .collect()
    }

    #[test]
    fn test_ranks_descending_with_stable_ties() {
        let board = rank_participants(&participants(&[80, 95, 95, 10]), 90);

        let ids: Vec<&str> = board.iter().map(|e| e.participant_id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p0", "p3"]);
        let ranks: Vec<u32> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3, 4]);

        let goals: Vec<bool> = board.iter().map(|e| e.goal_reached).collect();
        assert_eq!(goals, vec![true, true, false, false]);
    }

    #[test]
    fn test_tied_steps_share_rank_by_input_order() {
        let input = participants(&[80, 95, 95, 10]);
        let board = rank_participants(&input, 90);

        let by_input: Vec<u32> = input
            .iter()
            .map(|p| {
                board
                    .iter()
                    .find(|e| e.participant_id == p.id)
                    .map(|e| e.rank)
                    .unwrap()
            })
            .collect();
        assert_eq!(by_input, vec![3, 1, 1, 4]);
    }

    #[test]
    fn test_rank_skips_after_tie() {
        let board = rank_participants(&participants(&[50, 50, 50, 20, 20, 5]), 100);
        let ranks: Vec<u32> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 1, 1, 4, 4, 6]);
    }

    #[test]
    fn test_more_steps_never_ranks_worse() {
        let board = rank_participants(&participants(&[5, 300, 42, 300, 0, 42, 7]), 100);
        for a in &board {
            for b in &board {
                if a.steps > b.steps {
                    assert!(a.rank < b.rank, "{:?} should outrank {:?}", a, b);
                }
                if a.steps == b.steps {
                    assert_eq!(a.rank, b.rank);
                }
            }
        }
    }

    #[test]
    fn test_empty() {
        assert!(rank_participants(&[], 100).is_empty());
    }
}
