use indexmap::IndexMap;

use crate::{Identity, Participant, Score};

/// A single row of a ranking query.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedEntry {
    /// Participant identity.
    pub identity: Identity,
    /// Username at the time of the query.
    pub username: String,
    /// Score at the time of the query.
    pub score: Score,
}

/// Rank the given participant table and return the top `n` rows.
///
/// Rows are ordered by score descending; equal scores keep their relative
/// participant-index positions, so among ties the earlier index ranks
/// higher. The ordering is total and reproducible for a given table; it does
/// not depend on identity values or update recency.
pub(crate) fn rank_top_n(
    participants: &IndexMap<Identity, Participant>,
    n: usize,
) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = participants
        .iter()
        .map(|(identity, participant)| RankedEntry {
            identity: *identity,
            username: participant.username().to_owned(),
            score: participant.score(),
        })
        .collect();
    // sort_by is stable, so index order decides ties.
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(byte: u8) -> Identity {
        Identity::new([byte; 32])
    }

    fn table(rows: &[(u8, &str, u64)]) -> IndexMap<Identity, Participant> {
        rows.iter()
            .map(|(byte, username, score)| {
                (
                    identity(*byte),
                    Participant::new((*username).to_owned(), Score::from(*score), 0),
                )
            })
            .collect()
    }

    #[test]
    fn orders_by_score_descending() {
        let participants = table(&[(1, "alice", 100), (2, "bob", 300), (3, "carol", 200)]);
        let ranked = rank_top_n(&participants, 3);
        let scores: Vec<u64> = ranked.iter().map(|e| e.score.to::<u64>()).collect();
        assert_eq!(scores, vec![300, 200, 100]);
    }

    #[test]
    fn ties_keep_index_order() {
        let participants = table(&[(9, "first", 50), (2, "second", 50), (5, "third", 50)]);
        let ranked = rank_top_n(&participants, 3);
        let names: Vec<&str> = ranked.iter().map(|e| e.username.as_str()).collect();
        // Identity values must not decide ties; the insertion position does.
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn zero_n_returns_nothing() {
        let participants = table(&[(1, "alice", 100)]);
        assert!(rank_top_n(&participants, 0).is_empty());
    }

    #[test]
    fn oversized_n_returns_all_rows() {
        let participants = table(&[(1, "alice", 100), (2, "bob", 200)]);
        let ranked = rank_top_n(&participants, 1_000);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].username, "bob");
    }

    #[test]
    fn empty_table_ranks_empty() {
        assert!(rank_top_n(&IndexMap::new(), 10).is_empty());
    }
}
