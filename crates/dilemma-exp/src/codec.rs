//! Identity codec: element ranks and System IDs
//!
//! Every element gets a stable decimal rank (1..n) assigned from the
//! alphabetically sorted universe, computed once per run. Team codes join
//! member ranks with `,` (members sorted by name); partition codes join
//! team codes with `_` in the order teams appear in the system result. Two
//! partitions that differ as sets of teams always get different codes.

use std::collections::HashMap;

use dilemma_common::{PartitionError, Result};

use crate::partition::Partition;
use crate::universe::Universe;

const TEAM_DELIMITER: char = ',';
const PARTITION_DELIMITER: char = '_';

/// Bijection between element names and decimal ranks
#[derive(Debug, Clone)]
pub struct IdentityCodec {
    ranks: HashMap<String, u32>,
    names: Vec<String>, // names[rank - 1]
}

impl IdentityCodec {
    /// Build the codec for a universe
    pub fn new(universe: &Universe) -> Self {
        let mut names = universe.names();
        names.sort();
        let ranks = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), (i + 1) as u32))
            .collect();
        Self { ranks, names }
    }

    /// Rank of an element, 1..n
    pub fn rank(&self, name: &str) -> Option<u32> {
        self.ranks.get(name).copied()
    }

    /// Inverse lookup
    pub fn name_of(&self, rank: u32) -> Option<&str> {
        if rank == 0 {
            return None;
        }
        self.names.get(rank as usize - 1).map(String::as_str)
    }

    /// Encode one team as comma-joined member ranks
    ///
    /// Members are sorted alphabetically before encoding, so the code is
    /// independent of the order the caller lists them in.
    pub fn encode_team(&self, members: &[String]) -> Result<String> {
        let mut sorted: Vec<&String> = members.iter().collect();
        sorted.sort();
        let ranks = sorted
            .into_iter()
            .map(|name| {
                self.rank(name)
                    .map(|r| r.to_string())
                    .ok_or_else(|| PartitionError::UnknownElement(name.clone()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ranks.join(&TEAM_DELIMITER.to_string()))
    }

    /// Encode a whole partition as underscore-joined team codes, in the
    /// order teams appear in the partition
    pub fn encode_partition(&self, partition: &Partition) -> Result<String> {
        let codes = partition
            .teams()
            .iter()
            .map(|team| self.encode_team(team.members()))
            .collect::<Result<Vec<_>>>()?;
        Ok(codes.join(&PARTITION_DELIMITER.to_string()))
    }

    /// Decode a team code back into member names
    pub fn decode_team(&self, code: &str) -> Result<Vec<String>> {
        code.split(TEAM_DELIMITER)
            .map(|part| {
                let rank: u32 = part
                    .parse()
                    .map_err(|_| PartitionError::MalformedCode(code.to_string()))?;
                self.name_of(rank)
                    .map(str::to_string)
                    .ok_or_else(|| PartitionError::MalformedCode(code.to_string()).into())
            })
            .collect()
    }

    /// Decode a partition code back into team member-name lists
    pub fn decode_partition(&self, code: &str) -> Result<Vec<Vec<String>>> {
        code.split(PARTITION_DELIMITER)
            .map(|team_code| self.decode_team(team_code))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::Team;

    fn universe() -> Universe {
        Universe::from_catalog(
            &["Tit For Tat", "Defector", "Grim Trigger", "Cooperator"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
        )
        .unwrap()
    }

    #[test]
    fn test_ranks_follow_alphabetical_order() {
        let codec = IdentityCodec::new(&universe());
        // Cooperator < Defector < Grim Trigger < Tit For Tat
        assert_eq!(codec.rank("Cooperator"), Some(1));
        assert_eq!(codec.rank("Defector"), Some(2));
        assert_eq!(codec.rank("Grim Trigger"), Some(3));
        assert_eq!(codec.rank("Tit For Tat"), Some(4));
        assert_eq!(codec.name_of(3), Some("Grim Trigger"));
        assert_eq!(codec.name_of(0), None);
        assert_eq!(codec.name_of(5), None);
    }

    #[test]
    fn test_team_code_ignores_listing_order() {
        let codec = IdentityCodec::new(&universe());
        let a = codec
            .encode_team(&["Tit For Tat".into(), "Cooperator".into()])
            .unwrap();
        let b = codec
            .encode_team(&["Cooperator".into(), "Tit For Tat".into()])
            .unwrap();
        assert_eq!(a, "1,4");
        assert_eq!(a, b);
    }

    #[test]
    fn test_partition_codes_distinguish_structures() {
        let codec = IdentityCodec::new(&universe());
        let p1 = Partition::new(vec![
            Team::new(vec!["Cooperator".into(), "Defector".into()]).unwrap(),
            Team::new(vec!["Grim Trigger".into(), "Tit For Tat".into()]).unwrap(),
        ]);
        let p2 = Partition::new(vec![
            Team::new(vec!["Cooperator".into(), "Grim Trigger".into()]).unwrap(),
            Team::new(vec!["Defector".into(), "Tit For Tat".into()]).unwrap(),
        ]);

        let c1 = codec.encode_partition(&p1).unwrap();
        let c2 = codec.encode_partition(&p2).unwrap();
        assert_eq!(c1, "1,2_3,4");
        assert_eq!(c2, "1,3_2,4");
        assert_ne!(c1, c2);
        // deterministic
        assert_eq!(codec.encode_partition(&p1).unwrap(), c1);
    }

    #[test]
    fn test_decode_round_trip() {
        let codec = IdentityCodec::new(&universe());
        let teams = codec.decode_partition("1,2_3,4").unwrap();
        assert_eq!(
            teams,
            vec![
                vec!["Cooperator".to_string(), "Defector".to_string()],
                vec!["Grim Trigger".to_string(), "Tit For Tat".to_string()],
            ]
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let codec = IdentityCodec::new(&universe());
        assert!(codec.decode_team("1,x").is_err());
        assert!(codec.decode_team("9").is_err());
    }

    #[test]
    fn test_unknown_member_rejected() {
        let codec = IdentityCodec::new(&universe());
        assert!(codec.encode_team(&["Mystery".into()]).is_err());
    }
}
