use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Final standings of a completed single-elimination bracket, keyed by participant id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Placements {
    pub first: Uuid,
    pub second: Uuid,
    pub third: Option<Uuid>,
    /// Tied fourth place
    pub fourth: Vec<Uuid>,
}

impl Placements {
    /// `(participant_id, final_placement)` pairs to persist
    pub fn assignments(&self) -> Vec<(Uuid, i16)> {
        let mut assignments = vec![(self.first, 1), (self.second, 2)];
        if let Some(third) = self.third {
            assignments.push((third, 3));
        }
        assignments.extend(self.fourth.iter().map(|id| (*id, 4)));
        assignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignments_include_tied_fourth() {
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let placements = Placements {
            first: ids[0],
            second: ids[1],
            third: Some(ids[2]),
            fourth: vec![ids[3], ids[4]],
        };

        assert_eq!(
            placements.assignments(),
            vec![(ids[0], 1), (ids[1], 2), (ids[2], 3), (ids[3], 4), (ids[4], 4)]
        );
    }

    #[test]
    fn test_assignments_without_semifinals() {
        let placements = Placements {
            first: Uuid::new_v4(),
            second: Uuid::new_v4(),
            third: None,
            fourth: Vec::new(),
        };

        assert_eq!(placements.assignments().len(), 2);
    }
}
