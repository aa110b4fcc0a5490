use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub routine_id: String,
    pub position: i64,
    pub name: String,
    pub sets: i64,
    pub reps: i64,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateExerciseRequest {
    pub name: String,
    pub sets: i64,
    pub reps: i64,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

/// Partial update. For `weight` and `notes` an absent field keeps the current
/// value while an explicit `null` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateExerciseRequest {
    pub name: Option<String>,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub weight: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trims notes; blank notes are stored as none.
pub(crate) fn clean_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

impl Exercise {
    pub fn apply(&mut self, update: UpdateExerciseRequest) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(sets) = update.sets {
            self.sets = sets;
        }
        if let Some(reps) = update.reps {
            self.reps = reps;
        }
        if let Some(weight) = update.weight {
            self.weight = weight;
        }
        if let Some(notes) = update.notes {
            self.notes = clean_notes(notes);
        }
    }
}
