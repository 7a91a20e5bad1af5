use crate::error::{ConvertError, Result};

/// The closed class vocabulary; a name's index is its label id.
pub const VOCABULARY: [&str; 7] = [
    "arrow",
    "bus lane",
    "diamond",
    "crossing",
    "slow",
    "right arrow",
    "left arrow",
];

/// Map a class name to its label id. Matching is exact and case-sensitive.
pub fn encode(name: &str) -> Result<u32> {
    VOCABULARY
        .iter()
        .position(|&label| label == name)
        .map(|id| id as u32)
        .ok_or_else(|| ConvertError::UnknownLabel(name.to_string()))
}

/// Class name for a label id, if the id is in the vocabulary.
pub fn decode(id: u32) -> Option<&'static str> {
    VOCABULARY.get(id as usize).copied()
}
