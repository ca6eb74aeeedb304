use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Envelope for paginated list and report responses.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub data: Vec<T>,
    pub total_elements: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> Paged<T> {
    pub fn new(data: Vec<T>, total_elements: u64, offset: u64, limit: u64) -> Self {
        Self { data, total_elements, offset, limit }
    }
}
