//! Logical ID generation
//!
//! CloudFormation logical IDs must be alphanumeric and at most 255 characters.

use stackflow_cloud::{CloudError, Result};

const MAX_LOGICAL_ID_LEN: usize = 255;

/// Join the parts and drop everything that is not ASCII alphanumeric
pub fn logical_id(parts: &[&str]) -> Result<String> {
    let id: String = parts
        .iter()
        .flat_map(|p| p.chars())
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    if id.is_empty() {
        return Err(CloudError::InvalidConfig(format!(
            "logical ID is empty after sanitizing: {:?}",
            parts
        )));
    }
    if id.len() > MAX_LOGICAL_ID_LEN {
        return Err(CloudError::InvalidConfig(format!(
            "logical ID exceeds {} characters: {}",
            MAX_LOGICAL_ID_LEN, id
        )));
    }
    Ok(id)
}
