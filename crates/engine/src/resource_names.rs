use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceNameError {
    #[error("resource name must not be empty")]
    Empty,
    #[error("resource name must not start with '/'")]
    LeadingSlash,
    #[error("resource name must not contain '\\\\'")]
    Backslash,
    #[error("resource name must not contain '..'")]
    ParentTraversal,
    #[error("resource name contains control character {character:?}")]
    ControlCharacter { character: char },
}

/// Names in configs and scenes are joined onto resource directories, so they
/// must stay inside them. Spaces and mixed case are fine.
pub(crate) fn validate_resource_name(name: &str) -> Result<(), ResourceNameError> {
    if name.is_empty() {
        return Err(ResourceNameError::Empty);
    }
    if name.starts_with('/') {
        return Err(ResourceNameError::LeadingSlash);
    }
    if name.contains('\\') {
        return Err(ResourceNameError::Backslash);
    }
    if name.contains("..") {
        return Err(ResourceNameError::ParentTraversal);
    }
    if let Some(character) = name.chars().find(|ch| ch.is_control()) {
        return Err(ResourceNameError::ControlCharacter { character });
    }
    Ok(())
}
