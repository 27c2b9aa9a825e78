pub mod group;
pub mod roster;
pub mod score;
pub mod student;
pub mod user;

/// Names are stored trimmed, so whitespace-only input would end up empty.
pub(crate) fn validate_name(name: &str) -> Result<(), validator::ValidationError> {
    if name.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank_name");
        err.message = Some("Name must not be blank".into());
        return Err(err);
    }
    Ok(())
}
