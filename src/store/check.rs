use crate::value::Preferences;

/// Validation hook run before any static mapping is accepted.
///
/// Implement this to layer domain rules over a store. Returning `Err(message)`
/// rejects the mapping with `PrefError::Validation(message)` before any write.
pub trait PreferenceCheck: Send + Sync {
    /// Checks a candidate static mapping.
    ///
    /// # Errors
    /// Returns the message to report when the mapping is rejected.
    fn check_preferences(&self, preferences: &Preferences) -> Result<(), String>;
}

/// Accepts every mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl PreferenceCheck for AcceptAll {
    fn check_preferences(&self, _preferences: &Preferences) -> Result<(), String> {
        Ok(())
    }
}

impl<F> PreferenceCheck for F
where
    F: Fn(&Preferences) -> Result<(), String> + Send + Sync,
{
    fn check_preferences(&self, preferences: &Preferences) -> Result<(), String> {
        self(preferences)
    }
}
