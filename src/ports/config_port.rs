//! Configuration access port trait.

/// Keyed, sectioned configuration source. Values are raw strings; typing and
/// range checks live in [`crate::domain::config`].
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Section names present in the source, lowercased.
    fn sections(&self) -> Vec<String>;
}
