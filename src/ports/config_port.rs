//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Whether `section` exists, even if empty.
    fn has_section(&self, section: &str) -> bool;

    /// Section names in declaration order.
    fn sections(&self) -> Vec<String>;

    /// Key/value pairs of a section in declaration order. Keys without a
    /// value are omitted.
    fn entries(&self, section: &str) -> Vec<(String, String)>;
}
