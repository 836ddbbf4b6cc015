/// Extension methods for optional string fields of custom resources.
///
/// Custom resources written by hand frequently carry `field: ""` instead of omitting the field,
/// both spellings mean "not set" for the defaulting engine.
pub trait StringOptionExt {
    /// Returns `true` if the value is [`None`] or an empty string.
    fn is_unset(&self) -> bool;

    /// Returns the value if it is set, `None` for both [`None`] and empty strings.
    fn non_empty(&self) -> Option<&str>;

    /// Replaces an unset value with the result of `default()` and returns a reference to the
    /// stored value.
    ///
    /// Compared to [`Option::get_or_insert_with`], an empty string counts as unset.
    fn fill_with(&mut self, default: impl FnOnce() -> String) -> &mut String;
}

impl StringOptionExt for Option<String> {
    fn is_unset(&self) -> bool {
        self.as_deref().is_none_or(str::is_empty)
    }

    fn non_empty(&self) -> Option<&str> {
        self.as_deref().filter(|value| !value.is_empty())
    }

    fn fill_with(&mut self, default: impl FnOnce() -> String) -> &mut String {
        if self.is_unset() {
            *self = Some(default());
        }
        self.get_or_insert_with(String::new)
    }
}
