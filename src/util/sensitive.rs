use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{Debug, Display};

/// Keeps raw sensitive data (passwords, signing secrets) in memory while
/// making sure it cannot be accidentally leaked through the console or logs.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: AsRef<str>> Sensitive<T> {
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

impl<T> Debug for Sensitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("<hidden>").finish()
    }
}

impl<T> Display for Sensitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("<hidden>").finish()
    }
}

impl<T> AsRef<T> for Sensitive<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl AsRef<str> for Sensitive<String> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<'a, T: AsRef<str> + 'a> From<&'a Sensitive<T>> for Cow<'a, str> {
    fn from(value: &'a Sensitive<T>) -> Self {
        Cow::Borrowed(value.0.as_ref())
    }
}

// Lets `#[validate(length(..))]` see through the wrapper.
impl validator::HasLen for &Sensitive<String> {
    fn length(&self) -> u64 {
        self.0.chars().count() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::Sensitive;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Sensitive<String>: Send, Sync, Clone);

    #[test]
    fn hides_value_from_debug_and_display() {
        let secret = Sensitive::new(String::from("hunter2"));
        assert_eq!(format!("{secret:?}"), "<hidden>");
        assert_eq!(format!("{secret}"), "<hidden>");
    }

    #[test]
    fn serializes_transparently() {
        let secret = Sensitive::new(String::from("hunter2"));
        assert_eq!(
            serde_json::to_string(&secret).expect("should serialize"),
            r#""hunter2""#
        );

        let parsed: Sensitive<String> =
            serde_json::from_str(r#""hunter2""#).expect("should deserialize");
        assert_eq!(parsed.as_str(), "hunter2");
    }
}
