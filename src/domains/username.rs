use unicode_segmentation::UnicodeSegmentation;

const MAX_USERNAME_GRAPHEMES: usize = 256;

/// A username that passed the registration checks: not blank and at most
/// 256 graphemes long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn parse(name: String) -> Result<Username, String> {
        let is_empty_string = name.trim().is_empty();
        let is_too_long = name.graphemes(true).count() > MAX_USERNAME_GRAPHEMES;

        if is_empty_string {
            Err("username must not be empty".to_string())
        } else if is_too_long {
            Err(format!(
                "username must be at most {} characters",
                MAX_USERNAME_GRAPHEMES
            ))
        } else {
            Ok(Self(name))
        }
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
