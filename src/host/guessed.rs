//! Name guesses passed between the host and installers.

use std::fmt;

/// How trustworthy a guess is. Later variants win over earlier ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GuessQuality {
    #[default]
    Invalid,
    Fallback,
    Good,
    Meta,
    Preset,
    User,
}

/// A best-guess string plus every variant proposed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuessedString {
    value: String,
    quality: GuessQuality,
    variants: Vec<String>,
}

impl GuessedString {
    pub fn new(value: impl Into<String>, quality: GuessQuality) -> Self {
        let mut guess = Self::default();
        guess.update(value, quality);
        guess
    }

    /// Offer a new guess. It becomes the value when its quality is at least
    /// the current one; it is remembered as a variant either way.
    ///
    /// Empty strings are ignored.
    pub fn update(&mut self, value: impl Into<String>, quality: GuessQuality) -> &mut Self {
        let value = value.into();
        let value = value.trim();
        if value.is_empty() {
            return self;
        }

        if !self.variants.iter().any(|v| v == value) {
            self.variants.push(value.to_string());
        }
        if quality >= self.quality {
            self.value = value.to_string();
            self.quality = quality;
        }
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn quality(&self) -> GuessQuality {
        self.quality
    }

    /// All distinct guesses, oldest first.
    pub fn variants(&self) -> &[String] {
        &self.variants
    }
}

impl fmt::Display for GuessedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_better_guess_replaces_value() {
        let mut name = GuessedString::new("FS25_LizardPack", GuessQuality::Fallback);
        name.update("Lizard Pack", GuessQuality::Good);

        assert_eq!(name.value(), "Lizard Pack");
        assert_eq!(name.quality(), GuessQuality::Good);
        assert_eq!(name.variants(), ["FS25_LizardPack", "Lizard Pack"]);
    }

    #[test]
    fn test_worse_guess_only_adds_variant() {
        let mut name = GuessedString::new("Chosen", GuessQuality::User);
        name.update("Meta Name", GuessQuality::Meta);

        assert_eq!(name.to_string(), "Chosen");
        assert_eq!(name.variants().len(), 2);
    }

    #[test]
    fn test_equal_quality_replaces_and_duplicates_are_skipped() {
        let mut name = GuessedString::new("a", GuessQuality::Good);
        name.update("b", GuessQuality::Good).update("a", GuessQuality::Good);

        assert_eq!(name.value(), "a");
        assert_eq!(name.variants(), ["a", "b"]);
    }

    #[test]
    fn test_empty_guess_is_ignored() {
        let mut name = GuessedString::new("Kept", GuessQuality::Fallback);
        name.update("   ", GuessQuality::User);
        assert_eq!(name.value(), "Kept");
        assert_eq!(name.quality(), GuessQuality::Fallback);
    }
}
