//! Text cleanup for recognized page text.
//!
//! OCR output carries presentation artifacts: decomposed accents, typographic
//! ligatures, private-use glyphs, replacement characters, runs of spaces, and
//! words split by a line-end hyphen. The pipeline removes them before export.

use regex::Regex;
use std::borrow::Cow;
use unicode_normalization::UnicodeNormalization;

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPreset {
    /// Unicode NFC normalization and whitespace only
    Minimal,
    /// NFC, ligatures, replacement characters, whitespace, newline limit
    #[default]
    Standard,
    /// Everything, including private-use characters
    Aggressive,
}

/// Options for text cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Fix ligatures (fi, fl, etc.)
    pub fix_ligatures: bool,

    /// Remove Private Use Area (PUA) characters
    pub remove_pua: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Collapse runs of spaces and tabs into one space
    pub normalize_whitespace: bool,

    /// Maximum consecutive newlines (0 = unlimited)
    pub max_consecutive_newlines: u8,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        match preset {
            CleanupPreset::Minimal => Self::minimal(),
            CleanupPreset::Standard => Self::standard(),
            CleanupPreset::Aggressive => Self::aggressive(),
        }
    }

    /// Minimal cleanup options.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: false,
            remove_pua: false,
            remove_replacement_char: false,
            normalize_whitespace: true,
            max_consecutive_newlines: 0,
        }
    }

    /// Standard cleanup options.
    pub fn standard() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: true,
            remove_pua: false,
            remove_replacement_char: true,
            normalize_whitespace: true,
            max_consecutive_newlines: 2,
        }
    }

    /// Aggressive cleanup options.
    pub fn aggressive() -> Self {
        Self {
            remove_pua: true,
            max_consecutive_newlines: 1,
            ..Self::standard()
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::standard()
    }
}

const LIGATURES: [(char, &str); 7] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

/// Text cleanup pipeline.
#[derive(Debug, Clone)]
pub struct CleanupPipeline {
    options: CleanupOptions,
    spaces: Regex,
    newlines: Option<Regex>,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        let newlines = match options.max_consecutive_newlines {
            0 => None,
            max => Some(pattern(&format!(r"\n{{{},}}", max as usize + 1))),
        };
        Self {
            spaces: pattern(r"[ \t]{2,}"),
            newlines,
            options,
        }
    }

    /// Create a pipeline from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        Self::new(CleanupOptions::from_preset(preset))
    }

    /// Get the options.
    pub fn options(&self) -> &CleanupOptions {
        &self.options
    }

    /// Process text through the cleanup pipeline.
    pub fn process(&self, text: &str) -> String {
        let mut result: String = if self.options.normalize_unicode {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        if self.options.fix_ligatures {
            for (ligature, replacement) in LIGATURES {
                if result.contains(ligature) {
                    result = result.replace(ligature, replacement);
                }
            }
        }

        if self.options.remove_pua {
            result.retain(|c| !is_private_use(c));
        }

        if self.options.remove_replacement_char {
            result.retain(|c| c != '\u{FFFD}');
        }

        if self.options.normalize_whitespace {
            result = self.spaces.replace_all(&result, " ").into_owned();
            result = result
                .lines()
                .map(str::trim_end)
                .collect::<Vec<_>>()
                .join("\n");
        }

        if let Some(newlines) = &self.newlines {
            let replacement = "\n".repeat(self.options.max_consecutive_newlines as usize);
            result = newlines
                .replace_all(&result, replacement.as_str())
                .into_owned();
        }

        result.trim().to_string()
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new(CleanupOptions::default())
    }
}

fn is_private_use(c: char) -> bool {
    let code = c as u32;
    (0xE000..=0xF8FF).contains(&code)
        || (0xF0000..=0xFFFFD).contains(&code)
        || (0x100000..=0x10FFFD).contains(&code)
}

// Patterns are compile-time literals.
fn pattern(re: &str) -> Regex {
    Regex::new(re).unwrap_or_else(|e| panic!("invalid cleanup pattern {re:?}: {e}"))
}

/// Join words split by a hyphen and a space ("Wort- teil" becomes
/// "Wortteil").
///
/// Only a hyphen with a word character directly before it and a single space
/// followed by a word character is removed, so dashes between spaced words
/// and compounds such as "Nord-Süd" are left alone.
pub fn repair_hyphenation(text: &str) -> Cow<'_, str> {
    if !text.contains("- ") {
        return Cow::Borrowed(text);
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let split = chars[i] == '-'
            && i > 0
            && is_word_char(chars[i - 1])
            && chars.get(i + 1) == Some(&' ')
            && chars.get(i + 2).is_some_and(|&c| is_word_char(c));
        if split {
            i += 2;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    Cow::Owned(out)
}

/// Letters and digits in any script, plus `_`.
///
/// Not limited to ASCII: splits next to umlauts and other accented letters
/// ("Wort- über", "Straße- n") are joined as well.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
