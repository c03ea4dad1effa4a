//! Built-in character table and the user glyph library.
//!
//! Character lookup is an explicit two-tier fallback: the library's
//! override map wins, then the built-in table, then nothing. Deleting an
//! override therefore reverts to the built-in form (or removes a
//! user-created character entirely).

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path as FsPath, PathBuf};

use crate::{EngineError, Glyph, Result};

/// A character's built-in forms: one base glyph and optional alternates.
#[derive(Debug, Clone, Copy)]
pub struct GlyphFamily {
    pub base: &'static str,
    pub alternates: &'static [&'static str],
}

/// Built-in table. Codes are row-formatted for readability; the codec
/// strips the spaces.
///
/// Corner piece orientation: `L1`/`R3` top-left, `L2`/`R0` top-right,
/// `L3`/`R1` bottom-right, `L0`/`R2` bottom-left.
#[rustfmt::skip]
static BUILTIN: &[(char, GlyphFamily)] = &[
    ('A', GlyphFamily {
        base: "R3S1S1S1R0 S0E0E0E0S2 J0C1C1C1J2 S0E0E0E0S2 S0E0E0E0S2",
        alternates: &["B3S1S1S1B0 S0E0E0E0S2 J0C1C1C1J2 S0E0E0E0S2 S0E0E0E0S2"],
    }),
    ('B', GlyphFamily {
        base: "L1S1S1S1R0 S0E0E0E0S2 J0C1C1C1J2 S0E0E0E0S2 L0S3S3S3R1",
        alternates: &[],
    }),
    ('C', GlyphFamily {
        base: "R3S1S1S1S1 S0E0E0E0E0 S0E0E0E0E0 S0E0E0E0E0 R2S3S3S3S3",
        alternates: &[],
    }),
    ('D', GlyphFamily {
        base: "L1S1S1S1R0 S0E0E0E0S2 S0E0E0E0S2 S0E0E0E0S2 L0S3S3S3R1",
        alternates: &[],
    }),
    ('E', GlyphFamily {
        base: "L1S1S1S1S1 S0E0E0E0E0 J0C1C1C1E0 S0E0E0E0E0 L0S3S3S3S3",
        alternates: &[],
    }),
    ('F', GlyphFamily {
        base: "L1S1S1S1S1 S0E0E0E0E0 J0C1C1C1E0 S0E0E0E0E0 S0E0E0E0E0",
        alternates: &[],
    }),
    ('H', GlyphFamily {
        base: "S0E0E0E0S2 S0E0E0E0S2 J0C1C1C1J2 S0E0E0E0S2 S0E0E0E0S2",
        alternates: &[],
    }),
    ('I', GlyphFamily {
        base: "E0E0C0E0E0 E0E0C0E0E0 E0E0C0E0E0 E0E0C0E0E0 E0E0C0E0E0",
        alternates: &["S0E0E0E0E0 S0E0E0E0E0 S0E0E0E0E0 S0E0E0E0E0 S0E0E0E0E0"],
    }),
    ('J', GlyphFamily {
        base: "E0E0E0E0S2 E0E0E0E0S2 E0E0E0E0S2 E0E0E0E0S2 R2S3S3S3R1",
        alternates: &[],
    }),
    ('L', GlyphFamily {
        base: "S0E0E0E0E0 S0E0E0E0E0 S0E0E0E0E0 S0E0E0E0E0 L0S3S3S3S3",
        alternates: &[],
    }),
    ('N', GlyphFamily {
        base: "L1S1S1S1L2 S0E0E0E0S2 S0E0E0E0S2 S0E0E0E0S2 S0E0E0E0S2",
        alternates: &[],
    }),
    ('O', GlyphFamily {
        base: "R3S1S1S1R0 S0E0E0E0S2 S0E0E0E0S2 S0E0E0E0S2 R2S3S3S3R1",
        alternates: &["L1S1S1S1L2 S0E0E0E0S2 S0E0E0E0S2 S0E0E0E0S2 L0S3S3S3L3"],
    }),
    ('P', GlyphFamily {
        base: "L1S1S1S1R0 S0E0E0E0S2 L0S3S3S3R1 S0E0E0E0E0 S0E0E0E0E0",
        alternates: &[],
    }),
    ('T', GlyphFamily {
        base: "S1S1J1S1S1 E0E0C0E0E0 E0E0C0E0E0 E0E0C0E0E0 E0E0C0E0E0",
        alternates: &[],
    }),
    ('U', GlyphFamily {
        base: "S0E0E0E0S2 S0E0E0E0S2 S0E0E0E0S2 S0E0E0E0S2 R2S3S3S3R1",
        alternates: &[],
    }),
    ('0', GlyphFamily {
        base: "R3S1S1S1R0 S0E0E0E0S2 S0E0E0E0S2 S0E0E0E0S2 R2S3S3S3R1",
        alternates: &[],
    }),
    ('1', GlyphFamily {
        base: "E0E0C0E0E0 E0E0C0E0E0 E0E0C0E0E0 E0E0C0E0E0 E0E0C0E0E0",
        alternates: &[],
    }),
];

/// Look up a character in the built-in table.
pub fn builtin_glyph(ch: char) -> Option<&'static GlyphFamily> {
    BUILTIN.iter().find(|(c, _)| *c == ch).map(|(_, family)| family)
}

/// All characters with a built-in form, in table order.
pub fn builtin_chars() -> impl Iterator<Item = char> {
    BUILTIN.iter().map(|(ch, _)| *ch)
}

/// Which form of a character is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variant {
    Base,
    Alt(usize),
}

impl Variant {
    /// Storage key: `"base"` or the alternate index.
    pub fn key(self) -> String {
        match self {
            Variant::Base => "base".to_string(),
            Variant::Alt(index) => index.to_string(),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        if key == "base" {
            Some(Variant::Base)
        } else {
            key.parse().ok().map(Variant::Alt)
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Base => write!(f, "base"),
            Variant::Alt(index) => write!(f, "alt {index}"),
        }
    }
}

/// User-edited glyph forms layered over the built-in table.
///
/// When a storage path is set, every edit is written back immediately; a
/// missing file on load is an empty library, not an error.
#[derive(Debug, Clone, Default)]
pub struct GlyphLibrary {
    overrides: BTreeMap<char, BTreeMap<Variant, String>>,
    path: Option<PathBuf>,
}

impl GlyphLibrary {
    pub fn new() -> Self {
        GlyphLibrary::default()
    }

    /// Load the library stored at `path`, creating an empty one bound to
    /// that path when the file does not exist yet.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut library = GlyphLibrary {
            overrides: BTreeMap::new(),
            path: Some(path.clone()),
        };
        if !path.exists() {
            return Ok(library);
        }
        let text = std::fs::read_to_string(&path).map_err(|err| EngineError::ReadLibrary {
            path: path.clone(),
            message: err.to_string(),
        })?;
        let stored: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_str(&text)?;
        for (ch_key, variants) in stored {
            let Some(ch) = ch_key.chars().next() else { continue };
            for (variant_key, code) in variants {
                if let Some(variant) = Variant::from_key(&variant_key) {
                    library.overrides.entry(ch).or_default().insert(variant, code);
                } else {
                    log::warn!("skipping unknown variant key '{variant_key}' for '{ch}'");
                }
            }
        }
        Ok(library)
    }

    pub fn path(&self) -> Option<&FsPath> {
        self.path.as_deref()
    }

    /// Resolve a character form: override first, then built-in, then none.
    pub fn resolve(&self, ch: char, variant: Variant) -> Option<Cow<'_, str>> {
        if let Some(code) = self.overrides.get(&ch).and_then(|variants| variants.get(&variant)) {
            return Some(Cow::Borrowed(code.as_str()));
        }
        let family = builtin_glyph(ch)?;
        match variant {
            Variant::Base => Some(Cow::Borrowed(family.base)),
            Variant::Alt(index) => family.alternates.get(index).map(|code| Cow::Borrowed(*code)),
        }
    }

    /// Store an edited form. The code is validated before it is accepted;
    /// the library auto-saves when bound to a path.
    pub fn set_override(&mut self, ch: char, variant: Variant, code: &str) -> Result<()> {
        let glyph = Glyph::from_code(code)?;
        self.overrides.entry(ch).or_default().insert(variant, glyph.to_code());
        self.autosave()
    }

    /// Delete an edited form, reverting to the built-in definition (if
    /// any). Returns whether an override existed.
    pub fn remove_override(&mut self, ch: char, variant: Variant) -> Result<bool> {
        let mut removed = false;
        if let Some(variants) = self.overrides.get_mut(&ch) {
            removed = variants.remove(&variant).is_some();
            if variants.is_empty() {
                self.overrides.remove(&ch);
            }
        }
        if removed {
            self.autosave()?;
        }
        Ok(removed)
    }

    pub fn has_override(&self, ch: char, variant: Variant) -> bool {
        self.overrides.get(&ch).is_some_and(|variants| variants.contains_key(&variant))
    }

    /// All characters with any form available: built-in or overridden.
    pub fn chars(&self) -> Vec<char> {
        let mut chars: Vec<char> = builtin_chars().collect();
        for ch in self.overrides.keys() {
            if !chars.contains(ch) {
                chars.push(*ch);
            }
        }
        chars.sort_unstable();
        chars
    }

    /// All variants a character currently resolves for.
    pub fn variants(&self, ch: char) -> Vec<Variant> {
        let mut variants: Vec<Variant> = Vec::new();
        if let Some(family) = builtin_glyph(ch) {
            variants.push(Variant::Base);
            variants.extend((0..family.alternates.len()).map(Variant::Alt));
        }
        if let Some(overridden) = self.overrides.get(&ch) {
            for variant in overridden.keys() {
                if !variants.contains(variant) {
                    variants.push(*variant);
                }
            }
        }
        variants.sort_unstable();
        variants
    }

    /// The full resolved alphabet (overrides applied), for export.
    pub fn resolved(&self) -> BTreeMap<char, BTreeMap<String, String>> {
        let mut result = BTreeMap::new();
        for ch in self.chars() {
            let mut forms = BTreeMap::new();
            for variant in self.variants(ch) {
                if let Some(code) = self.resolve(ch, variant) {
                    forms.insert(variant.key(), code.into_owned());
                }
            }
            if !forms.is_empty() {
                result.insert(ch, forms);
            }
        }
        result
    }

    /// Write the override map to the bound path.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut stored: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (ch, variants) in &self.overrides {
            let inner = stored.entry(ch.to_string()).or_default();
            for (variant, code) in variants {
                inner.insert(variant.key(), code.clone());
            }
        }
        let text = serde_json::to_string_pretty(&stored)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| EngineError::WriteLibrary {
                path: path.clone(),
                message: err.to_string(),
            })?;
        }
        std::fs::write(path, text).map_err(|err| EngineError::WriteLibrary {
            path: path.clone(),
            message: err.to_string(),
        })
    }

    fn autosave(&self) -> Result<()> {
        self.save()
    }
}
