use crate::{CELL_COUNT, EngineError, GLYPH_CODE_LEN, GRID_SIZE, Module, Result};

/// A full character form: a fixed 5×5 grid of modules.
///
/// Cells are stored row-major. Unset cells hold `Module::default()` (kind
/// `Empty`), so the grid is never partially invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Glyph {
    cells: [Module; CELL_COUNT],
}

impl Glyph {
    pub fn new() -> Self {
        Glyph::default()
    }

    /// Parse a serialized glyph.
    ///
    /// All whitespace is stripped first (editors may format codes with a
    /// space every few cells); after stripping, the code must be exactly
    /// [`GLYPH_CODE_LEN`] characters of `<tag><rotation>` pairs.
    pub fn from_code(code: &str) -> Result<Self> {
        let stripped: Vec<char> = code.chars().filter(|ch| !ch.is_whitespace()).collect();
        if stripped.len() != GLYPH_CODE_LEN {
            return Err(EngineError::InvalidGlyphLength {
                expected: GLYPH_CODE_LEN,
                actual: stripped.len(),
            });
        }

        let mut cells = [Module::default(); CELL_COUNT];
        for (i, pair) in stripped.chunks_exact(2).enumerate() {
            cells[i] = Module::from_code(pair[0], pair[1])?;
        }
        Ok(Glyph { cells })
    }

    /// Serialize to the 50-character row-major code.
    pub fn to_code(&self) -> String {
        let mut result = String::with_capacity(GLYPH_CODE_LEN);
        for cell in &self.cells {
            let [tag, digit] = cell.code();
            result.push(tag);
            result.push(digit);
        }
        result
    }

    /// Get the module at `(row, col)`; `None` when out of range.
    pub fn get(&self, row: i32, col: i32) -> Option<Module> {
        Self::index(row, col).map(|i| self.cells[i])
    }

    /// Replace the module at `(row, col)`. Out-of-range coordinates are a
    /// no-op; returns whether the cell was written.
    pub fn set(&mut self, row: i32, col: i32, module: Module) -> bool {
        if let Some(i) = Self::index(row, col) {
            self.cells[i] = module;
            true
        } else {
            false
        }
    }

    /// Clear the module at `(row, col)` (back to `Empty`).
    pub fn clear(&mut self, row: i32, col: i32) -> bool {
        self.set(row, col, Module::default())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }

    /// Iterate `(row, col, module)` over the non-empty cells.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, Module)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(i, cell)| (i / GRID_SIZE, i % GRID_SIZE, *cell))
    }

    fn index(row: i32, col: i32) -> Option<usize> {
        if (0..GRID_SIZE as i32).contains(&row) && (0..GRID_SIZE as i32).contains(&col) {
            Some(row as usize * GRID_SIZE + col as usize)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Glyph {
    /// Formats the code with a space after each row for readability.
    /// `from_code` strips the spaces again.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = self.to_code();
        let row_len = GRID_SIZE * 2;
        let mut first = true;
        for row in code.as_bytes().chunks(row_len) {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            // Codec output is pure ASCII.
            write!(f, "{}", std::str::from_utf8(row).map_err(|_| std::fmt::Error)?)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Glyph {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Glyph::from_code(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ModuleKind, Rotation};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_glyph_code() {
        let glyph = Glyph::new();
        assert_eq!(glyph.to_code(), "E0".repeat(25));
    }

    #[test]
    fn test_round_trip() {
        let mut glyph = Glyph::new();
        glyph.set(0, 0, Module::new(ModuleKind::Round, Rotation::new(3)));
        glyph.set(2, 4, Module::new(ModuleKind::Joint, Rotation::new(2)));
        glyph.set(4, 1, Module::new(ModuleKind::Bend, Rotation::new(1)));
        let code = glyph.to_code();
        assert_eq!(code.len(), GLYPH_CODE_LEN);
        assert_eq!(Glyph::from_code(&code).unwrap(), glyph);
    }

    #[test]
    fn test_whitespace_is_stripped() {
        let mut code = "E0".repeat(25);
        code.insert(10, ' ');
        code.insert(21, '\n');
        let glyph = Glyph::from_code(&code).unwrap();
        assert_eq!(glyph, Glyph::new());

        // Display output round-trips through its own formatting.
        let shown = format!("{}", glyph);
        assert!(shown.contains(' '));
        assert_eq!(Glyph::from_code(&shown).unwrap(), glyph);
    }

    #[test]
    fn test_length_guard() {
        assert!(Glyph::from_code("").is_err());
        assert!(Glyph::from_code("E0").is_err());
        assert!(Glyph::from_code(&"E0".repeat(26)).is_err());
        // 50 characters of whitespace still fail the stripped-length check.
        assert!(Glyph::from_code(&" ".repeat(50)).is_err());
    }

    #[test]
    fn test_invalid_pairs() {
        let mut code = "E0".repeat(25);
        code.replace_range(0..2, "X0");
        assert!(Glyph::from_code(&code).is_err());
        let mut code = "E0".repeat(25);
        code.replace_range(0..2, "S7");
        assert!(Glyph::from_code(&code).is_err());
    }

    #[test]
    fn test_out_of_range_access() {
        let mut glyph = Glyph::new();
        assert_eq!(glyph.get(-1, 0), None);
        assert_eq!(glyph.get(0, 5), None);
        assert!(!glyph.set(5, 5, Module::new(ModuleKind::Straight, Rotation::new(0))));
        assert_eq!(glyph, Glyph::new());
    }

    #[test]
    fn test_stamp_first_cell() {
        let mut glyph = Glyph::new();
        glyph.set(0, 0, Module::new(ModuleKind::Straight, Rotation::new(2)));
        let code = glyph.to_code();
        assert_eq!(&code[0..2], "S2");
        assert_eq!(&code[2..], "E0".repeat(24));
    }
}
