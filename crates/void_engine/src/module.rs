use serde::{Deserialize, Serialize};

use crate::{EngineError, Result};

/// The seven geometric primitives a grid cell can hold.
///
/// Each kind is defined in a cell-local frame (origin at the cell center)
/// and can be rotated in quarter turns; see [`crate::render::draw_module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    /// No geometry; an unset cell.
    #[default]
    Empty,
    /// A vertical bar along the left cell edge, full height.
    Straight,
    /// A vertical bar centered in the cell, full height.
    Central,
    /// A vertical bar at the left edge plus a centered horizontal bar
    /// reaching the right edge ("⊢").
    Joint,
    /// An "L": vertical bar down the left edge meeting a horizontal bar
    /// along the bottom edge at the shared corner.
    Link,
    /// A wide quarter-turn: a ring sector spanning the whole cell.
    Round,
    /// A tight quarter-turn: a small ring sector hugging one corner.
    Bend,
}

/// All kinds in pen-cycling order. Also the tag order of the codec.
pub const MODULE_KINDS: [ModuleKind; 7] = [
    ModuleKind::Empty,
    ModuleKind::Straight,
    ModuleKind::Central,
    ModuleKind::Joint,
    ModuleKind::Link,
    ModuleKind::Round,
    ModuleKind::Bend,
];

impl ModuleKind {
    /// Single-character tag used in serialized glyph strings.
    pub fn tag(self) -> char {
        match self {
            ModuleKind::Empty => 'E',
            ModuleKind::Straight => 'S',
            ModuleKind::Central => 'C',
            ModuleKind::Joint => 'J',
            ModuleKind::Link => 'L',
            ModuleKind::Round => 'R',
            ModuleKind::Bend => 'B',
        }
    }

    /// Parse a tag character back into a kind.
    pub fn from_tag(tag: char) -> Result<Self> {
        match tag {
            'E' => Ok(ModuleKind::Empty),
            'S' => Ok(ModuleKind::Straight),
            'C' => Ok(ModuleKind::Central),
            'J' => Ok(ModuleKind::Joint),
            'L' => Ok(ModuleKind::Link),
            'R' => Ok(ModuleKind::Round),
            'B' => Ok(ModuleKind::Bend),
            _ => Err(EngineError::InvalidModuleTag { tag }),
        }
    }

    pub fn is_empty(self) -> bool {
        self == ModuleKind::Empty
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModuleKind::Empty => "Empty",
            ModuleKind::Straight => "Straight",
            ModuleKind::Central => "Central",
            ModuleKind::Joint => "Joint",
            ModuleKind::Link => "Link",
            ModuleKind::Round => "Round",
            ModuleKind::Bend => "Bend",
        };
        write!(f, "{name}")
    }
}

/// A rotation in quarter turns, always in `0..4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rotation(u8);

impl Rotation {
    pub fn new(quarter_turns: u8) -> Self {
        Rotation(quarter_turns % 4)
    }

    pub fn quarter_turns(self) -> u8 {
        self.0
    }

    /// Step by `delta` quarter turns, wrapping in both directions.
    pub fn stepped(self, delta: i32) -> Self {
        Rotation((i32::from(self.0) + delta).rem_euclid(4) as u8)
    }

    pub fn digit(self) -> char {
        char::from(b'0' + self.0)
    }

    pub fn from_digit(digit: char) -> Result<Self> {
        match digit {
            '0'..='3' => Ok(Rotation(digit as u8 - b'0')),
            _ => Err(EngineError::InvalidRotation { digit }),
        }
    }
}

/// One grid cell: a module kind plus its rotation.
///
/// An unset cell is simply `Module::default()` (kind `Empty`, rotation 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Module {
    pub kind: ModuleKind,
    pub rotation: Rotation,
}

impl Module {
    pub fn new(kind: ModuleKind, rotation: Rotation) -> Self {
        Module { kind, rotation }
    }

    pub fn is_empty(self) -> bool {
        self.kind.is_empty()
    }

    /// Two-character code, e.g. `S2` or `E0`.
    pub fn code(self) -> [char; 2] {
        [self.kind.tag(), self.rotation.digit()]
    }

    pub fn from_code(tag: char, digit: char) -> Result<Self> {
        Ok(Module {
            kind: ModuleKind::from_tag(tag)?,
            rotation: Rotation::from_digit(digit)?,
        })
    }
}
