use thiserror::Error;

/// Per-atom data layout selected by the `levcfg` header flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    Positions,
    PositionsVelocities,
    PositionsVelocitiesForces,
}

impl RecordLayout {
    /// Maps a `levcfg` value to its layout, or `None` outside `0..=2`.
    pub fn from_levcfg(levcfg: u32) -> Option<Self> {
        match levcfg {
            0 => Some(Self::Positions),
            1 => Some(Self::PositionsVelocities),
            2 => Some(Self::PositionsVelocitiesForces),
            _ => None,
        }
    }

    pub fn levcfg(&self) -> u32 {
        match self {
            Self::Positions => 0,
            Self::PositionsVelocities => 1,
            Self::PositionsVelocitiesForces => 2,
        }
    }

    /// Number of three-component data lines following each atom header line.
    pub fn data_lines(&self) -> usize {
        self.levcfg() as usize + 1
    }

    /// Number of values written per atom line.
    pub fn n_items(&self) -> usize {
        self.data_lines() * 3
    }

    /// The extended-XYZ `Properties=` column descriptor.
    pub fn properties(&self) -> &'static str {
        match self {
            Self::Positions => "species:S:1:pos:R:3",
            Self::PositionsVelocities => "species:S:1:pos:R:3:vel:R:3",
            Self::PositionsVelocitiesForces => "species:S:1:pos:R:3:vel:R:3:forces:R:3",
        }
    }
}

/// Periodic boundary type selected by the `imcon` header flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    None,
    Slab,
    Periodic,
}

impl CellKind {
    /// `0` has no cell, `6` is a slab periodic in x and y, every other value
    /// is fully periodic.
    pub fn from_imcon(imcon: u32) -> Self {
        match imcon {
            0 => Self::None,
            6 => Self::Slab,
            _ => Self::Periodic,
        }
    }

    /// Whether each frame header is followed by three lattice-vector lines.
    pub fn has_lattice(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// The extended-XYZ `pbc=` attribute, absent for non-periodic systems.
    pub fn pbc(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Slab => Some("pbc=\"T T F\""),
            Self::Periodic => Some("pbc=\"T T T\""),
        }
    }
}

/// Values of the second HISTORY header line that drive the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryHeader {
    pub layout: RecordLayout,
    pub cell: CellKind,
    pub n_atoms: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("expected at least 3 integers (levcfg imcon natoms), found {found}")]
    MissingFields { found: usize },
    #[error("invalid integer '{value}' for {field}")]
    InvalidInt { field: &'static str, value: String },
    #[error("unsupported levcfg {0} (expected 0, 1 or 2)")]
    UnsupportedLevcfg(u32),
}

impl HistoryHeader {
    /// Parses the second HISTORY header line.
    ///
    /// # Arguments
    ///
    /// * `line` - The raw header line, `levcfg imcon natoms [...]`.
    ///
    /// # Return
    ///
    /// Returns the parsed header. Tokens beyond the third are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError`] if fewer than three tokens are present, a
    /// token is not an unsigned integer, or `levcfg` is not 0, 1 or 2.
    pub fn parse(line: &str) -> Result<Self, HeaderError> {
        let tokens: Vec<&str> = line.split_whitespace().take(3).collect();
        if tokens.len() < 3 {
            return Err(HeaderError::MissingFields {
                found: tokens.len(),
            });
        }

        let levcfg = parse_field(tokens[0], "levcfg")?;
        let imcon = parse_field(tokens[1], "imcon")?;
        let n_atoms = parse_field(tokens[2], "natoms")? as usize;

        let layout =
            RecordLayout::from_levcfg(levcfg).ok_or(HeaderError::UnsupportedLevcfg(levcfg))?;

        Ok(Self {
            layout,
            cell: CellKind::from_imcon(imcon),
            n_atoms,
        })
    }
}

fn parse_field(token: &str, field: &'static str) -> Result<u32, HeaderError> {
    token.parse().map_err(|_| HeaderError::InvalidInt {
        field,
        value: token.to_string(),
    })
}

/// Returns `true` if the record opens a new frame.
pub fn is_frame_marker(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|token| token.eq_ignore_ascii_case("timestep"))
}
