use super::history::{CellKind, RecordLayout};
use std::fmt::Write;

/// Cell vectors of one frame, one lattice vector per row.
pub type Lattice = [[f64; 3]; 3];

/// Formats frame comment lines and atom lines of an extended XYZ stream.
///
/// The `Properties=` and `pbc=` attributes depend only on the stream header,
/// so they are composed once and reused for every frame.
#[derive(Debug, Clone)]
pub struct ExtXyzFormatter {
    suffix: String,
}

impl ExtXyzFormatter {
    /// Creates a formatter for a stream with the given atom layout and cell.
    pub fn new(layout: RecordLayout, cell: CellKind) -> Self {
        let mut suffix = format!("Properties={}", layout.properties());
        if let Some(pbc) = cell.pbc() {
            suffix.push(' ');
            suffix.push_str(pbc);
        }
        Self { suffix }
    }

    /// First line of a frame: the declared atom count.
    pub fn count_line(n_atoms: usize) -> String {
        n_atoms.to_string()
    }

    /// Builds the second line of a frame. The lattice is written row-major,
    /// each value followed by a single space.
    pub fn comment_line(&self, lattice: Option<&Lattice>) -> String {
        let Some(lattice) = lattice else {
            return self.suffix.clone();
        };
        let mut line = String::from("Lattice=\"");
        for value in lattice.iter().flatten() {
            let _ = write!(line, "{} ", value);
        }
        line.push_str("\" ");
        line.push_str(&self.suffix);
        line
    }

    /// Formats one atom line.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Element symbol, left-aligned in a 4-character field.
    /// * `values` - Flattened per-atom values, each right-aligned in a
    ///   16-character field with 6 decimals.
    ///
    /// # Return
    ///
    /// Returns the line without a trailing newline.
    pub fn atom_line(&self, symbol: &str, values: &[f64]) -> String {
        let mut line = String::with_capacity(4 + 16 * values.len());
        let _ = write!(line, "{:<4}", symbol);
        for value in values {
            let _ = write!(line, "{:16.6}", value);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: Lattice = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    #[test]
    fn comment_line_preserves_lattice_order_without_transpose() {
        let formatter = ExtXyzFormatter::new(RecordLayout::Positions, CellKind::Periodic);
        let lattice = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.5, 9.0]];
        assert_eq!(
            formatter.comment_line(Some(&lattice)),
            "Lattice=\"1 2 3 4 5 6 7 8.5 9 \" Properties=species:S:1:pos:R:3 pbc=\"T T T\""
        );
    }

    #[test]
    fn comment_line_for_identity_cell() {
        let formatter = ExtXyzFormatter::new(RecordLayout::Positions, CellKind::Periodic);
        assert!(
            formatter
                .comment_line(Some(&IDENTITY))
                .starts_with("Lattice=\"1 0 0 0 1 0 0 0 1 \" ")
        );
    }

    #[test]
    fn comment_line_for_slab_cell_uses_partial_pbc() {
        let formatter =
            ExtXyzFormatter::new(RecordLayout::PositionsVelocities, CellKind::Slab);
        assert_eq!(
            formatter.comment_line(Some(&IDENTITY)),
            "Lattice=\"1 0 0 0 1 0 0 0 1 \" Properties=species:S:1:pos:R:3:vel:R:3 pbc=\"T T F\""
        );
    }

    #[test]
    fn comment_line_without_cell_has_only_properties() {
        let formatter =
            ExtXyzFormatter::new(RecordLayout::PositionsVelocitiesForces, CellKind::None);
        assert_eq!(
            formatter.comment_line(None),
            "Properties=species:S:1:pos:R:3:vel:R:3:forces:R:3"
        );
    }

    #[test]
    fn atom_line_uses_fixed_width_columns() {
        let formatter = ExtXyzFormatter::new(RecordLayout::Positions, CellKind::None);
        let line = formatter.atom_line("Ni", &[1.0, -2.5, 10.123_456_7]);
        assert_eq!(
            line,
            "Ni          1.000000       -2.500000       10.123457"
        );
        assert_eq!(line.len(), 4 + 3 * 16);
    }

    #[test]
    fn atom_line_keeps_long_values_intact() {
        let formatter = ExtXyzFormatter::new(RecordLayout::Positions, CellKind::None);
        let line = formatter.atom_line("C", &[123_456_789.0, 0.0, 0.0]);
        assert!(line.starts_with("C   123456789.000000"));
    }

    #[test]
    fn count_line_is_plain_integer() {
        assert_eq!(ExtXyzFormatter::count_line(128), "128");
    }
}
