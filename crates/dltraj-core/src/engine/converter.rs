use super::buffer::LineBuffer;
use super::config::ConvertConfig;
use super::error::ConvertError;
use super::progress::{Progress, ProgressReporter};
use crate::core::io::history::{HeaderError, HistoryHeader, is_frame_marker};
use crate::core::io::xyz::{ExtXyzFormatter, Lattice};
use crate::core::species::SpeciesTable;
use std::io::{BufRead, Write};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub frames: u64,
    pub atoms: u64,
    pub lines_written: u64,
}

#[derive(Debug)]
enum State<'a> {
    AwaitingRecord,
    Lattice {
        row: usize,
        lattice: Lattice,
    },
    AtomData {
        line: usize,
        symbol: &'a str,
        remaining: usize,
    },
}

/// Line-driven HISTORY to extended-XYZ state machine.
///
/// Each input line is fed once; output lines are pushed to a [`LineBuffer`]
/// as soon as a frame header or atom record is complete.
pub struct HistoryConverter<'a> {
    header: HistoryHeader,
    formatter: ExtXyzFormatter,
    species: &'a SpeciesTable,
    state: State<'a>,
    values: Vec<f64>,
    frames: u64,
    atoms: u64,
    atoms_in_frame: usize,
}

impl<'a> HistoryConverter<'a> {
    pub fn new(header: HistoryHeader, species: &'a SpeciesTable) -> Self {
        Self {
            header,
            formatter: ExtXyzFormatter::new(header.layout, header.cell),
            species,
            state: State::AwaitingRecord,
            values: Vec::with_capacity(header.layout.n_items()),
            frames: 0,
            atoms: 0,
            atoms_in_frame: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn atoms(&self) -> u64 {
        self.atoms
    }

    pub fn feed<W: Write>(
        &mut self,
        line_num: usize,
        line: &str,
        sink: &mut LineBuffer<W>,
        reporter: &ProgressReporter,
    ) -> Result<(), ConvertError> {
        match std::mem::replace(&mut self.state, State::AwaitingRecord) {
            State::AwaitingRecord => self.start_record(line_num, line, sink, reporter),
            State::Lattice { row, mut lattice } => {
                lattice[row] = parse_vector(line_num, line)?;
                if row + 1 < 3 {
                    self.state = State::Lattice {
                        row: row + 1,
                        lattice,
                    };
                } else {
                    self.emit(sink, self.formatter.comment_line(Some(&lattice)), reporter)?;
                }
                Ok(())
            }
            State::AtomData {
                line: record_line,
                symbol,
                remaining,
            } => {
                self.values.extend(parse_vector(line_num, line)?);
                if remaining > 1 {
                    self.state = State::AtomData {
                        line: record_line,
                        symbol,
                        remaining: remaining - 1,
                    };
                } else {
                    let record = self.formatter.atom_line(symbol, &self.values);
                    self.values.clear();
                    self.atoms += 1;
                    self.atoms_in_frame += 1;
                    self.emit(sink, record, reporter)?;
                }
                Ok(())
            }
        }
    }

    fn start_record<W: Write>(
        &mut self,
        line_num: usize,
        line: &str,
        sink: &mut LineBuffer<W>,
        reporter: &ProgressReporter,
    ) -> Result<(), ConvertError> {
        let Some(label) = line.split_whitespace().next() else {
            return Ok(());
        };

        if is_frame_marker(line) {
            self.check_frame_complete(reporter);
            self.frames += 1;
            self.atoms_in_frame = 0;
            reporter.report(Progress::FrameStarted { frame: self.frames });
            self.emit(
                sink,
                ExtXyzFormatter::count_line(self.header.n_atoms),
                reporter,
            )?;
            if self.header.cell.has_lattice() {
                self.state = State::Lattice {
                    row: 0,
                    lattice: [[0.0; 3]; 3],
                };
            } else {
                self.emit(sink, self.formatter.comment_line(None), reporter)?;
            }
            return Ok(());
        }

        let species: &'a SpeciesTable = self.species;
        let symbol = species.resolve(label)?;
        self.state = State::AtomData {
            line: line_num,
            symbol,
            remaining: self.header.layout.data_lines(),
        };
        Ok(())
    }

    fn emit<W: Write>(
        &self,
        sink: &mut LineBuffer<W>,
        line: String,
        reporter: &ProgressReporter,
    ) -> Result<(), ConvertError> {
        if sink.push(line)? {
            reporter.report(Progress::ChunkFlushed {
                lines: sink.written(),
            });
        }
        Ok(())
    }

    /// Atom count mismatches are logged and forwarded to the progress
    /// reporter; they never abort the conversion.
    fn check_frame_complete(&self, reporter: &ProgressReporter) {
        let message = if self.frames == 0 {
            if self.atoms_in_frame == 0 {
                return;
            }
            format!(
                "{} atom record(s) found before the first timestep record",
                self.atoms_in_frame
            )
        } else if self.atoms_in_frame != self.header.n_atoms {
            format!(
                "Frame {} has {} atom records, header declares {}",
                self.frames, self.atoms_in_frame, self.header.n_atoms
            )
        } else {
            return;
        };
        warn!("{}", message);
        reporter.report(Progress::Message(message));
    }

    /// Verifies that the input did not stop inside a record.
    pub fn finish(&self, reporter: &ProgressReporter) -> Result<(), ConvertError> {
        match &self.state {
            State::AwaitingRecord => {
                self.check_frame_complete(reporter);
                Ok(())
            }
            State::Lattice { row, .. } => Err(ConvertError::Truncated {
                expected: format!(
                    "{} more lattice vector line(s) for frame {}",
                    3 - row,
                    self.frames
                ),
            }),
            State::AtomData {
                line, remaining, ..
            } => Err(ConvertError::Truncated {
                expected: format!(
                    "{} more data line(s) for the atom record on line {} in frame {}",
                    remaining, line, self.frames
                ),
            }),
        }
    }
}

fn parse_vector(line_num: usize, line: &str) -> Result<[f64; 3], ConvertError> {
    let tokens: Vec<&str> = line.split_whitespace().take(3).collect();
    if tokens.len() < 3 {
        return Err(ConvertError::MalformedRecord {
            line: line_num,
            expected: 3,
            found: tokens.len(),
        });
    }
    let mut vector = [0.0; 3];
    for (slot, token) in vector.iter_mut().zip(tokens) {
        *slot = token.parse().map_err(|_| ConvertError::ValueParse {
            line: line_num,
            value: token.to_string(),
        })?;
    }
    Ok(vector)
}

fn read_header_line(
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
    line_num: usize,
) -> Result<String, ConvertError> {
    lines
        .next()
        .transpose()?
        .ok_or_else(|| ConvertError::MalformedHeader {
            line: line_num,
            reason: HeaderError::MissingFields { found: 0 },
        })
}

/// Streams a HISTORY trajectory from `reader` into extended XYZ on `writer`.
///
/// Output is written in chunks of `config.flush_threshold` lines. On error the
/// unflushed remainder is dropped, so `writer` holds only completed chunks.
#[instrument(skip_all, name = "history_to_xyz")]
pub fn convert<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    species: &SpeciesTable,
    config: &ConvertConfig,
    reporter: &ProgressReporter,
) -> Result<ConversionSummary, ConvertError> {
    let mut lines = reader.lines();

    let title = read_header_line(&mut lines, 1)?;
    debug!("HISTORY title: '{}'", title.trim());

    let header_line = read_header_line(&mut lines, 2)?;
    let header = HistoryHeader::parse(&header_line)
        .map_err(|reason| ConvertError::MalformedHeader { line: 2, reason })?;
    info!(
        "levcfg: {}, imcon cell: {:?}, atoms per frame: {}",
        header.layout.levcfg(),
        header.cell,
        header.n_atoms
    );

    reporter.report(Progress::PhaseStart {
        name: "Converting frames",
    });

    let mut sink = LineBuffer::new(writer, config.flush_threshold);
    let mut converter = HistoryConverter::new(header, species);
    for (offset, line_res) in lines.enumerate() {
        let line = line_res?;
        converter.feed(offset + 3, &line, &mut sink, reporter)?;
    }
    converter.finish(reporter)?;

    let lines_written = sink.pending_len() as u64 + sink.written();
    sink.finish()?;

    reporter.report(Progress::PhaseFinish);
    info!(
        "Converted {} frame(s), {} atom record(s)",
        converter.frames(),
        converter.atoms()
    );

    Ok(ConversionSummary {
        frames: converter.frames(),
        atoms: converter.atoms(),
        lines_written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn history(levcfg: u32, imcon: u32, n_atoms: usize, frames: usize) -> String {
        let mut out = format!("test system\n{:>10}{:>10}{:>10}\n", levcfg, imcon, n_atoms);
        for frame in 0..frames {
            out.push_str(&format!(
                "timestep {:>10}{:>10}{:>10}{:>10} 0.001\n",
                (frame + 1) * 10,
                n_atoms,
                levcfg,
                imcon
            ));
            if imcon > 0 {
                out.push_str("  10.0 0.0 0.0\n  0.0 10.0 0.0\n  0.0 0.0 10.0\n");
            }
            for atom in 0..n_atoms {
                let label = if atom % 2 == 0 { "ca" } else { "HO" };
                out.push_str(&format!("{}  {}  12.011  0.0\n", label, atom + 1));
                for item in 0..=levcfg {
                    let base = (frame * 100 + atom * 10 + item as usize) as f64;
                    out.push_str(&format!("{} {} {}\n", base, base + 0.5, -base));
                }
            }
        }
        out
    }

    fn run(input: &str, threshold: usize) -> Result<(ConversionSummary, String), ConvertError> {
        let config = ConvertConfig {
            flush_threshold: threshold,
            ..ConvertConfig::default()
        };
        let mut out = Vec::new();
        let summary = convert(
            Cursor::new(input),
            &mut out,
            &SpeciesTable::builtin(),
            &config,
            &ProgressReporter::new(),
        )?;
        Ok((summary, String::from_utf8(out).unwrap()))
    }

    #[test]
    fn each_frame_has_count_comment_and_atom_lines() {
        let (summary, out) = run(&history(0, 3, 4, 5), 1_000_000).unwrap();
        assert_eq!(summary.frames, 5);
        assert_eq!(summary.atoms, 20);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5 * (2 + 4));
        assert_eq!(summary.lines_written, lines.len() as u64);
        assert_eq!(lines.iter().filter(|l| **l == "4").count(), 5);
        for frame in lines.chunks(6) {
            assert_eq!(frame[0], "4");
            assert!(frame[1].starts_with("Lattice=\"10 0 0 0 10 0 0 0 10 \""));
            assert!(frame[2..].iter().all(|l| l.starts_with("C   ") || l.starts_with("H   ")));
        }
    }

    #[test]
    fn field_count_follows_levcfg() {
        for (levcfg, n_items) in [(0, 3), (1, 6), (2, 9)] {
            let (_, out) = run(&history(levcfg, 0, 2, 1), 1_000_000).unwrap();
            let atom_lines: Vec<&str> = out.lines().skip(2).collect();
            assert_eq!(atom_lines.len(), 2);
            for line in atom_lines {
                let fields: Vec<&str> = line.split_whitespace().collect();
                assert_eq!(fields.len(), 1 + n_items, "levcfg {levcfg}: {line}");
                assert_eq!(line.len(), 4 + 16 * n_items);
            }
        }
    }

    #[test]
    fn values_are_flattened_in_record_order() {
        let (_, out) = run(&history(2, 0, 1, 1), 1_000_000).unwrap();
        let atom_line = out.lines().nth(2).unwrap();
        let values: Vec<f64> = atom_line
            .split_whitespace()
            .skip(1)
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(values, vec![0.0, 0.5, 0.0, 1.0, 1.5, -1.0, 2.0, 2.5, -2.0]);
    }

    #[test]
    fn identity_lattice_is_written_row_major() {
        let input = "title\n0 1 1\ntimestep 1\n1 0 0\n0 1 0\n0 0 1\nca\n0.5 0.5 0.5\n";
        let (_, out) = run(input, 1_000_000).unwrap();
        assert_eq!(
            out,
            "1\nLattice=\"1 0 0 0 1 0 0 0 1 \" Properties=species:S:1:pos:R:3 pbc=\"T T T\"\nC           0.500000        0.500000        0.500000\n"
        );
    }

    #[test]
    fn slab_cell_writes_partial_pbc() {
        let (_, out) = run(&history(1, 6, 1, 1), 1_000_000).unwrap();
        let comment = out.lines().nth(1).unwrap();
        assert!(comment.ends_with("Properties=species:S:1:pos:R:3:vel:R:3 pbc=\"T T F\""));
    }

    #[test]
    fn non_periodic_comment_line_has_no_lattice() {
        let (_, out) = run(&history(0, 0, 1, 1), 1_000_000).unwrap();
        assert_eq!(out.lines().nth(1).unwrap(), "Properties=species:S:1:pos:R:3");
    }

    #[test]
    fn flush_threshold_does_not_change_output() {
        let input = history(2, 3, 7, 4);
        let (_, chunked) = run(&input, 1).unwrap();
        let (_, whole) = run(&input, 1_000_000).unwrap();
        assert_eq!(chunked, whole);
    }

    #[test]
    fn unknown_species_aborts_before_the_atom_is_written() {
        let input = "title\n0 0 2\ntimestep 1\nca\n1 2 3\nzz 2\n4 5 6\n";
        let mut out = Vec::new();
        let err = convert(
            Cursor::new(input),
            &mut out,
            &SpeciesTable::builtin(),
            &ConvertConfig {
                flush_threshold: 1,
                ..ConvertConfig::default()
            },
            &ProgressReporter::new(),
        )
        .unwrap_err();

        match err {
            ConvertError::UnknownSpecies(e) => assert_eq!(e.label, "zz"),
            other => panic!("unexpected error: {other:?}"),
        }
        let written = String::from_utf8(out).unwrap();
        assert_eq!(written.lines().count(), 3);
        assert!(!written.contains("zz"));
    }

    #[test]
    fn injected_species_table_is_used() {
        let mut species = SpeciesTable::empty();
        species.insert("zn", "Zn");
        let mut out = Vec::new();
        convert(
            Cursor::new("title\n0 0 1\ntimestep 1\nzn\n1 2 3\n"),
            &mut out,
            &species,
            &ConvertConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("\nZn  "));
    }

    #[test]
    fn malformed_header_is_reported() {
        let err = run("title\n0 3\n", 10).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MalformedHeader {
                line: 2,
                reason: HeaderError::MissingFields { found: 2 }
            }
        ));

        let err = run("title\n", 10).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedHeader { line: 2, .. }));
    }

    #[test]
    fn unsupported_levcfg_is_rejected() {
        let err = run("title\n4 0 1\n", 10).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MalformedHeader {
                reason: HeaderError::UnsupportedLevcfg(4),
                ..
            }
        ));
    }

    #[test]
    fn bad_float_reports_line_and_token() {
        let err = run("title\n0 0 1\ntimestep 1\nca\n1.0 x 3.0\n", 10).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::ValueParse { line: 5, ref value } if value == "x"
        ));
    }

    #[test]
    fn short_data_line_is_malformed() {
        let err = run("title\n0 0 1\ntimestep 1\nca\n1.0 2.0\n", 10).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MalformedRecord {
                line: 5,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn truncated_input_is_an_error() {
        let err = run("title\n1 0 1\ntimestep 1\nca\n1 2 3\n", 10).unwrap_err();
        match err {
            ConvertError::Truncated { expected } => {
                assert_eq!(
                    expected,
                    "1 more data line(s) for the atom record on line 4 in frame 1"
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = run("title\n0 1 1\ntimestep 1\n1 0 0\n", 10).unwrap_err();
        assert!(matches!(err, ConvertError::Truncated { .. }));
    }

    #[test]
    fn blank_lines_between_records_are_skipped() {
        let input = "title\n0 0 1\n\ntimestep 1\nca\n1 2 3\n\n";
        let (summary, _) = run(input, 10).unwrap();
        assert_eq!(summary.frames, 1);
        assert_eq!(summary.atoms, 1);
    }

    #[test]
    fn progress_reports_each_frame() {
        use std::sync::{Arc, Mutex};

        let frames = Arc::new(Mutex::new(0u64));
        let sink = frames.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::FrameStarted { frame } = event {
                *sink.lock().unwrap() = frame;
            }
        }));
        convert(
            Cursor::new(history(0, 0, 2, 3)),
            Vec::new(),
            &SpeciesTable::builtin(),
            &ConvertConfig::default(),
            &reporter,
        )
        .unwrap();
        assert_eq!(*frames.lock().unwrap(), 3);
    }

    #[test]
    fn atom_count_mismatch_is_reported_as_a_message() {
        use std::sync::{Arc, Mutex};

        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = messages.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::Message(msg) = event {
                sink.lock().unwrap().push(msg);
            }
        }));
        let input = "title\n0 0 2\ntimestep 1\nca\n1 2 3\ntimestep 2\nca\n1 2 3\nho\n4 5 6\n";
        let summary = convert(
            Cursor::new(input),
            Vec::new(),
            &SpeciesTable::builtin(),
            &ConvertConfig::default(),
            &reporter,
        )
        .unwrap();

        assert_eq!(summary.frames, 2);
        assert_eq!(summary.atoms, 3);
        assert_eq!(
            *messages.lock().unwrap(),
            vec!["Frame 1 has 1 atom records, header declares 2".to_string()]
        );
    }
}
