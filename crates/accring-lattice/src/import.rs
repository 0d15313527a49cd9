//! Building lattices from element tables and applying misalignments.
//!
//! The input is any [`ColumnSource`], typically a [`Table`] parsed from
//! the twiss output of an external optics program. Only the shape of the
//! table matters here; running the program is the caller's business (see
//! [`ExternalTool`](accring_core::ExternalTool)).
//!
//! [`Table`]: accring_core::Table

use crate::anchor::{locate, Anchor};
use crate::config::LatticeConfig;
use crate::cursor::Filter;
use crate::element::{Element, ElementKind, Family, Plane};
use crate::error::LatticeError;
use crate::lattice::Lattice;
use accring_core::{AccPair, AccTriple, ColumnSource};
use tracing::{debug, info, warn};

// ── Element tables ─────────────────────────────────────────────────

/// Column names of an element table.
///
/// Defaults follow MAD-X twiss output: positions refer to the element exit.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportLayout {
    /// Element keyword column.
    pub keyword: String,
    /// Element name column.
    pub name: String,
    /// Position column.
    pub pos: String,
    /// Length column.
    pub length: String,
    /// Bending angle column.
    pub angle: String,
    /// Integrated quadrupole strength column.
    pub k1l: String,
    /// Integrated sextupole strength column.
    pub k2l: String,
    /// Horizontal kick column.
    pub hkick: String,
    /// Vertical kick column.
    pub vkick: String,
    /// Tilt column.
    pub tilt: String,
    /// Entrance edge angle column (optional in the table).
    pub e1: String,
    /// Exit edge angle column (optional in the table).
    pub e2: String,
    /// Cavity voltage column in MV (optional in the table).
    pub volt: String,
    /// Cavity frequency column in MHz (optional in the table).
    pub freq: String,
    /// Which footprint point the position column refers to.
    pub anchor: Anchor,
}

impl Default for ImportLayout {
    fn default() -> Self {
        Self {
            keyword: "KEYWORD".into(),
            name: "NAME".into(),
            pos: "S".into(),
            length: "L".into(),
            angle: "ANGLE".into(),
            k1l: "K1L".into(),
            k2l: "K2L".into(),
            hkick: "HKICK".into(),
            vkick: "VKICK".into(),
            tilt: "TILT".into(),
            e1: "E1".into(),
            e2: "E2".into(),
            volt: "VOLT".into(),
            freq: "FREQ".into(),
            anchor: Anchor::End,
        }
    }
}

/// Per-row values read from an element table.
struct Row<'a> {
    keyword: &'a str,
    length: f64,
    angle: f64,
    k1l: f64,
    k2l: f64,
    hkick: f64,
    vkick: f64,
}

impl Lattice {
    /// Build a lattice from an element table.
    ///
    /// Each row is converted to an [`Element`] by its keyword and mounted
    /// at the table position, converted from `layout.anchor` to `ref_pos`.
    /// Drifts and unknown keywords are skipped. Negative quadrupole and
    /// sextupole strengths are stored as magnitudes of family D.
    ///
    /// Converted positions are mounted as they are. Only a negative key
    /// within `config.length_tolerance` of zero is snapped to 0.
    ///
    /// # Errors
    ///
    /// Missing required columns, unparseable cells, and any mount error,
    /// e.g. [`LatticeError::NegativePosition`] for an element whose table
    /// position puts its key before the ring start.
    pub fn import_table(
        source: &dyn ColumnSource,
        layout: &ImportLayout,
        circumference: f64,
        ref_pos: Anchor,
        config: LatticeConfig,
    ) -> Result<Self, LatticeError> {
        let mut lattice = Self::with_config(circumference, ref_pos, config)?;
        let keywords = source.text_column(&layout.keyword)?;
        let names = source.text_column(&layout.name)?;
        let pos = source.column(&layout.pos)?;
        let length = source.column(&layout.length)?;
        let angle = source.column(&layout.angle)?;
        let k1l = source.column(&layout.k1l)?;
        let k2l = source.column(&layout.k2l)?;
        let hkick = source.column(&layout.hkick)?;
        let vkick = source.column(&layout.vkick)?;
        let tilt = source.column(&layout.tilt)?;
        let optional = |name: &str| -> Result<Vec<f64>, LatticeError> {
            if source.has_column(name) {
                Ok(source.column(name)?)
            } else {
                Ok(vec![0.0; source.rows()])
            }
        };
        let e1 = optional(&layout.e1)?;
        let e2 = optional(&layout.e2)?;
        let volt = optional(&layout.volt)?;
        let freq = optional(&layout.freq)?;

        let rows = [
            keywords.len(),
            names.len(),
            pos.len(),
            length.len(),
            angle.len(),
            k1l.len(),
            k2l.len(),
            hkick.len(),
            vkick.len(),
            tilt.len(),
            e1.len(),
            e2.len(),
            volt.len(),
            freq.len(),
        ]
        .into_iter()
        .min()
        .unwrap_or(0);

        let tol = lattice.config().length_tolerance;
        let mut skipped = 0usize;
        for r in 0..rows {
            let row = Row {
                keyword: keywords[r].as_str(),
                length: length[r],
                angle: angle[r],
                k1l: k1l[r],
                k2l: k2l[r],
                hkick: hkick[r],
                vkick: vkick[r],
            };
            let Some(mut element) = element_from_row(&row, &names[r])? else {
                skipped += 1;
                continue;
            };
            element.tilt = tilt[r];
            element.e1 = e1[r];
            element.e2 = e2[r];
            if element.kind() == ElementKind::Cavity {
                element.volt = volt[r] * 1e6;
                element.freq = freq[r] * 1e6;
            }
            let mut key = locate(pos[r], element.length(), layout.anchor, ref_pos);
            // rounding noise from the anchor conversion, not a real offset
            if key < 0.0 && key >= -tol {
                key = 0.0;
            }
            lattice.mount(key, element)?;
        }
        info!(
            elements = lattice.len(),
            skipped,
            circumference,
            "lattice imported"
        );
        Ok(lattice)
    }
}

/// Integrated strength over length, or the integrated value itself for a
/// thin element.
fn per_length(integrated: f64, length: f64) -> f64 {
    if length > 0.0 {
        integrated / length
    } else {
        integrated
    }
}

fn signed_family(k: f64) -> (f64, Family) {
    if k < 0.0 {
        (-k, Family::D)
    } else {
        (k, Family::F)
    }
}

fn element_from_row(row: &Row<'_>, name: &str) -> Result<Option<Element>, LatticeError> {
    let keyword = row.keyword.to_ascii_uppercase();
    let kind = match keyword.as_str() {
        "SBEND" | "RBEND" | "CSBEND" | "SBEN" | "RBEN" => ElementKind::Dipole,
        "QUADRUPOLE" | "KQUAD" | "QUAD" => ElementKind::Quadrupole,
        "SEXTUPOLE" | "KSEXT" | "SEXT" => ElementKind::Sextupole,
        "HKICKER" | "VKICKER" | "KICKER" | "HKICK" | "VKICK" => ElementKind::Corrector,
        "MULTIPOLE" | "MULT" => ElementKind::Multipole,
        "SOLENOID" | "SOLE" => ElementKind::Solenoid,
        "RFCAVITY" | "RFCA" => ElementKind::Cavity,
        "MARKER" | "MARK" => ElementKind::Marker,
        "MONITOR" | "HMONITOR" | "VMONITOR" | "INSTRUMENT" | "MONI" => ElementKind::Monitor,
        "RCOLLIMATOR" | "RCOL" => ElementKind::RectCollimator,
        "DRIFT" | "DRIF" => return Ok(None),
        other => {
            debug!(keyword = other, name, "unknown element keyword skipped");
            return Ok(None);
        }
    };
    let mut e = Element::new(kind, name, row.length)?;
    match kind {
        ElementKind::Dipole => {
            e.k0 = AccTriple::new(0.0, per_length(row.angle, row.length), 0.0);
            e.plane = Plane::H;
        }
        ElementKind::Quadrupole => {
            let (k1, family) = signed_family(per_length(row.k1l, row.length));
            e.k1 = k1;
            e.family = family;
        }
        ElementKind::Sextupole => {
            let (k2, family) = signed_family(per_length(row.k2l, row.length));
            e.k2 = k2;
            e.family = family;
        }
        ElementKind::Corrector => {
            e.k0 = AccTriple::new(
                per_length(row.vkick, row.length),
                per_length(row.hkick, row.length),
                0.0,
            );
            e.plane = match keyword.as_str() {
                "HKICKER" | "HKICK" => Plane::H,
                "VKICKER" | "VKICK" => Plane::V,
                _ => Plane::None,
            };
        }
        ElementKind::Multipole => {
            e.k1 = row.k1l;
            e.k2 = row.k2l;
        }
        _ => {}
    }
    Ok(Some(e))
}

// ── Misalignments ──────────────────────────────────────────────────

/// Alignment error of the element at one position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Misalignment {
    /// Any position inside the target element's footprint.
    pub pos: f64,
    /// Roll about the beam axis, rad.
    pub tilt: f64,
    /// Horizontal displacement, m.
    pub dx: f64,
    /// Vertical displacement, m.
    pub dz: f64,
}

/// Column names of a misalignment table.
#[derive(Clone, Debug, PartialEq)]
pub struct MisalignmentLayout {
    /// Position column.
    pub pos: String,
    /// Tilt column.
    pub tilt: String,
    /// Horizontal displacement column.
    pub dx: String,
    /// Vertical displacement column.
    pub dz: String,
}

impl Default for MisalignmentLayout {
    fn default() -> Self {
        Self {
            pos: "S".into(),
            tilt: "DPSI".into(),
            dx: "DX".into(),
            dz: "DY".into(),
        }
    }
}

impl Misalignment {
    /// Read all rows of a misalignment table.
    pub fn read_table(
        source: &dyn ColumnSource,
        layout: &MisalignmentLayout,
    ) -> Result<Vec<Self>, LatticeError> {
        let pos = source.column(&layout.pos)?;
        let tilt = source.column(&layout.tilt)?;
        let dx = source.column(&layout.dx)?;
        let dz = source.column(&layout.dz)?;
        let rows = [pos.len(), tilt.len(), dx.len(), dz.len()]
            .into_iter()
            .min()
            .unwrap_or(0);
        Ok((0..rows)
            .map(|r| Self {
                pos: pos[r],
                tilt: tilt[r],
                dx: dx[r],
                dz: dz[r],
            })
            .collect())
    }
}

/// Outcome of [`Lattice::apply_misalignments`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MisalignmentReport {
    /// Rows applied to an element.
    pub applied: usize,
    /// Rows with no matching element at their position.
    pub skipped: usize,
}

impl Lattice {
    /// Set tilt and displacement of the elements matching `filter` that
    /// contain each row's position.
    ///
    /// Rows that hit empty space or a non-matching element are logged and
    /// counted as skipped.
    pub fn apply_misalignments(
        &mut self,
        filter: impl Into<Filter>,
        rows: &[Misalignment],
    ) -> Result<MisalignmentReport, LatticeError> {
        let filter = filter.into();
        let mut report = MisalignmentReport::default();
        for row in rows {
            let key = match self.occupant(row.pos)? {
                Some(i) => self.entries()[i].0,
                None => {
                    warn!(pos = row.pos, kind = %filter.kind, "misalignment: no element here");
                    report.skipped += 1;
                    continue;
                }
            };
            match self.get_mut(key) {
                Some(e) if filter.matches(e) => {
                    e.tilt = row.tilt;
                    e.displacement = AccPair::new(row.dx, row.dz);
                    report.applied += 1;
                }
                _ => {
                    warn!(pos = row.pos, kind = %filter.kind, "misalignment: element kind differs");
                    report.skipped += 1;
                }
            }
        }
        info!(
            applied = report.applied,
            skipped = report.skipped,
            kind = %filter.kind,
            "misalignments applied"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accring_core::Table;

    const TWISS: &str = r#"
@ NAME             %07s "TWISS"
* NAME     KEYWORD     S     L     ANGLE  K1L    K2L   HKICK  VKICK  TILT
$ %s       %s          %le   %le   %le    %le    %le   %le    %le    %le
 "START"  "MARKER"     0.0   0.0   0.0    0.0    0.0   0.0    0.0    0.0
 "QF"     "QUADRUPOLE" 1.5   1.0   0.0    0.5    0.0   0.0    0.0    0.0
 "D1"     "DRIFT"      2.0   1.0   0.0    0.0    0.0   0.0    0.0    0.0
 "MB"     "SBEND"      4.0   2.0   0.2    0.0    0.0   0.0    0.0    0.0
 "QD"     "QUADRUPOLE" 5.0   1.0   0.0   -0.5    0.0   0.0    0.0    0.0
 "HC"     "HKICKER"    5.0   0.0   0.0    0.0    0.0   1e-3   0.0    0.0
 "BPM"    "MONITOR"    6.0   0.0   0.0    0.0    0.0   0.0    0.0    0.0
 "W"      "WIGGLER"    7.0   0.5   0.0    0.0    0.0   0.0    0.0    0.0
"#;

    fn imported() -> Lattice {
        let t = Table::parse(TWISS).unwrap();
        Lattice::import_table(
            &t,
            &ImportLayout::default(),
            10.0,
            Anchor::Begin,
            LatticeConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn import_converts_rows() {
        let l = imported();
        let names: Vec<&str> = l.iter().map(|(_, e)| e.name.as_str()).collect();
        assert_eq!(names, vec!["START", "QF", "MB", "QD", "HC", "BPM"]);

        let mb = l.get(2.0).unwrap();
        assert_eq!(mb.kind(), ElementKind::Dipole);
        assert!((mb.k0.z - 0.1).abs() < 1e-12);

        let qd = l.get(4.0).unwrap();
        assert_eq!(qd.family, Family::D);
        assert_eq!(qd.k1, 0.5);
        assert_eq!(l.get(0.0).unwrap().kind(), ElementKind::Marker);

        let hc = l.get(5.0).unwrap();
        assert_eq!(hc.plane, Plane::H);
        assert_eq!(hc.k0.z, 1e-3);
    }

    #[test]
    fn import_missing_column() {
        let t = Table::parse("* NAME KEYWORD S\n A MARKER 0\n").unwrap();
        let err = Lattice::import_table(
            &t,
            &ImportLayout::default(),
            10.0,
            Anchor::Begin,
            LatticeConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LatticeError::Table(_)));
    }

    #[test]
    fn import_rejects_key_before_ring_start() {
        // exit at 0.5 with length 1.0 puts the entrance at -0.5
        let t = Table::parse(
            "* NAME KEYWORD S L ANGLE K1L K2L HKICK VKICK TILT\n\
             Q1 QUADRUPOLE 0.5 1.0 0 0.3 0 0 0 0\n",
        )
        .unwrap();
        let err = Lattice::import_table(
            &t,
            &ImportLayout::default(),
            10.0,
            Anchor::Begin,
            LatticeConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, LatticeError::NegativePosition { pos: -0.5 });
    }

    #[test]
    fn import_snaps_rounding_noise_at_ring_start() {
        let t = Table::parse(
            "* NAME KEYWORD S L ANGLE K1L K2L HKICK VKICK TILT\n\
             Q1 QUADRUPOLE 1.0000000000001 1.0000000000002 0 0.3 0 0 0 0\n",
        )
        .unwrap();
        let l = Lattice::import_table(
            &t,
            &ImportLayout::default(),
            10.0,
            Anchor::Begin,
            LatticeConfig::default(),
        )
        .unwrap();
        assert_eq!(l.iter().next().map(|(k, _)| k), Some(0.0));
    }

    #[test]
    fn misalignments_by_kind() {
        let mut l = imported();
        let rows = [
            Misalignment {
                pos: 0.5,
                tilt: 0.01,
                dx: 1e-4,
                dz: -1e-4,
            },
            Misalignment {
                pos: 3.0,
                tilt: 0.02,
                ..Misalignment::default()
            },
            Misalignment {
                pos: 8.0,
                ..Misalignment::default()
            },
        ];
        let report = l.apply_misalignments(ElementKind::Quadrupole, &rows).unwrap();
        assert_eq!(report, MisalignmentReport { applied: 1, skipped: 2 });
        let qf = l.get(0.5).unwrap();
        assert_eq!(qf.tilt, 0.01);
        assert_eq!(qf.displacement, AccPair::new(1e-4, -1e-4));
        assert_eq!(l.at(3.0).unwrap().tilt, 0.0);
    }

    #[test]
    fn misalignment_table() {
        let t = Table::parse("S DPSI DX DY\n1.5 0.1 0.2 0.3\n").unwrap();
        let rows = Misalignment::read_table(&t, &MisalignmentLayout::default()).unwrap();
        assert_eq!(
            rows,
            vec![Misalignment {
                pos: 1.5,
                tilt: 0.1,
                dx: 0.2,
                dz: 0.3
            }]
        );
    }
}
