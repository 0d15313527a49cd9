//! Text export of elements and lattices for external programs.

use crate::anchor::Anchor;
use crate::element::{Element, ElementKind, Family};
use crate::lattice::Lattice;
use std::collections::HashSet;
use std::fmt::{self, Write};

/// Output format of [`Element::definition`] and [`Lattice::export`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// MAD-X element definitions and a `SEQUENCE`.
    Madx,
    /// Elegant element definitions and a `LINE` with explicit drifts.
    Elegant,
    /// A LaTeX `tabular` listing.
    Latex,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Madx => "madx",
            Self::Elegant => "elegant",
            Self::Latex => "latex",
        })
    }
}

/// Integrated value for a thick element, the stored value for a thin one.
fn integrated(k: f64, length: f64) -> f64 {
    if length > 0.0 {
        k * length
    } else {
        k
    }
}

fn signed(k: f64, family: Family) -> f64 {
    match family {
        Family::D => -k,
        _ => k,
    }
}

impl Element {
    /// One definition line for this element.
    ///
    /// LaTeX lines are table rows without position; use
    /// [`Lattice::export`] for a complete listing.
    pub fn definition(&self, dialect: Dialect) -> String {
        match dialect {
            Dialect::Madx => self.madx(),
            Dialect::Elegant => self.elegant(),
            Dialect::Latex => self.latex_row(None),
        }
    }

    fn madx(&self) -> String {
        let l = self.length();
        let mut s = format!("{}: ", self.name);
        // writing to a String cannot fail
        let _ = match self.kind() {
            ElementKind::Dipole => write!(
                s,
                "SBEND, L={l}, ANGLE={}, E1={}, E2={}",
                integrated(self.k0.z, l),
                self.e1,
                self.e2
            ),
            ElementKind::Quadrupole => {
                write!(s, "QUADRUPOLE, L={l}, K1={}", signed(self.k1, self.family))
            }
            ElementKind::Sextupole => {
                write!(s, "SEXTUPOLE, L={l}, K2={}", signed(self.k2, self.family))
            }
            ElementKind::Corrector => write!(
                s,
                "KICKER, L={l}, HKICK={}, VKICK={}",
                integrated(self.k0.z, l),
                integrated(self.k0.x, l)
            ),
            ElementKind::Multipole => write!(
                s,
                "MULTIPOLE, KNL={{0, {}, {}}}",
                signed(self.k1, self.family),
                signed(self.k2, self.family)
            ),
            ElementKind::Solenoid => write!(s, "SOLENOID, L={l}, KS={}", self.k0.s),
            ElementKind::Cavity => write!(
                s,
                "RFCAVITY, L={l}, VOLT={}, FREQ={}",
                self.volt * 1e-6,
                self.freq * 1e-6
            ),
            ElementKind::Marker => write!(s, "MARKER"),
            ElementKind::Monitor => write!(s, "MONITOR, L={l}"),
            ElementKind::RectCollimator => write!(
                s,
                "RCOLLIMATOR, L={l}, XSIZE={}, YSIZE={}",
                self.half_aperture.x,
                self.half_aperture.z
            ),
            ElementKind::Drift => write!(s, "DRIFT, L={l}"),
        };
        if self.tilt != 0.0 && self.kind().is_magnet() {
            let _ = write!(s, ", TILT={}", self.tilt);
        }
        s.push(';');
        s
    }

    fn elegant(&self) -> String {
        let l = self.length();
        let mut s = format!("{}: ", self.name);
        let _ = match self.kind() {
            ElementKind::Dipole => write!(
                s,
                "CSBEND, L={l}, ANGLE={}, E1={}, E2={}",
                integrated(self.k0.z, l),
                self.e1,
                self.e2
            ),
            ElementKind::Quadrupole => {
                write!(s, "KQUAD, L={l}, K1={}", signed(self.k1, self.family))
            }
            ElementKind::Sextupole => {
                write!(s, "KSEXT, L={l}, K2={}", signed(self.k2, self.family))
            }
            ElementKind::Corrector => write!(
                s,
                "KICKER, L={l}, HKICK={}, VKICK={}",
                integrated(self.k0.z, l),
                integrated(self.k0.x, l)
            ),
            ElementKind::Multipole => write!(
                s,
                "MULT, L={l}, KNL={}, ORDER=1",
                signed(self.k1, self.family)
            ),
            ElementKind::Solenoid => write!(s, "SOLE, L={l}, KS={}", self.k0.s),
            ElementKind::Cavity => {
                write!(s, "RFCA, L={l}, VOLT={}, FREQ={}", self.volt, self.freq)
            }
            ElementKind::Marker => write!(s, "MARK"),
            ElementKind::Monitor => write!(s, "MONI, L={l}"),
            ElementKind::RectCollimator => write!(
                s,
                "RCOL, L={l}, X_MAX={}, Y_MAX={}",
                self.half_aperture.x,
                self.half_aperture.z
            ),
            ElementKind::Drift => write!(s, "DRIF, L={l}"),
        };
        if self.tilt != 0.0 && self.kind().is_magnet() {
            let _ = write!(s, ", TILT={}", self.tilt);
        }
        s
    }

    fn main_strength(&self) -> (f64, &'static str) {
        match self.kind() {
            ElementKind::Dipole => (self.k0.z, "m^{-1}"),
            ElementKind::Quadrupole => (signed(self.k1, self.family), "m^{-2}"),
            ElementKind::Sextupole => (signed(self.k2, self.family), "m^{-3}"),
            ElementKind::Corrector => (self.k0.abs(), "m^{-1}"),
            ElementKind::Multipole => (signed(self.k1, self.family), "m^{-1}"),
            ElementKind::Solenoid => (self.k0.s, "m^{-1}"),
            ElementKind::Cavity => (self.volt * 1e-6, "MV"),
            _ => (0.0, ""),
        }
    }

    fn latex_row(&self, begin: Option<f64>) -> String {
        let (k, unit) = self.main_strength();
        let strength = if unit.is_empty() {
            "--".to_string()
        } else {
            format!("${k:.6}$ ${unit}$")
        };
        let name = self.name.replace('_', "\\_");
        match begin {
            Some(b) => format!(
                "{b:.4} & {name} & {} & {:.4} & {strength} \\\\",
                self.kind(),
                self.length()
            ),
            None => format!(
                "{name} & {} & {:.4} & {strength} \\\\",
                self.kind(),
                self.length()
            ),
        }
    }
}

impl Lattice {
    /// The whole lattice as text in `dialect`.
    ///
    /// MAD-X output lists each distinct element name once, followed by a
    /// sequence placing every element at its key. Elegant output adds a
    /// drift for every gap and a `LINE` in position order. LaTeX output is
    /// a `tabular` with one row per element.
    pub fn export(&self, dialect: Dialect) -> String {
        match dialect {
            Dialect::Madx => self.export_madx(),
            Dialect::Elegant => self.export_elegant(),
            Dialect::Latex => self.export_latex(),
        }
    }

    fn export_madx(&self) -> String {
        let mut out = String::new();
        let mut seen = HashSet::new();
        for (_, e) in self.iter() {
            if seen.insert(e.name.as_str()) {
                out.push_str(&e.definition(Dialect::Madx));
                out.push('\n');
            }
        }
        let refer = match self.ref_pos() {
            Anchor::Begin => "ENTRY",
            Anchor::Center => "CENTRE",
            Anchor::End => "EXIT",
        };
        let _ = writeln!(
            out,
            "\nRING: SEQUENCE, L={}, REFER={refer};",
            self.circumference()
        );
        for (key, e) in self.iter() {
            let _ = writeln!(out, "  {}, AT={key};", e.name);
        }
        out.push_str("ENDSEQUENCE;\n");
        out
    }

    fn export_elegant(&self) -> String {
        let mut out = String::new();
        let mut seen = HashSet::new();
        let mut line = Vec::new();
        let mut cursor = 0.0;
        let tol = self.config().length_tolerance;
        for (key, e) in self.iter() {
            let (begin, end) = self.footprint(key, e);
            if begin - cursor > tol {
                let name = format!("D{}", line.len());
                let _ = writeln!(out, "{name}: DRIF, L={}", begin - cursor);
                line.push(name);
            }
            if seen.insert(e.name.as_str()) {
                out.push_str(&e.definition(Dialect::Elegant));
                out.push('\n');
            }
            line.push(e.name.clone());
            cursor = end;
        }
        if self.circumference() - cursor > tol {
            let name = format!("D{}", line.len());
            let _ = writeln!(out, "{name}: DRIF, L={}", self.circumference() - cursor);
            line.push(name);
        }
        let _ = writeln!(out, "\nRING: LINE=({})", line.join(", "));
        out
    }

    fn export_latex(&self) -> String {
        let mut out = String::from(
            "\\begin{tabular}{rllrl}\n\\hline\ns / m & name & kind & L / m & strength \\\\\n\\hline\n",
        );
        for (key, e) in self.iter() {
            let begin = self.footprint(key, e).0;
            out.push_str(&e.latex_row(Some(begin)));
            out.push('\n');
        }
        out.push_str("\\hline\n\\end{tabular}\n");
        out
    }
}
