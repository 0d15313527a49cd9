//! The position-sorted ring lattice.

use crate::anchor::{locate, Anchor};
use crate::config::LatticeConfig;
use crate::cursor::{Cursor, Filter, TypedCursor};
use crate::element::Element;
use crate::error::LatticeError;
use accring_core::{AccPair, AccTriple};
use tracing::{info, warn};

/// Elements mounted along a ring of fixed circumference.
///
/// Each element is keyed by the position of one anchor of its footprint,
/// the lattice-wide [`ref_pos`](Self::ref_pos). Footprints never overlap
/// and always lie within `[0, circumference]`; [`mount`](Self::mount)
/// rejects any placement that would break this.
///
/// # Examples
///
/// ```
/// use accring_lattice::{Anchor, Element, ElementKind, Lattice};
///
/// let mut ring = Lattice::new(30.0, Anchor::Begin).unwrap();
/// ring.mount(2.0, Element::new(ElementKind::Dipole, "M1", 2.5).unwrap()).unwrap();
/// ring.mount(5.0, Element::new(ElementKind::Quadrupole, "Q1", 0.5).unwrap()).unwrap();
///
/// assert_eq!(ring.len(), 2);
/// assert_eq!(ring.at(3.0).unwrap().name, "M1");
/// assert_eq!(ring.at(4.9).unwrap().kind(), ElementKind::Drift);
/// ```
#[derive(Clone, Debug)]
pub struct Lattice {
    circumference: f64,
    ref_pos: Anchor,
    config: LatticeConfig,
    elements: Vec<(f64, Element)>,
    empty: Element,
}

impl Lattice {
    /// Create an empty lattice with the default configuration.
    pub fn new(circumference: f64, ref_pos: Anchor) -> Result<Self, LatticeError> {
        Self::with_config(circumference, ref_pos, LatticeConfig::default())
    }

    /// Create an empty lattice.
    ///
    /// # Errors
    ///
    /// [`LatticeError::InvalidCircumference`] for a non-positive or
    /// non-finite circumference, [`LatticeError::Config`] for an invalid
    /// configuration.
    pub fn with_config(
        circumference: f64,
        ref_pos: Anchor,
        config: LatticeConfig,
    ) -> Result<Self, LatticeError> {
        if !circumference.is_finite() || circumference <= 0.0 {
            return Err(LatticeError::InvalidCircumference {
                value: circumference,
            });
        }
        config.validate()?;
        Ok(Self {
            circumference,
            ref_pos,
            config,
            elements: Vec::new(),
            empty: Element::empty_space(),
        })
    }

    /// Build a non-ring line whose length ends at the last element.
    pub fn from_line<I>(ref_pos: Anchor, config: LatticeConfig, items: I) -> Result<Self, LatticeError>
    where
        I: IntoIterator<Item = (f64, Element)>,
    {
        let items: Vec<(f64, Element)> = items.into_iter().collect();
        let length = items
            .iter()
            .map(|(k, e)| locate(*k, e.length(), ref_pos, Anchor::End))
            .fold(0.0, f64::max);
        let mut line = Self::with_config(length, ref_pos, config)?;
        for (pos, element) in items {
            line.mount(pos, element)?;
        }
        Ok(line)
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// Ring circumference, m.
    pub fn circumference(&self) -> f64 {
        self.circumference
    }

    /// The anchor that element keys refer to.
    pub fn ref_pos(&self) -> Anchor {
        self.ref_pos
    }

    /// Configuration.
    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    /// Number of mounted elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// `true` if nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Position of `anchor` for `element` keyed at `key` in this lattice.
    pub fn locate(&self, key: f64, element: &Element, anchor: Anchor) -> f64 {
        locate(key, element.length(), self.ref_pos, anchor)
    }

    /// Footprint `(begin, end)` of `element` keyed at `key`.
    pub fn footprint(&self, key: f64, element: &Element) -> (f64, f64) {
        let begin = self.locate(key, element, Anchor::Begin);
        (begin, begin + element.length())
    }

    /// Physical length of `element` under this lattice's fringe offset.
    pub fn phys_length(&self, element: &Element) -> f64 {
        element.phys_length(self.config.fringe_offset)
    }

    // ── Mount / dismount ───────────────────────────────────────────

    /// Mount `element` with its reference anchor at `pos`.
    ///
    /// The lattice takes ownership. An element already keyed at exactly
    /// `pos` is replaced and returned.
    ///
    /// # Errors
    ///
    /// [`LatticeError::NegativePosition`] for `pos < 0`,
    /// [`LatticeError::OutOfRange`] for `pos > C + length_tolerance`, and
    /// [`LatticeError::NoFreeSpace`] naming every neighbour the footprint
    /// would overlap.
    ///
    /// The upper bound carries the configured length tolerance so a key
    /// computed as `C` with rounding noise still mounts. Anything further
    /// out is rejected; positions are never moved.
    pub fn mount(&mut self, pos: f64, element: Element) -> Result<Option<Element>, LatticeError> {
        let tol = self.config.length_tolerance;
        if !pos.is_finite() || pos > self.circumference + tol {
            return Err(LatticeError::OutOfRange {
                pos,
                circumference: self.circumference,
            });
        }
        if pos < 0.0 {
            return Err(LatticeError::NegativePosition { pos });
        }

        let (begin, end) = self.footprint(pos, &element);
        let slot = self.search(pos);
        let (pred, succ) = match slot {
            Ok(i) => (i.checked_sub(1), i + 1),
            Err(i) => (i.checked_sub(1), i),
        };

        let mut colliding = Vec::new();
        if begin < -tol {
            colliding.push("<ring begin>".to_string());
        }
        if let Some((k, e)) = pred.and_then(|p| self.elements.get(p)) {
            if begin < self.footprint(*k, e).1 - tol {
                colliding.push(e.name.clone());
            }
        }
        if let Some((k, e)) = self.elements.get(succ) {
            if end > self.footprint(*k, e).0 + tol {
                colliding.push(e.name.clone());
            }
        }
        if end > self.circumference + tol {
            colliding.push("<ring end>".to_string());
        }
        if !colliding.is_empty() {
            return Err(LatticeError::NoFreeSpace {
                candidate: element.name.clone(),
                begin,
                end,
                colliding,
            });
        }

        info!(
            kind = %element.kind(),
            name = %element.name,
            pos,
            length = element.length(),
            "element mounted"
        );
        Ok(match slot {
            Ok(i) => Some(std::mem::replace(&mut self.elements[i].1, element)),
            Err(i) => {
                self.elements.insert(i, (pos, element));
                None
            }
        })
    }

    /// Remove and return the element keyed at exactly `pos`.
    ///
    /// A missing key is logged and yields `None`.
    pub fn dismount(&mut self, pos: f64) -> Option<Element> {
        match self.search(pos) {
            Ok(i) => Some(self.elements.remove(i).1),
            Err(_) => {
                warn!(pos, "dismount: no element at this position");
                None
            }
        }
    }

    /// Remove all elements.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    // ── Lookup ─────────────────────────────────────────────────────

    /// Element keyed at exactly `key`.
    pub fn get(&self, key: f64) -> Option<&Element> {
        self.search(key).ok().map(|i| &self.elements[i].1)
    }

    /// Mutable access to the element keyed at exactly `key`.
    ///
    /// Kind and length cannot change through this reference, so the
    /// footprint invariant holds.
    pub fn get_mut(&mut self, key: f64) -> Option<&mut Element> {
        match self.search(key) {
            Ok(i) => Some(&mut self.elements[i].1),
            Err(_) => None,
        }
    }

    /// The element whose footprint contains `pos`.
    ///
    /// Empty space yields a zero-field, zero-length drift placeholder that
    /// is owned by the lattice and never mounted.
    ///
    /// # Errors
    ///
    /// [`LatticeError::OutOfRange`] beyond the circumference or for a
    /// non-finite position, [`LatticeError::NegativePosition`] below 0.
    pub fn at(&self, pos: f64) -> Result<&Element, LatticeError> {
        Ok(match self.occupant(pos)? {
            Some(i) => &self.elements[i].1,
            None => &self.empty,
        })
    }

    /// Whether `element` is the empty-space placeholder of this lattice.
    pub fn is_empty_space(&self, element: &Element) -> bool {
        std::ptr::eq(element, &self.empty)
    }

    /// Index of the element containing `pos`.
    pub(crate) fn occupant(&self, pos: f64) -> Result<Option<usize>, LatticeError> {
        if !pos.is_finite() || pos > self.circumference + self.config.length_tolerance {
            return Err(LatticeError::OutOfRange {
                pos,
                circumference: self.circumference,
            });
        }
        if pos < 0.0 {
            return Err(LatticeError::NegativePosition { pos });
        }
        let contains = |i: usize| {
            let (k, e) = &self.elements[i];
            let (begin, end) = self.footprint(*k, e);
            begin <= pos && pos <= end
        };
        if matches!(self.ref_pos, Anchor::Begin | Anchor::Center) {
            let i = self.elements.partition_point(|(k, _)| *k <= pos);
            if i > 0 && contains(i - 1) {
                return Ok(Some(i - 1));
            }
        }
        if matches!(self.ref_pos, Anchor::Center | Anchor::End) {
            let i = self.elements.partition_point(|(k, _)| *k < pos);
            if i < self.elements.len() && contains(i) {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    /// Field at `pos` for transverse `orbit`, from the occupying element.
    pub fn field(&self, pos: f64, orbit: AccPair) -> Result<AccTriple, LatticeError> {
        Ok(self.at(pos)?.field(orbit))
    }

    /// RF-modulated field at `pos` in `turn`.
    pub fn field_turn(&self, pos: f64, orbit: AccPair, turn: u32) -> Result<AccTriple, LatticeError> {
        Ok(self.at(pos)?.field_turn(orbit, turn))
    }

    // ── Iteration ──────────────────────────────────────────────────

    /// Iterate over `(key, element)` in position order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (f64, &Element)> + ExactSizeIterator {
        self.elements.iter().map(|(k, e)| (*k, e))
    }

    /// Iterate over the elements matching `filter`, in position order.
    pub fn filter(&self, filter: impl Into<Filter>) -> impl DoubleEndedIterator<Item = (f64, &Element)> {
        let filter = filter.into();
        self.iter().filter(move |(_, e)| filter.matches(e))
    }

    /// Cursor at the first element (or the end, if empty).
    pub fn begin(&self) -> Cursor<'_> {
        Cursor::new(self, 0)
    }

    /// Cursor past the last element.
    pub fn end(&self) -> Cursor<'_> {
        Cursor::new(self, self.elements.len())
    }

    /// Cursor at the last element (or the end, if empty).
    pub fn last(&self) -> Cursor<'_> {
        Cursor::new(self, self.elements.len().saturating_sub(1))
    }

    /// Cursor at the element keyed at exactly `key`.
    pub fn cursor_at(&self, key: f64) -> Option<Cursor<'_>> {
        self.search(key).ok().map(|i| Cursor::new(self, i))
    }

    /// Cursor at the first element matching `filter` (or the end).
    pub fn first_matching(&self, filter: impl Into<Filter>) -> Cursor<'_> {
        let filter = filter.into();
        let i = self
            .elements
            .iter()
            .position(|(_, e)| filter.matches(e))
            .unwrap_or(self.elements.len());
        Cursor::new(self, i)
    }

    /// Cursor bound to `filter`, at the first matching element.
    pub fn typed(&self, filter: impl Into<Filter>) -> TypedCursor<'_> {
        let filter = filter.into();
        TypedCursor::new(self.first_matching(filter), filter)
    }

    pub(crate) fn entry(&self, index: usize) -> Option<&(f64, Element)> {
        self.elements.get(index)
    }

    pub(crate) fn entries(&self) -> &[(f64, Element)] {
        &self.elements
    }

    fn search(&self, key: f64) -> Result<usize, usize> {
        self.elements.binary_search_by(|(k, _)| k.total_cmp(&key))
    }
}
