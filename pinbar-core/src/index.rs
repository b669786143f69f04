//! Pin indices
//!
//! An [`Index`] is a single pin, a [`Span`] (slice-like range) or an explicit
//! list of pins. Indices are interpreted in the active [`AddressSpace`]:
//! the namespace offset is subtracted before selecting pins.

use core::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use heapless::Vec;

use crate::addressing::AddressSpace;
use crate::error::PinBarError;
use crate::MAX_PINS;

/// Stand-in for an open range end
const UNBOUNDED: i64 = i64::MAX;

/// Namespace positions selected by an index
pub type Positions = Vec<usize, MAX_PINS>;

/// Shape of an index, used to pick validation rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndexKind {
    /// One pin
    Single,
    /// A range of pins
    Span,
    /// An explicit list of pins
    List,
}

/// Slice-like range with optional bounds and step
///
/// Bounds follow slice semantics: they are never bounds-checked, negative
/// values count from the end and the result is clipped to the namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Span {
    /// First index (inclusive), `None` for the open end
    pub start: Option<i32>,
    /// Last index (exclusive), `None` for the open end
    pub stop: Option<i32>,
    /// Step, `None` for 1
    pub step: Option<i32>,
}

impl Span {
    /// The whole namespace
    pub const fn full() -> Self {
        Self {
            start: None,
            stop: None,
            step: None,
        }
    }

    /// Range between two optional bounds
    pub const fn new(start: Option<i32>, stop: Option<i32>) -> Self {
        Self {
            start,
            stop,
            step: None,
        }
    }

    /// Same range with a step
    pub const fn step_by(self, step: i32) -> Self {
        Self {
            step: Some(step),
            ..self
        }
    }

    /// Remove the namespace offset from an explicit bound
    ///
    /// A positive bound never drops below zero. A non-positive bound keeps
    /// counting from the end while the result stays negative, otherwise it
    /// becomes unbounded.
    fn shift(bound: i32, offset: i32) -> i64 {
        let bound = i64::from(bound);
        let offset = i64::from(offset);

        if offset == 0 {
            bound
        } else if bound > 0 {
            (bound - offset).max(0)
        } else if bound - offset < 0 {
            bound - offset
        } else {
            UNBOUNDED
        }
    }

    /// Namespace positions covered by this range
    pub fn positions(&self, space: &AddressSpace) -> Result<Positions, PinBarError> {
        let step = i64::from(self.step.unwrap_or(1));
        if step == 0 {
            return Err(PinBarError::InvalidIndexType);
        }

        let len = space.len() as i64;
        let offset = space.offset();
        let mut positions = Vec::new();

        if step > 0 {
            let clip = |x: i64| if x < 0 { (x + len).max(0) } else { x.min(len) };
            let start = self.start.map_or(0, |b| clip(Self::shift(b, offset)));
            let stop = clip(self.stop.map_or(UNBOUNDED, |b| Self::shift(b, offset)));

            let mut i = start;
            while i < stop {
                positions
                    .push(i as usize)
                    .map_err(|_| PinBarError::CapacityExceeded)?;
                i += step;
            }
        } else {
            let clip = |x: i64| {
                if x < 0 {
                    (x + len).max(-1)
                } else {
                    x.min(len - 1)
                }
            };
            let start = self.start.map_or(len - 1, |b| clip(Self::shift(b, offset)));
            let stop = self.stop.map_or(-1, |b| clip(Self::shift(b, offset)));

            let mut i = start;
            while i > stop {
                positions
                    .push(i as usize)
                    .map_err(|_| PinBarError::CapacityExceeded)?;
                i += step;
            }
        }

        Ok(positions)
    }
}

/// Pin selector for the accessor methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Index<'a> {
    /// One pin
    Single(i32),
    /// A slice-like range of pins
    Span(Span),
    /// An explicit list of pins, repeats allowed
    List(&'a [i32]),
}

impl Index<'_> {
    /// Shape of this index
    pub fn kind(&self) -> IndexKind {
        match self {
            Index::Single(_) => IndexKind::Single,
            Index::Span(_) => IndexKind::Span,
            Index::List(_) => IndexKind::List,
        }
    }

    /// Check the index against a namespace
    ///
    /// Single indices and list entries must lie inside the namespace.
    /// Ranges are only checked for a usable step.
    pub fn validate(&self, space: &AddressSpace) -> Result<(), PinBarError> {
        match self {
            Index::Single(index) => {
                if space.contains(*index) {
                    Ok(())
                } else {
                    Err(space.out_of_range(*index, None))
                }
            }
            Index::Span(span) => {
                if span.step == Some(0) {
                    Err(PinBarError::InvalidIndexType)
                } else {
                    Ok(())
                }
            }
            Index::List(indices) => {
                if indices.len() > MAX_PINS {
                    return Err(PinBarError::CapacityExceeded);
                }
                for (position, &index) in indices.iter().enumerate() {
                    if !space.contains(index) {
                        return Err(space.out_of_range(index, Some(position)));
                    }
                }
                Ok(())
            }
        }
    }

    /// Namespace positions selected by this index, in index order
    pub fn positions(&self, space: &AddressSpace) -> Result<Positions, PinBarError> {
        match self {
            Index::Single(index) => {
                let position = space
                    .position(*index)
                    .ok_or_else(|| space.out_of_range(*index, None))?;
                let mut positions = Vec::new();
                positions
                    .push(position)
                    .map_err(|_| PinBarError::CapacityExceeded)?;
                Ok(positions)
            }
            Index::Span(span) => span.positions(space),
            Index::List(indices) => {
                let mut positions = Vec::new();
                for (i, &index) in indices.iter().enumerate() {
                    let position = space
                        .position(index)
                        .ok_or_else(|| space.out_of_range(index, Some(i)))?;
                    positions
                        .push(position)
                        .map_err(|_| PinBarError::CapacityExceeded)?;
                }
                Ok(positions)
            }
        }
    }
}

impl From<i32> for Index<'_> {
    fn from(index: i32) -> Self {
        Index::Single(index)
    }
}

impl From<Span> for Index<'_> {
    fn from(span: Span) -> Self {
        Index::Span(span)
    }
}

impl From<Range<i32>> for Index<'_> {
    fn from(range: Range<i32>) -> Self {
        Index::Span(Span::new(Some(range.start), Some(range.end)))
    }
}

impl From<RangeFrom<i32>> for Index<'_> {
    fn from(range: RangeFrom<i32>) -> Self {
        Index::Span(Span::new(Some(range.start), None))
    }
}

impl From<RangeTo<i32>> for Index<'_> {
    fn from(range: RangeTo<i32>) -> Self {
        Index::Span(Span::new(None, Some(range.end)))
    }
}

impl From<RangeFull> for Index<'_> {
    fn from(_: RangeFull) -> Self {
        Index::Span(Span::full())
    }
}

// An inclusive end of i32::MAX is the same as an open end
impl From<RangeInclusive<i32>> for Index<'_> {
    fn from(range: RangeInclusive<i32>) -> Self {
        Index::Span(Span::new(Some(*range.start()), range.end().checked_add(1)))
    }
}

impl From<RangeToInclusive<i32>> for Index<'_> {
    fn from(range: RangeToInclusive<i32>) -> Self {
        Index::Span(Span::new(None, range.end.checked_add(1)))
    }
}

impl<'a> From<&'a [i32]> for Index<'a> {
    fn from(indices: &'a [i32]) -> Self {
        Index::List(indices)
    }
}

impl<'a, const N: usize> From<&'a [i32; N]> for Index<'a> {
    fn from(indices: &'a [i32; N]) -> Self {
        Index::List(indices)
    }
}
