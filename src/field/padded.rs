//! Local block with halo layers.

use std::ops::Range;

use crate::decomposition::Subdomain;
use crate::types::{Axis, Extent3, LineIndex, Side};

use super::Field3;

/// A rank's local block: interior points plus a halo of width `h` on every face.
///
/// Shape `(nz + 2h, ny + 2h, nx + 2h)`, row-major. The interior is
/// authoritative; halo cells mirror a neighbor's boundary and are only
/// meaningful right after a halo exchange along the axis being read.
///
/// # Example
///
/// ```
/// use cfd_rs::field::PaddedField;
/// use cfd_rs::types::Extent3;
///
/// let mut f = PaddedField::zeros(Extent3::new(2, 2, 2), 1);
/// assert_eq!(f.padded_extent(), Extent3::new(4, 4, 4));
///
/// f.set(0, 1, 1, 3.0);
/// assert_eq!(f.get(0, 1, 1), 3.0);
/// assert_eq!(f.interior().get(0, 1, 1), 3.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PaddedField {
    extent: Extent3,
    halo: usize,
    padded: Extent3,
    data: Vec<f64>,
}

impl PaddedField {
    /// Zero block with interior `extent` and halo width `halo`.
    pub fn zeros(extent: Extent3, halo: usize) -> Self {
        let padded = extent.padded(halo);
        Self {
            extent,
            halo,
            padded,
            data: vec![0.0; padded.len()],
        }
    }

    /// Zero block shaped for `sub`.
    pub fn for_subdomain(sub: &Subdomain) -> Self {
        Self::zeros(sub.extent, sub.halo)
    }

    /// Block for `sub` whose interior holds `f([gz, gy, gx])` at global indices.
    ///
    /// Halo cells are zero until the first exchange.
    pub fn from_global_fn<F>(sub: &Subdomain, mut f: F) -> Self
    where
        F: FnMut([usize; 3]) -> f64,
    {
        let mut field = Self::for_subdomain(sub);
        let [oz, oy, ox] = sub.offset;
        for k in 0..sub.extent.nz {
            for j in 0..sub.extent.ny {
                for i in 0..sub.extent.nx {
                    field.set(k, j, i, f([oz + k, oy + j, ox + i]));
                }
            }
        }
        field
    }

    /// Block whose interior is a copy of `interior`.
    pub fn from_interior(interior: &Field3, halo: usize) -> Self {
        let extent = interior.extent();
        let mut field = Self::zeros(extent, halo);
        for k in 0..extent.nz {
            for j in 0..extent.ny {
                for i in 0..extent.nx {
                    field.set(k, j, i, interior.get(k, j, i));
                }
            }
        }
        field
    }

    /// Interior extent.
    #[inline]
    pub fn extent(&self) -> Extent3 {
        self.extent
    }

    /// Halo width.
    #[inline]
    pub fn halo(&self) -> usize {
        self.halo
    }

    /// Extent including halos.
    #[inline]
    pub fn padded_extent(&self) -> Extent3 {
        self.padded
    }

    /// All values including halos, row-major.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to all values including halos.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Linear index of interior point `(k, j, i)`.
    #[inline]
    fn interior_index(&self, k: usize, j: usize, i: usize) -> usize {
        let h = self.halo;
        self.padded.linear(k + h, j + h, i + h)
    }

    /// Interior value at `(k, j, i)`.
    #[inline]
    pub fn get(&self, k: usize, j: usize, i: usize) -> f64 {
        self.data[self.interior_index(k, j, i)]
    }

    /// Set the interior value at `(k, j, i)`.
    #[inline]
    pub fn set(&mut self, k: usize, j: usize, i: usize, value: f64) {
        let idx = self.interior_index(k, j, i);
        self.data[idx] = value;
    }

    /// Value at padded coordinates (halo included, `0..n + 2h` per axis).
    #[inline]
    pub fn get_padded(&self, pk: usize, pj: usize, pi: usize) -> f64 {
        self.data[self.padded.linear(pk, pj, pi)]
    }

    /// Copy of the interior points.
    pub fn interior(&self) -> Field3 {
        Field3::from_fn(self.extent, |k, j, i| self.get(k, j, i))
    }

    /// Overwrite the interior with `interior`, leaving halos untouched.
    ///
    /// # Panics
    ///
    /// Panics if the extents differ.
    pub fn set_interior(&mut self, interior: &Field3) {
        assert_eq!(self.extent, interior.extent(), "interior extent mismatch");
        for k in 0..self.extent.nz {
            for j in 0..self.extent.ny {
                for i in 0..self.extent.nx {
                    self.set(k, j, i, interior.get(k, j, i));
                }
            }
        }
    }

    /// Start index and stride of the padded line parallel to `axis`.
    ///
    /// `line` numbers the interior lines row-major over the two remaining
    /// axes. The returned start points at padded coordinate 0 along `axis`,
    /// so interior point `t` of the line sits at `start + (t + h) * stride`.
    pub fn line_offsets(&self, axis: Axis, line: LineIndex) -> (usize, usize) {
        let [p, q] = axis.others();
        let nq = self.extent.get(q);
        let (cp, cq) = (line.get() / nq, line.get() % nq);

        let mut padded_coords = [0usize; 3];
        padded_coords[p.index()] = cp + self.halo;
        padded_coords[q.index()] = cq + self.halo;
        padded_coords[axis.index()] = 0;

        let start = self
            .padded
            .linear(padded_coords[0], padded_coords[1], padded_coords[2]);
        (start, self.padded.strides()[axis.index()])
    }

    /// Padded-coordinate range along `axis` of the interior slab on `side`.
    fn interior_slab(&self, axis: Axis, side: Side) -> Range<usize> {
        let (h, n) = (self.halo, self.extent.get(axis));
        match side {
            Side::Low => h..2 * h,
            Side::High => n..n + h,
        }
    }

    /// Padded-coordinate range along `axis` of the halo slab on `side`.
    fn halo_slab(&self, axis: Axis, side: Side) -> Range<usize> {
        let (h, n) = (self.halo, self.extent.get(axis));
        match side {
            Side::Low => 0..h,
            Side::High => n + h..n + 2 * h,
        }
    }

    /// Number of values in one slab normal to `axis`.
    #[inline]
    pub fn slab_len(&self, axis: Axis) -> usize {
        self.halo * self.extent.line_count(axis)
    }

    /// Visit the linear indices of a slab, row-major.
    ///
    /// The slab spans `range` along `axis` and the interior along the other
    /// two axes (corners and edges of the halo are never touched).
    fn for_each_slab_index<F>(&self, axis: Axis, range: Range<usize>, mut f: F)
    where
        F: FnMut(usize),
    {
        let h = self.halo;
        let mut ranges = [
            h..h + self.extent.nz,
            h..h + self.extent.ny,
            h..h + self.extent.nx,
        ];
        ranges[axis.index()] = range;
        for pk in ranges[0].clone() {
            for pj in ranges[1].clone() {
                for pi in ranges[2].clone() {
                    f(self.padded.linear(pk, pj, pi));
                }
            }
        }
    }

    /// Copy out the interior boundary slab on `side` of `axis`.
    pub fn pack_boundary(&self, axis: Axis, side: Side) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.slab_len(axis));
        self.for_each_slab_index(axis, self.interior_slab(axis, side), |idx| {
            out.push(self.data[idx]);
        });
        out
    }

    /// Copy out the halo slab on `side` of `axis`.
    pub fn pack_halo(&self, axis: Axis, side: Side) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.slab_len(axis));
        self.for_each_slab_index(axis, self.halo_slab(axis, side), |idx| {
            out.push(self.data[idx]);
        });
        out
    }

    /// Write `values` into the halo slab on `side` of `axis`.
    ///
    /// Returns `Err(expected_len)` if `values` has the wrong length, leaving
    /// the halo untouched.
    pub fn unpack_halo(&mut self, axis: Axis, side: Side, values: &[f64]) -> Result<(), usize> {
        let expected = self.slab_len(axis);
        if values.len() != expected {
            return Err(expected);
        }
        let mut indices = Vec::with_capacity(expected);
        self.for_each_slab_index(axis, self.halo_slab(axis, side), |idx| indices.push(idx));
        for (idx, &v) in indices.into_iter().zip(values) {
            self.data[idx] = v;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(extent: Extent3, halo: usize) -> PaddedField {
        let mut f = PaddedField::zeros(extent, halo);
        for k in 0..extent.nz {
            for j in 0..extent.ny {
                for i in 0..extent.nx {
                    f.set(k, j, i, (100 * k + 10 * j + i) as f64);
                }
            }
        }
        f
    }

    #[test]
    fn test_interior_roundtrip() {
        let f = numbered(Extent3::new(2, 3, 4), 1);
        let interior = f.interior();
        let back = PaddedField::from_interior(&interior, 1);
        assert_eq!(back, f);
    }

    #[test]
    fn test_pack_boundary_x() {
        let f = numbered(Extent3::new(2, 2, 3), 1);
        assert_eq!(f.pack_boundary(Axis::X, Side::Low), vec![0.0, 10.0, 100.0, 110.0]);
        assert_eq!(f.pack_boundary(Axis::X, Side::High), vec![2.0, 12.0, 102.0, 112.0]);
    }

    #[test]
    fn test_pack_boundary_wide_halo() {
        let f = numbered(Extent3::new(3, 1, 1), 2);
        assert_eq!(f.pack_boundary(Axis::Z, Side::Low), vec![0.0, 100.0]);
        assert_eq!(f.pack_boundary(Axis::Z, Side::High), vec![100.0, 200.0]);
    }

    #[test]
    fn test_unpack_halo_writes_only_halo() {
        let mut f = numbered(Extent3::new(2, 2, 2), 1);
        let interior_before = f.interior();
        f.unpack_halo(Axis::Y, Side::High, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(f.interior(), interior_before);
        assert_eq!(f.pack_halo(Axis::Y, Side::High), vec![1.0, 2.0, 3.0, 4.0]);
        // padded (k=1, j=3, i=1) is the first halo value
        assert_eq!(f.get_padded(1, 3, 1), 1.0);
    }

    #[test]
    fn test_unpack_halo_length_checked() {
        let mut f = PaddedField::zeros(Extent3::new(2, 2, 2), 1);
        assert_eq!(f.unpack_halo(Axis::Z, Side::Low, &[1.0]), Err(4));
    }

    #[test]
    fn test_line_offsets_walk_axis() {
        let f = numbered(Extent3::new(2, 3, 4), 1);
        // Line (k=1, i=2) along y
        let line = LineIndex::new(4 + 2);
        let (start, stride) = f.line_offsets(Axis::Y, line);
        let h = f.halo();
        for t in 0..3 {
            assert_eq!(f.as_slice()[start + (t + h) * stride], f.get(1, t, 2));
        }
    }
}
