//! Geometry kernel: integer axis-aligned boxes, positions and regions.
//!
//! All volumes use closed-open interval semantics `[min, min + extent)` on
//! every axis, so two regions sharing a face do not intersect.
//!
//! Axis mapping: `x` = width, `y` = depth, `z` = height. The access face of
//! every container is the face at `depth = 0`.

use crate::{Error, Result};
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier of an item.
pub type ItemId = String;

/// Unique identifier of a container.
pub type ContainerId = String;

/// One of the three box axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// `x`, the width axis.
    Width,
    /// `y`, the depth axis.
    Depth,
    /// `z`, the height axis.
    Height,
}

impl Axis {
    /// All axes in `x, y, z` order.
    pub const ALL: [Axis; 3] = [Axis::Width, Axis::Depth, Axis::Height];

    /// Index of the axis in a coordinate vector.
    pub fn index(self) -> usize {
        match self {
            Axis::Width => 0,
            Axis::Depth => 1,
            Axis::Height => 2,
        }
    }
}

/// Axis along which items are inserted into and pulled out of a container.
pub const ACCESS_AXIS: Axis = Axis::Depth;

/// Axis permutations in canonical order. Each entry lists which source
/// dimension ends up on the (width, depth, height) axes.
pub const ORIENTATION_PERMUTATIONS: [(usize, usize, usize); 6] = [
    (0, 1, 2), // Original
    (0, 2, 1), // Rotated 90° around width
    (1, 0, 2), // Rotated 90° around height
    (1, 2, 0),
    (2, 0, 1),
    (2, 1, 0), // Rotated 90° around depth
];

/// A box with positive integer dimensions `(width, depth, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Box3 {
    dims: Vector3<u32>,
}

impl Box3 {
    /// Creates a box. Use [`Box3::validate`] to reject zero extents.
    pub fn new(width: u32, depth: u32, height: u32) -> Self {
        Self {
            dims: Vector3::new(width, depth, height),
        }
    }

    /// Returns the dimensions as a vector.
    pub fn dims(&self) -> &Vector3<u32> {
        &self.dims
    }

    /// Returns the width.
    pub fn width(&self) -> u32 {
        self.dims.x
    }

    /// Returns the depth.
    pub fn depth(&self) -> u32 {
        self.dims.y
    }

    /// Returns the height.
    pub fn height(&self) -> u32 {
        self.dims.z
    }

    /// Returns the extent along an axis.
    pub fn extent(&self, axis: Axis) -> u32 {
        self.dims[axis.index()]
    }

    /// Returns the volume.
    pub fn volume(&self) -> u128 {
        self.dims.iter().map(|&d| u128::from(d)).product()
    }

    /// Returns true if every dimension is positive.
    pub fn is_valid(&self) -> bool {
        self.dims.iter().all(|&d| d > 0)
    }

    /// Fails with [`Error::InvalidGeometry`] unless every dimension is positive.
    pub fn validate(&self) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::InvalidGeometry(format!(
                "All dimensions must be positive, got {}x{}x{}",
                self.width(),
                self.depth(),
                self.height()
            )));
        }
        Ok(())
    }

    /// Returns true if this box fits inside `interior` without rotation.
    pub fn fits_within(&self, interior: &Box3) -> bool {
        self.dims.iter().zip(interior.dims.iter()).all(|(a, b)| a <= b)
    }

    /// Returns the box with its dimensions permuted.
    pub fn permuted(&self, (x_idx, y_idx, z_idx): (usize, usize, usize)) -> Box3 {
        Box3::new(self.dims[x_idx], self.dims[y_idx], self.dims[z_idx])
    }
}

/// Returns the distinct orientations of a box, original first, then the
/// remaining permutations in canonical order. Permutations that produce equal
/// dimensions collapse to one.
pub fn orientations(b: &Box3) -> Vec<Box3> {
    orientations_from(b, &ORIENTATION_PERMUTATIONS)
}

/// Like [`orientations`], restricted to the given permutations.
pub fn orientations_from(b: &Box3, permutations: &[(usize, usize, usize)]) -> Vec<Box3> {
    let mut result: Vec<Box3> = Vec::with_capacity(permutations.len());
    for &perm in permutations {
        let candidate = b.permuted(perm);
        if !result.contains(&candidate) {
            result.push(candidate);
        }
    }
    result
}

/// Returns true if the box fits inside `interior` under some orientation.
pub fn fits(b: &Box3, interior: &Box3) -> bool {
    orientations(b).iter().any(|o| o.fits_within(interior))
}

/// The minimum corner of a box inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    coords: Vector3<u32>,
}

impl Position {
    /// Creates a position.
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self {
            coords: Vector3::new(x, y, z),
        }
    }

    /// The container origin.
    pub fn origin() -> Self {
        Self::new(0, 0, 0)
    }

    /// Returns the coordinates as a vector.
    pub fn coords(&self) -> &Vector3<u32> {
        &self.coords
    }

    /// Returns the x (width) coordinate.
    pub fn x(&self) -> u32 {
        self.coords.x
    }

    /// Returns the y (depth) coordinate.
    pub fn y(&self) -> u32 {
        self.coords.y
    }

    /// Returns the z (height) coordinate.
    pub fn z(&self) -> u32 {
        self.coords.z
    }

    /// Returns the coordinate along an axis.
    pub fn coord(&self, axis: Axis) -> u32 {
        self.coords[axis.index()]
    }

    /// Search order key: depth first, then height, then width.
    pub fn access_key(&self) -> (u32, u32, u32) {
        (self.y(), self.z(), self.x())
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::origin()
    }
}

/// A box at a position: the volume `[x, x+w) × [y, y+d) × [z, z+h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region {
    /// Minimum corner.
    pub position: Position,
    /// Extent along each axis.
    pub dims: Box3,
}

impl Region {
    /// Creates a region.
    pub fn new(position: Position, dims: Box3) -> Self {
        Self { position, dims }
    }

    /// Returns the minimum coordinate along an axis.
    pub fn min(&self, axis: Axis) -> u64 {
        u64::from(self.position.coord(axis))
    }

    /// Returns the exclusive maximum coordinate along an axis.
    pub fn max(&self, axis: Axis) -> u64 {
        self.min(axis) + u64::from(self.dims.extent(axis))
    }

    /// Returns the volume.
    pub fn volume(&self) -> u128 {
        self.dims.volume()
    }

    /// Returns true if the projections on `axis` overlap with positive length.
    pub fn overlaps_on(&self, other: &Region, axis: Axis) -> bool {
        self.min(axis) < other.max(axis) && other.min(axis) < self.max(axis)
    }

    /// Returns true if the two volumes overlap with positive volume.
    pub fn intersects(&self, other: &Region) -> bool {
        Axis::ALL.iter().all(|&axis| self.overlaps_on(other, axis))
    }

    /// Returns true if the region lies fully inside `interior` placed at the origin.
    pub fn contained_in(&self, interior: &Box3) -> bool {
        Axis::ALL
            .iter()
            .all(|&axis| self.max(axis) <= u64::from(interior.extent(axis)))
    }

    /// Returns true if `self` lies between `other` and the access face and
    /// their projections overlap on the two remaining axes.
    pub fn blocks(&self, other: &Region) -> bool {
        self.max(ACCESS_AXIS) <= other.min(ACCESS_AXIS)
            && Axis::ALL
                .iter()
                .filter(|&&axis| axis != ACCESS_AXIS)
                .all(|&axis| self.overlaps_on(other, axis))
    }

    /// The three far corners projected on each axis, used as candidate anchors.
    /// Corners that do not fit in `u32` are skipped.
    pub fn far_corners(&self) -> Vec<Position> {
        let p = self.position;
        [
            u32::try_from(self.max(Axis::Width)).map(|x| Position::new(x, p.y(), p.z())),
            u32::try_from(self.max(Axis::Depth)).map(|y| Position::new(p.x(), y, p.z())),
            u32::try_from(self.max(Axis::Height)).map(|z| Position::new(p.x(), p.y(), z)),
        ]
        .into_iter()
        .filter_map(|corner| corner.ok())
        .collect()
    }
}

/// Returns true if the two regions overlap with positive volume.
pub fn intersects(a: &Region, b: &Region) -> bool {
    a.intersects(b)
}

/// Returns true if `region` lies fully inside a container of size `interior`.
pub fn contained_in(region: &Region, interior: &Box3) -> bool {
    region.contained_in(interior)
}
