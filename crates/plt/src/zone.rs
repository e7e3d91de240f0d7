//! Zone data structures for the structured plot format
//!
//! A zone is built in two sequential stages, matching the two passes the
//! file itself makes: a [ZoneHeader] holds everything read from the header
//! section, and a [Zone] completes it with the decoded variables from the
//! data section. Neither stage is mutated once constructed.

// crate modules
use crate::error::{Error, Result};
use crate::format::{DataLocation, VariableFormat};

// tectools modules
use tectools_utils::{f, ValueExt};

// external crates
use serde::{Deserialize, Serialize};

/// Structured grid extents of an ordered zone
///
/// The three dimension values are stored in the zone record as a contiguous
/// block of three 4-byte integers:
///
/// ```text
/// <imax> <jmax> <kmax>
/// ```
///
/// Cell counts are derived per axis as `max(dim - 1, 1)`, so an axis of a
/// single point still spans one cell.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    /// Number of points along the i axis
    pub imax: i32,
    /// Number of points along the j axis
    pub jmax: i32,
    /// Number of points along the k axis
    pub kmax: i32,
}

impl GridShape {
    /// A new shape from the three structured dimensions
    pub fn new(imax: i32, jmax: i32, kmax: i32) -> Self {
        Self { imax, jmax, kmax }
    }

    /// Number of cells along the i axis, clamped to at least 1
    pub fn i_cell(&self) -> i32 {
        (self.imax - 1).max(1)
    }

    /// Number of cells along the j axis, clamped to at least 1
    pub fn j_cell(&self) -> i32 {
        (self.jmax - 1).max(1)
    }

    /// Number of cells along the k axis, clamped to at least 1
    pub fn k_cell(&self) -> i32 {
        (self.kmax - 1).max(1)
    }

    /// Total number of grid vertices
    ///
    /// ```rust
    /// # use tectools_plt::GridShape;
    /// assert_eq!(GridShape::new(6, 11, 16).number_of_points(), 1056);
    /// ```
    pub fn number_of_points(&self) -> usize {
        (self.imax as usize) * (self.jmax as usize) * (self.kmax as usize)
    }

    /// Total number of grid cells
    ///
    /// ```rust
    /// # use tectools_plt::GridShape;
    /// assert_eq!(GridShape::new(6, 11, 16).number_of_cells(), 750);
    /// ```
    pub fn number_of_cells(&self) -> usize {
        (self.i_cell() as usize) * (self.j_cell() as usize) * (self.k_cell() as usize)
    }

    /// Logical (i, j, k) extents for values held at `location`
    pub fn extents(&self, location: DataLocation) -> (usize, usize, usize) {
        match location {
            DataLocation::Node => (self.imax as usize, self.jmax as usize, self.kmax as usize),
            DataLocation::Cell => (
                self.i_cell() as usize,
                self.j_cell() as usize,
                self.k_cell() as usize,
            ),
        }
    }

    /// Number of values held by a variable at `location`
    pub fn number_of_values(&self, location: DataLocation) -> usize {
        match location {
            DataLocation::Node => self.number_of_points(),
            DataLocation::Cell => self.number_of_cells(),
        }
    }

    /// Number of values stored in the file for a variable at `location`
    ///
    /// Cell centred blocks keep the full i and j point extents on disk and
    /// are trimmed back to cell counts after the read.
    pub(crate) fn number_stored(&self, location: DataLocation) -> usize {
        match location {
            DataLocation::Node => self.number_of_points(),
            DataLocation::Cell => {
                (self.imax as usize) * (self.jmax as usize) * (self.k_cell() as usize)
            }
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.imax < 1 || self.jmax < 1 || self.kmax < 1 {
            return Err(Error::InvalidDimensions {
                imax: self.imax,
                jmax: self.jmax,
                kmax: self.kmax,
            });
        }
        Ok(())
    }
}

/// Kind of zone held in the file
///
/// Ordered zones are the only decodable kind. The finite element kinds are
/// rejected by the reader with a named error rather than carried around as
/// empty variants.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKind {
    /// Structured grid-indexed zone
    Ordered(GridShape),
}

impl ZoneKind {
    /// Raw zone type tag written to the zone record
    pub(crate) fn tag(&self) -> i32 {
        match self {
            Self::Ordered(_) => 0,
        }
    }

    /// Structured extents of the zone
    pub fn grid(&self) -> &GridShape {
        match self {
            Self::Ordered(grid) => grid,
        }
    }
}

/// Zone metadata, the first of the two construction stages
///
/// Everything read from the zone record in the header section, before any
/// bulk data is available.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ZoneHeader {
    /// Zone name
    pub name: String,
    /// Parent zone identifier, -1 when there is none
    pub parent_zone: i32,
    /// Strand identifier for transient data, -1 for static zones
    pub strand_id: i32,
    /// Solution time
    pub solution_time: f64,
    /// Kind of zone, carrying the structured extents
    pub kind: ZoneKind,
    /// Data location of every file variable within this zone
    pub locations: Vec<DataLocation>,
}

impl ZoneHeader {
    /// Metadata for a new static ordered zone
    pub fn new(name: &str, grid: GridShape, locations: Vec<DataLocation>) -> Self {
        Self {
            name: name.to_string(),
            parent_zone: -1,
            strand_id: -1,
            solution_time: 0.0,
            kind: ZoneKind::Ordered(grid),
            locations,
        }
    }

    /// Structured extents of the zone
    pub fn grid(&self) -> &GridShape {
        self.kind.grid()
    }
}

/// Typed flat array of decoded values
///
/// Values are flattened in column-major order, with the first axis varying
/// fastest. The storage format is carried by the variant itself so the
/// format tag and the payload can never disagree.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum FieldValues {
    /// 4-byte IEEE floats
    Float(Vec<f32>),
    /// 8-byte IEEE doubles
    Double(Vec<f64>),
    /// Long integers, fixed to 4 bytes by the file format
    LongInt(Vec<i32>),
    /// 4-byte integers
    Int(Vec<i32>),
}

impl FieldValues {
    /// Number of values in the array
    pub fn len(&self) -> usize {
        match self {
            Self::Float(values) => values.len(),
            Self::Double(values) => values.len(),
            Self::LongInt(values) | Self::Int(values) => values.len(),
        }
    }

    /// True for an array with no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage format of the payload
    pub fn format(&self) -> VariableFormat {
        match self {
            Self::Float(_) => VariableFormat::Float,
            Self::Double(_) => VariableFormat::Double,
            Self::LongInt(_) => VariableFormat::LongInt,
            Self::Int(_) => VariableFormat::Int,
        }
    }

    /// Value at `index` as a double
    ///
    /// Panics when `index` is outside the array, like any slice access.
    pub fn value(&self, index: usize) -> f64 {
        match self {
            Self::Float(values) => values[index] as f64,
            Self::Double(values) => values[index],
            Self::LongInt(values) | Self::Int(values) => values[index] as f64,
        }
    }

    /// Minimum value as a double, 0.0 for an empty array
    pub fn min_value(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        match self {
            Self::Float(values) => values.iter().fold(f64::INFINITY, |m, &v| m.min(v as f64)),
            Self::Double(values) => values.iter().copied().fold(f64::INFINITY, f64::min),
            Self::LongInt(values) | Self::Int(values) => {
                values.iter().fold(f64::INFINITY, |m, &v| m.min(v as f64))
            }
        }
    }

    /// Maximum value as a double, 0.0 for an empty array
    pub fn max_value(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        match self {
            Self::Float(values) => values.iter().fold(f64::NEG_INFINITY, |m, &v| m.max(v as f64)),
            Self::Double(values) => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::LongInt(values) | Self::Int(values) => values
                .iter()
                .fold(f64::NEG_INFINITY, |m, &v| m.max(v as f64)),
        }
    }
}

/// One decoded variable within a zone
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FieldVariable {
    /// Minimum value over the zone
    pub min: f64,
    /// Maximum value over the zone
    pub max: f64,
    /// Flattened values in column-major order
    pub values: FieldValues,
}

impl FieldVariable {
    /// Wrap an array with bounds computed from its data
    pub fn new(values: FieldValues) -> Self {
        let min = values.min_value();
        let max = values.max_value();
        Self { min, max, values }
    }

    /// Storage format, derived from the payload
    pub fn format(&self) -> VariableFormat {
        self.values.format()
    }
}

/// A fully decoded zone, the second of the two construction stages
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Zone {
    /// Metadata read from the header section
    pub header: ZoneHeader,
    /// One decoded variable per file variable, in file order
    pub variables: Vec<FieldVariable>,
}

impl Zone {
    /// Complete a metadata stage with its decoded variables
    pub fn new(header: ZoneHeader, variables: Vec<FieldVariable>) -> Self {
        Self { header, variables }
    }

    /// Structured extents of the zone
    pub fn grid(&self) -> &GridShape {
        self.header.grid()
    }

    /// Data location of variable `index`
    pub fn location(&self, index: usize) -> DataLocation {
        self.header.locations[index]
    }

    /// Value of variable `index` at the logical (i, j, k) position
    ///
    /// The position is interpreted against the point extents for node
    /// centred variables and the cell extents for cell centred ones.
    pub fn value(&self, index: usize, i: usize, j: usize, k: usize) -> f64 {
        let (ni, nj, _) = self.grid().extents(self.location(index));
        self.variables[index].values.value(i + ni * (j + nj * k))
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let grid = self.grid();
        let mut s = f!("    Zone name     : {}\n", self.header.name);
        s += &f!(
            "    Shape [I,J,K] : [{},{},{}]\n",
            grid.imax,
            grid.jmax,
            grid.kmax
        );
        s += &f!("    Parent zone   : {}\n", self.header.parent_zone);
        s += &f!("    Strand id     : {}\n", self.header.strand_id);
        s += &f!(
            "    Solution time : {}\n",
            self.header.solution_time.sci(4, 2)
        );
        s += &f!("    Points        : {}\n", grid.number_of_points());
        s += &f!("    Cells         : {}", grid.number_of_cells());
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_counts_clamp_on_unit_axes() {
        let grid = GridShape::new(1, 11, 16);
        assert_eq!(grid.i_cell(), 1);
        assert_eq!(grid.j_cell(), 10);
        assert_eq!(grid.k_cell(), 15);
        assert_eq!(grid.number_of_cells(), 150);
    }

    #[test]
    fn stored_count_keeps_point_extents_on_i_and_j() {
        let grid = GridShape::new(6, 11, 16);
        assert_eq!(grid.number_stored(DataLocation::Node), 6 * 11 * 16);
        assert_eq!(grid.number_stored(DataLocation::Cell), 6 * 11 * 15);
    }

    #[test]
    fn degenerate_dimensions_are_rejected() {
        assert!(GridShape::new(0, 11, 16).validate().is_err());
        assert!(GridShape::new(6, -2, 16).validate().is_err());
        assert!(GridShape::new(1, 1, 1).validate().is_ok());
    }

    #[test]
    fn value_lookup_is_column_major() {
        // 2x2x1 grid with values 0..4 laid out first-axis-fastest
        let header = ZoneHeader::new(
            "unit",
            GridShape::new(2, 2, 1),
            vec![DataLocation::Node],
        );
        let variable = FieldVariable::new(FieldValues::Int(vec![0, 1, 2, 3]));
        let zone = Zone::new(header, vec![variable]);

        assert_eq!(zone.value(0, 0, 0, 0), 0.0);
        assert_eq!(zone.value(0, 1, 0, 0), 1.0);
        assert_eq!(zone.value(0, 0, 1, 0), 2.0);
        assert_eq!(zone.value(0, 1, 1, 0), 3.0);
    }

    #[test]
    fn bounds_follow_the_data() {
        let variable = FieldVariable::new(FieldValues::Double(vec![3.0, -1.5, 2.0]));
        assert_eq!(variable.min, -1.5);
        assert_eq!(variable.max, 3.0);
        assert_eq!(variable.format(), VariableFormat::Double);
    }
}
