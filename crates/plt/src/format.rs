//! Wire-level vocabulary for the binary plot layout
//!
//! Every field in the file is a fixed-width little-endian value. Structural
//! boundaries are delimited by reserved 4-byte float sentinels.

// crate modules
use crate::error::{Error, Result};

// external crates
use serde::{Deserialize, Serialize};

/// Magic version tag at the start of every supported file
pub const VERSION_TAG: &str = "#!TDV112";

/// Sentinel opening a zone record in both the header and data sections
pub(crate) const ZONE_MARKER: f32 = 299.0;

/// Sentinel closing the header section
pub(crate) const EOH_MARKER: f32 = 357.0;

/// Sentinel opening a geometry record
pub(crate) const GEOMETRY_MARKER: f32 = 399.0;

/// Storage format of a variable's data block
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableFormat {
    /// 4-byte IEEE float
    Float,
    /// 8-byte IEEE double
    Double,
    /// Long integer, fixed to 4 bytes by the file format
    LongInt,
    /// 4-byte integer
    Int,
}

impl VariableFormat {
    /// Interpret a raw format tag from a zone data block
    pub(crate) fn from_tag(tag: i32) -> Result<Self> {
        match tag {
            1 => Ok(Self::Float),
            2 => Ok(Self::Double),
            3 => Ok(Self::LongInt),
            4 => Ok(Self::Int),
            _ => Err(Error::UnknownVariableFormat(tag)),
        }
    }

    /// Raw tag written to a zone data block
    pub(crate) fn tag(&self) -> i32 {
        match self {
            Self::Float => 1,
            Self::Double => 2,
            Self::LongInt => 3,
            Self::Int => 4,
        }
    }
}

/// Location of a variable's values within the structured grid
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataLocation {
    /// One value per grid vertex
    #[default]
    Node,
    /// One value per grid cell
    Cell,
}

impl DataLocation {
    /// Interpret a raw location flag from a zone record
    pub(crate) fn from_flag(flag: i32) -> Result<Self> {
        match flag {
            0 => Ok(Self::Node),
            1 => Ok(Self::Cell),
            _ => Err(Error::UnknownDataLocation(flag)),
        }
    }

    /// Raw flag written to a zone record
    pub(crate) fn flag(&self) -> i32 {
        match self {
            Self::Node => 0,
            Self::Cell => 1,
        }
    }
}

/// Conventional names for the finite element zone type tags
///
/// Used only for rejections, since none of these kinds are decodable.
pub(crate) fn zone_type_name(tag: i32) -> Option<&'static str> {
    match tag {
        1 => Some("FELINESEG"),
        2 => Some("FETRIANGLE"),
        3 => Some("FEQUADRILATERAL"),
        4 => Some("FETETRAHEDRON"),
        5 => Some("FEBRICK"),
        6 => Some("FEPOLYGON"),
        7 => Some("FEPOLYHEDRON"),
        _ => None,
    }
}
