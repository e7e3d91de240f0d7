//! Result and Error types for the plt module

/// Type alias for `Result<T, plt::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `tectools-plt`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Failure to deserialise a byte stream
    #[error("failed to deserialise byte stream")]
    UnableToDeserialise(#[from] Box<bincode::ErrorKind>),

    /// Failure to serialise to a JSON string
    #[error("failed serde JSON operation")]
    JSONError(#[from] serde_json::Error),

    /// Version tag of an unsupported file format
    #[error("unsupported version tag (expected \"#!TDV112\", found {found:?})")]
    UnsupportedVersion {
        /// The 8 bytes actually read from the start of the file
        found: String,
    },

    /// String character outside the unicode code point range
    #[error("value {0} is not a valid unicode code point")]
    InvalidCodePoint(i32),

    /// Finite element zone types are detected but never decoded
    #[error("unsupported zone type {name} ({tag})")]
    UnsupportedZoneType {
        /// Raw zone type tag read from the zone record
        tag: i32,
        /// Conventional name for the finite element type
        name: &'static str,
    },

    /// Zone type tag outside the known enumeration
    #[error("unknown zone type tag {0}")]
    UnknownZoneType(i32),

    /// Variable format tag outside the known enumeration
    #[error("unrecognised variable format tag {0}")]
    UnknownVariableFormat(i32),

    /// Variable location flag outside the known enumeration
    #[error("unrecognised variable location flag {0}")]
    UnknownDataLocation(i32),

    /// Section marker that matches no known sentinel
    #[error("unknown section marker {0}")]
    UnknownMarker(f32),

    /// Section marker in the wrong position
    #[error("unexpected section marker (expected {expected}, found {found})")]
    UnexpectedMarker {
        /// The sentinel required at this point in the stream
        expected: f32,
        /// The sentinel actually read
        found: f32,
    },

    /// Geometry records are unsupported and their payload can not be skipped
    #[error("geometry records are unsupported")]
    UnsupportedGeometryRecord,

    /// Zone auxiliary key/value records are unsupported
    #[error("unsupported auxiliary data flag (expected 0, found {0})")]
    UnsupportedAuxiliaryData(i32),

    /// Face neighbour connectivity is unsupported
    #[error("unsupported face neighbour count (expected 0, found {0})")]
    UnsupportedFaceNeighbours(i32),

    /// User defined connections are unsupported
    #[error("unsupported user defined connection count (expected 0, found {0})")]
    UnsupportedConnections(i32),

    /// Passive variable flags are unsupported
    #[error("unsupported passive variable flag (expected 0, found {0})")]
    UnsupportedPassiveVariables(i32),

    /// Variable sharing between zones is unsupported
    #[error("unsupported variable sharing flag (expected 0, found {0})")]
    UnsupportedVariableSharing(i32),

    /// Variable count in the header must be non-negative
    #[error("invalid variable count {0}")]
    InvalidVariableCount(i32),

    /// Structured dimensions must all be at least 1
    #[error("invalid zone dimensions [{imax},{jmax},{kmax}]")]
    InvalidDimensions {
        /// Points along the i axis
        imax: i32,
        /// Points along the j axis
        jmax: i32,
        /// Points along the k axis
        kmax: i32,
    },

    /// Number of locations or variables inconsistent with the variable names
    #[error("inconsistent variable count (expected {expected}, found {found})")]
    InconsistentVariableCount {
        /// Count implied by the file level variable names
        expected: usize,
        /// Count actually provided
        found: usize,
    },

    /// Array length inconsistent with the declared extents and location
    #[error("unexpected array length for \"{name}\" (expected {expected}, found {found})")]
    UnexpectedArrayLength {
        /// Name of the offending variable
        name: String,
        /// Element count implied by the zone extents and data location
        expected: usize,
        /// Element count actually provided
        found: usize,
    },
}
