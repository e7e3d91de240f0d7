//! Read operations for binary plot files
//!
//! # Quickstart
//!
//! The simplest way to decode a file is the convenience function:
//!
//! ```rust, no_run
//! # use tectools_plt::read_plt_file;
//! let plt = read_plt_file("/path/to/flow.plt").unwrap();
//! ```
//!
//! Under the hood this initialises a [PltReader]. The reader is public for
//! the rare case where an option needs changing, such as the handling of
//! cell centred data on unit axes:
//!
//! ```rust, no_run
//! # use tectools_plt::{CellTrim, PltReader};
//! let mut reader = PltReader::new();
//! reader.set_cell_trim(CellTrim::Strict);
//! let plt = reader.parse("/path/to/flow.plt").unwrap();
//! ```
//!
//! # Implementation overview
//!
//! Decoding is a strict single pass over the byte stream:
//!
//! - the fixed file prologue and variable names
//! - zone metadata records, delimited by float sentinels, up to the
//!   end-of-header sentinel
//! - one bulk data block per zone, in declaration order
//!
//! Later fields depend positionally on exactly how many bytes earlier
//! fields consumed, so nothing is ever skipped. Records this codec does not
//! implement (finite element zones, geometry records, auxiliary data,
//! passive or shared variables) are rejected with explicit errors; silently
//! passing over them would desynchronise every field that follows.

// standard library
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::file::PltFile;
use crate::format::{self, DataLocation, VariableFormat, VERSION_TAG};
use crate::stream::StreamReader;
use crate::zone::{FieldValues, FieldVariable, GridShape, Zone, ZoneHeader, ZoneKind};

// external crates
use bincode::deserialize;
use log::{trace, warn};

/// Decode the binary plot file at `path`
///
/// Returns a Result containing a [PltFile] with all the information
/// extracted from the file.
///
/// ```rust, no_run
/// # use tectools_plt::read_plt_file;
/// // Read the example file
/// let plt = read_plt_file("./data/cavity.plt").unwrap();
///
/// // Print a summary of the data
/// println!("{plt}");
/// ```
pub fn read_plt_file<P: AsRef<Path>>(path: P) -> Result<PltFile> {
    PltReader::new().parse(path)
}

/// Handling of cell centred arrays on axes of unit length
///
/// Cell centred blocks are stored with full i and j point extents, and the
/// last index along both axes is dropped after the read. An axis of a
/// single point has a cell count of 1, so dropping its only index would
/// erase the axis entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellTrim {
    /// Keep unit axes at size 1, the behaviour real datasets rely on
    #[default]
    Clamped,
    /// Always drop the last index, erasing unit axes
    Strict,
}

/// A reader for `#!TDV112` binary plot files
///
/// Holds the decode options. For a straight read with the defaults prefer
/// [read_plt_file].
#[derive(Debug, Default)]
pub struct PltReader {
    /// Unit axis handling for cell centred arrays
    cell_trim: CellTrim,
}

impl PltReader {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Change the handling of unit axes in cell centred arrays
    pub fn set_cell_trim(&mut self, cell_trim: CellTrim) {
        self.cell_trim = cell_trim;
    }

    /// Decode the file at `path`
    pub fn parse<P: AsRef<Path>>(&self, path: P) -> Result<PltFile> {
        let file = File::open(path)?;
        self.decode(BufReader::new(file))
    }

    /// Decode a full plot file from any byte source
    pub fn decode<R: Read>(&self, source: R) -> Result<PltFile> {
        let mut stream = StreamReader::new(source);

        let mut plt = read_file_header(&mut stream)?;
        let n_vars = plt.number_of_variables();

        // header section: zone metadata records up to the end sentinel
        let mut headers = Vec::new();
        loop {
            let marker = stream.read_f32()?;
            if marker == format::EOH_MARKER {
                break;
            } else if marker == format::ZONE_MARKER {
                headers.push(read_zone_header(&mut stream, n_vars)?);
            } else if marker == format::GEOMETRY_MARKER {
                // the payload layout is unknown, so it can not be skipped
                return Err(Error::UnsupportedGeometryRecord);
            } else {
                return Err(Error::UnknownMarker(marker));
            }
        }

        // data section: one block per zone, in declaration order
        for header in headers {
            plt.zones.push(read_zone_data(&mut stream, header, self.cell_trim)?);
        }

        Ok(plt)
    }
}

/// Read the fixed file prologue and variable names
fn read_file_header<R: Read>(stream: &mut StreamReader<R>) -> Result<PltFile> {
    let mut tag = [0u8; 8];
    stream.read_bytes(&mut tag)?;
    if tag != VERSION_TAG.as_bytes() {
        return Err(Error::UnsupportedVersion {
            found: String::from_utf8_lossy(&tag).into_owned(),
        });
    }

    let byte_order = stream.read_i32()?;
    if byte_order != 1 {
        warn!("byte order flag {byte_order} in header, assuming little-endian");
    }
    let file_type = stream.read_i32()?;
    let title = stream.read_string()?;

    let count = stream.read_i32()?;
    let n_vars = usize::try_from(count).map_err(|_| Error::InvalidVariableCount(count))?;
    let mut variable_names = Vec::with_capacity(n_vars);
    for _ in 0..n_vars {
        variable_names.push(stream.read_string()?);
    }

    let mut plt = PltFile::new(&title);
    plt.byte_order = byte_order;
    plt.file_type = file_type;
    plt.variable_names = variable_names;
    Ok(plt)
}

/// Read one zone metadata record following a zone sentinel
fn read_zone_header<R: Read>(stream: &mut StreamReader<R>, n_vars: usize) -> Result<ZoneHeader> {
    let name = stream.read_string()?;
    let parent_zone = stream.read_i32()?;
    let strand_id = stream.read_i32()?;
    let solution_time = stream.read_f64()?;
    let _reserved = stream.read_i32()?;
    let type_tag = stream.read_i32()?;

    // a flag of 0 means every variable is node centred
    let location_flag = stream.read_i32()?;
    let locations = if location_flag == 0 {
        vec![DataLocation::Node; n_vars]
    } else {
        stream
            .read_i32_list(n_vars)?
            .into_iter()
            .map(DataLocation::from_flag)
            .collect::<Result<Vec<DataLocation>>>()?
    };

    let face_neighbours = stream.read_i32()?;
    if face_neighbours != 0 {
        return Err(Error::UnsupportedFaceNeighbours(face_neighbours));
    }
    let connections = stream.read_i32()?;
    if connections != 0 {
        return Err(Error::UnsupportedConnections(connections));
    }

    let kind = match type_tag {
        0 => ZoneKind::Ordered(read_grid(stream)?),
        _ => {
            return Err(match format::zone_type_name(type_tag) {
                Some(name) => Error::UnsupportedZoneType {
                    tag: type_tag,
                    name,
                },
                None => Error::UnknownZoneType(type_tag),
            })
        }
    };

    // no auxiliary key/value records may follow the zone
    let auxiliary = stream.read_i32()?;
    if auxiliary != 0 {
        return Err(Error::UnsupportedAuxiliaryData(auxiliary));
    }

    trace!("parsed header for zone \"{name}\"");

    Ok(ZoneHeader {
        name,
        parent_zone,
        strand_id,
        solution_time,
        kind,
        locations,
    })
}

/// Deserialise the 3 x i32 grid extent block
fn read_grid<R: Read>(stream: &mut StreamReader<R>) -> Result<GridShape> {
    let mut buffer = [0u8; 3 * std::mem::size_of::<i32>()];
    stream.read_bytes(&mut buffer)?;
    let grid: GridShape = deserialize(&buffer)?;
    grid.validate()?;
    Ok(grid)
}

/// Read one bulk data block and complete the zone
fn read_zone_data<R: Read>(
    stream: &mut StreamReader<R>,
    header: ZoneHeader,
    cell_trim: CellTrim,
) -> Result<Zone> {
    let marker = stream.read_f32()?;
    if marker != format::ZONE_MARKER {
        return Err(Error::UnexpectedMarker {
            expected: format::ZONE_MARKER,
            found: marker,
        });
    }

    let n_vars = header.locations.len();
    let formats = stream
        .read_i32_list(n_vars)?
        .into_iter()
        .map(VariableFormat::from_tag)
        .collect::<Result<Vec<VariableFormat>>>()?;

    let has_passive = stream.read_i32()?;
    if has_passive != 0 {
        return Err(Error::UnsupportedPassiveVariables(has_passive));
    }
    let has_sharing = stream.read_i32()?;
    if has_sharing != 0 {
        return Err(Error::UnsupportedVariableSharing(has_sharing));
    }
    let share_zone = stream.read_i32()?;
    trace!("share zone number {share_zone} ignored");

    let mut bounds = Vec::with_capacity(n_vars);
    for _ in 0..n_vars {
        let min = stream.read_f64()?;
        let max = stream.read_f64()?;
        bounds.push((min, max));
    }

    let mut variables = Vec::with_capacity(n_vars);
    for (index, variable_format) in formats.into_iter().enumerate() {
        let location = header.locations[index];
        let values = read_variable(stream, header.grid(), variable_format, location, cell_trim)?;
        let (min, max) = bounds[index];
        variables.push(FieldVariable { min, max, values });
    }

    Ok(Zone::new(header, variables))
}

/// Decode one variable's array payload
fn read_variable<R: Read>(
    stream: &mut StreamReader<R>,
    grid: &GridShape,
    variable_format: VariableFormat,
    location: DataLocation,
    cell_trim: CellTrim,
) -> Result<FieldValues> {
    let count = grid.number_stored(location);

    let values = match variable_format {
        VariableFormat::Float => FieldValues::Float(stream.read_f32_list(count)?),
        VariableFormat::Double => FieldValues::Double(stream.read_f64_list(count)?),
        VariableFormat::LongInt => FieldValues::LongInt(stream.read_i32_list(count)?),
        VariableFormat::Int => FieldValues::Int(stream.read_i32_list(count)?),
    };

    Ok(match location {
        DataLocation::Node => values,
        DataLocation::Cell => trim_cell_values(values, grid, cell_trim),
    })
}

/// Trim a cell centred block from its stored extents back to cell counts
fn trim_cell_values(values: FieldValues, grid: &GridShape, cell_trim: CellTrim) -> FieldValues {
    match values {
        FieldValues::Float(stored) => FieldValues::Float(trim_cell_array(&stored, grid, cell_trim)),
        FieldValues::Double(stored) => {
            FieldValues::Double(trim_cell_array(&stored, grid, cell_trim))
        }
        FieldValues::LongInt(stored) => {
            FieldValues::LongInt(trim_cell_array(&stored, grid, cell_trim))
        }
        FieldValues::Int(stored) => FieldValues::Int(trim_cell_array(&stored, grid, cell_trim)),
    }
}

/// Drop the final padding index along the i and j axes
///
/// The stored block spans (imax, jmax, kCell) in column-major order. Unit
/// axes keep their single index under [CellTrim::Clamped].
fn trim_cell_array<T: Copy>(stored: &[T], grid: &GridShape, cell_trim: CellTrim) -> Vec<T> {
    let imax = grid.imax as usize;
    let jmax = grid.jmax as usize;
    let k_cell = grid.k_cell() as usize;

    let (i_keep, j_keep) = match cell_trim {
        CellTrim::Clamped => (grid.i_cell() as usize, grid.j_cell() as usize),
        CellTrim::Strict => (imax - 1, jmax - 1),
    };

    let mut trimmed = Vec::with_capacity(i_keep * j_keep * k_cell);
    for k in 0..k_cell {
        for j in 0..j_keep {
            for i in 0..i_keep {
                trimmed.push(stored[i + imax * (j + jmax * k)]);
            }
        }
    }
    trimmed
}
