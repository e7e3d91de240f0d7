//! Write operations for binary plot files
//!
//! The writer is the exact structural mirror of the reader: file header,
//! zone metadata records, the end-of-header sentinel, then one bulk data
//! block per zone. Both sides must agree on every byte, so the field order
//! here is the single place to change in step with
//! [decode](crate::PltReader::decode).

// standard library
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::file::PltFile;
use crate::format::{self, DataLocation, VERSION_TAG};
use crate::stream::StreamWriter;
use crate::zone::{FieldValues, FieldVariable, GridShape, Zone};

// external crates
use bincode::serialize;

/// Encode `plt` to a binary plot file at `path`
///
/// The whole file is validated against the shape invariants before any byte
/// is produced, and the encoded output lands in a sibling scratch file that
/// is renamed over `path` once complete. A failed write never leaves a
/// truncated file at `path`.
///
/// ```rust, no_run
/// # use tectools_plt::{write_plt_file, read_plt_file};
/// // Read the example file
/// let plt = read_plt_file("./data/cavity.plt").unwrap();
///
/// // Write an identical copy next to it
/// write_plt_file(&plt, "./data/cavity_copy.plt").unwrap();
/// ```
pub fn write_plt_file<P: AsRef<Path>>(plt: &PltFile, path: P) -> Result<()> {
    validate(plt)?;

    let path = path.as_ref();
    let scratch = path.with_extension("plt.partial");

    let result = write_scratch(plt, &scratch).and_then(|_| Ok(fs::rename(&scratch, path)?));
    if result.is_err() {
        // nothing useful to do about a failed cleanup
        let _ = fs::remove_file(&scratch);
    }
    result
}

/// Encode `plt` to any byte sink
///
/// The buffer-level mirror of [PltReader::decode](crate::PltReader::decode),
/// with the same validation as [write_plt_file].
pub fn encode<W: Write>(plt: &PltFile, sink: W) -> Result<()> {
    validate(plt)?;
    let mut stream = StreamWriter::new(sink);

    write_file_header(&mut stream, plt)?;
    for zone in &plt.zones {
        stream.write_f32(format::ZONE_MARKER)?;
        write_zone_header(&mut stream, zone)?;
    }
    stream.write_f32(format::EOH_MARKER)?;
    for zone in &plt.zones {
        write_zone_data(&mut stream, zone)?;
    }
    Ok(())
}

/// Write decoded [PltFile] data to a JSON file
///
/// A direct serialisation of the decoded model for inspection or analysis.
///
/// ```rust, no_run
/// # use tectools_plt::{read_plt_file, write_json};
/// // Read the example file
/// let plt = read_plt_file("./data/cavity.plt").unwrap();
///
/// // Write a direct translation of the decoded data to JSON
/// write_json(&plt, "./cavity.json").unwrap();
/// ```
pub fn write_json<P: AsRef<Path>>(plt: &PltFile, path: P) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, plt)?;
    Ok(())
}

/// Encode into the scratch file, flushing before the rename
fn write_scratch(plt: &PltFile, scratch: &Path) -> Result<()> {
    let file = File::create(scratch)?;
    let mut writer = BufWriter::new(file);
    encode(plt, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Check the whole file against the shape invariants before writing
fn validate(plt: &PltFile) -> Result<()> {
    let n_vars = plt.variable_names.len();
    for zone in &plt.zones {
        let header = &zone.header;
        header.grid().validate()?;

        if header.locations.len() != n_vars {
            return Err(Error::InconsistentVariableCount {
                expected: n_vars,
                found: header.locations.len(),
            });
        }
        if zone.variables.len() != n_vars {
            return Err(Error::InconsistentVariableCount {
                expected: n_vars,
                found: zone.variables.len(),
            });
        }

        for (index, variable) in zone.variables.iter().enumerate() {
            let expected = header.grid().number_of_values(header.locations[index]);
            let found = variable.values.len();
            if found != expected {
                return Err(Error::UnexpectedArrayLength {
                    name: plt.variable_names[index].clone(),
                    expected,
                    found,
                });
            }
        }
    }
    Ok(())
}

/// Emit the fixed file prologue and variable names
fn write_file_header<W: Write>(stream: &mut StreamWriter<W>, plt: &PltFile) -> Result<()> {
    stream.write_bytes(VERSION_TAG.as_bytes())?;
    stream.write_i32(plt.byte_order)?;
    stream.write_i32(plt.file_type)?;
    stream.write_string(&plt.title)?;
    stream.write_i32(plt.variable_names.len() as i32)?;
    for name in &plt.variable_names {
        stream.write_string(name)?;
    }
    Ok(())
}

/// Emit one zone metadata record, without its leading sentinel
fn write_zone_header<W: Write>(stream: &mut StreamWriter<W>, zone: &Zone) -> Result<()> {
    let header = &zone.header;
    stream.write_string(&header.name)?;
    stream.write_i32(header.parent_zone)?;
    stream.write_i32(header.strand_id)?;
    stream.write_f64(header.solution_time)?;
    stream.write_i32(-1)?; // reserved
    stream.write_i32(header.kind.tag())?;

    // always the explicit per-variable location list
    stream.write_i32(1)?;
    let flags = header
        .locations
        .iter()
        .map(DataLocation::flag)
        .collect::<Vec<i32>>();
    stream.write_i32_list(&flags)?;

    stream.write_i32(0)?; // face neighbour count
    stream.write_i32(0)?; // user defined connections
    write_grid(stream, header.grid())?;
    stream.write_i32(0)?; // no auxiliary records
    Ok(())
}

/// Serialise the 3 x i32 grid extent block
fn write_grid<W: Write>(stream: &mut StreamWriter<W>, grid: &GridShape) -> Result<()> {
    let buffer = serialize(grid)?;
    stream.write_bytes(&buffer)
}

/// Emit one bulk data block for the zone
fn write_zone_data<W: Write>(stream: &mut StreamWriter<W>, zone: &Zone) -> Result<()> {
    stream.write_f32(format::ZONE_MARKER)?;

    let tags = zone
        .variables
        .iter()
        .map(|variable| variable.format().tag())
        .collect::<Vec<i32>>();
    stream.write_i32_list(&tags)?;

    stream.write_i32(0)?; // no passive variables
    stream.write_i32(0)?; // no variable sharing
    stream.write_i32(-1)?; // share zone number

    // bounds come from the caller data before any padding is applied
    for variable in &zone.variables {
        stream.write_f64(variable.values.min_value())?;
        stream.write_f64(variable.values.max_value())?;
    }

    for (index, variable) in zone.variables.iter().enumerate() {
        write_variable(stream, zone, index, variable)?;
    }
    Ok(())
}

/// Emit one variable's array payload
fn write_variable<W: Write>(
    stream: &mut StreamWriter<W>,
    zone: &Zone,
    index: usize,
    variable: &FieldVariable,
) -> Result<()> {
    match zone.location(index) {
        DataLocation::Node => write_values(stream, &variable.values),
        DataLocation::Cell => write_values(stream, &pad_cell_values(&variable.values, zone.grid())),
    }
}

fn write_values<W: Write>(stream: &mut StreamWriter<W>, values: &FieldValues) -> Result<()> {
    match values {
        FieldValues::Float(v) => stream.write_f32_list(v),
        FieldValues::Double(v) => stream.write_f64_list(v),
        FieldValues::LongInt(v) | FieldValues::Int(v) => stream.write_i32_list(v),
    }
}

/// Pad a cell centred array out to its stored (imax, jmax, kCell) extents
fn pad_cell_values(values: &FieldValues, grid: &GridShape) -> FieldValues {
    match values {
        FieldValues::Float(logical) => FieldValues::Float(pad_cell_array(logical, grid)),
        FieldValues::Double(logical) => FieldValues::Double(pad_cell_array(logical, grid)),
        FieldValues::LongInt(logical) => FieldValues::LongInt(pad_cell_array(logical, grid)),
        FieldValues::Int(logical) => FieldValues::Int(pad_cell_array(logical, grid)),
    }
}

/// Append one zero slice along i and one along j before flattening
///
/// Mirrors the trim applied by the reader: axes of a single point are
/// already at their stored extent and take no padding.
fn pad_cell_array<T: Copy + Default>(logical: &[T], grid: &GridShape) -> Vec<T> {
    let imax = grid.imax as usize;
    let jmax = grid.jmax as usize;
    let i_cell = grid.i_cell() as usize;
    let j_cell = grid.j_cell() as usize;
    let k_cell = grid.k_cell() as usize;

    let mut stored = Vec::with_capacity(imax * jmax * k_cell);
    for k in 0..k_cell {
        for j in 0..jmax {
            for i in 0..imax {
                if i < i_cell && j < j_cell {
                    stored.push(logical[i + i_cell * (j + j_cell * k)]);
                } else {
                    stored.push(T::default());
                }
            }
        }
    }
    stored
}
