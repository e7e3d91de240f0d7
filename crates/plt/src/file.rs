//! Top-level representation of a decoded plot file

// crate modules
use crate::format::{DataLocation, VariableFormat, VERSION_TAG};
use crate::zone::{FieldValues, FieldVariable, GridShape, Zone, ZoneHeader};

// tectools modules
use tectools_utils::f;

// external crates
use serde::Serialize;

/// Representation of data in a `#!TDV112` binary plot file
///
/// The version tag is a constant of the format ([VERSION_TAG]) and is not
/// carried here; it is checked on read and emitted on write.
///
/// Variable names are file level and apply uniformly to every zone. Each
/// zone holds the per-variable locations and decoded arrays.
///
/// ```rust, no_run
/// # use tectools_plt::read_plt_file;
/// // Read the example file
/// let plt = read_plt_file("./data/cavity.plt").unwrap();
///
/// // Print a summary of the data
/// println!("{plt}");
/// ```
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PltFile {
    /// Byte order flag from the header, 1 for native little-endian
    pub byte_order: i32,
    /// File type flag, 0 for a full dataset
    pub file_type: i32,
    /// Dataset title
    pub title: String,
    /// Ordered variable names, shared by every zone
    pub variable_names: Vec<String>,
    /// Zones in file order
    pub zones: Vec<Zone>,
}

impl PltFile {
    /// An empty file with the default header flags
    pub fn new(title: &str) -> Self {
        Self {
            byte_order: 1,
            file_type: 0,
            title: title.to_string(),
            variable_names: Vec::new(),
            zones: Vec::new(),
        }
    }

    /// A single zone dataset from flat column-major arrays
    ///
    /// Convenience for the common write path. Names default to `V1`, `V2`,
    /// ... when none are given, and every variable defaults to node centred
    /// data.
    ///
    /// ```rust
    /// # use tectools_plt::{FieldValues, GridShape, PltFile};
    /// let values = FieldValues::Double(vec![0.0, 1.0, 2.0, 3.0]);
    /// let plt = PltFile::from_arrays(
    ///     GridShape::new(2, 2, 1),
    ///     vec![values],
    ///     None,
    ///     None,
    /// );
    /// assert_eq!(plt.names(), ["V1"]);
    /// ```
    pub fn from_arrays(
        grid: GridShape,
        arrays: Vec<FieldValues>,
        names: Option<Vec<String>>,
        locations: Option<Vec<DataLocation>>,
    ) -> Self {
        let n_vars = arrays.len();
        let names = names.unwrap_or_else(|| (1..=n_vars).map(|i| f!("V{i}")).collect());
        let locations = locations.unwrap_or_else(|| vec![DataLocation::Node; n_vars]);

        let header = ZoneHeader::new("Simple Zone", grid, locations);
        let variables = arrays.into_iter().map(FieldVariable::new).collect();

        let mut plt = Self::new("Simple Dataset");
        plt.variable_names = names;
        plt.zones.push(Zone::new(header, variables));
        plt
    }

    /// Number of file level variables
    pub fn number_of_variables(&self) -> usize {
        self.variable_names.len()
    }

    /// Ordered list of variable names
    pub fn names(&self) -> &[String] {
        &self.variable_names
    }

    /// Structured extents of the first zone
    pub fn shape(&self) -> Option<&GridShape> {
        self.zones.first().map(Zone::grid)
    }

    /// Data location of variable `index` in the first zone
    pub fn location(&self, index: usize) -> Option<DataLocation> {
        self.zones.first()?.header.locations.get(index).copied()
    }

    /// Storage format of variable `index` in the first zone
    pub fn format(&self, index: usize) -> Option<VariableFormat> {
        Some(self.zones.first()?.variables.get(index)?.format())
    }

    /// Decoded values of variable `index` in the first zone
    pub fn values(&self, index: usize) -> Option<&FieldValues> {
        Some(&self.zones.first()?.variables.get(index)?.values)
    }

    /// Decoded values of the named variable in the first zone
    pub fn values_by_name(&self, name: &str) -> Option<&FieldValues> {
        let index = self.variable_names.iter().position(|n| n == name)?;
        self.values(index)
    }
}

impl std::fmt::Display for PltFile {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Binary plot file\n".to_string();
        s += &f!("Version             : {}\n", VERSION_TAG);
        s += &f!("Byte order          : {}\n", self.byte_order);
        s += &f!("File type           : {}\n", self.file_type);
        s += &f!("Title               : {}\n", self.title);
        s += &f!("Number of variables : {}\n", self.number_of_variables());
        s += &f!("Variables           : {}\n", self.variable_names.join(", "));

        for (index, zone) in self.zones.iter().enumerate() {
            s += &f!("--> Zone            : {}\n", index);
            s += &f!("{}\n", zone);
        }

        write!(f, "{}", s.trim_end_matches('\n'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_names_and_locations() {
        let values = FieldValues::Float(vec![0.0; 8]);
        let plt = PltFile::from_arrays(GridShape::new(2, 2, 2), vec![values], None, None);

        assert_eq!(plt.names(), ["V1"]);
        assert_eq!(plt.location(0), Some(DataLocation::Node));
        assert_eq!(plt.format(0), Some(VariableFormat::Float));
        assert_eq!(plt.title, "Simple Dataset");
        assert_eq!(plt.zones[0].header.name, "Simple Zone");
    }

    #[test]
    fn lookup_by_name() {
        let values = FieldValues::Int(vec![4, 5, 6, 7]);
        let plt = PltFile::from_arrays(
            GridShape::new(2, 2, 1),
            vec![values.clone()],
            Some(vec!["p".to_string()]),
            None,
        );

        assert_eq!(plt.values_by_name("p"), Some(&values));
        assert_eq!(plt.values_by_name("missing"), None);
    }
}
