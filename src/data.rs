use crate::table::Table;

/// Name of the version axis, used as the table index and the legend title.
pub const VERSION_AXIS: &str = "Versión";

/// Name of the instance axis, used as the x-axis label.
pub const INSTANCE_AXIS: &str = "Conjunto de Datos";

/// Program versions, in legend order.
pub const VERSIONS: [&str; 4] = ["1", "2", "3", "4"];

/// uf20 benchmark instances, in x-axis order. "uf20-800" has no leading zero
/// in the measurement log and is kept that way.
pub const INSTANCES: [&str; 8] = [
    "uf20-01",
    "uf20-0100",
    "uf20-0200",
    "uf20-0400",
    "uf20-0600",
    "uf20-800",
    "uf20-0999",
    "uf20-01000",
];

/// Measured speedup per instance; each entry lists versions 1..=4.
const SPEEDUPS: [(&str, [f64; 4]); 8] = [
    ("uf20-01", [1.45, 21.84, 0.35, 0.34]),
    ("uf20-0100", [1.72, 20.15, 0.36, 0.33]),
    ("uf20-0200", [1.43, 21.56, 0.36, 0.34]),
    ("uf20-0400", [1.73, 20.64, 0.36, 0.34]),
    ("uf20-0600", [1.54, 20.68, 0.37, 0.34]),
    ("uf20-800", [1.47, 20.89, 0.35, 0.36]),
    ("uf20-0999", [1.49, 21.07, 0.33, 0.36]),
    ("uf20-01000", [1.35, 20.46, 0.34, 0.32]),
];

/// The speedup table indexed by version, with one column per instance.
pub fn speedup_table() -> Table {
    let index = VERSIONS.iter().map(|v| v.to_string()).collect();
    let columns = SPEEDUPS
        .iter()
        .map(|(instance, values)| (instance.to_string(), values.to_vec()))
        .collect();

    // The literal is rectangular and its labels are unique, so this cannot fail.
    match Table::from_columns(VERSION_AXIS, index, columns) {
        Ok(table) => table.with_columns_name(INSTANCE_AXIS),
        Err(e) => unreachable!("built-in speedup table is malformed: {e}"),
    }
}
