//! Human readable sizes for the Size column.

const MIB: u64 = 1024 * 1024;
const GIB: u64 = MIB * 1024;

/// Unit labels used when rendering sizes.
///
/// Both variants divide by powers of 1024. `Legacy` labels the result GB/MB,
/// which is what users of this tool have always seen; `Binary` uses the
/// correct GiB/MiB names and is opt-in since it changes the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SizeUnits {
    #[default]
    Legacy,
    Binary,
}

impl SizeUnits {
    fn labels(self) -> (&'static str, &'static str) {
        match self {
            SizeUnits::Legacy => ("GB", "MB"),
            SizeUnits::Binary => ("GiB", "MiB"),
        }
    }
}

/// Render `bytes` as GB when at least 1024³, MB otherwise, two decimals.
pub fn format_size(bytes: u64) -> String {
    format_size_with(bytes, SizeUnits::Legacy)
}

pub fn format_size_with(bytes: u64, units: SizeUnits) -> String {
    let (gb, mb) = units.labels();
    if bytes >= GIB {
        format!("{:.2} {}", bytes as f64 / GIB as f64, gb)
    } else {
        format!("{:.2} {}", bytes as f64 / MIB as f64, mb)
    }
}
