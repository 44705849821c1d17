/// Storage key under which the saved entries blob is kept
pub const ENTRIES_STORAGE_KEY: &str = "borsa_go_saved_entries";

/// Multiplier used to round calculator outputs to three decimals
pub const ROUNDING_FACTOR: f64 = 1000.0;

/// Decimal places used when rendering numbers for export
pub const DISPLAY_DECIMAL_PRECISION: usize = 3;

/// Stock name used when the caller leaves it blank
pub const DEFAULT_STOCK_NAME: &str = "Unnamed";

/// File name suggested for CSV exports
pub const EXPORT_FILE_NAME: &str = "borsa-go-saved-calculations.csv";

/// Timestamp layout of the "Saved At" export column
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
