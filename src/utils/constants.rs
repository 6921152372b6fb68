/// Study window of the original county climate collection
pub const DEFAULT_START_YEAR: i32 = 2010;
pub const DEFAULT_END_YEAR: i32 = 2024;

/// k for nearest-neighbour gap filling
pub const DEFAULT_NEIGHBORS: usize = 3;

/// Default locations
pub const DEFAULT_INPUT_DIR: &str = "data/raw/climate_noaa";
pub const DEFAULT_OUTPUT_FILE: &str = "data/processed/climate_features_2010_2024.csv";

/// Daily observation file layout
pub const SOURCE_FILE_EXTENSION: &str = "csv";
pub const DATE_COLUMN: &str = "date";

/// Cell values read as "no observation" rather than as bad data
pub const NULL_TOKENS: [&str; 8] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "-nan"];

/// Environment prefix for configuration overrides (CLIMATE_FEATURES_NEIGHBORS, ...)
pub const ENV_PREFIX: &str = "CLIMATE_FEATURES";

/// Output
pub const PARQUET_EXTENSION: &str = "parquet";
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
pub const SUPPORTED_COMPRESSIONS: [&str; 5] = [
    COMPRESSION_SNAPPY,
    COMPRESSION_GZIP,
    COMPRESSION_LZ4,
    COMPRESSION_ZSTD,
    COMPRESSION_NONE,
];
