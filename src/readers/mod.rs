pub mod county_scanner;
pub mod observation_reader;

pub use county_scanner::{CountyInventory, CountyScanner};
pub use observation_reader::{parse_observation_date, ObservationReader};
