pub mod plink;

pub use plink::{read_bim, read_raw, BimIndex, PlinkDataset};
