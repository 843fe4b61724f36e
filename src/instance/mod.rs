mod tsplib;

pub use tsplib::{InstanceError, TsplibInstance};
