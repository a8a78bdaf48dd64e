// Each test binary uses a different subset of these helpers
#![allow(unused_imports, dead_code)]

mod s3_utils;
mod test_setup;
mod utils;

pub use s3_utils::*;
pub use test_setup::*;
pub use utils::*;
