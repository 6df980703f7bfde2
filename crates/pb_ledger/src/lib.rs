pub mod backends;

pub use backends::file::FileLedger;
pub use backends::memory::MemoryLedger;

pub mod prelude {
    pub use super::backends::file::FileLedger;
    pub use super::backends::memory::MemoryLedger;
    pub use pb_core::{Ledger, Result};
}
