pub mod aggregate;
pub mod init;
pub mod print;

pub use aggregate::execute_aggregate;
pub use init::execute_init;
pub use print::execute_print;
