pub mod config;
pub mod logging;

pub mod change;
pub mod checksum;
pub mod control;
pub mod error;
pub mod extract;
pub mod markup;
pub mod model;
pub mod options;
pub mod paths;
pub mod retry;
pub mod session;
pub mod storage;
pub mod sync;
pub mod timestamp;
pub mod transport;
