//! Domain logic and core data structures
//!
//! Pure data and lookups with no knowledge of timers, rendering or I/O.

pub mod matcher;
pub mod navigation;
pub mod solutions;
pub mod user;
