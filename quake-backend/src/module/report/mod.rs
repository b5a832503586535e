//! Kandilli report parsing
//!
//! Turns the raw `lst0.asp` page into structured earthquake records.
//! Nothing here touches the network: every acquisition stage hands its
//! response body to [`parse_report`].

pub mod locator;
pub mod parser;

pub use locator::{locate_lines, NO_DATA};
pub use parser::{parse_line, parse_report, LineError};
