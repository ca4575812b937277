//! # ppp-io: Instance and Solution Files
//!
//! Plain-text formats for placement problems. Both are line based, with
//! whitespace-separated integers and `#` comment lines allowed anywhere.
//!
//! - [`instance`] - city count, grid side, both radii, then city coordinates
//! - [`placement`] - tower count then tower coordinates, under a penalty header
//!
//! String functions return a typed [`ParseError`]; the file helpers wrap
//! everything in `anyhow` with the path attached.

mod error;
pub mod instance;
mod lines;
pub mod placement;

pub use error::ParseError;
pub use instance::{format_instance, parse_instance, read_instance, write_instance};
pub use placement::{
    format_placement, parse_placement, read_placement, recorded_penalty, write_placement,
    write_placement_if_better,
};
