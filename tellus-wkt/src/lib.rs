//! Well-known text and well-known binary codecs for [`tellus_geom`]
//! geometries.
//!
//! The text side handles all eight geometry types, `Z`/`M`/`ZM` ordinate
//! flags, `EMPTY` and the `SRID=n;` EWKT prefix. The binary side speaks
//! both byte orders and the EWKB Z/M/SRID type flags.

pub mod error;

mod reader;
mod tokenizer;
mod wkb;
mod writer;

pub use error::TellusWktError;
pub use reader::WktReader;
pub use wkb::{ByteOrder, WkbReader, WkbWriter};
pub use writer::WktWriter;
