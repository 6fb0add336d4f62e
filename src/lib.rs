pub mod error;
pub mod reader;
pub mod section;
pub mod set;

pub use error::{DecodeError, Error};
pub use reader::{DataReader, Endian};
pub use section::{DebugAranges, SetIter};
pub use set::{ArangeSet, Descriptor, Header};
