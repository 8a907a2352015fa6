mod cell;
mod error;
mod export;
mod grid;
mod noise;
mod path;
mod persist;
mod regions;
mod terraform;
mod terrain;
mod topology;

pub use cell::*;
pub use error::*;
pub use export::*;
pub use grid::*;
pub use noise::*;
pub use path::*;
pub use persist::*;
pub use regions::*;
pub use terraform::*;
pub use terrain::*;
pub use topology::*;
