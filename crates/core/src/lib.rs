#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod color;
pub mod direction;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use color::Rgba;
pub use direction::Direction;

/// World seed driving every stochastic step of grid generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldSeed(pub u64);

impl WorldSeed {
    /// Derive the seed for a generation sub-domain.
    ///
    /// Each domain gets an independent, reproducible RNG stream so that
    /// adding draws in one stage never shifts the draws of another.
    pub fn scoped(self, domain: RngDomain) -> u64 {
        self.0 ^ domain.offset()
    }

    /// Fold the seed into 32 bits for generators with a narrower seed
    /// space, keeping the upper half significant.
    pub fn fold32(self) -> u32 {
        (self.0 ^ (self.0 >> 32)) as u32
    }
}

/// Named RNG sub-domains used during grid construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngDomain {
    /// Midpoint-displacement corner/perturbation draws.
    Heightmap,
    /// River and forest carving walks.
    Terraform,
    /// Ad-hoc query-surface sampling (`random_cell` and friends).
    Query,
}

impl RngDomain {
    fn offset(self) -> u64 {
        match self {
            RngDomain::Heightmap => 0x67_72_69_64_68_6D_61_70,
            RngDomain::Terraform => 0x74_65_72_72_61_66_6F_72,
            RngDomain::Query => 0x71_75_65_72_79_72_6E_67,
        }
    }
}

/// Helper to derive a reproducible RNG for one generation domain.
pub fn scoped_rng(seed: WorldSeed, domain: RngDomain) -> StdRng {
    StdRng::seed_from_u64(seed.scoped(domain))
}
