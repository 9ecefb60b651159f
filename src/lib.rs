#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod bitboard;
mod board;
mod common;
mod config;
mod game;
mod heap;
mod hunt;
#[cfg(feature = "std")]
mod logging;
mod player;
mod probability;
mod region;
mod ship;
mod shots;
mod targeting;
mod tiers;

pub use bitboard::{BitBoard, BitBoardError, Cells, GridMask};
pub use board::*;
pub use common::*;
pub use config::*;
pub use game::*;
pub use heap::{DrainMax, ProbEntry, RegionHeap};
pub use hunt::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, init_logging_with, level_from_env};
pub use player::*;
pub use probability::{fit_count, ProbabilityGrid};
pub use region::*;
pub use ship::*;
pub use shots::ShotGrid;
pub use targeting::{RiskPosture, Targeting};
pub use tiers::*;
