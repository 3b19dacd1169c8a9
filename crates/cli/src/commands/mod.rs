//! Command implementations for routectl

pub mod list;
pub mod route;

use clap::ValueEnum;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PowerState {
    On,
    Off,
}
