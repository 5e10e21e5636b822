#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

mod bus;
mod conversion;
mod driver;
mod error;
mod fault;
mod lines;
mod register;
mod timing;

pub use conversion::{RTD_FULL_SCALE, resistance, temperature};
pub use driver::{Max31865, RTD_CODE_MAX};
pub use error::{Error, Line};
pub use fault::FaultStatus;
pub use lines::{LineNames, LineProvider};
pub use register::{ConfigRegister, FilterMode, Register, WireMode};
pub use timing::Timing;
