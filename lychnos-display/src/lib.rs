//! SSD1306-class panel driver for the Lychnos status display
//!
//! Drives a page-addressed monochrome OLED over I2C: rasterizes shapes and
//! text into the packed framebuffer from `lychnos-core`, streams it to the
//! controller in bus-sized chunks, and manages panel power (On/Dim/Sleep)
//! from caller activity.
//!
//! The driver itself is a plain async object generic over
//! [`embedded_hal_async::i2c::I2c`]. The [`service`] module wraps it in the
//! shared-state shape the rest of the firmware/host uses: one mutex owning
//! the panel, a [`service::Display`] handle for callers, and an idle task
//! that applies the Dim/Sleep transitions through the same mutex.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod cmd;
mod demo;
pub mod icons;
pub mod service;
pub mod ssd1306;

#[cfg(test)]
mod mock;

pub use service::{idle_task, Display, IdleKick, PanelMutex};
pub use ssd1306::{Ssd1306, DEFAULT_ADDRESS};
