// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted configuration for haptic tools.
//!
//! [`ConfigService`] serialises values as JSON and hands the bytes to a
//! [`ConfigStore`]. [`FsConfigStore`] keeps one file per key under the
//! platform config directory; [`MemoryConfigStore`] keeps them in memory.
#![forbid(unsafe_code)]

pub mod config;
mod fs;
mod memory;

pub use config::{ConfigError, ConfigService, ConfigStore, PROXY_SETTINGS_KEY};
pub use fs::FsConfigStore;
pub use memory::MemoryConfigStore;
