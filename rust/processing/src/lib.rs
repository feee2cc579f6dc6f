// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Polyframe Processing
//!
//! File operators for polyframe geometry tables:
//!
//! - **OBJ**: vertices and faces, via `polyframe-obj`
//! - **JSON records**: one object per row
//! - **Columnar binary** (`.pft`): Arrow IPC files that keep every dtype
//! - **File sequences**: one row per numbered file in a directory
//!
//! Each operator validates its parameters and the table according to
//! [`ValidationMode`].
//!
//! ```rust,ignore
//! use polyframe_processing::{Config, Operators};
//!
//! let ops = Operators::new(Config::from_env());
//! let table = ops.read_obj("cube.obj")?;
//! ops.write_table(&table, "cube.pft")?;
//! ```

pub mod columnar;
pub mod config;
pub mod error;
pub mod json;
pub mod operators;
pub mod sequence;
pub mod validators;

pub use config::{Config, ValidationMode};
pub use error::{Error, Result};
pub use operators::Operators;
