// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod controller;
pub mod dirty;
pub mod editor;
pub mod ids;
pub mod model;
pub mod query;

pub use controller::*;
pub use editor::*;
pub use ids::*;
pub use model::*;
