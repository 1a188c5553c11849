// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod financials;
pub mod models;
pub mod store;
pub mod timeline;
pub mod utils;
