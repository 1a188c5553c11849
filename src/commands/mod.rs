// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod projects;
pub mod tasks;
pub mod transactions;
pub mod categories;
pub mod reports;
pub mod timeline;
pub mod importer;
pub mod exporter;
pub mod sync;
pub mod settings;
pub mod doctor;
