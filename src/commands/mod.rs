// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod trade;
pub mod records;
pub mod payments;
pub mod inventory;
pub mod exporter;
pub mod settings;
pub mod doctor;
