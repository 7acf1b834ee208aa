// Copyright (c) 2025 Defter Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod projects;
pub mod transactions;
pub mod reports;
pub mod fx;
pub mod exporter;
