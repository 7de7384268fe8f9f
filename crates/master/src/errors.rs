/*
 * SPDX-FileCopyrightText: Copyright (c) 2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::path::PathBuf;

use ipnetwork::Ipv4Network;
use mac_address::MacAddress;

/// Fatal configuration problems. Any of these during startup exits the
/// process with a non-zero status.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("unable to read the network configuration at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unable to parse the network configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid VTEP OUI {0}: the lower three bytes must be zero")]
    OuiLowerBytes(MacAddress),

    #[error("overlay configuration with an empty name")]
    EmptyOverlayName,

    #[error("duplicate overlay configuration detected for overlay {0}")]
    DuplicateOverlay(String),

    #[error("overlay {name} ({subnet}) overlaps the address space of overlay {other}")]
    OverlappingOverlays {
        name: String,
        subnet: Ipv4Network,
        other: String,
    },

    #[error("no overlay networks configured, specify at least one")]
    NoOverlays,

    #[error("overlay {name}: agent prefix /{prefix} must lie within [/{min}, /31]")]
    AgentPrefixOutOfRange { name: String, prefix: u8, min: u8 },
}

/// Recoverable allocation problems. During a registration these are logged
/// and the affected per-overlay allocation is skipped.
#[derive(thiserror::Error, Debug)]
pub enum AllocationError {
    #[error("{0} pool exhausted")]
    Exhausted(&'static str),

    #[error("prefix /{got} does not match the expected prefix /{expected}")]
    PrefixMismatch { expected: u8, got: u8 },

    #[error("MAC {0} does not carry the configured OUI")]
    ForeignOui(MacAddress),

    #[error("network {network} lies outside {range}")]
    OutOfRange {
        network: Ipv4Network,
        range: Ipv4Network,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    #[error("a /{0} agent subnet leaves no room for bridge networks")]
    NoRoom(u8),
}
