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

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use ipnetwork::Ipv4Network;
use mac_address::MacAddress;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

fn default_listen() -> SocketAddr {
    "0.0.0.0:5050".parse().unwrap()
}

/// lattice-master configuration file content
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// The socket address the state endpoint and the agent message routes
    /// are served on.
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Subnet VTEP addresses are drawn from. Not part of the overlay overlap
    /// check.
    pub vtep_subnet: Ipv4Network,

    /// OUI stamped on every allocated VTEP MAC, written as six
    /// colon-separated hex bytes with the lower three bytes zero.
    pub vtep_mac_oui: MacAddress,

    /// Overlay networks agents get their subnets carved from.
    pub overlays: Vec<OverlayConfig>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OverlayConfig {
    pub name: String,

    /// The overlay supernet.
    pub subnet: Ipv4Network,

    /// Prefix length of the subnet each agent receives.
    pub prefix: u8,
}

impl NetworkConfig {
    /// Reads, parses, and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: NetworkConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks everything the allocators rely on: a usable OUI, at least one
    /// overlay, unique non-empty overlay names, agent prefixes that both fit
    /// their supernet and leave room for the bridge split, and pairwise
    /// disjoint overlay address spaces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vtep_mac_oui.bytes()[3..] != [0, 0, 0] {
            return Err(ConfigError::OuiLowerBytes(self.vtep_mac_oui));
        }
        if self.overlays.is_empty() {
            return Err(ConfigError::NoOverlays);
        }

        let mut accepted: Vec<&OverlayConfig> = Vec::new();
        for overlay in &self.overlays {
            if overlay.name.is_empty() {
                return Err(ConfigError::EmptyOverlayName);
            }
            if accepted.iter().any(|other| other.name == overlay.name) {
                return Err(ConfigError::DuplicateOverlay(overlay.name.clone()));
            }
            if overlay.prefix < overlay.subnet.prefix() || overlay.prefix > 31 {
                return Err(ConfigError::AgentPrefixOutOfRange {
                    name: overlay.name.clone(),
                    prefix: overlay.prefix,
                    min: overlay.subnet.prefix(),
                });
            }
            if let Some(other) = accepted
                .iter()
                .find(|other| networks_overlap(other.subnet, overlay.subnet))
            {
                return Err(ConfigError::OverlappingOverlays {
                    name: overlay.name.clone(),
                    subnet: overlay.subnet,
                    other: other.name.clone(),
                });
            }
            accepted.push(overlay);
        }

        Ok(())
    }
}

/// Two IPv4 networks overlap exactly when one contains the other's base
/// address.
fn networks_overlap(a: Ipv4Network, b: Ipv4Network) -> bool {
    a.contains(b.network()) || b.contains(a.network())
}
