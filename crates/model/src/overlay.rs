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

use std::fmt;

use ipnetwork::Ipv4Network;
use mac_address::MacAddress;
use serde::{Deserialize, Serialize};

/// VNI shared by every overlay tunnel in the cluster.
pub const VXLAN_VNI: u32 = 1024;

/// Name of the VTEP link device an agent creates for a VNI.
pub fn vtep_device_name(vni: u32) -> String {
    format!("vtep{vni}")
}

/// An overlay network as configured on the master: the supernet agents get
/// their subnets carved from, and the prefix length of those subnets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayInfo {
    pub name: String,
    pub subnet: Ipv4Network,
    pub prefix: u8,
}

/// A bridge an agent sets up inside its subnet to attach local workloads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeInfo {
    pub name: String,
    pub ip: Ipv4Network,
}

/// The VXLAN tunnel endpoint assigned to an agent. `vtep_ip` and `vtep_mac`
/// are absent when the corresponding pool was exhausted at registration time;
/// the remaining record is still handed out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VxLanInfo {
    pub vni: u32,
    pub vtep_name: String,
    pub vtep_ip: Option<Ipv4Network>,
    pub vtep_mac: Option<MacAddress>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendInfo {
    pub vxlan: VxLanInfo,
}

/// Where an agent stands in the registration handshake for one overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverlayStatus {
    /// The master has sent the overlay configuration and is waiting for the
    /// agent to confirm it has been applied.
    Registering,
    /// The agent confirmed the overlay configuration.
    Registered,
}

impl fmt::Display for OverlayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayStatus::Registering => write!(f, "REGISTERING"),
            OverlayStatus::Registered => write!(f, "REGISTERED"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayState {
    pub status: OverlayStatus,
}

impl Default for OverlayState {
    fn default() -> Self {
        OverlayState {
            status: OverlayStatus::Registering,
        }
    }
}

/// Everything an agent needs to realize one overlay locally: the overlay it
/// belongs to, the subnet carved out for this agent, the two bridge networks
/// inside that subnet, and the tunnel backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentOverlayConfig {
    pub info: OverlayInfo,
    pub subnet: Ipv4Network,
    pub mesos_bridge: BridgeInfo,
    pub docker_bridge: BridgeInfo,
    pub backend: BackendInfo,
    #[serde(default)]
    pub state: OverlayState,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_config() -> AgentOverlayConfig {
        AgentOverlayConfig {
            info: OverlayInfo {
                name: "ovl".to_string(),
                subnet: "9.0.0.0/8".parse().unwrap(),
                prefix: 24,
            },
            subnet: "9.0.0.0/24".parse().unwrap(),
            mesos_bridge: BridgeInfo {
                name: "m-ovl".to_string(),
                ip: "9.0.0.0/25".parse().unwrap(),
            },
            docker_bridge: BridgeInfo {
                name: "d-ovl".to_string(),
                ip: "9.0.0.128/25".parse().unwrap(),
            },
            backend: BackendInfo {
                vxlan: VxLanInfo {
                    vni: VXLAN_VNI,
                    vtep_name: vtep_device_name(VXLAN_VNI),
                    vtep_ip: Some("44.128.0.1/20".parse().unwrap()),
                    vtep_mac: Some(MacAddress::new([0x70, 0xB3, 0xD5, 0x00, 0x00, 0x01])),
                },
            },
            state: OverlayState::default(),
        }
    }

    #[test]
    fn test_serialize_status() {
        assert_eq!(
            serde_json::to_string(&OverlayStatus::Registering).unwrap(),
            "\"REGISTERING\""
        );
        assert_eq!(
            serde_json::to_string(&OverlayStatus::Registered).unwrap(),
            "\"REGISTERED\""
        );
        assert_eq!(
            serde_json::from_str::<OverlayStatus>("\"REGISTERED\"").unwrap(),
            OverlayStatus::Registered
        );
    }

    #[test]
    fn test_agent_overlay_config_wire_shape() {
        let value = serde_json::to_value(sample_config()).unwrap();

        assert_eq!(
            value["info"],
            json!({"name": "ovl", "subnet": "9.0.0.0/8", "prefix": 24})
        );
        assert_eq!(value["subnet"], json!("9.0.0.0/24"));
        assert_eq!(
            value["mesos_bridge"],
            json!({"name": "m-ovl", "ip": "9.0.0.0/25"})
        );
        assert_eq!(
            value["docker_bridge"],
            json!({"name": "d-ovl", "ip": "9.0.0.128/25"})
        );
        assert_eq!(value["backend"]["vxlan"]["vni"], json!(1024));
        assert_eq!(value["backend"]["vxlan"]["vtep_name"], json!("vtep1024"));
        assert_eq!(value["backend"]["vxlan"]["vtep_ip"], json!("44.128.0.1/20"));
        assert_eq!(value["state"], json!({"status": "REGISTERING"}));
    }

    #[test]
    fn test_agent_overlay_config_round_trip() {
        let config = sample_config();
        let encoded = serde_json::to_string(&config).unwrap();
        assert_eq!(
            serde_json::from_str::<AgentOverlayConfig>(&encoded).unwrap(),
            config
        );
    }

    #[test]
    fn test_missing_state_defaults_to_registering() {
        let mut value = serde_json::to_value(sample_config()).unwrap();
        value.as_object_mut().unwrap().remove("state");

        let decoded: AgentOverlayConfig = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.state.status, OverlayStatus::Registering);
    }
}
