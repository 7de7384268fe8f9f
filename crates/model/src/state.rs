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

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::overlay::{AgentOverlayConfig, OverlayInfo};

/// One registered agent as reported by the state endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub ip: Ipv4Addr,
    pub overlays: Vec<AgentOverlayConfig>,
}

/// Snapshot of everything the master knows: the configured overlays and the
/// registered agents with their allocations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterState {
    pub overlays: Vec<OverlayInfo>,
    pub agents: Vec<AgentSummary>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_empty_state_wire_shape() {
        let state = ClusterState {
            overlays: vec![OverlayInfo {
                name: "ovl".to_string(),
                subnet: "9.0.0.0/8".parse().unwrap(),
                prefix: 24,
            }],
            agents: Vec::new(),
        };

        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({
                "overlays": [{"name": "ovl", "subnet": "9.0.0.0/8", "prefix": 24}],
                "agents": [],
            })
        );
    }
}
