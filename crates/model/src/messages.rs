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

use serde::{Deserialize, Serialize};

use crate::endpoint::AgentEndpoint;
use crate::overlay::AgentOverlayConfig;

/// First message of the handshake, agent to master. A new agent gets overlay
/// subnets, a VTEP address, and bridge networks allocated; a known agent gets
/// its existing allocations back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegisterAgent {
    pub from: AgentEndpoint,
}

/// Second inbound message, agent to master: the agent reports the overlays it
/// finished configuring, carrying the new status for each.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentRegistered {
    pub from: AgentEndpoint,
    pub overlays: Vec<AgentOverlayConfig>,
}

/// Messages the master delivers back to an agent's endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MasterToAgent {
    /// The overlay allocations for the agent, sent in response to every
    /// [`RegisterAgent`].
    UpdateAgentOverlays { overlays: Vec<AgentOverlayConfig> },

    /// Confirms that an [`AgentRegistered`] status report was recorded.
    AgentRegisteredAcknowledgement,
}

impl MasterToAgent {
    /// The message name, used as the last path segment when a message is
    /// posted to an agent endpoint.
    pub fn name(&self) -> &'static str {
        match self {
            MasterToAgent::UpdateAgentOverlays { .. } => "UpdateAgentOverlays",
            MasterToAgent::AgentRegisteredAcknowledgement => "AgentRegisteredAcknowledgement",
        }
    }
}
