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

use std::collections::BTreeMap;

use lattice_model::{AgentEndpoint, AgentOverlayConfig, AgentSummary, OverlayState};

/// A registered agent and the overlay allocations it holds.
pub struct Agent {
    endpoint: AgentEndpoint,

    // Records keyed by overlay name, iterated in name order so that every
    // view of this agent is deterministic.
    overlays: BTreeMap<String, AgentOverlayConfig>,
}

impl Agent {
    pub fn new(endpoint: AgentEndpoint) -> Self {
        Agent {
            endpoint,
            overlays: BTreeMap::new(),
        }
    }

    pub fn endpoint(&self) -> &AgentEndpoint {
        &self.endpoint
    }

    /// Stores a record for an overlay. A record that already exists for the
    /// overlay name is kept untouched.
    pub fn add_overlay(&mut self, overlay: AgentOverlayConfig) {
        self.overlays
            .entry(overlay.info.name.clone())
            .or_insert(overlay);
    }

    pub fn overlays(&self) -> Vec<AgentOverlayConfig> {
        self.overlays.values().cloned().collect()
    }

    /// Resets every overlay back to the start of the handshake. Used on
    /// re-registration, when a restarted agent no longer has any overlay
    /// configured.
    pub fn clear_overlay_states(&mut self) {
        for overlay in self.overlays.values_mut() {
            overlay.state = OverlayState::default();
        }
    }

    /// Copies the agent-reported status into the stored record. Reports for
    /// overlays this agent never received are dropped.
    pub fn update_overlay_state(&mut self, report: &AgentOverlayConfig) {
        match self.overlays.get_mut(&report.info.name) {
            Some(stored) => stored.state.status = report.state.status,
            None => tracing::error!(
                "Got a status update from {} for unknown network {}",
                self.endpoint,
                report.info.name
            ),
        }
    }

    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            ip: *self.endpoint.addr.ip(),
            overlays: self.overlays(),
        }
    }
}

/// All agents known to the master, keyed by endpoint. Entries are only ever
/// inserted; there is no agent removal or address reclamation.
#[derive(Default)]
pub struct AgentRegistry {
    agents: BTreeMap<AgentEndpoint, Agent>,
}

impl AgentRegistry {
    pub fn contains(&self, endpoint: &AgentEndpoint) -> bool {
        self.agents.contains_key(endpoint)
    }

    /// Registers a new agent and returns it for population.
    pub fn insert(&mut self, endpoint: AgentEndpoint) -> &mut Agent {
        self.agents
            .entry(endpoint.clone())
            .or_insert_with(|| Agent::new(endpoint))
    }

    pub fn get_mut(&mut self, endpoint: &AgentEndpoint) -> Option<&mut Agent> {
        self.agents.get_mut(endpoint)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
