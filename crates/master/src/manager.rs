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
use std::sync::Arc;

use lattice_model::{
    AgentEndpoint, AgentOverlayConfig, BackendInfo, ClusterState, MasterToAgent, OverlayState,
    VXLAN_VNI, VxLanInfo, vtep_device_name,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::bridge;
use crate::config::NetworkConfig;
use crate::errors::ConfigError;
use crate::overlay_pool::OverlayPool;
use crate::registry::AgentRegistry;
use crate::transport::AgentTransport;
use crate::vtep::VtepAllocator;

const COMMAND_QUEUE_DEPTH: usize = 128;

enum Command {
    Register {
        from: AgentEndpoint,
    },
    AgentRegistered {
        from: AgentEndpoint,
        overlays: Vec<AgentOverlayConfig>,
    },
    State {
        reply: oneshot::Sender<ClusterState>,
    },
}

/// Everything the master owns: the per-overlay subnet pools, the VTEP
/// allocator, and the agent registry. Owned by a single task; all mutations
/// run serialized on it.
struct ManagerState {
    // Keyed by overlay name so agents receive overlays in a stable order.
    overlays: BTreeMap<String, OverlayPool>,
    vtep: VtepAllocator,
    agents: AgentRegistry,
}

impl ManagerState {
    fn new(config: &NetworkConfig) -> Self {
        let overlays = config
            .overlays
            .iter()
            .map(|overlay| {
                tracing::info!("Configuring overlay network {}", overlay.name);
                (
                    overlay.name.clone(),
                    OverlayPool::new(overlay.name.clone(), overlay.subnet, overlay.prefix),
                )
            })
            .collect();

        ManagerState {
            overlays,
            vtep: VtepAllocator::new(config.vtep_subnet, config.vtep_mac_oui),
            agents: AgentRegistry::default(),
        }
    }

    /// Handles a registration, returning the records to send back.
    ///
    /// A known agent gets its existing allocations with the handshake state
    /// reset; nothing is reallocated. A new agent gets one VTEP IP and MAC
    /// plus a subnet and bridge pair from every overlay. Allocation failures
    /// are not fatal: the affected piece is skipped and the agent receives
    /// whatever could be allocated.
    fn register_agent(&mut self, from: &AgentEndpoint) -> Vec<AgentOverlayConfig> {
        if let Some(agent) = self.agents.get_mut(from) {
            tracing::info!("Agent {from} re-registering");
            agent.clear_overlay_states();
            return agent.overlays();
        }

        tracing::info!("Got registration from {from}");

        let vtep_ip = match self.vtep.allocate_ip() {
            Ok(ip) => Some(ip),
            Err(err) => {
                tracing::error!("Unable to get a VTEP IP for {from}: {err}");
                None
            }
        };
        let vtep_mac = match self.vtep.allocate_mac() {
            Ok(mac) => Some(mac),
            Err(err) => {
                tracing::error!("Unable to get a VTEP MAC for {from}: {err}");
                None
            }
        };

        let agent = self.agents.insert(from.clone());
        for pool in self.overlays.values_mut() {
            let subnet = match pool.allocate_agent_subnet() {
                Ok(subnet) => subnet,
                Err(err) => {
                    tracing::error!(
                        "Cannot allocate a subnet from overlay {} to {from}: {err}",
                        pool.name()
                    );
                    continue;
                }
            };

            let (mesos_bridge, docker_bridge) = match bridge::derive_bridges(pool.name(), subnet) {
                Ok(bridges) => bridges,
                Err(err) => {
                    tracing::error!(
                        "Unable to derive bridges for overlay {} on {from}: {err}",
                        pool.name()
                    );
                    if let Err(err) = pool.deallocate_agent_subnet(subnet) {
                        tracing::error!(
                            "Failed to return {subnet} to overlay {}: {err}",
                            pool.name()
                        );
                    }
                    continue;
                }
            };

            agent.add_overlay(AgentOverlayConfig {
                info: pool.info(),
                subnet,
                mesos_bridge,
                docker_bridge,
                backend: BackendInfo {
                    vxlan: VxLanInfo {
                        vni: VXLAN_VNI,
                        vtep_name: vtep_device_name(VXLAN_VNI),
                        vtep_ip,
                        vtep_mac,
                    },
                },
                state: OverlayState::default(),
            });
        }

        agent.overlays()
    }

    /// Records the statuses an agent reported. Returns false when the agent
    /// is unknown, in which case the report is dropped without an
    /// acknowledgement.
    fn agent_registered(&mut self, from: &AgentEndpoint, overlays: &[AgentOverlayConfig]) -> bool {
        let Some(agent) = self.agents.get_mut(from) else {
            tracing::error!("Got an overlay status report from unregistered agent {from}");
            return false;
        };

        tracing::info!("Got ACK for the overlays assigned to {from}");
        for overlay in overlays {
            agent.update_overlay_state(overlay);
        }
        true
    }

    fn snapshot(&self) -> ClusterState {
        ClusterState {
            overlays: self.overlays.values().map(OverlayPool::info).collect(),
            agents: self.agents.iter().map(|agent| agent.summary()).collect(),
        }
    }
}

async fn run(
    mut state: ManagerState,
    mut commands: mpsc::Receiver<Command>,
    transport: Arc<dyn AgentTransport>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            Command::Register { from } => {
                let overlays = state.register_agent(&from);
                // Delivered before the next command is dequeued, so an agent
                // always sees its update before any later reply from the
                // master.
                transport
                    .deliver(&from, MasterToAgent::UpdateAgentOverlays { overlays })
                    .await;
            }
            Command::AgentRegistered { from, overlays } => {
                if state.agent_registered(&from, &overlays) {
                    transport
                        .deliver(&from, MasterToAgent::AgentRegisteredAcknowledgement)
                        .await;
                }
            }
            Command::State { reply } => {
                let _ = reply.send(state.snapshot());
            }
        }
    }
}

/// The running master: a task owning all allocation state, fed through a
/// command channel.
pub struct Master {
    commands: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

impl Master {
    /// Validates the configuration, builds the pools, and spawns the task
    /// that owns them. Outbound messages go through `transport`.
    pub fn spawn(
        config: &NetworkConfig,
        transport: Arc<dyn AgentTransport>,
    ) -> Result<Master, ConfigError> {
        config.validate()?;

        let state = ManagerState::new(config);
        let (commands, rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let task = tokio::spawn(run(state, rx, transport));

        Ok(Master { commands, task })
    }

    pub fn handle(&self) -> MasterHandle {
        MasterHandle {
            commands: self.commands.clone(),
        }
    }

    /// Stops the master after every already-queued command has been handled.
    /// Handles keep working until their queued commands drain.
    pub async fn close(self) {
        drop(self.commands);
        if let Err(err) = self.task.await {
            tracing::error!("Master task failed: {err}");
        }
    }
}

/// Cloneable front to the master task. All methods enqueue a command;
/// commands are processed strictly in order of arrival.
#[derive(Clone)]
pub struct MasterHandle {
    commands: mpsc::Sender<Command>,
}

impl MasterHandle {
    /// Agent handshake, first inbound message.
    pub async fn register(&self, from: AgentEndpoint) {
        self.send(Command::Register { from }).await;
    }

    /// Agent handshake, second inbound message: the agent's status report.
    pub async fn agent_registered(&self, from: AgentEndpoint, overlays: Vec<AgentOverlayConfig>) {
        self.send(Command::AgentRegistered { from, overlays }).await;
    }

    /// Read-only snapshot of overlays and agents. `None` when the master is
    /// shut down.
    pub async fn state(&self) -> Option<ClusterState> {
        let (reply, response) = oneshot::channel();
        self.send(Command::State { reply }).await;
        response.await.ok()
    }

    async fn send(&self, command: Command) {
        if self.commands.send(command).await.is_err() {
            tracing::error!("Master is shut down, dropping command");
        }
    }
}
