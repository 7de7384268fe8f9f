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
//! Lattice wire-level data model
//!
//! This crate contains the types exchanged between the overlay master and the
//! cluster agents: agent identity, the per-overlay records handed to each
//! agent, the registration protocol messages, and the read-only state
//! document served for observability.

pub mod endpoint;
pub mod messages;
pub mod overlay;
pub mod state;

pub use crate::endpoint::{AgentEndpoint, EndpointParseError};
pub use crate::messages::{AgentRegistered, MasterToAgent, RegisterAgent};
pub use crate::overlay::{
    AgentOverlayConfig, BackendInfo, BridgeInfo, OverlayInfo, OverlayState, OverlayStatus,
    VXLAN_VNI, VxLanInfo, vtep_device_name,
};
pub use crate::state::{AgentSummary, ClusterState};
