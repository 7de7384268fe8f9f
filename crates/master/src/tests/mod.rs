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


use lattice_model::{AgentOverlayConfig, MasterToAgent};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::{NetworkConfig, OverlayConfig};

pub(crate) fn single_overlay_config() -> NetworkConfig {
    NetworkConfig {
        listen: "127.0.0.1:0".parse().unwrap(),
        vtep_subnet: "44.128.0.0/20".parse().unwrap(),
        vtep_mac_oui: "70:B3:D5:00:00:00".parse().unwrap(),
        overlays: vec![OverlayConfig {
            name: "ovl".to_string(),
            subnet: "9.0.0.0/8".parse().unwrap(),
            prefix: 24,
        }],
    }
}

/// Pulls the next message out of an agent inbox, expecting an overlay update.
pub(crate) async fn expect_update(
    inbox: &mut UnboundedReceiver<MasterToAgent>,
) -> Vec<AgentOverlayConfig> {
    match inbox.recv().await {
        Some(MasterToAgent::UpdateAgentOverlays { overlays }) => overlays,
        other => panic!("expected an overlay update, got {other:?}"),
    }
}
