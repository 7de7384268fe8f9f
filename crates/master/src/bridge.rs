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

use ipnetwork::Ipv4Network;
use lattice_model::BridgeInfo;

use crate::errors::BridgeError;

/// Name prefix of the bridge container-network-interface workloads attach to.
pub const CNI_BRIDGE_PREFIX: &str = "m-";

/// Name prefix of the bridge the container runtime attaches to.
pub const DOCKER_BRIDGE_PREFIX: &str = "d-";

/// Splits an agent subnet into its two halves at `prefix + 1`: the low half
/// becomes the CNI bridge network, the high half the container-runtime bridge
/// network. Together the halves cover the agent subnet exactly.
pub fn derive_bridges(
    overlay_name: &str,
    agent_subnet: Ipv4Network,
) -> Result<(BridgeInfo, BridgeInfo), BridgeError> {
    if agent_subnet.prefix() >= 32 {
        return Err(BridgeError::NoRoom(agent_subnet.prefix()));
    }

    let bridge_prefix = agent_subnet.prefix() + 1;
    let address = u32::from(agent_subnet.network());
    let high_bit = 1u32 << (32 - bridge_prefix);

    let mesos_network = Ipv4Network::new(Ipv4Addr::from(address), bridge_prefix)
        .expect("bridge prefix stays within 32 bits");
    let docker_network = Ipv4Network::new(Ipv4Addr::from(address | high_bit), bridge_prefix)
        .expect("bridge prefix stays within 32 bits");

    Ok((
        BridgeInfo {
            name: format!("{CNI_BRIDGE_PREFIX}{overlay_name}"),
            ip: mesos_network,
        },
        BridgeInfo {
            name: format!("{DOCKER_BRIDGE_PREFIX}{overlay_name}"),
            ip: docker_network,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridges_are_the_two_halves_of_the_subnet() {
        let (mesos, docker) = derive_bridges("ovl", "9.0.0.0/24".parse().unwrap()).unwrap();

        assert_eq!(mesos.name, "m-ovl");
        assert_eq!(mesos.ip.to_string(), "9.0.0.0/25");
        assert_eq!(docker.name, "d-ovl");
        assert_eq!(docker.ip.to_string(), "9.0.0.128/25");
    }

    #[test]
    fn test_halves_are_disjoint_and_exhaustive() {
        let subnet: Ipv4Network = "172.16.4.0/22".parse().unwrap();
        let (mesos, docker) = derive_bridges("net", subnet).unwrap();

        assert_eq!(mesos.ip.size() + docker.ip.size(), subnet.size());
        assert!(!mesos.ip.contains(docker.ip.network()));
        assert!(!docker.ip.contains(mesos.ip.network()));
        assert!(subnet.contains(mesos.ip.network()));
        assert!(subnet.contains(docker.ip.network()));
    }

    #[test]
    fn test_a_31_subnet_splits_into_host_routes() {
        let (mesos, docker) = derive_bridges("tiny", "10.0.0.2/31".parse().unwrap()).unwrap();
        assert_eq!(mesos.ip.to_string(), "10.0.0.2/32");
        assert_eq!(docker.ip.to_string(), "10.0.0.3/32");
    }

    #[test]
    fn test_a_host_route_cannot_be_split() {
        let err = derive_bridges("full", "10.0.0.1/32".parse().unwrap()).unwrap_err();
        assert!(matches!(err, BridgeError::NoRoom(32)));
    }
}
