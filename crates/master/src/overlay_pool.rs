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
use lattice_model::OverlayInfo;

use crate::errors::AllocationError;
use crate::interval_pool::IntervalPool;

/// Carves agent-sized subnets out of one overlay supernet.
///
/// The pool tracks subnet indices: index `k` denotes the subnet whose
/// host offset inside the supernet is `k << (32 - agent_prefix)`. Agents are
/// handed subnets lowest-index first.
pub struct OverlayPool {
    name: String,
    supernet: Ipv4Network,
    agent_prefix: u8,
    free_subnets: IntervalPool,
}

impl OverlayPool {
    /// `agent_prefix` must lie within `[supernet.prefix(), 31]`;
    /// configuration validation guarantees this before a pool is built.
    pub fn new(name: String, supernet: Ipv4Network, agent_prefix: u8) -> Self {
        let end = ((1u64 << (agent_prefix - supernet.prefix())) - 1) as u32;

        OverlayPool {
            name,
            supernet,
            agent_prefix,
            free_subnets: IntervalPool::new(0, end),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self) -> OverlayInfo {
        OverlayInfo {
            name: self.name.clone(),
            subnet: self.supernet,
            prefix: self.agent_prefix,
        }
    }

    /// Allocates the lowest free agent subnet.
    pub fn allocate_agent_subnet(&mut self) -> Result<Ipv4Network, AllocationError> {
        let index = self
            .free_subnets
            .allocate_lowest()
            .ok_or(AllocationError::Exhausted("agent subnet"))?;

        let address = u32::from(self.supernet.network()) | (index << (32 - self.agent_prefix));
        let subnet = Ipv4Network::new(Ipv4Addr::from(address), self.agent_prefix)
            .expect("agent prefix was vetted at construction");
        Ok(subnet)
    }

    /// Returns a previously allocated agent subnet to the pool.
    pub fn deallocate_agent_subnet(&mut self, subnet: Ipv4Network) -> Result<(), AllocationError> {
        if subnet.prefix() != self.agent_prefix {
            return Err(AllocationError::PrefixMismatch {
                expected: self.agent_prefix,
                got: subnet.prefix(),
            });
        }
        if !self.supernet.contains(subnet.network()) {
            return Err(AllocationError::OutOfRange {
                network: subnet,
                range: self.supernet,
            });
        }

        let host = u32::from(subnet.network()) & !u32::from(self.supernet.mask());
        self.free_subnets.deallocate(host >> (32 - self.agent_prefix));
        Ok(())
    }
}
