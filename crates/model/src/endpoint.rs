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
use std::net::SocketAddrV4;
use std::str::FromStr;

/// Identity of a cluster agent: a process identifier plus the IPv4 socket
/// address its control endpoint listens on, printed as `id@ip:port`
/// (for example `overlay-agent@10.0.0.1:5051`).
///
/// The endpoint is both the registry key for the agent and the destination
/// messages are delivered to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentEndpoint {
    pub id: String,
    pub addr: SocketAddrV4,
}

impl fmt::Display for AgentEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.addr)
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum EndpointParseError {
    #[error("agent endpoint '{0}' is not of the form id@ip:port")]
    MissingSeparator(String),

    #[error("agent endpoint '{0}' has an empty process identifier")]
    EmptyId(String),

    #[error("agent endpoint '{0}' carries an invalid IPv4 socket address")]
    BadAddress(String),
}

impl FromStr for AgentEndpoint {
    type Err = EndpointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, addr) = s
            .split_once('@')
            .ok_or_else(|| EndpointParseError::MissingSeparator(s.to_string()))?;
        if id.is_empty() {
            return Err(EndpointParseError::EmptyId(s.to_string()));
        }
        let addr: SocketAddrV4 = addr
            .parse()
            .map_err(|_| EndpointParseError::BadAddress(s.to_string()))?;

        Ok(AgentEndpoint {
            id: id.to_string(),
            addr,
        })
    }
}

impl serde::Serialize for AgentEndpoint {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        s.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for AgentEndpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
