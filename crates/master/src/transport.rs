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

use std::collections::HashMap;

use lattice_model::{AgentEndpoint, MasterToAgent};
use tokio::sync::{Mutex, mpsc};

/// Outbound delivery of master messages to agent endpoints.
///
/// Delivery is fire-and-forget: implementations log failures and drop the
/// message. There is no retry; an agent that misses an update recovers by
/// registering again.
#[async_trait::async_trait]
pub trait AgentTransport: Send + Sync + 'static {
    async fn deliver(&self, to: &AgentEndpoint, message: MasterToAgent);
}

/// In-process delivery over per-agent channels. Used by tests and by
/// deployments that embed master and agents in one process.
#[derive(Default)]
pub struct ChannelTransport {
    inboxes: Mutex<HashMap<AgentEndpoint, mpsc::UnboundedSender<MasterToAgent>>>,
}

impl ChannelTransport {
    pub fn new() -> Self {
        ChannelTransport::default()
    }

    /// Opens an inbox for `endpoint`, replacing any previous one.
    pub async fn subscribe(
        &self,
        endpoint: AgentEndpoint,
    ) -> mpsc::UnboundedReceiver<MasterToAgent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inboxes.lock().await.insert(endpoint, tx);
        rx
    }
}

#[async_trait::async_trait]
impl AgentTransport for ChannelTransport {
    async fn deliver(&self, to: &AgentEndpoint, message: MasterToAgent) {
        let inboxes = self.inboxes.lock().await;
        match inboxes.get(to) {
            Some(inbox) => {
                if inbox.send(message).is_err() {
                    tracing::warn!("Inbox for {to} is closed, dropping message");
                }
            }
            None => tracing::warn!("No inbox for {to}, dropping message"),
        }
    }
}

/// Delivers messages as JSON POSTs to `http://<addr>/<id>/<MessageName>`,
/// the path shape agents expose their control inbox under.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        HttpTransport {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        HttpTransport::new()
    }
}

#[async_trait::async_trait]
impl AgentTransport for HttpTransport {
    async fn deliver(&self, to: &AgentEndpoint, message: MasterToAgent) {
        let url = format!("http://{}/{}/{}", to.addr, to.id, message.name());

        match self.client.post(&url).json(&message).send().await {
            Ok(response) if !response.status().is_success() => {
                tracing::error!(
                    "Agent {to} rejected {} with status {}",
                    message.name(),
                    response.status()
                );
            }
            Ok(_) => {}
            Err(err) => {
                tracing::error!("Unable to deliver {} to {to}: {err}", message.name());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_transport_routes_by_endpoint() {
        let transport = ChannelTransport::new();
        let a1: AgentEndpoint = "a1@10.0.0.1:5051".parse().unwrap();
        let a2: AgentEndpoint = "a2@10.0.0.2:5051".parse().unwrap();

        let mut inbox1 = transport.subscribe(a1.clone()).await;
        let mut inbox2 = transport.subscribe(a2.clone()).await;

        transport
            .deliver(&a1, MasterToAgent::AgentRegisteredAcknowledgement)
            .await;

        assert_eq!(
            inbox1.recv().await,
            Some(MasterToAgent::AgentRegisteredAcknowledgement)
        );
        assert!(inbox2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_delivery_to_an_unknown_endpoint_is_dropped() {
        let transport = ChannelTransport::new();
        let unknown: AgentEndpoint = "ghost@10.0.0.9:5051".parse().unwrap();

        // Must not block or panic.
        transport
            .deliver(&unknown, MasterToAgent::AgentRegisteredAcknowledgement)
            .await;
    }
}
