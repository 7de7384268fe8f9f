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

use axum::Json;
use axum::Router;
use axum::extract::{Query, State as AxumState};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use lattice_model::{AgentRegistered, RegisterAgent};
use serde::Deserialize;

use crate::manager::MasterHandle;

/// Process identifier of the master; all routes are mounted under it.
pub const MASTER_ID: &str = "overlay-master";

#[derive(Deserialize)]
struct StateParams {
    /// Wraps the response in `<callback>(...)` for cross-origin consumers.
    jsonp: Option<String>,
}

/// Routes: the read-only state document and the two inbound agent messages.
pub fn router(handle: MasterHandle) -> Router {
    Router::new()
        .route(&format!("/{MASTER_ID}/state"), get(state))
        .route(&format!("/{MASTER_ID}/RegisterAgent"), post(register_agent))
        .route(
            &format!("/{MASTER_ID}/AgentRegistered"),
            post(agent_registered),
        )
        .with_state(handle)
}

pub async fn serve(
    listener: tokio::net::TcpListener,
    handle: MasterHandle,
) -> std::io::Result<()> {
    axum::serve(listener, router(handle)).await
}

async fn state(
    AxumState(handle): AxumState<MasterHandle>,
    Query(params): Query<StateParams>,
) -> Response {
    tracing::debug!("Responding to the state endpoint");

    let Some(snapshot) = handle.state().await else {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };

    match params.jsonp {
        None => Json(snapshot).into_response(),
        Some(callback) => match serde_json::to_string(&snapshot) {
            Ok(body) => (
                [(header::CONTENT_TYPE, "application/javascript")],
                format!("{callback}({body});"),
            )
                .into_response(),
            Err(err) => {
                tracing::error!("Unable to encode the state document: {err}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
    }
}

// The message routes reply as soon as the command is queued; the master's
// actual responses travel back to the agent's own endpoint.

async fn register_agent(
    AxumState(handle): AxumState<MasterHandle>,
    Json(message): Json<RegisterAgent>,
) -> StatusCode {
    handle.register(message.from).await;
    StatusCode::ACCEPTED
}

async fn agent_registered(
    AxumState(handle): AxumState<MasterHandle>,
    Json(message): Json<AgentRegistered>,
) -> StatusCode {
    handle.agent_registered(message.from, message.overlays).await;
    StatusCode::ACCEPTED
}
