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

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use lattice_master::transport::HttpTransport;
use lattice_master::{Master, NetworkConfig, web};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "lattice-master", about = "Overlay network address-allocation master")]
struct Args {
    /// Path to the JSON network configuration.
    #[arg(long)]
    network_config: PathBuf,

    /// Listen address, overriding the configuration file.
    #[arg(long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
        .add_directive("tower=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("h2=warn".parse()?);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .try_init()?;

    let args = Args::parse();

    // A missing, malformed, or invalid configuration ends the process here
    // with a non-zero status.
    let config = NetworkConfig::load(&args.network_config)?;
    let listen = args.listen.unwrap_or(config.listen);

    let master = Master::spawn(&config, Arc::new(HttpTransport::new()))?;
    tracing::info!(
        "Overlay master is up with {} overlays, VTEP subnet {}",
        config.overlays.len(),
        config.vtep_subnet
    );

    let listener = tokio::net::TcpListener::bind(listen).await?;
    tracing::info!("Serving /{}/state on {listen}", web::MASTER_ID);
    web::serve(listener, master.handle()).await?;

    master.close().await;
    Ok(())
}
