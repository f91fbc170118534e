//! Interactive session command
//!
//! Negotiates a broker session for the target instance and hands the
//! stream coordinates to the tunnel plugin, which owns the terminal
//! until it exits. The broker-side session is released on every exit
//! path, including interrupts and plugin failures.

use std::io::ErrorKind;
use std::process::Stdio;

use log::{debug, warn};
use serde_json::json;
use tokio::process::{Child, Command};

use crate::aws::EcsClient;
use crate::config::session;
use crate::error::{EcsError, Result};
use crate::ui::{create_spinner, finish_spinner};

use super::broker::{BrokerSession, SessionBroker};
use super::manager::RemoteSession;

/// How the tunnel ended
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum TunnelOutcome {
    /// Plugin exited on its own with this code
    Exited(u8),
    /// User interrupted the session (Ctrl+C)
    Interrupted,
}

/// Open an interactive session to an instance in the given cluster
///
/// Returns the process exit code to propagate: the plugin's own code,
/// or 130 when the session was interrupted.
pub async fn run_exec_command<B: SessionBroker>(
    client: &EcsClient,
    broker: &B,
    cluster: &str,
    instance_id: &str,
    region: &str,
    profile: Option<&str>,
    batch: bool,
) -> Result<u8> {
    exec_with_plugin(
        session::PLUGIN_BIN,
        client,
        broker,
        cluster,
        instance_id,
        region,
        profile,
        batch,
    )
    .await
}

/// Full exec flow with an injectable plugin binary
#[allow(clippy::too_many_arguments)]
pub(crate) async fn exec_with_plugin<B: SessionBroker>(
    plugin: &str,
    client: &EcsClient,
    broker: &B,
    cluster: &str,
    instance_id: &str,
    region: &str,
    profile: Option<&str>,
    batch: bool,
) -> Result<u8> {
    let mut remote = RemoteSession::new();

    let spinner = create_spinner(
        &format!("Resolving {} in cluster '{}'...", instance_id, cluster),
        batch,
    );
    let resolved = remote.resolve_target(client, cluster, instance_id).await;
    finish_spinner(spinner);
    resolved?;

    let spinner = create_spinner("Negotiating session...", batch);
    let opened = remote.open(broker).await;
    finish_spinner(spinner);
    opened?;

    // open() just succeeded, the negotiated session is present
    let negotiated = match remote.negotiated() {
        Some(s) => s.clone(),
        None => {
            return Err(EcsError::BrokerRejected(
                "session negotiation produced no stream coordinates".to_string(),
            ))
        }
    };

    if !batch {
        println!(
            "✓ Session {} established to {} ({})",
            negotiated.session_id, instance_id, cluster
        );
    }

    let mut command = plugin_command(
        plugin,
        &negotiated,
        region,
        profile,
        instance_id,
        &broker.endpoint(),
    )?;

    let child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            remote.mark_failed();
            close_quietly(&mut remote, broker).await;
            if err.kind() == ErrorKind::NotFound {
                return Err(EcsError::Config(format!(
                    "'{}' not found on PATH. Install the Session Manager plugin: \
                     https://docs.aws.amazon.com/systems-manager/latest/userguide/session-manager-working-with-install-plugin.html",
                    plugin
                )));
            }
            return Err(EcsError::SessionTerminated(format!(
                "failed to launch '{}': {}",
                plugin, err
            )));
        }
    };

    let interrupt = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let outcome = supervise(child, interrupt).await;

    if !matches!(outcome, Ok(TunnelOutcome::Exited(0))) {
        remote.mark_failed();
    }
    close_quietly(&mut remote, broker).await;

    match outcome? {
        TunnelOutcome::Exited(0) => {
            if !batch {
                println!("Session {} closed.", negotiated.session_id);
            }
            Ok(0)
        }
        TunnelOutcome::Exited(code) => {
            eprintln!("Session terminated: plugin exited with code {}", code);
            Ok(code)
        }
        TunnelOutcome::Interrupted => {
            if !batch {
                println!("Session {} interrupted.", negotiated.session_id);
            }
            Ok(130)
        }
    }
}

/// Build the tunnel plugin invocation
///
/// The plugin's positional contract: session JSON, region, operation
/// name, profile, target parameters JSON, broker endpoint. The terminal
/// is handed to the plugin for the session's lifetime.
pub(crate) fn plugin_command(
    plugin: &str,
    session: &BrokerSession,
    region: &str,
    profile: Option<&str>,
    instance_id: &str,
    endpoint: &str,
) -> Result<Command> {
    let session_json = serde_json::to_string(session)?;
    let target_params = json!({ "Target": instance_id }).to_string();

    let mut command = Command::new(plugin);
    command
        .arg(session_json)
        .arg(region)
        .arg(session::PLUGIN_OPERATION)
        .arg(profile.unwrap_or(""))
        .arg(target_params)
        .arg(endpoint)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    Ok(command)
}

/// Wait for the plugin, racing it against an interrupt signal
pub(crate) async fn supervise(
    mut child: Child,
    interrupt: impl std::future::Future<Output = ()>,
) -> Result<TunnelOutcome> {
    tokio::select! {
        status = child.wait() => {
            let status = status.map_err(|e| {
                EcsError::SessionTerminated(format!("lost track of the tunnel plugin: {}", e))
            })?;
            // Signal-killed children report no code
            let code = status.code().map(|c| (c & 0xff) as u8).unwrap_or(1);
            debug!("Tunnel plugin exited with code {}", code);
            Ok(TunnelOutcome::Exited(code))
        }
        _ = interrupt => {
            debug!("Interrupt received, stopping the tunnel plugin");
            let _ = child.kill().await;
            Ok(TunnelOutcome::Interrupted)
        }
    }
}

/// Release the broker session; teardown failure must not mask the
/// session outcome.
async fn close_quietly<B: SessionBroker>(remote: &mut RemoteSession, broker: &B) {
    if let Err(err) = remote.close(broker).await {
        warn!("Failed to release broker session: {}", err);
    }
}
