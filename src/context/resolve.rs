//! Region and context resolution from multiple sources

use log::debug;

use crate::config::defaults;
use crate::error::{EcsError, Result};

use super::models::{Context, ContextConfig};

/// Resolve the effective region:
/// 1. --region CLI flag
/// 2. active context's region
/// 3. AWS_REGION env var
/// 4. built-in default
///
/// The env var sits below the context on purpose: a persisted selection
/// should not be overridden by ambient shell state.
pub fn resolve_region(cli_region: Option<&str>, context: Option<&Context>) -> String {
    if let Some(region) = cli_region {
        debug!("Using region from CLI flag: {}", region);
        return region.to_string();
    }

    if let Some(ctx) = context {
        debug!("Using region from active context: {}", ctx.region);
        return ctx.region.clone();
    }

    if let Ok(region) = std::env::var(defaults::REGION_ENV) {
        if !region.is_empty() {
            debug!("Using region from {} env var: {}", defaults::REGION_ENV, region);
            return region;
        }
    }

    debug!("Using default region: {}", defaults::REGION);
    defaults::REGION.to_string()
}

/// Return the active context or fail with the selection-required error
pub fn require_active_context(config: &ContextConfig) -> Result<&Context> {
    match &config.current {
        Some(ctx) => {
            debug!(
                "Active context: cluster={} region={}",
                ctx.cluster, ctx.region
            );
            Ok(ctx)
        }
        None => Err(EcsError::NoActiveContext),
    }
}
