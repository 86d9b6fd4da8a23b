//! `oncall apply`: converge contacts, then response plans.

use tracing::warn;

use crate::config::OncallConfig;
use crate::context::ServiceContext;
use crate::reconcile;
use crate::report::format_apply_summary;

/// Runs one apply pass and prints its summary.
///
/// # Errors
///
/// Returns an error if the account cannot be resolved or any contact or
/// plan failed.
pub fn run(ctx: &ServiceContext, config: &OncallConfig, dry_run: bool) -> Result<(), String> {
    if dry_run {
        warn!("DRY RUN MODE: no changes will be made");
    }
    let report = reconcile::apply(ctx, config, dry_run)
        .map_err(|e| format!("Could not resolve the AWS account: {e}"))?;
    println!("{}", format_apply_summary(&report));

    match report.failed() {
        0 => Ok(()),
        n => Err(format!("{n} item(s) failed")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryIncidentManager;

    const ONE_CONTACT: &str = r#"
region: us-east-1
contacts:
  - alias: a
    name: A
    channels:
      - { type: SMS, address: "+1" }
"#;

    #[test]
    fn failed_contact_fails_the_command() {
        let config = OncallConfig::from_yaml(ONE_CONTACT).unwrap();
        let im = InMemoryIncidentManager::new("us-east-1", "123456789012");
        im.fail("create_contact", "a", crate::error::RemoteError::Transport("reset".into()));
        let ctx = ServiceContext::in_memory(&im);

        let err = run(&ctx, &config, false).unwrap_err();
        assert_eq!(err, "1 item(s) failed");
    }

    #[test]
    fn empty_config_succeeds() {
        let im = InMemoryIncidentManager::new("us-east-1", "123456789012");
        let ctx = ServiceContext::in_memory(&im);
        assert!(run(&ctx, &OncallConfig::default(), false).is_ok());
    }
}
