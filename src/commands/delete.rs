//! `oncall delete`: remove contacts after detaching them from response plans.

use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use tracing::warn;

use crate::config::OncallConfig;
use crate::context::ServiceContext;
use crate::delete::{delete_contacts, DeleteOptions};
use crate::report::format_deletion_summary;

/// Word the operator has to type to confirm a live deletion.
const CONFIRMATION_WORD: &str = "DELETE";

/// Command-line flags for `delete`.
#[derive(Debug)]
pub struct DeleteArgs<'a> {
    /// `--dry-run`; ORed with `deletion.dry_run`.
    pub dry_run: bool,
    /// `--yes`; skips the confirmation prompt.
    pub yes: bool,
    /// Aliases from the command line; when empty, `deletion.contacts` is used.
    pub aliases: &'a [String],
}

/// Runs a deletion batch and prints its summary.
///
/// # Errors
///
/// Returns an error if no aliases were given, the operator declined, the
/// account cannot be resolved, or any alias failed.
pub fn run(
    ctx: &ServiceContext,
    config: &OncallConfig,
    args: &DeleteArgs<'_>,
) -> Result<(), String> {
    let aliases =
        if args.aliases.is_empty() { config.deletion.contacts.as_slice() } else { args.aliases };
    if aliases.is_empty() {
        return Err(
            "No contacts specified for deletion: pass aliases or set deletion.contacts".to_string()
        );
    }

    let dry_run = args.dry_run || config.deletion.dry_run;
    if dry_run {
        warn!("DRY RUN MODE: no changes will be made");
    } else if config.deletion.require_confirmation && !args.yes && !confirm(aliases)? {
        warn!("Deletion cancelled by user");
        return Err("Deletion cancelled".to_string());
    }

    let options = DeleteOptions {
        dry_run,
        remove_from_response_plans: config.deletion.remove_from_response_plans,
    };
    let report = delete_contacts(ctx, &config.region(), aliases, options)
        .map_err(|e| format!("Could not resolve the AWS account: {e}"))?;
    println!("{}", format_deletion_summary(&report));

    match report.failed() {
        0 => Ok(()),
        n => Err(format!("{n} contact(s) failed to delete")),
    }
}

/// Lists the aliases and asks the operator to type the confirmation word.
fn confirm(aliases: &[String]) -> Result<bool, String> {
    eprintln!("WARNING: You are about to delete the following contacts:");
    for alias in aliases {
        eprintln!("  - {alias}");
    }
    eprintln!("This action cannot be undone!");

    let answer: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Type '{CONFIRMATION_WORD}' to confirm deletion"))
        .allow_empty(true)
        .interact_text()
        .map_err(|e| format!("Could not read confirmation: {e}"))?;
    Ok(is_confirmation(&answer))
}

fn is_confirmation(answer: &str) -> bool {
    answer.trim() == CONFIRMATION_WORD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryIncidentManager;
    use crate::ports::{ContactsService, NewContact};

    fn account_with(alias: &str) -> InMemoryIncidentManager {
        let im = InMemoryIncidentManager::new("us-east-1", "123456789012");
        im.create_contact(&NewContact { alias: alias.into(), display_name: alias.into() })
            .unwrap();
        im
    }

    #[test]
    fn only_the_exact_word_confirms() {
        assert!(is_confirmation("DELETE"));
        assert!(is_confirmation(" DELETE\n"));
        assert!(!is_confirmation("delete"));
        assert!(!is_confirmation("yes"));
    }

    #[test]
    fn dry_run_from_config_skips_confirmation_and_mutations() {
        let im = account_with("x");
        let writes = im.mutations().len();
        let ctx = ServiceContext::in_memory(&im);
        let mut config = OncallConfig { region: Some("us-east-1".into()), ..Default::default() };
        config.deletion.contacts = vec!["x".into()];
        config.deletion.dry_run = true;

        // require_confirmation is on by default; no prompt may be shown.
        run(&ctx, &config, &DeleteArgs { dry_run: false, yes: false, aliases: &[] }).unwrap();

        assert_eq!(im.mutations().len(), writes);
        assert!(im.contact("x").is_some());
    }

    #[test]
    fn command_line_aliases_override_config() {
        let im = account_with("x");
        let ctx = ServiceContext::in_memory(&im);
        let mut config = OncallConfig { region: Some("us-east-1".into()), ..Default::default() };
        config.deletion.contacts = vec!["other".into()];
        let aliases = vec!["x".to_string()];

        run(&ctx, &config, &DeleteArgs { dry_run: false, yes: true, aliases: &aliases }).unwrap();

        assert!(im.contact("x").is_none());
    }

    #[test]
    fn nothing_to_delete_is_an_error() {
        let im = InMemoryIncidentManager::new("us-east-1", "123456789012");
        let ctx = ServiceContext::in_memory(&im);
        let args = DeleteArgs { dry_run: true, yes: true, aliases: &[] };
        assert!(run(&ctx, &OncallConfig::default(), &args).is_err());
    }
}
