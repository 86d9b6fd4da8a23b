//! `oncall validate`: check the config file offline.

use crate::config::OncallConfig;

/// Prints what the config declares. Validation errors surface while
/// loading, before this runs.
pub fn run(config: &OncallConfig) {
    let channels: usize = config.contacts.iter().map(|c| c.channels.len()).sum();
    println!(
        "Configuration OK: {} contact(s), {channels} channel(s), {} response plan(s)",
        config.contacts.len(),
        config.response_plans.len(),
    );
    println!("Marked for deletion: {}", config.deletion.contacts.len());
    println!("Region: {}", config.region());
}
