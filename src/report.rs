//! Plain-text run summaries printed to stdout.

use crate::delete::{DeletionOutcome, DeletionReport};
use crate::reconcile::{ApplyReport, PlanOutcome, PlanWrite, ResourceStatus};

const RULE: &str = "============================================================";

fn mode(dry_run: bool) -> &'static str {
    if dry_run {
        "DRY RUN"
    } else {
        "LIVE"
    }
}

/// Summary of an `apply` run, one line per contact and plan.
#[must_use]
pub fn format_apply_summary(report: &ApplyReport) -> String {
    let mut lines = vec![
        RULE.to_string(),
        if report.dry_run { "DRY RUN SUMMARY" } else { "APPLY SUMMARY" }.to_string(),
        RULE.to_string(),
        format!("Mode: {}", mode(report.dry_run)),
        format!("Region: {}", report.region),
        format!("Account: {}", report.account_id),
        String::new(),
        format!("Contacts ({}):", report.contacts.len()),
    ];

    for contact in &report.contacts {
        match &contact.result {
            Ok(res) => {
                let channels: Vec<String> = res
                    .channels
                    .iter()
                    .map(|(t, status)| format!("{t} {}", status.label()))
                    .collect();
                let plan = match &res.plan {
                    PlanWrite::Written => "plan written".to_string(),
                    PlanWrite::Unchanged => "plan unchanged".to_string(),
                    PlanWrite::WouldWrite => "plan would be written".to_string(),
                    PlanWrite::Failed(reason) => format!("plan NOT written: {reason}"),
                };
                lines.push(format!(
                    "  {:<13} {} [{}] {} stage(s), {plan}",
                    res.contact.label().to_uppercase(),
                    contact.alias,
                    channels.join(", "),
                    res.stages,
                ));
            }
            Err(reason) => lines.push(format!("  {:<13} {}: {reason}", "FAILED", contact.alias)),
        }
    }

    lines.push(String::new());
    lines.push(format!("Response plans ({}):", report.plans.len()));
    for plan in &report.plans {
        let line = match &plan.result {
            Ok(PlanOutcome::Updated { engagements, skipped }) => with_skipped(
                format!("  UPDATED       {} -> {} contact(s)", plan.name, engagements.len()),
                skipped,
            ),
            Ok(PlanOutcome::WouldUpdate { engagements, skipped }) => with_skipped(
                format!("  WOULD UPDATE  {} -> {} contact(s)", plan.name, engagements.len()),
                skipped,
            ),
            Ok(PlanOutcome::Unchanged { engagements }) => {
                format!("  UNCHANGED     {} ({} contact(s))", plan.name, engagements.len())
            }
            Ok(PlanOutcome::NotFound) => format!("  NOT FOUND     {}", plan.name),
            Ok(PlanOutcome::NoResolvedContacts) => {
                format!("  SKIPPED       {} (no resolved contacts)", plan.name)
            }
            Err(reason) => format!("  FAILED        {}: {reason}", plan.name),
        };
        lines.push(line);
    }

    lines.push(String::new());
    lines.push(format!("Failed items: {}", report.failed()));
    lines.push(RULE.to_string());
    lines.join("\n")
}

fn with_skipped(line: String, skipped: &[String]) -> String {
    if skipped.is_empty() {
        line
    } else {
        format!("{line} (skipped: {})", skipped.join(", "))
    }
}

/// Summary of a `delete` run, one line per alias.
#[must_use]
pub fn format_deletion_summary(report: &DeletionReport) -> String {
    let mut lines = vec![
        RULE.to_string(),
        if report.dry_run { "DRY RUN SUMMARY" } else { "DELETION SUMMARY" }.to_string(),
        RULE.to_string(),
    ];

    let mut done = 0;
    let mut absent = 0;
    for entry in &report.entries {
        match &entry.outcome {
            DeletionOutcome::Deleted { steps } => {
                done += 1;
                lines.push(format!("  DELETED       {} ({steps} step(s))", entry.alias));
            }
            DeletionOutcome::WouldDelete { steps } => {
                done += 1;
                lines.push(format!("  WOULD DELETE  {}", entry.alias));
                lines.extend(steps.iter().map(|step| format!("      - {step}")));
            }
            DeletionOutcome::Absent => {
                absent += 1;
                lines.push(format!("  ABSENT        {}", entry.alias));
            }
            DeletionOutcome::Failed { completed, error } => lines.push(format!(
                "  FAILED        {} after {completed} step(s): {error}",
                entry.alias
            )),
        }
    }

    lines.push(String::new());
    lines.push(format!("Total contacts processed: {}", report.entries.len()));
    lines.push(format!("  {}: {done}", if report.dry_run { "Would delete" } else { "Deleted" }));
    lines.push(format!("  Already absent: {absent}"));
    lines.push(format!("  Failed: {}", report.failed()));
    lines.push(String::new());
    lines.push(format!("Mode: {}", if report.dry_run { "DRY RUN" } else { "LIVE DELETION" }));
    lines.push(format!("Region: {}", report.region));
    lines.push(format!("Account: {}", report.account_id));
    if report.dry_run {
        lines.push(String::new());
        lines.push("To perform the deletion, run again without --dry-run.".to_string());
    }
    lines.push(RULE.to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delete::{DeletionEntry, DeletionStep};
    use crate::ports::{ChannelType, ResponsePlanSummary};
    use crate::reconcile::{ContactReport, ContactResolution, PlanReport};

    fn apply_report() -> ApplyReport {
        ApplyReport {
            dry_run: false,
            region: "ap-southeast-1".into(),
            account_id: "123456789012".into(),
            contacts: vec![
                ContactReport {
                    alias: "a".into(),
                    result: Ok(ContactResolution {
                        alias: "a".into(),
                        arn: "arn:a".into(),
                        contact: ResourceStatus::Created,
                        channels: vec![(ChannelType::Email, ResourceStatus::Created)],
                        stages: 1,
                        plan: PlanWrite::Written,
                    }),
                },
                ContactReport { alias: "b".into(), result: Err("quota exceeded".into()) },
            ],
            plans: vec![PlanReport {
                name: "P".into(),
                result: Ok(PlanOutcome::Updated {
                    engagements: vec!["arn:a".into()],
                    skipped: vec!["b".into()],
                }),
            }],
        }
    }

    #[test]
    fn apply_summary_lists_every_item() {
        let output = format_apply_summary(&apply_report());
        assert!(output.contains("APPLY SUMMARY"));
        assert!(output.contains("a [EMAIL created] 1 stage(s), plan written"));
        assert!(output.contains("FAILED        b: quota exceeded"));
        assert!(output.contains("UPDATED       P -> 1 contact(s) (skipped: b)"));
        assert!(output.contains("Failed items: 1"));
    }

    #[test]
    fn deletion_summary_counts_outcomes() {
        let report = DeletionReport {
            dry_run: true,
            region: "us-east-1".into(),
            account_id: "1".into(),
            entries: vec![
                DeletionEntry {
                    alias: "x".into(),
                    outcome: DeletionOutcome::WouldDelete {
                        steps: vec![
                            DeletionStep::Disassociate(ResponsePlanSummary {
                                arn: "arn:p".into(),
                                name: "P".into(),
                            }),
                            DeletionStep::DeleteContact("arn:x".into()),
                        ],
                    },
                },
                DeletionEntry { alias: "ghost".into(), outcome: DeletionOutcome::Absent },
            ],
        };
        let output = format_deletion_summary(&report);
        assert!(output.contains("DRY RUN SUMMARY"));
        assert!(output.contains("- remove from response plan P"));
        assert!(output.contains("- delete contact arn:x"));
        assert!(output.contains("Would delete: 1"));
        assert!(output.contains("Already absent: 1"));
        assert!(output.contains("Failed: 0"));
        assert!(output.contains("without --dry-run"));
    }
}
