//! Record-replay round trips.
//!
//! 1. Record an `apply` run against the in-memory account.
//! 2. Replay the cassettes through `ServiceContext::replaying_from()` and
//!    assert the report is identical, twice.
//! 3. Replay the same cassettes through the binary via `ONCALL_REPLAY`.

use std::path::{Path, PathBuf};
use std::process::Command;

use oncall::adapters::memory::InMemoryIncidentManager;
use oncall::cassette::config::CassetteConfig;
use oncall::cassette::session::RecordingSession;
use oncall::config::OncallConfig;
use oncall::context::ServiceContext;
use oncall::delete::{delete_contacts, DeleteOptions, DeletionOutcome};
use oncall::reconcile::{apply, ApplyReport};

const REGION: &str = "ap-southeast-1";
const ACCOUNT: &str = "123456789012";

const CONFIG: &str = r#"
region: ap-southeast-1
contacts:
  - alias: a
    name: Contact A
    channels:
      - { type: EMAIL, address: a@example.com }
      - { type: SMS, address: "+10000000001" }
  - alias: b
    name: Contact B
    channels:
      - { type: SMS, address: "+10000000002" }
response_plans:
  - name: P
    contacts: [a, b]
deletion:
  contacts: [a]
"#;

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("oncall_{name}_{}", std::process::id()))
}

fn account() -> InMemoryIncidentManager {
    let im = InMemoryIncidentManager::new(REGION, ACCOUNT);
    im.insert_response_plan("P", "Critical outage", 1);
    im
}

/// Runs `apply` on a recording context writing cassettes into `dir`.
fn record_apply(im: &InMemoryIncidentManager, dir: &Path) -> ApplyReport {
    let config = OncallConfig::from_yaml(CONFIG).unwrap();
    let session = RecordingSession::at(dir).unwrap();
    let ctx = ServiceContext::recording(ServiceContext::in_memory(im), &session);
    let report = apply(&ctx, &config, false).unwrap();
    drop(ctx);
    session.finish().unwrap();
    report
}

#[test]
fn replayed_apply_matches_recording() {
    let dir = scratch("replay_apply");
    let _ = std::fs::remove_dir_all(&dir);
    let im = account();
    let recorded = record_apply(&im, &dir);
    assert_eq!(recorded.failed(), 0);

    let config = OncallConfig::from_yaml(CONFIG).unwrap();
    let first = {
        let ctx = ServiceContext::replaying_from(&CassetteConfig::from_dir(&dir)).unwrap();
        apply(&ctx, &config, false).unwrap()
    };
    let second = {
        let ctx = ServiceContext::replaying_from(&CassetteConfig::from_dir(&dir)).unwrap();
        apply(&ctx, &config, false).unwrap()
    };

    assert_eq!(first, recorded, "replay differs from recording");
    assert_eq!(first, second, "replays differ from each other");
    assert_eq!(first.resolved().get("a"), im.contact("a").map(|c| c.arn).as_ref());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn binary_replays_recorded_apply() {
    let dir = scratch("replay_bin");
    let _ = std::fs::remove_dir_all(&dir);
    record_apply(&account(), &dir);
    let config_path = dir.join("oncall.yaml");
    std::fs::write(&config_path, CONFIG).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_oncall"))
        .args(["--config", config_path.to_str().unwrap(), "apply"])
        .env("ONCALL_REPLAY", &dir)
        .env_remove("ONCALL_RECORD")
        .env("RUST_LOG", "oncall=warn")
        .output()
        .expect("failed to run oncall binary");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("APPLY SUMMARY"));
    assert!(stdout.contains("UPDATED       P -> 2 contact(s)"));
    assert!(stdout.contains("Failed items: 0"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn recorded_deletion_replays_identically() {
    let apply_dir = scratch("replay_delete_setup");
    let dir = scratch("replay_delete");
    let _ = std::fs::remove_dir_all(&apply_dir);
    let _ = std::fs::remove_dir_all(&dir);
    let im = account();
    record_apply(&im, &apply_dir);

    let aliases = vec!["a".to_string()];
    let options = DeleteOptions { dry_run: false, remove_from_response_plans: true };
    let session = RecordingSession::at(&dir).unwrap();
    let ctx = ServiceContext::recording(ServiceContext::in_memory(&im), &session);
    let recorded = delete_contacts(&ctx, REGION, &aliases, options).unwrap();
    drop(ctx);
    session.finish().unwrap();

    assert_eq!(recorded.entries[0].outcome, DeletionOutcome::Deleted { steps: 4 });
    assert!(im.contact("a").is_none());

    let ctx = ServiceContext::replaying_from(&CassetteConfig::from_dir(&dir)).unwrap();
    let replayed = delete_contacts(&ctx, REGION, &aliases, options).unwrap();
    assert_eq!(replayed, recorded);

    let _ = std::fs::remove_dir_all(&apply_dir);
    let _ = std::fs::remove_dir_all(&dir);
}
