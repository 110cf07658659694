#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! End-to-end provisioning passes against a temporary home directory.
//!
//! Each test runs the full task list with a stub key generator and no remote
//! lookups, then inspects the resulting tree and the run report.

mod common;

use common::{ALICE, CONTOSO_BOB, TestHome};
use devprofile_cli::report::{Outcome, Step};
use devprofile_cli::tasks;

// ---------------------------------------------------------------------------
// Task list
// ---------------------------------------------------------------------------

#[test]
fn task_names_in_order() {
    let all = tasks::all_tasks();
    let names: Vec<&str> = all.iter().map(|t| t.name()).collect();
    insta::assert_snapshot!(names.join("\n"), @r"
    Create source directories
    Create SSH directories
    Provision SSH keys
    Merge SSH config
    Merge git config
    Merge account git configs
    ");
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn fresh_standalone_account() {
    let home = TestHome::new();
    let (report, failures) = home.provision(ALICE, false);
    assert_eq!(failures, 0);
    assert!(!report.has_failures(), "{report:?}");

    assert!(home.join("src/github.com/alice").is_dir());
    assert!(home.join(".ssh/github.com/alice").is_dir());
    assert!(home.join(".ssh/github.com/alice/alice_rsa").is_file());
    assert!(home.join(".ssh/github.com/alice/alice_rsa.pub").is_file());

    let ssh = home.read(".ssh/config");
    assert_eq!(ssh.matches("Host alice.github.com").count(), 1);

    let gitconfig = home.read(".gitconfig");
    assert!(gitconfig.contains("gitdir:~/src/github.com/alice/"));

    let account = home.read("src/github.com/alice/.gitconfig");
    assert!(account.contains("name = alice"));
    assert!(account.contains("email = alice@users.noreply.github.com"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = |rel: &str| {
            std::fs::metadata(home.join(rel)).unwrap().permissions().mode() & 0o777
        };
        assert_eq!(mode(".ssh/github.com/alice/alice_rsa"), 0o600);
        assert_eq!(mode(".ssh/github.com/alice/alice_rsa.pub"), 0o644);
        assert_eq!(mode(".ssh/config"), 0o600);
        assert_eq!(mode(".gitconfig"), 0o644);
    }
}

#[test]
fn organisation_account_run_twice_is_idempotent() {
    let home = TestHome::new();
    let (first, _) = home.provision(CONTOSO_BOB, false);
    assert!(first.entries().iter().all(|e| e.outcome == Outcome::Created));
    assert_eq!(first.entries().len(), 6);

    let snapshot = |home: &TestHome| {
        (
            home.read(".ssh/config"),
            home.read(".gitconfig"),
            home.read("src/dev.azure.com/contoso/bob/.gitconfig"),
            home.read(".ssh/dev.azure.com/bob/bob_rsa"),
        )
    };
    let before = snapshot(&home);

    let (second, failures) = home.provision(CONTOSO_BOB, false);
    assert_eq!(failures, 0);
    assert_eq!(second.entries().len(), 6);
    assert!(
        second
            .entries()
            .iter()
            .all(|e| e.outcome == Outcome::AlreadyExists),
        "{second:?}"
    );
    assert_eq!(snapshot(&home), before);

    let account = home.read("src/dev.azure.com/contoso/bob/.gitconfig");
    assert_eq!(account.matches("email = bob@contoso.com").count(), 1);
    assert!(account.contains("insteadOf = git@ssh.dev.azure.com:v3/contoso/"));

    // The rewritten alias must still reach the Azure SSH endpoint
    let ssh = home.read(".ssh/config");
    assert!(ssh.contains("Host bob.dev.azure.com\n    HostName ssh.dev.azure.com\n"));
}

#[test]
fn incomplete_key_pair_is_repaired() {
    let home = TestHome::new();
    let dir = home.join(".ssh/github.com/carol");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("carol_rsa.pub"), "stale").unwrap();

    let hierarchy = "[[providers]]\nname = \"github.com\"\naccounts = [\"carol\"]\n";
    let (report, failures) = home.provision(hierarchy, false);
    assert_eq!(failures, 0);

    let key = report.for_step(Step::KeyPair).next().unwrap();
    assert_eq!(key.outcome, Outcome::Repaired);
    assert!(dir.join("carol_rsa").is_file());
    assert_ne!(home.read(".ssh/github.com/carol/carol_rsa.pub"), "stale");
}

#[test]
fn existing_host_block_is_not_duplicated() {
    let home = TestHome::new();
    std::fs::create_dir_all(home.join(".ssh")).unwrap();
    let original = "Host alice.github.com\n    HostName github.com\n    User git\n";
    std::fs::write(home.join(".ssh/config"), original).unwrap();

    let (report, _) = home.provision(ALICE, false);
    let entry = report.for_step(Step::SshConfig).next().unwrap();
    assert_eq!(entry.outcome, Outcome::AlreadyExists);
    assert_eq!(home.read(".ssh/config"), original);
}

#[test]
fn existing_gitconfig_gets_exactly_one_include() {
    let home = TestHome::new();
    std::fs::write(home.join(".gitconfig"), "[user]\n    name = Someone\n").unwrap();

    let _ = home.provision(ALICE, false);
    let text = home.read(".gitconfig");
    assert!(text.starts_with("[user]\n    name = Someone\n"));
    assert_eq!(text.matches("gitdir:~/src/github.com/alice/").count(), 1);
}

#[test]
fn dry_run_writes_nothing() {
    let home = TestHome::new();
    let (report, failures) = home.provision(ALICE, true);
    assert_eq!(failures, 0);
    assert!(!report.entries().is_empty());
    assert!(report.entries().iter().all(|e| e.outcome == Outcome::Planned));
    assert!(!home.join("src").exists());
    assert!(!home.join(".ssh").exists());
    assert!(!home.join(".gitconfig").exists());
}

#[test]
fn one_failing_account_does_not_stop_siblings() {
    let home = TestHome::new();
    std::fs::create_dir_all(home.join("src/github.com")).unwrap();
    std::fs::write(home.join("src/github.com/alice"), "in the way").unwrap();

    let hierarchy = "[[providers]]\nname = \"github.com\"\naccounts = [\"alice\", \"dave\"]\n";
    let (report, failures) = home.provision(hierarchy, false);
    assert!(failures > 0);
    assert!(report.has_failures());

    assert!(home.join("src/github.com/dave").is_dir());
    assert!(home.join(".ssh/github.com/alice/alice_rsa").is_file());
    assert!(home.read(".ssh/config").contains("Host dave.github.com"));
    assert!(home.read("src/github.com/dave/.gitconfig").contains("name = dave"));
}

#[test]
fn org_and_standalone_same_name_share_ssh_identity() {
    let home = TestHome::new();
    let hierarchy = r#"
[[providers]]
name = "dev.azure.com"
accounts = ["bob"]

[[providers.organisations]]
name = "contoso"
accounts = ["bob"]
"#;
    let (report, failures) = home.provision(hierarchy, false);
    assert_eq!(failures, 0);
    assert_eq!(report.for_step(Step::SourceDirectory).count(), 2);
    assert_eq!(report.for_step(Step::KeyPair).count(), 1);
    assert_eq!(home.read(".ssh/config").matches("Host bob.dev.azure.com").count(), 1);

    let org = home.read("src/dev.azure.com/contoso/bob/.gitconfig");
    let solo = home.read("src/dev.azure.com/bob/.gitconfig");
    assert!(org.contains("email = bob@contoso.com"));
    assert!(solo.contains("email = bob@dev.azure.com"));
    assert!(solo.contains("v3/bob/"));
}
