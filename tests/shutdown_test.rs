#![cfg(unix)]

use std::process::Command;
use std::time::Duration;

use priority_tasks::shutdown::Shutdown;

#[tokio::test]
async fn test_sigterm_triggers_shutdown() {
    let shutdown = Shutdown::install().expect("Failed to install signal handlers");

    let status = Command::new("kill")
        .args(["-TERM", &std::process::id().to_string()])
        .status()
        .expect("Failed to run kill");
    assert!(status.success());

    tokio::time::timeout(Duration::from_secs(5), shutdown.wait())
        .await
        .expect("shutdown did not resolve on SIGTERM");
}
