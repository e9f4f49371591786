//! Concurrent bootstrap specs
//!
//! Simultaneous recall runs all succeed and leave exactly one daemon
//! holding the lock. More than one launch may happen; the daemons that
//! lose the lock exit.

use crate::prelude::*;
use serial_test::serial;

#[test]
#[serial]
fn simultaneous_runs_leave_one_daemon() {
    let install = Install::new();

    let children: Vec<_> = (0..4)
        .map(|_| {
            let mut cmd = install.recall().command();
            cmd.stdout(std::process::Stdio::null())
                .stderr(std::process::Stdio::null());
            cmd.spawn().unwrap()
        })
        .collect();

    for mut child in children {
        assert!(child.wait().unwrap().success());
    }

    assert!(install.wait_for_daemon(), "log: {}", install.daemon_log());
    let launches = install.launches();
    assert!((1..=4).contains(&launches), "launches: {launches}");

    // Later runs see the survivor
    install
        .recall()
        .passes()
        .stderr_has("daemon already started");
    assert_eq!(install.launches(), launches);
}
