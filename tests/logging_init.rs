use timu_core::{default_log_level, init_logging, logging_status};

#[test]
fn init_is_idempotent_for_same_config_and_rejects_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().to_str().unwrap().to_string();
    let other_dir = tempfile::tempdir().unwrap();
    let other_dir_str = other_dir.path().to_str().unwrap().to_string();

    assert!(logging_status().is_none());

    init_logging("info", &log_dir).expect("first init should succeed");
    init_logging("info", &log_dir).expect("same config should be idempotent");

    let level_error = init_logging("debug", &log_dir).expect_err("level conflict should fail");
    assert!(level_error.contains("refusing to switch"));

    let dir_error = init_logging("info", &other_dir_str).expect_err("dir conflict should fail");
    assert!(dir_error.contains("refusing to switch"));

    let (active_level, active_dir) = logging_status().expect("logging should be active");
    assert_eq!(active_level, "info");
    assert_eq!(active_dir, dir.path());

    assert!(!default_log_level().is_empty());
}
