#![allow(clippy::float_cmp)]

use super::*;

const VARS: [&str; 5] = [
    "MENDER_HANDLE_SIZE_PX",
    "MENDER_MIN_BOX_PX",
    "MENDER_MIN_DRAW_PX",
    "MENDER_MOVE_THRESHOLD_PX",
    "MENDER_CONFIDENCE",
];

/// # Safety
/// Only one test in this module touches the environment.
unsafe fn clear_mender_env() {
    for var in VARS {
        unsafe { std::env::remove_var(var) };
    }
}

#[test]
fn default_uses_constants() {
    let cfg = CanvasConfig::default();
    assert_eq!(cfg.handle_size_px, HANDLE_SIZE_PX);
    assert_eq!(cfg.min_box_px, MIN_BOX_PX);
    assert_eq!(cfg.min_draw_px, MIN_DRAW_PX);
    assert_eq!(cfg.move_threshold_px, MOVE_THRESHOLD_PX);
    assert_eq!(cfg.confidence_threshold, DEFAULT_CONFIDENCE);
}

#[test]
fn from_env_reads_overrides_and_rejects_garbage() {
    // Both cases share one test so parallel tests never race on the env.
    unsafe {
        clear_mender_env();
        std::env::set_var("MENDER_HANDLE_SIZE_PX", "6");
        std::env::set_var("MENDER_CONFIDENCE", " 0.5 ");
    }

    let cfg = CanvasConfig::from_env().unwrap();
    assert_eq!(cfg.handle_size_px, 6.0);
    assert_eq!(cfg.confidence_threshold, 0.5);
    assert_eq!(cfg.min_box_px, MIN_BOX_PX);

    unsafe { std::env::set_var("MENDER_MIN_DRAW_PX", "five") };
    let err = CanvasConfig::from_env().unwrap_err();
    assert_eq!(err, ConfigError::Parse { var: "MENDER_MIN_DRAW_PX", value: "five".into() });

    unsafe { clear_mender_env() };
}

#[test]
fn parse_bounded_rejects_out_of_range() {
    let err = parse_bounded("MENDER_CONFIDENCE", "1.5", 0.0, 1.0).unwrap_err();
    assert!(err.to_string().contains("outside"));
    assert!(parse_bounded("MENDER_CONFIDENCE", "NaN", 0.0, 1.0).is_err());
}

#[test]
fn parse_bounded_accepts_limits() {
    assert_eq!(parse_bounded("X", "0", 0.0, 1.0), Ok(0.0));
    assert_eq!(parse_bounded("X", "1", 0.0, 1.0), Ok(1.0));
}
