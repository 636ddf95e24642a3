use super::*;

#[test]
fn default_matches_documented_morel_defaults() {
    let config = Config::default();
    assert!(!config.hybrid);
    assert!(config.relationalize);
    assert!(config.match_coverage_enabled);
    assert!(config.inline_pass_count > 0);
}

#[test]
fn round_trips_through_json() {
    let config = Config { hybrid: true, inline_pass_count: 5, relationalize: false, match_coverage_enabled: true };
    let json = serde_json::to_string(&config).expect("serialize");
    let back: Config = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(config, back);
}
