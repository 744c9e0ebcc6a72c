use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_uses_defaults() {
    let cfg = HostConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
}

#[test]
fn from_lookup_reads_port_and_trims_url() {
    let cfg = HostConfig::from_lookup(lookup(&[
        ("PORT", "8080"),
        ("JOBDESK_API_BASE_URL", "https://api.example.com/"),
    ]))
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.api_base_url, "https://api.example.com");
}

#[test]
fn from_lookup_rejects_bad_port() {
    let err = HostConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidPort("eighty".to_owned()));
}

#[test]
fn from_lookup_rejects_non_http_url() {
    let err = HostConfig::from_lookup(lookup(&[("JOBDESK_API_BASE_URL", "localhost:8000")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidApiBaseUrl(_)));

    let err = HostConfig::from_lookup(lookup(&[("JOBDESK_API_BASE_URL", "http://")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidApiBaseUrl(_)));
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let cfg = HostConfig::from_lookup(lookup(&[("PORT", " "), ("JOBDESK_API_BASE_URL", "")])).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
}
