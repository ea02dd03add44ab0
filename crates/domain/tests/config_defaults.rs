use rotom_domain::config::Config;

#[test]
fn default_host_is_localhost() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
}

#[test]
fn default_port_is_5000() {
    let config = Config::default();
    assert_eq!(config.server.port, 5000);
}

#[test]
fn explicit_host_parses() {
    let toml_str = r#"
[server]
host = "0.0.0.0"
port = 8080
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
}

#[test]
fn default_cors_allows_only_localhost() {
    let config = Config::default();
    assert!(config
        .server
        .cors
        .allowed_origins
        .contains(&"http://localhost:*".to_string()));
    assert!(config
        .server
        .cors
        .allowed_origins
        .contains(&"http://127.0.0.1:*".to_string()));
}

#[test]
fn default_session_namespace() {
    let config = Config::default();
    assert_eq!(config.sessions.app_namespace, "coach");
    assert_eq!(config.sessions.engine_user_id, "web_user");
}

#[test]
fn default_data_host() {
    let config = Config::default();
    assert_eq!(config.tools.data_base_url, "https://data.pkmn.cc");
}

#[test]
fn empty_toml_is_a_full_default_config() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.llm.retry_attempts, 3);
    assert_eq!(config.auth.jwt_secret_env, "RC_JWT_SECRET");
    assert_eq!(config.state_path, std::path::PathBuf::from("./data"));
}
