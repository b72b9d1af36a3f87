use crate::{AppConfig, ConfigError, DatabaseConfig};
use figment::Jail;
use secrecy::{ExposeSecret, Secret};

#[test]
fn test_secret_redaction() {
    let secret = Secret::new("my_secret_password".to_string());
    let debug_output = format!("{:?}", secret);
    assert!(debug_output.contains("Secret([REDACTED"));
    assert!(!debug_output.contains("my_secret_password"));
}

#[test]
fn test_config_struct_redaction() {
    let config = DatabaseConfig {
        user: "shop".to_string(),
        password: Secret::new("hunter2-pass".to_string()),
        ..Default::default()
    };
    let debug_output = format!("{:?}", config);
    assert!(!debug_output.contains("hunter2-pass"));
    assert!(debug_output.contains("Secret([REDACTED"));
}

#[test]
fn test_database_url() {
    let config = DatabaseConfig {
        host: "db.internal".to_string(),
        port: 5433,
        user: "shop".to_string(),
        password: Secret::new("pw".to_string()),
        name: "catalog".to_string(),
        ..Default::default()
    };
    assert_eq!(
        config.url().expose_secret(),
        "postgres://shop:pw@db.internal:5433/catalog"
    );
}

#[test]
fn test_defaults_with_toml_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "default.toml",
            r#"
            [database]
            user = "shop"
            password = "shop-pass"

            [jwt]
            secret = "an-ample-secret-of-more-than-thirty-two-bytes"
            "#,
        )?;

        let config = AppConfig::from_figment(AppConfig::figment(".")).expect("config loads");
        assert_eq!(config.app_env, "development");
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.server.http_addr, "0.0.0.0:8080");
        assert_eq!(config.server.grpc_addr, "0.0.0.0:9091");
        assert_eq!(config.catalog.max_page_size, 100);
        assert_eq!(config.jwt.expires_in, 3600);
        assert!(!config.json_logs());
        Ok(())
    });
}

#[test]
fn test_legacy_env_keys_override_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "default.toml",
            r#"
            [database]
            user = "file-user"
            password = "file-pass"
            "#,
        )?;
        jail.set_env("DB_USER", "env-user");
        jail.set_env("DB_HOST", "db.example.com");
        jail.set_env("SVC_ADDR", "127.0.0.1:7000");

        let config = AppConfig::from_figment(AppConfig::figment(".")).expect("config loads");
        assert_eq!(config.database.user, "env-user");
        assert_eq!(config.database.password.expose_secret(), "file-pass");
        assert_eq!(config.database.host, "db.example.com");
        assert_eq!(config.server.grpc_addr, "127.0.0.1:7000");
        Ok(())
    });
}

#[test]
fn test_prefixed_env_wins_over_legacy() {
    Jail::expect_with(|jail| {
        jail.set_env("DB_USER", "legacy");
        jail.set_env("DB_PASS", "legacy-pass");
        jail.set_env("ECOM_DATABASE__USER", "prefixed");
        jail.set_env("ECOM_CATALOG__MAX_PAGE_SIZE", "25");

        let config = AppConfig::from_figment(AppConfig::figment(".")).expect("config loads");
        assert_eq!(config.database.user, "prefixed");
        assert_eq!(config.catalog.max_page_size, 25);
        Ok(())
    });
}

#[test]
fn test_missing_credentials_rejected() {
    Jail::expect_with(|_jail| {
        let err = AppConfig::from_figment(AppConfig::figment(".")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("credentials")));
        Ok(())
    });
}

#[test]
fn test_bad_listen_address_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("DB_USER", "shop");
        jail.set_env("DB_PASS", "shop-pass");
        jail.set_env("HTTP_ADDR", "not-an-address");

        let err = AppConfig::from_figment(AppConfig::figment(".")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("server.http_addr")));
        Ok(())
    });
}

#[test]
fn test_production_env_selects_json_logs() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "production.toml",
            r#"
            [database]
            user = "shop"
            password = "prod-pass"
            "#,
        )?;
        jail.set_env("APP_ENV", "production");

        let config = AppConfig::from_figment(AppConfig::figment(".")).expect("config loads");
        assert!(config.is_production());
        assert!(config.json_logs());
        Ok(())
    });
}

#[test]
fn test_admin_credentials_need_both_values() {
    Jail::expect_with(|jail| {
        jail.set_env("DB_USER", "shop");
        jail.set_env("DB_PASS", "shop-pass");
        jail.set_env("ADMIN_EMAIL", "root@example.com");

        let config = AppConfig::from_figment(AppConfig::figment(".")).expect("config loads");
        assert!(config.catalog.admin_credentials().is_none());

        jail.set_env("ECOM_CATALOG__ADMIN_PASSWORD", "admin-pass-123");
        let config = AppConfig::from_figment(AppConfig::figment(".")).expect("config loads");
        assert_eq!(
            config.catalog.admin_credentials(),
            Some(("root@example.com", "admin-pass-123"))
        );
        Ok(())
    });
}
