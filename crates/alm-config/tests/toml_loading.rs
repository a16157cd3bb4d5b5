//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use alm_config::AlmConfig;
use alm_core::enums::LineStyle;
use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[range]
start_year = 2020
end_year = 2024

[output]
path = "fixtures/recent.jsonl"
line_style = "compact"
validate_schema = true

[oracle]
python = "/opt/venv/bin/python"
god_type = "cnlunar"

[report]
max_errors = 10
"#,
        )?;

        let config: AlmConfig = Figment::from(Serialized::defaults(AlmConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.range.start_year, 2020);
        assert_eq!(config.range.end_year, 2024);
        assert_eq!(config.output.path, "fixtures/recent.jsonl");
        assert_eq!(config.output.line_style, LineStyle::Compact);
        assert!(config.output.validate_schema);
        assert_eq!(config.oracle.python, "/opt/venv/bin/python");
        assert_eq!(config.oracle.god_type, "cnlunar");
        assert_eq!(config.report.max_errors, 10);
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_other_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[range]
end_year = 1950
"#,
        )?;

        let config: AlmConfig = Figment::from(Serialized::defaults(AlmConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.range.start_year, 1901);
        assert_eq!(config.range.end_year, 1950);
        assert_eq!(config.output.path, "full_test.json");
        assert_eq!(config.output.line_style, LineStyle::Python);
        Ok(())
    });
}

#[test]
fn project_local_config_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".almfx")?;
        jail.create_file(
            ".almfx/config.toml",
            r#"
[output]
path = "local.json"
"#,
        )?;

        let config = AlmConfig::load().expect("config loads");
        assert_eq!(config.output.path, "local.json");
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[range]
start_year = 1990
"#,
        )?;
        jail.set_env("ALMFX_RANGE__START_YEAR", "2000");

        let config: AlmConfig = Figment::from(Serialized::defaults(AlmConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("ALMFX_").split("__"))
            .extract()?;

        assert_eq!(config.range.start_year, 2000);
        Ok(())
    });
}

#[test]
fn unknown_line_style_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[output]
line_style = "pretty"
"#,
        )?;

        let result: Result<AlmConfig, _> =
            Figment::from(Serialized::defaults(AlmConfig::default()))
                .merge(Toml::file("config.toml"))
                .extract();
        assert!(result.is_err());
        Ok(())
    });
}
