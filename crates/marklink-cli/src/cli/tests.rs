use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_defaults() {
    let cli = parse(&["marklink"]);
    assert!(cli.file.is_none());
    assert!(cli.format.is_none());
    assert!(!cli.remove_query);
    assert!(cli.transformers.is_none());
    assert!(!cli.list);
    assert!(!cli.skip_failed);
    assert_eq!(cli.verbose, 0);

    let overrides = cli.overrides();
    let settings = Settings::resolve(&config::MarklinkConfig::default(), &overrides).unwrap();
    assert_eq!(settings.transformers.names(), vec!["github", "youtube"]);
}

#[test]
fn cli_parse_file_and_flags() {
    let cli = parse(&["marklink", "notes.txt", "-f", "org", "-q", "--skip-failed", "--timeout", "3"]);
    assert_eq!(cli.file.as_deref(), Some(std::path::Path::new("notes.txt")));
    assert_eq!(cli.format.as_deref(), Some("org"));
    assert!(cli.remove_query);
    assert!(cli.skip_failed);
    assert_eq!(cli.timeout, Some(3));
}

#[test]
fn cli_parse_transformers_comma_separated() {
    let cli = parse(&["marklink", "-t", "youtube,github"]);
    assert_eq!(
        cli.overrides().transformers,
        Some(vec!["youtube".to_string(), "github".to_string()])
    );
}

#[test]
fn cli_parse_empty_transformers_disables_all() {
    let cli = parse(&["marklink", "--transformers", ""]);
    assert_eq!(cli.overrides().transformers, Some(Vec::new()));
}

#[test]
fn cli_parse_list_and_verbosity() {
    let cli = parse(&["marklink", "--list", "-vv", "--log-file", "/tmp/marklink.log"]);
    assert!(cli.list);
    assert!(cli.overrides().list);
    assert_eq!(cli.verbose, 2);
    assert_eq!(
        cli.log_file.as_deref(),
        Some(std::path::Path::new("/tmp/marklink.log"))
    );
}

#[test]
fn cli_parse_config_path() {
    let cli = parse(&["marklink", "-c", "/etc/marklink.toml", "-"]);
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("/etc/marklink.toml"))
    );
    assert_eq!(cli.file.as_deref(), Some(std::path::Path::new("-")));
}

#[test]
fn bad_format_fails_at_resolution() {
    let cli = parse(&["marklink", "--format", "rst"]);
    let err = Settings::resolve(&config::MarklinkConfig::default(), &cli.overrides()).unwrap_err();
    assert!(err.to_string().contains("rst"));
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
