//! Unit tests for CLI argument parsing
#[cfg(test)]
mod tests {
    use fwstamp::cli::args::{Command, parse_args, parse_option_pair};

    fn make_args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_version_with_resolver_options() {
        let argv = make_args(&["fwstamp", "version", "--repo", "/src/fw", "--git", "/opt/git"]);
        let parsed = parse_args(&argv).expect("parse version args");
        let Command::Version(resolver) = parsed.command else {
            panic!("expected version command");
        };
        assert_eq!(resolver.repo.as_deref(), Some("/src/fw"));
        assert_eq!(resolver.git.as_deref(), Some("/opt/git"));
    }

    #[test]
    fn parse_flag_defaults_symbol() {
        let parsed = parse_args(&make_args(&["fwstamp", "flag"])).expect("parse flag args");
        let Command::Flag(flag) = parsed.command else {
            panic!("expected flag command");
        };
        assert_eq!(flag.symbol, "FW_VERSION_STRING");
        assert!(flag.resolver.repo.is_none());
    }

    #[test]
    fn parse_inject_with_options() {
        let argv = make_args(&[
            "fwstamp",
            "inject",
            "--context",
            "ctx.json",
            "--build-dir",
            ".pio/build/esp32",
            "--option",
            "custom_firmware_export_dir=/srv/fw",
            "--option",
            "empty=",
            "--progname",
            "app",
            "--symbol",
            "APP_VERSION",
        ]);
        let parsed = parse_args(&argv).expect("parse inject args");
        let Command::Inject(inject) = parsed.command else {
            panic!("expected inject command");
        };
        assert_eq!(inject.context, "ctx.json");
        assert_eq!(inject.build_dir.as_deref(), Some(".pio/build/esp32"));
        assert!(inject.project_dir.is_none());
        assert_eq!(inject.prog_name.as_deref(), Some("app"));
        assert_eq!(inject.symbol, "APP_VERSION");
        assert_eq!(
            inject.options,
            vec![
                (
                    "custom_firmware_export_dir".to_string(),
                    "/srv/fw".to_string()
                ),
                ("empty".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn parse_archive_flags() {
        let argv = make_args(&[
            "fwstamp",
            "archive",
            "--context",
            "ctx.json",
            "--wait-ms",
            "500",
            "--export-dir",
            "/mnt/share",
            "--json",
            "--strict",
        ]);
        let parsed = parse_args(&argv).expect("parse archive args");
        let Command::Archive(archive) = parsed.command else {
            panic!("expected archive command");
        };
        assert_eq!(archive.wait_ms, Some(500));
        assert_eq!(archive.export_dir.as_deref(), Some("/mnt/share"));
        assert!(archive.json);
        assert!(archive.strict);
    }

    #[test]
    fn context_is_required() {
        let err = parse_args(&make_args(&["fwstamp", "archive", "--json"])).unwrap_err();
        assert!(err.contains("--context"));

        let err = parse_args(&make_args(&["fwstamp", "inject"])).unwrap_err();
        assert!(err.contains("--context"));
    }

    #[test]
    fn rejects_bad_input() {
        let cases: &[&[&str]] = &[
            &["fwstamp"],
            &["fwstamp", "build"],
            &["fwstamp", "version", "--bogus"],
            &["fwstamp", "version", "extra"],
            &["fwstamp", "flag", "--symbol"],
            &["fwstamp", "flag", "--symbol", "1BAD"],
            &["fwstamp", "flag", "--symbol", "HAS-DASH"],
            &["fwstamp", "archive", "--context", "c.json", "--wait-ms", "-5"],
            &["fwstamp", "inject", "--context", "c.json", "--option", "=x"],
            &["fwstamp", "inject", "--context", "c.json", "--progname", ""],
        ];
        for case in cases {
            assert!(parse_args(&make_args(case)).is_err(), "accepted {case:?}");
        }
    }

    #[test]
    fn option_pair_keeps_equals_in_value() {
        assert_eq!(
            parse_option_pair("k=a=b").unwrap(),
            ("k".to_string(), "a=b".to_string())
        );
        assert!(parse_option_pair("novalue").is_err());
    }
}
