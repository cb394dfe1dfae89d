use clap::CommandFactory;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("wizpack").chain(args.iter().copied())).unwrap()
}

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_modrinth_add() {
    let cli = parse(&["add", "modrinth", "sodium", "--version-id", "abc"]);
    match cli.command {
        Some(Commands::Add {
            source: AddSource::Modrinth { query, version_id, project, .. },
        }) => {
            assert_eq!(query, "sodium");
            assert_eq!(version_id.as_deref(), Some("abc"));
            assert_eq!(project, None);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_parse_init_loader() {
    let cli = parse(&[
        "init",
        "--name",
        "Pack",
        "--author",
        "Me",
        "--mc-version",
        "1.20.1",
        "--modloader",
        "Fabric",
    ]);
    match cli.command {
        Some(Commands::Init { modloader, pack_version, .. }) => {
            assert_eq!(modloader, ModLoader::Fabric);
            assert_eq!(pack_version, "1.0.0");
        }
        other => panic!("unexpected {other:?}"),
    }

    let bad = Cli::try_parse_from([
        "wizpack", "init", "--name", "P", "--author", "A", "--mc-version", "1", "--modloader", "neoforge",
    ]);
    assert!(bad.is_err());
}

#[test]
fn test_parse_export_defaults() {
    let cli = parse(&["export", "curseforge"]);
    match cli.command {
        Some(Commands::Export {
            format,
            side,
            no_restrict_domains,
            dir,
            ..
        }) => {
            assert_eq!(format, ExportFormat::Curseforge);
            assert_eq!(side, ExportSide::Client);
            assert!(!no_restrict_domains);
            assert_eq!(dir, None);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_global_options_after_subcommand() {
    let cli = parse(&["refresh", "--workdir", "/packs/demo", "--packwiz", "/opt/packwiz"]);
    assert_eq!(cli.config.workdir, Some(std::path::PathBuf::from("/packs/demo")));
    assert_eq!(cli.config.packwiz, "/opt/packwiz");
    assert!(matches!(cli.command, Some(Commands::Refresh)));
}

#[test]
fn test_update_slug_conflicts_with_all() {
    assert!(Cli::try_parse_from(["wizpack", "update", "jei", "--all"]).is_err());
}
