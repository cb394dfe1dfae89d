use crate::application::session_mocks::MockProcessProvider;

fn pack_dir() -> PathBuf {
    PathBuf::from("/test/pack")
}

fn packwiz_with(process: &MockProcessProvider) -> Packwiz {
    Packwiz::new("packwiz", Arc::new(process.clone()), pack_dir())
}

#[test]
fn test_curseforge_add_args() {
    let bare = PackwizCommand::Add(AddRequest::curseforge("jei"));
    assert_eq!(bare.args(), vec!["curseforge", "add", "jei", "-y"]);

    let full = PackwizCommand::Add(AddRequest::CurseForge {
        query: "Just Enough Items".to_string(),
        options: CurseForgeAddOptions {
            category: Some("mc-mods".to_string()),
            file_id: Some(4371666),
        },
    });
    assert_eq!(
        full.args(),
        vec![
            "curseforge",
            "add",
            "Just Enough Items",
            "--category",
            "mc-mods",
            "--file-id",
            "4371666",
            "-y"
        ]
    );
}

#[test]
fn test_modrinth_add_args_keep_flag_order() {
    let command = PackwizCommand::Add(AddRequest::Modrinth {
        query: "indium".to_string(),
        options: ModrinthAddOptions {
            project_id: Some("Orvt0mRa".to_string()),
            version_filename: Some("indium-1.0.jar".to_string()),
            version_id: Some("v1".to_string()),
        },
    });

    assert_eq!(
        command.args(),
        vec![
            "modrinth",
            "add",
            "indium",
            "--version",
            "v1",
            "--project",
            "Orvt0mRa",
            "--version-filename",
            "indium-1.0.jar",
            "-y"
        ]
    );
}

#[test]
fn test_simple_command_args() {
    let cases = [
        (
            PackwizCommand::AddUrl {
                name: "My Mod".to_string(),
                url: "https://example.com/m.jar".to_string(),
            },
            vec!["url", "add", "My Mod", "https://example.com/m.jar"],
        ),
        (
            PackwizCommand::Update {
                slug: "quark".to_string(),
            },
            vec!["update", "quark"],
        ),
        (PackwizCommand::UpdateAll, vec!["update", "-a"]),
        (
            PackwizCommand::Import {
                zip_path: "pack.zip".to_string(),
            },
            vec!["curseforge", "import", "pack.zip"],
        ),
        (PackwizCommand::Refresh, vec!["refresh"]),
        (
            PackwizCommand::Remove {
                slug: "jei".to_string(),
            },
            vec!["remove", "jei"],
        ),
        (PackwizCommand::Detect, vec!["curseforge", "detect"]),
    ];

    for (command, expected) in cases {
        assert_eq!(command.args(), expected, "{command:?}");
    }
}

#[test]
fn test_export_args() {
    let curseforge = PackwizCommand::Export {
        request: ExportRequest::curseforge(),
        output: "./Pack-1.0.zip".to_string(),
    };
    assert_eq!(
        curseforge.args(),
        vec!["curseforge", "export", "-o", "./Pack-1.0.zip", "--side", "client"]
    );

    let modrinth = PackwizCommand::Export {
        request: ExportRequest::modrinth(),
        output: "./Pack-1.0.mrpack".to_string(),
    };
    assert_eq!(modrinth.args(), vec!["modrinth", "export", "-o", "./Pack-1.0.mrpack"]);

    let unrestricted = PackwizCommand::Export {
        request: ExportRequest::Modrinth {
            target: ExportTarget::default(),
            options: ModrinthExportOptions {
                restrict_domains: false,
            },
        },
        output: "out.mrpack".to_string(),
    };
    assert_eq!(
        unrestricted.args().last().map(String::as_str),
        Some("--restrictDomains=false")
    );
}

#[test]
fn test_init_args_use_latest_loader() {
    let command = PackwizCommand::Init(InitOptions::new("My Pack", "Me", "1.20.1", ModLoader::Quilt));

    assert_eq!(
        command.args(),
        vec![
            "init",
            "--name",
            "My Pack",
            "--author",
            "Me",
            "--version",
            "1.0.0",
            "--mc-version",
            "1.20.1",
            "--modloader",
            "quilt",
            "--quilt-latest",
            "-y"
        ]
    );
}

#[test]
fn test_validation_rejects_empty_values() {
    let invalid = [
        PackwizCommand::Add(AddRequest::modrinth("  ")),
        PackwizCommand::Update {
            slug: String::new(),
        },
        PackwizCommand::AddUrl {
            name: "x".to_string(),
            url: String::new(),
        },
        PackwizCommand::Export {
            request: ExportRequest::CurseForge {
                target: ExportTarget {
                    dir: None,
                    file_name: Some(String::new()),
                },
                options: CurseForgeExportOptions::default(),
            },
            output: "x.zip".to_string(),
        },
        PackwizCommand::Init(InitOptions::new("", "Me", "1.20.1", ModLoader::Forge)),
    ];

    for command in invalid {
        assert!(
            matches!(command.validate(), Err(PackwizError::InvalidRequest { .. })),
            "{command:?}"
        );
    }
}

#[test]
fn test_run_executes_in_pack_root() {
    let process = MockProcessProvider::new();
    let mut packwiz = packwiz_with(&process);

    packwiz.run(&PackwizCommand::Refresh).unwrap();

    assert!(process.verify_call("packwiz", &["refresh"], &pack_dir()));
}

#[test]
fn test_run_uses_configured_binary() {
    let process = MockProcessProvider::new();
    let mut packwiz = Packwiz::new("/opt/bin/packwiz", Arc::new(process.clone()), pack_dir());

    packwiz.run(&PackwizCommand::Detect).unwrap();

    assert!(process.verify_call("/opt/bin/packwiz", &["curseforge", "detect"], &pack_dir()));
}

#[test]
fn test_failed_command_carries_stdout() {
    let process = MockProcessProvider::new()
        .with_packwiz_failure(&["update", "ghost"], "Can't find this file; please ensure you have run packwiz refresh");
    let mut packwiz = packwiz_with(&process);

    let err = packwiz
        .run(&PackwizCommand::Update {
            slug: "ghost".to_string(),
        })
        .unwrap_err();

    match &err {
        PackwizError::CommandFailed { command, stdout, .. } => {
            assert_eq!(command, "packwiz update ghost");
            assert!(stdout.contains("Can't find this file"));
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
    assert!(err.to_string().contains("Can't find this file"));
}

#[test]
fn test_spawn_error_is_process_failure() {
    let process = MockProcessProvider::new().with_packwiz_result(&["refresh"], Err("no such file".to_string()));
    let mut packwiz = packwiz_with(&process);

    let err = packwiz.run(&PackwizCommand::Refresh).unwrap_err();
    assert!(matches!(err, PackwizError::ProcessFailed { .. }));
}

#[test]
fn test_unavailable_binary_is_reported_before_execution() {
    let process = MockProcessProvider::new().with_packwiz_unavailable();
    let mut packwiz = packwiz_with(&process);

    let err = packwiz.run(&PackwizCommand::Refresh).unwrap_err();
    assert!(matches!(err, PackwizError::NotAvailable(_)));
    assert!(process.get_calls().is_empty());
}

#[test]
fn test_invalid_request_never_executes() {
    let process = MockProcessProvider::new();
    let mut packwiz = packwiz_with(&process);

    let result = packwiz.run(&PackwizCommand::Remove {
        slug: String::new(),
    });

    assert!(result.is_err());
    assert!(process.get_calls().is_empty());
}
