use super::*;

#[test]
fn test_filter_directives_scope_wizpack_crates() {
    let directives = Logger::filter_directives(LogLevel::Debug);
    assert!(directives.starts_with("wizpack_lib=debug,wizpack=debug"));
    assert!(directives.contains("tokio=warn"));
    assert!(directives.ends_with(",debug"));
}

#[test]
fn test_filter_directives_parse() {
    for level in [LogLevel::Error, LogLevel::Info, LogLevel::Trace] {
        let directives = Logger::filter_directives(level);
        assert!(EnvFilter::try_new(&directives).is_ok(), "{directives}");
    }
}

#[test]
fn test_logger_global_consistent_with_flag() {
    assert_eq!(Logger::is_initialized(), Logger::global().is_some());
}
