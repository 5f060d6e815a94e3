use orgmig_core::errors::{ExError, ExErrorKind, MigrateError};

#[test]
fn test_missing_key_column_verifiable_by_kind() {
    let err = MigrateError::MissingKeyColumn {
        snapshot: "after-target-wave-2.csv".to_string(),
        column: "name".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::MalformedSnapshot);
    assert_eq!(ex_err.code(), "ERR_MALFORMED_SNAPSHOT");
    assert_eq!(ex_err.path(), Some("after-target-wave-2.csv"));
    assert_eq!(ex_err.column(), Some("name"));
}

#[test]
fn test_not_tabular_is_malformed() {
    let err = MigrateError::NotTabular {
        snapshot: "s.csv".to_string(),
        reason: "line 3 has 5 fields, header has 4".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::MalformedSnapshot);
    assert!(ex_err.message().contains("line 3"));
}

#[test]
fn test_log_errors_are_invalid_log() {
    let errs = vec![
        MigrateError::MissingLogMarker {
            log: "widgets".to_string(),
            marker: "Migration started".to_string(),
        },
        MigrateError::DuplicateLogMarker {
            log: "widgets".to_string(),
            marker: "Migration started".to_string(),
            count: 2,
        },
        MigrateError::InvalidLogTimestamp {
            log: "widgets".to_string(),
            value: "[yesterday]".to_string(),
        },
    ];

    for err in errs {
        let ex_err: ExError = err.into();
        assert_eq!(ex_err.kind(), ExErrorKind::InvalidLog);
        assert_eq!(ex_err.path(), Some("widgets"));
    }
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::MalformedSnapshot, "ERR_MALFORMED_SNAPSHOT"),
        (ExErrorKind::InvalidLog, "ERR_INVALID_LOG"),
        (ExErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_context_builders_compose() {
    let err = ExError::new(ExErrorKind::InvalidInput)
        .with_op("report")
        .with_repo("acme/widgets")
        .with_column("visibility")
        .with_message("wave and explicit paths are mutually exclusive");

    assert_eq!(err.op(), Some("report"));
    assert_eq!(err.repo(), Some("acme/widgets"));
    let rendered = err.to_string();
    assert!(rendered.starts_with("[ERR_INVALID_INPUT] in operation 'report'"));
    assert!(rendered.contains("(repo: acme/widgets)"));
    assert!(rendered.contains("(column: visibility)"));
}

#[test]
fn test_csv_parse_error_is_malformed() {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader("a,b\n1,2,3\n".as_bytes());
    let err = reader.records().next().unwrap().unwrap_err();

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::MalformedSnapshot);
}

#[test]
fn test_json_error_is_serialization() {
    let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::Serialization);
}
