/* 📖 # Why use a separate file for these error tests?

The rendered error trees are checked with expect-test snapshots, and the span trace tests check
span names recorded by this file's spans.
Keeping them apart from the error module keeps the snapshots stable while the module changes.
*/

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::{PathfsError, PathfsResult, ResultExt};
    use expect_test::expect;
    use std::error::Error;
    use std::io;
    use std::path::PathBuf;
    use tracing::{span, warn_span};
    use tracing_error::{ErrorLayer, SpanTraceStatus};
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    // 📖 # Why set up a subscriber in the test?
    // SpanTrace::capture() only records spans when the ErrorLayer is installed.
    // `try_init()` tolerates the other tests in this binary having installed it first.
    fn setup_tracing_subscriber() {
        let _ = tracing_subscriber::registry()
            .with(ErrorLayer::default())
            .try_init();
    }

    #[test]
    fn test_from_io_classifies_not_found() {
        let kind = ErrorKind::from_io(
            "missing.txt",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert!(matches!(kind, ErrorKind::NotFound { .. }));
        assert_eq!(kind.path(), Some(&PathBuf::from("missing.txt")));
    }

    #[test]
    fn test_from_io_classifies_permission_denied() {
        let kind = ErrorKind::from_io(
            "locked",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(kind, ErrorKind::PermissionDenied { .. }));
    }

    #[test]
    fn test_from_io_classifies_already_exists() {
        let kind = ErrorKind::from_io(
            "dir",
            io::Error::new(io::ErrorKind::AlreadyExists, "exists"),
        );
        assert!(matches!(kind, ErrorKind::AlreadyExists { .. }));
    }

    #[test]
    fn test_from_io_falls_back_to_io() {
        let kind = ErrorKind::from_io("disk", io::Error::other("disk on fire"));
        assert!(matches!(kind, ErrorKind::Io { .. }));
    }

    #[test]
    fn test_is_not_found() {
        let error = PathfsError::io("a", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(error.is_not_found());
        assert!(!PathfsError::message("other").is_not_found());
    }

    #[test]
    fn test_error_context_attachment() {
        let error = PathfsError::message("original error")
            .context("first context")
            .context("second context");

        assert_eq!(error.get_context(), ["first context", "second context"]);
    }

    #[test]
    fn test_error_display_with_multiple_contexts() {
        let error = PathfsError::message("root error")
            .context("first")
            .context("second")
            .context("third");
        assert_eq!(error.to_string(), "first: second: third: root error");
    }

    #[test]
    fn test_error_display_kinds() {
        let not_found = PathfsError::io("a.txt", io::Error::new(io::ErrorKind::NotFound, "x"));
        assert_eq!(not_found.to_string(), "Not found: a.txt");

        let io_error = PathfsError::io("b.txt", io::Error::other("disk on fire"));
        assert_eq!(io_error.to_string(), "I/O error at b.txt: disk on fire");
    }

    #[test]
    fn test_error_source_is_io_error() {
        let error = PathfsError::io(
            "test.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
        );
        assert_eq!(error.source().unwrap().to_string(), "access denied");
        assert_eq!(error.root_cause().to_string(), "access denied");
    }

    #[test]
    fn test_error_source_message() {
        let error = PathfsError::message("test");
        assert!(error.source().is_none());
        assert_eq!(error.root_cause().to_string(), "test");
    }

    #[test]
    fn test_root_cause_follows_cause_chain() {
        let inner = PathfsError::new(ErrorKind::from_io(
            "x",
            io::Error::new(io::ErrorKind::NotFound, "innermost"),
        ));
        let outer = PathfsError::message("outer").caused_by(inner);
        assert_eq!(outer.root_cause().to_string(), "innermost");
        assert!(outer.cause().unwrap().is_not_found());
    }

    #[test]
    fn test_result_ext_context_error() {
        let result: PathfsResult<i32> = Err(Box::new(PathfsError::message("original")));
        let err = result.context("operation failed").unwrap_err();
        assert_eq!(err.to_string(), "operation failed: original");
    }

    #[test]
    fn test_result_ext_with_context_success() {
        let result: PathfsResult<i32> = Ok(42);
        let final_result = result.with_context(|| panic!("must not be evaluated"));
        assert_eq!(final_result.unwrap(), 42);
    }

    #[test]
    fn test_err_and_bail_macros() {
        fn fails(name: &str) -> PathfsResult<()> {
            crate::bail!("cannot handle {}", name)
        }
        let err = fails("thing").unwrap_err();
        assert_eq!(err.to_string(), "cannot handle thing");

        let direct: Box<PathfsError> = crate::err!("code {}", 7);
        assert!(matches!(direct.kind(), ErrorKind::Message { .. }));
    }

    #[test]
    fn test_debug_pretty_print_format() {
        let error = PathfsError::message("something went wrong")
            .context("while copying")
            .context("in batch job");

        expect![[r#"
            something went wrong
            ├─ while copying
            └─ in batch job
        "#]]
        .assert_debug_eq(&error);
    }

    #[test]
    fn test_debug_nested_errors() {
        let error_1 = PathfsError::message("error 1").context("context 1");
        let error_2 = PathfsError::message("error 2")
            .context("context 2")
            .caused_by(error_1);
        let error_3 = PathfsError::message("error 3")
            .context("context 3")
            .caused_by(error_2);

        expect![[r#"
            error 3
            ├─ context 3
            └─ cause: error 2
               ├─ context 2
               └─ cause: error 1
                  └─ context 1
        "#]]
        .assert_debug_eq(&error_3);
    }

    #[test]
    fn test_debug_has_no_trailing_newline() {
        let error = PathfsError::message("plain");
        assert_eq!(format!("{:?}", error), "plain");

        let error = error.context("once");
        assert_eq!(format!("{:?}", error), "plain\n└─ once");
    }

    #[test]
    fn test_error_outside_span_has_no_trace_section() {
        setup_tracing_subscriber();

        let error = PathfsError::message("no span here").context("context");

        assert_ne!(error.span_trace().status(), SpanTraceStatus::CAPTURED);
        expect![[r#"
            no span here
            └─ context
        "#]]
        .assert_debug_eq(&error);
    }

    #[test]
    fn test_error_captures_span_trace() {
        setup_tracing_subscriber();

        let operation_span = span!(tracing::Level::DEBUG, "copy_batch", batch_id = 42);
        let _guard = operation_span.enter();

        let error = PathfsError::message("copy failed").context("while copying");

        assert_eq!(error.span_trace().status(), SpanTraceStatus::CAPTURED);
        let rendered = format!("{:?}", error);
        let (tree, trace) = rendered
            .split_once("\nTrace: ")
            .expect("rendered error should have a trace section");
        assert_eq!(tree, "copy failed\n└─ while copying");
        assert!(trace.contains("error_tests::tests::copy_batch"), "{trace}");
        assert!(trace.contains("with batch_id=42"), "{trace}");
    }

    #[test]
    fn test_nested_error_trace_lists_innermost_span_first() {
        setup_tracing_subscriber();

        let operation_span = span!(tracing::Level::DEBUG, "operation");
        let _guard = operation_span.enter();

        let inner_error = PathfsError::message("inner error").context("inner context");

        let outer_span = warn_span!("outer span");
        let _outer_guard = outer_span.enter();

        let outer_error = PathfsError::message("outer error")
            .context("outer context")
            .caused_by(inner_error);

        let rendered = format!("{:?}", outer_error);
        let (tree, trace) = rendered
            .split_once("\nTrace: ")
            .expect("rendered error should have a trace section");
        expect![[r#"
            outer error
            ├─ outer context
            └─ cause: inner error
               └─ inner context
        "#]]
        .assert_eq(&format!("{tree}\n"));

        let outer_at = trace.find("outer span").expect("outer span in trace");
        let operation_at = trace.find("tests::operation").expect("operation span in trace");
        assert!(outer_at < operation_at, "{trace}");
    }
}
