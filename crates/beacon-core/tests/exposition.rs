//! Text exposition contract of the registry.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use beacon_core::error::BeaconError;
use beacon_core::metrics::{MetricRegistry, CONTENT_TYPE};

fn request_count(reg: &mut MetricRegistry) -> beacon_core::Counter {
    reg.register_counter(
        "app_request_count",
        "Application Request Count",
        &["method", "endpoint", "http_status"],
    )
    .unwrap()
}

#[test]
fn empty_labeled_counter_renders_only_header() {
    let mut reg = MetricRegistry::new();
    request_count(&mut reg);

    assert_eq!(
        reg.render(),
        "# HELP app_request_count Application Request Count\n\
         # TYPE app_request_count counter\n"
    );
}

#[test]
fn counter_series_stay_separate() {
    let mut reg = MetricRegistry::new();
    let c = request_count(&mut reg);

    for _ in 0..3 {
        c.inc(&["GET", "/", "200"]).unwrap();
    }
    c.inc(&["GET", "/health", "200"]).unwrap();

    let text = reg.render();
    assert!(text.contains(
        "app_request_count{method=\"GET\",endpoint=\"/\",http_status=\"200\"} 3\n"
    ));
    assert!(text.contains(
        "app_request_count{method=\"GET\",endpoint=\"/health\",http_status=\"200\"} 1\n"
    ));
    assert_eq!(c.get(&["GET", "/", "200"]).unwrap(), 3);
    assert_eq!(c.get(&["GET", "/health", "200"]).unwrap(), 1);
    assert_eq!(c.get(&["POST", "/", "200"]).unwrap(), 0);
}

#[test]
fn named_labels_hit_the_positional_series() {
    let mut reg = MetricRegistry::new();
    let c = request_count(&mut reg);

    c.inc(&["GET", "/", "200"]).unwrap();
    c.inc_labels(&[("http_status", "200"), ("endpoint", "/"), ("method", "GET")])
        .unwrap();

    assert_eq!(c.get(&["GET", "/", "200"]).unwrap(), 2);
    assert_eq!(c.series_count(), 1);
}

#[test]
fn label_mismatch_does_not_record() {
    let mut reg = MetricRegistry::new();
    let c = request_count(&mut reg);

    let err = c.inc(&["GET", "/"]).unwrap_err();
    assert!(matches!(err, BeaconError::LabelMismatch { .. }));

    let err = c
        .inc_labels(&[("method", "GET"), ("path", "/"), ("http_status", "200")])
        .unwrap_err();
    assert!(matches!(err, BeaconError::LabelMismatch { .. }));

    assert_eq!(c.series_count(), 0);
}

#[test]
fn negative_delta_is_rejected() {
    let mut reg = MetricRegistry::new();
    let c = request_count(&mut reg);

    c.inc_by(&["GET", "/", "200"], 5).unwrap();
    assert_eq!(
        c.inc_by(&["GET", "/", "200"], -1),
        Err(BeaconError::InvalidDelta(-1))
    );
    c.inc_by(&["GET", "/", "200"], 0).unwrap();
    assert_eq!(c.get(&["GET", "/", "200"]).unwrap(), 5);
}

#[test]
fn counter_overflow_is_rejected_not_wrapped() {
    let mut reg = MetricRegistry::new();
    let c = request_count(&mut reg);
    let labels = ["GET", "/", "200"];

    c.inc_by(&labels, i64::MAX).unwrap();
    c.inc_by(&labels, i64::MAX).unwrap();
    let before = c.get(&labels).unwrap();
    assert_eq!(before, u64::MAX - 1);

    assert_eq!(
        c.inc_by(&labels, i64::MAX),
        Err(BeaconError::CounterOverflow("app_request_count".into()))
    );
    assert_eq!(
        c.inc_by(&labels, 2),
        Err(BeaconError::CounterOverflow("app_request_count".into()))
    );
    c.inc(&labels).unwrap();
    assert_eq!(c.get(&labels).unwrap(), u64::MAX);
    assert!(c.inc(&labels).is_err());
    assert!(c.inc_labels(&[("method", "GET"), ("endpoint", "/"), ("http_status", "200")]).is_err());
    assert_eq!(c.get(&labels).unwrap(), u64::MAX);
    assert!(reg.render().contains(&format!(
        "app_request_count{{method=\"GET\",endpoint=\"/\",http_status=\"200\"}} {}\n",
        u64::MAX
    )));
}

#[test]
fn histogram_scenario() {
    let mut reg = MetricRegistry::new();
    let h = reg
        .register_histogram("latency", "Request latency", &[], &[0.1, 0.5, 1.0])
        .unwrap();

    for v in [0.05, 0.3, 0.3, 2.0] {
        h.observe(&[], v).unwrap();
    }

    let s = h.snapshot(&[]).unwrap().unwrap();
    assert_eq!(s.bucket(0.1), Some(1));
    assert_eq!(s.bucket(0.5), Some(3));
    assert_eq!(s.bucket(1.0), Some(3));
    assert_eq!(s.bucket(f64::INFINITY), Some(4));
    assert_eq!(s.count, 4);
    assert!((s.sum - 2.65).abs() < 1e-9);

    let text = reg.render();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "# HELP latency Request latency");
    assert_eq!(lines[1], "# TYPE latency histogram");
    assert_eq!(lines[2], "latency_bucket{le=\"0.1\"} 1");
    assert_eq!(lines[3], "latency_bucket{le=\"0.5\"} 3");
    assert_eq!(lines[4], "latency_bucket{le=\"1.0\"} 3");
    assert_eq!(lines[5], "latency_bucket{le=\"+Inf\"} 4");
    assert_eq!(lines[6], "latency_sum 2.65");
    assert_eq!(lines[7], "latency_count 4");
    assert_eq!(lines.len(), 8);
}

#[test]
fn labeled_histogram_puts_le_last() {
    let mut reg = MetricRegistry::new();
    let h = reg
        .register_histogram(
            "app_request_latency_seconds",
            "Application Request Latency",
            &["method", "endpoint"],
            &[0.5],
        )
        .unwrap();
    h.observe_labels(&[("endpoint", "/"), ("method", "GET")], 0.25)
        .unwrap();

    let text = reg.render();
    assert!(text.contains(
        "app_request_latency_seconds_bucket{method=\"GET\",endpoint=\"/\",le=\"0.5\"} 1\n"
    ));
    assert!(text.contains(
        "app_request_latency_seconds_bucket{method=\"GET\",endpoint=\"/\",le=\"+Inf\"} 1\n"
    ));
    assert!(text.contains("app_request_latency_seconds_sum{method=\"GET\",endpoint=\"/\"} 0.25\n"));
    assert!(text.contains("app_request_latency_seconds_count{method=\"GET\",endpoint=\"/\"} 1\n"));
}

#[test]
fn bucket_counts_match_observations() {
    let mut reg = MetricRegistry::new();
    let bounds = [0.01, 0.1, 1.0, 10.0];
    let h = reg.register_histogram("sizes", "sizes", &["kind"], &bounds).unwrap();

    let values: Vec<f64> = (0..200).map(|i| (i as f64) * 0.073).collect();
    for v in &values {
        h.observe(&["a"], *v).unwrap();
    }

    let s = h.snapshot(&["a"]).unwrap().unwrap();
    for (i, b) in bounds.iter().enumerate() {
        let expected = values.iter().filter(|v| **v <= *b).count() as u64;
        assert_eq!(s.buckets[i], expected, "bucket le={b}");
    }
    assert!(s.buckets.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(s.bucket(f64::INFINITY), Some(values.len() as u64));
    let sum: f64 = values.iter().sum();
    assert!((s.sum - sum).abs() < 1e-6);
}

#[test]
fn invalid_observation_is_rejected() {
    let mut reg = MetricRegistry::new();
    let h = reg.register_histogram("h", "h", &[], &[1.0]).unwrap();
    assert!(matches!(
        h.observe(&[], -0.5),
        Err(BeaconError::InvalidObservation(_))
    ));
    assert_eq!(h.snapshot(&[]).unwrap().unwrap().count, 0);
}

#[test]
fn unlabeled_metrics_render_zero_sample_up_front() {
    let mut reg = MetricRegistry::new();
    reg.register_counter("jobs_total", "Jobs", &[]).unwrap();
    reg.register_histogram("wait", "Wait", &[], &[1.0]).unwrap();

    assert_eq!(
        reg.render(),
        "# HELP jobs_total Jobs\n\
         # TYPE jobs_total counter\n\
         jobs_total 0\n\
         # HELP wait Wait\n\
         # TYPE wait histogram\n\
         wait_bucket{le=\"1.0\"} 0\n\
         wait_bucket{le=\"+Inf\"} 0\n\
         wait_sum 0.0\n\
         wait_count 0\n"
    );
}

#[test]
fn label_values_and_help_are_escaped() {
    let mut reg = MetricRegistry::new();
    let c = reg
        .register_counter("odd", "Help with \\ and\nnewline", &["v"])
        .unwrap();
    c.inc(&["a\"b\\c\nd"]).unwrap();

    let text = reg.render();
    assert!(text.contains("# HELP odd Help with \\\\ and\\nnewline\n"));
    assert!(text.contains("odd{v=\"a\\\"b\\\\c\\nd\"} 1\n"));
}

#[test]
fn render_is_deterministic() {
    let mut reg = MetricRegistry::new();
    let c = request_count(&mut reg);
    let h = reg
        .register_histogram("latency", "Latency", &["endpoint"], &[0.1, 1.0])
        .unwrap();

    for ep in ["/z", "/a", "/m", "/health", "/"] {
        c.inc(&["GET", ep, "200"]).unwrap();
        h.observe(&[ep], 0.2).unwrap();
    }

    let first = reg.render();
    assert_eq!(first, reg.render());

    // series are sorted by label values
    let a = first.find("endpoint=\"/a\",http_status").unwrap();
    let z = first.find("endpoint=\"/z\",http_status").unwrap();
    assert!(a < z);
    // metrics keep registration order
    assert!(first.find("# TYPE app_request_count").unwrap() < first.find("# TYPE latency").unwrap());
}

#[test]
fn duplicate_registration_is_an_error() {
    let mut reg = MetricRegistry::new();
    request_count(&mut reg);

    let err = reg
        .register_counter(
            "app_request_count",
            "Application Request Count",
            &["method", "endpoint", "http_status"],
        )
        .err()
        .unwrap();
    assert!(matches!(err, BeaconError::DuplicateMetric(_)));

    let err = reg
        .register_histogram("app_request_count", "other kind", &[], &[1.0])
        .err()
        .unwrap();
    assert!(matches!(err, BeaconError::DuplicateMetric(_)));
    assert_eq!(reg.len(), 1);
}

#[test]
fn histogram_sample_names_are_reserved() {
    let mut reg = MetricRegistry::new();
    reg.register_histogram("rpc", "rpc", &[], &[1.0]).unwrap();
    for clash in ["rpc_bucket", "rpc_sum", "rpc_count"] {
        assert!(matches!(
            reg.register_counter(clash, "c", &[]),
            Err(BeaconError::DuplicateMetric(_))
        ));
    }
    reg.register_counter("rpc_errors", "c", &[]).unwrap();
    assert_eq!(reg.names(), vec!["rpc", "rpc_errors"]);
}

#[test]
fn invalid_definitions_are_rejected() {
    let mut reg = MetricRegistry::new();
    assert!(matches!(
        reg.register_counter("bad-name", "c", &[]),
        Err(BeaconError::InvalidName(_))
    ));
    assert!(matches!(
        reg.register_counter("c", "c", &["__reserved"]),
        Err(BeaconError::InvalidName(_))
    ));
    assert!(matches!(
        reg.register_histogram("h", "h", &["le"], &[1.0]),
        Err(BeaconError::InvalidName(_))
    ));
    assert!(matches!(
        reg.register_histogram("h", "h", &[], &[]),
        Err(BeaconError::InvalidBuckets(_))
    ));
    assert!(matches!(
        reg.register_histogram("h", "h", &[], &[1.0, 0.5]),
        Err(BeaconError::InvalidBuckets(_))
    ));
    assert!(reg.is_empty());
}

#[test]
fn content_type_is_text_exposition() {
    assert!(CONTENT_TYPE.starts_with("text/plain; version=0.0.4"));
}
