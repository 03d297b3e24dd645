// Integration tests: raw HTML documents → status-annotated result rows.

use pretty_assertions::assert_eq;
use seo_variations::{
    run, AnalysisError, AnalysisRequest, Config, Document, InputProblem, RangePolicy, Status,
    TagCategory, Unreadable,
};

/// Page with `words` filler words plus the given headings and paragraphs.
fn page(words: usize, h2: &[&str], p: &[&str]) -> Vec<u8> {
    let mut html = String::from("<html><head><title>t</title></head><body>");
    for h in h2 {
        html.push_str(&format!("<h2>{h}</h2>"));
    }
    for para in p {
        html.push_str(&format!("<p>{para}</p>"));
    }
    let used: usize = 1 + h2
        .iter()
        .chain(p)
        .map(|t| t.split_whitespace().count())
        .sum::<usize>();
    let filler = vec!["lorem"; words.saturating_sub(used)].join(" ");
    html.push_str(&format!("<div>{filler}</div></body></html>"));
    html.into_bytes()
}

fn row(analysis: &seo_variations::Analysis, category: TagCategory) -> (u32, u32, u32, Status) {
    let r = analysis
        .results
        .iter()
        .find(|r| r.category == category)
        .unwrap();
    (r.current_count, r.recommended_min, r.recommended_max, r.status)
}

#[test]
fn test_end_to_end_scenario() {
    // user: 1000 words, 3 H2 matches; competitors: 2000 words, 4/6/5 H2 matches
    let user = page(1000, &["herr", "herr", "herr"], &[]);
    let competitor = |n: usize| page(2000, &vec!["herr"; n], &[]);
    let request = AnalysisRequest::new(Document::new("https://example.com/mine", user))
        .with_competitor(Document::new("a", competitor(4)))
        .with_competitor(Document::new("b", competitor(6)))
        .with_competitor(Document::new("c", competitor(5)))
        .with_variations("herr")
        .with_weights(vec![1.0, 1.0, 1.0]);

    let analysis = run(&request, &Config::default()).unwrap();

    assert_eq!(analysis.trace.user.word_count, 1000);
    assert!((analysis.trace.scale - 0.5).abs() < 1e-12);
    assert_eq!(row(&analysis, TagCategory::H2), (3, 2, 3, Status::Ok));
    assert!(analysis.warnings.is_empty());
}

#[test]
fn test_results_follow_fixed_order() {
    let request = AnalysisRequest::new(Document::new("mine", page(100, &["herr"], &["herr"])))
        .with_competitor(Document::new("a", page(100, &["herr"], &["herr"])))
        .with_variations("herr");
    let analysis = run(&request, &Config::default()).unwrap();
    let categories: Vec<_> = analysis.results.iter().map(|r| r.category).collect();
    assert_eq!(categories, TagCategory::ALL.to_vec());
}

#[test]
fn test_categories_without_competitor_signal_collapse() {
    let request = AnalysisRequest::new(Document::new("mine", page(100, &[], &[])))
        .with_competitor(Document::new("a", page(100, &["herr"], &[])))
        .with_variations("herr");
    let analysis = run(&request, &Config::default()).unwrap();
    assert_eq!(row(&analysis, TagCategory::H4), (0, 0, 0, Status::Ok));
    assert_eq!(row(&analysis, TagCategory::H2), (0, 1, 1, Status::TooFew));
}

#[test]
fn test_too_many() {
    let request = AnalysisRequest::new(Document::new(
        "mine",
        page(100, &["herr", "herr", "herr", "herr"], &[]),
    ))
    .with_competitor(Document::new("a", page(100, &["herr"], &[])))
    .with_competitor(Document::new("b", page(100, &["herr"], &[])))
    .with_variations("herr");
    let analysis = run(&request, &Config::default()).unwrap();
    assert_eq!(row(&analysis, TagCategory::H2), (4, 1, 1, Status::TooMany));
}

#[test]
fn test_zero_competitors_is_insufficient_input() {
    let request = AnalysisRequest::new(Document::new("mine", page(100, &["herr"], &[])))
        .with_variations("herr");
    let err = run(&request, &Config::default()).unwrap_err();
    assert_eq!(err.problems(), &[InputProblem::NoCompetitors]);
}

#[test]
fn test_every_missing_input_is_listed() {
    let request = AnalysisRequest::default().with_variations(" , ");
    let err = run(&request, &Config::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::InsufficientInput(_)));
    assert_eq!(
        err.problems(),
        &[
            InputProblem::MissingUserPage,
            InputProblem::NoCompetitors,
            InputProblem::NoVariations,
        ]
    );
}

#[test]
fn test_unreadable_competitor_is_excluded_and_reported() {
    let request = AnalysisRequest::new(Document::new("mine", page(100, &["herr"], &[])))
        .with_competitor(Document::new("broken", Vec::new()))
        .with_competitor(Document::new("good", page(100, &["herr", "herr"], &[])))
        .with_variations("herr");
    let analysis = run(&request, &Config::default()).unwrap();

    assert_eq!(analysis.warnings.len(), 1);
    assert_eq!(analysis.warnings[0].index, 0);
    assert_eq!(analysis.warnings[0].label, "broken");
    assert_eq!(analysis.warnings[0].reason, Unreadable::Empty);

    assert_eq!(analysis.trace.competitors.len(), 1);
    assert_eq!(analysis.trace.competitors[0].label, "good");
    // default rank weights: [2, 1]; the excluded competitor takes its weight along
    assert_eq!(analysis.trace.competitors[0].weight, 1.0);
    assert_eq!(row(&analysis, TagCategory::H2), (1, 2, 2, Status::TooFew));
}

#[test]
fn test_stray_nul_bytes_do_not_exclude_documents() {
    let user = b"<h2>herr</h2>\0<p>herr jacka</p>".to_vec();
    let competitor = b"<h2>herr</h2><p>h\0err</p>".to_vec();
    let request = AnalysisRequest::new(Document::new("mine", user))
        .with_competitor(Document::new("a", competitor))
        .with_variations("herr");
    let analysis = run(&request, &Config::default()).unwrap();
    assert!(analysis.warnings.is_empty());
    assert_eq!(analysis.trace.competitors.len(), 1);
    assert_eq!(analysis.trace.user.count(TagCategory::H2), 1);
    assert_eq!(analysis.trace.user.count(TagCategory::BodyText), 1);
}

#[test]
fn test_no_readable_competitor_and_unreadable_user() {
    let request = AnalysisRequest::new(Document::new("mine", b"   ".to_vec()))
        .with_competitor(Document::new("a", Vec::new()))
        .with_variations("herr");
    let err = run(&request, &Config::default()).unwrap_err();
    assert_eq!(
        err.problems(),
        &[
            InputProblem::UnreadableUserPage {
                label: "mine".to_string(),
                reason: "document is empty".to_string(),
            },
            InputProblem::NoReadableCompetitors,
        ]
    );
}

#[test]
fn test_weight_problems() {
    let request = AnalysisRequest::new(Document::new("mine", page(10, &[], &[])))
        .with_competitor(Document::new("a", page(10, &[], &[])))
        .with_variations("herr")
        .with_weights(vec![0.0, 1.0]);
    let err = run(&request, &Config::default()).unwrap_err();
    assert_eq!(
        err.problems(),
        &[
            InputProblem::WeightCountMismatch {
                expected: 1,
                actual: 2
            },
            InputProblem::InvalidWeight {
                index: 0,
                value: 0.0
            },
        ]
    );
}

#[test]
fn test_malformed_html_is_recovered() {
    let broken = b"<h2>herr<p>fleece jacka herr<li>herr</span></div><h3>herr".to_vec();
    let request = AnalysisRequest::new(Document::new("mine", broken))
        .with_competitor(Document::new("a", page(100, &["herr"], &["herr"])))
        .with_variations("fleece jacka herr");
    let analysis = run(&request, &Config::default()).unwrap();
    assert!(analysis.warnings.is_empty());
    assert!(analysis.trace.user.word_count > 0);
}

#[test]
fn test_trace_records_raw_competitor_counts() {
    let request = AnalysisRequest::new(Document::new("mine", page(50, &[], &[])))
        .with_competitor(Document::new("a", page(50, &["herr", "herr"], &["herr"])))
        .with_competitor(Document::new("b", page(50, &["herr"], &[])))
        .with_variations("Herr, Fleece Jacka");
    let analysis = run(&request, &Config::default()).unwrap();
    let trace = &analysis.trace;
    assert_eq!(trace.variants, vec!["fleece jacka", "fleece", "jacka", "herr"]);
    assert_eq!(trace.competitor_counts[&TagCategory::H2], vec![2, 1]);
    assert_eq!(trace.competitor_counts[&TagCategory::BodyText], vec![1, 0]);
    assert_eq!(trace.policy, RangePolicy::WeightedMeanStd);
}

#[test]
fn test_percentile_policy_runs_end_to_end() {
    let mut request = AnalysisRequest::new(Document::new("mine", page(100, &["herr"], &[])))
        .with_variations("herr");
    for n in [1usize, 2, 3, 4, 9] {
        request = request.with_competitor(Document::new(
            format!("c{n}"),
            page(100, &vec!["herr"; n], &[]),
        ));
    }
    let request = request.with_weights(vec![1.0; 5]);
    let config = Config::default().with_policy(RangePolicy::trimmed_percentile(10.0, 90.0));
    let analysis = run(&request, &config).unwrap();
    // H2 drops the 9: [1, 2, 3, 4] -> p10 = 1.3, p90 = 3.7
    assert_eq!(row(&analysis, TagCategory::H2), (1, 1, 4, Status::Ok));
}

#[test]
fn test_analysis_serializes_to_json() {
    let request = AnalysisRequest::new(Document::new("mine", page(20, &["herr"], &[])))
        .with_competitor(Document::new("a", page(20, &["herr"], &[])))
        .with_variations("herr");
    let analysis = run(&request, &Config::default()).unwrap();
    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["results"][0]["category"], "H2");
    assert_eq!(json["results"][0]["status"], "OK");
}

#[test]
fn test_idempotent() {
    let user = page(300, &["herr"], &["fleece herr"]);
    let request = AnalysisRequest::new(Document::new("mine", user))
        .with_competitor(Document::new("a", page(250, &["herr", "fleece"], &["herr"])))
        .with_competitor(Document::new("b", page(400, &[], &["fleece jacka herr"])))
        .with_variations("fleece jacka herr");
    let a = run(&request, &Config::default()).unwrap();
    let b = run(&request, &Config::default()).unwrap();
    assert_eq!(a, b);
}
