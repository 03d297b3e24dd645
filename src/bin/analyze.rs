/// Analyze a page against competitor pages from the command line.
///
/// Usage:
///   cargo run --bin analyze -- [--weights 3,2,1] [--structural] <variations> <page.html> <competitor.html>...
///
/// `<variations>` is comma-separated free text, e.g. "fleece jacka herr, fleecetröja".
/// Output (stdout): the analysis as pretty-printed JSON.
/// Errors (stderr): {"error": "...", "problems": [...]}
use std::env;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use seo_variations::{run, AnalysisRequest, Config, Document};
use serde_json::json;

fn usage() -> ExitCode {
    eprintln!(
        "Usage: analyze [--weights W1,W2,...] [--structural] <variations> <page.html> <competitor.html>..."
    );
    ExitCode::FAILURE
}

fn read_document(path: &str) -> Result<Document, String> {
    let html = fs::read(path).map_err(|e| format!("{path}: {e}"))?;
    let label = Path::new(path)
        .file_name()
        .map_or_else(|| path.to_string(), |n| n.to_string_lossy().into_owned());
    Ok(Document::new(label, html))
}

fn parse_weights(raw: &str) -> Result<Vec<f64>, String> {
    raw.split(',')
        .map(|w| {
            w.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid weight {w:?}: {e}"))
        })
        .collect()
}

fn fail(message: &str, problems: Vec<String>) -> ExitCode {
    eprintln!("{}", json!({ "error": message, "problems": problems }));
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let mut weights = None;
    let mut config = Config::default();
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--weights" => {
                let Some(raw) = args.next() else {
                    return usage();
                };
                match parse_weights(&raw) {
                    Ok(w) => weights = Some(w),
                    Err(e) => return fail("invalid weights", vec![e]),
                }
            }
            "--structural" => config = config.with_exclude_structural(true),
            "-h" | "--help" => return usage(),
            _ => positional.push(arg),
        }
    }
    if positional.len() < 2 {
        return usage();
    }

    let variations = positional.remove(0);
    let mut documents = Vec::with_capacity(positional.len());
    for path in &positional {
        match read_document(path) {
            Ok(doc) => documents.push(doc),
            Err(e) => return fail("cannot read input", vec![e]),
        }
    }

    let user = documents.remove(0);
    let mut request = AnalysisRequest::new(user).with_variations(&variations);
    for doc in documents {
        request = request.with_competitor(doc);
    }
    if let Some(w) = weights {
        request = request.with_weights(w);
    }

    match run(&request, &config) {
        Ok(analysis) => match serde_json::to_string_pretty(&analysis) {
            Ok(out) => {
                println!("{out}");
                ExitCode::SUCCESS
            }
            Err(e) => fail("cannot serialize analysis", vec![e.to_string()]),
        },
        Err(e) => fail(
            &e.to_string(),
            e.problems().iter().map(ToString::to_string).collect(),
        ),
    }
}
