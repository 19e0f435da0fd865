//! Text rendering of clusters for issue trackers and result dashboards.
//!
//! Pure formatting only; submitting anything is the caller's job.

use sha2::{Digest, Sha256};

use crate::config::RunContext;
use crate::parsers::sanitize::unescape_markup;
use crate::types::{ErrorCluster, UNDEFINED};

fn defined(value: &str) -> Option<&str> {
    (value != UNDEFINED).then_some(value)
}

/// Short test item title: `"<name> <method> <code>"`, or just the name when
/// method or response code is unknown.
pub fn item_name(cluster: &ErrorCluster) -> String {
    match (
        defined(&cluster.request_method),
        defined(&cluster.response_code),
    ) {
        (Some(method), Some(code)) => format!("{} {method} {code}", cluster.request_name),
        _ => cluster.request_name.clone(),
    }
}

/// Stable identifier used to match a cluster to previously filed issues.
pub fn unique_error_id(cluster: &ErrorCluster) -> String {
    let mut id = match defined(&cluster.request_method) {
        Some(method) => format!("{method}_{}", cluster.request_name),
        None => cluster.request_name.clone(),
    };
    if let Some(code) = defined(&cluster.response_code).or(defined(&cluster.error_code)) {
        id.push('_');
        id.push_str(code);
    }
    id
}

/// Multi-line issue description with markup escaping undone.
pub fn description(cluster: &ErrorCluster, run: &RunContext) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: &str| {
        out.push_str(label);
        out.push_str(": ");
        out.push_str(&unescape_markup(value));
        out.push('\n');
    };

    if let Some(simulation) = run.simulation.as_deref() {
        line("Simulation", simulation);
    }
    if let Some(url) = run.url.as_deref() {
        line("Target environment", url);
    }
    if !cluster.request_url.is_empty() {
        line("Request URL", &cluster.request_url);
    }
    if !cluster.request_params.is_empty() {
        line("Request params", &cluster.request_params.join(", "));
    }
    if !cluster.gatling_errors.is_empty() {
        line("Gatling error", &cluster.gatling_errors.join(", "));
    }
    line("Error count", &cluster.error_count.to_string());
    line("Response code", &cluster.response_code);

    out
}

/// Stable SHA-256 label for tracker get-or-create, as lowercase hex.
///
/// Hashes `"<simulation>_<url>_<gatling errors>_<request name>"`, with the
/// gatling errors rendered as a quoted list (`['a', 'b']`). Missing run
/// fields hash as empty strings.
pub fn issue_hash(cluster: &ErrorCluster, run: &RunContext) -> String {
    let source = format!(
        "{}_{}_{}_{}",
        run.simulation.as_deref().unwrap_or_default(),
        run.url.as_deref().unwrap_or_default(),
        quoted_list(&cluster.gatling_errors),
        cluster.request_name,
    );
    let mut hasher = Sha256::new();
    hasher.update(source.trim().as_bytes());
    hex::encode(hasher.finalize())
}

// Stored samples are markup-escaped, so they never hold `"` or `\`.
fn quoted_list(items: &[String]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|item| {
            if item.contains('\'') {
                format!("\"{item}\"")
            } else {
                format!("'{item}'")
            }
        })
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// One `"<label> <n>: <sample>;;"` line per sample, decoded for display.
///
/// A single sample is rendered as `"<label>: <sample>"`; absent, undefined or
/// empty single samples are left out. Absent samples are never numbered.
pub fn numbered_samples<'a, I>(label: &str, samples: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let present: Vec<&str> = samples.into_iter().flatten().collect();
    match present.as_slice() {
        [] => None,
        [only] if only.is_empty() || *only == UNDEFINED => None,
        [only] => Some(format!("{label}: {}", unescape_markup(only))),
        many => Some(
            many.iter()
                .enumerate()
                .map(|(i, s)| format!("{label} {}: {};;\n", i + 1, unescape_markup(s)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster() -> ErrorCluster {
        ErrorCluster {
            key: "checkout_-32000_504".into(),
            request_name: "checkout".into(),
            request_method: "POST".into(),
            request_url: "https:&#47;&#47;shop.test&#47;api&#47;checkout".into(),
            headers: UNDEFINED.into(),
            environment: "staging".into(),
            response_code: "504".into(),
            error_code: "-32000".into(),
            error_count: 3,
            response_bodies: vec![None],
            request_params: vec!["SessionId=_...cart=77".into()],
            gatling_errors: vec!["status.find.in(200,304), but actually found 504".into()],
            first_seen: None,
            last_seen: None,
        }
    }

    #[test]
    fn item_name_with_method_and_code() {
        assert_eq!(item_name(&cluster()), "checkout POST 504");
    }

    #[test]
    fn item_name_falls_back_to_request_name() {
        let mut c = cluster();
        c.response_code = UNDEFINED.into();
        assert_eq!(item_name(&c), "checkout");
    }

    #[test]
    fn unique_id_prefers_response_code() {
        assert_eq!(unique_error_id(&cluster()), "POST_checkout_504");
    }

    #[test]
    fn unique_id_uses_error_code_when_no_response_code() {
        let mut c = cluster();
        c.response_code = UNDEFINED.into();
        c.request_method = UNDEFINED.into();
        assert_eq!(unique_error_id(&c), "checkout_-32000");
        c.error_code = UNDEFINED.into();
        assert_eq!(unique_error_id(&c), "checkout");
    }

    #[test]
    fn description_decodes_markup() {
        let run = RunContext {
            simulation: Some("CheckoutSimulation".into()),
            url: Some("https://shop.test".into()),
            ..Default::default()
        };
        let text = description(&cluster(), &run);
        assert!(text.starts_with("Simulation: CheckoutSimulation\n"));
        assert!(text.contains("Target environment: https://shop.test\n"));
        assert!(text.contains("Request URL: https://shop.test/api/checkout\n"));
        assert!(text.contains("Request params: SessionId=_...cart=77\n"));
        assert!(text.contains("Error count: 3\n"));
        assert!(text.ends_with("Response code: 504\n"));
    }

    #[test]
    fn description_skips_missing_run_fields() {
        let text = description(&cluster(), &RunContext::default());
        assert!(!text.contains("Simulation:"));
        assert!(text.starts_with("Request URL:"));
    }

    #[test]
    fn numbered_samples_variants() {
        let none: [Option<&str>; 0] = [];
        assert!(numbered_samples("Response", none).is_none());
        assert!(numbered_samples("Response", [Some(UNDEFINED)]).is_none());
        assert!(numbered_samples("Response", [None]).is_none());
        assert_eq!(
            numbered_samples("Response", [Some("a &lt;b&gt;")]).as_deref(),
            Some("Response: a <b>")
        );
        assert_eq!(
            numbered_samples("Response", [Some("x"), None, Some("y")]).as_deref(),
            Some("Response 1: x;;\nResponse 2: y;;\n")
        );
    }

    #[test]
    fn numbered_samples_from_cluster_bodies() {
        let mut c = cluster();
        c.response_bodies = vec![Some("{&quot;ok&quot;: false}".into())];
        let text = numbered_samples("Response", c.response_bodies.iter().map(Option::as_deref));
        assert_eq!(text.as_deref(), Some(r#"Response: {"ok": false}"#));
    }

    #[test]
    fn issue_hash_matches_known_digest() {
        let run = RunContext {
            simulation: Some("CheckoutSimulation".into()),
            url: Some("https://shop.test".into()),
            ..Default::default()
        };
        assert_eq!(
            issue_hash(&cluster(), &run),
            "186029c83f15b5e0c5363f5bb62c51a59fbcbc777c1726c9ba9a85825f7422ec"
        );
    }

    #[test]
    fn issue_hash_without_run_fields() {
        let mut c = cluster();
        c.request_name = "login".into();
        c.gatling_errors = vec!["g".into()];
        assert_eq!(
            issue_hash(&c, &RunContext::default()),
            "01ea6d57ee8838d7f5996fa4ffd36f1df203c7f472fa86dbc258edc8b5e80086"
        );
    }

    #[test]
    fn issue_hash_depends_on_gatling_errors() {
        let run = RunContext::default();
        let mut other = cluster();
        other.gatling_errors.push("connection reset".into());
        assert_ne!(issue_hash(&cluster(), &run), issue_hash(&other, &run));
    }

    #[test]
    fn quoted_list_switches_quotes() {
        assert_eq!(quoted_list(&["can't".into(), "ok".into()]), r#"["can't", 'ok']"#);
        assert_eq!(quoted_list(&[]), "[]");
    }
}
