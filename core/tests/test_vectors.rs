//! Verify the pure routines against JSON test vectors in `test-vectors/`.
//!
//! Each vector file describes inputs and expected outputs for one routine.
//! Keeping the cases as data makes it trivial to add regressions without
//! touching test code.

use httpfluent_core::{parse_code, MimeType, ParamMap};

fn param_map(pairs: &serde_json::Value) -> ParamMap {
    let mut map = ParamMap::new();
    for pair in pairs.as_array().unwrap() {
        let pair = pair.as_array().unwrap();
        map.insert(
            pair[0].as_str().unwrap().to_string(),
            pair[1].as_str().unwrap().to_string(),
        );
    }
    map
}

#[test]
fn url_merge_vectors() {
    let raw = include_str!("../../test-vectors/url_merge.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let base = case["base"].as_str().unwrap();
        let params = param_map(&case["params"]);

        let merged = httpfluent_core::query::merge_query(base, &params)
            .unwrap_or_else(|e| panic!("{name}: merge failed: {e}"));
        assert_eq!(merged, case["expected"].as_str().unwrap(), "{name}");
    }
}

#[test]
fn status_code_vectors() {
    let raw = include_str!("../../test-vectors/status_codes.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let code = case["code"].as_u64().unwrap() as u16;
        let (is_error, message) = parse_code(code);
        assert_eq!(is_error, case["is_error"].as_bool().unwrap(), "code {code}");
        assert_eq!(message, case["message"].as_str().unwrap(), "code {code}");
    }
}

#[test]
fn mime_resolution_vectors() {
    let raw = include_str!("../../test-vectors/mime.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let token = case["token"].as_str().unwrap();
        let resolved = MimeType::resolve(token);
        assert_eq!(
            resolved.as_str(),
            case["mime"].as_str().unwrap(),
            "token {token:?}"
        );
    }
}
