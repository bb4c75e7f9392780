//! Static record corpora used across harnesses.
//!
//! Each corpus is a `&'static [&'static str]` of NDJSON records as the
//! export sink delivers them.

/// Request logs in both wire shapes, with nested app lines.
pub const CORPUS_REQUEST: &[&str] = &[
    r#"{"logName":"projects/khan/logs/appengine.googleapis.com%2Frequest_log","timestamp":"2020-01-02T03:04:06Z","protoPayload":{"ip":"10.1.2.3","nickname":"sal","startTime":"2020-01-02T03:04:05.123456Z","endTime":"2020-01-02T03:04:05.405093Z","method":"GET","resource":"/math","httpVersion":"HTTP/1.1","status":200,"responseSize":5120,"userAgent":"Mozilla/5.0","host":"www.khanacademy.org","latency":"0.282637s","megaCycles":42,"cost":0.0001,"instanceId":"00c61b117c","moduleId":"default","versionId":"v123","requestId":"5e0d5c9d","wasLoadingRequest":false,"line":[{"time":"2020-01-02T03:04:05.200000Z","severity":"INFO","logMessage":"KALOG;stats.rpc.foo:3;session_id:abc;pageload"},{"time":"2020-01-02T03:04:05.300000Z","severity":"WARNING","logMessage":"BINGO_PARTICIPATION_EVENT:{\"bingo_id\":\"x\",\"experiment\":\"e\",\"alternative\":\"a\"}","sourceLocation":{"file":"main.py","line":"12"}}]}}"#,
    r#"{"log":"appengine.googleapis.com/request_log","metadata":{"severity":"INFO","timestamp":"2020-01-02T03:04:06Z"},"protoPayload":{"ip":"10.9.9.9","status":404,"latency":"0.010000s","line":[]}}"#,
    r#"{"logName":"projects/khan/logs/appengine.googleapis.com%2Frequest_log","labels":{"appengine.googleapis.com/module_id":"batch"},"protoPayload":{"status":500,"moduleId":"batch"}}"#,
];

/// App logs in both wire shapes.
pub const CORPUS_APP: &[&str] = &[
    r#"{"logName":"projects/khan/logs/app","labels":{"appengine.googleapis.com/thread_id":"t-1","appengine.googleapis.com/module_id":"default","appengine.googleapis.com/version_id":"v123"},"severity":"WARNING","timestamp":"2020-01-02T03:04:05.123456Z","textPayload":"REQUEST_ID: abc123"}"#,
    r#"{"logName":"projects/khan/logs/app","labels":{"appengine.googleapis.com/thread_id":"t-2"},"resource":{"labels":{"module_id":"batch","version_id":"v42"}},"severity":"ERROR","timestamp":"2020-01-02T03:04:05Z","payload":{"logMessage":"KALOG;country:US;retries:2"}}"#,
    r#"{"log":"appengine.googleapis.com%2Fapp","metadata":{"severity":"DEBUG","timestamp":"2020-01-02T03:04:05Z","labels":{"appengine.googleapis.com/thread_id":"t-3"}},"payload":"plain text"}"#,
];

/// Kinds the engine refuses to normalize.
pub const CORPUS_UNSUPPORTED: &[&str] = &[
    r#"{"logName":"projects/khan/logs/appengine.googleapis.com%2Fcrash.log","textPayload":"boom"}"#,
    r#"{"logName":"projects/khan/logs/stderr","textPayload":"Traceback"}"#,
    r#"{"logName":"projects/khan/logs/varlog%2Fnginx"}"#,
    r#"{"labels":{}}"#,
];

/// Lines that are not a record at all.
pub const CORPUS_GARBAGE: &[&str] = &["{oops", "[1,2,3]", "\"text\"", "42"];

/// `n` synthetic request records with a few event-log lines each, for
/// throughput tests and benches.
pub fn corpus_high_volume(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            serde_json::json!({
                "logName": "projects/khan/logs/appengine.googleapis.com%2Frequest_log",
                "protoPayload": {
                    "ip": format!("10.0.{}.{}", i / 256 % 256, i % 256),
                    "status": if i % 17 == 0 { 500 } else { 200 },
                    "startTime": "2020-01-02T03:04:05.123456Z",
                    "latency": format!("0.{:06}s", i % 1_000_000),
                    "line": [
                        {"severity": "INFO", "logMessage": format!("KALOG;stats.rpc.a:{i};stats.time.b:{i};session_id:s{i}")},
                        {"severity": "DEBUG", "logMessage": "plain"},
                    ]
                }
            })
            .to_string()
        })
        .collect()
}
