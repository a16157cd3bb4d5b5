//! `cnlunar` behind a long-lived Python subprocess.
//!
//! Protocol, one JSON document per line:
//! - on start the script prints `{"ready": true, "engine": "cnlunar", "version": ...}`
//! - each request line gets exactly one reply line,
//!   `{"ok": true, "snapshot": {...}}` or `{"ok": false, "kind": ..., "message": ...}`
//!
//! Python's stderr is drained on a background thread, forwarded to `tracing`
//! at debug level, and its tail attached to `OracleError::Exited`.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use alm_core::snapshot::OracleSnapshot;
use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::OracleError;
use crate::{Oracle, OracleRequest};

/// The bridge script run with `python -c`.
pub const BRIDGE_SCRIPT: &str = include_str!("../python/cnlunar_bridge.py");

const STDERR_TAIL_LINES: usize = 20;

/// Start-up line printed by the bridge script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Handshake {
    pub ready: bool,
    pub engine: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    yeargod: &'a str,
    god_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct WireReply {
    ok: bool,
    #[serde(default)]
    snapshot: Option<serde_json::Value>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Encode one request line, without the trailing newline.
///
/// # Errors
///
/// `OracleError::Protocol` if serialization fails.
pub fn encode_request(request: &OracleRequest) -> Result<String, OracleError> {
    let wire = WireRequest {
        year: request.at.year(),
        month: request.at.month(),
        day: request.at.day(),
        hour: request.at.hour(),
        minute: request.at.minute(),
        yeargod: request.key.mode.as_str(),
        god_type: &request.god_type,
    };
    serde_json::to_string(&wire).map_err(|e| OracleError::Protocol(format!("encode request: {e}")))
}

/// Decode the start-up line.
///
/// # Errors
///
/// `OracleError::Protocol` if the line is not a ready handshake.
pub fn decode_handshake(line: &str) -> Result<Handshake, OracleError> {
    let handshake: Handshake = serde_json::from_str(line.trim())
        .map_err(|e| OracleError::Protocol(format!("invalid handshake {:?}: {e}", line.trim())))?;
    if !handshake.ready {
        return Err(OracleError::Protocol("bridge reported not ready".into()));
    }
    Ok(handshake)
}

/// Decode one reply line.
///
/// # Errors
///
/// - `OracleError::Computation` for an `ok: false` reply
/// - `OracleError::Snapshot` for an `ok: true` snapshot of the wrong shape
/// - `OracleError::Protocol` for a line that is not a reply at all
pub fn decode_reply(line: &str) -> Result<OracleSnapshot, OracleError> {
    let reply: WireReply = serde_json::from_str(line.trim())
        .map_err(|e| OracleError::Protocol(format!("invalid reply: {e}")))?;

    if !reply.ok {
        return Err(OracleError::Computation {
            kind: reply.kind.unwrap_or_else(|| "Exception".into()),
            message: reply.message.unwrap_or_default(),
        });
    }

    let snapshot = reply
        .snapshot
        .ok_or_else(|| OracleError::Protocol("ok reply without snapshot".into()))?;
    serde_json::from_value(snapshot).map_err(|e| OracleError::Snapshot {
        message: e.to_string(),
    })
}

/// Production [`Oracle`] backed by the Python `cnlunar` package.
pub struct CnlunarBridge {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    stderr: Option<JoinHandle<String>>,
    handshake: Handshake,
}

impl CnlunarBridge {
    /// Start `python` with the bridge script and wait for its handshake.
    ///
    /// # Errors
    ///
    /// - `OracleError::Spawn` if the interpreter cannot be started
    /// - `OracleError::Exited` if it dies before the handshake (typically
    ///   because `cnlunar` is not installed; the stderr tail says so)
    /// - `OracleError::Protocol` if the first line is not a handshake
    pub fn spawn(python: &str) -> Result<Self, OracleError> {
        let mut child = Command::new(python)
            .arg("-u")
            .arg("-c")
            .arg(BRIDGE_SCRIPT)
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| OracleError::Spawn {
                program: python.to_string(),
                source,
            })?;

        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| OracleError::Protocol("child stdout not captured".into()))?;
        let stderr = child.stderr.take().map(|pipe| {
            std::thread::spawn(move || {
                let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
                for line in BufReader::new(pipe).lines().map_while(Result::ok) {
                    debug!(target: "alm_oracle::python", "{line}");
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
                Vec::from(tail).join("\n")
            })
        });

        let mut bridge = Self {
            child,
            stdin,
            stdout,
            stderr,
            handshake: Handshake {
                ready: false,
                engine: String::new(),
                version: String::new(),
            },
        };

        let line = bridge.read_line()?;
        bridge.handshake = decode_handshake(&line)?;
        info!(
            engine = %bridge.handshake.engine,
            version = %bridge.handshake.version,
            python,
            "oracle bridge ready"
        );
        Ok(bridge)
    }

    #[must_use]
    pub const fn handshake(&self) -> &Handshake {
        &self.handshake
    }

    fn read_line(&mut self) -> Result<String, OracleError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(self.exited());
        }
        Ok(line)
    }

    fn send(&mut self, line: &str) -> Result<(), OracleError> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| OracleError::Protocol("bridge stdin already closed".into()))?;
        let written = stdin
            .write_all(line.as_bytes())
            .and_then(|()| stdin.write_all(b"\n"))
            .and_then(|()| stdin.flush());
        match written {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::BrokenPipe => Err(self.exited()),
            Err(e) => Err(e.into()),
        }
    }

    /// Reap the child and collect what it printed on stderr.
    fn exited(&mut self) -> OracleError {
        self.shutdown();
        let stderr = self
            .stderr
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();
        OracleError::Exited { stderr }
    }

    fn shutdown(&mut self) {
        drop(self.stdin.take());
        if let Err(e) = self.child.wait() {
            debug!(error = %e, "failed to reap oracle bridge");
        }
    }
}

impl Oracle for CnlunarBridge {
    fn query(&mut self, request: &OracleRequest) -> Result<OracleSnapshot, OracleError> {
        let line = encode_request(request)?;
        self.send(&line)?;
        let reply = self.read_line()?;
        decode_reply(&reply)
    }
}

impl Drop for CnlunarBridge {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(handle) = self.stderr.take() {
            let _ = handle.join();
        }
    }
}

impl std::fmt::Debug for CnlunarBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CnlunarBridge")
            .field("pid", &self.child.id())
            .field("handshake", &self.handshake)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedOracle;
    use alm_core::enums::ConfigMode;
    use alm_core::sample::{SampleKey, SampleTime};
    use alm_core::snapshot::OfficerResult;
    use pretty_assertions::assert_eq;

    fn request() -> OracleRequest {
        let key = SampleKey::new(1901, 1, 5, SampleTime::EVENING, ConfigMode::NoDuty);
        OracleRequest {
            key,
            at: key.date_time().unwrap(),
            god_type: "8char".into(),
        }
    }

    fn ok_reply(snapshot: &OracleSnapshot) -> String {
        serde_json::json!({ "ok": true, "snapshot": snapshot }).to_string()
    }

    #[test]
    fn request_line_has_flat_fields() {
        let line = encode_request(&request()).unwrap();
        assert_eq!(
            line,
            r#"{"year":1901,"month":1,"day":5,"hour":23,"minute":30,"yeargod":"noduty","god_type":"8char"}"#
        );
    }

    #[test]
    fn handshake_decodes() {
        let handshake =
            decode_handshake("{\"ready\": true, \"engine\": \"cnlunar\", \"version\": \"0.2.0\"}\n")
                .unwrap();
        assert_eq!(handshake.engine, "cnlunar");
        assert_eq!(handshake.version, "0.2.0");
    }

    #[test]
    fn handshake_rejects_noise_and_not_ready() {
        assert!(matches!(
            decode_handshake("Traceback (most recent call last):"),
            Err(OracleError::Protocol(_))
        ));
        assert!(matches!(
            decode_handshake(r#"{"ready": false, "engine": "cnlunar", "version": "x"}"#),
            Err(OracleError::Protocol(_))
        ));
    }

    #[test]
    fn ok_reply_decodes_snapshot() {
        let snapshot = ScriptedOracle::snapshot_for(&request());
        let decoded = decode_reply(&ok_reply(&snapshot)).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn reply_decodes_python_separators_and_officer_shapes() {
        let mut snapshot = ScriptedOracle::snapshot_for(&request());
        snapshot.day_officer = OfficerResult::Other {
            repr: "['建', '青龙']".into(),
        };
        let mut value = serde_json::json!({ "ok": true, "snapshot": snapshot });
        value["snapshot"]["this_year_solar_terms"] = serde_json::json!([["小寒", [1, 6]]]);
        let python_style = serde_json::to_string(&value)
            .unwrap()
            .replace("\",\"", "\", \"")
            .replace("\":", "\": ");

        let decoded = decode_reply(&python_style).unwrap();
        assert_eq!(decoded.this_year_solar_terms, vec![("小寒".to_string(), (1, 6))]);
        assert_eq!(decoded.day_officer.day_type(), None);
    }

    #[test]
    fn error_reply_is_a_computation_fault() {
        let err = decode_reply(
            r#"{"ok": false, "kind": "ValueError", "message": "day is out of range for month"}"#,
        )
        .unwrap_err();
        match err {
            OracleError::Computation { kind, message } => {
                assert_eq!(kind, "ValueError");
                assert_eq!(message, "day is out of range for month");
            }
            other => panic!("expected Computation, got {other:?}"),
        }
    }

    #[test]
    fn snapshot_shape_mismatch_is_a_snapshot_error() {
        let snapshot = ScriptedOracle::snapshot_for(&request());
        let mut value = serde_json::json!({ "ok": true, "snapshot": snapshot });
        value["snapshot"]
            .as_object_mut()
            .unwrap()
            .remove("good_thing");
        assert!(matches!(
            decode_reply(&value.to_string()),
            Err(OracleError::Snapshot { .. })
        ));

        value["snapshot"]["good_thing"] = serde_json::json!([]);
        value["snapshot"]["fetal_god"] = serde_json::Value::Null;
        match decode_reply(&value.to_string()) {
            Err(OracleError::Snapshot { message }) => {
                assert!(message.contains("null"), "{message}");
            }
            other => panic!("expected Snapshot, got {other:?}"),
        }
    }

    #[test]
    fn unparsable_replies_are_protocol_errors() {
        assert!(matches!(
            decode_reply(r#"{"ok": true}"#),
            Err(OracleError::Protocol(_))
        ));
        assert!(matches!(decode_reply("not json"), Err(OracleError::Protocol(_))));
    }

    #[test]
    fn missing_interpreter_is_a_spawn_error() {
        let err = CnlunarBridge::spawn("almfx-no-such-python-interpreter").unwrap_err();
        assert!(matches!(err, OracleError::Spawn { .. }));
    }

    #[test]
    fn script_announces_itself_first() {
        assert!(BRIDGE_SCRIPT.contains("\"ready\": True"));
        assert!(BRIDGE_SCRIPT.contains("get_pengTaboo(long=4, delimit=\"<br>\")"));
    }
}
