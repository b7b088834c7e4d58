//! PubChem PUG REST lookups.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RemoteSettings;
use crate::error::DruglikenzError;
use crate::model::{decimal_from_f64, CompoundId, Descriptor, PartialDescriptors};
use crate::resolve::{DescriptorSource, SourceError};

const PROPERTIES: &str =
    "MolecularFormula,MolecularWeight,XLogP,HBondDonorCount,HBondAcceptorCount,RotatableBondCount,TPSA";

/// Remote descriptor source backed by PubChem.
///
/// Ring counts are not published by the property endpoint and are never
/// supplied. Carbon and heteroatom counts come from the molecular formula.
pub struct PubChemSource {
    client: Client,
    base_url: String,
    max_retries: u32,
    backoff: Duration,
}

enum Attempt {
    Retry(String),
    Fail(SourceError),
}

impl PubChemSource {
    pub fn new(settings: &RemoteSettings) -> Result<Self, DruglikenzError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!("druglikenz/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DruglikenzError::HttpClient(e.to_string()))?;
        Ok(PubChemSource {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_retries: settings.max_retries,
            backoff: Duration::from_millis(settings.backoff_ms),
        })
    }

    /// POST the SMILES to `path`, retrying transient failures with linear backoff.
    fn post(&self, path: &str, smiles: &str) -> Result<Value, SourceError> {
        let url = format!("{}/compound/smiles/{}", self.base_url, path);
        let mut attempt = 0u32;
        loop {
            match self.post_once(&url, smiles) {
                Ok(value) => return Ok(value),
                Err(Attempt::Fail(e)) => return Err(e),
                Err(Attempt::Retry(reason)) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        source = "pubchem",
                        attempt,
                        max_retries = self.max_retries,
                        error = %reason,
                        "request failed, retrying"
                    );
                    std::thread::sleep(self.backoff * attempt);
                }
                Err(Attempt::Retry(reason)) => {
                    return Err(SourceError::Unavailable(format!(
                        "{reason} (after {} attempts)",
                        attempt + 1
                    )));
                }
            }
        }
    }

    fn post_once(&self, url: &str, smiles: &str) -> Result<Value, Attempt> {
        let response = self
            .client
            .post(url)
            .form(&[("smiles", smiles)])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    Attempt::Retry(format!("request timed out: {e}"))
                } else {
                    Attempt::Retry(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Attempt::Retry(format!("HTTP {status}")));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(Attempt::Fail(SourceError::Unavailable(
                "no matching PubChem record".into(),
            )));
        }
        if status == StatusCode::BAD_REQUEST {
            return Err(Attempt::Fail(SourceError::Unparseable(
                "PubChem rejected the structure".into(),
            )));
        }
        if !status.is_success() {
            return Err(Attempt::Fail(SourceError::Unavailable(format!(
                "HTTP {status}"
            ))));
        }

        response
            .json()
            .map_err(|e| Attempt::Fail(SourceError::Unavailable(format!("bad response: {e}"))))
    }
}

impl DescriptorSource for PubChemSource {
    fn name(&self) -> &str {
        "pubchem"
    }

    fn lookup(
        &self,
        id: &CompoundId,
        wanted: &[Descriptor],
    ) -> Result<PartialDescriptors, SourceError> {
        let body = self.post(&format!("property/{PROPERTIES}/JSON"), id.as_str())?;
        let partial = properties_from_json(&body, wanted)?;
        debug!(identifier = %id, found = partial.len(), "pubchem properties");
        Ok(partial)
    }

    fn display_name(&self, id: &CompoundId) -> Option<String> {
        match self.post("synonyms/JSON", id.as_str()) {
            Ok(body) => first_synonym(&body),
            Err(e) => {
                debug!(identifier = %id, error = %e, "no pubchem name");
                None
            }
        }
    }
}

/// Extract the `wanted` descriptors from a PropertyTable response.
pub fn properties_from_json(
    body: &Value,
    wanted: &[Descriptor],
) -> Result<PartialDescriptors, SourceError> {
    let record = body
        .pointer("/PropertyTable/Properties/0")
        .ok_or_else(|| SourceError::Unavailable("response has no property record".into()))?;

    if record.get("CID").and_then(Value::as_u64) == Some(0) {
        return Err(SourceError::Unavailable(
            "no matching PubChem record".into(),
        ));
    }

    let formula = record
        .get("MolecularFormula")
        .and_then(Value::as_str)
        .and_then(parse_formula);

    let mut out = PartialDescriptors::new();
    for &d in wanted {
        let value = match d {
            Descriptor::MolecularWeight => decimal_field(record, "MolecularWeight"),
            Descriptor::LogP => decimal_field(record, "XLogP"),
            Descriptor::HBondDonors => decimal_field(record, "HBondDonorCount"),
            Descriptor::HBondAcceptors => decimal_field(record, "HBondAcceptorCount"),
            Descriptor::RotatableBonds => decimal_field(record, "RotatableBondCount"),
            Descriptor::PolarSurfaceArea => decimal_field(record, "TPSA"),
            Descriptor::CarbonCount => formula
                .as_ref()
                .map(|f| Decimal::from(f.get("C").copied().unwrap_or(0))),
            Descriptor::HeteroatomCount => formula.as_ref().map(|f| {
                Decimal::from(
                    f.iter()
                        .filter(|(symbol, _)| !matches!(symbol.as_str(), "C" | "H"))
                        .map(|(_, n)| n)
                        .sum::<u32>(),
                )
            }),
            Descriptor::RingCount => None,
        };
        if let Some(v) = value {
            out.set(d, v);
        }
    }
    Ok(out)
}

/// PubChem sends some numbers as JSON strings ("180.16").
fn decimal_field(record: &Value, key: &str) -> Option<Decimal> {
    match record.get(key)? {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => n.as_f64().and_then(decimal_from_f64),
        _ => None,
    }
}

fn first_synonym(body: &Value) -> Option<String> {
    body.pointer("/InformationList/Information/0/Synonym/0")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Element counts from a Hill formula such as `C9H8O4`, `C2H3O2-` or
/// `C12H22O11.2Na`. Returns `None` for anything it cannot read.
pub fn parse_formula(formula: &str) -> Option<BTreeMap<String, u32>> {
    let mut counts = BTreeMap::new();
    for part in formula.split('.') {
        let bytes = part.trim().as_bytes();
        let mut i = 0;

        let mut multiplier = 0u32;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            multiplier = multiplier * 10 + u32::from(bytes[i] - b'0');
            i += 1;
        }
        let multiplier = multiplier.max(1);

        while i < bytes.len() {
            match bytes[i] {
                b'+' | b'-' => {
                    i += 1;
                    while i < bytes.len() && bytes[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                c if c.is_ascii_uppercase() => {
                    let start = i;
                    i += 1;
                    while i < bytes.len() && bytes[i].is_ascii_lowercase() {
                        i += 1;
                    }
                    let symbol = std::str::from_utf8(&bytes[start..i]).ok()?;
                    let mut n = 0u32;
                    let mut has_digits = false;
                    while i < bytes.len() && bytes[i].is_ascii_digit() {
                        n = n.checked_mul(10)?.checked_add(u32::from(bytes[i] - b'0'))?;
                        has_digits = true;
                        i += 1;
                    }
                    let n = if has_digits { n } else { 1 };
                    *counts.entry(symbol.to_string()).or_insert(0) += n * multiplier;
                }
                _ => return None,
            }
        }
    }
    if counts.is_empty() {
        None
    } else {
        Some(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn aspirin_response() -> Value {
        json!({
            "PropertyTable": {
                "Properties": [{
                    "CID": 2244,
                    "MolecularFormula": "C9H8O4",
                    "MolecularWeight": "180.16",
                    "XLogP": 1.2,
                    "TPSA": 63.6,
                    "HBondDonorCount": 1,
                    "HBondAcceptorCount": 4,
                    "RotatableBondCount": 3
                }]
            }
        })
    }

    #[test]
    fn test_properties_from_json() {
        let partial = properties_from_json(&aspirin_response(), &Descriptor::ALL).unwrap();
        assert_eq!(partial.get(Descriptor::MolecularWeight), Some(dec!(180.16)));
        assert_eq!(partial.get(Descriptor::LogP), Some(dec!(1.2)));
        assert_eq!(partial.get(Descriptor::PolarSurfaceArea), Some(dec!(63.6)));
        assert_eq!(partial.get(Descriptor::HBondAcceptors), Some(dec!(4)));
        assert_eq!(partial.get(Descriptor::CarbonCount), Some(dec!(9)));
        assert_eq!(partial.get(Descriptor::HeteroatomCount), Some(dec!(4)));
        assert_eq!(
            partial.missing_from(&Descriptor::ALL),
            vec![Descriptor::RingCount]
        );
    }

    #[test]
    fn test_only_wanted_fields_returned() {
        let partial = properties_from_json(&aspirin_response(), &[Descriptor::LogP]).unwrap();
        assert_eq!(partial.len(), 1);
    }

    #[test]
    fn test_missing_xlogp_is_absent() {
        let body = json!({
            "PropertyTable": { "Properties": [{ "CID": 5, "MolecularWeight": "12.5" }] }
        });
        let partial = properties_from_json(&body, &[Descriptor::LogP]).unwrap();
        assert!(partial.is_empty());
    }

    #[test]
    fn test_cid_zero_means_not_found() {
        let body = json!({ "PropertyTable": { "Properties": [{ "CID": 0 }] } });
        assert!(matches!(
            properties_from_json(&body, &Descriptor::ALL),
            Err(SourceError::Unavailable(_))
        ));
    }

    #[test]
    fn test_parse_formula() {
        let f = parse_formula("C9H8O4").unwrap();
        assert_eq!(f["C"], 9);
        assert_eq!(f["O"], 4);

        let f = parse_formula("C2H3O2-").unwrap();
        assert_eq!(f["O"], 2);

        let f = parse_formula("C12H22O11.2Na").unwrap();
        assert_eq!(f["Na"], 2);
        assert_eq!(f["C"], 12);

        assert!(parse_formula("").is_none());
        assert!(parse_formula("c9").is_none());
    }

    #[test]
    fn test_first_synonym() {
        let body = json!({
            "InformationList": { "Information": [{ "CID": 2244, "Synonym": ["aspirin", "ACETYLSALICYLIC ACID"] }] }
        });
        assert_eq!(first_synonym(&body).as_deref(), Some("aspirin"));
    }

    #[test]
    fn test_unreachable_service_is_unavailable() {
        let settings = RemoteSettings {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            max_retries: 1,
            backoff_ms: 1,
            ..RemoteSettings::default()
        };
        let source = PubChemSource::new(&settings).unwrap();
        let id = CompoundId::normalize("CCO").unwrap();
        match source.lookup(&id, &[Descriptor::LogP]) {
            Err(SourceError::Unavailable(reason)) => assert!(reason.contains("2 attempts")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_silent_server_times_out_and_is_retried() {
        use std::net::TcpListener;
        use std::sync::mpsc;
        use std::time::Instant;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (done_tx, done_rx) = mpsc::channel::<()>();
        // Accept every attempt, never answer, and hold the sockets open
        let server = std::thread::spawn(move || {
            let held: Vec<_> = listener.incoming().take(2).map(Result::unwrap).collect();
            done_rx.recv().ok();
            held.len()
        });

        let settings = RemoteSettings {
            base_url: format!("http://{addr}"),
            timeout_secs: 1,
            max_retries: 1,
            backoff_ms: 10,
            ..RemoteSettings::default()
        };
        let source = PubChemSource::new(&settings).unwrap();
        let id = CompoundId::normalize("CCO").unwrap();
        let started = Instant::now();
        let result = source.lookup(&id, &[Descriptor::LogP]);
        let elapsed = started.elapsed();
        done_tx.send(()).unwrap();

        match result {
            Err(SourceError::Unavailable(reason)) => {
                assert!(reason.contains("timed out"), "{reason}");
                assert!(reason.contains("2 attempts"), "{reason}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(elapsed >= Duration::from_secs(2), "{elapsed:?}");
        assert_eq!(server.join().unwrap(), 2);
    }
}
