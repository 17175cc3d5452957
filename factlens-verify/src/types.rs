use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub text: String,
}

/// One backend-returned judgment of a claim.
///
/// The backend owns the label vocabulary and the score range; this client
/// treats every field as opaque display material. Missing fields default to
/// empty rather than failing the whole payload, and `score` tolerates a
/// numeric-looking string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Verdict {
    #[serde(default)]
    pub claim: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: f64,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub evidence: String,
}

fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => Ok(s.trim().parse().unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_record() {
        let json = r#"{"claim":"C","label":"supported","score":0.9,"source":"S","evidence":"E"}"#;
        let v: Verdict = serde_json::from_str(json).unwrap();
        assert_eq!(v.claim, "C");
        assert_eq!(v.label, "supported");
        assert_eq!(v.score, 0.9);
        assert_eq!(v.source, "S");
        assert_eq!(v.evidence, "E");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let v: Verdict = serde_json::from_str(r#"{"claim":"only this"}"#).unwrap();
        assert_eq!(v.claim, "only this");
        assert_eq!(v.label, "");
        assert_eq!(v.score, 0.0);
        assert_eq!(v.source, "");
        assert_eq!(v.evidence, "");
    }

    #[test]
    fn numeric_looking_score_string_parses() {
        let v: Verdict = serde_json::from_str(r#"{"score":"0.73"}"#).unwrap();
        assert_eq!(v.score, 0.73);
    }

    #[test]
    fn garbage_score_string_defaults_to_zero() {
        let v: Verdict = serde_json::from_str(r#"{"score":"high"}"#).unwrap();
        assert_eq!(v.score, 0.0);
    }

    #[test]
    fn response_order_is_preserved() {
        let json = r#"[{"claim":"a"},{"claim":"b"},{"claim":"c"}]"#;
        let vs: Vec<Verdict> = serde_json::from_str(json).unwrap();
        let claims: Vec<&str> = vs.iter().map(|v| v.claim.as_str()).collect();
        assert_eq!(claims, ["a", "b", "c"]);
    }

    #[test]
    fn request_serializes_to_text_envelope() {
        let req = VerifyRequest {
            text: "the sky is green".into(),
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"text":"the sky is green"}"#
        );
    }
}
