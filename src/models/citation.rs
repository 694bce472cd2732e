use serde::{Deserialize, Serialize};

/// A backend-supplied reference to a source document section supporting a
/// chat answer.
///
/// Every field is optional on the wire. `score` is a retrieval *distance*
/// (lower = closer match), with scale and bounds owned by the backend —
/// nothing here validates them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub score: Option<f64>,
}

impl Citation {
    /// Citation with only a distance score, as returned for chunks whose
    /// metadata carries neither section nor page.
    pub fn scored(score: f64) -> Self {
        Self {
            score: Some(score),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_all_fields_absent() {
        let c: Citation = serde_json::from_str("{}").unwrap();
        assert_eq!(c, Citation::default());
    }

    #[test]
    fn deserializes_with_null_score() {
        let c: Citation = serde_json::from_str(
            r#"{"section": "Diet", "page": 4, "score": null}"#,
        )
        .unwrap();
        assert_eq!(c.section.as_deref(), Some("Diet"));
        assert_eq!(c.page, Some(4));
        assert_eq!(c.score, None);
    }

    #[test]
    fn deserializes_full_citation() {
        let c: Citation = serde_json::from_str(
            r#"{"section": "Potassium intake", "page": 12, "score": 0.42}"#,
        )
        .unwrap();
        assert_eq!(c.score, Some(0.42));
    }
}
