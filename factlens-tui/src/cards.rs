//! Verdict cards rendered as styled lines for the results pane.
//!
//! One card per verdict, in response order. The layout mirrors the service's
//! reference page: claim heading, label with confidence, evidence with its
//! source. Every field is displayed verbatim; the client neither validates
//! the label vocabulary nor the score range.

use crate::styles;
use factlens_verify::Verdict;
use ratatui::style::Style;

#[derive(Clone)]
pub struct CardLine {
    pub text: String,
    pub style: Style,
}

impl CardLine {
    pub fn new(text: String, style: Style) -> Self {
        Self { text, style }
    }
}

pub fn render_cards(verdicts: &[Verdict]) -> Vec<CardLine> {
    let mut out = Vec::new();

    for v in verdicts {
        out.push(CardLine::new("Claim:".into(), styles::label()));
        for line in v.claim.lines() {
            out.push(CardLine::new(format!("  {line}"), styles::value()));
        }
        if v.claim.is_empty() {
            out.push(CardLine::new("  (none)".into(), styles::dim()));
        }

        out.push(CardLine::new(
            format!("Label: {} (confidence: {})", v.label, v.score),
            styles::value(),
        ));

        out.push(CardLine::new(
            format!("Evidence ({}):", v.source),
            styles::label(),
        ));
        if v.evidence.is_empty() {
            out.push(CardLine::new("  (none)".into(), styles::dim()));
        } else {
            for line in v.evidence.lines() {
                out.push(CardLine::new(format!("  {line}"), styles::value()));
            }
        }

        out.push(CardLine::new(String::new(), Style::default()));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_verdict_renders_one_card_with_all_fields() {
        let verdicts = vec![Verdict {
            claim: "C".into(),
            label: "supported".into(),
            score: 0.9,
            source: "S".into(),
            evidence: "E".into(),
        }];

        let lines = render_cards(&verdicts);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();

        assert!(texts.contains(&"Claim:"));
        assert!(texts.contains(&"  C"));
        assert!(texts.contains(&"Label: supported (confidence: 0.9)"));
        assert!(texts.contains(&"Evidence (S):"));
        assert!(texts.contains(&"  E"));
    }

    #[test]
    fn cards_preserve_response_order() {
        let verdicts = vec![
            Verdict {
                claim: "first".into(),
                ..Default::default()
            },
            Verdict {
                claim: "second".into(),
                ..Default::default()
            },
        ];

        let lines = render_cards(&verdicts);
        let first = lines.iter().position(|l| l.text == "  first").unwrap();
        let second = lines.iter().position(|l| l.text == "  second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn empty_fields_render_as_placeholders_not_panics() {
        let lines = render_cards(&[Verdict::default()]);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();

        assert!(texts.contains(&"Claim:"));
        assert!(texts.contains(&"Label:  (confidence: 0)"));
        assert!(texts.contains(&"Evidence ():"));
    }

    #[test]
    fn no_verdicts_render_no_lines() {
        assert!(render_cards(&[]).is_empty());
    }
}
