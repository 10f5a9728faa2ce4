use super::domain::IssueRecord;

#[derive(Debug, Clone, Copy)]
enum IssueField {
    Severity,
    Issue,
    DiyEstimate,
    ProfessionalEstimate,
    RemainingLife,
    DiyTutorial,
}

/// Recognized `key: value` vocabulary, matched by prefix against the
/// lower-cased key and checked in order. Keeping the table next to the field
/// enum is what ties the parser's vocabulary to the `IssueRecord` shape.
const FIELD_KEYS: &[(&str, IssueField)] = &[
    ("severity", IssueField::Severity),
    ("issue", IssueField::Issue),
    ("diy estimate", IssueField::DiyEstimate),
    ("professional estimate", IssueField::ProfessionalEstimate),
    ("remaining life", IssueField::RemainingLife),
    ("diy tutorial", IssueField::DiyTutorial),
];

/// Split generated analysis text into issue records.
///
/// Sections are blank-line separated. A section is kept only when its first
/// line carries an en- or em-dash heading ("Context – Title"); everything
/// else is dropped without error, as are unrecognized keys and records that
/// never produce a severity. Malformed input is lossy by design: this
/// function cannot fail and always returns the records in section order.
pub fn parse_issue_records(text: &str) -> Vec<IssueRecord> {
    let mut records = Vec::new();

    for section in text.split("\n\n") {
        let mut lines = section.trim().lines();
        let Some(heading) = lines.next() else {
            continue;
        };
        let Some((context, title)) = split_heading(heading) else {
            continue;
        };

        let mut record = IssueRecord::with_title(format!("{context} – {title}"));

        for line in lines {
            let line = line.trim();
            let line = line.strip_prefix('-').unwrap_or(line).trim_start();
            let Some((raw_key, raw_value)) = line.split_once(':') else {
                continue;
            };
            let key = raw_key.trim().to_lowercase();
            let value = raw_value.trim();

            let Some(field) = FIELD_KEYS
                .iter()
                .find(|(prefix, _)| key.starts_with(prefix))
                .map(|(_, field)| *field)
            else {
                continue;
            };

            match field {
                IssueField::Severity => record.severity = value.to_uppercase(),
                IssueField::Issue => record.issue = Some(value.to_string()),
                IssueField::DiyEstimate => record.diy_estimate = Some(value.to_string()),
                IssueField::ProfessionalEstimate => {
                    record.professional_estimate = Some(value.to_string())
                }
                IssueField::RemainingLife => record.remaining_life = Some(value.to_string()),
                IssueField::DiyTutorial => record.diy_tutorial = Some(value.to_string()),
            }
        }

        if !record.severity.is_empty() {
            records.push(record);
        }
    }

    records
}

fn split_heading(line: &str) -> Option<(&str, &str)> {
    let index = line.find(['\u{2013}', '\u{2014}'])?;
    let dash = line[index..].chars().next()?;
    let context = line[..index].trim();
    let title = line[index + dash.len_utf8()..].trim();
    Some((context, title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_record_with_all_fields() {
        let text = "Roof – Missing Shingles\n\
Severity: Critical\n\
Issue: Several shingles missing\n\
Professional Estimate: $800\n\
DIY Estimate: $150";

        let records = parse_issue_records(text);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.title, "Roof – Missing Shingles");
        assert_eq!(record.severity, "CRITICAL");
        assert_eq!(record.issue.as_deref(), Some("Several shingles missing"));
        assert_eq!(record.professional_estimate.as_deref(), Some("$800"));
        assert_eq!(record.diy_estimate.as_deref(), Some("$150"));
        assert!(record.remaining_life.is_none());
        assert!(record.diy_tutorial.is_none());
    }

    #[test]
    fn section_without_dash_heading_is_dropped() {
        let records = parse_issue_records("Just a note\nSeverity: Minor");
        assert!(records.is_empty());
    }

    #[test]
    fn em_dash_headings_are_accepted() {
        let records = parse_issue_records("Plumbing — Slow Drain\nSeverity: Minor");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Plumbing – Slow Drain");
    }

    #[test]
    fn record_without_severity_is_discarded() {
        let text = "Roof – Missing Shingles\nIssue: Several shingles missing";
        assert!(parse_issue_records(text).is_empty());
    }

    #[test]
    fn bullet_markers_and_unknown_keys_are_tolerated() {
        let text = "Electrical – Double-Tapped Breaker\n\
- Severity: Major\n\
- Notes: observed in main panel\n\
- DIY Tutorial: https://www.youtube.com/results?search_query=how+to+fix+double+tap+breaker";

        let records = parse_issue_records(text);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.severity, "MAJOR");
        assert!(record.issue.is_none());
        assert_eq!(
            record.diy_tutorial.as_deref(),
            Some("https://www.youtube.com/results?search_query=how+to+fix+double+tap+breaker")
        );
    }

    #[test]
    fn key_prefixes_distinguish_diy_estimate_from_tutorial() {
        let text = "Interior – Cracked Drywall\n\
Severity: Minor\n\
DIY Estimate: $40\n\
DIY Tutorial: search drywall patch";

        let records = parse_issue_records(text);
        assert_eq!(records[0].diy_estimate.as_deref(), Some("$40"));
        assert_eq!(records[0].diy_tutorial.as_deref(), Some("search drywall patch"));
    }

    #[test]
    fn records_preserve_section_order() {
        let text = "Roof – Missing Shingles\nSeverity: Critical\n\n\
Plumbing – Slow Drain\nSeverity: Minor";

        let records = parse_issue_records(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Roof – Missing Shingles");
        assert_eq!(records[1].title, "Plumbing – Slow Drain");
    }

    #[test]
    fn reparsing_identical_text_is_idempotent() {
        let text = "Roof – Missing Shingles\nSeverity: Critical\nIssue: Flashing lifted\n\n\
Narrative paragraph without a heading.\n\n\
HVAC – No Cooling\nSeverity: Major";

        let first = parse_issue_records(text);
        let second = parse_issue_records(text);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(parse_issue_records("").is_empty());
        assert!(parse_issue_records("\n\n\n\n").is_empty());
    }
}
