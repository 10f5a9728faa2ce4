use std::fmt::Write;

const SYSTEM_PROMPT: &str = "You are a certified home inspector with advanced knowledge of \
residential systems: roofing, foundation and structural components, HVAC, plumbing, electrical, \
exterior cladding, interior finishes, and appliances. You are experienced in both professional \
contractor pricing and do-it-yourself repair cost estimates. Analyze home inspection reports, \
identify the issues, prioritize them, and respond in a structured, thorough, homeowner-friendly \
format.";

/// The fixed instruction pair sent to the text-generation service for one
/// analysis run. The user prompt pins the section grammar the response
/// parser expects: dash headings, `key: value` lines, and the
/// CRITICAL/MAJOR/MODERATE/MINOR severity vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPrompt {
    pub system: String,
    pub user: String,
}

impl AnalysisPrompt {
    pub fn for_inspection(inspection_text: &str, photo_descriptions: &[String]) -> Self {
        let mut user = String::from(
            "Analyze the following home inspection report.\n\
\n\
Describe each distinct problem as its own section, separated from the next by a blank line. \
Start every section with a heading of the form:\n\
\n\
<System> \u{2013} <Short issue title>\n\
\n\
where <System> names the affected home system (Roof, Foundation, HVAC, Plumbing, Electrical, \
Exterior, Interior, Appliances). Under the heading list, one per line:\n\
\n\
- Severity: CRITICAL, MAJOR, MODERATE, or MINOR\n\
- Issue: a brief explanation of the concern\n\
- DIY Estimate: the cost to fix it yourself, if safe and feasible\n\
- Professional Estimate: the cost to have it repaired or replaced professionally\n\
- Remaining Life: the expected remaining useful life of the affected component\n\
- DIY Tutorial: a YouTube search link of the form \
https://www.youtube.com/results?search_query=how+to+FIX_TOPIC, if the repair is DIY-appropriate\n\
\n\
Order the sections from most critical to least important, and end with a short summary ranking \
the systems by urgency and cost impact.\n\
\n\
Here is the report to analyze:\n",
        );
        user.push_str(inspection_text.trim());

        if !photo_descriptions.is_empty() {
            user.push_str("\n\nObservations from inspection photos:\n");
            for description in photo_descriptions {
                let _ = writeln!(user, "- {}", description.trim());
            }
        }

        Self {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}
