use std::path::PathBuf;

use clap::Args;
use inspector_ai::error::AppError;
use inspector_ai::workflows::analysis::{
    score_analysis_text, ClassifiedIssue, HomeHealthScore, ScoreBasis, ScoreEngine, ScoringRubric,
};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to a saved analysis write-up to parse and score
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Include every extracted issue in the output
    #[arg(long)]
    pub(crate) list_issues: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let analysis_text = std::fs::read_to_string(&args.input)?;

    let engine = ScoreEngine::new(ScoringRubric::standard());
    let (issues, score) = score_analysis_text(&engine, &analysis_text);

    render_score(&issues, &score, args.list_issues);
    Ok(())
}

fn render_score(issues: &[ClassifiedIssue], score: &HomeHealthScore, list_issues: bool) {
    println!("Home health score: {:.2}", score.overall);
    if score.basis == ScoreBasis::NoFindings {
        println!("(no classifiable findings carried a category weight)");
    }

    if score.breakdown.is_empty() {
        println!("\nCategory breakdown: none");
    } else {
        println!("\nCategory breakdown");
        for (category, average) in &score.breakdown {
            println!("- {}: {:.2}", category.label(), average);
        }
    }

    if list_issues {
        if issues.is_empty() {
            println!("\nIssues: none extracted");
        } else {
            println!("\nIssues");
            for issue in issues {
                let detail = issue.record.issue.as_deref().unwrap_or("no detail provided");
                println!(
                    "- [{}] {} ({}): {}",
                    issue.record.severity,
                    issue.record.title,
                    issue.category.label(),
                    detail
                );
            }
        }
    }
}
