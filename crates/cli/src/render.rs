//! Plain-text rendering of moderation data

use nauan_client::Claims;
use nauan_client::types::{
    CulinaryTip, PostComment, Recipe, ReportedContent, Submission, Submissions,
};
use std::fmt::Write;

pub fn claims(claims: &Claims) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Subject: {}", claims.sub.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Role:    {}", claims.role.as_deref().unwrap_or("-"));
    let expires = expires_in(claims.exp);
    let _ = write!(out, "Expires: {expires}");
    out
}

fn expires_in(exp: i64) -> String {
    let remaining = exp.saturating_sub(nauan_client::session::now_secs());
    if remaining <= 0 {
        "expired".to_string()
    } else {
        format!("in {}m {}s", remaining / 60, remaining % 60)
    }
}

fn recipe_row(recipe: &Recipe) -> String {
    format!(
        "{:<24} {:<10} {:<9} {}",
        recipe.id,
        "Recipe",
        recipe.status.to_string(),
        recipe.title
    )
}

fn tip_row(tip: &CulinaryTip) -> String {
    format!(
        "{:<24} {:<10} {:<9} {}",
        tip.id,
        "Tip",
        tip.status.to_string(),
        tip.title
    )
}

pub fn submissions(submissions: &Submissions) -> String {
    if submissions.recipes.is_empty() && submissions.culinary_tips.is_empty() {
        return "No submissions".to_string();
    }

    let mut out = format!("{:<24} {:<10} {:<9} {}\n", "ID", "TYPE", "STATUS", "TITLE");
    for recipe in &submissions.recipes {
        out.push_str(&recipe_row(recipe));
        out.push('\n');
    }
    for tip in &submissions.culinary_tips {
        out.push_str(&tip_row(tip));
        out.push('\n');
    }
    out.trim_end().to_string()
}

pub fn submission(submission: &Submission, video_url: &str) -> String {
    let mut out = String::new();
    match submission {
        Submission::Recipe(recipe) => {
            let _ = writeln!(out, "{} ({})", recipe.title, recipe.status);
            let _ = writeln!(out, "{}", recipe.description);
            let _ = writeln!(
                out,
                "Difficulty: {:?}  Portions: {} {:?}  Prep: {}  Cook: {}",
                recipe.difficulty,
                recipe.portion_quantity,
                recipe.portion_type,
                recipe.prep_time,
                recipe.cook_time
            );
            let _ = writeln!(out, "\nIngredients:");
            for ingredient in &recipe.ingredients {
                let _ = writeln!(
                    out,
                    "  - {} {} {}",
                    ingredient.amount, ingredient.unit, ingredient.name
                );
            }
            let _ = writeln!(out, "\nSteps:");
            let mut steps = recipe.instructions.clone();
            steps.sort_by_key(|instruction| instruction.step);
            for instruction in &steps {
                let _ = writeln!(out, "  {}. {}", instruction.step, instruction.description);
            }
        }
        Submission::CulinaryTip(tip) => {
            let _ = writeln!(out, "{} ({})", tip.title, tip.status);
            let _ = writeln!(out, "{}", tip.description);
        }
    }

    if video_url.is_empty() {
        let _ = write!(out, "\nVideo: not available");
    } else {
        let _ = write!(out, "\nVideo: {video_url}");
    }
    out
}

pub fn comment(comment: &PostComment, image_url: &str) -> String {
    let mut out = format!(
        "{}: {}",
        comment.username.as_deref().unwrap_or("unknown"),
        comment.content
    );
    if !image_url.is_empty() {
        let _ = write!(out, "\nImage: {image_url}");
    }
    out
}

pub fn reports(reports: &[ReportedContent]) -> String {
    if reports.is_empty() {
        return "No reports".to_string();
    }

    let mut out = format!(
        "{:<24} {:<24} {:<16} {}\n",
        "REPORT", "POST", "REPORTER", "REASON"
    );
    for report in reports {
        let target = match report.comment_id.as_deref() {
            Some(comment) if !comment.is_empty() => format!("{}#{comment}", report.post_id),
            _ => report.post_id.clone(),
        };
        let _ = writeln!(
            out,
            "{:<24} {:<24} {:<16} {}",
            report.id, target, report.username, report.reason
        );
    }
    out.trim_end().to_string()
}
