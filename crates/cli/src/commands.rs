//! CLI commands

use anyhow::{Context as _, Result, anyhow, bail};
use clap::{Subcommand, ValueEnum};
use nauan_client::types::{Status, SubmissionType};
use nauan_client::{
    ModerationApi, Outcome, ReportedFeed, ReportedTabs, SignIn, SignInOutcome, SignInRequest,
    SubmissionFilter,
};
use tracing::{debug, info};

use crate::render;

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the issued token
    Signin {
        /// Email address or username
        #[arg(long)]
        identifier: String,

        /// Account password
        #[arg(long, env = "NAUAN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored token
    Logout,

    /// Show who the stored token belongs to
    Whoami,

    /// List submissions awaiting review or already reviewed
    Submissions {
        #[arg(value_enum, default_value = "pending")]
        filter: FilterArg,
    },

    /// Show one post
    Post {
        #[arg(value_enum)]
        kind: KindArg,
        id: String,
    },

    /// Show one comment on a post
    Comment { post_id: String, comment_id: String },

    /// List reported content
    Reported {
        /// Only show one tab of the reports view
        #[arg(long, value_enum)]
        tab: Option<TabArg>,
    },

    /// Move a submission to a new status
    Review {
        #[arg(value_enum)]
        kind: KindArg,
        id: String,

        #[arg(long, value_enum)]
        status: StatusArg,

        /// Reviewer note, required when rejecting
        #[arg(long)]
        comment: Option<String>,
    },

    /// Dismiss a report
    Dismiss { report_id: String },

    /// Print a signed download URL for a stored file
    DownloadUrl { file_id: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FilterArg {
    Pending,
    History,
}

impl From<FilterArg> for SubmissionFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Pending => SubmissionFilter::Pending,
            FilterArg::History => SubmissionFilter::History,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Recipe,
    Tip,
}

impl From<KindArg> for SubmissionType {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Recipe => SubmissionType::Recipe,
            KindArg::Tip => SubmissionType::CulinaryTip,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Pending,
    Approved,
    Rejected,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Status::Pending,
            StatusArg::Approved => Status::Approved,
            StatusArg::Rejected => Status::Rejected,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TabArg {
    Recipe,
    Tip,
    Comments,
}

/// Unwrap a hook result, failing once the session has been terminated
fn done<T>(outcome: Outcome<T>) -> Result<T> {
    match outcome {
        Outcome::Done(value) => Ok(value),
        Outcome::SessionEnded => Err(anyhow!("session ended, sign in again")),
    }
}

impl Commands {
    pub async fn execute(self, api: ModerationApi) -> Result<()> {
        match self {
            Commands::Signin {
                identifier,
                password,
            } => sign_in(api, identifier, password).await,
            Commands::Logout => {
                api.client().session().clear_token();
                println!("Signed out");
                Ok(())
            }
            Commands::Whoami => match api.client().session().resume() {
                Some(claims) => {
                    println!("{}", render::claims(&claims));
                    Ok(())
                }
                None => bail!("not signed in"),
            },
            Commands::Submissions { filter } => {
                let submissions = done(api.list_submissions(filter.into()).await?)?;
                println!("{}", render::submissions(&submissions));
                Ok(())
            }
            Commands::Post { kind, id } => {
                let submission = done(api.post_details(kind.into(), &id).await?)?
                    .with_context(|| format!("post {id} not found"))?;
                let video = match submission.video() {
                    Some(file_id) => api.download_url(file_id).await,
                    None => String::new(),
                };
                println!("{}", render::submission(&submission, &video));
                Ok(())
            }
            Commands::Comment {
                post_id,
                comment_id,
            } => {
                let comment = done(api.comment_details(&post_id, &comment_id).await?)?
                    .with_context(|| format!("comment {comment_id} not found"))?;
                let image = match comment.image.as_deref() {
                    Some(file_id) => api.download_url(file_id).await,
                    None => String::new(),
                };
                println!("{}", render::comment(&comment, &image));
                Ok(())
            }
            Commands::Reported { tab } => {
                let feed = ReportedFeed::new(api);
                let reports = done(feed.get().await?)?;
                let tabs = ReportedTabs::partition(&reports);
                let shown = match tab {
                    None => reports.as_slice(),
                    Some(TabArg::Recipe) => tabs.recipes.as_slice(),
                    Some(TabArg::Tip) => tabs.culinary_tips.as_slice(),
                    Some(TabArg::Comments) => tabs.comments.as_slice(),
                };
                println!("{}", render::reports(shown));
                Ok(())
            }
            Commands::Review {
                kind,
                id,
                status,
                comment,
            } => {
                let submission = done(api.post_details(kind.into(), &id).await?)?
                    .with_context(|| format!("post {id} not found"))?;
                let status = Status::from(status);
                done(
                    api.update_submission(&submission, status, comment.as_deref())
                        .await?,
                )?;
                info!(post_id = %id, %status, "Submission reviewed");
                println!("{} is now {status}", submission.title());
                Ok(())
            }
            Commands::Dismiss { report_id } => {
                done(api.dismiss_report(&report_id).await?)?;
                println!("Report {report_id} dismissed");
                Ok(())
            }
            Commands::DownloadUrl { file_id } => {
                let url = api.download_url(&file_id).await;
                if url.is_empty() {
                    bail!("no download URL for {file_id}");
                }
                println!("{url}");
                Ok(())
            }
        }
    }
}

async fn sign_in(api: ModerationApi, identifier: String, password: String) -> Result<()> {
    let request = SignInRequest::new(identifier, password);
    let sign_in = SignIn::new(api.client().clone());

    match sign_in.submit(&request).await? {
        SignInOutcome::SignedIn(claims) => {
            debug!(decoded = claims.is_some(), "Token stored");
            match claims {
                Some(claims) => println!("Signed in\n{}", render::claims(&claims)),
                None => println!("Signed in"),
            }
            Ok(())
        }
        SignInOutcome::Suppressed => bail!("sign-in attempt suppressed, try again shortly"),
    }
}
