//! Submission listing, details and review

use super::{LONG_TIMEOUT, ModerationApi, Outcome, SHORT_TIMEOUT};
use crate::client::{Envelope, RequestDescriptor};
use crate::error::ClientError;
use crate::types::{
    CulinaryTip, PostComment, Recipe, Status, Submission, SubmissionType, Submissions,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Which submissions to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionFilter {
    /// Awaiting review
    Pending,
    /// Already approved or rejected
    History,
}

impl SubmissionFilter {
    /// Values for the repeated `status` query parameter
    pub fn statuses(self) -> &'static [&'static str] {
        match self {
            Self::Pending => &["pending"],
            Self::History => &["approved", "rejected"],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateSubmissionRequest<'a> {
    post_id: &'a str,
    status: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin_comment: Option<&'a str>,
}

/// Check a review decision before anything is sent
pub fn validate_review(
    current: Status,
    target: Status,
    comment: Option<&str>,
) -> Result<(), ClientError> {
    if current == target {
        return Err(ClientError::Validation("cannot use the same status".into()));
    }
    if !current.review_targets().contains(&target) {
        return Err(ClientError::Validation(format!(
            "a {current} submission cannot be moved to {target}"
        )));
    }
    if target == Status::Rejected && comment.is_none_or(|c| c.trim().is_empty()) {
        return Err(ClientError::Validation(
            "rejecting a submission requires a comment".into(),
        ));
    }
    Ok(())
}

fn detail<T: DeserializeOwned>(envelope: Envelope) -> Result<Option<T>, ClientError> {
    if envelope.is_failure_marker() {
        debug!("Resource not found");
        return Ok(None);
    }
    envelope.into_typed().map(Some)
}

impl ModerationApi {
    /// List recipes and tips matching the filter
    pub async fn list_submissions(
        &self,
        filter: SubmissionFilter,
    ) -> Result<Outcome<Submissions>, ClientError> {
        let descriptor = filter
            .statuses()
            .iter()
            .fold(RequestDescriptor::get("admin/submissions"), |d, status| {
                d.query("status", *status)
            })
            .with_timeout(LONG_TIMEOUT);

        match self.run(descriptor).await? {
            Outcome::Done(envelope) => Ok(Outcome::Done(envelope.into_typed()?)),
            Outcome::SessionEnded => Ok(Outcome::SessionEnded),
        }
    }

    /// Fetch one post; `None` when the backend reports it missing
    pub async fn post_details(
        &self,
        kind: SubmissionType,
        id: &str,
    ) -> Result<Outcome<Option<Submission>>, ClientError> {
        let descriptor =
            RequestDescriptor::get(format!("content/post/{}/{id}", kind.detail_segment()))
                .with_timeout(SHORT_TIMEOUT);

        let envelope = match self.run(descriptor).await? {
            Outcome::Done(envelope) => envelope,
            Outcome::SessionEnded => return Ok(Outcome::SessionEnded),
        };

        let submission = match kind {
            SubmissionType::Recipe => detail::<Recipe>(envelope)?.map(Submission::Recipe),
            SubmissionType::CulinaryTip => {
                detail::<CulinaryTip>(envelope)?.map(Submission::CulinaryTip)
            }
        };
        Ok(Outcome::Done(submission))
    }

    pub async fn recipe_details(&self, id: &str) -> Result<Outcome<Option<Recipe>>, ClientError> {
        Ok(self
            .post_details(SubmissionType::Recipe, id)
            .await?
            .map(|submission| match submission {
                Some(Submission::Recipe(recipe)) => Some(recipe),
                _ => None,
            }))
    }

    pub async fn tip_details(
        &self,
        id: &str,
    ) -> Result<Outcome<Option<CulinaryTip>>, ClientError> {
        Ok(self
            .post_details(SubmissionType::CulinaryTip, id)
            .await?
            .map(|submission| match submission {
                Some(Submission::CulinaryTip(tip)) => Some(tip),
                _ => None,
            }))
    }

    /// Fetch one comment; `None` when the backend reports it missing
    pub async fn comment_details(
        &self,
        post_id: &str,
        comment_id: &str,
    ) -> Result<Outcome<Option<PostComment>>, ClientError> {
        let descriptor = RequestDescriptor::get(format!("content/comments/{post_id}/{comment_id}"))
            .with_timeout(SHORT_TIMEOUT);

        match self.run(descriptor).await? {
            Outcome::Done(envelope) => Ok(Outcome::Done(detail(envelope)?)),
            Outcome::SessionEnded => Ok(Outcome::SessionEnded),
        }
    }

    /// Move a submission to a new status
    pub async fn update_submission(
        &self,
        submission: &Submission,
        status: Status,
        comment: Option<&str>,
    ) -> Result<Outcome<()>, ClientError> {
        validate_review(submission.status(), status, comment)?;

        let body = serde_json::to_value(UpdateSubmissionRequest {
            post_id: submission.id(),
            status: status.code(),
            admin_comment: comment,
        })?;
        let descriptor = RequestDescriptor::put(
            format!("admin/status/{}", submission.kind().as_str()),
            body,
        )
        .with_timeout(LONG_TIMEOUT);

        Ok(self.run(descriptor).await?.map(|_| ()))
    }
}
