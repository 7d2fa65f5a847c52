//! Reported content and report dismissal

use super::{LONG_TIMEOUT, ModerationApi, Outcome, SHORT_TIMEOUT};
use crate::client::RequestDescriptor;
use crate::error::ClientError;
use crate::types::{ReportedContent, SubmissionType};
use arc_swap::ArcSwapOption;
use std::sync::Arc;
use tracing::{debug, warn};

const REPORTED_PATH: &str = "content/reported";

impl ModerationApi {
    /// Fetch every open report
    pub async fn reported_content(&self) -> Result<Outcome<Vec<ReportedContent>>, ClientError> {
        let descriptor = RequestDescriptor::get(REPORTED_PATH).with_timeout(SHORT_TIMEOUT);
        match self.run(descriptor).await? {
            Outcome::Done(envelope) => Ok(Outcome::Done(envelope.into_typed()?)),
            Outcome::SessionEnded => Ok(Outcome::SessionEnded),
        }
    }

    /// Close a report without acting on the post; an empty id does nothing
    pub async fn dismiss_report(&self, report_id: &str) -> Result<Outcome<()>, ClientError> {
        if report_id.is_empty() {
            debug!("Ignoring dismissal without report id");
            return Ok(Outcome::Done(()));
        }

        let descriptor =
            RequestDescriptor::delete(format!("admin/report/{report_id}")).with_timeout(LONG_TIMEOUT);
        Ok(self.run(descriptor).await?.map(|_| ()))
    }
}

/// Reports grouped the way moderators triage them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportedTabs {
    pub recipes: Vec<ReportedContent>,
    pub culinary_tips: Vec<ReportedContent>,
    pub comments: Vec<ReportedContent>,
}

impl ReportedTabs {
    /// Comment reports go to their own tab regardless of post type
    pub fn partition(reports: &[ReportedContent]) -> Self {
        let mut tabs = Self::default();
        for report in reports {
            let tab = if report.targets_comment() {
                &mut tabs.comments
            } else {
                match report.post_type {
                    SubmissionType::Recipe => &mut tabs.recipes,
                    SubmissionType::CulinaryTip => &mut tabs.culinary_tips,
                }
            };
            tab.push(report.clone());
        }
        tabs
    }
}

/// Stale-while-revalidate view of the reported feed
///
/// `current` hands out the last good listing without touching the network.
/// `get` always revalidates and falls back to that listing when the fetch
/// fails. A terminated session drops it.
pub struct ReportedFeed {
    api: ModerationApi,
    cached: ArcSwapOption<Vec<ReportedContent>>,
}

impl ReportedFeed {
    pub fn new(api: ModerationApi) -> Self {
        Self {
            api,
            cached: ArcSwapOption::empty(),
        }
    }

    /// Last fetched listing, if any
    pub fn current(&self) -> Option<Arc<Vec<ReportedContent>>> {
        self.cached.load_full()
    }

    /// Refetch and publish the listing
    pub async fn revalidate(&self) -> Result<Outcome<Arc<Vec<ReportedContent>>>, ClientError> {
        match self.api.reported_content().await {
            Ok(Outcome::Done(reports)) => {
                let reports = Arc::new(reports);
                self.cached.store(Some(reports.clone()));
                debug!(count = reports.len(), "Reported feed revalidated");
                Ok(Outcome::Done(reports))
            }
            Ok(Outcome::SessionEnded) => {
                self.cached.store(None);
                Ok(Outcome::SessionEnded)
            }
            Err(error) => {
                warn!(%error, "Reported feed revalidation failed, keeping stale data");
                Err(error)
            }
        }
    }

    /// Fresh listing, or the stale one when revalidation fails
    pub async fn get(&self) -> Result<Outcome<Arc<Vec<ReportedContent>>>, ClientError> {
        match self.revalidate().await {
            Err(error) => match self.current() {
                Some(stale) => {
                    debug!(count = stale.len(), "Serving stale reported feed");
                    Ok(Outcome::Done(stale))
                }
                None => Err(error),
            },
            fresh => fresh,
        }
    }
}
