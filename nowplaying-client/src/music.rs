//! "Current music" refresh for the post composer
//!
//! Decides whether a lookup should run at all, then drives one
//! [`JobPoller::run`] against the music field.

use std::sync::Arc;
use tracing::{debug, error};

use nowplaying_core::dto::job::SubmitParams;

use crate::poller::{JobPoller, PollerError, SessionEnd};
use crate::sink::{ErrorSink, MusicField};

/// What caused the refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Automatic refresh when the composer opens
    PageInit,
    /// The author asked for a refresh
    Manual,
}

/// Result of a refresh attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No lookup was started
    Skipped(SkipReason),
    /// A lookup ran to the end
    Finished(SessionEnd),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No Last.fm user is configured
    NoUser,
    /// The field already holds text and this is the page-init refresh
    FieldFilled,
}

/// Refreshes the music field from the lookup job
pub async fn refresh_current_music(
    poller: &JobPoller,
    user: Option<&str>,
    field: Arc<MusicField>,
    errors: Option<Arc<dyn ErrorSink>>,
    trigger: Trigger,
) -> Result<RefreshOutcome, PollerError> {
    let Some(user) = user.map(str::trim).filter(|u| !u.is_empty()) else {
        error!("No last.fm user");
        return Ok(RefreshOutcome::Skipped(SkipReason::NoUser));
    };

    if !field.should_refresh(trigger == Trigger::PageInit) {
        debug!("Music field already filled, keeping it");
        return Ok(RefreshOutcome::Skipped(SkipReason::FieldFilled));
    }

    let end = poller
        .run(&SubmitParams::for_user(user), field, errors)
        .await?;

    Ok(RefreshOutcome::Finished(end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JobClient;
    use crate::sink::LoadingMode;
    use nowplaying_core::domain::job::JobOutcome;
    use std::time::Duration;

    fn unreachable_poller() -> JobPoller {
        // nothing listens here; tests using it must never submit
        JobPoller::new(Arc::new(JobClient::new(
            "http://127.0.0.1:9/submit",
            "http://127.0.0.1:9/status",
        )))
    }

    #[tokio::test]
    async fn test_missing_user_skips() {
        let field = Arc::new(MusicField::new(LoadingMode::Post));

        for user in [None, Some(""), Some("   ")] {
            let outcome = refresh_current_music(
                &unreachable_poller(),
                user,
                field.clone(),
                None,
                Trigger::Manual,
            )
            .await
            .unwrap();
            assert_eq!(outcome, RefreshOutcome::Skipped(SkipReason::NoUser));
        }

        assert_eq!(field.writes(), 0);
    }

    #[tokio::test]
    async fn test_filled_field_is_kept_on_init() {
        let field = Arc::new(MusicField::with_value(LoadingMode::Post, "Live set"));

        let outcome = refresh_current_music(
            &unreachable_poller(),
            Some("alice"),
            field.clone(),
            None,
            Trigger::PageInit,
        )
        .await
        .unwrap();

        assert_eq!(outcome, RefreshOutcome::Skipped(SkipReason::FieldFilled));
        assert_eq!(field.value(), "Live set");
    }

    #[tokio::test]
    async fn test_manual_refresh_overwrites_field() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/jobsubmit")
            .match_body(mockito::Matcher::UrlEncoded("username".into(), "alice".into()))
            .with_status(200)
            .with_body(r#"{"handle":"job-7"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/jobstatus")
            .match_query(mockito::Matcher::UrlEncoded("handle".into(), "job-7".into()))
            .with_status(200)
            .with_body(r#"{"status":"success","result":"{\"data\":\"Artist - Title\"}"}"#)
            .create_async()
            .await;

        let client = JobClient::new(
            format!("{}/jobsubmit", server.url()),
            format!("{}/jobstatus", server.url()),
        );
        let poller = JobPoller::new(Arc::new(client)).with_interval(Duration::from_millis(10));
        let field = Arc::new(MusicField::with_value(LoadingMode::Post, "Live set"));

        let outcome = refresh_current_music(&poller, Some("alice"), field.clone(), None, Trigger::Manual)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RefreshOutcome::Finished(SessionEnd::Completed(JobOutcome::Success(
                "Artist - Title".to_string()
            )))
        );
        assert_eq!(field.value(), "Artist - Title");
    }
}
