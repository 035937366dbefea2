//! Submission operations: create, edit, status, owners, listing,
//! aggregation and export.

use serde_json::Value;
use tracing::{info, warn};

use crate::client::{endpoint, report, str_field, ClappiaClient};
use crate::error::ClientError;
use crate::http::Transport;
use crate::request::{
    AggregationQuery, CreateSubmissionRequest, EditSubmissionRequest, ExportOptions,
    ExportSubmissionsRequest, GetSubmissionsAggregationRequest, GetSubmissionsRequest,
    SubmissionQuery, UpdateSubmissionOwnersRequest, UpdateSubmissionStatusRequest,
};
use crate::response::{
    Operation, Outcome, SubmissionResponse, SubmissionsAggregationResponse,
    SubmissionsExportResponse, SubmissionsMetadata, SubmissionsResponse,
};

/// Number of submissions in a listing reply.
///
/// Looks for a `submissions` or `data` array, then a bare array.
pub fn returned_count(body: &Value) -> usize {
    ["submissions", "data"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_array))
        .or_else(|| body.as_array())
        .map_or(0, Vec::len)
}

fn trimmed(value: &str) -> Option<String> {
    Some(value.trim().to_string())
}

impl<T: Transport> ClappiaClient<T> {
    fn submission_failure(
        &self,
        operation: Operation,
        err: ClientError,
        app_id: &str,
        submission_id: Option<&str>,
    ) -> SubmissionResponse {
        SubmissionResponse {
            outcome: Outcome::failed(&report(operation.as_str(), err)),
            app_id: trimmed(app_id),
            submission_id: submission_id.and_then(trimmed),
            operation,
        }
    }

    /// Create a submission from field-name → value data.
    pub fn create_submission(
        &self,
        app_id: &str,
        requester: &str,
        data: Value,
    ) -> SubmissionResponse {
        self.try_create_submission(app_id, requester, data)
            .unwrap_or_else(|err| {
                self.submission_failure(Operation::CreateSubmission, err, app_id, None)
            })
    }

    fn try_create_submission(
        &self,
        app_id: &str,
        requester: &str,
        data: Value,
    ) -> Result<SubmissionResponse, ClientError> {
        let request = CreateSubmissionRequest::new(app_id, requester, data)?;
        self.ensure_configured()?;

        let body = self.post(
            endpoint::CREATE_SUBMISSION,
            &request.to_payload(self.workplace_id()),
        )?;
        let submission_id = str_field(&body, "submissionId");
        info!(app_id = %request.app_id, submission_id = ?submission_id, "Submission created");

        Ok(SubmissionResponse {
            outcome: Outcome::ok(
                format!("Successfully created submission in app {}", request.app_id),
                Some(body),
            ),
            app_id: Some(request.app_id.to_string()),
            submission_id,
            operation: Operation::CreateSubmission,
        })
    }

    /// Overwrite the given fields of an existing submission.
    pub fn edit_submission(
        &self,
        app_id: &str,
        submission_id: &str,
        requester: &str,
        data: Value,
    ) -> SubmissionResponse {
        self.try_edit_submission(app_id, submission_id, requester, data)
            .unwrap_or_else(|err| {
                self.submission_failure(Operation::EditSubmission, err, app_id, Some(submission_id))
            })
    }

    fn try_edit_submission(
        &self,
        app_id: &str,
        submission_id: &str,
        requester: &str,
        data: Value,
    ) -> Result<SubmissionResponse, ClientError> {
        let request = EditSubmissionRequest::new(app_id, submission_id, requester, data)?;
        self.ensure_configured()?;

        let body = self.post(
            endpoint::EDIT_SUBMISSION,
            &request.to_payload(self.workplace_id()),
        )?;
        info!(
            app_id = %request.app_id,
            submission_id = %request.submission_id,
            "Submission edited"
        );

        Ok(SubmissionResponse {
            outcome: Outcome::ok(
                format!("Successfully edited submission {}", request.submission_id),
                Some(body),
            ),
            app_id: Some(request.app_id.to_string()),
            submission_id: Some(request.submission_id.to_string()),
            operation: Operation::EditSubmission,
        })
    }

    /// Move a submission to the named workflow status.
    pub fn update_submission_status(
        &self,
        app_id: &str,
        submission_id: &str,
        requester: &str,
        status_name: &str,
        comments: Option<&str>,
    ) -> SubmissionResponse {
        self.try_update_submission_status(app_id, submission_id, requester, status_name, comments)
            .unwrap_or_else(|err| {
                self.submission_failure(Operation::UpdateStatus, err, app_id, Some(submission_id))
            })
    }

    fn try_update_submission_status(
        &self,
        app_id: &str,
        submission_id: &str,
        requester: &str,
        status_name: &str,
        comments: Option<&str>,
    ) -> Result<SubmissionResponse, ClientError> {
        let request = UpdateSubmissionStatusRequest::new(
            app_id,
            submission_id,
            requester,
            status_name,
            comments,
        )?;
        self.ensure_configured()?;

        let body = self.post(endpoint::UPDATE_STATUS, &request.to_payload(self.workplace_id()))?;
        info!(
            submission_id = %request.submission_id,
            status = request.status_name(),
            "Submission status updated"
        );

        Ok(SubmissionResponse {
            outcome: Outcome::ok(
                format!(
                    "Successfully updated status of submission {} to '{}'",
                    request.submission_id,
                    request.status_name()
                ),
                Some(body),
            ),
            app_id: Some(request.app_id.to_string()),
            submission_id: Some(request.submission_id.to_string()),
            operation: Operation::UpdateStatus,
        })
    }

    /// Replace a submission's owners.
    ///
    /// Invalid addresses are skipped and named in the message; the call
    /// fails only when none of them is valid.
    pub fn update_submission_owners<S: AsRef<str>>(
        &self,
        app_id: &str,
        submission_id: &str,
        requester: &str,
        email_ids: &[S],
    ) -> SubmissionResponse {
        self.try_update_submission_owners(app_id, submission_id, requester, email_ids)
            .unwrap_or_else(|err| {
                self.submission_failure(Operation::UpdateOwners, err, app_id, Some(submission_id))
            })
    }

    fn try_update_submission_owners<S: AsRef<str>>(
        &self,
        app_id: &str,
        submission_id: &str,
        requester: &str,
        email_ids: &[S],
    ) -> Result<SubmissionResponse, ClientError> {
        let request =
            UpdateSubmissionOwnersRequest::new(app_id, submission_id, requester, email_ids)?;
        if !request.skipped().is_empty() {
            warn!(skipped = ?request.skipped(), "Some emails were invalid and skipped");
        }
        self.ensure_configured()?;

        let body = self.post(endpoint::UPDATE_OWNERS, &request.to_payload(self.workplace_id()))?;
        info!(
            submission_id = %request.submission_id,
            owners = request.owners().len(),
            "Submission owners updated"
        );

        let mut message = format!(
            "Successfully updated owners of submission {} ({} owner(s))",
            request.submission_id,
            request.owners().len()
        );
        if !request.skipped().is_empty() {
            message.push_str(&format!(
                ". Some emails were invalid and skipped: {:?}",
                request.skipped()
            ));
        }

        Ok(SubmissionResponse {
            outcome: Outcome::ok(message, Some(body)),
            app_id: Some(request.app_id.to_string()),
            submission_id: Some(request.submission_id.to_string()),
            operation: Operation::UpdateOwners,
        })
    }

    /// List submissions, one page at a time.
    pub fn get_submissions(
        &self,
        app_id: &str,
        requester: &str,
        query: SubmissionQuery,
    ) -> SubmissionsResponse {
        self.try_get_submissions(app_id, requester, query)
            .unwrap_or_else(|err| SubmissionsResponse {
                outcome: Outcome::failed(&report("get_submissions", err)),
                app_id: trimmed(app_id),
                metadata: None,
            })
    }

    fn try_get_submissions(
        &self,
        app_id: &str,
        requester: &str,
        query: SubmissionQuery,
    ) -> Result<SubmissionsResponse, ClientError> {
        let request = GetSubmissionsRequest::new(app_id, requester, query)?;
        self.ensure_configured()?;

        let body = self.post(
            endpoint::GET_SUBMISSIONS,
            &request.to_payload(self.workplace_id()),
        )?;
        let metadata = SubmissionsMetadata {
            requested_page_size: request.query().page_size,
            returned_count: returned_count(&body),
            has_filters: request.query().filters.is_some(),
        };
        info!(app_id = %request.app_id, count = metadata.returned_count, "Retrieved submissions");

        Ok(SubmissionsResponse {
            outcome: Outcome::ok(
                format!("Retrieved {} submission(s)", metadata.returned_count),
                Some(body),
            ),
            app_id: Some(request.app_id.to_string()),
            metadata: Some(metadata),
        })
    }

    /// Group and aggregate submissions.
    pub fn get_submissions_aggregation(
        &self,
        app_id: &str,
        requester: &str,
        query: AggregationQuery,
    ) -> SubmissionsAggregationResponse {
        self.try_get_submissions_aggregation(app_id, requester, query)
            .unwrap_or_else(|err| SubmissionsAggregationResponse {
                outcome: Outcome::failed(&report("get_submissions_aggregation", err)),
                app_id: trimmed(app_id),
            })
    }

    fn try_get_submissions_aggregation(
        &self,
        app_id: &str,
        requester: &str,
        query: AggregationQuery,
    ) -> Result<SubmissionsAggregationResponse, ClientError> {
        let request = GetSubmissionsAggregationRequest::new(app_id, requester, query)?;
        self.ensure_configured()?;

        let body = self.post(
            endpoint::GET_AGGREGATION,
            &request.to_payload(self.workplace_id()),
        )?;
        info!(app_id = %request.app_id, "Retrieved submission aggregation");

        Ok(SubmissionsAggregationResponse {
            outcome: Outcome::ok("Successfully retrieved submission aggregation", Some(body)),
            app_id: Some(request.app_id.to_string()),
        })
    }

    /// Export submissions to a spreadsheet the server mails to the requester.
    pub fn export_submissions(
        &self,
        app_id: &str,
        requester: &str,
        options: ExportOptions,
    ) -> SubmissionsExportResponse {
        let format = options.format;
        self.try_export_submissions(app_id, requester, options)
            .unwrap_or_else(|err| SubmissionsExportResponse {
                outcome: Outcome::failed(&report("export_submissions", err)),
                app_id: trimmed(app_id),
                url: None,
                format: Some(format),
                requesting_user_email_address: trimmed(requester),
            })
    }

    fn try_export_submissions(
        &self,
        app_id: &str,
        requester: &str,
        options: ExportOptions,
    ) -> Result<SubmissionsExportResponse, ClientError> {
        let request = ExportSubmissionsRequest::new(app_id, requester, options)?;
        self.ensure_configured()?;

        let body = self.post(endpoint::EXPORT, &request.to_payload(self.workplace_id()))?;
        let url = str_field(&body, "url");
        info!(app_id = %request.app_id, format = %request.format(), "Submissions exported");

        Ok(SubmissionsExportResponse {
            outcome: Outcome::ok(
                format!(
                    "Successfully exported submissions as {}; sent to {}",
                    request.format(),
                    request.requester()
                ),
                Some(body),
            ),
            app_id: Some(request.app_id.to_string()),
            url,
            format: Some(request.format()),
            requesting_user_email_address: Some(request.requester().to_string()),
        })
    }
}
