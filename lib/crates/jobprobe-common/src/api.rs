/// Resource paths, relative to `{base_url}/{API_VERSION}/`.
pub mod paths {
    /// Fixed API version segment inserted between the base URL and every path.
    pub const API_VERSION: &str = "v3";

    pub const TOKENS: &str = "oauth2/tokens";
    pub const APPS: &str = "apps";
    pub const JOB_SUBMIT: &str = "jobs/submit";

    /// `apps/{id}/{version}` — canonical stored definition.
    #[must_use]
    pub fn app(id: &str, version: &str) -> String {
        format!("apps/{id}/{version}")
    }

    /// `apps/{id}/delete` or `apps/{id}/undelete`.
    #[must_use]
    pub fn app_delete_state(id: &str, delete: bool) -> String {
        format!("apps/{id}/{}", delete_action(delete))
    }

    /// Sub-path name for a delete-state transition.
    #[must_use]
    pub fn delete_action(delete: bool) -> &'static str {
        if delete { "delete" } else { "undelete" }
    }

    #[must_use]
    pub fn job_status(uuid: &str) -> String {
        format!("jobs/{uuid}/status")
    }

    #[must_use]
    pub fn job_cancel(uuid: &str) -> String {
        format!("jobs/{uuid}/cancel")
    }

    #[must_use]
    pub fn job_output_list(uuid: &str) -> String {
        format!("jobs/{uuid}/output/list/")
    }

    /// Output download as a single zip archive.
    #[must_use]
    pub fn job_output_download(uuid: &str) -> String {
        format!("jobs/{uuid}/output/download/?compress=true&format=zip")
    }
}

/// JSON pointers into response envelopes and definition documents.
pub mod pointers {
    pub const STATUS: &str = "/status";
    pub const ACCESS_TOKEN: &str = "/result/access_token/access_token";
    pub const JOB_UUID: &str = "/result/uuid";
    pub const JOB_STATUS: &str = "/result/status";
    pub const RECORD_COUNT: &str = "/metadata/recordCount";

    pub const DEFINITION_ID: &str = "/id";
    pub const DEFINITION_VERSION: &str = "/version";
    pub const JOB_NAME: &str = "/name";
}

/// Header names and values used by the platform.
pub mod headers {
    pub const TOKEN: &str = "X-Tapis-Token";
    pub const CONTENT_TYPE: &str = "Content-type";
    pub const JSON: &str = "application/json";
}

/// Validate an identifier before it is interpolated into a resource path.
///
/// Returns Ok(()) if valid, Err with description if invalid.
pub fn validate_path_segment(segment: &str) -> Result<(), &'static str> {
    if segment.is_empty() {
        return Err("identifier must not be empty");
    }
    if segment == "." || segment == ".." {
        return Err("identifier must not be a relative path component");
    }
    if segment
        .chars()
        .any(|c| c == '/' || c == '?' || c == '#' || c.is_whitespace() || c.is_control())
    {
        return Err("identifier must not contain '/', '?', '#' or whitespace");
    }
    Ok(())
}
