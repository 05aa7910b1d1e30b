use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Credentials for the one-shot auth handshake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

/// Announces an upload. No bytes follow until the server acks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub username: String,
    pub filename: String,
    pub size: u64,
}

/// Scopes a listing to the session identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRequest {
    pub username: String,
}

/// Targets a single file. Used by view, download, and delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRequest {
    pub username: String,
    pub filename: String,
}

// ---------------------------------------------------------------------------
// Status vocabularies
// ---------------------------------------------------------------------------

/// Auth outcome. Anything other than the wire string `"SUCCESS"` is a
/// uniform failure with no further detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Success,
    Failure,
}

impl Serialize for AuthStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AuthStatus::Success => serializer.serialize_str("SUCCESS"),
            AuthStatus::Failure => serializer.serialize_str("FAIL"),
        }
    }
}

impl<'de> Deserialize<'de> for AuthStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(if s == "SUCCESS" {
            AuthStatus::Success
        } else {
            AuthStatus::Failure
        })
    }
}

/// The only valid readiness acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ACK")]
    Ack,
}

/// Terminal upload result status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "EXISTS")]
    Exists,
    #[serde(rename = "FAIL")]
    Fail,
}

/// Preview result status. `Error` is not-found; `ErrorView` means the file
/// exists but cannot be previewed (binary or unsupported).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "Error")]
    NotFound,
    #[serde(rename = "ErrorView")]
    NotViewable,
}

/// Delete result status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAIL")]
    Fail,
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Result of the auth handshake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub status: AuthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Readiness acknowledgement (`ack_upload`, `ack_upload_completed`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckPayload {
    pub status: AckStatus,
}

/// Terminal upload result.
///
/// An absent `status` means success; the peer historically omitted it on the
/// happy path, so only `EXISTS` and `FAIL` abort the upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UploadStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    /// `true` unless the status names a rejection.
    pub fn is_success(&self) -> bool {
        !matches!(
            self.status,
            Some(UploadStatus::Exists) | Some(UploadStatus::Fail)
        )
    }
}

/// Full file listing for the session identity; replaces any prior listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileListPayload {
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Preview result: `data` on success, `message` on either error status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileViewPayload {
    pub status: ViewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Declared total size of a download. `size == 0` signals not-found and no
/// chunk stream follows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DownloadSize {
    pub size: u64,
}

/// One server→client download chunk, carried as a JSON byte array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDataPayload {
    pub data: Vec<u8>,
}

/// Delete result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub status: DeleteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_success_fixture() {
        // Exact shape the peer emits on success.
        let json = r#"{"status": "SUCCESS", "username": "alice"}"#;
        let resp: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, AuthStatus::Success);
        assert_eq!(resp.username.as_deref(), Some("alice"));
    }

    #[test]
    fn auth_any_other_status_is_failure() {
        let resp: AuthResponse = serde_json::from_str(r#"{"status": "FAIL"}"#).unwrap();
        assert_eq!(resp.status, AuthStatus::Failure);

        let resp: AuthResponse = serde_json::from_str(r#"{"status": "DENIED"}"#).unwrap();
        assert_eq!(resp.status, AuthStatus::Failure);
    }

    #[test]
    fn ack_fixture() {
        let ack: AckPayload = serde_json::from_str(r#"{"status": "ACK"}"#).unwrap();
        assert_eq!(ack.status, AckStatus::Ack);
    }

    #[test]
    fn ack_rejects_other_status() {
        assert!(serde_json::from_str::<AckPayload>(r#"{"status": "NAK"}"#).is_err());
    }

    #[test]
    fn upload_result_statuses() {
        let r: UploadResult = serde_json::from_str(r#"{"status": "SUCCESS"}"#).unwrap();
        assert!(r.is_success());

        let r: UploadResult =
            serde_json::from_str(r#"{"status": "EXISTS", "error": "already there"}"#).unwrap();
        assert!(!r.is_success());
        assert_eq!(r.error.as_deref(), Some("already there"));

        let r: UploadResult = serde_json::from_str(r#"{"status": "FAIL"}"#).unwrap();
        assert!(!r.is_success());
    }

    #[test]
    fn upload_result_absent_status_is_success() {
        let r: UploadResult = serde_json::from_str(r#"{"message": "stored"}"#).unwrap();
        assert!(r.is_success());
        assert_eq!(r.message.as_deref(), Some("stored"));
    }

    #[test]
    fn file_list_fixture() {
        let json = r#"{"files": ["a.txt", "b.bin"]}"#;
        let list: FileListPayload = serde_json::from_str(json).unwrap();
        assert_eq!(list.files, vec!["a.txt", "b.bin"]);
        assert!(list.error.is_none());
    }

    #[test]
    fn file_list_defaults_to_empty() {
        let list: FileListPayload = serde_json::from_str(r#"{"error": "hdfs down"}"#).unwrap();
        assert!(list.files.is_empty());
        assert_eq!(list.error.as_deref(), Some("hdfs down"));
    }

    #[test]
    fn view_status_wire_strings() {
        let v: FileViewPayload =
            serde_json::from_str(r#"{"status": "Error", "message": "no such file"}"#).unwrap();
        assert_eq!(v.status, ViewStatus::NotFound);

        let v: FileViewPayload =
            serde_json::from_str(r#"{"status": "ErrorView", "message": "binary file"}"#).unwrap();
        assert_eq!(v.status, ViewStatus::NotViewable);

        let v: FileViewPayload =
            serde_json::from_str(r#"{"status": "SUCCESS", "data": "first bytes"}"#).unwrap();
        assert_eq!(v.status, ViewStatus::Success);
        assert_eq!(v.data.as_deref(), Some("first bytes"));
    }

    #[test]
    fn download_size_zero_parses() {
        let s: DownloadSize = serde_json::from_str(r#"{"size": 0}"#).unwrap();
        assert_eq!(s.size, 0);
    }

    #[test]
    fn file_data_byte_array() {
        // Download chunks arrive as JSON number arrays.
        let d: FileDataPayload = serde_json::from_str(r#"{"data": [104, 105, 0, 255]}"#).unwrap();
        assert_eq!(d.data, vec![104, 105, 0, 255]);

        let json = serde_json::to_string(&FileDataPayload { data: vec![1, 2] }).unwrap();
        assert_eq!(json, r#"{"data":[1,2]}"#);
    }

    #[test]
    fn delete_result_fail_carries_error() {
        let json = r#"{"status": "FAIL", "error": "rm: no such file"}"#;
        let r: DeleteResult = serde_json::from_str(json).unwrap();
        assert_eq!(r.status, DeleteStatus::Fail);
        assert_eq!(r.error.as_deref(), Some("rm: no such file"));
    }

    #[test]
    fn requests_serialize_flat() {
        let req = UploadRequest {
            username: "alice".into(),
            filename: "a.txt".into(),
            size: 42,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(
            json,
            r#"{"username":"alice","filename":"a.txt","size":42}"#
        );

        let req = FileRequest {
            username: "alice".into(),
            filename: "a.txt".into(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"username":"alice","filename":"a.txt"}"#);
    }

    #[test]
    fn responses_omit_absent_fields() {
        let r = UploadResult {
            status: None,
            message: Some("ok".into()),
            error: None,
        };
        let json = serde_json::to_string(&r).unwrap();
        assert!(!json.contains("status"));
        assert!(!json.contains("error"));
    }
}
