//! The markup for the job list, as a pure function of the records.
use crate::InferenceRecord;

/// Escape text for use in element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			c => escaped.push(c),
		}
	}
	escaped
}

/// One `<li>` for the job list.
///
/// The entry carries the uuid in `data-uuid`; the close button is marked with `data-action="delete"`.
pub fn entry(record: &InferenceRecord, active: bool) -> String {
	let uuid = escape(&record.inference_uuid);
	let datetime = escape(&record.inference_datetime);
	let status = escape(record.status.as_str());
	let badge = record.status.badge().as_str();
	let active = if active { " active" } else { "" };

	format!(
		r#"<li class="btn btn-outline-light list-group-item d-flex justify-content-between align-items-center{active}" data-uuid="{uuid}">
	<button type="button" class="btn-close" aria-label="Close" data-action="delete"></button>
	<div class="ms-2 me-auto">
		<div class="fw-bold">Date: {datetime}</div>
		Inference ID: {uuid}
	</div>
	<span class="badge text-bg-{badge} rounded-pill">{status}</span>
</li>"#
	)
}

/// A dismissible notification.
pub fn alert(message: &str, kind: &str) -> String {
	format!(
		r#"<div class="alert alert-{kind} alert-dismissible" role="alert">
	<div>{}</div>
	<button type="button" class="btn-close" data-bs-dismiss="alert" aria-label="Close"></button>
</div>"#,
		escape(message)
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Status;

	fn record(uuid: &str, status: &str) -> InferenceRecord {
		InferenceRecord {
			inference_uuid: uuid.to_string(),
			inference_datetime: "2024-01-01T00:00:00Z".to_string(),
			status: Status::from(status),
		}
	}

	#[test]
	fn badges() {
		assert!(entry(&record("a1", "SUCCESS"), false).contains("text-bg-success rounded-pill\">SUCCESS<"));
		assert!(entry(&record("a1", "STARTED"), false).contains("text-bg-info"));
		assert!(entry(&record("a1", "FAILURE"), false).contains("text-bg-danger"));
		assert!(entry(&record("a1", "REVOKED"), false).contains("text-bg-danger rounded-pill\">REVOKED<"));
	}

	#[test]
	fn deterministic() {
		let a = record("a1", "SUCCESS");
		assert_eq!(entry(&a, false), entry(&a.clone(), false));
	}

	#[test]
	fn active() {
		assert!(entry(&record("a1", "SUCCESS"), true).contains("align-items-center active\" data-uuid=\"a1\""));
		assert!(!entry(&record("a1", "SUCCESS"), false).contains(" active"));
	}

	#[test]
	fn escaped() {
		let html = entry(&record("\"><script>", "<b>"), false);
		assert!(!html.contains("<script>"));
		assert!(html.contains("data-uuid=\"&quot;&gt;&lt;script&gt;\""));
		assert!(html.contains("&lt;b&gt;"));
	}

	#[test]
	fn alerts() {
		let html = alert("File uploaded successfully", "success");
		assert!(html.contains("alert-success alert-dismissible"));
		assert!(html.contains("<div>File uploaded successfully</div>"));
	}
}
