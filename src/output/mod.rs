use rmcp::model::{CallToolResult, Content};

use crate::service::{ErrorKind, ErrorReport, TranscriptResponse};

/// Format a successful transcript as a markdown payload
pub fn format_transcript(title: &str, method: &str, transcript: &str) -> String {
    format!("# Transcript: {}\n\n**Method:** {}\n\n{}", title, method, transcript)
}

/// Format an error report as a human-readable message
pub fn format_error(report: &ErrorReport) -> String {
    match report.kind {
        ErrorKind::InvalidUrl => format!("Error: {}", report.message),
        _ => format!("Error fetching transcript: {}", report.message),
    }
}

/// Render a response as the text payload returned to callers
pub fn format_response(response: &TranscriptResponse) -> String {
    match response {
        TranscriptResponse::Success {
            title,
            transcript,
            method,
        } => format_transcript(title, method, transcript),
        TranscriptResponse::Error(report) => format_error(report),
    }
}

/// Convert a response into a tool result, flagging errors
pub fn to_call_tool_result(response: &TranscriptResponse) -> CallToolResult {
    let content = vec![Content::text(format_response(response))];
    if response.is_error() {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

/// Print a response for the command line; errors go to stderr
pub fn print_to_console(response: &TranscriptResponse) {
    if response.is_error() {
        eprintln!("{}", format_response(response));
    } else {
        println!("{}", format_response(response));
    }
}
