// src/cli/progress.rs — Terminal progress renderer for batch runs

use crate::core::types::BatchEvent;

/// Format one event as a progress line. `None` hides the event.
///
/// `quiet` keeps only plan, batch-level and completion lines.
pub fn format_event(event: &BatchEvent, quiet: bool) -> Option<String> {
    match event {
        BatchEvent::Plan {
            total,
            already_processed,
            remaining,
        } => Some(format!(
            "[plan] total={} already_processed={} remaining={}",
            total, already_processed, remaining
        )),
        BatchEvent::BatchStart {
            batch,
            batches,
            size,
        } => Some(format!(
            "[batch {}/{}] processing {} session(s)",
            batch, batches, size
        )),
        BatchEvent::SessionStart {
            position,
            total,
            session_id,
        } if !quiet => Some(format!("[{}/{}] analyzing {}", position, total, session_id)),
        BatchEvent::Escalated {
            session_id,
            from,
            to,
        } if !quiet => Some(format!(
            "[escalate] {} {} -> {}",
            session_id, from, to
        )),
        BatchEvent::SessionFailed {
            session_id,
            message,
        } => Some(format!("[error] {}: {}", session_id, message)),
        BatchEvent::SessionDone {
            session_id,
            model_used,
            quality_score,
        } if !quiet => Some(format!(
            "[session] {} score={} model={}",
            session_id,
            quality_score.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
            model_used
        )),
        BatchEvent::BatchSaved {
            batch,
            processed,
            total,
        } => Some(format!(
            "[saved] batch {} ({}/{} completed)",
            batch, processed, total
        )),
        BatchEvent::Complete(summary) => Some(format!(
            "[done] attempted={} escalated={} failed={} batches={}",
            summary.attempted, summary.escalated, summary.failed, summary.batches
        )),
        _ => None,
    }
}

/// Build a progress callback that writes formatted output to stderr.
///
/// Progress goes to stderr so stdout stays clean for exports.
pub fn terminal_progress(quiet: bool) -> impl Fn(BatchEvent) + Send + 'static {
    move |event| {
        if let Some(line) = format_event(&event, quiet) {
            eprintln!("{}", line);
        }
    }
}
