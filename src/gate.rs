//! Safety gates evaluated strictly before any mutation.
//!
//! Two risks are gated behind a synchronous yes/no prompt: pulls that would
//! mass-delete local notebooks, and pushes that target the production
//! folder. Declining aborts the run with both stores untouched. A
//! non-interactive caller has no way to answer, so it must pass the
//! explicit override (push) or stay under the threshold (pull).

use crate::branch::BranchContext;
use crate::diff::Comparison;
use crate::error::SyncError;
use dialoguer::Confirm;
use tracing::warn;

/// Synchronous yes/no confirmation. Injected so tests can script answers.
pub trait Prompt {
    fn confirm(&self, message: &str) -> Result<bool, SyncError>;
}

/// Interactive prompt on the controlling terminal.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> Result<bool, SyncError> {
        Confirm::new()
            .with_prompt(message)
            .interact()
            .map_err(|e| SyncError::Config(format!("failed to read confirmation: {}", e)))
    }
}

/// Gate a pull: refuse empty sources, confirm mass deletions.
pub fn check_pull(
    cmp: &Comparison,
    delete_confirm_threshold: usize,
    prompt: &dyn Prompt,
) -> Result<(), SyncError> {
    if cmp.only_remote.is_empty() && cmp.in_both.is_empty() {
        return Err(SyncError::EmptySource(
            "the workspace has no notebooks for this branch, nothing to pull".to_string(),
        ));
    }
    if cmp.only_local.len() > delete_confirm_threshold {
        let listing = cmp
            .only_local
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        warn!(count = cmp.only_local.len(), "pull will delete local notebooks");
        let message = format!(
            "About to delete {} local notebooks that are not in the workspace ({}). \
             Are you sure this is what you want?",
            cmp.only_local.len(),
            listing
        );
        if !prompt.confirm(&message)? {
            return Err(SyncError::Aborted);
        }
    }
    Ok(())
}

/// Gate a push: refuse empty sources, confirm production targets unless the
/// override flag was supplied.
pub fn check_push(
    cmp: &Comparison,
    ctx: &BranchContext,
    force: bool,
    prompt: &dyn Prompt,
) -> Result<(), SyncError> {
    if cmp.only_local.is_empty() && cmp.in_both.is_empty() {
        return Err(SyncError::EmptySource(
            "there are no local notebooks, nothing to push".to_string(),
        ));
    }
    if ctx.is_production() && !force {
        let message = format!(
            "Branch '{}' targets the production workspace folder. \
             Are you sure you want to push to production?",
            ctx.branch
        );
        if !prompt.confirm(&message)? {
            return Err(SyncError::Aborted);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compare;
    use crate::listing::TreeSnapshot;
    use crate::paths::NotebookPath;
    use std::sync::Mutex;

    /// Scripted prompt that records every message it is asked.
    struct Scripted {
        answer: bool,
        asked: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(answer: bool) -> Self {
            Self {
                answer,
                asked: Mutex::new(Vec::new()),
            }
        }

        fn asked_count(&self) -> usize {
            self.asked.lock().unwrap().len()
        }
    }

    impl Prompt for Scripted {
        fn confirm(&self, message: &str) -> Result<bool, SyncError> {
            self.asked.lock().unwrap().push(message.to_string());
            Ok(self.answer)
        }
    }

    fn snapshot(paths: &[&str]) -> TreeSnapshot {
        paths.iter().map(|p| NotebookPath::new(*p)).collect()
    }

    fn env() -> NotebookPath {
        NotebookPath::new("_functions/env")
    }

    #[test]
    fn empty_pull_source_fails_before_any_prompt() {
        let cmp = compare(&snapshot(&["a"]), &snapshot(&[]), &env());
        let prompt = Scripted::new(true);
        let err = check_pull(&cmp, 10, &prompt).unwrap_err();
        assert!(matches!(err, SyncError::EmptySource(_)));
        assert_eq!(prompt.asked_count(), 0);
    }

    #[test]
    fn pull_under_threshold_does_not_prompt() {
        let cmp = compare(&snapshot(&["a", "b"]), &snapshot(&["c"]), &env());
        let prompt = Scripted::new(false);
        check_pull(&cmp, 10, &prompt).unwrap();
        assert_eq!(prompt.asked_count(), 0);
    }

    #[test]
    fn pull_over_threshold_prompts_and_lists_paths() {
        let local: Vec<String> = (0..11).map(|i| format!("old/nb{:02}", i)).collect();
        let local_refs: Vec<&str> = local.iter().map(String::as_str).collect();
        let cmp = compare(&snapshot(&local_refs), &snapshot(&["keep"]), &env());

        let prompt = Scripted::new(true);
        check_pull(&cmp, 10, &prompt).unwrap();
        assert_eq!(prompt.asked_count(), 1);
        let message = prompt.asked.lock().unwrap()[0].clone();
        assert!(message.contains("11"));
        assert!(message.contains("old/nb00"));
        assert!(message.contains("old/nb10"));
    }

    #[test]
    fn declined_pull_confirmation_aborts() {
        let local: Vec<String> = (0..11).map(|i| format!("old/nb{:02}", i)).collect();
        let local_refs: Vec<&str> = local.iter().map(String::as_str).collect();
        let cmp = compare(&snapshot(&local_refs), &snapshot(&["keep"]), &env());

        let err = check_pull(&cmp, 10, &Scripted::new(false)).unwrap_err();
        assert!(matches!(err, SyncError::Aborted));
    }

    fn prod_ctx() -> BranchContext {
        BranchContext {
            branch: "main".to_string(),
            class: crate::branch::BranchClass::Production,
            remote_base: "/teams/prod/".to_string(),
        }
    }

    fn feature_ctx() -> BranchContext {
        BranchContext {
            branch: "feature/x".to_string(),
            class: crate::branch::BranchClass::Feature,
            remote_base: "/teams/branches/feature/x/".to_string(),
        }
    }

    #[test]
    fn empty_push_source_fails() {
        let cmp = compare(&snapshot(&[]), &snapshot(&["a"]), &env());
        let err = check_push(&cmp, &feature_ctx(), false, &Scripted::new(true)).unwrap_err();
        assert!(matches!(err, SyncError::EmptySource(_)));
    }

    #[test]
    fn production_push_requires_confirmation() {
        let cmp = compare(&snapshot(&["a"]), &snapshot(&[]), &env());
        let prompt = Scripted::new(false);
        let err = check_push(&cmp, &prod_ctx(), false, &prompt).unwrap_err();
        assert!(matches!(err, SyncError::Aborted));
        assert_eq!(prompt.asked_count(), 1);
    }

    #[test]
    fn force_bypasses_production_confirmation() {
        let cmp = compare(&snapshot(&["a"]), &snapshot(&[]), &env());
        let prompt = Scripted::new(false);
        check_push(&cmp, &prod_ctx(), true, &prompt).unwrap();
        assert_eq!(prompt.asked_count(), 0);
    }

    #[test]
    fn feature_push_does_not_prompt() {
        let cmp = compare(&snapshot(&["a"]), &snapshot(&[]), &env());
        let prompt = Scripted::new(false);
        check_push(&cmp, &feature_ctx(), false, &prompt).unwrap();
        assert_eq!(prompt.asked_count(), 0);
    }
}
