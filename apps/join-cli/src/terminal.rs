//! Terminal stand-ins for the page's notification area and router.

use std::sync::Mutex;

use colored::*;
use orgjoin_invites::{
    ActionOutcome, Controls, IgnoredReason, InviteView, Navigator, NotificationCategory, Notifier,
};

pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, category: NotificationCategory, message: &str) {
        let line = match category {
            NotificationCategory::Error => format!("✗ {message}").red().bold(),
            NotificationCategory::Success => format!("✓ {message}").green(),
            NotificationCategory::Info => message.normal(),
        };
        eprintln!("{line}");
    }
}

/// Records where the flow navigated so the caller can report it.
#[derive(Default)]
pub struct TerminalNavigator {
    visited: Mutex<Vec<String>>,
}

impl TerminalNavigator {
    pub fn last(&self) -> Option<String> {
        self.visited
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) {
        println!("→ {} {}", "navigating to".dimmed(), path.cyan());
        self.visited
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(path.to_string());
    }
}

pub fn render(view: &InviteView) -> Vec<String> {
    let mut lines = vec![view.greeting.dimmed().to_string()];

    if let Some(invitation) = &view.invitation {
        lines.push(invitation.bold().to_string());
    }

    if let Some(banner) = view.banner {
        lines.push(format!("{} {}", "⚠".yellow(), banner.yellow()));
    }

    match &view.controls {
        Controls::None => {}
        Controls::SignIn(link) => {
            lines.push(format!("{} {}", "Sign in:".bold(), link.href.cyan()));
        }
        Controls::JoinOrDecline { submitting } => {
            let join = if *submitting {
                "Joining…".to_string()
            } else {
                "Join this organization".to_string()
            };
            lines.push(format!("[{}]  [{}]", join.green(), "Decline".red()));
        }
    }

    lines
}

pub fn describe_ignored(reason: IgnoredReason) -> String {
    match reason {
        IgnoredReason::NotActionable(state) => {
            format!("invite cannot be acted on in its current state ({state:?})")
        }
        IgnoredReason::AlreadySubmitting => "another action is already in progress".to_string(),
        IgnoredReason::MissingInviteId => "invite id is unknown, cannot decline".to_string(),
    }
}

pub fn summarize(outcome: &ActionOutcome) -> String {
    match outcome {
        ActionOutcome::Navigated { path } => format!("done, landed on {path}"),
        ActionOutcome::Failed { message } => message.clone(),
        ActionOutcome::Ignored(reason) => describe_ignored(*reason),
    }
}
