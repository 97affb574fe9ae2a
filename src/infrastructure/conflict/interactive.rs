//! Interactive overwrite confirmation
//!
//! Prompts on the terminal before an existing deployment is replaced.

use dialoguer::Select;
use parking_lot::Mutex;

use crate::domain::ports::{ConfirmContext, ConfirmOverwrite};

/// Answer for one prompt, or for every remaining prompt in this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Overwrite,
    Skip,
    OverwriteAll,
    SkipAll,
}

impl Answer {
    const CHOICES: [(&'static str, Answer); 4] = [
        ("overwrite", Answer::Overwrite),
        ("skip", Answer::Skip),
        ("overwrite all", Answer::OverwriteAll),
        ("skip all", Answer::SkipAll),
    ];

    fn sticky(self) -> Option<bool> {
        match self {
            Answer::OverwriteAll => Some(true),
            Answer::SkipAll => Some(false),
            _ => None,
        }
    }

    fn overwrite(self) -> bool {
        matches!(self, Answer::Overwrite | Answer::OverwriteAll)
    }
}

/// Terminal confirmation using `dialoguer`.
///
/// "overwrite all" / "skip all" are remembered for the rest of the run. A
/// prompt that can't be shown (no terminal, interrupted) counts as skip.
#[derive(Default)]
pub struct InteractiveConfirm {
    apply_all: Mutex<Option<bool>>,
}

impl InteractiveConfirm {
    pub fn new() -> Self {
        Self::default()
    }

    fn prompt(&self, context: &ConfirmContext) -> Answer {
        let items: Vec<&str> = Answer::CHOICES.iter().map(|(label, _)| *label).collect();
        let selection = Select::new()
            .with_prompt(format!(
                "{} already exists at {} ({})",
                context.artifact,
                context.destination.display(),
                context.profile_id
            ))
            .items(&items)
            .default(1)
            .interact_opt();

        match selection {
            Ok(Some(index)) => Answer::CHOICES
                .get(index)
                .map(|(_, answer)| *answer)
                .unwrap_or(Answer::Skip),
            Ok(None) => Answer::Skip,
            Err(e) => {
                tracing::warn!(error = %e, "confirmation prompt failed; skipping");
                Answer::Skip
            }
        }
    }
}

impl ConfirmOverwrite for InteractiveConfirm {
    fn confirm(&self, context: &ConfirmContext) -> bool {
        if let Some(remembered) = *self.apply_all.lock() {
            return remembered;
        }

        let answer = self.prompt(context);
        if let Some(sticky) = answer.sticky() {
            *self.apply_all.lock() = Some(sticky);
        }
        answer.overwrite()
    }
}
