//! Input affordances: what the user may type into, and where.
//!
//! There is always one primary input. After a successful exchange a single
//! follow-up input becomes live next to the newest reply; it is consumed by
//! its first submission and replaced whenever a newer one opens. At most one
//! follow-up is live at a time.

use ethica_types::event::FollowUpId;

/// Which input a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Primary,
    FollowUp(FollowUpId),
}

/// Where input focus should be after an exchange settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Primary,
    FollowUp(FollowUpId),
}

/// Submit/processing flags, the live follow-up, and focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputAffordances {
    submit_enabled: bool,
    processing: bool,
    follow_up: Option<FollowUpId>,
    next_id: u64,
    focus: Focus,
}

impl Default for InputAffordances {
    fn default() -> Self {
        Self {
            submit_enabled: true,
            processing: false,
            follow_up: None,
            next_id: 1,
            focus: Focus::Primary,
        }
    }
}

impl InputAffordances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn processing(&self) -> bool {
        self.processing
    }

    pub fn follow_up(&self) -> Option<FollowUpId> {
        self.follow_up
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Whether `id` is the live follow-up.
    pub fn is_live(&self, id: FollowUpId) -> bool {
        self.follow_up == Some(id)
    }

    /// Open a fresh follow-up, discarding any live one.
    ///
    /// Returns the new id and the id that was discarded, if any.
    pub fn open_follow_up(&mut self) -> (FollowUpId, Option<FollowUpId>) {
        let id = FollowUpId(self.next_id);
        self.next_id += 1;
        let discarded = self.follow_up.replace(id);
        (id, discarded)
    }

    /// Consume the follow-up `id`. Returns false if it was not live.
    pub fn take_follow_up(&mut self, id: FollowUpId) -> bool {
        if self.is_live(id) {
            self.follow_up = None;
            if self.focus == Focus::FollowUp(id) {
                self.focus = Focus::Primary;
            }
            true
        } else {
            false
        }
    }

    /// Drop any live follow-up and return focus to the primary input.
    pub fn clear_all(&mut self) -> Option<FollowUpId> {
        self.focus = Focus::Primary;
        self.follow_up.take()
    }

    /// Disable submission while an exchange is in flight.
    pub fn begin_sending(&mut self) {
        self.submit_enabled = false;
        self.processing = true;
    }

    /// Re-enable submission and move focus to the newest live input.
    pub fn settle(&mut self) {
        self.submit_enabled = true;
        self.processing = false;
        self.focus = match self.follow_up {
            Some(id) => Focus::FollowUp(id),
            None => Focus::Primary,
        };
    }
}
