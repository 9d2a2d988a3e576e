/// Visibility and enablement of the submit action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitActionState {
    pub visible: bool,
    pub enabled: bool,
}

impl SubmitActionState {
    pub const HIDDEN: SubmitActionState = SubmitActionState {
        visible: false,
        enabled: false,
    };
    pub const SHOWN: SubmitActionState = SubmitActionState {
        visible: true,
        enabled: true,
    };
}

/// Shown only once the current member selection has a resolved detail.
pub fn submit_action(member_resolved: bool) -> SubmitActionState {
    if member_resolved {
        SubmitActionState::SHOWN
    } else {
        SubmitActionState::HIDDEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_resolution() {
        assert_eq!(submit_action(true), SubmitActionState::SHOWN);
        assert_eq!(submit_action(false), SubmitActionState::HIDDEN);
    }
}
