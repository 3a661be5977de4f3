use std::fmt;

/// Wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    CollectingInfo,
    CollectingDocument,
    SelectingDomain,
    Review,
    Submitting,
    Complete,
}

impl Step {
    /// The four steps shown in the progress indicator.
    pub const VISIBLE: [Step; 4] = [
        Step::CollectingInfo,
        Step::CollectingDocument,
        Step::SelectingDomain,
        Step::Review,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Step::CollectingInfo => "Patent Information",
            Step::CollectingDocument => "Upload Document",
            Step::SelectingDomain => "Select Domain",
            Step::Review => "Review & Submit",
            Step::Submitting => "Submitting",
            Step::Complete => "Complete",
        }
    }

    /// Draft fields may only change before the submission is sent.
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            Step::CollectingInfo | Step::CollectingDocument | Step::SelectingDomain | Step::Review
        )
    }

    /// The following input step. `None` from `Review` onwards.
    pub(crate) fn next_input(&self) -> Option<Step> {
        match self {
            Step::CollectingInfo => Some(Step::CollectingDocument),
            Step::CollectingDocument => Some(Step::SelectingDomain),
            Step::SelectingDomain => Some(Step::Review),
            Step::Review | Step::Submitting | Step::Complete => None,
        }
    }

    pub(crate) fn previous_input(&self) -> Step {
        match self {
            Step::CollectingInfo | Step::CollectingDocument => Step::CollectingInfo,
            Step::SelectingDomain => Step::CollectingDocument,
            Step::Review => Step::SelectingDomain,
            Step::Submitting => Step::Review,
            Step::Complete => Step::Complete,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_labels() {
        let labels: Vec<&str> = Step::VISIBLE.iter().map(Step::label).collect();
        assert_eq!(
            labels,
            vec!["Patent Information", "Upload Document", "Select Domain", "Review & Submit"]
        );
    }

    #[test]
    fn forward_chain_stops_at_review() {
        let mut step = Step::CollectingInfo;
        let mut seen = vec![step];
        while let Some(next) = step.next_input() {
            step = next;
            seen.push(step);
        }
        assert_eq!(seen, Step::VISIBLE.to_vec());
    }

    #[test]
    fn complete_has_no_way_back() {
        assert_eq!(Step::Complete.previous_input(), Step::Complete);
        assert!(!Step::Complete.is_editable());
        assert!(!Step::Submitting.is_editable());
    }
}
