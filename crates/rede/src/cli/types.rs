//! CLI value enums and their domain conversions.

use clap::ValueEnum;

use crate::domain::ContactStatus;

/// Contact status for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactStatusArg {
    /// Registered, not yet followed up
    Pending,
    /// Attends but is not a member
    Visitor,
    /// Full member
    Member,
}

impl std::fmt::Display for ContactStatusArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ContactStatus::from(*self).fmt(f)
    }
}

impl From<ContactStatusArg> for ContactStatus {
    fn from(arg: ContactStatusArg) -> Self {
        match arg {
            ContactStatusArg::Pending => Self::Pending,
            ContactStatusArg::Visitor => Self::Visitor,
            ContactStatusArg::Member => Self::Member,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ContactStatusArg::Pending, ContactStatus::Pending, "pending")]
    #[case(ContactStatusArg::Visitor, ContactStatus::Visitor, "visitor")]
    #[case(ContactStatusArg::Member, ContactStatus::Member, "member")]
    fn converts_to_domain(
        #[case] arg: ContactStatusArg,
        #[case] status: ContactStatus,
        #[case] text: &str,
    ) {
        assert_eq!(ContactStatus::from(arg), status);
        assert_eq!(arg.to_string(), text);
    }
}
